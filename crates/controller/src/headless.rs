//! Deterministic in-process map widget.
//!
//! `HeadlessMap` renders nothing. It keeps a flat Web Mercator camera,
//! animates `fly_to` over frames, and queues the same events a browser map
//! would emit. Gestures (`pan_by`, `zoom_to`, `click`) stand in for user input.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use foundation::geo::{LngLat, LngLatBounds, Size};
use foundation::math::{MercatorCamera, Vec2, pixel_distance};
use viewport::{Projection, ViewportConfig};

use crate::widget::{FlyTo, MapWidget, MarkerHandle, MarkerSpec, WidgetEvent};

/// Shortest and longest flight, in seconds.
const MIN_FLIGHT_S: f64 = 0.2;
const MAX_FLIGHT_S: f64 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMarker {
    pub spec: MarkerSpec,
    pub selected: bool,
}

#[derive(Debug, Copy, Clone)]
struct Flight {
    from_center: LngLat,
    from_zoom: f64,
    to: FlyTo,
    /// Extra zoom-out at mid-flight.
    hump: f64,
    elapsed_s: f64,
    duration_s: f64,
}

#[derive(Debug, Clone)]
struct CameraProjection(Rc<Cell<MercatorCamera>>);

impl Projection for CameraProjection {
    fn project(&self, coordinate: LngLat) -> Vec2 {
        self.0.get().project(coordinate)
    }
}

#[derive(Debug)]
pub struct HeadlessMap {
    camera: Rc<Cell<MercatorCamera>>,
    min_zoom: f64,
    max_zoom: f64,
    /// Region the center may not leave; `None` lets the map roam freely.
    max_bounds: Option<LngLatBounds>,
    flight: Option<Flight>,
    markers: Vec<HeadlessMarker>,
    events: VecDeque<WidgetEvent>,
    flights_started: u64,
    loaded: bool,
}

impl HeadlessMap {
    pub fn new(center: LngLat, zoom: f64, size: Size) -> Self {
        Self {
            camera: Rc::new(Cell::new(MercatorCamera::new(center, zoom, size))),
            min_zoom: 0.0,
            max_zoom: 22.0,
            max_bounds: None,
            flight: None,
            markers: Vec::new(),
            events: VecDeque::new(),
            flights_started: 0,
            loaded: false,
        }
    }

    /// A widget opened on the configured initial viewport, constrained to
    /// the configured zoom range and center bounds.
    pub fn from_config(config: &ViewportConfig) -> Self {
        let mut map = Self::new(
            config.initial_center,
            config.initial_zoom,
            config.initial_window,
        );
        map.min_zoom = config.min_zoom;
        map.max_zoom = config.max_zoom;
        map.max_bounds = Some(config.max_bounds);
        map
    }

    pub fn camera(&self) -> MercatorCamera {
        self.camera.get()
    }

    pub fn markers(&self) -> &[HeadlessMarker] {
        &self.markers
    }

    pub fn selected_markers(&self) -> Vec<MarkerHandle> {
        self.markers
            .iter()
            .enumerate()
            .filter(|(_, m)| m.selected)
            .map(|(i, _)| MarkerHandle(i))
            .collect()
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    pub fn flights_started(&self) -> u64 {
        self.flights_started
    }

    /// Queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<WidgetEvent> {
        self.events.drain(..).collect()
    }

    /// Emits `Load` the first time it is called.
    pub fn load(&mut self) {
        if !self.loaded {
            self.loaded = true;
            self.events.push_back(WidgetEvent::Load);
        }
    }

    /// Drag gesture: the map content follows the pointer by `(dx, dy)` pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.flight = None;
        let mut cam = self.camera.get();
        let mid = Vec2::new(cam.size.width * 0.5, cam.size.height * 0.5);
        cam.center = self.constrain(cam.unproject(mid - Vec2::new(dx, dy)));
        self.camera.set(cam);
        self.events.push_back(WidgetEvent::Move);
    }

    /// Scroll gesture around the map center.
    pub fn zoom_to(&mut self, zoom: f64) {
        self.flight = None;
        let mut cam = self.camera.get();
        cam.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.camera.set(cam);
        self.events.push_back(WidgetEvent::Zoom);
        self.events.push_back(WidgetEvent::Move);
    }

    pub fn click(&mut self, marker: Option<MarkerHandle>) {
        self.events.push_back(WidgetEvent::Click { marker });
    }

    /// Steps the running flight by `dt_s` seconds.
    pub fn advance(&mut self, dt_s: f64) {
        let Some(mut flight) = self.flight else {
            return;
        };
        flight.elapsed_s += dt_s.max(0.0);
        let t = (flight.elapsed_s / flight.duration_s).min(1.0);

        let mut cam = self.camera.get();
        let before = cam.zoom;
        if t >= 1.0 {
            cam.center = flight.to.center;
            cam.zoom = flight.to.zoom;
            self.flight = None;
        } else {
            let e = ease_in_out_cubic(t);
            cam.center = self.constrain(LngLat::new(
                lerp(flight.from_center.lng, flight.to.center.lng, e),
                lerp(flight.from_center.lat, flight.to.center.lat, e),
            ));
            let arc = flight.hump * (std::f64::consts::PI * e).sin();
            cam.zoom = (lerp(flight.from_zoom, flight.to.zoom, e) - arc)
                .clamp(self.min_zoom, self.max_zoom);
            self.flight = Some(flight);
        }
        self.camera.set(cam);

        if cam.zoom != before {
            self.events.push_back(WidgetEvent::Zoom);
        }
        self.events.push_back(WidgetEvent::Move);
    }

    fn constrain(&self, center: LngLat) -> LngLat {
        match self.max_bounds {
            Some(bounds) => bounds.clamp(center),
            None => center,
        }
    }
}

impl MapWidget for HeadlessMap {
    fn zoom(&self) -> f64 {
        self.camera.get().zoom
    }

    fn center(&self) -> LngLat {
        self.camera.get().center
    }

    fn bounds(&self) -> LngLatBounds {
        self.camera.get().bounds()
    }

    /// Starts a flight, replacing any flight in progress.
    fn fly_to(&mut self, options: FlyTo) {
        let cam = self.camera.get();
        let to = FlyTo {
            center: self.constrain(options.center),
            zoom: options.zoom.clamp(self.min_zoom, self.max_zoom),
            ..options
        };
        self.flights_started += 1;

        // Path length in screen widths plus zoom levels.
        let mid = Vec2::new(cam.size.width * 0.5, cam.size.height * 0.5);
        let screens = pixel_distance(cam.project(to.center), mid) / cam.size.width.max(1.0);
        let path = screens + (to.zoom - cam.zoom).abs();
        let speed = if to.speed > 0.0 { to.speed } else { 1.0 };

        self.flight = Some(Flight {
            from_center: cam.center,
            from_zoom: cam.zoom,
            to,
            hump: 0.25 * to.curve.max(0.0) * screens.min(4.0),
            elapsed_s: 0.0,
            duration_s: ((0.5 + path) / speed).clamp(MIN_FLIGHT_S, MAX_FLIGHT_S),
        });
    }

    fn projection(&self) -> Rc<dyn Projection> {
        Rc::new(CameraProjection(Rc::clone(&self.camera)))
    }

    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerHandle {
        self.markers.push(HeadlessMarker {
            spec: marker,
            selected: false,
        });
        MarkerHandle(self.markers.len() - 1)
    }

    fn set_marker_selected(&mut self, marker: MarkerHandle, selected: bool) {
        if let Some(m) = self.markers.get_mut(marker.0) {
            m.selected = selected;
        }
    }

    fn resize(&mut self, size: Size) {
        let mut cam = self.camera.get();
        cam.size = size;
        self.camera.set(cam);
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
