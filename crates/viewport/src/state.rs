use std::rc::Rc;

use foundation::geo::{BoundsCorners, GeoDimensions, LngLat, LngLatBounds, Size};
use foundation::ids::SiteId;
use foundation::math::Vec2;
use runtime::{Event, EventBus, Memo};

use crate::config::ViewportConfig;
use crate::popup::popup_anchor;
use crate::projection::Projection;
use crate::site::{PopupCandidate, ProjectedSite, Site};
use crate::topic::{StateChange, Topic};

/// Per-field write counters.
///
/// A counter only moves when its field actually changes, which makes the
/// counters usable as dependency keys for the computed values.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Revisions {
    pub center: u64,
    pub zoom: u64,
    pub bounds: u64,
    pub window_size: u64,
    pub initialized: u64,
    pub selected: u64,
    pub sites: u64,
    pub transition: u64,
    pub projection: u64,
}

impl Revisions {
    fn bump(&mut self, topic: Topic) -> u64 {
        let slot = match topic {
            Topic::Center => &mut self.center,
            Topic::Zoom => &mut self.zoom,
            Topic::Bounds => &mut self.bounds,
            Topic::WindowSize => &mut self.window_size,
            Topic::Initialized => &mut self.initialized,
            Topic::SelectedSite => &mut self.selected,
            Topic::Sites => &mut self.sites,
            Topic::Transition => &mut self.transition,
            Topic::Projection => &mut self.projection,
        };
        *slot += 1;
        *slot
    }

    /// Everything a projected pixel position depends on.
    ///
    /// The projection is a live view of the widget camera. Every camera move
    /// is written back with fresh bounds, so `bounds` also covers moves whose
    /// center or zoom write was clamped to an unchanged value.
    fn projection_key(&self) -> ProjectionKey {
        (
            self.projection,
            self.center,
            self.zoom,
            self.bounds,
            self.window_size,
        )
    }
}

type ProjectionKey = (u64, u64, u64, u64, u64);

/// The shared view state of the map.
///
/// Mutations go through the methods below; each effective write bumps the
/// field's revision and publishes a [`StateChange`]. Computed accessors are
/// memoized on the revisions they read, so readers never observe stale
/// derived data and repeated reads between writes are free.
pub struct ViewportState {
    config: ViewportConfig,
    center: LngLat,
    zoom: f64,
    bounds: LngLatBounds,
    window_size: Size,
    initialized: bool,
    selected: Option<SiteId>,
    sites: Vec<Rc<Site>>,
    projection: Option<Rc<dyn Projection>>,
    revisions: Revisions,
    bus: EventBus<StateChange>,

    corners: Memo<u64, BoundsCorners>,
    polygon: Memo<u64, [[f64; 2]; 4]>,
    dimensions: Memo<u64, GeoDimensions>,
    center_px: Memo<ProjectionKey, Vec2>,
    projected_sites: Memo<(ProjectionKey, u64), Rc<[ProjectedSite]>>,
    popup: Memo<(ProjectionKey, u64, u64), Option<PopupCandidate>>,
}

impl std::fmt::Debug for ViewportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportState")
            .field("center", &self.center)
            .field("zoom", &self.zoom)
            .field("bounds", &self.bounds)
            .field("window_size", &self.window_size)
            .field("initialized", &self.initialized)
            .field("selected", &self.selected)
            .field("sites", &self.sites.len())
            .field("has_projection", &self.projection.is_some())
            .field("revisions", &self.revisions)
            .finish_non_exhaustive()
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl ViewportState {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            center: config.clamp_center(config.initial_center),
            zoom: config.clamp_zoom(config.initial_zoom),
            bounds: config.initial_bounds,
            window_size: config.initial_window,
            config,
            initialized: false,
            selected: None,
            sites: Vec::new(),
            projection: None,
            revisions: Revisions::default(),
            bus: EventBus::new(),
            corners: Memo::new(),
            polygon: Memo::new(),
            dimensions: Memo::new(),
            center_px: Memo::new(),
            projected_sites: Memo::new(),
            popup: Memo::new(),
        }
    }

    // --- plain reads ---

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Desired map center; follows the widget unless a transition was requested.
    pub fn center(&self) -> LngLat {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn bounds(&self) -> LngLatBounds {
        self.bounds
    }

    pub fn window_size(&self) -> Size {
        self.window_size
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn selected_site(&self) -> Option<&SiteId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &SiteId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    pub fn sites(&self) -> &[Rc<Site>] {
        &self.sites
    }

    pub fn has_projection(&self) -> bool {
        self.projection.is_some()
    }

    pub fn revisions(&self) -> Revisions {
        self.revisions
    }

    /// Notifications published since the previous drain, in write order.
    pub fn drain_changes(&mut self) -> Vec<Event<StateChange>> {
        self.bus.drain()
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.bus.is_empty()
    }

    // --- mutations ---

    /// Installs the widget's coordinate transform. Must happen before any
    /// pixel-space value is read.
    pub fn install_projection(&mut self, projection: Rc<dyn Projection>) {
        self.bus.begin_batch();
        self.projection = Some(projection);
        self.publish(Topic::Projection);
    }

    /// Replaces the site list. An empty collection is ignored.
    ///
    /// Returns `true` when the list was replaced.
    pub fn set_sites(&mut self, sites: impl IntoIterator<Item = Site>) -> bool {
        let sites: Vec<Rc<Site>> = sites.into_iter().map(Rc::new).collect();
        if sites.is_empty() {
            return false;
        }
        self.bus.begin_batch();
        self.sites = sites;
        self.publish(Topic::Sites);
        true
    }

    /// Partial viewport update; omitted parameters keep their value.
    ///
    /// This is the write-back path of the map widget. Returns `true` when any
    /// field changed.
    pub fn set_viewport_params(
        &mut self,
        center: Option<LngLat>,
        zoom: Option<f64>,
        bounds: Option<LngLatBounds>,
    ) -> bool {
        self.bus.begin_batch();
        let mut changed = false;
        if let Some(center) = center {
            changed |= self.write_center(center);
        }
        if let Some(zoom) = zoom {
            changed |= self.write_zoom(zoom);
        }
        if let Some(bounds) = bounds {
            if bounds != self.bounds {
                self.bounds = bounds;
                self.publish(Topic::Bounds);
                changed = true;
            }
        }
        changed
    }

    /// Records a programmatic viewport change for the controller to fly to.
    ///
    /// Every call counts as a new request, even when the target equals the
    /// current viewport.
    pub fn request_transition(&mut self, center: LngLat, zoom: f64) {
        self.bus.begin_batch();
        self.write_center(center);
        self.write_zoom(zoom);
        self.publish(Topic::Transition);
    }

    /// Flips `initialized` to `true`. Returns `true` only on the first call.
    pub fn mark_initialized(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.bus.begin_batch();
        self.initialized = true;
        self.publish(Topic::Initialized);
        true
    }

    /// Sets or clears the selection. Returns `true` when it changed.
    pub fn set_selected_site(&mut self, id: Option<SiteId>) -> bool {
        if self.selected == id {
            return false;
        }
        self.bus.begin_batch();
        self.selected = id;
        self.publish(Topic::SelectedSite);
        true
    }

    /// Only the debounced resize observer writes here.
    pub fn set_window_size(&mut self, size: Size) -> bool {
        if self.window_size == size {
            return false;
        }
        self.bus.begin_batch();
        self.window_size = size;
        self.publish(Topic::WindowSize);
        true
    }

    fn write_center(&mut self, center: LngLat) -> bool {
        if !center.is_finite() {
            return false;
        }
        let center = self.config.clamp_center(center);
        if center == self.center {
            return false;
        }
        self.center = center;
        self.publish(Topic::Center);
        true
    }

    fn write_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let zoom = self.config.clamp_zoom(zoom);
        if zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        self.publish(Topic::Zoom);
        true
    }

    fn publish(&mut self, topic: Topic) {
        let revision = self.revisions.bump(topic);
        self.bus.emit(StateChange { topic, revision });
    }

    // --- computed ---

    pub fn bounds_as_corners(&self) -> BoundsCorners {
        self.corners
            .get(self.revisions.bounds, || self.bounds.corners())
    }

    /// Corner points in order top-left, top-right, bottom-right, bottom-left.
    pub fn bounds_as_polygon(&self) -> [[f64; 2]; 4] {
        self.polygon
            .get(self.revisions.bounds, || self.bounds_as_corners().polygon())
    }

    /// Width and height of the visible region in degrees.
    pub fn geographic_dimensions(&self) -> GeoDimensions {
        self.dimensions
            .get(self.revisions.bounds, || self.bounds_as_corners().dimensions())
    }

    /// The map center in screen pixels.
    ///
    /// # Panics
    ///
    /// Panics if no projection has been installed.
    pub fn center_pixel(&self) -> Vec2 {
        self.center_px.get(self.revisions.projection_key(), || {
            self.require_projection().project(self.center)
        })
    }

    /// Every site with its current pixel position, in dataset order.
    ///
    /// # Panics
    ///
    /// Panics if sites are loaded but no projection has been installed.
    pub fn sites_with_pixel_positions(&self) -> Rc<[ProjectedSite]> {
        let key = (self.revisions.projection_key(), self.revisions.sites);
        self.projected_sites.get(key, || {
            if self.sites.is_empty() {
                return Rc::from(Vec::new());
            }
            let projection = self.require_projection();
            self.sites
                .iter()
                .map(|site| ProjectedSite {
                    site: Rc::clone(site),
                    pixel: projection.project(site.coordinate),
                })
                .collect()
        })
    }

    /// The selected site positioned for its popup, if a loaded site is selected.
    pub fn popup_candidate(&self) -> Option<PopupCandidate> {
        let key = (
            self.revisions.projection_key(),
            self.revisions.sites,
            self.revisions.selected,
        );
        self.popup.get(key, || {
            let selected = self.selected.as_ref()?;
            if self.sites.is_empty() {
                return None;
            }
            let sites = self.sites_with_pixel_positions();
            let hit = sites.iter().find(|p| &p.site.id == selected)?;
            let anchor = popup_anchor(hit.pixel, self.center_pixel(), self.config.popup_offset_px);
            Some(PopupCandidate {
                site: Rc::clone(&hit.site),
                pixel: hit.pixel,
                anchor,
            })
        })
    }

    /// Evaluation counts of the pixel-space memos: `(center, sites, popup)`.
    pub fn recomputations(&self) -> (u64, u64, u64) {
        (
            self.center_px.recomputations(),
            self.projected_sites.recomputations(),
            self.popup.recomputations(),
        )
    }

    fn require_projection(&self) -> &dyn Projection {
        match self.projection.as_deref() {
            Some(p) => p,
            None => panic!("viewport projection read before the map widget was installed"),
        }
    }
}
