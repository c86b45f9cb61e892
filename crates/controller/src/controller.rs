use foundation::geo::LngLat;
use foundation::ids::SiteId;
use runtime::When;
use tracing::{debug, info, warn};
use viewport::ViewportState;

use crate::widget::{FlyTo, MapWidget, MarkerHandle, MarkerSpec, WidgetEvent};

/// Outcome of comparing the desired viewport with the widget's camera.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyncDecision {
    /// State and widget agree; the widget is the source of truth.
    InSync,
    /// The state still holds the widget's last write-back, possibly clamped.
    /// The widget initiated it, so nothing is sent back.
    WidgetInitiated,
    /// The state changed programmatically and the widget must follow.
    Fly,
    /// The state differs, but this exact request was already commanded.
    AlreadyCommanded,
}

/// Revisions `(transition, center, zoom)` at a point in time.
type OriginKey = (u64, u64, u64);

/// The request the last `fly_to` was issued for.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Command {
    transition: u64,
    center: LngLat,
    zoom: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerBinding {
    pub handle: MarkerHandle,
    pub site: SiteId,
    pub selected: bool,
}

/// Counters from one reaction pass.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub changes: usize,
    pub flew: bool,
    pub markers_created: usize,
    pub highlight_updates: usize,
}

/// Synchronizes a [`MapWidget`] with a [`ViewportState`].
///
/// Widget events write the camera back into the state; state changes that
/// did not come from the widget are turned into `fly_to` commands. Which side
/// initiated a change is decided by comparing the state's desired viewport
/// with the widget's actual one, so the two never chase each other.
#[derive(Debug, Default)]
pub struct MapController {
    markers: Vec<MarkerBinding>,
    markers_ready: When,
    commanded: Option<Command>,
    /// Revisions right after the latest camera write-back.
    written_back: Option<OriginKey>,
    flights: u64,
}

impl MapController {
    /// Hands the widget's projection to the state and returns a controller
    /// ready for its first update pass.
    pub fn attach<W: MapWidget + ?Sized>(state: &mut ViewportState, widget: &W) -> Self {
        state.install_projection(widget.projection());
        let mut controller = Self::default();
        controller.write_back(state, widget);
        controller
    }

    pub fn markers(&self) -> &[MarkerBinding] {
        &self.markers
    }

    /// Number of `fly_to` commands issued so far.
    pub fn flights_commanded(&self) -> u64 {
        self.flights
    }

    /// Compares the state's desired center/zoom with the widget's camera.
    pub fn sync_decision<W: MapWidget + ?Sized>(
        &self,
        state: &ViewportState,
        widget: &W,
    ) -> SyncDecision {
        let eps = state.config().sync_epsilon;
        let same_center = state.center().approx_eq(widget.center(), eps);
        let same_zoom = (state.zoom() - widget.zoom()).abs() <= eps;
        if same_center && same_zoom {
            return SyncDecision::InSync;
        }
        if self.written_back == Some(origin_key(state)) {
            return SyncDecision::WidgetInitiated;
        }
        let pending = self.commanded.is_some_and(|c| {
            c.transition == state.revisions().transition
                && c.center.approx_eq(state.center(), eps)
                && (c.zoom - state.zoom()).abs() <= eps
        });
        if pending {
            return SyncDecision::AlreadyCommanded;
        }
        SyncDecision::Fly
    }

    /// Routes one widget event into the state.
    pub fn handle_event<W: MapWidget + ?Sized>(
        &mut self,
        state: &mut ViewportState,
        widget: &W,
        event: WidgetEvent,
    ) {
        match event {
            WidgetEvent::Load => {
                if state.mark_initialized() {
                    info!("map initialized");
                }
            }
            WidgetEvent::Move | WidgetEvent::Zoom => self.write_back(state, widget),
            WidgetEvent::Click {
                marker: Some(handle),
            } => {
                // Marker clicks stop here and never reach the background handler.
                match self.markers.iter().find(|m| m.handle == handle) {
                    Some(binding) => {
                        debug!(site = %binding.site, "marker clicked");
                        state.set_selected_site(Some(binding.site.clone()));
                    }
                    None => warn!(?handle, "click on unknown marker ignored"),
                }
            }
            WidgetEvent::Click { marker: None } => {
                if state.set_selected_site(None) {
                    debug!("selection cleared by background click");
                }
            }
        }
    }

    /// Handles a batch of widget events, then runs one update pass.
    pub fn dispatch<W: MapWidget + ?Sized>(
        &mut self,
        state: &mut ViewportState,
        widget: &mut W,
        events: impl IntoIterator<Item = WidgetEvent>,
    ) -> UpdateReport {
        for event in events {
            self.handle_event(state, &*widget, event);
        }
        self.update(state, widget)
    }

    /// The reaction pass, run after every batch of state mutations.
    pub fn update<W: MapWidget + ?Sized>(
        &mut self,
        state: &mut ViewportState,
        widget: &mut W,
    ) -> UpdateReport {
        let mut report = UpdateReport {
            changes: state.drain_changes().len(),
            ..UpdateReport::default()
        };

        if self.sync_decision(state, &*widget) == SyncDecision::Fly {
            let config = state.config();
            let options = FlyTo {
                center: state.center(),
                zoom: state.zoom(),
                speed: config.fly_speed,
                curve: config.fly_curve,
            };
            info!(
                lng = options.center.lng,
                lat = options.center.lat,
                zoom = options.zoom,
                "flying map to requested viewport"
            );
            widget.fly_to(options);
            self.commanded = Some(Command {
                transition: state.revisions().transition,
                center: options.center,
                zoom: options.zoom,
            });
            self.flights += 1;
            report.flew = true;
        }

        let markers = &mut self.markers;
        let created = self.markers_ready.check(!state.sites().is_empty(), || {
            for site in state.sites() {
                let handle = widget.add_marker(MarkerSpec {
                    site: site.id.clone(),
                    coordinate: site.coordinate,
                });
                markers.push(MarkerBinding {
                    handle,
                    site: site.id.clone(),
                    selected: false,
                });
            }
            markers.len()
        });
        if let Some(count) = created {
            info!(count, "markers created");
            report.markers_created = count;
        }

        for binding in &mut self.markers {
            let selected = state.is_selected(&binding.site);
            if binding.selected != selected {
                widget.set_marker_selected(binding.handle, selected);
                binding.selected = selected;
                report.highlight_updates += 1;
            }
        }

        report
    }

    fn write_back<W: MapWidget + ?Sized>(&mut self, state: &mut ViewportState, widget: &W) {
        state.set_viewport_params(
            Some(widget.center()),
            Some(widget.zoom()),
            Some(widget.bounds()),
        );
        self.written_back = Some(origin_key(state));
    }
}

fn origin_key(state: &ViewportState) -> OriginKey {
    let r = state.revisions();
    (r.transition, r.center, r.zoom)
}
