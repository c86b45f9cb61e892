use std::rc::Rc;

use foundation::geo::{LngLat, LngLatBounds, Size};
use foundation::ids::SiteId;
use foundation::math::Vec2;
use viewport::Projection;

/// Parameters of an animated viewport transition.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlyTo {
    pub center: LngLat,
    pub zoom: f64,
    /// Average speed; higher is faster.
    pub speed: f64,
    /// How far the camera zooms out mid-flight.
    pub curve: f64,
}

/// Widget-side identity of a marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub site: SiteId,
    pub coordinate: LngLat,
}

/// Notifications the widget delivers to the controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The widget finished its first load.
    Load,
    /// The camera moved (pan, fly, or zoom).
    Move,
    /// The zoom level changed.
    Zoom,
    /// A click on the map. `marker` is set when the click hit a marker.
    Click { marker: Option<MarkerHandle> },
}

/// The map widget as seen by the controller.
///
/// The widget owns pan/zoom, projection, and marker rendering; the
/// controller only reads its camera and issues commands.
pub trait MapWidget {
    fn zoom(&self) -> f64;
    fn center(&self) -> LngLat;
    fn bounds(&self) -> LngLatBounds;
    fn fly_to(&mut self, options: FlyTo);

    /// A live handle on the widget's geographic-to-pixel transform.
    fn projection(&self) -> Rc<dyn Projection>;

    fn project(&self, coordinate: LngLat) -> Vec2 {
        self.projection().project(coordinate)
    }

    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerHandle;
    fn set_marker_selected(&mut self, marker: MarkerHandle, selected: bool);
    fn resize(&mut self, size: Size);
}
