use foundation::geo::LngLat;
use foundation::math::Vec2;

/// Geographic-to-screen transform owned by the map widget.
///
/// Implementations always answer for the widget's *current* camera, so the
/// same handle stays valid while the map pans and zooms.
pub trait Projection {
    fn project(&self, coordinate: LngLat) -> Vec2;
}

impl<F> Projection for F
where
    F: Fn(LngLat) -> Vec2,
{
    fn project(&self, coordinate: LngLat) -> Vec2 {
        self(coordinate)
    }
}
