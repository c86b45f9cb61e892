use foundation::math::{Vec2, cartesian_to_polar, polar_to_cartesian};

/// Radial offset between a marker and its popup anchor (pixels).
pub const POPUP_OFFSET_PX: f64 = 350.0;

/// Popup anchor for a marker at `marker`, with the map center at `center`.
///
/// The marker is expressed in polar form around the center, its radius is
/// reduced by `offset_px`, and the result is converted back. For markers
/// closer than `offset_px` the radius goes negative and the anchor flips to
/// the other side of the center; that is a valid placement.
pub fn popup_anchor(marker: Vec2, center: Vec2, offset_px: f64) -> Vec2 {
    let polar = cartesian_to_polar(marker, center).shrink(offset_px);
    polar_to_cartesian(polar, center)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use super::{POPUP_OFFSET_PX, popup_anchor};
    use foundation::math::{Vec2, cartesian_to_polar, pixel_distance};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn worked_example_lands_right_of_marker() {
        let anchor = popup_anchor(
            Vec2::new(600.0, 300.0),
            Vec2::new(500.0, 300.0),
            POPUP_OFFSET_PX,
        );
        assert_close(anchor.x, 750.0, 1e-9);
        assert_close(anchor.y, 300.0, 1e-9);
    }

    #[test]
    fn anchor_keeps_bearing_and_shrinks_radius() {
        let center = Vec2::new(640.0, 360.0);
        for step in 0..24 {
            let theta = TAU * step as f64 / 24.0;
            for radius in [360.0, 400.0, 725.5, 1500.0] {
                // Marker whose polar angle around the center is `theta`.
                let marker = Vec2::new(
                    center.x - radius * theta.cos(),
                    center.y - radius * theta.sin(),
                );
                let marker_polar = cartesian_to_polar(marker, center);
                assert_close(marker_polar.radius, radius, 1e-9);
                let anchor = popup_anchor(marker, center, POPUP_OFFSET_PX);

                let along = radius - POPUP_OFFSET_PX;
                assert_close(pixel_distance(anchor, center), along, 1e-6);
                assert_close((anchor.x - center.x) / along, marker_polar.angle.cos(), 1e-9);
                assert_close((anchor.y - center.y) / along, marker_polar.angle.sin(), 1e-9);
            }
        }
    }

    #[test]
    fn near_markers_flip_behind_center() {
        let center = Vec2::new(500.0, 300.0);
        let marker = Vec2::new(500.0, 200.0);
        let anchor = popup_anchor(marker, center, POPUP_OFFSET_PX);
        // radius 100 - 350 = -250 along the bearing of the reflected offset.
        assert_close(anchor.x, 500.0, 1e-9);
        assert_close(anchor.y, 50.0, 1e-9);
    }

    #[test]
    fn marker_at_offset_distance_anchors_on_center() {
        let center = Vec2::new(0.0, 0.0);
        let anchor = popup_anchor(Vec2::new(0.0, -350.0), center, POPUP_OFFSET_PX);
        assert_close(anchor.x, 0.0, 1e-9);
        assert_close(anchor.y, 0.0, 1e-9);
    }
}
