//! Spherical Web Mercator.
//!
//! Meters are measured on the WGS84 semi-major axis sphere; screen scale
//! follows the slippy-map convention of a 512 px world at zoom 0.

use crate::geo::{LngLat, LngLatBounds, Size};

use super::Vec2;

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;

/// Latitude where the Mercator square ends.
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.05112878;

/// World width in pixels at zoom 0.
pub const WORLD_SIZE_PX: f64 = 512.0;

pub fn wrap_lon_deg(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

pub fn mercator_x_m(lon_deg: f64) -> f64 {
    WGS84_A * lon_deg.to_radians()
}

pub fn mercator_y_m(lat_deg: f64) -> f64 {
    let lat = lat_deg
        .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG)
        .to_radians();
    WGS84_A * (0.5 * (std::f64::consts::FRAC_PI_2 + lat)).tan().ln()
}

pub fn inverse_mercator_lon_deg(x_m: f64) -> f64 {
    (x_m / WGS84_A).to_degrees()
}

pub fn inverse_mercator_lat_deg(y_m: f64) -> f64 {
    let lat = 2.0 * (y_m / WGS84_A).exp().atan() - std::f64::consts::FRAC_PI_2;
    lat.to_degrees()
}

/// Screen pixels per Mercator meter at `zoom`.
pub fn scale_px_per_m(zoom: f64) -> f64 {
    let world_width_m = 2.0 * std::f64::consts::PI * WGS84_A;
    WORLD_SIZE_PX * zoom.exp2() / world_width_m
}

/// A flat camera: the map center sits at the middle of a `size` canvas.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MercatorCamera {
    pub center: LngLat,
    pub zoom: f64,
    pub size: Size,
}

impl MercatorCamera {
    pub fn new(center: LngLat, zoom: f64, size: Size) -> Self {
        Self { center, zoom, size }
    }

    pub fn project(&self, p: LngLat) -> Vec2 {
        let scale = scale_px_per_m(self.zoom);
        let world_width_m = 2.0 * std::f64::consts::PI * WGS84_A;
        let dx = (mercator_x_m(p.lng) - mercator_x_m(self.center.lng) + 0.5 * world_width_m)
            .rem_euclid(world_width_m)
            - 0.5 * world_width_m;
        let dy = mercator_y_m(p.lat) - mercator_y_m(self.center.lat);
        Vec2::new(
            self.size.width * 0.5 + dx * scale,
            self.size.height * 0.5 - dy * scale,
        )
    }

    pub fn unproject(&self, px: Vec2) -> LngLat {
        let scale = scale_px_per_m(self.zoom);
        let x_m = mercator_x_m(self.center.lng) + (px.x - self.size.width * 0.5) / scale;
        let y_m = mercator_y_m(self.center.lat) + (self.size.height * 0.5 - px.y) / scale;
        LngLat::new(
            wrap_lon_deg(inverse_mercator_lon_deg(x_m)),
            inverse_mercator_lat_deg(y_m).clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG),
        )
    }

    /// Visible region, from the unprojected canvas corners.
    pub fn bounds(&self) -> LngLatBounds {
        let sw = self.unproject(Vec2::new(0.0, self.size.height));
        let ne = self.unproject(Vec2::new(self.size.width, 0.0));
        LngLatBounds::new(sw, ne)
    }
}

#[cfg(test)]
mod tests {
    use super::{MercatorCamera, inverse_mercator_lat_deg, mercator_y_m, wrap_lon_deg};
    use crate::geo::{LngLat, Size};
    use crate::math::Vec2;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn camera() -> MercatorCamera {
        MercatorCamera::new(LngLat::new(11.0, 50.0), 6.0, Size::new(1000.0, 600.0))
    }

    #[test]
    fn center_projects_to_canvas_middle() {
        let px = camera().project(LngLat::new(11.0, 50.0));
        assert_close(px.x, 500.0, 1e-9);
        assert_close(px.y, 300.0, 1e-9);
    }

    #[test]
    fn east_is_right_and_north_is_up() {
        let cam = camera();
        let east = cam.project(LngLat::new(12.0, 50.0));
        let north = cam.project(LngLat::new(11.0, 51.0));
        assert!(east.x > 500.0);
        assert!(north.y < 300.0);
    }

    #[test]
    fn one_degree_at_zoom_six_is_world_fraction() {
        // 512 * 2^6 px per 360 degrees of longitude.
        let px = camera().project(LngLat::new(12.0, 50.0));
        assert_close(px.x - 500.0, 512.0 * 64.0 / 360.0, 1e-6);
    }

    #[test]
    fn unproject_inverts_project() {
        let cam = camera();
        let p = LngLat::new(14.5, 47.25);
        let back = cam.unproject(cam.project(p));
        assert_close(back.lng, p.lng, 1e-9);
        assert_close(back.lat, p.lat, 1e-9);
        let corner = cam.unproject(Vec2::new(0.0, 0.0));
        assert!(corner.lng < 11.0 && corner.lat > 50.0);
    }

    #[test]
    fn bounds_enclose_center() {
        let b = camera().bounds();
        assert!(b.contains(LngLat::new(11.0, 50.0)));
        assert!(b.sw.lng < b.ne.lng && b.sw.lat < b.ne.lat);
    }

    #[test]
    fn mercator_lat_round_trip_and_wrap() {
        assert_close(inverse_mercator_lat_deg(mercator_y_m(63.0)), 63.0, 1e-9);
        assert_close(wrap_lon_deg(190.0), -170.0, 1e-12);
        assert_close(wrap_lon_deg(-180.0), -180.0, 1e-12);
    }
}
