//! Geographic primitives in degrees.

use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }

    /// Component-wise comparison with an absolute tolerance in degrees.
    pub fn approx_eq(&self, other: LngLat, eps: f64) -> bool {
        (self.lng - other.lng).abs() <= eps && (self.lat - other.lat).abs() <= eps
    }
}

/// Axis-aligned geographic rectangle given by its south-west and north-east corners.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LngLatBounds {
    pub sw: LngLat,
    pub ne: LngLat,
}

impl LngLatBounds {
    pub fn new(sw: LngLat, ne: LngLat) -> Self {
        Self { sw, ne }
    }

    pub fn north_west(&self) -> LngLat {
        LngLat::new(self.sw.lng, self.ne.lat)
    }

    pub fn south_east(&self) -> LngLat {
        LngLat::new(self.ne.lng, self.sw.lat)
    }

    pub fn contains(&self, p: LngLat) -> bool {
        (self.sw.lng..=self.ne.lng).contains(&p.lng) && (self.sw.lat..=self.ne.lat).contains(&p.lat)
    }

    /// Returns `p` moved into the rectangle along each axis.
    pub fn clamp(&self, p: LngLat) -> LngLat {
        LngLat::new(
            p.lng.clamp(self.sw.lng.min(self.ne.lng), self.sw.lng.max(self.ne.lng)),
            p.lat.clamp(self.sw.lat.min(self.ne.lat), self.sw.lat.max(self.ne.lat)),
        )
    }

    pub fn corners(&self) -> BoundsCorners {
        let nw = self.north_west();
        let se = self.south_east();
        BoundsCorners {
            left: nw.lng,
            top: nw.lat,
            right: se.lng,
            bottom: se.lat,
        }
    }
}

/// Edges of a bounds rectangle, extracted from its NW/SE corners.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsCorners {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundsCorners {
    /// Corner points in overlay order: top-left, top-right, bottom-right, bottom-left.
    pub fn polygon(&self) -> [[f64; 2]; 4] {
        [
            [self.left, self.top],
            [self.right, self.top],
            [self.right, self.bottom],
            [self.left, self.bottom],
        ]
    }

    pub fn dimensions(&self) -> GeoDimensions {
        GeoDimensions {
            width: (self.right - self.left).abs(),
            height: (self.bottom - self.top).abs(),
        }
    }
}

/// Width and height of a region in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoDimensions {
    pub width: f64,
    pub height: f64,
}

/// Screen size in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundsCorners, GeoDimensions, LngLat, LngLatBounds};

    fn sample() -> LngLatBounds {
        LngLatBounds::new(LngLat::new(2.0, 45.0), LngLat::new(20.0, 55.0))
    }

    #[test]
    fn corners_come_from_north_west_and_south_east() {
        let b = sample();
        assert_eq!(b.north_west(), LngLat::new(2.0, 55.0));
        assert_eq!(b.south_east(), LngLat::new(20.0, 45.0));
        assert_eq!(
            b.corners(),
            BoundsCorners {
                left: 2.0,
                top: 55.0,
                right: 20.0,
                bottom: 45.0
            }
        );
    }

    #[test]
    fn polygon_is_tl_tr_br_bl() {
        let c = sample().corners();
        assert_eq!(
            c.polygon(),
            [[2.0, 55.0], [20.0, 55.0], [20.0, 45.0], [2.0, 45.0]]
        );
    }

    #[test]
    fn dimensions_are_absolute() {
        assert_eq!(
            sample().corners().dimensions(),
            GeoDimensions {
                width: 18.0,
                height: 10.0
            }
        );
    }

    #[test]
    fn clamp_keeps_points_inside() {
        let b = sample();
        assert_eq!(b.clamp(LngLat::new(-10.0, 50.0)), LngLat::new(2.0, 50.0));
        assert_eq!(b.clamp(LngLat::new(10.0, 80.0)), LngLat::new(10.0, 55.0));
        assert!(b.contains(b.clamp(LngLat::new(100.0, -100.0))));
    }

    #[test]
    fn lng_lat_serializes_with_named_fields() {
        let json = serde_json::to_value(LngLat::new(11.0, 50.0)).unwrap();
        assert_eq!(json, serde_json::json!({ "lng": 11.0, "lat": 50.0 }));
    }
}
