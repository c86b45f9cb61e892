//! Polar coordinates around a screen-space center.
//!
//! Angles follow the popup-placement convention: the angle of a point `p`
//! around `c` is `atan2(-(p.y - c.y), -(p.x - c.x))`, the bearing of the
//! reflected offset `c - p`. A marker directly right of the center therefore
//! has angle π. Converting back with [`polar_to_cartesian`] uses the same
//! angle, so a positive radius lands on the reflected side and a negative
//! radius on the marker's side.

use std::f64::consts::TAU;

use super::Vec2;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Polar {
    pub radius: f64,
    /// Radians, see [`normalize_angle`] for the range.
    pub angle: f64,
}

impl Polar {
    pub fn new(radius: f64, angle: f64) -> Self {
        Self { radius, angle }
    }

    /// Moves the point along its bearing; a positive `offset` pulls it toward the center.
    pub fn shrink(self, offset: f64) -> Self {
        Self::new(self.radius - offset, self.angle)
    }
}

/// Lifts the negative half of an `atan2` result into `[0, 2π)`.
///
/// `(x, y)` is the point whose bearing was taken and `(cx, cy)` the center.
/// The two quadrant tests are kept as separate branches; the ray straight
/// below the reflected center (`x == cx`, `y > cy`) matches neither and keeps
/// its raw value of -π/2. Placement is unaffected since only `cos`/`sin` of
/// the angle are consumed.
pub fn normalize_angle(angle: f64, p: Vec2, c: Vec2) -> f64 {
    // Tests run on the reflected point `c - p` relative to `c`.
    let (x, y) = (2.0 * c.x - p.x, 2.0 * c.y - p.y);
    let mut angle = angle;
    if x < c.x && y < c.y {
        angle += TAU;
    }
    if y < c.y && x > c.x {
        angle += TAU;
    }
    angle
}

pub fn cartesian_to_polar(p: Vec2, c: Vec2) -> Polar {
    let radius = (p - c).length();
    // Taken on `c - p` directly so a level marker yields π, not -π.
    let angle = (c.y - p.y).atan2(c.x - p.x);
    Polar::new(radius, normalize_angle(angle, p, c))
}

pub fn polar_to_cartesian(polar: Polar, c: Vec2) -> Vec2 {
    Vec2::new(
        c.x + polar.radius * polar.angle.cos(),
        c.y + polar.radius * polar.angle.sin(),
    )
}
