use serde::{Deserialize, Serialize};

/// Screen-space point or offset in pixels (`y` grows downward).
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Euclidean distance between two pixel positions.
pub fn pixel_distance(a: Vec2, b: Vec2) -> f64 {
    (a - b).length()
}

#[cfg(test)]
mod tests {
    use super::{Vec2, pixel_distance};

    #[test]
    fn vec2_add_sub() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(-0.5, 4.0);
        assert_eq!(a + b, Vec2::new(0.5, 6.0));
        assert_eq!(a - b, Vec2::new(1.5, -2.0));
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Vec2::new(500.0, 300.0);
        let b = Vec2::new(503.0, 304.0);
        assert_eq!(pixel_distance(a, b), 5.0);
        assert_eq!(pixel_distance(b, a), 5.0);
    }
}
