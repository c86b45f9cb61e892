//! Keeps an external map widget and [`viewport::ViewportState`] consistent.

pub mod controller;
pub mod headless;
pub mod resize;
pub mod widget;

pub use controller::*;
pub use headless::*;
pub use resize::*;
pub use widget::*;
