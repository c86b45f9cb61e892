pub mod mercator;
pub mod polar;
pub mod vec;

pub use mercator::*;
pub use polar::*;
pub use vec::*;
