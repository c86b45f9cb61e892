pub mod debounce;
pub mod event_bus;
pub mod frame;
pub mod memo;
pub mod when;

pub use debounce::*;
pub use event_bus::*;
pub use frame::*;
pub use memo::*;
pub use when::*;
