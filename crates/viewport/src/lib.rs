//! Shared view state of the site map.
//!
//! [`ViewportState`] is the single source of truth the map controller and
//! popup presenter read from. It is constructed by the application root and
//! passed by reference; there is no global instance.

pub mod config;
pub mod popup;
pub mod projection;
pub mod site;
pub mod state;
pub mod topic;

pub use config::*;
pub use popup::*;
pub use projection::*;
pub use site::*;
pub use state::*;
pub use topic::*;
