pub mod site_collection;
pub mod site_loader;

pub use site_collection::*;
pub use site_loader::*;
