pub mod api;
pub mod core;
pub mod error;
mod logging;

pub use logging::init_logging;
