/// Utility modules
pub mod address;
pub mod logging;

pub use address::*;
pub use logging::*;
