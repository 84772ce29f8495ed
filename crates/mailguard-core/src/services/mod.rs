/// Service modules
pub mod config;
pub mod dnc;
pub mod metrics;
pub mod security;
pub mod subscription;

pub use dnc::*;
pub use metrics::*;
pub use security::*;
pub use subscription::*;
