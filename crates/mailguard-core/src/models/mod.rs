/// Data models
pub mod config;
pub mod dnc;
pub mod notification;

pub use config::*;
pub use dnc::*;
pub use notification::*;
