/// API endpoint modules
pub mod health;
pub mod suppressions;
pub mod webhook;
