//! The `services` module provides a high-level API for interacting with the
//! database. It encapsulates the query logic so the rest of the application
//! (HTTP handlers, the dashboard assembly) can work with domain models
//! without knowing the underlying schema.

pub mod device_service;
pub mod reading_service;
pub mod user_service;

pub use device_service::*;
pub use reading_service::*;
pub use user_service::*;
