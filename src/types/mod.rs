//! Core types used throughout the library.

pub mod message;
pub mod options;
pub mod prompt;
pub mod request;

// Re-export commonly used types
pub use message::*;
pub use options::*;
pub use prompt::*;
pub use request::*;
