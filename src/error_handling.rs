//! Error taxonomy shared by every layer of the server.

pub mod types;

pub use types::*;
