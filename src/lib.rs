pub mod configuration;
pub use configuration::Config;

pub mod error_handling;

pub mod rendering;

pub mod storage;

pub mod web_interface;
pub use web_interface::WebServer;
