pub mod config;
pub mod config_commands;
pub mod errors;
pub mod status;

pub use config::AppConfig;
pub use errors::AppError;
pub use status::StatusEvent;
