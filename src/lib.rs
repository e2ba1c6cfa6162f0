pub mod commands;
pub mod common;
pub mod logging;
pub mod pipeline;
pub mod producer;
pub mod ui;
