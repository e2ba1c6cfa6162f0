//! Renderers that turn a status stream into output and per-file outcomes.

pub mod bar;
pub mod format;
pub mod json;
pub mod plain;
pub mod terminal;

pub use format::RenderStyle;
pub use terminal::{MemoryTerminal, StdoutTerminal, Terminal};
