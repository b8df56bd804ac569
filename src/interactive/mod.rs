//! Interactive TUI interface

mod app;
mod rendering;

pub use app::{App, celebration, run_tui};
