//! Command implementations

pub mod agent;
pub mod benchmark;
pub mod simple;
pub mod tool;

pub use agent::{AgentConfig, run_agent};
pub use benchmark::{BenchmarkResult, run_benchmark};
pub use simple::{play_lines, run_simple};
pub use tool::ToolServer;
