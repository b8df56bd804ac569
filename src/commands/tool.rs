//! JSON-lines tool server
//!
//! One request per input line, one response per output line:
//!
//! ```text
//! {"session": "conv-1", "tool": "make_guess", "args": {"word": "crane"}}
//! ```
//!
//! The response is the tool result, or `{"error": "..."}` when the request
//! cannot be served. All requests share one session registry.

use crate::agent::{ToolContext, ToolRegistry};
use anyhow::Result;
use serde::Deserialize;
use serde_json::{Value, json};
use std::io::{BufRead, Write};

#[derive(Debug, Deserialize)]
struct ToolRequest {
    session: String,
    tool: String,
    #[serde(default)]
    args: Value,
    /// Quota key; defaults to the session id
    #[serde(default)]
    client: Option<String>,
}

/// Serves tool calls read from a line-oriented stream
pub struct ToolServer {
    tools: ToolRegistry,
}

impl ToolServer {
    #[must_use]
    pub const fn new(tools: ToolRegistry) -> Self {
        Self { tools }
    }

    /// Answer one request line
    #[must_use]
    pub fn handle_line(&self, line: &str) -> Value {
        let request: ToolRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(error = %err, "malformed request");
                return json!({ "error": format!("malformed request: {err}") });
            }
        };

        let client = request.client.as_deref().unwrap_or(&request.session);
        let ctx = ToolContext::new(&request.session, client);
        let args = if request.args.is_null() {
            json!({})
        } else {
            request.args
        };

        match self.tools.execute(&request.tool, &ctx, args) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(
                    session = %request.session,
                    tool = %request.tool,
                    error = %err,
                    "tool call failed"
                );
                json!({ "error": err.to_string() })
            }
        }
    }

    /// Serve until `input` ends; blank lines are skipped
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub fn serve<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle_line(&line);
            writeln!(output, "{response}")?;
            output.flush()?;
        }
        Ok(())
    }
}
