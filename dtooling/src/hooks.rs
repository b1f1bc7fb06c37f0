//! Dispatcher hooks for tool lifecycle events.
//!
//! ```rust
//! use dtooling::{DispatchHooks, NoopDispatchHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn DispatchHooks) {}
//!
//! let hooks = NoopDispatchHooks;
//! assert_hooks_trait(&hooks);
//! ```

use std::io;
use std::path::Path;
use std::time::Duration;

use crate::{ToolError, ToolOutput};

pub trait DispatchHooks: Send + Sync {
    fn on_dispatch_start(&self, _tool_name: &str) {}

    fn on_dispatch_success(&self, _tool_name: &str, _output: &ToolOutput, _elapsed: Duration) {}

    fn on_dispatch_failure(&self, _tool_name: &str, _error: &ToolError, _elapsed: Duration) {}

    fn on_image_saved(&self, _tool_name: &str, _path: &Path, _size_bytes: usize) {}

    fn on_image_save_failure(&self, _tool_name: &str, _error: &io::Error) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDispatchHooks;

impl DispatchHooks for NoopDispatchHooks {}
