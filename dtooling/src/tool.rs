//! Tool trait contract and closure-backed tools.
//!
//! A tool turns validated arguments into a [`ToolPlan`]; it never talks to a
//! provider itself.
//!
//! ```rust
//! use dtooling::{ArgumentSchema, ArgumentSpec, FunctionTool, Tool, ToolPlan};
//!
//! let tool = FunctionTool::new(
//!     "echo",
//!     "Echoes input",
//!     ArgumentSchema::new().with(ArgumentSpec::string("text", "Text to echo").required()),
//!     |args| Ok(ToolPlan::Local(args.text("text").to_string())),
//! );
//!
//! assert_eq!(tool.definition().name, "echo");
//! assert_eq!(tool.definition().input_schema["required"][0], "text");
//! ```

use std::sync::Arc;

use dprovider::Prompt;
use serde_json::{Map, Value};

use crate::{ArgumentSchema, ToolArguments, ToolDefinition, ToolError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlan {
    pub prompt: String,
    pub style: String,
    pub save: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolPlan {
    /// Routed through the failover router.
    Text(Prompt),
    /// Sent to the image provider, no fallback.
    Image(ImagePlan),
    /// Answered without any provider.
    Local(String),
    /// Answered without any provider, with machine-readable fields beside the text.
    Report {
        text: String,
        details: Map<String, Value>,
    },
}

pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn schema(&self) -> &ArgumentSchema;

    fn plan(&self, args: &ToolArguments) -> Result<ToolPlan, ToolError>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.schema().json_schema(),
        }
    }
}

type PlanHandler = dyn Fn(&ToolArguments) -> Result<ToolPlan, ToolError> + Send + Sync;

#[derive(Clone)]
pub struct FunctionTool {
    name: String,
    description: String,
    schema: ArgumentSchema,
    handler: Arc<PlanHandler>,
}

impl FunctionTool {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ArgumentSchema,
        handler: F,
    ) -> Self
    where
        F: Fn(&ToolArguments) -> Result<ToolPlan, ToolError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            handler: Arc::new(handler),
        }
    }
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> &ArgumentSchema {
        &self.schema
    }

    fn plan(&self, args: &ToolArguments) -> Result<ToolPlan, ToolError> {
        (self.handler)(args)
    }
}
