//! Tool calling: a closed set of locally runnable tools and the registry
//! that dispatches model-requested calls onto them.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use raglab_core::error::{Error, Result};

/// Every tool the model may call. One variant per tool; adding a tool means
/// adding a variant plus its `name`/`spec`/`invoke` arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    CurrentTime,
    Weather,
}

/// Function declaration advertised to the completion service.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::CurrentTime, ToolKind::Weather];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::CurrentTime => "getCurrentTime",
            ToolKind::Weather => "getWeather",
        }
    }

    pub fn spec(self) -> ToolSpec {
        match self {
            ToolKind::CurrentTime => ToolSpec {
                name: self.name(),
                description: "Get the current date and time (UTC)",
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {},
                }),
            },
            ToolKind::Weather => ToolSpec {
                name: self.name(),
                description: "Get the weather of a city",
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "city": { "type": "string" },
                    },
                    "required": ["city"],
                }),
            },
        }
    }

    /// Run the tool locally with the model-supplied arguments.
    pub fn invoke(self, arguments: &Value) -> Result<String> {
        match self {
            ToolKind::CurrentTime => {
                Ok(chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string())
            }
            ToolKind::Weather => {
                let city = arguments
                    .get("city")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        Error::InvalidConfig("getWeather requires a 'city' argument".to_string())
                    })?;
                // Canned report until a weather API is wired in.
                Ok(format!("The weather in {city} is sunny with 25°C."))
            }
        }
    }
}

/// Name -> tool mapping, validated at construction so a bad table fails at
/// startup instead of at call time.
#[derive(Debug)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, ToolKind>,
}

impl ToolRegistry {
    pub fn new(kinds: &[ToolKind]) -> Result<Self> {
        let mut tools = BTreeMap::new();
        for kind in kinds {
            if tools.insert(kind.name(), *kind).is_some() {
                return Err(Error::InvalidConfig(format!(
                    "duplicate tool name: {}",
                    kind.name()
                )));
            }
        }
        Ok(Self { tools })
    }

    /// Registry holding every supported tool.
    pub fn builtin() -> Result<Self> {
        Self::new(&ToolKind::ALL)
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|kind| kind.spec()).collect()
    }

    /// Dispatch a model-requested call. An unregistered name is
    /// `UnknownTool`; the caller decides how to surface it.
    pub fn dispatch(&self, name: &str, arguments: &Value) -> Result<String> {
        let kind = self
            .tools
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;
        kind.invoke(arguments)
    }
}
