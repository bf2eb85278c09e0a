//! Tool catalog: typed metadata and input schemas for the calling protocol.
//!
//! Owns tool *metadata* only. Execution lives in [`crate::gateway`].

use crate::gateway::Capability;
use serde_json::{Map, Value};
use std::collections::HashMap;

// =============================================================================
// Parameter types
// =============================================================================

/// Parameter type for tool inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    String,
    Optional(Box<ParamType>),
}

impl ParamType {
    /// JSON Schema fragment for this type.
    pub fn json_schema(&self) -> Value {
        match self {
            ParamType::String => serde_json::json!({ "type": "string" }),
            ParamType::Optional(inner) => {
                let mut schema = inner.json_schema();
                if let Some(ty) = schema.get_mut("type") {
                    *ty = serde_json::json!([ty.clone(), "null"]);
                }
                schema
            }
        }
    }
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single parameter definition for a tool.
#[derive(Debug, Clone)]
pub struct ParamDef {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
}

impl ParamDef {
    pub fn required(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type: ParamType::String,
            description: description.to_string(),
        }
    }

    pub fn optional(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type: ParamType::Optional(Box::new(ParamType::String)),
            description: description.to_string(),
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self.param_type, ParamType::Optional(_))
    }
}

// =============================================================================
// Tool entry
// =============================================================================

/// Complete tool metadata entry.
#[derive(Debug, Clone)]
pub struct ToolEntry {
    pub id: String,
    pub description: String,
    pub parameters: Vec<ParamDef>,
}

impl ToolEntry {
    /// Metadata for one capability's tool.
    pub fn for_capability(capability: Capability) -> Self {
        let target = capability.target_param();
        let target_description = match capability {
            Capability::PhoneValidation => "The phone number to validate and verify.",
            Capability::EmailVerification => "The email address to validate.",
            Capability::EmailReputation => "The email address to analyze for reputation.",
        };

        let mut parameters = vec![ParamDef::required(target, target_description)];
        for name in capability.optional_params() {
            let description = match *name {
                "country" => {
                    "ISO 3166-1 alpha-2 code of the number's country (e.g. \"US\"), \
                     used when the number lacks a country prefix."
                }
                _ => "",
            };
            parameters.push(ParamDef::optional(name, description));
        }

        Self {
            id: capability.tool_name().to_string(),
            description: capability.description().to_string(),
            parameters,
        }
    }

    /// JSON Schema describing the tool's arguments.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            let mut schema = param.param_type.json_schema();
            if let Some(map) = schema.as_object_mut() {
                map.insert(
                    "description".to_string(),
                    Value::String(param.description.clone()),
                );
            }
            properties.insert(param.name.clone(), schema);
            if param.is_required() {
                required.push(Value::String(param.name.clone()));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

// =============================================================================
// Tool catalog
// =============================================================================

/// In-memory tool catalog. Owns metadata, not implementations.
#[derive(Debug)]
pub struct ToolCatalog {
    entries: HashMap<String, ToolEntry>,
}

impl ToolCatalog {
    /// Catalog of every capability's tool.
    pub fn for_capabilities() -> Self {
        let entries = Capability::ALL
            .into_iter()
            .map(|c| (c.tool_name().to_string(), ToolEntry::for_capability(c)))
            .collect();
        Self { entries }
    }

    /// Get a tool entry by id.
    pub fn get(&self, tool_id: &str) -> Option<&ToolEntry> {
        self.entries.get(tool_id)
    }

    /// List all tool entries, sorted by id.
    pub fn list_entries(&self) -> Vec<&ToolEntry> {
        let mut entries: Vec<&ToolEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalog_has_three_tools() {
        let catalog = ToolCatalog::for_capabilities();
        let ids: Vec<&str> = catalog.list_entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["check_email_reputation", "validate_phone", "verify_email"]);
    }

    #[test]
    fn test_get_by_tool_name() {
        let catalog = ToolCatalog::for_capabilities();
        assert_eq!(catalog.get("check_email_reputation").unwrap().parameters[0].name, "email");
        assert!(catalog.get("lookup_ip").is_none());
    }

    #[test]
    fn test_phone_schema() {
        let entry = ToolEntry::for_capability(Capability::PhoneValidation);
        let schema = entry.input_schema();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], serde_json::json!(["phone"]));
        assert_eq!(schema["properties"]["phone"]["type"], "string");
        assert_eq!(
            schema["properties"]["country"]["type"],
            serde_json::json!(["string", "null"])
        );
    }

    #[test]
    fn test_email_schema_has_single_required_param() {
        let entry = ToolEntry::for_capability(Capability::EmailVerification);
        let schema = entry.input_schema();
        assert_eq!(schema["required"], serde_json::json!(["email"]));
        assert_eq!(schema["properties"].as_object().unwrap().len(), 1);
    }
}
