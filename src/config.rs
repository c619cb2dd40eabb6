// Copyright 2025 Cowboy AI, LLC.

//! Configuration for composition

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::{MixinError, MixinResult};

/// Options controlling which operations a composition discovers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComposeOptions {
    /// Operations attached directly to a constituent instance whose name
    /// starts with this prefix are treated as private and not discovered
    pub reserved_prefix: String,
    /// Names never discovered, wherever they are declared
    pub excluded_names: Vec<String>,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            reserved_prefix: "_".to_string(),
            excluded_names: vec!["constructor".to_string()],
        }
    }
}

impl ComposeOptions {
    /// Parse and validate options from JSON
    pub fn from_json_str(json: &str) -> MixinResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check that the options are usable
    ///
    /// An empty prefix would mark every name as private.
    pub fn validate(&self) -> MixinResult<()> {
        if self.reserved_prefix.is_empty() {
            return Err(MixinError::InvalidOptions(
                "reserved_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// JSON Schema describing these options
    pub fn json_schema() -> MixinResult<serde_json::Value> {
        Ok(serde_json::to_value(schemars::schema_for!(ComposeOptions))?)
    }

    pub(crate) fn is_excluded(&self, name: &str) -> bool {
        self.excluded_names.iter().any(|n| n == name)
    }

    pub(crate) fn hides_attached(&self, name: &str) -> bool {
        name.starts_with(&self.reserved_prefix) || self.is_excluded(name)
    }
}
