//! CLI command implementations

pub mod replay;
pub mod tree;
pub mod validate;

use anyhow::Result;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Toml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "toml" => Ok(OutputFormat::Toml),
            _ => Err(format!(
                "unknown format '{}'; valid values: text, json, toml",
                s
            )),
        }
    }
}

/// Serialize a report as JSON or TOML. Text output is command-specific.
pub fn format_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Toml => Ok(toml::to_string_pretty(value)?),
        OutputFormat::Text => anyhow::bail!("text output has no structured form"),
    }
}
