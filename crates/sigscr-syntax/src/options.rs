use serde::{Deserialize, Serialize};
use serde_json::json;
use sigscr_core::Diagnostic;
use std::fs;
use std::path::Path;

pub const PARSE_OPTIONS_SCHEMA: &str = "sigscr-syntax/0.1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParseOptions {
    #[serde(default = "default_options_schema")]
    pub schema: String,
    /// Added to every reported line number.
    #[serde(default)]
    pub line_offset: usize,
    /// Turns unrecognized operators into a fatal error instead of a warning.
    #[serde(default)]
    pub strict_operators: bool,
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            schema: default_options_schema(),
            line_offset: 0,
            strict_operators: false,
            max_depth: None,
        }
    }
}

/// Encoding of an options document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsFormat {
    Json,
    Yaml,
}

impl OptionsFormat {
    /// `.json`, `.yaml` and `.yml`; anything else is not an options file.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("read parse options failed `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse options file `{path}` must end in .json, .yaml or .yml")]
    UnsupportedFormat { path: String },
    #[error("parse options decode failed: {0}")]
    Parse(String),
    #[error("parse options validation failed: {0:?}")]
    Validation(Vec<Diagnostic>),
}

pub fn load_parse_options(path: &Path) -> Result<ParseOptions, OptionsError> {
    let Some(format) = OptionsFormat::from_path(path) else {
        return Err(OptionsError::UnsupportedFormat {
            path: path.display().to_string(),
        });
    };
    let raw = fs::read_to_string(path).map_err(|source| OptionsError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    parse_options_str(&raw, format)
}

/// Decodes and validates options held in memory, e.g. next to a route's
/// script file in a bundled archive.
pub fn parse_options_str(raw: &str, format: OptionsFormat) -> Result<ParseOptions, OptionsError> {
    let options: ParseOptions = match format {
        OptionsFormat::Json => serde_json::from_str(raw)
            .map_err(|error| OptionsError::Parse(format!("json: {error}")))?,
        OptionsFormat::Yaml => serde_yaml::from_str(raw)
            .map_err(|error| OptionsError::Parse(format!("yaml: {error}")))?,
    };

    let mut diagnostics = validate_parse_options(&options);
    if diagnostics.is_empty() {
        return Ok(options);
    }
    Diagnostic::sort_stable(&mut diagnostics);
    Err(OptionsError::Validation(diagnostics))
}

/// Diagnostics here are not tied to a script line and always carry line 0.
pub fn validate_parse_options(options: &ParseOptions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if options.schema != PARSE_OPTIONS_SCHEMA {
        diagnostics.push(
            Diagnostic::error(
                "sigscr.options.schema",
                0,
                format!(
                    "unsupported parse options schema `{}` (expected `{}`)",
                    options.schema, PARSE_OPTIONS_SCHEMA
                ),
            )
            .with_reference("schema"),
        );
    }
    if options.max_depth == Some(0) {
        diagnostics.push(
            Diagnostic::error("sigscr.options.max_depth", 0, "max_depth must be > 0")
                .with_reference("max_depth")
                .with_related(json!({ "max_depth": 0 })),
        );
    }
    diagnostics
}

fn default_options_schema() -> String {
    PARSE_OPTIONS_SCHEMA.to_string()
}

#[cfg(test)]
#[path = "options_test.rs"]
mod tests;
