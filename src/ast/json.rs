//! Loader for syntax trees serialized in pycparser's `c_json` layout.
//!
//! Every object carries a `_nodetype` tag and a `coord` string
//! (`file:line[:column]`, or `null`). Kinds the projector does not know about
//! are kept as [`SyntaxKind::Unlisted`] so projection can report them.

use log::debug;
use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize;
use serde_json::Value;

use super::nodes::{SyntaxKind, SyntaxNode};
use crate::source::SourceLocation;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid syntax-tree JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl<'de> Deserialize<'de> for SyntaxNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let tag = value
            .get("_nodetype")
            .and_then(Value::as_str)
            .ok_or_else(|| D::Error::missing_field("_nodetype"))?
            .to_string();
        let coord = value
            .get("coord")
            .and_then(Value::as_str)
            .and_then(SourceLocation::parse_coord);

        let kind = if SyntaxKind::KNOWN_KINDS.contains(&tag.as_str()) {
            serde_json::from_value(value).map_err(|e| D::Error::custom(format!("{}: {}", tag, e)))?
        } else {
            debug!("unlisted syntax kind '{}'", tag);
            SyntaxKind::Unlisted { kind: tag }
        };

        Ok(SyntaxNode { kind, coord })
    }
}

/// Parse one syntax tree from JSON text.
pub fn load_c_json(text: &str) -> Result<SyntaxNode, LoadError> {
    Ok(serde_json::from_str(text)?)
}

/// Read and parse a syntax tree from a file.
pub fn load_c_json_file(path: &std::path::Path) -> Result<SyntaxNode, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_c_json(&text)
}
