//! Source locations carried by every projected IR node.
//!
//! Locations come straight from the external parse tree; nothing here reads
//! source text. A missing position yields the sentinel location rather than
//! an error, so diagnostics must tolerate `line == 0`.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// File marker used by the sentinel location.
pub const SENTINEL_FILE: &str = "<ERROR>";

/// Line, column and file name of a construct in the original text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
    pub file: String,
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::sentinel()
    }
}

impl SourceLocation {
    pub fn new(line: u32, column: u32, file: impl Into<String>) -> Self {
        SourceLocation {
            line,
            column,
            file: file.into(),
        }
    }

    /// Location used when the syntax node or its position metadata is absent.
    pub fn sentinel() -> Self {
        SourceLocation::new(0, 0, SENTINEL_FILE)
    }

    pub fn is_sentinel(&self) -> bool {
        self.line == 0 && self.column == 0 && self.file == SENTINEL_FILE
    }

    /// Location of an optional position, falling back to the sentinel.
    pub fn from_coord(coord: Option<&SourceLocation>) -> Self {
        coord.cloned().unwrap_or_else(Self::sentinel)
    }

    /// Parse a pycparser coord string: `file:line` or `file:line:column`.
    ///
    /// The file part may itself contain ':' (Windows drive letters), so the
    /// numeric fields are taken from the right.
    pub fn parse_coord(text: &str) -> Option<Self> {
        let mut parts = text.rsplitn(3, ':');
        let last = parts.next()?;
        let middle = parts.next()?;
        match parts.next() {
            Some(file) => match (middle.parse::<u32>(), last.parse::<u32>()) {
                (Ok(line), Ok(column)) => Some(SourceLocation::new(line, column, file)),
                // "C:/dir/a.c:7" splits as ["7", "/dir/a.c", "C"]
                (Err(_), Ok(line)) => Some(SourceLocation::new(line, 0, format!("{}:{}", file, middle))),
                _ => None,
            },
            None => {
                let line = last.parse::<u32>().ok()?;
                Some(SourceLocation::new(line, 0, middle))
            }
        }
    }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.column == 0 {
            write!(f, "{}:{}", self.file, self.line)
        } else {
            write!(f, "{}:{}:{}", self.file, self.line, self.column)
        }
    }
}
