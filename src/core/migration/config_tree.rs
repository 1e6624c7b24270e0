// Reader for the hierarchical, human-edited config files other economy plugins
// leave behind (HOCON syntax).
//
// Parsing is done by the `hocon` crate; this module only bounds nesting depth
// and maps the result onto a small tree with exact numeric leaves.

use hocon::{Hocon, HoconLoader};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::{Chars, FromStr};

/// Deepest object/list nesting accepted. Balance files use three levels.
pub const MAX_DEPTH: usize = 64;

// ============================================================================
// TREE
// ============================================================================

/// A node in a parsed document. Object children are ordered by key.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    Object(BTreeMap<String, ConfigNode>),
    List(Vec<ConfigNode>),
    String(String),
    /// Numbers are kept as text so they convert to decimals without float math.
    Number(String),
    Bool(bool),
    Null,
}

impl ConfigNode {
    /// Named children in key order. Empty for anything but an object.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        let entries = match self {
            ConfigNode::Object(map) => Some(map.iter()),
            _ => None,
        };
        entries
            .into_iter()
            .flatten()
            .map(|(key, node)| (key.as_str(), node))
    }

    pub fn child_keys(&self) -> impl Iterator<Item = &str> {
        self.children().map(|(key, _)| key)
    }

    /// The leaf value as a decimal.
    ///
    /// Quoted numbers count too, since hand-edited files are not consistent
    /// about quoting. Returns `None` for objects, lists, booleans, null and
    /// text that is not a number.
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            ConfigNode::Number(text) | ConfigNode::String(text) => parse_decimal(text.trim()),
            _ => None,
        }
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

impl From<Hocon> for ConfigNode {
    fn from(value: Hocon) -> Self {
        match value {
            Hocon::Hash(map) => ConfigNode::Object(
                map.into_iter()
                    .map(|(key, child)| (key, ConfigNode::from(child)))
                    .collect(),
            ),
            Hocon::Array(items) => ConfigNode::List(items.into_iter().map(ConfigNode::from).collect()),
            Hocon::String(text) => ConfigNode::String(text),
            Hocon::Integer(n) => ConfigNode::Number(n.to_string()),
            // Shortest text that reads back as the same f64, so `42.5` stays `42.5`.
            Hocon::Real(n) => ConfigNode::Number(n.to_string()),
            Hocon::Boolean(b) => ConfigNode::Bool(b),
            _ => ConfigNode::Null,
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid HOCON: {0}")]
    Syntax(String),
    #[error("objects and lists nested deeper than {0} levels")]
    TooDeep(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

// ============================================================================
// LOADING
// ============================================================================

/// Load and parse the document at `path`.
pub fn load(path: &Path) -> Result<ConfigNode, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    parse(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a document from text.
pub fn parse(text: &str) -> Result<ConfigNode, ParseError> {
    check_depth(text)?;

    let hocon = HoconLoader::new()
        .load_str(text)
        .and_then(|loader| loader.hocon())
        .map_err(|e| ParseError::Syntax(e.to_string()))?;

    Ok(ConfigNode::from(hocon))
}

/// Reject documents nested deeper than `MAX_DEPTH` before handing them to the
/// recursive parser. Brackets inside quoted strings and comments don't count.
fn check_depth(text: &str) -> Result<(), ParseError> {
    let mut depth = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => skip_quoted(&mut chars),
            '#' => skip_line(&mut chars),
            '/' if chars.peek() == Some(&'/') => skip_line(&mut chars),
            '{' | '[' => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(ParseError::TooDeep(MAX_DEPTH));
                }
            }
            '}' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    Ok(())
}

fn skip_quoted(chars: &mut Peekable<Chars<'_>>) {
    let mut escaped = false;
    for c in chars.by_ref() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => break,
            _ => {}
        }
    }
}

fn skip_line(chars: &mut Peekable<Chars<'_>>) {
    for c in chars.by_ref() {
        if c == '\n' {
            break;
        }
    }
}
