//! Format string parsing
//!
//! A format string mixes literal text with placeholders such as
//! `(%level)`. [`TokenParser`] compiles it once into a [`CompiledFormat`],
//! an ordered list of text and token nodes that formatters walk for every
//! entry.
//!
//! ```
//! use rust_token_logger::core::{FormatNode, FormatToken, TokenParser};
//!
//! let compiled = TokenParser::default().compile("[(%level)] (%message)");
//! assert_eq!(compiled.nodes()[1], FormatNode::Token(FormatToken::Level));
//! ```

use super::error::{LoggerError, Result};
use super::style::StyledText;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Delimiter pattern for `(%name)` placeholders
pub const DEFAULT_TOKEN_PATTERN: &str = r"\(%(?P<name>\w+)\)";

/// Placeholders recognized in a format string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatToken {
    /// Creation time of the entry
    Date,
    /// Display string of the level
    Level,
    Category,
    Message,
    /// Full source path
    File,
    /// Last component of the source path
    #[serde(rename = "filename")]
    FileName,
    Line,
    Function,
    /// `entry` or `start`
    Type,
}

impl FormatToken {
    pub const ALL: [FormatToken; 9] = [
        FormatToken::Date,
        FormatToken::Level,
        FormatToken::Category,
        FormatToken::Message,
        FormatToken::File,
        FormatToken::FileName,
        FormatToken::Line,
        FormatToken::Function,
        FormatToken::Type,
    ];

    /// The name written between the delimiters
    pub fn name(&self) -> &'static str {
        match self {
            FormatToken::Date => "date",
            FormatToken::Level => "level",
            FormatToken::Category => "category",
            FormatToken::Message => "message",
            FormatToken::File => "file",
            FormatToken::FileName => "filename",
            FormatToken::Line => "line",
            FormatToken::Function => "function",
            FormatToken::Type => "type",
        }
    }
}

impl fmt::Display for FormatToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(%{})", self.name())
    }
}

impl FromStr for FormatToken {
    type Err = String;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        FormatToken::ALL
            .iter()
            .copied()
            .find(|token| token.name() == name)
            .ok_or_else(|| format!("Unknown format token: '{}'", name))
    }
}

/// One piece of a compiled format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatNode {
    Text(StyledText),
    Token(FormatToken),
}

/// A parsed format string, immutable and reusable across entries
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledFormat {
    nodes: Vec<FormatNode>,
}

impl CompiledFormat {
    pub fn nodes(&self) -> &[FormatNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = FormatToken> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            FormatNode::Token(token) => Some(*token),
            FormatNode::Text(_) => None,
        })
    }
}

/// Compiles format strings into [`CompiledFormat`]s.
///
/// The delimiter pattern is a regular expression with a capture group
/// called `name`. Matches are taken leftmost first and never overlap.
#[derive(Debug, Clone)]
pub struct TokenParser {
    pattern: Regex,
}

impl TokenParser {
    /// Use a custom delimiter, e.g. `%(?P<name>\w+)%` for `%level%`.
    ///
    /// Fails when the pattern does not compile or has no `name` group.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)?;
        if !pattern.capture_names().any(|name| name == Some("name")) {
            return Err(LoggerError::config(
                "TokenParser",
                format!("pattern '{}' has no capture group named 'name'", pattern.as_str()),
            ));
        }
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn compile(&self, format: &str) -> CompiledFormat {
        self.compile_styled(&StyledText::plain(format))
    }

    /// Compile a styled format string; literal runs keep their styles
    pub fn compile_styled(&self, format: &StyledText) -> CompiledFormat {
        let plain = format.to_plain();
        let mut nodes = Vec::new();
        let mut cursor = 0;

        for captures in self.pattern.captures_iter(&plain) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if whole.is_empty() {
                continue;
            }
            if cursor < whole.start() {
                nodes.push(FormatNode::Text(format.slice(cursor..whole.start())));
            }
            cursor = whole.end();

            let token = captures
                .name("name")
                .and_then(|name| name.as_str().parse::<FormatToken>().ok());
            match token {
                Some(token) => nodes.push(FormatNode::Token(token)),
                None => nodes.push(FormatNode::Text(StyledText::plain(whole.as_str()))),
            }
        }

        if cursor < plain.len() {
            nodes.push(FormatNode::Text(format.slice(cursor..plain.len())));
        }

        CompiledFormat { nodes }
    }
}

impl Default for TokenParser {
    fn default() -> Self {
        static DEFAULT_PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = DEFAULT_PATTERN
            .get_or_init(|| Regex::new(DEFAULT_TOKEN_PATTERN).expect("default token pattern compiles"))
            .clone();
        Self { pattern }
    }
}
