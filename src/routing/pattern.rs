//! Hostname pattern compilation.
//!
//! # Responsibilities
//! - Turn a literal hostname (with `*` wildcards) into a regex source
//! - Accept pre-built regex sources verbatim
//! - Force start and end anchors
//! - Compile case-insensitively
//!
//! # Design Decisions
//! - Each `*` becomes `([^.]+)`: one capture per wildcard, never crossing a dot
//! - Start and end anchors are checked independently
//! - ASCII-only case folding and classes: compiled as a byte regex with Unicode off
//! - Compiled once at construction, shared read-only afterwards

use regex::bytes::{Regex as BytesRegex, RegexBuilder};
use regex::Regex;
use std::fmt;

use crate::error::{Result, VhostError};

/// Capture group substituted for each `*` in a literal hostname.
const WILDCARD_CAPTURE: &str = "([^.]+)";

/// Characters escaped in a literal hostname before compilation.
const ESCAPED_CHARS: &[char] = &[
    '.', '+', '?', '^', '=', '!', ':', '$', '{', '}', '(', ')', '|', '[', ']', '/', '\\',
];

/// A hostname specification supplied once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostnameSpec {
    /// Literal hostname; `*` matches one dot-free label segment.
    Literal(String),
    /// Regex source used as-is, without anchors or flags.
    Pattern(String),
}

impl HostnameSpec {
    /// Literal hostname, e.g. `"*.example.com"`.
    pub fn literal(hostname: impl Into<String>) -> Self {
        Self::Literal(hostname.into())
    }

    /// Pre-built regex source, e.g. `r"(api|www)\.example\.com"`.
    pub fn pattern(source: impl Into<String>) -> Self {
        Self::Pattern(source.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Literal(s) | Self::Pattern(s) => s.is_empty(),
        }
    }

    /// Regex source before anchoring.
    fn source(&self) -> String {
        match self {
            Self::Literal(hostname) => literal_source(hostname),
            Self::Pattern(source) => source.clone(),
        }
    }
}

impl From<&str> for HostnameSpec {
    fn from(hostname: &str) -> Self {
        Self::literal(hostname)
    }
}

impl From<String> for HostnameSpec {
    fn from(hostname: String) -> Self {
        Self::Literal(hostname)
    }
}

impl From<&Regex> for HostnameSpec {
    fn from(regex: &Regex) -> Self {
        Self::pattern(regex.as_str())
    }
}

/// An anchored, case-insensitive hostname matcher.
#[derive(Debug, Clone)]
pub struct HostPattern {
    regex: BytesRegex,
}

impl HostPattern {
    /// Compile a hostname specification.
    ///
    /// Emptiness is checked by the caller; a source the regex engine rejects
    /// yields [`VhostError::InvalidArgument`].
    pub fn compile(spec: &HostnameSpec) -> Result<Self> {
        let source = anchor(spec.source());

        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .unicode(false)
            .build()
            .map_err(|e| VhostError::InvalidArgument {
                argument: "hostname",
                message: e.to_string(),
            })?;

        Ok(Self { regex })
    }

    /// The anchored regex source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Number of capture groups, excluding the whole match.
    pub fn captures_len(&self) -> usize {
        self.regex.captures_len() - 1
    }

    pub fn is_match(&self, hostname: &str) -> bool {
        self.regex.is_match(hostname.as_bytes())
    }

    pub(crate) fn regex(&self) -> &BytesRegex {
        &self.regex
    }
}

impl fmt::Display for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn literal_source(hostname: &str) -> String {
    let mut source = String::with_capacity(hostname.len() * 2);
    for c in hostname.chars() {
        if c == '*' {
            source.push_str(WILDCARD_CAPTURE);
            continue;
        }
        if ESCAPED_CHARS.contains(&c) {
            source.push('\\');
        }
        source.push(c);
    }
    source
}

fn anchor(mut source: String) -> String {
    if !source.starts_with('^') {
        source.insert(0, '^');
    }
    if !is_end_anchored(&source) {
        source.push('$');
    }
    source
}

/// True when the source ends in a `$` not escaped by an odd backslash run.
fn is_end_anchored(source: &str) -> bool {
    let Some(rest) = source.strip_suffix('$') else {
        return false;
    };
    let backslashes = rest.bytes().rev().take_while(|&b| b == b'\\').count();
    backslashes % 2 == 0
}
