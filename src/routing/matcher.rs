//! Per-request host matching.
//!
//! # Responsibilities
//! - Extract the hostname from the Host header (IPv6 brackets, port)
//! - Run the compiled pattern once against it
//! - Build the `VhostData` annotation on match
//!
//! # Design Decisions
//! - Never fails: a missing or unreadable Host header is a non-match
//! - Groups that did not participate keep their index as `None`

use axum::http::{header, HeaderMap};
use serde::Serialize;

use crate::routing::pattern::HostPattern;

/// Match data attached to a request whose host matched a vhost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VhostData {
    host: String,
    hostname: String,
    captures: Vec<Option<String>>,
}

impl VhostData {
    /// Raw Host header value.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Host header value without port.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Number of capture groups in the pattern.
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    /// Capture `index`, or `None` if out of range or the group did not participate.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.captures.get(index).and_then(|c| c.as_deref())
    }

    pub fn captures(&self) -> &[Option<String>] {
        &self.captures
    }
}

/// Strip the port from a Host header value.
///
/// A leading `[` marks an IPv6 literal; the port search starts after the
/// closing `]`. Returns `None` for an empty result.
pub fn hostname_of(host: &str) -> Option<&str> {
    let offset = if host.starts_with('[') {
        host.find(']').map(|i| i + 1).unwrap_or(0)
    } else {
        0
    };

    let hostname = match host[offset..].find(':') {
        Some(i) => &host[..offset + i],
        None => host,
    };

    if hostname.is_empty() {
        None
    } else {
        Some(hostname)
    }
}

/// Match a raw Host header value against a compiled pattern.
pub fn match_host(host: &str, pattern: &HostPattern) -> Option<VhostData> {
    let hostname = hostname_of(host)?;
    let caps = pattern.regex().captures(hostname.as_bytes())?;

    let captures = caps
        .iter()
        .skip(1)
        .map(|m| m.map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned()))
        .collect();

    Some(VhostData {
        host: host.to_string(),
        hostname: hostname.to_string(),
        captures,
    })
}

/// Match the Host header of a request against a compiled pattern.
pub fn vhost_of(headers: &HeaderMap, pattern: &HostPattern) -> Option<VhostData> {
    let host = headers.get(header::HOST)?.to_str().ok()?;
    match_host(host, pattern)
}
