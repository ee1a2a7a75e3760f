//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Check every vhost has one usable, compilable hostname spec
//! - Detect duplicate site names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: VhostConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::VhostConfig;
use crate::routing::HostPattern;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &VhostConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("invalid socket address '{}'", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let mut names = HashSet::new();
    for (i, site) in config.vhosts.iter().enumerate() {
        let field = format!("vhosts[{}]", i);

        if site.name.is_empty() {
            errors.push(ValidationError::new(format!("{}.name", field), "is required"));
        } else if !names.insert(site.name.as_str()) {
            errors.push(ValidationError::new(
                format!("{}.name", field),
                format!("duplicate site name '{}'", site.name),
            ));
        }

        let spec = match site.spec() {
            Ok(spec) => spec,
            Err(_) => {
                errors.push(ValidationError::new(
                    field,
                    "exactly one of 'hostname' or 'pattern' must be set",
                ));
                continue;
            }
        };

        if spec.is_empty() {
            errors.push(ValidationError::new(field, "hostname must not be empty"));
            continue;
        }

        if let Err(e) = HostPattern::compile(&spec) {
            errors.push(ValidationError::new(field, e.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
