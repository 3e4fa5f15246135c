//! Tenant identity for multi-tenant storage
//!
//! Every tenant-scoped resource lives under an (organization, environment)
//! pair. The pair is validated once when it is constructed, so code deeper
//! in the call chain can rely on both components being usable key segments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Unique identifier for a tenant: an organization and one of its environments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantKey {
    organization: String,
    environment: String,
}

impl TenantKey {
    /// Create a tenant key, rejecting empty components and components that
    /// would break the storage key layout.
    pub fn new(organization: impl Into<String>, environment: impl Into<String>) -> Result<Self> {
        let organization = organization.into();
        let environment = environment.into();
        validate_segment("organization", &organization)?;
        validate_segment("environment", &environment)?;
        Ok(Self {
            organization,
            environment,
        })
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }
}

/// Validate a single identity component used as a storage key segment.
pub fn validate_segment(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidArgument(format!("{} must not be empty", field)));
    }
    if value.contains('/') {
        return Err(Error::InvalidArgument(format!(
            "{} must not contain '/': {}",
            field, value
        )));
    }
    Ok(())
}

impl fmt::Display for TenantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.environment)
    }
}

impl FromStr for TenantKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (organization, environment) = s.split_once('/').ok_or_else(|| {
            Error::InvalidArgument(format!("Invalid tenant format, expected org/env: {}", s))
        })?;
        Self::new(organization, environment)
    }
}
