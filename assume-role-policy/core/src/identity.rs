//! Canonical IAM role identities.

use std::{fmt, hash};

/// A role in canonical form.
///
/// Identities compare by ARN alone: `readonly` and `arn:aws:iam::111:role/readonly` resolve to
/// equal identities when the resolver's base ARN is `arn:aws:iam::111:role/`.
#[derive(Clone, Debug)]
pub struct Identity {
    name: String,
    arn: String,
}

/// Converts role strings into canonical identities.
///
/// Resolution must be a pure function of its input.
pub trait ResolveIdentity: Send + Sync {
    fn resolve(&self, role: &str) -> Result<Identity, ResolveError>;
}

/// Resolves short role names against a base ARN and parses fully-qualified role ARNs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArnResolver {
    prefix: String,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("role name is empty")]
    Empty,

    #[error("invalid role ARN '{0}'")]
    InvalidArn(String),

    #[error("invalid base ARN '{0}'")]
    InvalidBaseArn(String),
}

const ARN_PREFIX: &str = "arn:";

// === impl Identity ===

impl Identity {
    pub fn new(name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arn: arn.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arn(&self) -> &str {
        &self.arn
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.arn == other.arn
    }
}

impl Eq for Identity {}

impl hash::Hash for Identity {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.arn.hash(state)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.arn.fmt(f)
    }
}

// === impl ArnResolver ===

impl ArnResolver {
    /// Creates a resolver that qualifies short names with `base_arn`, e.g.
    /// `arn:aws:iam::111111111111:role/`. A missing trailing `/` is added.
    pub fn new(base_arn: impl Into<String>) -> Result<Self, ResolveError> {
        let mut prefix = base_arn.into();
        if !prefix.starts_with(ARN_PREFIX) {
            return Err(ResolveError::InvalidBaseArn(prefix));
        }
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        Ok(Self { prefix })
    }

    pub fn base_arn(&self) -> &str {
        &self.prefix
    }
}

impl ResolveIdentity for ArnResolver {
    fn resolve(&self, role: &str) -> Result<Identity, ResolveError> {
        if role.starts_with(ARN_PREFIX) {
            return parse_arn(role);
        }

        let name = role.trim_start_matches('/');
        if name.is_empty() {
            return Err(ResolveError::Empty);
        }
        Ok(Identity::new(name, format!("{}{}", self.prefix, name)))
    }
}

/// Parses `arn:<partition>:iam::<account>:role/<path/name>`.
fn parse_arn(arn: &str) -> Result<Identity, ResolveError> {
    let invalid = || ResolveError::InvalidArn(arn.to_string());

    let parts = arn.splitn(6, ':').collect::<Vec<_>>();
    let (partition, service, region, account, resource) = match parts.as_slice() {
        [_, partition, service, region, account, resource] => {
            (*partition, *service, *region, *account, *resource)
        }
        _ => return Err(invalid()),
    };

    // IAM is a global service, so role ARNs never carry a region.
    if partition.is_empty() || service != "iam" || !region.is_empty() {
        return Err(invalid());
    }
    if account.is_empty() || !account.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let name = resource.strip_prefix("role/").ok_or_else(invalid)?;
    if name.is_empty() || name.ends_with('/') {
        return Err(invalid());
    }

    Ok(Identity::new(name, arn))
}
