use crate::error::StorageError;
use std::borrow::Cow;

/// Structural prefix separating this application's keys from other tenants of the store.
pub const STORAGE_PREFIX: &str = "storage_";
/// Domain prefix grouping environment metadata keys.
pub const EKARA_PREFIX: &str = "ekara_";

/// Key namespace policy shared by every [`Storage`](crate::Storage) implementation.
///
/// Keys live in three layers:
/// - **physical**: what the backing engine sees, `<structural><key>`;
/// - **caller**: what handlers and HTTP clients see, the physical key minus the structural prefix;
/// - **field**: a caller key minus the domain prefix, e.g. `environment_location`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPolicy {
    structural: Cow<'static, str>,
    domain: Cow<'static, str>,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self { structural: Cow::Borrowed(STORAGE_PREFIX), domain: Cow::Borrowed(EKARA_PREFIX) }
    }
}

impl KeyPolicy {
    /// Builds a policy with custom prefixes.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] if a prefix is empty or contains anything
    /// other than ASCII alphanumerics and underscores.
    pub fn new(
        structural: impl Into<Cow<'static, str>>,
        domain: impl Into<Cow<'static, str>>,
    ) -> Result<Self, StorageError> {
        let structural = validate_prefix(structural.into())?;
        let domain = validate_prefix(domain.into())?;
        Ok(Self { structural, domain })
    }

    #[must_use]
    pub fn structural(&self) -> &str {
        &self.structural
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Physical key of a domain field: structural + domain + suffix.
    #[must_use]
    pub fn add_prefix(&self, suffix: &str) -> String {
        format!("{}{}{suffix}", self.structural, self.domain)
    }

    /// Caller-visible key of a domain field: domain + suffix.
    #[must_use]
    pub fn environment_key(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.domain)
    }

    /// Removes the domain prefix when the key starts with it, otherwise returns the key untouched.
    ///
    /// Only a match at position 0 counts. `"x_ekara_y"` comes back unchanged; this is not a
    /// namespace parser.
    #[must_use]
    pub fn strip_prefix<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(self.domain.as_ref()).unwrap_or(key)
    }

    /// Maps a caller key to the physical key stored in the backing engine.
    #[must_use]
    pub fn qualify(&self, key: &str) -> String {
        format!("{}{key}", self.structural)
    }

    /// Maps a physical key back to the caller key, or `None` if it belongs to another namespace.
    #[must_use]
    pub fn unqualify<'a>(&self, physical: &'a str) -> Option<&'a str> {
        physical.strip_prefix(self.structural.as_ref())
    }

    /// Rejects keys the HTTP surface cannot address.
    pub(crate) fn check_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey {
                message: "EMPTY".into(),
                context: Some("Key cannot be empty".into()),
            });
        }
        Ok(())
    }
}

fn validate_prefix(prefix: Cow<'static, str>) -> Result<Cow<'static, str>, StorageError> {
    if prefix.is_empty() {
        return Err(StorageError::InvalidKey {
            message: "EMPTY".into(),
            context: Some("Prefix cannot be empty".into()),
        });
    }

    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StorageError::InvalidKey {
            message: prefix.into_owned().into(),
            context: Some("Prefix contains illegal characters".into()),
        });
    }

    Ok(prefix)
}
