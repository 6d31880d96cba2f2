//! Named OVH API endpoints and target URL composition.

use super::OvhError;

/// Known API regions and their base URLs.
const KNOWN_ENDPOINTS: &[(&str, &str)] = &[
    ("ovh-eu", "https://eu.api.ovh.com/1.0"),
    ("ovh-ca", "https://ca.api.ovh.com/1.0"),
    ("ovh-us", "https://api.us.ovhcloud.com/1.0"),
    ("kimsufi-eu", "https://eu.api.kimsufi.com/1.0"),
    ("kimsufi-ca", "https://ca.api.kimsufi.com/1.0"),
    ("soyoustart-eu", "https://eu.api.soyoustart.com/1.0"),
    ("soyoustart-ca", "https://ca.api.soyoustart.com/1.0"),
];

const LEGACY_VERSION_SUFFIX: &str = "/1.0";

/// Base URL of an OVH API region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoint(String);

impl ApiEndpoint {
    /// Resolve a region name (`ovh-eu`) or a base URL.
    ///
    /// Values containing a `/` are taken as URLs; anything else must name
    /// a known region such as `ovh-ca` or `kimsufi-eu`.
    ///
    /// # Errors
    ///
    /// Returns [`OvhError::UnknownEndpoint`] when the name is neither a URL
    /// nor a known region.
    pub fn resolve(name_or_url: &str) -> Result<Self, OvhError> {
        let value = name_or_url.trim();
        if value.contains('/') {
            return Ok(Self(value.trim_end_matches('/').to_string()));
        }
        KNOWN_ENDPOINTS
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, url)| Self((*url).to_string()))
            .ok_or_else(|| OvhError::UnknownEndpoint(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join an API path onto this base.
    ///
    /// `/v1/` and `/v2/` paths replace the legacy `/1.0` suffix instead of
    /// being appended to it.
    #[must_use]
    pub fn target(&self, path: &str) -> String {
        let versioned = path.starts_with("/v1/") || path.starts_with("/v2/");
        match self.0.strip_suffix(LEGACY_VERSION_SUFFIX) {
            Some(root) if versioned => format!("{root}{path}"),
            _ => format!("{}{path}", self.0),
        }
    }
}
