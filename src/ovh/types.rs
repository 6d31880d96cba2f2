//! Credential types used by the OVH client.

use std::fmt;

/// An OVH application key, sent as `X-Ovh-Application`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationKey(String);

impl ApplicationKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ApplicationKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An OVH application secret. Only ever used as signature input.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApplicationSecret(String);

impl ApplicationSecret {
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApplicationSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApplicationSecret(<redacted>)")
    }
}

impl From<&str> for ApplicationSecret {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An OVH consumer key, sent as `X-Ovh-Consumer` on signed requests.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConsumerKey(String);

impl ConsumerKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConsumerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConsumerKey(<redacted>)")
    }
}

impl From<&str> for ConsumerKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Application credentials for signed requests.
///
/// Requests are only signed when an application key is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub application_key: ApplicationKey,
    pub application_secret: ApplicationSecret,
    pub consumer_key: ConsumerKey,
}

impl Credentials {
    pub fn new(
        application_key: impl Into<ApplicationKey>,
        application_secret: impl Into<ApplicationSecret>,
        consumer_key: impl Into<ConsumerKey>,
    ) -> Self {
        Self {
            application_key: application_key.into(),
            application_secret: application_secret.into(),
            consumer_key: consumer_key.into(),
        }
    }

    /// Credentials that never sign, for public calls such as `/auth/time`.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn can_sign(&self) -> bool {
        !self.application_key.is_empty()
    }
}
