//! OVH request signatures.

use reqwest::Method;
use sha1::{Digest, Sha1};

use super::types::Credentials;

/// Compute the `X-Ovh-Signature` value for a request.
///
/// The signed payload is `secret+consumer+METHOD+url+body+timestamp`,
/// hashed with SHA-1 and prefixed with `$1$`.
pub(super) fn sign(
    credentials: &Credentials,
    method: &Method,
    target: &str,
    body: &str,
    timestamp: i64,
) -> String {
    let payload = format!(
        "{}+{}+{method}+{target}+{body}+{timestamp}",
        credentials.application_secret.expose(),
        credentials.consumer_key.as_str(),
    );
    format!("$1${}", hex::encode(Sha1::digest(payload.as_bytes())))
}
