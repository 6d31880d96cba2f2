//! The `client_request` data source.
//!
//! Issues a signed `GET` against an arbitrary OVH API path and exposes the
//! raw status code, body and `X-Ovh-QueryID` header as flat state. The
//! authenticated client is handed to every read rather than stored, so the
//! data source itself carries no state between calls.

mod error;
mod model;
mod read;
mod schema;

use log::warn;
use tokio_util::sync::CancellationToken;

use crate::diagnostics::Diagnostics;
use crate::ovh::OvhClient;

pub use self::error::{ClientRequestError, ReadWarning};
pub use self::model::{ClientRequestConfig, RequestResult};
pub use self::read::{Read, execute};
pub use self::schema::{Attribute, AttributeType, Schema};

const TYPE_NAME_SUFFIX: &str = "_client_request";

/// State and diagnostics returned to the host after a read.
///
/// `state` is `Some` exactly when no error diagnostic was recorded.
#[derive(Debug, Clone, Default)]
pub struct ReadResponse {
    pub state: Option<RequestResult>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClientRequestDataSource;

impl ClientRequestDataSource {
    /// Full type name under a provider, e.g. `ovh_client_request`.
    #[must_use]
    pub fn type_name(&self, provider_type_name: &str) -> String {
        format!("{provider_type_name}{TYPE_NAME_SUFFIX}")
    }

    #[must_use]
    pub fn schema(&self) -> Schema {
        schema::client_request_schema()
    }

    /// Run one read and fold its outcome into state plus diagnostics.
    pub async fn read(
        &self,
        client: &OvhClient,
        config: &ClientRequestConfig,
        cancel: &CancellationToken,
    ) -> ReadResponse {
        let mut diagnostics = Diagnostics::new();
        match execute(client, config, cancel).await {
            Ok(Read { result, warnings }) => {
                for warning in warnings {
                    diagnostics.add_warning(warning.summary(), warning.detail());
                }
                ReadResponse {
                    state: Some(result),
                    diagnostics,
                }
            }
            Err(err) => {
                warn!("client request to {} failed: {err}", config.endpoint);
                diagnostics.add_error(err.summary(), err.detail());
                ReadResponse {
                    state: None,
                    diagnostics,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientRequestConfig, ClientRequestDataSource};
    use crate::ovh::{ApiEndpoint, Credentials, DEFAULT_TIMEOUT, OvhClient};
    use tokio_util::sync::CancellationToken;

    #[test]
    fn type_name_appends_suffix() {
        assert_eq!(ClientRequestDataSource.type_name("ovh"), "ovh_client_request");
    }

    #[tokio::test]
    async fn cancelled_read_records_a_single_error() {
        let endpoint = ApiEndpoint::resolve("ovh-eu").expect("resolve endpoint");
        let client = OvhClient::new(endpoint, Credentials::anonymous(), DEFAULT_TIMEOUT)
            .expect("create client");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let resp = ClientRequestDataSource
            .read(&client, &ClientRequestConfig::new("/auth/details"), &cancel)
            .await;

        assert!(resp.state.is_none());
        assert!(resp.diagnostics.has_error());
        assert_eq!(resp.diagnostics.len(), 1);
        let diag = resp.diagnostics.iter().next().expect("diagnostic");
        assert_eq!(diag.summary, "Failed to make request");
    }
}
