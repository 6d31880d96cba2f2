//! Request execution for the `client_request` data source.

use log::debug;
use reqwest::Method;
use serde::de::IgnoredAny;
use tokio_util::sync::CancellationToken;

use super::error::{ClientRequestError, ReadWarning};
use super::model::{ClientRequestConfig, RequestResult};
use crate::ovh::{OvhClient, OvhError, QUERY_ID_HEADER};

/// Maximum number of characters of a body kept in debug logs.
const BODY_SNIPPET_LEN: usize = 500;

/// A successful read and the advisory warnings it raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read {
    pub result: RequestResult,
    pub warnings: Vec<ReadWarning>,
}

/// Perform a signed `GET` on `config.endpoint` and map the raw response.
///
/// Every status code is a normal result. A body that is not JSON adds
/// [`ReadWarning::BodyFormat`] but is still returned as-is.
///
/// # Errors
///
/// Returns [`ClientRequestError::RequestConstruction`] when the client
/// rejects the endpoint, [`ClientRequestError::RequestExecution`] on
/// transport failure or cancellation, and [`ClientRequestError::BodyRead`]
/// when the body stream breaks. A token cancelled before the call fails
/// with `RequestExecution` whatever the endpoint.
pub async fn execute(
    client: &OvhClient,
    config: &ClientRequestConfig,
    cancel: &CancellationToken,
) -> Result<Read, ClientRequestError> {
    if cancel.is_cancelled() {
        return Err(ClientRequestError::RequestExecution(OvhError::Cancelled));
    }
    let endpoint = config.endpoint.as_str();
    debug!("will make request to {endpoint} endpoint");

    let request = client
        .new_request(Method::GET, endpoint, None, true, cancel)
        .await
        .map_err(|e| match e {
            OvhError::Cancelled => ClientRequestError::RequestExecution(e),
            other => ClientRequestError::RequestConstruction(other),
        })?;
    let response = client
        .execute(request, cancel)
        .await
        .map_err(ClientRequestError::RequestExecution)?;

    let status_code = i64::from(response.status());
    let query_id = response
        .header(QUERY_ID_HEADER)
        .unwrap_or_default()
        .to_string();
    let body = response.bytes(cancel).await.map_err(|e| match e {
        OvhError::Cancelled => ClientRequestError::RequestExecution(e),
        other => ClientRequestError::BodyRead(other),
    })?;

    let mut warnings = Vec::new();
    if !is_json(&body) {
        warnings.push(ReadWarning::BodyFormat);
    }
    let response_body = String::from_utf8_lossy(&body).into_owned();
    debug!(
        "{endpoint} answered {status_code} (query id '{query_id}'): {}",
        snippet(&response_body, BODY_SNIPPET_LEN)
    );

    Ok(Read {
        result: RequestResult {
            endpoint: endpoint.to_string(),
            response_body,
            status_code,
            query_id,
        },
        warnings,
    })
}

/// Whether `body` is well-formed JSON, without building a value tree.
fn is_json(body: &[u8]) -> bool {
    serde_json::from_slice::<IgnoredAny>(body).is_ok()
}

/// Trim `text` to `max` characters, appending `...` when truncated.
fn snippet(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out = text.chars().take(max).collect::<String>();
        out.push_str("...");
        out
    }
}
