//! Attribute schema of the `client_request` data source.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Int64,
}

/// One attribute: either supplied by the user or computed by a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub computed: bool,
}

impl Attribute {
    const fn required(kind: AttributeType, description: &'static str) -> Self {
        Self {
            kind,
            description,
            required: true,
            computed: false,
        }
    }

    const fn computed(kind: AttributeType, description: &'static str) -> Self {
        Self {
            kind,
            description,
            required: false,
            computed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}

pub(super) fn client_request_schema() -> Schema {
    let attributes = BTreeMap::from([
        (
            "endpoint",
            Attribute::required(AttributeType::String, "OVH API endpoint for the request"),
        ),
        (
            "response_body",
            Attribute::computed(
                AttributeType::String,
                "The API response body returned as a string",
            ),
        ),
        (
            "status_code",
            Attribute::computed(AttributeType::Int64, "The HTTP response status code"),
        ),
        (
            "query_id",
            Attribute::computed(
                AttributeType::String,
                "X-Ovh-QueryID value from the response header",
            ),
        ),
    ]);
    Schema { attributes }
}
