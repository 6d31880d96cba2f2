//! Generic authenticated requests against the OVH API.
//!
//! The [`data_source`] module maps one signed `GET` into a flat result
//! record plus diagnostics; [`ovh`] is the authenticated client it is handed
//! on every read.

pub mod cli_args;
pub mod config;
pub mod data_source;
pub mod diagnostics;
pub mod environment;
pub mod ovh;
pub mod test_utils;

pub use data_source::{
    ClientRequestConfig, ClientRequestDataSource, ClientRequestError, ReadResponse,
    ReadWarning, RequestResult,
};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use ovh::{ApiEndpoint, Credentials, OvhClient, OvhError};
