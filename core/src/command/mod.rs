//! One command per remote operation.
//!
//! # Design
//! Each command is built through a validating builder, so a command value
//! always carries complete parameters. A command then splits its work like
//! the rest of the crate: `build_request` produces an `HttpRequest` without
//! I/O, `handle_response` (via `ResponseHandler`) interprets the raw
//! response, and `execute` runs both through a `RefineClient`.

mod apply_operations;
mod create_project;
mod delete_project;
mod get_project_metadata;

pub use apply_operations::{ApplyOperationsCommand, ApplyOperationsCommandBuilder};
pub use create_project::{CreateProjectCommand, CreateProjectCommandBuilder};
pub use delete_project::{DeleteProjectCommand, DeleteProjectCommandBuilder};
pub use get_project_metadata::{GetProjectMetadataCommand, GetProjectMetadataCommandBuilder};

use url::Url;

use crate::body::to_form;
use crate::error::{RefineError, Result};
use crate::http::{HttpMethod, HttpRequest, ACCEPT, APPLICATION_JSON, CONTENT_TYPE, FORM_URLENCODED};

pub(crate) const SC_OK: u16 = 200;
pub(crate) const SC_MOVED_TEMPORARILY: u16 = 302;

pub fn create_project() -> CreateProjectCommandBuilder {
    CreateProjectCommandBuilder::default()
}

pub fn delete_project() -> DeleteProjectCommandBuilder {
    DeleteProjectCommandBuilder::default()
}

pub fn apply_operations() -> ApplyOperationsCommandBuilder {
    ApplyOperationsCommandBuilder::default()
}

pub fn get_project_metadata() -> GetProjectMetadataCommandBuilder {
    GetProjectMetadataCommandBuilder::default()
}

/// Unwrap a required builder field, rejecting absent or empty values.
pub(crate) fn require_non_empty(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        None => Err(RefineError::validation(field, "is required")),
        Some(v) if v.is_empty() => Err(RefineError::validation(field, "must not be empty")),
        Some(v) => Ok(v),
    }
}

pub(crate) fn json_accept_header() -> (String, String) {
    (ACCEPT.to_string(), APPLICATION_JSON.to_string())
}

/// A URL-encoded form POST that expects JSON back.
pub(crate) fn form_post(url: Url, form: &[(&str, &str)]) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Post,
        url: url.into(),
        headers: vec![
            json_accept_header(),
            (CONTENT_TYPE.to_string(), FORM_URLENCODED.to_string()),
        ],
        body: Some(to_form(form).into_bytes()),
    }
}
