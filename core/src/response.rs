//! Typed outcomes of the four commands.
//!
//! # Design
//! Application-level failures (`"code": "error"`) are variants here rather
//! than `RefineError`s, so callers branch on the value they get back. Codes
//! the server might send but a command does not know never reach these
//! types; they are rejected as `RefineError::UnexpectedCode` while decoding.

use url::Url;

use crate::error::Result;
use crate::project::{project_id_from_url, ProjectId, ProjectLocation};
use crate::types::ProjectMetadata;

/// The server's application-level status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    Ok,
    Pending,
    Error,
}

impl ResponseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::Ok => "ok",
            ResponseCode::Pending => "pending",
            ResponseCode::Error => "error",
        }
    }
}

/// Outcome of apply-operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOperationsResponse {
    Ok,
    /// The server queued the operations; the project has to be polled.
    Pending,
    Error { message: String },
}

impl ApplyOperationsResponse {
    pub fn code(&self) -> ResponseCode {
        match self {
            ApplyOperationsResponse::Ok => ResponseCode::Ok,
            ApplyOperationsResponse::Pending => ResponseCode::Pending,
            ApplyOperationsResponse::Error { .. } => ResponseCode::Error,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ApplyOperationsResponse::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// Outcome of delete-project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteProjectResponse {
    Ok,
    Error { message: String },
}

impl DeleteProjectResponse {
    pub fn code(&self) -> ResponseCode {
        match self {
            DeleteProjectResponse::Ok => ResponseCode::Ok,
            DeleteProjectResponse::Error { .. } => ResponseCode::Error,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            DeleteProjectResponse::Error { message } => Some(message),
            DeleteProjectResponse::Ok => None,
        }
    }
}

/// Outcome of create-project: where the new project lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectResponse {
    id: String,
    url: Url,
}

impl CreateProjectResponse {
    /// Wrap the redirect target, deriving the project identifier from its
    /// `project` query parameter.
    pub fn new(url: Url) -> Result<Self> {
        let id = project_id_from_url(&url)?;
        Ok(Self { id, url })
    }
}

impl ProjectLocation for CreateProjectResponse {
    fn id(&self) -> &str {
        &self.id
    }

    fn url(&self) -> &Url {
        &self.url
    }
}

impl ProjectId for CreateProjectResponse {
    fn project_id(&self) -> &str {
        &self.id
    }
}

/// Outcome of get-project-metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct GetProjectMetadataResponse {
    metadata: ProjectMetadata,
}

impl GetProjectMetadataResponse {
    pub fn new(metadata: ProjectMetadata) -> Self {
        Self { metadata }
    }

    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }

    pub fn into_metadata(self) -> ProjectMetadata {
        self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RefineError;

    #[test]
    fn apply_operations_codes_and_messages() {
        assert_eq!(ApplyOperationsResponse::Ok.code(), ResponseCode::Ok);
        assert_eq!(ApplyOperationsResponse::Pending.code(), ResponseCode::Pending);
        assert_eq!(ApplyOperationsResponse::Pending.message(), None);
        let error = ApplyOperationsResponse::Error {
            message: "boom".to_string(),
        };
        assert_eq!(error.code(), ResponseCode::Error);
        assert_eq!(error.message(), Some("boom"));
    }

    #[test]
    fn delete_project_codes_and_messages() {
        assert_eq!(DeleteProjectResponse::Ok.code().as_str(), "ok");
        assert_eq!(DeleteProjectResponse::Ok.message(), None);
        let error = DeleteProjectResponse::Error {
            message: "no such project".to_string(),
        };
        assert_eq!(error.code().as_str(), "error");
        assert_eq!(error.message(), Some("no such project"));
    }

    #[test]
    fn create_project_response_derives_id() {
        let url = Url::parse("http://host/project?project=123").unwrap();
        let response = CreateProjectResponse::new(url.clone()).unwrap();
        assert_eq!(response.id(), "123");
        assert_eq!(response.url(), &url);
        assert_eq!(response.project_id(), "123");
    }

    #[test]
    fn create_project_response_requires_project_parameter() {
        let url = Url::parse("http://host/").unwrap();
        assert!(matches!(
            CreateProjectResponse::new(url),
            Err(RefineError::InvalidLocation(_))
        ));
    }
}
