//! Get-project-metadata command.
//!
//! A plain GET; the body is the metadata record itself, with no `code`
//! envelope.

use crate::client::RefineClient;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, ResponseHandler, Transport};
use crate::parser::{interpret, read};
use crate::project::ProjectId;
use crate::response::GetProjectMetadataResponse;
use crate::types::ProjectMetadata;

use super::{json_accept_header, require_non_empty, SC_OK};

/// Fetches a project's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetProjectMetadataCommand {
    project_id: String,
}

impl GetProjectMetadataCommand {
    pub fn builder() -> GetProjectMetadataCommandBuilder {
        GetProjectMetadataCommandBuilder::default()
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn build_request<T: Transport>(&self, client: &RefineClient<T>) -> Result<HttpRequest> {
        let mut url = client.create_url("/command/core/get-project-metadata")?;
        url.query_pairs_mut().append_pair("project", &self.project_id);
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: vec![json_accept_header()],
            body: None,
        })
    }

    /// # Errors
    ///
    /// `RefineError::Connection` when the transport fails,
    /// `RefineError::UnexpectedStatus` or `RefineError::Deserialization`
    /// when the response is not a metadata record.
    pub fn execute<T: Transport>(&self, client: &RefineClient<T>) -> Result<GetProjectMetadataResponse> {
        let request = self.build_request(client)?;
        client.execute(&request, self)
    }

    /// Decode the JSON body of a get-project-metadata response. No `code`
    /// field is consulted.
    pub fn parse_response(body: &str) -> Result<GetProjectMetadataResponse> {
        let metadata: ProjectMetadata = read(body)?;
        Ok(GetProjectMetadataResponse::new(metadata))
    }
}

impl ResponseHandler for GetProjectMetadataCommand {
    type Output = GetProjectMetadataResponse;

    fn handle_response(&self, response: HttpResponse) -> Result<GetProjectMetadataResponse> {
        interpret(response, SC_OK, Self::parse_response)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetProjectMetadataCommandBuilder {
    project_id: Option<String>,
}

impl GetProjectMetadataCommandBuilder {
    /// Set the project from an identifier, a location or a project handle.
    pub fn project(mut self, project: impl ProjectId) -> Self {
        self.project_id = Some(project.project_id().to_string());
        self
    }

    pub fn build(self) -> Result<GetProjectMetadataCommand> {
        Ok(GetProjectMetadataCommand {
            project_id: require_non_empty("project", self.project_id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::{client, response, RecordingTransport};
    use crate::error::RefineError;

    const METADATA: &str = r#"{
        "name": "Addresses",
        "created": "2018-04-14T13:40:35Z",
        "modified": "2018-04-14T13:40:41Z",
        "rowCount": 2,
        "tags": ["people"],
        "customMetadata": {"owner": "ops"}
    }"#;

    fn command() -> GetProjectMetadataCommand {
        GetProjectMetadataCommand::builder().project("1234567890").build().unwrap()
    }

    #[test]
    fn build_requires_project() {
        let err = GetProjectMetadataCommand::builder().build().unwrap_err();
        assert!(matches!(err, RefineError::Validation { field: "project", .. }));
    }

    #[test]
    fn project_taken_from_owned_string() {
        let id = String::from("777");
        let command = GetProjectMetadataCommand::builder().project(id).build().unwrap();
        assert_eq!(command.project_id(), "777");
    }

    #[test]
    fn build_request_uses_query_parameter() {
        let client = client(RecordingTransport::new(200, &[], ""));
        let request = command().build_request(&client).unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url,
            "http://localhost:3333/command/core/get-project-metadata?project=1234567890"
        );
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert!(request.body.is_none());
    }

    #[test]
    fn execute_parses_metadata() {
        let client = client(RecordingTransport::new(200, &[], METADATA));
        let result = command().execute(&client).unwrap();
        let metadata = result.metadata();
        assert_eq!(metadata.name, "Addresses");
        assert_eq!(metadata.row_count, Some(2));
        assert_eq!(metadata.tags, vec!["people".to_string()]);
        assert_eq!(metadata.custom_metadata["owner"], "ops");
    }

    #[test]
    fn code_bodies_are_not_metadata() {
        let err = command()
            .handle_response(response(200, r#"{"code":"error","message":"no such project"}"#))
            .unwrap_err();
        assert!(matches!(err, RefineError::Deserialization(_)));
    }

    #[test]
    fn status_checked_before_body() {
        let err = command().handle_response(response(404, METADATA)).unwrap_err();
        assert!(matches!(
            err,
            RefineError::UnexpectedStatus {
                expected: 200,
                actual: 404
            }
        ));
    }
}
