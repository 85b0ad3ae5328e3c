//! Delete-project command: a form POST answered with `ok` or `error`.

use crate::client::RefineClient;
use crate::error::{RefineError, Result};
use crate::http::{HttpRequest, HttpResponse, ResponseHandler, Transport};
use crate::parser::{find_existing_text, interpret, parse_json};
use crate::project::ProjectId;
use crate::response::DeleteProjectResponse;

use super::{form_post, require_non_empty, SC_OK};

/// Deletes a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteProjectCommand {
    project_id: String,
}

impl DeleteProjectCommand {
    pub fn builder() -> DeleteProjectCommandBuilder {
        DeleteProjectCommandBuilder::default()
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn build_request<T: Transport>(&self, client: &RefineClient<T>) -> Result<HttpRequest> {
        let url = client.create_url("/command/core/delete-project")?;
        Ok(form_post(url, &[("project", self.project_id.as_str())]))
    }

    /// # Errors
    ///
    /// `RefineError::Connection` when the transport fails, a protocol error
    /// when the response is not understood.
    pub fn execute<T: Transport>(&self, client: &RefineClient<T>) -> Result<DeleteProjectResponse> {
        let request = self.build_request(client)?;
        client.execute(&request, self)
    }

    /// Decode the JSON body of a delete-project response.
    pub fn parse_response(body: &str) -> Result<DeleteProjectResponse> {
        let node = parse_json(body)?;
        let code = find_existing_text(&node, "code")?;
        match code.as_str() {
            "ok" => Ok(DeleteProjectResponse::Ok),
            "error" => {
                let message = find_existing_text(&node, "message")?;
                tracing::info!(%message, "server refused to delete project");
                Ok(DeleteProjectResponse::Error { message })
            }
            _ => Err(RefineError::UnexpectedCode(code)),
        }
    }
}

impl ResponseHandler for DeleteProjectCommand {
    type Output = DeleteProjectResponse;

    fn handle_response(&self, response: HttpResponse) -> Result<DeleteProjectResponse> {
        interpret(response, SC_OK, Self::parse_response)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteProjectCommandBuilder {
    project_id: Option<String>,
}

impl DeleteProjectCommandBuilder {
    /// Set the project from an identifier, a location or a project handle.
    pub fn project(mut self, project: impl ProjectId) -> Self {
        self.project_id = Some(project.project_id().to_string());
        self
    }

    pub fn build(self) -> Result<DeleteProjectCommand> {
        Ok(DeleteProjectCommand {
            project_id: require_non_empty("project", self.project_id)?,
        })
    }
}
