//! Apply-operations command.
//!
//! # Design
//! Operations are rendered once, when the command is built, and kept as
//! `JsonOperation` text. The form's `operations` field is that text joined
//! into one JSON array, so the server sees each fragment unchanged. The
//! reply is `ok`, `pending` for long-running operations, or `error`.

use crate::client::RefineClient;
use crate::error::{RefineError, Result};
use crate::http::{HttpRequest, HttpResponse, ResponseHandler, Transport};
use crate::operation::{operations_json_array, JsonOperation, Operation};
use crate::parser::{find_existing_text, interpret, parse_json};
use crate::project::ProjectId;
use crate::response::ApplyOperationsResponse;

use super::{form_post, require_non_empty, SC_OK};

/// Applies a list of operations, in order, to a project.
///
/// Operations are rendered to JSON when the command is built and sent as
/// one array in the `operations` form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOperationsCommand {
    project_id: String,
    operations: Vec<JsonOperation>,
}

impl ApplyOperationsCommand {
    pub fn builder() -> ApplyOperationsCommandBuilder {
        ApplyOperationsCommandBuilder::default()
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn operations(&self) -> &[JsonOperation] {
        &self.operations
    }

    /// The `operations` form field: the rendered operations joined with
    /// commas inside brackets.
    pub fn operations_json(&self) -> String {
        operations_json_array(&self.operations)
    }

    pub fn build_request<T: Transport>(&self, client: &RefineClient<T>) -> Result<HttpRequest> {
        let url = client.create_url("/command/core/apply-operations")?;
        let operations = self.operations_json();
        Ok(form_post(
            url,
            &[
                ("project", self.project_id.as_str()),
                ("operations", operations.as_str()),
            ],
        ))
    }

    /// # Errors
    ///
    /// `RefineError::Connection` when the transport fails, a protocol error
    /// when the response is not understood.
    pub fn execute<T: Transport>(&self, client: &RefineClient<T>) -> Result<ApplyOperationsResponse> {
        let request = self.build_request(client)?;
        client.execute(&request, self)
    }

    /// Decode the JSON body of an apply-operations response.
    pub fn parse_response(body: &str) -> Result<ApplyOperationsResponse> {
        let node = parse_json(body)?;
        let code = find_existing_text(&node, "code")?;
        match code.as_str() {
            "ok" => Ok(ApplyOperationsResponse::Ok),
            "pending" => Ok(ApplyOperationsResponse::Pending),
            "error" => {
                let message = find_existing_text(&node, "message")?;
                tracing::info!(%message, "server rejected operations");
                Ok(ApplyOperationsResponse::Error { message })
            }
            _ => Err(RefineError::UnexpectedCode(code)),
        }
    }
}

impl ResponseHandler for ApplyOperationsCommand {
    type Output = ApplyOperationsResponse;

    fn handle_response(&self, response: HttpResponse) -> Result<ApplyOperationsResponse> {
        interpret(response, SC_OK, Self::parse_response)
    }
}

#[derive(Default)]
pub struct ApplyOperationsCommandBuilder {
    project_id: Option<String>,
    operations: Vec<Box<dyn Operation>>,
}

impl ApplyOperationsCommandBuilder {
    /// Set the project from an identifier, a location or a project handle.
    pub fn project(mut self, project: impl ProjectId) -> Self {
        self.project_id = Some(project.project_id().to_string());
        self
    }

    /// Append one operation.
    pub fn operation(mut self, operation: impl Operation + 'static) -> Self {
        self.operations.push(Box::new(operation));
        self
    }

    /// Append operations, keeping their order.
    pub fn operations<I, O>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Operation + 'static,
    {
        for operation in operations {
            self.operations.push(Box::new(operation));
        }
        self
    }

    /// # Errors
    ///
    /// `RefineError::Validation` when the project is missing or empty, when
    /// no operation was given, or when an operation renders as blank text or
    /// as JSON `null`.
    pub fn build(self) -> Result<ApplyOperationsCommand> {
        let project_id = require_non_empty("project", self.project_id)?;
        if self.operations.is_empty() {
            return Err(RefineError::validation("operations", "must not be empty"));
        }
        let operations = self
            .operations
            .iter()
            .map(|operation| {
                let json = operation.to_json();
                if json.trim().is_empty() {
                    Err(RefineError::validation("operations", "contains a blank operation"))
                } else if json.trim() == "null" {
                    Err(RefineError::validation("operations", "contains a null operation"))
                } else {
                    Ok(JsonOperation::new(json))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ApplyOperationsCommand {
            project_id,
            operations,
        })
    }
}
