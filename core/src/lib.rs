//! Command client for a data-wrangling server's HTTP command API.
//!
//! # Overview
//! Each remote operation (create project, delete project, apply operations,
//! get project metadata) is a command value. A command builds its
//! `HttpRequest` without I/O, a caller-supplied `Transport` performs the
//! exchange, and the command interprets the `HttpResponse` into a typed
//! result or a `RefineError`.
//!
//! # Design
//! - Commands are built through validating builders and are immutable
//!   afterwards, so they can be shared freely.
//! - Response interpretation always checks the status code before the body.
//! - `"code": "error"` answers are values in the response types, not errors.
//! - The core performs no network I/O of its own and reads no environment.
//!
//! ```no_run
//! use refine_core::{command, HttpRequest, HttpResponse, RefineClient, Transport};
//!
//! struct MyTransport;
//!
//! impl Transport for MyTransport {
//!     fn send(&self, _request: &HttpRequest) -> refine_core::Result<HttpResponse> {
//!         unimplemented!()
//!     }
//! }
//!
//! # fn main() -> refine_core::Result<()> {
//! let client = RefineClient::new("http://localhost:3333", MyTransport)?;
//! let response = command::delete_project().project("1234567890").build()?.execute(&client)?;
//! println!("{:?}", response.code());
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod client;
pub mod command;
pub mod error;
pub mod http;
pub mod operation;
mod parser;
pub mod project;
pub mod response;
pub mod types;
pub mod upload;

pub use client::RefineClient;
pub use command::{
    ApplyOperationsCommand, CreateProjectCommand, DeleteProjectCommand, GetProjectMetadataCommand,
};
pub use error::{RefineError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, ResponseHandler, Transport};
pub use operation::{JsonOperation, Operation};
pub use project::{ProjectId, ProjectLocation, RefineProject};
pub use response::{
    ApplyOperationsResponse, CreateProjectResponse, DeleteProjectResponse,
    GetProjectMetadataResponse, ResponseCode,
};
pub use types::ProjectMetadata;
pub use upload::{SeparatorOptions, UploadFormat, UploadOptions};
