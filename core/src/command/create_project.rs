//! Create-project-from-upload command.
//!
//! # Design
//! The upload is a multipart form carrying the file, the project name, and
//! optionally the importer format and options. Options also travel in the
//! `options` query parameter. The server answers with a redirect whose
//! `Location` names the new project; the id is taken from its `project`
//! query parameter.

use std::path::{Path, PathBuf};

use url::Url;

use crate::body::{to_form, MultipartForm};
use crate::client::RefineClient;
use crate::error::{RefineError, Result};
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, ResponseHandler, Transport, CONTENT_TYPE, LOCATION,
};
use crate::parser::assure_status_code;
use crate::project::ProjectLocation;
use crate::response::CreateProjectResponse;
use crate::upload::{UploadFormat, UploadOptions};

use super::{json_accept_header, require_non_empty, SC_MOVED_TEMPORARILY};

const TEXT_PLAIN_UTF8: &str = "text/plain; charset=UTF-8";
const APPLICATION_JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Creates a project by uploading a file.
///
/// The server answers with a redirect to the new project; the `Location`
/// header is the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectCommand {
    name: String,
    file: PathBuf,
    format: Option<UploadFormat>,
    options: Option<String>,
}

impl CreateProjectCommand {
    pub fn builder() -> CreateProjectCommandBuilder {
        CreateProjectCommandBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn format(&self) -> Option<UploadFormat> {
        self.format
    }

    /// The rendered upload options, if any.
    pub fn options(&self) -> Option<&str> {
        self.options.as_deref()
    }

    /// Read the upload file and assemble the multipart request.
    ///
    /// When options are set they are sent twice: as the `options` part and
    /// as an `options` query parameter. The server ignores the form field
    /// but honors the query parameter.
    pub fn build_request<T: Transport>(&self, client: &RefineClient<T>) -> Result<HttpRequest> {
        let url = match &self.options {
            Some(options) => client.create_url(&format!(
                "/command/core/create-project-from-upload?{}",
                to_form(&[("options", options.as_str())])
            ))?,
            None => client.create_url("/command/core/create-project-from-upload")?,
        };

        let mut form = MultipartForm::new();
        if let Some(format) = self.format {
            form = form.text("format", format.value(), TEXT_PLAIN_UTF8);
        }
        if let Some(options) = &self.options {
            form = form.text("options", options, APPLICATION_JSON_UTF8);
        }
        let data = std::fs::read(&self.file)?;
        let filename = self
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let form = form
            .file("project-file", &filename, data)
            .text("project-name", &self.name, TEXT_PLAIN_UTF8);

        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![
                json_accept_header(),
                (CONTENT_TYPE.to_string(), form.content_type()),
            ],
            body: Some(form.into_bytes()),
        })
    }

    /// # Errors
    ///
    /// `RefineError::Io` when the file cannot be read,
    /// `RefineError::Connection` when the transport fails, a protocol error
    /// when the response is not a redirect to a project.
    pub fn execute<T: Transport>(&self, client: &RefineClient<T>) -> Result<CreateProjectResponse> {
        let request = self.build_request(client)?;
        client.execute(&request, self)
    }
}

impl ResponseHandler for CreateProjectCommand {
    type Output = CreateProjectResponse;

    fn handle_response(&self, response: HttpResponse) -> Result<CreateProjectResponse> {
        // Import failures come back as a 200 HTML page, which the status
        // check turns into a protocol error.
        assure_status_code(&response, SC_MOVED_TEMPORARILY)?;
        let location = response
            .header(LOCATION)
            .ok_or(RefineError::MissingHeader(LOCATION))?;
        let url = Url::parse(location)
            .map_err(|e| RefineError::InvalidLocation(format!("{location}: {e}")))?;
        let created = CreateProjectResponse::new(url)?;
        tracing::debug!(project = %created.url(), "project created");
        Ok(created)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateProjectCommandBuilder {
    name: Option<String>,
    file: Option<PathBuf>,
    format: Option<UploadFormat>,
    options: Option<String>,
}

impl CreateProjectCommandBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The file whose content is uploaded.
    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn format(mut self, format: UploadFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn options(mut self, options: &dyn UploadOptions) -> Self {
        self.options = Some(options.to_json());
        self
    }

    /// # Errors
    ///
    /// `RefineError::Validation` when the name is missing or empty, or the
    /// file is missing or not a regular file.
    pub fn build(self) -> Result<CreateProjectCommand> {
        let name = require_non_empty("name", self.name)?;
        let file = self
            .file
            .ok_or_else(|| RefineError::validation("file", "is required"))?;
        if !file.is_file() {
            return Err(RefineError::validation(
                "file",
                format!("{} is not a readable file", file.display()),
            ));
        }
        Ok(CreateProjectCommand {
            name,
            file,
            format: self.format,
            options: self.options,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::command::testing::{client, response, RecordingTransport};
    use crate::upload::SeparatorOptions;
    use serde_json::json;
    use tempfile::NamedTempFile;

    fn csv_file() -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"name,city\nAda,London\n").unwrap();
        file
    }

    fn redirect(location: Option<&str>) -> HttpResponse {
        HttpResponse {
            status: 302,
            headers: location
                .map(|l| vec![("Location".to_string(), l.to_string())])
                .unwrap_or_default(),
            body: String::new(),
        }
    }

    #[test]
    fn build_requires_name() {
        let file = csv_file();
        let err = CreateProjectCommand::builder().file(file.path()).build().unwrap_err();
        assert!(matches!(err, RefineError::Validation { field: "name", .. }));
    }

    #[test]
    fn build_rejects_empty_name() {
        let file = csv_file();
        let err = CreateProjectCommand::builder()
            .name("")
            .file(file.path())
            .build()
            .unwrap_err();
        assert!(matches!(err, RefineError::Validation { field: "name", .. }));
    }

    #[test]
    fn build_requires_file() {
        let err = CreateProjectCommand::builder().name("p").build().unwrap_err();
        assert!(matches!(err, RefineError::Validation { field: "file", .. }));
    }

    #[test]
    fn build_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CreateProjectCommand::builder()
            .name("p")
            .file(dir.path().join("absent.csv"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RefineError::Validation { field: "file", .. }));
    }

    #[test]
    fn request_without_options_has_plain_url() {
        let file = csv_file();
        let command = CreateProjectCommand::builder()
            .name("Addresses")
            .file(file.path())
            .build()
            .unwrap();
        let client = client(RecordingTransport::new(302, &[], ""));
        let request = command.build_request(&client).unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.url,
            "http://localhost:3333/command/core/create-project-from-upload"
        );
        let content_type = request.header("Content-Type").unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));

        let body = String::from_utf8(request.body.unwrap()).unwrap();
        assert!(!body.contains("name=\"format\""));
        assert!(!body.contains("name=\"options\""));
        assert!(body.contains("name=\"project-file\"; filename=\""));
        assert!(body.contains("name,city\nAda,London\n"));
        assert!(body.contains("name=\"project-name\"\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\nAddresses\r\n"));
    }

    #[test]
    fn options_are_sent_as_part_and_query_parameter() {
        let file = csv_file();
        let options = SeparatorOptions {
            separator: Some(",".to_string()),
            header_lines: Some(1),
            ..Default::default()
        };
        let command = CreateProjectCommand::builder()
            .name("Addresses")
            .file(file.path())
            .format(UploadFormat::SeparatorBased)
            .options(&options)
            .build()
            .unwrap();
        let client = client(RecordingTransport::new(302, &[], ""));
        let request = command.build_request(&client).unwrap();

        let url = Url::parse(&request.url).unwrap();
        assert_eq!(url.path(), "/command/core/create-project-from-upload");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            query,
            vec![("options".to_string(), r#"{"separator":",","headerLines":1}"#.to_string())]
        );

        let body = String::from_utf8(request.body.unwrap()).unwrap();
        assert!(body.contains("name=\"format\"\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\ntext/line-based/*sv\r\n"));
        assert!(body.contains(
            "name=\"options\"\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{\"separator\":\",\",\"headerLines\":1}\r\n"
        ));
    }

    #[test]
    fn parts_keep_their_order() {
        let file = csv_file();
        let command = CreateProjectCommand::builder()
            .name("p")
            .file(file.path())
            .format(UploadFormat::Json)
            .options(&json!({}))
            .build()
            .unwrap();
        let client = client(RecordingTransport::new(302, &[], ""));
        let body = String::from_utf8(command.build_request(&client).unwrap().body.unwrap()).unwrap();
        let positions: Vec<usize> = ["\"format\"", "\"options\"", "\"project-file\"", "\"project-name\""]
            .iter()
            .map(|name| body.find(name).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn unreadable_file_surfaces_as_io_error() {
        let file = csv_file();
        let path = file.path().to_path_buf();
        let command = CreateProjectCommand::builder().name("p").file(&path).build().unwrap();
        drop(file);
        let client = client(RecordingTransport::new(302, &[], ""));
        let err = command.build_request(&client).unwrap_err();
        assert!(matches!(err, RefineError::Io(_)));
    }

    #[test]
    fn redirect_yields_location_and_id() {
        let file = csv_file();
        let command = CreateProjectCommand::builder().name("p").file(file.path()).build().unwrap();
        let created = command
            .handle_response(redirect(Some("http://host/project?project=123")))
            .unwrap();
        assert_eq!(created.url().as_str(), "http://host/project?project=123");
        assert_eq!(created.id(), "123");
    }

    #[test]
    fn redirect_without_location_fails() {
        let file = csv_file();
        let command = CreateProjectCommand::builder().name("p").file(file.path()).build().unwrap();
        let err = command.handle_response(redirect(None)).unwrap_err();
        assert!(matches!(err, RefineError::MissingHeader("Location")));
        assert_eq!(err.to_string(), "no Location header found");
    }

    #[test]
    fn other_status_names_302() {
        let file = csv_file();
        let command = CreateProjectCommand::builder().name("p").file(file.path()).build().unwrap();
        let err = command
            .handle_response(response(200, "<html>import failed</html>"))
            .unwrap_err();
        assert!(matches!(
            err,
            RefineError::UnexpectedStatus {
                expected: 302,
                actual: 200
            }
        ));
    }

    #[test]
    fn execute_through_transport() {
        let file = csv_file();
        let command = CreateProjectCommand::builder().name("p").file(file.path()).build().unwrap();
        let client = client(RecordingTransport::new(
            302,
            &[("location", "http://localhost:3333/project?project=2049")],
            "",
        ));
        let created = command.execute(&client).unwrap();
        assert_eq!(created.id(), "2049");
        let sent = client.transport().sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].url.ends_with("/command/core/create-project-from-upload"));
    }
}
