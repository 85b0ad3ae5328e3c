//! Request body encoders: URL-encoded forms and multipart uploads.

use url::form_urlencoded;
use uuid::Uuid;

/// Encode `pairs` as `application/x-www-form-urlencoded` UTF-8 text.
pub fn to_form(pairs: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// A `multipart/form-data` body under construction.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

#[derive(Debug, Clone)]
struct Part {
    name: String,
    filename: Option<String>,
    content_type: String,
    data: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(format!("refine-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Append a text field with an explicit content type.
    pub fn text(mut self, name: &str, value: &str, content_type: &str) -> Self {
        self.parts.push(Part {
            name: name.to_string(),
            filename: None,
            content_type: content_type.to_string(),
            data: value.as_bytes().to_vec(),
        });
        self
    }

    /// Append a binary file field.
    pub fn file(mut self, name: &str, filename: &str, data: Vec<u8>) -> Self {
        self.parts.push(Part {
            name: name.to_string(),
            filename: Some(filename.to_string()),
            content_type: "application/octet-stream".to_string(),
            data,
        });
        self
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Serialize all parts in insertion order.
    pub fn into_bytes(self) -> Vec<u8> {
        let mut out = Vec::new();
        for part in &self.parts {
            out.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            let disposition = match &part.filename {
                Some(filename) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    escape_quoted(&part.name),
                    escape_quoted(filename)
                ),
                None => format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n",
                    escape_quoted(&part.name)
                ),
            };
            out.extend_from_slice(disposition.as_bytes());
            out.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
            out.extend_from_slice(&part.data);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        out
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(['\r', '\n'], " ")
}
