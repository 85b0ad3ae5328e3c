//! HTTP types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. Commands build an `HttpRequest`
//! without touching the network; a `Transport` supplied by the caller
//! performs the exchange and returns an `HttpResponse`, which is then handed
//! back to the command's `ResponseHandler`. Timeouts, TLS, pooling and retries
//! all belong to the transport.

use crate::error::Result;

pub const ACCEPT: &str = "Accept";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const LOCATION: &str = "Location";

pub const APPLICATION_JSON: &str = "application/json";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries any query string. The body is raw
/// bytes since multipart uploads embed binary file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// The body has already been read in full by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Turns a raw response into the typed outcome of one command.
pub trait ResponseHandler {
    type Output;

    fn handle_response(&self, response: HttpResponse) -> Result<Self::Output>;
}

/// Performs the network exchange for a prepared request.
///
/// Implementations must not follow redirects: create-project answers with a
/// 302 whose `Location` header is the result. Non-2xx statuses must be
/// returned as responses, not errors. A failure to complete the exchange is
/// reported as `RefineError::Connection`.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;

    /// Send `request` and hand the response to `handler`.
    fn execute<H>(&self, request: &HttpRequest, handler: &H) -> Result<H::Output>
    where
        H: ResponseHandler + ?Sized,
    {
        let response = self.send(request)?;
        handler.handle_response(response)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 302,
            headers: vec![("location".to_string(), "http://host/project?project=1".to_string())],
            body: String::new(),
        };
        assert_eq!(response.header("Location"), Some("http://host/project?project=1"));
        assert_eq!(response.header("LOCATION"), Some("http://host/project?project=1"));
        assert_eq!(response.header("Content-Type"), None);
    }

    #[test]
    fn first_header_wins() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost:3333/".to_string(),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("accept".to_string(), "text/html".to_string()),
            ],
            body: None,
        };
        assert_eq!(request.header("accept"), Some("application/json"));
    }

    #[test]
    fn method_names() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
    }
}
