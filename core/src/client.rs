//! The server handle commands execute against.
//!
//! # Design
//! `RefineClient` holds the server's base URL and the caller's transport and
//! carries no other state. Commands ask it for absolute URLs through
//! `create_url` and hand it prepared requests through `execute`.

use url::Url;

use crate::error::{RefineError, Result};
use crate::http::{HttpRequest, ResponseHandler, Transport};

#[derive(Debug, Clone)]
pub struct RefineClient<T> {
    base_url: Url,
    transport: T,
}

impl<T: Transport> RefineClient<T> {
    /// Create a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `RefineError::Config` unless `base_url` is an absolute
    /// `http` or `https` URL.
    pub fn new(base_url: &str, transport: T) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| RefineError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(RefineError::Config(format!(
                "base URL must use http or https, got: {}",
                base_url.scheme()
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        base_url.set_query(None);
        base_url.set_fragment(None);
        Ok(Self { base_url, transport })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve a command path such as `/command/core/delete-project` against
    /// the base URL. A leading slash is ignored so that a base path prefix
    /// (e.g. `http://host/refine/`) is kept.
    pub fn create_url(&self, path: &str) -> Result<Url> {
        let relative = path.trim_start_matches('/');
        self.base_url
            .join(relative)
            .map_err(|e| RefineError::Config(format!("cannot resolve {path:?}: {e}")))
    }

    /// Send `request` through the transport and interpret the response with
    /// `handler`.
    pub fn execute<H>(&self, request: &HttpRequest, handler: &H) -> Result<H::Output>
    where
        H: ResponseHandler + ?Sized,
    {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending command");
        self.transport.execute(request, handler)
    }
}
