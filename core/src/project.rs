//! Ways of naming a remote project.
//!
//! Commands accept a project as a bare identifier, as a location returned by
//! create-project, or as a `RefineProject` handle. All of them implement
//! `ProjectId`, and builders keep only the extracted identifier.

use url::Url;

use crate::error::{RefineError, Result};

/// Anything that identifies a project on the server.
pub trait ProjectId {
    fn project_id(&self) -> &str;
}

impl ProjectId for str {
    fn project_id(&self) -> &str {
        self
    }
}

impl ProjectId for String {
    fn project_id(&self) -> &str {
        self
    }
}

impl<T: ProjectId + ?Sized> ProjectId for &T {
    fn project_id(&self) -> &str {
        (**self).project_id()
    }
}

/// The URL of a project together with the identifier it carries in its
/// `project` query parameter.
///
/// Builders accept any location as `&dyn ProjectLocation`.
pub trait ProjectLocation {
    fn id(&self) -> &str;
    fn url(&self) -> &Url;
}

impl ProjectId for dyn ProjectLocation + '_ {
    fn project_id(&self) -> &str {
        self.id()
    }
}

/// Extract the `project` query parameter from a project URL.
pub(crate) fn project_id_from_url(url: &Url) -> Result<String> {
    url.query_pairs()
        .find(|(key, _)| key == "project")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| RefineError::InvalidLocation(format!("no project parameter in {url}")))
}

/// A handle on an existing project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefineProject {
    id: String,
    name: String,
    url: Url,
}

impl RefineProject {
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: Url) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url,
        }
    }

    /// Build a handle from a project URL, taking the identifier from its
    /// `project` query parameter.
    pub fn from_url(name: impl Into<String>, url: Url) -> Result<Self> {
        let id = project_id_from_url(&url)?;
        Ok(Self::new(id, name, url))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ProjectLocation for RefineProject {
    fn id(&self) -> &str {
        &self.id
    }

    fn url(&self) -> &Url {
        &self.url
    }
}

impl ProjectId for RefineProject {
    fn project_id(&self) -> &str {
        &self.id
    }
}
