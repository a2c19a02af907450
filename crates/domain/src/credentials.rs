//! Authenticated session context
//!
//! A [`Credentials`] value carries everything an authenticated call needs:
//! the control-plane endpoint, the bearer token from login, and the project
//! scope. It is an immutable value object; operations take it by reference and
//! never mutate it, so read-only sharing across concurrent callers is safe.

use std::fmt;

/// Endpoint, bearer token and project scope for control-plane calls
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    endpoint: String,
    token: String,
    project_id: String,
}

impl Credentials {
    /// Build credentials without a project scope yet
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            project_id: String::new(),
        }
    }

    /// A new credentials value scoped to another project.
    ///
    /// Credentials are never mutated in place; switching projects builds a
    /// fresh instance so existing holders keep their scope.
    pub fn with_project(&self, project_id: impl Into<String>) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            token: self.token.clone(),
            project_id: project_id.into(),
        }
    }

    /// Control-plane base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Bearer token from login
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Project scope; empty until a project is selected
    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

// Token stays out of debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("project_id", &self.project_id)
            .finish()
    }
}
