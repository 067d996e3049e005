//! JSON:API error objects and client/server classification.
//!
//! Every failure surfaced by the engine is an [`ApiError`]: a title, an
//! optional detail/code/about link, and a classification used to choose the
//! aggregate response status. Any server-class error in a batch outranks
//! all client-class errors.

use serde::{Deserialize, Serialize};

/// Whether a failure is the client's fault or the server's
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Client,
    Server,
}

impl ErrorClass {
    /// The HTTP-style status this class maps to on its own
    pub fn status(&self) -> u16 {
        match self {
            ErrorClass::Client => 400,
            ErrorClass::Server => 500,
        }
    }
}

/// A single failure, carrying its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub title: String,
    pub detail: Option<String>,
    pub code: Option<String>,
    pub about: Option<String>,
    pub class: ErrorClass,
}

impl ApiError {
    pub fn new(title: impl Into<String>, class: ErrorClass) -> Self {
        Self {
            title: title.into(),
            detail: None,
            code: None,
            about: None,
            class,
        }
    }

    /// Create a client-classified error
    pub fn client(title: impl Into<String>) -> Self {
        Self::new(title, ErrorClass::Client)
    }

    /// Create a server-classified error
    pub fn server(title: impl Into<String>) -> Self {
        Self::new(title, ErrorClass::Server)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Convert to the wire error object
    pub fn to_error_object(&self) -> ErrorObject {
        ErrorObject {
            status: Some(self.class.status().to_string()),
            code: self.code.clone(),
            title: Some(self.title.clone()),
            detail: self.detail.clone(),
            links: self.about.clone().map(|about| AboutLink { about }),
        }
    }
}

/// The status for a batch of failures: any server error forces 500
pub fn response_status(errors: &[ApiError]) -> u16 {
    if errors.iter().any(|e| e.class == ErrorClass::Server) {
        ErrorClass::Server.status()
    } else {
        ErrorClass::Client.status()
    }
}

/// Wire shape of one entry in a document's `errors` array
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<AboutLink>,
}

/// `links.about` on an error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutLink {
    pub about: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aggregate_status() {
        let client = ApiError::client("bad filter");
        let server = ApiError::server("missing descriptor");

        assert_eq!(response_status(&[client.clone()]), 400);
        assert_eq!(response_status(&[client.clone(), client.clone()]), 400);
        assert_eq!(response_status(&[client, server]), 500);
    }

    #[test]
    fn test_error_object_serialization() {
        let error = ApiError::client("Invalid page size")
            .with_detail("requested 50, maximum is 20")
            .with_code("page-size-exceeded");
        assert_eq!(
            serde_json::to_value(error.to_error_object()).unwrap(),
            json!({
                "status": "400",
                "code": "page-size-exceeded",
                "title": "Invalid page size",
                "detail": "requested 50, maximum is 20"
            })
        );
    }
}
