//! Error types for collaborator fetches.
//!
//! Every failure of a geo search, popularity lookup or preview request is a
//! [`FetchError`]. The core never retries; `retryable` is informational for
//! callers that want to.

use std::fmt;

/// Result type for collaborator operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Structured context for fetch errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "geosearch", "pageviews")
    pub operation: Option<String>,
    /// The entity type involved (e.g., "page", "image")
    pub entity: Option<String>,
    /// The entity ID if applicable
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
    /// Whether this error is retryable
    pub retryable: bool,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for collaborator fetches
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Upstream unreachable: DNS, TLS, connect or read failures.
    #[error("Connection error: {message} {context}")]
    Connection {
        message: String,
        context: ErrorContext,
    },

    /// Upstream answered with a non-success HTTP status.
    #[error("HTTP status {status}: {message} {context}")]
    Status {
        status: u16,
        message: String,
        context: ErrorContext,
    },

    /// Upstream answered with an explicit API error payload.
    #[error("API error {code}: {message} {context}")]
    Api {
        code: String,
        message: String,
        context: ErrorContext,
    },

    /// Payload did not match the expected schema.
    #[error("Malformed response: {message} {context}")]
    Schema {
        message: String,
        context: ErrorContext,
    },

    /// The requested entity does not exist upstream.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Collaborator misconfigured (bad URL, batch size, missing fixture).
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },
}

impl FetchError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        let context = if status >= 500 || status == 429 {
            ErrorContext::default().retryable()
        } else {
            ErrorContext::default()
        };
        Self::Status {
            status,
            message: message.into(),
            context,
        }
    }

    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.context().retryable
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Connection { context, .. }
            | Self::Status { context, .. }
            | Self::Api { context, .. }
            | Self::Schema { context, .. }
            | Self::NotFound { context, .. }
            | Self::Configuration { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Connection { context, .. }
            | Self::Status { context, .. }
            | Self::Api { context, .. }
            | Self::Schema { context, .. }
            | Self::NotFound { context, .. }
            | Self::Configuration { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add or update the entity id in the error context.
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.context_mut().entity_id = Some(id.to_string());
        self
    }
}

#[cfg(feature = "wikipedia-source")]
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return FetchError::status(status.as_u16(), err.to_string());
        }
        if err.is_decode() {
            return FetchError::schema(err.to_string());
        }
        if err.is_builder() {
            return FetchError::configuration(err.to_string());
        }
        let context = ErrorContext::default()
            .with_details(if err.is_timeout() { "timeout" } else { "transport" })
            .retryable();
        FetchError::Connection {
            message: err.to_string(),
            context,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::schema(err.to_string())
    }
}
