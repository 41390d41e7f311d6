//! Error types for the lead engine.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Lead source error: {0}")]
    Source(#[from] SourceError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Export error: {0}")]
    Export(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Persistence errors. Fatal to the operation that hit them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// External enrichment failures.
///
/// `LeadSource` never hands these to its caller; they are logged and the
/// synthetic fallback takes over.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Provider {provider} request failed: {reason}")]
    Request { provider: String, reason: String },

    #[error("Provider {provider} returned HTTP {status}")]
    Status { provider: String, status: u16 },

    #[error("Invalid response from {provider}: {reason}")]
    Parse { provider: String, reason: String },
}

/// A single outbound send failed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid address {address}: {reason}")]
    Address { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Transport {transport} send failed: {reason}")]
    Send { transport: String, reason: String },
}

/// Custom template definition errors.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template {template} references unknown field {{{field}}}")]
    UnknownPlaceholder { template: String, field: String },

    #[error("Template {template} has a malformed placeholder near {fragment:?}")]
    Malformed { template: String, fragment: String },
}

/// Result type alias for the lead engine.
pub type Result<T> = std::result::Result<T, Error>;
