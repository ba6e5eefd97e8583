use serde_json::error::Category;
use thiserror::Error;

/// A record could not be rendered as JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Encoding error: {message}")]
pub struct EncodingError {
    pub message: String,
}

impl From<serde_json::Error> for EncodingError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodingErrorKind {
    /// Input is not valid JSON.
    Syntax,
    /// Input ended before the JSON value was complete.
    UnexpectedEof,
    /// A required key is absent.
    MissingField,
    /// A key appears more than once.
    DuplicateField,
    /// A value has the wrong JSON type.
    TypeMismatch,
}

/// JSON text could not be turned into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Decoding error ({kind:?}) at line {line}, column {column}: {message}")]
pub struct DecodingError {
    pub kind: DecodingErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl DecodingError {
    pub fn is_missing_field(&self) -> bool {
        self.kind == DecodingErrorKind::MissingField
    }

    pub fn is_duplicate_field(&self) -> bool {
        self.kind == DecodingErrorKind::DuplicateField
    }

    pub fn is_type_mismatch(&self) -> bool {
        self.kind == DecodingErrorKind::TypeMismatch
    }
}

// serde_json only exposes the data-error category; the serde `missing_field`
// and `duplicate_field` constructors fix these message prefixes.
const MISSING_FIELD_PREFIX: &str = "missing field";
const DUPLICATE_FIELD_PREFIX: &str = "duplicate field";

impl From<serde_json::Error> for DecodingError {
    fn from(err: serde_json::Error) -> Self {
        let message = err.to_string();
        let kind = match err.classify() {
            Category::Eof => DecodingErrorKind::UnexpectedEof,
            Category::Syntax | Category::Io => DecodingErrorKind::Syntax,
            Category::Data if message.starts_with(MISSING_FIELD_PREFIX) => {
                DecodingErrorKind::MissingField
            }
            Category::Data if message.starts_with(DUPLICATE_FIELD_PREFIX) => {
                DecodingErrorKind::DuplicateField
            }
            Category::Data => DecodingErrorKind::TypeMismatch,
        };

        Self {
            kind,
            message,
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Failures of the managed-record path. A failed `save` leaves the context unchanged.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Entity '{entity}' is not described in the model")]
    UnknownEntity { entity: String },

    #[error("No managed object with id {id}")]
    UnknownObject { id: String },

    #[error("Entity '{entity}' has no attribute '{attribute}'")]
    UnknownAttribute { entity: String, attribute: String },

    #[error("Attribute '{attribute}' of '{entity}' expects {expected}, got {actual}")]
    TypeMismatch {
        entity: String,
        attribute: String,
        expected: String,
        actual: String,
    },

    #[error("Validation failed for {entity} {id}: {reason}")]
    ValidationFailed {
        entity: String,
        id: String,
        reason: String,
    },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum RecordError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Decoding(#[from] DecodingError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RecordError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RecordError::Encoding(_) | RecordError::Decoding(_) => ErrorSeverity::Medium,
            RecordError::Persistence(_) => ErrorSeverity::High,
            RecordError::IoError(_)
            | RecordError::ConfigError { .. }
            | RecordError::MissingConfigError { .. }
            | RecordError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 1,
            ErrorSeverity::High => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RecordError::Encoding(e) => format!("Could not encode the record: {}", e.message),
            RecordError::Decoding(e) => match e.kind {
                DecodingErrorKind::Syntax | DecodingErrorKind::UnexpectedEof => {
                    format!("The input is not valid JSON ({})", e.message)
                }
                DecodingErrorKind::MissingField => {
                    format!("The JSON object is incomplete ({})", e.message)
                }
                DecodingErrorKind::DuplicateField => {
                    format!("The JSON object repeats a key ({})", e.message)
                }
                DecodingErrorKind::TypeMismatch => {
                    format!("A JSON value has the wrong type ({})", e.message)
                }
            },
            RecordError::Persistence(e) => format!("Could not store the record: {}", e),
            RecordError::IoError(e) => format!("File access failed: {}", e),
            RecordError::ConfigError { message } => format!("Invalid configuration: {}", message),
            RecordError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
            RecordError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RecordError::Encoding(_) => "Check that every field holds a JSON-representable value",
            RecordError::Decoding(_) => {
                "Provide a JSON object of the form {\"name\": \"<string>\", \"age\": <integer>}"
            }
            RecordError::Persistence(PersistenceError::ValidationFailed { .. }) => {
                "Populate every required attribute before saving"
            }
            RecordError::Persistence(_) => "Check the store location and try saving again",
            RecordError::IoError(_) => "Check that the path exists and is writable",
            RecordError::ConfigError { .. }
            | RecordError::MissingConfigError { .. }
            | RecordError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;
