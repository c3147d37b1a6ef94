use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Run file validation error (empty name, missing catalog path, etc.).
    ConfigValidation(String),
    /// Similarity threshold is not a finite number in [0, 1].
    InvalidThreshold(f64),
    /// Catalog document is not valid JSON or has the wrong shape.
    CatalogParse { catalog: String, message: String },
    /// A required key is absent from a catalog entity.
    MissingField { catalog: String, entity: String, field: String },
    /// A key is present but holds the wrong JSON type.
    InvalidField {
        catalog: String,
        entity: String,
        field: String,
        expected: &'static str,
    },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InvalidThreshold(value) => {
                write!(f, "similarity_threshold must be within [0, 1], got {value}")
            }
            Self::CatalogParse { catalog, message } => {
                write!(f, "catalog '{catalog}': {message}")
            }
            Self::MissingField { catalog, entity, field } => {
                write!(f, "catalog '{catalog}', {entity}: missing field '{field}'")
            }
            Self::InvalidField { catalog, entity, field, expected } => {
                write!(f, "catalog '{catalog}', {entity}: field '{field}' must be {expected}")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
