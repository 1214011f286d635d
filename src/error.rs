use thiserror::Error;

/// dtolift errors
#[derive(Error, Debug)]
pub enum DtoliftError {
    #[error("Table '{0}' does not exist")]
    MissingTable(String),

    #[error("Duplicate property '{property}' in class '{class}'")]
    DuplicateProperty { class: String, property: String },

    #[error("Failed to read schema from '{source_name}': {message}")]
    Introspection {
        source_name: String,
        message: String,
    },

    #[error("{} already exists", .0.display())]
    AlreadyExists(std::path::PathBuf),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
