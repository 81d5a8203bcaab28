use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipetestError {
    #[error("YAML error: {0}")]
    Yaml(#[from] YamlError),

    #[error("Sandbox error: {0}")]
    Sandbox(#[from] SandboxError),

    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    #[error("'{operation}' requires an active project; call new_project first")]
    InvalidState { operation: &'static str },

    #[error("Project '{name}' is already active; call stop before scaffolding another")]
    ProjectAlreadyActive { name: String },
}

#[derive(Error, Debug)]
pub enum YamlError {
    #[error("YAML file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read YAML file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("YAML document in '{path}' is not a mapping")]
    NotMapping { path: PathBuf },

    #[error("Failed to serialize YAML: {0}")]
    Serialize(String),

    #[error("Failed to write YAML file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Failed to create sandbox directory: {0}")]
    Create(#[source] std::io::Error),

    #[error("Failed to clean sandbox path '{path}': {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Absolute paths are not allowed inside the sandbox: {0}")]
    AbsolutePath(PathBuf),

    #[error("Path escapes the sandbox root: {0}")]
    PathEscape(PathBuf),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{0}")]
    Usage(String),

    #[error("Unknown pipeline: {0}")]
    UnknownPipeline(String),

    #[error("Pipeline '{pipeline}' references dataset '{dataset}' which is not in the catalog")]
    DatasetNotFound { pipeline: String, dataset: String },

    #[error("Pipeline '{pipeline}' references parameter '{parameter}' which is not defined")]
    ParameterNotFound { pipeline: String, parameter: String },

    #[error("Invalid pipeline definition '{name}': {reason}")]
    InvalidPipeline { name: String, reason: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] YamlError),
}

pub type Result<T> = std::result::Result<T, PipetestError>;
