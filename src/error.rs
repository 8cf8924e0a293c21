use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::value::ValueType;


pub type Result<T, E = ConfigurationError> = std::result::Result<T, E>;


/// Every way declaring or resolving a configuration tree can fail.
///
/// All of these are fatal: resolution stops at the first one
/// and no partially resolved tree is handed out.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigurationError {
    #[error("{type_name}.prefix is not set")]
    #[diagnostic(
        code(cfgtree::prefix_missing),
        help("Call `.prefix(...)` with a non-empty prefix when declaring the section.")
    )]
    PrefixMissing { type_name: String },

    #[error("{type_name} declares member {member} more than once")]
    #[diagnostic(code(cfgtree::duplicate_member))]
    DuplicateMember { type_name: String, member: String },

    #[error("Value for {path} / {env_key} not set.")]
    #[diagnostic(
        code(cfgtree::value_missing),
        help("Set the {env_key} environment variable, add it to the configuration file or declare a default.")
    )]
    ValueMissing { path: String, env_key: String },

    #[error("{path} / {env_key} is {actual}, expected {expected}")]
    #[diagnostic(code(cfgtree::type_mismatch))]
    TypeMismatch {
        path: String,
        env_key: String,
        actual: &'static str,
        expected: ValueType,
    },

    #[error("{type_name}: Unknown file type: {}", path.display())]
    #[diagnostic(
        code(cfgtree::unknown_file_type),
        help("Configuration files must end in .json or .toml.")
    )]
    UnknownFileType { type_name: String, path: PathBuf },

    #[error("{type_name}: Unsupported config path type: {actual}")]
    #[diagnostic(code(cfgtree::unsupported_config_path_type))]
    UnsupportedConfigPathType {
        type_name: String,
        actual: &'static str,
    },

    #[error("{type_name}: {} did not return a mapping (got {actual})", path.display())]
    #[diagnostic(code(cfgtree::invalid_file_content))]
    InvalidFileContent {
        type_name: String,
        path: PathBuf,
        actual: &'static str,
    },

    #[error("The `{feature}` feature is required for {format} files to work.")]
    #[diagnostic(
        code(cfgtree::missing_dependency),
        help("Enable the `{feature}` cargo feature of cfgtree.")
    )]
    MissingDependency {
        format: &'static str,
        feature: &'static str,
    },

    #[error("Could not parse {env_key} as {expected}: {source}")]
    #[diagnostic(code(cfgtree::coercion))]
    CoercionError {
        env_key: String,
        expected: ValueType,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to read configuration file {}.", path.display())]
    #[diagnostic(code(cfgtree::file_read))]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {} as JSON.", path.display())]
    #[diagnostic(code(cfgtree::json_parse))]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse {} as TOML.", path.display())]
    #[diagnostic(code(cfgtree::toml_parse))]
    TomlParse {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Resolved configuration does not fit the requested type.")]
    #[diagnostic(code(cfgtree::deserialize))]
    Deserialize {
        #[source]
        source: serde_json::Error,
    },
}
