//! Loading JSON and TOML files into [`Value`] trees.
//!
//! Files are read into memory in one go and parsed afterwards,
//! so no file handle outlives a [`FileLoader::load`] call.

use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::debug;

use crate::{
    error::{ConfigurationError, Result},
    value::Value,
};


/// Configuration file formats, chosen by file suffix.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    /// `.json` is JSON, `.toml` is TOML, everything else is unknown.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        match path.as_ref().extension()?.to_str()? {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FileFormat::Json => "JSON",
            FileFormat::Toml => "TOML",
        }
    }
}


/// Something that can produce a [`Value`] tree from a file.
///
/// [`JsonFile`] and [`TomlFile`] cover the built-in formats;
/// implement this to plug in anything else.
pub trait FileLoader: Debug + Send + Sync {
    /// Path of the underlying file, for error messages.
    fn path(&self) -> &Path;

    fn load(&self) -> Result<Value>;
}


fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ConfigurationError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}


/// A JSON file.
#[derive(Clone, Debug)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl FileLoader for JsonFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Value> {
        let contents = read_file(&self.path)?;

        let value = serde_json::from_str::<serde_json::Value>(&contents).map_err(|source| {
            ConfigurationError::JsonParse {
                path: self.path.clone(),
                source,
            }
        })?;

        debug!(path = %self.path.display(), "Loaded JSON file.");
        Ok(Value::from(value))
    }
}


/// A TOML file.
///
/// Only constructible when the `toml` feature is enabled.
#[derive(Clone, Debug)]
pub struct TomlFile {
    path: PathBuf,
}

impl TomlFile {
    /// Fails with [`ConfigurationError::MissingDependency`] when TOML support
    /// was compiled out, before anything is read.
    #[cfg(feature = "toml")]
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        Ok(Self { path: path.into() })
    }

    #[cfg(not(feature = "toml"))]
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let _ = path;
        Err(toml_missing())
    }
}

#[cfg(not(feature = "toml"))]
fn toml_missing() -> ConfigurationError {
    ConfigurationError::MissingDependency {
        format: FileFormat::Toml.name(),
        feature: "toml",
    }
}

impl FileLoader for TomlFile {
    fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(feature = "toml")]
    fn load(&self) -> Result<Value> {
        let contents = read_file(&self.path)?;

        let table = toml::from_str::<toml::Table>(&contents).map_err(|source| {
            ConfigurationError::TomlParse {
                path: self.path.clone(),
                source: Box::new(source),
            }
        })?;

        debug!(path = %self.path.display(), "Loaded TOML file.");
        Ok(Value::from(toml::Value::Table(table)))
    }

    #[cfg(not(feature = "toml"))]
    fn load(&self) -> Result<Value> {
        Err(toml_missing())
    }
}


/// A shareable handle to a [`FileLoader`].
///
/// Bound either as a root's config path or as a member's default,
/// in which case the file is loaded once while the owning section resolves.
#[derive(Clone, Debug)]
pub struct FileBinding {
    loader: Arc<dyn FileLoader>,
}

impl FileBinding {
    pub fn new<L: FileLoader + 'static>(loader: L) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }

    pub fn json<P: Into<PathBuf>>(path: P) -> Self {
        Self::new(JsonFile::new(path))
    }

    pub fn toml<P: Into<PathBuf>>(path: P) -> Result<Self> {
        Ok(Self::new(TomlFile::new(path)?))
    }

    /// Picks the loader from the file suffix, `None` if the suffix is unknown.
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Result<Option<Self>> {
        let path = path.into();

        match FileFormat::from_path(&path) {
            Some(FileFormat::Json) => Ok(Some(Self::json(path))),
            Some(FileFormat::Toml) => Self::toml(path).map(Some),
            None => Ok(None),
        }
    }

    pub fn path(&self) -> &Path {
        self.loader.path()
    }

    pub fn load(&self) -> Result<Value> {
        self.loader.load()
    }
}

impl<L: FileLoader + 'static> From<L> for FileBinding {
    fn from(loader: L) -> Self {
        Self::new(loader)
    }
}


/// Where a root section gets its configuration file from.
#[derive(Clone, Debug)]
pub enum ConfigPath {
    /// A pre-built loader, used as-is.
    Loader(FileBinding),

    /// A path whose suffix picks the format.
    Path(PathBuf),

    /// A path taken from an already decoded value (for example another
    /// configuration file). Only strings and paths are usable.
    Value(Value),
}

/// The decoded root file, together with the canonical path it was read from
/// (only known when the file was given as a path).
#[derive(Debug)]
pub(crate) struct LoadedFile {
    pub(crate) contents: Value,
    pub(crate) canonical_path: Option<PathBuf>,
}

impl ConfigPath {
    /// Loads the root configuration file for the section named `type_name`.
    ///
    /// The decoded file must be a mapping (or a list, which is
    /// accepted but contributes no section data).
    pub(crate) fn load(&self, type_name: &str) -> Result<LoadedFile> {
        match self {
            ConfigPath::Loader(binding) => {
                let contents = binding.load()?;
                ensure_mapping_or_list(type_name, binding.path(), &contents)?;

                Ok(LoadedFile {
                    contents,
                    canonical_path: None,
                })
            }
            ConfigPath::Path(path) => load_from_path(type_name, path),
            ConfigPath::Value(Value::String(path)) => load_from_path(type_name, Path::new(path)),
            ConfigPath::Value(Value::Path(path)) => load_from_path(type_name, path),
            ConfigPath::Value(other) => Err(ConfigurationError::UnsupportedConfigPathType {
                type_name: type_name.to_string(),
                actual: other.type_name(),
            }),
        }
    }
}

fn load_from_path(type_name: &str, path: &Path) -> Result<LoadedFile> {
    // The suffix is checked before the file system is touched.
    let binding = FileBinding::from_path(path)?.ok_or_else(|| {
        ConfigurationError::UnknownFileType {
            type_name: type_name.to_string(),
            path: path.to_path_buf(),
        }
    })?;

    let canonical_path =
        dunce::canonicalize(path).map_err(|source| ConfigurationError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    let contents = binding.load()?;
    ensure_mapping_or_list(type_name, path, &contents)?;

    Ok(LoadedFile {
        contents,
        canonical_path: Some(canonical_path),
    })
}

fn ensure_mapping_or_list(type_name: &str, path: &Path, contents: &Value) -> Result<()> {
    match contents {
        Value::Mapping(_) | Value::List(_) => Ok(()),
        other => Err(ConfigurationError::InvalidFileContent {
            type_name: type_name.to_string(),
            path: path.to_path_buf(),
            actual: other.type_name(),
        }),
    }
}


impl From<FileBinding> for ConfigPath {
    fn from(binding: FileBinding) -> Self {
        ConfigPath::Loader(binding)
    }
}

impl From<JsonFile> for ConfigPath {
    fn from(file: JsonFile) -> Self {
        ConfigPath::Loader(file.into())
    }
}

impl From<TomlFile> for ConfigPath {
    fn from(file: TomlFile) -> Self {
        ConfigPath::Loader(file.into())
    }
}

impl From<PathBuf> for ConfigPath {
    fn from(path: PathBuf) -> Self {
        ConfigPath::Path(path)
    }
}

impl From<&Path> for ConfigPath {
    fn from(path: &Path) -> Self {
        ConfigPath::Path(path.to_path_buf())
    }
}

impl From<&str> for ConfigPath {
    fn from(path: &str) -> Self {
        ConfigPath::Path(PathBuf::from(path))
    }
}

impl From<String> for ConfigPath {
    fn from(path: String) -> Self {
        ConfigPath::Path(PathBuf::from(path))
    }
}

impl From<Value> for ConfigPath {
    fn from(value: Value) -> Self {
        ConfigPath::Value(value)
    }
}
