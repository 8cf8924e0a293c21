use std::{
    ops::Deref,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::debug;

use self::export::NestedKey;
pub use self::member::{DefaultValue, Member, MemberDeclaration, MergePolicy, ResolvedMember};
pub use self::section::{Section, SectionBuilder, UnresolvedSection};
use self::section::SectionContext;
use crate::{
    environment::{Environment, ProcessEnvironment},
    error::{ConfigurationError, Result},
    traits::ResolvableConfigurationWithContext,
    value::Value,
};

mod export;
mod member;
mod section;



pub(crate) struct UnresolvedConfiguration {
    /// The root section, including its config path.
    root: UnresolvedSection,
}


/// A fully resolved configuration tree.
#[derive(Clone, Debug)]
pub struct Configuration {
    /// Canonical path of the configuration file, if it was given as a path.
    file_path: Option<PathBuf>,

    root: Section,
}


impl ResolvableConfigurationWithContext for UnresolvedConfiguration {
    type Context<'ctx> = &'ctx dyn Environment;
    type Resolved = Configuration;

    fn resolve(self, environment: &dyn Environment) -> Result<Self::Resolved> {
        let mut root = self.root;

        let (file_contents, file_path) = match root.take_config_path() {
            Some(config_path) => {
                let loaded_file = config_path.load(root.type_name())?;

                debug!(
                    section = root.type_name(),
                    file_path = ?loaded_file.canonical_path,
                    "Loaded root configuration file."
                );

                (loaded_file.contents, loaded_file.canonical_path)
            }
            None => (Value::Null, None),
        };

        let root = root.resolve(SectionContext::root(&file_contents, environment))?;

        Ok(Configuration { file_path, root })
    }
}


impl Configuration {
    /// Resolve `root` against its configuration file and the process environment.
    pub fn load(root: UnresolvedSection) -> Result<Self> {
        Self::load_with_environment(root, &ProcessEnvironment)
    }

    /// Resolve `root` against its configuration file and the given environment table.
    pub fn load_with_environment<E>(root: UnresolvedSection, environment: &E) -> Result<Self>
    where
        E: Environment,
    {
        UnresolvedConfiguration { root }.resolve(environment)
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn root(&self) -> &Section {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Section {
        &mut self.root
    }

    /// Exports the resolved tree as `{root_prefix: {member: value, nested_prefix: {...}}}`,
    /// the same layout as the configuration file.
    pub fn export(&self) -> crate::value::Mapping {
        crate::value::Mapping::from([(
            self.root.prefix.clone(),
            Value::Mapping(self.root.export()),
        )])
    }

    /// Deserializes the resolved tree into `T`.
    ///
    /// Unlike [`export`][Self::export], nested sections are keyed by member name
    /// and the root prefix is left out, so `T` mirrors the declaration.
    /// Byte sequences deserialize as sequences of integers and paths as strings.
    pub fn deserialize<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let tree = Value::Mapping(self.root.export_members(NestedKey::MemberName));

        serde_json::to_value(tree)
            .and_then(serde_json::from_value)
            .map_err(|source| ConfigurationError::Deserialize { source })
    }
}

impl Deref for Configuration {
    type Target = Section;

    fn deref(&self) -> &Self::Target {
        &self.root
    }
}
