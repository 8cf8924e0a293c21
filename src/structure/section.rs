use std::collections::HashSet;

use tracing::{debug, warn};

use super::member::{Member, MemberContext, MemberDeclaration, MergePolicy, ResolvedMember};
use crate::{
    environment::Environment,
    error::{ConfigurationError, Result},
    file::ConfigPath,
    traits::ResolvableConfigurationWithContext,
    utilities::{dotted_path, environment_key},
    value::{Mapping, Value},
};


static EMPTY_MAPPING: Mapping = Mapping::new();


/// Declaration of a configuration section: a prefix plus an ordered set of members,
/// some of which may be nested sections.
///
/// Built with [`UnresolvedSection::builder`] and resolved through
/// [`Configuration::load`][crate::Configuration::load].
#[derive(Clone, Debug)]
pub struct UnresolvedSection {
    type_name: String,
    prefix: String,
    strict: bool,
    merge_policy: MergePolicy,
    config_path: Option<ConfigPath>,
    members: Vec<MemberDeclaration>,
}

impl UnresolvedSection {
    /// Starts declaring a section. `type_name` only shows up in error messages.
    pub fn builder<S: Into<String>>(type_name: S) -> SectionBuilder {
        SectionBuilder {
            type_name: type_name.into(),
            prefix: None,
            strict: true,
            merge_policy: MergePolicy::default(),
            config_path: None,
            members: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The lower-cased prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn members(&self) -> &[MemberDeclaration] {
        &self.members
    }

    pub(crate) fn take_config_path(&mut self) -> Option<ConfigPath> {
        self.config_path.take()
    }
}


/// Builder for [`UnresolvedSection`].
#[derive(Debug)]
pub struct SectionBuilder {
    type_name: String,
    prefix: Option<String>,
    strict: bool,
    merge_policy: MergePolicy,
    config_path: Option<ConfigPath>,
    members: Vec<MemberDeclaration>,
}

impl SectionBuilder {
    /// Namespace for environment variables and the configuration file. Case-insensitive.
    pub fn prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Whether resolved values are checked against their declared types (default: on).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn merge_policy(mut self, merge_policy: MergePolicy) -> Self {
        self.merge_policy = merge_policy;
        self
    }

    /// The configuration file of the tree. Only honoured on the root section.
    pub fn config_path<P: Into<ConfigPath>>(mut self, config_path: P) -> Self {
        self.config_path = Some(config_path.into());
        self
    }

    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member.into());
        self
    }

    pub fn nested<S: Into<String>>(mut self, name: S, section: UnresolvedSection) -> Self {
        self.members.push(MemberDeclaration::Nested {
            name: name.into(),
            section,
        });
        self
    }

    pub fn build(self) -> Result<UnresolvedSection> {
        let prefix = match self.prefix {
            Some(prefix) if !prefix.is_empty() => prefix.to_lowercase(),
            _ => {
                return Err(ConfigurationError::PrefixMissing {
                    type_name: self.type_name,
                });
            }
        };

        let mut seen_names = HashSet::with_capacity(self.members.len());
        for member in &self.members {
            if !seen_names.insert(member.name()) {
                return Err(ConfigurationError::DuplicateMember {
                    type_name: self.type_name.clone(),
                    member: member.name().to_string(),
                });
            }
        }

        Ok(UnresolvedSection {
            type_name: self.type_name,
            prefix,
            strict: self.strict,
            merge_policy: self.merge_policy,
            config_path: self.config_path,
            members: self.members,
        })
    }
}


/// A fully resolved section.
#[derive(Clone, PartialEq, Debug)]
pub struct Section {
    pub(super) type_name: String,
    pub(super) prefix: String,
    pub(super) members: Vec<(String, ResolvedMember)>,
}

impl Section {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &ResolvedMember)> {
        self.members
            .iter()
            .map(|(name, member)| (name.as_str(), member))
    }

    fn member(&self, name: &str) -> Option<&ResolvedMember> {
        self.members
            .iter()
            .find(|(member_name, _)| member_name == name)
            .map(|(_, member)| member)
    }

    /// The value of the leaf member `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.member(name)? {
            ResolvedMember::Value(value) => Some(value),
            ResolvedMember::Section(_) => None,
        }
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.members
            .iter_mut()
            .find(|(member_name, _)| member_name == name)
            .and_then(|(_, member)| match member {
                ResolvedMember::Value(value) => Some(value),
                ResolvedMember::Section(_) => None,
            })
    }

    /// The nested section stored under the member `name`.
    pub fn section(&self, name: &str) -> Option<&Section> {
        match self.member(name)? {
            ResolvedMember::Section(section) => Some(section),
            ResolvedMember::Value(_) => None,
        }
    }
}


/// Threading state of the recursive resolution: where in the tree
/// (prefixes and type names of all ancestors) the section sits, and which
/// part of the configuration file belongs to its parent.
pub struct SectionContext<'ctx> {
    prefixes: Vec<String>,
    type_names: Vec<String>,
    parent_scope: &'ctx Mapping,
    environment: &'ctx dyn Environment,
}

impl<'ctx> SectionContext<'ctx> {
    /// Context of the root section: no ancestors, the whole decoded file as parent scope.
    pub(crate) fn root(file_contents: &'ctx Value, environment: &'ctx dyn Environment) -> Self {
        let parent_scope = match file_contents {
            Value::Mapping(mapping) => mapping,
            Value::Null => &EMPTY_MAPPING,
            other => {
                warn!(
                    actual = other.type_name(),
                    "Configuration file is not a mapping, ignoring its contents."
                );
                &EMPTY_MAPPING
            }
        };

        Self {
            prefixes: Vec::new(),
            type_names: Vec::new(),
            parent_scope,
            environment,
        }
    }
}

/// The part of `parent_scope` belonging to the section with `prefix`.
fn section_scope<'a>(parent_scope: &'a Mapping, prefix: &str, type_name: &str) -> &'a Mapping {
    match parent_scope.get(prefix) {
        Some(Value::Mapping(mapping)) => mapping,
        None | Some(Value::Null) => &EMPTY_MAPPING,
        Some(other) => {
            warn!(
                section = type_name,
                prefix,
                actual = other.type_name(),
                "Configuration file entry for section is not a mapping, ignoring it."
            );
            &EMPTY_MAPPING
        }
    }
}


impl ResolvableConfigurationWithContext for UnresolvedSection {
    type Context<'ctx> = SectionContext<'ctx>;
    type Resolved = Section;

    fn resolve(self, context: SectionContext<'_>) -> Result<Section> {
        debug!(
            section = %self.type_name,
            prefix = %self.prefix,
            "Resolving section."
        );

        if self.config_path.is_some() && !context.type_names.is_empty() {
            warn!(
                section = %self.type_name,
                "Config path of a nested section is ignored."
            );
        }

        let scope = section_scope(context.parent_scope, &self.prefix, &self.type_name);

        let mut prefixes = context.prefixes;
        prefixes.push(self.prefix.clone());

        let mut type_names = context.type_names;
        type_names.push(self.type_name.clone());

        let mut members = Vec::with_capacity(self.members.len());

        for member in self.members {
            match member {
                MemberDeclaration::Nested { name, section } => {
                    let nested_context = SectionContext {
                        prefixes: prefixes.clone(),
                        type_names: type_names.clone(),
                        parent_scope: scope,
                        environment: context.environment,
                    };

                    let resolved = section.resolve(nested_context)?;
                    members.push((name, ResolvedMember::Section(resolved)));
                }
                MemberDeclaration::Leaf(leaf) => {
                    let name = leaf.name().to_string();

                    let member_context = MemberContext {
                        scope,
                        env_key: environment_key(&prefixes, &name),
                        path: dotted_path(&type_names, &name),
                        strict: self.strict,
                        merge_policy: self.merge_policy,
                        environment: context.environment,
                    };

                    let value = leaf.resolve(member_context)?;
                    members.push((name, ResolvedMember::Value(value)));
                }
            }
        }

        Ok(Section {
            type_name: self.type_name,
            prefix: self.prefix,
            members,
        })
    }
}
