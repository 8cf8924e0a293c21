use std::path::PathBuf;

use tracing::trace;

use super::section::{Section, UnresolvedSection};
use crate::{
    coercion::coerce,
    environment::Environment,
    error::{ConfigurationError, Result},
    file::FileBinding,
    traits::ResolvableConfigurationWithContext,
    value::{Mapping, Value, ValueType},
};


/// What a leaf member falls back to when neither the configuration file
/// nor the environment provide a value.
#[derive(Clone, Debug)]
pub enum DefaultValue {
    /// An in-code default, overridden by the file and then the environment.
    Value(Value),

    /// A file loaded while the owning section resolves.
    /// The loaded contents become the final value and are never overridden.
    File(FileBinding),

    /// Explicitly has no default: the value must come from the file or the environment.
    Required,

    /// Only a type was declared. Behaves like [`DefaultValue::Required`].
    Absent,
}


/// Decides when a configuration file entry overrides a member's default.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum MergePolicy {
    /// Any entry that is present and not `null` wins, including `0`, `false` and `""`.
    #[default]
    Presence,

    /// Only truthy entries win; `0`, `false`, `""` and empty containers
    /// leave the default in place.
    Truthy,
}

impl MergePolicy {
    fn adopts(self, file_value: &Value) -> bool {
        match self {
            MergePolicy::Presence => !file_value.is_null(),
            MergePolicy::Truthy => file_value.is_truthy(),
        }
    }
}


/// Declaration of a leaf member: a name, an optional declared type and a default.
///
/// ```
/// use cfgtree::{Member, ValueType};
///
/// let port = Member::new("port").with_default(8080);
/// let secret = Member::new("secret_key").typed(ValueType::String).required();
/// ```
#[derive(Clone, Debug)]
pub struct Member {
    name: String,
    declared_type: Option<ValueType>,
    default: DefaultValue,
}

impl Member {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            default: DefaultValue::Absent,
        }
    }

    /// Declares the member's type. Without it, the type of the default value is used.
    pub fn typed(mut self, declared_type: ValueType) -> Self {
        self.declared_type = Some(declared_type);
        self
    }

    pub fn with_default<V: Into<Value>>(mut self, default: V) -> Self {
        self.default = DefaultValue::Value(default.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.default = DefaultValue::Required;
        self
    }

    /// Binds a file whose contents become this member's value.
    pub fn file<B: Into<FileBinding>>(mut self, binding: B) -> Self {
        self.default = DefaultValue::File(binding.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &DefaultValue {
        &self.default
    }

    /// The explicitly declared type, or the type of the in-code default.
    pub fn declared_type(&self) -> Option<ValueType> {
        self.declared_type.or_else(|| match &self.default {
            DefaultValue::Value(value) => value.value_type(),
            _ => None,
        })
    }
}


/// A member of a section: either a leaf value or a nested section.
#[derive(Clone, Debug)]
pub enum MemberDeclaration {
    Leaf(Member),
    Nested {
        name: String,
        section: UnresolvedSection,
    },
}

impl MemberDeclaration {
    pub fn name(&self) -> &str {
        match self {
            MemberDeclaration::Leaf(member) => member.name(),
            MemberDeclaration::Nested { name, .. } => name,
        }
    }
}

impl From<Member> for MemberDeclaration {
    fn from(member: Member) -> Self {
        MemberDeclaration::Leaf(member)
    }
}


/// A member after resolution.
#[derive(Clone, PartialEq, Debug)]
pub enum ResolvedMember {
    Value(Value),
    Section(Section),
}


/// Everything a leaf member needs to know about its place in the tree.
pub struct MemberContext<'ctx> {
    /// The owning section's slice of the configuration file.
    pub(crate) scope: &'ctx Mapping,
    pub(crate) env_key: String,
    /// Dotted path for error messages.
    pub(crate) path: String,
    pub(crate) strict: bool,
    pub(crate) merge_policy: MergePolicy,
    pub(crate) environment: &'ctx dyn Environment,
}


/// Where a leaf member's final value came from. Only used for tracing,
/// values themselves are never logged as they may be secrets.
#[derive(Clone, Copy, Debug)]
enum ValueSource {
    Default,
    File,
    Environment,
    FileBinding,
}


impl ResolvableConfigurationWithContext for Member {
    type Context<'ctx> = MemberContext<'ctx>;
    type Resolved = Value;

    fn resolve(self, context: MemberContext<'_>) -> Result<Value> {
        let declared_type = self.declared_type();

        let (value, source) = match self.default {
            DefaultValue::File(binding) => (Some(binding.load()?), ValueSource::FileBinding),
            default => {
                let mut value = match default {
                    DefaultValue::Value(value) => Some(value),
                    _ => None,
                };
                let mut source = ValueSource::Default;

                if let Some(file_value) = context.scope.get(&self.name) {
                    if context.merge_policy.adopts(file_value) {
                        value = Some(file_value.clone());
                        source = ValueSource::File;
                    }
                }

                // An environment value that decodes to null leaves the file
                // or default candidate in place.
                if let Some(raw_value) = context.environment.get(&context.env_key) {
                    let env_value = coerce(declared_type, &context.env_key, &raw_value)?;
                    if !env_value.is_null() {
                        value = Some(env_value);
                        source = ValueSource::Environment;
                    }
                }

                (value, source)
            }
        };

        let value = match value {
            Some(value) if !value.is_null() => value,
            _ => {
                return Err(ConfigurationError::ValueMissing {
                    path: context.path,
                    env_key: context.env_key,
                });
            }
        };

        trace!(
            member = %context.path,
            env_key = %context.env_key,
            ?source,
            "Resolved member."
        );

        if !context.strict {
            return Ok(value);
        }

        enforce_declared_type(value, declared_type, &context)
    }
}


/// Strict mode: the final value must be an instance of the declared type.
/// A string is accepted for a path member and converted.
fn enforce_declared_type(
    value: Value,
    declared_type: Option<ValueType>,
    context: &MemberContext<'_>,
) -> Result<Value> {
    let Some(expected) = declared_type else {
        return Ok(value);
    };

    match value {
        Value::String(path) if expected == ValueType::Path => Ok(Value::Path(PathBuf::from(path))),
        value if expected.accepts(&value) => Ok(value),
        value => Err(ConfigurationError::TypeMismatch {
            path: context.path.clone(),
            env_key: context.env_key.clone(),
            actual: value.type_name(),
            expected,
        }),
    }
}
