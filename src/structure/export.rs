use super::{member::ResolvedMember, section::Section};
use crate::value::{Mapping, Value};


/// How nested sections are keyed in an exported tree.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum NestedKey {
    /// By the nested section's prefix, matching the configuration file layout.
    Prefix,
    /// By the name of the member holding the nested section.
    MemberName,
}


impl Section {
    /// Exports this section's members as `{member: value, nested_prefix: {...}}`.
    ///
    /// The section's own prefix is not included; only
    /// [`Configuration::export`][crate::Configuration::export] wraps the root in it.
    /// Keep in mind that the result contains any secrets
    /// that were loaded from the environment.
    pub fn export(&self) -> Mapping {
        self.export_members(NestedKey::Prefix)
    }

    pub(crate) fn export_members(&self, nested_key: NestedKey) -> Mapping {
        self.members
            .iter()
            .map(|(name, member)| match member {
                ResolvedMember::Value(value) => (name.clone(), value.clone()),
                ResolvedMember::Section(section) => {
                    let key = match nested_key {
                        NestedKey::Prefix => section.prefix.clone(),
                        NestedKey::MemberName => name.clone(),
                    };

                    (key, Value::Mapping(section.export_members(nested_key)))
                }
            })
            .collect()
    }
}
