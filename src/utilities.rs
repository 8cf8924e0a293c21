/// Builds the environment variable name of a member: every prefix from the root
/// down to the owning section, then the member name, joined by `_` and upper-cased.
#[must_use = "function returns the environment key"]
pub fn environment_key<S>(prefixes: &[S], member_name: &str) -> String
where
    S: AsRef<str>,
{
    let mut parts: Vec<&str> = prefixes.iter().map(AsRef::as_ref).collect();
    parts.push(member_name);

    parts.join("_").to_uppercase()
}

/// Builds the dotted path used in error messages, e.g. `Root.Nested.member`.
#[must_use = "function returns the dotted path"]
pub fn dotted_path<S>(type_names: &[S], member_name: &str) -> String
where
    S: AsRef<str>,
{
    let mut parts: Vec<&str> = type_names.iter().map(AsRef::as_ref).collect();
    parts.push(member_name);

    parts.join(".")
}
