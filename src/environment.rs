use std::collections::HashMap;


/// Read-only access to a table of environment variables.
///
/// Resolution only ever asks for single keys, so tests (or embedders)
/// can substitute their own table instead of touching the process environment.
pub trait Environment {
    /// Returns the value of `key`, or `None` if it is not set at all.
    /// A variable set to the empty string is `Some("")`.
    fn get(&self, key: &str) -> Option<String>;
}


/// The environment of the current process.
#[derive(Clone, Copy, Default, Debug)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}


/// An in-memory environment table.
#[derive(Clone, Default, Debug)]
pub struct MapEnvironment {
    variables: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, builder-style.
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(key, value);
        self
    }

    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.variables.insert(key.into(), value.into());
    }
}

impl Environment for MapEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.variables.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnvironment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
