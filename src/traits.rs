use crate::error::Result;

/// Represents a configuration declaration that can be resolved
/// into concrete values, where that process requires some additional
/// context (the environment, the surrounding file scope, ...).
pub trait ResolvableConfigurationWithContext {
    type Context<'ctx>;
    type Resolved;

    /// Resolve the declaration into its `Resolved` type.
    /// If the resolution / validation fails, you may return `Err` to indicate
    /// that the configuration is invalid.
    fn resolve(self, context: Self::Context<'_>) -> Result<Self::Resolved>;
}
