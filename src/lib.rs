//! Layered configuration trees.
//!
//! A configuration is declared as a tree of sections: a root section and any
//! number of nested ones, each with its own prefix. Every leaf member of the tree
//! is then resolved from three sources, highest precedence first:
//!
//! 1. the environment variable named after the member's position in the tree
//!    (`ROOT_NESTED_MEMBER`),
//! 2. the configuration file of the root section (JSON or TOML), where every
//!    section reads the table keyed by its prefix,
//! 3. the default declared in code.
//!
//! Your starting point should probably be [`UnresolvedSection::builder`] and
//! [`Configuration::load`].
//!
//! ```no_run
//! use cfgtree::{Configuration, Member, UnresolvedSection, ValueType};
//!
//! # fn main() -> miette::Result<()> {
//! let database = UnresolvedSection::builder("DatabaseConfiguration")
//!     .prefix("database")
//!     .member(Member::new("url").typed(ValueType::String).required())
//!     .member(Member::new("pool_size").with_default(4))
//!     .build()?;
//!
//! let root = UnresolvedSection::builder("Configuration")
//!     .prefix("myapp")
//!     .config_path("./data/configuration.toml")
//!     .member(Member::new("debug").with_default(false))
//!     .nested("database", database)
//!     .build()?;
//!
//! // MYAPP_DATABASE_URL beats [myapp.database] url = "..." in the file.
//! let configuration = Configuration::load(root)?;
//!
//! let pool_size = configuration
//!     .section("database")
//!     .and_then(|database| database.get("pool_size"))
//!     .and_then(|pool_size| pool_size.as_i64());
//! # Ok(())
//! # }
//! ```
//!
//! # Internals
//! Just like the rest of the crate, resolution is based on the concept of
//! unresolved and resolved structures. An [`UnresolvedSection`] only describes
//! members; resolving it (see `ResolvableConfigurationWithContext`) walks the
//! tree depth-first, threading the prefix chain, the type-name chain and the
//! current slice of the configuration file down to each nested section, and
//! produces a [`Section`] holding concrete values.

mod coercion;
mod environment;
mod error;
mod file;
mod structure;
mod traits;
mod utilities;
mod value;

pub use coercion::{coerce, parse_bool};
pub use environment::{Environment, MapEnvironment, ProcessEnvironment};
pub use error::{ConfigurationError, Result};
pub use file::{ConfigPath, FileBinding, FileFormat, FileLoader, JsonFile, TomlFile};
pub use structure::*;
pub use utilities::environment_key;
pub use value::{Mapping, Value, ValueType};
