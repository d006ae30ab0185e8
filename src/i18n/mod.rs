//! Bilingual routing: languages, path normalization and EN ↔ FR equivalence.
//!
//! # Architecture
//!
//! - `registry`: the site's languages and the root prefix of each page tree
//! - `language`: validated `Language` handle backed by the registry
//! - `path`: `NormalizedPath`, normalization and relative URL building
//! - `routes`: static route and resource-slug tables, checked one-to-one
//! - `resolver`: finds the equivalent page in the other language
//!
//! # Example
//!
//! ```rust,ignore
//! use nestego_site::i18n::resolve_equivalent;
//!
//! assert_eq!(resolve_equivalent("/about-us/"), "../fr/a-propos/");
//! ```

mod language;
pub mod path;
mod registry;
pub mod resolver;
pub mod routes;

pub use language::Language;
pub use path::{normalize, to_relative, NormalizedPath};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use resolver::{resolve_equivalent, MatchRule, Resolution, RouteResolver};
pub use routes::{BiMap, RouteTableError, RouteTables};
