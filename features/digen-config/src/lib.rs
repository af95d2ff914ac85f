//! Digen Config holds everything about code generation that is a naming or layout choice rather
//! than a property of the declarations being compiled.
//!
//! Digen Config is split into two major parts:
//! 1. GeneratorConfig: The marker names, naming rules and emit options used by the generator
//! 2. Provider: Loading a GeneratorConfig from TOML, falling back to defaults
//!
//! # Examples
//!
//! ```rust
//! use digen_config::provider::load_str;
//!
//! let config = load_str(
//!     r#"
//!     existential_qualifiers = ["any"]
//!
//!     [markers]
//!     provider = "Assembly"
//!
//!     [emit]
//!     indent = 2
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.markers.provider, "Assembly");
//! assert_eq!(config.markers.injectable, "Injectable");
//! assert_eq!(config.emit.indent, 2);
//! assert_eq!(config.naming.resolver_name("AppProvider"), "AppResolver");
//! assert_eq!(config.bare_type_name("any APIClient"), "APIClient");
//! ```
//!
//! Digen Config consists of the following components:
//!
//! 1. Config - the configuration types and their defaults
//! 2. Provider - for loading and validating configs
//! 3. Errors - for config errors

pub mod config;
pub mod errors;
pub mod provider;

pub use config::GeneratorConfig;
