//! Digen generates dependency resolvers from structured type declarations.
//!
//! For every provider interface, the generator links the types the interface can construct into a
//! [dependency graph](dependency_graph::DependencyGraph) and emits a resolver with:
//! 1. a `resolve<Type>` function per constructible type, taking every value nothing can build
//! 2. an `intercept<Type>` hook per type, wrapping its construction
//!
//! Resolvers of derived provider interfaces extend the resolvers of their parents and only
//! declare what the parents do not already declare.
//!
//! # Examples
//!
//! ```rust
//! use digen::{declarations::Declarations, generate};
//! use digen_config::GeneratorConfig;
//!
//! let declarations = Declarations::from_json(
//!     r#"{
//!         "interfaces": [
//!             { "name": "AppProvider", "inheritedTypeNames": ["Provider"] }
//!         ],
//!         "types": [
//!             { "kind": "struct", "name": "Session", "inheritedTypeNames": ["Injectable"] }
//!         ]
//!     }"#,
//! )
//! .unwrap();
//!
//! let mut config = GeneratorConfig::default();
//! config.emit.preamble = false;
//!
//! let code = generate(&declarations, &config).unwrap();
//! assert!(code.starts_with("protocol AppResolver: AppProvider {"));
//! assert!(code.contains("func resolveSession() -> Session {"));
//! ```
//!
//! Digen consists of the following components:
//!
//! 1. Declarations - the analyzer output the generator works on
//! 2. Inheritance - linking interfaces to their parents
//! 3. DependencyGraph - what one provider interface can construct
//! 4. Composer - building and ordering the resolvers of all provider interfaces
//! 5. Emitter - rendering resolvers into source text
//! 6. Errors - everything that can abort a run

pub mod composer;
pub mod declarations;
pub mod dependency_graph;
pub mod emitter;
pub mod errors;
pub mod implementation;
pub mod inheritance;
pub mod topological;
pub mod types;

use digen_config::GeneratorConfig;

use crate::{
    composer::ResolverComposer,
    declarations::Declarations,
    emitter::{Emitter, ProtocolEmitter},
    errors::GenerateError,
};

/// Runs the whole pipeline with the default emitter
pub fn generate(
    declarations: &Declarations,
    config: &GeneratorConfig,
) -> Result<String, GenerateError> {
    let emitter = ProtocolEmitter::new(config.emit.clone(), config.markers.clone());
    generate_with(declarations, config, &emitter)
}

/// Runs the whole pipeline, rendering with `emitter`
pub fn generate_with(
    declarations: &Declarations,
    config: &GeneratorConfig,
    emitter: &dyn Emitter,
) -> Result<String, GenerateError> {
    let resolvers = ResolverComposer::new(config).compose(declarations)?;
    tracing::debug!("Emitting {} resolvers", resolvers.len());

    Ok(emitter.emit(&declarations.sorted_imports(), &resolvers.outputs()))
}
