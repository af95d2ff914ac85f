use thiserror::Error;

/// Errors which abort a whole generation run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// A declaration can not be used
    #[error(transparent)]
    Declaration(#[from] DeclarationError),
    /// Interfaces inherit from each other in a circle
    #[error(transparent)]
    Inheritance(#[from] InheritanceError),
    /// Provider interfaces could not be ordered by inheritance
    #[error(transparent)]
    Linearizer(#[from] LinearizerError),
    /// The dependency graph of a provider could not be built
    #[error("Could not build resolver for '{provider}': {error}")]
    Graph {
        provider: String,
        #[source]
        error: GraphError,
    },
}

/// Errors in the declarations handed over by the analyzer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// An injectable has neither an initializer, a factory method nor a memberwise initializer
    #[error("Could not find an initializer or factory method in '{type_name}'. An injectable type must have one.")]
    MissingConstructor { type_name: String },
}

/// Errors while linking the dependency graph of a provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Could not resolve dependency graph due to a circular dependency between '{from}' and '{to}'")]
    CircularDependency { from: String, to: String },
}

/// Errors while linking interfaces to their parents
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InheritanceError {
    #[error("Could not resolve inheritance graph due to circular inheritance between '{child}' and '{parent}'")]
    CircularInheritance { child: String, parent: String },
}

/// Errors of the topological linearizer
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearizerError {
    /// No element without dependents was left, the input contains a cycle
    #[error("The given elements do not form a directed acyclic graph")]
    InvalidGraph,
}
