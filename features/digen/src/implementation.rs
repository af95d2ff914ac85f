use crate::types::{Argument, FunctionSignature};

/// A generated function: its signature and the statements of its body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionImplementation {
    pub signature: FunctionSignature,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `let name = call`
    Bind { name: String, call: Call },
    /// `return interceptor { body }`, the body becomes the builder callback
    ReturnIntercepted {
        interceptor: String,
        body: Vec<Statement>,
    },
    /// `return call`
    Return(Call),
}

/// A call forwarding arguments by label
///
/// Each argument is passed as `label: binding`, the binding being the local in scope with that name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub target: CallTarget,
    pub arguments: Vec<Argument>,
}
impl Call {
    pub fn function(name: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            target: CallTarget::Function(name.into()),
            arguments,
        }
    }

    pub fn member(name: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            target: CallTarget::Member(name.into()),
            arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    /// A function in scope, e.g. a provide function or another resolve function
    Function(String),
    /// A constructor or factory on the type being returned, e.g. `.init`
    Member(String),
}
