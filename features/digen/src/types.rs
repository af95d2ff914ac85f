use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

/// An argument of a function signature
///
/// `label` is the call-site keyword, `binding_name` the local name inside the function body.
/// A missing binding name means the label is used for both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_name: Option<String>,
    pub type_name: String,
}
impl Argument {
    pub fn new(label: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            binding_name: None,
            type_name: type_name.into(),
        }
    }

    pub fn with_binding(
        label: impl Into<String>,
        binding_name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            binding_name: Some(binding_name.into()),
            type_name: type_name.into(),
        }
    }

    /// Local name of the argument inside the function body
    pub fn binding_name(&self) -> &str {
        self.binding_name.as_deref().unwrap_or(&self.label)
    }
}
// An absent binding name and one equal to the label are the same argument
impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
            && self.binding_name() == other.binding_name()
            && self.type_name == other.type_name
    }
}
impl Eq for Argument {}
impl Hash for Argument {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
        self.binding_name().hash(state);
        self.type_name.hash(state);
    }
}
impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.binding_name {
            Some(binding) if binding != &self.label => {
                write!(f, "{} {}: {}", self.label, binding, self.type_name)
            }
            _ => write!(f, "{}: {}", self.label, self.type_name),
        }
    }
}

/// Where a function lives on its declaring type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FunctionScope {
    #[default]
    Instance,
    Static,
    Class,
}

/// Signature of a declared or generated function
///
/// Used for injectable constructors, provider functions and the synthesized
/// resolve and intercept functions alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSignature {
    #[serde(default)]
    pub scope: FunctionScope,
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type_name: Option<String>,
}
impl FunctionSignature {
    pub fn new(
        scope: FunctionScope,
        name: impl Into<String>,
        arguments: Vec<Argument>,
        return_type_name: Option<String>,
    ) -> Self {
        Self {
            scope,
            name: name.into(),
            arguments,
            return_type_name,
        }
    }

    /// Stand-in constructor of a parameter node, it can not be called
    pub(crate) fn empty() -> Self {
        Self::new(FunctionScope::Instance, "", vec![], None)
    }

    pub fn is_initializer(&self) -> bool {
        self.name == "init"
    }

    /// Whether this function returns an instance of `type_name`
    pub fn is_factory_of(&self, type_name: &str) -> bool {
        matches!(self.return_type_name.as_deref(), Some(ret) if ret == type_name || ret == "Self")
    }
}
impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            FunctionScope::Instance => {}
            FunctionScope::Static => f.write_str("static ")?,
            FunctionScope::Class => f.write_str("class ")?,
        }
        write!(f, "func {}(", self.name)?;
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{argument}")?;
        }
        f.write_str(")")?;
        if let Some(return_type) = &self.return_type_name {
            write!(f, " -> {return_type}")?;
        }
        Ok(())
    }
}

/// A provider interface with the provide functions it declares itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInterface {
    pub name: String,
    pub own_functions: Vec<FunctionSignature>,
    pub parent_interface_names: Vec<String>,
}

/// A type the generator may construct, with its selected constructor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectableType {
    pub type_name: String,
    pub constructor: FunctionSignature,
}
