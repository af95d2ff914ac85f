//! Structured declarations as produced by the source analyzer.
//!
//! The analyzer turns source files into these records; everything after this point works on
//! names and signatures only.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    errors::DeclarationError,
    types::{Argument, FunctionScope, FunctionSignature, InjectableType},
};

/// All declarations of one generator run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Declarations {
    /// Modules imported by the declaring files
    pub imports: Vec<String>,
    pub interfaces: Vec<InterfaceDeclaration>,
    pub types: Vec<TypeDeclaration>,
}
impl Declarations {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Appends the declarations of another file
    pub fn merge(&mut self, other: Declarations) {
        self.imports.extend(other.imports);
        self.interfaces.extend(other.interfaces);
        self.types.extend(other.types);
    }

    /// Imports without duplicates, sorted by module name
    pub fn sorted_imports(&self) -> Vec<String> {
        self.imports
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Selects a constructor for every type conforming to `marker`
    ///
    /// Fails on the first injectable without a usable constructor.
    pub fn injectables(&self, marker: &str) -> Result<Vec<InjectableType>, DeclarationError> {
        self.types
            .iter()
            .filter(|declaration| declaration.conforms_to(marker))
            .map(InjectableType::from_declaration)
            .collect()
    }
}

/// A protocol-like interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDeclaration {
    pub name: String,
    #[serde(default)]
    pub inherited_type_names: Vec<String>,
    #[serde(default)]
    pub functions: Vec<FunctionSignature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    Struct,
    Class,
    Enum,
    Extension,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    Private,
    FilePrivate,
    #[default]
    Internal,
    Public,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProperty {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub visibility: Visibility,
}

/// A concrete type (or an extension of one)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDeclaration {
    pub kind: TypeKind,
    pub name: String,
    #[serde(default)]
    pub inherited_type_names: Vec<String>,
    #[serde(default)]
    pub functions: Vec<FunctionSignature>,
    #[serde(default)]
    pub stored_properties: Vec<StoredProperty>,
}
impl TypeDeclaration {
    pub fn conforms_to(&self, marker: &str) -> bool {
        self.inherited_type_names.iter().any(|name| name == marker)
    }

    /// The implicit initializer of a plain record
    ///
    /// Only structs get one, and only while no stored property is more or less visible than internal.
    pub fn memberwise_initializer(&self) -> Option<FunctionSignature> {
        if self.kind != TypeKind::Struct {
            return None;
        }

        if !self
            .stored_properties
            .iter()
            .all(|property| property.visibility == Visibility::Internal)
        {
            return None;
        }

        let arguments = self
            .stored_properties
            .iter()
            .map(|property| {
                Argument::with_binding(&property.name, &property.name, &property.type_name)
            })
            .collect();

        Some(FunctionSignature::new(
            FunctionScope::Instance,
            "init",
            arguments,
            None,
        ))
    }
}

impl InjectableType {
    /// Selects the constructor the generator will call
    ///
    /// The first initializer or factory method wins, the memberwise initializer is the fallback.
    pub fn from_declaration(declaration: &TypeDeclaration) -> Result<Self, DeclarationError> {
        let constructor = declaration
            .functions
            .iter()
            .find(|function| function.is_initializer() || function.is_factory_of(&declaration.name))
            .cloned()
            .or_else(|| declaration.memberwise_initializer())
            .ok_or_else(|| DeclarationError::MissingConstructor {
                type_name: declaration.name.clone(),
            })?;

        tracing::trace!(
            "Selected constructor '{}' for injectable {}",
            constructor.name,
            declaration.name
        );

        Ok(InjectableType {
            type_name: declaration.name.clone(),
            constructor,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn record(kind: TypeKind, name: &str) -> TypeDeclaration {
        TypeDeclaration {
            kind,
            name: name.to_string(),
            inherited_type_names: vec!["Injectable".to_string()],
            functions: vec![],
            stored_properties: vec![],
        }
    }

    fn property(name: &str, type_name: &str, visibility: Visibility) -> StoredProperty {
        StoredProperty {
            name: name.to_string(),
            type_name: type_name.to_string(),
            visibility,
        }
    }

    #[test]
    fn explicit_initializer_is_selected() {
        let mut declaration = record(TypeKind::Struct, "A");
        declaration.functions = vec![FunctionSignature::new(
            FunctionScope::Instance,
            "init",
            vec![Argument::with_binding("b", "b", "B")],
            None,
        )];

        let injectable = InjectableType::from_declaration(&declaration).unwrap();
        assert_eq!(injectable.type_name, "A");
        assert_eq!(injectable.constructor.name, "init");
        assert_eq!(injectable.constructor.arguments, vec![Argument::new("b", "B")]);
    }

    #[rstest]
    #[case("Model")]
    #[case("Self")]
    fn factory_method_is_selected(#[case] return_type: &str) {
        let mut declaration = record(TypeKind::Class, "Model");
        declaration.functions = vec![
            FunctionSignature::new(FunctionScope::Instance, "reload", vec![], None),
            FunctionSignature::new(
                FunctionScope::Static,
                "makeInstance",
                vec![Argument::new("urlSession", "URLSession")],
                Some(return_type.to_string()),
            ),
        ];

        let injectable = InjectableType::from_declaration(&declaration).unwrap();
        assert_eq!(injectable.constructor.name, "makeInstance");
        assert_eq!(injectable.constructor.scope, FunctionScope::Static);
    }

    #[test]
    fn first_candidate_wins() {
        let mut declaration = record(TypeKind::Struct, "Model");
        declaration.functions = vec![
            FunctionSignature::new(
                FunctionScope::Static,
                "make",
                vec![],
                Some("Model".to_string()),
            ),
            FunctionSignature::new(FunctionScope::Instance, "init", vec![], None),
        ];

        let injectable = InjectableType::from_declaration(&declaration).unwrap();
        assert_eq!(injectable.constructor.name, "make");
    }

    #[test]
    fn memberwise_initializer_uses_field_names() {
        let mut declaration = record(TypeKind::Struct, "A");
        declaration.stored_properties = vec![
            property("value", "Int", Visibility::Internal),
            property("client", "APIClient", Visibility::Internal),
        ];

        let injectable = InjectableType::from_declaration(&declaration).unwrap();
        assert_eq!(
            injectable.constructor,
            FunctionSignature::new(
                FunctionScope::Instance,
                "init",
                vec![
                    Argument::with_binding("value", "value", "Int"),
                    Argument::with_binding("client", "client", "APIClient"),
                ],
                None,
            )
        );
    }

    #[rstest]
    #[case(Visibility::Private)]
    #[case(Visibility::FilePrivate)]
    #[case(Visibility::Public)]
    fn non_internal_field_prevents_memberwise_initializer(#[case] visibility: Visibility) {
        let mut declaration = record(TypeKind::Struct, "A");
        declaration.stored_properties = vec![
            property("value", "Int", Visibility::Internal),
            property("secret", "String", visibility),
        ];

        assert_eq!(
            InjectableType::from_declaration(&declaration),
            Err(DeclarationError::MissingConstructor {
                type_name: "A".to_string()
            })
        );
    }

    #[rstest]
    #[case(TypeKind::Class)]
    #[case(TypeKind::Enum)]
    #[case(TypeKind::Extension)]
    fn only_structs_get_memberwise_initializers(#[case] kind: TypeKind) {
        let declaration = record(kind, "A");

        assert_eq!(
            InjectableType::from_declaration(&declaration),
            Err(DeclarationError::MissingConstructor {
                type_name: "A".to_string()
            })
        );
    }

    #[test]
    fn injectables_only_include_marked_types() {
        let mut plain = record(TypeKind::Struct, "Plain");
        plain.inherited_type_names.clear();
        let declarations = Declarations {
            types: vec![plain, record(TypeKind::Struct, "Marked")],
            ..Default::default()
        };

        let injectables = declarations.injectables("Injectable").unwrap();
        assert_eq!(injectables.len(), 1);
        assert_eq!(injectables[0].type_name, "Marked");
    }

    #[test]
    fn imports_are_sorted_and_unique() {
        let declarations = Declarations {
            imports: ["UIKit", "SwiftUI", "UIKit", "Foundation"]
                .map(String::from)
                .to_vec(),
            ..Default::default()
        };

        assert_eq!(
            declarations.sorted_imports(),
            ["Foundation", "SwiftUI", "UIKit"].map(String::from).to_vec()
        );
    }

    #[test]
    fn parses_analyzer_output() {
        let declarations = Declarations::from_json(
            r#"{
                "imports": ["Foundation"],
                "interfaces": [
                    { "name": "AppProvider", "inheritedTypeNames": ["Provider"],
                      "functions": [{ "name": "provideURLSession", "returnTypeName": "URLSession" }] }
                ],
                "types": [
                    { "kind": "struct", "name": "Config", "inheritedTypeNames": ["Injectable"],
                      "storedProperties": [{ "name": "url", "typeName": "URL", "visibility": "filePrivate" }] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(declarations.interfaces[0].functions[0].name, "provideURLSession");
        assert_eq!(
            declarations.types[0].stored_properties[0].visibility,
            Visibility::FilePrivate
        );
    }
}
