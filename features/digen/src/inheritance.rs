use std::collections::BTreeMap;

use crate::{declarations::InterfaceDeclaration, errors::InheritanceError, types::FunctionSignature};

/// Inheritance between interfaces
///
/// Links every interface to the declared supertypes which are interfaces themselves.
/// Supertypes that are not declared (like the marker interfaces) stay unlinked, but still
/// count for [InterfaceTree::descendants].
pub struct InterfaceTree {
    /// In declaration order
    nodes: Vec<InterfaceNode>,
    index: BTreeMap<String, usize>,
}

struct InterfaceNode {
    declaration: InterfaceDeclaration,
    parents: Vec<usize>,
}

impl InterfaceTree {
    pub fn new(declarations: &[InterfaceDeclaration]) -> Result<Self, InheritanceError> {
        let mut tree = Self {
            nodes: Vec::with_capacity(declarations.len()),
            index: BTreeMap::new(),
        };

        for declaration in declarations {
            match tree.index.get(&declaration.name) {
                Some(&existing) => {
                    tracing::debug!(
                        "Interface {} declared twice, keeping the last declaration",
                        declaration.name
                    );
                    tree.nodes[existing].declaration = declaration.clone();
                }
                None => {
                    tree.index.insert(declaration.name.clone(), tree.nodes.len());
                    tree.nodes.push(InterfaceNode {
                        declaration: declaration.clone(),
                        parents: Vec::new(),
                    });
                }
            }
        }

        // Link in name order, so the reported pair of a cycle does not depend on declaration order
        let by_name: Vec<usize> = tree.index.values().copied().collect();
        for child in by_name {
            let parents: Vec<usize> = tree.nodes[child]
                .declaration
                .inherited_type_names
                .iter()
                .filter_map(|name| tree.index.get(name).copied())
                .collect();

            for parent in parents {
                tree.add_parent(child, parent)?;
            }
        }

        Ok(tree)
    }

    fn add_parent(&mut self, child: usize, parent: usize) -> Result<(), InheritanceError> {
        if child == parent || self.ancestor_indices(parent).contains(&child) {
            return Err(InheritanceError::CircularInheritance {
                child: self.nodes[child].declaration.name.clone(),
                parent: self.nodes[parent].declaration.name.clone(),
            });
        }

        tracing::trace!(
            "{} extends {}",
            self.nodes[child].declaration.name,
            self.nodes[parent].declaration.name
        );
        self.nodes[child].parents.push(parent);
        Ok(())
    }

    /// Every ancestor once, each parent directly followed by its own ancestors
    fn ancestor_indices(&self, node: usize) -> Vec<usize> {
        let mut ancestors = Vec::new();
        collect(self, node, &mut ancestors);
        return ancestors;

        fn collect(tree: &InterfaceTree, node: usize, ancestors: &mut Vec<usize>) {
            for &parent in &tree.nodes[node].parents {
                if !ancestors.contains(&parent) {
                    ancestors.push(parent);
                    collect(tree, parent, ancestors);
                }
            }
        }
    }

    fn is_descendant(&self, node: usize, marker: &str) -> bool {
        std::iter::once(node)
            .chain(self.ancestor_indices(node))
            .any(|index| {
                self.nodes[index]
                    .declaration
                    .inherited_type_names
                    .iter()
                    .any(|name| name == marker)
            })
    }

    /// Direct parents which are declared interfaces, in declaration order
    pub fn parents(&self, name: &str) -> Vec<&str> {
        self.index
            .get(name)
            .map(|&index| {
                self.nodes[index]
                    .parents
                    .iter()
                    .map(|&parent| self.nodes[parent].declaration.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All interfaces `name` extends, directly or through other interfaces
    pub fn ancestors(&self, name: &str) -> Vec<&str> {
        self.index
            .get(name)
            .map(|&index| {
                self.ancestor_indices(index)
                    .into_iter()
                    .map(|ancestor| self.nodes[ancestor].declaration.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `name` transitively extends `ancestor`
    pub fn extends(&self, name: &str, ancestor: &str) -> bool {
        self.index
            .get(name)
            .is_some_and(|&index| self.is_descendant(index, ancestor))
    }

    /// All interfaces which transitively extend `marker`, in declaration order
    ///
    /// `marker` does not have to be a declared interface itself.
    pub fn descendants(&self, marker: &str) -> Vec<&InterfaceDeclaration> {
        (0..self.nodes.len())
            .filter(|&index| self.is_descendant(index, marker))
            .map(|index| &self.nodes[index].declaration)
            .collect()
    }

    /// Functions of all ancestors followed by the interface's own, each distinct signature once
    pub fn transitive_functions(&self, name: &str) -> Vec<FunctionSignature> {
        let Some(&index) = self.index.get(name) else {
            return Vec::new();
        };

        let mut lineage = self.ancestor_indices(index);
        lineage.reverse();
        lineage.push(index);

        let mut functions: Vec<FunctionSignature> = Vec::new();
        for node in lineage {
            for function in &self.nodes[node].declaration.functions {
                if !functions.contains(function) {
                    functions.push(function.clone());
                }
            }
        }
        functions
    }
}
