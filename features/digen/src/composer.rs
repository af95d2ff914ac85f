use std::collections::{BTreeMap, HashSet};

use digen_config::{config::Naming, GeneratorConfig};

use crate::{
    declarations::Declarations,
    dependency_graph::DependencyGraph,
    errors::GenerateError,
    implementation::FunctionImplementation,
    inheritance::InterfaceTree,
    topological::{linearize, Node},
    types::{FunctionSignature, ProviderInterface},
};

/// Builds one resolver per provider interface
pub struct ResolverComposer<'a> {
    config: &'a GeneratorConfig,
}
impl<'a> ResolverComposer<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Builds the resolvers of all provider interfaces in `declarations`
    ///
    /// Resolvers are ordered so that every resolver comes after the resolvers it inherits from,
    /// unrelated resolvers keep declaration order. The first error aborts composition.
    pub fn compose(&self, declarations: &Declarations) -> Result<Resolvers, GenerateError> {
        let injectables = declarations.injectables(&self.config.markers.injectable)?;
        let tree = InterfaceTree::new(&declarations.interfaces)?;

        let providers: Vec<ProviderInterface> = tree
            .descendants(&self.config.markers.provider)
            .into_iter()
            .map(|declaration| ProviderInterface {
                name: declaration.name.clone(),
                own_functions: declaration
                    .functions
                    .iter()
                    .filter(|function| self.is_provide_function(function))
                    .cloned()
                    .collect(),
                parent_interface_names: tree
                    .parents(&declaration.name)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect();

        tracing::debug!(
            "Composing {} resolvers from {} injectables",
            providers.len(),
            injectables.len()
        );

        let provider_names: HashSet<String> = providers.iter().map(|p| p.name.clone()).collect();
        let provider_ancestors = |name: &str| -> Vec<String> {
            tree.ancestors(name)
                .into_iter()
                .filter(|ancestor| provider_names.contains(*ancestor))
                .map(str::to_string)
                .collect()
        };

        // Reversed input keeps unrelated providers in declaration order once the result is reversed
        let nodes = providers
            .iter()
            .rev()
            .map(|provider| Node::new(provider.name.clone(), provider_ancestors(&provider.name)))
            .collect();
        let mut order = linearize(nodes)?;
        order.reverse();

        let mut by_name: BTreeMap<String, ProviderInterface> = providers
            .into_iter()
            .map(|provider| (provider.name.clone(), provider))
            .collect();

        let mut resolvers: Vec<ResolverDescriptor> = Vec::with_capacity(order.len());
        for name in &order {
            let Some(provider) = by_name.remove(name) else {
                continue;
            };

            let functions: Vec<FunctionSignature> = tree
                .transitive_functions(name)
                .into_iter()
                .filter(|function| self.is_provide_function(function))
                .collect();

            let graph = DependencyGraph::new(&functions, &injectables, self.config).map_err(
                |error| GenerateError::Graph {
                    provider: name.clone(),
                    error,
                },
            )?;

            tracing::debug!(
                "Built graph for {name} with {} constructible types",
                graph.type_names().count()
            );

            resolvers.push(ResolverDescriptor {
                provider,
                graph,
                parents: Vec::new(),
            });
        }

        // Attach parents once all resolvers exist
        let index: BTreeMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(position, name)| (name.as_str(), position))
            .collect();
        let parents: Vec<Vec<usize>> = order
            .iter()
            .map(|name| {
                provider_ancestors(name)
                    .iter()
                    .filter_map(|ancestor| index.get(ancestor.as_str()).copied())
                    .collect()
            })
            .collect();
        for (resolver, parents) in resolvers.iter_mut().zip(parents) {
            resolver.parents = parents;
        }

        Ok(Resolvers {
            resolvers,
            naming: self.config.naming.clone(),
        })
    }

    fn is_provide_function(&self, function: &FunctionSignature) -> bool {
        function.name.starts_with(&self.config.naming.provide_prefix)
            && function.return_type_name.is_some()
    }
}

/// A provider interface, its dependency graph and the resolvers it inherits from
#[derive(Debug)]
pub struct ResolverDescriptor {
    provider: ProviderInterface,
    graph: DependencyGraph,
    /// Indices of every resolver whose provider interface is an ancestor of this one
    parents: Vec<usize>,
}

/// All resolvers of a generator run
///
/// Resolvers reference their parents by index, there is no ownership between them.
#[derive(Debug)]
pub struct Resolvers {
    resolvers: Vec<ResolverDescriptor>,
    naming: Naming,
}
impl Resolvers {
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Parents before children
    pub fn iter(&self) -> impl Iterator<Item = Resolver<'_>> {
        (0..self.resolvers.len()).map(|index| Resolver { set: self, index })
    }

    pub fn get(&self, provider_name: &str) -> Option<Resolver<'_>> {
        self.resolvers
            .iter()
            .position(|resolver| resolver.provider.name == provider_name)
            .map(|index| Resolver { set: self, index })
    }

    /// What the emitter needs of every resolver
    pub fn outputs(&self) -> Vec<ResolverOutput> {
        self.iter().map(|resolver| resolver.output()).collect()
    }
}

/// A resolver within its [Resolvers]
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    set: &'a Resolvers,
    index: usize,
}
impl<'a> Resolver<'a> {
    fn descriptor(&self) -> &'a ResolverDescriptor {
        &self.set.resolvers[self.index]
    }

    pub fn name(&self) -> String {
        self.set.naming.resolver_name(&self.descriptor().provider.name)
    }

    pub fn provider_name(&self) -> &'a str {
        &self.descriptor().provider.name
    }

    pub fn provider(&self) -> &'a ProviderInterface {
        &self.descriptor().provider
    }

    pub fn graph(&self) -> &'a DependencyGraph {
        &self.descriptor().graph
    }

    pub fn parents(&self) -> Vec<Resolver<'a>> {
        self.descriptor()
            .parents
            .iter()
            .map(|&index| Resolver {
                set: self.set,
                index,
            })
            .collect()
    }

    /// Parents, their parents and so on, each once
    pub fn transitive_parents(&self) -> Vec<Resolver<'a>> {
        let mut seen: Vec<usize> = Vec::new();
        let mut pending: Vec<usize> = self.descriptor().parents.clone();
        while let Some(index) = pending.pop() {
            if seen.contains(&index) {
                continue;
            }
            seen.push(index);
            pending.extend(self.set.resolvers[index].parents.iter().copied());
        }
        seen.sort_unstable();
        seen.into_iter()
            .map(|index| Resolver {
                set: self.set,
                index,
            })
            .collect()
    }

    /// Resolvers of the provider interfaces this one directly extends
    pub fn inherited_resolver_names(&self) -> Vec<String> {
        self.provider()
            .parent_interface_names
            .iter()
            .filter(|name| self.set.get(name).is_some())
            .map(|name| self.set.naming.resolver_name(name))
            .collect()
    }

    fn all_resolve_signatures(&self) -> Vec<FunctionSignature> {
        let graph = self.graph();
        graph
            .type_names()
            .map(|type_name| graph.resolve_signature(type_name))
            .collect()
    }

    /// Type names with a resolve signature no parent declares
    fn resolvable_type_names(&self) -> Vec<&'a str> {
        let inherited: HashSet<FunctionSignature> = self
            .transitive_parents()
            .iter()
            .flat_map(Resolver::all_resolve_signatures)
            .collect();

        let graph = self.graph();
        graph
            .type_names()
            .filter(|type_name| {
                let declared = inherited.contains(&graph.resolve_signature(type_name));
                if declared {
                    tracing::trace!(
                        "{} inherits resolve function for {type_name}",
                        self.provider_name()
                    );
                }
                !declared
            })
            .collect()
    }

    /// Type names no parent makes interceptable
    fn interceptable_type_names(&self) -> Vec<&'a str> {
        let inherited: HashSet<&str> = self
            .transitive_parents()
            .iter()
            .flat_map(|parent| parent.graph().type_names())
            .collect();

        self.graph()
            .type_names()
            .filter(|type_name| !inherited.contains(type_name))
            .collect()
    }

    pub fn resolve_signatures(&self) -> Vec<FunctionSignature> {
        let graph = self.graph();
        self.resolvable_type_names()
            .into_iter()
            .map(|type_name| graph.resolve_signature(type_name))
            .collect()
    }

    pub fn intercept_signatures(&self) -> Vec<FunctionSignature> {
        let graph = self.graph();
        self.interceptable_type_names()
            .into_iter()
            .map(|type_name| graph.intercept_signature(type_name))
            .collect()
    }

    pub fn resolve_implementations(&self) -> Vec<FunctionImplementation> {
        let graph = self.graph();
        self.resolvable_type_names()
            .into_iter()
            .filter_map(|type_name| graph.resolve_implementation(type_name))
            .collect()
    }

    pub fn intercept_implementations(&self) -> Vec<FunctionImplementation> {
        let graph = self.graph();
        self.interceptable_type_names()
            .into_iter()
            .map(|type_name| graph.intercept_implementation(type_name))
            .collect()
    }

    pub fn output(&self) -> ResolverOutput {
        ResolverOutput {
            name: self.name(),
            provider_name: self.provider_name().to_string(),
            inherited_resolver_names: self.inherited_resolver_names(),
            resolve_signatures: self.resolve_signatures(),
            intercept_signatures: self.intercept_signatures(),
            resolve_implementations: self.resolve_implementations(),
            intercept_implementations: self.intercept_implementations(),
        }
    }
}

/// The four ordered member lists of one resolver, ready for emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOutput {
    pub name: String,
    pub provider_name: String,
    pub inherited_resolver_names: Vec<String>,
    pub resolve_signatures: Vec<FunctionSignature>,
    pub intercept_signatures: Vec<FunctionSignature>,
    pub resolve_implementations: Vec<FunctionImplementation>,
    pub intercept_implementations: Vec<FunctionImplementation>,
}
