use std::collections::{BTreeMap, HashSet};

use digen_config::{config::Naming, GeneratorConfig};

use crate::{
    errors::GraphError,
    implementation::{Call, FunctionImplementation, Statement},
    types::{Argument, FunctionScope, FunctionSignature, InjectableType},
};

/// How a node gets constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Returned by a provide function of the provider interface
    Provider,
    /// Built through the selected constructor of an injectable type
    Injectable,
    /// Nothing can build it, it has to be passed in
    Parameter,
}

/// A constructible (or required) type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    type_name: String,
    kind: NodeKind,
    constructor: FunctionSignature,
    edges: Vec<DependencyEdge>,
}
impl DependencyNode {
    fn provider(type_name: String, function: &FunctionSignature) -> Self {
        Self {
            type_name,
            kind: NodeKind::Provider,
            constructor: function.clone(),
            edges: Vec::new(),
        }
    }

    fn injectable(injectable: &InjectableType) -> Self {
        Self {
            type_name: injectable.type_name.clone(),
            kind: NodeKind::Injectable,
            constructor: injectable.constructor.clone(),
            edges: Vec::new(),
        }
    }

    fn parameter(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            kind: NodeKind::Parameter,
            constructor: FunctionSignature::empty(),
            edges: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn constructor(&self) -> &FunctionSignature {
        &self.constructor
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Type the generated functions return
    ///
    /// Provide functions keep their declared return type, e.g. `any APIClient`.
    pub fn return_type_name(&self) -> &str {
        match (self.kind, &self.constructor.return_type_name) {
            (NodeKind::Provider, Some(declared)) => declared,
            _ => &self.type_name,
        }
    }
}

/// A constructor argument pointing at the node which satisfies it
///
/// The target is referenced by type name, nodes never own each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyEdge {
    argument: Argument,
    target: String,
    target_kind: NodeKind,
}
impl DependencyEdge {
    pub fn argument(&self) -> &Argument {
        &self.argument
    }

    pub fn target_type_name(&self) -> &str {
        &self.target
    }

    pub fn target_kind(&self) -> NodeKind {
        self.target_kind
    }

    pub fn is_parameter(&self) -> bool {
        self.target_kind == NodeKind::Parameter
    }
}

/// Everything one provider interface can construct, and what it needs for that
///
/// Built once per provider interface and not modified afterwards.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, DependencyNode>,
    /// Types no declaration can build
    parameters: BTreeMap<String, DependencyNode>,
    naming: Naming,
}
impl DependencyGraph {
    /// Builds and links the graph of one provider interface
    ///
    /// `provider_functions` are the provide functions of the interface including inherited ones.
    /// A provide function replaces an injectable of the same type.
    pub fn new(
        provider_functions: &[FunctionSignature],
        injectables: &[InjectableType],
        config: &GeneratorConfig,
    ) -> Result<Self, GraphError> {
        let mut nodes = BTreeMap::new();

        for injectable in injectables {
            nodes.insert(
                injectable.type_name.clone(),
                DependencyNode::injectable(injectable),
            );
        }

        for function in provider_functions {
            let Some(return_type) = &function.return_type_name else {
                tracing::debug!("Skipping provide function {} without return type", function.name);
                continue;
            };

            let type_name = config.bare_type_name(return_type).to_string();
            let node = DependencyNode::provider(type_name.clone(), function);
            if let Some(replaced) = nodes.insert(type_name, node) {
                tracing::debug!(
                    "{} is provided by {}, replacing its {:?} node",
                    replaced.type_name,
                    function.name,
                    replaced.kind
                );
            }
        }

        let mut graph = Self {
            nodes,
            parameters: BTreeMap::new(),
            naming: config.naming.clone(),
        };

        // Edges of a node follow its argument order, the order nodes are linked in does not matter
        let linking: Vec<(String, Vec<Argument>)> = graph
            .nodes
            .values()
            .map(|node| (node.type_name.clone(), node.constructor.arguments.clone()))
            .collect();

        for (type_name, arguments) in linking {
            for argument in arguments {
                let edge = graph.link(argument, config);
                graph.add(&type_name, edge)?;
            }
        }

        tracing::debug!(
            "Built dependency graph with {} nodes and {} parameters",
            graph.nodes.len(),
            graph.parameters.len()
        );

        Ok(graph)
    }

    /// Points an argument at the node of its type, or at a parameter if there is none
    fn link(&mut self, argument: Argument, config: &GeneratorConfig) -> DependencyEdge {
        let found = self
            .nodes
            .get(&argument.type_name)
            .or_else(|| self.nodes.get(config.bare_type_name(&argument.type_name)));

        if let Some(node) = found {
            return DependencyEdge {
                target: node.type_name.clone(),
                target_kind: node.kind,
                argument,
            };
        }

        let target = argument.type_name.clone();
        if !self.parameters.contains_key(&target) {
            tracing::trace!("{target} can not be constructed, it becomes a parameter");
        }
        self.parameters
            .entry(target.clone())
            .or_insert_with(|| DependencyNode::parameter(&target));

        DependencyEdge {
            argument,
            target,
            target_kind: NodeKind::Parameter,
        }
    }

    /// Adds an edge to the node of `type_name`
    ///
    /// Fails without modifying the graph if the edge would close a cycle.
    fn add(&mut self, type_name: &str, edge: DependencyEdge) -> Result<(), GraphError> {
        if edge.target == type_name || self.reachable_type_names(&edge.target).contains(type_name) {
            return Err(GraphError::CircularDependency {
                from: type_name.to_string(),
                to: edge.target,
            });
        }

        if let Some(node) = self.nodes.get_mut(type_name) {
            node.edges.push(edge);
        }
        Ok(())
    }

    /// Type names reachable by following edges, starting at (but excluding) `type_name`
    fn reachable_type_names(&self, type_name: &str) -> HashSet<&str> {
        let mut reachable = HashSet::new();
        let mut pending = vec![type_name];
        while let Some(current) = pending.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            for edge in &node.edges {
                if reachable.insert(edge.target.as_str()) {
                    pending.push(edge.target.as_str());
                }
            }
        }
        reachable
    }

    /// Constructible type names, sorted
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.nodes.values()
    }

    pub fn node(&self, type_name: &str) -> Option<&DependencyNode> {
        self.nodes.get(type_name)
    }

    /// The parameter node synthesized for `type_name`, if any argument needed one
    pub fn parameter(&self, type_name: &str) -> Option<&DependencyNode> {
        self.parameters.get(type_name)
    }

    pub fn parameter_type_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    /// Everything `type_name` depends on, directly or indirectly
    ///
    /// Depth first, each edge followed by the edges of its target. Every edge appears once.
    pub fn transitive_edges(&self, type_name: &str) -> Vec<&DependencyEdge> {
        let mut edges = Vec::new();
        collect(self, type_name, &mut edges);
        return edges;

        fn collect<'a>(
            graph: &'a DependencyGraph,
            type_name: &str,
            edges: &mut Vec<&'a DependencyEdge>,
        ) {
            let Some(node) = graph.nodes.get(type_name) else {
                return;
            };
            for edge in &node.edges {
                // A known edge already brought its target's edges along
                if edges.contains(&edge) {
                    continue;
                }
                edges.push(edge);
                collect(graph, &edge.target, edges);
            }
        }
    }

    /// `resolve<Type>`, taking every parameter `type_name` needs
    pub fn resolve_signature(&self, type_name: &str) -> FunctionSignature {
        let mut arguments: Vec<Argument> = Vec::new();
        for edge in self.transitive_edges(type_name) {
            if edge.is_parameter() && !arguments.contains(&edge.argument) {
                arguments.push(edge.argument.clone());
            }
        }

        FunctionSignature::new(
            FunctionScope::Instance,
            self.naming.resolve_function(type_name),
            arguments,
            Some(self.return_type_name(type_name).to_string()),
        )
    }

    /// `intercept<Type>`, taking a builder callback
    pub fn intercept_signature(&self, type_name: &str) -> FunctionSignature {
        let return_type = self.return_type_name(type_name);
        FunctionSignature::new(
            FunctionScope::Instance,
            self.naming.intercept_function(type_name),
            vec![Argument::with_binding(
                "_",
                self.naming.builder_name.as_str(),
                format!("() -> {return_type}"),
            )],
            Some(return_type.to_string()),
        )
    }

    /// Constructs the type through its intercept function
    ///
    /// Direct dependencies are resolved inside the builder callback, so an interceptor which
    /// never calls it builds nothing. Returns `None` if `type_name` is not constructible in this
    /// graph.
    pub fn resolve_implementation(&self, type_name: &str) -> Option<FunctionImplementation> {
        let node = self.nodes.get(type_name)?;

        let mut build: Vec<Statement> = node
            .edges
            .iter()
            .filter(|edge| !edge.is_parameter())
            .map(|edge| {
                let dependency = self.resolve_signature(&edge.target);
                Statement::Bind {
                    name: edge.argument.binding_name().to_string(),
                    call: Call::function(dependency.name, dependency.arguments),
                }
            })
            .collect();

        let arguments = node.constructor.arguments.clone();
        let construct = match node.kind {
            NodeKind::Provider => Call::function(node.constructor.name.as_str(), arguments),
            NodeKind::Injectable | NodeKind::Parameter => {
                Call::member(node.constructor.name.as_str(), arguments)
            }
        };

        build.push(Statement::Return(construct));

        Some(FunctionImplementation {
            signature: self.resolve_signature(type_name),
            body: vec![Statement::ReturnIntercepted {
                interceptor: self.naming.intercept_function(type_name),
                body: build,
            }],
        })
    }

    /// Returns whatever the builder callback builds
    pub fn intercept_implementation(&self, type_name: &str) -> FunctionImplementation {
        FunctionImplementation {
            signature: self.intercept_signature(type_name),
            body: vec![Statement::Return(Call::function(
                self.naming.builder_name.as_str(),
                vec![],
            ))],
        }
    }

    fn return_type_name<'a>(&'a self, type_name: &'a str) -> &'a str {
        self.nodes
            .get(type_name)
            .map(DependencyNode::return_type_name)
            .unwrap_or(type_name)
    }
}
