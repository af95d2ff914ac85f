//! Property tests over generated dependency structures

use std::collections::HashSet;

use digen::{
    dependency_graph::DependencyGraph,
    errors::GraphError,
    topological::{linearize, Node},
    types::{Argument, FunctionScope, FunctionSignature, InjectableType},
};
use digen_config::GeneratorConfig;
use proptest::prelude::*;

fn type_name(index: usize) -> String {
    format!("T{index}")
}

fn injectable(index: usize, dependencies: &[String]) -> InjectableType {
    InjectableType {
        type_name: type_name(index),
        constructor: FunctionSignature::new(
            FunctionScope::Instance,
            "init",
            dependencies
                .iter()
                .map(|dependency| Argument::new(dependency.to_lowercase(), dependency.as_str()))
                .collect(),
            None,
        ),
    }
}

/// Dependencies of every type only point at types with a lower index, plus an optional parameter
fn acyclic(masks: &[Vec<bool>], parameters: &[bool]) -> Vec<InjectableType> {
    masks
        .iter()
        .enumerate()
        .map(|(index, mask)| {
            let mut dependencies: Vec<String> = (0..index)
                .filter(|&dependency| mask.get(dependency).copied().unwrap_or(false))
                .map(type_name)
                .collect();
            if parameters.get(index).copied().unwrap_or(false) {
                dependencies.push(format!("Param{index}"));
            }
            injectable(index, &dependencies)
        })
        .collect()
}

proptest! {
    #[test]
    fn acyclic_declarations_build_with_unique_nodes(
        masks in prop::collection::vec(prop::collection::vec(any::<bool>(), 0..8), 1..8),
        parameters in prop::collection::vec(any::<bool>(), 0..8),
    ) {
        let injectables = acyclic(&masks, &parameters);
        let graph = DependencyGraph::new(&[], &injectables, &GeneratorConfig::default());
        prop_assert!(graph.is_ok());
        let graph = graph.unwrap();

        let names: Vec<&str> = graph.type_names().collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        prop_assert_eq!(names.len(), masks.len());
        prop_assert_eq!(unique.len(), names.len());

        for node in graph.nodes() {
            for edge in node.edges() {
                prop_assert!(
                    graph.node(edge.target_type_name()).is_some()
                        || graph.parameter(edge.target_type_name()).is_some()
                );
            }

            // Resolve functions ask for every parameter once
            let signature = graph.resolve_signature(node.type_name());
            let arguments: HashSet<&Argument> = signature.arguments.iter().collect();
            prop_assert_eq!(arguments.len(), signature.arguments.len());
            for argument in &signature.arguments {
                prop_assert!(graph.parameter(&argument.type_name).is_some());
            }
        }
    }

    #[test]
    fn cyclic_declarations_fail_on_adjacent_members(
        length in 1usize..8,
        offset in 0usize..8,
    ) {
        // A ring T0 -> T1 -> ... -> T0, rotated so the cycle is not always closed by the same pair
        let injectables: Vec<InjectableType> = (0..length)
            .map(|index| (index + offset) % length)
            .map(|index| injectable(index, &[type_name((index + 1) % length)]))
            .collect();

        let result = DependencyGraph::new(&[], &injectables, &GeneratorConfig::default());

        let Err(GraphError::CircularDependency { from, to }) = result else {
            return Err(TestCaseError::fail("ring of dependencies was accepted"));
        };
        let from_index: usize = from[1..].parse().unwrap();
        prop_assert_eq!(to, type_name((from_index + 1) % length));
    }

    #[test]
    fn linearized_elements_precede_their_dependencies(
        masks in prop::collection::vec(prop::collection::vec(any::<bool>(), 0..8), 0..8),
    ) {
        let nodes: Vec<Node<usize>> = masks
            .iter()
            .enumerate()
            .map(|(index, mask)| {
                let dependencies = (0..index)
                    .filter(|&dependency| mask.get(dependency).copied().unwrap_or(false))
                    .collect();
                Node::new(index, dependencies)
            })
            .collect();

        let order = linearize(nodes.clone()).unwrap();
        prop_assert_eq!(order.len(), nodes.len());

        let position = |element: usize| order.iter().position(|&e| e == element);
        for node in &nodes {
            for &dependency in &node.dependencies {
                prop_assert!(position(node.element) < position(dependency));
            }
        }
    }
}
