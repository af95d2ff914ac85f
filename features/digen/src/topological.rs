//! Ordering of arbitrary elements by their dependencies.
//!
//! Elements are removed one by one, always taking the first element nothing else depends on
//! anymore. The result therefore lists every element before its dependencies; reverse it to
//! get an order in which dependencies come first.

use crate::errors::LinearizerError;

/// An element together with the elements it depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<T> {
    pub element: T,
    pub dependencies: Vec<T>,
}
impl<T> Node<T> {
    pub fn new(element: T, dependencies: Vec<T>) -> Self {
        Self {
            element,
            dependencies,
        }
    }
}

/// [linearize_by] using `==` as equivalence
pub fn linearize<T: Clone + PartialEq>(nodes: Vec<Node<T>>) -> Result<Vec<T>, LinearizerError> {
    linearize_by(nodes, |a, b| a == b)
}

/// Orders `nodes` so that every element precedes the elements it depends on
///
/// Dependencies which are not among the nodes are ignored.
/// Returns [LinearizerError::InvalidGraph] if the nodes contain a cycle.
pub fn linearize_by<T, F>(nodes: Vec<Node<T>>, is_equivalent: F) -> Result<Vec<T>, LinearizerError>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let mut entries: Vec<Entry<T>> = nodes
        .into_iter()
        .map(|node| Entry {
            element: node.element,
            dependencies: node.dependencies,
            dependents: Vec::new(),
        })
        .collect();

    for index in 0..entries.len() {
        let element = entries[index].element.clone();
        for dependency in entries[index].dependencies.clone() {
            if let Some(target) = position(&entries, &dependency, &is_equivalent) {
                entries[target].dependents.push(element.clone());
            }
        }
    }

    let mut result = Vec::with_capacity(entries.len());
    while !entries.is_empty() {
        let Some(index) = entries.iter().position(|entry| entry.dependents.is_empty()) else {
            return Err(LinearizerError::InvalidGraph);
        };

        let entry = entries.remove(index);
        for dependency in &entry.dependencies {
            if let Some(target) = position(&entries, dependency, &is_equivalent) {
                let dependents = &mut entries[target].dependents;
                if let Some(found) = dependents
                    .iter()
                    .position(|dependent| is_equivalent(dependent, &entry.element))
                {
                    dependents.remove(found);
                }
            }
        }

        result.push(entry.element);
    }

    Ok(result)
}

struct Entry<T> {
    element: T,
    dependencies: Vec<T>,
    /// Elements not yet removed which depend on this one
    dependents: Vec<T>,
}

fn position<T, F>(entries: &[Entry<T>], element: &T, is_equivalent: &F) -> Option<usize>
where
    F: Fn(&T, &T) -> bool,
{
    entries
        .iter()
        .position(|entry| is_equivalent(&entry.element, element))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(linearize::<u32>(vec![]), Ok(vec![]));
    }

    #[test]
    fn dependents_come_before_dependencies() {
        let nodes = vec![
            Node::new("c", vec![]),
            Node::new("a", vec!["b"]),
            Node::new("b", vec!["c"]),
        ];

        assert_eq!(linearize(nodes), Ok(vec!["a", "b", "c"]));
    }

    #[test]
    fn shared_dependency_waits_for_all_dependents() {
        let nodes = vec![
            Node::new(1, vec![]),
            Node::new(2, vec![1]),
            Node::new(3, vec![1, 2]),
        ];

        assert_eq!(linearize(nodes), Ok(vec![3, 2, 1]));
    }

    #[test]
    fn unknown_dependencies_are_ignored() {
        let nodes = vec![Node::new("a", vec!["outside"])];

        assert_eq!(linearize(nodes), Ok(vec!["a"]));
    }

    #[test]
    fn cycle_is_invalid() {
        let nodes = vec![
            Node::new("a", vec!["b"]),
            Node::new("b", vec!["c"]),
            Node::new("c", vec!["a"]),
            Node::new("d", vec![]),
        ];

        assert_eq!(linearize(nodes), Err(LinearizerError::InvalidGraph));
    }

    #[test]
    fn custom_equivalence() {
        let nodes = vec![
            Node::new("Alpha".to_string(), vec![]),
            Node::new("beta".to_string(), vec!["ALPHA".to_string()]),
        ];

        let ordered = linearize_by(nodes, |a, b| a.eq_ignore_ascii_case(b)).unwrap();
        assert_eq!(ordered, vec!["beta".to_string(), "Alpha".to_string()]);
    }
}
