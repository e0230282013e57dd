use itertools::Itertools;
use petgraph::{Graph, algo::tarjan_scc};

/// Finds groups of modules depending on each other.
///
/// `dependencies[i]` lists the module indices which module `i` requires. Each group is sorted.
pub fn find_cycles(dependencies: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut graph = Graph::<usize, ()>::new();
    let nodes = (0..dependencies.len())
        .map(|index| graph.add_node(index))
        .collect::<Vec<_>>();

    for (module, dependencies) in dependencies.iter().enumerate() {
        for &dependency in dependencies {
            graph.add_edge(nodes[module], nodes[dependency], ());
        }
    }

    tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .map(|component| component.into_iter().map(|node| graph[node]).sorted().collect())
        .sorted()
        .collect()
}
