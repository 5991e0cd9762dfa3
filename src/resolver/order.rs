// src/resolver/order.rs

//! Install ordering
//!
//! Dependencies must be installed before their dependents, but Debian
//! dependency graphs routinely contain cycles (libc6 and libgcc-s1, perl and
//! its modules). Packages are therefore grouped into strongly connected
//! components first; the component graph is acyclic and gets a plain
//! topological sort. Members of a cycle are emitted alphabetically.
//!
//! Only `name` and `requires` are consulted. Requirements naming a package
//! outside the set are ignored here.

use crate::error::{Error, Result};
use crate::package::PackageRecord;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Name-indexed dependency graph; node indices follow alphabetical order
struct DependencyGraph<'p> {
    nodes: Vec<&'p PackageRecord>,
    /// Sorted, deduplicated dependency indices per node
    edges: Vec<Vec<usize>>,
}

impl<'p> DependencyGraph<'p> {
    fn build(packages: &'p [PackageRecord]) -> Result<Self> {
        let mut nodes: Vec<&PackageRecord> = packages.iter().collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));

        if let Some(pair) = nodes.windows(2).find(|pair| pair[0].name == pair[1].name) {
            return Err(Error::DuplicatePackage(pair[0].name.clone()));
        }

        let index: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(idx, pkg)| (pkg.name.as_str(), idx))
            .collect();

        let edges = nodes
            .iter()
            .map(|pkg| {
                let mut deps: Vec<usize> = pkg
                    .requires
                    .iter()
                    .filter_map(|dep| index.get(dep.as_str()).copied())
                    .collect();
                deps.sort_unstable();
                deps.dedup();
                deps
            })
            .collect();

        Ok(Self { nodes, edges })
    }

    /// Tarjan's algorithm with an explicit work stack
    ///
    /// Components come out dependencies-first, each listing node indices.
    fn strongly_connected_components(&self) -> Vec<Vec<usize>> {
        const UNVISITED: usize = usize::MAX;

        let n = self.nodes.len();
        let mut index = vec![UNVISITED; n];
        let mut lowlink = vec![0; n];
        let mut on_stack = vec![false; n];
        let mut stack: Vec<usize> = Vec::new();
        let mut components: Vec<Vec<usize>> = Vec::new();
        let mut next_index = 0;

        // (node, position of the next neighbor to visit)
        let mut work: Vec<(usize, usize)> = Vec::new();

        for root in 0..n {
            if index[root] != UNVISITED {
                continue;
            }

            index[root] = next_index;
            lowlink[root] = next_index;
            next_index += 1;
            stack.push(root);
            on_stack[root] = true;
            work.push((root, 0));

            while let Some(&(node, child)) = work.last() {
                if let Some(&neighbor) = self.edges[node].get(child) {
                    if let Some(frame) = work.last_mut() {
                        frame.1 += 1;
                    }

                    if index[neighbor] == UNVISITED {
                        index[neighbor] = next_index;
                        lowlink[neighbor] = next_index;
                        next_index += 1;
                        stack.push(neighbor);
                        on_stack[neighbor] = true;
                        work.push((neighbor, 0));
                    } else if on_stack[neighbor] {
                        lowlink[node] = lowlink[node].min(index[neighbor]);
                    }
                    continue;
                }

                // All neighbors done
                work.pop();
                if let Some(&(parent, _)) = work.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[node]);
                }

                if lowlink[node] == index[node] {
                    let mut component = Vec::new();
                    while let Some(member) = stack.pop() {
                        on_stack[member] = false;
                        component.push(member);
                        if member == node {
                            break;
                        }
                    }
                    component.sort_unstable();
                    components.push(component);
                }
            }
        }

        components
    }
}

/// Orders a resolved package set for installation
pub struct InstallOrderSorter;

impl InstallOrderSorter {
    /// Return `packages` with every dependency ahead of its dependents
    ///
    /// Fails only when two records share a name.
    pub fn order(packages: &[PackageRecord]) -> Result<Vec<PackageRecord>> {
        let graph = DependencyGraph::build(packages)?;
        let components = graph.strongly_connected_components();

        let mut ordered = Vec::with_capacity(packages.len());
        for component in Self::sort_components(&graph, &components) {
            ordered.extend(components[component].iter().map(|&node| graph.nodes[node].clone()));
        }

        assert_eq!(
            ordered.len(),
            packages.len(),
            "install order lost packages: component graph is inconsistent"
        );

        debug!(
            "Install order computed for {} packages in {} components",
            ordered.len(),
            components.len()
        );
        Ok(ordered)
    }

    /// Strongly connected components in install order, members sorted by name
    pub fn components(packages: &[PackageRecord]) -> Result<Vec<Vec<String>>> {
        let graph = DependencyGraph::build(packages)?;
        let components = graph.strongly_connected_components();

        Ok(Self::sort_components(&graph, &components)
            .into_iter()
            .map(|c| {
                components[c]
                    .iter()
                    .map(|&node| graph.nodes[node].name.clone())
                    .collect()
            })
            .collect())
    }

    /// Names of packages that take part in a dependency cycle, one group per cycle
    pub fn cycles(packages: &[PackageRecord]) -> Result<Vec<Vec<String>>> {
        Ok(Self::components(packages)?
            .into_iter()
            .filter(|members| members.len() > 1)
            .collect())
    }

    /// Kahn's algorithm over the condensation graph
    ///
    /// The ready set always yields the lowest component index first.
    fn sort_components(graph: &DependencyGraph<'_>, components: &[Vec<usize>]) -> Vec<usize> {
        let mut component_of = vec![0; graph.nodes.len()];
        for (c, members) in components.iter().enumerate() {
            for &node in members {
                component_of[node] = c;
            }
            if members.len() > 1 {
                let names: Vec<&str> = members.iter().map(|&n| graph.nodes[n].name.as_str()).collect();
                debug!("Dependency cycle: {}", names.join(", "));
            }
        }

        // dependency component -> dependent components
        let mut successors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); components.len()];
        for (node, deps) in graph.edges.iter().enumerate() {
            for &dep in deps {
                let (from, to) = (component_of[dep], component_of[node]);
                if from != to {
                    successors[from].insert(to);
                }
            }
        }

        let mut in_degree = vec![0usize; components.len()];
        for targets in &successors {
            for &to in targets {
                in_degree[to] += 1;
            }
        }

        let mut ready: BTreeSet<usize> = (0..components.len()).filter(|&c| in_degree[c] == 0).collect();
        let mut order = Vec::with_capacity(components.len());

        while let Some(c) = ready.pop_first() {
            order.push(c);
            for &to in &successors[c] {
                in_degree[to] -= 1;
                if in_degree[to] == 0 {
                    ready.insert(to);
                }
            }
        }

        order
    }
}
