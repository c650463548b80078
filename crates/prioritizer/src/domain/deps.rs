//! Dependency resolution and cycle detection.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};

use super::normalize::canonical_key;
use crate::entities::{CycleAnnotation, NormalizedTask};

/// Per-batch lookup from canonical reference to task position.
///
/// Resolution order is identifier, then title, then declared alias, so a
/// reference that names one task's id and another task's title always picks
/// the id.
struct ReferenceIndex {
    by_identifier: HashMap<String, usize>,
    by_title: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
}

impl ReferenceIndex {
    fn new(tasks: &[NormalizedTask]) -> Self {
        let mut by_identifier = HashMap::new();
        let mut by_title = HashMap::new();
        let mut by_alias = HashMap::new();

        for (idx, task) in tasks.iter().enumerate() {
            by_identifier
                .entry(canonical_key(&task.identifier))
                .or_insert(idx);
            by_title.entry(canonical_key(&task.title)).or_insert(idx);
            for alias in &task.aliases {
                by_alias.entry(alias.clone()).or_insert(idx);
            }
        }

        Self {
            by_identifier,
            by_title,
            by_alias,
        }
    }

    fn resolve(&self, reference: &str) -> Option<usize> {
        self.by_identifier
            .get(reference)
            .or_else(|| self.by_title.get(reference))
            .or_else(|| self.by_alias.get(reference))
            .copied()
    }
}

/// Directed graph over one batch: an edge `task -> dependency` for every
/// reference that resolves inside the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    /// `edges[i]` lists the positions task `i` depends on, in reference order
    edges: Vec<Vec<usize>>,
    /// `dependents[i]` counts the other tasks that depend on task `i`
    dependents: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Finished,
}

impl DependencyGraph {
    /// Resolve every dependency reference of the batch.
    ///
    /// References that match nothing are dropped: they may point at work
    /// outside the batch.
    pub fn build(tasks: &[NormalizedTask]) -> Self {
        let index = ReferenceIndex::new(tasks);
        let mut edges = vec![Vec::new(); tasks.len()];
        let mut dependents = vec![0; tasks.len()];

        for (idx, task) in tasks.iter().enumerate() {
            for reference in &task.dependency_refs {
                let Some(target) = index.resolve(reference) else {
                    debug!(task = %task.title, reference = %reference, "Unresolved dependency ignored");
                    continue;
                };

                if edges[idx].contains(&target) {
                    continue;
                }
                edges[idx].push(target);
                if target != idx {
                    dependents[target] += 1;
                }
            }
        }

        Self { edges, dependents }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Positions of the tasks that `task` depends on
    pub fn dependencies_of(&self, task: usize) -> &[usize] {
        self.edges.get(task).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of other tasks in the batch that directly depend on `task`
    pub fn dependent_count(&self, task: usize) -> usize {
        self.dependents.get(task).copied().unwrap_or(0)
    }

    /// Find circular dependency chains.
    ///
    /// Returns one slot per task; a task on at least one cycle gets the first
    /// cycle found through it. Depth-first search with an explicit stack so
    /// long chains cannot overflow the call stack.
    pub fn detect_cycles(&self, tasks: &[NormalizedTask]) -> Vec<Option<CycleAnnotation>> {
        let n = self.len();
        let mut state = vec![VisitState::Unvisited; n];
        let mut stack_index: Vec<Option<usize>> = vec![None; n];
        let mut annotations: Vec<Option<CycleAnnotation>> = vec![None; n];
        // (node, index of the next edge to follow)
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..n {
            if state[root] != VisitState::Unvisited {
                continue;
            }
            state[root] = VisitState::InProgress;
            stack_index[root] = Some(0);
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, next) = *frame;
                let Some(&target) = self.edges[node].get(next) else {
                    stack.pop();
                    stack_index[node] = None;
                    state[node] = VisitState::Finished;
                    continue;
                };
                frame.1 += 1;

                match state[target] {
                    VisitState::Unvisited => {
                        state[target] = VisitState::InProgress;
                        stack_index[target] = Some(stack.len());
                        stack.push((target, 0));
                    }
                    VisitState::InProgress => {
                        let Some(start) = stack_index[target] else {
                            continue;
                        };
                        let members: Vec<usize> =
                            stack[start..].iter().map(|&(member, _)| member).collect();
                        let mut path: Vec<String> =
                            members.iter().map(|&m| tasks[m].title.clone()).collect();
                        path.push(tasks[target].title.clone());

                        let cycle = CycleAnnotation::new(path);
                        warn!(cycle = %cycle, "Circular dependency detected");

                        for member in members {
                            if annotations[member].is_none() {
                                annotations[member] = Some(cycle.clone());
                            }
                        }
                    }
                    VisitState::Finished => {}
                }
            }
        }

        self.annotate_remaining(tasks, &mut annotations);
        annotations
    }

    /// Flag cycle members the DFS missed because their cycle closes through
    /// an already finished node.
    fn annotate_remaining(
        &self,
        tasks: &[NormalizedTask],
        annotations: &mut [Option<CycleAnnotation>],
    ) {
        let (component, sizes) = self.strongly_connected_components();

        for node in 0..self.len() {
            if annotations[node].is_some() {
                continue;
            }
            let on_cycle = sizes[component[node]] > 1 || self.edges[node].contains(&node);
            if !on_cycle {
                continue;
            }
            let Some(members) = self.cycle_through(node, &component) else {
                continue;
            };

            let mut path: Vec<String> = members.iter().map(|&m| tasks[m].title.clone()).collect();
            path.push(tasks[node].title.clone());
            let cycle = CycleAnnotation::new(path);
            warn!(cycle = %cycle, "Circular dependency detected");

            for member in members {
                if annotations[member].is_none() {
                    annotations[member] = Some(cycle.clone());
                }
            }
        }
    }

    /// Shortest cycle from `start` back to itself, staying inside its component.
    ///
    /// Returns the nodes along the cycle beginning with `start`, without the
    /// closing repeat.
    fn cycle_through(&self, start: usize, component: &[usize]) -> Option<Vec<usize>> {
        let mut parent: Vec<Option<usize>> = vec![None; self.len()];
        let mut seen = vec![false; self.len()];
        let mut queue = VecDeque::from([start]);
        seen[start] = true;

        while let Some(node) = queue.pop_front() {
            for &next in &self.edges[node] {
                if component[next] != component[start] {
                    continue;
                }
                if next == start {
                    let mut members = vec![node];
                    let mut current = node;
                    while let Some(prev) = parent[current] {
                        members.push(prev);
                        current = prev;
                    }
                    members.reverse();
                    return Some(members);
                }
                if !seen[next] {
                    seen[next] = true;
                    parent[next] = Some(node);
                    queue.push_back(next);
                }
            }
        }

        None
    }

    /// Tarjan's algorithm with an explicit call stack.
    ///
    /// Returns the component id of every node and the size of every component.
    fn strongly_connected_components(&self) -> (Vec<usize>, Vec<usize>) {
        let n = self.len();
        let mut index: Vec<Option<usize>> = vec![None; n];
        let mut lowlink = vec![0; n];
        let mut on_stack = vec![false; n];
        let mut component = vec![0; n];
        let mut sizes = Vec::new();
        let mut scc_stack: Vec<usize> = Vec::new();
        let mut call: Vec<(usize, usize)> = Vec::new();
        let mut counter = 0;

        for root in 0..n {
            if index[root].is_some() {
                continue;
            }
            index[root] = Some(counter);
            lowlink[root] = counter;
            counter += 1;
            scc_stack.push(root);
            on_stack[root] = true;
            call.push((root, 0));

            while let Some(frame) = call.last_mut() {
                let (node, next) = *frame;
                if let Some(&target) = self.edges[node].get(next) {
                    frame.1 += 1;
                    match index[target] {
                        None => {
                            index[target] = Some(counter);
                            lowlink[target] = counter;
                            counter += 1;
                            scc_stack.push(target);
                            on_stack[target] = true;
                            call.push((target, 0));
                        }
                        Some(target_index) if on_stack[target] => {
                            lowlink[node] = lowlink[node].min(target_index);
                        }
                        Some(_) => {}
                    }
                    continue;
                }

                call.pop();
                if let Some(&(parent, _)) = call.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[node]);
                }

                if Some(lowlink[node]) == index[node] {
                    let id = sizes.len();
                    let mut size = 0;
                    while let Some(member) = scc_stack.pop() {
                        on_stack[member] = false;
                        component[member] = id;
                        size += 1;
                        if member == node {
                            break;
                        }
                    }
                    sizes.push(size);
                }
            }
        }

        (component, sizes)
    }
}
