//! Dependency checks across the whole task set.
//!
//! Dependency lists are free-form ids and may point into other groups, so
//! nothing guarantees they form a DAG. The graph is rebuilt on demand and
//! cycles are reported instead of assumed away.

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::task::TaskGroup;
use crate::error::Diagnostic;

/// Result of checking every task's dependency list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyReport {
    /// `(task id, missing dependency id)` pairs.
    pub missing: Vec<(String, String)>,
    /// Each cycle as the sorted ids of its members.
    pub cycles: Vec<Vec<String>>,
}

impl DependencyReport {
    pub fn is_acyclic(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Task ids that sit on at least one cycle.
    pub fn cyclic_tasks(&self) -> BTreeSet<&str> {
        self.cycles
            .iter()
            .flat_map(|c| c.iter().map(String::as_str))
            .collect()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let missing = self.missing.iter().map(|(task, dep)| {
            Diagnostic::warning(format!("depends on unknown task '{dep}'")).for_task(task.clone())
        });
        let cycles = self
            .cycles
            .iter()
            .map(|c| Diagnostic::warning(format!("dependency cycle: {}", c.join(" -> "))));
        missing.chain(cycles).collect()
    }
}

/// Build the dependency graph over all groups and report unknown ids and cycles.
///
/// Task ids are only unique within a group; tasks sharing an id across groups
/// are treated as one node.
pub fn check_dependencies(groups: &[TaskGroup]) -> DependencyReport {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();

    for task in groups.iter().flat_map(|g| g.tasks.iter()) {
        nodes
            .entry(task.id.as_str())
            .or_insert_with(|| graph.add_node(task.id.as_str()));
    }

    let mut report = DependencyReport::default();
    for task in groups.iter().flat_map(|g| g.tasks.iter()) {
        let to = nodes[task.id.as_str()];
        for dep in &task.dependencies {
            match nodes.get(dep.as_str()) {
                // Edge direction: prerequisite -> dependent
                Some(&from) => {
                    graph.update_edge(from, to, ());
                }
                None => report.missing.push((task.id.clone(), dep.clone())),
            }
        }
    }

    for component in tarjan_scc(&graph) {
        let is_cycle = component.len() > 1
            || component
                .first()
                .is_some_and(|&n| graph.find_edge(n, n).is_some());
        if is_cycle {
            let mut ids: Vec<String> = component.iter().map(|&n| graph[n].to_string()).collect();
            ids.sort();
            tracing::warn!(members = ?ids, "dependency cycle detected");
            report.cycles.push(ids);
        }
    }
    report.cycles.sort();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use chrono::{TimeZone, Utc};

    fn task(id: &str, deps: &[&str]) -> Task {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Task::new(id, id, t, t).with_dependencies(deps.iter().copied())
    }

    #[test]
    fn acyclic_chain_across_groups() {
        let groups = vec![
            TaskGroup::new("g1", "G1").with_tasks(vec![task("a", &[]), task("b", &["a"])]),
            TaskGroup::new("g2", "G2").with_tasks(vec![task("c", &["b"])]),
        ];
        let report = check_dependencies(&groups);
        assert!(report.is_acyclic());
        assert!(report.missing.is_empty());
    }

    #[test]
    fn reports_cycles_and_self_loops() {
        let groups = vec![
            TaskGroup::new("g1", "G1").with_tasks(vec![task("a", &["c"]), task("b", &["a"])]),
            TaskGroup::new("g2", "G2").with_tasks(vec![task("c", &["b"]), task("d", &["d"])]),
        ];
        let report = check_dependencies(&groups);
        assert_eq!(
            report.cycles,
            vec![
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
                vec!["d".to_string()],
            ]
        );
        assert!(report.cyclic_tasks().contains("d"));
        assert_eq!(report.diagnostics().len(), 2);
    }

    #[test]
    fn reports_unknown_targets() {
        let groups = vec![TaskGroup::new("g", "G").with_tasks(vec![task("a", &["ghost"])])];
        let report = check_dependencies(&groups);
        assert_eq!(report.missing, vec![("a".to_string(), "ghost".to_string())]);
        assert!(report.diagnostics()[0].to_string().contains("ghost"));
    }
}
