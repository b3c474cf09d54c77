//! Directory tree reconciliation.
//!
//! Resolved source roots are placed in a tree rooted at the import root.
//! Every resolved directory whose name matches the last component of its
//! package votes for the remaining package on its parent, and so on upward
//! while names keep matching. A top-down walk then decides which directories
//! need an explicit prefix: a child inherits its parent's prefix extended by
//! its own name, and only directories that disagree with what they would
//! inherit are kept.

use std::collections::BTreeMap;

use crate::core::WorkspacePath;
use crate::resolver::prefix::PrefixCalculator;
use crate::resolver::{most_common, SourceRoot};

#[derive(Debug)]
struct DirectoryNode {
    name: String,
    path: WorkspacePath,
    parent: Option<usize>,
    children: BTreeMap<String, usize>,
    forced: Option<String>,
    votes: BTreeMap<String, usize>,
}

impl DirectoryNode {
    fn new(name: String, path: WorkspacePath, parent: Option<usize>) -> Self {
        DirectoryNode {
            name,
            path,
            parent,
            children: BTreeMap::new(),
            forced: None,
            votes: BTreeMap::new(),
        }
    }
}

const ROOT: usize = 0;

/// Arena-backed directory tree of one import root.
#[derive(Debug)]
pub struct DirectoryTree {
    nodes: Vec<DirectoryNode>,
}

impl DirectoryTree {
    /// Create a tree holding only `root`.
    pub fn new(root: WorkspacePath) -> Self {
        let name = root.file_name().unwrap_or_default().to_string();
        DirectoryTree {
            nodes: vec![DirectoryNode::new(name, root, None)],
        }
    }

    /// Node for `directory`, creating it and any missing intermediate nodes.
    /// `None` when the directory is not under the root.
    fn node_for(&mut self, directory: &WorkspacePath) -> Option<usize> {
        let components: Vec<String> = directory
            .components_below(&self.nodes[ROOT].path)?
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut current = ROOT;
        for component in components {
            current = match self.nodes[current].children.get(&component) {
                Some(&child) => child,
                None => {
                    let path = self.nodes[current].path.join(&component);
                    let child = self.nodes.len();
                    self.nodes
                        .push(DirectoryNode::new(component.clone(), path, Some(current)));
                    self.nodes[current].children.insert(component, child);
                    child
                }
            };
        }
        Some(current)
    }

    /// Record a resolved source root: its directory gets the prefix forced,
    /// and its ancestors get votes while directory names match the package.
    pub fn add_source_root(&mut self, source_root: &SourceRoot) {
        let Some(node) = self.node_for(&source_root.directory) else {
            tracing::debug!("{} is outside {}", source_root.directory, self.nodes[ROOT].path);
            return;
        };
        self.nodes[node].forced = Some(source_root.package_prefix.clone());
        self.vote_upward(node, &source_root.package_prefix);
    }

    fn vote_upward(&mut self, mut node: usize, package: &str) {
        let mut remaining: Vec<&str> = if package.is_empty() {
            Vec::new()
        } else {
            package.split('.').collect()
        };

        while node != ROOT {
            match remaining.last() {
                Some(last) if *last == self.nodes[node].name => {}
                _ => break,
            }
            remaining.pop();
            let Some(parent) = self.nodes[node].parent else {
                break;
            };
            *self.nodes[parent]
                .votes
                .entry(remaining.join("."))
                .or_insert(0) += 1;
            node = parent;
        }
    }

    /// Walk the tree top-down and return the directories whose prefix differs
    /// from the one they would inherit.
    pub fn decide(&self, prefixes: &PrefixCalculator) -> Vec<SourceRoot> {
        let mut records = Vec::new();
        let mut stack: Vec<(usize, Option<String>)> = vec![(ROOT, None)];

        while let Some((idx, inherited)) = stack.pop() {
            let node = &self.nodes[idx];
            let effective = node
                .forced
                .clone()
                .or_else(|| {
                    most_common(&node.votes, &prefixes.prefix_of(&node.path)).map(str::to_string)
                })
                .or_else(|| inherited.clone());

            if let Some(prefix) = &effective {
                if inherited.as_ref() != Some(prefix) {
                    records.push(SourceRoot::new(node.path.clone(), prefix.clone()));
                }
            }

            for (name, &child) in node.children.iter().rev() {
                let child_inherited = effective.as_ref().map(|prefix| {
                    if prefix.is_empty() {
                        name.clone()
                    } else {
                        format!("{}.{}", prefix, name)
                    }
                });
                stack.push((child, child_inherited));
            }
        }
        records
    }
}

/// Minimal set of source roots for one import root.
///
/// When nothing is decided the import root itself is returned with its
/// default prefix, so every import root yields at least one record.
pub fn build_source_roots(
    import_root: &WorkspacePath,
    resolved: &[SourceRoot],
    prefixes: &PrefixCalculator,
) -> Vec<SourceRoot> {
    let mut tree = DirectoryTree::new(import_root.clone());
    for source_root in resolved {
        tree.add_source_root(source_root);
    }
    let records = tree.decide(prefixes);
    if records.is_empty() {
        return vec![SourceRoot::new(
            import_root.clone(),
            prefixes.prefix_of(import_root),
        )];
    }
    records
}
