//! Navigation state for the document outline
//!
//! Index nodes are plain data. Which nodes are expanded and which one is
//! selected is kept here, keyed by the position path of a node, so the
//! same label appearing under two parents stays distinguishable.

use crate::law_model::IndexNode;
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

/// Position of a node in the outline, one child index per level
///
/// `[1, 0]` is the first child of the second top-level node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodePath {
    pub parts: Vec<usize>,
}

impl NodePath {
    /// Path from explicit indices
    pub fn new(parts: Vec<usize>) -> Self {
        Self { parts }
    }

    /// Path of a top-level node
    pub fn root(index: usize) -> Self {
        Self { parts: vec![index] }
    }

    /// Path of the `index`-th child of this node
    pub fn child(&self, index: usize) -> Self {
        let mut parts = self.parts.clone();
        parts.push(index);
        Self { parts }
    }

    /// Nesting depth (0 for top-level nodes)
    pub fn depth(&self) -> usize {
        self.parts.len().saturating_sub(1)
    }

    /// Resolve the path against a list of top-level nodes
    pub fn resolve<'a>(&self, roots: &'a [IndexNode]) -> Option<&'a IndexNode> {
        let (first, rest) = self.parts.split_first()?;
        let mut node = roots.get(*first)?;
        for &index in rest {
            node = node.children.get(index)?;
        }
        Some(node)
    }
}

/// Error parsing a node path such as `0.2.1`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid node path '{0}', expected dot-separated indices like 0.1")]
pub struct NodePathParseError(String);

impl FromStr for NodePath {
    type Err = NodePathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Option<Vec<usize>> = s.split('.').map(|part| part.parse::<usize>().ok()).collect();

        match parts {
            Some(parts) if !parts.is_empty() => Ok(Self { parts }),
            _ => Err(NodePathParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .parts
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

/// Expand and selection state of the outline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexTreeState {
    expanded: BTreeSet<NodePath>,
    selected: Option<NodePath>,
}

impl IndexTreeState {
    /// Fresh state: everything collapsed, nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.expanded.contains(path)
    }

    pub fn expand(&mut self, path: NodePath) {
        self.expanded.insert(path);
    }

    pub fn collapse(&mut self, path: &NodePath) {
        self.expanded.remove(path);
    }

    /// Flip the expand state of a node, returning the new state
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.clone());
            true
        }
    }

    /// Expand every node that has children
    pub fn expand_all(&mut self, roots: &[IndexNode]) {
        for (path, node) in walk(roots) {
            if node.has_children() {
                self.expanded.insert(path);
            }
        }
    }

    pub fn selected(&self) -> Option<&NodePath> {
        self.selected.as_ref()
    }

    /// Mark a node as selected
    ///
    /// Selecting never expands the node and never selects descendants.
    pub fn select(&mut self, path: NodePath) {
        self.selected = Some(path);
    }

    pub fn is_selected(&self, path: &NodePath) -> bool {
        self.selected.as_ref() == Some(path)
    }

    /// Nodes reachable through expanded ancestors, in outline order
    pub fn visible<'a>(&self, roots: &'a [IndexNode]) -> Vec<(NodePath, &'a IndexNode)> {
        let mut result = Vec::new();
        for (index, node) in roots.iter().enumerate() {
            self.collect_visible(NodePath::root(index), node, &mut result);
        }
        result
    }

    fn collect_visible<'a>(
        &self,
        path: NodePath,
        node: &'a IndexNode,
        result: &mut Vec<(NodePath, &'a IndexNode)>,
    ) {
        let descend = node.has_children() && self.is_expanded(&path);
        result.push((path.clone(), node));
        if descend {
            for (index, child) in node.children.iter().enumerate() {
                self.collect_visible(path.child(index), child, result);
            }
        }
    }
}

/// Every node of the outline in pre-order, with its path
pub fn walk(roots: &[IndexNode]) -> Vec<(NodePath, &IndexNode)> {
    let mut result = Vec::new();
    let mut stack: Vec<(NodePath, &IndexNode)> = roots
        .iter()
        .enumerate()
        .rev()
        .map(|(index, node)| (NodePath::root(index), node))
        .collect();

    while let Some((path, node)) = stack.pop() {
        for (index, child) in node.children.iter().enumerate().rev() {
            stack.push((path.child(index), child));
        }
        result.push((path, node));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::law_model::IndexNodeKind;

    fn node(kind: IndexNodeKind, id: &str, children: Vec<IndexNode>) -> IndexNode {
        IndexNode {
            kind,
            id: id.to_string(),
            description: None,
            page_range: None,
            children,
        }
    }

    /// Two titles that both contain a "Capítulo I"
    fn outline() -> Vec<IndexNode> {
        vec![
            node(
                IndexNodeKind::Title,
                "Título I",
                vec![
                    node(IndexNodeKind::Chapter, "Capítulo I", Vec::new()),
                    node(IndexNodeKind::Chapter, "Capítulo II", Vec::new()),
                ],
            ),
            node(
                IndexNodeKind::Title,
                "Título II",
                vec![node(IndexNodeKind::Chapter, "Capítulo I", Vec::new())],
            ),
        ]
    }

    #[test]
    fn test_node_path_parse_and_display() {
        let path: NodePath = "1.0".parse().unwrap();
        assert_eq!(path, NodePath::new(vec![1, 0]));
        assert_eq!(path.to_string(), "1.0");
        assert_eq!(path.depth(), 1);
        assert!("".parse::<NodePath>().is_err());
        assert!("1.x".parse::<NodePath>().is_err());
    }

    #[test]
    fn test_resolve_distinguishes_repeated_labels() {
        let roots = outline();
        let first = NodePath::new(vec![0, 0]).resolve(&roots).unwrap();
        let second = NodePath::new(vec![1, 0]).resolve(&roots).unwrap();
        assert_eq!(first.id, second.id);
        assert_ne!(NodePath::new(vec![0, 0]), NodePath::new(vec![1, 0]));
        assert!(NodePath::new(vec![0, 5]).resolve(&roots).is_none());
        assert!(NodePath::default().resolve(&roots).is_none());
    }

    #[test]
    fn test_visible_respects_expand_state() {
        let roots = outline();
        let mut state = IndexTreeState::new();
        assert_eq!(state.visible(&roots).len(), 2);

        assert!(state.toggle(&NodePath::root(0)));
        let labels: Vec<String> = state
            .visible(&roots)
            .iter()
            .map(|(path, _)| path.to_string())
            .collect();
        assert_eq!(labels, vec!["0", "0.0", "0.1", "1"]);

        assert!(!state.toggle(&NodePath::root(0)));
        assert_eq!(state.visible(&roots).len(), 2);
    }

    #[test]
    fn test_select_does_not_expand_or_cascade() {
        let roots = outline();
        let mut state = IndexTreeState::new();
        state.select(NodePath::root(1));

        assert!(state.is_selected(&NodePath::root(1)));
        assert!(!state.is_selected(&NodePath::new(vec![1, 0])));
        assert!(!state.is_expanded(&NodePath::root(1)));
        assert_eq!(state.visible(&roots).len(), 2);
    }

    #[test]
    fn test_walk_is_preorder() {
        let roots = outline();
        let order: Vec<String> = walk(&roots).iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(order, vec!["0", "0.0", "0.1", "1", "1.0"]);
    }

    #[test]
    fn test_expand_all() {
        let roots = outline();
        let mut state = IndexTreeState::new();
        state.expand_all(&roots);
        assert_eq!(state.visible(&roots).len(), 5);
        state.collapse(&NodePath::root(1));
        assert_eq!(state.visible(&roots).len(), 4);
    }
}
