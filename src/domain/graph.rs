//! Inclusion graph for features
//!
//! Nodes are feature names, edges point from a feature to the features it
//! includes. The graph is not assumed to be acyclic: [`Traversal`] detects
//! cycles while it walks. Uses petgraph for storage.
//!
//! Include targets that the catalog does not define still get a node, marked
//! unknown, so building the graph never fails. Reaching such a node during a
//! traversal is an [`ResolveError::UnknownFeature`].

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use super::feature::Catalog;
use super::resolve::ResolveError;

/// A feature vertex
#[derive(Debug, Clone)]
struct Vertex {
    name: String,
    known: bool,
}

/// Directed graph of feature -> included features
#[derive(Debug, Default)]
pub struct InclusionGraph {
    /// The underlying directed graph
    graph: DiGraph<Vertex, ()>,

    /// Map from feature name to node index
    node_map: HashMap<String, NodeIndex>,
}

impl InclusionGraph {
    /// Builds the graph from a catalog, copying each feature's includes
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut graph = Self::default();

        // First pass: add all defined features
        for (name, _) in catalog.iter() {
            graph.add_vertex(name, true);
        }

        // Second pass: add edges in declared order
        for (name, feature) in catalog.iter() {
            let from = graph.node_map[name];
            for include in &feature.includes {
                let to = graph.add_vertex(include, false);
                graph.graph.add_edge(from, to, ());
            }
        }

        graph
    }

    fn add_vertex(&mut self, name: &str, known: bool) -> NodeIndex {
        if let Some(idx) = self.node_map.get(name) {
            return *idx;
        }

        let idx = self.graph.add_node(Vertex {
            name: name.to_string(),
            known,
        });
        self.node_map.insert(name.to_string(), idx);
        idx
    }

    /// Returns the node for a feature the catalog defines
    fn lookup(&self, name: &str) -> Option<NodeIndex> {
        self.node_map
            .get(name)
            .copied()
            .filter(|idx| self.graph[*idx].known)
    }

    fn name(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].name
    }

    /// Children of a node in declared include order
    fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        // petgraph lists neighbors most recently added first
        let mut children: Vec<_> = self.graph.neighbors(idx).collect();
        children.reverse();
        children
    }

    /// Returns the included features of a defined feature, in declared order
    pub fn includes(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.lookup(name)?;
        Some(self.children(idx).into_iter().map(|c| self.name(c)).collect())
    }

    /// Returns true if the catalog behind this graph defines the feature
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Returns the number of vertices, including unknown include targets
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns true if the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    /// On the current DFS path
    Active,
    /// Emitted, or rejected by the vertex filter
    Closed,
}

struct Frame {
    vertex: NodeIndex,
    children: Vec<NodeIndex>,
    next: usize,
}

/// Iterative postorder depth-first traversal over an [`InclusionGraph`]
///
/// Marks persist across calls to [`Traversal::postorder`], so several roots
/// walked with one traversal share a single seen set: a vertex is handled at
/// most once no matter how many roots reach it.
pub struct Traversal<'g> {
    graph: &'g InclusionGraph,
    marks: Vec<Mark>,
}

impl<'g> Traversal<'g> {
    /// Creates a traversal with every vertex unvisited
    pub fn new(graph: &'g InclusionGraph) -> Self {
        Self {
            graph,
            marks: vec![Mark::Unvisited; graph.len()],
        }
    }

    /// Walks everything reachable from `root`, emitting vertices in postorder
    ///
    /// `allow` is asked once per vertex, when it is first reached. A rejected
    /// vertex is neither expanded nor emitted. `emit` receives each vertex
    /// after all of its children have been emitted.
    ///
    /// Fails on the first edge that points back into the active path, and on
    /// the first allowed vertex the catalog does not define.
    pub fn postorder<A, E>(
        &mut self,
        root: &str,
        mut allow: A,
        mut emit: E,
    ) -> Result<(), ResolveError>
    where
        A: FnMut(&'g str) -> bool,
        E: FnMut(&'g str),
    {
        let graph = self.graph;
        let root = graph
            .lookup(root)
            .ok_or_else(|| ResolveError::UnknownFeature(root.to_string()))?;

        if self.marks[root.index()] != Mark::Unvisited {
            return Ok(());
        }

        let mut stack: Vec<Frame> = Vec::new();
        self.enter(root, &mut allow, &mut stack)?;

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let vertex = frame.vertex;
            let next = frame.children.get(frame.next).copied();
            frame.next += 1;

            match next {
                Some(child) => match self.marks[child.index()] {
                    Mark::Active => {
                        return Err(ResolveError::CycleDetected(graph.name(child).to_string()));
                    }
                    Mark::Closed => {}
                    Mark::Unvisited => self.enter(child, &mut allow, &mut stack)?,
                },
                None => {
                    stack.pop();
                    self.marks[vertex.index()] = Mark::Closed;
                    emit(graph.name(vertex));
                }
            }
        }

        Ok(())
    }

    fn enter<A>(
        &mut self,
        vertex: NodeIndex,
        allow: &mut A,
        stack: &mut Vec<Frame>,
    ) -> Result<(), ResolveError>
    where
        A: FnMut(&'g str) -> bool,
    {
        let graph = self.graph;
        let name = graph.name(vertex);

        if !allow(name) {
            self.marks[vertex.index()] = Mark::Closed;
            return Ok(());
        }

        if !graph.graph[vertex].known {
            return Err(ResolveError::UnknownFeature(name.to_string()));
        }

        self.marks[vertex.index()] = Mark::Active;
        stack.push(Frame {
            vertex,
            children: graph.children(vertex),
            next: 0,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feature::{Feature, FeatureType};

    fn element(includes: &[&str]) -> Feature {
        Feature::new(FeatureType::Element).including(includes.iter().copied())
    }

    fn walk(graph: &InclusionGraph, roots: &[&str]) -> Result<Vec<String>, ResolveError> {
        let mut traversal = Traversal::new(graph);
        let mut order = Vec::new();
        for root in roots {
            traversal.postorder(root, |_| true, |v| order.push(v.to_string()))?;
        }
        Ok(order)
    }

    #[test]
    fn builds_edges_in_declared_order() {
        let catalog: Catalog = [
            ("a", element(&["c", "b", "d"])),
            ("b", element(&[])),
            ("c", element(&[])),
            ("d", element(&[])),
        ]
        .into_iter()
        .collect();

        let graph = InclusionGraph::from_catalog(&catalog);
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.includes("a"), Some(vec!["c", "b", "d"]));
        assert_eq!(graph.includes("b"), Some(vec![]));
    }

    #[test]
    fn unknown_targets_are_vertices_but_not_features() {
        let catalog: Catalog = [("a", element(&["ghost"]))].into_iter().collect();
        let graph = InclusionGraph::from_catalog(&catalog);

        assert_eq!(graph.len(), 2);
        assert!(graph.contains("a"));
        assert!(!graph.contains("ghost"));
        assert_eq!(graph.includes("ghost"), None);
    }

    #[test]
    fn postorder_emits_dependencies_first() {
        let catalog: Catalog = [
            ("a", element(&["b", "c"])),
            ("b", element(&["d"])),
            ("c", element(&[])),
            ("d", element(&[])),
        ]
        .into_iter()
        .collect();
        let graph = InclusionGraph::from_catalog(&catalog);

        assert_eq!(walk(&graph, &["a"]).unwrap(), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn sibling_dependency_is_emitted_before_dependent() {
        // a includes [b, c] and b includes c: c must precede b
        let catalog: Catalog = [
            ("a", element(&["b", "c"])),
            ("b", element(&["c"])),
            ("c", element(&[])),
        ]
        .into_iter()
        .collect();
        let graph = InclusionGraph::from_catalog(&catalog);

        assert_eq!(walk(&graph, &["a"]).unwrap(), vec!["c", "b", "a"]);
    }

    #[test]
    fn shared_marks_deduplicate_roots() {
        let catalog: Catalog = [
            ("a", element(&["c"])),
            ("b", element(&["c"])),
            ("c", element(&[])),
        ]
        .into_iter()
        .collect();
        let graph = InclusionGraph::from_catalog(&catalog);

        assert_eq!(walk(&graph, &["a", "b", "a"]).unwrap(), vec!["c", "a", "b"]);
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let catalog: Catalog = [
            ("top", element(&["left", "right"])),
            ("left", element(&["bottom"])),
            ("right", element(&["bottom"])),
            ("bottom", element(&[])),
        ]
        .into_iter()
        .collect();
        let graph = InclusionGraph::from_catalog(&catalog);

        assert_eq!(
            walk(&graph, &["top"]).unwrap(),
            vec!["bottom", "left", "right", "top"]
        );
    }

    #[test]
    fn detects_two_cycle() {
        let catalog: Catalog = [("a", element(&["b"])), ("b", element(&["a"]))]
            .into_iter()
            .collect();
        let graph = InclusionGraph::from_catalog(&catalog);

        assert_eq!(
            walk(&graph, &["a"]),
            Err(ResolveError::CycleDetected("a".to_string()))
        );
    }

    #[test]
    fn detects_self_loop() {
        let catalog: Catalog = [("a", element(&["a"]))].into_iter().collect();
        let graph = InclusionGraph::from_catalog(&catalog);

        assert_eq!(
            walk(&graph, &["a"]),
            Err(ResolveError::CycleDetected("a".to_string()))
        );
    }

    #[test]
    fn unknown_root_fails() {
        let graph = InclusionGraph::from_catalog(&Catalog::new());
        assert_eq!(
            walk(&graph, &["nope"]),
            Err(ResolveError::UnknownFeature("nope".to_string()))
        );
    }

    #[test]
    fn unknown_edge_fails_when_reached() {
        let catalog: Catalog = [("a", element(&["ghost"]))].into_iter().collect();
        let graph = InclusionGraph::from_catalog(&catalog);

        assert_eq!(
            walk(&graph, &["a"]),
            Err(ResolveError::UnknownFeature("ghost".to_string()))
        );
    }

    #[test]
    fn rejected_vertices_are_asked_once() {
        let catalog: Catalog = [
            ("a", element(&["x", "b"])),
            ("b", element(&["x"])),
            ("x", element(&[])),
        ]
        .into_iter()
        .collect();
        let graph = InclusionGraph::from_catalog(&catalog);

        let mut asked = Vec::new();
        let mut order = Vec::new();
        Traversal::new(&graph)
            .postorder(
                "a",
                |v| {
                    asked.push(v);
                    v != "x"
                },
                |v| order.push(v),
            )
            .unwrap();

        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(asked.iter().filter(|v| **v == "x").count(), 1);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let depth = 50_000;
        let catalog: Catalog = (0..depth)
            .map(|i| {
                let includes: Vec<String> = if i + 1 < depth {
                    vec![format!("f{}", i + 1)]
                } else {
                    vec![]
                };
                (format!("f{}", i), Feature::new(FeatureType::Element).including(includes))
            })
            .collect();
        let graph = InclusionGraph::from_catalog(&catalog);

        let order = walk(&graph, &["f0"]).unwrap();
        assert_eq!(order.len(), depth);
        assert_eq!(order.first().map(String::as_str), Some("f49999"));
        assert_eq!(order.last().map(String::as_str), Some("f0"));
    }
}
