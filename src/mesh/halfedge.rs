//! The mesh container.
//!
//! [`PatchMesh`] owns every node, half-edge and patch in insertion-ordered
//! arenas. Elements are created through the factory methods and never removed;
//! a reload replaces or resets the whole container.
//!
//! # Paired setters
//!
//! Relationships that have an inverse are written through helpers that update
//! both sides in one call:
//!
//! | Helper | Writes |
//! |--------|--------|
//! | [`set_node`](PatchMesh::set_node) | `edge.node`, `node.edge` |
//! | [`set_boundary`](PatchMesh::set_boundary) | `patch.edge`, `edge.patch` |
//! | [`link_sym`](PatchMesh::link_sym) | `a.sym`, `b.sym` |
//!
//! [`set_next`](PatchMesh::set_next) and [`set_patch`](PatchMesh::set_patch)
//! are one-directional. No `prev` is stored; code that needs a predecessor
//! walks the loop.
//!
//! None of these helpers validate their input or traverse the graph.

use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::element::{Color, Edge, Node, Patch};
use super::index::{EdgeId, NodeId, PatchId};
use crate::error::{MeshError, Result};

/// Seed used for patch colors unless another one is configured.
pub const DEFAULT_COLOR_SEED: u64 = 0x5eed_c0102;

/// A polygon mesh stored as a half-edge graph.
#[derive(Debug, Clone)]
pub struct PatchMesh {
    /// All nodes in the mesh.
    pub(crate) nodes: Vec<Node>,

    /// All half-edges in the mesh.
    pub(crate) edges: Vec<Edge>,

    /// All patches in the mesh.
    pub(crate) patches: Vec<Patch>,

    /// Source of colors for imported and newly created patches.
    colors: StdRng,
}

impl Default for PatchMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl PatchMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::with_color_seed(DEFAULT_COLOR_SEED)
    }

    /// Create a new empty mesh whose patch colors come from `seed`.
    pub fn with_color_seed(seed: u64) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            patches: Vec::new(),
            colors: StdRng::seed_from_u64(seed),
        }
    }

    /// Remove every element. The color sequence continues where it was.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.patches.clear();
    }

    // ==================== Factories ====================

    /// Append a detached node and return its handle.
    pub fn create_node(&mut self, position: Point3<f64>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(position));
        id
    }

    /// Append a detached half-edge and return its handle.
    pub fn create_edge(&mut self) -> EdgeId {
        let id = EdgeId::new(self.edges.len());
        self.edges.push(Edge::new());
        id
    }

    /// Append a patch with no boundary and return its handle.
    pub fn create_patch(&mut self, color: Color) -> PatchId {
        let id = PatchId::new(self.patches.len());
        self.patches.push(Patch::new(color));
        id
    }

    /// Draw the next patch color.
    pub fn random_color(&mut self) -> Color {
        [self.colors.gen(), self.colors.gen(), self.colors.gen()]
    }

    // ==================== Accessors ====================

    /// Get the number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of patches.
    #[inline]
    pub fn num_patches(&self) -> usize {
        self.patches.len()
    }

    /// Check if the mesh has no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.patches.is_empty()
    }

    /// Get a node by handle.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a mutable node by handle.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Get a half-edge by handle.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Get a mutable half-edge by handle.
    #[inline]
    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.index()]
    }

    /// Get a patch by handle.
    #[inline]
    pub fn patch(&self, id: PatchId) -> &Patch {
        &self.patches[id.index()]
    }

    /// Get a mutable patch by handle.
    #[inline]
    pub fn patch_mut(&mut self, id: PatchId) -> &mut Patch {
        &mut self.patches[id.index()]
    }

    /// Check that a node handle belongs to this mesh.
    pub fn check_node(&self, id: NodeId) -> Result<()> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(MeshError::InvalidHandle {
                kind: "node",
                index: id.index(),
            })
        }
    }

    /// Check that a half-edge handle belongs to this mesh.
    pub fn check_edge(&self, id: EdgeId) -> Result<()> {
        if id.index() < self.edges.len() {
            Ok(())
        } else {
            Err(MeshError::InvalidHandle {
                kind: "half-edge",
                index: id.index(),
            })
        }
    }

    /// Check that a patch handle belongs to this mesh.
    pub fn check_patch(&self, id: PatchId) -> Result<()> {
        if id.index() < self.patches.len() {
            Ok(())
        } else {
            Err(MeshError::InvalidHandle {
                kind: "patch",
                index: id.index(),
            })
        }
    }

    /// Get the position of a node.
    #[inline]
    pub fn position(&self, n: NodeId) -> &Point3<f64> {
        &self.node(n).position
    }

    /// Set the position of a node.
    #[inline]
    pub fn set_position(&mut self, n: NodeId, pos: Point3<f64>) {
        self.node_mut(n).position = pos;
    }

    /// Get the color of a patch.
    #[inline]
    pub fn patch_color(&self, p: PatchId) -> Color {
        self.patch(p).color
    }

    /// Set the color of a patch.
    #[inline]
    pub fn set_patch_color(&mut self, p: PatchId, color: Color) {
        self.patch_mut(p).color = color;
    }

    // ==================== Topology Queries ====================

    /// Get the next half-edge around the patch.
    #[inline]
    pub fn next(&self, e: EdgeId) -> EdgeId {
        self.edge(e).next
    }

    /// Get the opposite half-edge, if any.
    #[inline]
    pub fn sym(&self, e: EdgeId) -> Option<EdgeId> {
        self.edge(e).sym.valid()
    }

    /// Get the node a half-edge points to.
    #[inline]
    pub fn node_of(&self, e: EdgeId) -> NodeId {
        self.edge(e).node
    }

    /// Get the patch a half-edge bounds.
    #[inline]
    pub fn patch_of(&self, e: EdgeId) -> PatchId {
        self.edge(e).patch
    }

    /// Get the boundary half-edge recorded on a patch.
    #[inline]
    pub fn boundary_edge(&self, p: PatchId) -> EdgeId {
        self.patch(p).edge
    }

    /// Get the sym of a half-edge, or a [`MeshError::BoundaryEdge`] error.
    pub fn require_sym(&self, e: EdgeId) -> Result<EdgeId> {
        self.sym(e).ok_or(MeshError::BoundaryEdge { edge: e.index() })
    }

    /// Count half-edges without a sym.
    pub fn num_boundary_edges(&self) -> usize {
        self.edges.iter().filter(|e| e.is_boundary()).count()
    }

    /// Check if every half-edge has a sym.
    pub fn is_closed(&self) -> bool {
        self.edges.iter().all(|e| !e.is_boundary())
    }

    // ==================== Paired Setters ====================

    /// Point `e` at `n` and make `e` the representative edge of `n`.
    #[inline]
    pub fn set_node(&mut self, e: EdgeId, n: NodeId) {
        self.edge_mut(e).node = n;
        self.node_mut(n).edge = e;
    }

    /// Make `e` the boundary edge of `p` and attach `e` to `p`.
    #[inline]
    pub fn set_boundary(&mut self, p: PatchId, e: EdgeId) {
        self.patch_mut(p).edge = e;
        self.edge_mut(e).patch = p;
    }

    /// Link two half-edges as each other's sym.
    #[inline]
    pub fn link_sym(&mut self, a: EdgeId, b: EdgeId) {
        self.edge_mut(a).sym = b;
        self.edge_mut(b).sym = a;
    }

    /// Set the successor of `a` in its loop.
    #[inline]
    pub fn set_next(&mut self, a: EdgeId, b: EdgeId) {
        self.edge_mut(a).next = b;
    }

    /// Attach `e` to `p` without touching `p`'s boundary edge.
    #[inline]
    pub fn set_patch(&mut self, e: EdgeId, p: PatchId) {
        self.edge_mut(e).patch = p;
    }

    // ==================== Iteration ====================

    /// Iterate over all node handles.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Iterate over all nodes with their handles.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i), n))
    }

    /// Iterate over all half-edge handles.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all half-edges with their handles.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e))
    }

    /// Iterate over all patch handles.
    pub fn patch_ids(&self) -> impl Iterator<Item = PatchId> + '_ {
        (0..self.patches.len()).map(PatchId::new)
    }

    /// Iterate over all patches with their handles.
    pub fn patches(&self) -> impl Iterator<Item = (PatchId, &Patch)> + '_ {
        self.patches
            .iter()
            .enumerate()
            .map(|(i, p)| (PatchId::new(i), p))
    }

    /// Display labels for every element, in handle order.
    pub fn labels(&self) -> ElementLabels {
        ElementLabels {
            nodes: self.node_ids().map(|n| (n, n.label())).collect(),
            edges: self.edge_ids().map(|e| (e, e.label())).collect(),
            patches: self.patch_ids().map(|p| (p, p.label())).collect(),
        }
    }

    // ==================== Geometry ====================

    /// The node a half-edge starts from.
    ///
    /// Uses the sym when there is one, otherwise walks the patch loop to the
    /// predecessor.
    pub fn origin(&self, e: EdgeId) -> Result<NodeId> {
        match self.sym(e) {
            Some(s) => Ok(self.node_of(s)),
            None => Ok(self.node_of(self.predecessor(e)?)),
        }
    }

    /// Compute the mean position of a patch's loop.
    pub fn centroid(&self, p: PatchId) -> Result<Point3<f64>> {
        let mut sum = Vector3::zeros();
        let mut count = 0usize;
        for e in self.boundary_edges(p) {
            sum += self.position(self.node_of(e?)).coords;
            count += 1;
        }
        if count == 0 {
            return Err(MeshError::MalformedPatch {
                patch: p.index(),
                reason: "loop is empty",
            });
        }
        Ok(Point3::from(sum / count as f64))
    }

    /// Compute a patch normal from the first three nodes of its loop.
    ///
    /// This is the normal used for flat shading. Collinear or coincident nodes
    /// produce a NaN vector.
    pub fn face_normal(&self, p: PatchId) -> Result<Vector3<f64>> {
        let corners = self
            .boundary_edges(p)
            .take(3)
            .collect::<Result<Vec<_>>>()?;
        if corners.len() < 3 {
            return Err(MeshError::MalformedPatch {
                patch: p.index(),
                reason: "loop has fewer than 3 sides",
            });
        }
        let p0 = self.position(self.node_of(corners[0]));
        let p1 = self.position(self.node_of(corners[1]));
        let p2 = self.position(self.node_of(corners[2]));
        Ok(triangle_normal(p0, p1, p2))
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.nodes.first()?;
        let mut min = first.position;
        let mut max = first.position;

        for n in &self.nodes {
            for i in 0..3 {
                min[i] = min[i].min(n.position[i]);
                max[i] = max[i].max(n.position[i]);
            }
        }

        Some((min, max))
    }
}

/// Normal of the corner `p0 -> p1 -> p2`, normalized.
#[inline]
fn triangle_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    (p1 - p0).cross(&(p2 - p1)).normalize()
}

/// Element labels for populating list views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementLabels {
    /// Node handles and labels.
    pub nodes: Vec<(NodeId, String)>,
    /// Half-edge handles and labels.
    pub edges: Vec<(EdgeId, String)>,
    /// Patch handles and labels.
    pub patches: Vec<(PatchId, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh() {
        let mesh = PatchMesh::new();
        assert_eq!(mesh.num_nodes(), 0);
        assert_eq!(mesh.num_edges(), 0);
        assert_eq!(mesh.num_patches(), 0);
        assert!(mesh.is_empty());
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_factories_assign_sequential_ids() {
        let mut mesh = PatchMesh::new();
        let n0 = mesh.create_node(Point3::new(0.0, 0.0, 0.0));
        let n1 = mesh.create_node(Point3::new(1.0, 0.0, 0.0));
        let e0 = mesh.create_edge();
        let p0 = mesh.create_patch([1.0, 0.0, 0.0]);

        assert_eq!(n0.index(), 0);
        assert_eq!(n1.index(), 1);
        assert_eq!(e0.index(), 0);
        assert_eq!(p0.index(), 0);
        assert!(mesh.node(n0).is_original);
        assert!(!mesh.node(n0).edge.is_valid());
        assert!(mesh.edge(e0).is_boundary());
    }

    #[test]
    fn test_paired_setters() {
        let mut mesh = PatchMesh::new();
        let n = mesh.create_node(Point3::origin());
        let a = mesh.create_edge();
        let b = mesh.create_edge();
        let p = mesh.create_patch([0.5; 3]);

        mesh.set_node(a, n);
        assert_eq!(mesh.node_of(a), n);
        assert_eq!(mesh.node(n).edge, a);

        mesh.set_boundary(p, a);
        assert_eq!(mesh.boundary_edge(p), a);
        assert_eq!(mesh.patch_of(a), p);

        mesh.link_sym(a, b);
        assert_eq!(mesh.sym(a), Some(b));
        assert_eq!(mesh.sym(b), Some(a));

        mesh.set_next(a, b);
        assert_eq!(mesh.next(a), b);
        assert!(!mesh.next(b).is_valid());
    }

    #[test]
    fn test_check_handles() {
        let mut mesh = PatchMesh::new();
        mesh.create_node(Point3::origin());
        assert!(mesh.check_node(NodeId::new(0)).is_ok());
        assert!(matches!(
            mesh.check_node(NodeId::new(1)),
            Err(MeshError::InvalidHandle { kind: "node", index: 1 })
        ));
        assert!(mesh.check_edge(EdgeId::new(0)).is_err());
        assert!(mesh.check_patch(PatchId::invalid()).is_err());
    }

    #[test]
    fn test_reset_clears_all_arenas() {
        let mut mesh = PatchMesh::new();
        mesh.create_node(Point3::origin());
        mesh.create_edge();
        let color = mesh.random_color();
        mesh.create_patch(color);

        mesh.reset();
        assert!(mesh.is_empty());
        assert_eq!(mesh.create_node(Point3::origin()).index(), 0);
    }

    #[test]
    fn test_colors_are_seeded() {
        let mut a = PatchMesh::with_color_seed(7);
        let mut b = PatchMesh::with_color_seed(7);
        let mut c = PatchMesh::with_color_seed(8);
        let ca = a.random_color();
        assert_eq!(ca, b.random_color());
        assert_ne!(ca, c.random_color());
        assert!(ca.iter().all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn test_labels() {
        let mut mesh = PatchMesh::new();
        mesh.create_node(Point3::origin());
        mesh.create_node(Point3::origin());
        mesh.create_edge();
        let labels = mesh.labels();
        assert_eq!(labels.nodes[1].1, "Vertex 1");
        assert_eq!(labels.edges[0].1, "HalfEdge 0");
        assert!(labels.patches.is_empty());
    }

    #[test]
    fn test_face_normal_and_centroid() {
        let mesh = crate::io::obj::parse_str(crate::test_fixtures::CUBE).unwrap();
        // Bottom face, wound to face -z.
        let n = mesh.face_normal(PatchId::new(0)).unwrap();
        assert!((n + Vector3::z()).norm() < 1e-12);
        assert_eq!(mesh.centroid(PatchId::new(0)).unwrap(), Point3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_detached_patch_is_malformed() {
        let mut mesh = PatchMesh::new();
        let p = mesh.create_patch([0.0; 3]);
        assert!(matches!(
            mesh.face_normal(p),
            Err(MeshError::MalformedPatch { patch: 0, .. })
        ));
        assert!(matches!(
            mesh.centroid(p),
            Err(MeshError::MalformedPatch { patch: 0, .. })
        ));
    }

    #[test]
    fn test_triangle_normal() {
        let n = triangle_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(1.0, 1.0, 0.0),
        );
        assert!((n - Vector3::z()).norm() < 1e-12);

        let degenerate = triangle_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, 0.0),
        );
        assert!(degenerate.x.is_nan());
    }
}
