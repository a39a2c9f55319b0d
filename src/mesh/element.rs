//! The three element kinds of the half-edge graph.
//!
//! - A [`Node`] is a vertex. It stores one *incoming* half-edge, an edge whose
//!   arrow ends at the node.
//! - An [`Edge`] is a directed half-edge. It stores its **terminal** node (the
//!   node it points to), the **next** half-edge around its patch, its **sym**
//!   (the opposite half-edge on the same undirected edge) and its **patch**.
//!   The other endpoint of an edge is the terminal node of its sym, or of its
//!   predecessor in the patch loop.
//! - A [`Patch`] is a face of any degree. It stores one half-edge of its loop
//!   and a display color.
//!
//! All cross-references are handles into the owning [`PatchMesh`](super::PatchMesh).
//! Unset references hold the invalid handle.

use nalgebra::Point3;

use super::index::{EdgeId, NodeId, PatchId};

/// An RGB color with components in `[0, 1]`.
pub type Color = [f32; 3];

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Node {
    /// The 3D position of this node.
    pub position: Point3<f64>,

    /// One half-edge whose terminal node is this node.
    pub edge: EdgeId,

    /// Cleared on nodes created during the current subdivision pass.
    pub is_original: bool,
}

impl Node {
    /// Create a detached node at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            edge: EdgeId::invalid(),
            is_original: true,
        }
    }
}

/// A directed half-edge.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    /// The next half-edge around the same patch.
    pub next: EdgeId,

    /// The opposite half-edge. Invalid on boundary edges.
    pub sym: EdgeId,

    /// The patch this half-edge bounds.
    pub patch: PatchId,

    /// The node this half-edge points to.
    pub node: NodeId,

    /// Cleared on half-edges already processed by the current subdivision pass.
    pub is_original: bool,
}

impl Edge {
    /// Create a detached half-edge.
    pub fn new() -> Self {
        Self {
            next: EdgeId::invalid(),
            sym: EdgeId::invalid(),
            patch: PatchId::invalid(),
            node: NodeId::invalid(),
            is_original: true,
        }
    }

    /// Check if this half-edge has no sym.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.sym.is_valid()
    }
}

impl Default for Edge {
    fn default() -> Self {
        Self::new()
    }
}

/// A face of the mesh.
#[derive(Debug, Clone, Copy)]
pub struct Patch {
    /// One half-edge on this patch's loop.
    pub edge: EdgeId,

    /// Display color.
    pub color: Color,
}

impl Patch {
    /// Create a patch with no boundary yet.
    pub fn new(color: Color) -> Self {
        Self {
            edge: EdgeId::invalid(),
            color,
        }
    }
}
