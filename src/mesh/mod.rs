//! Core mesh data structures.
//!
//! This module provides the half-edge polygon mesh and its element types.
//!
//! # Overview
//!
//! The primary type is [`PatchMesh`], which stores a polygon mesh as a
//! half-edge graph. Patches may have any number of sides, and half-edges on
//! the mesh boundary simply have no sym.
//!
//! # Handle Types
//!
//! Mesh elements are identified by type-safe handles:
//! - [`NodeId`] - Identifies a node (vertex)
//! - [`EdgeId`] - Identifies a half-edge
//! - [`PatchId`] - Identifies a patch (face)
//!
//! # Construction
//!
//! Meshes usually come from the OBJ importer, but can be assembled by hand:
//!
//! ```
//! use patchwork::mesh::PatchMesh;
//! use nalgebra::Point3;
//!
//! let mut mesh = PatchMesh::new();
//! let nodes = [
//!     mesh.create_node(Point3::new(0.0, 0.0, 0.0)),
//!     mesh.create_node(Point3::new(1.0, 0.0, 0.0)),
//!     mesh.create_node(Point3::new(0.0, 1.0, 0.0)),
//! ];
//! let patch = mesh.create_patch([1.0, 0.5, 0.0]);
//! let edges: Vec<_> = nodes.iter().map(|_| mesh.create_edge()).collect();
//! for i in 0..3 {
//!     mesh.set_node(edges[i], nodes[i]);
//!     mesh.set_next(edges[i], edges[(i + 1) % 3]);
//!     mesh.set_patch(edges[i], patch);
//! }
//! mesh.set_boundary(patch, edges[0]);
//!
//! assert_eq!(mesh.patch_degree(patch).unwrap(), 3);
//! assert!(mesh.is_valid());
//! ```

mod element;
mod halfedge;
mod index;
mod traversal;
mod validation;

pub use element::{Color, Edge, Node, Patch};
pub use halfedge::{ElementLabels, PatchMesh, DEFAULT_COLOR_SEED};
pub use index::{EdgeId, NodeId, PatchId};
pub use traversal::{PatchLoopIter, VertexRingIter};
