//! # Patchwork
//!
//! Interactive-style editing of polygon meshes on a half-edge graph.
//!
//! Patchwork imports Wavefront OBJ meshes into a half-edge structure and edits
//! them in place: splitting edges, fan-triangulating patches and applying
//! Catmull-Clark subdivision. After every edit it can derive flat-shaded
//! triangle buffers for a viewer to upload.
//!
//! ## Features
//!
//! - **Half-edge graph**: arena storage with type-safe `u32` handles
//! - **Arbitrary polygons**: patches of any degree, open or closed meshes
//! - **Topological editors**: edge split, fan triangulation, Catmull-Clark
//! - **Render derivation**: flat `f32` buffers and selection highlights
//!
//! ## Quick Start
//!
//! ```no_run
//! use patchwork::prelude::*;
//!
//! let mut mesh = patchwork::io::load("model.obj").unwrap();
//! println!("Nodes: {}", mesh.num_nodes());
//! println!("Patches: {}", mesh.num_patches());
//!
//! if mesh.is_closed() {
//!     catmull_clark_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();
//! }
//! let buffers = RenderBuffers::from_mesh(&mesh).unwrap();
//! println!("Triangles: {}", buffers.num_triangles());
//! ```
//!
//! ## Traversal
//!
//! ```
//! use patchwork::prelude::*;
//!
//! let mesh = patchwork::io::obj::parse_str(
//!     "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
//! ).unwrap();
//!
//! // Walk the loop of a patch
//! for e in mesh.boundary_edges(PatchId::new(0)) {
//!     let e = e.unwrap();
//!     println!("{:?} ends at {:?}", e, mesh.node_of(e));
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod render;
pub mod session;

#[cfg(test)]
mod test_fixtures;

pub use mesh::DEFAULT_COLOR_SEED;

/// Re-export of the linear algebra crate used for positions.
pub use nalgebra;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use patchwork::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        catmull_clark_subdivide, split_edge, triangulate, SubdivideOptions,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{Color, EdgeId, NodeId, PatchId, PatchMesh};
    pub use crate::render::RenderBuffers;
    pub use crate::session::{EditSession, SessionOptions};
}
