//! Topological editors.
//!
//! - **Split**: insert a node at the midpoint of a paired half-edge
//! - **Triangulate**: fan-triangulate a polygon patch
//! - **Subdivision**: Catmull-Clark, one quad per face corner
//!
//! Every editor works in place on a [`PatchMesh`](crate::mesh::PatchMesh) and
//! leaves it satisfying the half-edge invariants on success.

pub mod progress;
pub mod split;
pub mod subdivide;
pub mod triangulate;

pub use progress::Progress;
pub use split::split_edge;
pub use subdivide::{
    catmull_clark_subdivide, catmull_clark_subdivide_with_progress, SubdivideOptions,
};
pub use triangulate::{triangulate, triangulate_all};
