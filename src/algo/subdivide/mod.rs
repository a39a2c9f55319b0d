//! Mesh subdivision.
//!
//! # Catmull-Clark Subdivision
//!
//! Catmull-Clark subdivision (Catmull & Clark, 1978) is an approximating
//! scheme for polygon meshes of any face degree. Each iteration:
//!
//! 1. Creates a face point at each face centroid
//! 2. Creates edge points as the average of the edge endpoints and the two
//!    adjacent face points
//! 3. Moves original vertices using a weighted average of their neighbors
//! 4. Connects everything into quads, one per face corner
//!
//! After one iteration every face is a quad. The step is performed in place on
//! the half-edge graph, so handles of existing nodes stay valid.
//!
//! # Example
//!
//! ```
//! use patchwork::algo::subdivide::{catmull_clark_subdivide, SubdivideOptions};
//! use patchwork::io::obj;
//!
//! let cube = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nv 0 0 1\nv 1 0 1\nv 1 1 1\nv 0 1 1\n\
//!             f 1 4 3 2\nf 5 6 7 8\nf 1 2 6 5\nf 3 4 8 7\nf 1 5 8 4\nf 2 3 7 6\n";
//! let mut mesh = obj::parse_str(cube).unwrap();
//!
//! catmull_clark_subdivide(&mut mesh, &SubdivideOptions::new(2)).unwrap();
//! assert_eq!(mesh.num_patches(), 96);
//! ```
//!
//! # References
//!
//! - Catmull, E. & Clark, J. (1978). "Recursively generated B-spline surfaces
//!   on arbitrary topological meshes." Computer-Aided Design, 10(6), 350-355.

mod catmull_clark;

pub use catmull_clark::{catmull_clark_subdivide, catmull_clark_subdivide_with_progress};

use crate::error::{MeshError, Result};

/// Options for subdivision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdivideOptions {
    /// Number of subdivision iterations.
    pub iterations: usize,
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Set the number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Reject option values no subdivision can run with.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(MeshError::invalid_param("iterations", 0, "must be positive"));
        }
        Ok(())
    }
}
