//! UI-agnostic editing session.
//!
//! An [`EditSession`] owns the mesh, what is currently selected, and the
//! render buffers derived from the mesh. Edits act on the selection and every
//! successful mutation re-derives the buffers, so a viewer only ever has to
//! upload [`EditSession::buffers`] after a call returns.
//!
//! ```
//! use patchwork::session::{EditSession, SessionOptions};
//! use patchwork::mesh::PatchId;
//!
//! let mut session = EditSession::new(SessionOptions::default());
//! session.load_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
//! session.select_patch(PatchId::new(0)).unwrap();
//! session.triangulate_selected_patch().unwrap();
//! assert_eq!(session.buffers().num_triangles(), 2);
//! ```

use std::io::BufRead;
use std::path::Path;

use nalgebra::Point3;

use crate::algo::{self, Progress, SubdivideOptions};
use crate::error::{MeshError, Result};
use crate::io;
use crate::mesh::{Color, EdgeId, ElementLabels, NodeId, PatchId, PatchMesh, DEFAULT_COLOR_SEED};
use crate::render::{Highlight, RenderBuffers};

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Seed for the colors of imported and newly created patches.
    pub color_seed: u64,
    /// Options used by [`EditSession::subdivide`].
    pub subdivide: SubdivideOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            color_seed: DEFAULT_COLOR_SEED,
            subdivide: SubdivideOptions::default(),
        }
    }
}

impl SessionOptions {
    /// Set the patch color seed.
    pub fn with_color_seed(mut self, seed: u64) -> Self {
        self.color_seed = seed;
        self
    }

    /// Set the subdivision options.
    pub fn with_subdivide(mut self, subdivide: SubdivideOptions) -> Self {
        self.subdivide = subdivide;
        self
    }
}

/// The selected element of each kind. Kinds are selected independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Selected node.
    pub node: Option<NodeId>,
    /// Selected half-edge.
    pub edge: Option<EdgeId>,
    /// Selected patch.
    pub patch: Option<PatchId>,
}

impl Selection {
    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.node.is_none() && self.edge.is_none() && self.patch.is_none()
    }
}

/// A mesh being edited, with its selection and render buffers.
#[derive(Debug)]
pub struct EditSession {
    mesh: PatchMesh,
    buffers: RenderBuffers,
    selection: Selection,
    options: SessionOptions,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl EditSession {
    /// Create a session with an empty mesh.
    pub fn new(options: SessionOptions) -> Self {
        Self {
            mesh: PatchMesh::with_color_seed(options.color_seed),
            buffers: RenderBuffers::default(),
            selection: Selection::default(),
            options,
        }
    }

    /// Create a session around an existing mesh.
    pub fn with_mesh(mesh: PatchMesh, options: SessionOptions) -> Result<Self> {
        let buffers = RenderBuffers::from_mesh(&mesh)?;
        Ok(Self {
            mesh,
            buffers,
            selection: Selection::default(),
            options,
        })
    }

    /// The mesh being edited.
    pub fn mesh(&self) -> &PatchMesh {
        &self.mesh
    }

    /// Render buffers matching the current mesh.
    pub fn buffers(&self) -> &RenderBuffers {
        &self.buffers
    }

    /// The current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The session configuration.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Labels for listing every element of the mesh.
    pub fn labels(&self) -> ElementLabels {
        self.mesh.labels()
    }

    // ==================== Loading ====================

    /// Replace the mesh with the contents of a file.
    ///
    /// On failure the current mesh, buffers and selection are kept.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mesh = io::load_with_seed(path, self.options.color_seed)?;
        tracing::info!(path = %path.display(), "loaded mesh");
        self.replace_mesh(mesh)
    }

    /// Replace the mesh with OBJ records read from `reader`.
    pub fn load_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mesh = io::obj::parse_with_seed(reader, self.options.color_seed)?;
        self.replace_mesh(mesh)
    }

    /// Replace the mesh with OBJ text.
    pub fn load_str(&mut self, text: &str) -> Result<()> {
        self.load_reader(text.as_bytes())
    }

    fn replace_mesh(&mut self, mesh: PatchMesh) -> Result<()> {
        let buffers = RenderBuffers::from_mesh(&mesh)?;
        self.mesh = mesh;
        self.buffers = buffers;
        self.selection = Selection::default();
        tracing::info!(
            nodes = self.mesh.num_nodes(),
            patches = self.mesh.num_patches(),
            boundary_edges = self.mesh.num_boundary_edges(),
            "mesh replaced"
        );
        Ok(())
    }

    // ==================== Selection ====================

    /// Select a node, replacing any selected node.
    pub fn select_node(&mut self, n: NodeId) -> Result<()> {
        self.mesh.check_node(n)?;
        self.selection.node = Some(n);
        Ok(())
    }

    /// Select a half-edge.
    pub fn select_edge(&mut self, e: EdgeId) -> Result<()> {
        self.mesh.check_edge(e)?;
        self.selection.edge = Some(e);
        Ok(())
    }

    /// Select a patch.
    pub fn select_patch(&mut self, p: PatchId) -> Result<()> {
        self.mesh.check_patch(p)?;
        self.selection.patch = Some(p);
        Ok(())
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }

    /// Overlay geometry for every selected element.
    pub fn highlights(&self) -> Result<Vec<Highlight>> {
        let mut out = Vec::new();
        if let Some(n) = self.selection.node {
            out.push(Highlight::node(&self.mesh, n)?);
        }
        if let Some(p) = self.selection.patch {
            out.push(Highlight::patch(&self.mesh, p)?);
        }
        if let Some(e) = self.selection.edge {
            out.push(Highlight::edge(&self.mesh, e)?);
        }
        Ok(out)
    }

    // ==================== Edits ====================

    /// Split the selected half-edge, returning the new midpoint node.
    pub fn split_selected_edge(&mut self) -> Result<NodeId> {
        let e = self.selection.edge.ok_or(MeshError::NoSelection { kind: "half-edge" })?;
        let m = algo::split_edge(&mut self.mesh, e)?;
        tracing::info!(edge = e.index(), node = m.index(), "split edge");
        self.refresh()?;
        Ok(m)
    }

    /// Fan-triangulate the selected patch.
    pub fn triangulate_selected_patch(&mut self) -> Result<Vec<PatchId>> {
        let p = self.selection.patch.ok_or(MeshError::NoSelection { kind: "patch" })?;
        let patches = algo::triangulate(&mut self.mesh, p)?;
        tracing::info!(patch = p.index(), triangles = patches.len(), "triangulated patch");
        self.refresh()?;
        Ok(patches)
    }

    /// Subdivide the whole mesh with the session's subdivision options.
    pub fn subdivide(&mut self) -> Result<()> {
        self.subdivide_with_progress(&Progress::none())
    }

    /// Subdivide, reporting once per iteration.
    pub fn subdivide_with_progress(&mut self, progress: &Progress) -> Result<()> {
        algo::catmull_clark_subdivide_with_progress(
            &mut self.mesh,
            &self.options.subdivide,
            progress,
        )?;
        tracing::info!(
            iterations = self.options.subdivide.iterations,
            patches = self.mesh.num_patches(),
            "subdivided mesh"
        );
        self.refresh()
    }

    /// Move the selected node.
    pub fn set_selected_node_position(&mut self, position: Point3<f64>) -> Result<()> {
        let n = self.selection.node.ok_or(MeshError::NoSelection { kind: "node" })?;
        if !position.coords.iter().all(|c| c.is_finite()) {
            return Err(MeshError::invalid_param(
                "position",
                format!("({}, {}, {})", position.x, position.y, position.z),
                "coordinates must be finite",
            ));
        }
        self.mesh.set_position(n, position);
        self.refresh()
    }

    /// Recolor the selected patch.
    pub fn set_selected_patch_color(&mut self, color: Color) -> Result<()> {
        let p = self.selection.patch.ok_or(MeshError::NoSelection { kind: "patch" })?;
        if !color.iter().all(|c| (0.0..=1.0).contains(c)) {
            return Err(MeshError::invalid_param(
                "color",
                format!("{:?}", color),
                "channels must be in [0, 1]",
            ));
        }
        self.mesh.set_patch_color(p, color);
        self.refresh()
    }

    fn refresh(&mut self) -> Result<()> {
        self.buffers = RenderBuffers::from_mesh(&self.mesh)?;
        Ok(())
    }
}
