//! Flat render buffers derived from a [`PatchMesh`].
//!
//! Every patch contributes one vertex record per loop edge, carrying the
//! patch's face normal and color, so patches are flat shaded and keep hard
//! edges. Each patch is fan-triangulated locally as `(0, i, i + 1)`.
//!
//! The buffers are plain `f32` arrays ready for upload; [`RenderVertex`] gives
//! an interleaved layout for callers that prefer a single vertex buffer.

use bytemuck::{Pod, Zeroable};
use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{Color, EdgeId, NodeId, PatchId, PatchMesh};

/// Interleaved vertex with position, normal and color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
    /// Vertex position.
    pub position: [f32; 3],
    /// Face normal.
    pub normal: [f32; 3],
    /// Patch color.
    pub color: [f32; 3],
}

/// Triangle-list buffers for a whole mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBuffers {
    /// Terminal node position of each emitted record.
    pub positions: Vec<[f32; 3]>,
    /// Face normal of the record's patch.
    pub normals: Vec<[f32; 3]>,
    /// Color of the record's patch.
    pub colors: Vec<[f32; 3]>,
    /// Triangle indices into the attribute arrays.
    pub indices: Vec<u32>,
}

impl RenderBuffers {
    /// Derive buffers from the current state of a mesh.
    ///
    /// Patches are visited in id order. A patch whose first three nodes are
    /// collinear yields a NaN normal rather than an error.
    pub fn from_mesh(mesh: &PatchMesh) -> Result<Self> {
        let mut buffers = Self {
            positions: Vec::with_capacity(mesh.num_edges()),
            normals: Vec::with_capacity(mesh.num_edges()),
            colors: Vec::with_capacity(mesh.num_edges()),
            indices: Vec::with_capacity(mesh.num_edges() * 3),
        };

        for pid in mesh.patch_ids() {
            buffers.push_patch(mesh, pid)?;
        }

        Ok(buffers)
    }

    fn push_patch(&mut self, mesh: &PatchMesh, pid: PatchId) -> Result<()> {
        let corners: Vec<Point3<f64>> = mesh
            .patch_nodes(pid)
            .map(|n| n.map(|n| *mesh.position(n)))
            .collect::<Result<_>>()?;
        if corners.len() < 3 {
            return Err(MeshError::MalformedPatch {
                patch: pid.index(),
                reason: "loop has fewer than 3 sides",
            });
        }

        let normal = to_f32_vec(&mesh.face_normal(pid)?);
        let color = mesh.patch_color(pid);
        let base = self.positions.len() as u32;

        for p in &corners {
            self.positions.push(to_f32(p));
            self.normals.push(normal);
            self.colors.push(color);
        }
        for i in 1..corners.len() as u32 - 1 {
            self.indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }

        Ok(())
    }

    /// Number of vertex records.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Interleave the attribute arrays.
    pub fn vertices(&self) -> Vec<RenderVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.colors)
            .map(|((&position, &normal), &color)| RenderVertex {
                position,
                normal,
                color,
            })
            .collect()
    }

    /// Raw bytes of the position array.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the normal array.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Raw bytes of the color array.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Raw bytes of the index array.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// How highlight positions should be connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightPrimitive {
    /// Individual points.
    Points,
    /// Consecutive pairs of positions.
    Lines,
    /// A closed polyline through every position.
    LineLoop,
}

/// Overlay geometry for a selected element.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    /// How to connect the positions.
    pub primitive: HighlightPrimitive,
    /// Overlay positions.
    pub positions: Vec<[f32; 3]>,
    /// One color per position.
    pub colors: Vec<[f32; 3]>,
}

const WHITE: Color = [1.0, 1.0, 1.0];
const RED: Color = [1.0, 0.0, 0.0];
const YELLOW: Color = [1.0, 1.0, 0.0];

impl Highlight {
    /// A single white point on the node.
    pub fn node(mesh: &PatchMesh, n: NodeId) -> Result<Self> {
        mesh.check_node(n)?;
        Ok(Self {
            primitive: HighlightPrimitive::Points,
            positions: vec![to_f32(mesh.position(n))],
            colors: vec![WHITE],
        })
    }

    /// The patch outline in the inverse of the patch color.
    pub fn patch(mesh: &PatchMesh, p: PatchId) -> Result<Self> {
        mesh.check_patch(p)?;
        let positions = mesh
            .patch_nodes(p)
            .map(|n| n.map(|n| to_f32(mesh.position(n))))
            .collect::<Result<Vec<_>>>()?;
        let c = mesh.patch_color(p);
        let inverse = [1.0 - c[0], 1.0 - c[1], 1.0 - c[2]];
        Ok(Self {
            primitive: HighlightPrimitive::LineLoop,
            colors: vec![inverse; positions.len()],
            positions,
        })
    }

    /// A line from the edge's origin (red) to its terminal node (yellow).
    pub fn edge(mesh: &PatchMesh, e: EdgeId) -> Result<Self> {
        mesh.check_edge(e)?;
        let from = mesh.origin(e)?;
        let to = mesh.node_of(e);
        Ok(Self {
            primitive: HighlightPrimitive::Lines,
            positions: vec![to_f32(mesh.position(from)), to_f32(mesh.position(to))],
            colors: vec![RED, YELLOW],
        })
    }
}

#[inline]
fn to_f32(p: &Point3<f64>) -> [f32; 3] {
    [p.x as f32, p.y as f32, p.z as f32]
}

#[inline]
fn to_f32_vec(v: &Vector3<f64>) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::obj;
    use crate::test_fixtures::{CUBE, PENTAGON, QUAD, TRIANGLE};

    #[test]
    fn test_single_triangle() {
        let mesh = obj::parse_str(TRIANGLE).unwrap();
        let buffers = RenderBuffers::from_mesh(&mesh).unwrap();

        assert_eq!(buffers.positions, vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert_eq!(buffers.indices, vec![0, 1, 2]);
        assert_eq!(buffers.normals, vec![[0.0, 0.0, 1.0]; 3]);
        assert_eq!(buffers.colors, vec![mesh.patch_color(PatchId::new(0)); 3]);
    }

    #[test]
    fn test_quad_is_fanned() {
        let mesh = obj::parse_str(QUAD).unwrap();
        let buffers = RenderBuffers::from_mesh(&mesh).unwrap();
        assert_eq!(buffers.num_vertices(), 4);
        assert_eq!(buffers.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_pentagon_counts() {
        let mesh = obj::parse_str(PENTAGON).unwrap();
        let buffers = RenderBuffers::from_mesh(&mesh).unwrap();
        assert_eq!(buffers.num_vertices(), 5);
        assert_eq!(buffers.num_triangles(), 3);
    }

    #[test]
    fn test_cube_normals_face_outward() {
        let mesh = obj::parse_str(CUBE).unwrap();
        let buffers = RenderBuffers::from_mesh(&mesh).unwrap();

        assert_eq!(buffers.num_vertices(), 24);
        assert_eq!(buffers.indices.len(), 36);
        assert_eq!(buffers.normals.len(), buffers.positions.len());
        assert_eq!(buffers.colors.len(), buffers.positions.len());

        // The cube is centered at (0.5, 0.5, 0.5).
        for (p, n) in buffers.positions.iter().zip(&buffers.normals) {
            let outward = (p[0] - 0.5) * n[0] + (p[1] - 0.5) * n[1] + (p[2] - 0.5) * n[2];
            assert!(outward > 0.0);
        }
        // First patch is the bottom face.
        assert_eq!(buffers.normals[0], [0.0, 0.0, -1.0]);
    }

    #[test]
    fn test_normals_match_face_normal() {
        let mut mesh = obj::parse_str(CUBE).unwrap();
        crate::algo::split_edge(&mut mesh, EdgeId::new(0)).unwrap();
        let buffers = RenderBuffers::from_mesh(&mesh).unwrap();

        let mut record = 0;
        for p in mesh.patch_ids() {
            let expected = to_f32_vec(&mesh.face_normal(p).unwrap());
            for _ in 0..mesh.patch_degree(p).unwrap() {
                assert_eq!(buffers.normals[record], expected);
                record += 1;
            }
        }
        assert_eq!(record, buffers.num_vertices());
    }

    #[test]
    fn test_patch_without_loop_is_malformed() {
        let mut mesh = obj::parse_str(TRIANGLE).unwrap();
        mesh.create_patch([0.0; 3]);
        assert!(matches!(
            RenderBuffers::from_mesh(&mesh),
            Err(MeshError::MalformedPatch { patch: 1, .. })
        ));
    }

    #[test]
    fn test_rederivation_is_byte_identical() {
        let mesh = obj::parse_str(CUBE).unwrap();
        let a = RenderBuffers::from_mesh(&mesh).unwrap();
        let b = RenderBuffers::from_mesh(&mesh).unwrap();
        assert_eq!(a.position_bytes(), b.position_bytes());
        assert_eq!(a.normal_bytes(), b.normal_bytes());
        assert_eq!(a.color_bytes(), b.color_bytes());
        assert_eq!(a.index_bytes(), b.index_bytes());
    }

    #[test]
    fn test_collinear_patch_has_nan_normal() {
        let text = "v 0 0 0\nv 1 0 0\nv 2 0 0\nf 1 2 3\n";
        let mesh = obj::parse_str(text).unwrap();
        let buffers = RenderBuffers::from_mesh(&mesh).unwrap();
        assert!(buffers.normals[0][0].is_nan());
    }

    #[test]
    fn test_empty_mesh() {
        let buffers = RenderBuffers::from_mesh(&PatchMesh::new()).unwrap();
        assert!(buffers.is_empty());
        assert_eq!(buffers.num_vertices(), 0);
    }

    #[test]
    fn test_interleaved_vertices() {
        let mesh = obj::parse_str(TRIANGLE).unwrap();
        let buffers = RenderBuffers::from_mesh(&mesh).unwrap();
        let vertices = buffers.vertices();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(
            bytemuck::cast_slice::<RenderVertex, u8>(&vertices).len(),
            3 * std::mem::size_of::<RenderVertex>()
        );
        assert_eq!(std::mem::size_of::<RenderVertex>(), 36);
    }

    #[test]
    fn test_node_highlight() {
        let mesh = obj::parse_str(TRIANGLE).unwrap();
        let h = Highlight::node(&mesh, NodeId::new(1)).unwrap();
        assert_eq!(h.primitive, HighlightPrimitive::Points);
        assert_eq!(h.positions, vec![[1.0, 0.0, 0.0]]);
        assert_eq!(h.colors, vec![WHITE]);
    }

    #[test]
    fn test_patch_highlight_inverts_color() {
        let mut mesh = obj::parse_str(QUAD).unwrap();
        let p = PatchId::new(0);
        mesh.set_patch_color(p, [0.25, 0.5, 1.0]);
        let h = Highlight::patch(&mesh, p).unwrap();
        assert_eq!(h.primitive, HighlightPrimitive::LineLoop);
        assert_eq!(h.positions.len(), 4);
        assert_eq!(h.colors, vec![[0.75, 0.5, 0.0]; 4]);
    }

    #[test]
    fn test_edge_highlight_runs_origin_to_terminal() {
        let mesh = obj::parse_str(TRIANGLE).unwrap();
        // Edge 1 runs from vertex 1 to vertex 2.
        let h = Highlight::edge(&mesh, EdgeId::new(1)).unwrap();
        assert_eq!(h.primitive, HighlightPrimitive::Lines);
        assert_eq!(h.positions, vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert_eq!(h.colors, vec![RED, YELLOW]);
    }

    #[test]
    fn test_foreign_handle_is_rejected() {
        let mesh = obj::parse_str(TRIANGLE).unwrap();
        assert!(matches!(
            Highlight::edge(&mesh, EdgeId::new(9)),
            Err(MeshError::InvalidHandle { .. })
        ));
    }
}
