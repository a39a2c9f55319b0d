//! Wavefront OBJ import.
//!
//! Only the records needed to build topology are read:
//!
//! - `v x y z` creates the next node (extra coordinates such as `w` are ignored)
//! - `f a b c ...` creates a patch with one half-edge per vertex reference;
//!   references are 1-based and may carry `/vt/vn` suffixes, which are ignored
//!
//! Every other line is skipped. A face may only reference vertices declared
//! before it.
//!
//! Syms are discovered while faces are read: the first half-edge seen for an
//! undirected node pair waits in a table, and the second one to arrive is
//! linked to it.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, NodeId, PatchMesh, DEFAULT_COLOR_SEED};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use patchwork::io::obj;
///
/// let mesh = obj::load("model.obj").unwrap();
/// println!("{} patches", mesh.num_patches());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<PatchMesh> {
    load_with_seed(path, DEFAULT_COLOR_SEED)
}

/// Load a mesh from an OBJ file, drawing patch colors from `seed`.
pub fn load_with_seed<P: AsRef<Path>>(path: P, seed: u64) -> Result<PatchMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_with_seed(BufReader::new(file), seed)
}

/// Parse OBJ text held in memory.
pub fn parse_str(text: &str) -> Result<PatchMesh> {
    parse(text.as_bytes())
}

/// Parse OBJ records from a reader.
pub fn parse<R: BufRead>(reader: R) -> Result<PatchMesh> {
    parse_with_seed(reader, DEFAULT_COLOR_SEED)
}

/// Parse OBJ records from a reader, drawing patch colors from `seed`.
pub fn parse_with_seed<R: BufRead>(reader: R, seed: u64) -> Result<PatchMesh> {
    let mut importer = Importer::new(PatchMesh::with_color_seed(seed));

    for (i, line) in reader.lines().enumerate() {
        importer.record(i + 1, &line?)?;
    }

    let mesh = importer.finish();
    tracing::debug!(
        nodes = mesh.num_nodes(),
        edges = mesh.num_edges(),
        patches = mesh.num_patches(),
        boundary_edges = mesh.num_boundary_edges(),
        "imported OBJ"
    );
    Ok(mesh)
}

/// An unordered node pair identifying an undirected edge.
type NodePair = (NodeId, NodeId);

fn node_pair(a: NodeId, b: NodeId) -> NodePair {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

struct Importer {
    mesh: PatchMesh,
    /// Half-edges still waiting for their sym.
    pending: HashMap<NodePair, EdgeId>,
    /// Pairs that already have a linked sym.
    paired: HashSet<NodePair>,
}

impl Importer {
    fn new(mesh: PatchMesh) -> Self {
        Self {
            mesh,
            pending: HashMap::new(),
            paired: HashSet::new(),
        }
    }

    fn finish(self) -> PatchMesh {
        self.mesh
    }

    fn record(&mut self, line: usize, text: &str) -> Result<()> {
        let mut tokens = text.split_whitespace();
        match tokens.next() {
            Some("v") => self.position(line, tokens),
            Some("f") => self.face(line, tokens),
            _ => Ok(()),
        }
    }

    fn position<'t>(&mut self, line: usize, tokens: impl Iterator<Item = &'t str>) -> Result<()> {
        let mut coords = [0.0f64; 3];
        let mut found = 0;
        for (slot, token) in coords.iter_mut().zip(tokens) {
            *slot = token.parse().map_err(|_| MeshError::Parse {
                line,
                token: token.to_string(),
            })?;
            found += 1;
        }
        if found < 3 {
            return Err(MeshError::MissingCoordinate { line });
        }

        self.mesh.create_node(Point3::new(coords[0], coords[1], coords[2]));
        Ok(())
    }

    fn face<'t>(&mut self, line: usize, tokens: impl Iterator<Item = &'t str>) -> Result<()> {
        let nodes = tokens
            .map(|token| self.vertex_ref(line, token))
            .collect::<Result<Vec<NodeId>>>()?;
        if nodes.len() < 3 {
            return Err(MeshError::DegenerateFace {
                line,
                count: nodes.len(),
            });
        }

        let color = self.mesh.random_color();
        let patch = self.mesh.create_patch(color);

        let edges: Vec<EdgeId> = nodes
            .iter()
            .map(|&n| {
                let e = self.mesh.create_edge();
                self.mesh.set_node(e, n);
                self.mesh.set_patch(e, patch);
                e
            })
            .collect();

        let k = edges.len();
        for i in 0..k {
            self.mesh.set_next(edges[i], edges[(i + 1) % k]);
        }
        self.mesh.set_boundary(patch, edges[0]);

        // Edge i runs from the previous reference to reference i; the first
        // edge closes the polygon from the last reference.
        for i in 0..k {
            let behind = nodes[(i + k - 1) % k];
            self.discover_sym(line, edges[i], node_pair(behind, nodes[i]));
        }

        Ok(())
    }

    fn vertex_ref(&self, line: usize, token: &str) -> Result<NodeId> {
        let position_index = token.split('/').next().unwrap_or(token);
        let index: usize = position_index.parse().map_err(|_| MeshError::Parse {
            line,
            token: token.to_string(),
        })?;
        if index == 0 || index > self.mesh.num_nodes() {
            return Err(MeshError::InvalidVertexIndex { line, index });
        }
        Ok(NodeId::new(index - 1))
    }

    fn discover_sym(&mut self, line: usize, edge: EdgeId, pair: NodePair) {
        if let Some(waiting) = self.pending.remove(&pair) {
            self.mesh.link_sym(edge, waiting);
            self.paired.insert(pair);
            return;
        }

        if self.paired.contains(&pair) {
            tracing::warn!(
                line,
                a = pair.0.index(),
                b = pair.1.index(),
                "undirected edge is shared by more than two faces"
            );
        }
        self.pending.insert(pair, edge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PatchId;
    use crate::test_fixtures::{CUBE, PENTAGON, TRIANGLE, TWO_TRIANGLES};

    #[test]
    fn test_single_triangle() {
        let mesh = parse_str(TRIANGLE).unwrap();

        assert_eq!(mesh.num_nodes(), 3);
        assert_eq!(mesh.num_edges(), 3);
        assert_eq!(mesh.num_patches(), 1);
        assert_eq!(mesh.num_boundary_edges(), 3);
        assert!(mesh.is_valid());

        let p = PatchId::new(0);
        assert_eq!(mesh.boundary_edge(p), EdgeId::new(0));
        let nodes: Vec<usize> = mesh
            .patch_nodes(p)
            .map(|n| n.unwrap().index())
            .collect();
        assert_eq!(nodes, vec![0, 1, 2]);
    }

    #[test]
    fn test_shared_edge_is_paired_once() {
        let mesh = parse_str(TWO_TRIANGLES).unwrap();

        assert_eq!(mesh.num_nodes(), 4);
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.num_patches(), 2);

        let paired: Vec<EdgeId> = mesh.edge_ids().filter(|&e| mesh.sym(e).is_some()).collect();
        assert_eq!(paired.len(), 2);
        let (a, b) = (paired[0], paired[1]);
        assert_eq!(mesh.sym(a), Some(b));
        assert_eq!(mesh.sym(b), Some(a));
        assert_ne!(mesh.patch_of(a), mesh.patch_of(b));

        // The shared undirected edge is between vertices 1 and 3 (nodes 0 and 2).
        let mut ends = [mesh.node_of(a).index(), mesh.node_of(b).index()];
        ends.sort();
        assert_eq!(ends, [0, 2]);
    }

    #[test]
    fn test_closed_cube() {
        let mesh = parse_str(CUBE).unwrap();
        assert_eq!(mesh.num_nodes(), 8);
        assert_eq!(mesh.num_patches(), 6);
        assert_eq!(mesh.num_edges(), 24);
        assert!(mesh.is_closed());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_polygon_with_texture_indices() {
        let mesh = parse_str(PENTAGON).unwrap();
        assert_eq!(mesh.num_patches(), 1);
        assert_eq!(mesh.patch_degree(PatchId::new(0)).unwrap(), 5);
    }

    #[test]
    fn test_slash_suffixes_are_ignored() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2//1 3/1\n";
        let mesh = parse_str(text).unwrap();
        assert_eq!(mesh.num_edges(), 3);
    }

    #[test]
    fn test_unknown_lines_are_ignored() {
        let text = "# comment\no thing\ng group\ns off\n\n\
                    v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl red\nf 1 2 3\n";
        let mesh = parse_str(text).unwrap();
        assert_eq!(mesh.num_patches(), 1);
    }

    #[test]
    fn test_out_of_range_index() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n";
        let err = parse_str(text).unwrap_err();
        assert!(matches!(err, MeshError::InvalidVertexIndex { line: 4, index: 4 }));
    }

    #[test]
    fn test_zero_index() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        let err = parse_str(text).unwrap_err();
        assert!(matches!(err, MeshError::InvalidVertexIndex { index: 0, .. }));
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let text = "v 0 0 0\nv 1 0 0\nf 1 2 3\nv 0 1 0\n";
        let err = parse_str(text).unwrap_err();
        assert!(matches!(err, MeshError::InvalidVertexIndex { line: 3, index: 3 }));
    }

    #[test]
    fn test_malformed_coordinate() {
        let text = "v 0 0 0\nv 1 zero 0\n";
        match parse_str(text).unwrap_err() {
            MeshError::Parse { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "zero");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_malformed_index() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 x/2 3\n";
        match parse_str(text).unwrap_err() {
            MeshError::Parse { line, token } => {
                assert_eq!(line, 4);
                assert_eq!(token, "x/2");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_short_records() {
        assert!(matches!(
            parse_str("v 1 2\n").unwrap_err(),
            MeshError::MissingCoordinate { line: 1 }
        ));
        assert!(matches!(
            parse_str("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err(),
            MeshError::DegenerateFace { line: 3, count: 2 }
        ));
    }

    #[test]
    fn test_non_manifold_edge_pairs_in_arrival_order() {
        // Four triangles hinge on the edge between vertices 1 and 2.
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 -1 0\nv 0 0 1\nv 0 0 -1\n\
                    f 1 2 3\nf 2 1 4\nf 1 2 5\nf 2 1 6\n";
        let mesh = parse_str(text).unwrap();

        // Face i holds edges 3i..3i+3, and its hinge edge is the second one.
        let hinge: Vec<EdgeId> = (0..4).map(|f| EdgeId::new(3 * f + 1)).collect();
        for &e in &hinge {
            let mut ends = [mesh.origin(e).unwrap().index(), mesh.node_of(e).index()];
            ends.sort();
            assert_eq!(ends, [0, 1]);
        }

        // The first two arrivals pair up, and the third waits for the fourth.
        assert_eq!(mesh.sym(hinge[0]), Some(hinge[1]));
        assert_eq!(mesh.sym(hinge[1]), Some(hinge[0]));
        assert_eq!(mesh.sym(hinge[2]), Some(hinge[3]));
        assert_eq!(mesh.sym(hinge[3]), Some(hinge[2]));

        // Nothing else is shared.
        assert_eq!(mesh.num_boundary_edges(), 12 - 4);
    }

    #[test]
    fn test_third_face_on_an_edge_stays_unpaired() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 -1 0\nv 0 0 1\n\
                    f 1 2 3\nf 2 1 4\nf 1 2 5\n";
        let mesh = parse_str(text).unwrap();
        assert_eq!(mesh.sym(EdgeId::new(1)), Some(EdgeId::new(4)));
        assert_eq!(mesh.sym(EdgeId::new(7)), None);
        for e in mesh.edge_ids() {
            if let Some(s) = mesh.sym(e) {
                assert_eq!(mesh.sym(s), Some(e));
            }
        }
    }

    #[test]
    fn test_seed_controls_colors() {
        let a = parse_with_seed(CUBE.as_bytes(), 1).unwrap();
        let b = parse_with_seed(CUBE.as_bytes(), 1).unwrap();
        let c = parse_with_seed(CUBE.as_bytes(), 2).unwrap();
        let p = PatchId::new(3);
        assert_eq!(a.patch_color(p), b.patch_color(p));
        assert_ne!(a.patch_color(p), c.patch_color(p));
    }

    #[test]
    fn test_missing_file() {
        let err = load("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, MeshError::LoadError { .. }));
    }
}
