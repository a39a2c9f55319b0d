//! Fan triangulation of a single patch.
//!
//! The fan is anchored at the terminal node of the patch's boundary edge.
//! Triangles are cut off the front of the loop one at a time; each cut adds a
//! diagonal pair of half-edges and a new patch, and the last remaining
//! triangle keeps the original patch.

use crate::error::{MeshError, Result};
use crate::mesh::{PatchId, PatchMesh};

/// Fan-triangulate patch `p`, returning every patch that now covers it.
///
/// New triangles come first, in the order they were cut; `p` is always last.
/// A triangle is returned as `[p]` unchanged.
pub fn triangulate(mesh: &mut PatchMesh, p: PatchId) -> Result<Vec<PatchId>> {
    mesh.check_patch(p)?;
    let boundary = mesh.collect_boundary(p)?;
    let n = boundary.len();
    if n < 3 {
        return Err(MeshError::MalformedPatch {
            patch: p.index(),
            reason: "loop has fewer than 3 sides",
        });
    }

    let start = boundary[0];
    let anchor = mesh.node_of(start);
    let mut current = boundary[1];
    let mut patches = Vec::with_capacity(n - 2);

    for _ in 0..n - 3 {
        // current: anchor -> u, mid: u -> w, rest: w -> ...
        let mid = mesh.next(current);
        let rest = mesh.next(mid);
        let w = mesh.node_of(mid);

        let inner = mesh.create_edge();
        let outer = mesh.create_edge();
        mesh.set_node(inner, w);
        mesh.set_node(outer, anchor);
        mesh.link_sym(inner, outer);

        let color = mesh.random_color();
        let tri = mesh.create_patch(color);
        mesh.set_next(mid, outer);
        mesh.set_next(outer, current);
        mesh.set_patch(mid, tri);
        mesh.set_patch(outer, tri);
        mesh.set_boundary(tri, current);

        // The remainder of `p` now runs anchor -> w directly.
        mesh.set_next(start, inner);
        mesh.set_next(inner, rest);
        mesh.set_patch(inner, p);

        patches.push(tri);
        current = inner;
    }

    mesh.set_boundary(p, start);
    patches.push(p);

    tracing::trace!(patch = p.index(), sides = n, triangles = patches.len(), "triangulated patch");
    Ok(patches)
}

/// Fan-triangulate every patch of the mesh.
///
/// Returns the number of triangles created.
pub fn triangulate_all(mesh: &mut PatchMesh) -> Result<usize> {
    let original = mesh.num_patches();
    let mut created = 0;
    for i in 0..original {
        created += triangulate(mesh, PatchId::new(i))?.len() - 1;
    }
    tracing::debug!(patches = original, created, "triangulated mesh");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::obj;
    use crate::mesh::EdgeId;
    use crate::render::RenderBuffers;
    use crate::test_fixtures::{CUBE, PENTAGON, QUAD, TRIANGLE};

    fn assert_all_triangles(mesh: &PatchMesh, patches: &[PatchId]) {
        for &p in patches {
            let loop_edges = mesh.collect_boundary(p).unwrap();
            assert_eq!(loop_edges.len(), 3, "{p:?} is not a triangle");
            for e in loop_edges {
                assert_eq!(mesh.patch_of(e), p);
            }
        }
    }

    #[test]
    fn test_triangle_is_unchanged() {
        let mut mesh = obj::parse_str(TRIANGLE).unwrap();
        let p = PatchId::new(0);
        assert_eq!(triangulate(&mut mesh, p).unwrap(), vec![p]);
        assert_eq!(mesh.num_edges(), 3);
        assert_eq!(mesh.num_patches(), 1);
    }

    #[test]
    fn test_quad_becomes_two_triangles() {
        let mut mesh = obj::parse_str(QUAD).unwrap();
        let p = PatchId::new(0);
        let anchor = mesh.node_of(mesh.boundary_edge(p));

        let patches = triangulate(&mut mesh, p).unwrap();

        assert_eq!(patches, vec![PatchId::new(1), p]);
        assert_eq!(mesh.num_edges(), 6);
        assert_all_triangles(&mesh, &patches);
        for &t in &patches {
            let nodes: Vec<_> = mesh.patch_nodes(t).map(|n| n.unwrap()).collect();
            assert!(nodes.contains(&anchor));
        }
        assert_eq!(mesh.validate(), Ok(()));
    }

    #[test]
    fn test_pentagon_fan() {
        let mut mesh = obj::parse_str(PENTAGON).unwrap();
        let patches = triangulate(&mut mesh, PatchId::new(0)).unwrap();

        assert_eq!(patches.len(), 3);
        assert_eq!(mesh.num_patches(), 3);
        assert_eq!(mesh.num_edges(), 5 + 2 * 2);
        assert_all_triangles(&mesh, &patches);

        let diagonals: Vec<EdgeId> = mesh.edge_ids().filter(|&e| mesh.sym(e).is_some()).collect();
        assert_eq!(diagonals.len(), 4);
        assert_eq!(mesh.validate(), Ok(()));
    }

    #[test]
    fn test_triangulate_closed_cube() {
        let mut mesh = obj::parse_str(CUBE).unwrap();
        let created = triangulate_all(&mut mesh).unwrap();

        assert_eq!(created, 6);
        assert_eq!(mesh.num_patches(), 12);
        assert_eq!(mesh.num_edges(), 36);
        assert!(mesh.is_closed());
        assert_eq!(mesh.validate(), Ok(()));

        let buffers = RenderBuffers::from_mesh(&mesh).unwrap();
        assert_eq!(buffers.num_triangles(), 12);
    }

    #[test]
    fn test_patch_without_loop_fails() {
        let mut mesh = obj::parse_str(TRIANGLE).unwrap();
        let p = mesh.create_patch([0.0; 3]);
        assert!(matches!(
            triangulate(&mut mesh, p),
            Err(MeshError::MalformedPatch { patch: 1, .. })
        ));
    }

    #[test]
    fn test_foreign_patch_fails() {
        let mut mesh = obj::parse_str(TRIANGLE).unwrap();
        assert!(triangulate(&mut mesh, PatchId::new(4)).is_err());
    }
}
