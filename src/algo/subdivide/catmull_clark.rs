//! Catmull-Clark subdivision on the half-edge graph.
//!
//! Edge points are inserted by splitting each undirected edge in place. The
//! split clears `is_original` on all four halves, which is what keeps a pair
//! from being split twice; afterwards the edge point next to a corner is the
//! terminal node of the sym of any half-edge pointing into it.

use nalgebra::{Point3, Vector3};

use crate::algo::split::rewire_split;
use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, NodeId, PatchId, PatchMesh};

use super::SubdivideOptions;

/// Performs Catmull-Clark subdivision on a closed polygon mesh.
///
/// # Arguments
///
/// * `mesh` - The mesh to subdivide (modified in place)
/// * `options` - Subdivision parameters
///
/// # Errors
///
/// Every half-edge must have a sym. If one does not, [`MeshError::BoundaryEdge`]
/// is returned before anything is modified.
///
/// # Vertex Rule
///
/// An original vertex `v` with valence `n` moves to
///
/// ```text
/// (n - 2) / n * v + sum(E) / n^2 + sum(F) / n^2
/// ```
///
/// where `E` are the new edge points around `v` and `F` the face points.
pub fn catmull_clark_subdivide(mesh: &mut PatchMesh, options: &SubdivideOptions) -> Result<()> {
    catmull_clark_subdivide_with_progress(mesh, options, &Progress::none())
}

/// Catmull-Clark subdivision with progress reporting.
pub fn catmull_clark_subdivide_with_progress(
    mesh: &mut PatchMesh,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<()> {
    options.validate()?;

    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Catmull-Clark subdivision");
        subdivide_once(mesh)?;
    }
    progress.report(options.iterations, options.iterations, "Catmull-Clark subdivision");

    Ok(())
}

/// Perform one iteration of Catmull-Clark subdivision.
fn subdivide_once(mesh: &mut PatchMesh) -> Result<()> {
    if let Some(open) = mesh.edge_ids().find(|&e| mesh.sym(e).is_none()) {
        return Err(MeshError::BoundaryEdge { edge: open.index() });
    }

    let num_patches = mesh.num_patches();
    let num_edges = mesh.num_edges();
    let num_nodes = mesh.num_nodes();

    // Read every loop up front so a broken loop fails before any mutation.
    let face_points = mesh
        .patch_ids()
        .map(|p| mesh.centroid(p))
        .collect::<Result<Vec<Point3<f64>>>>()?;

    // Step 1: face points
    let centroids: Vec<NodeId> = face_points
        .iter()
        .map(|&c| {
            let n = mesh.create_node(c);
            mesh.node_mut(n).is_original = false;
            n
        })
        .collect();
    tracing::debug!(face_points = centroids.len(), "created face points");

    // Step 2: edge points, splitting each undirected edge once
    let mut edge_points = 0usize;
    for i in 0..num_edges {
        let e = EdgeId::new(i);
        // The sym of a split half-edge has been cleared along with it.
        if !mesh.edge(e).is_original {
            continue;
        }
        let s = mesh.require_sym(e)?;

        let a = mesh.position(mesh.node_of(s)).coords;
        let b = mesh.position(mesh.node_of(e)).coords;
        let fp = face_points[mesh.patch_of(e).index()].coords;
        let fq = face_points[mesh.patch_of(s).index()].coords;
        let m = mesh.create_node(Point3::from((a + b + fp + fq) / 4.0));
        mesh.node_mut(m).is_original = false;

        let (e2, s2) = rewire_split(mesh, e, s, m);
        for h in [e, s, e2, s2] {
            mesh.edge_mut(h).is_original = false;
        }
        edge_points += 1;
    }
    tracing::debug!(edge_points, "created edge points");

    // Step 3: move original vertices, computing every position before writing
    let mut moved = Vec::with_capacity(num_nodes);
    for i in 0..num_nodes {
        let v = NodeId::new(i);
        if !mesh.node(v).is_original || !mesh.node(v).edge.is_valid() {
            continue;
        }
        moved.push((v, vertex_point(mesh, v, &face_points)?));
    }
    for &(v, pos) in &moved {
        mesh.set_position(v, pos);
    }
    tracing::debug!(vertices = moved.len(), "moved original vertices");

    // Step 4: one quad per corner of each original patch
    for i in 0..num_patches {
        let p = PatchId::new(i);
        connect_quads(mesh, p, centroids[i])?;
    }

    for i in 0..mesh.num_nodes() {
        mesh.node_mut(NodeId::new(i)).is_original = true;
    }
    for i in 0..mesh.num_edges() {
        mesh.edge_mut(EdgeId::new(i)).is_original = true;
    }

    tracing::debug!(
        nodes = mesh.num_nodes(),
        edges = mesh.num_edges(),
        patches = mesh.num_patches(),
        "subdivision step complete"
    );
    Ok(())
}

/// New position of an original vertex, once its edges carry edge points.
fn vertex_point(
    mesh: &PatchMesh,
    v: NodeId,
    face_points: &[Point3<f64>],
) -> Result<Point3<f64>> {
    let mut edge_sum = Vector3::zeros();
    let mut face_sum = Vector3::zeros();
    let mut valence = 0usize;

    for h in mesh.incident_edges(v) {
        let h = h?;
        // h runs edge point -> v, so its sym ends at the edge point.
        let sym = mesh.require_sym(h)?;
        edge_sum += mesh.position(mesh.node_of(sym)).coords;
        face_sum += face_points[mesh.patch_of(h).index()].coords;
        valence += 1;
    }

    let n = valence as f64;
    let old = mesh.position(v).coords;
    Ok(Point3::from(old * ((n - 2.0) / n) + edge_sum / (n * n) + face_sum / (n * n)))
}

/// Replace the loop of `p` (which alternates corners and edge points) with
/// quads meeting at the face point `c`.
fn connect_quads(mesh: &mut PatchMesh, p: PatchId, c: NodeId) -> Result<()> {
    let mut boundary = mesh.collect_boundary(p)?;
    let first_corner = boundary
        .iter()
        .position(|&e| mesh.node(mesh.node_of(e)).is_original)
        .ok_or(MeshError::MalformedPatch {
            patch: p.index(),
            reason: "loop has no original corner",
        })?;
    boundary.rotate_left(first_corner);
    if boundary.len() % 2 != 0 {
        return Err(MeshError::MalformedPatch {
            patch: p.index(),
            reason: "loop does not alternate corners and edge points",
        });
    }

    // boundary = [in_0, out_0, in_1, out_1, ...], where in_i ends at corner
    // v_i and out_i ends at the edge point m_i after it.
    let corners = boundary.len() / 2;
    let mut to_center = Vec::with_capacity(corners);
    let mut from_center = Vec::with_capacity(corners);

    for i in 0..corners {
        let incoming = boundary[2 * i];
        let outgoing = boundary[2 * i + 1];
        let before = mesh.node_of(boundary[(2 * i + 2 * corners - 1) % (2 * corners)]);

        let quad = if i == 0 {
            p
        } else {
            let color = mesh.random_color();
            mesh.create_patch(color)
        };

        let a = mesh.create_edge();
        let b = mesh.create_edge();
        mesh.set_node(a, c);
        mesh.set_node(b, before);

        mesh.set_next(outgoing, a);
        mesh.set_next(a, b);
        mesh.set_next(b, incoming);

        mesh.set_patch(outgoing, quad);
        mesh.set_patch(a, quad);
        mesh.set_patch(b, quad);
        mesh.set_boundary(quad, incoming);

        to_center.push(a);
        from_center.push(b);
    }

    for i in 0..corners {
        mesh.link_sym(to_center[i], from_center[(i + 1) % corners]);
    }

    Ok(())
}
