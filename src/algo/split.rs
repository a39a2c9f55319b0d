//! Edge split.
//!
//! Splitting the half-edge pair `e: A -> B` / `s: B -> A` inserts a node `M` at
//! the midpoint and rewires both patch loops in place:
//!
//! ```text
//!   before:  ... -> e(A->B) -> e.next ...      ... -> s(B->A) -> s.next ...
//!   after:   ... -> e(A->M) -> e2(M->B) -> e.next ...
//!            ... -> s(B->M) -> s2(M->A) -> s.next ...
//! ```
//!
//! with syms `e <-> s2` and `s <-> e2`. No patches are created; each adjacent
//! patch gains one side.

use nalgebra::center;

use crate::error::Result;
use crate::mesh::{EdgeId, NodeId, PatchMesh};

/// Split a paired half-edge at its midpoint, returning the new node.
///
/// Fails with [`MeshError::BoundaryEdge`](crate::error::MeshError::BoundaryEdge)
/// when `e` has no sym, leaving the mesh untouched.
pub fn split_edge(mesh: &mut PatchMesh, e: EdgeId) -> Result<NodeId> {
    mesh.check_edge(e)?;
    let s = mesh.require_sym(e)?;

    let a = mesh.node_of(s);
    let b = mesh.node_of(e);
    let midpoint = center(mesh.position(a), mesh.position(b));

    let m = mesh.create_node(midpoint);
    let (e2, s2) = rewire_split(mesh, e, s, m);

    tracing::trace!(
        edge = e.index(),
        sym = s.index(),
        node = m.index(),
        e2 = e2.index(),
        s2 = s2.index(),
        "split edge"
    );
    Ok(m)
}

/// Insert the existing node `m` between the pair `e` / `s`.
///
/// Returns the two new half-edges `(e2, s2)`, continuing `e` and `s`
/// respectively.
pub(crate) fn rewire_split(
    mesh: &mut PatchMesh,
    e: EdgeId,
    s: EdgeId,
    m: NodeId,
) -> (EdgeId, EdgeId) {
    let (b, e_next, p) = (mesh.node_of(e), mesh.next(e), mesh.patch_of(e));
    let (a, s_next, q) = (mesh.node_of(s), mesh.next(s), mesh.patch_of(s));

    let e2 = mesh.create_edge();
    mesh.set_node(e2, b);
    mesh.set_next(e2, e_next);
    mesh.set_patch(e2, p);

    let s2 = mesh.create_edge();
    mesh.set_node(s2, a);
    mesh.set_next(s2, s_next);
    mesh.set_patch(s2, q);

    mesh.set_node(e, m);
    mesh.set_next(e, e2);
    mesh.set_node(s, m);
    mesh.set_next(s, s2);

    mesh.link_sym(e2, s);
    mesh.link_sym(s2, e);

    (e2, s2)
}
