//! Neighborhood traversal.
//!
//! Two walks cover everything the editors and the render derivation need:
//!
//! - the **patch loop**, `current = current.next` from `patch.edge`;
//! - the **vertex ring**, `current = current.next.sym` from `node.edge`, which
//!   visits every half-edge pointing *into* the node.
//!
//! Both walks stop when the starting half-edge comes around again. A walk on a
//! well-formed mesh can never take more steps than there are half-edges, so
//! that count is used as a cap; exceeding it yields [`MeshError::BrokenLoop`]
//! instead of spinning forever. Items are `Result`s so a broken walk can be
//! collected with `collect::<Result<Vec<_>>>()`.

use super::halfedge::PatchMesh;
use super::index::{EdgeId, NodeId, PatchId};
use crate::error::{MeshError, Result};

impl PatchMesh {
    /// Iterate over the half-edges of a patch loop, starting at its boundary edge.
    pub fn boundary_edges(&self, p: PatchId) -> PatchLoopIter<'_> {
        PatchLoopIter::new(self, self.boundary_edge(p))
    }

    /// Iterate over the half-edges of the loop containing `e`, starting at `e`.
    pub fn loop_from(&self, e: EdgeId) -> PatchLoopIter<'_> {
        PatchLoopIter::new(self, e)
    }

    /// Iterate over the nodes of a patch loop.
    pub fn patch_nodes(&self, p: PatchId) -> impl Iterator<Item = Result<NodeId>> + '_ {
        self.boundary_edges(p).map(move |e| e.map(|e| self.node_of(e)))
    }

    /// Collect the half-edges of a patch loop.
    pub fn collect_boundary(&self, p: PatchId) -> Result<Vec<EdgeId>> {
        self.boundary_edges(p).collect()
    }

    /// Number of sides of a patch.
    pub fn patch_degree(&self, p: PatchId) -> Result<usize> {
        self.boundary_edges(p).try_fold(0, |n, e| e.map(|_| n + 1))
    }

    /// Iterate over the half-edges pointing into a node.
    ///
    /// Fails with [`MeshError::BoundaryEdge`] when the ring reaches a half-edge
    /// without a sym.
    pub fn incident_edges(&self, n: NodeId) -> VertexRingIter<'_> {
        VertexRingIter::new(self, self.node(n).edge)
    }

    /// Iterate over the patches around a node, one per incoming half-edge.
    pub fn incident_patches(&self, n: NodeId) -> impl Iterator<Item = Result<PatchId>> + '_ {
        self.incident_edges(n).map(move |e| e.map(|e| self.patch_of(e)))
    }

    /// Collect the half-edges pointing into a node.
    pub fn collect_ring(&self, n: NodeId) -> Result<Vec<EdgeId>> {
        self.incident_edges(n).collect()
    }

    /// Find the half-edge whose `next` is `e`.
    pub fn predecessor(&self, e: EdgeId) -> Result<EdgeId> {
        let mut prev = e;
        for current in self.loop_from(e) {
            prev = current?;
        }
        Ok(prev)
    }

    fn walk_limit(&self) -> usize {
        self.num_edges()
    }
}

/// Iterator over the half-edges of a patch loop.
pub struct PatchLoopIter<'a> {
    mesh: &'a PatchMesh,
    start: EdgeId,
    current: EdgeId,
    steps: usize,
    done: bool,
}

impl<'a> PatchLoopIter<'a> {
    fn new(mesh: &'a PatchMesh, start: EdgeId) -> Self {
        Self {
            mesh,
            start,
            current: start,
            steps: 0,
            done: !start.is_valid(),
        }
    }

    fn broken(&mut self) -> Option<Result<EdgeId>> {
        self.done = true;
        Some(Err(MeshError::BrokenLoop {
            walk: "patch loop",
            start: self.start.index(),
            limit: self.mesh.walk_limit(),
        }))
    }
}

impl Iterator for PatchLoopIter<'_> {
    type Item = Result<EdgeId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.steps >= self.mesh.walk_limit() || !self.current.is_valid() {
            return self.broken();
        }

        let result = self.current;
        self.steps += 1;
        self.current = self.mesh.next(result);

        if self.current == self.start {
            self.done = true;
        }

        Some(Ok(result))
    }
}

/// Iterator over the half-edges pointing into a node.
pub struct VertexRingIter<'a> {
    mesh: &'a PatchMesh,
    start: EdgeId,
    current: EdgeId,
    steps: usize,
    done: bool,
}

impl<'a> VertexRingIter<'a> {
    fn new(mesh: &'a PatchMesh, start: EdgeId) -> Self {
        Self {
            mesh,
            start,
            current: start,
            steps: 0,
            done: !start.is_valid(),
        }
    }
}

impl Iterator for VertexRingIter<'_> {
    type Item = Result<EdgeId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.steps >= self.mesh.walk_limit() {
            self.done = true;
            return Some(Err(MeshError::BrokenLoop {
                walk: "vertex ring",
                start: self.start.index(),
                limit: self.mesh.walk_limit(),
            }));
        }

        let result = self.current;
        self.steps += 1;

        // If `result` is u -> v, then `next` leaves v and its sym comes back into v.
        let out = self.mesh.next(result);
        if !out.is_valid() {
            self.done = true;
            return Some(Err(MeshError::BrokenLoop {
                walk: "vertex ring",
                start: self.start.index(),
                limit: self.mesh.walk_limit(),
            }));
        }
        match self.mesh.sym(out) {
            Some(incoming) => self.current = incoming,
            None => {
                self.done = true;
                return Some(Err(MeshError::BoundaryEdge { edge: out.index() }));
            }
        }

        if self.current == self.start {
            self.done = true;
        }

        Some(Ok(result))
    }
}
