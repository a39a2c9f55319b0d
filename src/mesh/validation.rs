//! Connectivity checks for [`PatchMesh`].
//!
//! Validates that:
//! 1. Every node's representative edge points back at the node
//! 2. Every patch loop closes and every member of it refers to the patch
//! 3. Every sym relationship is mutual, joins opposite directions and
//!    crosses to a different patch

use super::halfedge::PatchMesh;

impl PatchMesh {
    /// Check the half-edge invariants, describing the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        for (nid, n) in self.nodes() {
            if n.edge.is_valid() {
                if n.edge.index() >= self.num_edges() {
                    return Err(format!(
                        "{:?}: representative edge {:?} does not exist",
                        nid, n.edge
                    ));
                }
                if self.node_of(n.edge) != nid {
                    return Err(format!(
                        "{:?}: representative edge {:?} points to {:?}",
                        nid,
                        n.edge,
                        self.node_of(n.edge)
                    ));
                }
            }
        }

        let mut seen = vec![false; self.num_edges()];
        for pid in self.patch_ids() {
            let edge = self.boundary_edge(pid);
            if !edge.is_valid() {
                return Err(format!("{:?}: no boundary edge", pid));
            }
            let loop_edges = self
                .collect_boundary(pid)
                .map_err(|e| format!("{:?}: {}", pid, e))?;
            if loop_edges.len() < 3 {
                return Err(format!("{:?}: loop has {} sides", pid, loop_edges.len()));
            }
            for e in loop_edges {
                if self.patch_of(e) != pid {
                    return Err(format!(
                        "{:?}: loop member {:?} belongs to {:?}",
                        pid,
                        e,
                        self.patch_of(e)
                    ));
                }
                if seen[e.index()] {
                    return Err(format!("{:?}: half-edge {:?} is in two loops", pid, e));
                }
                seen[e.index()] = true;
            }
        }

        for (eid, e) in self.edges() {
            if !seen[eid.index()] {
                return Err(format!("{:?}: not on any patch loop", eid));
            }
            if !e.node.is_valid() {
                return Err(format!("{:?}: no terminal node", eid));
            }
            let Some(sym) = e.sym.valid() else {
                continue;
            };
            if sym.index() >= self.num_edges() {
                return Err(format!("{:?}: sym {:?} does not exist", eid, sym));
            }
            if self.sym(sym) != Some(eid) {
                return Err(format!("{:?}: sym {:?} does not point back", eid, sym));
            }
            if self.patch_of(sym) == e.patch {
                return Err(format!("{:?}: sym {:?} is on the same patch", eid, sym));
            }
            let origin = self
                .node_of(self.predecessor(eid).map_err(|err| format!("{:?}: {}", eid, err))?);
            let sym_origin = self
                .node_of(self.predecessor(sym).map_err(|err| format!("{:?}: {}", sym, err))?);
            if sym_origin != e.node || self.node_of(sym) != origin {
                return Err(format!("{:?}: sym {:?} does not join the same nodes", eid, sym));
            }
        }

        Ok(())
    }

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
