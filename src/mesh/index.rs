//! Handle types for mesh elements.
//!
//! Nodes, half-edges and patches live in per-kind arenas inside
//! [`PatchMesh`](super::PatchMesh). A handle is the element's position in its
//! arena. Elements are never removed, so a handle stays valid for the lifetime
//! of the mesh that issued it, and the arena index doubles as the element id.

use std::fmt::{self, Debug, Display};

use crate::error::MeshError;

/// Raw storage for a handle. `u32::MAX` is reserved as the null value.
type RawIndex = u32;

const INVALID: RawIndex = RawIndex::MAX;

/// A handle to a node (vertex).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(RawIndex);

/// A handle to a half-edge.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId(RawIndex);

/// A handle to a patch (face).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct PatchId(RawIndex);

macro_rules! impl_handle {
    ($name:ident, $short:literal, $label:literal, $kind:literal) => {
        impl $name {
            /// Create a handle from an arena index.
            ///
            /// Meant for indices the mesh itself produced. Use `try_from` for
            /// indices that come from outside.
            ///
            /// # Panics
            /// Panics in debug builds if the index does not fit the handle.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large for a handle", index);
                Self(index as RawIndex)
            }

            /// The null handle, used for references that are not set yet.
            #[inline]
            pub fn invalid() -> Self {
                Self(INVALID)
            }

            /// The arena index (and element id).
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a set (non-null) handle.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }

            /// Convert to `Some(self)` if set.
            #[inline]
            pub fn valid(self) -> Option<Self> {
                self.is_valid().then_some(self)
            }

            /// Label used when listing elements, e.g. `"Vertex 4"`.
            pub fn label(self) -> String {
                format!("{} {}", $label, self.index())
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $short, self.index())
                } else {
                    write!(f, "{}(INVALID)", $short)
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Debug::fmt(self, f)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl TryFrom<usize> for $name {
            type Error = MeshError;

            /// Reject indices that would wrap or hit the null value.
            fn try_from(index: usize) -> Result<Self, MeshError> {
                match RawIndex::try_from(index) {
                    Ok(raw) if raw != INVALID => Ok(Self(raw)),
                    _ => Err(MeshError::InvalidHandle { kind: $kind, index }),
                }
            }
        }
    };
}

impl_handle!(NodeId, "N", "Vertex", "node");
impl_handle!(EdgeId, "E", "HalfEdge", "half-edge");
impl_handle!(PatchId, "P", "Face", "patch");
