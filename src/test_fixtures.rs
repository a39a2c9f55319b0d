//! Small OBJ meshes shared by the unit tests.

/// One triangle, all edges on the boundary.
pub(crate) const TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";

/// Two triangles sharing the diagonal of the unit square.
pub(crate) const TWO_TRIANGLES: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3
f 1 3 4
";

/// The unit square as a single quad.
pub(crate) const QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

/// A regular-ish pentagon with texture coordinates on its references.
pub(crate) const PENTAGON: &str = "\
v 1 0 0
v 0.309 0.951 0
v -0.809 0.588 0
v -0.809 -0.588 0
v 0.309 -0.951 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vt 0.5 0.5
f 1/1 2/2 3/3 4/4 5/5
";

/// Closed unit cube with outward-facing quads.
pub(crate) const CUBE: &str = "\
# unit cube
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
f 1 4 3 2
f 5 6 7 8
f 1 2 6 5
f 3 4 8 7
f 1 5 8 4
f 2 3 7 6
";

/// Closed tetrahedron with outward-facing triangles.
pub(crate) const TETRAHEDRON: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
f 1 3 2
f 1 2 4
f 1 4 3
f 2 3 4
";
