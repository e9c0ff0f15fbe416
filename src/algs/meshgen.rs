//! Generators for the standard closed shells and for structured quad grids.
//!
//! The shells are built from fixed connectivity tables; the grid can be made
//! periodic along either axis, in which case the returned [`EdgeWrap`] array
//! records where edges cross the seam.

use crate::algs::build::{FaceVertexBuilder, VertexVertexBuilder};
use crate::mesh_error::TopologyError;
use crate::topology::attributes::EdgeAttribute;
use crate::topology::topology::Topology;
use crate::topology::wrap::{EdgeWrap, WrapRelation};

const TETRAHEDRON: [[usize; 3]; 4] = [[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];

const CUBE: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 7, 6, 5],
    [0, 4, 5, 1],
    [1, 5, 6, 2],
    [2, 6, 7, 3],
    [3, 7, 4, 0],
];

const OCTAHEDRON: [[usize; 3]; 8] = [
    [4, 0, 2],
    [4, 2, 1],
    [4, 1, 3],
    [4, 3, 0],
    [5, 2, 0],
    [5, 1, 2],
    [5, 3, 1],
    [5, 0, 3],
];

/// Clockwise neighbor rings of the twelve icosahedron vertices.
const ICOSAHEDRON: [[usize; 5]; 12] = [
    [1, 7, 10, 11, 5],
    [0, 5, 9, 8, 7],
    [3, 4, 11, 10, 6],
    [2, 6, 8, 9, 4],
    [2, 3, 9, 5, 11],
    [0, 11, 4, 9, 1],
    [2, 10, 7, 8, 3],
    [0, 1, 8, 6, 10],
    [1, 9, 3, 6, 7],
    [1, 5, 4, 3, 8],
    [0, 7, 6, 2, 11],
    [0, 10, 2, 4, 5],
];

fn from_faces<const N: usize>(faces: &[[usize; N]]) -> Result<Topology, TopologyError> {
    let mut builder = FaceVertexBuilder::with_capacity(faces.len());
    for face in faces {
        builder.add_face(face.iter().copied());
    }
    builder.build()
}

/// 4 vertices, 4 triangles.
pub fn tetrahedron() -> Result<Topology, TopologyError> {
    from_faces(&TETRAHEDRON)
}

/// 8 vertices, 6 quads.
pub fn cube() -> Result<Topology, TopologyError> {
    from_faces(&CUBE)
}

/// 6 vertices, 8 triangles; the dual of [`cube`].
pub fn octahedron() -> Result<Topology, TopologyError> {
    from_faces(&OCTAHEDRON)
}

/// 12 vertices, 20 triangles, built from vertex neighbor rings.
pub fn icosahedron() -> Result<Topology, TopologyError> {
    let mut builder = VertexVertexBuilder::with_capacity(ICOSAHEDRON.len()).with_face_count(20);
    for ring in &ICOSAHEDRON {
        builder.add_vertex(ring.iter().copied());
    }
    builder.build()
}

/// Which grid axes are periodic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridWrap {
    pub axis0: bool,
    pub axis1: bool,
}

impl GridWrap {
    /// A planar patch with a boundary all around.
    pub const NONE: GridWrap = GridWrap {
        axis0: false,
        axis1: false,
    };
    /// A cylinder, periodic along the columns.
    pub const AXIS0: GridWrap = GridWrap {
        axis0: true,
        axis1: false,
    };
    /// A cylinder, periodic along the rows.
    pub const AXIS1: GridWrap = GridWrap {
        axis0: false,
        axis1: true,
    };
    /// A torus.
    pub const BOTH: GridWrap = GridWrap {
        axis0: true,
        axis1: true,
    };

    fn get(self, axis: usize) -> bool {
        if axis == 0 { self.axis0 } else { self.axis1 }
    }
}

/// Lattice positions on a doubled grid: vertices on even, faces on odd
/// coordinates. Used only to derive seam crossings.
struct GridLattice {
    vertex_columns: usize,
    columns: usize,
    wrap: GridWrap,
    extent: [i64; 2],
}

impl GridLattice {
    fn vertex(&self, v: usize) -> [i64; 2] {
        [
            2 * (v % self.vertex_columns) as i64,
            2 * (v / self.vertex_columns) as i64,
        ]
    }

    fn face(&self, f: usize) -> [i64; 2] {
        [2 * (f % self.columns) as i64 + 1, 2 * (f / self.columns) as i64 + 1]
    }

    /// Seam crossings walking from `a` to `b`; a short forward step that
    /// shows up as a long backward jump crossed the seam positively.
    fn crossing(&self, a: Option<[i64; 2]>, b: Option<[i64; 2]>) -> [i32; 2] {
        let (Some(a), Some(b)) = (a, b) else {
            return [0, 0];
        };
        let mut out = [0; 2];
        for axis in 0..2 {
            if !self.wrap.get(axis) {
                continue;
            }
            let d = b[axis] - a[axis];
            let half = self.extent[axis] / 2;
            if d < -half {
                out[axis] = 1;
            } else if d > half {
                out[axis] = -1;
            }
        }
        out
    }
}

fn wrap_part(relation: WrapRelation, axes: [i32; 2]) -> EdgeWrap {
    EdgeWrap::from_axes(relation, axes[0], axes[1])
}

/// A `columns x rows` grid of quads, optionally periodic.
///
/// Faces are numbered row-major; face `(i, j)` has corners
/// `(i, j), (i+1, j), (i+1, j+1), (i, j+1)`. A periodic axis reuses the
/// first vertex column (row) in place of the last and needs at least three
/// cells. The wrap flags of every edge are returned alongside; they are all
/// empty for a planar grid.
pub fn quad_grid(
    columns: usize,
    rows: usize,
    wrap: GridWrap,
) -> Result<(Topology, EdgeAttribute<EdgeWrap>), TopologyError> {
    let invalid = |reason| TopologyError::InvalidGrid {
        columns,
        rows,
        reason,
    };
    if columns == 0 || rows == 0 {
        return Err(invalid("grid needs at least one cell along each axis"));
    }
    if (wrap.axis0 && columns < 3) || (wrap.axis1 && rows < 3) {
        return Err(invalid("a periodic axis needs at least three cells"));
    }

    let vertex_columns = if wrap.axis0 { columns } else { columns + 1 };
    let vertex_rows = if wrap.axis1 { rows } else { rows + 1 };
    let v = |i: usize, j: usize| (j % vertex_rows) * vertex_columns + (i % vertex_columns);

    let mut builder = FaceVertexBuilder::with_capacity(columns * rows)
        .with_vertex_count(vertex_columns * vertex_rows);
    for j in 0..rows {
        for i in 0..columns {
            builder.add_face([v(i, j), v(i + 1, j), v(i + 1, j + 1), v(i, j + 1)]);
        }
    }
    let topology = builder.build()?;

    let lattice = GridLattice {
        vertex_columns,
        columns,
        wrap,
        extent: [2 * columns as i64, 2 * rows as i64],
    };
    let face_position = |f: usize| topology.is_internal_face(f).then(|| lattice.face(f));
    let wraps = (0..topology.edge_count())
        .map(|e| {
            let near_v = Some(lattice.vertex(topology.near_vertex(e)));
            let far_v = Some(lattice.vertex(topology.far_vertex(e)));
            let near_f = face_position(topology.near_face(e));
            let far_f = face_position(topology.far_face(e));
            wrap_part(WrapRelation::VertToVert, lattice.crossing(near_v, far_v))
                | wrap_part(WrapRelation::VertToFace, lattice.crossing(near_v, far_f))
                | wrap_part(WrapRelation::FaceToVert, lattice.crossing(near_f, far_v))
                | wrap_part(WrapRelation::FaceToFace, lattice.crossing(near_f, far_f))
        })
        .collect();
    let wraps = EdgeAttribute::from_vec_for(&topology, wraps)?;

    log::debug!(
        "quad grid {columns}x{rows} (wrap {wrap:?}): {} vertices, {} faces",
        topology.vertex_count(),
        topology.face_count()
    );
    Ok((topology, wraps))
}
