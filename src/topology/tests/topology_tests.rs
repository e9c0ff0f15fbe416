use crate::algs::meshgen::{self, GridWrap};
use crate::mesh_error::{ElementKind, TopologyError};
use crate::topology::Topology;

fn shapes() -> Vec<Topology> {
    vec![
        meshgen::tetrahedron().unwrap(),
        meshgen::cube().unwrap(),
        meshgen::icosahedron().unwrap(),
        meshgen::quad_grid(3, 2, GridWrap::NONE).unwrap().0,
        meshgen::quad_grid(4, 3, GridWrap::AXIS0).unwrap().0,
    ]
}

#[test]
fn navigation_identities_hold() {
    for t in shapes() {
        for e in 0..t.edge_count() {
            assert_eq!(t.twin(t.twin(e)), e);
            assert_eq!(t.v_prev(t.v_next(e)), e);
            assert_eq!(t.f_prev(t.f_next(e)), e);
            assert_eq!(t.f_next(e), t.twin(t.v_prev(e)));
            assert_eq!(t.near_vertex(e), t.far_vertex(t.twin(e)));
            assert_eq!(t.near_face(e), t.far_face(t.twin(e)));
            // the face between e and v_next(e) has e's twin on its boundary
            assert_eq!(t.near_face(t.f_prev(t.twin(e))), t.far_face(e));
        }
    }
}

#[test]
fn rotations_have_declared_length() {
    for t in shapes() {
        for v in t.vertices() {
            let edges: Vec<_> = v.edges().collect();
            assert_eq!(edges.len(), v.neighbor_count());
            assert!(edges.iter().all(|e| e.near_vertex() == v));
            assert_eq!(edges[0].prev().next(), edges[0]);
        }
        for f in t.faces() {
            let edges = f.edges();
            assert_eq!(edges.len(), f.neighbor_count());
            assert!(edges.into_iter().all(|e| e.near_face() == f));
        }
    }
}

#[test]
fn sizes_are_consistent() {
    let t = meshgen::cube().unwrap();
    assert_eq!(t.edge_count(), 24);
    assert_eq!(t.undirected_edge_count(), 12);
    assert_eq!(t.internal_face_count(), 6);
    assert_eq!(t.external_face_count(), 0);
    assert!(!t.has_external_faces());
    assert_eq!(t.internal_faces().len(), 6);
    assert_eq!(t.external_faces().len(), 0);
    assert_eq!(t.vertex_edges().len(), 24);
    assert_eq!(t.edge_bytes().len(), 24 * 20);
}

#[test]
fn handle_views_share_the_edge() {
    let t = meshgen::tetrahedron().unwrap();
    let ve = t.find_vertex_edge(0, 1).unwrap();
    let fe = ve.face_edge();
    assert_eq!(fe.index(), ve.index());
    assert_eq!(fe, ve);
    assert_eq!(fe.vertex_edge(), ve);
    assert_eq!(fe.next_vertex(), ve.near_vertex());
    assert_eq!(fe.prev_vertex(), ve.far_vertex());
    assert_eq!(fe.near_face(), ve.prev_face());
    assert_eq!(fe.far_face(), ve.next_face());
    assert_eq!(ve.twin().twin(), ve);
}

#[test]
fn tetrahedron_neighborhoods() {
    let t = meshgen::tetrahedron().unwrap();
    let mut around: Vec<usize> = t.vertex(0).neighbors().map(|v| v.index()).collect();
    around.sort_unstable();
    assert_eq!(around, vec![1, 2, 3]);

    let mut faces: Vec<usize> = t.vertex(0).faces().map(|f| f.index()).collect();
    faces.sort_unstable();
    assert_eq!(faces, vec![0, 1, 2]);

    let mut beside: Vec<usize> = t.face(3).neighbors().map(|f| f.index()).collect();
    beside.sort_unstable();
    assert_eq!(beside, vec![0, 1, 2]);
    assert!(t.find_vertex_edge(0, 0).is_none());
    assert!(t.find_vertex_edge(9, 0).is_none());
}

#[test]
fn boundary_predicates_on_open_grid() {
    let (t, _) = meshgen::quad_grid(2, 2, GridWrap::NONE).unwrap();
    assert!(t.vertex(0).is_boundary());
    assert!(!t.vertex(4).is_boundary());
    assert!(t.face(0).is_boundary());
    assert!(t.face(0).is_internal());
    assert!(t.face(4).is_external());
    assert!(t.face(4).is_boundary());

    let e = t.find_vertex_edge(0, 1).unwrap();
    assert!(e.is_boundary());
    assert!(e.is_outer_boundary() != e.is_inner_boundary());
    assert!(!t.find_vertex_edge(1, 4).unwrap().is_boundary());
}

#[test]
fn checked_handle_access() {
    let t = meshgen::tetrahedron().unwrap();
    assert_eq!(t.try_vertex(3).unwrap().index(), 3);
    assert_eq!(
        t.try_face(4).unwrap_err(),
        TopologyError::OutOfRange {
            kind: ElementKind::Face,
            index: 4,
            len: 4
        }
    );
    assert!(matches!(
        t.try_vertex_edge(12),
        Err(TopologyError::OutOfRange { kind: ElementKind::Edge, .. })
    ));
    assert!(t.try_face_edge(11).is_ok());
}

#[test]
#[should_panic]
fn unchecked_handle_access_panics() {
    let t = meshgen::tetrahedron().unwrap();
    let _ = t.vertex(4);
}

#[test]
fn handles_from_different_topologies_differ() {
    let a = meshgen::tetrahedron().unwrap();
    let b = meshgen::tetrahedron().unwrap();
    assert_ne!(a.vertex(0), b.vertex(0));
    assert_eq!(a.vertex(0), a.vertex(0));
}

#[test]
fn empty_topology_is_trivial() {
    let t = Topology::default();
    assert_eq!(t.vertex_count(), 0);
    assert_eq!(t.edge_count(), 0);
    assert!(t.is_closed());
    assert_eq!(t.euler_characteristic(), 0);
}
