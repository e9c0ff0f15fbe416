use polygon_topology::prelude::*;
use polygon_topology::topology::EdgeRecord;

#[test]
fn topology_json_roundtrip() {
    let t = meshgen::cube().unwrap();
    let s = serde_json::to_string(&t).unwrap();
    let back: Topology = serde_json::from_str(&s).unwrap();
    assert_eq!(back, t);
    validate_topology(&back, TopologyValidationOptions::all()).unwrap();
}

#[test]
fn topology_bincode_roundtrip() {
    let (t, _) = meshgen::quad_grid(3, 4, GridWrap::NONE).unwrap();
    let bytes = bincode::serialize(&t).unwrap();
    let back: Topology = bincode::deserialize(&bytes).unwrap();
    assert_eq!(back, t);
    assert_eq!(back.first_external_face_index(), 12);
}

#[test]
fn wrap_attribute_roundtrip() {
    let (t, wraps) = meshgen::quad_grid(3, 3, GridWrap::BOTH).unwrap();
    let s = serde_json::to_string(&wraps).unwrap();
    let back: EdgeAttribute<EdgeWrap> = serde_json::from_str(&s).unwrap();
    assert_eq!(back, wraps);
    validate_wrap(&t, &back).unwrap();

    let single = EdgeWrap::FACE_TO_FACE_NEG_AXIS1 | EdgeWrap::VERT_TO_FACE_POS_AXIS0;
    let bytes = bincode::serialize(&single).unwrap();
    let back: EdgeWrap = bincode::deserialize(&bytes).unwrap();
    assert_eq!(back, single);
}

#[test]
fn edge_records_are_plain_bytes() {
    let t = meshgen::tetrahedron().unwrap();
    let records: &[EdgeRecord] = bytemuck::cast_slice(t.edge_bytes());
    assert_eq!(records, t.edge_records());
    assert_eq!(records[0].twin(), t.twin(0));
}

#[test]
fn json_with_broken_twin_is_rejected() {
    let t = meshgen::cube().unwrap();
    let mut value = serde_json::to_value(&t).unwrap();
    value["edges"][0]["twin"] = serde_json::json!(0);
    let err = serde_json::from_value::<Topology>(value).unwrap_err();
    assert!(err.to_string().contains("inconsistent twin"), "{err}");
}

#[test]
fn json_with_dangling_index_is_rejected() {
    let (t, _) = meshgen::quad_grid(2, 2, GridWrap::NONE).unwrap();
    let mut value = serde_json::to_value(&t).unwrap();
    value["edges"][3]["far_face"] = serde_json::json!(t.face_count());
    let err = serde_json::from_value::<Topology>(value).unwrap_err();
    assert!(err.to_string().contains("out of range"), "{err}");

    let mut value = serde_json::to_value(&t).unwrap();
    value["first_external_face_index"] = serde_json::json!(t.face_count() + 1);
    assert!(serde_json::from_value::<Topology>(value).is_err());
}

#[test]
fn json_with_miscounted_face_is_rejected() {
    let t = meshgen::octahedron().unwrap();
    let mut value = serde_json::to_value(&t).unwrap();
    value["face_neighbor_counts"][0] = serde_json::json!(4);
    assert!(serde_json::from_value::<Topology>(value).is_err());
}
