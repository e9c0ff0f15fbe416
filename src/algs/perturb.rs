//! Randomized connectivity shuffling by repeated spins.
//!
//! Useful for producing irregular meshes from regular generators and for
//! stress-testing code that consumes a [`Topology`].

use rand::Rng;

use crate::algs::euler::SpinKind;
use crate::mesh_error::TopologyError;
use crate::topology::attributes::EdgeAttribute;
use crate::topology::topology::Topology;
use crate::topology::wrap::EdgeWrap;

/// Tries `attempts` spins on uniformly chosen edges and kinds, skipping the
/// ones whose preconditions fail. Returns how many were applied.
///
/// When `wraps` is given it is kept consistent with every applied spin; its
/// length is checked once up front.
pub fn spin_random_edges<R: Rng + ?Sized>(
    topology: &mut Topology,
    rng: &mut R,
    attempts: usize,
    mut wraps: Option<&mut EdgeAttribute<EdgeWrap>>,
) -> Result<usize, TopologyError> {
    if let Some(wraps) = wraps.as_deref() {
        wraps.check_len(topology)?;
    }
    let edges = topology.edge_count();
    if edges == 0 {
        return Ok(0);
    }

    let mut applied = 0;
    for _ in 0..attempts {
        let edge = rng.gen_range(0..edges);
        let kind = SpinKind::ALL[rng.gen_range(0..SpinKind::ALL.len())];
        if !topology.can_spin(kind, edge) {
            continue;
        }
        match wraps.as_deref_mut() {
            Some(wraps) => topology.spin_with_wrap(kind, edge, wraps)?,
            None => topology.spin(kind, edge)?,
        }
        applied += 1;
    }
    log::debug!("spin_random_edges: applied {applied} of {attempts} attempts");
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::meshgen::{self, GridWrap};
    use crate::topology::validation::{TopologyValidationOptions, validate_topology, validate_wrap};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn shuffled_icosahedron_stays_valid() {
        let mut t = meshgen::icosahedron().unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let applied = spin_random_edges(&mut t, &mut rng, 200, None).unwrap();
        assert!(applied > 0);
        assert_eq!(t.euler_characteristic(), 2);
        assert_eq!(t.edge_count(), 60);
        validate_topology(&t, TopologyValidationOptions::all()).unwrap();
    }

    #[test]
    fn shuffled_torus_keeps_wraps() {
        let (mut t, mut wraps) = meshgen::quad_grid(10, 10, GridWrap::BOTH).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        spin_random_edges(&mut t, &mut rng, 150, Some(&mut wraps)).unwrap();
        validate_topology(&t, TopologyValidationOptions::all()).unwrap();
        validate_wrap(&t, &wraps).unwrap();
    }

    #[test]
    fn shuffled_cylinders_keep_wraps() {
        for (seed, wrap) in [(5, GridWrap::AXIS0), (6, GridWrap::AXIS1)] {
            let (mut t, mut wraps) = meshgen::quad_grid(10, 10, wrap).unwrap();
            let mut rng = SmallRng::seed_from_u64(seed);
            let applied = spin_random_edges(&mut t, &mut rng, 300, Some(&mut wraps)).unwrap();
            assert!(applied > 0);
            assert_eq!(t.external_face_count(), 2);
            validate_topology(&t, TopologyValidationOptions::all()).unwrap();
            validate_wrap(&t, &wraps).unwrap();
        }
    }

    #[test]
    fn mismatched_wraps_are_rejected() {
        let mut t = meshgen::cube().unwrap();
        let before = t.clone();
        let mut wraps = EdgeAttribute::from_vec(vec![EdgeWrap::empty(); 3]);
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(
            spin_random_edges(&mut t, &mut rng, 10, Some(&mut wraps)),
            Err(TopologyError::AttributeLengthMismatch { expected: 24, found: 3 })
        ));
        assert_eq!(t, before);
    }
}
