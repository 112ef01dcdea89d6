//! Seeded random nets.

use petri_core::{Net, NetId, NetModel, Position};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Build a random net with `places` places and `transitions` transitions.
///
/// Each (place, transition) pair gets an input arc with probability
/// `density` and, independently, an output arc with the same
/// probability. Weights are drawn from `1..=3` and tokens from `0..=5`.
/// The same seed always yields the same structure and values; element
/// identities are fresh on every call.
pub fn random_net(seed: u64, places: usize, transitions: usize, density: f64) -> Net {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut model = NetModel::from_net(Net::new(NetId::from(format!("random-{seed}")), "random"));

    let mut place_ids = Vec::with_capacity(places);
    for i in 0..places {
        let pos = Position::new(i as f64 * 60.0, 0.0);
        let id = model.add_place(pos).expect("unlocked model");
        model
            .set_tokens(&id, rng.random_range(0..=5))
            .expect("place exists");
        place_ids.push(id);
    }
    let mut transition_ids = Vec::with_capacity(transitions);
    for i in 0..transitions {
        let pos = Position::new(i as f64 * 60.0, 120.0);
        transition_ids.push(model.add_transition(pos).expect("unlocked model"));
    }

    let density = density.clamp(0.0, 1.0);
    for t in &transition_ids {
        for p in &place_ids {
            if rng.random_bool(density) {
                let a = model.add_arc(p, t).expect("fresh pair");
                model
                    .set_weight(&a, rng.random_range(1..=3))
                    .expect("arc exists");
            }
            if rng.random_bool(density) {
                let a = model.add_arc(t, p).expect("fresh pair");
                model
                    .set_weight(&a, rng.random_range(1..=3))
                    .expect("arc exists");
            }
        }
    }
    model.into_net()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_shape() {
        let a = random_net(7, 10, 6, 0.3);
        let b = random_net(7, 10, 6, 0.3);
        assert_eq!(a.arc_count(), b.arc_count());
        let tokens = |n: &Net| n.places().map(|p| p.tokens).collect::<Vec<_>>();
        assert_eq!(tokens(&a), tokens(&b));
        assert_eq!(a.place_count(), 10);
        assert_eq!(a.transition_count(), 6);
    }

    #[test]
    fn zero_density_has_no_arcs() {
        assert_eq!(random_net(1, 5, 5, 0.0).arc_count(), 0);
    }
}
