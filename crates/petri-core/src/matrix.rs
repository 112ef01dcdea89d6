//! Linearization of a net into the engine's numeric form.
//!
//! [`derive_matrix`] orders places and transitions with an
//! [`ElementOrdering`], reads the marking vector off the places, and
//! fills the two incidence matrices from the arcs. Given the same net
//! content and the same ordering, the output is identical on every call.

use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::element::ArcDirection;
use crate::id::ElementId;
use crate::net::Net;

/// Total order used to position elements in matrices.
///
/// Any `Fn(&ElementId, &ElementId) -> Ordering` is an ordering.
pub trait ElementOrdering {
    /// Compare two element identities.
    fn compare(&self, a: &ElementId, b: &ElementId) -> Ordering;
}

impl<F> ElementOrdering for F
where
    F: Fn(&ElementId, &ElementId) -> Ordering,
{
    fn compare(&self, a: &ElementId, b: &ElementId) -> Ordering {
        self(a, b)
    }
}

/// Descending string comparison of identities.
#[derive(Clone, Copy, Debug, Default)]
pub struct DescendingId;

impl ElementOrdering for DescendingId {
    fn compare(&self, a: &ElementId, b: &ElementId) -> Ordering {
        b.as_str().cmp(a.as_str())
    }
}

/// Ascending string comparison of identities.
#[derive(Clone, Copy, Debug, Default)]
pub struct AscendingId;

impl ElementOrdering for AscendingId {
    fn compare(&self, a: &ElementId, b: &ElementId) -> Ordering {
        a.as_str().cmp(b.as_str())
    }
}

/// Numeric form of a net.
///
/// Rows of `pxt_in` and `pxt_out` follow `transitions`; columns follow
/// `places`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct NetMatrix {
    /// Place identities in matrix order.
    pub places: Vec<ElementId>,
    /// Transition identities in matrix order.
    pub transitions: Vec<ElementId>,
    /// Token count of each place.
    pub marking: Vec<u32>,
    /// `pxt_in[t][p]`: tokens transition `t` produces into place `p`.
    pub pxt_in: Vec<Vec<u32>>,
    /// `pxt_out[t][p]`: tokens transition `t` consumes from place `p`.
    pub pxt_out: Vec<Vec<u32>>,
}

impl NetMatrix {
    /// Number of places (columns).
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// Number of transitions (rows).
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Matrix column of a place.
    pub fn place_index(&self, id: &ElementId) -> Option<usize> {
        self.places.iter().position(|p| p == id)
    }

    /// Matrix row of a transition.
    pub fn transition_index(&self, id: &ElementId) -> Option<usize> {
        self.transitions.iter().position(|t| t == id)
    }
}

/// Build the matrices for `net` under `ordering`.
pub fn derive_matrix(net: &Net, ordering: &impl ElementOrdering) -> NetMatrix {
    let mut places: Vec<&ElementId> = net.places().map(|p| &p.id).collect();
    let mut transitions: Vec<&ElementId> = net.transitions().map(|t| &t.id).collect();
    places.sort_by(|a, b| ordering.compare(a, b));
    transitions.sort_by(|a, b| ordering.compare(a, b));

    let column: IndexMap<&ElementId, usize> =
        places.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let row: IndexMap<&ElementId, usize> = transitions
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();

    let marking = places
        .iter()
        .map(|id| net.place(id).map_or(0, |p| p.tokens))
        .collect();

    let mut pxt_in = vec![vec![0u32; places.len()]; transitions.len()];
    let mut pxt_out = vec![vec![0u32; places.len()]; transitions.len()];
    for arc in net.arcs() {
        match net.direction(arc) {
            Some(ArcDirection::Input) => {
                if let (Some(&t), Some(&p)) = (row.get(&arc.to), column.get(&arc.from)) {
                    pxt_out[t][p] = arc.weight;
                }
            }
            Some(ArcDirection::Output) => {
                if let (Some(&t), Some(&p)) = (row.get(&arc.from), column.get(&arc.to)) {
                    pxt_in[t][p] = arc.weight;
                }
            }
            None => {}
        }
    }

    NetMatrix {
        places: places.into_iter().cloned().collect(),
        transitions: transitions.into_iter().cloned().collect(),
        marking,
        pxt_in,
        pxt_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Arc, Place, Position, Transition};
    use crate::net::NetModel;
    use proptest::prelude::*;

    fn at() -> Position {
        Position::default()
    }

    /// p_a(3) --2--> t_x --1--> p_b
    fn chain() -> NetModel {
        let mut m = NetModel::new();
        m.insert_place(Place::new("p_a".into(), at()).with_tokens(3))
            .unwrap();
        m.insert_place(Place::new("p_b".into(), at())).unwrap();
        m.insert_transition(Transition::new("t_x".into(), at()))
            .unwrap();
        m.insert_arc(Arc::new("a1".into(), "p_a".into(), "t_x".into()).with_weight(2))
            .unwrap();
        m.insert_arc(Arc::new("a2".into(), "t_x".into(), "p_b".into()))
            .unwrap();
        m
    }

    #[test]
    fn descending_order_and_entries() {
        let m = chain();
        let mx = derive_matrix(m.net(), &DescendingId);
        assert_eq!(mx.places, vec![ElementId::from("p_b"), ElementId::from("p_a")]);
        assert_eq!(mx.marking, vec![0, 3]);
        assert_eq!(mx.pxt_out, vec![vec![0, 2]]);
        assert_eq!(mx.pxt_in, vec![vec![1, 0]]);
    }

    #[test]
    fn ascending_order_flips_columns() {
        let m = chain();
        let mx = derive_matrix(m.net(), &AscendingId);
        assert_eq!(mx.marking, vec![3, 0]);
        assert_eq!(mx.pxt_out, vec![vec![2, 0]]);
        assert_eq!(mx.pxt_in, vec![vec![0, 1]]);
    }

    #[test]
    fn closures_are_orderings() {
        let m = chain();
        let by_len = |a: &ElementId, b: &ElementId| {
            a.as_str().len().cmp(&b.as_str().len()).then(a.cmp(b))
        };
        let mx = derive_matrix(m.net(), &by_len);
        assert_eq!(mx.transitions, vec![ElementId::from("t_x")]);
    }

    #[test]
    fn place_without_arcs_is_an_all_zero_column() {
        let mut m = chain();
        m.insert_place(Place::new("p_z".into(), at()).with_tokens(5))
            .unwrap();
        let mx = derive_matrix(m.net(), &DescendingId);
        let col = mx.place_index(&"p_z".into()).unwrap();
        assert_eq!(col, 0);
        assert!(mx.pxt_in.iter().all(|row| row[col] == 0));
        assert!(mx.pxt_out.iter().all(|row| row[col] == 0));
        assert_eq!(mx.marking[col], 5);
    }

    #[test]
    fn empty_net_gives_empty_matrices() {
        let m = NetModel::new();
        let mx = derive_matrix(m.net(), &DescendingId);
        assert!(mx.marking.is_empty());
        assert!(mx.pxt_in.is_empty());
        assert_eq!(mx, NetMatrix::default());
    }

    proptest! {
        #[test]
        fn derivation_is_deterministic_and_shaped(
            tokens in prop::collection::vec(0u32..20, 0..8),
            transitions in 0usize..6,
            links in prop::collection::vec((0usize..8, 0usize..6, any::<bool>(), 1u32..5), 0..20),
        ) {
            let mut m = NetModel::new();
            let mut places = Vec::new();
            for &t in &tokens {
                let id = m.add_place(at()).unwrap();
                m.set_tokens(&id, t).unwrap();
                places.push(id);
            }
            let ts: Vec<_> = (0..transitions).map(|_| m.add_transition(at()).unwrap()).collect();
            for (p, t, input, w) in links {
                if places.is_empty() || ts.is_empty() {
                    break;
                }
                let (p, t) = (&places[p % places.len()], &ts[t % ts.len()]);
                let made = if input { m.add_arc(p, t) } else { m.add_arc(t, p) };
                if let Ok(a) = made {
                    m.set_weight(&a, w).unwrap();
                }
            }

            let first = derive_matrix(m.net(), &DescendingId);
            let second = derive_matrix(&m.lock(), &DescendingId);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.marking.len(), tokens.len());
            prop_assert_eq!(first.pxt_in.len(), transitions);
            for row in first.pxt_in.iter().chain(&first.pxt_out) {
                prop_assert_eq!(row.len(), tokens.len());
            }
            let nonzero = first.pxt_in.iter().chain(&first.pxt_out).flatten().filter(|&&w| w > 0).count();
            prop_assert_eq!(nonzero, m.net().arc_count());
        }
    }
}
