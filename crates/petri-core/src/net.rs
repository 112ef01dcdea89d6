//! The net graph and the editable model wrapped around it.
//!
//! [`Net`] is the unit of persistence and of matrix derivation: three
//! insertion-ordered collections keyed by [`ElementId`], with arcs
//! referring to their endpoints by identity. [`NetModel`] owns a `Net`
//! and is the only way to mutate it; it enforces the arc invariants,
//! tracks unsaved changes, and implements the simulation lock.
//!
//! # Locking
//!
//! [`NetModel::lock`] freezes a copy of the net into a [`NetSnapshot`]
//! and refuses every user edit until [`NetModel::unlock`]. The only
//! writes accepted while locked are the simulation channel's
//! [`apply_marking`](NetModel::apply_marking) and
//! [`apply_heat`](NetModel::apply_heat).

use std::ops::Deref;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::element::{Arc, ArcDirection, Place, Position, Transition};
use crate::error::EditError;
use crate::id::{ElementId, ElementKind, NetId};
use crate::naming::ElementNames;

/// Type tag given to nets that do not carry one.
pub const DEFAULT_NET_TYPE: &str = "RefNet";

// ── Net ─────────────────────────────────────────────────────────

/// A Place/Transition net.
#[derive(Clone, Debug, PartialEq)]
pub struct Net {
    id: NetId,
    name: String,
    net_type: String,
    places: IndexMap<ElementId, Place>,
    transitions: IndexMap<ElementId, Transition>,
    arcs: IndexMap<ElementId, Arc>,
}

impl Net {
    /// An empty net with the default type tag.
    pub fn new(id: NetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            net_type: DEFAULT_NET_TYPE.to_owned(),
            places: IndexMap::new(),
            transitions: IndexMap::new(),
            arcs: IndexMap::new(),
        }
    }

    /// Net identity.
    pub fn id(&self) -> &NetId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type tag (e.g. `RefNet`).
    pub fn net_type(&self) -> &str {
        &self.net_type
    }

    /// Places in insertion order.
    pub fn places(&self) -> impl ExactSizeIterator<Item = &Place> + '_ {
        self.places.values()
    }

    /// Transitions in insertion order.
    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &Transition> + '_ {
        self.transitions.values()
    }

    /// Arcs in insertion order.
    pub fn arcs(&self) -> impl ExactSizeIterator<Item = &Arc> + '_ {
        self.arcs.values()
    }

    /// Look up a place.
    pub fn place(&self, id: &ElementId) -> Option<&Place> {
        self.places.get(id)
    }

    /// Look up a transition.
    pub fn transition(&self, id: &ElementId) -> Option<&Transition> {
        self.transitions.get(id)
    }

    /// Look up an arc.
    pub fn arc(&self, id: &ElementId) -> Option<&Arc> {
        self.arcs.get(id)
    }

    /// Number of places.
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// Number of transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Number of arcs.
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Whether the net has no elements at all.
    pub fn is_empty(&self) -> bool {
        self.places.is_empty() && self.transitions.is_empty() && self.arcs.is_empty()
    }

    /// The kind of the element with this identity, if it exists.
    pub fn element_kind(&self, id: &ElementId) -> Option<ElementKind> {
        if self.places.contains_key(id) {
            Some(ElementKind::Place)
        } else if self.transitions.contains_key(id) {
            Some(ElementKind::Transition)
        } else if self.arcs.contains_key(id) {
            Some(ElementKind::Arc)
        } else {
            None
        }
    }

    /// Whether any element carries this identity.
    pub fn contains(&self, id: &ElementId) -> bool {
        self.element_kind(id).is_some()
    }

    /// Every arc with `id` as source or target, in insertion order.
    pub fn arcs_touching(&self, id: &ElementId) -> SmallVec<[&Arc; 4]> {
        self.arcs.values().filter(|a| a.touches(id)).collect()
    }

    /// The arc running from `from` to `to`, if one exists.
    pub fn arc_between(&self, from: &ElementId, to: &ElementId) -> Option<&Arc> {
        self.arcs.values().find(|a| &a.from == from && &a.to == to)
    }

    /// Direction of an arc relative to its transition.
    ///
    /// Returns `None` for arcs whose endpoints no longer resolve, which
    /// cannot happen for arcs inserted through [`NetModel`].
    pub fn direction(&self, arc: &Arc) -> Option<ArcDirection> {
        match (self.element_kind(&arc.from)?, self.element_kind(&arc.to)?) {
            (ElementKind::Place, ElementKind::Transition) => Some(ArcDirection::Input),
            (ElementKind::Transition, ElementKind::Place) => Some(ArcDirection::Output),
            _ => None,
        }
    }

    /// Check that an arc `from → to` may be added.
    fn check_arc(&self, from: &ElementId, to: &ElementId) -> Result<(), EditError> {
        let from_kind = self
            .element_kind(from)
            .ok_or_else(|| EditError::UnknownElement { id: from.clone() })?;
        let to_kind = self
            .element_kind(to)
            .ok_or_else(|| EditError::UnknownElement { id: to.clone() })?;
        match (from_kind, to_kind) {
            (ElementKind::Place, ElementKind::Transition)
            | (ElementKind::Transition, ElementKind::Place) => {}
            _ => {
                return Err(EditError::InvalidArcEndpoints {
                    from: from_kind,
                    to: to_kind,
                })
            }
        }
        if let Some(existing) = self.arc_between(from, to) {
            return Err(EditError::DuplicateArc {
                existing: existing.id.clone(),
            });
        }
        Ok(())
    }
}

// ── NetSnapshot ─────────────────────────────────────────────────

/// Read-only, shareable view of a net frozen at lock time.
///
/// Cloning is cheap (reference counted). Later edits to the model never
/// show through a snapshot.
#[derive(Clone, Debug)]
pub struct NetSnapshot(std::sync::Arc<Net>);

impl NetSnapshot {
    /// Freeze a copy of `net`.
    pub fn of(net: &Net) -> Self {
        Self(std::sync::Arc::new(net.clone()))
    }
}

impl Deref for NetSnapshot {
    type Target = Net;

    fn deref(&self) -> &Net {
        &self.0
    }
}

// ── NetModel ────────────────────────────────────────────────────

/// Result of removing an element.
#[derive(Clone, Debug, PartialEq)]
pub struct Removed {
    /// Kind of the element that was removed.
    pub kind: ElementKind,
    /// Arcs removed along with it (cascade), in insertion order.
    pub cascaded_arcs: Vec<ElementId>,
}

/// Editable net with arc validation, dirty tracking, and the simulation lock.
#[derive(Debug)]
pub struct NetModel {
    net: Net,
    names: ElementNames,
    snapshot: Option<NetSnapshot>,
    dirty: bool,
    revision: u64,
}

impl Default for NetModel {
    fn default() -> Self {
        Self::new()
    }
}

impl NetModel {
    /// A new, empty, unnamed net.
    pub fn new() -> Self {
        Self::from_net(Net::new(NetId::fresh(), ""))
    }

    /// Wrap an existing net. The model starts clean and unlocked.
    pub fn from_net(net: Net) -> Self {
        let names = names_for(&net);
        Self {
            net,
            names,
            snapshot: None,
            dirty: false,
            revision: 0,
        }
    }

    /// Read access to the current net.
    pub fn net(&self) -> &Net {
        &self.net
    }

    /// Consume the model and return its net.
    pub fn into_net(self) -> Net {
        self.net
    }

    /// Replace the whole net, e.g. after an import.
    ///
    /// `dirty` says whether the loaded net should count as unsaved.
    pub fn load(&mut self, net: Net, dirty: bool) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        self.names = names_for(&net);
        self.net = net;
        self.dirty = dirty;
        self.revision += 1;
        tracing::debug!(net = %self.net.id, "net loaded");
        Ok(())
    }

    // ── Dirty tracking ──────────────────────────────────────────

    /// Whether the net changed since it was loaded or last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the current state has been saved.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Monotonic counter bumped by every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    // ── Locking ─────────────────────────────────────────────────

    /// Freeze the net for a simulation session.
    ///
    /// Locking an already locked model returns the existing snapshot.
    pub fn lock(&mut self) -> NetSnapshot {
        if let Some(snapshot) = &self.snapshot {
            return snapshot.clone();
        }
        let snapshot = NetSnapshot::of(&self.net);
        self.snapshot = Some(snapshot.clone());
        tracing::debug!(net = %self.net.id, "net locked");
        snapshot
    }

    /// Release the simulation lock and clear transition heat.
    pub fn unlock(&mut self) {
        if self.snapshot.take().is_some() {
            tracing::debug!(net = %self.net.id, "net unlocked");
        }
        self.clear_heat();
    }

    /// Whether a simulation currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.snapshot.is_some()
    }

    /// The snapshot taken at lock time, if locked.
    pub fn snapshot(&self) -> Option<&NetSnapshot> {
        self.snapshot.as_ref()
    }

    fn ensure_unlocked(&self) -> Result<(), EditError> {
        if self.is_locked() {
            Err(EditError::NetLocked)
        } else {
            Ok(())
        }
    }

    // ── Structural edits ────────────────────────────────────────

    /// Add a place with a fresh identity, no tokens, and a generated name.
    pub fn add_place(&mut self, position: Position) -> Result<ElementId, EditError> {
        self.ensure_unlocked()?;
        let mut place = Place::new(ElementId::fresh(), position);
        place.name = self.names.next_place();
        let id = place.id.clone();
        self.net.places.insert(id.clone(), place);
        self.touch();
        Ok(id)
    }

    /// Add a transition with a fresh identity and a generated name.
    pub fn add_transition(&mut self, position: Position) -> Result<ElementId, EditError> {
        self.ensure_unlocked()?;
        let mut transition = Transition::new(ElementId::fresh(), position);
        transition.name = self.names.next_transition();
        let id = transition.id.clone();
        self.net.transitions.insert(id.clone(), transition);
        self.touch();
        Ok(id)
    }

    /// Add an arc of weight 1 from `from` to `to`.
    ///
    /// Exactly one endpoint must be a place and the other a transition,
    /// and no arc with the same direction may already join them.
    pub fn add_arc(&mut self, from: &ElementId, to: &ElementId) -> Result<ElementId, EditError> {
        self.ensure_unlocked()?;
        self.net.check_arc(from, to)?;
        let arc = Arc::new(ElementId::fresh(), from.clone(), to.clone());
        let id = arc.id.clone();
        self.net.arcs.insert(id.clone(), arc);
        self.touch();
        Ok(id)
    }

    /// Insert a place under its own identity (import and paste path).
    ///
    /// An empty name is replaced by a generated one.
    pub fn insert_place(&mut self, mut place: Place) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        self.ensure_free(&place.id)?;
        if place.name.is_empty() {
            place.name = self.names.next_place();
        } else {
            self.names.observe(&place.name);
        }
        self.net.places.insert(place.id.clone(), place);
        self.touch();
        Ok(())
    }

    /// Insert a transition under its own identity (import and paste path).
    pub fn insert_transition(&mut self, mut transition: Transition) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        self.ensure_free(&transition.id)?;
        if transition.name.is_empty() {
            transition.name = self.names.next_transition();
        } else {
            self.names.observe(&transition.name);
        }
        transition.heat = None;
        self.net.transitions.insert(transition.id.clone(), transition);
        self.touch();
        Ok(())
    }

    /// Insert an arc under its own identity, with the same validation as
    /// [`add_arc`](Self::add_arc).
    pub fn insert_arc(&mut self, arc: Arc) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        self.ensure_free(&arc.id)?;
        if arc.weight == 0 {
            return Err(EditError::ZeroWeight);
        }
        self.net.check_arc(&arc.from, &arc.to)?;
        self.net.arcs.insert(arc.id.clone(), arc);
        self.touch();
        Ok(())
    }

    fn ensure_free(&self, id: &ElementId) -> Result<(), EditError> {
        if self.net.contains(id) {
            Err(EditError::DuplicateId { id: id.clone() })
        } else {
            Ok(())
        }
    }

    /// Remove an element. Removing a place or transition also removes
    /// every arc touching it.
    pub fn remove_element(&mut self, id: &ElementId) -> Result<Removed, EditError> {
        self.ensure_unlocked()?;
        let kind = self
            .net
            .element_kind(id)
            .ok_or_else(|| EditError::UnknownElement { id: id.clone() })?;
        let mut cascaded_arcs = Vec::new();
        match kind {
            ElementKind::Arc => {
                self.net.arcs.shift_remove(id);
            }
            ElementKind::Place | ElementKind::Transition => {
                cascaded_arcs = self
                    .net
                    .arcs_touching(id)
                    .into_iter()
                    .map(|a| a.id.clone())
                    .collect();
                for arc in &cascaded_arcs {
                    self.net.arcs.shift_remove(arc);
                }
                if kind == ElementKind::Place {
                    self.net.places.shift_remove(id);
                } else {
                    self.net.transitions.shift_remove(id);
                }
            }
        }
        self.touch();
        tracing::debug!(%id, %kind, cascaded = cascaded_arcs.len(), "element removed");
        Ok(Removed {
            kind,
            cascaded_arcs,
        })
    }

    // ── Value edits ─────────────────────────────────────────────

    /// Set a place's token count.
    pub fn set_tokens(&mut self, id: &ElementId, tokens: u32) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        self.place_mut(id)?.tokens = tokens;
        self.touch();
        Ok(())
    }

    /// Add `delta` tokens to a place (negative removes), clamping at 0.
    ///
    /// Returns the new token count.
    pub fn adjust_tokens(&mut self, id: &ElementId, delta: i64) -> Result<u32, EditError> {
        self.ensure_unlocked()?;
        let place = self.place_mut(id)?;
        place.tokens = clamp_add(place.tokens, delta, 0);
        let tokens = place.tokens;
        self.touch();
        Ok(tokens)
    }

    /// Set an arc's weight. Zero is rejected.
    pub fn set_weight(&mut self, id: &ElementId, weight: u32) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        if weight == 0 {
            return Err(EditError::ZeroWeight);
        }
        self.arc_mut(id)?.weight = weight;
        self.touch();
        Ok(())
    }

    /// Add `delta` to an arc's weight, clamping at 1. Returns the new weight.
    pub fn adjust_weight(&mut self, id: &ElementId, delta: i64) -> Result<u32, EditError> {
        self.ensure_unlocked()?;
        let arc = self.arc_mut(id)?;
        arc.weight = clamp_add(arc.weight, delta, 1);
        let weight = arc.weight;
        self.touch();
        Ok(weight)
    }

    /// Replace any element's annotation.
    pub fn set_info_text(
        &mut self,
        id: &ElementId,
        text: impl Into<String>,
    ) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        let text = text.into();
        if let Some(p) = self.net.places.get_mut(id) {
            p.info_text = text;
        } else if let Some(t) = self.net.transitions.get_mut(id) {
            t.info_text = text;
        } else if let Some(a) = self.net.arcs.get_mut(id) {
            a.info_text = text;
        } else {
            return Err(EditError::UnknownElement { id: id.clone() });
        }
        self.touch();
        Ok(())
    }

    /// Rename a place or transition.
    pub fn rename_element(
        &mut self,
        id: &ElementId,
        name: impl Into<String>,
    ) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        let name = name.into();
        if let Some(p) = self.net.places.get_mut(id) {
            p.name = name;
        } else if let Some(t) = self.net.transitions.get_mut(id) {
            t.name = name;
        } else {
            return Err(self.not_a_node(id));
        }
        self.touch();
        Ok(())
    }

    /// Move a place or transition.
    pub fn move_element(&mut self, id: &ElementId, position: Position) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        if let Some(p) = self.net.places.get_mut(id) {
            p.position = position;
        } else if let Some(t) = self.net.transitions.get_mut(id) {
            t.position = position;
        } else {
            return Err(self.not_a_node(id));
        }
        self.touch();
        Ok(())
    }

    /// Rename the net itself.
    pub fn rename_net(&mut self, name: impl Into<String>) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        self.net.name = name.into();
        self.touch();
        Ok(())
    }

    /// Change the net's type tag.
    pub fn set_net_type(&mut self, net_type: impl Into<String>) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        self.net.net_type = net_type.into();
        self.touch();
        Ok(())
    }

    fn place_mut(&mut self, id: &ElementId) -> Result<&mut Place, EditError> {
        match self.net.element_kind(id) {
            Some(ElementKind::Place) => self
                .net
                .places
                .get_mut(id)
                .ok_or_else(|| EditError::UnknownElement { id: id.clone() }),
            Some(found) => Err(EditError::WrongKind {
                id: id.clone(),
                found,
            }),
            None => Err(EditError::UnknownElement { id: id.clone() }),
        }
    }

    fn arc_mut(&mut self, id: &ElementId) -> Result<&mut Arc, EditError> {
        match self.net.element_kind(id) {
            Some(ElementKind::Arc) => self
                .net
                .arcs
                .get_mut(id)
                .ok_or_else(|| EditError::UnknownElement { id: id.clone() }),
            Some(found) => Err(EditError::WrongKind {
                id: id.clone(),
                found,
            }),
            None => Err(EditError::UnknownElement { id: id.clone() }),
        }
    }

    fn not_a_node(&self, id: &ElementId) -> EditError {
        match self.net.element_kind(id) {
            Some(found) => EditError::WrongKind {
                id: id.clone(),
                found,
            },
            None => EditError::UnknownElement { id: id.clone() },
        }
    }

    // ── Simulation channel ──────────────────────────────────────

    /// Write a marking vector back onto places, by position in `order`.
    ///
    /// Accepted while locked. An empty marking is ignored. Identities in
    /// `order` that no longer resolve are skipped. Returns the number of
    /// places updated. Does not mark the net dirty.
    pub fn apply_marking(&mut self, order: &[ElementId], marking: &[u32]) -> usize {
        let mut updated = 0;
        for (id, &tokens) in order.iter().zip(marking) {
            if let Some(place) = self.net.places.get_mut(id) {
                place.tokens = tokens;
                updated += 1;
            }
        }
        if !marking.is_empty() && marking.len() != order.len() {
            tracing::warn!(
                expected = order.len(),
                got = marking.len(),
                "marking length does not match place order"
            );
        }
        updated
    }

    /// Record the relative firing frequency of each transition.
    ///
    /// Each transition's heat is `firings[i] / (sum + 1)`, so it stays
    /// below 1 even when a single transition fired every time. Accepted
    /// while locked; never marks the net dirty.
    pub fn apply_heat(&mut self, order: &[ElementId], firings: &[u32]) {
        let sum: f64 = firings.iter().map(|&f| f as f64).sum::<f64>() + 1.0;
        for (id, &count) in order.iter().zip(firings) {
            if let Some(t) = self.net.transitions.get_mut(id) {
                t.heat = Some(count as f64 / sum);
            }
        }
    }

    /// Remove all transition heat.
    pub fn clear_heat(&mut self) {
        for t in self.net.transitions.values_mut() {
            t.heat = None;
        }
    }
}

fn names_for(net: &Net) -> ElementNames {
    let mut names = ElementNames::new();
    for p in net.places() {
        names.observe(&p.name);
    }
    for t in net.transitions() {
        names.observe(&t.name);
    }
    names
}

fn clamp_add(value: u32, delta: i64, floor: u32) -> u32 {
    (value as i64 + delta).clamp(floor as i64, u32::MAX as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::new(10.0, 20.0)
    }

    #[test]
    fn add_place_assigns_fresh_identity_and_name() {
        let mut model = NetModel::new();
        let p1 = model.add_place(pos()).unwrap();
        let p2 = model.add_place(pos()).unwrap();
        assert_ne!(p1, p2);
        assert_eq!(model.net().place(&p1).unwrap().tokens, 0);
        assert_eq!(model.net().place(&p2).unwrap().name, "p2");
        assert!(model.is_dirty());
    }

    #[test]
    fn arc_requires_place_and_transition() {
        let mut model = NetModel::new();
        let p1 = model.add_place(pos()).unwrap();
        let p2 = model.add_place(pos()).unwrap();
        let t1 = model.add_transition(pos()).unwrap();
        let t2 = model.add_transition(pos()).unwrap();
        let revision = model.revision();

        assert_eq!(
            model.add_arc(&p1, &p2),
            Err(EditError::InvalidArcEndpoints {
                from: ElementKind::Place,
                to: ElementKind::Place,
            })
        );
        assert!(matches!(
            model.add_arc(&t1, &t2),
            Err(EditError::InvalidArcEndpoints { .. })
        ));
        assert_eq!(model.revision(), revision, "rejected edits must not mutate");
        assert_eq!(model.net().arc_count(), 0);

        assert!(model.add_arc(&p1, &t1).is_ok());
        assert!(model.add_arc(&t1, &p2).is_ok());
    }

    #[test]
    fn duplicate_direction_is_rejected_but_reverse_is_allowed() {
        let mut model = NetModel::new();
        let p = model.add_place(pos()).unwrap();
        let t = model.add_transition(pos()).unwrap();
        let a = model.add_arc(&p, &t).unwrap();
        assert_eq!(
            model.add_arc(&p, &t),
            Err(EditError::DuplicateArc { existing: a })
        );
        assert!(model.add_arc(&t, &p).is_ok());
        assert_eq!(model.net().arc_count(), 2);
    }

    #[test]
    fn arc_to_unknown_endpoint_fails() {
        let mut model = NetModel::new();
        let p = model.add_place(pos()).unwrap();
        let ghost = ElementId::from("ghost");
        assert_eq!(
            model.add_arc(&p, &ghost),
            Err(EditError::UnknownElement { id: ghost })
        );
    }

    #[test]
    fn removing_a_node_cascades_to_its_arcs() {
        let mut model = NetModel::new();
        let p = model.add_place(pos()).unwrap();
        let q = model.add_place(pos()).unwrap();
        let t = model.add_transition(pos()).unwrap();
        let a_in = model.add_arc(&p, &t).unwrap();
        let a_out = model.add_arc(&t, &q).unwrap();

        let removed = model.remove_element(&t).unwrap();
        assert_eq!(removed.kind, ElementKind::Transition);
        assert_eq!(removed.cascaded_arcs, vec![a_in, a_out]);
        assert_eq!(model.net().arc_count(), 0);
        assert_eq!(model.net().place_count(), 2);
    }

    #[test]
    fn removing_an_arc_keeps_its_endpoints() {
        let mut model = NetModel::new();
        let p = model.add_place(pos()).unwrap();
        let t = model.add_transition(pos()).unwrap();
        let a = model.add_arc(&p, &t).unwrap();
        let removed = model.remove_element(&a).unwrap();
        assert_eq!(removed.kind, ElementKind::Arc);
        assert!(removed.cascaded_arcs.is_empty());
        assert!(model.net().contains(&p));
        assert!(model.net().contains(&t));
    }

    #[test]
    fn removal_preserves_order_of_remaining_elements() {
        let mut model = NetModel::new();
        let a = model.add_place(pos()).unwrap();
        let b = model.add_place(pos()).unwrap();
        let c = model.add_place(pos()).unwrap();
        model.remove_element(&b).unwrap();
        let order: Vec<_> = model.net().places().map(|p| p.id.clone()).collect();
        assert_eq!(order, vec![a, c]);
    }

    #[test]
    fn lock_refuses_edits_and_freezes_snapshot() {
        let mut model = NetModel::new();
        let p = model.add_place(pos()).unwrap();
        model.set_tokens(&p, 3).unwrap();

        let snapshot = model.lock();
        assert!(model.is_locked());
        assert_eq!(model.add_place(pos()), Err(EditError::NetLocked));
        assert_eq!(model.set_tokens(&p, 9), Err(EditError::NetLocked));
        assert_eq!(model.remove_element(&p), Err(EditError::NetLocked));

        // The simulation channel still writes through.
        model.apply_marking(std::slice::from_ref(&p), &[7]);
        assert_eq!(model.net().place(&p).unwrap().tokens, 7);
        assert_eq!(snapshot.place(&p).unwrap().tokens, 3);

        model.unlock();
        assert!(model.add_place(pos()).is_ok());
    }

    #[test]
    fn token_and_weight_adjustments_clamp() {
        let mut model = NetModel::new();
        let p = model.add_place(pos()).unwrap();
        let t = model.add_transition(pos()).unwrap();
        let a = model.add_arc(&p, &t).unwrap();

        assert_eq!(model.adjust_tokens(&p, 5).unwrap(), 5);
        assert_eq!(model.adjust_tokens(&p, -9).unwrap(), 0);
        assert_eq!(model.adjust_weight(&a, -3).unwrap(), 1);
        assert_eq!(model.adjust_weight(&a, 4).unwrap(), 5);
        assert_eq!(model.set_weight(&a, 0), Err(EditError::ZeroWeight));
        assert!(matches!(
            model.set_tokens(&t, 1),
            Err(EditError::WrongKind { .. })
        ));
    }

    #[test]
    fn heat_is_relative_and_cleared_on_unlock() {
        let mut model = NetModel::new();
        let t1 = model.add_transition(pos()).unwrap();
        let t2 = model.add_transition(pos()).unwrap();
        model.lock();
        model.apply_heat(&[t1.clone(), t2.clone()], &[3, 0]);
        assert_eq!(model.net().transition(&t1).unwrap().heat, Some(0.75));
        assert_eq!(model.net().transition(&t2).unwrap().heat, Some(0.0));
        model.unlock();
        assert_eq!(model.net().transition(&t1).unwrap().heat, None);
    }

    #[test]
    fn simulation_writes_do_not_dirty() {
        let mut model = NetModel::new();
        let p = model.add_place(pos()).unwrap();
        model.mark_clean();
        model.apply_marking(std::slice::from_ref(&p), &[2]);
        assert!(!model.is_dirty());
    }

    #[test]
    fn load_refused_while_locked() {
        let mut model = NetModel::new();
        model.lock();
        let other = Net::new(NetId::from("other"), "other");
        assert_eq!(model.load(other, false), Err(EditError::NetLocked));
    }

    #[test]
    fn insert_keeps_identity_and_rejects_collisions() {
        let mut model = NetModel::new();
        let place = Place::new("p-1".into(), pos()).with_tokens(4);
        model.insert_place(place.clone()).unwrap();
        assert_eq!(
            model.insert_place(place),
            Err(EditError::DuplicateId { id: "p-1".into() })
        );
        assert_eq!(model.net().place(&"p-1".into()).unwrap().tokens, 4);
        assert_eq!(model.net().place(&"p-1".into()).unwrap().name, "p1");
    }

    #[test]
    fn generated_names_continue_after_loaded_ones() {
        let mut named = Place::new("x".into(), pos());
        named.name = "p4".into();
        let mut model = NetModel::new();
        model.insert_place(named).unwrap();
        let next = model.add_place(pos()).unwrap();
        assert_eq!(model.net().place(&next).unwrap().name, "p5");
    }
}
