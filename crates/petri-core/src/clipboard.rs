//! Copy and paste of net fragments.

use indexmap::IndexMap;

use crate::element::{Arc, Place, Transition};
use crate::error::EditError;
use crate::id::ElementId;
use crate::net::{Net, NetModel};

/// Distance pasted elements are shifted from their originals, per paste.
pub const PASTE_OFFSET: f64 = 15.0;

/// A copied selection: places, transitions, and the arcs running
/// between selected elements.
#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    places: Vec<Place>,
    transitions: Vec<Transition>,
    arcs: Vec<Arc>,
    pastes: u32,
}

impl Clipboard {
    /// An empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything has been copied.
    pub fn is_empty(&self) -> bool {
        self.places.is_empty() && self.transitions.is_empty()
    }

    /// Replace the contents with `selection` taken from `net`.
    ///
    /// Arcs in the selection are ignored; an arc is copied exactly when
    /// both its endpoints are selected. Unknown identities are skipped.
    pub fn copy(&mut self, net: &Net, selection: &[ElementId]) {
        self.places = selection
            .iter()
            .filter_map(|id| net.place(id))
            .cloned()
            .collect();
        self.transitions = selection
            .iter()
            .filter_map(|id| net.transition(id))
            .cloned()
            .map(|mut t| {
                t.heat = None;
                t
            })
            .collect();
        let selected = |id: &ElementId| {
            self.places.iter().any(|p| &p.id == id) || self.transitions.iter().any(|t| &t.id == id)
        };
        self.arcs = net
            .arcs()
            .filter(|a| selected(&a.from) && selected(&a.to))
            .cloned()
            .collect();
        self.pastes = 0;
    }

    /// Insert a fresh copy of the contents into `model`.
    ///
    /// Every pasted element gets a new identity, and positions move by
    /// [`PASTE_OFFSET`] more on each successive paste. Returns the new
    /// identities of the pasted places and transitions.
    pub fn paste(&mut self, model: &mut NetModel) -> Result<Vec<ElementId>, EditError> {
        if model.is_locked() {
            return Err(EditError::NetLocked);
        }
        self.pastes += 1;
        let shift = PASTE_OFFSET * f64::from(self.pastes);
        let mut renamed: IndexMap<&ElementId, ElementId> = IndexMap::new();

        for place in &self.places {
            let mut copy = place.clone();
            copy.id = ElementId::fresh();
            copy.position = place.position.offset(shift, shift);
            copy.name.clear();
            renamed.insert(&place.id, copy.id.clone());
            model.insert_place(copy)?;
        }
        for transition in &self.transitions {
            let mut copy = transition.clone();
            copy.id = ElementId::fresh();
            copy.position = transition.position.offset(shift, shift);
            copy.name.clear();
            renamed.insert(&transition.id, copy.id.clone());
            model.insert_transition(copy)?;
        }
        for arc in &self.arcs {
            if let (Some(from), Some(to)) = (renamed.get(&arc.from), renamed.get(&arc.to)) {
                let copy = Arc {
                    id: ElementId::fresh(),
                    from: from.clone(),
                    to: to.clone(),
                    weight: arc.weight,
                    info_text: arc.info_text.clone(),
                };
                model.insert_arc(copy)?;
            }
        }
        tracing::debug!(
            elements = renamed.len(),
            arcs = self.arcs.len(),
            "pasted selection"
        );
        Ok(renamed.into_values().collect())
    }
}
