//! Sequential display names for new places and transitions.

/// Hands out `p1`, `p2`, … and `t1`, `t2`, … for newly added elements.
///
/// When a net is loaded, [`observe`](ElementNames::observe) is fed every
/// existing name so that generated names continue after the highest
/// number already in use. Past `u32::MAX` the last name repeats.
#[derive(Clone, Debug, Default)]
pub struct ElementNames {
    place: u32,
    transition: u32,
}

impl ElementNames {
    /// Start counting at 1 for both kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next place name.
    pub fn next_place(&mut self) -> String {
        self.place = self.place.saturating_add(1);
        format!("p{}", self.place)
    }

    /// Next transition name.
    pub fn next_transition(&mut self) -> String {
        self.transition = self.transition.saturating_add(1);
        format!("t{}", self.transition)
    }

    /// Account for an existing name so generated names do not collide with it.
    pub fn observe(&mut self, name: &str) {
        if let Some(n) = numbered(name, 'p') {
            self.place = self.place.max(n);
        } else if let Some(n) = numbered(name, 't') {
            self.transition = self.transition.max(n);
        }
    }
}

fn numbered(name: &str, prefix: char) -> Option<u32> {
    name.strip_prefix(prefix)?.parse().ok()
}
