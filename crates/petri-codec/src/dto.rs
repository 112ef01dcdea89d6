//! Transfer objects shared by both persisted forms.
//!
//! The DTOs mirror the native JSON layout field for field. Conversion to
//! a [`Net`] is lenient: values that do not make sense are defaulted and
//! elements that cannot be placed in the net are skipped, each with a
//! warning, so that one bad element never loses the rest of a file.

use petri_core::{Arc, ElementId, Net, NetId, NetModel, Place, Position, Transition};
use serde::{Deserialize, Serialize};

use crate::warnings::Warnings;

/// A canvas position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionDto {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl From<Position> for PositionDto {
    fn from(p: Position) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PositionDto> for Position {
    fn from(p: PositionDto) -> Self {
        Position::new(p.x, p.y)
    }
}

/// A persisted token count.
///
/// Native documents written by hand or by other tools sometimes carry
/// a marking that is not a count; it is kept as found and defaulted when
/// the net is rebuilt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkingDto {
    /// A well-formed count.
    Tokens(u32),
    /// Anything else.
    Raw(serde_json::Value),
}

impl Default for MarkingDto {
    fn default() -> Self {
        Self::Tokens(0)
    }
}

impl From<u32> for MarkingDto {
    fn from(tokens: u32) -> Self {
        Self::Tokens(tokens)
    }
}

impl MarkingDto {
    /// The count, if this is one. Numeric strings count.
    pub fn tokens(&self) -> Option<u32> {
        match self {
            Self::Tokens(n) => Some(*n),
            Self::Raw(serde_json::Value::String(s)) => s.trim().parse().ok(),
            Self::Raw(_) => None,
        }
    }
}

/// A persisted place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDto {
    /// Stable identity.
    pub id: String,
    /// Canvas position.
    pub position: PositionDto,
    /// Token count.
    #[serde(default)]
    pub initial_marking: MarkingDto,
    /// Annotation.
    #[serde(default)]
    pub info_text: String,
    /// Display name; omitted when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// A persisted transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDto {
    /// Stable identity.
    pub id: String,
    /// Canvas position.
    pub position: PositionDto,
    /// Annotation.
    #[serde(default)]
    pub info_text: String,
    /// Display name; omitted when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// A persisted arc. The weight travels as text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcDto {
    /// Stable identity.
    pub id: String,
    /// Identity of the source element.
    pub source: String,
    /// Identity of the target element.
    pub target: String,
    /// Weight, as decimal text.
    #[serde(default)]
    pub text: String,
    /// Annotation.
    #[serde(default)]
    pub info_text: String,
}

/// A persisted net.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetDto {
    /// Net identity.
    pub id: String,
    /// Type tag.
    #[serde(rename = "type", default = "default_net_type")]
    pub net_type: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Places in net order.
    #[serde(default)]
    pub places: Vec<PlaceDto>,
    /// Transitions in net order.
    #[serde(default)]
    pub transitions: Vec<TransitionDto>,
    /// Arcs in net order.
    #[serde(default)]
    pub arcs: Vec<ArcDto>,
}

fn default_net_type() -> String {
    petri_core::DEFAULT_NET_TYPE.to_owned()
}

impl NetDto {
    /// Capture `net` for persistence. Transient state (heat) is dropped.
    pub fn from_net(net: &Net) -> Self {
        Self {
            id: net.id().to_string(),
            net_type: net.net_type().to_owned(),
            name: net.name().to_owned(),
            places: net
                .places()
                .map(|p| PlaceDto {
                    id: p.id.to_string(),
                    position: p.position.into(),
                    initial_marking: p.tokens.into(),
                    info_text: p.info_text.clone(),
                    name: p.name.clone(),
                })
                .collect(),
            transitions: net
                .transitions()
                .map(|t| TransitionDto {
                    id: t.id.to_string(),
                    position: t.position.into(),
                    info_text: t.info_text.clone(),
                    name: t.name.clone(),
                })
                .collect(),
            arcs: net
                .arcs()
                .map(|a| ArcDto {
                    id: a.id.to_string(),
                    source: a.from.to_string(),
                    target: a.to.to_string(),
                    text: a.weight.to_string(),
                    info_text: a.info_text.clone(),
                })
                .collect(),
        }
    }

    /// Rebuild a net, reporting anything that had to be defaulted or skipped.
    ///
    /// Places and transitions are inserted before arcs, so arc endpoints
    /// may refer to elements listed anywhere in the document.
    pub fn into_net(self) -> (Net, Warnings) {
        let mut warnings = Warnings::new();
        let id = if self.id.is_empty() {
            warnings.push("net has no id, assigned a fresh one");
            NetId::fresh()
        } else {
            NetId::from(self.id)
        };
        let mut model = NetModel::from_net(Net::new(id, self.name));
        // The model is fresh and unlocked, so header edits cannot fail.
        let _ = model.set_net_type(self.net_type);

        for p in self.places {
            let id = element_id(p.id, "place", &mut warnings);
            let tokens = p.initial_marking.tokens().unwrap_or_else(|| {
                warnings.push(format!(
                    "marking {} of place {id} is not a non-negative integer, using 0",
                    serde_json::to_string(&p.initial_marking).unwrap_or_default()
                ));
                0
            });
            let mut place = Place::new(id, p.position.into()).with_tokens(tokens);
            place.info_text = p.info_text;
            place.name = p.name;
            if let Err(e) = model.insert_place(place) {
                warnings.push(format!("skipped place: {e}"));
            }
        }
        for t in self.transitions {
            let id = element_id(t.id, "transition", &mut warnings);
            let mut transition = Transition::new(id, t.position.into());
            transition.info_text = t.info_text;
            transition.name = t.name;
            if let Err(e) = model.insert_transition(transition) {
                warnings.push(format!("skipped transition: {e}"));
            }
        }
        for a in self.arcs {
            let id = element_id(a.id, "arc", &mut warnings);
            let weight = parse_weight(&a.text, &id, &mut warnings);
            let mut arc =
                Arc::new(id.clone(), a.source.into(), a.target.into()).with_weight(weight);
            arc.info_text = a.info_text;
            if let Err(e) = model.insert_arc(arc) {
                warnings.push(format!("skipped arc {id}: {e}"));
            }
        }
        (model.into_net(), warnings)
    }
}

fn element_id(raw: String, kind: &str, warnings: &mut Warnings) -> ElementId {
    if raw.is_empty() {
        let id = ElementId::fresh();
        warnings.push(format!("{kind} without id, assigned {id}"));
        id
    } else {
        ElementId::from(raw)
    }
}

/// Parse a persisted weight. Anything but a positive integer becomes 1.
pub(crate) fn parse_weight(text: &str, arc: &ElementId, warnings: &mut Warnings) -> u32 {
    match text.trim().parse::<u32>() {
        Ok(w) if w >= 1 => w,
        _ => {
            warnings.push(format!(
                "weight '{text}' of arc {arc} is not a positive integer, using 1"
            ));
            1
        }
    }
}
