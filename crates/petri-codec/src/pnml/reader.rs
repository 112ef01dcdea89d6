//! PNML decoding.

use std::collections::HashMap;

use petri_core::ElementId;

use super::tree::{self, XmlNode};
use super::PnmlOptions;
use crate::dto::{ArcDto, NetDto, PlaceDto, PositionDto, TransitionDto};
use crate::error::CodecError;
use crate::warnings::Warnings;

/// Decode every net in a PNML document.
///
/// Elements may sit directly under `<net>` or inside `<page>` wrappers.
/// Arcs are resolved last, through the identities found on places and
/// transitions; an arc whose endpoint cannot be resolved is dropped.
pub fn decode_pnml(
    xml: &str,
    options: &PnmlOptions,
) -> Result<(Vec<NetDto>, Warnings), CodecError> {
    options.validate()?;
    let root = tree::parse(xml)?;
    if root.name != "pnml" {
        return Err(CodecError::Missing {
            what: "<pnml> root element".into(),
        });
    }
    let mut nets = Vec::new();
    root.find_all("net", &mut nets);
    if nets.is_empty() {
        return Err(CodecError::Missing {
            what: "<net>".into(),
        });
    }

    let mut warnings = Warnings::new();
    let dtos = nets
        .into_iter()
        .map(|net| NetDecoder::new(options, &mut warnings).decode(net))
        .collect();
    Ok((dtos, warnings))
}

/// Leading integer of `text`, the way lenient number fields read:
/// optional sign, then digits, anything after them ignored.
fn leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

struct NetDecoder<'a> {
    options: &'a PnmlOptions,
    warnings: &'a mut Warnings,
    /// Interchange id → stable id.
    resolved: HashMap<String, String>,
    net: String,
}

impl<'a> NetDecoder<'a> {
    fn new(options: &'a PnmlOptions, warnings: &'a mut Warnings) -> Self {
        Self {
            options,
            warnings,
            resolved: HashMap::new(),
            net: String::new(),
        }
    }

    fn decode(mut self, node: &XmlNode) -> NetDto {
        let raw_id = node.get("id").unwrap_or_default();
        let id = raw_id.strip_prefix("net_").unwrap_or(raw_id).to_owned();
        self.net = raw_id.to_owned();
        let mut dto = NetDto {
            id,
            net_type: node
                .get("type")
                .unwrap_or(self.options.net_type.as_str())
                .to_owned(),
            name: node.text_of("name").unwrap_or_default().to_owned(),
            places: Vec::new(),
            transitions: Vec::new(),
            arcs: Vec::new(),
        };

        let mut found = Vec::new();
        node.find_all("place", &mut found);
        dto.places = found.drain(..).map(|p| self.place(p)).collect();
        node.find_all("transition", &mut found);
        dto.transitions = found.drain(..).map(|t| self.transition(t)).collect();
        node.find_all("arc", &mut found);
        dto.arcs = found.drain(..).filter_map(|a| self.arc(a)).collect();

        tracing::debug!(
            net = %dto.id,
            places = dto.places.len(),
            transitions = dto.transitions.len(),
            arcs = dto.arcs.len(),
            "decoded PNML net"
        );
        dto
    }

    fn identity_block<'n>(&self, node: &'n XmlNode) -> Option<&'n XmlNode> {
        let blocks = node.children.iter().filter(|c| c.name == "toolspecific");
        let mut fallback = None;
        for block in blocks {
            if block.get("uuid").is_none() {
                continue;
            }
            if block.get("tool") == Some(self.options.tool.as_str()) {
                return Some(block);
            }
            fallback.get_or_insert(block);
        }
        fallback
    }

    /// Stable id and tool-specific annotation of an element, registering
    /// its interchange id for arc resolution.
    fn identify(&mut self, node: &XmlNode, kind: &str) -> (String, String) {
        let block = self.identity_block(node);
        let annotation = block
            .and_then(|b| b.first("text"))
            .map(|t| t.text.clone())
            .unwrap_or_default();
        let local = node.get("id").unwrap_or_default();
        let stable = match block.and_then(|b| b.get("uuid")) {
            Some(uuid) if !uuid.is_empty() => uuid.to_owned(),
            _ => {
                let fresh = ElementId::fresh().to_string();
                self.warnings.push(format!(
                    "{kind} '{local}' in net '{}' has no identity, assigned {fresh}",
                    self.net
                ));
                fresh
            }
        };
        if !local.is_empty() {
            self.resolved.insert(local.to_owned(), stable.clone());
        }
        (stable, annotation)
    }

    fn position(&mut self, node: &XmlNode, id: &str) -> PositionDto {
        let offset = self.options.import_offset;
        let Some(pos) = node.first("graphics").and_then(|g| g.first("position")) else {
            self.warnings
                .push(format!("element {id} has no position, placed at the origin"));
            return PositionDto {
                x: offset,
                y: offset,
            };
        };
        let mut coord = |axis: &str| match pos.get(axis).map(|v| v.trim().parse::<f64>()) {
            Some(Ok(v)) if v.is_finite() => v,
            _ => {
                self.warnings
                    .push(format!("element {id} has a bad {axis} coordinate, using 0"));
                0.0
            }
        };
        PositionDto {
            x: coord("x") + offset,
            y: coord("y") + offset,
        }
    }

    fn place(&mut self, node: &XmlNode) -> PlaceDto {
        let (id, info_text) = self.identify(node, "place");
        let position = self.position(node, &id);
        let initial_marking = match node.text_of("initialMarking") {
            None => {
                self.warnings
                    .push(format!("place {id} has no initial marking, using 0"));
                0
            }
            Some(text) => match leading_int(text) {
                Some(n) if n >= 0 => u32::try_from(n).unwrap_or(u32::MAX),
                _ => {
                    self.warnings.push(format!(
                        "marking '{text}' of place {id} is not a number, using 0"
                    ));
                    0
                }
            },
        };
        PlaceDto {
            name: node.text_of("name").unwrap_or_default().to_owned(),
            id,
            position,
            initial_marking: initial_marking.into(),
            info_text,
        }
    }

    fn transition(&mut self, node: &XmlNode) -> TransitionDto {
        let (id, annotation) = self.identify(node, "transition");
        let position = self.position(node, &id);
        let info_text = if annotation.is_empty() {
            node.text_of("downlink")
                .or_else(|| node.text_of("uplink"))
                .unwrap_or_default()
                .to_owned()
        } else {
            annotation
        };
        TransitionDto {
            name: node.text_of("name").unwrap_or_default().to_owned(),
            id,
            position,
            info_text,
        }
    }

    fn arc(&mut self, node: &XmlNode) -> Option<ArcDto> {
        let (id, info_text) = self.identify(node, "arc");
        let mut endpoint = |end: &str| {
            let local = node.get(end).unwrap_or_default();
            let stable = self.resolved.get(local).cloned();
            if stable.is_none() {
                self.warnings.push(format!(
                    "arc {id} dropped: {end} '{local}' is not a place or transition"
                ));
            }
            stable
        };
        let source = endpoint("source")?;
        let target = endpoint("target")?;
        let text = match node.text_of("inscription") {
            Some(text) => text.to_owned(),
            None => {
                self.warnings
                    .push(format!("arc {id} has no inscription, using weight 1"));
                "1".to_owned()
            }
        };
        Some(ArcDto {
            id,
            source,
            target,
            text,
            info_text,
        })
    }
}
