//! PNML encoding.

use std::collections::HashMap;

use super::tree::{self, XmlNode};
use super::{PnmlOptions, PNML_NAMESPACE};
use crate::dto::{NetDto, PositionDto};
use crate::error::CodecError;

/// Encode `nets` as one PNML document.
///
/// Element annotations are stored as text inside the tool-specific block;
/// transition annotations are also written as a `<downlink>` so that other
/// tools see them.
pub fn encode_pnml(nets: &[NetDto], options: &PnmlOptions) -> Result<String, CodecError> {
    options.validate()?;
    let mut root = XmlNode::new("pnml").attr("xmlns", PNML_NAMESPACE);
    for net in nets {
        root = root.child(encode_net(net, options));
    }
    tree::write(&root)
}

fn graphics(position: PositionDto) -> XmlNode {
    XmlNode::new("graphics").child(
        XmlNode::new("position")
            .attr("x", position.x.to_string())
            .attr("y", position.y.to_string()),
    )
}

fn toolspecific(options: &PnmlOptions, uuid: &str, info_text: &str) -> XmlNode {
    let mut node = XmlNode::new("toolspecific")
        .attr("tool", options.tool.as_str())
        .attr("version", options.tool_version.as_str())
        .attr("uuid", uuid);
    if !info_text.is_empty() {
        node = node.child(XmlNode::leaf("text", info_text));
    }
    node
}

fn named(node: XmlNode, name: &str) -> XmlNode {
    if name.is_empty() {
        node
    } else {
        node.child(XmlNode::text_child("name", name))
    }
}

fn encode_net(net: &NetDto, options: &PnmlOptions) -> XmlNode {
    let mut interchange: HashMap<&str, String> = HashMap::new();
    let mut node = XmlNode::new("net")
        .attr("id", format!("net_{}", net.id))
        .attr("type", net.net_type.as_str())
        .child(XmlNode::text_child("name", net.name.as_str()));

    for (i, p) in net.places.iter().enumerate() {
        let id = format!("p{}_{}", i + 1, net.id);
        let marking = XmlNode::new("initialMarking")
            .child(
                XmlNode::new("graphics")
                    .child(XmlNode::new("offset").attr("x", "0").attr("y", "0")),
            )
            .child(XmlNode::leaf("text", p.initial_marking.tokens().unwrap_or(0).to_string()));
        let place = named(XmlNode::new("place").attr("id", id.as_str()), &p.name)
            .child(graphics(p.position))
            .child(toolspecific(options, &p.id, &p.info_text))
            .child(marking);
        interchange.insert(p.id.as_str(), id);
        node = node.child(place);
    }

    for (i, t) in net.transitions.iter().enumerate() {
        let id = format!("t{}_{}", i + 1, net.id);
        let mut transition = named(XmlNode::new("transition").attr("id", id.as_str()), &t.name)
            .child(graphics(t.position))
            .child(toolspecific(options, &t.id, &t.info_text));
        if !t.info_text.is_empty() {
            transition = transition.child(XmlNode::text_child("downlink", t.info_text.as_str()));
        }
        interchange.insert(t.id.as_str(), id);
        node = node.child(transition);
    }

    for (i, a) in net.arcs.iter().enumerate() {
        let endpoint = |stable: &str| match interchange.get(stable) {
            Some(id) => id.clone(),
            None => {
                tracing::warn!(arc = %a.id, endpoint = stable, "arc endpoint not in net");
                String::new()
            }
        };
        let line = XmlNode::new("line")
            .attr("color", "rgb(0,0,0)")
            .attr("style", "solid");
        let arc = XmlNode::new("arc")
            .attr("id", format!("a{}_{}", i + 1, net.id))
            .attr("source", endpoint(&a.source))
            .attr("target", endpoint(&a.target))
            .child(XmlNode::new("graphics").child(line))
            .child(XmlNode::text_child("inscription", a.text.as_str()))
            .child(toolspecific(options, &a.id, &a.info_text));
        node = node.child(arc);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use petri_test_utils::{chain_net, consumer_net};

    fn encode(net: &petri_core::Net) -> String {
        encode_pnml(&[NetDto::from_net(net)], &PnmlOptions::default()).unwrap()
    }

    #[test]
    fn writes_interchange_ids_and_identity_blocks() {
        let xml = encode(&consumer_net());
        assert!(xml.contains(r#"xmlns="http://www.pnml.org/version-2009/grammar/pnml""#));
        assert!(xml.contains(r#"<net id="net_consumer" type="RefNet">"#));
        assert!(xml.contains(r#"<place id="p1_consumer">"#));
        assert!(xml.contains(r#"<transition id="t1_consumer">"#));
        assert!(xml.contains(r#"source="p1_consumer" target="t1_consumer""#));
        assert!(xml.contains(r#"tool="renew" version="4.0" uuid="p1""#));
        assert!(xml.contains(r#"color="rgb(0,0,0)" style="solid""#));
    }

    #[test]
    fn counters_are_per_kind() {
        let xml = encode(&chain_net());
        assert!(xml.contains(r#"<place id="p2_chain">"#));
        assert!(xml.contains(r#"<transition id="t2_chain">"#));
        assert!(xml.contains(r#"<arc id="a4_chain""#));
        assert!(!xml.contains("p3_chain"));
    }

    #[test]
    fn empty_document_is_still_pnml() {
        let xml = encode_pnml(&[], &PnmlOptions::default()).unwrap();
        assert!(xml.contains("<pnml"));
    }
}
