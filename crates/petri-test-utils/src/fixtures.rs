//! Reusable fixture nets and documents.
//!
//! - [`consumer_net`]: one place with 3 tokens feeding one transition
//!   through an arc of weight 2.
//! - [`chain_net`]: a two-place cycle, live and reversible.
//! - [`pnml_document`]: a hand-written two-net PNML file exercising the
//!   decoder's defaulting paths.

use petri_core::{Arc, Net, NetId, NetModel, Place, Position, Transition};

/// `p1 (3 tokens) --2--> t1`, with stable ids `p1`, `t1`, `a1`.
pub fn consumer_net() -> Net {
    let mut model = NetModel::from_net(Net::new(NetId::from("consumer"), "consumer"));
    let mut p1 = Place::new("p1".into(), Position::new(100.0, 100.0)).with_tokens(3);
    p1.info_text = "buffer".into();
    model.insert_place(p1).expect("fixture place");
    model
        .insert_transition(Transition::new("t1".into(), Position::new(200.0, 100.0)))
        .expect("fixture transition");
    model
        .insert_arc(Arc::new("a1".into(), "p1".into(), "t1".into()).with_weight(2))
        .expect("fixture arc");
    model.into_net()
}

/// `p1 (1 token) -> t1 -> p2 -> t2 -> p1`, all weights 1.
pub fn chain_net() -> Net {
    let mut model = NetModel::from_net(Net::new(NetId::from("chain"), "chain"));
    model
        .insert_place(Place::new("p1".into(), Position::new(0.0, 0.0)).with_tokens(1))
        .expect("fixture place");
    model
        .insert_place(Place::new("p2".into(), Position::new(100.0, 0.0)))
        .expect("fixture place");
    model
        .insert_transition(Transition::new("t1".into(), Position::new(50.0, -40.0)))
        .expect("fixture transition");
    model
        .insert_transition(Transition::new("t2".into(), Position::new(50.0, 40.0)))
        .expect("fixture transition");
    for (id, from, to) in [
        ("a1", "p1", "t1"),
        ("a2", "t1", "p2"),
        ("a3", "p2", "t2"),
        ("a4", "t2", "p1"),
    ] {
        model
            .insert_arc(Arc::new(id.into(), from.into(), to.into()))
            .expect("fixture arc");
    }
    model.into_net()
}

/// Two nets. The first has a place with a non-numeric marking, an arc
/// with a non-numeric inscription, a transition annotated only through a
/// downlink, and an arc whose target does not exist.
pub fn pnml_document() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<pnml xmlns="http://www.pnml.org/version-2009/grammar/pnml">
  <net id="net_first" type="RefNet">
    <name><text>first</text></name>
    <page id="page1">
      <place id="p1_first">
        <name><text>input</text></name>
        <graphics><position x="10" y="20"/></graphics>
        <initialMarking><text>many</text></initialMarking>
        <toolspecific tool="renew" version="4.0" uuid="place-a"/>
      </place>
      <place id="p2_first">
        <graphics><position x="110" y="20"/></graphics>
        <initialMarking><text>4</text></initialMarking>
      </place>
      <transition id="t1_first">
        <graphics><position x="60" y="20"/></graphics>
        <downlink><text>this:go()</text></downlink>
        <toolspecific tool="renew" version="4.0" uuid="trans-a"/>
      </transition>
      <arc id="a1_first" source="p1_first" target="t1_first">
        <inscription><text>heavy</text></inscription>
        <toolspecific tool="renew" version="4.0" uuid="arc-a"/>
      </arc>
      <arc id="a2_first" source="t1_first" target="p2_first">
        <inscription><text>3</text></inscription>
      </arc>
      <arc id="a3_first" source="t1_first" target="nowhere"/>
    </page>
  </net>
  <net id="net_second" type="RefNet">
    <name><text>second</text></name>
    <place id="p1_second">
      <graphics><position x="0" y="0"/></graphics>
    </place>
  </net>
</pnml>
"#
}
