//! End-to-end persistence: both forms through strings and files.

use petri_codec::{
    decode_native, encode_native, encode_pnml, export_file, export_str, import_file, import_str,
    NetDto, NetFormat, PnmlOptions, IMPORT_OFFSET,
};
use petri_core::{ElementId, Net, Position};
use petri_test_utils::{chain_net, consumer_net, pnml_document, random_net};
use proptest::prelude::*;

fn id(s: &str) -> ElementId {
    ElementId::from(s)
}

fn options() -> PnmlOptions {
    PnmlOptions::default()
}

#[test]
fn native_round_trip_is_exact() {
    let net = consumer_net();
    let text = export_str(&net, NetFormat::Native, &options()).unwrap();
    let import = import_str(&text, NetFormat::Native, &options()).unwrap();
    assert!(import.warnings.is_empty(), "{}", import.warnings);
    assert_eq!(import.nets, vec![net]);
}

#[test]
fn pnml_round_trip_keeps_identity_and_shifts_positions() {
    let net = consumer_net();
    let text = export_str(&net, NetFormat::Pnml, &options()).unwrap();
    let (back, warnings) = import_str(&text, NetFormat::Pnml, &options())
        .unwrap()
        .into_primary();
    assert!(warnings.is_empty(), "{warnings}");
    let back = back.unwrap();

    assert_eq!(back.id(), net.id());
    let p1 = back.place(&id("p1")).unwrap();
    assert_eq!(p1.tokens, 3);
    assert_eq!(p1.info_text, "buffer");
    assert_eq!(
        p1.position,
        Position::new(100.0 + IMPORT_OFFSET, 100.0 + IMPORT_OFFSET)
    );
    assert_eq!(back.arc(&id("a1")).unwrap().weight, 2);
    assert_eq!(back.arc(&id("a1")).unwrap().from, id("p1"));
    assert!(back.transition(&id("t1")).is_some());
}

#[test]
fn annotation_spaces_survive_pnml() {
    let mut model = petri_core::NetModel::from_net(consumer_net());
    model.set_info_text(&id("p1"), "  spaced note ").unwrap();
    let net = model.into_net();
    let text = export_str(&net, NetFormat::Pnml, &options()).unwrap();
    let (back, _) = import_str(&text, NetFormat::Pnml, &options())
        .unwrap()
        .into_primary();
    assert_eq!(back.unwrap().place(&id("p1")).unwrap().info_text, "  spaced note ");
}

#[test]
fn native_bad_marking_loads_as_zero() {
    let text = r#"{"id":"n","places":[
        {"id":"a","position":{"x":0,"y":0},"initialMarking":"abc"},
        {"id":"b","position":{"x":0,"y":0},"initialMarking":-1},
        {"id":"c","position":{"x":0,"y":0},"initialMarking":2}
    ]}"#;
    let import = import_str(text, NetFormat::Native, &options()).unwrap();
    let net = &import.nets[0];
    assert_eq!(net.place(&id("a")).unwrap().tokens, 0);
    assert_eq!(net.place(&id("b")).unwrap().tokens, 0);
    assert_eq!(net.place(&id("c")).unwrap().tokens, 2);
    assert_eq!(import.warnings.len(), 2);
    assert!(import.warnings.mentions("abc"));
}

#[test]
fn pnml_fixture_imports_with_defaults() {
    let import = import_str(pnml_document(), NetFormat::Pnml, &options()).unwrap();
    assert_eq!(import.nets.len(), 2);
    let first = &import.nets[0];

    assert_eq!(first.place(&id("place-a")).unwrap().tokens, 0);
    assert_eq!(first.place(&id("place-a")).unwrap().name, "input");
    assert_eq!(
        first.transition(&id("trans-a")).unwrap().info_text,
        "this:go()"
    );
    // "heavy" defaults to weight 1; the arc to "nowhere" is dropped.
    assert_eq!(first.arc(&id("arc-a")).unwrap().weight, 1);
    assert_eq!(first.arc_count(), 2);
    assert!(first.arcs().any(|a| a.weight == 3));

    let warnings = &import.warnings;
    assert!(warnings.mentions("'many'"));
    assert!(warnings.mentions("'heavy'"));
    assert!(warnings.mentions("nowhere"));

    let (primary, warnings) = import.into_primary();
    assert_eq!(primary.unwrap().id().as_str(), "first");
    assert!(warnings.mentions("only the first"));
}

#[test]
fn multi_net_export_decodes_every_net() {
    let dtos = [NetDto::from_net(&consumer_net()), NetDto::from_net(&chain_net())];
    let xml = encode_pnml(&dtos, &options()).unwrap();
    let import = import_str(&xml, NetFormat::Pnml, &options()).unwrap();
    let ids: Vec<_> = import.nets.iter().map(|n| n.id().to_string()).collect();
    assert_eq!(ids, vec!["consumer", "chain"]);
    assert_eq!(import.nets[1].arc_count(), 4);
}

#[test]
fn files_dispatch_on_extension() {
    let dir = tempfile::tempdir().unwrap();
    let net = chain_net();

    let json = dir.path().join("chain.json");
    export_file(&net, &json, &options()).unwrap();
    assert_eq!(import_file(&json, &options()).unwrap().nets, vec![net.clone()]);

    let pnml = dir.path().join("chain.pnml");
    export_file(&net, &pnml, &options()).unwrap();
    let text = std::fs::read_to_string(&pnml).unwrap();
    assert!(text.contains("<pnml"));
    let imported = import_file(&pnml, &options()).unwrap();
    assert_eq!(imported.nets[0].place(&id("p1")).unwrap().tokens, 1);

    let unknown = dir.path().join("chain.txt");
    assert!(export_file(&net, &unknown, &options()).is_err());
    std::fs::write(&unknown, "irrelevant").unwrap();
    let import = import_file(&unknown, &options()).unwrap();
    assert!(import.nets.is_empty());
    assert_eq!(import.warnings.len(), 1);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = import_file(&dir.path().join("absent.json"), &options()).unwrap_err();
    assert!(matches!(err, petri_codec::CodecError::Io(_)));
}

fn shifted(net: &Net) -> Vec<(String, Position)> {
    net.places()
        .map(|p| (p.id.to_string(), p.position.offset(IMPORT_OFFSET, IMPORT_OFFSET)))
        .collect()
}

proptest! {
    #[test]
    fn native_round_trip_random(seed in any::<u64>(), places in 0usize..8, transitions in 0usize..8) {
        let net = random_net(seed, places, transitions, 0.4);
        let text = encode_native(&NetDto::from_net(&net)).unwrap();
        let (back, warnings) = decode_native(&text).unwrap().into_net();
        prop_assert!(warnings.is_empty());
        prop_assert_eq!(back, net);
    }

    #[test]
    fn pnml_round_trip_random(seed in any::<u64>(), places in 1usize..6, transitions in 1usize..6) {
        let net = random_net(seed, places, transitions, 0.5);
        let text = export_str(&net, NetFormat::Pnml, &options()).unwrap();
        let (back, warnings) = import_str(&text, NetFormat::Pnml, &options())
            .unwrap()
            .into_primary();
        prop_assert!(warnings.is_empty());
        let back = back.unwrap();
        prop_assert_eq!(back.arc_count(), net.arc_count());
        for arc in net.arcs() {
            prop_assert_eq!(back.arc(&arc.id).map(|a| a.weight), Some(arc.weight));
        }
        let positions: Vec<_> = back.places().map(|p| (p.id.to_string(), p.position)).collect();
        prop_assert_eq!(positions, shifted(&net));
    }
}
