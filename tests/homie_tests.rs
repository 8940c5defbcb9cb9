//! Tests for the Homie topic layout and advertisement.

use tic_rs::{historic_single_phase_fields, FieldDescriptor, HomieDatatype, HomieDevice};

fn payload<'a>(messages: &'a [tic_rs::HomieMessage], topic: &str) -> Option<&'a str> {
    messages
        .iter()
        .find(|m| m.topic == topic)
        .map(|m| m.payload.as_str())
}

#[test]
fn test_topics() {
    let homie = HomieDevice::default();
    let papp = FieldDescriptor::new("PAPP", 5, "Puissance apparente", HomieDatatype::Integer, "VA");
    assert_eq!(homie.device_prefix(), "homie/linky/");
    assert_eq!(homie.node_prefix(), "homie/linky/tic/");
    assert_eq!(homie.property_topic(&papp), "homie/linky/tic/papp");
    assert_eq!(homie.state_topic(), "homie/linky/$state");
}

#[test]
fn test_will_and_goodbye() {
    let homie = HomieDevice::default();
    assert_eq!(homie.last_will().topic, "homie/linky/$state");
    assert_eq!(homie.last_will().payload, "lost");
    assert_eq!(homie.disconnected().payload, "disconnected");
}

#[test]
fn test_device_and_node_attributes() {
    let homie = HomieDevice::default();
    let fields = historic_single_phase_fields();
    let messages = homie.advertisement(&fields);

    assert_eq!(payload(&messages, "homie/linky/$homie"), Some("3.0.0"));
    assert_eq!(payload(&messages, "homie/linky/$name"), Some("Linky"));
    assert_eq!(payload(&messages, "homie/linky/$state"), Some("ready"));
    assert_eq!(payload(&messages, "homie/linky/$nodes"), Some("tic"));
    assert_eq!(payload(&messages, "homie/linky/$extensions"), Some(""));
    assert_eq!(payload(&messages, "homie/linky/$implementation"), Some("RPi"));
    assert_eq!(payload(&messages, "homie/linky/tic/$name"), Some("TIC output"));
    assert_eq!(payload(&messages, "homie/linky/tic/$type"), Some("Electricity meter"));

    let properties = payload(&messages, "homie/linky/tic/$properties").unwrap();
    assert!(properties.starts_with("adco,optarif,isousc,base,"));
    assert!(properties.ends_with(",hhphc,motdetat"));
    assert_eq!(properties.split(',').count(), 23);
}

#[test]
fn test_property_attributes() {
    let homie = HomieDevice::default();
    let fields = historic_single_phase_fields();
    let messages = homie.advertisement(&fields);

    assert_eq!(payload(&messages, "homie/linky/tic/papp/$name"), Some("Puissance apparente"));
    assert_eq!(payload(&messages, "homie/linky/tic/papp/$datatype"), Some("integer"));
    assert_eq!(payload(&messages, "homie/linky/tic/papp/$unit"), Some("VA"));
    assert_eq!(payload(&messages, "homie/linky/tic/papp/$format"), None);

    assert_eq!(payload(&messages, "homie/linky/tic/demain/$datatype"), Some("enum"));
    assert_eq!(
        payload(&messages, "homie/linky/tic/demain/$format"),
        Some("----,BLEU,BLAN,ROUG")
    );
    // 9 device/node messages, 3 per property, plus one $format per enum
    assert_eq!(messages.len(), 9 + 23 * 3 + 3);
}

#[test]
fn test_custom_device() {
    let homie = HomieDevice {
        device_id: "meter-2".into(),
        ..HomieDevice::default()
    };
    let iinst = FieldDescriptor::new("IINST", 3, "Intensité instantanée", HomieDatatype::Integer, "A");
    assert_eq!(homie.property_topic(&iinst), "homie/meter-2/tic/iinst");
}
