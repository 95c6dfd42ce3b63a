use velum_core::{
    known_value, CborValue, Envelope, EnvelopeError, FixedSalt, KnownValue, SymmetricKey,
    TagRegistry,
};

fn fixtures() -> Vec<Envelope> {
    let mut salt = FixedSalt::new([9u8; 8]);
    let key = SymmetricKey::from_bytes([5u8; 32]);
    let plain = Envelope::new("Alice")
        .unwrap()
        .add_assertion("knows", "Bob")
        .unwrap();
    vec![
        Envelope::new("Alice").unwrap(),
        Envelope::new(42u64).unwrap(),
        Envelope::new(true).unwrap(),
        Envelope::new(vec![0u8, 1, 2]).unwrap(),
        Envelope::new(known_value::NOTE).unwrap(),
        Envelope::new_assertion("knows", "Bob").unwrap(),
        plain.clone(),
        plain.clone().wrap(),
        plain.clone().wrap().wrap(),
        plain
            .clone()
            .add_assertion_salted("knows", "Carol", &mut salt)
            .unwrap(),
        plain.clone().elide(),
        plain
            .elide_removing_target(Envelope::new("Bob").unwrap().digest())
            .unwrap(),
        plain
            .elide_removing_set_with_action(
                &std::collections::HashSet::from([plain.digest()]),
                &velum_core::ObscureAction::Encrypt(key),
            )
            .unwrap(),
        Envelope::new("nested")
            .unwrap()
            .add_assertion("holds", plain.clone())
            .unwrap(),
    ]
}

#[test]
fn every_fixture_passes_the_encoding_self_check() {
    for fixture in fixtures() {
        fixture.check_encoding().unwrap();
    }
}

#[test]
fn round_trip_is_identical_not_just_equivalent() {
    for fixture in fixtures() {
        let decoded = Envelope::from_cbor_data(&fixture.to_cbor_data().unwrap()).unwrap();
        assert!(decoded.is_identical_to(&fixture));
    }
}

#[test]
fn standalone_transport_requires_the_outer_tag() {
    let envelope = Envelope::new("Alice").unwrap();
    let untagged = envelope.untagged_cbor().unwrap();
    assert!(matches!(
        Envelope::from_tagged_cbor(&untagged),
        Err(EnvelopeError::UnknownTag(_))
    ));
    let tagged = envelope.tagged_cbor().unwrap();
    assert_eq!(
        Envelope::from_tagged_cbor(&tagged).unwrap().digest(),
        envelope.digest()
    );
}

#[test]
fn unknown_tag_is_rejected() {
    let value = CborValue::Tag(999, Box::new(CborValue::Null));
    assert!(matches!(
        Envelope::from_untagged_cbor(&value),
        Err(EnvelopeError::UnknownTag(999))
    ));
}

#[test]
fn undersized_node_array_is_rejected() {
    let leaf = Envelope::new("Alice").unwrap().untagged_cbor().unwrap();
    let value = CborValue::Array(vec![leaf]);
    assert!(matches!(
        Envelope::from_untagged_cbor(&value),
        Err(EnvelopeError::InvalidFormat(_))
    ));
}

#[test]
fn decoded_node_elements_are_validated() {
    // Two leaves: the second is not an assertion, so the checked
    // constructor must reject the array even though it parses.
    let leaf = Envelope::new("Alice").unwrap().untagged_cbor().unwrap();
    let value = CborValue::Array(vec![leaf.clone(), leaf]);
    assert!(matches!(
        Envelope::from_untagged_cbor(&value),
        Err(EnvelopeError::InvalidFormat(_))
    ));
}

#[test]
fn known_value_encoding_is_compact_and_stable() {
    let envelope = Envelope::new(KnownValue::new(15)).unwrap();
    let tags = TagRegistry::STANDARD;
    match envelope.untagged_cbor().unwrap() {
        CborValue::Tag(tag, inner) => {
            assert_eq!(tag, tags.known_value);
            assert_eq!(*inner, CborValue::Integer(15));
        }
        other => panic!("unexpected encoding: {other:?}"),
    }
}

#[test]
fn elided_placeholder_encodes_its_digest() {
    let envelope = Envelope::new("Alice").unwrap();
    let elided = envelope.elide();
    let decoded = Envelope::from_cbor_data(&elided.to_cbor_data().unwrap()).unwrap();
    assert!(decoded.is_elided());
    assert_eq!(decoded.digest(), envelope.digest());
}

#[test]
fn node_encoding_orders_assertions_canonically() {
    let envelope = Envelope::new("Alice")
        .unwrap()
        .add_assertion("knows", "Bob")
        .unwrap()
        .add_assertion("knows", "Carol")
        .unwrap();
    match envelope.untagged_cbor().unwrap() {
        CborValue::Array(elements) => {
            assert_eq!(elements.len(), 3);
            let decoded: Vec<Envelope> = elements[1..]
                .iter()
                .map(|e| Envelope::from_untagged_cbor(e).unwrap())
                .collect();
            assert!(decoded[0].digest() < decoded[1].digest());
        }
        other => panic!("unexpected encoding: {other:?}"),
    }
}

#[test]
fn alternate_registries_stay_bijective() {
    let tags = TagRegistry {
        envelope: 300,
        leaf: 301,
        assertion: 302,
        known_value: 303,
        wrapped: 304,
        encrypted: 305,
        elided: 306,
    };
    let envelope = Envelope::new("Alice")
        .unwrap()
        .add_assertion("knows", "Bob")
        .unwrap()
        .wrap();
    let encoded = envelope.tagged_cbor_with(&tags).unwrap();
    let decoded = Envelope::from_tagged_cbor_with(&encoded, &tags).unwrap();
    assert_eq!(decoded.digest(), envelope.digest());
    // The standard registry rejects the alternate tags.
    assert!(Envelope::from_tagged_cbor(&encoded).is_err());
}
