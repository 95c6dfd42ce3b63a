use std::collections::HashSet;

use velum_core::{
    known_value, Digest, Envelope, EnvelopeError, ObscureAction, SymmetricKey,
};

fn alice_knows_bob() -> Envelope {
    Envelope::new("Alice")
        .unwrap()
        .add_assertion("knows", "Bob")
        .unwrap()
}

fn credential() -> Envelope {
    let holder = Envelope::new("employee-42")
        .unwrap()
        .add_assertion("firstName", "John")
        .unwrap()
        .add_assertion("lastName", "Smith")
        .unwrap()
        .add_assertion("degree", "Bachelor of Science")
        .unwrap()
        .add_assertion("graduationYear", 2020u64)
        .unwrap()
        .add_assertion(known_value::NOTE, "magna cum laude")
        .unwrap();
    Envelope::new("credential-1234")
        .unwrap()
        .add_assertion(known_value::ISSUER, "State University")
        .unwrap()
        .add_assertion(known_value::HOLDER, holder)
        .unwrap()
}

#[test]
fn self_elision_preserves_digest() {
    let envelope = alice_knows_bob();
    let elided = envelope.elide();
    assert!(elided.is_elided());
    assert_eq!(elided.digest(), envelope.digest());
    // Already-elided is a no-op.
    assert!(elided.elide().is_identical_to(&elided));
}

#[test]
fn elision_preserves_digest_for_every_target() {
    let envelope = credential();
    for target in envelope.deep_digests() {
        for revealing in [false, true] {
            let redacted = envelope
                .elide_set(&HashSet::from([target]), revealing)
                .unwrap();
            assert_eq!(redacted.digest(), envelope.digest());
        }
    }
}

#[test]
fn removing_mode_obscures_exactly_the_target() {
    let envelope = credential();
    let issuer = envelope
        .assertion_with_predicate(known_value::ISSUER)
        .unwrap();
    let redacted = envelope.elide_removing_target(issuer.digest()).unwrap();
    assert_eq!(redacted.digest(), envelope.digest());

    let placeholder = redacted.assertion_with_digest(issuer.digest()).unwrap();
    assert!(placeholder.is_elided());
    // The holder assertion is untouched.
    let holder = redacted
        .assertion_with_predicate(known_value::HOLDER)
        .unwrap();
    assert!(holder.is_assertion());
    assert!(holder.is_identical_to(
        &envelope
            .assertion_with_predicate(known_value::HOLDER)
            .unwrap()
    ));
}

#[test]
fn unelide_restores_the_original() {
    let envelope = alice_knows_bob();
    let elided = envelope.elide();
    let restored = elided.unelide(&envelope).unwrap();
    assert!(restored.is_identical_to(&envelope));
}

#[test]
fn unelide_rejects_digest_mismatch() {
    let elided = alice_knows_bob().elide();
    let other = Envelope::new("Mallory").unwrap();
    assert!(matches!(
        elided.unelide(&other),
        Err(EnvelopeError::InvalidDigest)
    ));
}

#[test]
fn encrypting_action_preserves_digest_and_decrypts() {
    let envelope = credential();
    let key = SymmetricKey::from_bytes([3u8; 32]);
    let issuer = envelope
        .assertion_with_predicate(known_value::ISSUER)
        .unwrap();
    let redacted = envelope
        .elide_removing_set_with_action(
            &HashSet::from([issuer.digest()]),
            &ObscureAction::Encrypt(key.clone()),
        )
        .unwrap();
    assert_eq!(redacted.digest(), envelope.digest());

    let placeholder = redacted.assertion_with_digest(issuer.digest()).unwrap();
    assert!(placeholder.is_encrypted());
    let recovered = placeholder.decrypt_subtree(&key).unwrap();
    assert!(recovered.is_identical_to(&issuer));
}

#[test]
fn decryption_with_wrong_key_fails() {
    let key = SymmetricKey::from_bytes([3u8; 32]);
    let wrong = SymmetricKey::from_bytes([4u8; 32]);
    let envelope = alice_knows_bob();
    let encrypted = envelope
        .elide_removing_set_with_action(
            &HashSet::from([envelope.digest()]),
            &ObscureAction::Encrypt(key),
        )
        .unwrap();
    assert!(encrypted.is_encrypted());
    assert!(matches!(
        encrypted.decrypt_subtree(&wrong),
        Err(EnvelopeError::Crypto(_))
    ));
}

#[test]
fn decrypt_subtree_requires_an_encrypted_envelope() {
    let key = SymmetricKey::from_bytes([3u8; 32]);
    assert!(matches!(
        alice_knows_bob().decrypt_subtree(&key),
        Err(EnvelopeError::InvalidFormat(_))
    ));
}

#[test]
fn double_wrap_with_elided_interior() {
    let leaf = Envelope::new("classified payload").unwrap();
    let double = leaf.wrap().wrap();
    let redacted = double.elide_removing_target(leaf.digest()).unwrap();

    assert_eq!(redacted.digest(), double.digest());
    let inner = redacted.try_unwrap().unwrap();
    assert!(inner.is_wrapped());
    let innermost = inner.try_unwrap().unwrap();
    assert!(innermost.is_elided());
    assert_eq!(innermost.digest(), leaf.digest());

    // The placeholder survives transport at exactly the innermost position.
    let decoded = Envelope::from_cbor_data(&redacted.to_cbor_data().unwrap()).unwrap();
    assert!(decoded.is_identical_to(&redacted));
    assert!(decoded.try_unwrap().unwrap().try_unwrap().unwrap().is_elided());
}

#[test]
fn revealing_mode_discloses_only_the_named_subtrees() {
    let envelope = credential();
    let holder_assertion = envelope
        .assertion_with_predicate(known_value::HOLDER)
        .unwrap();
    let holder_subject = holder_assertion.object().unwrap().clone();

    let mut target: HashSet<Digest> = HashSet::new();
    // The root and its subject.
    target.insert(envelope.digest());
    target.insert(envelope.subject().digest());
    // The path through the holder assertion and the holder node's shape.
    target.insert(holder_assertion.digest());
    target.insert(holder_assertion.predicate().unwrap().digest());
    target.insert(holder_subject.digest());
    target.insert(holder_subject.subject().digest());
    // The full subtrees of the two disclosed assertions.
    for predicate in ["firstName", "lastName"] {
        let assertion = holder_subject.assertion_with_predicate(predicate).unwrap();
        target.extend(assertion.deep_digests());
    }

    let disclosed = envelope.elide_revealing_set(&target).unwrap();
    assert_eq!(disclosed.digest(), envelope.digest());

    // The issuer assertion is a bare placeholder.
    let issuer = envelope
        .assertion_with_predicate(known_value::ISSUER)
        .unwrap();
    assert!(disclosed
        .assertion_with_digest(issuer.digest())
        .unwrap()
        .is_elided());

    // The disclosed assertions are fully intact.
    let holder = disclosed
        .assertion_with_predicate(known_value::HOLDER)
        .unwrap();
    let holder_view = holder.object().unwrap();
    assert_eq!(
        holder_view.extract_subject::<String>().unwrap(),
        "employee-42"
    );
    assert_eq!(
        holder_view
            .extract_object_for_predicate::<String>("firstName")
            .unwrap(),
        "John"
    );
    assert_eq!(
        holder_view
            .extract_object_for_predicate::<String>("lastName")
            .unwrap(),
        "Smith"
    );

    // Everything else inside the holder node is obscured.
    let degree = holder_subject.assertion_with_predicate("degree").unwrap();
    assert!(holder_view
        .assertion_with_digest(degree.digest())
        .unwrap()
        .is_elided());
    for assertion in holder_view.assertions() {
        assert!(assertion.is_assertion() || assertion.is_elided());
    }
}

#[test]
fn complementary_elisions_partition_the_tree() {
    let envelope = alice_knows_bob();
    let assertion = envelope.assertions()[0].clone();

    let removing = envelope.elide_removing_target(assertion.digest()).unwrap();
    let revealing_rest: HashSet<Digest> = envelope
        .deep_digests()
        .difference(&assertion.deep_digests())
        .copied()
        .collect();
    let revealed = envelope.elide_revealing_set(&revealing_rest).unwrap();

    // Both hide exactly the assertion subtree and nothing else.
    assert!(removing.is_identical_to(&revealed));
    assert_eq!(removing.digest(), envelope.digest());
}
