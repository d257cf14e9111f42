use eventsub_sign::{sign, sign_at};
use eventsub_verify::header::{MESSAGE_ID, SIGNATURE, TIMESTAMP};
use eventsub_verify::{verify, ActionKind, Algorithm, Error, Permissions, SigningKey};

#[test]
fn signed_message_verifies() {
    let body = br#"{"event":{"user_input":"","reward":{"title":"lights"}}}"#;
    let signed = sign(Algorithm::Sha256, b"sub secret", "msg-7", body).unwrap();
    let headers = vec![
        (SIGNATURE, signed.signature.as_str()),
        (TIMESTAMP, signed.timestamp.as_str()),
        (MESSAGE_ID, signed.message_id.as_str()),
    ];

    let lights = Permissions::none().with(ActionKind::Lights);
    let keys = [
        SigningKey::new("dom secret", Permissions::all()),
        SigningKey::new("sub secret", lights),
    ];
    assert_eq!(Ok(lights), verify(&headers, body, &keys));
    assert_eq!(Err(Error::NoKeyMatched), verify(&headers, &body[1..], &keys));
}

#[test]
fn every_algorithm_verifies() {
    let keys = [SigningKey::new("k", Permissions::all())];
    for algorithm in [Algorithm::Sha256, Algorithm::Sha384, Algorithm::Sha512] {
        let signature = sign_at(algorithm, b"k", "id", "2024-01-01T00:00:00Z", b"body");
        let headers = vec![
            (SIGNATURE, signature.as_str()),
            (TIMESTAMP, "2024-01-01T00:00:00Z"),
            (MESSAGE_ID, "id"),
        ];
        assert_eq!(Ok(Permissions::all()), verify(&headers, b"body", &keys));
    }
}
