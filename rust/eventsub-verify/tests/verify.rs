use eventsub_verify::header::{MESSAGE_ID, SIGNATURE, TIMESTAMP};
use eventsub_verify::{resolve, verify, ActionKind, Error, Permissions, SigningKey};

const GOOD: &str = "sha256=978cd8799146219e88be1f2d0079e59c85b89dbbd21b9e163b0f8bb926377af9";
const WRONG: &str = "sha256=1c5863cd55b5a4413fd59f054af57ba3c75c0698b3851d70f99b8de2d5c7338f";
const OTHER_KEY: &str = "sha256=9b0adcfdc976e11adab35ee7f31333761b41d19ad177e4786e9cb6ddbd8b9b51";
const SHA512: &str = "sha512=e10d7f0e4e9c3b1bd342a66615ef481114a8fd74b5cb0dcbaa2ef4e982c2e8bc6ab420d1f8b2e0566839768b7f9e66ec9b2248a84e3b98c1ba8adcf83712f9ee";
const BODY: &[u8] = b"this is a body";

fn headers(signature: &str) -> Vec<(&'static str, String)> {
    vec![
        (SIGNATURE, signature.to_string()),
        (TIMESTAMP, "this is a timestamp".to_string()),
        (MESSAGE_ID, "this is a message id".to_string()),
    ]
}

fn key(secret: &str, permissions: Permissions) -> SigningKey {
    SigningKey::new(secret, permissions)
}

#[test]
fn no_signature() {
    let empty: Vec<(&str, &str)> = vec![];
    assert_eq!(
        Err(Error::MissingHeader(SIGNATURE.into())),
        verify(&empty, b"", &[])
    );
}

#[test]
fn signature_without_separator() {
    let keys = [key("test", Permissions::all())];
    assert_eq!(
        Err(Error::MalformedSignature),
        verify(&headers("invalid signature"), BODY, &keys)
    );
}

#[test]
fn signature_bad_hex() {
    assert_eq!(
        Err(Error::MalformedHex),
        verify(&headers("sha256=invalidhex"), BODY, &[])
    );
}

#[test]
fn signature_unsupported_algorithm() {
    let keys = [key("test", Permissions::all())];
    assert_eq!(
        Err(Error::UnsupportedAlgorithm("md5".into())),
        verify(&headers("md5=978cd879"), BODY, &keys)
    );
}

#[test]
fn no_timestamp() {
    let headers = vec![(SIGNATURE, WRONG)];
    assert_eq!(
        Err(Error::MissingHeader(TIMESTAMP.into())),
        verify(&headers, b"", &[])
    );
}

#[test]
fn no_message_id() {
    let headers = vec![(SIGNATURE, WRONG), (TIMESTAMP, "this is a timestamp")];
    assert_eq!(
        Err(Error::MissingHeader(MESSAGE_ID.into())),
        verify(&headers, b"", &[])
    );
}

#[test]
fn duplicated_message_id() {
    let mut headers = headers(GOOD);
    headers.push((MESSAGE_ID, "this is a message id".to_string()));
    let keys = [key("test", Permissions::all())];
    assert_eq!(
        Err(Error::AmbiguousHeader(MESSAGE_ID.into())),
        verify(&headers, BODY, &keys)
    );
}

#[test]
fn no_keys() {
    assert_eq!(Err(Error::NoKeyMatched), verify(&headers(GOOD), BODY, &[]));
}

#[test]
fn incorrect_signature() {
    let keys = [key("test", Permissions::none())];
    assert_eq!(
        Err(Error::NoKeyMatched),
        verify(&headers(WRONG), BODY, &keys)
    );
}

#[test]
fn no_permissions() {
    let keys = [key("test", Permissions::none())];
    let permissions = verify(&headers(GOOD), BODY, &keys).unwrap();
    assert!(permissions.is_empty());
    assert!(resolve("scrollo", permissions).is_err());
    assert!(resolve("unheard of", permissions).is_err());
}

#[test]
fn permissions() {
    let scrollo = Permissions::none().with(ActionKind::Scrollo);
    let keys = [key("test", scrollo)];
    let permissions = verify(&headers(GOOD), BODY, &keys).unwrap();
    assert_eq!(scrollo, permissions);
    assert_eq!(Ok(ActionKind::Scrollo), resolve("scrollo", permissions));
}

#[test]
fn sha512_selected_by_header() {
    let keys = [key("test", Permissions::all())];
    assert_eq!(
        Ok(Permissions::all()),
        verify(&headers(SHA512), BODY, &keys)
    );
    // the same digest under a different declared algorithm does not verify
    let relabelled = SHA512.replacen("sha512", "sha384", 1);
    assert_eq!(
        Err(Error::NoKeyMatched),
        verify(&headers(&relabelled), BODY, &keys)
    );
}

#[test]
fn second_key_matches() {
    let lights = Permissions::none().with(ActionKind::Lights);
    let keys = [key("test", Permissions::none()), key("other", lights)];
    assert_eq!(Ok(lights), verify(&headers(OTHER_KEY), BODY, &keys));
    assert_eq!(Ok(Permissions::none()), verify(&headers(GOOD), BODY, &keys));
}

#[test]
fn first_match_wins() {
    let first = Permissions::none().with(ActionKind::Comrade);
    let second = Permissions::all();
    let keys = [key("test", first), key("test", second)];
    assert_eq!(Ok(first), verify(&headers(GOOD), BODY, &keys));
}

#[test]
fn deterministic() {
    let keys = [key("test", Permissions::all())];
    let first = verify(&headers(GOOD), BODY, &keys);
    for _ in 0..16 {
        assert_eq!(first, verify(&headers(GOOD), BODY, &keys));
    }
}

#[test]
fn single_byte_changes_reject() {
    let keys = [key("test", Permissions::all())];
    let flip = |s: &str, at: usize| {
        let mut bytes = s.as_bytes().to_vec();
        bytes[at] ^= 0x01;
        String::from_utf8(bytes).unwrap()
    };

    for at in 0..BODY.len() {
        let mut body = BODY.to_vec();
        body[at] ^= 0x01;
        assert_eq!(Err(Error::NoKeyMatched), verify(&headers(GOOD), &body, &keys));
    }

    for at in 0.."this is a timestamp".len() {
        let mut headers = headers(GOOD);
        headers[1].1 = flip("this is a timestamp", at);
        assert_eq!(Err(Error::NoKeyMatched), verify(&headers, BODY, &keys));
    }

    for at in 0.."this is a message id".len() {
        let mut headers = headers(GOOD);
        headers[2].1 = flip("this is a message id", at);
        assert_eq!(Err(Error::NoKeyMatched), verify(&headers, BODY, &keys));
    }

    for at in 0.."test".len() {
        let keys = [key(&flip("test", at), Permissions::all())];
        assert_eq!(Err(Error::NoKeyMatched), verify(&headers(GOOD), BODY, &keys));
    }

    // swapping id and timestamp changes the signed bytes
    let mut swapped = headers(GOOD);
    swapped[1].1 = "this is a message id".to_string();
    swapped[2].1 = "this is a timestamp".to_string();
    assert_eq!(Err(Error::NoKeyMatched), verify(&swapped, BODY, &keys));
}

#[test]
fn truncated_digest() {
    let keys = [key("test", Permissions::all())];
    assert_eq!(
        Err(Error::NoKeyMatched),
        verify(&headers(&GOOD[..GOOD.len() - 2]), BODY, &keys)
    );
    assert_eq!(
        Err(Error::NoKeyMatched),
        verify(&headers("sha256="), BODY, &keys)
    );
}
