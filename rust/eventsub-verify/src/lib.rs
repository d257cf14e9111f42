//! Verify incoming EventSub webhook signatures and the actions they may request.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

pub mod action;
pub mod header;

pub use action::{resolve, ActionKind, Permissions};
pub use header::{extract, HeaderSource};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    MissingHeader(String),
    AmbiguousHeader(String),
    MalformedSignature,
    MalformedHex,
    UnsupportedAlgorithm(String),
    NoKeyMatched,
    ActionDenied(ActionKind),
    UnknownAction(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MissingHeader(name) => write!(f, "missing header {name}"),
            Error::AmbiguousHeader(name) => write!(f, "too many {name} headers"),
            Error::MalformedSignature => write!(f, "malformed signature"),
            Error::MalformedHex => write!(f, "malformed signature: could not decode hex"),
            Error::UnsupportedAlgorithm(name) => {
                write!(f, "unknown signature algorithm {name:?}")
            }
            Error::NoKeyMatched => write!(f, "no key matched the signature"),
            Error::ActionDenied(kind) => write!(f, "action {kind} not permitted for this key"),
            Error::UnknownAction(name) => write!(f, "unknown action identifier {name:?}"),
        }
    }
}

impl std::error::Error for Error {}

/// The hash function behind the HMAC, named by the signature header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl Algorithm {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sha256" => Some(Self::Sha256),
            "sha384" => Some(Self::Sha384),
            "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Compute the MAC over the concatenation of `parts`.
    pub fn mac(self, secret: &[u8], parts: &[&[u8]]) -> Vec<u8> {
        match self {
            Self::Sha256 => keyed::<Hmac<Sha256>>(secret, parts).finalize().into_bytes().to_vec(),
            Self::Sha384 => keyed::<Hmac<Sha384>>(secret, parts).finalize().into_bytes().to_vec(),
            Self::Sha512 => keyed::<Hmac<Sha512>>(secret, parts).finalize().into_bytes().to_vec(),
        }
    }

    /// Check `expected` against the MAC over `parts` in constant time.
    pub fn verify(self, secret: &[u8], parts: &[&[u8]], expected: &[u8]) -> bool {
        match self {
            Self::Sha256 => keyed::<Hmac<Sha256>>(secret, parts).verify_slice(expected),
            Self::Sha384 => keyed::<Hmac<Sha384>>(secret, parts).verify_slice(expected),
            Self::Sha512 => keyed::<Hmac<Sha512>>(secret, parts).verify_slice(expected),
        }
        .is_ok()
    }
}

fn keyed<M: Mac + KeyInit>(secret: &[u8], parts: &[&[u8]]) -> M {
    let mut mac =
        <M as Mac>::new_from_slice(secret).expect("HMAC can accept a key of any length");
    for part in parts {
        mac.update(part);
    }
    mac
}

/// A shared secret and the actions messages signed with it may request.
#[derive(Clone)]
pub struct SigningKey {
    secret: Vec<u8>,
    pub permissions: Permissions,
}

impl SigningKey {
    pub fn new(secret: impl Into<Vec<u8>>, permissions: Permissions) -> Self {
        Self {
            secret: secret.into(),
            permissions,
        }
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("secret", &"<redacted>")
            .field("permissions", &self.permissions)
            .finish()
    }
}

/// Verify a webhook request.
///
/// Returns the permissions of the first key that reproduces the signature.
/// Every failure, including a malformed header, rejects the request.
pub fn verify<H>(headers: &H, body: &[u8], keys: &[SigningKey]) -> Result<Permissions, Error>
where
    H: HeaderSource + ?Sized,
{
    let raw_signature = extract(header::SIGNATURE, headers)?;
    let signature = header::SignatureHeader::new(raw_signature)?;

    let timestamp = extract(header::TIMESTAMP, headers)?;
    let message_id = extract(header::MESSAGE_ID, headers)?;

    let message = [message_id, timestamp, body];
    let position = keys.iter().position(|key| {
        signature
            .algorithm
            .verify(&key.secret, &message, &signature.digest)
    });
    match position {
        Some(index) => {
            tracing::debug!(
                key = index,
                algorithm = signature.algorithm.name(),
                "signature verified"
            );
            Ok(keys[index].permissions)
        }
        None => Err(Error::NoKeyMatched),
    }
}

#[test]
fn test_algorithm_names() {
    for algorithm in [Algorithm::Sha256, Algorithm::Sha384, Algorithm::Sha512] {
        assert_eq!(Some(algorithm), Algorithm::from_name(algorithm.name()));
    }
    assert_eq!(None, Algorithm::from_name("sha1"));
    assert_eq!(None, Algorithm::from_name("Sha256"));
}

#[test]
fn test_mac_lengths() {
    let parts: [&[u8]; 1] = [b"m"];
    assert_eq!(32, Algorithm::Sha256.mac(b"k", &parts).len());
    assert_eq!(48, Algorithm::Sha384.mac(b"k", &parts).len());
    assert_eq!(64, Algorithm::Sha512.mac(b"k", &parts).len());
}

#[test]
fn test_mac_concatenates_parts() {
    let split: [&[u8]; 3] = [b"ab", b"c", b""];
    let regrouped: [&[u8]; 2] = [b"a", b"bc"];
    let whole: [&[u8]; 1] = [b"abc"];

    let mac = Algorithm::Sha256.mac(b"key", &whole);
    assert_eq!(mac, Algorithm::Sha256.mac(b"key", &split));
    assert!(Algorithm::Sha256.verify(b"key", &regrouped, &mac));
    assert!(!Algorithm::Sha256.verify(b"key", &regrouped, &mac[..31]));
    assert!(!Algorithm::Sha256.verify(b"kez", &whole, &mac));
    assert!(!Algorithm::Sha384.verify(b"key", &whole, &mac));
}

#[test]
fn test_key_debug_redacts() {
    let key = SigningKey::new("hunter2", Permissions::none());
    let printed = format!("{key:?}");
    assert!(!printed.contains("hunter2"));
    assert!(printed.contains("<redacted>"));
}

#[test]
fn test_display() {
    assert_eq!(
        "missing header Twitch-Eventsub-Message-Id",
        Error::MissingHeader(header::MESSAGE_ID.into()).to_string()
    );
    assert_eq!(
        "action lights not permitted for this key",
        Error::ActionDenied(ActionKind::Lights).to_string()
    );
}
