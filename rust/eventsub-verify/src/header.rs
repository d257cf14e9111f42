//! Header extraction and signature-header parsing.

use crate::{Algorithm, Error};
use std::collections::BTreeMap;

/// Carries the HMAC over message id, timestamp and body.
///
/// Example: `Twitch-Eventsub-Message-Signature: sha256=978cd8799146219e88be1f2d0079e59c85b89dbbd21b9e163b0f8bb926377af9`
pub const SIGNATURE: &str = "Twitch-Eventsub-Message-Signature";
pub const TIMESTAMP: &str = "Twitch-Eventsub-Message-Timestamp";
pub const MESSAGE_ID: &str = "Twitch-Eventsub-Message-Id";
pub const MESSAGE_TYPE: &str = "Twitch-Eventsub-Message-Type";

/// A collection of request headers that may hold several values per name.
pub trait HeaderSource {
    /// Every value stored under `name`, in the order they were received.
    fn values<'a>(&'a self, name: &str) -> Vec<&'a [u8]>;
}

impl<N: AsRef<str>, V: AsRef<[u8]>> HeaderSource for [(N, V)] {
    fn values<'a>(&'a self, name: &str) -> Vec<&'a [u8]> {
        self.iter()
            .filter(|(n, _)| n.as_ref() == name)
            .map(|(_, v)| v.as_ref())
            .collect()
    }
}

impl<N: AsRef<str>, V: AsRef<[u8]>> HeaderSource for Vec<(N, V)> {
    fn values<'a>(&'a self, name: &str) -> Vec<&'a [u8]> {
        self.as_slice().values(name)
    }
}

impl HeaderSource for BTreeMap<String, Vec<String>> {
    fn values<'a>(&'a self, name: &str) -> Vec<&'a [u8]> {
        self.get(name)
            .map(|vals| vals.iter().map(String::as_bytes).collect())
            .unwrap_or_default()
    }
}

#[cfg(feature = "http")]
impl HeaderSource for http::HeaderMap {
    fn values<'a>(&'a self, name: &str) -> Vec<&'a [u8]> {
        self.get_all(name).iter().map(|v| v.as_bytes()).collect()
    }
}

/// Get the single value of a header.
///
/// The value is returned as received, without trimming. A header sent more
/// than once is refused rather than resolved to one of its values.
pub fn extract<'a, H>(name: &str, headers: &'a H) -> Result<&'a [u8], Error>
where
    H: HeaderSource + ?Sized,
{
    match headers.values(name).as_slice() {
        [] => Err(Error::MissingHeader(name.to_string())),
        [value] => Ok(*value),
        _ => Err(Error::AmbiguousHeader(name.to_string())),
    }
}

/// The parsed signature header: `<algorithm>=<hex-digest>`.
#[derive(Debug, PartialEq)]
pub struct SignatureHeader {
    pub algorithm: Algorithm,
    pub digest: Vec<u8>,
}

impl SignatureHeader {
    pub fn new(value: &[u8]) -> Result<Self, Error> {
        let split = value
            .iter()
            .position(|&b| b == b'=')
            .ok_or(Error::MalformedSignature)?;
        let (name, hex_digest) = (&value[..split], &value[split + 1..]);

        let digest = hex::decode(hex_digest).or(Err(Error::MalformedHex))?;

        let name = String::from_utf8_lossy(name);
        let algorithm =
            Algorithm::from_name(&name).ok_or_else(|| Error::UnsupportedAlgorithm(name.into()))?;
        Ok(Self { algorithm, digest })
    }
}

#[test]
fn test_extract_missing() {
    let headers = vec![("a", "1")];
    assert_eq!(Err(Error::MissingHeader("b".into())), extract("b", &headers));
    assert_eq!(
        Err(Error::MissingHeader("A".into())),
        extract("A", &headers)
    );
}

#[test]
fn test_extract_ambiguous() {
    let headers = vec![("a", "1"), ("b", "x"), ("a", "2")];
    assert_eq!(Err(Error::AmbiguousHeader("a".into())), extract("a", &headers));
    let same = vec![("a", "1"), ("a", "1")];
    assert_eq!(Err(Error::AmbiguousHeader("a".into())), extract("a", &same));
}

#[test]
fn test_extract_verbatim() {
    let headers = vec![("a", " 1 "), ("b", "Mixed Case")];
    assert_eq!(Ok(&b" 1 "[..]), extract("a", &headers));
    assert_eq!(Ok(&b"Mixed Case"[..]), extract("b", &headers));
}

#[test]
fn test_extract_map() {
    let mut headers = BTreeMap::new();
    headers.insert("a".to_string(), vec!["1".to_string()]);
    headers.insert("b".to_string(), vec!["1".to_string(), "2".to_string()]);
    headers.insert("c".to_string(), vec![]);
    assert_eq!(Ok(&b"1"[..]), extract("a", &headers));
    assert_eq!(Err(Error::AmbiguousHeader("b".into())), extract("b", &headers));
    assert_eq!(Err(Error::MissingHeader("c".into())), extract("c", &headers));
}

#[cfg(feature = "http")]
#[test]
fn test_extract_header_map() {
    let mut headers = http::HeaderMap::new();
    headers.insert(SIGNATURE, http::HeaderValue::from_static("sha256=00"));
    headers.append(TIMESTAMP, http::HeaderValue::from_static("1"));
    headers.append(TIMESTAMP, http::HeaderValue::from_static("2"));
    assert_eq!(Ok(&b"sha256=00"[..]), extract(SIGNATURE, &headers));
    assert_eq!(
        Err(Error::AmbiguousHeader(TIMESTAMP.into())),
        extract(TIMESTAMP, &headers)
    );
    assert_eq!(
        Err(Error::MissingHeader(MESSAGE_ID.into())),
        extract(MESSAGE_ID, &headers)
    );
}

#[test]
fn test_signature_separator() {
    assert_eq!(
        Err(Error::MalformedSignature),
        SignatureHeader::new(b"invalid signature")
    );
    assert_eq!(Err(Error::MalformedSignature), SignatureHeader::new(b""));
}

#[test]
fn test_signature_hex() {
    assert_eq!(
        Err(Error::MalformedHex),
        SignatureHeader::new(b"sha256=invalidhex")
    );
    assert_eq!(Err(Error::MalformedHex), SignatureHeader::new(b"sha256=abc"));
    // the digest is everything after the first separator
    assert_eq!(Err(Error::MalformedHex), SignatureHeader::new(b"sha256=ab=cd"));
}

#[test]
fn test_signature_algorithm() {
    assert_eq!(
        Err(Error::UnsupportedAlgorithm("sha1".into())),
        SignatureHeader::new(b"sha1=00ff")
    );
    assert_eq!(
        Err(Error::UnsupportedAlgorithm("SHA256".into())),
        SignatureHeader::new(b"SHA256=00ff")
    );
    assert_eq!(
        Err(Error::UnsupportedAlgorithm("".into())),
        SignatureHeader::new(b"=00ff")
    );
    let header = SignatureHeader::new(b"sha512=00FF").unwrap();
    assert_eq!(Algorithm::Sha512, header.algorithm);
    assert_eq!(vec![0x00, 0xff], header.digest);
    assert!(SignatureHeader::new(b"sha256=").unwrap().digest.is_empty());
}
