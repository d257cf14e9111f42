use chrono::{DateTime, SecondsFormat, Utc};
use eventsub_verify::Algorithm;

#[cfg(not(target_arch = "wasm32"))]
use std::time::SystemTime;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Communicates errors which arise while signing a message.
#[derive(Debug)]
pub enum Error {
    Time,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Time => write!(f, "Invalid timestamp"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

// Taken from https://github.com/rust-lang/rust/issues/48564#issuecomment-505114709
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Date, js_name = now)]
    fn date_now() -> f64;
}

#[cfg(target_arch = "wasm32")]
fn now() -> Result<u64> {
    Ok((date_now() / 1000.0) as u64)
}

#[cfg(not(target_arch = "wasm32"))]
fn now() -> Result<u64> {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|_| Error::Time)
        .map(|d| d.as_secs())
}

/// The header values that accompany a signed message.
#[derive(Debug, Clone, PartialEq)]
pub struct Signed {
    /// `Twitch-Eventsub-Message-Id`
    pub message_id: String,
    /// `Twitch-Eventsub-Message-Timestamp`
    pub timestamp: String,
    /// `Twitch-Eventsub-Message-Signature`
    pub signature: String,
}

/// Generates the signature header value for a message.
///
/// The MAC covers `message_id`, `timestamp` and `body`, concatenated in that
/// order without separators. The result has the form `<algorithm>=<hex>`.
pub fn sign_at(
    algorithm: Algorithm,
    secret: &[u8],
    message_id: &str,
    timestamp: &str,
    body: &[u8],
) -> String {
    let mac = algorithm.mac(
        secret,
        &[message_id.as_bytes(), timestamp.as_bytes(), body],
    );
    format!("{}={}", algorithm.name(), hex::encode(mac))
}

/// Signs a message as of now.
///
/// The timestamp is RFC 3339 in UTC with second precision, which is how the
/// platform stamps its deliveries.
pub fn sign(algorithm: Algorithm, secret: &[u8], message_id: &str, body: &[u8]) -> Result<Signed> {
    let timestamp = rfc3339(now()?)?;
    let signature = sign_at(algorithm, secret, message_id, &timestamp, body);
    Ok(Signed {
        message_id: message_id.to_string(),
        timestamp,
        signature,
    })
}

/// Format seconds since the epoch as `YYYY-MM-DDTHH:MM:SSZ`.
fn rfc3339(secs: u64) -> Result<String> {
    let secs = i64::try_from(secs).map_err(|_| Error::Time)?;
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok_or(Error::Time)
}

#[test]
fn test_sign_at() {
    assert_eq!(
        "sha256=978cd8799146219e88be1f2d0079e59c85b89dbbd21b9e163b0f8bb926377af9",
        sign_at(
            Algorithm::Sha256,
            b"test",
            "this is a message id",
            "this is a timestamp",
            b"this is a body"
        )
    );
}

#[test]
fn test_rfc3339() {
    assert_eq!("1970-01-01T00:00:00Z", rfc3339(0).unwrap());
    assert_eq!("2000-02-29T12:34:56Z", rfc3339(951_827_696).unwrap());
    assert_eq!("2024-12-31T23:59:59Z", rfc3339(1_735_689_599).unwrap());
    assert!(rfc3339(u64::MAX).is_err());
}

#[test]
fn test_sign_now() {
    let signed = sign(Algorithm::Sha384, b"secret", "id-1", b"{}").unwrap();
    assert_eq!("id-1", signed.message_id);
    assert!(signed.timestamp.ends_with('Z'));
    assert_eq!(20, signed.timestamp.len());
    assert!(signed.signature.starts_with("sha384="));
    assert_eq!(
        signed.signature,
        sign_at(Algorithm::Sha384, b"secret", "id-1", &signed.timestamp, b"{}")
    );
}
