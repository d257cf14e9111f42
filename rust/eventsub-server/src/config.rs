//! Startup configuration: listen address and signing keys.
//!
//! Each scope's secret comes from its own environment variable. Scopes are
//! tried in table order when verifying.

use clap::Parser;
use eventsub_verify::{ActionKind, Permissions, SigningKey};
use std::net::SocketAddr;

/// Command line options. Every flag can also be set from the environment.
#[derive(Debug, Parser)]
#[command(name = "eventsub-server", about = "Receive and authorize EventSub webhooks")]
pub struct Config {
    /// Address to accept webhook deliveries on.
    #[arg(long, env = "EVENTSUB_LISTEN", default_value = "0.0.0.0:6969")]
    pub listen: SocketAddr,
}

/// A named signing scope.
#[derive(Debug, Clone, Copy)]
pub struct Scope {
    pub name: &'static str,
    /// Environment variable holding the secret.
    pub env: &'static str,
    pub permissions: Permissions,
}

/// The configured scopes, in verification order.
pub fn scopes() -> [Scope; 2] {
    [
        Scope {
            name: "dom",
            env: "DOM_SECRET",
            permissions: Permissions::all().with(ActionKind::Unknown),
        },
        Scope {
            name: "sub",
            env: "SUB_SECRET",
            permissions: [
                ActionKind::Lights,
                ActionKind::SilenceMe,
                ActionKind::Premium,
                ActionKind::Scrollo,
            ]
            .into_iter()
            .collect(),
        },
    ]
}

/// Build the key table, reading each scope's secret through `lookup`.
///
/// Scopes without a secret are skipped; an empty secret counts as missing.
pub fn load_keys<F>(scopes: &[Scope], lookup: F) -> Vec<SigningKey>
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    let mut keys = Vec::with_capacity(scopes.len());
    for scope in scopes {
        match lookup(scope.env).filter(|secret| !secret.is_empty()) {
            Some(secret) => {
                tracing::info!(
                    scope = scope.name,
                    permissions = ?scope.permissions,
                    "loaded signing key"
                );
                keys.push(SigningKey::new(secret, scope.permissions));
            }
            None => {
                tracing::warn!(
                    scope = scope.name,
                    "{} is not set, skipping scope",
                    scope.env
                );
            }
        }
    }
    if keys.is_empty() {
        tracing::warn!("no signing keys configured, every webhook will be rejected");
    }
    keys
}

/// [load_keys] over the process environment, taking secrets as raw bytes.
pub fn keys_from_env() -> Vec<SigningKey> {
    load_keys(&scopes(), |name| {
        std::env::var_os(name).map(|v| v.into_encoded_bytes())
    })
}
