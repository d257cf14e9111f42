//! Configuration tests.

use clap::Parser;
use eventsub_server::config::{load_keys, scopes, Config};
use eventsub_verify::{ActionKind, Permissions};

fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<Vec<u8>> + 'a {
    move |name: &str| {
        vars.iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_bytes().to_vec())
    }
}

#[test]
fn both_scopes_load_in_order() {
    let vars = [("SUB_SECRET", "s"), ("DOM_SECRET", "d")];
    let keys = load_keys(&scopes(), lookup(&vars));
    assert_eq!(2, keys.len());
    assert_eq!(b"d", keys[0].secret());
    assert_eq!(b"s", keys[1].secret());
}

#[test]
fn dom_scope_grants_everything() {
    let keys = load_keys(&scopes(), lookup(&[("DOM_SECRET", "d")]));
    assert_eq!(1, keys.len());
    for kind in ActionKind::ALL {
        assert!(keys[0].permissions.contains(kind), "{kind}");
    }
}

#[test]
fn sub_scope_is_limited() {
    let keys = load_keys(&scopes(), lookup(&[("SUB_SECRET", "s")]));
    assert_eq!(1, keys.len());
    let permissions = keys[0].permissions;
    assert!(permissions.contains(ActionKind::Scrollo));
    assert!(permissions.contains(ActionKind::Lights));
    assert!(!permissions.contains(ActionKind::EndStream));
    assert!(!permissions.contains(ActionKind::Comrade));
    assert!(!permissions.contains(ActionKind::Unknown));
}

#[test]
fn missing_and_empty_secrets_are_skipped() {
    assert!(load_keys(&scopes(), lookup(&[])).is_empty());
    let empty = [("DOM_SECRET", ""), ("SUB_SECRET", "")];
    assert!(load_keys(&scopes(), lookup(&empty)).is_empty());
    assert!(load_keys(&[], lookup(&[("DOM_SECRET", "d")])).is_empty());
}

#[test]
fn permissions_follow_the_scope_table() {
    let scope = eventsub_server::config::Scope {
        name: "test",
        env: "TEST_SECRET",
        permissions: Permissions::none(),
    };
    let keys = load_keys(&[scope], lookup(&[("TEST_SECRET", "t")]));
    assert_eq!(Permissions::none(), keys[0].permissions);
}

#[test]
fn listen_address() {
    let config = Config::try_parse_from(["eventsub-server"]).unwrap();
    assert_eq!("0.0.0.0:6969", config.listen.to_string());

    let config =
        Config::try_parse_from(["eventsub-server", "--listen", "127.0.0.1:8080"]).unwrap();
    assert_eq!("127.0.0.1:8080", config.listen.to_string());

    assert!(Config::try_parse_from(["eventsub-server", "--listen", "nope"]).is_err());
}
