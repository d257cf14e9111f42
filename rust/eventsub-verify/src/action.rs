//! Requested actions and the permission sets that scope them.

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// A recognized action, or `Unknown` for any reward title we do not know.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Lights,
    EndStream,
    SilenceMe,
    Premium,
    Scrollo,
    Comrade,
    Unknown,
}

impl ActionKind {
    /// Every kind, including `Unknown`.
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Lights,
        ActionKind::EndStream,
        ActionKind::SilenceMe,
        ActionKind::Premium,
        ActionKind::Scrollo,
        ActionKind::Comrade,
        ActionKind::Unknown,
    ];

    /// Map a free-text reward title to its kind.
    ///
    /// Matching is exact; anything unrecognized is `Unknown`.
    pub fn from_title(title: &str) -> Self {
        match title {
            "lights" => Self::Lights,
            "end the stream" => Self::EndStream,
            "silence me" => Self::SilenceMe,
            "SimpBucks Premium" => Self::Premium,
            "scrollo" => Self::Scrollo,
            "comrade" => Self::Comrade,
            _ => Self::Unknown,
        }
    }

    /// The stable identifier used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lights => "lights",
            Self::EndStream => "endStream",
            Self::SilenceMe => "silenceMe",
            Self::Premium => "premium",
            Self::Scrollo => "scrollo",
            Self::Comrade => "comrade",
            Self::Unknown => "unknown",
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the identifier produced by [ActionKind::as_str], not a reward title.
impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}

/// The set of actions a signing key may authorize.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Permissions(u8);

impl Permissions {
    /// Grants nothing, not even `Unknown`.
    pub const fn none() -> Self {
        Self(0)
    }

    /// Every recognized action. `Unknown` has to be granted explicitly.
    pub fn all() -> Self {
        ActionKind::ALL
            .into_iter()
            .filter(|&kind| kind != ActionKind::Unknown)
            .collect()
    }

    #[must_use]
    pub fn with(self, kind: ActionKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub fn contains(self, kind: ActionKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = ActionKind> {
        ActionKind::ALL
            .into_iter()
            .filter(move |&kind| self.contains(kind))
    }
}

impl FromIterator<ActionKind> for Permissions {
    fn from_iter<T: IntoIterator<Item = ActionKind>>(iter: T) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

impl fmt::Debug for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Resolve the requested reward title against the permissions of the key
/// that signed the message.
///
/// Returns the kind on success. An authentic message asking for something
/// outside its key's scope yields [Error::ActionDenied].
pub fn resolve(title: &str, permissions: Permissions) -> Result<ActionKind, Error> {
    let kind = ActionKind::from_title(title);
    if permissions.contains(kind) {
        Ok(kind)
    } else {
        Err(Error::ActionDenied(kind))
    }
}

#[test]
fn test_from_title() {
    assert_eq!(ActionKind::Lights, ActionKind::from_title("lights"));
    assert_eq!(ActionKind::EndStream, ActionKind::from_title("end the stream"));
    assert_eq!(ActionKind::Premium, ActionKind::from_title("SimpBucks Premium"));
    assert_eq!(ActionKind::Scrollo, ActionKind::from_title("scrollo"));
    assert_eq!(ActionKind::Unknown, ActionKind::from_title("nonexistant reward"));
    assert_eq!(ActionKind::Unknown, ActionKind::from_title("Lights"));
    assert_eq!(ActionKind::Unknown, ActionKind::from_title(" scrollo"));
    assert_eq!(ActionKind::Unknown, ActionKind::from_title(""));
}

#[test]
fn test_identifier() {
    for kind in ActionKind::ALL {
        assert_eq!(Ok(kind), kind.as_str().parse());
        assert_eq!(kind.as_str(), kind.to_string());
    }
    assert_eq!(
        Err(Error::UnknownAction("end the stream".into())),
        "end the stream".parse::<ActionKind>()
    );
}

#[test]
fn test_permissions() {
    let none = Permissions::none();
    assert!(none.is_empty());
    assert!(ActionKind::ALL.into_iter().all(|kind| !none.contains(kind)));

    let all = Permissions::all();
    assert!(!all.contains(ActionKind::Unknown));
    assert!(all.contains(ActionKind::Comrade));
    assert_eq!(6, all.iter().count());
    assert!(all.with(ActionKind::Unknown).contains(ActionKind::Unknown));

    let some: Permissions = [ActionKind::Scrollo, ActionKind::Lights].into_iter().collect();
    assert_eq!(
        vec![ActionKind::Lights, ActionKind::Scrollo],
        some.iter().collect::<Vec<_>>()
    );
    assert_eq!("{Lights, Scrollo}", format!("{some:?}"));
}

#[test]
fn test_resolve() {
    let scrollo = Permissions::none().with(ActionKind::Scrollo);
    assert_eq!(Ok(ActionKind::Scrollo), resolve("scrollo", scrollo));
    assert_eq!(
        Err(Error::ActionDenied(ActionKind::Lights)),
        resolve("lights", scrollo)
    );
    assert_eq!(
        Err(Error::ActionDenied(ActionKind::Unknown)),
        resolve("something else", scrollo)
    );
}

#[test]
fn test_resolve_empty_denies_everything() {
    for title in ["lights", "end the stream", "scrollo", "comrade", "whatever"] {
        assert!(matches!(
            resolve(title, Permissions::none()),
            Err(Error::ActionDenied(_))
        ));
    }
}

#[test]
fn test_resolve_unknown() {
    let diagnostic = Permissions::none().with(ActionKind::Unknown);
    assert_eq!(Ok(ActionKind::Unknown), resolve("hydrate", diagnostic));
    assert_eq!(
        Err(Error::ActionDenied(ActionKind::Lights)),
        resolve("lights", diagnostic)
    );
    assert_eq!(
        Err(Error::ActionDenied(ActionKind::Unknown)),
        resolve("hydrate", Permissions::all())
    );
}
