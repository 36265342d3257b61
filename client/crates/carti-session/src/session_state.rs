use carti_core::{Identity, Profile};

/// Lifecycle of the signed-in session as seen by the application.
///
/// A profile only ever appears next to the identity it belongs to, so a
/// profile without an identity cannot be expressed.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Waiting for the identity provider's first notification.
    Initializing,
    Unauthenticated,
    /// Identity known, authoritative profile read in flight. `cached` is
    /// the on-device snapshot for this identity, shown optimistically.
    Authenticating {
        identity: Identity,
        cached: Option<Profile>,
    },
    /// `profile` is `None` when the identity has no profile document yet.
    /// `stale` marks a cached snapshot kept because the remote read failed.
    Authenticated {
        identity: Identity,
        profile: Option<Profile>,
        stale: bool,
    },
    /// Remote read failed and nothing was cached. Left by a successful
    /// refresh or the next session change.
    Error { identity: Identity, message: String },
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Initializing | Self::Unauthenticated => None,
            Self::Authenticating { identity, .. }
            | Self::Authenticated { identity, .. }
            | Self::Error { identity, .. } => Some(identity),
        }
    }

    /// The profile currently presented to the application.
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Authenticating { cached, .. } => cached.as_ref(),
            Self::Authenticated { profile, .. } => profile.as_ref(),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Initializing | Self::Authenticating { .. })
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    /// Whether the presented profile is a cached copy the last remote read
    /// could not confirm.
    pub fn is_stale(&self) -> bool {
        match self {
            Self::Authenticating { cached, .. } => cached.is_some(),
            Self::Authenticated { stale, .. } => *stale,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticating { .. } => "authenticating",
            Self::Authenticated { .. } => "authenticated",
            Self::Error { .. } => "error",
        }
    }

    /// Replace the presented profile, keeping the phase. Returns false when
    /// the state has no profile slot or the profile is for someone else.
    pub(crate) fn replace_profile(&mut self, new_profile: Profile) -> bool {
        match self {
            Self::Authenticating { identity, cached } if new_profile.belongs_to(&identity.uid) => {
                *cached = Some(new_profile);
                true
            }
            Self::Authenticated {
                identity, profile, ..
            } if new_profile.belongs_to(&identity.uid) => {
                *profile = Some(new_profile);
                true
            }
            _ => false,
        }
    }
}
