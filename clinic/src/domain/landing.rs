//! Which screen set a session state lands on.

use crate::domain::{Role, SessionState};

/// Role-specific home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dashboard {
    Admin,
    Doctor,
    Patient,
}

impl From<Role> for Dashboard {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Doctor => Self::Doctor,
            Role::Patient => Self::Patient,
        }
    }
}

/// Top-level navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landing {
    /// Sign-in and registration screens.
    SignIn,
    /// Home screen for the signed-in role.
    Dashboard(Dashboard),
}

impl SessionState {
    /// Navigation target for this state; `None` while loading, when
    /// nothing should be rendered.
    pub fn landing(&self) -> Option<Landing> {
        match self {
            Self::Loading => None,
            Self::Unauthenticated => Some(Landing::SignIn),
            Self::Authenticated(session) => {
                Some(Landing::Dashboard(session.identity().role().into()))
            }
        }
    }
}
