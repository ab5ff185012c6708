use crate::domain::identity::SessionIdentity;

// Verdict held by a route guard for the lifetime of one mount.
// `Unknown` is neither a grant nor a denial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    Unknown,
    Authenticated(SessionIdentity),
    Unauthenticated,
}

impl AuthStatus {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, AuthStatus::Unknown)
    }

    pub fn identity(&self) -> Option<&SessionIdentity> {
        match self {
            AuthStatus::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}
