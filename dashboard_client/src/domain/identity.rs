use serde::{Deserialize, Serialize};

// The serialization within this layer is a dependency leak, but its a pragmatic approach.
// Identity returned by the session exchange and by the current-identity check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    #[serde(default)]
    pub user_id: Option<String>,
    // Display name shown in the sidebar profile block.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    // Profile image reference from the identity provider.
    #[serde(default)]
    pub picture: Option<String>,
}

impl SessionIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: None,
            name: name.into(),
            email: email.into(),
            picture: None,
        }
    }

    // Avatar fallback letter; `U` when the provider sent no name.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U')
    }
}
