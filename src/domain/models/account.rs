use serde::{Deserialize, Serialize};

/// Account as reported by the managed identity provider. Never persisted
/// locally; membership rows only keep the id and an email snapshot.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VerifiedAccount {
    pub id: String,
    pub email: String,
    pub role: String, // USER, SUPERADMIN
}

impl VerifiedAccount {
    pub fn is_superadmin(&self) -> bool {
        self.role == "SUPERADMIN"
    }
}
