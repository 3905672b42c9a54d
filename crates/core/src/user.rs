use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Account role. Admins manage the catalog and request lifecycles;
/// ordinary users browse, request, and pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Authenticated account as returned by the auth endpoints and persisted
/// alongside the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
