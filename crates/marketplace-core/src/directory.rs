//! Role directory: the list of user IDs registered under each role.

use std::collections::HashSet;

use tracing::warn;

use crate::error::Result;
use crate::keys;
use crate::models::Role;
use crate::store::Records;

/// Per-role user ID lists, used to fan out notifications and listings.
#[derive(Clone)]
pub struct RoleDirectory {
    records: Records,
}

impl RoleDirectory {
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    /// Register a user under a role. Registering twice is a no-op.
    pub async fn add(&self, role: Role, user_id: &str) -> Result<()> {
        self.records
            .update_list::<String, _, _>(&keys::role_directory(role), |ids| {
                if ids.iter().any(|id| id == user_id) {
                    (false, ())
                } else {
                    ids.push(user_id.to_string());
                    (true, ())
                }
            })
            .await
    }

    /// User IDs registered under a role.
    ///
    /// A failed lookup is logged and treated as an empty role.
    pub async fn members(&self, role: Role) -> Vec<String> {
        match self.records.get_list::<String>(&keys::role_directory(role)).await {
            Ok(ids) => ids,
            Err(err) => {
                warn!(role = %role, error = %err, "Role directory lookup failed");
                Vec::new()
            }
        }
    }

    /// Distinct members of several roles, in role order.
    pub async fn members_of(&self, roles: &[Role]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for role in roles {
            for id in self.members(*role).await {
                if seen.insert(id.clone()) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// Distinct members across every role.
    pub async fn everyone(&self) -> Vec<String> {
        self.members_of(&Role::ALL).await
    }
}
