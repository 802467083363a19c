//! Key layout of the key-value store.

use crate::models::{ListingKind, Role};

/// `user:<id>`: the user record.
pub fn user(user_id: &str) -> String {
    format!("user:{}", user_id)
}

/// `users:<role>`: role directory.
pub fn role_directory(role: Role) -> String {
    format!("users:{}", role.as_str())
}

/// `posts:<id>`, `tools:<id>`, `seeds:<id>`: an owner's listings.
pub fn listings(kind: ListingKind, owner_id: &str) -> String {
    format!("{}:{}", kind.namespace(), owner_id)
}

/// `notifications:<id>`: a user's bounded notification sequence.
pub fn notifications(user_id: &str) -> String {
    format!("notifications:{}", user_id)
}

/// `notification:<id>`: a user's push subscription.
pub fn subscription(user_id: &str) -> String {
    format!("notification:{}", user_id)
}

/// `auth:email:<email>`: local credential record.
pub fn credential(email: &str) -> String {
    format!("auth:email:{}", email.trim().to_lowercase())
}

/// `auth:token:<token>`: bearer token to identity.
pub fn token(token: &str) -> String {
    format!("auth:token:{}", token)
}
