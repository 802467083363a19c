//! Screen state machine.
//!
//! ```text
//! Entrance → Language → Role → Profile → Home(role)
//!                                           │
//!        ┌──────────┬───────┬───────────────┼─────────┬─────────┐
//!        ▼          ▼       ▼               ▼         ▼         ▼
//!  ToolsAndSeeds   Post  Notifications   Weather   Disease    Price
//! ```
//!
//! Feature screens return to the home screen of the signed-in role. Which
//! feature screens a home offers depends on the role.

use marketplace_core::Role;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    #[default]
    Entrance,
    Language,
    Role,
    Profile,
    Home(Role),
    ToolsAndSeeds,
    Post,
    Notifications,
    Weather,
    Disease,
    Price,
}

impl Screen {
    /// Feature screens reachable from a role's home.
    pub fn features(role: Role) -> &'static [Screen] {
        match role {
            Role::Farmer => &[
                Screen::ToolsAndSeeds,
                Screen::Post,
                Screen::Notifications,
                Screen::Weather,
                Screen::Disease,
                Screen::Price,
            ],
            Role::Buyer => &[Screen::Post, Screen::Notifications, Screen::Price],
            Role::Renter => &[Screen::ToolsAndSeeds, Screen::Notifications],
        }
    }

    pub fn is_feature(&self) -> bool {
        !matches!(
            self,
            Screen::Entrance | Screen::Language | Screen::Role | Screen::Profile | Screen::Home(_)
        )
    }

    /// Whether `to` can follow `self` for a session signed in as `role`.
    pub fn can_reach(&self, to: Screen, role: Option<Role>) -> bool {
        match (*self, to) {
            // Onboarding, forwards and back.
            (Screen::Entrance, Screen::Language)
            | (Screen::Language, Screen::Role)
            | (Screen::Role, Screen::Profile)
            | (Screen::Language, Screen::Entrance)
            | (Screen::Role, Screen::Language)
            | (Screen::Profile, Screen::Role) => true,

            // Sign-up completes into the chosen role's home.
            (Screen::Profile, Screen::Home(r)) => role == Some(r),

            // Sign-out.
            (Screen::Home(_), Screen::Entrance) => true,

            (Screen::Home(r), feature) if feature.is_feature() => {
                role == Some(r) && Screen::features(r).contains(&feature)
            }
            (from, Screen::Home(r)) if from.is_feature() => role == Some(r),

            _ => false,
        }
    }

    /// Move to `to`, rejecting transitions the state machine does not allow.
    pub fn transition(self, to: Screen, role: Option<Role>) -> Result<Screen> {
        if self.can_reach(to, role) {
            Ok(to)
        } else {
            Err(ClientError::Navigation { from: self, to })
        }
    }
}
