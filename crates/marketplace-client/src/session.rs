//! Client-side session state.
//!
//! Holds everything a signed-in (or signing-up) user carries between
//! screens. It is owned by the [`crate::App`] controller and passed
//! explicitly; nothing here is global.

use marketplace_core::{Role, UserRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};
use crate::navigation::Screen;

/// Interface language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "hi")]
    Hindi,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Hindi => "hi",
        }
    }
}

/// Sign-up details collected across the onboarding screens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupDraft {
    pub email: Option<String>,
    pub role: Option<Role>,
    /// Profile fields (`name`, `location`, `phoneNumber`, ...).
    pub profile: Map<String, Value>,
}

impl SignupDraft {
    /// The `userData` payload for sign-up.
    pub fn user_data(&self) -> Result<Value> {
        let role = self.role.ok_or(ClientError::IncompleteDraft("role"))?;
        let mut data = self.profile.clone();
        data.insert("role".to_string(), Value::String(role.as_str().to_string()));
        Ok(Value::Object(data))
    }

    pub fn email(&self) -> Result<&str> {
        self.email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(ClientError::IncompleteDraft("email"))
    }
}

/// One user's client state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserRecord>,
    pub language: Language,
    pub draft: SignupDraft,
    pub screen: Screen,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The signed-in user's role, falling back to the draft during sign-up.
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role).or(self.draft.role)
    }

    /// Bearer token for authenticated calls.
    pub fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(ClientError::NotSignedIn)
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Move to another screen if the state machine allows it.
    pub fn navigate(&mut self, to: Screen) -> Result<()> {
        self.screen = self.screen.transition(to, self.role())?;
        Ok(())
    }

    /// Drop credentials and sign-up state, keeping the language choice.
    pub fn sign_out(&mut self) {
        let language = self.language;
        *self = Session {
            language,
            ..Session::default()
        };
    }
}
