//! Session controller tying navigation to API calls.

use marketplace_core::{ListingKind, ListingRecord, NotificationRecord, Role, UserRecord};
use serde_json::{Map, Value};
use tracing::info;

use crate::client::MarketplaceClient;
use crate::error::{ClientError, Result};
use crate::navigation::Screen;
use crate::session::{Language, Session};

/// Drives one user's journey through the app.
pub struct App {
    client: MarketplaceClient,
    session: Session,
}

impl App {
    pub fn new(client: MarketplaceClient) -> Self {
        Self::with_session(client, Session::new())
    }

    pub fn with_session(client: MarketplaceClient, session: Session) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn screen(&self) -> Screen {
        self.session.screen
    }

    /// Begin onboarding for a new account.
    pub fn start_signup(&mut self, email: &str) -> Result<()> {
        self.session.navigate(Screen::Language)?;
        self.session.draft.email = Some(email.trim().to_string());
        Ok(())
    }

    pub fn choose_language(&mut self, language: Language) -> Result<()> {
        self.session.navigate(Screen::Role)?;
        self.session.language = language;
        Ok(())
    }

    pub fn choose_role(&mut self, role: Role) -> Result<()> {
        self.session.draft.role = Some(role);
        if let Err(err) = self.session.navigate(Screen::Profile) {
            self.session.draft.role = None;
            return Err(err);
        }
        Ok(())
    }

    /// Create the account from the draft and land on the role's home.
    pub async fn complete_profile(&mut self, profile: Map<String, Value>, password: &str) -> Result<&UserRecord> {
        self.session.draft.profile = profile;
        let email = self.session.draft.email()?.to_string();
        let user_data = self.session.draft.user_data()?;

        let outcome = self.client.signup(&email, password, user_data).await?;
        let role = outcome.profile.role;

        self.session.token = Some(outcome.session.access_token);
        self.session.navigate(Screen::Home(role))?;
        self.session.draft = Default::default();
        info!(user_id = %outcome.profile.id, role = %role, "Signed up");

        Ok(self.session.user.insert(outcome.profile))
    }

    /// Resume with an existing token, landing on the role's home.
    pub async fn resume(&mut self, token: String) -> Result<&UserRecord> {
        let user = self.client.profile(&token).await?;
        self.session.token = Some(token);
        self.session.screen = Screen::Home(user.role);
        Ok(self.session.user.insert(user))
    }

    /// Open a screen reachable from the current one.
    pub fn open(&mut self, screen: Screen) -> Result<()> {
        self.session.navigate(screen)
    }

    /// Return from a feature screen to the role's home.
    pub fn back_home(&mut self) -> Result<()> {
        let role = self
            .session
            .user
            .as_ref()
            .map(|user| user.role)
            .ok_or(ClientError::NotSignedIn)?;
        self.session.navigate(Screen::Home(role))
    }

    pub async fn refresh_profile(&mut self) -> Result<&UserRecord> {
        let user = self.client.profile(self.session.token()?).await?;
        Ok(self.session.user.insert(user))
    }

    pub async fn listings(&self, kind: ListingKind) -> Result<Vec<ListingRecord>> {
        self.client.listings(self.session.token()?, kind).await
    }

    pub async fn create_listing(&self, kind: ListingKind, data: &Value) -> Result<ListingRecord> {
        self.client.create_listing(self.session.token()?, kind, data).await
    }

    pub async fn notifications(&self) -> Result<Vec<NotificationRecord>> {
        self.client.notifications(self.session.token()?).await
    }

    pub async fn mark_read(&self, notification_id: &str) -> Result<()> {
        self.client.mark_read(self.session.token()?, notification_id).await
    }

    /// Clear the unread badge with a single batched request.
    pub async fn mark_all_read(&self) -> Result<usize> {
        self.client.mark_all_read(self.session.token()?).await
    }

    pub fn sign_out(&mut self) {
        self.session.sign_out();
    }
}
