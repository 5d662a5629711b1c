mod operator;

pub use operator::{ConsoleOperator, Operator};

use crate::config::DEFAULT_UPLOAD_PRESET;
use crate::error::AdminError;
use crate::models::{Property, PropertyDraft, Session};
use crate::services::{AuthService, MediaHost, RowStore, UploadFile};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const EMPTY_STATE_MESSAGE: &str = "No properties found. Add one to get started.";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this property?";

/// Which screen the admin is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Unauthenticated,
    List,
    Create,
    Edit,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Unauthenticated => "sign-in",
            View::List => "list",
            View::Create => "create",
            View::Edit => "edit",
        };
        f.write_str(name)
    }
}

/// State for one interactive admin session: who is signed in, which view is
/// active, the listings last fetched and the form being edited.
pub struct AdminDashboard {
    auth: Arc<dyn AuthService>,
    store: Arc<dyn RowStore>,
    media: Arc<dyn MediaHost>,
    operator: Arc<dyn Operator>,
    view: View,
    session: Option<Session>,
    properties: Vec<Property>,
    draft: PropertyDraft,
    error: Option<String>,
    upload_target: String,
}

impl AdminDashboard {
    pub fn new(
        auth: Arc<dyn AuthService>,
        store: Arc<dyn RowStore>,
        media: Arc<dyn MediaHost>,
        operator: Arc<dyn Operator>,
    ) -> Self {
        Self {
            auth,
            store,
            media,
            operator,
            view: View::Unauthenticated,
            session: None,
            properties: Vec::new(),
            draft: PropertyDraft::default(),
            error: None,
            upload_target: String::new(),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Listings as of the most recent successful fetch, newest first
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn draft(&self) -> &PropertyDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut PropertyDraft {
        &mut self.draft
    }

    /// Last failure message shown next to the active form
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Preset sent with every upload in a batch
    pub fn upload_target(&self) -> &str {
        let target = self.upload_target.trim();
        if target.is_empty() {
            DEFAULT_UPLOAD_PRESET
        } else {
            target
        }
    }

    pub fn set_upload_target(&mut self, name: impl Into<String>) {
        self.upload_target = name.into();
    }

    pub fn empty_state_message(&self) -> Option<&'static str> {
        (self.view == View::List && self.properties.is_empty()).then_some(EMPTY_STATE_MESSAGE)
    }

    /// Exchange credentials for a session and load the listings. Only valid
    /// from the sign-in view; log out first to switch operators.
    pub async fn authenticate(&mut self, email: &str, password: &str) -> Result<(), AdminError> {
        if self.view != View::Unauthenticated || self.session.is_some() {
            return Err(AdminError::InvalidTransition {
                from: self.view,
                action: "sign in",
            });
        }
        match self.auth.sign_in(email, password).await {
            Ok(session) => {
                self.start_session(session).await;
                Ok(())
            }
            Err(e) => {
                warn!("Sign-in failed for {}: {}", email, e);
                self.error = Some(e.to_string());
                Err(AdminError::Authentication(e))
            }
        }
    }

    /// Adopt a session obtained earlier, e.g. one persisted by the auth client
    pub async fn resume(&mut self, session: Session) -> Result<(), AdminError> {
        if session.is_expired(Utc::now()) {
            return Err(AdminError::SessionExpired);
        }
        self.start_session(session).await;
        Ok(())
    }

    async fn start_session(&mut self, session: Session) {
        info!("Operator {} signed in", session.operator());
        self.session = Some(session);
        self.error = None;
        self.view = View::List;
        // A failed fetch leaves the empty list in place
        let _ = self.list_properties().await;
    }

    pub async fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = self.auth.sign_out(&session).await {
                warn!("Sign-out call failed, dropping session locally: {}", e);
            }
            info!("Operator {} signed out", session.operator());
        }
        self.reset();
    }

    /// The auth service reported that the session is no longer valid
    pub fn expire_session(&mut self) {
        if self.session.is_some() {
            info!("Session expired");
        }
        self.session = None;
        self.reset();
    }

    fn reset(&mut self) {
        self.view = View::Unauthenticated;
        self.properties.clear();
        self.draft = PropertyDraft::default();
        self.error = None;
    }

    fn require_session(&mut self) -> Result<Session, AdminError> {
        let session = self.session.clone().ok_or(AdminError::NotAuthenticated)?;
        if session.is_expired(Utc::now()) {
            self.expire_session();
            return Err(AdminError::SessionExpired);
        }
        Ok(session)
    }

    fn require_view(&self, allowed: &[View], action: &'static str) -> Result<(), AdminError> {
        if self.view == View::Unauthenticated {
            return Err(AdminError::NotAuthenticated);
        }
        if allowed.contains(&self.view) {
            Ok(())
        } else {
            Err(AdminError::InvalidTransition {
                from: self.view,
                action,
            })
        }
    }

    /// Refresh the collection, newest first. On failure the previous
    /// collection stays in place.
    pub async fn list_properties(&mut self) -> Result<usize, AdminError> {
        let session = self.require_session()?;
        let result = self.store.list(Some(&session)).await;

        match result {
            Ok(mut rows) => {
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                debug!("Loaded {} properties", rows.len());
                self.properties = rows;
                Ok(self.properties.len())
            }
            Err(e) => {
                error!("Error fetching properties: {}", e);
                Err(AdminError::Fetch(e))
            }
        }
    }

    /// Open an empty create form
    pub fn new_entry(&mut self) -> Result<(), AdminError> {
        self.require_view(&[View::List], "create a property")?;
        self.draft = PropertyDraft::default();
        self.error = None;
        self.view = View::Create;
        Ok(())
    }

    /// Open the edit form for a listed property
    pub fn edit_entry(&mut self, id: &str) -> Result<(), AdminError> {
        self.require_view(&[View::List], "edit a property")?;
        let property = self
            .properties
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AdminError::UnknownProperty(id.to_string()))?;

        self.draft = PropertyDraft::from_property(property);
        self.error = None;
        self.view = View::Edit;
        Ok(())
    }

    /// Leave the form without saving
    pub fn cancel(&mut self) -> Result<(), AdminError> {
        self.require_view(&[View::Create, View::Edit], "cancel")?;
        self.draft = PropertyDraft::default();
        self.error = None;
        self.view = View::List;
        Ok(())
    }

    /// Submit the draft: insert in create mode, whole-row replace in edit mode.
    /// On failure the form stays open with the draft intact.
    pub async fn save_draft(&mut self) -> Result<Property, AdminError> {
        self.require_view(&[View::Create, View::Edit], "save")?;
        let session = self.require_session()?;

        let result = self.submit(&session).await;

        match result {
            Ok(row) => {
                self.view = View::List;
                self.draft = PropertyDraft::default();
                self.error = None;
                let _ = self.list_properties().await;
                Ok(row)
            }
            Err(e) => {
                warn!("Save failed: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn submit(&self, session: &Session) -> Result<Property, AdminError> {
        let payload = self.draft.to_payload();
        payload.check().map_err(AdminError::Validation)?;

        if self.view == View::Edit {
            let id = self
                .draft
                .id
                .as_deref()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| AdminError::Validation("Missing property id".to_string()))?;
            self.store
                .update(Some(session), id, &payload)
                .await
                .map_err(AdminError::Mutation)
        } else {
            // The payload never carries an id; the store assigns one
            self.store
                .insert(Some(session), &payload)
                .await
                .map_err(AdminError::Mutation)
        }
    }

    /// Delete after the operator confirms. Returns `false` if they declined.
    pub async fn delete_property(&mut self, id: &str) -> Result<bool, AdminError> {
        self.require_view(&[View::List], "delete a property")?;
        let session = self.require_session()?;

        if !self.operator.confirm(DELETE_PROMPT) {
            debug!("Delete of {} cancelled", id);
            return Ok(false);
        }

        if let Err(e) = self.store.delete(Some(&session), id).await {
            error!("Error deleting property {}: {}", id, e);
            self.operator.alert("Error deleting property");
            return Err(AdminError::Mutation(e));
        }

        let _ = self.list_properties().await;
        Ok(true)
    }

    /// Upload files one at a time, appending each hosted URL to the draft.
    /// Stops at the first failure; files already uploaded stay in the draft
    /// and on the host.
    pub async fn upload_images(&mut self, files: &[UploadFile]) -> Result<usize, AdminError> {
        self.require_view(&[View::Create, View::Edit], "upload images")?;
        self.require_session()?;
        if files.is_empty() {
            return Ok(0);
        }

        let target = self.upload_target().to_string();
        let mut uploaded = 0;

        for file in files {
            match self.media.upload(file, &target).await {
                Ok(url) => {
                    self.draft.images.push(url);
                    uploaded += 1;
                }
                Err(e) => {
                    error!(
                        "Upload of {} to {} failed after {} of {} files: {}",
                        file.name,
                        self.media.host_name(),
                        uploaded,
                        files.len(),
                        e
                    );
                    self.operator.alert(&format!(
                        "Upload Failed: {}.\n\nPlease check your Upload Preset.",
                        e
                    ));
                    return Err(AdminError::Upload(e));
                }
            }
        }

        info!("Uploaded {} images to {}", uploaded, self.media.host_name());
        Ok(uploaded)
    }

    /// Append a pasted image URL; blank input is ignored
    pub fn add_image_url(&mut self, url: &str) -> Result<bool, AdminError> {
        self.require_view(&[View::Create, View::Edit], "add an image")?;
        Ok(self.draft.images.push(url))
    }

    /// Drop the image at `index` from the draft
    pub fn remove_image(&mut self, index: usize) -> Result<Option<String>, AdminError> {
        self.require_view(&[View::Create, View::Edit], "remove an image")?;
        Ok(self.draft.images.remove(index))
    }
}
