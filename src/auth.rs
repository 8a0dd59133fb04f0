//! Adapter from an identity provider to a [`TokenAccessor`].

use crate::client::TokenAccessor;
use crate::error::AuthError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// A signed-in user as seen by the identity provider.
#[async_trait]
pub trait Session: Send + Sync {
    fn user_id(&self) -> &str;

    /// Mint a bearer token. Refresh and expiry are the provider's business.
    async fn id_token(&self) -> Result<String, AuthError>;
}

/// Callback invoked with the new session (or `None` on sign-out).
pub type SessionListener = Box<dyn Fn(Option<Arc<dyn Session>>) + Send + Sync>;

/// Releases a listener registration when called.
pub type Unsubscribe = Box<dyn FnOnce() + Send + Sync>;

/// Source of session-change notifications.
pub trait IdentityProvider: Send + Sync {
    fn on_session_changed(&self, listener: SessionListener) -> Unsubscribe;
}

#[derive(Default)]
struct AuthState {
    session: Option<Arc<dyn Session>>,
    resolved: bool,
}

/// Tracks the current session and exposes a token accessor for API clients.
///
/// The provider listener is released when the adapter is dropped.
pub struct AuthAdapter {
    state: Arc<RwLock<AuthState>>,
    token: TokenAccessor,
    unsubscribe: Option<Unsubscribe>,
}

impl AuthAdapter {
    pub fn new(provider: &dyn IdentityProvider) -> Self {
        let state = Arc::new(RwLock::new(AuthState::default()));

        let listener_state = Arc::clone(&state);
        let unsubscribe = provider.on_session_changed(Box::new(move |session| {
            debug!(
                user = session.as_ref().map(|s| s.user_id()),
                "session changed"
            );
            let mut state = listener_state.write();
            state.session = session;
            state.resolved = true;
        }));

        let token_state = Arc::clone(&state);
        let token = TokenAccessor::new(move || {
            let session = token_state.read().session.clone();
            async move {
                let session = session?;
                match session.id_token().await {
                    Ok(token) => Some(token),
                    Err(e) => {
                        warn!(user = session.user_id(), error = %e, "failed to mint id token");
                        None
                    }
                }
            }
        });

        Self {
            state,
            token,
            unsubscribe: Some(unsubscribe),
        }
    }

    /// The current session, if signed in.
    pub fn session(&self) -> Option<Arc<dyn Session>> {
        self.state.read().session.clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.state.read().session.as_ref().map(|s| s.user_id().to_string())
    }

    /// True until the provider has reported the initial session state.
    pub fn is_loading(&self) -> bool {
        !self.state.read().resolved
    }

    /// Token accessor bound to this adapter. Stable across calls.
    pub fn token_accessor(&self) -> TokenAccessor {
        self.token.clone()
    }

    pub async fn id_token(&self) -> Option<String> {
        self.token.token().await
    }
}

impl Drop for AuthAdapter {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for AuthAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthAdapter")
            .field("user_id", &self.user_id())
            .field("is_loading", &self.is_loading())
            .finish()
    }
}
