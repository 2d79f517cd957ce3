use std::sync::Arc;

use crate::{
    config::Config,
    repositories::{ProfileAuthStore, WorldStore},
    services::{
        auth::{AuthService, TokenSettings},
        AuthorizationGate, IdentityProvider,
    },
    utils::time::Clock,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth: Arc<AuthService>,
    pub gate: Arc<AuthorizationGate>,
    pub worlds: Arc<dyn WorldStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wires the auth core together from its collaborators.
    pub fn new(
        config: Config,
        profile_auth: Arc<dyn ProfileAuthStore>,
        worlds: Arc<dyn WorldStore>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let auth = Arc::new(AuthService::new(
            profile_auth,
            identity,
            clock.clone(),
            TokenSettings::from(&config),
        ));
        let gate = Arc::new(AuthorizationGate::new(
            auth.clone(),
            config.legacy_bearer_auth_enabled,
        ));
        Self {
            config,
            auth,
            gate,
            worlds,
            clock,
        }
    }
}
