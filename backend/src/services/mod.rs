pub mod auth;
pub mod authorization;
pub mod identity;

pub use auth::AuthService;
pub use authorization::{AuthorizationGate, Credential};
pub use identity::{HttpIdentityProvider, IdentityProvider, IdentityProviderError};
