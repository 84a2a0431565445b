pub mod credential_file;
pub mod oauth;
pub mod provider;
pub mod secret_store;

pub use credential_file::{CredentialStore, FileCredentialStore, StoredCredential};
pub use oauth::{GoogleOAuth, TokenEndpoint};
pub use provider::{AuthHandle, CredentialProvider};
pub use secret_store::ApiKey;
