pub mod credential;
pub mod flow;
pub mod manager;

pub use credential::{ClientSecrets, Credential, TokenResponse};
pub use flow::InstalledAppFlow;
pub use manager::CredentialManager;
