//! Error types for peer-blocks

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The identity carried neither a client name nor a public key.
    #[error("Invalid client identity: a name or a public key is required")]
    InvalidIdentity,

    #[error("Invalid field pattern: {0}")]
    Pattern(#[from] regex::Error),
}
