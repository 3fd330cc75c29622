use std::net::Ipv4Addr;

pub type TechnitiumResult<T> = Result<T, TechnitiumError>;

#[derive(Debug, thiserror::Error)]
pub enum TechnitiumError {
    #[error("Error {action}: {source}")]
    Transport { action: &'static str, source: ureq::Error },
    #[error("Error {action}: server answered {status:?} {message}")]
    Api { action: &'static str, status: String, message: String },
    #[error("Error {action}: no token in response")]
    MissingToken { action: &'static str },
    #[error("Error listing scopes: scope {scope:?} has invalid subnet mask {mask}")]
    InvalidScope { scope: String, mask: Ipv4Addr },
}

impl TechnitiumError {
    pub(super) fn transport(action: &'static str) -> impl FnOnce(ureq::Error) -> Self {
        move |source| Self::Transport { action, source }
    }
}
