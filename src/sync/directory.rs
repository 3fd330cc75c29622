use std::fmt;

use super::model::{ReservationRecord, Scope};

/// Authenticated session token, threaded through every directory call.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    pub fn token(&self) -> &str {
        self.token.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

/// Remote DHCP service holding scopes and their reservations.
pub trait Directory {
    type Error: std::error::Error + Send + Sync + 'static;

    fn login(&self, username: &str, password: &str) -> Result<Session, Self::Error>;

    fn list_scopes(&self, session: &Session) -> Result<Vec<Scope>, Self::Error>;

    fn list_reservations(&self, session: &Session, scope: &str) -> Result<Vec<ReservationRecord>, Self::Error>;

    fn delete_reservation(&self, session: &Session, scope: &str, reservation: &ReservationRecord) -> Result<(), Self::Error>;

    /// Returns whether the directory accepted the reservation.
    fn add_reservation(&self, session: &Session, scope: &str, reservation: &ReservationRecord) -> bool;
}
