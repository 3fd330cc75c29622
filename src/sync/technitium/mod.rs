pub mod config;
pub mod error;
pub(super) mod model;
pub mod reservation;
pub mod scope;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::json;
use ureq::tls::{RootCerts, TlsConfig};

use crate::sync::directory::{Directory, Session};
use crate::sync::model::{ReservationRecord, Scope};

use self::config::{ApiVersion, TechnitiumConfig};
pub use self::error::{TechnitiumError, TechnitiumResult};
use self::model::*;
use self::reservation::*;
use self::scope::*;

pub struct TechnitiumApi {
    base_url: String,
    version: ApiVersion,
    agent: ureq::Agent,
}

impl TechnitiumApi {
    pub fn new(base_url: &str, config: &TechnitiumConfig) -> Self {
        let tls = TlsConfig::builder()
            .root_certs(RootCerts::PlatformVerifier)
            .disable_verification(config.accept_invalid_certs())
            .build();

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .tls_config(tls)
            .timeout_global(config.timeout())
            .build()
            .into();

        Self {
            base_url: base_url.trim().trim_end_matches('/').to_owned(),
            version: config.api_version(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_ref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)], action: &'static str) -> TechnitiumResult<T> {
        let url = self.url(path);

        debug!("Fetch {} from {:?}", std::any::type_name::<T>(), url);
        let mut response = self.agent.get(&url)
            .query_pairs(params.iter().copied())
            .call()
            .map_err(TechnitiumError::transport(action))?;

        response.body_mut().read_json::<T>().map_err(TechnitiumError::transport(action))
    }

    fn scope_params<'a>(session: &'a Session, scope: &'a str) -> Vec<(&'static str, &'a str)> {
        vec![("token", session.token()), ("name", scope)]
    }
}

impl Directory for TechnitiumApi {
    type Error = TechnitiumError;

    fn login(&self, username: &str, password: &str) -> TechnitiumResult<Session> {
        const ACTION: &str = "logging in";

        let login: LoginResponse = match self.version {
            ApiVersion::V1 => {
                let url = self.url("/api/login");
                debug!("Login as {:?} at {:?}", username, url);
                self.agent.post(&url)
                    .send_json(json!({ "userName": username, "password": password }))
                    .map_err(TechnitiumError::transport(ACTION))?
                    .body_mut()
                    .read_json::<LoginResponse>()
                    .map_err(TechnitiumError::transport(ACTION))?
            }
            ApiVersion::V2 => {
                debug!("Login as {:?} at {:?}", username, self.url("/api/user/login"));
                self.get("/api/user/login", &[("user", username), ("pass", password)], ACTION)?
            }
        };

        if login.status != STATUS_OK {
            return Err(TechnitiumError::Api {
                action: ACTION,
                status: login.status,
                message: login.error_message.unwrap_or_default(),
            });
        }

        login.token
            .filter(|t| !t.is_empty())
            .map(Session::new)
            .ok_or(TechnitiumError::MissingToken { action: ACTION })
    }

    fn list_scopes(&self, session: &Session) -> TechnitiumResult<Vec<Scope>> {
        const ACTION: &str = "listing scopes";
        let params = [("token", session.token())];

        match self.version {
            ApiVersion::V1 => self.get::<Envelope<Vec<ScopeV1>>>("/api/dhcp/scopes/list", &params, ACTION)?
                .into_response(ACTION)?
                .into_iter()
                .map(Scope::try_from)
                .collect(),
            ApiVersion::V2 => self.get::<Envelope<ScopeListV2>>("/api/dhcp/scopes/list", &params, ACTION)?
                .into_response(ACTION)?
                .scopes
                .into_iter()
                .map(Scope::try_from)
                .collect(),
        }
    }

    fn list_reservations(&self, session: &Session, scope: &str) -> TechnitiumResult<Vec<ReservationRecord>> {
        const ACTION: &str = "listing reservations";
        let params = Self::scope_params(session, scope);

        let records = match self.version {
            ApiVersion::V1 => self.get::<Envelope<Vec<ReservedLeaseV1>>>("/api/dhcp/scopes/listReservedLeases", &params, ACTION)?
                .into_response(ACTION)?
                .into_iter()
                .filter_map(ReservedLeaseV1::into_record)
                .collect(),
            ApiVersion::V2 => self.get::<Envelope<ReservedLeaseListV2>>("/api/dhcp/scopes/listReservedLeases", &params, ACTION)?
                .into_response(ACTION)?
                .reserved_leases
                .into_iter()
                .filter_map(ReservedLeaseV2::into_record)
                .collect(),
        };

        Ok(records)
    }

    fn delete_reservation(&self, session: &Session, scope: &str, reservation: &ReservationRecord) -> TechnitiumResult<()> {
        const ACTION: &str = "deleting reservation";
        let mut params = Self::scope_params(session, scope);
        match self.version {
            ApiVersion::V1 => params.push(("ipAddress", reservation.ip_address())),
            ApiVersion::V2 => params.push(("hardwareAddress", reservation.hardware_address())),
        }

        self.get::<Envelope<serde_json::Value>>("/api/dhcp/scopes/deleteReservedLease", &params, ACTION)?
            .into_response(ACTION)
            .map(|_| ())
    }

    fn add_reservation(&self, session: &Session, scope: &str, reservation: &ReservationRecord) -> bool {
        const ACTION: &str = "adding reservation";
        let mut params = Self::scope_params(session, scope);
        params.extend([
            ("hardwareAddress", reservation.hardware_address()),
            ("ipAddress", reservation.ip_address()),
            ("hostName", reservation.host_name()),
        ]);

        let result = self.get::<Envelope<serde_json::Value>>("/api/dhcp/scopes/addReservedLease", &params, ACTION)
            .and_then(|envelope| envelope.into_response(ACTION));

        match result {
            Ok(_) => true,
            Err(e) => {
                warn!("Reservation {} {}: {}", reservation.ip_address(), reservation.hardware_address(), e);
                false
            }
        }
    }
}
