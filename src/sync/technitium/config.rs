use std::time::Duration;

use serde::Deserialize;

/// Which generation of the Technitium HTTP API to speak.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// `POST /api/login`, flat listings, deletes by IP address.
    #[default]
    V1,
    /// `/api/user/login`, wrapped listings, deletes by MAC address.
    V2,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TechnitiumConfig {
    url: Option<String>,
    username: Option<String>,
    api_version: ApiVersion,
    accept_invalid_certs: bool,
    timeout: Option<u64>,
}

impl TechnitiumConfig {
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}
