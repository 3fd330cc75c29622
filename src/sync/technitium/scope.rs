use std::net::Ipv4Addr;

use ipnet::{IpNet, Ipv4Net};
use serde::Deserialize;

use crate::sync::model::Scope;

use super::error::{TechnitiumError, TechnitiumResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeV1 {
    name: String,
    subnet: Ipv4Addr,
    subnet_mask: Ipv4Addr,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeV2 {
    name: String,
    network_address: Ipv4Addr,
    subnet_mask: Ipv4Addr,
}

#[derive(Debug, Deserialize, Default)]
pub struct ScopeListV2 {
    #[serde(default)]
    pub scopes: Vec<ScopeV2>,
}

fn to_scope(name: String, address: Ipv4Addr, mask: Ipv4Addr) -> TechnitiumResult<Scope> {
    let network = ipnet::ipv4_mask_to_prefix(mask)
        .and_then(|prefix| Ipv4Net::new(address, prefix))
        .map_err(|_| TechnitiumError::InvalidScope { scope: name.clone(), mask })?;

    Ok(Scope::new(name, IpNet::V4(network.trunc())))
}

impl TryFrom<ScopeV1> for Scope {
    type Error = TechnitiumError;

    fn try_from(value: ScopeV1) -> Result<Self, Self::Error> {
        to_scope(value.name, value.subnet, value.subnet_mask)
    }
}

impl TryFrom<ScopeV2> for Scope {
    type Error = TechnitiumError;

    fn try_from(value: ScopeV2) -> Result<Self, Self::Error> {
        to_scope(value.name, value.network_address, value.subnet_mask)
    }
}
