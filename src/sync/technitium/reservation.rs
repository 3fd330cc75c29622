use log::warn;
use serde::Deserialize;

use crate::sync::model::ReservationRecord;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedLeaseV1 {
    hardware_address: String,
    ip_address: String,
    #[serde(default)]
    host_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedLeaseV2 {
    hardware_address: String,
    address: String,
    #[serde(default)]
    host_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReservedLeaseListV2 {
    #[serde(default)]
    pub reserved_leases: Vec<ReservedLeaseV2>,
}

fn to_record(hardware_address: String, ip_address: String, host_name: Option<String>) -> Option<ReservationRecord> {
    let record = ReservationRecord::new(hardware_address, ip_address, host_name.unwrap_or_default());
    if record.is_none() {
        warn!("Ignoring reserved lease without hardware or IP address");
    }
    record
}

impl ReservedLeaseV1 {
    pub fn into_record(self) -> Option<ReservationRecord> {
        to_record(self.hardware_address, self.ip_address, self.host_name)
    }
}

impl ReservedLeaseV2 {
    pub fn into_record(self) -> Option<ReservationRecord> {
        to_record(self.hardware_address, self.address, self.host_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_v1_leases() {
        let lease = serde_json::from_str::<ReservedLeaseV1>(r#"{
            "hardwareAddress": "00-11-22-33-44-55",
            "ipAddress": "192.168.1.10",
            "hostName": null
        }"#).unwrap();
        let record = lease.into_record().unwrap();

        assert_eq!(record.hardware_address(), "00-11-22-33-44-55");
        assert_eq!(record.ip_address(), "192.168.1.10");
        assert_eq!(record.host_name(), "");
    }

    #[test]
    fn it_parses_v2_lease_lists() {
        let list = serde_json::from_str::<ReservedLeaseListV2>(r#"{
            "reservedLeases": [
                { "hostName": "printer", "hardwareAddress": "00-11-22-33-44-55", "address": "10.0.0.20", "comments": "" },
                { "hostName": "ghost", "hardwareAddress": "", "address": "10.0.0.21" }
            ]
        }"#).unwrap();
        let records: Vec<ReservationRecord> = list.reserved_leases.into_iter().filter_map(ReservedLeaseV2::into_record).collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].host_name(), "printer");
        assert_eq!(records[0].ip_address(), "10.0.0.20");
    }
}
