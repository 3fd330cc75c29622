use std::net::IpAddr;

use ipnet::IpNet;

use super::model::ReservationRecord;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid IP address {ip_address:?} for {host_name:?} (record {position})")]
pub struct FilterError {
    pub host_name: String,
    pub ip_address: String,
    /// 1-based position within the input records.
    pub position: usize,
}

/// Keeps the records whose address lies inside `network`, in order.
///
/// Records of the other address family are dropped. The first record whose
/// address does not parse aborts the whole batch.
pub fn filter_by_network<'a>(records: &'a [ReservationRecord], network: &IpNet) -> Result<Vec<&'a ReservationRecord>, FilterError> {
    let mut retained = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        let address: IpAddr = record.ip_address().parse().map_err(|_| FilterError {
            host_name: record.host_name().to_owned(),
            ip_address: record.ip_address().to_owned(),
            position: idx + 1,
        })?;

        if network.contains(&address) {
            retained.push(record);
        }
    }

    Ok(retained)
}
