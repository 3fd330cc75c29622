use std::fmt;
use std::path::{Path, PathBuf};

use ipnet::IpNet;

/// A single static lease: hardware address to fixed IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRecord {
    hardware_address: String,
    ip_address: String,
    host_name: String,
}

impl ReservationRecord {
    /// Builds a record, returning `None` when the MAC or IP is empty.
    pub fn new(hardware_address: impl Into<String>, ip_address: impl Into<String>, host_name: impl Into<String>) -> Option<Self> {
        let hardware_address = hardware_address.into();
        let ip_address = ip_address.into();
        if hardware_address.is_empty() || ip_address.is_empty() {
            return None;
        }

        Some(Self { hardware_address, ip_address, host_name: host_name.into() })
    }

    pub fn hardware_address(&self) -> &str {
        self.hardware_address.as_ref()
    }

    pub fn ip_address(&self) -> &str {
        self.ip_address.as_ref()
    }

    pub fn host_name(&self) -> &str {
        self.host_name.as_ref()
    }
}

impl fmt::Display for ReservationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.host_name, self.ip_address)
    }
}

/// A DHCP scope as listed by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    name: String,
    network: IpNet,
}

impl Scope {
    pub fn new(name: impl Into<String>, network: IpNet) -> Self {
        Self { name: name.into(), network }
    }

    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    pub fn network(&self) -> IpNet {
        self.network
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.name, self.network.network(), self.network.netmask())
    }
}

/// The records read from one CSV file, in file order.
#[derive(Debug, Clone, Default)]
pub struct ReservationSet {
    source: PathBuf,
    records: Vec<ReservationRecord>,
}

impl ReservationSet {
    pub fn new(source: impl Into<PathBuf>, records: Vec<ReservationRecord>) -> Self {
        Self { source: source.into(), records }
    }

    pub fn source(&self) -> &Path {
        self.source.as_ref()
    }

    pub fn records(&self) -> &[ReservationRecord] {
        self.records.as_ref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
