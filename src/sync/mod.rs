use std::error::Error;
use std::fmt;
use std::io::{self, Write};

use log::{debug, info, warn};

use self::directory::{Directory, Session};
use self::filter::{filter_by_network, FilterError};
use self::model::{ReservationRecord, ReservationSet, Scope};

pub mod directory;
pub mod filter;
mod mac;
pub mod model;
pub mod source;
pub mod technitium;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Directory(Box<dyn Error + Send + Sync>),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("Error writing output: {0}")]
    Output(#[from] io::Error),
}

impl SyncError {
    fn directory<E: Error + Send + Sync + 'static>(e: E) -> Self {
        Self::Directory(Box::new(e))
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Invalid scope selection {0:?}")]
    NotANumber(String),
    #[error("Scope {choice} out of range, expected 1-{count}")]
    OutOfRange { choice: usize, count: usize },
}

/// Picks a scope by its 1-based number as shown in the listing.
pub fn select_scope<'a>(scopes: &'a [Scope], choice: &str) -> Result<&'a Scope, SelectionError> {
    let choice = choice.trim();
    let number: usize = choice.parse().map_err(|_| SelectionError::NotANumber(choice.to_owned()))?;

    number.checked_sub(1)
        .and_then(|idx| scopes.get(idx))
        .ok_or(SelectionError::OutOfRange { choice: number, count: scopes.len() })
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub requested: usize,
    pub failed: Vec<ReservationRecord>,
    /// Reservations still listed after the deletions.
    pub remaining: usize,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: Vec<ReservationRecord>,
    pub noop: bool,
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.noop {
            write!(f, "Dry run: {} reservations would be updated.", self.total)
        } else {
            write!(f, "Completed: {}/{} reservations updated.", self.succeeded, self.total)
        }
    }
}

/// Brings one scope in line with a reservation set.
///
/// Every step past scope selection mutates the directory and nothing is
/// rolled back; operator-facing lines go to `out`.
pub struct Reconciler<'a, D: Directory, W: Write> {
    directory: &'a D,
    session: &'a Session,
    scope: &'a Scope,
    out: W,
    noop: bool,
}

impl<'a, D: Directory, W: Write> Reconciler<'a, D, W> {
    pub fn new(directory: &'a D, session: &'a Session, scope: &'a Scope, out: W, noop: bool) -> Self {
        Self { directory, session, scope, out, noop }
    }

    pub fn run(&mut self, clear: bool, reservations: &ReservationSet) -> Result<ApplyReport, SyncError> {
        info!("Start import of {} into scope {}", reservations.source().display(), self.scope);

        if clear {
            self.clear()?;
        } else {
            self.keep()?;
        }

        let records = self.filter(reservations)?;
        self.apply(&records)
    }

    fn list(&self) -> Result<Vec<ReservationRecord>, SyncError> {
        self.directory.list_reservations(self.session, self.scope.name()).map_err(SyncError::directory)
    }

    /// Deletes every reservation in the scope, one request each.
    pub fn clear(&mut self) -> Result<ClearReport, SyncError> {
        let existing = self.list()?;
        info!("Scope {}: Found {} reservations to delete", self.scope.name(), existing.len());

        let mut report = ClearReport { requested: existing.len(), ..Default::default() };

        for reservation in existing {
            if self.noop {
                info!("  Reservation {}: Would remove {}", reservation.ip_address(), reservation.hardware_address());
                writeln!(self.out, "Would delete: {}", reservation)?;
                continue;
            }

            match self.directory.delete_reservation(self.session, self.scope.name(), &reservation) {
                Ok(()) => info!("  Reservation {}: Removed {}", reservation.ip_address(), reservation.hardware_address()),
                Err(e) => {
                    warn!("  Reservation {}: Remove failed: {}", reservation.ip_address(), e);
                    writeln!(self.out, "Delete failed: {}", reservation)?;
                    report.failed.push(reservation);
                }
            }
        }

        if self.noop {
            report.remaining = report.requested;
            writeln!(self.out, "Dry run: {} reservations would be deleted.", report.requested)?;
            return Ok(report);
        }

        writeln!(self.out, "Cleared all reservations in scope {}.", self.scope.name())?;
        report.remaining = self.list()?.len();
        if report.remaining > 0 {
            warn!("Scope {}: {} reservations left after delete", self.scope.name(), report.remaining);
        }
        writeln!(self.out, "Reservation count after delete: {}", report.remaining)?;

        Ok(report)
    }

    /// Reports the current reservation count without changing anything.
    pub fn keep(&mut self) -> Result<usize, SyncError> {
        let current = self.list()?.len();
        writeln!(self.out, "{} existing reservations will remain.", current)?;
        Ok(current)
    }

    pub fn filter<'r>(&mut self, reservations: &'r ReservationSet) -> Result<Vec<&'r ReservationRecord>, SyncError> {
        let network = self.scope.network();
        let records = filter_by_network(reservations.records(), &network)?;

        writeln!(self.out, "Parsed {} valid reservations from CSV", reservations.len())?;
        let skipped = reservations.len() - records.len();
        if skipped > 0 {
            info!("Skip {} reservations outside {}", skipped, network);
            writeln!(self.out, "Skipped {} reservations outside {}", skipped, network)?;
        }
        writeln!(self.out)?;

        Ok(records)
    }

    /// Adds each record; a failed add is reported and the rest continue.
    pub fn apply(&mut self, records: &[&ReservationRecord]) -> Result<ApplyReport, SyncError> {
        writeln!(self.out, "Updating reservations in scope: {}", self.scope.name())?;

        let mut report = ApplyReport { total: records.len(), noop: self.noop, ..Default::default() };

        for &record in records {
            if self.noop {
                info!("  Reservation {}: Would create {}", record.ip_address(), record.hardware_address());
                writeln!(self.out, "Would add: {}", record)?;
                continue;
            }

            if self.directory.add_reservation(self.session, self.scope.name(), record) {
                debug!("  Reservation {}: Created {}", record.ip_address(), record.hardware_address());
                report.succeeded += 1;
            } else {
                writeln!(self.out, "Failed: {}", record)?;
                report.failed.push(record.clone());
            }
        }

        info!("Scope {}: {}/{} reservations updated", self.scope.name(), report.succeeded, report.total);
        writeln!(self.out, "\n{}", report)?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::{BTreeMap, HashSet};
    use std::path::Path;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("mock failure")]
    struct MockError;

    /// In-memory directory; adds overwrite by IP.
    #[derive(Default)]
    struct MockDirectory {
        reservations: RefCell<BTreeMap<String, ReservationRecord>>,
        deletes: RefCell<Vec<String>>,
        adds: RefCell<Vec<ReservationRecord>>,
        /// IPs the directory pretends to delete but keeps.
        sticky: HashSet<String>,
        fail_delete: HashSet<String>,
        fail_add: HashSet<String>,
    }

    impl MockDirectory {
        fn with_existing(records: &[(&str, &str, &str)]) -> Self {
            let dir = Self::default();
            for (mac, ip, name) in records {
                dir.reservations.borrow_mut().insert(ip.to_string(), ReservationRecord::new(*mac, *ip, *name).unwrap());
            }
            dir
        }
    }

    impl Directory for MockDirectory {
        type Error = MockError;

        fn login(&self, _username: &str, _password: &str) -> Result<Session, MockError> {
            Ok(Session::new("token"))
        }

        fn list_scopes(&self, _session: &Session) -> Result<Vec<Scope>, MockError> {
            Ok(vec![scope()])
        }

        fn list_reservations(&self, _session: &Session, _scope: &str) -> Result<Vec<ReservationRecord>, MockError> {
            Ok(self.reservations.borrow().values().cloned().collect())
        }

        fn delete_reservation(&self, _session: &Session, _scope: &str, reservation: &ReservationRecord) -> Result<(), MockError> {
            let ip = reservation.ip_address().to_owned();
            self.deletes.borrow_mut().push(ip.clone());
            if self.fail_delete.contains(&ip) {
                return Err(MockError);
            }
            if !self.sticky.contains(&ip) {
                self.reservations.borrow_mut().remove(&ip);
            }
            Ok(())
        }

        fn add_reservation(&self, _session: &Session, _scope: &str, reservation: &ReservationRecord) -> bool {
            self.adds.borrow_mut().push(reservation.clone());
            if self.fail_add.contains(reservation.host_name()) {
                return false;
            }
            self.reservations.borrow_mut().insert(reservation.ip_address().to_owned(), reservation.clone());
            true
        }
    }

    fn scope() -> Scope {
        Scope::new("LAN", "10.0.0.0/24".parse().unwrap())
    }

    fn reservations(csv: &str) -> ReservationSet {
        source::parse_reservations(Path::new("test.csv"), csv).unwrap()
    }

    fn run(dir: &MockDirectory, clear: bool, set: &ReservationSet, noop: bool) -> (Result<ApplyReport, SyncError>, String) {
        let session = Session::new("token");
        let scope = scope();
        let mut out = Vec::new();
        let result = Reconciler::new(dir, &session, &scope, &mut out, noop).run(clear, set);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn it_selects_scopes_by_number() {
        let scopes = vec![scope(), Scope::new("DMZ", "10.1.0.0/24".parse().unwrap())];

        assert_eq!(select_scope(&scopes, " 2\n").unwrap().name(), "DMZ");
        assert_eq!(select_scope(&scopes, "0"), Err(SelectionError::OutOfRange { choice: 0, count: 2 }));
        assert_eq!(select_scope(&scopes, "3"), Err(SelectionError::OutOfRange { choice: 3, count: 2 }));
        assert_eq!(select_scope(&scopes, "LAN"), Err(SelectionError::NotANumber(String::from("LAN"))));
    }

    #[test]
    fn it_imports_only_addresses_inside_the_scope() {
        let dir = MockDirectory::default();
        let set = reservations("MAC,IP,Name\nAA:BB:CC:DD:EE:01,10.0.0.5,host1\nAA:BB:CC:DD:EE:02,10.0.1.5,host2\n");

        let (report, out) = run(&dir, false, &set, false);
        let report = report.unwrap();

        assert_eq!((report.succeeded, report.total), (1, 1));
        assert_eq!(dir.adds.borrow().len(), 1);
        assert_eq!(dir.adds.borrow()[0].hardware_address(), "aa:bb:cc:dd:ee:01");
        assert!(out.contains("0 existing reservations will remain.\n"));
        assert!(out.contains("Parsed 2 valid reservations from CSV\n"));
        assert!(out.contains("Skipped 1 reservations outside 10.0.0.0/24\n"));
        assert!(out.ends_with("Completed: 1/1 reservations updated.\n"));
    }

    #[test]
    fn it_reports_a_non_zero_remainder_after_clear() {
        let mut dir = MockDirectory::with_existing(&[
            ("aa:bb:cc:dd:ee:10", "10.0.0.10", "a"),
            ("aa:bb:cc:dd:ee:11", "10.0.0.11", "b"),
            ("aa:bb:cc:dd:ee:12", "10.0.0.12", "c"),
        ]);
        dir.sticky.insert(String::from("10.0.0.11"));
        let session = Session::new("token");
        let scope = scope();
        let mut out = Vec::new();

        let report = Reconciler::new(&dir, &session, &scope, &mut out, false).clear().unwrap();

        assert_eq!(dir.deletes.borrow().len(), 3);
        assert_eq!(report, ClearReport { requested: 3, failed: vec![], remaining: 1 });
        assert!(String::from_utf8(out).unwrap().contains("Reservation count after delete: 1\n"));
    }

    #[test]
    fn it_keeps_deleting_after_a_failed_delete() {
        let mut dir = MockDirectory::with_existing(&[
            ("aa:bb:cc:dd:ee:10", "10.0.0.10", "a"),
            ("aa:bb:cc:dd:ee:11", "10.0.0.11", "b"),
        ]);
        dir.fail_delete.insert(String::from("10.0.0.10"));
        let set = reservations("MAC,IP,Name\n");

        let (report, out) = run(&dir, true, &set, false);

        assert!(report.is_ok());
        assert_eq!(*dir.deletes.borrow(), vec!["10.0.0.10", "10.0.0.11"]);
        assert!(out.contains("Delete failed: a (10.0.0.10)\n"));
        assert!(out.contains("Reservation count after delete: 1\n"));
        assert!(out.ends_with("Completed: 0/0 reservations updated.\n"));
    }

    #[test]
    fn it_reports_failed_adds_and_continues() {
        let mut dir = MockDirectory::default();
        dir.fail_add.insert(String::from("host2"));
        let set = reservations("MAC,IP,Name\naa:bb:cc:dd:ee:01,10.0.0.5,host1\naa:bb:cc:dd:ee:02,10.0.0.6,host2\naa:bb:cc:dd:ee:03,10.0.0.7,host3\n");

        let (report, out) = run(&dir, false, &set, false);
        let report = report.unwrap();

        assert_eq!(dir.adds.borrow().len(), 3);
        assert_eq!(report.failed.len(), 1);
        assert!(out.contains("Failed: host2 (10.0.0.6)\n"));
        assert!(out.ends_with("Completed: 2/3 reservations updated.\n"));
    }

    #[test]
    fn it_adds_duplicate_addresses_separately() {
        let dir = MockDirectory::default();
        let set = reservations("MAC,IP,Name\naa:bb:cc:dd:ee:01,10.0.0.5,a\naa:bb:cc:dd:ee:02,10.0.0.5,b\n");

        let (report, _) = run(&dir, false, &set, false);

        assert_eq!(report.unwrap().succeeded, 2);
        let macs: Vec<String> = dir.adds.borrow().iter().map(|r| r.hardware_address().to_owned()).collect();
        assert_eq!(macs, vec!["aa:bb:cc:dd:ee:01", "aa:bb:cc:dd:ee:02"]);
    }

    #[test]
    fn it_gives_stable_counts_on_repeated_runs() {
        let mut dir = MockDirectory::default();
        dir.fail_add.insert(String::from("host2"));
        let set = reservations("MAC,IP,Name\naa:bb:cc:dd:ee:01,10.0.0.5,host1\naa:bb:cc:dd:ee:02,10.0.0.6,host2\n");

        let first = run(&dir, false, &set, false).0.unwrap();
        let second = run(&dir, false, &set, false).0.unwrap();

        assert_eq!(first, second);
        assert_eq!(dir.reservations.borrow().len(), 1);
    }

    #[test]
    fn it_aborts_on_invalid_addresses_before_adding() {
        let dir = MockDirectory::default();
        let set = reservations("MAC,IP,Name\naa:bb:cc:dd:ee:01,10.0.0.5,host1\naa:bb:cc:dd:ee:02,not-an-ip,host2\n");

        let (report, _) = run(&dir, false, &set, false);

        assert!(matches!(report, Err(SyncError::Filter(FilterError { position: 2, .. }))));
        assert!(dir.adds.borrow().is_empty());
    }

    #[test]
    fn it_changes_nothing_in_noop_mode() {
        let dir = MockDirectory::with_existing(&[("aa:bb:cc:dd:ee:10", "10.0.0.10", "old")]);
        let set = reservations("MAC,IP,Name\naa:bb:cc:dd:ee:01,10.0.0.5,host1\n");

        let (report, out) = run(&dir, true, &set, true);

        assert!(report.unwrap().noop);
        assert!(dir.deletes.borrow().is_empty());
        assert!(dir.adds.borrow().is_empty());
        assert!(out.contains("Would delete: old (10.0.0.10)\n"));
        assert!(out.contains("Would add: host1 (10.0.0.5)\n"));
        assert!(out.ends_with("Dry run: 1 reservations would be updated.\n"));
    }
}
