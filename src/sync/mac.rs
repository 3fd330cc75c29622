use std::sync::LazyLock;

use regex::Regex;

static MAC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{2}([:-])[0-9a-f]{2}(?:[:-][0-9a-f]{2}){4}$").unwrap()
});

pub trait MacAddr {
    /// Trimmed, lower-cased form as sent to the directory.
    fn normalize_mac(&self) -> String;
    fn is_well_formed_mac(&self) -> bool;
}

impl MacAddr for str {
    fn normalize_mac(&self) -> String {
        self.trim().to_lowercase()
    }

    fn is_well_formed_mac(&self) -> bool {
        let mac = self.normalize_mac();
        match MAC_PATTERN.captures(&mac) {
            // Separators must not be mixed.
            Some(captures) => {
                let separator = &captures[1];
                mac.split(separator).count() == 6
            }
            None => false,
        }
    }
}
