use std::path::PathBuf;

use clap::Parser;

/// Import DHCP reservations from a CSV file into a Technitium DNS server scope
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Import {
    /// Config file, defaults to ./technitium-dhcp-import.cfg when present
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Technitium base URL, e.g. http://192.168.1.120:5380
    #[arg(short, long)]
    pub url: Option<String>,

    /// Login user name
    #[arg(long)]
    pub username: Option<String>,

    /// CSV file with MAC, IP and Name columns
    #[arg(long)]
    pub csv: Option<String>,

    /// Scope number as shown in the listing
    #[arg(short, long)]
    pub scope: Option<String>,

    /// Delete all existing reservations in the scope first
    #[arg(long, conflicts_with = "keep")]
    pub clear: bool,

    /// Keep existing reservations in the scope
    #[arg(long)]
    pub keep: bool,

    /// Do not change anything
    #[arg(short, long, default_value_t = false)]
    pub noop: bool,
}

impl Import {
    pub fn init() -> Self { Import::parse() }

    /// `None` when the operator has to be asked.
    pub fn clear_choice(&self) -> Option<bool> {
        match (self.clear, self.keep) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
