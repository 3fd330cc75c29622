use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use log::{debug, info};

use crate::cli::Import;
use crate::prompt::{ask_password, Prompt};
use crate::sync::directory::Directory;
use crate::sync::model::ReservationSet;
use crate::sync::source::{clean_path, read_reservations, SourceError};
use crate::sync::technitium::TechnitiumApi;
use crate::sync::{select_scope, ApplyReport, Reconciler, SelectionError, SyncError};
use crate::Config;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Login failed.")]
    Login(#[source] Box<dyn Error + Send + Sync>),
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("No DHCP scopes found.")]
    NoScopes,
    #[error(transparent)]
    Directory(Box<dyn Error + Send + Sync>),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("Error reading input: {0}")]
    Io(#[from] io::Error),
}

impl RunError {
    pub fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            RunError::Login(_) => exitcode::NOPERM,
            RunError::FileNotFound(_) => exitcode::NOINPUT,
            RunError::NoScopes | RunError::Directory(_) => exitcode::UNAVAILABLE,
            RunError::Selection(_) => exitcode::USAGE,
            RunError::Source(SourceError::Io { .. }) => exitcode::IOERR,
            RunError::Source(_) => exitcode::DATAERR,
            RunError::Sync(SyncError::Directory(_)) => exitcode::UNAVAILABLE,
            RunError::Sync(SyncError::Filter(_)) => exitcode::DATAERR,
            RunError::Sync(SyncError::Output(_)) | RunError::Io(_) => exitcode::IOERR,
        }
    }
}

/// What the operator told us before anything touches the server.
pub struct Answers {
    pub url: String,
    pub username: String,
    pub password: String,
    pub csv: PathBuf,
}

impl Answers {
    pub fn gather<R: BufRead, W: Write>(
        prompt: &mut Prompt<R, W>,
        args: &Import,
        config: &Config,
        password: impl FnOnce(&str) -> io::Result<String>,
    ) -> io::Result<Self> {
        let url = prompt.ask_unless(
            "Enter Technitium DNS Base URL (e.g., http://192.168.1.120:5380): ",
            args.url.as_deref().or(config.directory.url()),
        )?;
        let username = prompt.ask_unless("Username: ", args.username.as_deref().or(config.directory.username()))?;
        let password = password("Password: ")?;
        let csv = clean_path(&prompt.ask_unless("Path to CSV file: ", args.csv.as_deref())?);

        Ok(Self { url, username, password, csv })
    }
}

pub fn run(args: &Import, config: &Config) -> Result<ApplyReport, RunError> {
    let stdin = io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), io::stdout());

    writeln!(prompt.output(), "Logging into Technitium DNS...")?;
    let answers = Answers::gather(&mut prompt, args, config, ask_password)?;

    let reservations = load(&answers)?;
    let api = TechnitiumApi::new(&answers.url, &config.directory);
    info!("Connect to {} as {:?} using API {:?}", api.base_url(), answers.username, config.directory.api_version());

    import(&api, &mut prompt, &answers, &reservations, args)
}

/// Reads the CSV up front so a broken file never gets as far as a delete.
pub fn load(answers: &Answers) -> Result<ReservationSet, RunError> {
    if !answers.csv.exists() {
        return Err(RunError::FileNotFound(answers.csv.clone()));
    }

    let reservations = read_reservations(&answers.csv)?;
    debug!("Read {} reservations from {}", reservations.len(), answers.csv.display());
    Ok(reservations)
}

pub fn import<D: Directory, R: BufRead, W: Write>(
    directory: &D,
    prompt: &mut Prompt<R, W>,
    answers: &Answers,
    reservations: &ReservationSet,
    args: &Import,
) -> Result<ApplyReport, RunError> {
    let session = directory.login(&answers.username, &answers.password)
        .map_err(|e| RunError::Login(Box::new(e)))?;

    let scopes = directory.list_scopes(&session).map_err(|e| RunError::Directory(Box::new(e)))?;
    if scopes.is_empty() {
        return Err(RunError::NoScopes);
    }

    writeln!(prompt.output(), "\nAvailable DHCP Scopes:")?;
    for (idx, scope) in scopes.iter().enumerate() {
        writeln!(prompt.output(), "  [{}] {}", idx + 1, scope)?;
    }

    let choice = prompt.ask_unless("Select a scope number to update: ", args.scope.as_deref())?;
    let scope = select_scope(&scopes, &choice)?;
    writeln!(prompt.output(), "Selected Scope: {}", scope.name())?;

    let clear = match args.clear_choice() {
        Some(clear) => clear,
        None => prompt.confirm("Do you want to delete all existing reservations first?")?,
    };

    let report = Reconciler::new(directory, &session, scope, prompt.output(), args.noop).run(clear, reservations)?;
    Ok(report)
}
