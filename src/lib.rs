pub mod config;
pub use config::Config;
pub mod logging;
pub mod sync;
pub use sync::Reconciler;
pub mod cli;
pub mod interactive;
pub mod prompt;
