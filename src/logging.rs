use std::error::Error;
use std::path::PathBuf;

use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            policy::compound::{roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy},
            RollingFileAppender,
        },
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config, Handle,
};
use serde::Deserialize;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l:<5} {t} - {m}{n}";
const LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;
const LOG_FILE_COUNT: u32 = 5;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    level: LevelFilter,
    dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: LevelFilter::Info, dir: None }
    }
}

impl LogConfig {
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn dir(&self) -> Option<&PathBuf> {
        self.dir.as_ref()
    }

    /// Installs the global logger; failures are printed and logging stays off.
    pub fn setup(&self, name: &str) -> Option<Handle> {
        match self.build(name).and_then(|config| Ok(log4rs::init_config(config)?)) {
            Ok(handle) => Some(handle),
            Err(e) => {
                eprintln!("Error setting up logging: {}", e);
                None
            }
        }
    }

    fn build(&self, name: &str) -> Result<Config, Box<dyn Error>> {
        // Console only carries warnings, stdout belongs to the prompts.
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new("{l}: {m}{n}")))
            .build();

        let mut config = Config::builder().appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Warn)))
                .build("stderr", Box::new(stderr)),
        );
        let mut root = Root::builder().appender("stderr");

        if let Some(dir) = &self.dir {
            let archive = dir.join(format!("{}.{{}}.log", name));
            let roller = FixedWindowRoller::builder().build(&archive.to_string_lossy(), LOG_FILE_COUNT)?;
            let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(LOG_FILE_SIZE)), Box::new(roller));
            let logfile = RollingFileAppender::builder()
                .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
                .build(dir.join(format!("{}.log", name)), Box::new(policy))?;

            config = config.appender(Appender::builder().build("logfile", Box::new(logfile)));
            root = root.appender("logfile");
        }

        Ok(config.build(root.build(self.level))?)
    }
}
