use std::error::Error;

use log::{error, info};
use technitium_dhcp_import::{cli::Import, interactive, Config};

fn main() {
    let args = Import::init();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            println!("Error reading config: {}", e);
            std::process::exit(exitcode::CONFIG);
        }
    };

    let _log_handle = config.log.setup("import");

    match interactive::run(&args, &config) {
        Ok(report) => {
            info!("{}", report);
            std::process::exit(exitcode::OK);
        }
        Err(e) => {
            if let Some(source) = e.source() {
                error!("{}: {}", e, source);
            }
            println!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}
