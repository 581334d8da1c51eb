use log_manager::{LogManager, LoggerConfiguration};
use logger::LogLevel;

use dotenv::dotenv;
use std::env;
use std::path::Path;

fn main() {
    dotenv().ok();

    let config_path = env::var("LOGFILE_CONFIG").unwrap_or_else(|_| "logfile.conf".to_string());

    let configuration = match LoggerConfiguration::load(Path::new(&config_path)) {
        Ok(configuration) => configuration,
        Err(err) => {
            eprintln!("logfile: {}, falling back to defaults", err);
            LoggerConfiguration::default()
        }
    };

    println!("{}", configuration);

    let mut manager = LogManager::new(configuration);
    manager.initialize();

    let logger = manager.logger();
    logger.info("logfile pipeline up");
    logger.debug("configuration loaded");
    logger.log_parts(LogLevel::Info, &[&"config path", &config_path]);
    logger.warn("sample warning record");
    logger.error("sample error record");

    manager.shutdown();
}
