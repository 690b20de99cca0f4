use clap::Parser as CliParser;
use irfront::driver::{Cli, CompilerDriver};
use std::process::exit;

/// The main entry point for the application.
fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let mut driver = CompilerDriver::new(cli);
    if let Err(e) = driver.run() {
        eprintln!("error: {}", e);
        exit(1);
    }
}
