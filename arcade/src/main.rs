use std::{
    io::{self, IsTerminal},
    process,
};

use log::error;

use arcade::{
    config::{Config, OutputFormat},
    render, run,
};
use common::leaderboard::MemoryLeaderboard;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to read configuration: {}.", e);
            process::exit(1);
        }
    };

    let mut leaderboard = MemoryLeaderboard::new();
    let report = match run::run(&config, &mut leaderboard) {
        Ok(report) => report,
        Err(e) => {
            error!("{}.", e);
            process::exit(1);
        }
    };

    match config.format {
        OutputFormat::Text => {
            let colored = io::stdout().is_terminal();
            println!("{}", render::report(&report, colored));
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to encode report: {}.", e);
                process::exit(1);
            }
        },
    }
}
