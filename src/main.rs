// SPDX-License-Identifier: MPL-2.0
use iced_preview::app::{self, Flags};
use iced_preview::config::paths;
use std::process::ExitCode;

const USAGE: &str = "usage: iced_preview [--start N] [--config-dir DIR] IMAGE...";

fn parse_flags() -> Result<Flags, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();

    let start = args.opt_value_from_str("--start")?;
    let config_dir = args.opt_value_from_str("--config-dir")?;
    let images = args
        .finish()
        .into_iter()
        .filter_map(|arg| arg.into_string().ok())
        .collect();

    Ok(Flags {
        start,
        config_dir,
        images,
    })
}

fn main() -> ExitCode {
    env_logger::init();

    let flags = match parse_flags() {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    if flags.images.is_empty() {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    }
    paths::init_cli_override(flags.config_dir.clone());

    match app::run(flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
