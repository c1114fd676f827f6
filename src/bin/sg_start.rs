// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::process::ExitCode;

use scsi_maint::{
    cfg::{
        cli::{StartArgs, StartOptions, parse_or_exit},
        config::Config,
        logger::init_logger,
    },
    handlers::start_stop::start_stop_unit,
    models::error::MaintError,
    transport::{Device, sg::SgTransport},
};
use tracing::{debug, info};

const EXIT_OPEN_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let args = parse_or_exit::<StartArgs, _>(StartArgs::normalize_args(std::env::args()));
    let opts = match StartOptions::try_from(args) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        },
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        },
    };
    let _guard = match init_logger(config.logger.as_ref(), opts.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        },
    };

    match run(&opts, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_open_failure() => {
            report(&e, opts.verbose);
            ExitCode::from(EXIT_OPEN_FAILURE)
        },
        Err(e) => {
            report(&e, opts.verbose);
            ExitCode::FAILURE
        },
    }
}

fn run(opts: &StartOptions, config: &Config) -> Result<(), MaintError> {
    debug!(flags = ?opts.flags, intent = ?opts.intent, "start/stop options resolved");

    let mut transport = SgTransport;
    let mut device = Device::open(&mut transport, &opts.device, true, config.runtime.timeout)?;

    if start_stop_unit(&mut device, &opts.intent)? {
        info!(intent = ?opts.intent, "START STOP UNIT done");
    }
    device.close()
}

fn report(e: &MaintError, verbose: u8) {
    if verbose == 0 && e.wants_verbose_hint() {
        eprintln!("{e}, try with '-v' for more information");
    } else {
        eprintln!("{e}");
    }
}
