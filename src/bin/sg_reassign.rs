// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::process::ExitCode;

use scsi_maint::{
    cfg::{
        cli::{ReassignArgs, ReassignOptions, parse_or_exit},
        config::Config,
        logger::init_logger,
    },
    handlers::reassign::{grown_defect_count, reassign_blocks},
    models::{
        defect_list::DefectListFormat,
        error::MaintError,
        reassign::{ReassignBlockBuilder, ReassignParameterBlock},
    },
    transport::{Device, sg::SgTransport},
    utils::hex_dump,
};
use tracing::info;

enum Plan {
    Grown,
    Reassign(ReassignParameterBlock),
}

fn main() -> ExitCode {
    let opts: ReassignOptions = parse_or_exit::<ReassignArgs, _>(std::env::args()).into();

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

    // Nothing touches the device until the address list is known to be good.
    let plan = match prepare(&opts, &config) {
        Ok(plan) => plan,
        Err(e) => {
            report(&e, opts.verbose);
            return ExitCode::FAILURE;
        },
    };

    match run(&opts, &config, &plan) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e, opts.verbose);
            ExitCode::FAILURE
        },
    }
}

fn prepare(opts: &ReassignOptions, config: &Config) -> Result<Plan, MaintError> {
    let Some(arg) = opts.address.as_deref() else {
        return Ok(Plan::Grown);
    };

    let list = config
        .runtime
        .lba_parser()
        .parse_argument(arg, std::io::stdin().lock())?;
    if list.is_empty() {
        return Err(MaintError::Usage(
            "need at least one address (see '--address=')".to_string(),
        ));
    }
    info!(addresses = %list, "address list parsed");

    let mut builder = ReassignBlockBuilder::new().long_list(opts.long_list);
    if let Some(width) = opts.eight {
        builder = builder.width(width);
    }
    builder.build(&list).map(Plan::Reassign)
}

fn run(opts: &ReassignOptions, config: &Config, plan: &Plan) -> Result<(), MaintError> {
    let mut transport = SgTransport;
    let mut device = Device::open(&mut transport, &opts.device, true, config.runtime.timeout)?;

    match plan {
        Plan::Grown => {
            let summary = grown_defect_count(&mut device, DefectListFormat::DEFAULT)?;
            println!(">> {summary}");
        },
        Plan::Reassign(block) if opts.dummy => {
            eprintln!(">>> dummy: REASSIGN BLOCKS not executed");
            info!(
                addresses = block.address_count(),
                parameters = %hex_dump(block.as_bytes()),
                "prepared REASSIGN BLOCKS parameter list"
            );
        },
        Plan::Reassign(block) => reassign_blocks(&mut device, block)?,
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
