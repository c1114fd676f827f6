// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::process::ExitCode;

use scsi_maint::{
    cfg::{
        cli::{Invocation, ReadCapArgs, ReadCapOptions},
        config::Config,
        logger::init_logger,
    },
    handlers::read_capacity::read_capacity,
    models::{capacity::CapacityResult, error::MaintError},
    transport::{Device, sg::SgTransport},
};
use tracing::info;

const USAGE: &str = "\
Usage: sg_readcap [-16] [-b] [-h] [-lba=<block>] [-pmi] [-v] [-V] <device>
  where:
    -16    use READ CAPACITY (16) cdb (def: use 10 byte cdb)
    -b     brief, two hex numbers: number of blocks and block size
    -h     output this usage message and exit
    -lba=<block>  yields the last block prior to (head movement) delay
                  after <block>. In hex (def: 0). Valid only with '-pmi'
    -pmi   partial medium indicator (without this switch shows total
           disk capacity)
    -v     increase verbosity
    -V     output version string and exit
    <device>  sg device (or block device with SG_IO support)

Perform a READ CAPACITY command on a SCSI device. Environment variable
SCSI_MAINT_CONFIG may name a YAML config file.";

fn main() -> ExitCode {
    let opts = match ReadCapArgs::parse(std::env::args().skip(1)) {
        Ok(Invocation::Run(opts)) => opts,
        Ok(Invocation::Help) => {
            eprintln!("{USAGE}");
            return ExitCode::SUCCESS;
        },
        Ok(Invocation::Version) => {
            eprintln!("sg_readcap {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        },
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
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
        Ok(result) => {
            if opts.brief {
                println!("{}", result.brief());
            } else {
                println!("{result}");
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            if let Some(line) = opts.brief_failure_line(&e) {
                println!("{line}");
            }
            report(&e, opts.verbose);
            ExitCode::FAILURE
        },
    }
}

fn run(opts: &ReadCapOptions, config: &Config) -> Result<CapacityResult, MaintError> {
    let request = opts.capacity_request();
    let mut transport = SgTransport;
    // READ CAPACITY (16) needs a writable handle on some kernels
    let mut device = Device::open(
        &mut transport,
        &opts.device,
        request.needs_sixteen(),
        config.runtime.timeout,
    )?;

    let result = read_capacity(&mut device, &request)?;
    info!(
        device = device.path(),
        variant = ?result.variant,
        blocks = %result.number_of_blocks(),
        block_size = result.block_size,
        "capacity read"
    );
    device.close()?;
    Ok(result)
}

fn report(e: &MaintError, verbose: u8) {
    if verbose == 0 && e.wants_verbose_hint() {
        eprintln!("{e}, try with '-v' for more information");
    } else {
        eprintln!("{e}");
    }
}
