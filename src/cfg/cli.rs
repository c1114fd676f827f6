// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Command-line parsing for the three tools.
//!
//! `sg_reassign` and `sg_start` are clap parsers converted into typed
//! options. `sg_readcap` keeps its single dash long options (`-pmi`,
//! `-lba=`, `-16`) through a hand parser state object built per
//! invocation. Parsing never touches a device: every configuration error
//! surfaces here or in the models before anything is opened.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use crate::{
    cfg::enums::YesNo,
    handlers::read_capacity::CapacityRequest,
    models::{
        error::MaintError,
        reassign::AddressWidth,
        start_stop::{MAX_POWER_CONDITION, StartStopFlag, StartStopIntent},
    },
    utils::parse_hex_arg,
};

pub fn resolve_config_path(rel: &str) -> Result<PathBuf> {
    let p = Path::new(rel);

    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .context("cannot get current working dir")?
            .join(p)
    };

    let canon = abs
        .canonicalize()
        .with_context(|| format!("failed to canonicalize path {abs:?}"))?;

    Ok(canon)
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation<T> {
    Run(T),
    Help,
    Version,
}

enum Step {
    Continue,
    Help,
    Version,
}

fn usage(msg: impl Into<String>) -> MaintError {
    MaintError::Usage(msg.into())
}

// ─────────────────────────────────────────────────────────────────────────────
// sg_readcap [-16] [-b] [-h] [-lba=<block>] [-pmi] [-v] [-V] <device>

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadCapOptions {
    pub sixteen: bool,
    pub brief: bool,
    pub lba: u64,
    pub pmi: bool,
    pub verbose: u8,
    pub device: String,
}

impl ReadCapOptions {
    pub fn capacity_request(&self) -> CapacityRequest {
        CapacityRequest {
            pmi: self.pmi,
            lba: self.lba,
            force_16: self.sixteen,
        }
    }

    /// Placeholder printed on stdout in brief mode when a command failed.
    /// Nothing is printed when the device could not be opened.
    pub fn brief_failure_line(&self, err: &MaintError) -> Option<&'static str> {
        (self.brief && !err.is_open_failure()).then_some("0x0 0x0")
    }
}

#[derive(Debug, Default)]
pub struct ReadCapArgs {
    opts: ReadCapOptions,
    device: Option<String>,
}

impl ReadCapArgs {
    pub fn parse<I, S>(args: I) -> Result<Invocation<ReadCapOptions>, MaintError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = Self::default();
        for arg in args {
            match state.feed(arg.as_ref())? {
                Step::Continue => {},
                Step::Help => return Ok(Invocation::Help),
                Step::Version => return Ok(Invocation::Version),
            }
        }
        state.finish().map(Invocation::Run)
    }

    fn feed(&mut self, arg: &str) -> Result<Step, MaintError> {
        match arg {
            "" => Ok(Step::Continue),
            "--help" => Ok(Step::Help),
            "--version" => Ok(Step::Version),
            _ => match arg.strip_prefix('-') {
                Some(body) => self.option(body),
                None => self.positional(arg),
            },
        }
    }

    fn option(&mut self, body: &str) -> Result<Step, MaintError> {
        let mut rest = body;
        while let Some(&c) = rest.as_bytes().first() {
            if let Some(r) = rest.strip_prefix("16") {
                self.opts.sixteen = true;
                rest = r;
                continue;
            }
            if let Some(r) = rest.strip_prefix("pmi") {
                self.opts.pmi = true;
                rest = r;
                continue;
            }
            match c {
                b'b' => self.opts.brief = true,
                b'v' => self.opts.verbose = self.opts.verbose.saturating_add(1),
                b'V' => return Ok(Step::Version),
                b'h' | b'?' => return Ok(Step::Help),
                _ => break,
            }
            rest = &rest[1..];
        }

        if rest.is_empty() {
            return Ok(Step::Continue);
        }
        match rest.strip_prefix("lba=") {
            Some(value) => {
                self.opts.lba = parse_hex_arg(value)
                    .ok_or_else(|| usage("Bad value after 'lba=' option"))?;
                Ok(Step::Continue)
            },
            None => Err(usage(format!("Unrecognized option: {rest}"))),
        }
    }

    fn positional(&mut self, arg: &str) -> Result<Step, MaintError> {
        match &self.device {
            None => {
                self.device = Some(arg.to_string());
                Ok(Step::Continue)
            },
            Some(first) => Err(usage(format!(
                "too many arguments, got: {first}, not expecting: {arg}"
            ))),
        }
    }

    fn finish(self) -> Result<ReadCapOptions, MaintError> {
        let device = self
            .device
            .ok_or_else(|| usage("No <device> argument given"))?;
        let opts = ReadCapOptions {
            device,
            ..self.opts
        };
        opts.capacity_request().validate()?;
        Ok(opts)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// sg_reassign --address=<n>[,<n>...] [--dummy] [--eight=0|1] [--grown]
//             [--help] [--longlist=0|1] [--verbose] [--version] <device>

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReassignOptions {
    /// Raw `--address` value; `-` selects stdin.
    pub address: Option<String>,
    pub dummy: bool,
    pub eight: Option<AddressWidth>,
    pub grown: bool,
    pub long_list: bool,
    pub verbose: u8,
    pub device: String,
}

#[derive(Parser, Debug)]
#[command(
    name = "sg_reassign",
    version,
    about = "Perform a REASSIGN BLOCKS command (or READ DEFECT DATA with --grown)"
)]
pub struct ReassignArgs {
    /// Comma separated logical block addresses (at least one required).
    /// '-' reads them from stdin, one or more per line
    #[arg(
        short,
        long,
        value_name = "A,A...",
        required_unless_present = "grown",
        conflicts_with = "grown"
    )]
    address: Option<String>,

    /// Prepare but do not execute REASSIGN BLOCKS
    #[arg(short, long)]
    dummy: bool,

    /// Force eight byte (64 bit) lbas when 1, four byte (32 bit) when 0
    #[arg(short, long, value_name = "0|1")]
    eight: Option<YesNo>,

    /// Fetch grown defect list length, don't reassign
    #[arg(short, long)]
    grown: bool,

    /// Use 4 byte list length when 1, 2 byte when 0
    #[arg(short = 'l', long = "longlist", value_name = "0|1", default_value = "0")]
    long_list: YesNo,

    /// Increase verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// sg device (or block device with SG_IO support)
    device: String,
}

impl From<ReassignArgs> for ReassignOptions {
    fn from(args: ReassignArgs) -> Self {
        Self {
            address: args.address,
            dummy: args.dummy,
            eight: args.eight.map(|e| e.as_bool().into()),
            grown: args.grown,
            long_list: args.long_list.as_bool(),
            verbose: args.verbose,
            device: args.device,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// sg_start [0|--stop|1|--start] [--eject] [--fl=<n>] [--imm=0|1] [--load]
//          [--loej] [--pc=<n>] [-v] [-V] <device>

/// Names `sg_start` also accepts behind a single dash (`-eject`, `-pc=3`).
const START_LONG_NAMES: &[&str] = &[
    "eject", "fl=", "imm=", "load", "loej", "pc=", "start", "stop",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOptions {
    /// Flags that were given, in [`StartStopFlag`] declaration order.
    pub flags: Vec<StartStopFlag>,
    pub intent: StartStopIntent,
    pub verbose: u8,
    pub device: String,
}

#[derive(Parser, Debug)]
#[command(
    name = "sg_start",
    version,
    about = "Performs a START STOP UNIT SCSI command",
    after_help = "Example: 'sg_start --stop /dev/sdb' stops unit\n         \
                  'sg_start --eject /dev/scd0' stops unit and ejects medium",
    args_override_self = true
)]
pub struct StartArgs {
    /// Stop then eject the medium
    #[arg(long)]
    eject: bool,

    /// Format layer number (mmc5), in hex
    #[arg(long = "fl", value_name = "n", value_parser = parse_format_layer)]
    format_layer: Option<u32>,

    /// 0 -> await completion (def), 1 -> return immediately
    #[arg(long, value_name = "0|1")]
    imm: Option<YesNo>,

    /// Load then start the medium
    #[arg(long)]
    load: bool,

    /// Load the medium if '--start' is also given, or stop unit and eject
    #[arg(long)]
    loej: bool,

    /// Power condition in hex (0 -> none, 1 -> active, 2 -> idle,
    /// 3 -> standby, 5 -> sleep)
    #[arg(long, value_name = "n", value_parser = parse_power_condition)]
    pc: Option<u8>,

    /// Start unit (same as '1')
    #[arg(long)]
    start: bool,

    /// Stop unit (same as '0')
    #[arg(long)]
    stop: bool,

    /// Print out SCSI commands
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Optional '0' (stop) or '1' (start) followed by the device
    #[arg(value_name = "[0|1] DEVICE", required = true)]
    operands: Vec<String>,
}

impl StartArgs {
    /// Rewrite single dash spellings of the long options (`-eject`,
    /// `-fl=2`) to their `--` form.
    pub fn normalize_args<I>(args: I) -> Vec<String>
    where I: IntoIterator<Item = String> {
        args.into_iter()
            .map(|arg| match arg.strip_prefix('-') {
                Some(body)
                    if !body.starts_with('-')
                        && START_LONG_NAMES.iter().any(|n| body.starts_with(n)) =>
                {
                    format!("-{arg}")
                },
                _ => arg,
            })
            .collect()
    }

    fn flags(&self) -> Vec<StartStopFlag> {
        [
            self.eject.then_some(StartStopFlag::Eject),
            self.format_layer.map(StartStopFlag::FormatLayer),
            self.imm.map(|imm| StartStopFlag::Immediate(imm.as_bool())),
            self.load.then_some(StartStopFlag::Load),
            self.loej.then_some(StartStopFlag::LoadEjectBit),
            self.pc.map(StartStopFlag::PowerCondition),
            self.start.then_some(StartStopFlag::Start),
            self.stop.then_some(StartStopFlag::Stop),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl TryFrom<StartArgs> for StartOptions {
    type Error = MaintError;

    fn try_from(args: StartArgs) -> Result<Self, MaintError> {
        let mut flags = args.flags();
        let device = match args.operands.as_slice() {
            [device] => device.clone(),
            [action, device] => {
                flags.push(match action.as_str() {
                    "0" => StartStopFlag::Stop,
                    "1" => StartStopFlag::Start,
                    other => {
                        return Err(usage(format!(
                            "too many arguments, got: {other}, not expecting: {device}"
                        )));
                    },
                });
                device.clone()
            },
            [] => return Err(usage("No <scsi_device> argument given")),
            [.., last] => {
                return Err(usage(format!("too many arguments, not expecting: {last}")));
            },
        };
        let intent = StartStopIntent::resolve(flags.iter().copied())?;
        Ok(StartOptions {
            flags,
            intent,
            verbose: args.verbose,
            device,
        })
    }
}

fn parse_format_layer(value: &str) -> Result<u32, String> {
    parse_hex_arg(value)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| format!("bad format layer {value:?}, expected hex"))
}

fn parse_power_condition(value: &str) -> Result<u8, String> {
    match parse_hex_arg(value) {
        Some(n) if n <= u64::from(MAX_POWER_CONDITION) => Ok(n as u8),
        _ => Err(format!(
            "bad power condition {value:?}, expected hex 0 to {MAX_POWER_CONDITION:x}"
        )),
    }
}

/// Parse clap arguments for a tool.
///
/// Help and version print and exit 0. Any other command line error prints
/// clap's diagnostic and exits 1.
pub fn parse_or_exit<T, I>(args: I) -> T
where
    T: Parser,
    I: IntoIterator<Item = String>,
{
    match T::try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1)
        },
        Err(e) => e.exit(),
    }
}
