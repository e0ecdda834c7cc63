//! Resets the board into its bootloader and flashes it with avrdude.
//!
//! Usage:
//!   bootkick                       # flashes usbdev.hex
//!   bootkick firmware.hex
//!   bootkick --variant sparkfun --poll-timeout 5 firmware.hex

use std::ffi::OsString;
use std::io::{self, Write};
use std::process;
use std::time::Duration;

use anyhow::{Context as _, Result};
use bootkick::{
    Context, Error, ExecDispatcher, Provisioner, TargetConfig, ThreadSleeper, UdevManager,
    Variant, DEFAULT_FIRMWARE,
};
use clap::{Parser, ValueEnum};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "bootkick")]
#[command(about = "Reset a USB development board into its bootloader and flash it with avrdude")]
struct Cli {
    /// Firmware image passed to the flasher
    #[arg(
        value_name = "FIRMWARE",
        default_value = DEFAULT_FIRMWARE,
        value_parser = clap::value_parser!(OsString)
    )]
    firmware: OsString,

    /// Board variant, selects reset request scope, settle time and bootloader vendor string
    #[arg(long, value_enum, default_value = "arduino")]
    variant: BoardVariant,

    /// USB vendor ID of the board before the reset (hex with 0x prefix or decimal)
    #[arg(long, value_parser = parse_hex_16)]
    vid: Option<u16>,

    /// USB product ID of the board before the reset (hex with 0x prefix or decimal)
    #[arg(long, value_parser = parse_hex_16)]
    pid: Option<u16>,

    /// Flashing program to run instead of avrdude
    #[arg(long, value_name = "PROGRAM")]
    flasher: Option<String>,

    /// Keep looking for the bootloader for this many seconds after the first miss
    #[arg(long, value_name = "SECONDS", default_value = "0")]
    poll_timeout: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BoardVariant {
    Arduino,
    Sparkfun,
}

impl From<BoardVariant> for Variant {
    fn from(variant: BoardVariant) -> Self {
        match variant {
            BoardVariant::Arduino => Variant::Arduino,
            BoardVariant::Sparkfun => Variant::SparkFun,
        }
    }
}

impl Cli {
    fn target_config(&self) -> Result<TargetConfig> {
        let mut config = TargetConfig::for_variant(self.variant.into());
        if let Some(vid) = self.vid {
            config.vendor_id = vid;
        }
        if let Some(pid) = self.pid {
            config.product_id = pid;
        }
        if let Some(flasher) = &self.flasher {
            config.flasher.program = flasher.clone();
        }
        config.poll_timeout = Duration::try_from_secs_f64(self.poll_timeout)
            .with_context(|| format!("Invalid poll timeout {}", self.poll_timeout))?;
        Ok(config)
    }
}

fn parse_hex_16(input: &str) -> Result<u16, std::num::ParseIntError> {
    if let Some(hex) = input.strip_prefix("0x") {
        u16::from_str_radix(hex, 16)
    } else {
        input.parse::<u16>()
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    log::debug!("{:?}", cli);

    let mut provisioner = Provisioner {
        config: cli.target_config()?,
        locator: Context::new().context("Couldn't open system usb")?,
        manager: UdevManager::new(),
        dispatcher: ExecDispatcher,
        sleeper: ThreadSleeper,
        out: io::stdout(),
    };

    let result = provisioner.run(&cli.firmware);
    let code = exit_code(result, &mut io::stdout())?;
    process::exit(code)
}

/// Maps the outcome of a run to the process exit code. A missing bootloader is reported on `out`
/// and exits with 1; every other error is passed on.
fn exit_code<W: Write>(result: bootkick::Result<i32>, out: &mut W) -> Result<i32> {
    match result {
        Ok(code) => Ok(code),
        Err(Error::BootloaderNotFound) => {
            writeln!(out, "{}", Error::BootloaderNotFound)?;
            Ok(1)
        }
        Err(error) => Err(error).context("Flashing failed"),
    }
}
