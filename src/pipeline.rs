use crate::context::DeviceLocator;
use crate::error::{Error, Result};
use crate::flasher::{Dispatcher, Invocation};
use crate::serial::{find_serial_port, DeviceManager};
use crate::target::TargetConfig;
use crate::target_handle::ResetTarget;
use log::{debug, info};
use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Interval between serial queries while polling for the bootloader.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Suspends the pipeline.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

#[derive(Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration)
    }
}

/// Runs the whole reset-and-flash sequence against a set of collaborators.
pub struct Provisioner<L, M, D, S, O> {
    pub config: TargetConfig,
    pub locator: L,
    pub manager: M,
    pub dispatcher: D,
    pub sleeper: S,

    /// Receives the user-facing status lines.
    pub out: O,
}

impl<L, M, D, S, O> Provisioner<L, M, D, S, O>
where
    L: DeviceLocator,
    M: DeviceManager,
    D: Dispatcher,
    S: Sleeper,
    O: Write,
{
    /// Resets the board if it is still in its normal identity, finds the bootloader's serial port
    /// and hands `firmware` to the flasher. Returns the flasher's exit code if the dispatcher
    /// returns at all.
    pub fn run<F: AsRef<OsStr>>(&mut self, firmware: F) -> Result<i32> {
        self.reset_board()?;

        let serial_port = self.resolve_serial_port()?.ok_or(Error::BootloaderNotFound)?;
        info!("bootloader serial port: {}", serial_port.display());

        let invocation = Invocation::new(&self.config.flasher, &serial_port, firmware.as_ref());
        self.dispatcher.dispatch(&invocation)
    }

    /// Sends the reset request and waits for the board to come back. Returns whether the board was
    /// found.
    pub fn reset_board(&mut self) -> Result<bool> {
        let config = &self.config;
        let handle = self
            .locator
            .find_device(config.vendor_id, config.product_id)?;

        let mut handle = match handle {
            Some(handle) => handle,
            None => {
                debug!(
                    "no {:04x}:{:04x} present, assuming bootloader mode",
                    config.vendor_id, config.product_id
                );
                return Ok(false);
            }
        };

        writeln!(self.out, "Found DevBoard: resetting").map_err(Error::Output)?;
        handle.reset(config.request_type(), config.request)?;
        // Close the handle before the board drops off the bus
        drop(handle);

        info!("waiting {:?} for the bootloader", config.reset_delay);
        self.sleeper.sleep(config.reset_delay);
        Ok(true)
    }

    /// Looks for the bootloader's serial port once, then keeps polling until `poll_timeout` has
    /// been spent.
    pub fn resolve_serial_port(&mut self) -> Result<Option<PathBuf>> {
        let vendor = self.config.bootloader_vendor.as_str();
        let mut waited = Duration::from_secs(0);

        loop {
            if let Some(port) = find_serial_port(&mut self.manager, vendor)? {
                return Ok(Some(port));
            }
            if waited >= self.config.poll_timeout {
                return Ok(None);
            }
            self.sleeper.sleep(POLL_INTERVAL);
            waited += POLL_INTERVAL;
        }
    }
}
