//! This crate resets a USB development board into its bootloader and hands the bootloader's serial
//! port over to an external flashing program (avrdude).
//!
//! # Example: Reset and flash
//! ```rust, no_run
//! use bootkick::{Context, ExecDispatcher, Provisioner, TargetConfig, ThreadSleeper, UdevManager};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut provisioner = Provisioner {
//!     config: TargetConfig::arduino(),
//!     locator: Context::new()?,
//!     manager: UdevManager::new(),
//!     dispatcher: ExecDispatcher,
//!     sleeper: ThreadSleeper,
//!     out: std::io::stdout(),
//! };
//!
//! // Only returns if avrdude could not be started
//! provisioner.run("usbdev.hex")?;
//! # Ok(())
//! # }
//! ```
//!
//! Every collaborator sits behind a trait ([`DeviceLocator`], [`DeviceManager`], [`Dispatcher`],
//! [`Sleeper`]) so the sequence can be driven without hardware.
//!
//! [`DeviceLocator`]: trait.DeviceLocator.html
//! [`DeviceManager`]: trait.DeviceManager.html
//! [`Dispatcher`]: trait.Dispatcher.html
//! [`Sleeper`]: trait.Sleeper.html

extern crate rusb;

mod context;
mod error;
mod flasher;
mod pipeline;
mod serial;
mod target;
mod target_handle;

pub use context::{Context, DeviceLocator};
pub use error::{Error, Result};
pub use flasher::{Dispatcher, ExecDispatcher, Invocation};
pub use pipeline::{Provisioner, Sleeper, ThreadSleeper, POLL_INTERVAL};
pub use serial::{find_serial_port, DeviceManager, TtyRecord, UdevManager};
pub use target::{
    FlasherConfig, RequestScope, TargetConfig, Variant, DEFAULT_FIRMWARE, DEFAULT_PRODUCT_ID,
    DEFAULT_VENDOR_ID, RESET_REQUEST,
};
pub use target_handle::{ResetTarget, TargetHandle};

/// Timeout for the reset control transfer.
const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(1);
