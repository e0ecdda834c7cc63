use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::io;
use std::result::Result as StdResult;

/// Errors which can occur while resetting the board and handing off to the flasher.
#[derive(Debug)]
pub enum Error {
    /// An error occurred during the raw USB communication, i.e. while enumerating, opening the
    /// board or delivering the reset request.
    DeviceIo(rusb::Error),

    /// The device manager could not be queried for serial devices.
    DeviceManager(io::Error),

    /// No serial device reporting the bootloader's vendor string is attached.
    BootloaderNotFound,

    /// The flashing program could not be located.
    ExecutableNotFound(String),

    /// The flashing program was found but could not be started.
    Dispatch(io::Error),

    /// A status line could not be written.
    Output(io::Error),
}

impl Display for Error {
    fn fmt(&self, fmt: &mut Formatter) -> StdResult<(), std::fmt::Error> {
        match self {
            Error::DeviceIo(err) => write!(fmt, "USB error: {}", err),
            Error::DeviceManager(err) => write!(fmt, "Device manager error: {}", err),
            Error::BootloaderNotFound => fmt.write_str("not found Arduino bootloader"),
            Error::ExecutableNotFound(program) => write!(fmt, "Executable not found: {}", program),
            Error::Dispatch(err) => write!(fmt, "Could not start flasher: {}", err),
            Error::Output(err) => write!(fmt, "Could not write output: {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::DeviceIo(err) => Some(err),
            Error::DeviceManager(err) | Error::Dispatch(err) | Error::Output(err) => Some(err),
            Error::BootloaderNotFound | Error::ExecutableNotFound(_) => None,
        }
    }
}

impl From<rusb::Error> for Error {
    fn from(error: rusb::Error) -> Self {
        Error::DeviceIo(error)
    }
}

/// Shorthand for a Result with the crate's own Error type.
pub type Result<T> = StdResult<T, Error>;
