use crate::error::Result;
use log::{debug, warn};
use std::path::PathBuf;

/// A serial device as reported by the device manager.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TtyRecord {
    /// The `ID_VENDOR` property (manufacturer string with spaces replaced by underscores).
    pub vendor: Option<String>,

    /// Device node, e.g. `/dev/ttyACM0`.
    pub devnode: Option<PathBuf>,
}

/// Source of the currently attached TTY-class devices.
pub trait DeviceManager {
    /// Lists TTY devices in the order the device manager provides them.
    fn tty_devices(&mut self) -> Result<Vec<TtyRecord>>;
}

/// Returns the device node of the first TTY device whose vendor equals `expected_vendor`.
///
/// Enumeration order is whatever the device manager hands out. Matches without a device node are
/// skipped.
pub fn find_serial_port<M: DeviceManager + ?Sized>(
    manager: &mut M,
    expected_vendor: &str,
) -> Result<Option<PathBuf>> {
    for record in manager.tty_devices()? {
        if record.vendor.as_deref() != Some(expected_vendor) {
            continue;
        }
        match record.devnode {
            Some(devnode) if !devnode.as_os_str().is_empty() => {
                debug!("{} bootloader at {}", expected_vendor, devnode.display());
                return Ok(Some(devnode));
            }
            _ => warn!("{} device without a device node, skipping", expected_vendor),
        }
    }

    Ok(None)
}

#[cfg(target_os = "linux")]
pub use self::udev_manager::UdevManager;

#[cfg(target_os = "linux")]
mod udev_manager {
    use super::{DeviceManager, TtyRecord};
    use crate::error::{Error, Result};

    /// Queries udev for devices in the `tty` subsystem.
    #[derive(Default)]
    pub struct UdevManager;

    impl UdevManager {
        pub fn new() -> Self {
            UdevManager
        }
    }

    impl DeviceManager for UdevManager {
        fn tty_devices(&mut self) -> Result<Vec<TtyRecord>> {
            let mut enumerator = udev::Enumerator::new().map_err(Error::DeviceManager)?;
            enumerator
                .match_subsystem("tty")
                .map_err(Error::DeviceManager)?;

            let records = enumerator
                .scan_devices()
                .map_err(Error::DeviceManager)?
                .map(|device| TtyRecord {
                    vendor: device
                        .property_value("ID_VENDOR")
                        .and_then(|value| value.to_str())
                        .map(str::to_owned),
                    devnode: device.devnode().map(|path| path.to_path_buf()),
                })
                .collect();

            Ok(records)
        }
    }
}

#[cfg(not(target_os = "linux"))]
pub use self::no_udev::UdevManager;

#[cfg(not(target_os = "linux"))]
mod no_udev {
    use super::{DeviceManager, TtyRecord};
    use crate::error::{Error, Result};
    use std::io;

    /// Stand-in for hosts without udev; every query fails.
    #[derive(Default)]
    pub struct UdevManager;

    impl UdevManager {
        pub fn new() -> Self {
            UdevManager
        }
    }

    impl DeviceManager for UdevManager {
        fn tty_devices(&mut self) -> Result<Vec<TtyRecord>> {
            Err(Error::DeviceManager(io::Error::new(
                io::ErrorKind::Other,
                "udev is only available on Linux",
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Listed(Vec<TtyRecord>);

    impl DeviceManager for Listed {
        fn tty_devices(&mut self) -> Result<Vec<TtyRecord>> {
            Ok(self.0.clone())
        }
    }

    fn tty(vendor: Option<&str>, devnode: Option<&str>) -> TtyRecord {
        TtyRecord {
            vendor: vendor.map(str::to_owned),
            devnode: devnode.map(PathBuf::from),
        }
    }

    #[test]
    fn empty_listing() {
        let mut manager = Listed(vec![]);
        assert_eq!(find_serial_port(&mut manager, "Arduino_LLC").unwrap(), None);
    }

    #[test]
    fn vendor_must_match_exactly() {
        let mut manager = Listed(vec![
            tty(None, Some("/dev/ttyS0")),
            tty(Some("Arduino LLC"), Some("/dev/ttyACM0")),
            tty(Some("arduino_llc"), Some("/dev/ttyACM1")),
        ]);
        assert_eq!(find_serial_port(&mut manager, "Arduino_LLC").unwrap(), None);
    }

    #[test]
    fn skips_match_without_devnode() {
        let mut manager = Listed(vec![
            tty(Some("Arduino_LLC"), None),
            tty(Some("Arduino_LLC"), Some("")),
            tty(Some("Arduino_LLC"), Some("/dev/ttyACM3")),
        ]);
        assert_eq!(
            find_serial_port(&mut manager, "Arduino_LLC").unwrap(),
            Some(PathBuf::from("/dev/ttyACM3"))
        );
    }

    #[test]
    fn first_match_wins() {
        let mut manager = Listed(vec![
            tty(Some("FTDI"), Some("/dev/ttyUSB0")),
            tty(Some("SparkFun_Electronics"), Some("/dev/ttyACM7")),
            tty(Some("SparkFun_Electronics"), Some("/dev/ttyACM2")),
        ]);
        assert_eq!(
            find_serial_port(&mut manager, "SparkFun_Electronics").unwrap(),
            Some(PathBuf::from("/dev/ttyACM7"))
        );
    }
}
