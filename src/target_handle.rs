use crate::error::Result;
use crate::TIMEOUT;
use log::debug;
use rusb::{DeviceHandle, UsbContext};

/// Something the reset request can be delivered to.
pub trait ResetTarget {
    /// Sends a single host-to-device control request without payload.
    fn reset(&mut self, request_type: u8, request: u8) -> Result<()>;
}

/// An opened board in its normal (pre-bootloader) USB identity.
pub struct TargetHandle<T: UsbContext> {
    // USB device handle for the raw communication.
    pub(crate) usb_device_handle: DeviceHandle<T>,
}

impl<T: UsbContext> TargetHandle<T> {
    pub(crate) fn from_usb_device(device: rusb::Device<T>) -> Result<Self> {
        let usb_device_handle = device.open()?;
        Ok(Self { usb_device_handle })
    }
}

impl<T: UsbContext> ResetTarget for TargetHandle<T> {
    fn reset(&mut self, request_type: u8, request: u8) -> Result<()> {
        debug!(
            "control transfer: bmRequestType={:#04x} bRequest={:#04x}",
            request_type, request
        );
        self.usb_device_handle
            .write_control(request_type, request, 0, 0, &[0u8; 0], TIMEOUT)?;
        Ok(())
    }
}
