use super::error::Result;
use super::target_handle::{ResetTarget, TargetHandle};
use log::debug;
use rusb::UsbContext;

/// Looks up the board on the host's USB bus.
pub trait DeviceLocator {
    type Handle: ResetTarget;

    /// Returns an opened handle to the first device with the given IDs, or `None` if there is no
    /// such device. Not finding the board is expected when it is already in its bootloader.
    fn find_device(&mut self, vendor_id: u16, product_id: u16) -> Result<Option<Self::Handle>>;
}

pub struct Context<T: UsbContext = rusb::Context> {
    pub usb_context: T,
}

impl Context {
    pub fn new() -> Result<Self> {
        let usb_context = rusb::Context::new()?;
        Ok(Context { usb_context })
    }
}

impl<T: UsbContext> Context<T> {
    pub fn with_usb_context(usb_context: T) -> Self {
        Context { usb_context }
    }
}

impl<T: UsbContext> DeviceLocator for Context<T> {
    type Handle = TargetHandle<T>;

    fn find_device(&mut self, vendor_id: u16, product_id: u16) -> Result<Option<Self::Handle>> {
        for device in self.usb_context.devices()?.iter() {
            let descriptor = device.device_descriptor()?;
            if descriptor.vendor_id() == vendor_id && descriptor.product_id() == product_id {
                debug!(
                    "found {:04x}:{:04x} on bus {} address {}",
                    vendor_id,
                    product_id,
                    device.bus_number(),
                    device.address()
                );
                return TargetHandle::from_usb_device(device).map(Some);
            }
        }

        Ok(None)
    }
}
