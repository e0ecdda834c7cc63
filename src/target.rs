use std::time::Duration;

/// Vendor ID of the board in its normal (pre-bootloader) USB identity.
pub const DEFAULT_VENDOR_ID: u16 = 0x03eb;

/// Product ID of the board in its normal (pre-bootloader) USB identity.
pub const DEFAULT_PRODUCT_ID: u16 = 0x2040;

/// Request code the board's firmware interprets as "jump to bootloader".
pub const RESET_REQUEST: u8 = 0x01;

/// Firmware image handed to the flasher when none is given.
pub const DEFAULT_FIRMWARE: &str = "usbdev.hex";

/// Known board variants. They differ in how the reset request is scoped, how long the board takes
/// to come back and which manufacturer string its bootloader reports.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Variant {
    /// Class-scoped reset, 4 s settle time, `Arduino_LLC` bootloader.
    Arduino,

    /// Vendor-scoped reset, 5 s settle time, `SparkFun_Electronics` bootloader.
    SparkFun,
}

/// Scope of the reset control request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RequestScope {
    Class,
    Vendor,
}

impl RequestScope {
    /// The `bmRequestType` of a host-to-device request with this scope, addressed to the device.
    pub fn request_type(self) -> u8 {
        let scope = match self {
            RequestScope::Class => rusb::RequestType::Class,
            RequestScope::Vendor => rusb::RequestType::Vendor,
        };
        rusb::request_type(rusb::Direction::Out, scope, rusb::Recipient::Device)
    }
}

/// Everything needed to find the board, reset it and recognise it afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetConfig {
    /// USB vendor ID before the reset.
    pub vendor_id: u16,

    /// USB product ID before the reset.
    pub product_id: u16,

    /// Scope of the reset request.
    pub request_scope: RequestScope,

    /// Request code of the reset request.
    pub request: u8,

    /// Blind wait after the reset request.
    pub reset_delay: Duration,

    /// Manufacturer string the bootloader's serial device reports.
    pub bootloader_vendor: String,

    /// How long to keep looking for the bootloader after the first miss. Zero disables polling.
    pub poll_timeout: Duration,

    /// The external programmer invocation.
    pub flasher: FlasherConfig,
}

impl TargetConfig {
    pub fn arduino() -> Self {
        Self {
            vendor_id: DEFAULT_VENDOR_ID,
            product_id: DEFAULT_PRODUCT_ID,
            request_scope: RequestScope::Class,
            request: RESET_REQUEST,
            reset_delay: Duration::from_secs(4),
            bootloader_vendor: "Arduino_LLC".to_owned(),
            poll_timeout: Duration::from_secs(0),
            flasher: FlasherConfig::default(),
        }
    }

    pub fn sparkfun() -> Self {
        Self {
            request_scope: RequestScope::Vendor,
            reset_delay: Duration::from_secs(5),
            bootloader_vendor: "SparkFun_Electronics".to_owned(),
            ..Self::arduino()
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Arduino => Self::arduino(),
            Variant::SparkFun => Self::sparkfun(),
        }
    }

    /// `bmRequestType` of the reset request.
    pub fn request_type(&self) -> u8 {
        self.request_scope.request_type()
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self::arduino()
    }
}

/// The external programmer and the fixed parts of its command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlasherConfig {
    /// Program name, looked up in `PATH`.
    pub program: String,

    /// Value of `-c`.
    pub programmer: String,

    /// Value of `-p`.
    pub part: String,
}

impl Default for FlasherConfig {
    fn default() -> Self {
        Self {
            program: "avrdude".to_owned(),
            programmer: "avr109".to_owned(),
            part: "m32u4".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_types() {
        assert_eq!(RequestScope::Class.request_type(), 0x20);
        assert_eq!(RequestScope::Vendor.request_type(), 0x40);
    }

    #[test]
    fn variants_differ_only_in_reset_details() {
        let arduino = TargetConfig::for_variant(Variant::Arduino);
        let sparkfun = TargetConfig::for_variant(Variant::SparkFun);

        assert_eq!(arduino.vendor_id, sparkfun.vendor_id);
        assert_eq!(arduino.product_id, sparkfun.product_id);
        assert_eq!(arduino.request, sparkfun.request);
        assert_eq!(arduino.flasher, sparkfun.flasher);

        assert_eq!(arduino.request_type(), 0x20);
        assert_eq!(arduino.reset_delay, Duration::from_secs(4));
        assert_eq!(arduino.bootloader_vendor, "Arduino_LLC");

        assert_eq!(sparkfun.request_type(), 0x40);
        assert_eq!(sparkfun.reset_delay, Duration::from_secs(5));
        assert_eq!(sparkfun.bootloader_vendor, "SparkFun_Electronics");
    }

    #[test]
    fn default_is_arduino() {
        let config = TargetConfig::default();
        assert_eq!(config, TargetConfig::arduino());
        assert_eq!((config.vendor_id, config.product_id), (0x03eb, 0x2040));
        assert_eq!(config.poll_timeout, Duration::from_secs(0));
    }
}
