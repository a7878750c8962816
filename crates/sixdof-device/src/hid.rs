//! hidapi-backed [`HidTransport`] and USB device discovery.

use hidapi::{HidApi, HidDevice};
use tracing::{debug, warn};

use sixdof_hid_protocol::{UsbDeviceInfo, is_known_vendor, lookup_device};

use crate::error::{DeviceError, DeviceResult};
use crate::transport::HidTransport;

/// The HID usage-page/usage pair generic desktop devices use for
/// multi-axis controllers. Devices advertising it are almost certainly
/// 6DoF controllers even when the catalog does not know them.
const USAGE_PAGE_GENERIC_DESKTOP: u16 = 0x01;
const USAGE_MULTI_AXIS_CONTROLLER: u16 = 0x08;

/// [`HidTransport`] over a hidapi device handle. Reads are non-blocking.
pub struct HidApiTransport {
    device: HidDevice,
}

impl HidTransport for HidApiTransport {
    fn read_report(&mut self, buf: &mut [u8]) -> DeviceResult<usize> {
        Ok(self.device.read(buf)?)
    }

    fn write_report(&mut self, data: &[u8]) -> DeviceResult<usize> {
        Ok(self.device.write(data)?)
    }

    fn send_feature_report(&mut self, data: &[u8]) -> DeviceResult<()> {
        Ok(self.device.send_feature_report(data)?)
    }
}

/// Find and open the first supported USB device, optionally restricted
/// to one (vendor, product) pair. Returns the transport, the catalog
/// entry, and the platform device path.
pub fn probe(
    filter: Option<(u16, u16)>,
) -> DeviceResult<(HidApiTransport, &'static UsbDeviceInfo, String)> {
    let api = HidApi::new()?;

    for dev in api.device_list() {
        if let Some((vendor_id, product_id)) = filter {
            if dev.vendor_id() != vendor_id || dev.product_id() != product_id {
                continue;
            }
        }

        if let Some(info) = lookup_device(dev.vendor_id(), dev.product_id()) {
            let path = dev.path().to_string_lossy().into_owned();
            debug!(
                vendor_id = format_args!("{:04x}", dev.vendor_id()),
                product_id = format_args!("{:04x}", dev.product_id()),
                name = info.name,
                path = %path,
                "opening USB device"
            );
            let device = dev.open_device(&api)?;
            device.set_blocking_mode(false)?;
            return Ok((HidApiTransport { device }, info, path));
        }

        if is_known_vendor(dev.vendor_id()) {
            let multi_axis = dev.usage_page() == USAGE_PAGE_GENERIC_DESKTOP
                && dev.usage() == USAGE_MULTI_AXIS_CONTROLLER;
            warn!(
                vendor_id = format_args!("{:04x}", dev.vendor_id()),
                product_id = format_args!("{:04x}", dev.product_id()),
                usage_page = dev.usage_page(),
                usage = dev.usage(),
                multi_axis,
                "HID device from a known vendor is not in the catalog; \
                 please report its ids so it can be added"
            );
        }
    }

    Err(DeviceError::DeviceNotFound(match filter {
        Some((v, p)) => format!("{v:04x}:{p:04x}"),
        None => "no supported USB device present".to_owned(),
    }))
}

/// Parse a `"vvvv:pppp"` hex USB selector.
pub fn parse_usb_selector(selector: &str) -> DeviceResult<(u16, u16)> {
    let parse = |s: &str| -> Option<(u16, u16)> {
        let (vendor, product) = s.split_once(':')?;
        let vendor_id = u16::from_str_radix(vendor, 16).ok()?;
        let product_id = u16::from_str_radix(product, 16).ok()?;
        Some((vendor_id, product_id))
    };
    parse(selector).ok_or_else(|| DeviceError::InvalidSelector(selector.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_usb_selector() {
        assert_eq!(parse_usb_selector("046d:c626").expect("valid"), (0x046D, 0xC626));
        assert_eq!(parse_usb_selector("256F:C62E").expect("valid"), (0x256F, 0xC62E));
    }

    #[test]
    fn test_parse_usb_selector_rejects_garbage() {
        for bad in ["", "046d", "046d:", ":c626", "xyz:c626", "046d:c6260", "/dev/ttyS0"] {
            assert!(
                matches!(
                    parse_usb_selector(bad),
                    Err(DeviceError::InvalidSelector(_))
                ),
                "accepted {bad:?}"
            );
        }
    }
}
