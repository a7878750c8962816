//! Device handles: identification, event reading, optional capabilities.
//!
//! A [`DeviceHandle`] owns a transport plus the matching protocol decoder
//! and hands out one [`Event`] per `read_event` call. Decoders can
//! produce several events from one read (a button report with multiple
//! changed bits, a burst of serial packets); the surplus is queued on the
//! handle and drained on subsequent calls.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use sixdof_hid_protocol::{
    AXIS_DEADZONE, AXIS_MAX, AXIS_MIN, LCD_COLUMNS, LCD_DATA_MAX_COLUMNS, LCD_ROWS,
    LOGITECH_VENDOR_ID, ReportDecoder, SPACEPILOT_PRODUCT_ID, UsbDeviceInfo,
    build_lcd_backlight_report, build_lcd_data_report, build_lcd_packed_report,
    build_lcd_position_report, build_led_report, lookup_device,
};
use sixdof_serial_protocol::{
    INPUT_BUFFER_CAPACITY, MAGELLAN_MODE_COMPRESSED, MAGELLAN_PROBE_TIMEOUT,
    MAGELLAN_VERSION_QUERY, MagellanDecoder, PacketFramer, RESET_COMMAND, RESET_PROBE_TIMEOUT,
    SPACEBALL_INIT_COMMANDS, SPACEBALL_RESPONSE_PREAMBLE, SerialModel, SpaceballDecoder,
    guess_model, model_info,
};
use sixdof_types::{AXIS_COUNT, AXIS_NAMES, AxisProperty, Event};

use crate::error::{DeviceError, DeviceResult};
use crate::hid::{parse_usb_selector, probe};
use crate::transport::{HidTransport, SerialTransport};

enum SerialDecoder {
    Spaceball(SpaceballDecoder),
    Magellan {
        model: SerialModel,
        decoder: MagellanDecoder,
    },
}

impl SerialDecoder {
    fn model(&self) -> SerialModel {
        match self {
            SerialDecoder::Spaceball(decoder) => decoder.model(),
            SerialDecoder::Magellan { model, .. } => *model,
        }
    }

    fn parse_packet(
        &mut self,
        id: u8,
        payload: &[u8],
        events: &mut VecDeque<Event>,
    ) -> sixdof_serial_protocol::ProtocolResult<()> {
        match self {
            SerialDecoder::Spaceball(decoder) => decoder.parse_packet(id, payload, events),
            SerialDecoder::Magellan { decoder, .. } => decoder.parse_packet(id, payload, events),
        }
    }
}

struct SerialBackend {
    transport: Box<dyn SerialTransport>,
    framer: PacketFramer,
    decoder: SerialDecoder,
}

struct UsbBackend {
    transport: Box<dyn HidTransport>,
    decoder: ReportDecoder,
    info: &'static UsbDeviceInfo,
    led: bool,
    backlight: bool,
}

impl UsbBackend {
    fn has_lcd(&self) -> bool {
        self.info.vendor_id == LOGITECH_VENDOR_ID
            && self.info.product_id == SPACEPILOT_PRODUCT_ID
    }
}

enum Backend {
    Serial(SerialBackend),
    Usb(UsbBackend),
}

/// An open connection to one 6DoF device.
pub struct DeviceHandle {
    backend: Option<Backend>,
    pending: VecDeque<Event>,
    path: String,
}

impl DeviceHandle {
    /// Open a USB device.
    ///
    /// With no selector the first supported device found wins; a
    /// `"vvvv:pppp"` hex selector restricts the search to one model.
    /// Serial devices are opened through [`DeviceHandle::open_serial`]
    /// instead, since the caller owns the port.
    pub fn open(selector: Option<&str>) -> DeviceResult<Self> {
        let filter = selector.map(parse_usb_selector).transpose()?;
        let (transport, info, path) = probe(filter)?;
        Ok(Self::usb(Box::new(transport), info, path))
    }

    /// Open a USB device over a caller-supplied transport. The (vendor,
    /// product) pair must be in the catalog.
    pub fn with_hid_transport(
        transport: Box<dyn HidTransport>,
        vendor_id: u16,
        product_id: u16,
        path: impl Into<String>,
    ) -> DeviceResult<Self> {
        let info = lookup_device(vendor_id, product_id).ok_or_else(|| {
            DeviceError::DeviceNotFound(format!("{vendor_id:04x}:{product_id:04x}"))
        })?;
        Ok(Self::usb(transport, info, path.into()))
    }

    fn usb(transport: Box<dyn HidTransport>, info: &'static UsbDeviceInfo, path: String) -> Self {
        Self {
            backend: Some(Backend::Usb(UsbBackend {
                transport,
                decoder: ReportDecoder::new(info.layout),
                info,
                led: false,
                backlight: false,
            })),
            pending: VecDeque::new(),
            path,
        }
    }

    /// Identify and set up a serial device on an already-open line.
    ///
    /// Probes with a reset first; a `@1` banner within two seconds marks
    /// a Spaceball, which is then switched to binary mode. Silence (or
    /// anything else) falls through to the Magellan version query with
    /// its shorter timeout. A device that answers neither probe is
    /// reported as not recognized.
    pub fn open_serial(
        mut transport: Box<dyn SerialTransport>,
        path: impl Into<String>,
    ) -> DeviceResult<Self> {
        transport.write(RESET_COMMAND)?;
        let response = read_until_quiet(transport.as_mut(), RESET_PROBE_TIMEOUT)?;
        let banner = String::from_utf8_lossy(&response).into_owned();

        let decoder = if banner.contains(SPACEBALL_RESPONSE_PREAMBLE) {
            let model = guess_model(&banner);
            debug!(?model, banner = %banner.trim(), "identified Spaceball-family device");
            transport.write(SPACEBALL_INIT_COMMANDS)?;
            SerialDecoder::Spaceball(SpaceballDecoder::new(model))
        } else {
            transport.write(MAGELLAN_VERSION_QUERY)?;
            let response = read_until_quiet(transport.as_mut(), MAGELLAN_PROBE_TIMEOUT)?;
            if response.first() != Some(&b'v') {
                return Err(DeviceError::NotRecognized);
            }
            let banner = String::from_utf8_lossy(&response).into_owned();
            let model = guess_model(&banner);
            debug!(?model, banner = %banner.trim(), "identified Magellan-family device");
            transport.write(MAGELLAN_MODE_COMPRESSED)?;
            SerialDecoder::Magellan {
                model,
                decoder: MagellanDecoder::default(),
            }
        };

        Ok(Self {
            backend: Some(Backend::Serial(SerialBackend {
                transport,
                framer: PacketFramer::new(),
                decoder,
            })),
            pending: VecDeque::new(),
            path: path.into(),
        })
    }

    /// Pull the next event, or `None` when the device has nothing new.
    ///
    /// Never blocks: serial reads use a zero timeout and HID reads are
    /// non-blocking. Malformed packets are logged and skipped rather
    /// than surfaced; transport failures are surfaced.
    pub fn read_event(&mut self) -> DeviceResult<Option<Event>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        let backend = self.backend.as_mut().ok_or(DeviceError::Closed)?;
        match backend {
            Backend::Serial(serial) => {
                let mut buf = [0u8; INPUT_BUFFER_CAPACITY];
                let n = serial.transport.read(&mut buf, Duration::ZERO)?;
                if n == 0 {
                    return Ok(None);
                }
                let pending = &mut self.pending;
                let decoder = &mut serial.decoder;
                serial.framer.feed(&buf[..n], |id, payload| {
                    if let Err(err) = decoder.parse_packet(id, payload, pending) {
                        warn!(%err, id = %(id as char), "dropping malformed serial packet");
                    }
                });
            }
            Backend::Usb(usb) => {
                let mut buf = [0u8; 32];
                let n = usb.transport.read_report(&mut buf)?;
                if n == 0 {
                    return Ok(None);
                }
                if let Err(err) = usb.decoder.decode_report(&buf[..n], &mut self.pending) {
                    warn!(%err, "dropping malformed input report");
                }
            }
        }
        Ok(self.pending.pop_front())
    }

    /// Release the transport and drop any queued events. Idempotent;
    /// every other operation on a closed handle fails with
    /// [`DeviceError::Closed`].
    pub fn close(&mut self) {
        self.backend = None;
        self.pending.clear();
    }

    pub fn is_open(&self) -> bool {
        self.backend.is_some()
    }

    /// Platform path or port name this handle was opened on.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Marketing name of the device model. Serial models can be
    /// reclassified by the decoder (the 2.42-firmware Spaceball case),
    /// so this is read live. Empty once closed.
    pub fn name(&self) -> &'static str {
        match &self.backend {
            Some(Backend::Serial(serial)) => model_info(serial.decoder.model()).name,
            Some(Backend::Usb(usb)) => usb.info.name,
            None => "",
        }
    }

    /// USB (vendor, product) pair; `None` for serial devices.
    pub fn usb_ids(&self) -> Option<(u16, u16)> {
        match &self.backend {
            Some(Backend::Usb(usb)) => Some((usb.info.vendor_id, usb.info.product_id)),
            _ => None,
        }
    }

    pub fn axis_count(&self) -> usize {
        AXIS_COUNT
    }

    pub fn axis_name(&self, index: usize) -> Option<&'static str> {
        AXIS_NAMES.get(index).copied()
    }

    /// Range metadata for one axis. Every supported device reports
    /// roughly the same ball/puck range.
    pub fn axis_property(&self, index: usize) -> Option<AxisProperty> {
        AxisProperty::table(AXIS_MIN, AXIS_MAX, AXIS_DEADZONE)
            .get(index)
            .copied()
    }

    pub fn button_count(&self) -> usize {
        match &self.backend {
            Some(Backend::Serial(serial)) => model_info(serial.decoder.model()).button_count,
            Some(Backend::Usb(usb)) => usb.info.button_count,
            None => 0,
        }
    }

    pub fn button_name(&self, index: usize) -> Option<&'static str> {
        match &self.backend {
            Some(Backend::Serial(serial)) => model_info(serial.decoder.model())
                .button_names
                .get(index)
                .copied(),
            Some(Backend::Usb(usb)) => usb.info.button_name(index),
            None => None,
        }
    }

    /// Turn the device LED on or off. USB only.
    pub fn set_led(&mut self, on: bool) -> DeviceResult<()> {
        match self.backend.as_mut().ok_or(DeviceError::Closed)? {
            Backend::Usb(usb) => {
                usb.transport.write_report(&build_led_report(on))?;
                usb.led = on;
                Ok(())
            }
            Backend::Serial(_) => Err(DeviceError::Unsupported),
        }
    }

    /// Last LED state written through this handle. The hardware cannot
    /// be queried.
    pub fn get_led(&self) -> DeviceResult<bool> {
        match self.backend.as_ref().ok_or(DeviceError::Closed)? {
            Backend::Usb(usb) => Ok(usb.led),
            Backend::Serial(_) => Err(DeviceError::Unsupported),
        }
    }

    fn lcd_backend(&mut self) -> DeviceResult<&mut UsbBackend> {
        match self.backend.as_mut().ok_or(DeviceError::Closed)? {
            Backend::Usb(usb) if usb.has_lcd() => Ok(usb),
            _ => Err(DeviceError::Unsupported),
        }
    }

    /// Switch the SpacePilot LCD backlight. Fails with
    /// [`DeviceError::Unsupported`] on anything without the LCD.
    pub fn set_backlight(&mut self, on: bool) -> DeviceResult<()> {
        let usb = self.lcd_backend()?;
        usb.transport
            .send_feature_report(&build_lcd_backlight_report(on))?;
        usb.backlight = on;
        Ok(())
    }

    /// Last backlight state written through this handle.
    pub fn get_backlight(&self) -> DeviceResult<bool> {
        match self.backend.as_ref().ok_or(DeviceError::Closed)? {
            Backend::Usb(usb) if usb.has_lcd() => Ok(usb.backlight),
            _ => Err(DeviceError::Unsupported),
        }
    }

    /// Write raw column data to the SpacePilot LCD starting at
    /// (`column`, `row`). Each byte is one 8-pixel-tall column, LSB at
    /// the top; the write position auto-advances across the row.
    pub fn write_display(&mut self, column: u8, row: u8, columns: &[u8]) -> DeviceResult<()> {
        let usb = self.lcd_backend()?;
        usb.transport
            .send_feature_report(&build_lcd_position_report(column, row)?)?;
        for chunk in columns.chunks(LCD_DATA_MAX_COLUMNS) {
            usb.transport
                .send_feature_report(&build_lcd_data_report(chunk)?)?;
        }
        Ok(())
    }

    /// Fill the whole SpacePilot LCD with one column pattern using the
    /// run-length packed report, one report per row.
    pub fn clear_display(&mut self, pattern: u8) -> DeviceResult<()> {
        let usb = self.lcd_backend()?;
        for row in 0..LCD_ROWS {
            usb.transport
                .send_feature_report(&build_lcd_position_report(0, row)?)?;
            usb.transport.send_feature_report(&build_lcd_packed_report([
                (LCD_COLUMNS, pattern),
                (0, 0),
                (0, 0),
            ]))?;
        }
        Ok(())
    }
}

/// Read until the line goes quiet or `timeout` elapses, accumulating
/// everything received.
fn read_until_quiet(
    transport: &mut dyn SerialTransport,
    timeout: Duration,
) -> DeviceResult<Vec<u8>> {
    let mut response = Vec::new();
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        let mut buf = [0u8; 64];
        let n = transport.read(&mut buf, remaining)?;
        if n == 0 {
            break;
        }
        response.extend_from_slice(&buf[..n]);
    }
    Ok(response)
}
