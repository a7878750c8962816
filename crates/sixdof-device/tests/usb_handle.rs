//! USB handle behavior against a scripted HID transport.

use sixdof_device::transport::mock::MockHidTransport;
use sixdof_device::{DeviceError, DeviceHandle};
use sixdof_types::Event;

fn open_device(vendor_id: u16, product_id: u16) -> (MockHidTransport, DeviceHandle) {
    let mock = MockHidTransport::new();
    let handle =
        DeviceHandle::with_hid_transport(Box::new(mock.clone()), vendor_id, product_id, "mock:0")
            .expect("catalog device");
    (mock, handle)
}

fn axes_report(id: u8, axes: &[i16]) -> Vec<u8> {
    let mut report = vec![id];
    for v in axes {
        report.extend_from_slice(&v.to_le_bytes());
    }
    report
}

#[test]
fn test_metadata_from_catalog() {
    let (_mock, handle) = open_device(0x046D, 0xC626);
    assert_eq!(handle.name(), "SpaceNavigator");
    assert_eq!(handle.usb_ids(), Some((0x046D, 0xC626)));
    assert_eq!(handle.path(), "mock:0");
    assert_eq!(handle.button_count(), 2);
    assert_eq!(handle.button_name(0), Some("MENU"));
    assert_eq!(handle.button_name(2), None);
    assert_eq!(handle.axis_count(), 6);
    assert_eq!(handle.axis_name(3), Some("Rx"));
    let prop = handle.axis_property(0).expect("axis 0");
    assert_eq!((prop.min, prop.max, prop.deadzone), (-512, 511, 0));
}

#[test]
fn test_unknown_device_rejected() {
    let mock = MockHidTransport::new();
    let result = DeviceHandle::with_hid_transport(Box::new(mock), 0x046D, 0x0001, "mock:1");
    assert!(matches!(result, Err(DeviceError::DeviceNotFound(_))));
}

#[test]
fn test_invalid_selector_rejected_before_probing() {
    assert!(matches!(
        DeviceHandle::open(Some("/dev/ttyS0")),
        Err(DeviceError::InvalidSelector(_))
    ));
}

#[test]
fn test_split_reports_merge_into_snapshots() {
    let (mock, mut handle) = open_device(0x046D, 0xC626);

    mock.queue_report(axes_report(1, &[5, -6, 7]));
    mock.queue_report(axes_report(2, &[-1, 2, -3]));

    assert_eq!(
        handle.read_event().expect("read"),
        Some(Event::Motion {
            axes: [5, -6, 7, 0, 0, 0],
            period: 0,
        })
    );
    assert_eq!(
        handle.read_event().expect("read"),
        Some(Event::Motion {
            axes: [5, -6, 7, -1, 2, -3],
            period: 0,
        })
    );
    assert_eq!(handle.read_event().expect("read"), None);
}

#[test]
fn test_combined_report_device() {
    let (mock, mut handle) = open_device(0x256F, 0xC62E);
    assert_eq!(handle.name(), "SpaceMouse Wireless (cabled)");

    mock.queue_report(axes_report(1, &[1, 2, 3, 4, 5, 6]));
    assert_eq!(
        handle.read_event().expect("read"),
        Some(Event::Motion {
            axes: [1, 2, 3, 4, 5, 6],
            period: 0,
        })
    );
}

#[test]
fn test_button_edges_one_event_per_call() {
    let (mock, mut handle) = open_device(0x046D, 0xC621);

    mock.queue_report(vec![3, 0b0000_0101, 0, 0, 0, 0, 0]);
    assert_eq!(
        handle.read_event().expect("read"),
        Some(Event::Button { index: 0, pressed: true })
    );
    assert_eq!(
        handle.read_event().expect("read"),
        Some(Event::Button { index: 2, pressed: true })
    );

    mock.queue_report(vec![3, 0b0000_0100, 0, 0, 0, 0, 0]);
    assert_eq!(
        handle.read_event().expect("read"),
        Some(Event::Button { index: 0, pressed: false })
    );
    assert_eq!(handle.read_event().expect("read"), None);
}

#[test]
fn test_malformed_report_skipped() {
    let (mock, mut handle) = open_device(0x256F, 0xC62E);

    mock.queue_report(vec![1, 0x22]);
    mock.queue_report(axes_report(1, &[0, 0, 0, 0, 0, 9]));

    // Short report is dropped with a warning, not surfaced.
    assert_eq!(handle.read_event().expect("read"), None);
    assert_eq!(
        handle.read_event().expect("read"),
        Some(Event::Motion {
            axes: [0, 0, 0, 0, 0, 9],
            period: 0,
        })
    );
}

#[test]
fn test_led_control() {
    let (mock, mut handle) = open_device(0x046D, 0xC626);

    assert_eq!(handle.get_led().expect("query"), false);
    handle.set_led(true).expect("set");
    assert_eq!(handle.get_led().expect("query"), true);
    handle.set_led(false).expect("set");

    assert_eq!(mock.write_history(), vec![vec![0x04, 0x01], vec![0x04, 0x00]]);
}

#[test]
fn test_lcd_unsupported_without_spacepilot() {
    let (_mock, mut handle) = open_device(0x046D, 0xC626);
    assert!(matches!(
        handle.set_backlight(true),
        Err(DeviceError::Unsupported)
    ));
    assert!(matches!(
        handle.get_backlight(),
        Err(DeviceError::Unsupported)
    ));
    assert!(matches!(
        handle.write_display(0, 0, &[0xFF]),
        Err(DeviceError::Unsupported)
    ));
}

#[test]
fn test_spacepilot_backlight() {
    let (mock, mut handle) = open_device(0x046D, 0xC625);
    assert_eq!(handle.name(), "SpacePilot");

    handle.set_backlight(true).expect("set");
    assert_eq!(handle.get_backlight().expect("query"), true);
    handle.set_backlight(false).expect("set");

    assert_eq!(
        mock.feature_history(),
        vec![vec![0x10, 0x00], vec![0x10, 0x02]]
    );
}

#[test]
fn test_spacepilot_write_display_chunks_columns() {
    let (mock, mut handle) = open_device(0x046D, 0xC625);

    handle
        .write_display(5, 2, &[1, 2, 3, 4, 5, 6, 7, 8, 9])
        .expect("write");

    assert_eq!(
        mock.feature_history(),
        vec![
            vec![0x0C, 2, 5],
            vec![0x0D, 1, 2, 3, 4, 5, 6, 7],
            vec![0x0D, 8, 9, 0, 0, 0, 0, 0],
        ]
    );
}

#[test]
fn test_spacepilot_write_display_position_checked() {
    let (_mock, mut handle) = open_device(0x046D, 0xC625);
    assert!(matches!(
        handle.write_display(240, 0, &[0xFF]),
        Err(DeviceError::HidProtocol(_))
    ));
}

#[test]
fn test_spacepilot_clear_display() {
    let (mock, mut handle) = open_device(0x046D, 0xC625);

    handle.clear_display(0x00).expect("clear");

    let features = mock.feature_history();
    // One position plus one packed fill per row.
    assert_eq!(features.len(), 16);
    assert_eq!(features[0], vec![0x0C, 0, 0]);
    assert_eq!(features[1], vec![0x0E, 240, 0, 0, 0, 0, 0]);
    assert_eq!(features[14], vec![0x0C, 7, 0]);
}
