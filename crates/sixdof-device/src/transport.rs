//! Transport traits for serial and HID devices.
//!
//! The handle layer never touches a port or a USB handle directly; it
//! drives these traits. The crate ships a hidapi-backed [`HidTransport`]
//! implementation (see [`crate::hid`]); serial transports are supplied by
//! the caller, since port opening and line discipline are platform
//! concerns this crate stays out of. Devices speak 9600 8N2 with CTS/RTS
//! flow control.

use std::time::Duration;

use crate::error::DeviceResult;

/// A bidirectional serial line to a device.
pub trait SerialTransport: Send {
    /// Write all of `data` to the line.
    fn write(&mut self, data: &[u8]) -> DeviceResult<()>;

    /// Read whatever is available into `buf`, waiting at most `timeout`.
    /// Returns the number of bytes read; 0 means the timeout expired
    /// with nothing to read.
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> DeviceResult<usize>;
}

/// A USB HID connection to a device.
pub trait HidTransport: Send {
    /// Non-blocking read of one input report (report ID first).
    /// Returns the report length; 0 means no report was pending.
    fn read_report(&mut self, buf: &mut [u8]) -> DeviceResult<usize>;

    /// Write one output report.
    fn write_report(&mut self, data: &[u8]) -> DeviceResult<usize>;

    /// Send one feature report.
    fn send_feature_report(&mut self, data: &[u8]) -> DeviceResult<()>;
}

pub mod mock {
    use super::*;
    use crate::error::DeviceError;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted serial line: reads come from a queue, writes are
    /// recorded. Clones share state, so a test can keep one end while
    /// the handle owns the other.
    #[derive(Clone)]
    pub struct MockSerialTransport {
        read_queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
        write_history: Arc<Mutex<Vec<Vec<u8>>>>,
        connected: Arc<Mutex<bool>>,
    }

    impl MockSerialTransport {
        pub fn new() -> Self {
            Self {
                read_queue: Arc::new(Mutex::new(VecDeque::new())),
                write_history: Arc::new(Mutex::new(Vec::new())),
                connected: Arc::new(Mutex::new(true)),
            }
        }

        /// Queue bytes to be returned by one future `read` call. An empty
        /// chunk simulates a timed-out read, which lets tests script the
        /// silence between identification probes.
        pub fn queue_read(&self, data: impl Into<Vec<u8>>) {
            let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
            queue.push_back(data.into());
        }

        /// Queue one timed-out read.
        pub fn queue_timeout(&self) {
            self.queue_read(Vec::new());
        }

        pub fn write_history(&self) -> Vec<Vec<u8>> {
            let history = self.write_history.lock().unwrap_or_else(|e| e.into_inner());
            history.clone()
        }

        /// All written bytes, concatenated in order.
        pub fn written_bytes(&self) -> Vec<u8> {
            self.write_history().concat()
        }

        pub fn disconnect(&self) {
            let mut connected = self.connected.lock().unwrap_or_else(|e| e.into_inner());
            *connected = false;
        }

        fn check_connected(&self) -> DeviceResult<()> {
            let connected = *self.connected.lock().unwrap_or_else(|e| e.into_inner());
            if connected {
                Ok(())
            } else {
                Err(DeviceError::Disconnected)
            }
        }
    }

    impl Default for MockSerialTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SerialTransport for MockSerialTransport {
        fn write(&mut self, data: &[u8]) -> DeviceResult<()> {
            self.check_connected()?;
            let mut history = self.write_history.lock().unwrap_or_else(|e| e.into_inner());
            history.push(data.to_vec());
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> DeviceResult<usize> {
            self.check_connected()?;
            let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
            let Some(mut chunk) = queue.pop_front() else {
                return Ok(0);
            };
            if chunk.is_empty() {
                return Ok(0);
            }
            let n = chunk.len().min(buf.len());
            buf[..n].copy_from_slice(&chunk[..n]);
            if n < chunk.len() {
                // Keep whatever did not fit for the next read.
                chunk.drain(..n);
                queue.push_front(chunk);
            }
            Ok(n)
        }
    }

    /// Scripted HID connection in the same style: queued input reports,
    /// recorded output and feature reports.
    #[derive(Clone)]
    pub struct MockHidTransport {
        read_queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
        write_history: Arc<Mutex<Vec<Vec<u8>>>>,
        feature_history: Arc<Mutex<Vec<Vec<u8>>>>,
        connected: Arc<Mutex<bool>>,
    }

    impl MockHidTransport {
        pub fn new() -> Self {
            Self {
                read_queue: Arc::new(Mutex::new(VecDeque::new())),
                write_history: Arc::new(Mutex::new(Vec::new())),
                feature_history: Arc::new(Mutex::new(Vec::new())),
                connected: Arc::new(Mutex::new(true)),
            }
        }

        /// Queue one input report for a future `read_report` call.
        pub fn queue_report(&self, report: impl Into<Vec<u8>>) {
            let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
            queue.push_back(report.into());
        }

        pub fn write_history(&self) -> Vec<Vec<u8>> {
            let history = self.write_history.lock().unwrap_or_else(|e| e.into_inner());
            history.clone()
        }

        pub fn feature_history(&self) -> Vec<Vec<u8>> {
            let history = self
                .feature_history
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            history.clone()
        }

        pub fn disconnect(&self) {
            let mut connected = self.connected.lock().unwrap_or_else(|e| e.into_inner());
            *connected = false;
        }

        fn check_connected(&self) -> DeviceResult<()> {
            let connected = *self.connected.lock().unwrap_or_else(|e| e.into_inner());
            if connected {
                Ok(())
            } else {
                Err(DeviceError::Disconnected)
            }
        }
    }

    impl Default for MockHidTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl HidTransport for MockHidTransport {
        fn read_report(&mut self, buf: &mut [u8]) -> DeviceResult<usize> {
            self.check_connected()?;
            let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
            let Some(report) = queue.pop_front() else {
                return Ok(0);
            };
            let n = report.len().min(buf.len());
            buf[..n].copy_from_slice(&report[..n]);
            Ok(n)
        }

        fn write_report(&mut self, data: &[u8]) -> DeviceResult<usize> {
            self.check_connected()?;
            let mut history = self.write_history.lock().unwrap_or_else(|e| e.into_inner());
            history.push(data.to_vec());
            Ok(data.len())
        }

        fn send_feature_report(&mut self, data: &[u8]) -> DeviceResult<()> {
            self.check_connected()?;
            let mut history = self
                .feature_history
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            history.push(data.to_vec());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{MockHidTransport, MockSerialTransport};
    use super::*;
    use crate::error::DeviceError;

    #[test]
    fn test_mock_serial_read_write() {
        let mock = MockSerialTransport::new();
        mock.queue_read(b"hello\r".to_vec());

        let mut transport = mock.clone();
        transport.write(b"vQ\r").expect("write");

        let mut buf = [0u8; 16];
        let n = transport
            .read(&mut buf, Duration::from_millis(10))
            .expect("read");
        assert_eq!(&buf[..n], b"hello\r");
        assert_eq!(mock.written_bytes(), b"vQ\r");
    }

    #[test]
    fn test_mock_serial_splits_oversized_chunks() {
        let mock = MockSerialTransport::new();
        mock.queue_read(b"abcdef".to_vec());

        let mut transport = mock.clone();
        let mut buf = [0u8; 4];
        let n = transport
            .read(&mut buf, Duration::from_millis(1))
            .expect("read");
        assert_eq!(&buf[..n], b"abcd");
        let n = transport
            .read(&mut buf, Duration::from_millis(1))
            .expect("read");
        assert_eq!(&buf[..n], b"ef");
    }

    #[test]
    fn test_mock_serial_empty_queue_is_timeout() {
        let mut transport = MockSerialTransport::new();
        let mut buf = [0u8; 8];
        let n = transport
            .read(&mut buf, Duration::from_millis(1))
            .expect("read");
        assert_eq!(n, 0);
    }

    #[test]
    fn test_mock_serial_disconnect() {
        let mock = MockSerialTransport::new();
        mock.disconnect();
        let mut transport = mock;
        assert!(matches!(
            transport.write(b"x"),
            Err(DeviceError::Disconnected)
        ));
    }

    #[test]
    fn test_mock_hid_reports() {
        let mock = MockHidTransport::new();
        mock.queue_report(vec![3, 1, 0, 0, 0, 0, 0]);

        let mut transport = mock.clone();
        let mut buf = [0u8; 32];
        let n = transport.read_report(&mut buf).expect("read");
        assert_eq!(&buf[..n], &[3, 1, 0, 0, 0, 0, 0]);
        assert_eq!(transport.read_report(&mut buf).expect("read"), 0);

        transport.write_report(&[4, 1]).expect("write");
        transport.send_feature_report(&[0x10, 0x00]).expect("feature");
        assert_eq!(mock.write_history(), vec![vec![4, 1]]);
        assert_eq!(mock.feature_history(), vec![vec![0x10, 0x00]]);
    }
}
