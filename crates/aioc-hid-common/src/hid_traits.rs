//! HID transport traits

use crate::{HidCommonError, HidCommonResult};

/// The three HID transfers the AIOC register protocol needs from an
/// already-open device handle.
///
/// Implementations are synchronous: each call is expected to complete before
/// the next one is issued. Timeout policy belongs to the implementation.
pub trait HidTransport {
    /// Send a feature report. `data[0]` is the report ID.
    fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()>;

    /// Receive a feature report of at most `len` bytes (report ID included).
    ///
    /// The returned buffer holds exactly the bytes the device produced, which
    /// may be fewer than `len`.
    fn get_feature_report(&mut self, report_id: u8, len: usize) -> HidCommonResult<Vec<u8>>;

    /// Write an output report. `data[0]` is the report ID.
    fn write_output_report(&mut self, data: &[u8]) -> HidCommonResult<usize>;
}

impl<T: HidTransport + ?Sized> HidTransport for &mut T {
    fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()> {
        (**self).send_feature_report(data)
    }

    fn get_feature_report(&mut self, report_id: u8, len: usize) -> HidCommonResult<Vec<u8>> {
        (**self).get_feature_report(report_id, len)
    }

    fn write_output_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        (**self).write_output_report(data)
    }
}

impl<T: HidTransport + ?Sized> HidTransport for Box<T> {
    fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()> {
        (**self).send_feature_report(data)
    }

    fn get_feature_report(&mut self, report_id: u8, len: usize) -> HidCommonResult<Vec<u8>> {
        (**self).get_feature_report(report_id, len)
    }

    fn write_output_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        (**self).write_output_report(data)
    }
}

pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// One transfer observed by [`MockHidTransport`], in call order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum MockTransfer {
        SendFeature(Vec<u8>),
        GetFeature { report_id: u8, len: usize },
        WriteOutput(Vec<u8>),
    }

    /// Scripted transport: feature-report responses are served from a queue
    /// and every transfer is recorded.
    ///
    /// Clones share state, so a test can keep one handle for inspection while
    /// the code under test owns another.
    #[derive(Clone, Default)]
    pub struct MockHidTransport {
        responses: Arc<Mutex<VecDeque<Vec<u8>>>>,
        history: Arc<Mutex<Vec<MockTransfer>>>,
        disconnected: Arc<Mutex<bool>>,
    }

    impl MockHidTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn queue_feature_response(&self, data: Vec<u8>) {
            let mut queue = self.responses.lock().unwrap_or_else(|e| e.into_inner());
            queue.push_back(data);
        }

        pub fn history(&self) -> Vec<MockTransfer> {
            let history = self.history.lock().unwrap_or_else(|e| e.into_inner());
            history.clone()
        }

        /// Feature reports sent so far, in order.
        pub fn sent_feature_reports(&self) -> Vec<Vec<u8>> {
            self.history()
                .into_iter()
                .filter_map(|t| match t {
                    MockTransfer::SendFeature(data) => Some(data),
                    _ => None,
                })
                .collect()
        }

        /// Output reports written so far, in order.
        pub fn written_output_reports(&self) -> Vec<Vec<u8>> {
            self.history()
                .into_iter()
                .filter_map(|t| match t {
                    MockTransfer::WriteOutput(data) => Some(data),
                    _ => None,
                })
                .collect()
        }

        pub fn disconnect(&self) {
            let mut disconnected = self.disconnected.lock().unwrap_or_else(|e| e.into_inner());
            *disconnected = true;
        }

        pub fn reconnect(&self) {
            let mut disconnected = self.disconnected.lock().unwrap_or_else(|e| e.into_inner());
            *disconnected = false;
        }

        fn ensure_connected(&self) -> HidCommonResult<()> {
            if *self.disconnected.lock().unwrap_or_else(|e| e.into_inner()) {
                return Err(HidCommonError::Disconnected);
            }
            Ok(())
        }

        fn record(&self, transfer: MockTransfer) {
            let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
            history.push(transfer);
        }
    }

    impl HidTransport for MockHidTransport {
        fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()> {
            self.ensure_connected()?;
            self.record(MockTransfer::SendFeature(data.to_vec()));
            Ok(())
        }

        fn get_feature_report(&mut self, report_id: u8, len: usize) -> HidCommonResult<Vec<u8>> {
            self.ensure_connected()?;
            self.record(MockTransfer::GetFeature { report_id, len });
            let mut queue = self.responses.lock().unwrap_or_else(|e| e.into_inner());
            queue
                .pop_front()
                .ok_or_else(|| HidCommonError::ReadError("No data available".to_string()))
        }

        fn write_output_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
            self.ensure_connected()?;
            self.record(MockTransfer::WriteOutput(data.to_vec()));
            Ok(data.len())
        }
    }
}
