//! [`HidTransport`] over an already-open `hidapi` device.
//!
//! Opening and enumerating devices stays with the caller; this only adapts
//! the three transfers the register protocol uses.

use crate::{HidCommonError, HidCommonResult, HidTransport};
use hidapi::HidDevice;
use tracing::trace;

impl HidTransport for HidDevice {
    fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()> {
        trace!(len = data.len(), "hidapi send_feature_report");
        HidDevice::send_feature_report(self, data)
            .map_err(|e| HidCommonError::WriteError(e.to_string()))
    }

    fn get_feature_report(&mut self, report_id: u8, len: usize) -> HidCommonResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        if let Some(first) = buf.first_mut() {
            *first = report_id;
        }
        let read = HidDevice::get_feature_report(self, &mut buf)
            .map_err(|e| HidCommonError::ReadError(e.to_string()))?;
        buf.truncate(read);
        trace!(len = read, "hidapi get_feature_report");
        Ok(buf)
    }

    fn write_output_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        trace!(len = data.len(), "hidapi write");
        self.write(data)
            .map_err(|e| HidCommonError::WriteError(e.to_string()))
    }
}
