//! Register and raw-pin frame codec.
//!
//! Pure byte translation; no transport and no flag semantics.

use crate::flags::Command;
use crate::{AiocError, AiocResult};
use aioc_hid_common::ReportParser;

/// HID report ID used by every AIOC frame.
pub const REPORT_ID: u8 = 0x00;
/// Length of a register feature-report frame, report ID included.
pub const REGISTER_FRAME_LEN: usize = 7;
/// Length of a raw-pin output-report frame, report ID included.
pub const RAW_PIN_FRAME_LEN: usize = 5;
/// Number of pins addressable by one raw-pin frame (one data byte).
pub const RAW_PIN_COUNT: u8 = 8;

/// `[report id][command][address][value u32 LE]`
pub type RegisterFrame = [u8; REGISTER_FRAME_LEN];
/// `[report id][0][pin data][pin mask][0]`
pub type RawPinFrame = [u8; RAW_PIN_FRAME_LEN];

fn register_frame(command: Command, address: u8, value: u32) -> RegisterFrame {
    let [v0, v1, v2, v3] = value.to_le_bytes();
    [REPORT_ID, command.bits(), address, v0, v1, v2, v3]
}

/// Address-select frame sent ahead of a feature-report read.
pub fn encode_read(address: u8) -> RegisterFrame {
    register_frame(Command::NONE, address, 0)
}

/// Extract the register value from a read response.
///
/// The echoed command and address bytes are ignored.
///
/// # Errors
///
/// [`AiocError::MalformedResponse`] unless `response` is exactly
/// [`REGISTER_FRAME_LEN`] bytes.
pub fn decode_read_response(response: &[u8]) -> AiocResult<u32> {
    if response.len() != REGISTER_FRAME_LEN {
        return Err(AiocError::MalformedResponse {
            expected: REGISTER_FRAME_LEN,
            actual: response.len(),
        });
    }
    let mut parser = ReportParser::new(response);
    parser.skip(3);
    Ok(parser.read_u32_le()?)
}

/// Register write committed with `WRITESTROBE`.
pub fn encode_write(address: u8, value: u32) -> RegisterFrame {
    register_frame(Command::WRITESTROBE, address, value)
}

/// Bare command frame: address and value are zero.
pub fn encode_command(command: Command) -> RegisterFrame {
    register_frame(command, 0x00, 0)
}

/// Raw pin output report setting exactly one pin.
///
/// `pin` is 1-based; bit `pin - 1` is set in the mask, and in the data byte
/// when `asserted`.
///
/// # Errors
///
/// [`AiocError::InvalidPin`] if `pin` is outside `1..=RAW_PIN_COUNT`.
pub fn encode_raw_pins(pin: u8, asserted: bool) -> AiocResult<RawPinFrame> {
    if !(1..=RAW_PIN_COUNT).contains(&pin) {
        return Err(AiocError::InvalidPin(pin));
    }
    let mask = 1u8 << (pin - 1);
    let data = if asserted { mask } else { 0 };
    Ok([REPORT_ID, 0x00, data, mask, 0x00])
}
