//! Common HID plumbing for AIOC register access.
//!
//! This crate owns the transport seam between the register protocol and
//! whatever HID library the caller opened the device with. The protocol
//! crate only ever talks to a [`HidTransport`].

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod hid_traits;
#[cfg(feature = "hidapi")]
pub mod hidapi_transport;
pub mod report_parser;

pub use hid_traits::*;
pub use report_parser::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HidCommonError {
    #[error("Failed to read from device: {0}")]
    ReadError(String),

    #[error("Failed to write to device: {0}")]
    WriteError(String),

    #[error("Invalid report format: {0}")]
    InvalidReport(String),

    #[error("Device disconnected")]
    Disconnected,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type HidCommonResult<T> = Result<T, HidCommonError>;
