//! HID register protocol for the AIOC (All-In-One-Cable) radio interface.
//!
//! The AIOC exposes a small bank of 32-bit configuration registers over USB
//! HID feature reports, plus a raw output-report path for driving the PTT
//! pins directly. This crate covers that protocol end to end:
//!
//! - **`codec`**: byte-exact 7-byte register frames and 5-byte pin frames.
//! - **`registers`**: the address table and each register's payload kind.
//! - **`flags`**: PTT/button source flag sets and their name round-tripping.
//! - **`fields`** / **`message`**: packed sub-field registers and the
//!   16-byte foxhunt message spread over four registers.
//! - **`device`**: single request/response operations over a [`HidTransport`].
//! - **`session`**: a magic-checked, exclusively borrowed device session.
//! - **`settings`**: serde documents for applying and snapshotting state.
//!
//! ## Wire format
//!
//! | Frame | Layout |
//! |-------|--------|
//! | Register select / write | `[0][cmd][addr][value u32 LE]` |
//! | Register read response | `[0][cmd][addr][value u32 LE]` |
//! | Command | `[0][cmd flags][0][0u32]` |
//! | Raw pin output report | `[0][0][data][mask][0]` |
//!
//! Reads are two transfers (select, then retrieve) against a "current
//! address" held inside the device. The API exposes them as one operation
//! over `&mut` access to the transport so they cannot be interleaved.
//!
//! [`HidTransport`]: aioc_hid_common::HidTransport

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod audio;
pub mod codec;
pub mod device;
pub mod fields;
pub mod flags;
pub mod ids;
pub mod message;
pub mod mock;
pub mod registers;
pub mod session;
pub mod settings;

pub use audio::*;
pub use codec::*;
pub use device::*;
pub use fields::*;
pub use flags::*;
pub use ids::*;
pub use message::*;
pub use registers::*;
pub use session::*;
pub use settings::*;

pub use aioc_hid_common::{HidCommonError, HidTransport};

use thiserror::Error;

/// Errors returned by AIOC protocol operations.
#[derive(Error, Debug)]
pub enum AiocError {
    #[error("Malformed response: expected {expected} bytes, got {actual}")]
    MalformedResponse { expected: usize, actual: usize },

    #[error("Unexpected magic: {}", display_magic(.0))]
    UnexpectedMagic([u8; 4]),

    #[error("Unknown {flags} flag name: '{name}'")]
    UnknownFlagName { flags: FlagEnum, name: String },

    #[error("Transport failure: {0}")]
    Transport(#[from] HidCommonError),

    #[error("Invalid pin number: {0} (expected 1..={max})", max = codec::RAW_PIN_COUNT)]
    InvalidPin(u8),

    #[error("Unknown field '{field}' for this register layout")]
    UnknownField { field: String },

    #[error("Value {value:#x} does not fit field '{field}' ({width} bits)")]
    FieldOverflow {
        field: &'static str,
        value: u32,
        width: u8,
    },

    #[error("Register {register} holds {value:#010x}, which is not a valid setting")]
    InvalidAudioSetting { register: Register, value: u32 },

    #[error("Register {0} is not a flag-set register")]
    NotAFlagRegister(Register),

    #[error("Register {0} is not a packed-field register")]
    NotAPackedRegister(Register),

    #[error("Unknown register address: {0:#04x}")]
    UnknownRegister(u8),

    #[error("Unknown register name: '{0}'")]
    UnknownRegisterName(String),
}

/// Convenience result alias for AIOC operations.
pub type AiocResult<T> = Result<T, AiocError>;

fn display_magic(bytes: &[u8; 4]) -> String {
    bytes.escape_ascii().to_string()
}
