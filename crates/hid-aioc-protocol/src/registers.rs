//! Register address table and payload kinds.
//!
//! Addresses not listed here are undefined on the device and are never
//! emitted by this crate.

use crate::fields::{FOXHUNT_CTRL_LAYOUT, FieldLayout, MESSAGE_CHUNK_LAYOUT, USB_ID_LAYOUT};
use crate::flags::FlagEnum;
use crate::ids::{Cm108Button, PttChannel};
use crate::{AiocError, AiocResult};
use serde::Serialize;
use std::fmt;

/// A known 8-bit register address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum Register {
    MAGIC = 0x00,
    USBID = 0x08,
    AIOC_IOMUX0 = 0x24,
    AIOC_IOMUX1 = 0x25,
    CM108_IOMUX0 = 0x44,
    CM108_IOMUX1 = 0x45,
    CM108_IOMUX2 = 0x46,
    CM108_IOMUX3 = 0x47,
    SERIAL_CTRL = 0x60,
    SERIAL_IOMUX0 = 0x64,
    SERIAL_IOMUX1 = 0x65,
    SERIAL_IOMUX2 = 0x66,
    SERIAL_IOMUX3 = 0x67,
    AUDIO_RX = 0x72,
    AUDIO_TX = 0x78,
    VPTT_LVLCTRL = 0x82,
    VPTT_TIMCTRL = 0x84,
    VCOS_LVLCTRL = 0x92,
    VCOS_TIMCTRL = 0x94,
    FOXHUNT_CTRL = 0xA0,
    FOXHUNT_MSG0 = 0xA2,
    FOXHUNT_MSG1 = 0xA3,
    FOXHUNT_MSG2 = 0xA4,
    FOXHUNT_MSG3 = 0xA5,
}

/// How a register's 32-bit value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterKind {
    /// Bitwise union of constants from one flag enumeration.
    FlagSet(FlagEnum),
    /// Plain unsigned integer.
    Scalar,
    /// Sub-fields at fixed bit offsets.
    Packed(FieldLayout),
}

impl Register {
    /// Every known register in address order.
    pub const ALL: [Register; 24] = [
        Register::MAGIC,
        Register::USBID,
        Register::AIOC_IOMUX0,
        Register::AIOC_IOMUX1,
        Register::CM108_IOMUX0,
        Register::CM108_IOMUX1,
        Register::CM108_IOMUX2,
        Register::CM108_IOMUX3,
        Register::SERIAL_CTRL,
        Register::SERIAL_IOMUX0,
        Register::SERIAL_IOMUX1,
        Register::SERIAL_IOMUX2,
        Register::SERIAL_IOMUX3,
        Register::AUDIO_RX,
        Register::AUDIO_TX,
        Register::VPTT_LVLCTRL,
        Register::VPTT_TIMCTRL,
        Register::VCOS_LVLCTRL,
        Register::VCOS_TIMCTRL,
        Register::FOXHUNT_CTRL,
        Register::FOXHUNT_MSG0,
        Register::FOXHUNT_MSG1,
        Register::FOXHUNT_MSG2,
        Register::FOXHUNT_MSG3,
    ];

    /// The four message registers in address order.
    pub const FOXHUNT_MSG: [Register; 4] = [
        Register::FOXHUNT_MSG0,
        Register::FOXHUNT_MSG1,
        Register::FOXHUNT_MSG2,
        Register::FOXHUNT_MSG3,
    ];

    pub fn address(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MAGIC => "MAGIC",
            Self::USBID => "USBID",
            Self::AIOC_IOMUX0 => "AIOC_IOMUX0",
            Self::AIOC_IOMUX1 => "AIOC_IOMUX1",
            Self::CM108_IOMUX0 => "CM108_IOMUX0",
            Self::CM108_IOMUX1 => "CM108_IOMUX1",
            Self::CM108_IOMUX2 => "CM108_IOMUX2",
            Self::CM108_IOMUX3 => "CM108_IOMUX3",
            Self::SERIAL_CTRL => "SERIAL_CTRL",
            Self::SERIAL_IOMUX0 => "SERIAL_IOMUX0",
            Self::SERIAL_IOMUX1 => "SERIAL_IOMUX1",
            Self::SERIAL_IOMUX2 => "SERIAL_IOMUX2",
            Self::SERIAL_IOMUX3 => "SERIAL_IOMUX3",
            Self::AUDIO_RX => "AUDIO_RX",
            Self::AUDIO_TX => "AUDIO_TX",
            Self::VPTT_LVLCTRL => "VPTT_LVLCTRL",
            Self::VPTT_TIMCTRL => "VPTT_TIMCTRL",
            Self::VCOS_LVLCTRL => "VCOS_LVLCTRL",
            Self::VCOS_TIMCTRL => "VCOS_TIMCTRL",
            Self::FOXHUNT_CTRL => "FOXHUNT_CTRL",
            Self::FOXHUNT_MSG0 => "FOXHUNT_MSG0",
            Self::FOXHUNT_MSG1 => "FOXHUNT_MSG1",
            Self::FOXHUNT_MSG2 => "FOXHUNT_MSG2",
            Self::FOXHUNT_MSG3 => "FOXHUNT_MSG3",
        }
    }

    /// Look a register up by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> AiocResult<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| AiocError::UnknownRegisterName(name.to_string()))
    }

    pub fn kind(self) -> RegisterKind {
        address_kind(self)
    }

    /// Register selecting the source of a PTT output.
    pub fn for_ptt(channel: PttChannel) -> Self {
        match channel {
            PttChannel::Ptt1 => Self::AIOC_IOMUX0,
            PttChannel::Ptt2 => Self::AIOC_IOMUX1,
        }
    }

    /// Register selecting the source of a CM108 button.
    pub fn for_button(button: Cm108Button) -> Self {
        match button {
            Cm108Button::VolumeUp => Self::CM108_IOMUX0,
            Cm108Button::VolumeDown => Self::CM108_IOMUX1,
            Cm108Button::PlaybackMute => Self::CM108_IOMUX2,
            Cm108Button::RecordMute => Self::CM108_IOMUX3,
        }
    }
}

/// Static payload-kind lookup, one entry per known register.
pub fn address_kind(register: Register) -> RegisterKind {
    match register {
        Register::AIOC_IOMUX0 | Register::AIOC_IOMUX1 => RegisterKind::FlagSet(FlagEnum::PttSource),
        Register::CM108_IOMUX0
        | Register::CM108_IOMUX1
        | Register::CM108_IOMUX2
        | Register::CM108_IOMUX3 => RegisterKind::FlagSet(FlagEnum::ButtonSource),
        Register::USBID => RegisterKind::Packed(USB_ID_LAYOUT),
        Register::FOXHUNT_CTRL => RegisterKind::Packed(FOXHUNT_CTRL_LAYOUT),
        Register::FOXHUNT_MSG0
        | Register::FOXHUNT_MSG1
        | Register::FOXHUNT_MSG2
        | Register::FOXHUNT_MSG3 => RegisterKind::Packed(MESSAGE_CHUNK_LAYOUT),
        Register::MAGIC
        | Register::SERIAL_CTRL
        | Register::SERIAL_IOMUX0
        | Register::SERIAL_IOMUX1
        | Register::SERIAL_IOMUX2
        | Register::SERIAL_IOMUX3
        | Register::AUDIO_RX
        | Register::AUDIO_TX
        | Register::VPTT_LVLCTRL
        | Register::VPTT_TIMCTRL
        | Register::VCOS_LVLCTRL
        | Register::VCOS_TIMCTRL => RegisterKind::Scalar,
    }
}

impl TryFrom<u8> for Register {
    type Error = AiocError;

    fn try_from(address: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|r| r.address() == address)
            .ok_or(AiocError::UnknownRegister(address))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
