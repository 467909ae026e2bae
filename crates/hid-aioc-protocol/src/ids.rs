//! USB identity, magic signature, and pin assignments for the AIOC.
//!
//! The AIOC enumerates under the pid.codes open-source VID `0x1209`. The
//! USB identity is itself a register (`USBID`), so a reconfigured unit may
//! show up under a different VID/PID pair; callers that opened such a unit
//! still talk the same protocol.

/// pid.codes vendor ID used by the AIOC.
pub const AIOC_VENDOR_ID: u16 = 0x1209;
/// Default AIOC product ID.
pub const AIOC_PRODUCT_ID: u16 = 0x7388;

/// ASCII signature held in register `MAGIC` (`0x00`).
pub const AIOC_MAGIC: [u8; 4] = *b"AIOC";
/// [`AIOC_MAGIC`] as the little-endian register value.
pub const AIOC_MAGIC_VALUE: u32 = u32::from_le_bytes(AIOC_MAGIC);

/// PTT outputs that can be driven through the raw output-report path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PttChannel {
    Ptt1,
    Ptt2,
}

impl PttChannel {
    pub const ALL: [PttChannel; 2] = [PttChannel::Ptt1, PttChannel::Ptt2];

    /// 1-based CM108 GPIO pin wired to this PTT output.
    pub fn pin(self) -> u8 {
        match self {
            Self::Ptt1 => 3,
            Self::Ptt2 => 4,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ptt1 => "PTT1",
            Self::Ptt2 => "PTT2",
        }
    }
}

/// The four CM108-emulated HID buttons whose sources are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cm108Button {
    VolumeUp,
    VolumeDown,
    PlaybackMute,
    RecordMute,
}

impl Cm108Button {
    pub const ALL: [Cm108Button; 4] = [
        Cm108Button::VolumeUp,
        Cm108Button::VolumeDown,
        Cm108Button::PlaybackMute,
        Cm108Button::RecordMute,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::VolumeUp => "VolUP",
            Self::VolumeDown => "VolDN",
            Self::PlaybackMute => "PlbMute",
            Self::RecordMute => "RecMute",
        }
    }
}

pub fn is_aioc_device(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == AIOC_VENDOR_ID && product_id == AIOC_PRODUCT_ID
}
