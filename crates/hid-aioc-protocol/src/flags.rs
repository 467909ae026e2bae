//! Flag enumerations and flag-name round-tripping.
//!
//! Flag values are bit positions and masks taken from the AIOC firmware
//! register definitions; they are not ordinals.

use crate::{AiocError, AiocResult};
use bitflags::{Flags, bitflags};
use serde::Serialize;
use std::fmt;

bitflags! {
    /// Command byte of a register frame.
    ///
    /// Commands are issued one at a time in practice. The encoding allows
    /// combinations but the device does not define their meaning.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Command: u8 {
        /// Commit the frame's value to the addressed register.
        const WRITESTROBE = 0x01;
        /// Reset every register to factory values.
        const DEFAULTS    = 0x10;
        const REBOOT      = 0x20;
        /// Reload registers from flash.
        const RECALL      = 0x40;
        /// Persist registers to flash.
        const STORE       = 0x80;
    }
}

impl Command {
    /// Plain address select, used before a feature-report read.
    pub const NONE: Self = Self::empty();
}

bitflags! {
    /// Sources that key a PTT output (`AIOC_IOMUX0`, `AIOC_IOMUX1`).
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PttSource: u32 {
        const NONE          = 0x0000_0000;
        const CM108GPIO1    = 0x0000_0001;
        const CM108GPIO2    = 0x0000_0002;
        const CM108GPIO3    = 0x0000_0004;
        const CM108GPIO4    = 0x0000_0008;
        const SERIALDTR     = 0x0000_0100;
        const SERIALRTS     = 0x0000_0200;
        const SERIALDTRNRTS = 0x0000_0400;
        const SERIALNDTRRTS = 0x0000_0800;
        const VPTT          = 0x0000_1000;
    }
}

bitflags! {
    /// Sources that press an emulated CM108 button (`CM108_IOMUX0..3`).
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ButtonSource: u32 {
        const NONE = 0x0000_0000;
        const IN1  = 0x0001_0000;
        const IN2  = 0x0002_0000;
        const VCOS = 0x0100_0000;
    }
}

/// Identifies the closed flag enumeration a flag-set register uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FlagEnum {
    PttSource,
    ButtonSource,
}

impl FlagEnum {
    /// `(name, value)` pairs in declaration order, `NONE` included.
    pub fn entries(self) -> Vec<(&'static str, u32)> {
        match self {
            Self::PttSource => entries_of::<PttSource>(),
            Self::ButtonSource => entries_of::<ButtonSource>(),
        }
    }

    pub fn value_of(self, name: &str) -> Option<u32> {
        self.entries()
            .into_iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }
}

impl fmt::Display for FlagEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PttSource => f.write_str("PTT source"),
            Self::ButtonSource => f.write_str("button source"),
        }
    }
}

fn entries_of<F: Flags<Bits = u32>>() -> Vec<(&'static str, u32)> {
    F::FLAGS
        .iter()
        .map(|flag| (flag.name(), flag.value().bits()))
        .collect()
}

/// Display-ready decoding of a flag-set register value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FlagDisplay {
    /// The value equals one enumerated constant (zero reports as `NONE`).
    Exact(&'static str),
    /// Every nonzero constant whose bits are all present, in declaration order.
    Union(Vec<&'static str>),
    /// No enumerated bit is present.
    Raw(u32),
}

impl fmt::Display for FlagDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => f.write_str(name),
            Self::Union(names) => f.write_str(&names.join("|")),
            Self::Raw(value) => write!(f, "{value:#x}"),
        }
    }
}

/// Decode `raw` against one flag enumeration.
///
/// Exact match wins, then the union of contained constants, then raw hex.
/// Constants are tested independently, so overlapping constants may both
/// appear in a union.
pub fn decode_flags(flags: FlagEnum, raw: u32) -> FlagDisplay {
    let entries = flags.entries();

    if let Some((name, _)) = entries.iter().find(|(_, value)| *value == raw) {
        return FlagDisplay::Exact(*name);
    }

    let contained: Vec<&'static str> = entries
        .iter()
        .filter(|(_, value)| *value != 0 && raw & *value == *value)
        .map(|(name, _)| *name)
        .collect();

    if contained.is_empty() {
        FlagDisplay::Raw(raw)
    } else {
        FlagDisplay::Union(contained)
    }
}

/// Parse a `|`-separated list of flag names into a register value.
///
/// Names are case-sensitive. Any unknown name rejects the whole input.
pub fn encode_flags(flags: FlagEnum, names: &str) -> AiocResult<u32> {
    names.split('|').try_fold(0u32, |acc, name| {
        flags
            .value_of(name)
            .map(|value| acc | value)
            .ok_or_else(|| AiocError::UnknownFlagName {
                flags,
                name: name.to_string(),
            })
    })
}

impl PttSource {
    pub fn describe(&self) -> FlagDisplay {
        decode_flags(FlagEnum::PttSource, self.bits())
    }

    /// Parse a `"CM108GPIO1|SERIALDTR"` style union.
    pub fn parse_union(names: &str) -> AiocResult<Self> {
        encode_flags(FlagEnum::PttSource, names).map(Self::from_bits_retain)
    }
}

impl ButtonSource {
    pub fn describe(&self) -> FlagDisplay {
        decode_flags(FlagEnum::ButtonSource, self.bits())
    }

    /// Parse an `"IN1|VCOS"` style union.
    pub fn parse_union(names: &str) -> AiocResult<Self> {
        encode_flags(FlagEnum::ButtonSource, names).map(Self::from_bits_retain)
    }
}
