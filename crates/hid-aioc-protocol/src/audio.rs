//! Typed values for `AUDIO_RX` and `AUDIO_TX`.
//!
//! Both registers are scalars in the register map. These enums give their
//! documented values names; they are ordinals and single settings, not flags.

use crate::registers::Register;
use crate::{AiocError, AiocResult};
use serde::{Deserialize, Serialize};

/// Receive-path gain (`AUDIO_RX`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AudioRxGain {
    #[default]
    X1,
    X2,
    X4,
    X8,
    X16,
}

impl AudioRxGain {
    pub const ALL: [AudioRxGain; 5] = [Self::X1, Self::X2, Self::X4, Self::X8, Self::X16];

    pub fn to_raw(self) -> u32 {
        match self {
            Self::X1 => 0,
            Self::X2 => 1,
            Self::X4 => 2,
            Self::X8 => 3,
            Self::X16 => 4,
        }
    }

    /// # Errors
    ///
    /// [`AiocError::InvalidAudioSetting`] for values other than 0–4.
    pub fn from_raw(raw: u32) -> AiocResult<Self> {
        Self::ALL
            .into_iter()
            .find(|gain| gain.to_raw() == raw)
            .ok_or(AiocError::InvalidAudioSetting {
                register: Register::AUDIO_RX,
                value: raw,
            })
    }

    pub fn multiplier(self) -> u32 {
        1 << self.to_raw()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::X1 => "1x",
            Self::X2 => "2x",
            Self::X4 => "4x",
            Self::X8 => "8x",
            Self::X16 => "16x",
        }
    }
}

/// Transmit-path boost (`AUDIO_TX`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AudioTxBoost {
    #[default]
    Off,
    On,
}

impl AudioTxBoost {
    pub const ON_VALUE: u32 = 0x0000_0100;

    pub fn to_raw(self) -> u32 {
        match self {
            Self::Off => 0,
            Self::On => Self::ON_VALUE,
        }
    }

    /// # Errors
    ///
    /// [`AiocError::InvalidAudioSetting`] for values other than 0 and `0x100`.
    pub fn from_raw(raw: u32) -> AiocResult<Self> {
        match raw {
            0 => Ok(Self::Off),
            Self::ON_VALUE => Ok(Self::On),
            other => Err(AiocError::InvalidAudioSetting {
                register: Register::AUDIO_TX,
                value: other,
            }),
        }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl From<bool> for AudioTxBoost {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}
