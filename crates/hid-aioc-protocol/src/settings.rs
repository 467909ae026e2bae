//! Serializable device configuration and register snapshots.

use crate::audio::{AudioRxGain, AudioTxBoost};
use crate::fields::{FoxhuntControl, UsbId, unpack_fields};
use crate::flags::{FlagEnum, decode_flags, encode_flags};
use crate::message::{MESSAGE_WORDS, pack_message, unpack_message};
use crate::registers::{Register, RegisterKind};
use crate::AiocResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value for a flag-set register: `|`-joined names such as
/// `"CM108GPIO1|VPTT"`, or the raw register word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagSetting {
    Names(String),
    Raw(u32),
}

impl FlagSetting {
    /// Names when they encode back to `raw` exactly, otherwise the raw word.
    pub fn from_raw(flags: FlagEnum, raw: u32) -> Self {
        let display = decode_flags(flags, raw).to_string();
        match encode_flags(flags, &display) {
            Ok(encoded) if encoded == raw => Self::Names(display),
            _ => Self::Raw(raw),
        }
    }

    /// # Errors
    ///
    /// [`AiocError::UnknownFlagName`](crate::AiocError::UnknownFlagName) for a
    /// name outside `flags`.
    pub fn encode(&self, flags: FlagEnum) -> AiocResult<u32> {
        match self {
            Self::Names(names) => encode_flags(flags, names),
            Self::Raw(raw) => Ok(*raw),
        }
    }
}

impl From<&str> for FlagSetting {
    fn from(names: &str) -> Self {
        Self::Names(names.to_string())
    }
}

impl From<u32> for FlagSetting {
    fn from(raw: u32) -> Self {
        Self::Raw(raw)
    }
}

/// Foxhunt message as text, or as the four raw `FOXHUNT_MSG` words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FoxhuntMessage {
    Text(String),
    Words([u32; MESSAGE_WORDS]),
}

impl FoxhuntMessage {
    /// Text when it packs back to `words` exactly, otherwise the words.
    pub fn from_words(words: [u32; MESSAGE_WORDS]) -> Self {
        let text = unpack_message(words);
        if pack_message(&text) == words {
            Self::Text(text)
        } else {
            Self::Words(words)
        }
    }

    pub fn to_words(&self) -> [u32; MESSAGE_WORDS] {
        match self {
            Self::Text(text) => pack_message(text),
            Self::Words(words) => *words,
        }
    }
}

impl From<&str> for FoxhuntMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Desired device state. Absent fields are left as they are on the device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceSettings {
    pub usb_id: Option<UsbId>,
    pub ptt1_source: Option<FlagSetting>,
    pub ptt2_source: Option<FlagSetting>,
    pub vol_up_source: Option<FlagSetting>,
    pub vol_down_source: Option<FlagSetting>,
    pub playback_mute_source: Option<FlagSetting>,
    pub record_mute_source: Option<FlagSetting>,
    pub serial_ctrl: Option<u32>,
    pub serial_iomux: [Option<u32>; 4],
    pub audio_rx_gain: Option<AudioRxGain>,
    pub audio_tx_boost: Option<AudioTxBoost>,
    pub vptt_level: Option<u32>,
    pub vptt_timing: Option<u32>,
    pub vcos_level: Option<u32>,
    pub vcos_timing: Option<u32>,
    pub foxhunt: Option<FoxhuntControl>,
    pub foxhunt_message: Option<FoxhuntMessage>,
    /// Persist to flash after applying.
    pub store: bool,
}

impl DeviceSettings {
    /// Resolve the document into register writes, ordered by address.
    ///
    /// # Errors
    ///
    /// [`AiocError::UnknownFlagName`](crate::AiocError::UnknownFlagName) for
    /// the first bad flag name; no plan is produced.
    pub fn plan(&self) -> AiocResult<BTreeMap<Register, u32>> {
        let mut plan = BTreeMap::new();

        let flag_fields = [
            (Register::AIOC_IOMUX0, &self.ptt1_source),
            (Register::AIOC_IOMUX1, &self.ptt2_source),
            (Register::CM108_IOMUX0, &self.vol_up_source),
            (Register::CM108_IOMUX1, &self.vol_down_source),
            (Register::CM108_IOMUX2, &self.playback_mute_source),
            (Register::CM108_IOMUX3, &self.record_mute_source),
        ];
        for (register, setting) in flag_fields {
            if let (Some(setting), RegisterKind::FlagSet(flags)) = (setting, register.kind()) {
                plan.insert(register, setting.encode(flags)?);
            }
        }

        let serial_iomux = [
            Register::SERIAL_IOMUX0,
            Register::SERIAL_IOMUX1,
            Register::SERIAL_IOMUX2,
            Register::SERIAL_IOMUX3,
        ];
        let scalars = [
            (Register::USBID, self.usb_id.map(UsbId::to_raw)),
            (Register::SERIAL_CTRL, self.serial_ctrl),
            (Register::AUDIO_RX, self.audio_rx_gain.map(AudioRxGain::to_raw)),
            (Register::AUDIO_TX, self.audio_tx_boost.map(AudioTxBoost::to_raw)),
            (Register::VPTT_LVLCTRL, self.vptt_level),
            (Register::VPTT_TIMCTRL, self.vptt_timing),
            (Register::VCOS_LVLCTRL, self.vcos_level),
            (Register::VCOS_TIMCTRL, self.vcos_timing),
            (Register::FOXHUNT_CTRL, self.foxhunt.map(FoxhuntControl::to_raw)),
        ];
        let present = scalars
            .into_iter()
            .chain(serial_iomux.into_iter().zip(self.serial_iomux))
            .filter_map(|(register, value)| value.map(|v| (register, v)));
        plan.extend(present);

        if let Some(message) = &self.foxhunt_message {
            plan.extend(Register::FOXHUNT_MSG.into_iter().zip(message.to_words()));
        }

        Ok(plan)
    }

    /// Settings that reproduce `snapshot` when applied.
    ///
    /// Flag registers and the message keep their raw words whenever the
    /// readable form would not write back the same bits. Audio values
    /// outside their enumerations are left out.
    pub fn from_snapshot(snapshot: &RegisterSnapshot) -> Self {
        let flags = |register| {
            let reading = snapshot.get(register)?;
            Some(FlagSetting::from_raw(reading.flag_enum()?, reading.raw))
        };

        Self {
            usb_id: snapshot.raw(Register::USBID).map(UsbId::from_raw),
            ptt1_source: flags(Register::AIOC_IOMUX0),
            ptt2_source: flags(Register::AIOC_IOMUX1),
            vol_up_source: flags(Register::CM108_IOMUX0),
            vol_down_source: flags(Register::CM108_IOMUX1),
            playback_mute_source: flags(Register::CM108_IOMUX2),
            record_mute_source: flags(Register::CM108_IOMUX3),
            serial_ctrl: snapshot.raw(Register::SERIAL_CTRL),
            serial_iomux: [
                snapshot.raw(Register::SERIAL_IOMUX0),
                snapshot.raw(Register::SERIAL_IOMUX1),
                snapshot.raw(Register::SERIAL_IOMUX2),
                snapshot.raw(Register::SERIAL_IOMUX3),
            ],
            audio_rx_gain: snapshot
                .raw(Register::AUDIO_RX)
                .and_then(|raw| AudioRxGain::from_raw(raw).ok()),
            audio_tx_boost: snapshot
                .raw(Register::AUDIO_TX)
                .and_then(|raw| AudioTxBoost::from_raw(raw).ok()),
            vptt_level: snapshot.raw(Register::VPTT_LVLCTRL),
            vptt_timing: snapshot.raw(Register::VPTT_TIMCTRL),
            vcos_level: snapshot.raw(Register::VCOS_LVLCTRL),
            vcos_timing: snapshot.raw(Register::VCOS_TIMCTRL),
            foxhunt: snapshot.raw(Register::FOXHUNT_CTRL).map(FoxhuntControl::from_raw),
            foxhunt_message: snapshot
                .foxhunt_message_words()
                .map(FoxhuntMessage::from_words),
            store: false,
        }
    }
}

/// Decoded register content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterValue {
    /// Flag names as rendered by [`decode_flags`].
    Flags(String),
    Scalar(u32),
    Fields(BTreeMap<&'static str, u32>),
}

/// One register as read from the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterReading {
    pub register: Register,
    pub address: u8,
    pub raw: u32,
    pub value: RegisterValue,
}

impl RegisterReading {
    pub fn new(register: Register, raw: u32) -> Self {
        let value = match register.kind() {
            RegisterKind::FlagSet(flags) => RegisterValue::Flags(decode_flags(flags, raw).to_string()),
            RegisterKind::Scalar => RegisterValue::Scalar(raw),
            RegisterKind::Packed(layout) => {
                RegisterValue::Fields(unpack_fields(layout, raw).into_iter().collect())
            }
        };
        Self {
            register,
            address: register.address(),
            raw,
            value,
        }
    }

    /// Flag enumeration this reading was decoded with, if any.
    pub fn flag_enum(&self) -> Option<FlagEnum> {
        match self.register.kind() {
            RegisterKind::FlagSet(flags) => Some(flags),
            _ => None,
        }
    }
}

/// Every known register, in address order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterSnapshot {
    pub registers: Vec<RegisterReading>,
}

impl RegisterSnapshot {
    pub fn get(&self, register: Register) -> Option<&RegisterReading> {
        self.registers.iter().find(|r| r.register == register)
    }

    pub fn raw(&self, register: Register) -> Option<u32> {
        self.get(register).map(|r| r.raw)
    }

    /// Raw `FOXHUNT_MSG0..3` words, if all four were read.
    pub fn foxhunt_message_words(&self) -> Option<[u32; MESSAGE_WORDS]> {
        let mut words = [0u32; MESSAGE_WORDS];
        for (word, register) in words.iter_mut().zip(Register::FOXHUNT_MSG) {
            *word = self.raw(register)?;
        }
        Some(words)
    }

    /// Foxhunt message for display, if all four message registers were read.
    pub fn foxhunt_message(&self) -> Option<String> {
        self.foxhunt_message_words().map(unpack_message)
    }
}
