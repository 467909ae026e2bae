//! Magic-checked session over an exclusively borrowed transport.
//!
//! [`AiocSession::open`] reads register 0 before anything else and refuses
//! the device unless it reads `AIOC`. Setters write, then read the register
//! back and return what the device actually holds.

use crate::audio::{AudioRxGain, AudioTxBoost};
use crate::device::{
    read_register, send_command, set_ptt_state, verify_magic, write_flags, write_register,
};
use crate::fields::{FieldLayout, FoxhuntControl, UsbId, pack_fields, unpack_fields};
use crate::flags::{ButtonSource, Command, PttSource};
use crate::ids::{Cm108Button, PttChannel};
use crate::message::{MESSAGE_WORDS, pack_message, unpack_message};
use crate::registers::{Register, RegisterKind};
use crate::settings::{DeviceSettings, RegisterReading, RegisterSnapshot};
use crate::{AiocError, AiocResult};
use aioc_hid_common::HidTransport;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// An open AIOC whose identity has been verified.
pub struct AiocSession<'a, T: HidTransport + ?Sized> {
    dev: &'a mut T,
}

impl<'a, T: HidTransport + ?Sized> AiocSession<'a, T> {
    /// Verify the magic register and take the handle for the session.
    ///
    /// # Errors
    ///
    /// [`AiocError::UnexpectedMagic`] if register 0 is not `AIOC`; nothing
    /// is written in that case.
    pub fn open(dev: &'a mut T) -> AiocResult<Self> {
        verify_magic(dev)?;
        debug!("AIOC session opened");
        Ok(Self { dev })
    }

    /// Release the session and hand the transport back.
    pub fn into_inner(self) -> &'a mut T {
        self.dev
    }

    pub fn read(&mut self, register: Register) -> AiocResult<u32> {
        read_register(self.dev, register)
    }

    /// Write `value` and return the readback.
    pub fn write(&mut self, register: Register, value: u32) -> AiocResult<u32> {
        write_register(self.dev, register, value)?;
        read_register(self.dev, register)
    }

    pub fn ptt_source(&mut self, channel: PttChannel) -> AiocResult<PttSource> {
        self.read(Register::for_ptt(channel))
            .map(PttSource::from_bits_retain)
    }

    pub fn set_ptt_source(
        &mut self,
        channel: PttChannel,
        source: PttSource,
    ) -> AiocResult<PttSource> {
        self.write(Register::for_ptt(channel), source.bits())
            .map(PttSource::from_bits_retain)
    }

    /// Set a PTT source from a `"VPTT|SERIALDTR"` style union.
    pub fn set_ptt_source_str(&mut self, channel: PttChannel, names: &str) -> AiocResult<PttSource> {
        let source = PttSource::parse_union(names)?;
        self.set_ptt_source(channel, source)
    }

    /// Exchange the PTT1 and PTT2 sources. Returns the new `(ptt1, ptt2)`.
    pub fn swap_ptt_sources(&mut self) -> AiocResult<(PttSource, PttSource)> {
        let ptt1 = self.ptt_source(PttChannel::Ptt1)?;
        let ptt2 = self.ptt_source(PttChannel::Ptt2)?;
        info!(
            ptt1 = %ptt1.describe(),
            ptt2 = %ptt2.describe(),
            "swapping PTT sources"
        );
        let new1 = self.set_ptt_source(PttChannel::Ptt1, ptt2)?;
        let new2 = self.set_ptt_source(PttChannel::Ptt2, ptt1)?;
        Ok((new1, new2))
    }

    /// Key PTT1 from the virtual PTT detector only.
    pub fn auto_ptt1(&mut self) -> AiocResult<PttSource> {
        self.set_ptt_source(PttChannel::Ptt1, PttSource::VPTT)
    }

    pub fn button_source(&mut self, button: Cm108Button) -> AiocResult<ButtonSource> {
        self.read(Register::for_button(button))
            .map(ButtonSource::from_bits_retain)
    }

    pub fn set_button_source(
        &mut self,
        button: Cm108Button,
        source: ButtonSource,
    ) -> AiocResult<ButtonSource> {
        self.write(Register::for_button(button), source.bits())
            .map(ButtonSource::from_bits_retain)
    }

    pub fn set_button_source_str(
        &mut self,
        button: Cm108Button,
        names: &str,
    ) -> AiocResult<ButtonSource> {
        let source = ButtonSource::parse_union(names)?;
        self.set_button_source(button, source)
    }

    pub fn usb_id(&mut self) -> AiocResult<UsbId> {
        self.read(Register::USBID).map(UsbId::from_raw)
    }

    /// Takes effect after the next reboot.
    pub fn set_usb_id(&mut self, id: UsbId) -> AiocResult<UsbId> {
        self.write(Register::USBID, id.to_raw()).map(UsbId::from_raw)
    }

    pub fn vptt_level(&mut self) -> AiocResult<u32> {
        self.read(Register::VPTT_LVLCTRL)
    }

    pub fn set_vptt_level(&mut self, value: u32) -> AiocResult<u32> {
        self.write(Register::VPTT_LVLCTRL, value)
    }

    pub fn vptt_timing(&mut self) -> AiocResult<u32> {
        self.read(Register::VPTT_TIMCTRL)
    }

    pub fn set_vptt_timing(&mut self, value: u32) -> AiocResult<u32> {
        self.write(Register::VPTT_TIMCTRL, value)
    }

    pub fn vcos_level(&mut self) -> AiocResult<u32> {
        self.read(Register::VCOS_LVLCTRL)
    }

    pub fn set_vcos_level(&mut self, value: u32) -> AiocResult<u32> {
        self.write(Register::VCOS_LVLCTRL, value)
    }

    pub fn vcos_timing(&mut self) -> AiocResult<u32> {
        self.read(Register::VCOS_TIMCTRL)
    }

    pub fn set_vcos_timing(&mut self, value: u32) -> AiocResult<u32> {
        self.write(Register::VCOS_TIMCTRL, value)
    }

    pub fn audio_rx_gain(&mut self) -> AiocResult<AudioRxGain> {
        AudioRxGain::from_raw(self.read(Register::AUDIO_RX)?)
    }

    pub fn set_audio_rx_gain(&mut self, gain: AudioRxGain) -> AiocResult<AudioRxGain> {
        AudioRxGain::from_raw(self.write(Register::AUDIO_RX, gain.to_raw())?)
    }

    pub fn audio_tx_boost(&mut self) -> AiocResult<AudioTxBoost> {
        AudioTxBoost::from_raw(self.read(Register::AUDIO_TX)?)
    }

    pub fn set_audio_tx_boost(&mut self, boost: AudioTxBoost) -> AiocResult<AudioTxBoost> {
        AudioTxBoost::from_raw(self.write(Register::AUDIO_TX, boost.to_raw())?)
    }

    pub fn foxhunt_control(&mut self) -> AiocResult<FoxhuntControl> {
        self.read(Register::FOXHUNT_CTRL).map(FoxhuntControl::from_raw)
    }

    pub fn set_foxhunt_control(&mut self, control: FoxhuntControl) -> AiocResult<FoxhuntControl> {
        self.write(Register::FOXHUNT_CTRL, control.to_raw())
            .map(FoxhuntControl::from_raw)
    }

    fn read_message_words(&mut self) -> AiocResult<[u32; MESSAGE_WORDS]> {
        let mut words = [0u32; MESSAGE_WORDS];
        for (word, register) in words.iter_mut().zip(Register::FOXHUNT_MSG) {
            *word = self.read(register)?;
        }
        Ok(words)
    }

    pub fn foxhunt_message(&mut self) -> AiocResult<String> {
        Ok(unpack_message(self.read_message_words()?))
    }

    /// Write all four message registers, then return the message read back.
    pub fn set_foxhunt_message(&mut self, text: &str) -> AiocResult<String> {
        for (register, word) in Register::FOXHUNT_MSG.into_iter().zip(pack_message(text)) {
            write_register(self.dev, register, word)?;
        }
        self.foxhunt_message()
    }

    fn layout(register: Register) -> AiocResult<FieldLayout> {
        match register.kind() {
            RegisterKind::Packed(layout) => Ok(layout),
            _ => Err(AiocError::NotAPackedRegister(register)),
        }
    }

    /// Read a packed register as named fields.
    pub fn fields(&mut self, register: Register) -> AiocResult<Vec<(&'static str, u32)>> {
        let layout = Self::layout(register)?;
        Ok(unpack_fields(layout, self.read(register)?))
    }

    /// Pack named fields (truncating) into `register` and return the readback fields.
    pub fn set_fields(
        &mut self,
        register: Register,
        values: &[(&str, u32)],
    ) -> AiocResult<Vec<(&'static str, u32)>> {
        let layout = Self::layout(register)?;
        let raw = pack_fields(layout, values)?;
        Ok(unpack_fields(layout, self.write(register, raw)?))
    }

    /// Write a flag union given as names; nothing is written on an unknown name.
    pub fn set_flags(&mut self, register: Register, names: &str) -> AiocResult<u32> {
        write_flags(self.dev, register, names)?;
        self.read(register)
    }

    /// Reset every register to factory values (not persisted).
    pub fn load_defaults(&mut self) -> AiocResult<()> {
        send_command(self.dev, Command::DEFAULTS)
    }

    /// Persist the live registers to flash.
    pub fn store(&mut self) -> AiocResult<()> {
        send_command(self.dev, Command::STORE)
    }

    /// Reload the live registers from flash.
    pub fn recall(&mut self) -> AiocResult<()> {
        send_command(self.dev, Command::RECALL)
    }

    /// Reboot the device. The handle is usually unusable afterwards.
    pub fn reboot(self) -> AiocResult<()> {
        send_command(self.dev, Command::REBOOT)
    }

    /// Assert or release a PTT output through the raw-pin path.
    pub fn set_ptt_state(&mut self, channel: PttChannel, on: bool) -> AiocResult<()> {
        set_ptt_state(self.dev, channel, on)
    }

    /// Read every known register in address order.
    pub fn snapshot(&mut self) -> AiocResult<RegisterSnapshot> {
        let mut registers = Vec::with_capacity(Register::ALL.len());
        for register in Register::ALL {
            let raw = self.read(register)?;
            registers.push(RegisterReading::new(register, raw));
        }
        Ok(RegisterSnapshot { registers })
    }

    /// Apply a settings document.
    ///
    /// Every flag string is parsed before the first write, so a bad name
    /// leaves the device untouched. Registers are written in address order
    /// and the readbacks returned. `STORE` follows when `settings.store`.
    pub fn apply(&mut self, settings: &DeviceSettings) -> AiocResult<BTreeMap<Register, u32>> {
        let plan = settings.plan()?;
        let mut readback = BTreeMap::new();
        for (register, value) in plan {
            readback.insert(register, self.write(register, value)?);
        }
        if settings.store {
            self.store()?;
        }
        info!(
            registers = readback.len(),
            stored = settings.store,
            "applied AIOC settings"
        );
        Ok(readback)
    }
}
