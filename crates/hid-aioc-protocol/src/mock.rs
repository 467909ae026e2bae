//! In-memory AIOC register file for tests.
//!
//! Behaves like the firmware's register handler: a select frame latches the
//! current address, a feature-report read returns that register, a
//! `WRITESTROBE` frame stores its value, and command frames act on the whole
//! register file.

use crate::codec::{REGISTER_FRAME_LEN, RAW_PIN_FRAME_LEN};
use crate::flags::{ButtonSource, Command, PttSource};
use crate::ids::{AIOC_MAGIC_VALUE, AIOC_PRODUCT_ID, AIOC_VENDOR_ID};
use crate::registers::Register;
use aioc_hid_common::{HidCommonError, HidCommonResult, HidTransport, ReportParser};
use std::collections::BTreeMap;

/// Simulated AIOC with a live and a stored register bank.
#[derive(Debug, Clone)]
pub struct MockAioc {
    live: BTreeMap<u8, u32>,
    stored: BTreeMap<u8, u32>,
    selected: u8,
    commands: Vec<Command>,
    pin_reports: Vec<Vec<u8>>,
    feature_writes: usize,
    reboots: usize,
}

impl Default for MockAioc {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAioc {
    /// Device in factory state.
    pub fn new() -> Self {
        let defaults = factory_defaults();
        Self {
            live: defaults.clone(),
            stored: defaults,
            selected: 0,
            commands: Vec::new(),
            pin_reports: Vec::new(),
            feature_writes: 0,
            reboots: 0,
        }
    }

    /// Device whose register 0 holds `magic` instead of `AIOC`.
    pub fn with_magic(magic: [u8; 4]) -> Self {
        let mut dev = Self::new();
        let value = u32::from_le_bytes(magic);
        dev.live.insert(Register::MAGIC.address(), value);
        dev.stored.insert(Register::MAGIC.address(), value);
        dev
    }

    pub fn register(&self, register: Register) -> u32 {
        self.live.get(&register.address()).copied().unwrap_or(0)
    }

    /// Set a live register without going through the wire protocol.
    pub fn poke(&mut self, register: Register, value: u32) {
        self.live.insert(register.address(), value);
    }

    pub fn stored_register(&self, register: Register) -> u32 {
        self.stored.get(&register.address()).copied().unwrap_or(0)
    }

    /// Commands received, in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn pin_reports(&self) -> &[Vec<u8>] {
        &self.pin_reports
    }

    /// Number of `WRITESTROBE` frames received.
    pub fn write_count(&self) -> usize {
        self.feature_writes
    }

    pub fn reboot_count(&self) -> usize {
        self.reboots
    }

    fn apply_command(&mut self, command: Command) {
        self.commands.push(command);
        if command.contains(Command::DEFAULTS) {
            let magic = self.register(Register::MAGIC);
            self.live = factory_defaults();
            self.live.insert(Register::MAGIC.address(), magic);
        }
        if command.contains(Command::RECALL) {
            self.live = self.stored.clone();
        }
        if command.contains(Command::STORE) {
            self.stored = self.live.clone();
        }
        if command.contains(Command::REBOOT) {
            self.reboots += 1;
            self.live = self.stored.clone();
        }
    }
}

/// Factory register values: PTT1 on the CM108 GPIO3 line, PTT2 unassigned,
/// volume buttons on the two inputs.
fn factory_defaults() -> BTreeMap<u8, u32> {
    let usb_id = (u32::from(AIOC_PRODUCT_ID) << 16) | u32::from(AIOC_VENDOR_ID);
    Register::ALL
        .into_iter()
        .map(|register| {
            let value = match register {
                Register::MAGIC => AIOC_MAGIC_VALUE,
                Register::USBID => usb_id,
                Register::AIOC_IOMUX0 => PttSource::CM108GPIO3.bits(),
                Register::CM108_IOMUX0 => ButtonSource::IN1.bits(),
                Register::CM108_IOMUX1 => ButtonSource::IN2.bits(),
                _ => 0,
            };
            (register.address(), value)
        })
        .collect()
}

impl HidTransport for MockAioc {
    fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()> {
        if data.len() != REGISTER_FRAME_LEN {
            return Err(HidCommonError::InvalidReport(format!(
                "expected {REGISTER_FRAME_LEN}-byte register frame, got {}",
                data.len()
            )));
        }
        let mut parser = ReportParser::new(data);
        parser.skip(1);
        let command = Command::from_bits_retain(parser.read_u8()?);
        let address = parser.read_u8()?;
        let value = parser.read_u32_le()?;

        if command.contains(Command::WRITESTROBE) {
            self.feature_writes += 1;
            // Writes to the magic register and to unmapped addresses are ignored.
            if address != Register::MAGIC.address() && self.live.contains_key(&address) {
                self.live.insert(address, value);
            }
        }
        let rest = command.difference(Command::WRITESTROBE);
        if rest.is_empty() {
            self.selected = address;
        } else {
            self.apply_command(rest);
        }
        Ok(())
    }

    fn get_feature_report(&mut self, report_id: u8, len: usize) -> HidCommonResult<Vec<u8>> {
        let value = self.live.get(&self.selected).copied().unwrap_or(0);
        let [v0, v1, v2, v3] = value.to_le_bytes();
        let mut frame = vec![report_id, 0, self.selected, v0, v1, v2, v3];
        frame.truncate(len);
        Ok(frame)
    }

    fn write_output_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        if data.len() != RAW_PIN_FRAME_LEN {
            return Err(HidCommonError::WriteError(format!(
                "expected {RAW_PIN_FRAME_LEN}-byte output report, got {}",
                data.len()
            )));
        }
        self.pin_reports.push(data.to_vec());
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_then_read() -> Result<(), Box<dyn std::error::Error>> {
        let mut dev = MockAioc::new();
        dev.send_feature_report(&[0, 0, 0x00, 0, 0, 0, 0])?;
        assert_eq!(
            dev.get_feature_report(0, 7)?,
            vec![0, 0, 0x00, b'A', b'I', b'O', b'C']
        );
        Ok(())
    }

    #[test]
    fn test_write_strobe_updates_live_only() -> Result<(), Box<dyn std::error::Error>> {
        let mut dev = MockAioc::new();
        dev.send_feature_report(&[0, 0x01, 0x82, 0x34, 0x12, 0, 0])?;
        assert_eq!(dev.register(Register::VPTT_LVLCTRL), 0x1234);
        assert_eq!(dev.stored_register(Register::VPTT_LVLCTRL), 0);
        assert_eq!(dev.write_count(), 1);

        dev.send_feature_report(&[0, 0x80, 0, 0, 0, 0, 0])?;
        assert_eq!(dev.stored_register(Register::VPTT_LVLCTRL), 0x1234);
        assert_eq!(dev.commands(), &[Command::STORE]);
        Ok(())
    }

    #[test]
    fn test_defaults_keeps_magic() -> Result<(), Box<dyn std::error::Error>> {
        let mut dev = MockAioc::with_magic(*b"XXXX");
        dev.poke(Register::AIOC_IOMUX1, 0x1000);
        dev.send_feature_report(&[0, 0x10, 0, 0, 0, 0, 0])?;
        assert_eq!(dev.register(Register::AIOC_IOMUX1), 0);
        assert_eq!(dev.register(Register::MAGIC), u32::from_le_bytes(*b"XXXX"));
        Ok(())
    }

    #[test]
    fn test_recall_and_reboot_restore_stored() -> Result<(), Box<dyn std::error::Error>> {
        let mut dev = MockAioc::new();
        dev.poke(Register::AUDIO_TX, 0x100);
        dev.send_feature_report(&[0, 0x40, 0, 0, 0, 0, 0])?;
        assert_eq!(dev.register(Register::AUDIO_TX), 0);

        dev.poke(Register::AUDIO_TX, 0x100);
        dev.send_feature_report(&[0, 0x20, 0, 0, 0, 0, 0])?;
        assert_eq!(dev.register(Register::AUDIO_TX), 0);
        assert_eq!(dev.reboot_count(), 1);
        Ok(())
    }

    #[test]
    fn test_magic_and_unmapped_writes_ignored() -> Result<(), Box<dyn std::error::Error>> {
        let mut dev = MockAioc::new();
        dev.send_feature_report(&[0, 0x01, 0x00, 1, 2, 3, 4])?;
        dev.send_feature_report(&[0, 0x01, 0x01, 1, 2, 3, 4])?;
        assert_eq!(dev.register(Register::MAGIC), AIOC_MAGIC_VALUE);
        dev.send_feature_report(&[0, 0, 0x01, 0, 0, 0, 0])?;
        assert_eq!(dev.get_feature_report(0, 7)?, vec![0, 0, 0x01, 0, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_rejects_wrong_frame_lengths() {
        let mut dev = MockAioc::new();
        assert!(dev.send_feature_report(&[0, 0, 0]).is_err());
        assert!(dev.write_output_report(&[0; 7]).is_err());
        assert!(dev.pin_reports().is_empty());
    }
}
