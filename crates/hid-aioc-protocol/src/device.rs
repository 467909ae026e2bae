//! Single request/response operations against an open AIOC handle.
//!
//! Every function takes the transport as `&mut`, so one logical operation
//! (including the two transfers of a read) completes before the caller can
//! issue the next.

use crate::codec::{
    REGISTER_FRAME_LEN, REPORT_ID, decode_read_response, encode_command, encode_raw_pins,
    encode_read, encode_write,
};
use crate::flags::{Command, FlagDisplay, FlagEnum, decode_flags, encode_flags};
use crate::ids::{AIOC_MAGIC, PttChannel};
use crate::registers::{Register, RegisterKind};
use crate::{AiocError, AiocResult};
use aioc_hid_common::HidTransport;
use tracing::{debug, info, warn};

/// Read one register: select the address, then fetch the feature report.
pub fn read_register<T: HidTransport + ?Sized>(dev: &mut T, register: Register) -> AiocResult<u32> {
    dev.send_feature_report(&encode_read(register.address()))?;
    let response = dev.get_feature_report(REPORT_ID, REGISTER_FRAME_LEN)?;
    let value = decode_read_response(&response)?;
    debug!(
        register = register.name(),
        address = register.address(),
        value = format_args!("{value:#010x}"),
        "read register"
    );
    Ok(value)
}

/// Write one register with `WRITESTROBE`. There is no implicit readback.
pub fn write_register<T: HidTransport + ?Sized>(
    dev: &mut T,
    register: Register,
    value: u32,
) -> AiocResult<()> {
    debug!(
        register = register.name(),
        address = register.address(),
        value = format_args!("{value:#010x}"),
        "write register"
    );
    dev.send_feature_report(&encode_write(register.address(), value))?;
    Ok(())
}

/// Issue a bare command frame (`DEFAULTS`, `STORE`, `RECALL`, `REBOOT`).
pub fn send_command<T: HidTransport + ?Sized>(dev: &mut T, command: Command) -> AiocResult<()> {
    info!(command = ?command, "sending AIOC command");
    dev.send_feature_report(&encode_command(command))?;
    Ok(())
}

/// Drive one raw pin through the output-report path.
pub fn write_raw_pins<T: HidTransport + ?Sized>(
    dev: &mut T,
    pin: u8,
    asserted: bool,
) -> AiocResult<()> {
    let frame = encode_raw_pins(pin, asserted)?;
    info!(pin, asserted, "writing raw pin state");
    dev.write_output_report(&frame)?;
    Ok(())
}

/// Assert or release a PTT output directly, bypassing its source mux.
pub fn set_ptt_state<T: HidTransport + ?Sized>(
    dev: &mut T,
    channel: PttChannel,
    on: bool,
) -> AiocResult<()> {
    debug!(channel = channel.display_name(), on, "setting PTT state");
    write_raw_pins(dev, channel.pin(), on)
}

/// Register 0 as its four little-endian bytes.
pub fn read_magic<T: HidTransport + ?Sized>(dev: &mut T) -> AiocResult<[u8; 4]> {
    Ok(read_register(dev, Register::MAGIC)?.to_le_bytes())
}

/// Fail with [`AiocError::UnexpectedMagic`] unless register 0 reads `AIOC`.
pub fn verify_magic<T: HidTransport + ?Sized>(dev: &mut T) -> AiocResult<()> {
    let magic = read_magic(dev)?;
    if magic != AIOC_MAGIC {
        warn!(magic = %magic.escape_ascii(), "device did not identify as AIOC");
        return Err(AiocError::UnexpectedMagic(magic));
    }
    Ok(())
}

fn flag_enum(register: Register) -> AiocResult<FlagEnum> {
    match register.kind() {
        RegisterKind::FlagSet(flags) => Ok(flags),
        _ => Err(AiocError::NotAFlagRegister(register)),
    }
}

/// Read a flag-set register and decode it for display.
pub fn read_flags<T: HidTransport + ?Sized>(
    dev: &mut T,
    register: Register,
) -> AiocResult<FlagDisplay> {
    let flags = flag_enum(register)?;
    let raw = read_register(dev, register)?;
    Ok(decode_flags(flags, raw))
}

/// Parse `names` against the register's enumeration and write the union.
///
/// Nothing is written if any name is unknown. Returns the written value.
pub fn write_flags<T: HidTransport + ?Sized>(
    dev: &mut T,
    register: Register,
    names: &str,
) -> AiocResult<u32> {
    let value = encode_flags(flag_enum(register)?, names)?;
    write_register(dev, register, value)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::AIOC_MAGIC_VALUE;
    use aioc_hid_common::HidCommonError;
    use aioc_hid_common::mock::{MockHidTransport, MockTransfer};

    fn response(address: u8, value: u32) -> Vec<u8> {
        let [v0, v1, v2, v3] = value.to_le_bytes();
        vec![0, 0, address, v0, v1, v2, v3]
    }

    #[test]
    fn test_read_is_select_then_fetch() -> Result<(), Box<dyn std::error::Error>> {
        let mut dev = MockHidTransport::new();
        dev.queue_feature_response(response(0x24, 0x1000));

        assert_eq!(read_register(&mut dev, Register::AIOC_IOMUX0)?, 0x1000);
        assert_eq!(
            dev.history(),
            vec![
                MockTransfer::SendFeature(vec![0, 0, 0x24, 0, 0, 0, 0]),
                MockTransfer::GetFeature {
                    report_id: 0,
                    len: 7
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_read_short_response_is_malformed() {
        let mut dev = MockHidTransport::new();
        dev.queue_feature_response(vec![0, 0, 0x24]);
        assert!(matches!(
            read_register(&mut dev, Register::AIOC_IOMUX0),
            Err(AiocError::MalformedResponse {
                expected: 7,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_transport_error_surfaces_unchanged() {
        let mut dev = MockHidTransport::new();
        dev.disconnect();
        assert!(matches!(
            write_register(&mut dev, Register::USBID, 0),
            Err(AiocError::Transport(HidCommonError::Disconnected))
        ));
    }

    #[test]
    fn test_write_and_command_frames() -> Result<(), Box<dyn std::error::Error>> {
        let mut dev = MockHidTransport::new();
        write_register(&mut dev, Register::AIOC_IOMUX0, 0x1002)?;
        send_command(&mut dev, Command::STORE)?;
        assert_eq!(
            dev.sent_feature_reports(),
            vec![
                vec![0x00, 0x01, 0x24, 0x02, 0x10, 0x00, 0x00],
                vec![0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00],
            ]
        );
        Ok(())
    }

    #[test]
    fn test_ptt_state_uses_output_report() -> Result<(), Box<dyn std::error::Error>> {
        let mut dev = MockHidTransport::new();
        set_ptt_state(&mut dev, PttChannel::Ptt1, true)?;
        set_ptt_state(&mut dev, PttChannel::Ptt2, false)?;
        assert_eq!(
            dev.written_output_reports(),
            vec![vec![0, 0, 0x04, 0x04, 0], vec![0, 0, 0x00, 0x08, 0]]
        );
        assert!(dev.sent_feature_reports().is_empty());
        Ok(())
    }

    #[test]
    fn test_verify_magic() -> Result<(), Box<dyn std::error::Error>> {
        let mut dev = MockHidTransport::new();
        dev.queue_feature_response(response(0, AIOC_MAGIC_VALUE));
        verify_magic(&mut dev)?;

        dev.queue_feature_response(response(0, u32::from_le_bytes(*b"NOPE")));
        assert!(matches!(
            verify_magic(&mut dev),
            Err(AiocError::UnexpectedMagic(magic)) if &magic == b"NOPE"
        ));
        Ok(())
    }

    #[test]
    fn test_write_flags_rejects_before_writing() {
        let mut dev = MockHidTransport::new();
        assert!(matches!(
            write_flags(&mut dev, Register::AIOC_IOMUX0, "VPTT|BOGUS"),
            Err(AiocError::UnknownFlagName { ref name, .. }) if name == "BOGUS"
        ));
        assert!(dev.history().is_empty());
    }

    #[test]
    fn test_flag_helpers_check_register_kind() {
        let mut dev = MockHidTransport::new();
        assert!(matches!(
            write_flags(&mut dev, Register::USBID, "VPTT"),
            Err(AiocError::NotAFlagRegister(Register::USBID))
        ));
        assert!(matches!(
            read_flags(&mut dev, Register::AUDIO_RX),
            Err(AiocError::NotAFlagRegister(Register::AUDIO_RX))
        ));
        assert!(dev.history().is_empty());
    }

    #[test]
    fn test_read_flags_decodes() -> Result<(), Box<dyn std::error::Error>> {
        let mut dev = MockHidTransport::new();
        dev.queue_feature_response(response(0x44, 0x0001_0000));
        assert_eq!(
            read_flags(&mut dev, Register::CM108_IOMUX0)?,
            FlagDisplay::Exact("IN1")
        );
        Ok(())
    }
}
