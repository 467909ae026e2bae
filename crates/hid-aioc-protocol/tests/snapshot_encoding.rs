//! Snapshot tests for AIOC wire-format encoding and display strings.
//!
//! Inline snapshots pin the exact bytes sent to the device, so any change
//! to frame layout shows up as a diff here.

use hid_aioc_protocol as aioc;
use insta::assert_snapshot;

// ── Register frames ──────────────────────────────────────────────────────────

#[test]
fn snapshot_write_ptt1_source() {
    let frame = aioc::encode_write(aioc::Register::AIOC_IOMUX0.address(), 0x1002);
    assert_snapshot!(format!("{frame:02X?}"), @"[00, 01, 24, 02, 10, 00, 00]");
}

#[test]
fn snapshot_write_usb_id() {
    let frame = aioc::encode_write(
        aioc::Register::USBID.address(),
        aioc::UsbId::new(aioc::AIOC_VENDOR_ID, aioc::AIOC_PRODUCT_ID).to_raw(),
    );
    assert_snapshot!(format!("{frame:02X?}"), @"[00, 01, 08, 09, 12, 88, 73]");
}

#[test]
fn snapshot_select_magic() {
    let frame = aioc::encode_read(aioc::Register::MAGIC.address());
    assert_snapshot!(format!("{frame:02X?}"), @"[00, 00, 00, 00, 00, 00, 00]");
}

#[test]
fn snapshot_select_foxhunt_msg3() {
    let frame = aioc::encode_read(aioc::Register::FOXHUNT_MSG3.address());
    assert_snapshot!(format!("{frame:02X?}"), @"[00, 00, A5, 00, 00, 00, 00]");
}

#[test]
fn snapshot_command_store() {
    let frame = aioc::encode_command(aioc::Command::STORE);
    assert_snapshot!(format!("{frame:02X?}"), @"[00, 80, 00, 00, 00, 00, 00]");
}

#[test]
fn snapshot_command_defaults() {
    let frame = aioc::encode_command(aioc::Command::DEFAULTS);
    assert_snapshot!(format!("{frame:02X?}"), @"[00, 10, 00, 00, 00, 00, 00]");
}

// ── Raw pin frames ───────────────────────────────────────────────────────────

#[test]
fn snapshot_ptt1_assert() -> Result<(), aioc::AiocError> {
    let frame = aioc::encode_raw_pins(aioc::PttChannel::Ptt1.pin(), true)?;
    assert_snapshot!(format!("{frame:02X?}"), @"[00, 00, 04, 04, 00]");
    Ok(())
}

#[test]
fn snapshot_ptt2_release() -> Result<(), aioc::AiocError> {
    let frame = aioc::encode_raw_pins(aioc::PttChannel::Ptt2.pin(), false)?;
    assert_snapshot!(format!("{frame:02X?}"), @"[00, 00, 00, 08, 00]");
    Ok(())
}

// ── Flag display ─────────────────────────────────────────────────────────────

#[test]
fn snapshot_flags_exact() {
    let display = aioc::decode_flags(aioc::FlagEnum::PttSource, 0x0000_1000);
    assert_snapshot!(display.to_string(), @"VPTT");
}

#[test]
fn snapshot_flags_union() {
    let display = aioc::decode_flags(aioc::FlagEnum::PttSource, 0x0000_0009);
    assert_snapshot!(display.to_string(), @"CM108GPIO1|CM108GPIO4");
}

#[test]
fn snapshot_flags_none() {
    let display = aioc::decode_flags(aioc::FlagEnum::ButtonSource, 0);
    assert_snapshot!(display.to_string(), @"NONE");
}

#[test]
fn snapshot_flags_raw_hex() {
    let display = aioc::decode_flags(aioc::FlagEnum::PttSource, 0x8000_0000);
    assert_snapshot!(display.to_string(), @"0x80000000");
}

#[test]
fn snapshot_button_union() {
    let display = aioc::decode_flags(aioc::FlagEnum::ButtonSource, 0x0103_0000);
    assert_snapshot!(display.to_string(), @"IN1|IN2|VCOS");
}

// ── Error messages ───────────────────────────────────────────────────────────

#[test]
fn snapshot_unknown_flag_error() {
    let err = aioc::encode_flags(aioc::FlagEnum::PttSource, "VPTT|BOGUS");
    let message = err.map(|v| v.to_string()).unwrap_or_else(|e| e.to_string());
    assert_snapshot!(message, @"Unknown PTT source flag name: 'BOGUS'");
}

#[test]
fn snapshot_field_overflow_error() {
    let err = aioc::try_pack_fields(aioc::USB_ID_LAYOUT, &[("vid", 0x1FFFF)]);
    let message = err.map(|v| v.to_string()).unwrap_or_else(|e| e.to_string());
    assert_snapshot!(message, @"Value 0x1ffff does not fit field 'vid' (16 bits)");
}

#[test]
fn snapshot_audio_setting_error() {
    let message = aioc::AudioRxGain::from_raw(9)
        .map(|g| g.name().to_string())
        .unwrap_or_else(|e| e.to_string());
    assert_snapshot!(message, @"Register AUDIO_RX holds 0x00000009, which is not a valid setting");
}

#[test]
fn snapshot_unknown_register_error() {
    let message = aioc::Register::try_from(0x01u8)
        .map(|r| r.to_string())
        .unwrap_or_else(|e| e.to_string());
    assert_snapshot!(message, @"Unknown register address: 0x01");
}

// ── Serialized readings ──────────────────────────────────────────────────────

#[test]
fn snapshot_usb_id_reading_json() -> Result<(), serde_json::Error> {
    let reading = aioc::RegisterReading::new(aioc::Register::USBID, 0x7388_1209);
    assert_snapshot!(
        serde_json::to_string(&reading)?,
        @r#"{"register":"USBID","address":8,"raw":1938297353,"value":{"fields":{"pid":29576,"vid":4617}}}"#
    );
    Ok(())
}

#[test]
fn snapshot_ptt_reading_json() -> Result<(), serde_json::Error> {
    let reading = aioc::RegisterReading::new(aioc::Register::AIOC_IOMUX1, 0x0000_0102);
    assert_snapshot!(
        serde_json::to_string(&reading)?,
        @r#"{"register":"AIOC_IOMUX1","address":37,"raw":258,"value":{"flags":"CM108GPIO2|SERIALDTR"}}"#
    );
    Ok(())
}
