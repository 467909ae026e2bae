//! Packed sub-field registers.
//!
//! Packing truncates values wider than their bit window, the same way the
//! device's own registers do. [`try_pack_fields`] is the strict variant.

use crate::{AiocError, AiocResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One sub-field: `width` bits starting at bit `shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BitField {
    pub name: &'static str,
    pub shift: u8,
    pub width: u8,
}

impl BitField {
    pub const fn new(name: &'static str, shift: u8, width: u8) -> Self {
        Self { name, shift, width }
    }

    pub fn mask(self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }

    pub fn extract(self, raw: u32) -> u32 {
        raw.checked_shr(u32::from(self.shift)).unwrap_or(0) & self.mask()
    }

    pub fn insert(self, raw: u32, value: u32) -> u32 {
        let shift = u32::from(self.shift);
        let window = self.mask().checked_shl(shift).unwrap_or(0);
        let bits = (value & self.mask()).checked_shl(shift).unwrap_or(0);
        (raw & !window) | bits
    }
}

/// Fixed field layout of a packed register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: &'static str,
    pub fields: &'static [BitField],
}

impl FieldLayout {
    pub fn field(&self, name: &str) -> Option<BitField> {
        self.fields.iter().copied().find(|f| f.name == name)
    }
}

const USB_PID: BitField = BitField::new("pid", 16, 16);
const USB_VID: BitField = BitField::new("vid", 0, 16);

/// `USBID`: product ID in the high half, vendor ID in the low half.
pub const USB_ID_LAYOUT: FieldLayout = FieldLayout {
    name: "USBID",
    fields: &[USB_PID, USB_VID],
};

const FOX_VOLUME: BitField = BitField::new("volume", 16, 16);
const FOX_RATE: BitField = BitField::new("rate", 8, 8);
const FOX_INTERVAL: BitField = BitField::new("interval", 0, 8);

/// `FOXHUNT_CTRL`: beacon volume, Morse rate (WPM) and interval (seconds).
pub const FOXHUNT_CTRL_LAYOUT: FieldLayout = FieldLayout {
    name: "FOXHUNT_CTRL",
    fields: &[FOX_VOLUME, FOX_RATE, FOX_INTERVAL],
};

/// `FOXHUNT_MSG0..3`: four message bytes, first byte in the low bits.
pub const MESSAGE_CHUNK_LAYOUT: FieldLayout = FieldLayout {
    name: "FOXHUNT_MSG",
    fields: &[
        BitField::new("byte0", 0, 8),
        BitField::new("byte1", 8, 8),
        BitField::new("byte2", 16, 8),
        BitField::new("byte3", 24, 8),
    ],
};

/// Pack named values into one register word.
///
/// Missing fields are zero. Values wider than their field keep only the low
/// bits.
///
/// # Errors
///
/// [`AiocError::UnknownField`] if a name is not part of `layout`.
pub fn pack_fields(layout: FieldLayout, values: &[(&str, u32)]) -> AiocResult<u32> {
    values.iter().try_fold(0u32, |raw, (name, value)| {
        let field = lookup(layout, name)?;
        if *value & !field.mask() != 0 {
            warn!(
                layout = layout.name,
                field = field.name,
                value = *value,
                "value wider than field, truncating"
            );
        }
        Ok(field.insert(raw, *value))
    })
}

/// Like [`pack_fields`], but over-width values are an error.
///
/// # Errors
///
/// [`AiocError::UnknownField`] for an unknown name,
/// [`AiocError::FieldOverflow`] for a value that does not fit.
pub fn try_pack_fields(layout: FieldLayout, values: &[(&str, u32)]) -> AiocResult<u32> {
    values.iter().try_fold(0u32, |raw, (name, value)| {
        let field = lookup(layout, name)?;
        if *value & !field.mask() != 0 {
            return Err(AiocError::FieldOverflow {
                field: field.name,
                value: *value,
                width: field.width,
            });
        }
        Ok(field.insert(raw, *value))
    })
}

/// Split a register word into its named fields, in layout order.
pub fn unpack_fields(layout: FieldLayout, raw: u32) -> Vec<(&'static str, u32)> {
    layout
        .fields
        .iter()
        .map(|field| (field.name, field.extract(raw)))
        .collect()
}

fn lookup(layout: FieldLayout, name: &str) -> AiocResult<BitField> {
    layout.field(name).ok_or_else(|| AiocError::UnknownField {
        field: name.to_string(),
    })
}

/// Typed view of `USBID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbId {
    pub vid: u16,
    pub pid: u16,
}

impl UsbId {
    pub fn new(vid: u16, pid: u16) -> Self {
        Self { vid, pid }
    }

    pub fn from_raw(raw: u32) -> Self {
        Self {
            vid: u16::try_from(USB_VID.extract(raw)).unwrap_or(u16::MAX),
            pid: u16::try_from(USB_PID.extract(raw)).unwrap_or(u16::MAX),
        }
    }

    pub fn to_raw(self) -> u32 {
        let raw = USB_PID.insert(0, u32::from(self.pid));
        USB_VID.insert(raw, u32::from(self.vid))
    }
}

/// Typed view of `FOXHUNT_CTRL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FoxhuntControl {
    pub volume: u16,
    /// Morse keying rate in words per minute.
    pub rate: u8,
    /// Seconds between beacons; 0 disables the beacon.
    pub interval: u8,
}

impl FoxhuntControl {
    pub fn from_raw(raw: u32) -> Self {
        Self {
            volume: u16::try_from(FOX_VOLUME.extract(raw)).unwrap_or(u16::MAX),
            rate: u8::try_from(FOX_RATE.extract(raw)).unwrap_or(u8::MAX),
            interval: u8::try_from(FOX_INTERVAL.extract(raw)).unwrap_or(u8::MAX),
        }
    }

    pub fn to_raw(self) -> u32 {
        let raw = FOX_VOLUME.insert(0, u32::from(self.volume));
        let raw = FOX_RATE.insert(raw, u32::from(self.rate));
        FOX_INTERVAL.insert(raw, u32::from(self.interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usb_id_layout() -> AiocResult<()> {
        let raw = pack_fields(USB_ID_LAYOUT, &[("vid", 0x1209), ("pid", 0x7388)])?;
        assert_eq!(raw, 0x7388_1209);
        assert_eq!(unpack_fields(USB_ID_LAYOUT, raw), vec![("pid", 0x7388), ("vid", 0x1209)]);
        Ok(())
    }

    #[test]
    fn test_foxhunt_layout() -> AiocResult<()> {
        let raw = pack_fields(
            FOXHUNT_CTRL_LAYOUT,
            &[("volume", 0x8000), ("rate", 20), ("interval", 60)],
        )?;
        assert_eq!(raw, 0x8000_143C);
        assert_eq!(
            unpack_fields(FOXHUNT_CTRL_LAYOUT, raw),
            vec![("volume", 0x8000), ("rate", 20), ("interval", 60)]
        );
        Ok(())
    }

    #[test]
    fn test_pack_truncates_over_width() -> AiocResult<()> {
        assert_eq!(pack_fields(USB_ID_LAYOUT, &[("vid", 0x1FFFF)])?, 0x0000_FFFF);
        assert_eq!(pack_fields(FOXHUNT_CTRL_LAYOUT, &[("interval", 0x1FF)])?, 0xFF);
        Ok(())
    }

    #[test]
    fn test_strict_pack_rejects_over_width() {
        assert!(matches!(
            try_pack_fields(USB_ID_LAYOUT, &[("vid", 0x1FFFF)]),
            Err(AiocError::FieldOverflow { field: "vid", value: 0x1FFFF, width: 16 })
        ));
        assert!(matches!(
            try_pack_fields(USB_ID_LAYOUT, &[("vid", 0xFFFF), ("pid", 0x1)]),
            Ok(0x0001_FFFF)
        ));
    }

    #[test]
    fn test_pack_unknown_field() {
        assert!(matches!(
            pack_fields(USB_ID_LAYOUT, &[("volume", 1)]),
            Err(AiocError::UnknownField { ref field }) if field == "volume"
        ));
    }

    #[test]
    fn test_missing_fields_are_zero_and_last_value_wins() -> AiocResult<()> {
        assert_eq!(pack_fields(USB_ID_LAYOUT, &[])?, 0);
        assert_eq!(
            pack_fields(USB_ID_LAYOUT, &[("pid", 0x1111), ("pid", 0x2222)])?,
            0x2222_0000
        );
        Ok(())
    }

    #[test]
    fn test_message_chunk_layout_is_little_endian() {
        let raw = u32::from_le_bytes(*b"HELL");
        assert_eq!(
            unpack_fields(MESSAGE_CHUNK_LAYOUT, raw),
            vec![
                ("byte0", u32::from(b'H')),
                ("byte1", u32::from(b'E')),
                ("byte2", u32::from(b'L')),
                ("byte3", u32::from(b'L')),
            ]
        );
    }

    #[test]
    fn test_typed_views_match_layouts() -> AiocResult<()> {
        let usb = UsbId::new(0x1209, 0x7388);
        assert_eq!(
            usb.to_raw(),
            pack_fields(USB_ID_LAYOUT, &[("vid", 0x1209), ("pid", 0x7388)])?
        );
        assert_eq!(UsbId::from_raw(usb.to_raw()), usb);

        let fox = FoxhuntControl {
            volume: 0xFFFF,
            rate: 15,
            interval: 30,
        };
        assert_eq!(
            fox.to_raw(),
            pack_fields(
                FOXHUNT_CTRL_LAYOUT,
                &[("volume", 0xFFFF), ("rate", 15), ("interval", 30)]
            )?
        );
        assert_eq!(FoxhuntControl::from_raw(fox.to_raw()), fox);
        Ok(())
    }

    #[test]
    fn test_typed_views_read_fields_from_layouts() {
        let raw = 0xA1B2_C3D4;
        let fields = |layout| unpack_fields(layout, raw);

        let usb = UsbId::from_raw(raw);
        assert_eq!(
            fields(USB_ID_LAYOUT),
            vec![("pid", u32::from(usb.pid)), ("vid", u32::from(usb.vid))]
        );
        assert_eq!(usb.to_raw(), raw);

        let fox = FoxhuntControl::from_raw(raw);
        assert_eq!(
            fields(FOXHUNT_CTRL_LAYOUT),
            vec![
                ("volume", u32::from(fox.volume)),
                ("rate", u32::from(fox.rate)),
                ("interval", u32::from(fox.interval)),
            ]
        );
        assert_eq!(fox.to_raw(), raw);
    }

    #[test]
    fn test_full_width_field_mask() {
        let field = BitField::new("word", 0, 32);
        assert_eq!(field.mask(), u32::MAX);
        assert_eq!(field.insert(0, 0xDEAD_BEEF), 0xDEAD_BEEF);
        assert_eq!(field.extract(0xDEAD_BEEF), 0xDEAD_BEEF);
    }
}
