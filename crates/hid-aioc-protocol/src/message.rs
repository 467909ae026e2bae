//! Foxhunt beacon message, spread over `FOXHUNT_MSG0..3`.
//!
//! The message is 16 single-byte characters, zero padded. Each register holds
//! four of them, first character in the low byte.

/// Message capacity in bytes.
pub const MESSAGE_LEN: usize = 16;
/// Number of message registers.
pub const MESSAGE_WORDS: usize = MESSAGE_LEN / 4;

/// Byte stored for characters outside the single-byte range.
const UNENCODABLE: u8 = b'?';

/// Pack `text` into the four message register values, truncating to
/// [`MESSAGE_LEN`] bytes.
pub fn pack_message(text: &str) -> [u32; MESSAGE_WORDS] {
    pack_message_with_limit(text, MESSAGE_LEN)
}

/// Pack at most `max_bytes` characters of `text` (capped at [`MESSAGE_LEN`]),
/// zero padding the rest.
pub fn pack_message_with_limit(text: &str, max_bytes: usize) -> [u32; MESSAGE_WORDS] {
    let mut bytes = [0u8; MESSAGE_LEN];
    for (slot, ch) in bytes
        .iter_mut()
        .zip(text.chars())
        .take(max_bytes.min(MESSAGE_LEN))
    {
        *slot = u8::try_from(u32::from(ch)).unwrap_or(UNENCODABLE);
    }

    let mut words = [0u32; MESSAGE_WORDS];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        let mut le = [0u8; 4];
        le.copy_from_slice(chunk);
        *word = u32::from_le_bytes(le);
    }
    words
}

/// Raw message bytes up to (not including) the first zero byte.
pub fn unpack_message_bytes(words: [u32; MESSAGE_WORDS]) -> Vec<u8> {
    words
        .iter()
        .flat_map(|word| word.to_le_bytes())
        .take_while(|b| *b != 0)
        .collect()
}

/// Message text for display. Bytes outside printable ASCII become
/// U+FFFD so they stay visible.
pub fn unpack_message(words: [u32; MESSAGE_WORDS]) -> String {
    unpack_message_bytes(words)
        .into_iter()
        .map(|b| {
            if b == b' ' || b.is_ascii_graphic() {
                char::from(b)
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect()
}
