//! Property-based tests for the little-endian report parser.

use aioc_hid_common::ReportParser;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A u32 read at any offset must equal `u32::from_le_bytes` of the same window.
    #[test]
    fn prop_u32_matches_from_le_bytes(
        data in proptest::collection::vec(any::<u8>(), 4..32),
        offset in 0usize..28,
    ) {
        prop_assume!(offset + 4 <= data.len());
        let mut parser = ReportParser::new(&data);
        parser.skip(offset);
        let value = parser.read_u32_le().map_err(|e| {
            TestCaseError::fail(format!("in-range read must succeed: {e}"))
        })?;
        let window = [data[offset], data[offset + 1], data[offset + 2], data[offset + 3]];
        prop_assert_eq!(value, u32::from_le_bytes(window));
        prop_assert_eq!(parser.remaining(), data.len() - offset - 4);
    }

    /// Reads past the end fail cleanly and leave the cursor where it was.
    #[test]
    fn prop_short_reads_fail_without_advancing(
        data in proptest::collection::vec(any::<u8>(), 0..4),
    ) {
        let mut parser = ReportParser::new(&data);
        prop_assert!(parser.read_u32_le().is_err());
        prop_assert_eq!(parser.remaining(), data.len());
    }

    /// `skip` saturates at the end of the buffer.
    #[test]
    fn prop_skip_saturates(
        data in proptest::collection::vec(any::<u8>(), 0..16),
        count in 0usize..64,
    ) {
        let mut parser = ReportParser::new(&data);
        parser.skip(count);
        prop_assert_eq!(parser.remaining(), data.len().saturating_sub(count));
    }
}
