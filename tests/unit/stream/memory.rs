//! Tests for the in-memory digit source and the hex digit helpers

#[cfg(test)]
mod tests {
    use pifind::SearchError;
    use pifind::stream::{
        DigitSource, MemorySource, decode_hex_digit, decode_hex_digits, encode_hex_digits,
    };

    // Tests parsing hex text of either case
    // Verified by accepting only lowercase digits
    #[test]
    fn test_from_hex() {
        let source = MemorySource::from_hex("243F6a").expect("valid digits");

        assert_eq!(source.digits(), &[2, 4, 3, 15, 6, 10]);
        assert_eq!(source.digit_count(), Some(6));
    }

    // Tests non-hex text and out-of-range values are refused
    // Verified by skipping invalid characters
    #[test]
    fn test_invalid_digits() {
        assert!(MemorySource::from_hex("12g4").is_err());
        assert!(MemorySource::new(vec![1, 16]).is_err());
        assert!(MemorySource::new(vec![0, 15]).is_ok());
    }

    // Tests fetching returns a prefix clipped at the end
    // Verified by padding short fetches
    #[test]
    fn test_fetch_prefix() {
        let mut source = MemorySource::from_hex("0123456789").expect("valid digits");

        assert_eq!(source.fetch(2, 3).ok(), Some(vec![2, 3, 4]));
        assert_eq!(source.fetch(8, 5).ok(), Some(vec![8, 9]));
    }

    // Tests fetching at or past the end is exhaustion
    // Verified by returning an empty chunk
    #[test]
    fn test_fetch_past_end() {
        let mut source = MemorySource::from_hex("0123").expect("valid digits");

        assert!(matches!(
            source.fetch(4, 1),
            Err(SearchError::SourceExhausted { offset: 4 })
        ));
        assert!(matches!(
            source.fetch(u64::MAX, 1),
            Err(SearchError::SourceExhausted { .. })
        ));
    }

    // Tests hex helpers for single digits and text
    // Verified by encoding uppercase
    #[test]
    fn test_hex_helpers() {
        assert_eq!(decode_hex_digit(b'7'), Some(7));
        assert_eq!(decode_hex_digit(b'F'), Some(15));
        assert_eq!(decode_hex_digit(b'.'), None);
        assert_eq!(encode_hex_digits(&[2, 4, 3, 15]), "243f");
        assert_eq!(decode_hex_digits("243f"), Some(vec![2, 4, 3, 15]));
        assert_eq!(decode_hex_digits("24 3f"), None);
    }
}
