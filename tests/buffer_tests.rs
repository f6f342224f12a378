//! Byte string engine tests
//!
//! Insert/remove shifting, growth, duplication and search on standalone
//! strings, without a registry.

use twine::{ByteString, GrowthConfig, TwineError};

#[cfg(test)]
mod buffer_tests {
    use super::*;

    fn string(bytes: &[u8]) -> ByteString {
        ByteString::from_bytes(bytes).unwrap()
    }

    fn assert_invariants(s: &ByteString) {
        assert!(s.capacity() >= s.len() + 1);
        assert_eq!(s.as_bytes_with_nul()[s.len()], 0);
    }

    #[test]
    fn test_construct_capacity() {
        let empty = ByteString::empty().unwrap();
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.capacity(), 30);
        assert_eq!(empty.as_bytes_with_nul(), b"\0");

        let short = string(b"hello");
        assert_eq!(short.capacity(), 30);

        let long = string(&[b'x'; 100]);
        assert_eq!(long.capacity(), 115);
        assert_invariants(&long);
    }

    #[test]
    fn test_hello_world_sequence() {
        let mut s = ByteString::empty().unwrap();
        s.append(b"world").unwrap();
        s.prepend(b"hello ").unwrap();
        assert_eq!(s, b"hello world");

        assert_eq!(s.remove(0).unwrap(), b'h');
        assert_eq!(s, b"ello world");

        let sub = s.substring(1, 4).unwrap().unwrap();
        assert_eq!(sub, b"llo");
        assert_eq!(sub.find(b"lo"), Some(1));
        assert_eq!(sub.as_c_str().to_bytes(), b"llo");
    }

    #[test]
    fn test_insert_preserves_surrounding_bytes() {
        let original = b"abcdefgh";
        for at in 0..=original.len() {
            let mut s = string(original);
            s.insert(b"XYZ", at).unwrap();

            assert_eq!(s.len(), original.len() + 3);
            assert_eq!(&s.as_bytes()[..at], &original[..at]);
            assert_eq!(&s.as_bytes()[at..at + 3], b"XYZ");
            assert_eq!(&s.as_bytes()[at + 3..], &original[at..]);
            assert_invariants(&s);
        }
    }

    #[test]
    fn test_insert_out_of_range_does_not_mutate() {
        let mut s = string(b"abc");
        let capacity = s.capacity();

        let err = s.insert(b"zz", 4).unwrap_err();
        assert!(matches!(
            err,
            TwineError::Range { operation: "insert", index: 4, length: 3 }
        ));
        assert_eq!(s, b"abc");
        assert_eq!(s.capacity(), capacity);
    }

    #[test]
    fn test_append_in_place_keeps_buffer() {
        let mut s = string(b"abc");
        let ptr = s.as_ptr();
        let capacity = s.capacity();

        s.append(b"def").unwrap();
        assert_eq!(s.as_ptr(), ptr);
        assert_eq!(s.capacity(), capacity);
        assert_eq!(s, b"abcdef");
    }

    #[test]
    fn test_prepend_shifts_whole_content() {
        let mut s = string(b"0123456789");
        s.prepend(b"ab").unwrap();
        assert_eq!(s, b"ab0123456789");

        s.insert(b"", 0).unwrap();
        assert_eq!(s, b"ab0123456789");
    }

    #[test]
    fn test_growth_uses_required_plus_reserve() {
        let growth = GrowthConfig::default().with_base_reserve(4);
        let mut s = ByteString::new(Some(b"ab"), growth).unwrap();
        assert_eq!(s.capacity(), 8);

        // 2 + 5 = 7 still leaves the terminator slot
        s.append(b"cdefg").unwrap();
        assert_eq!(s.capacity(), 8);

        // 7 + 1 = 8 does not
        s.insert(b"Z", 3).unwrap();
        assert_eq!(s.capacity(), 12);
        assert_eq!(s, b"abcZdefg");
        assert_invariants(&s);
    }

    #[test]
    fn test_many_small_appends() {
        let mut s = ByteString::empty().unwrap();
        let mut expected = Vec::new();
        for i in 0..500u32 {
            let piece = format!("{},", i);
            s.append(piece.as_bytes()).unwrap();
            expected.extend_from_slice(piece.as_bytes());
            assert_invariants(&s);
        }
        assert_eq!(s.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_remove_returns_byte_and_shifts() {
        let mut s = string(b"abcdef");
        assert_eq!(s.remove(2).unwrap(), b'c');
        assert_eq!(s, b"abdef");
        assert_eq!(s.remove(4).unwrap(), b'f');
        assert_eq!(s, b"abde");
        assert_invariants(&s);

        assert!(matches!(s.remove(4), Err(TwineError::Range { .. })));
        assert_eq!(s, b"abde");

        let mut empty = ByteString::empty().unwrap();
        assert!(empty.remove(0).is_err());
    }

    #[test]
    fn test_get_and_set() {
        let mut s = string(b"abc");
        assert_eq!(s.get(0).unwrap(), b'a');
        assert_eq!(s.get(2).unwrap(), b'c');
        assert!(s.get(3).is_err());

        assert_eq!(s.set(1, b'X').unwrap(), b'b');
        assert_eq!(s, b"aXc");
        assert!(s.set(3, b'Y').is_err());
        assert_eq!(s, b"aXc");
    }

    #[test]
    fn test_find() {
        let s = string(b"abcabc");
        assert_eq!(s.find(b"bc"), Some(1));
        assert_eq!(s.find(b"cab"), Some(2));
        assert_eq!(s.find(b"abcabc"), Some(0));
        assert_eq!(s.find(b"abcabcd"), None);
        assert_eq!(s.find(b"x"), None);
    }

    #[test]
    fn test_find_empty_pattern_matches_at_zero() {
        assert_eq!(string(b"abc").find(b""), Some(0));
        assert_eq!(ByteString::empty().unwrap().find(b""), Some(0));
    }

    #[test]
    fn test_find_does_not_look_past_length() {
        let mut s = string(b"abcdef");
        s.remove(5).unwrap();
        s.remove(4).unwrap();
        // "ef" bytes are gone from the logical content
        assert_eq!(s.find(b"e"), None);
    }

    #[test]
    fn test_find_crosses_interior_nul() {
        let s = string(b"ab\0cd");
        assert_eq!(s.find(b"cd"), Some(3));
    }

    #[test]
    fn test_substring_from_rejects_zero_start() {
        let s = string(b"hello");

        // Starting at 0 names a valid range but is rejected; copy() covers it
        assert!(s.substring_from(0).unwrap().is_none());
        assert!(s.substring_from(5).unwrap().is_none());
        assert!(s.substring_from(9).unwrap().is_none());

        assert_eq!(s.substring_from(1).unwrap().unwrap(), b"ello");
        assert_eq!(s.substring_from(4).unwrap().unwrap(), b"o");
    }

    #[test]
    fn test_substring_bounds() {
        let s = string(b"hello");
        assert_eq!(s.substring(0, 5).unwrap().unwrap(), b"hello");
        assert_eq!(s.substring(4, 5).unwrap().unwrap(), b"o");
        assert!(s.substring(2, 2).unwrap().is_none());
        assert!(s.substring(3, 2).unwrap().is_none());
        assert!(s.substring(0, 6).unwrap().is_none());
    }

    #[test]
    fn test_copy_is_independent() {
        let original = string(b"shared?");
        let mut copy = original.copy().unwrap();
        assert_eq!(copy, original);
        assert_ne!(copy.as_ptr(), original.as_ptr());

        copy.set(6, b'!').unwrap();
        copy.append(b" no").unwrap();
        assert_eq!(original, b"shared?");
        assert_eq!(copy, b"shared! no");
    }

    #[test]
    fn test_concat() {
        let mut a = string(b"foo");
        let b = string(b"bar");
        a.concat(&b).unwrap();
        assert_eq!(a, b"foobar");
        assert_eq!(b, b"bar");
    }

    #[test]
    fn test_clear_scrubs_by_default() {
        let mut s = string(b"secret");
        let capacity = s.capacity();
        s.clear();

        assert!(s.is_empty());
        assert_eq!(s.capacity(), capacity);
        assert_eq!(s.as_c_str().to_bytes(), b"");

        let raw = unsafe { std::slice::from_raw_parts(s.as_ptr(), s.capacity()) };
        assert!(raw.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clear_without_scrub_keeps_capacity() {
        let growth = GrowthConfig::default().with_scrub_on_clear(false);
        let mut s = ByteString::new(Some(b"abc"), growth).unwrap();
        let capacity = s.capacity();

        s.clear();
        assert_eq!(s.len(), 0);
        assert_eq!(s.capacity(), capacity);
        assert_eq!(s.as_bytes_with_nul(), b"\0");

        // Only the terminator was written
        let raw = unsafe { std::slice::from_raw_parts(s.as_ptr(), s.capacity()) };
        assert_eq!(&raw[..3], b"\0bc");

        s.append(b"z").unwrap();
        assert_eq!(s, b"z");
    }

    #[test]
    fn test_invalid_growth_config_is_rejected() {
        let growth = GrowthConfig::default().with_base_reserve(0);
        assert!(matches!(
            ByteString::new(None, growth),
            Err(TwineError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_exhausted_allocation_is_reported() {
        let growth = GrowthConfig::default().with_base_reserve(isize::MAX as usize / 2);
        assert!(growth.validate().is_ok());

        let err = ByteString::new(None, growth).unwrap_err();
        assert!(matches!(err, TwineError::Allocation { .. }));
        assert!(err.is_fatal());
    }
}
