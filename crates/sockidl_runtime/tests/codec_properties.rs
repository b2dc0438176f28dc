//! Property tests for the wire codec.

use proptest::prelude::*;
use sockidl_runtime::wire::{ByteReader, ByteWriter, Wire, peek_message_id};

fn round_trip<T: Wire>(value: &T) -> (T, usize) {
    let mut w = ByteWriter::new();
    value.encode(&mut w).expect("encode");
    let bytes = w.into_bytes();
    let mut r = ByteReader::new(&bytes);
    let decoded = T::decode(&mut r).expect("decode");
    (decoded, r.remaining())
}

proptest! {
    #[test]
    fn i64_survives_split_halves(v in any::<i64>()) {
        let (decoded, rest) = round_trip(&v);
        prop_assert_eq!(decoded, v);
        prop_assert_eq!(rest, 0);
    }

    #[test]
    fn f64_keeps_its_bits(v in any::<f64>()) {
        let (decoded, _) = round_trip(&v);
        prop_assert_eq!(decoded.to_bits(), v.to_bits());
    }

    #[test]
    fn strings_and_sequences(items in proptest::collection::vec(".*", 0..8)) {
        let (decoded, rest) = round_trip(&items);
        prop_assert_eq!(decoded, items);
        prop_assert_eq!(rest, 0);
    }

    #[test]
    fn fixed_arrays_use_exactly_their_element_bytes(arr in any::<[u16; 5]>()) {
        let mut w = ByteWriter::new();
        arr.encode(&mut w).expect("encode");
        prop_assert_eq!(w.len(), 10);
        let (decoded, _) = round_trip(&arr);
        prop_assert_eq!(decoded, arr);
    }

    /// Truncated input is an error, never a panic.
    #[test]
    fn truncated_input_is_an_error(items in proptest::collection::vec(any::<u32>(), 1..8), cut in 1usize..4) {
        let mut w = ByteWriter::new();
        items.encode(&mut w).expect("encode");
        let bytes = w.into_bytes();
        let truncated = &bytes[..bytes.len() - cut];
        let mut r = ByteReader::new(truncated);
        prop_assert!(Vec::<u32>::decode(&mut r).is_err());
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let _ = peek_message_id(&bytes);
        let mut r = ByteReader::new(&bytes);
        let _ = Vec::<String>::decode(&mut r);
    }
}
