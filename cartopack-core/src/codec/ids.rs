//! Delta and bitmask compression of sparse node id arrays.
//!
//! An array is stored as its smallest non-zero id followed, when that id is
//! non-zero, by one presence byte per block of eight entries and the offset
//! of every non-zero entry from the smallest id.

use std::io::{Read, Write};

use super::{CodecError, DataScanner, DataWriter, MAX_PREALLOCATION};
use crate::area::Id;

const BLOCK: usize = 8;

/// Write an id array in delta and bitmask form.
///
/// # Errors
///
/// Returns [`CodecError::Io`] when the stream rejects the write.
///
/// # Examples
///
/// ```
/// use cartopack_core::codec::write_id_array;
/// use cartopack_core::DataWriter;
///
/// # fn main() -> Result<(), cartopack_core::CodecError> {
/// let mut writer = DataWriter::new(Vec::new());
/// write_id_array(&mut writer, &[0, 42, 0, 43])?;
/// // minimum id, one block mask, then the deltas 0 and 1.
/// assert_eq!(writer.into_inner(), vec![42, 0b0000_1010, 0, 1]);
/// # Ok(())
/// # }
/// ```
pub fn write_id_array<W: Write>(writer: &mut DataWriter<W>, ids: &[Id]) -> Result<(), CodecError> {
    let min_id = ids.iter().copied().filter(|&id| id != 0).min().unwrap_or(0);
    writer.write_number(min_id)?;
    if min_id == 0 {
        return Ok(());
    }
    for block in ids.chunks(BLOCK) {
        let mask = block
            .iter()
            .enumerate()
            .filter(|&(_, &id)| id != 0)
            .fold(0_u8, |mask, (bit, _)| mask | (1 << bit));
        writer.write_u8(mask)?;
        for &id in block.iter().filter(|&&id| id != 0) {
            writer.write_number(id - min_id)?;
        }
    }
    Ok(())
}

/// Read an id array of `len` entries.
///
/// When `keep` is false the array is parsed and an empty vector returned.
///
/// # Errors
///
/// Returns [`CodecError::IdOverflow`] when an entry does not fit an [`Id`] and
/// [`CodecError::InvalidIdMask`] when the last mask flags missing entries.
pub fn read_id_array<R: Read>(
    scanner: &mut DataScanner<R>,
    len: usize,
    keep: bool,
) -> Result<Vec<Id>, CodecError> {
    let min_id = scanner.read_number()?;
    if min_id == 0 {
        return Ok(if keep { vec![0; len] } else { Vec::new() });
    }
    let mut ids = Vec::with_capacity(if keep { len.min(MAX_PREALLOCATION) } else { 0 });
    let mut remaining = len;
    while remaining > 0 {
        let block_len = remaining.min(BLOCK);
        let mask = scanner.read_u8()?;
        if block_len < BLOCK && mask >> block_len != 0 {
            return Err(CodecError::InvalidIdMask {
                mask,
                entries: block_len,
            });
        }
        for bit in 0..block_len {
            let id = if mask & (1 << bit) == 0 {
                0
            } else {
                let delta = scanner.read_number()?;
                min_id
                    .checked_add(delta)
                    .ok_or(CodecError::IdOverflow { base: min_id, delta })?
            };
            if keep {
                ids.push(id);
            }
        }
        remaining -= block_len;
    }
    Ok(ids)
}

/// Write the presence byte and, when `ids` is given, the array after it.
pub(crate) fn write_id_section<W: Write>(
    writer: &mut DataWriter<W>,
    ids: Option<&[Id]>,
) -> Result<(), CodecError> {
    match ids {
        Some(ids) => {
            writer.write_u8(1)?;
            write_id_array(writer, ids)
        }
        None => writer.write_u8(0),
    }
}

/// Read an id section for `len` nodes.
pub(crate) fn read_id_section<R: Read>(
    scanner: &mut DataScanner<R>,
    len: usize,
    keep: bool,
) -> Result<Vec<Id>, CodecError> {
    match scanner.read_u8()? {
        0 => Ok(Vec::new()),
        1 => read_id_array(scanner, len, keep),
        other => Err(CodecError::InvalidIdPresence(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    fn encode(ids: &[Id]) -> Vec<u8> {
        let mut writer = DataWriter::new(Vec::new());
        write_id_array(&mut writer, ids).expect("encode");
        writer.into_inner()
    }

    fn decode(bytes: Vec<u8>, len: usize) -> Result<Vec<Id>, CodecError> {
        read_id_array(&mut DataScanner::new(Cursor::new(bytes)), len, true)
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![17])]
    #[case(vec![0; 7])]
    #[case(vec![1, 2, 3, 4, 5, 6, 7, 8])]
    #[case(vec![9, 0, 11, 0, 0, 0, 0, 0, 300])]
    #[case((1..=20).map(|id| if id % 3 == 0 { 0 } else { id * 1_000_003 }).collect())]
    fn arrays_decode_to_their_input(#[case] ids: Vec<Id>) {
        let len = ids.len();
        assert_eq!(decode(encode(&ids), len).expect("decode"), ids);
    }

    #[test]
    fn all_zero_arrays_store_only_the_minimum() {
        assert_eq!(encode(&[0, 0, 0]), vec![0]);
    }

    #[test]
    fn single_entry_uses_one_delta_byte() {
        assert_eq!(encode(&[5_000]), vec![0x88, 0x27, 0b0000_0001, 0]);
    }

    #[test]
    fn equal_entries_encode_zero_deltas() {
        let bytes = encode(&[77; 9]);
        assert_eq!(bytes, vec![77, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0, 0b0000_0001, 0]);
    }

    #[test]
    fn discarded_arrays_are_still_consumed() {
        let mut bytes = encode(&[3, 0, 4]);
        bytes.push(0xAB);
        let mut scanner = DataScanner::new(Cursor::new(bytes));
        assert!(read_id_array(&mut scanner, 3, false).expect("decode").is_empty());
        assert_eq!(scanner.read_u8().expect("trailing byte"), 0xAB);
    }

    #[test]
    fn reconstructed_ids_must_fit() {
        let mut writer = DataWriter::new(Vec::new());
        writer.write_number(u64::MAX).expect("min");
        writer.write_u8(1).expect("mask");
        writer.write_number(1).expect("delta");
        let err = decode(writer.into_inner(), 1).expect_err("overflow");
        assert!(matches!(err, CodecError::IdOverflow { delta: 1, .. }));
    }

    #[rstest]
    #[case(vec![5, 0b1000_0111, 0, 0, 0], 3, 0b1000_0111, 3)]
    #[case(vec![5, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0, 0b0000_0011, 0, 0], 9, 0b0000_0011, 1)]
    fn stray_mask_bits_are_rejected(
        #[case] bytes: Vec<u8>,
        #[case] len: usize,
        #[case] bad: u8,
        #[case] left: usize,
    ) {
        let err = decode(bytes, len).expect_err("stray mask bits");
        assert!(matches!(
            err,
            CodecError::InvalidIdMask { mask, entries } if mask == bad && entries == left
        ));
    }

    #[test]
    fn truncated_arrays_fail() {
        let mut bytes = encode(&[1, 2, 3]);
        bytes.pop();
        assert!(decode(bytes, 3).expect_err("short").is_truncation());
    }

    #[rstest]
    #[case(vec![0], Some(vec![]))]
    #[case(vec![2], None)]
    fn presence_byte_is_validated(#[case] bytes: Vec<u8>, #[case] expected: Option<Vec<Id>>) {
        let result = read_id_section(&mut DataScanner::new(Cursor::new(bytes)), 4, true);
        match expected {
            Some(ids) => assert_eq!(result.expect("valid section"), ids),
            None => assert!(matches!(result, Err(CodecError::InvalidIdPresence(2)))),
        }
    }
}
