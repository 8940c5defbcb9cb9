//! # TIC Frame Decoder
//!
//! This module splits a teleinformation frame into its groups and checks each group
//! against its one-byte checksum. It leverages the `nom` crate for parsing the group lines.
//!
//! ## Wire layout
//!
//! ```text
//! STX ( LF TAG SP DATA SP CHECKSUM CR )* ETX
//! ```
//!
//! A [`TicFrame`] holds only the body between STX and ETX; the markers are consumed by the
//! frame reader.
//!
//! ## Usage
//!
//! ```
//! use tic_rs::tic::frame::{pack_group, validate, TicFrame};
//!
//! let frame = TicFrame::new(pack_group(b"PAPP", b"00750"));
//! for group in frame.groups() {
//!     assert!(validate(group.tag, group.data, group.checksum));
//! }
//! ```

use crate::constants::{
    TIC_CHECKSUM_BASE, TIC_CHECKSUM_MASK, TIC_FRAME_END, TIC_FRAME_START, TIC_GROUP_END,
    TIC_GROUP_SEPARATOR, TIC_GROUP_START,
};
use crate::error::TicError;
use bytes::Bytes;
use nom::bytes::complete::{tag, take_till};
use nom::combinator::opt;
use nom::number::complete::be_u8;
use nom::IResult;
use std::iter::FusedIterator;

/// One frame body, as read between the start and end markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicFrame {
    body: Bytes,
}

impl TicFrame {
    pub fn new(body: impl Into<Bytes>) -> Self {
        TicFrame { body: body.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Decodes the groups of this frame, in wire order.
    pub fn groups(&self) -> GroupDecoder<'_> {
        GroupDecoder::new(&self.body)
    }
}

/// A (tag, data, checksum) triple borrowed from a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicGroup<'a> {
    pub tag: &'a [u8],
    pub data: &'a [u8],
    pub checksum: u8,
}

impl<'a> TicGroup<'a> {
    pub fn tag_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.tag).ok()
    }

    pub fn data_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.data).ok()
    }

    pub fn is_valid(&self) -> bool {
        validate(self.tag, self.data, self.checksum)
    }
}

/// Single pass over the groups of a frame body.
///
/// Decoding stops at the first line missing a separator; the groups before it are still
/// yielded.
#[derive(Debug, Clone)]
pub struct GroupDecoder<'a> {
    rest: &'a [u8],
}

impl<'a> GroupDecoder<'a> {
    pub fn new(body: &'a [u8]) -> Self {
        GroupDecoder { rest: body }
    }
}

impl<'a> Iterator for GroupDecoder<'a> {
    type Item = TicGroup<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        match parse_group(self.rest) {
            Ok((rest, group)) => {
                self.rest = rest;
                Some(group)
            }
            Err(_) => {
                self.rest = &[];
                None
            }
        }
    }
}

impl FusedIterator for GroupDecoder<'_> {}

fn is_delimiter(b: u8) -> bool {
    b == TIC_GROUP_SEPARATOR || b == TIC_GROUP_START || b == TIC_GROUP_END
}

/// Parses one `LF TAG SP DATA SP CHECKSUM CR` line.
///
/// The leading LF and trailing CR are skipped when present. Tag and data never span a line
/// break. The checksum is the single byte after the second separator, whatever its value
/// (a space is a legal checksum).
pub fn parse_group(input: &[u8]) -> IResult<&[u8], TicGroup<'_>> {
    let (input, _) = opt(tag(&[TIC_GROUP_START][..]))(input)?;
    let (input, tag_bytes) = take_till(is_delimiter)(input)?;
    let (input, _) = tag(&[TIC_GROUP_SEPARATOR][..])(input)?;
    let (input, data) = take_till(is_delimiter)(input)?;
    let (input, _) = tag(&[TIC_GROUP_SEPARATOR][..])(input)?;
    let (input, checksum) = be_u8(input)?;
    let (input, _) = opt(tag(&[TIC_GROUP_END][..]))(input)?;
    Ok((
        input,
        TicGroup {
            tag: tag_bytes,
            data,
            checksum,
        },
    ))
}

/// Computes the checksum of a group: the low 6 bits of the byte sum of tag and data
/// (seeded with a space), offset by a space.
pub fn calculate_checksum(tag: &[u8], data: &[u8]) -> u8 {
    let sum = tag
        .iter()
        .chain(data)
        .fold(TIC_CHECKSUM_BASE, |acc, b| acc.wrapping_add(*b));
    TIC_CHECKSUM_BASE + (sum & TIC_CHECKSUM_MASK)
}

/// Returns true when `checksum` matches the one computed over `tag` and `data`.
pub fn validate(tag: &[u8], data: &[u8], checksum: u8) -> bool {
    calculate_checksum(tag, data) == checksum
}

/// Verifies the integrity of a group.
pub fn verify_group(group: &TicGroup<'_>) -> Result<(), TicError> {
    let calculated = calculate_checksum(group.tag, group.data);
    if group.checksum != calculated {
        return Err(TicError::ChecksumMismatch {
            expected: group.checksum,
            calculated,
        });
    }
    Ok(())
}

/// Packs one group line with its checksum.
pub fn pack_group(tag: &[u8], data: &[u8]) -> Vec<u8> {
    let mut line = Vec::with_capacity(tag.len() + data.len() + 5);
    line.push(TIC_GROUP_START);
    line.extend_from_slice(tag);
    line.push(TIC_GROUP_SEPARATOR);
    line.extend_from_slice(data);
    line.push(TIC_GROUP_SEPARATOR);
    line.push(calculate_checksum(tag, data));
    line.push(TIC_GROUP_END);
    line
}

/// Packs a complete frame, markers included, as a meter would emit it.
pub fn pack_frame<T, D>(groups: &[(T, D)]) -> Vec<u8>
where
    T: AsRef<[u8]>,
    D: AsRef<[u8]>,
{
    let mut frame = vec![TIC_FRAME_START];
    for (tag, data) in groups {
        frame.extend(pack_group(tag.as_ref(), data.as_ref()));
    }
    frame.push(TIC_FRAME_END);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_known_values() {
        // Groups captured from a single-phase meter
        assert_eq!(calculate_checksum(b"ISOUSC", b"30"), b'9');
        assert_eq!(calculate_checksum(b"PTEC", b"HP.."), b' ');
        assert_eq!(calculate_checksum(b"IINST", b"002"), b'Y');
        assert_eq!(calculate_checksum(b"MOTDETAT", b"000000"), b'B');
    }

    #[test]
    fn test_space_checksum_is_parsed() {
        let line = pack_group(b"PTEC", b"HP..");
        let (rest, group) = parse_group(&line).unwrap();
        assert!(rest.is_empty());
        assert_eq!(group.tag, b"PTEC");
        assert_eq!(group.data, b"HP..");
        assert_eq!(group.checksum, b' ');
        assert!(group.is_valid());
    }

    #[test]
    fn test_missing_separator_stops_decoding() {
        let mut body = pack_group(b"ADCO", b"123456789012");
        body.extend_from_slice(b"\nBROKEN\r");
        body.extend(pack_group(b"PAPP", b"00750"));
        let tags: Vec<&[u8]> = GroupDecoder::new(&body).map(|g| g.tag).collect();
        assert_eq!(tags, vec![&b"ADCO"[..]]);
    }

    #[test]
    fn test_empty_frame_has_no_groups() {
        let frame = TicFrame::new(Vec::new());
        assert!(frame.is_empty());
        assert_eq!(frame.groups().count(), 0);
    }

    #[test]
    fn test_verify_group_reports_both_checksums() {
        let group = TicGroup {
            tag: b"IINST",
            data: b"002",
            checksum: b'Z',
        };
        match verify_group(&group) {
            Err(TicError::ChecksumMismatch {
                expected,
                calculated,
            }) => {
                assert_eq!(expected, b'Z');
                assert_eq!(calculated, b'Y');
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
