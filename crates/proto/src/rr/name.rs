// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Domain name associated types, like Name

use std::fmt;

use crate::error::{ProtoErrorKind, ProtoResult};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// The maximum decoded length of a name, including the label separators
const MAX_NAME_LENGTH: usize = 255;

/// The maximum length of a single label
const MAX_LABEL_LENGTH: usize = 63;

/// Compression pointers form a chain; bound the walk to defeat crafted loops
const MAX_POINTER_JUMPS: usize = 128;

/// A domain name, stored in its decoded dot-terminated form, e.g. `host.local.`
///
/// The wire form of a name is a sequence of labels, each prefixed by its
/// length, ending at a zero-length label. A suffix may be replaced by a
/// two-byte pointer whose top two bits are `11` and whose remaining 14 bits
/// are the absolute offset of the suffix in the message. Pointers are
/// resolved on read; this implementation never emits them.
#[derive(Default, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Name {
    inner: Vec<u8>,
}

impl Name {
    /// Create a new, empty name
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a name from its presentation form
    ///
    /// A missing trailing dot is supplied, so `host.local` and `host.local.`
    /// produce the same name. Labels are validated against the wire limits.
    pub fn from_ascii(name: impl AsRef<[u8]>) -> ProtoResult<Self> {
        let name = name.as_ref();

        // the root name decodes to the empty byte sequence
        if name == b"." {
            return Ok(Self::new());
        }

        let mut inner = Vec::with_capacity(name.len() + 1);
        inner.extend_from_slice(name);
        if !inner.is_empty() && !inner.ends_with(b".") {
            inner.push(b'.');
        }

        let name = Self { inner };
        name.verify()?;

        Ok(name)
    }

    /// Returns the decoded form of the name as raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Length of the decoded form, label separators included
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` for the empty name
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if the name ends with the given suffix, e.g. `local.`
    pub fn ends_with(&self, suffix: &[u8]) -> bool {
        self.inner.ends_with(suffix)
    }

    /// Iterate the labels of the name, without their separators
    pub fn labels(&self) -> impl Iterator<Item = &[u8]> {
        self.inner.split(|b| *b == b'.').filter(|l| !l.is_empty())
    }

    fn verify(&self) -> ProtoResult<()> {
        if self.inner.len() > MAX_NAME_LENGTH {
            return Err(ProtoErrorKind::DomainNameTooLong(self.inner.len()).into());
        }

        let mut labels = self.inner.split(|b| *b == b'.').peekable();
        while let Some(label) = labels.next() {
            if label.len() > MAX_LABEL_LENGTH {
                return Err(ProtoErrorKind::LabelBytesTooLong(label.len()).into());
            }

            // only the terminating separator produces an empty chunk
            if label.is_empty() && labels.peek().is_some() {
                return Err(ProtoErrorKind::EmptyLabel.into());
            }
        }

        Ok(())
    }
}

impl BinEncodable for Name {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        self.verify()?;

        for label in self.labels() {
            encoder.emit(label.len() as u8)?;
            encoder.emit_vec(label)?;
        }

        // the zero-length root label terminates the name
        encoder.emit(0)
    }
}

impl<'r> BinDecodable<'r> for Name {
    /// Parses the chain of labels
    ///
    /// The position cursor stays in the original buffer so that pointers can
    /// be resolved against absolute offsets. After the first pointer is
    /// followed the outer decoder has already advanced past the name; the
    /// walk continues on cheap clones of the decoder.
    fn read(decoder: &mut BinDecoder<'r>) -> ProtoResult<Self> {
        let mut inner = Vec::with_capacity(32);

        // `current` borrows the same buffer; `None` means we are still
        // reading from the outer decoder and must keep its index current
        let mut current: Option<BinDecoder<'r>> = None;
        let mut jumps = 0;

        loop {
            let cur = current.as_mut().unwrap_or(&mut *decoder);
            let idx = cur.index();
            let byte = cur.pop()?;

            match byte {
                0 => break,

                b if b & 0b1100_0000 == 0b1100_0000 => {
                    // 14-bit absolute offset of the suffix
                    let low = cur.pop()?;
                    let ptr = u16::from(b & 0b0011_1111) << 8 | u16::from(low);

                    // pointers may only refer to earlier data
                    if usize::from(ptr) >= idx {
                        return Err(ProtoErrorKind::PointerNotPriorToLabel { idx, ptr }.into());
                    }

                    jumps += 1;
                    if jumps > MAX_POINTER_JUMPS {
                        return Err(ProtoErrorKind::TooManyPointerJumps { offset: idx }.into());
                    }

                    current = Some(cur.clone(ptr));
                }

                b if b & 0b1100_0000 != 0 => {
                    return Err(ProtoErrorKind::UnrecognizedLabelCode(b).into());
                }

                len => {
                    let label = cur.read_slice(len as usize)?;

                    inner.extend_from_slice(label);
                    inner.push(b'.');

                    if inner.len() > MAX_NAME_LENGTH {
                        return Err(ProtoErrorKind::DomainNameTooLong(inner.len()).into());
                    }
                }
            }
        }

        Ok(Self { inner })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(name: &Name) -> Name {
        let bytes = name.to_bytes().expect("encoding failed");
        Name::from_bytes(&bytes).expect("decoding failed")
    }

    #[test]
    fn test_from_ascii() {
        let name = Name::from_ascii("host.local.").unwrap();
        assert_eq!(name.as_bytes(), b"host.local.");

        // the trailing dot is supplied when missing
        let name = Name::from_ascii("host.local").unwrap();
        assert_eq!(name.as_bytes(), b"host.local.");

        assert!(Name::from_ascii("host..local.").is_err());
    }

    #[test]
    fn test_wire_round_trip() {
        for input in ["host.local.", "a.b.c.example.com.", ""] {
            let name = Name::from_ascii(input).unwrap();
            assert_eq!(round_trip(&name), name);
        }

        let name = Name::from_ascii("host.local.").unwrap();
        let bytes = name.to_bytes().unwrap();
        assert_eq!(
            bytes,
            b"\x04host\x05local\x00".to_vec(),
            "no compression on emit"
        );
    }

    #[test]
    fn test_label_too_long() {
        let label = vec![b'a'; 64];
        let mut raw = label.clone();
        raw.extend_from_slice(b".local.");
        assert!(Name::from_ascii(&raw).is_err());

        // and the same limit on the wire: 0x40 is an unrecognized label code
        let mut wire = vec![0x40u8];
        wire.extend_from_slice(&label);
        wire.push(0);
        assert!(Name::from_bytes(&wire).is_err());
    }

    #[test]
    fn test_name_too_long() {
        let mut raw = Vec::new();
        for _ in 0..16 {
            raw.extend_from_slice(&[b'a'; 15]);
            raw.push(b'.');
        }
        assert!(raw.len() > 255);
        assert!(Name::from_ascii(&raw).is_err());
    }

    #[test]
    fn test_pointer() {
        // "local." at offset 0, then "host" + pointer back to it
        let mut wire = Vec::new();
        wire.extend_from_slice(b"\x05local\x00");
        let host_at = wire.len();
        wire.extend_from_slice(b"\x04host\xC0\x00");

        let mut decoder = BinDecoder::new(&wire);
        let first = Name::read(&mut decoder).unwrap();
        assert_eq!(first.as_bytes(), b"local.");

        decoder = BinDecoder::new(&wire);
        decoder.read_slice(host_at).unwrap();
        let second = Name::read(&mut decoder).unwrap();
        assert_eq!(second.as_bytes(), b"host.local.");
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_pointer_to_self_rejected() {
        // a pointer at offset 0 referring to offset 0
        let wire = b"\xC0\x00";
        let err = Name::from_bytes(wire).unwrap_err();
        assert!(matches!(
            err.kind(),
            ProtoErrorKind::PointerNotPriorToLabel { .. }
        ));
    }

    #[test]
    fn test_forward_pointer_rejected() {
        // "host" then a pointer referring past itself
        let wire = b"\x04host\xC0\x09\x05local\x00";
        let err = Name::from_bytes(wire).unwrap_err();
        assert!(matches!(
            err.kind(),
            ProtoErrorKind::PointerNotPriorToLabel { .. }
        ));
    }

    #[test]
    fn test_pointer_budget() {
        // a long chain of pointers, each referring to the one before it
        let mut wire = Vec::new();
        wire.extend_from_slice(b"\x05local\x00");
        wire.extend_from_slice(&[0xC0, 0x00]);
        for _ in 0..200 {
            let prev = (wire.len() - 2) as u16;
            wire.push(0xC0 | (prev >> 8) as u8);
            wire.push(prev as u8);
        }

        let start = wire.len() - 2;
        let mut decoder = BinDecoder::new(&wire);
        decoder.read_slice(start).unwrap();
        let err = Name::read(&mut decoder).unwrap_err();
        assert!(matches!(
            err.kind(),
            ProtoErrorKind::TooManyPointerJumps { .. }
        ));
    }
}
