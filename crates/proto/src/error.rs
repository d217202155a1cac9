// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Error types for the crate

use std::{fmt, io};

use thiserror::Error;

/// An alias for results returned by functions of this crate
pub type ProtoResult<T> = Result<T, ProtoError>;

/// The error kind for errors that get returned in the crate
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtoErrorKind {
    /// Character data length exceeded the limit
    #[error("char data length exceeds {max}: {len}")]
    CharacterDataTooLong {
        /// Specified maximum
        max: usize,
        /// Actual length
        len: usize,
    },

    /// A domain name was too long
    #[error("name label data exceed 255: {0}")]
    DomainNameTooLong(usize),

    /// A name contained an empty label
    #[error("empty label is not allowed inside a name")]
    EmptyLabel,

    /// The RDATA consumed on read did not match the declared RDLENGTH
    #[error("incorrect rdata length read: {read} expected: {len}")]
    IncorrectRDataLengthRead {
        /// The number of bytes consumed
        read: usize,
        /// The number of bytes declared
        len: usize,
    },

    /// Label bytes exceeded the limit of 63
    #[error("label bytes exceed 63: {0}")]
    LabelBytesTooLong(usize),

    /// A name pointer must refer to data earlier in the message
    #[error("label points to data not prior to idx: {idx} ptr: {ptr}")]
    PointerNotPriorToLabel {
        /// index of the label containing this pointer
        idx: usize,
        /// location to which the pointer is directing
        ptr: u16,
    },

    /// The maximum number of name pointer jumps was exceeded
    #[error("too many compression pointer jumps at offset {offset}")]
    TooManyPointerJumps {
        /// offset of the last pointer followed
        offset: usize,
    },

    /// Bytes remained in the buffer after the last declared record
    #[error("trailing data at offset {offset}: {len} bytes")]
    TrailingData {
        /// offset at which the trailing bytes begin
        offset: usize,
        /// number of trailing bytes
        len: usize,
    },

    /// An unrecognized label code was found
    #[error("unrecognized label code: {0:b}")]
    UnrecognizedLabelCode(u8),

    /// The decoder ran out of input
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEnd {
        /// offset at which more input was expected
        offset: usize,
    },

    /// A record type with no decodable RDATA representation, in strict mode
    #[error("record type {0} not implemented")]
    UnsupportedRecordType(u16),

    /// A response carried an id different from the request's
    #[error("wrong id: {got}")]
    WrongId {
        /// the id of the request
        expected: u16,
        /// the id found in the response
        got: u16,
    },

    /// No response arrived before the deadline
    #[error("request timed out")]
    Timeout,

    /// A static error message
    #[error("{0}")]
    Message(&'static str),

    /// An error message
    #[error("{0}")]
    Msg(String),

    /// An error got returned from IO
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// The error type for errors that get returned in the crate
#[derive(Debug)]
pub struct ProtoError {
    kind: Box<ProtoErrorKind>,
}

impl ProtoError {
    /// Get the kind of the error
    pub fn kind(&self) -> &ProtoErrorKind {
        &self.kind
    }
}

impl fmt::Display for ProtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl std::error::Error for ProtoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &*self.kind {
            ProtoErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProtoErrorKind> for ProtoError {
    fn from(kind: ProtoErrorKind) -> Self {
        Self { kind: Box::new(kind) }
    }
}

impl From<&'static str> for ProtoError {
    fn from(msg: &'static str) -> Self {
        ProtoErrorKind::Message(msg).into()
    }
}

impl From<String> for ProtoError {
    fn from(msg: String) -> Self {
        ProtoErrorKind::Msg(msg).into()
    }
}

impl From<io::Error> for ProtoError {
    fn from(e: io::Error) -> Self {
        ProtoErrorKind::from(e).into()
    }
}
