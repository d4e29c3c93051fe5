// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
use core::fmt;

/// Error returned by all fallible operations of a pixel array.
///
/// Errors are always reported to the immediate caller. A failed bulk write has not modified the
/// underlying buffer, all validation happens before the first byte is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
}

/// The category of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The bytes per pixel of a surface are outside `1..=4`, or its channel shifts do not fit.
    InvalidDepth,
    /// A region resolved to zero pixels where that is not allowed.
    EmptyRegion,
    /// A scalar index is negative or past the end of its axis.
    IndexOutOfRange,
    /// More selector components than the view has axes.
    TooManyIndices,
    /// A slice with a step of zero.
    ZeroStep,
    /// Source and destination views of a copy have a different number of columns or rows.
    ShapeMismatch,
    /// Source and destination views of a copy have a different number of bytes per pixel.
    DepthMismatch,
    /// A color sequence does not fit the rows of its destination.
    SequenceLengthMismatch,
    /// A color argument that can not be represented as a packed pixel value.
    InvalidColor,
    /// Concatenation or repetition, which a fixed-stride view can not perform.
    UnsupportedOperation,
    /// The surface buffer is too small for its width, height and pitch.
    BadLayout,
}

impl Error {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error { kind }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            ErrorKind::InvalidDepth => "unsupported bit depth for pixel array",
            ErrorKind::EmptyRegion => "array size must not be 0",
            ErrorKind::IndexOutOfRange => "array index out of range",
            ErrorKind::TooManyIndices => "too many indices for the array",
            ErrorKind::ZeroStep => "slice step cannot be zero",
            ErrorKind::ShapeMismatch => "array sizes do not match",
            ErrorKind::DepthMismatch => "bit depths do not match",
            ErrorKind::SequenceLengthMismatch => "sequence size mismatch",
            ErrorKind::InvalidColor => "invalid color argument",
            ErrorKind::UnsupportedOperation => "method not implemented",
            ErrorKind::BadLayout => "surface buffer does not fit its dimensions",
        };

        f.write_str(msg)
    }
}

impl core::error::Error for Error {}

#[test]
fn kind_round_trip() {
    let err = Error::from(ErrorKind::ShapeMismatch);
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert_ne!(err, Error::from(ErrorKind::DepthMismatch));
}
