// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
//! Selecting parts of the axes of a pixel array.
use core::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::{Error, ErrorKind};

/// One component of a subscript, addressing one axis of a pixel array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    /// The whole axis.
    Full,
    /// A single position. Negative values count from the end of the axis.
    Index(isize),
    /// A range of positions, possibly reversed or skipping elements.
    Slice(Slice),
}

/// A slice of an axis, with the usual bound semantics.
///
/// Negative bounds count from the end of the axis, bounds outside the axis are clamped to it.
/// Omitted bounds default to the whole axis in the direction of the step. A negative step walks
/// the axis backwards, starting at `start`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

/// A resolved part of one axis.
///
/// Selects `count` positions, the first at `first`, each following one `step` positions after
/// the previous one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AxisRange {
    pub(crate) first: usize,
    pub(crate) count: usize,
    pub(crate) step: isize,
}

impl Slice {
    /// The whole axis, in order.
    pub const FULL: Self = Slice {
        start: None,
        stop: None,
        step: None,
    };

    pub const fn new(start: isize, stop: isize) -> Self {
        Slice {
            start: Some(start),
            stop: Some(stop),
            step: None,
        }
    }

    /// Walk the slice with a different step.
    pub const fn step_by(self, step: isize) -> Self {
        Slice {
            step: Some(step),
            ..self
        }
    }

    /// The reversed whole axis.
    pub const fn reversed() -> Self {
        Slice::FULL.step_by(-1)
    }
}

impl AxisRange {
    pub(crate) fn full(len: usize) -> Self {
        AxisRange {
            first: 0,
            count: len,
            step: 1,
        }
    }

    pub(crate) fn single(index: usize) -> Self {
        AxisRange {
            first: index,
            count: 1,
            step: 1,
        }
    }

    /// Resolve a selector against an axis of `len` positions.
    pub(crate) fn resolve(selector: &Selector, len: usize) -> Result<Self, Error> {
        match *selector {
            Selector::Full => Ok(AxisRange::full(len)),
            Selector::Index(index) => wrap_index(index, len).map(AxisRange::single),
            Selector::Slice(slice) => AxisRange::from_slice(slice, len),
        }
    }

    /// Select `[low, high)` with a step, clamping both bounds into the axis.
    ///
    /// A negative step walks backwards, starting from `high - 1`.
    pub(crate) fn clamped(len: usize, low: usize, high: usize, step: isize) -> Result<Self, Error> {
        if step == 0 {
            return Err(ErrorKind::ZeroStep.into());
        }

        let low = low.min(len);
        let high = high.clamp(low, len);
        let count = (high - low).div_ceil(step.unsigned_abs());

        let first = match count {
            0 => 0,
            _ if step > 0 => low,
            _ => high - 1,
        };

        Ok(AxisRange { first, count, step })
    }

    fn from_slice(slice: Slice, len: usize) -> Result<Self, Error> {
        let step = slice.step.unwrap_or(1);
        if step == 0 {
            return Err(ErrorKind::ZeroStep.into());
        }

        // Keeps `-step` representable.
        let step = step.max(-isize::MAX);
        let len = len as isize;

        let adjust = |bound: isize| {
            if bound < 0 {
                let bound = bound + len;
                if bound < 0 {
                    if step < 0 {
                        -1
                    } else {
                        0
                    }
                } else {
                    bound
                }
            } else if bound >= len {
                if step < 0 {
                    len - 1
                } else {
                    len
                }
            } else {
                bound
            }
        };

        let (start, stop) = if step < 0 {
            (
                slice.start.map_or(len - 1, adjust),
                slice.stop.map_or(-1, adjust),
            )
        } else {
            (slice.start.map_or(0, adjust), slice.stop.map_or(len, adjust))
        };

        let count = if step < 0 && stop < start {
            (start - stop - 1) / -step + 1
        } else if step > 0 && start < stop {
            (stop - start - 1) / step + 1
        } else {
            0
        };

        Ok(AxisRange {
            first: if count > 0 { start as usize } else { 0 },
            count: count as usize,
            step,
        })
    }

    /// The position of the last selected element.
    pub(crate) fn last(&self) -> usize {
        debug_assert!(self.count > 0);
        let span = (self.count - 1) as isize * self.step;
        (self.first as isize + span) as usize
    }
}

/// Wrap a negative index around the end of an axis and check it.
pub(crate) fn wrap_index(index: isize, len: usize) -> Result<usize, Error> {
    let wrapped = if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else {
        Some(index as usize)
    };

    match wrapped {
        Some(index) if index < len => Ok(index),
        _ => Err(ErrorKind::IndexOutOfRange.into()),
    }
}

impl From<isize> for Selector {
    fn from(index: isize) -> Self {
        Selector::Index(index)
    }
}

impl From<Slice> for Selector {
    fn from(slice: Slice) -> Self {
        Selector::Slice(slice)
    }
}

impl From<Range<isize>> for Selector {
    fn from(range: Range<isize>) -> Self {
        Selector::Slice(range.into())
    }
}

impl From<RangeFrom<isize>> for Selector {
    fn from(range: RangeFrom<isize>) -> Self {
        Selector::Slice(range.into())
    }
}

impl From<RangeTo<isize>> for Selector {
    fn from(range: RangeTo<isize>) -> Self {
        Selector::Slice(range.into())
    }
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Selector::Full
    }
}

impl From<Range<isize>> for Slice {
    fn from(range: Range<isize>) -> Self {
        Slice::new(range.start, range.end)
    }
}

impl From<RangeFrom<isize>> for Slice {
    fn from(range: RangeFrom<isize>) -> Self {
        Slice {
            start: Some(range.start),
            ..Slice::FULL
        }
    }
}

impl From<RangeTo<isize>> for Slice {
    fn from(range: RangeTo<isize>) -> Self {
        Slice {
            stop: Some(range.end),
            ..Slice::FULL
        }
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Slice::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisRange, Selector, Slice};
    use crate::error::ErrorKind;

    fn resolve(slice: Slice, len: usize) -> (usize, usize, isize) {
        let range = AxisRange::resolve(&slice.into(), len).expect("valid slice");
        (range.first, range.count, range.step)
    }

    #[test]
    fn slice_bounds() {
        assert_eq!(resolve(Slice::FULL, 5), (0, 5, 1));
        assert_eq!(resolve(Slice::new(1, 3), 5), (1, 2, 1));
        assert_eq!(resolve(Slice::new(-2, 10), 5), (3, 2, 1));
        assert_eq!(resolve(Slice::new(0, 5).step_by(2), 5), (0, 3, 2));
        assert_eq!(resolve(Slice::new(3, 1), 5).1, 0);
        assert_eq!(resolve(Slice::new(-10, -8), 5).1, 0);
    }

    #[test]
    fn reversed_bounds() {
        assert_eq!(resolve(Slice::reversed(), 5), (4, 5, -1));
        assert_eq!(resolve(Slice::FULL.step_by(-2), 5), (4, 3, -2));
        assert_eq!(resolve((3..).into(), 5), (3, 2, 1));
        assert_eq!(
            resolve(Slice { start: Some(3), stop: Some(0), step: Some(-1) }, 5),
            (3, 3, -1)
        );
        assert_eq!(resolve(Slice::FULL.step_by(isize::MIN), 5), (4, 1, -isize::MAX));
    }

    #[test]
    fn zero_step() {
        let err = AxisRange::resolve(&Slice::FULL.step_by(0).into(), 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ZeroStep);
        let err = AxisRange::clamped(4, 0, 4, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ZeroStep);
    }

    #[test]
    fn indices_wrap() {
        assert_eq!(AxisRange::resolve(&Selector::Index(-1), 4), Ok(AxisRange::single(3)));
        assert_eq!(AxisRange::resolve(&2isize.into(), 4), Ok(AxisRange::single(2)));

        for index in [4, -5, isize::MIN] {
            let err = AxisRange::resolve(&Selector::Index(index), 4).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
        }
    }

    #[test]
    fn clamped_ranges() {
        let range = AxisRange::clamped(4, 1, 3, 1).unwrap();
        assert_eq!((range.first, range.count), (1, 2));

        let range = AxisRange::clamped(4, 0, 10, -1).unwrap();
        assert_eq!((range.first, range.count, range.last()), (3, 4, 0));

        let range = AxisRange::clamped(5, 0, 5, 2).unwrap();
        assert_eq!((range.count, range.last()), (3, 4));

        assert_eq!(AxisRange::clamped(4, 3, 1, 1).unwrap().count, 0);
        assert_eq!(AxisRange::clamped(4, 6, 9, 1).unwrap().count, 0);
    }
}
