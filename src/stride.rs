// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
//! Byte addressing of strided pixel views.
//!
//! Every view carries fully resolved, absolute addressing parameters. Deriving a view from
//! another one never consults the parent view again, the new parameters are computed once and the
//! two only share the surface they address.
//!
//! Pixels may alias each other between views, and also within a single view when it was
//! constructed with overlapping strides. All reads and writes are performed pixel by pixel in
//! row-major order.
use crate::error::{Error, ErrorKind};
use crate::select::AxisRange;

/// The addressing parameters of a view over a surface buffer.
///
/// The byte offset of the pixel in column `col` and row `row` is
/// `start + col * x_step * element + row * y_step * pitch`. The extents are raw spans, the
/// number of columns is `x_len / |x_step|` and the number of rows `y_len / |y_step|`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StrideSpec {
    /// Byte offset of the first pixel.
    pub start: usize,
    /// One past the highest byte any pixel of the view touches.
    pub end: usize,
    pub x_len: usize,
    pub y_len: usize,
    /// Signed distance of neighbouring columns, in pixels.
    pub x_step: isize,
    /// Signed distance of neighbouring rows, in rows of the surface.
    pub y_step: isize,
    /// The number of bytes from one row of the surface to the next.
    pub pitch: usize,
    /// The number of bytes of a single pixel.
    pub element: usize,
}

impl StrideSpec {
    /// Address all pixels of a surface.
    ///
    /// Fails if the surface has no pixels, or its buffer can not hold the rows it describes.
    pub(crate) fn for_surface(
        width: usize,
        height: usize,
        pitch: usize,
        element: usize,
        buffer_len: usize,
    ) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(ErrorKind::EmptyRegion.into());
        }

        let bad_layout = || Error::from(ErrorKind::BadLayout);
        let row = width.checked_mul(element).ok_or_else(bad_layout)?;
        if pitch < row {
            return Err(bad_layout());
        }

        let end = (height - 1)
            .checked_mul(pitch)
            .and_then(|rows| rows.checked_add(row))
            .ok_or_else(bad_layout)?;

        if end > buffer_len || isize::try_from(end).is_err() {
            return Err(bad_layout());
        }

        Ok(StrideSpec {
            start: 0,
            end,
            x_len: width,
            y_len: height,
            x_step: 1,
            y_step: 1,
            pitch,
            element,
        })
    }

    pub fn columns(&self) -> usize {
        self.x_len / self.x_step.unsigned_abs()
    }

    pub fn rows(&self) -> usize {
        self.y_len / self.y_step.unsigned_abs()
    }

    /// A vertical view, with a single column.
    pub fn is_column(&self) -> bool {
        self.columns() == 1
    }

    /// A horizontal view, with a single row and more than one column.
    pub fn is_row(&self) -> bool {
        !self.is_column() && self.rows() == 1
    }

    /// The number of elements along the primary axis.
    ///
    /// That is the number of rows of a column view and the number of columns otherwise.
    pub fn len(&self) -> usize {
        if self.is_column() {
            self.rows()
        } else {
            self.columns()
        }
    }

    /// Views always address at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compare the shape of two views, without their position, strides or pixel size.
    pub fn matches(&self, other: &Self) -> bool {
        self.columns() == other.columns() && self.rows() == other.rows()
    }

    /// The byte offset of a pixel.
    pub fn offset(&self, col: usize, row: usize) -> usize {
        debug_assert!(col < self.columns() && row < self.rows());
        let at = self.start as isize + col as isize * self.x_delta() + row as isize * self.y_delta();
        debug_assert!(at >= 0 && at as usize + self.element <= self.end);
        at as usize
    }

    /// The offsets of all pixels, row by row.
    pub(crate) fn offsets(self) -> impl Iterator<Item = usize> {
        (0..self.rows()).flat_map(move |row| self.row_offsets(row))
    }

    /// The offsets of the pixels in one row.
    pub(crate) fn row_offsets(self, row: usize) -> impl Iterator<Item = usize> {
        (0..self.columns()).map(move |col| self.offset(col, row))
    }

    /// Select some of the columns.
    pub(crate) fn sub_columns(&self, range: AxisRange) -> Option<Self> {
        self.region(range, AxisRange::full(self.rows()))
    }

    /// Select some of the rows.
    pub(crate) fn sub_rows(&self, range: AxisRange) -> Option<Self> {
        self.region(AxisRange::full(self.columns()), range)
    }

    /// Select part of the primary axis, leaving the other one whole.
    pub(crate) fn sub_primary(&self, range: AxisRange) -> Option<Self> {
        if self.is_column() {
            self.sub_rows(range)
        } else {
            self.sub_columns(range)
        }
    }

    /// Select a rectangle of columns and rows.
    ///
    /// Returns `None` if either range is empty. The ranges must lie within the axes.
    pub(crate) fn region(&self, x: AxisRange, y: AxisRange) -> Option<Self> {
        if x.count == 0 || y.count == 0 {
            return None;
        }

        debug_assert!(x.first < self.columns() && x.last() < self.columns());
        debug_assert!(y.first < self.rows() && y.last() < self.rows());

        // A single element has no direction, and a unit step keeps the span at one.
        let step = |parent: isize, range: AxisRange| match range.count {
            1 => 1,
            _ => parent * range.step,
        };

        let x_step = step(self.x_step, x);
        let y_step = step(self.y_step, y);

        let mut spec = StrideSpec {
            start: self.offset(x.first, y.first),
            end: 0,
            x_len: x.count * x_step.unsigned_abs(),
            y_len: y.count * y_step.unsigned_abs(),
            x_step,
            y_step,
            pitch: self.pitch,
            element: self.element,
        };

        spec.end = spec.compute_end();
        debug_assert!(spec.end <= self.end);
        Some(spec)
    }

    fn x_delta(&self) -> isize {
        self.x_step * self.element as isize
    }

    fn y_delta(&self) -> isize {
        self.y_step * self.pitch as isize
    }

    /// One past the last byte, found at the far corner in the positive direction of both axes.
    fn compute_end(&self) -> usize {
        let x_span = (self.columns() - 1) as isize * self.x_delta();
        let y_span = (self.rows() - 1) as isize * self.y_delta();
        let far = self.start as isize + x_span.max(0) + y_span.max(0);
        far as usize + self.element
    }
}

#[cfg(test)]
mod tests {
    use super::StrideSpec;
    use crate::error::ErrorKind;
    use crate::select::AxisRange;

    fn surface(width: usize, height: usize, pitch: usize, element: usize) -> StrideSpec {
        StrideSpec::for_surface(width, height, pitch, element, pitch * height)
            .expect("Valid surface")
    }

    #[test]
    fn surface_validation() {
        let err = StrideSpec::for_surface(0, 2, 4, 1, 8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyRegion);
        let err = StrideSpec::for_surface(4, 2, 3, 1, 8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadLayout);
        let err = StrideSpec::for_surface(4, 2, 4, 1, 7).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadLayout);
        let err = StrideSpec::for_surface(usize::MAX, 1, 4, 2, 8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadLayout);

        // The padding of the last row need not be present.
        let spec = StrideSpec::for_surface(3, 2, 8, 2, 14).expect("Valid surface");
        assert_eq!(spec.end, 14);
    }

    #[test]
    fn axes() {
        let spec = surface(4, 2, 16, 4);
        assert_eq!((spec.columns(), spec.rows(), spec.len()), (4, 2, 4));
        assert!(!spec.is_column() && !spec.is_row());

        let column = surface(1, 3, 4, 4);
        assert!(column.is_column());
        assert_eq!(column.len(), 3);

        let row = surface(3, 1, 3, 1);
        assert!(row.is_row());
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn offsets_row_major() {
        let spec = surface(2, 2, 8, 2);
        assert!(spec.offsets().eq([0, 2, 8, 10]));
        assert!(spec.row_offsets(1).eq([8, 10]));
    }

    #[test]
    fn sub_columns() {
        let spec = surface(4, 2, 16, 4);
        let sub = spec
            .sub_columns(AxisRange::clamped(4, 1, 3, 1).unwrap())
            .expect("Non-empty");

        assert_eq!((sub.start, sub.end), (4, 28));
        assert_eq!((sub.columns(), sub.rows()), (2, 2));
        assert!(sub.offsets().eq([4, 8, 20, 24]));
        assert!(spec.sub_columns(AxisRange::clamped(4, 2, 2, 1).unwrap()).is_none());
    }

    #[test]
    fn reversed_region() {
        let spec = surface(3, 3, 3, 1);
        let mirror = spec
            .region(
                AxisRange::clamped(3, 0, 3, -1).unwrap(),
                AxisRange::clamped(3, 0, 3, -2).unwrap(),
            )
            .expect("Non-empty");

        assert_eq!((mirror.x_step, mirror.y_step), (-1, -2));
        assert_eq!((mirror.columns(), mirror.rows()), (3, 2));
        assert_eq!((mirror.start, mirror.end), (8, 9));
        assert!(mirror.offsets().eq([8, 7, 6, 2, 1, 0]));
    }

    #[test]
    fn single_elements_normalize() {
        let spec = surface(4, 4, 4, 1);
        let column = spec
            .sub_columns(AxisRange {
                first: 3,
                count: 1,
                step: -3,
            })
            .expect("Non-empty");

        assert_eq!((column.x_len, column.x_step), (1, 1));
        assert!(column.is_column());
        assert!(column.offsets().eq([3, 7, 11, 15]));

        let nested = column
            .sub_primary(AxisRange::clamped(4, 1, 4, 2).unwrap())
            .expect("Non-empty");
        assert_eq!((nested.rows(), nested.y_step), (2, 2));
        assert!(nested.offsets().eq([7, 15]));

        let corner = spec
            .region(AxisRange::single(0), AxisRange::clamped(4, 0, 2, 1).unwrap())
            .expect("Non-empty");
        assert!(nested.matches(&corner));
        assert_ne!(nested, corner);
    }
}
