// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
//! The pixel array, a strided view over the pixels of a surface.
use core::fmt;

use alloc::rc::Rc;
use alloc::vec::Vec;

use log::{debug, trace};

use crate::codec::PixelCodec;
use crate::color::ToPixel;
use crate::error::{Error, ErrorKind};
use crate::select::{wrap_index, AxisRange, Selector};
use crate::stride::StrideSpec;
use crate::surface::{PixelFormat, Surface, SurfaceLock};

/// A strided view over some pixels of a surface.
///
/// The view never copies pixels. It addresses the bytes of its surface through resolved
/// [`StrideSpec`] parameters, and every view derived from it shares the surface. The surface is
/// locked when the first view is created from it and unlocked when the last view derived from
/// that one has been dropped.
///
/// A view has columns (`x`) and rows (`y`). A view with a single column is a column view and one
/// dimensional along its rows, a view with a single row and several columns is a row view. All
/// other views are two dimensional, and are indexed by column first.
///
/// Writes go through `&self`. Overlapping views of the same surface may be written to in any
/// order, each pixel write is visible to all of them immediately.
pub struct PixelArray<S: Surface> {
    claim: Rc<SurfaceLock<S>>,
    spec: StrideSpec,
}

/// The result of indexing a pixel array.
pub enum Element<S: Surface> {
    /// A single pixel value.
    Pixel(u32),
    /// A view over several pixels.
    View(PixelArray<S>),
}

/// The resolved content of a bulk write.
enum Fill {
    /// One color for every pixel.
    Broadcast(u32),
    /// One color for each row.
    Rows(Vec<u32>),
    /// One color for each pixel in row-major order, read from another view.
    Pixels(Vec<u32>),
}

impl<S: Surface> PixelArray<S> {
    /// Create a view over all pixels of a surface.
    ///
    /// This fails if the surface has an unsupported number of bytes per pixel, has no pixels, or
    /// if its buffer can not hold the described rows.
    pub fn new(surface: S) -> Result<Self, Error> {
        let format = surface.format();
        let codec = PixelCodec::new(format).inspect_err(|_| {
            debug!(
                "PixelArray::new unsupported format with {} bytes per pixel",
                format.bytes_per_pixel()
            )
        })?;

        let spec = StrideSpec::for_surface(
            surface.width(),
            surface.height(),
            surface.pitch(),
            codec.bytes_per_pixel(),
            surface.pixels().len(),
        )?;

        debug!(
            "PixelArray::new {}x{} pixels, pitch {}, {} bytes per pixel",
            surface.width(),
            surface.height(),
            spec.pitch,
            spec.element
        );

        Ok(PixelArray {
            claim: Rc::new(SurfaceLock::acquire(surface, codec)),
            spec,
        })
    }

    /// The surface whose pixels this view addresses.
    pub fn surface(&self) -> &S {
        self.claim.surface()
    }

    pub fn format(&self) -> PixelFormat {
        self.claim.surface().format()
    }

    /// The resolved addressing of this view.
    pub fn spec(&self) -> StrideSpec {
        self.spec
    }

    /// The number of elements along the primary axis.
    ///
    /// For a column view this is the number of rows, otherwise the number of columns.
    pub fn len(&self) -> usize {
        self.spec.len()
    }

    /// A view always has at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.spec.is_empty()
    }

    pub fn columns(&self) -> usize {
        self.spec.columns()
    }

    pub fn rows(&self) -> usize {
        self.spec.rows()
    }

    /// Read the pixel in a column and row of this view.
    pub fn pixel_at(&self, col: usize, row: usize) -> Option<u32> {
        if col < self.columns() && row < self.rows() {
            Some(self.load(self.spec.offset(col, row)))
        } else {
            None
        }
    }

    /// Get an element along the primary axis.
    ///
    /// Negative indices count from the end. A one dimensional view yields the pixel at the
    /// index, a two dimensional view yields the column at the index as a new view.
    pub fn item(&self, index: isize) -> Result<Element<S>, Error> {
        let index = wrap_index(index, self.len())?;

        if self.spec.is_column() {
            Ok(Element::Pixel(self.load(self.spec.offset(0, index))))
        } else if self.spec.is_row() {
            Ok(Element::Pixel(self.load(self.spec.offset(index, 0))))
        } else {
            let column = self
                .spec
                .sub_columns(AxisRange::single(index))
                .ok_or(ErrorKind::IndexOutOfRange)?;
            Ok(Element::View(self.with_spec(column)))
        }
    }

    /// Select `[low, high)` of the primary axis, walking it with `step`.
    ///
    /// The bounds are clamped into the axis. A negative step selects the same range in reverse,
    /// starting at `high - 1`. Returns `None` if the range is empty.
    pub fn slice(&self, low: usize, high: usize, step: isize) -> Result<Option<Self>, Error> {
        let range = AxisRange::clamped(self.len(), low, high, step)?;
        Ok(self
            .spec
            .sub_primary(range)
            .map(|spec| self.with_spec(spec)))
    }

    /// Index with up to two selectors.
    ///
    /// No selector yields this view itself. A single selector addresses the primary axis, two
    /// selectors address columns and rows, which is not possible for a column view.
    ///
    /// Returns `None` if either axis is selected empty. When exactly one pixel is selected the
    /// result is that pixel's value, even if it was selected with slices.
    pub fn subscript(&self, selectors: &[Selector]) -> Result<Option<Element<S>>, Error> {
        if selectors.is_empty() {
            return Ok(Some(Element::View(self.clone())));
        }

        let (x, y) = self.resolve(selectors)?;
        if x.count == 1 && y.count == 1 {
            let at = self.spec.offset(x.first, y.first);
            return Ok(Some(Element::Pixel(self.load(at))));
        }

        Ok(self
            .spec
            .region(x, y)
            .map(|spec| Element::View(self.with_spec(spec))))
    }

    /// Write a color to the element at an index of the primary axis.
    ///
    /// For a two dimensional view every pixel of the column at the index is written.
    pub fn set_item(&self, index: isize, color: impl ToPixel) -> Result<(), Error> {
        let index = wrap_index(index, self.len())?;
        let target = self
            .spec
            .sub_primary(AxisRange::single(index))
            .ok_or(ErrorKind::IndexOutOfRange)?;
        let color = color.to_pixel(&self.format())?;
        self.write(target, Fill::Broadcast(color));
        Ok(())
    }

    /// Write one color to all pixels.
    pub fn fill(&self, color: impl ToPixel) -> Result<(), Error> {
        let color = color.to_pixel(&self.format())?;
        self.write(self.spec, Fill::Broadcast(color));
        Ok(())
    }

    /// Write a sequence of colors.
    ///
    /// A single color is written to all pixels. Otherwise there must be one color for each row,
    /// which is written to all pixels of that row. All colors are resolved before any pixel is
    /// written.
    pub fn assign_colors<C: ToPixel>(&self, colors: &[C]) -> Result<(), Error> {
        let fill = self.resolve_colors(self.spec, colors)?;
        self.write(self.spec, fill);
        Ok(())
    }

    /// Copy all pixels of a view with the same shape and pixel size.
    ///
    /// The source is read completely before writing, which allows copying between overlapping
    /// views of the same surface.
    pub fn copy_from<T: Surface>(&self, source: &PixelArray<T>) -> Result<(), Error> {
        let fill = self.resolve_copy(self.spec, source)?;
        self.write(self.spec, fill);
        Ok(())
    }

    /// Write one color to the pixels selected as by [`Self::subscript`].
    pub fn fill_region(&self, selectors: &[Selector], color: impl ToPixel) -> Result<(), Error> {
        let target = self.target(selectors)?;
        let color = color.to_pixel(&self.format())?;
        self.write(target, Fill::Broadcast(color));
        Ok(())
    }

    /// Write a sequence of colors to the pixels selected as by [`Self::subscript`].
    ///
    /// The sequence is matched against the selected region like in [`Self::assign_colors`].
    pub fn assign_region_colors<C: ToPixel>(
        &self,
        selectors: &[Selector],
        colors: &[C],
    ) -> Result<(), Error> {
        let target = self.target(selectors)?;
        let fill = self.resolve_colors(target, colors)?;
        self.write(target, fill);
        Ok(())
    }

    /// Copy a view into the pixels selected as by [`Self::subscript`].
    pub fn copy_region<T: Surface>(
        &self,
        selectors: &[Selector],
        source: &PixelArray<T>,
    ) -> Result<(), Error> {
        let target = self.target(selectors)?;
        let fill = self.resolve_copy(target, source)?;
        self.write(target, fill);
        Ok(())
    }

    /// Check if any pixel has the color.
    ///
    /// Pixels of one and two bytes are compared with the color truncated to their width. Three
    /// byte pixels are compared with the full color, which never matches bits above the pixel.
    pub fn contains(&self, color: impl ToPixel) -> Result<bool, Error> {
        let codec = self.claim.codec();
        let color = color.to_pixel(&self.format())?;
        let color = match codec.bytes_per_pixel() {
            3 => color,
            _ => color & codec.mask(),
        };
        let pixels = self.claim.pixels();
        Ok(self.spec.offsets().any(|at| codec.load(pixels, at) == color))
    }

    /// Concatenation would need new pixel memory, which a view never allocates.
    pub fn concat(&self, _: &Self) -> Result<Self, Error> {
        Err(ErrorKind::UnsupportedOperation.into())
    }

    /// Repetition would need new pixel memory, which a view never allocates.
    pub fn repeat(&self, _: usize) -> Result<Self, Error> {
        Err(ErrorKind::UnsupportedOperation.into())
    }

    /// Read all pixels, row by row.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        (0..self.rows())
            .map(|row| {
                self.spec
                    .row_offsets(row)
                    .map(|at| self.load(at))
                    .collect()
            })
            .collect()
    }

    fn with_spec(&self, spec: StrideSpec) -> Self {
        trace!("PixelArray derived view {:?}", spec);
        PixelArray {
            claim: Rc::clone(&self.claim),
            spec,
        }
    }

    fn load(&self, at: usize) -> u32 {
        self.claim.codec().load(self.claim.pixels(), at)
    }

    fn resolve(&self, selectors: &[Selector]) -> Result<(AxisRange, AxisRange), Error> {
        let columns = self.spec.columns();
        let rows = self.spec.rows();

        match selectors {
            [] => Ok((AxisRange::full(columns), AxisRange::full(rows))),
            [primary] if self.spec.is_column() => Ok((
                AxisRange::full(columns),
                AxisRange::resolve(primary, rows)?,
            )),
            [primary] => Ok((
                AxisRange::resolve(primary, columns)?,
                AxisRange::full(rows),
            )),
            [x, y] if !self.spec.is_column() => Ok((
                AxisRange::resolve(x, columns)?,
                AxisRange::resolve(y, rows)?,
            )),
            _ => Err(ErrorKind::TooManyIndices.into()),
        }
    }

    /// The region of a write, which must not be empty.
    fn target(&self, selectors: &[Selector]) -> Result<StrideSpec, Error> {
        let (x, y) = self.resolve(selectors)?;
        self.spec.region(x, y).ok_or_else(|| {
            debug!("PixelArray rejected write to an empty region");
            ErrorKind::EmptyRegion.into()
        })
    }

    fn resolve_colors<C: ToPixel>(&self, target: StrideSpec, colors: &[C]) -> Result<Fill, Error> {
        if colors.len() != 1 && colors.len() != target.rows() {
            debug!(
                "PixelArray rejected {} colors for {} rows of {} pixels",
                colors.len(),
                target.rows(),
                target.columns()
            );
            return Err(ErrorKind::SequenceLengthMismatch.into());
        }

        let format = self.format();
        let packed = colors
            .iter()
            .map(|color| color.to_pixel(&format))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(if packed.len() == 1 {
            Fill::Broadcast(packed[0])
        } else {
            Fill::Rows(packed)
        })
    }

    fn resolve_copy<T: Surface>(
        &self,
        target: StrideSpec,
        source: &PixelArray<T>,
    ) -> Result<Fill, Error> {
        if !target.matches(&source.spec) {
            debug!(
                "PixelArray rejected copy of {}x{} pixels into {}x{}",
                source.columns(),
                source.rows(),
                target.columns(),
                target.rows()
            );
            return Err(ErrorKind::ShapeMismatch.into());
        }

        if target.element != source.spec.element {
            debug!(
                "PixelArray rejected copy of {} byte pixels into {} byte pixels",
                source.spec.element, target.element
            );
            return Err(ErrorKind::DepthMismatch.into());
        }

        let codec = source.claim.codec();
        let pixels = source.claim.pixels();
        let snapshot = source
            .spec
            .offsets()
            .map(|at| codec.load_channels(pixels, at))
            .collect();

        Ok(Fill::Pixels(snapshot))
    }

    fn write(&self, target: StrideSpec, fill: Fill) {
        trace!(
            "PixelArray writing {}x{} pixels at offset {}",
            target.columns(),
            target.rows(),
            target.start
        );

        let codec = self.claim.codec();
        let pixels = self.claim.pixels();

        match fill {
            Fill::Broadcast(color) => {
                for at in target.offsets() {
                    codec.store(pixels, at, color);
                }
            }
            Fill::Rows(colors) => {
                for (row, color) in colors.into_iter().enumerate() {
                    for at in target.row_offsets(row) {
                        codec.store(pixels, at, color);
                    }
                }
            }
            Fill::Pixels(colors) => {
                debug_assert_eq!(colors.len(), target.columns() * target.rows());
                for (at, color) in target.offsets().zip(colors) {
                    codec.store(pixels, at, color);
                }
            }
        }
    }
}

impl<S: Surface> Element<S> {
    /// The pixel value, if this is a single pixel.
    pub fn pixel(&self) -> Option<u32> {
        match self {
            Element::Pixel(value) => Some(*value),
            Element::View(_) => None,
        }
    }

    pub fn into_view(self) -> Option<PixelArray<S>> {
        match self {
            Element::Pixel(_) => None,
            Element::View(view) => Some(view),
        }
    }
}

impl<S: Surface> Clone for PixelArray<S> {
    fn clone(&self) -> Self {
        PixelArray {
            claim: Rc::clone(&self.claim),
            spec: self.spec,
        }
    }
}

/// Prints the addressed pixels, one row per line.
impl<S: Surface> fmt::Debug for PixelArray<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PixelArray(\n")?;
        for row in 0..self.rows() {
            f.write_str("  [")?;
            for (idx, at) in self.spec.row_offsets(row).enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", self.load(at))?;
            }
            f.write_str("]\n")?;
        }
        f.write_str(")")
    }
}

impl<S: Surface> fmt::Debug for Element<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Pixel(value) => f.debug_tuple("Pixel").field(value).finish(),
            Element::View(view) => f.debug_tuple("View").field(view).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Element, PixelArray};
    use crate::error::{Error, ErrorKind};
    use crate::select::{Selector, Slice};
    use crate::surface::{CellSurface, PixelFormat};
    use alloc::format;
    use alloc::vec;

    fn numbered(width: usize, height: usize) -> CellSurface {
        let bytes: alloc::vec::Vec<u8> = (0..width * height).map(|idx| idx as u8).collect();
        CellSurface::with_pixels(PixelFormat::INDEX8, width, height, width, &bytes)
    }

    #[test]
    fn row_view_items() -> Result<(), Error> {
        let array = PixelArray::new(numbered(3, 1))?;
        assert_eq!(array.len(), 3);
        assert_eq!(array.item(0)?.pixel(), Some(0));
        assert_eq!(array.item(-1)?.pixel(), Some(2));
        assert_eq!(array.item(3).unwrap_err().kind(), ErrorKind::IndexOutOfRange);
        assert_eq!(array.item(-4).unwrap_err().kind(), ErrorKind::IndexOutOfRange);
        Ok(())
    }

    #[test]
    fn two_dimensional_items_are_columns() -> Result<(), Error> {
        let array = PixelArray::new(numbered(3, 2))?;
        let column = array.item(1)?.into_view().expect("A column view");

        assert_eq!((column.columns(), column.rows()), (1, 2));
        assert_eq!(column.len(), 2);
        assert_eq!(column.item(0)?.pixel(), Some(1));
        assert_eq!(column.item(1)?.pixel(), Some(4));
        Ok(())
    }

    #[test]
    fn subscript_shapes() -> Result<(), Error> {
        let array = PixelArray::new(numbered(4, 3))?;

        let whole = array.subscript(&[])?.and_then(Element::into_view).unwrap();
        assert_eq!(whole.spec(), array.spec());

        let pixel = array.subscript(&[Selector::Index(2), Selector::Index(-1)])?;
        assert_eq!(pixel.and_then(|el| el.pixel()), Some(10));

        // A single pixel selected by slices collapses to its value.
        let collapsed = array.subscript(&[(3..4).into(), (2..3).into()])?;
        assert_eq!(collapsed.and_then(|el| el.pixel()), Some(11));

        let row = array
            .subscript(&[Selector::Full, Selector::Index(1)])?
            .and_then(Element::into_view)
            .unwrap();
        assert_eq!(row.to_rows(), [vec![4u32, 5, 6, 7]]);

        assert!(array.subscript(&[(2..2).into(), Selector::Full])?.is_none());

        let column = array.item(0)?.into_view().unwrap();
        let err = column.subscript(&[Selector::Full, Selector::Full]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooManyIndices);
        let err = array.subscript(&[Selector::Full; 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooManyIndices);
        Ok(())
    }

    #[test]
    fn sub_sampled_region() -> Result<(), Error> {
        let array = PixelArray::new(numbered(4, 3))?;
        let region = array
            .subscript(&[Slice::FULL.step_by(-2).into(), Slice::new(0, 3).step_by(2).into()])?
            .and_then(Element::into_view)
            .unwrap();

        assert_eq!(region.to_rows(), [vec![3u32, 1], vec![11, 9]]);
        Ok(())
    }

    #[test]
    fn column_sequence() -> Result<(), Error> {
        let surface = numbered(2, 3);
        let array = PixelArray::new(surface.clone())?;
        let column = array.item(1)?.into_view().unwrap();

        column.assign_colors(&[7u8, 8, 9])?;
        assert_eq!(surface.to_bytes(), [0, 7, 2, 8, 4, 9]);

        let err = column.assign_colors(&[1u8, 2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SequenceLengthMismatch);
        Ok(())
    }

    #[test]
    fn invalid_color_writes_nothing() -> Result<(), Error> {
        let surface = numbered(2, 2);
        let array = PixelArray::new(surface.clone())?;

        let err = array.assign_colors(&[1i32, -1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidColor);
        assert_eq!(surface.to_bytes(), [0, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn empty_region_write() -> Result<(), Error> {
        let array = PixelArray::new(numbered(3, 1))?;
        let err = array.fill_region(&[(1..1).into()], 0u8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyRegion);
        Ok(())
    }

    #[test]
    fn unsupported() -> Result<(), Error> {
        let array = PixelArray::new(numbered(3, 1))?;
        assert_eq!(
            array.concat(&array).unwrap_err().kind(),
            ErrorKind::UnsupportedOperation
        );
        assert_eq!(
            array.repeat(2).unwrap_err().kind(),
            ErrorKind::UnsupportedOperation
        );
        Ok(())
    }

    #[test]
    fn debug_dump() -> Result<(), Error> {
        let array = PixelArray::new(numbered(2, 2))?;
        assert_eq!(format!("{:?}", array), "PixelArray(\n  [0, 1]\n  [2, 3]\n)");
        assert_eq!(format!("{:?}", array.item(-1)?), "View(PixelArray(\n  [1]\n  [3]\n))");
        Ok(())
    }
}
