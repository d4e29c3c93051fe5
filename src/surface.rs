// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
//! The surface capability consumed by pixel arrays.
//!
//! A surface owns (or borrows) the pixel bytes and describes how they are laid out. Pixel arrays
//! never allocate pixel memory themselves, they only address bytes the surface hands out.
use core::cell::Cell;

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::buf::CellBuffer;
use crate::codec::PixelCodec;

/// The order of bytes within the storage unit of a pixel.
///
/// Applies to pixels of two, three and four bytes. For three byte pixels it determines both how
/// the bytes are composed into a value on read and where each channel byte is placed on write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

/// The pixel format of a surface.
///
/// The channel shifts are the bit positions of red, green, blue (and optionally alpha) within a
/// packed pixel value. They are consulted for three byte pixels, where each channel is written
/// as an individual byte, and when packing an [`Rgba`][`crate::Rgba`] color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    bytes_per_pixel: u8,
    shifts: [u8; 3],
    alpha: Option<u8>,
    byte_order: ByteOrder,
}

/// An external surface providing pixel bytes.
///
/// The bytes are shared through `Cell`s so that any number of pixel arrays may read and write
/// them, even when their addressed regions overlap. Implementations must keep returning the
/// same bytes and dimensions while any pixel array refers to them.
pub trait Surface {
    /// The number of pixels in each row.
    fn width(&self) -> usize;
    /// The number of rows.
    fn height(&self) -> usize;
    /// The number of bytes from the start of one row to the start of the next.
    fn pitch(&self) -> usize;
    /// The format of each pixel.
    fn format(&self) -> PixelFormat;
    /// All bytes of the surface.
    fn pixels(&self) -> &[Cell<u8>];

    /// Called once before the first pixel array of a chain starts addressing the pixels.
    fn lock(&self) {}

    /// Called once after the last pixel array of a chain has been dropped.
    fn unlock(&self) {}
}

/// A surface owning its bytes in a [`CellBuffer`].
///
/// Clones share the same bytes, and the same lock count. Keep a clone around to inspect the
/// buffer while a pixel array owns another one.
#[derive(Clone)]
pub struct CellSurface {
    buffer: CellBuffer,
    width: usize,
    height: usize,
    pitch: usize,
    format: PixelFormat,
    locks: Rc<Cell<usize>>,
}

/// A surface over bytes borrowed from the caller.
#[derive(Clone, Copy)]
pub struct BorrowedSurface<'data> {
    pixels: &'data [Cell<u8>],
    width: usize,
    height: usize,
    pitch: usize,
    format: PixelFormat,
}

/// The shared claim of all pixel arrays derived from one surface.
///
/// Holds the surface locked until the last array referring to it is gone.
pub(crate) struct SurfaceLock<S: Surface> {
    surface: S,
    codec: PixelCodec,
}

impl ByteOrder {
    /// The byte order of the target platform.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Self = ByteOrder::Little;
    /// The byte order of the target platform.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Self = ByteOrder::Big;
}

impl PixelFormat {
    /// One byte per pixel, such as a palette index.
    pub const INDEX8: Self = PixelFormat::new(1);
    /// Three bytes per pixel, red in the most significant byte.
    pub const RGB24: Self = PixelFormat::new(3).with_shifts(16, 8, 0);
    /// Three bytes per pixel, blue in the most significant byte.
    pub const BGR24: Self = PixelFormat::new(3).with_shifts(0, 8, 16);
    /// Four bytes per pixel, no alpha channel.
    pub const XRGB32: Self = PixelFormat::new(4).with_shifts(16, 8, 0);
    /// Four bytes per pixel, alpha in the most significant byte.
    pub const ARGB32: Self = PixelFormat::new(4).with_shifts(16, 8, 0).with_alpha(24);

    /// A format with the given number of bytes per pixel.
    ///
    /// The channel shifts default to red at bit 16, green at bit 8 and blue at bit 0, with no
    /// alpha channel and the native byte order. Note that pixel arrays only accept one to four
    /// bytes per pixel.
    pub const fn new(bytes_per_pixel: u8) -> Self {
        PixelFormat {
            bytes_per_pixel,
            shifts: [16, 8, 0],
            alpha: None,
            byte_order: ByteOrder::NATIVE,
        }
    }

    /// Change the bit shifts of the red, green and blue channel.
    pub const fn with_shifts(self, red: u8, green: u8, blue: u8) -> Self {
        PixelFormat {
            shifts: [red, green, blue],
            ..self
        }
    }

    /// Declare an alpha channel at the given bit shift.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        PixelFormat {
            alpha: Some(alpha),
            ..self
        }
    }

    /// Change the byte order of the pixel storage.
    pub const fn with_byte_order(self, byte_order: ByteOrder) -> Self {
        PixelFormat { byte_order, ..self }
    }

    pub const fn bytes_per_pixel(&self) -> u8 {
        self.bytes_per_pixel
    }

    /// The bit shifts of red, green and blue.
    pub const fn shifts(&self) -> [u8; 3] {
        self.shifts
    }

    pub const fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Pack 8-bit channels into a pixel value at their channel shifts.
    ///
    /// The alpha value is ignored if the format has no alpha channel. Channels shifted past the
    /// 32 bits of the value are dropped.
    pub fn map_rgba(&self, red: u8, green: u8, blue: u8, alpha: u8) -> u32 {
        let channel = |value: u8, shift: u8| {
            u32::from(value)
                .checked_shl(u32::from(shift))
                .unwrap_or(0)
        };

        let [r, g, b] = self.shifts;
        let color = channel(red, r) | channel(green, g) | channel(blue, b);

        match self.alpha {
            Some(a) => color | channel(alpha, a),
            None => color,
        }
    }
}

impl CellSurface {
    /// Allocate a zeroed surface with tightly packed rows.
    ///
    /// # Panics
    ///
    /// When the number of bytes overflows a `usize`.
    pub fn new(format: PixelFormat, width: usize, height: usize) -> Self {
        let pitch = width
            .checked_mul(usize::from(format.bytes_per_pixel()))
            .expect("Surface row does not fit into memory");
        Self::with_pitch(format, width, height, pitch)
    }

    /// Allocate a zeroed surface with a chosen row pitch.
    ///
    /// # Panics
    ///
    /// When the number of bytes overflows a `usize`.
    pub fn with_pitch(format: PixelFormat, width: usize, height: usize, pitch: usize) -> Self {
        let length = pitch
            .checked_mul(height)
            .expect("Surface does not fit into memory");
        Self::with_buffer(CellBuffer::new(length), format, width, height, pitch)
    }

    /// Create a surface initialized with texel data.
    ///
    /// The bytes of `pixels` are placed at the start of the buffer, which is extended with zeros
    /// if they are fewer than `pitch * height` bytes.
    ///
    /// # Panics
    ///
    /// When the number of bytes overflows a `usize`.
    pub fn with_pixels<P: bytemuck::Pod>(
        format: PixelFormat,
        width: usize,
        height: usize,
        pitch: usize,
        pixels: &[P],
    ) -> Self {
        let bytes: &[u8] = bytemuck::cast_slice(pixels);
        let length = pitch
            .checked_mul(height)
            .expect("Surface does not fit into memory")
            .max(bytes.len());

        let mut content = Vec::with_capacity(length);
        content.extend_from_slice(bytes);
        content.resize(length, 0);

        Self::with_buffer(CellBuffer::from(content), format, width, height, pitch)
    }

    /// Use an existing buffer as the pixel storage.
    ///
    /// The buffer is not validated against the dimensions here, creating a pixel array from the
    /// surface does.
    pub fn with_buffer(
        buffer: CellBuffer,
        format: PixelFormat,
        width: usize,
        height: usize,
        pitch: usize,
    ) -> Self {
        CellSurface {
            buffer,
            width,
            height,
            pitch,
            format,
            locks: Rc::default(),
        }
    }

    /// Copy out all bytes of the surface.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_vec()
    }

    /// The number of pixel array chains currently holding this surface locked.
    pub fn lock_count(&self) -> usize {
        self.locks.get()
    }
}

impl<'data> BorrowedSurface<'data> {
    /// View caller owned bytes as a surface.
    ///
    /// The bytes stay borrowed for as long as the surface, and any pixel array created from it,
    /// is alive.
    pub fn new(
        bytes: &'data mut [u8],
        format: PixelFormat,
        width: usize,
        height: usize,
        pitch: usize,
    ) -> Self {
        BorrowedSurface {
            pixels: Cell::from_mut(bytes).as_slice_of_cells(),
            width,
            height,
            pitch,
            format,
        }
    }
}

impl<S: Surface> SurfaceLock<S> {
    pub(crate) fn acquire(surface: S, codec: PixelCodec) -> Self {
        surface.lock();
        SurfaceLock { surface, codec }
    }

    pub(crate) fn surface(&self) -> &S {
        &self.surface
    }

    pub(crate) fn codec(&self) -> PixelCodec {
        self.codec
    }

    pub(crate) fn pixels(&self) -> &[Cell<u8>] {
        self.surface.pixels()
    }
}

impl<S: Surface> Drop for SurfaceLock<S> {
    fn drop(&mut self) {
        self.surface.unlock();
    }
}

impl Surface for CellSurface {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pitch(&self) -> usize {
        self.pitch
    }

    fn format(&self) -> PixelFormat {
        self.format
    }

    fn pixels(&self) -> &[Cell<u8>] {
        &self.buffer
    }

    fn lock(&self) {
        self.locks.set(self.locks.get() + 1);
    }

    fn unlock(&self) {
        self.locks.set(self.locks.get() - 1);
    }
}

impl Surface for BorrowedSurface<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pitch(&self) -> usize {
        self.pitch
    }

    fn format(&self) -> PixelFormat {
        self.format
    }

    fn pixels(&self) -> &[Cell<u8>] {
        self.pixels
    }
}

impl<T: Surface + ?Sized> Surface for &'_ T {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn pitch(&self) -> usize {
        (**self).pitch()
    }

    fn format(&self) -> PixelFormat {
        (**self).format()
    }

    fn pixels(&self) -> &[Cell<u8>] {
        (**self).pixels()
    }

    fn lock(&self) {
        (**self).lock()
    }

    fn unlock(&self) {
        (**self).unlock()
    }
}

impl<T: Surface + ?Sized> Surface for Rc<T> {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn pitch(&self) -> usize {
        (**self).pitch()
    }

    fn format(&self) -> PixelFormat {
        (**self).format()
    }

    fn pixels(&self) -> &[Cell<u8>] {
        (**self).pixels()
    }

    fn lock(&self) {
        (**self).lock()
    }

    fn unlock(&self) {
        (**self).unlock()
    }
}

#[test]
fn rgba_packing() {
    assert_eq!(PixelFormat::RGB24.map_rgba(0x11, 0x22, 0x33, 0xff), 0x112233);
    assert_eq!(PixelFormat::BGR24.map_rgba(0x11, 0x22, 0x33, 0xff), 0x332211);
    assert_eq!(
        PixelFormat::ARGB32.map_rgba(0x11, 0x22, 0x33, 0x80),
        0x8011_2233
    );
    // A shift past the value drops the channel.
    let format = PixelFormat::new(4).with_shifts(32, 8, 0);
    assert_eq!(format.map_rgba(0x11, 0x22, 0x33, 0), 0x2233);
}

#[test]
fn pixels_initialize_surface() {
    let surface = CellSurface::with_pixels(PixelFormat::XRGB32, 2, 1, 8, &[1u32, 2]);
    assert_eq!(surface.to_bytes().len(), 8);
    assert_eq!(bytemuck::pod_read_unaligned::<u32>(&surface.to_bytes()[4..]), 2);

    // Short data is padded to the full surface.
    let surface = CellSurface::with_pixels(PixelFormat::INDEX8, 2, 2, 4, &[7u8]);
    assert_eq!(surface.to_bytes(), [7, 0, 0, 0, 0, 0, 0, 0]);
}
