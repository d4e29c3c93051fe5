// Distributed under The MIT License (MIT)
//
// Copyright (c) 2020, 2021 The `image-rs` developers
//! Color arguments of pixel writes.
//!
//! Writes accept anything that resolves to a packed pixel value for the format of the target
//! surface. Integers are taken as already packed values, channel tuples are packed with the
//! channel shifts of the format.
use crate::error::{Error, ErrorKind};
use crate::surface::PixelFormat;

/// A color argument that can be resolved to a packed pixel value.
///
/// Resolution may fail, in which case a bulk write using the color must not have modified any
/// pixel. Writers resolve all their colors before the first byte is touched.
pub trait ToPixel {
    /// Pack this color for a surface of the given format.
    fn to_pixel(&self, format: &PixelFormat) -> Result<u32, Error>;
}

/// A color given by 8-bit channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    /// An opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 0xff }
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Rgba { r, g, b, a }
    }
}

impl From<[u8; 3]> for Rgba {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgba::opaque(r, g, b)
    }
}

impl ToPixel for Rgba {
    fn to_pixel(&self, format: &PixelFormat) -> Result<u32, Error> {
        Ok(format.map_rgba(self.r, self.g, self.b, self.a))
    }
}

impl ToPixel for [u8; 3] {
    fn to_pixel(&self, format: &PixelFormat) -> Result<u32, Error> {
        Rgba::from(*self).to_pixel(format)
    }
}

impl ToPixel for [u8; 4] {
    fn to_pixel(&self, format: &PixelFormat) -> Result<u32, Error> {
        Rgba::from(*self).to_pixel(format)
    }
}

impl ToPixel for u8 {
    fn to_pixel(&self, _: &PixelFormat) -> Result<u32, Error> {
        Ok(u32::from(*self))
    }
}

impl ToPixel for u16 {
    fn to_pixel(&self, _: &PixelFormat) -> Result<u32, Error> {
        Ok(u32::from(*self))
    }
}

impl ToPixel for u32 {
    fn to_pixel(&self, _: &PixelFormat) -> Result<u32, Error> {
        Ok(*self)
    }
}

impl ToPixel for i32 {
    fn to_pixel(&self, _: &PixelFormat) -> Result<u32, Error> {
        u32::try_from(*self).map_err(|_| ErrorKind::InvalidColor.into())
    }
}

impl ToPixel for i64 {
    fn to_pixel(&self, _: &PixelFormat) -> Result<u32, Error> {
        u32::try_from(*self).map_err(|_| ErrorKind::InvalidColor.into())
    }
}

impl<T: ToPixel + ?Sized> ToPixel for &'_ T {
    fn to_pixel(&self, format: &PixelFormat) -> Result<u32, Error> {
        (**self).to_pixel(format)
    }
}

#[test]
fn integers_are_packed_values() {
    let format = PixelFormat::XRGB32;
    assert_eq!(7u8.to_pixel(&format), Ok(7));
    assert_eq!(0xff00_ff00u32.to_pixel(&format), Ok(0xff00_ff00));
    assert_eq!(0x1234i32.to_pixel(&format), Ok(0x1234));
    assert_eq!(0xffff_ffffi64.to_pixel(&format), Ok(0xffff_ffff));

    let invalid = Err(Error::from(ErrorKind::InvalidColor));
    assert_eq!((-1i32).to_pixel(&format), invalid);
    assert_eq!(0x1_0000_0000i64.to_pixel(&format), invalid);
}

#[test]
fn channels_follow_format() {
    assert_eq!([0x11u8, 0x22, 0x33].to_pixel(&PixelFormat::RGB24), Ok(0x112233));
    assert_eq!([0x11u8, 0x22, 0x33].to_pixel(&PixelFormat::BGR24), Ok(0x332211));
    assert_eq!(
        Rgba::new(1, 2, 3, 4).to_pixel(&PixelFormat::ARGB32),
        Ok(0x0401_0203)
    );
    // No alpha channel in the format, alpha is dropped.
    assert_eq!(Rgba::new(1, 2, 3, 4).to_pixel(&PixelFormat::XRGB32), Ok(0x0001_0203));
}
