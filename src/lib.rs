// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
//! # Pixel arrays
//!
//! Strided views over the pixels of a surface, which can be indexed, sliced, reversed and
//! sub-sampled along both axes without copying any pixel.
//!
//! ## Usage
//!
//! ```
//! use image_pixelarray::{CellSurface, PixelArray, PixelFormat, Selector};
//!
//! let surface = CellSurface::new(PixelFormat::XRGB32, 4, 2);
//! let array = PixelArray::new(surface.clone())?;
//! assert_eq!(array.len(), 4);
//!
//! // Paint the two middle columns.
//! let middle = array.slice(1, 3, 1)?.expect("A non-empty slice");
//! middle.fill(0xFF00FF00u32)?;
//! assert!(array.contains(0xFF00FF00u32)?);
//!
//! // Mark the first column, then mirror the image horizontally.
//! array.set_item(0, 0x7Fu32)?;
//! let mirrored = array.slice(0, 4, -1)?.expect("A non-empty slice");
//! array.copy_from(&mirrored)?;
//!
//! let pixel = array.subscript(&[Selector::Index(-1), Selector::Index(1)])?;
//! assert_eq!(pixel.and_then(|el| el.pixel()), Some(0x7F));
//! # Ok::<_, image_pixelarray::Error>(())
//! ```
//!
//! A surface is anything implementing [`Surface`]. [`CellSurface`] owns its bytes,
//! [`BorrowedSurface`] addresses caller provided bytes.
// Be std for doctests, avoids a weird warning about missing allocator.
#![cfg_attr(not(doctest), no_std)]
// Shared mutable pixels are all `Cell`s.
#![deny(unsafe_code)]
extern crate alloc;

mod array;
mod buf;
mod codec;
mod color;
mod error;
mod select;
mod stride;
mod surface;

pub use self::array::{Element, PixelArray};
pub use self::buf::CellBuffer;
pub use self::codec::PixelCodec;
pub use self::color::{Rgba, ToPixel};
pub use self::error::{Error, ErrorKind};
pub use self::select::{Selector, Slice};
pub use self::stride::StrideSpec;
pub use self::surface::{BorrowedSurface, ByteOrder, CellSurface, PixelFormat, Surface};
