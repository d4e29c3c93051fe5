// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2020 The `image-rs` developers
//! Reading and writing single packed pixels at a byte offset.
use core::cell::Cell;

use crate::error::{Error, ErrorKind};
use crate::surface::{ByteOrder, PixelFormat};

/// Loads and stores pixel values of one pixel format.
///
/// Every pixel is handled as a `u32` value. Pixels of one, two and four bytes store that value
/// truncated to their width in the configured byte order. Three byte pixels are composed from
/// their bytes in byte order on read, while a write places the red, green and blue byte of the
/// value (bits `16..24`, `8..16` and `0..8`) at the byte positions the channel shifts of the
/// format designate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelCodec {
    depth: Depth,
    order: ByteOrder,
    /// Byte index of the red, green and blue channel within a three byte pixel.
    channels: [usize; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Depth {
    One,
    Two,
    Three,
    Four,
}

impl PixelCodec {
    /// Create the codec for a format.
    ///
    /// Fails with [`ErrorKind::InvalidDepth`] if the bytes per pixel are not within `1..=4`, or
    /// for a three byte format with a red, green or blue shift outside the pixel.
    pub fn new(format: PixelFormat) -> Result<Self, Error> {
        let depth = match format.bytes_per_pixel() {
            1 => Depth::One,
            2 => Depth::Two,
            3 => Depth::Three,
            4 => Depth::Four,
            _ => return Err(ErrorKind::InvalidDepth.into()),
        };

        let order = format.byte_order();
        let mut channels = [0; 3];

        if depth == Depth::Three {
            for (channel, &shift) in channels.iter_mut().zip(&format.shifts()) {
                let byte = usize::from(shift >> 3);
                if byte > 2 {
                    return Err(ErrorKind::InvalidDepth.into());
                }

                *channel = match order {
                    ByteOrder::Little => byte,
                    ByteOrder::Big => 2 - byte,
                };
            }
        }

        Ok(PixelCodec {
            depth,
            order,
            channels,
        })
    }

    pub fn bytes_per_pixel(&self) -> usize {
        match self.depth {
            Depth::One => 1,
            Depth::Two => 2,
            Depth::Three => 3,
            Depth::Four => 4,
        }
    }

    /// The bits of a `u32` value a pixel can hold.
    pub fn mask(&self) -> u32 {
        match self.depth {
            Depth::One => 0xff,
            Depth::Two => 0xffff,
            Depth::Three => 0xff_ffff,
            Depth::Four => 0xffff_ffff,
        }
    }

    /// Read the pixel starting at byte `at`.
    ///
    /// # Panics
    ///
    /// If the pixel is not contained in `buf`.
    pub fn load(&self, buf: &[Cell<u8>], at: usize) -> u32 {
        match self.depth {
            Depth::One => u32::from(buf[at].get()),
            Depth::Two => {
                let bytes = get_bytes(buf, at);
                u32::from(match self.order {
                    ByteOrder::Little => u16::from_le_bytes(bytes),
                    ByteOrder::Big => u16::from_be_bytes(bytes),
                })
            }
            Depth::Three => {
                let [b0, b1, b2] = get_bytes::<3>(buf, at).map(u32::from);
                match self.order {
                    ByteOrder::Little => b0 | (b1 << 8) | (b2 << 16),
                    ByteOrder::Big => b2 | (b1 << 8) | (b0 << 16),
                }
            }
            Depth::Four => {
                let bytes = get_bytes(buf, at);
                match self.order {
                    ByteOrder::Little => u32::from_le_bytes(bytes),
                    ByteOrder::Big => u32::from_be_bytes(bytes),
                }
            }
        }
    }

    /// Write a pixel starting at byte `at`.
    ///
    /// # Panics
    ///
    /// If the pixel is not contained in `buf`.
    pub fn store(&self, buf: &[Cell<u8>], at: usize, color: u32) {
        match self.depth {
            Depth::One => buf[at].set(color as u8),
            Depth::Two => {
                let value = color as u16;
                set_bytes(
                    buf,
                    at,
                    match self.order {
                        ByteOrder::Little => value.to_le_bytes(),
                        ByteOrder::Big => value.to_be_bytes(),
                    },
                );
            }
            Depth::Three => {
                let pixel = &buf[at..][..3];
                let [r, g, b] = self.channels;
                pixel[r].set((color >> 16) as u8);
                pixel[g].set((color >> 8) as u8);
                pixel[b].set(color as u8);
            }
            Depth::Four => set_bytes(
                buf,
                at,
                match self.order {
                    ByteOrder::Little => color.to_le_bytes(),
                    ByteOrder::Big => color.to_be_bytes(),
                },
            ),
        }
    }

    /// Read a pixel for transfer to another surface of the same depth.
    ///
    /// Three byte pixels are read channel by channel into `0xRRGGBB`, the inverse of
    /// [`Self::store`], so a copy between formats with differing channel shifts keeps the
    /// colors. All other depths read the plain value.
    pub fn load_channels(&self, buf: &[Cell<u8>], at: usize) -> u32 {
        match self.depth {
            Depth::Three => {
                let pixel = &buf[at..][..3];
                let [r, g, b] = self.channels.map(|idx| u32::from(pixel[idx].get()));
                (r << 16) | (g << 8) | b
            }
            _ => self.load(buf, at),
        }
    }
}

fn get_bytes<const N: usize>(buf: &[Cell<u8>], at: usize) -> [u8; N] {
    let cells = &buf[at..][..N];
    core::array::from_fn(|idx| cells[idx].get())
}

fn set_bytes<const N: usize>(buf: &[Cell<u8>], at: usize, bytes: [u8; N]) {
    for (cell, byte) in buf[at..][..N].iter().zip(bytes) {
        cell.set(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::PixelCodec;
    use crate::buf::CellBuffer;
    use crate::error::ErrorKind;
    use crate::surface::{ByteOrder, PixelFormat};

    fn codec(format: PixelFormat) -> PixelCodec {
        PixelCodec::new(format).expect("valid format")
    }

    #[test]
    fn rejects_depths() {
        for bpp in [0, 5, 8] {
            let err = PixelCodec::new(PixelFormat::new(bpp)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidDepth);
        }

        let outside = PixelFormat::RGB24.with_shifts(24, 8, 0);
        assert!(PixelCodec::new(outside).is_err());
        // Four byte pixels never consult the shifts.
        assert!(PixelCodec::new(PixelFormat::new(4).with_shifts(24, 8, 0)).is_ok());
    }

    #[test]
    fn truncating_round_trip() {
        let buf = CellBuffer::new(8);
        for (bpp, mask) in [(1, 0xff), (2, 0xffff), (3, 0xff_ffff), (4, 0xffff_ffff)] {
            for order in [ByteOrder::Little, ByteOrder::Big] {
                let codec = codec(PixelFormat::new(bpp).with_byte_order(order));
                codec.store(&buf, 1, 0x8899_aabb);
                assert_eq!(codec.load(&buf, 1), 0x8899_aabb & mask, "{bpp} {order:?}");
            }
        }
    }

    #[test]
    fn byte_order_of_words() {
        let buf = CellBuffer::new(4);

        codec(PixelFormat::new(2).with_byte_order(ByteOrder::Little)).store(&buf, 0, 0x1234);
        assert!(buf[..2].iter().map(|c| c.get()).eq([0x34, 0x12]));
        codec(PixelFormat::new(2).with_byte_order(ByteOrder::Big)).store(&buf, 0, 0x1234);
        assert!(buf[..2].iter().map(|c| c.get()).eq([0x12, 0x34]));

        codec(PixelFormat::new(4).with_byte_order(ByteOrder::Little)).store(&buf, 0, 0x1234_5678);
        assert_eq!(buf.to_vec(), [0x78, 0x56, 0x34, 0x12]);
        codec(PixelFormat::new(4).with_byte_order(ByteOrder::Big)).store(&buf, 0, 0x1234_5678);
        assert_eq!(buf.to_vec(), [0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn rgb24_little_endian() {
        let buf = CellBuffer::new(6);
        let codec = codec(PixelFormat::RGB24.with_byte_order(ByteOrder::Little));

        codec.store(&buf, 3, 0x112233);
        assert_eq!(buf.to_vec(), [0, 0, 0, 0x33, 0x22, 0x11]);
        assert_eq!(codec.load(&buf, 3), 0x112233);
        assert_eq!(codec.load_channels(&buf, 3), 0x112233);
    }

    #[test]
    fn rgb24_big_endian() {
        let buf = CellBuffer::new(6);
        let codec = codec(PixelFormat::RGB24.with_byte_order(ByteOrder::Big));

        codec.store(&buf, 3, 0x112233);
        // Blue lands on the last byte of its own pixel, not before it.
        assert_eq!(buf.to_vec(), [0, 0, 0, 0x11, 0x22, 0x33]);
        assert_eq!(codec.load(&buf, 3), 0x112233);
        assert_eq!(codec.load_channels(&buf, 3), 0x112233);
    }

    #[test]
    fn rgb24_neighbours_untouched() {
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let buf = CellBuffer::from(&[0xaa; 9][..]);
            let codec = codec(PixelFormat::RGB24.with_byte_order(order));

            codec.store(&buf, 3, 0x010203);
            assert_eq!(codec.load(&buf, 0), 0xaa_aaaa, "{order:?}");
            assert_eq!(codec.load(&buf, 6), 0xaa_aaaa, "{order:?}");
        }
    }

    #[test]
    fn bgr24_channels() {
        for (order, bytes) in [
            (ByteOrder::Little, [0x11, 0x22, 0x33]),
            (ByteOrder::Big, [0x33, 0x22, 0x11]),
        ] {
            let buf = CellBuffer::new(3);
            let codec = codec(PixelFormat::BGR24.with_byte_order(order));

            codec.store(&buf, 0, 0x112233);
            assert_eq!(buf.to_vec(), bytes, "{order:?}");
            // The plain value is composed by byte order alone.
            assert_eq!(codec.load(&buf, 0), 0x332211, "{order:?}");
            assert_eq!(codec.load_channels(&buf, 0), 0x112233, "{order:?}");
        }
    }

    #[test]
    fn channel_transfer_between_layouts() {
        let rgb = codec(PixelFormat::RGB24);
        let bgr = codec(PixelFormat::BGR24);
        let src = CellBuffer::new(3);
        let dst = CellBuffer::new(3);

        rgb.store(&src, 0, 0x445566);
        bgr.store(&dst, 0, rgb.load_channels(&src, 0));
        assert_eq!(bgr.load_channels(&dst, 0), 0x445566);
    }
}
