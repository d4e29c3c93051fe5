// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019 The `image-rs` developers
use core::{cell::Cell, cmp, ops};

use alloc::rc::Rc;
use alloc::vec::Vec;

/// Allocates and manages unsynchronized shared bytes.
///
/// Clones of this value refer to the same bytes. Since every byte is a `Cell`, any number of
/// clones may read and write concurrently from a single thread, overlapping or not. The result
/// is the same as interleaving the individual byte accesses in program order. The buffer can not
/// be sent between threads.
#[derive(Clone, Default)]
pub struct CellBuffer {
    /// The backing memory.
    inner: Rc<[Cell<u8>]>,
}

impl CellBuffer {
    /// Allocate a new, zeroed buffer of `length` bytes.
    pub fn new(length: usize) -> Self {
        CellBuffer {
            inner: (0..length).map(|_| Cell::new(0)).collect(),
        }
    }

    /// Check if two buffers share the same memory.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// The number of bytes in this buffer.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Copy all bytes into a new vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.inner.iter().map(Cell::get).collect()
    }
}

impl From<&'_ [u8]> for CellBuffer {
    fn from(content: &'_ [u8]) -> Self {
        CellBuffer {
            inner: content.iter().copied().map(Cell::new).collect(),
        }
    }
}

impl From<Vec<u8>> for CellBuffer {
    fn from(content: Vec<u8>) -> Self {
        CellBuffer::from(&content[..])
    }
}

impl ops::Deref for CellBuffer {
    type Target = [Cell<u8>];

    fn deref(&self) -> &[Cell<u8>] {
        &self.inner
    }
}

impl cmp::PartialEq for CellBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || self
                .inner
                .iter()
                .map(Cell::get)
                .eq(other.inner.iter().map(Cell::get))
    }
}

impl cmp::Eq for CellBuffer {}

impl cmp::PartialEq<[u8]> for CellBuffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.inner.iter().map(Cell::get).eq(other.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::CellBuffer;

    #[test]
    fn clones_alias() {
        let buffer = CellBuffer::new(4);
        let alias = buffer.clone();

        buffer[1].set(0x42);
        buffer[2].set(0x43);
        assert!(alias.ptr_eq(&buffer));
        assert!(alias == [0u8, 0x42, 0x43, 0][..]);
    }

    #[test]
    fn equality_by_content() {
        let lhs = CellBuffer::from(&[1u8, 2][..]);
        let rhs = CellBuffer::from(&[1u8, 2][..]);
        assert!(lhs == rhs);
        assert!(!lhs.ptr_eq(&rhs));

        rhs[0].set(0);
        assert!(lhs != rhs);
    }
}
