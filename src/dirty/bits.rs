//! Fixed-size dirty bit vector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One bit per data field of a record.
///
/// Bits are addressed absolutely; bits past `len` are never set.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDirtyBits")]
pub struct DirtyBits {
    bytes: Vec<u8>,
    len: usize,
}

/// Wire shape of [`DirtyBits`], checked before use.
#[derive(Deserialize)]
struct RawDirtyBits {
    bytes: Vec<u8>,
    len: usize,
}

impl TryFrom<RawDirtyBits> for DirtyBits {
    type Error = String;

    fn try_from(raw: RawDirtyBits) -> Result<Self, Self::Error> {
        Self::from_bytes(&raw.bytes, raw.len).ok_or_else(|| {
            format!(
                "{} dirty bytes do not describe {} fields",
                raw.bytes.len(),
                raw.len
            )
        })
    }
}

impl DirtyBits {
    /// Create a clean bit vector for `len` fields.
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len.div_ceil(8)],
            len,
        }
    }

    /// Create a bit vector for `len` fields with every bit set.
    pub fn all_set(len: usize) -> Self {
        let mut bits = Self::new(len);
        bits.set_all();
        bits
    }

    /// Number of addressable bits.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn get(&self, index: usize) -> bool {
        let (byte, mask) = self.locate(index);
        self.bytes[byte] & mask != 0
    }

    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn set(&mut self, index: usize) {
        let (byte, mask) = self.locate(index);
        self.bytes[byte] |= mask;
    }

    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn clear(&mut self, index: usize) {
        let (byte, mask) = self.locate(index);
        self.bytes[byte] &= !mask;
    }

    pub fn set_all(&mut self) {
        self.bytes.fill(0xFF);
        let tail = self.len % 8;
        if tail != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last = (1u8 << tail) - 1;
            }
        }
    }

    pub fn clear_all(&mut self) {
        self.bytes.fill(0);
    }

    /// Whether any bit is set.
    pub fn any(&self) -> bool {
        self.bytes.iter().any(|&b| b != 0)
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Positions of set bits, ascending.
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.get(i))
    }

    /// Raw storage, least significant bit first within each byte.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Rebuild from raw storage produced by [`as_bytes`](Self::as_bytes).
    ///
    /// Returns `None` if `bytes` has the wrong size or sets bits past `len`.
    pub fn from_bytes(bytes: &[u8], len: usize) -> Option<Self> {
        if bytes.len() != len.div_ceil(8) {
            return None;
        }
        let tail = len % 8;
        if tail != 0 && bytes[bytes.len() - 1] >> tail != 0 {
            return None;
        }
        Some(Self {
            bytes: bytes.to_vec(),
            len,
        })
    }

    fn locate(&self, index: usize) -> (usize, u8) {
        assert!(
            index < self.len,
            "field index {} out of range for {} fields",
            index,
            self.len
        );
        (index / 8, 1u8 << (index % 8))
    }
}

impl fmt::Debug for DirtyBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DirtyBits(")?;
        for i in 0..self.len {
            f.write_str(if self.get(i) { "1" } else { "0" })?;
        }
        write!(f, ")")
    }
}
