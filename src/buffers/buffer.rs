//! Growable NUL-terminated byte string

use std::{ffi::CStr, fmt};

use log::trace;

use crate::error::{Result, TwineError};

use super::config::GrowthConfig;

/// A growable byte string whose buffer always holds a terminator
///
/// Every byte of the backing buffer is initialised, so `capacity` is the
/// length of the allocation and `data[len]` is always `0`. Content may
/// contain interior NUL bytes; the C view then ends at the first one.
pub struct ByteString {
    /// Backing storage, `data.len()` is the capacity
    data: Vec<u8>,
    /// Number of logical bytes
    len: usize,
    /// Slack and clearing policy
    growth: GrowthConfig,
}

/// Allocate `capacity` zeroed bytes without aborting on exhaustion
fn allocate_zeroed(capacity: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(capacity)
        .map_err(|_| TwineError::allocation(capacity))?;
    data.resize(capacity, 0);
    Ok(data)
}

impl ByteString {
    /// Construct a string, copying `initial` if given
    ///
    /// The buffer is sized to `max(base_reserve, initial.len()) + base_reserve`.
    pub fn new(initial: Option<&[u8]>, growth: GrowthConfig) -> Result<Self> {
        growth.validate()?;

        let initial = initial.unwrap_or_default();
        let mut data = allocate_zeroed(growth.initial_capacity(initial.len()))?;
        data[..initial.len()].copy_from_slice(initial);

        Ok(Self {
            data,
            len: initial.len(),
            growth,
        })
    }

    /// Construct a string from bytes with the default growth policy
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(Some(bytes), GrowthConfig::default())
    }

    /// Construct an empty string with the default growth policy
    pub fn empty() -> Result<Self> {
        Self::new(None, GrowthConfig::default())
    }

    /// Number of logical bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the string holds no bytes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total allocated bytes, terminator slot included
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Growth policy this string was built with
    pub fn growth(&self) -> &GrowthConfig {
        &self.growth
    }

    /// Content bytes, without the terminator
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Content bytes followed by the terminator
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data[..=self.len]
    }

    /// View as a C string, ending at the first NUL byte
    pub fn as_c_str(&self) -> &CStr {
        match CStr::from_bytes_until_nul(self.as_bytes_with_nul()) {
            Ok(c_str) => c_str,
            // unreachable: data[len] is always 0
            Err(_) => Default::default(),
        }
    }

    /// Raw pointer to the NUL-terminated buffer
    ///
    /// Invalidated by any operation that grows the string or drops it.
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    /// Copy the content into a new vector
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Whether the content contains a NUL byte before the terminator
    pub fn has_interior_nul(&self) -> bool {
        self.as_bytes().contains(&0)
    }

    /// Insert `bytes` at `at`, shifting the suffix right
    pub fn insert(&mut self, bytes: &[u8], at: usize) -> Result<()> {
        if at > self.len {
            return Err(TwineError::range("insert", at, self.len));
        }

        let required = self
            .len
            .checked_add(bytes.len())
            .ok_or_else(|| TwineError::allocation(usize::MAX))?;

        // One byte past `required` is the terminator
        if self.capacity() <= required {
            self.regrow(required)?;
        }

        self.insert_in_place(bytes, at);
        Ok(())
    }

    /// Append `bytes` at the end; never shifts existing content
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.insert(bytes, self.len)
    }

    /// Prepend `bytes` at the start, shifting all existing content
    pub fn prepend(&mut self, bytes: &[u8]) -> Result<()> {
        self.insert(bytes, 0)
    }

    /// Append the content of another string
    pub fn concat(&mut self, other: &ByteString) -> Result<()> {
        self.append(other.as_bytes())
    }

    /// Remove and return the byte at `at`, shifting the suffix left
    pub fn remove(&mut self, at: usize) -> Result<u8> {
        if at >= self.len {
            return Err(TwineError::range("remove", at, self.len));
        }

        let removed = self.data[at];
        self.data.copy_within(at + 1..self.len, at);
        self.len -= 1;
        self.data[self.len] = 0;

        Ok(removed)
    }

    /// Read the byte at `at`
    pub fn get(&self, at: usize) -> Result<u8> {
        self.as_bytes()
            .get(at)
            .copied()
            .ok_or_else(|| TwineError::range("get", at, self.len))
    }

    /// Overwrite the byte at `at`, returning the previous value
    pub fn set(&mut self, at: usize, byte: u8) -> Result<u8> {
        if at >= self.len {
            return Err(TwineError::range("set", at, self.len));
        }

        Ok(std::mem::replace(&mut self.data[at], byte))
    }

    /// Offset of the first occurrence of `pattern`
    ///
    /// An empty pattern matches at offset 0, also on an empty string.
    pub fn find(&self, pattern: &[u8]) -> Option<usize> {
        if pattern.is_empty() {
            return Some(0);
        }

        self.as_bytes()
            .windows(pattern.len())
            .position(|window| window == pattern)
    }

    /// Duplicate `[i, len)`
    ///
    /// Returns `None` when `i == 0` or `i >= len`. Starting at 0 is
    /// rejected even though it names a valid range; use [`copy`](Self::copy)
    /// for a full duplicate.
    pub fn substring_from(&self, i: usize) -> Result<Option<ByteString>> {
        if i == 0 || i >= self.len {
            return Ok(None);
        }

        self.duplicate(i, self.len).map(Some)
    }

    /// Duplicate `[i, j)`; `None` unless `i < j <= len`
    pub fn substring(&self, i: usize, j: usize) -> Result<Option<ByteString>> {
        if i >= j || j > self.len {
            return Ok(None);
        }

        self.duplicate(i, j).map(Some)
    }

    /// Duplicate the whole content into a new buffer
    pub fn copy(&self) -> Result<ByteString> {
        self.duplicate(0, self.len)
    }

    /// Drop all content, keeping the allocation
    pub fn clear(&mut self) {
        if self.growth.scrub_on_clear {
            self.data.fill(0);
        } else {
            self.data[0] = 0;
        }
        self.len = 0;
    }

    fn duplicate(&self, i: usize, j: usize) -> Result<ByteString> {
        ByteString::new(Some(&self.data[i..j]), self.growth)
    }

    /// Move the tail and write `bytes`; capacity must already fit
    fn insert_in_place(&mut self, bytes: &[u8], at: usize) {
        let count = bytes.len();

        if at < self.len {
            self.data.copy_within(at..self.len, at + count);
        }
        self.data[at..at + count].copy_from_slice(bytes);

        self.len += count;
        self.data[self.len] = 0;
    }

    /// Replace the buffer with one sized for `required` bytes plus slack
    fn regrow(&mut self, required: usize) -> Result<()> {
        let new_capacity = self.growth.grown_capacity(required);
        if new_capacity <= required {
            return Err(TwineError::allocation(new_capacity));
        }

        let mut data = allocate_zeroed(new_capacity)?;
        data[..self.len].copy_from_slice(self.as_bytes());

        trace!(
            "regrow string buffer: {} -> {} bytes (len {})",
            self.capacity(),
            new_capacity,
            self.len
        );

        self.data = data;
        Ok(())
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteString")
            .field("bytes", &format_args!("\"{}\"", self.as_bytes().escape_ascii()))
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl PartialEq for ByteString {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ByteString {}

impl PartialEq<[u8]> for ByteString {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&[u8]> for ByteString {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl<const N: usize> PartialEq<[u8; N]> for ByteString {
    fn eq(&self, other: &[u8; N]) -> bool {
        self.as_bytes() == other.as_slice()
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for ByteString {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.as_bytes() == other.as_slice()
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
