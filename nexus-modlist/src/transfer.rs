//! Byte transfer between a caller's buffers and the service.
//!
//! The endpoint never touches caller memory directly; it goes through
//! [`UserSource`] (commands coming in) and [`UserSink`] (answers going out).
//! A host whose copies can fault implements these traits and reports the
//! fault as [`Error::TransferFault`]. Plain slices and vectors are provided.

use crate::{Error, Result};

/// Caller-owned bytes a command is copied from.
pub trait UserSource {
    /// Number of bytes the caller offers.
    fn len(&self) -> usize;

    /// Returns `true` if the caller offers no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies exactly `dst.len()` bytes from the start of the source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransferFault`] if the copy fails.
    fn copy_to(&self, dst: &mut [u8]) -> Result<()>;
}

/// Caller-owned buffer an answer is copied into.
pub trait UserSink {
    /// Number of bytes the caller can accept.
    fn capacity(&self) -> usize;

    /// Copies all of `src` to the sink.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransferFault`] if the copy fails or `src` exceeds
    /// the sink's capacity.
    fn copy_from(&mut self, src: &[u8]) -> Result<()>;
}

impl UserSource for [u8] {
    #[inline]
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_to(&self, dst: &mut [u8]) -> Result<()> {
        let src = self.get(..dst.len()).ok_or(Error::TransferFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl UserSource for str {
    #[inline]
    fn len(&self) -> usize {
        str::len(self)
    }

    fn copy_to(&self, dst: &mut [u8]) -> Result<()> {
        self.as_bytes().copy_to(dst)
    }
}

impl UserSink for [u8] {
    #[inline]
    fn capacity(&self) -> usize {
        self.len()
    }

    fn copy_from(&mut self, src: &[u8]) -> Result<()> {
        let dst = self.get_mut(..src.len()).ok_or(Error::TransferFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

/// Appends to the vector; capacity is unbounded.
impl UserSink for Vec<u8> {
    #[inline]
    fn capacity(&self) -> usize {
        usize::MAX
    }

    fn copy_from(&mut self, src: &[u8]) -> Result<()> {
        self.extend_from_slice(src);
        Ok(())
    }
}
