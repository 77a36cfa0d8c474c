//! File-like endpoint over a [`ModList`].
//!
//! An [`OpenFile`] is what a host hands to one caller: a stream position, a
//! private enumeration session and the read/write contract of the control
//! file.
//!
//! # Write
//!
//! 1. Payloads of `max_command_len` bytes or more are rejected before any
//!    copy ([`Error::OversizedInput`]).
//! 2. The payload is copied in through [`UserSource`].
//! 3. A write at a non-zero position is a repeat and returns `Ok(0)`.
//! 4. The command is dispatched; on success the position advances and the
//!    number of bytes consumed is returned.
//!
//! # Read
//!
//! - **Bulk**: the first read returns every record followed by a NUL
//!   terminator; reads at a non-zero position return 0.
//! - **Paginated**: a read at the origin runs one enumeration session
//!   (start, then step/render per record, then stop) into a session buffer
//!   bounded by `answer_buffer_len`, and serves it across as many reads as
//!   the caller needs. Once drained, the next read starts at a non-origin
//!   position, the enumeration resets, and end-of-data (0) is returned; the
//!   position goes back to the origin so a later read begins a new session.

use tracing::debug;

use crate::seq::{Enumeration, Step};
use crate::transfer::{UserSink, UserSource};
use crate::{Error, ModList, Outcome, ReadMode, Result, Value};

/// One caller's open handle on the control file.
///
/// # Example
///
/// ```
/// use nexus_modlist::{Config, ModList};
///
/// let list: ModList<i64> = ModList::new(Config::default());
///
/// // echo "add 7" > modlist
/// assert_eq!(list.open().write(&b"add 7\n"[..]).unwrap(), 6);
///
/// // cat modlist
/// let mut out = Vec::new();
/// let mut file = list.open();
/// while file.read(&mut out).unwrap() > 0 {}
/// assert_eq!(out, b"7\n\0");
/// ```
#[derive(Debug)]
pub struct OpenFile<'a, V: Value> {
    list: &'a ModList<V>,
    pos: u64,
    mode: ReadMode,
    seq: Enumeration<'a, V>,
    pending: Vec<u8>,
    served: usize,
}

impl<'a, V: Value> OpenFile<'a, V> {
    pub(crate) fn new(list: &'a ModList<V>) -> Self {
        Self {
            list,
            pos: 0,
            mode: list.config().read_mode,
            seq: Enumeration::new(list),
            pending: Vec::new(),
            served: 0,
        }
    }

    /// Returns the current stream position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Moves the position back to the origin and drops any session output.
    pub fn rewind(&mut self) {
        self.pos = 0;
        self.pending.clear();
        self.served = 0;
        self.seq.stop();
    }

    // ========================================================================
    // Write
    // ========================================================================

    /// Copies in and executes one command.
    ///
    /// Returns the number of bytes consumed, or 0 if the handle is not at
    /// the origin.
    ///
    /// # Errors
    ///
    /// [`Error::OversizedInput`], [`Error::TransferFault`],
    /// [`Error::MalformedCommand`], [`Error::NotFound`] or
    /// [`Error::AllocationFailure`].
    pub fn write<S: UserSource + ?Sized>(&mut self, src: &S) -> Result<usize> {
        let len = src.len();
        let max = self.list.config().max_command_len;
        if len >= max {
            debug!(target: "modlist", len, max, "oversized command rejected");
            return Err(Error::OversizedInput { len, max });
        }

        let mut kbuf = vec![0u8; len];
        src.copy_to(&mut kbuf)?;

        if self.pos > 0 {
            return Ok(0);
        }

        let command = self.list.parse(&kbuf)?;
        let _: Outcome = self.list.execute(command)?;

        self.pos += len as u64;
        Ok(len)
    }

    // ========================================================================
    // Read
    // ========================================================================

    /// Copies the next chunk of the answer into `dst`.
    ///
    /// Returns the number of bytes copied; 0 signals end-of-data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransferFault`] if the copy to `dst` fails.
    pub fn read<D: UserSink + ?Sized>(&mut self, dst: &mut D) -> Result<usize> {
        match self.mode {
            ReadMode::Bulk => self.read_bulk(dst),
            ReadMode::Paginated => self.read_paginated(dst),
        }
    }

    fn read_bulk<D: UserSink + ?Sized>(&mut self, dst: &mut D) -> Result<usize> {
        if self.pos > 0 {
            return Ok(0);
        }

        let mut answer = self.list.dump().into_bytes();
        answer.push(0);

        dst.copy_from(&answer)?;
        self.pos += answer.len() as u64;
        Ok(answer.len())
    }

    fn read_paginated<D: UserSink + ?Sized>(&mut self, dst: &mut D) -> Result<usize> {
        if self.served == self.pending.len() {
            self.pending.clear();
            self.served = 0;

            if self.seq.start(self.pos) == Step::Done {
                self.seq.stop();
                self.pos = 0;
                return Ok(0);
            }
            self.fill_session();
        }

        let remaining = &self.pending[self.served..];
        let n = remaining.len().min(dst.capacity());
        dst.copy_from(&remaining[..n])?;

        self.served += n;
        self.pos += n as u64;
        Ok(n)
    }

    fn fill_session(&mut self) {
        let limit = self.list.config().answer_buffer_len;
        let mut record = String::new();

        loop {
            record.clear();
            if self.seq.step_and_render(&mut record) == Step::Done {
                break;
            }
            if self.pending.len() + record.len() > limit {
                debug!(target: "modlist", records = self.seq.cursor() - 1, "answer buffer full");
                break;
            }
            self.pending.extend_from_slice(record.as_bytes());
        }

        self.seq.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, ShortString};

    fn list(mode: ReadMode) -> ModList<i64> {
        ModList::new(Config::default().with_read_mode(mode))
    }

    fn read_all(file: &mut OpenFile<'_, i64>) -> Vec<u8> {
        let mut out = Vec::new();
        while file.read(&mut out).unwrap() > 0 {}
        out
    }

    #[test]
    fn write_reports_bytes_consumed() {
        let list = list(ReadMode::Bulk);
        let mut file = list.open();
        assert_eq!(file.write("add 12\n").unwrap(), 7);
        assert_eq!(file.position(), 7);
        assert_eq!(list.snapshot(), vec![12]);
    }

    #[test]
    fn repeat_write_is_ignored() {
        let list = list(ReadMode::Bulk);
        let mut file = list.open();
        file.write("add 1\n").unwrap();
        assert_eq!(file.write("add 2\n").unwrap(), 0);
        assert_eq!(list.snapshot(), vec![1]);
    }

    #[test]
    fn oversized_write_rejected_before_parsing() {
        let list = list(ReadMode::Bulk);
        let payload = "a".repeat(500);
        assert_eq!(
            list.open().write(payload.as_str()),
            Err(Error::OversizedInput { len: 500, max: 500 })
        );

        let just_under = format!("add {}", "1".repeat(495));
        assert!(matches!(
            list.open().write(just_under.as_str()),
            Err(Error::MalformedCommand(_))
        ));
    }

    #[test]
    fn long_string_accepted_under_wider_command_bound() {
        let list: ModList<ShortString> =
            ModList::new(Config::default().with_max_command_len(2000));
        let payload = format!("add {}\n", "x".repeat(600));

        assert_eq!(list.open().write(payload.as_str()).unwrap(), 605);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn invalid_utf8_write_is_malformed() {
        let list = list(ReadMode::Bulk);
        assert!(matches!(
            list.open().write(&[0x61, 0x64, 0x64, 0x20, 0xff][..]),
            Err(Error::MalformedCommand(_))
        ));
        assert!(list.is_empty());
    }

    #[test]
    fn failed_write_keeps_position() {
        let list = list(ReadMode::Bulk);
        let mut file = list.open();
        assert_eq!(file.write("remove 3\n"), Err(Error::NotFound));
        assert_eq!(file.position(), 0);
        assert_eq!(file.write("add 3\n").unwrap(), 6);
    }

    #[test]
    fn bulk_read_is_nul_terminated_once() {
        let list = list(ReadMode::Bulk);
        list.dispatch("add 1").unwrap();
        list.dispatch("add 2").unwrap();

        let mut file = list.open();
        let mut buf = [0u8; 64];
        let n = file.read(&mut buf[..]).unwrap();
        assert_eq!(&buf[..n], b"1\n2\n\0");
        assert_eq!(file.read(&mut buf[..]).unwrap(), 0);
    }

    #[test]
    fn bulk_read_into_small_buffer_faults() {
        let list = list(ReadMode::Bulk);
        list.dispatch("add 12345").unwrap();

        let mut file = list.open();
        let mut buf = [0u8; 3];
        assert_eq!(file.read(&mut buf[..]), Err(Error::TransferFault));
        assert_eq!(file.position(), 0);
    }

    #[test]
    fn empty_bulk_read_is_just_terminator() {
        let list = list(ReadMode::Bulk);
        assert_eq!(read_all(&mut list.open()), b"\0");
    }

    #[test]
    fn paginated_read_yields_every_record() {
        let list = list(ReadMode::Paginated);
        for v in [3, 1, 4, 1, 5] {
            list.add(v).unwrap();
        }
        assert_eq!(read_all(&mut list.open()), b"3\n1\n4\n1\n5\n");
    }

    #[test]
    fn paginated_read_serves_small_buffers() {
        let list = list(ReadMode::Paginated);
        for v in [10, 20, 30] {
            list.add(v).unwrap();
        }

        let mut file = list.open();
        let mut out = Vec::new();
        let mut buf = [0u8; 4];
        loop {
            let n = file.read(&mut buf[..]).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, b"10\n20\n30\n");
    }

    #[test]
    fn paginated_session_restarts_after_end_of_data() {
        let list = list(ReadMode::Paginated);
        list.add(1).unwrap();

        let mut file = list.open();
        assert_eq!(read_all(&mut file), b"1\n");
        assert_eq!(file.position(), 0);

        list.add(2).unwrap();
        assert_eq!(read_all(&mut file), b"1\n2\n");
    }

    #[test]
    fn paginated_empty_list_reads_nothing() {
        let list = list(ReadMode::Paginated);
        assert!(read_all(&mut list.open()).is_empty());
    }

    #[test]
    fn paginated_session_bounded_by_answer_buffer() {
        let list: ModList<i64> = ModList::new(
            Config::default()
                .with_read_mode(ReadMode::Paginated)
                .with_answer_buffer_len(5),
        );
        for v in [11, 22, 33] {
            list.add(v).unwrap();
        }
        assert_eq!(read_all(&mut list.open()), b"11\n");
    }

    #[test]
    fn rewind_allows_another_bulk_read() {
        let list = list(ReadMode::Bulk);
        list.add(8).unwrap();

        let mut file = list.open();
        assert_eq!(read_all(&mut file), b"8\n\0");
        file.rewind();
        assert_eq!(read_all(&mut file), b"8\n\0");
    }

    struct FaultySource;

    impl UserSource for FaultySource {
        fn len(&self) -> usize {
            6
        }

        fn copy_to(&self, _dst: &mut [u8]) -> Result<()> {
            Err(Error::TransferFault)
        }
    }

    #[test]
    fn transfer_fault_aborts_write() {
        let list = list(ReadMode::Bulk);
        assert_eq!(list.open().write(&FaultySource), Err(Error::TransferFault));
        assert!(list.is_empty());
    }
}
