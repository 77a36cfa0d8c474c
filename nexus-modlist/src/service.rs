//! The service handle: one ring behind one reader-writer lock.
//!
//! [`ModList`] owns everything the service needs (the ring with its sentinel,
//! the count, the limits) and is constructed once at start-up and dropped
//! once at shutdown. Writers (`add`, `remove`, `cleanup`) take the lock
//! exclusively for the structural change only; parsing and value
//! preparation happen before the lock is acquired. Readers (lookups, dumps,
//! enumeration steps) share it.

use std::fmt::Write as _;

use parking_lot::{RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

use crate::endpoint::OpenFile;
use crate::ring::Ring;
use crate::{Command, Config, DefaultValue, Error, Result, Value};

/// Effect of a successfully executed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A value was appended.
    Added,
    /// One value was removed.
    Removed,
    /// The list was cleared; carries the number of values released.
    Cleared(usize),
}

/// Concurrency-safe ordered list of values with a textual command interface.
///
/// Share it between threads with `Arc` (or scoped borrows). Each caller that
/// wants file-like access opens its own [`OpenFile`].
///
/// # Example
///
/// ```
/// use nexus_modlist::{Config, ModList};
///
/// let list: ModList<i64> = ModList::new(Config::default());
/// list.dispatch("add 1\n").unwrap();
/// list.dispatch("add 2\n").unwrap();
/// list.dispatch("add 3\n").unwrap();
/// assert_eq!(list.dump(), "1\n2\n3\n");
///
/// list.dispatch("remove 2\n").unwrap();
/// assert_eq!(list.dump(), "1\n3\n");
///
/// list.dispatch("cleanup\n").unwrap();
/// assert_eq!(list.dump(), "");
/// ```
pub struct ModList<V: Value = DefaultValue> {
    config: Config,
    ring: RwLock<Ring<V>>,
}

impl<V: Value> ModList<V> {
    /// Starts the service with an empty list.
    pub fn new(config: Config) -> Self {
        info!(
            target: "modlist",
            domain = V::DOMAIN,
            read_mode = ?config.read_mode,
            "modlist loaded for {}",
            V::DOMAIN
        );
        Self {
            ring: RwLock::new(Ring::new(config.node_capacity)),
            config,
        }
    }

    /// Returns the configuration the service was started with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.ring.read().len()
    }

    /// Returns `true` if the list holds no values.
    pub fn is_empty(&self) -> bool {
        self.ring.read().is_empty()
    }

    /// Returns `true` if `value` is in the list.
    pub fn contains(&self, value: &V) -> bool {
        self.ring.read().find(value).is_some()
    }

    /// Opens a file-like endpoint positioned at the origin.
    pub fn open(&self) -> OpenFile<'_, V> {
        OpenFile::new(self)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Appends `value` at the tail.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if no node can be allocated; the
    /// list and its count are unchanged.
    pub fn add(&self, value: V) -> Result<()> {
        let pushed = {
            let mut ring = self.ring.write();
            ring.push_back(value).map_err(|full| (full, ring.capacity()))
        };
        match pushed {
            Ok(_) => Ok(()),
            Err((full, capacity)) => {
                let value = full.into_inner();
                warn!(target: "modlist", %value, ?capacity, "node allocation failed");
                Err(Error::AllocationFailure)
            }
        }
    }

    /// Removes the earliest occurrence of `value`.
    ///
    /// Lookup and unlink happen in the same critical section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `value` is absent; the list is
    /// unchanged.
    pub fn remove(&self, value: &V) -> Result<V> {
        let removed = {
            let mut ring = self.ring.write();
            if ring.is_empty() {
                None
            } else {
                ring.remove(value)
            }
        };
        removed.ok_or(Error::NotFound)
    }

    /// Removes every value, returning how many were released.
    pub fn cleanup(&self) -> usize {
        self.ring.write().clear()
    }

    /// Executes a parsed command.
    ///
    /// # Errors
    ///
    /// See [`add`](Self::add) and [`remove`](Self::remove).
    pub fn execute(&self, command: Command<V>) -> Result<Outcome> {
        let keyword = command.keyword();
        let outcome = match command {
            Command::Add(value) => self.add(value).map(|()| Outcome::Added),
            Command::Remove(value) => self.remove(&value).map(|_| Outcome::Removed),
            Command::Cleanup => Ok(Outcome::Cleared(self.cleanup())),
        };

        match &outcome {
            Ok(outcome) => debug!(target: "modlist", command = keyword, ?outcome, "command applied"),
            Err(err) => warn!(target: "modlist", command = keyword, %err, "command failed"),
        }
        outcome
    }

    /// Parses and executes one textual command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedCommand`] for unparsable input, otherwise
    /// whatever [`execute`](Self::execute) returns.
    pub fn dispatch(&self, text: &str) -> Result<Outcome> {
        let command = self.parse(text.as_bytes())?;
        self.execute(command)
    }

    /// Parses a raw command against the configured command bound.
    pub(crate) fn parse(&self, bytes: &[u8]) -> Result<Command<V>> {
        Command::from_bytes(bytes, self.config.max_command_len).inspect_err(|err| {
            warn!(target: "modlist", %err, "rejected command");
        })
    }

    // ========================================================================
    // Bulk read
    // ========================================================================

    /// Renders every value as one `value\n` record, front to back.
    ///
    /// The answer is bounded by the configured answer buffer, keeping one
    /// byte for the terminator a reader appends. Records that do not fit
    /// are dropped from the end.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, self.config.answer_buffer_len.saturating_sub(1));
        out
    }

    /// Appends whole records to `out` while they fit within `limit` bytes.
    ///
    /// Holds the read lock once for the entire walk. Returns the number of
    /// records written.
    pub fn dump_into(&self, out: &mut String, limit: usize) -> usize {
        let mut record = String::new();
        let mut written = 0;

        let ring = self.ring.read();
        for value in ring.iter() {
            record.clear();
            render_record(&mut record, value);
            if out.len() + record.len() > limit {
                debug!(target: "modlist", written, total = ring.len(), "answer buffer full");
                break;
            }
            out.push_str(&record);
            written += 1;
        }
        written
    }

    /// Clones the current values, front to back.
    pub fn snapshot(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.ring.read().iter().cloned().collect()
    }

    /// Checks the ring's structural invariants under the read lock.
    pub fn is_consistent(&self) -> bool {
        self.ring.read().is_consistent()
    }

    #[inline]
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Ring<V>> {
        self.ring.read()
    }
}

impl<V: Value> Default for ModList<V> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<V: Value> Drop for ModList<V> {
    fn drop(&mut self) {
        let released = self.ring.get_mut().clear();
        info!(target: "modlist", released, "modlist unloaded");
    }
}

impl<V: Value> std::fmt::Debug for ModList<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModList")
            .field("config", &self.config)
            .field("values", &*self.ring.read())
            .finish()
    }
}

/// Renders one record: the value followed by a newline.
#[inline]
pub(crate) fn render_record<V: Value>(out: &mut String, value: &V) {
    // Writing to a String cannot fail
    let _ = writeln!(out, "{value}");
}
