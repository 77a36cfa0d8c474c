//! Resumable, position-tracked enumeration.
//!
//! An [`Enumeration`] drives the four-phase sequential-read lifecycle over a
//! [`ModList`]:
//!
//! ```text
//! start(pos) ──Continue──► step ──Continue──► render ──┐
//!     │                     ▲                          │
//!     │                     └──────────────────────────┘
//!     │                     │
//!     └──────Done───────────┴──Done──► stop
//! ```
//!
//! - `start` at a non-origin position resets the cursor and reports `Done`
//!   (the session is over); at the origin it begins a session.
//! - `step` advances the cursor while it is below the current count.
//! - `render` serializes the value at the cursor as one record.
//! - `stop` ends the session.
//!
//! [`step_and_render`](Enumeration::step_and_render) runs one step and its
//! render under a single read lock, so a `Continue` always comes with a
//! record. Drivers that want one record per lock hold use it; `step` and
//! `render` called separately each take the lock for themselves.
//!
//! A session is consistent per step, not per session: writers may run
//! between steps, so a session can see values appended after it started,
//! skip values removed ahead of the cursor, or end early if the list shrinks
//! below the cursor.
//!
//! The cursor is owned by the enumeration (one per opened endpoint), so
//! sessions on different handles never disturb each other.
//!
//! # Locating the cursor node
//!
//! The node at position `cursor` is, by definition, the node reached by
//! walking `cursor` steps from the sentinel. Rather than re-walking for
//! every record, the enumeration remembers the key it rendered last along
//! with the ring's generation. If no structural change happened since, the
//! next node is one `next` link away; otherwise it falls back to the walk.

use tracing::debug;

use crate::service::render_record;
use crate::{ModList, NodeKey, Ring, Value};

/// Whether the lifecycle should continue or wind down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Another record is available.
    Continue,
    /// The session is finished; call `stop`.
    Done,
}

/// Node rendered last, valid while the ring's generation is unchanged.
#[derive(Debug, Clone, Copy)]
struct Retained {
    key: NodeKey,
    position: usize,
    generation: u64,
}

/// Per-session enumeration state over a [`ModList`].
///
/// # Example
///
/// ```
/// use nexus_modlist::{Config, Enumeration, ModList, Step};
///
/// let list: ModList<i64> = ModList::new(Config::default());
/// list.add(1).unwrap();
/// list.add(2).unwrap();
///
/// let mut seq = Enumeration::new(&list);
/// let mut out = String::new();
///
/// assert_eq!(seq.start(0), Step::Continue);
/// while seq.step() == Step::Continue {
///     seq.render(&mut out);
/// }
/// seq.stop();
///
/// assert_eq!(out, "1\n2\n");
/// ```
#[derive(Debug)]
pub struct Enumeration<'a, V: Value> {
    list: &'a ModList<V>,
    cursor: usize,
    active: bool,
    retained: Option<Retained>,
}

impl<'a, V: Value> Enumeration<'a, V> {
    /// Creates an idle enumeration with the cursor at zero.
    pub fn new(list: &'a ModList<V>) -> Self {
        Self {
            list,
            cursor: 0,
            active: false,
            retained: None,
        }
    }

    /// Number of records yielded in the current session.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns `true` between a successful `start` and `stop`.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begins a session at stream position `pos`.
    ///
    /// A non-origin position means the previous session already produced its
    /// output: the cursor is reset and `Done` is returned.
    pub fn start(&mut self, pos: u64) -> Step {
        if pos != 0 {
            self.reset();
            return Step::Done;
        }

        self.reset();
        self.active = true;
        debug!(target: "modlist", "enumeration started");
        Step::Continue
    }

    /// Advances the cursor if another value is available.
    pub fn step(&mut self) -> Step {
        if !self.active {
            return Step::Done;
        }

        let len = self.list.read().len();
        if self.cursor < len {
            self.cursor += 1;
            Step::Continue
        } else {
            Step::Done
        }
    }

    /// Appends the record at the cursor to `out`.
    ///
    /// Returns `false`, writing nothing, if there is no value at the cursor
    /// (the cursor is at the origin, or the list shrank below it since the
    /// last `step`).
    pub fn render(&mut self, out: &mut String) -> bool {
        let list = self.list;
        let ring = list.read();
        self.render_from(&ring, out)
    }

    /// Advances the cursor and renders the record there, holding the read
    /// lock once for both.
    ///
    /// Returns `Continue` only if a record was appended to `out`.
    pub fn step_and_render(&mut self, out: &mut String) -> Step {
        if !self.active {
            return Step::Done;
        }

        let list = self.list;
        let ring = list.read();
        if self.cursor >= ring.len() {
            return Step::Done;
        }
        self.cursor += 1;

        if self.render_from(&ring, out) {
            Step::Continue
        } else {
            Step::Done
        }
    }

    fn render_from(&mut self, ring: &Ring<V>, out: &mut String) -> bool {
        let generation = ring.generation();

        let key = match self.retained {
            Some(r) if r.generation == generation && r.position == self.cursor => Some(r.key),
            Some(r) if r.generation == generation && r.position + 1 == self.cursor => {
                ring.next_key(r.key)
            }
            _ => ring.nth(self.cursor),
        };

        let Some((key, value)) = key.and_then(|key| ring.get(key).map(|value| (key, value)))
        else {
            self.retained = None;
            return false;
        };

        render_record(out, value);
        self.retained = Some(Retained {
            key,
            position: self.cursor,
            generation,
        });
        true
    }

    /// Ends the session.
    pub fn stop(&mut self) {
        if self.active {
            debug!(target: "modlist", records = self.cursor, "enumeration finished");
        }
        self.active = false;
        self.retained = None;
    }

    fn reset(&mut self) {
        self.cursor = 0;
        self.active = false;
        self.retained = None;
    }
}
