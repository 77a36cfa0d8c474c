//! Concurrency-safe ordered value list with a textual command endpoint.
//!
//! The crate is a small in-process service: an ordered collection of scalar
//! values (integers or short strings) that callers mutate by writing
//! commands and inspect by reading a serialized answer, all safe under
//! concurrent access.
//!
//! # Layers
//!
//! ```text
//! OpenFile (endpoint)      - stream position, write/read contract
//!     │
//!     ├── Command          - `add <v>` / `remove <v>` / `cleanup`
//!     └── Enumeration      - start / step / render / stop
//!            │
//! ModList (service)        - one RwLock around the ring
//!     │
//! Ring (node store)        - sentinel-anchored circular doubly-linked list
//!     │
//! NodeSlab (storage)       - slab slots with stable keys, optional limit
//! ```
//!
//! Writers take the lock exclusively for the structural change only; readers
//! share it. A bulk read holds it once for the whole walk; a paginated read
//! takes it once per step and once per record.
//!
//! # Quick Start
//!
//! ```
//! use nexus_modlist::{Config, Error, ModList};
//!
//! let list: ModList<i64> = ModList::new(Config::default());
//!
//! let mut file = list.open();
//! file.write("add 1\n").unwrap();
//!
//! list.dispatch("add 2\n").unwrap();
//! list.dispatch("add 1\n").unwrap();
//! list.dispatch("remove 1\n").unwrap();
//! assert_eq!(list.dump(), "2\n1\n");
//!
//! assert_eq!(list.dispatch("remove 9\n"), Err(Error::NotFound));
//! ```
//!
//! # Sharing
//!
//! [`ModList`] is `Send + Sync`; share it with `Arc` or scoped borrows and
//! give each caller its own [`OpenFile`]. Enumeration state lives in the
//! handle, so concurrent paginated readers never disturb each other.
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use nexus_modlist::ModList;
//!
//! let list: Arc<ModList<i64>> = Arc::new(ModList::default());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let list = Arc::clone(&list);
//!         thread::spawn(move || {
//!             for i in 0..10 {
//!                 list.add(t * 10 + i).unwrap();
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//! assert_eq!(list.len(), 40);
//! ```
//!
//! # Feature Flags
//!
//! - `chars` - [`DefaultValue`] is [`ShortString`] instead of `i64`
//! - `seq-read` - [`ReadMode::DEFAULT`] is paginated instead of bulk

#![warn(missing_docs)]

pub mod command;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod key;
pub mod ring;
pub mod seq;
pub mod service;
pub mod storage;
pub mod transfer;
pub mod value;

pub use command::Command;
pub use config::{Config, ReadMode};
pub use endpoint::OpenFile;
pub use error::{Error, Result};
pub use key::NodeKey;
pub use ring::Ring;
pub use seq::{Enumeration, Step};
pub use service::{ModList, Outcome};
pub use storage::{Full, NodeSlab};
pub use transfer::{UserSink, UserSource};
pub use value::{DefaultValue, ShortString, Value};
