//! Service configuration.

/// Default exclusive upper bound on a command payload, in bytes.
pub const DEFAULT_MAX_COMMAND_LEN: usize = 500;

/// Default size of the answer buffer a read is serialized into, in bytes.
pub const DEFAULT_ANSWER_BUFFER_LEN: usize = 500;

/// How reads serialize the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// One read returns every record; later reads return end-of-data.
    Bulk,
    /// Records are produced one per step/render cycle.
    Paginated,
}

impl ReadMode {
    /// Read strategy selected at build time (`seq-read` feature).
    #[cfg(not(feature = "seq-read"))]
    pub const DEFAULT: Self = ReadMode::Bulk;

    /// Read strategy selected at build time (`seq-read` feature).
    #[cfg(feature = "seq-read")]
    pub const DEFAULT: Self = ReadMode::Paginated;
}

impl Default for ReadMode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Limits and read strategy for a [`ModList`](crate::ModList).
///
/// # Example
///
/// ```
/// use nexus_modlist::{Config, ReadMode};
///
/// let config = Config::default()
///     .with_node_capacity(Some(1024))
///     .with_read_mode(ReadMode::Paginated);
///
/// assert_eq!(config.max_command_len, 500);
/// assert_eq!(config.node_capacity, Some(1024));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Payloads of this many bytes or more are rejected before parsing.
    pub max_command_len: usize,
    /// Bound on one serialized answer, terminator included.
    pub answer_buffer_len: usize,
    /// Maximum number of values held; `None` grows until allocation fails.
    pub node_capacity: Option<usize>,
    /// How reads on an opened endpoint serialize the list.
    pub read_mode: ReadMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_command_len: DEFAULT_MAX_COMMAND_LEN,
            answer_buffer_len: DEFAULT_ANSWER_BUFFER_LEN,
            node_capacity: None,
            read_mode: ReadMode::DEFAULT,
        }
    }
}

impl Config {
    /// Sets the command length bound.
    pub fn with_max_command_len(mut self, len: usize) -> Self {
        self.max_command_len = len;
        self
    }

    /// Sets the answer buffer size.
    pub fn with_answer_buffer_len(mut self, len: usize) -> Self {
        self.answer_buffer_len = len;
        self
    }

    /// Sets the node capacity.
    pub fn with_node_capacity(mut self, capacity: Option<usize>) -> Self {
        self.node_capacity = capacity;
        self
    }

    /// Sets the read strategy.
    pub fn with_read_mode(mut self, mode: ReadMode) -> Self {
        self.read_mode = mode;
        self
    }
}
