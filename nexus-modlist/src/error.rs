//! Error types for the command and read endpoints.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure returned synchronously to the caller of a service operation.
///
/// None of these are retried by the service. Each maps to a distinct
/// errno-style code via [`Error::errno`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Write payload at or above the maximum command length.
    #[error("command of {len} bytes exceeds limit of {max} bytes")]
    OversizedInput {
        /// Length of the rejected payload.
        len: usize,
        /// Exclusive upper bound on payload length.
        max: usize,
    },
    /// Copying bytes between the caller and the service failed.
    #[error("transfer between caller and service failed")]
    TransferFault,
    /// Input matched no recognized command, or carried a bad value.
    #[error("malformed command: {0}")]
    MalformedCommand(String),
    /// `remove` targeted a value that is not in the list.
    #[error("value not found")]
    NotFound,
    /// A node could not be allocated.
    #[error("out of memory: node allocation failed")]
    AllocationFailure,
}

impl Error {
    /// Returns the errno value a host would surface for this error.
    pub fn errno(&self) -> i32 {
        match self {
            Self::OversizedInput { .. } => 27, // EFBIG
            Self::TransferFault => 14,         // EFAULT
            Self::MalformedCommand(_) => 22,   // EINVAL
            Self::NotFound => 2,               // ENOENT
            Self::AllocationFailure => 12,     // ENOMEM
        }
    }
}
