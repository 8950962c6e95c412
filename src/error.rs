use thiserror::Error;

/// Reason an evaluation was rejected.
///
/// Ways to handle this error include:
///
/// - Pick a larger version if the requested one was below 3.
/// - Change the binary data to be shorter.
/// - Propagate the error upward to the caller/user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// Only versions 1, 2 and 3 are supported.
    #[error("Version {0} is not supported (expected 1 to 3)")]
    UnsupportedVersion(u8),
    /// The input does not fit the byte-mode capacity of the version.
    #[error("Data length = {len} bytes, Max capacity = {capacity} bytes")]
    DataOverCapacity { len: usize, capacity: usize },
}
