//! Error kinds shared by all three engines.
//!
//! Operations that consume external *data* (truth-table strings, dump
//! streams, dot options, variable orders) report failures through
//! [`Result`]. Violations of an API contract (mixing managers, calling a
//! node-kind accessor on the wrong kind, mismatched variable counts)
//! panic with a message naming the same kind, since they are programming
//! errors rather than conditions a caller recovers from.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  /// malformed or mismatched argument data.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// an internal invariant was found broken; indicates a bug.
  #[error("logic error: {0}")]
  LogicError(String),

  /// an index past the end of an input/variable/leaf array.
  #[error("out of range: {0}")]
  OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
  pub fn invalid_argument(msg: impl Into<String>)->Error { Error::InvalidArgument(msg.into()) }
  pub fn logic_error(msg: impl Into<String>)->Error { Error::LogicError(msg.into()) }
  pub fn out_of_range(msg: impl Into<String>)->Error { Error::OutOfRange(msg.into()) }}
