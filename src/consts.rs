// -----------------------------------------------------------------------------
// Exit Codes
// -----------------------------------------------------------------------------

/// Exit code used by the default unhandled-error hook when no record exists.
pub const E_CODE_NO_RECORD: i32 = 1;

// -----------------------------------------------------------------------------
// Pool Capacity
// -----------------------------------------------------------------------------

/// Number of reusable error records in the pool.
///
/// The pool is sized generously; running out of records indicates a leaked
/// handle, and acquisition past this limit is fatal by design.
pub const MAX_POOL_RECORDS: usize = 128;

// -----------------------------------------------------------------------------
// Record Limits
// -----------------------------------------------------------------------------

/// Maximum length (in bytes) of a record's failure message.
///
/// Longer messages are truncated on a character boundary.
pub const MAX_MESSAGE_LEN: usize = 1024;

/// Maximum number of entries retained in a record's trace segment.
///
/// Pushes past this limit are silently dropped; already-written entries
/// are preserved.
pub const MAX_TRACE_ENTRIES: usize = 32;

// -----------------------------------------------------------------------------
// Name Registry
// -----------------------------------------------------------------------------

/// Maximum length (in bytes) of a registered status display name.
pub const MAX_NAME_LEN: usize = 64;

/// Highest status code the name registry accepts.
///
/// Codes above this (or below zero) always read back as
/// [`UNKNOWN_STATUS_NAME`] and registration for them is ignored.
pub const MAX_STATUS_CODE: i32 = 63;

/// Display name returned for status codes outside the registrable range.
pub const UNKNOWN_STATUS_NAME: &str = "Unknown Error";
