//! Status-code display-name registry.
//!
//! A dense, write-once-read-many side table mapping small integer status
//! codes to human-readable names. Built-in codes are seeded by [`init`];
//! callers may register names for their own codes up to
//! [`MAX_STATUS_CODE`].
//!
//! [`init`]: crate::init
//! [`MAX_STATUS_CODE`]: crate::consts::MAX_STATUS_CODE

use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockWriteGuard;
use tracing::trace;

use crate::consts;
use crate::status::Status;
use crate::utils::truncate_in_place;

static REGISTRY: RwLock<Registry> = RwLock::new(Registry::new());

/// Registers (or overwrites) the display name for `status`.
///
/// Names longer than [`MAX_NAME_LEN`] bytes are truncated. Registration
/// for codes outside `0..=MAX_STATUS_CODE` is ignored. There is no
/// removal operation.
///
/// [`MAX_NAME_LEN`]: crate::consts::MAX_NAME_LEN
pub fn set_name(status: Status, name: &str) {
  let code: i32 = status.code();

  if code < 0 || code > consts::MAX_STATUS_CODE {
    trace!(target: "faultline", code, "name registration ignored (code out of range)");
    return;
  }

  let mut name: String = name.to_string();
  truncate_in_place(&mut name, consts::MAX_NAME_LEN);

  let index: usize = code as usize;
  let mut guard: RwLockWriteGuard<'_, Registry> = REGISTRY.write();

  if guard.names.len() <= index {
    guard.names.resize(index + 1, String::new());
  }

  guard.names[index] = name;
}

/// Returns the display name registered for `status`.
///
/// Codes outside `0..=MAX_STATUS_CODE` yield the
/// [`UNKNOWN_STATUS_NAME`] sentinel; in-range codes that were never
/// registered yield an empty string.
///
/// [`UNKNOWN_STATUS_NAME`]: crate::consts::UNKNOWN_STATUS_NAME
pub fn name_for(status: Status) -> String {
  let code: i32 = status.code();

  if code < 0 || code > consts::MAX_STATUS_CODE {
    return consts::UNKNOWN_STATUS_NAME.to_string();
  }

  let guard: RwLockReadGuard<'_, Registry> = REGISTRY.read();

  guard.names.get(code as usize).cloned().unwrap_or_default()
}

/// Seeds the built-in status names. Called once from `init`.
pub(crate) fn seed_builtin_names() {
  set_name(Status::NULL_POINTER, "Null Pointer Error");
  set_name(Status::OUT_OF_BOUNDS, "Out Of Bounds Error");
  set_name(Status::API, "API Error");
  set_name(Status::ATTRIBUTE, "Attribute Error");
  set_name(Status::TYPE, "Type Error");
  set_name(Status::KEY, "Key Error");
  set_name(Status::HEAP, "Heap Error");
  set_name(Status::INDEX, "Index Error");
  set_name(Status::FORMAT, "Format Error");
  set_name(Status::IO, "Input Output Error");
  set_name(Status::REGISTRY, "Registry Error");
  set_name(Status::VALUE, "Value Error");
  set_name(Status::BEHAVIOR, "Behavior Error");
  set_name(Status::RELATIONSHIP, "Relationship Error");
}

// -----------------------------------------------------------------------------
// Name Registry - Table
// -----------------------------------------------------------------------------

struct Registry {
  names: Vec<String>,
}

impl Registry {
  #[inline]
  const fn new() -> Self {
    Self { names: Vec::new() }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
