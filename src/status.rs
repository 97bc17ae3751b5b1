use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// A small-integer error kind.
///
/// The code space is open: any `i32` constructs a valid `Status`, and
/// callers may register display names for their own codes through the
/// name registry. The reserved value `0` ([`Status::OK`]) means
/// "no error".
///
/// # Examples
///
/// ```
/// use faultline::Status;
///
/// assert!(Status::OK.is_ok());
/// assert!(!Status::NULL_POINTER.is_ok());
/// assert_eq!(Status::new(42).code(), 42);
/// ```
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[repr(transparent)]
pub struct Status(i32);

impl Status {
  /// No error.
  pub const OK: Status = Status(0);

  /// Null-pointer failure.
  pub const NULL_POINTER: Status = Status(1);
  /// Out-of-bounds access.
  pub const OUT_OF_BOUNDS: Status = Status(2);
  /// API misuse.
  pub const API: Status = Status(3);
  /// Missing attribute.
  pub const ATTRIBUTE: Status = Status(4);
  /// Type mismatch.
  pub const TYPE: Status = Status(5);
  /// Missing key.
  pub const KEY: Status = Status(6);
  /// Heap or allocation failure.
  pub const HEAP: Status = Status(7);
  /// Index out of range.
  pub const INDEX: Status = Status(8);
  /// Invalid format.
  pub const FORMAT: Status = Status(9);
  /// Input/output failure.
  pub const IO: Status = Status(10);
  /// Registry failure.
  pub const REGISTRY: Status = Status(11);
  /// Invalid value.
  pub const VALUE: Status = Status(12);
  /// Invalid behavior.
  pub const BEHAVIOR: Status = Status(13);
  /// Invalid relationship.
  pub const RELATIONSHIP: Status = Status(14);

  /// Creates a `Status` from a raw code.
  #[inline]
  pub const fn new(code: i32) -> Self {
    Self(code)
  }

  /// Returns the raw status code.
  #[inline]
  pub const fn code(self) -> i32 {
    self.0
  }

  /// Returns `true` if this status means "no error".
  #[inline]
  pub const fn is_ok(self) -> bool {
    self.0 == 0
  }

  /// Returns the registered display name for this status.
  ///
  /// Equivalent to [`name_for`].
  ///
  /// [`name_for`]: crate::names::name_for
  #[inline]
  pub fn name(self) -> String {
    crate::names::name_for(self)
  }
}

impl Display for Status {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(&self.0, f)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::status::Status;

  #[test]
  fn test_ok_sentinel() {
    assert!(Status::OK.is_ok());
    assert_eq!(Status::OK.code(), 0);
    assert!(Status::new(0).is_ok());
  }

  #[test]
  fn test_builtin_codes() {
    assert_eq!(Status::NULL_POINTER.code(), 1);
    assert_eq!(Status::RELATIONSHIP.code(), 14);
    assert!(!Status::IO.is_ok());
  }

  #[test]
  fn test_display() {
    assert_eq!(format!("{}", Status::TYPE), "5");
    assert_eq!(format!("{}", Status::new(-3)), "-3");
  }
}
