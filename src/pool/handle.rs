use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;
use std::mem;

use crate::pool;
use crate::record::ErrorRecord;
use crate::status::Status;

/// An owned claim on one error record.
///
/// One handle corresponds to exactly one unit of the record's reference
/// count: acquisition and [`retain`] increment, [`release`] and `Drop`
/// decrement. Dropping a handle on any exit path therefore keeps the
/// refcount contract without explicit bookkeeping.
///
/// Handles are not `Clone`; use [`retain`] to express a nested
/// acquisition deliberately.
///
/// [`retain`]: ErrHandle::retain
/// [`release`]: ErrHandle::release
pub struct ErrHandle {
  slot: usize,
}

impl ErrHandle {
  #[inline]
  pub(crate) const fn new(slot: usize) -> Self {
    Self { slot }
  }

  /// Returns the underlying record's pool slot id.
  #[inline]
  pub const fn slot(&self) -> usize {
    self.slot
  }

  /// Returns the record's current status.
  #[inline]
  pub fn status(&self) -> Status {
    pool::with_record(self.slot, |record| record.status())
  }

  /// Returns a detached snapshot of the record.
  pub fn snapshot(&self) -> ErrorRecord {
    pool::with_record(self.slot, |record| record.clone())
  }

  /// Takes an additional claim on the record (ensure-ready on an
  /// existing handle). The record now requires one more release before
  /// its slot frees.
  pub fn retain(&self) -> ErrHandle {
    pool::with_record(self.slot, |record| record.retain());

    ErrHandle::new(self.slot)
  }

  /// Drops this claim on the record.
  ///
  /// Returns `true` if the record is still live (held elsewhere). When
  /// the last claim is released the record is fully reset and its slot
  /// becomes available for reuse.
  pub fn release(self) -> bool {
    let slot: usize = self.slot;

    mem::forget(self);

    pool::release_slot(slot)
  }
}

impl Debug for ErrHandle {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("ErrHandle").field("slot", &self.slot).finish()
  }
}

impl Drop for ErrHandle {
  fn drop(&mut self) {
    let _ = pool::release_slot(self.slot);
  }
}
