//! The fixed-capacity error-record pool.
//!
//! A process-wide array of [`MAX_POOL_RECORDS`] reusable records, each
//! identified by a stable slot id. Acquisition scans for the first record
//! with a zero reference count and retains it under a single lock hold;
//! release decrements and fully resets the record at zero. A dedicated
//! **last-ditch** record outside the slot array reports the facility's
//! own misuse (releasing an absent handle) so that signal is never itself
//! lost.
//!
//! Pool exhaustion is the one unrecoverable condition here: the pool is
//! sized generously, so running out means a handle leaked. Acquisition
//! past capacity logs through the sink and panics.
//!
//! [`MAX_POOL_RECORDS`]: crate::consts::MAX_POOL_RECORDS

mod handle;

pub use self::handle::ErrHandle;

use parking_lot::Mutex;
use parking_lot::MutexGuard;
use tracing::error;
use tracing::trace;
use tracing::warn;

use crate::consts;
use crate::hooks;
use crate::record::ErrorRecord;
use crate::record::Origin;
use crate::status::Status;

/// Sentinel slot id carried by the last-ditch record.
pub const LAST_DITCH_SLOT: usize = usize::MAX;

static POOL: Mutex<Pool> = Mutex::new(Pool::new());

/// Releases a possibly-absent handle.
///
/// A `Some` handle is released normally and the result is always `None`.
/// Releasing `None` is a documented misuse: it fails the last-ditch
/// record with [`Status::NULL_POINTER`] and returns a live handle to it,
/// so the "something went wrong" signal survives the mistake. Releasing
/// that handle resets the last-ditch record back to inert.
pub fn release(handle: Option<ErrHandle>) -> Option<ErrHandle> {
  let Some(handle) = handle else {
    return Some(last_ditch_release());
  };

  let _ = handle.release();

  None
}

/// Returns the number of records currently held by at least one handle.
///
/// The last-ditch record is not part of the pool and is not counted.
pub fn live_records() -> usize {
  let pool: MutexGuard<'_, Pool> = POOL.lock();

  pool.records.iter().filter(|record| record.refcount() > 0).count()
}

/// Pulls the first free record and retains it.
///
/// The scan and the increment happen under one lock hold, so acquisition
/// is atomic with first use.
pub(crate) fn acquire() -> ErrHandle {
  crate::init();

  let mut pool: MutexGuard<'_, Pool> = POOL.lock();

  let Some(slot) = pool.records.iter().position(|record| record.refcount() == 0) else {
    drop(pool);
    exhausted();
  };

  pool.records[slot].retain();
  trace!(target: "faultline", slot, "record acquired");

  ErrHandle::new(slot)
}

pub(crate) fn with_record<T, F>(slot: usize, f: F) -> T
where
  F: FnOnce(&mut ErrorRecord) -> T,
{
  let mut pool: MutexGuard<'_, Pool> = POOL.lock();

  f(pool.record_mut(slot))
}

/// Drops one claim on `slot`; returns whether the record is still live.
pub(crate) fn release_slot(slot: usize) -> bool {
  let mut pool: MutexGuard<'_, Pool> = POOL.lock();
  let remaining: u32 = pool.record_mut(slot).release();

  if remaining == 0 {
    trace!(target: "faultline", slot, "record released and reset");
  }

  remaining > 0
}

/// Fills the slot array. Called once from `init`.
pub(crate) fn init_slots() {
  let mut pool: MutexGuard<'_, Pool> = POOL.lock();

  if pool.records.is_empty() {
    for slot in 0..consts::MAX_POOL_RECORDS {
      pool.records.push(ErrorRecord::new(slot));
    }
  }
}

fn last_ditch_release() -> ErrHandle {
  let mut pool: MutexGuard<'_, Pool> = POOL.lock();
  let record: &mut ErrorRecord = &mut pool.last_ditch;

  record.retain();
  record.fail(
    Status::NULL_POINTER,
    Origin::new(file!(), "release", line!()),
    String::from("released an absent error handle"),
  );

  drop(pool);
  warn!(target: "faultline", "released an absent error handle");

  ErrHandle::new(LAST_DITCH_SLOT)
}

fn exhausted() -> ! {
  let line: String = format!(
    "unable to pull a free error record from the pool ({} live)",
    consts::MAX_POOL_RECORDS,
  );

  hooks::emit(&line);
  error!(target: "faultline", capacity = consts::MAX_POOL_RECORDS, "error pool exhausted");

  panic!(
    "error pool exhausted: all {} records are live (leaked handle?)",
    consts::MAX_POOL_RECORDS,
  );
}

// -----------------------------------------------------------------------------
// Pool
// -----------------------------------------------------------------------------

struct Pool {
  records: Vec<ErrorRecord>,
  last_ditch: ErrorRecord,
}

impl Pool {
  #[inline]
  const fn new() -> Self {
    Self {
      records: Vec::new(),
      last_ditch: ErrorRecord::new(LAST_DITCH_SLOT),
    }
  }

  #[inline]
  fn record_mut(&mut self, slot: usize) -> &mut ErrorRecord {
    if slot == LAST_DITCH_SLOT {
      &mut self.last_ditch
    } else {
      &mut self.records[slot]
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
