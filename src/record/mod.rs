//! The reusable error record and its parts.
//!
//! An [`ErrorRecord`] describes one in-flight or resolved failure: status
//! code, bounded message, source [`Origin`], an accumulating [`Trace`], a
//! handled flag, and the reference count that governs its pool slot.

mod origin;
mod trace;

pub use self::origin::Origin;
pub use self::trace::Trace;
pub use self::trace::TraceEntry;

use crate::consts;
use crate::names;
use crate::status::Status;
use crate::utils::truncate_in_place;

/// One reusable error-context record.
///
/// Records live in the pool and are addressable through a handle only
/// while their reference count is positive. When the count decays to
/// zero the record is fully reset (everything except its slot id) and
/// the slot becomes available for reuse.
///
/// Cloning produces a detached snapshot; snapshots are what dispatch
/// handlers and the unhandled-error hook receive, so no caller code ever
/// runs while the pool is locked.
#[derive(Clone, Debug)]
pub struct ErrorRecord {
  slot: usize,
  status: Status,
  message: String,
  origin: Option<Origin>,
  trace: Trace,
  handled: bool,
  refcount: u32,
}

impl ErrorRecord {
  #[inline]
  pub(crate) const fn new(slot: usize) -> Self {
    Self {
      slot,
      status: Status::OK,
      message: String::new(),
      origin: None,
      trace: Trace::new(),
      handled: false,
      refcount: 0,
    }
  }

  /// Returns the record's stable pool slot id.
  #[inline]
  pub const fn slot(&self) -> usize {
    self.slot
  }

  /// Returns the current status code.
  #[inline]
  pub const fn status(&self) -> Status {
    self.status
  }

  /// Returns the failure message.
  #[inline]
  pub fn message(&self) -> &str {
    self.message.as_str()
  }

  /// Returns the site that set the current status, if any.
  #[inline]
  pub const fn origin(&self) -> Option<Origin> {
    self.origin
  }

  /// Returns the accumulated propagation trace.
  #[inline]
  pub const fn trace(&self) -> &Trace {
    &self.trace
  }

  /// Returns `true` once an ancestor's dispatch has matched this record.
  #[inline]
  pub const fn handled(&self) -> bool {
    self.handled
  }

  /// Returns the number of live holders of this record.
  #[inline]
  pub const fn refcount(&self) -> u32 {
    self.refcount
  }

  /// Records a failure: status, origin, bounded message, one trace entry.
  ///
  /// Overwrites any prior status; a record represents the current
  /// failure, not a queue of failures.
  pub(crate) fn fail(&mut self, status: Status, origin: Origin, message: String) {
    let mut message: String = message;
    truncate_in_place(&mut message, consts::MAX_MESSAGE_LEN);

    self.status = status;
    self.origin = Some(origin);
    self.message = message;

    let note: String = format!(
      "{} ({}): {}",
      status.code(),
      names::name_for(status),
      self.message,
    );

    self.trace.push(origin, note);
  }

  /// Clears the status back to [`Status::OK`].
  #[inline]
  pub(crate) fn succeed(&mut self) {
    self.status = Status::OK;
  }

  /// Marks the record handled without disturbing the trace segment.
  ///
  /// Used by the no-error dispatch branch.
  #[inline]
  pub(crate) fn mark_handled(&mut self) {
    self.handled = true;
  }

  /// Marks the record handled and restarts the trace segment.
  ///
  /// Used when a matched dispatch branch is entered.
  #[inline]
  pub(crate) fn enter_handler(&mut self) {
    self.handled = true;
    self.trace.restart();
  }

  #[inline]
  pub(crate) fn retain(&mut self) {
    self.refcount += 1;
  }

  /// Drops one holder; resets the record when the count reaches zero.
  ///
  /// Returns the remaining count. The count never goes negative.
  pub(crate) fn release(&mut self) -> u32 {
    if self.refcount > 0 {
      self.refcount -= 1;
    }

    if self.refcount == 0 {
      self.reset();
    }

    self.refcount
  }

  #[inline]
  pub(crate) fn trace_push(&mut self, origin: Origin, note: String) {
    self.trace.push(origin, note);
  }

  /// Renders the full log line: accumulated trace, then the `at`
  /// location, an optional tag, and `code (Name): message`.
  pub fn describe(&self, at: Origin, tag: &str) -> String {
    let trace: String = self.trace.render();
    let name: String = names::name_for(self.status);

    if tag.is_empty() {
      format!("{}{}: {} ({}): {}", trace, at, self.status.code(), name, self.message)
    } else {
      format!(
        "{}{}: {} {} ({}): {}",
        trace,
        at,
        tag,
        self.status.code(),
        name,
        self.message,
      )
    }
  }

  fn reset(&mut self) {
    self.status = Status::OK;
    self.message.clear();
    self.origin = None;
    self.trace.restart();
    self.handled = false;
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
