//! The propagation state machine facade.
//!
//! A [`Scope`] is one call frame's participation in error propagation.
//! Per record the machine has four states: **Idle** (status 0, freshly
//! acquired), **Pending** (failed, not yet handled), **Handled** (a
//! dispatch branch matched), and **Released** (refcount decayed to zero,
//! record reset).
//!
//! A frame follows the same shape the facade macros spell out:
//!
//! 1. [`Scope::enter`] begins the frame.
//! 2. An [`attempt`] block runs statements; [`fail_break!`] and
//!    [`catch!`] short-circuit it on failure.
//! 3. An optional [`cleanup`] block always runs.
//! 4. [`dispatch`] matches the record's status against handler branches.
//! 5. [`finish!`] propagates an unhandled record to the caller, or
//!    [`finish_terminal!`] (at the top of the chain) logs it and invokes
//!    the unhandled-error hook.
//!
//! [`attempt`]: Scope::attempt
//! [`cleanup`]: Scope::cleanup
//! [`dispatch`]: Scope::dispatch
//! [`fail_break!`]: crate::fail_break!
//! [`catch!`]: crate::catch!
//! [`finish!`]: crate::finish!
//! [`finish_terminal!`]: crate::finish_terminal!

mod dispatch;
mod flow;
mod macros;

pub use self::dispatch::Dispatch;
pub use self::flow::Flow;

use tracing::debug;
use tracing::error;
use tracing::trace;
use tracing::warn;

use crate::hooks;
use crate::pool;
use crate::pool::ErrHandle;
use crate::record::ErrorRecord;
use crate::record::Origin;
use crate::status::Status;

/// One call frame's view of the propagation protocol.
///
/// A scope owns at most one error handle. Dropping a scope releases its
/// handle through the normal path, so early returns cannot leak a
/// record, but well-behaved frames end with [`finish!`] or
/// [`finish_terminal!`].
///
/// [`finish!`]: crate::finish!
/// [`finish_terminal!`]: crate::finish_terminal!
pub struct Scope {
  function: &'static str,
  err: Option<ErrHandle>,
  broke: bool,
  traced: bool,
}

impl Scope {
  /// Begins a frame labeled `function`.
  ///
  /// Runs the process-wide [`init`] (idempotent) so the pool and name
  /// registry are always ready before first use.
  ///
  /// [`init`]: crate::init
  pub fn enter(function: &'static str) -> Self {
    crate::init();
    trace!(target: "faultline", function, "scope entered");

    Self {
      function,
      err: None,
      broke: false,
      traced: false,
    }
  }

  /// Returns the frame's function label.
  #[inline]
  pub const fn function(&self) -> &'static str {
    self.function
  }

  /// Returns the scope's current handle, if any.
  #[inline]
  pub fn current(&self) -> Option<&ErrHandle> {
    self.err.as_ref()
  }

  /// Returns the current record's status, or [`Status::OK`] if the
  /// scope holds no record.
  pub fn status(&self) -> Status {
    match &self.err {
      Some(handle) => handle.status(),
      None => Status::OK,
    }
  }

  /// Records a failure into the scope's record, acquiring one from the
  /// pool first if the scope holds none.
  ///
  /// Usually invoked through [`fail!`], which supplies the call site.
  ///
  /// [`fail!`]: crate::fail!
  pub fn fail_at(&mut self, status: Status, file: &'static str, line: u32, message: String) {
    self.ensure_ready();

    let origin: Origin = Origin::new(file, self.function, line);

    if let Some(handle) = &self.err {
      pool::with_record(handle.slot(), |record| record.fail(status, origin, message));

      debug!(
        target: "faultline",
        slot = handle.slot(),
        code = status.code(),
        "scope recorded a failure",
      );
    }

    self.traced = true;
  }

  /// Explicitly marks the frame's outcome as success, clearing the
  /// record's status (and acquiring a record first if none is held).
  pub fn succeed(&mut self) {
    self.ensure_ready();

    if let Some(handle) = &self.err {
      pool::with_record(handle.slot(), |record| record.succeed());
    }
  }

  /// Detects a sub-operation's outcome.
  ///
  /// A `None` result is a healthy sub-call. A `Some` handle is adopted
  /// (ownership of its refcount claim transfers to this scope) and a
  /// detection entry is appended to its trace; a non-zero status then
  /// short-circuits the attempt block.
  ///
  /// Usually invoked through [`catch!`], which supplies the call site.
  ///
  /// [`catch!`]: crate::catch!
  pub fn catch_at(&mut self, sub: Option<ErrHandle>, file: &'static str, line: u32) -> Flow {
    let Some(handle) = sub else {
      return Flow::Continue;
    };

    let at: Origin = Origin::new(file, self.function, line);

    let status: Status = pool::with_record(handle.slot(), |record| {
      let note: String = format!(
        "detected error in slot {} (refcount {})",
        record.slot(),
        record.refcount(),
      );

      record.trace_push(at, note);
      record.status()
    });

    if let Some(previous) = self.err.replace(handle) {
      warn!(
        target: "faultline",
        slot = previous.slot(),
        "scope replaced a live handle; releasing the old one",
      );
    }

    self.traced = true;

    if status.is_ok() {
      Flow::Continue
    } else {
      trace!(target: "faultline", code = status.code(), "attempt short-circuited");
      self.broke = true;

      Flow::Break
    }
  }

  /// Runs the attempt phase.
  ///
  /// `body` is skipped entirely when an earlier attempt on this scope
  /// already short-circuited. A [`Flow::Break`] return (usually produced
  /// by [`fail_break!`] or [`catch!`]) skips any later attempt phase.
  ///
  /// [`fail_break!`]: crate::fail_break!
  /// [`catch!`]: crate::catch!
  pub fn attempt<F>(&mut self, body: F) -> &mut Self
  where
    F: FnOnce(&mut Scope) -> Flow,
  {
    if !self.broke && body(self).is_break() {
      self.broke = true;
    }

    self
  }

  /// Runs the cleanup phase. Cleanup always runs, whether or not the
  /// attempt phase short-circuited.
  pub fn cleanup<F>(&mut self, f: F) -> &mut Self
  where
    F: FnOnce(),
  {
    f();
    self
  }

  /// Begins handler dispatch over the record's status.
  ///
  /// A record with status [`Status::OK`] (healthy completion) is marked
  /// handled here unconditionally, whether or not any branches follow.
  pub fn dispatch(&mut self) -> Dispatch<'_> {
    Dispatch::new(self)
  }

  /// Propagating finish.
  ///
  /// An unhandled record is returned to the caller without releasing it;
  /// a frame that neither failed nor detected appends the escalation
  /// trace entry first. A handled or absent record is released and the
  /// caller receives `None`.
  ///
  /// Usually invoked through [`finish!`], which supplies the call site.
  ///
  /// [`finish!`]: crate::finish!
  pub fn finish_at(self, file: &'static str, line: u32) -> Option<ErrHandle> {
    let Scope {
      function,
      err,
      traced,
      ..
    } = self;

    let handle: ErrHandle = err?;

    let (handled, status) = pool::with_record(handle.slot(), |record| {
      (record.handled(), record.status())
    });

    if !handled {
      if !traced {
        let at: Origin = Origin::new(file, function, line);

        pool::with_record(handle.slot(), |record| {
          record.trace_push(at, String::from("escalated without local handling"));
        });
      }

      debug!(
        target: "faultline",
        slot = handle.slot(),
        code = status.code(),
        "error escalated to caller",
      );

      return Some(handle);
    }

    let _ = handle.release();

    None
  }

  /// Terminal finish, for the top of a propagation chain.
  ///
  /// An unhandled record is logged through the sink (full trace plus
  /// message, tagged `Unhandled Error`) and the unhandled-error hook is
  /// invoked exactly once; the default hook terminates the process with
  /// the record's status as exit code. The record is released afterward
  /// whether or not the hook returns.
  ///
  /// Usually invoked through [`finish_terminal!`].
  ///
  /// [`finish_terminal!`]: crate::finish_terminal!
  pub fn finish_terminal_at(self, file: &'static str, line: u32) {
    let Scope { function, err, .. } = self;

    let Some(handle) = err else {
      return;
    };

    let snapshot: ErrorRecord = handle.snapshot();

    if !snapshot.handled() {
      let at: Origin = Origin::new(file, function, line);

      hooks::emit(&snapshot.describe(at, "Unhandled Error"));
      error!(
        target: "faultline",
        slot = snapshot.slot(),
        code = snapshot.status().code(),
        "unhandled error reached terminal finish",
      );

      hooks::unhandled(Some(&snapshot));
    }

    let _ = handle.release();
  }

  /// Logs a sub-operation's result as intentionally ignored, without
  /// inspecting its status, and hands it back for release through the
  /// normal path (usually by letting it drop).
  ///
  /// Usually invoked through [`ignore!`].
  ///
  /// [`ignore!`]: crate::ignore!
  pub fn ignore_at(
    &mut self,
    sub: Option<ErrHandle>,
    file: &'static str,
    line: u32,
  ) -> Option<ErrHandle> {
    if let Some(handle) = &sub {
      let snapshot: ErrorRecord = handle.snapshot();
      let at: Origin = Origin::new(file, self.function, line);

      hooks::emit(&snapshot.describe(at, "** IGNORED ERROR **"));
      warn!(target: "faultline", slot = handle.slot(), "error intentionally ignored");
    }

    sub
  }

  /// Surrenders the raw handle without a finish step (the direct-return
  /// failure path).
  #[inline]
  pub fn into_handle(self) -> Option<ErrHandle> {
    self.err
  }

  /// Releases any held record and reports success to the caller (the
  /// direct-return success path).
  pub fn settle(self) -> Option<ErrHandle> {
    if let Some(handle) = self.err {
      let _ = handle.release();
    }

    None
  }

  fn ensure_ready(&mut self) {
    if self.err.is_none() {
      self.err = Some(pool::acquire());
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::scope::Flow;
  use crate::scope::Scope;
  use crate::status::Status;

  #[test]
  fn test_fail_then_finish_propagates() {
    let mut scope: Scope = Scope::enter("leaf");

    scope.attempt(|s| {
      s.fail_at(Status::NULL_POINTER, file!(), line!(), String::from("x failed"));

      Flow::Break
    });
    scope.dispatch();

    let handle = scope.finish_at(file!(), line!()).expect("unhandled error propagates");

    assert_eq!(handle.status(), Status::NULL_POINTER);
    assert!(!handle.release());
  }

  #[test]
  fn test_handled_record_is_released() {
    let mut scope: Scope = Scope::enter("leaf");
    let mut seen: bool = false;

    scope.attempt(|s| {
      s.fail_at(Status::KEY, file!(), line!(), String::from("missing"));

      Flow::Break
    });
    scope.dispatch().handle(Status::KEY, |record| {
      seen = true;
      assert_eq!(record.message(), "missing");
    });

    assert!(scope.finish_at(file!(), line!()).is_none());
    assert!(seen);
  }

  #[test]
  fn test_dispatch_first_match_wins() {
    let mut scope: Scope = Scope::enter("frame");
    let mut first: bool = false;
    let mut second: bool = false;

    scope.attempt(|s| {
      s.fail_at(Status::VALUE, file!(), line!(), String::from("bad"));

      Flow::Break
    });
    scope
      .dispatch()
      .handle(Status::VALUE, |_| first = true)
      .handle(Status::VALUE, |_| second = true);

    assert!(first);
    assert!(!second);
    assert!(scope.finish_at(file!(), line!()).is_none());
  }

  #[test]
  fn test_dispatch_default_branch() {
    let mut scope: Scope = Scope::enter("frame");
    let mut specific: bool = false;
    let mut fallback: bool = false;

    scope.attempt(|s| {
      s.fail_at(Status::FORMAT, file!(), line!(), String::from("bad format"));

      Flow::Break
    });
    scope
      .dispatch()
      .handle(Status::KEY, |_| specific = true)
      .handle_default(|record| {
        fallback = true;
        assert_eq!(record.status(), Status::FORMAT);
      });

    assert!(!specific);
    assert!(fallback);
    assert!(scope.finish_at(file!(), line!()).is_none());
  }

  #[test]
  fn test_dispatch_handle_any() {
    let mut scope: Scope = Scope::enter("frame");
    let mut grouped: bool = false;

    scope.attempt(|s| {
      s.fail_at(Status::INDEX, file!(), line!(), String::from("oob"));

      Flow::Break
    });
    scope
      .dispatch()
      .handle_any(&[Status::OUT_OF_BOUNDS, Status::INDEX], |_| grouped = true);

    assert!(grouped);
    assert!(scope.finish_at(file!(), line!()).is_none());
  }

  #[test]
  fn test_status_ok_is_always_handled() {
    let mut scope: Scope = Scope::enter("frame");

    scope.succeed();
    scope.dispatch();

    assert!(scope.finish_at(file!(), line!()).is_none());
  }

  #[test]
  fn test_no_match_leaves_record_pending() {
    let mut scope: Scope = Scope::enter("frame");
    let mut ran: bool = false;

    scope.attempt(|s| {
      s.fail_at(Status::IO, file!(), line!(), String::from("io down"));

      Flow::Break
    });
    scope.dispatch().handle(Status::KEY, |_| ran = true);

    let handle = scope.finish_at(file!(), line!()).expect("record still pending");

    assert!(!ran);
    assert!(!handle.snapshot().handled());
    assert!(!handle.release());
  }

  #[test]
  fn test_attempt_skipped_after_break() {
    let mut scope: Scope = Scope::enter("frame");
    let mut reached: bool = false;

    scope
      .attempt(|s| {
        s.fail_at(Status::TYPE, file!(), line!(), String::from("wrong type"));

        Flow::Break
      })
      .attempt(|_| {
        reached = true;

        Flow::Continue
      });

    assert!(!reached);
    assert!(scope.into_handle().is_some());
  }

  #[test]
  fn test_settle_releases() {
    let mut scope: Scope = Scope::enter("frame");

    scope.fail_at(Status::HEAP, file!(), line!(), String::from("oom"));

    let extra = scope.current().expect("record held").retain();

    assert!(scope.settle().is_none());
    assert_eq!(extra.snapshot().refcount(), 1);
    assert!(!extra.release());
  }
}
