use tracing::debug;

use crate::pool;
use crate::record::ErrorRecord;
use crate::scope::Scope;
use crate::status::Status;

/// Handler dispatch for a scope's current record.
///
/// Created by [`Scope::dispatch`], which already ran the no-error branch:
/// a record with status [`Status::OK`] is marked handled unconditionally,
/// whether or not any branches are chained.
///
/// Branch matching is first-match-wins over declaration order, by exact
/// status equality; at most one branch runs per dispatch. Entering a
/// branch restarts the record's trace segment and marks it handled, then
/// invokes the handler with a detached snapshot taken before the restart.
pub struct Dispatch<'a> {
  scope: &'a mut Scope,
  matched: bool,
}

impl<'a> Dispatch<'a> {
  pub(crate) fn new(scope: &'a mut Scope) -> Self {
    if let Some(handle) = scope.current() {
      pool::with_record(handle.slot(), |record| {
        if record.status().is_ok() {
          record.mark_handled();
        }
      });
    }

    Self {
      scope,
      matched: false,
    }
  }

  /// Runs `handler` if the record's status equals `status`.
  pub fn handle<F>(self, status: Status, handler: F) -> Self
  where
    F: FnOnce(&ErrorRecord),
  {
    self.branch(&[status], handler)
  }

  /// Runs `handler` if the record's status equals any of `statuses`.
  pub fn handle_any<F>(self, statuses: &[Status], handler: F) -> Self
  where
    F: FnOnce(&ErrorRecord),
  {
    self.branch(statuses, handler)
  }

  /// Runs `handler` for any non-zero status no earlier branch matched.
  pub fn handle_default<F>(mut self, handler: F) -> Self
  where
    F: FnOnce(&ErrorRecord),
  {
    if self.matched {
      return self;
    }

    let Some(handle) = self.scope.current() else {
      return self;
    };

    let snapshot: Option<ErrorRecord> = pool::with_record(handle.slot(), |record| {
      if record.status().is_ok() {
        return None;
      }

      let snapshot: ErrorRecord = record.clone();
      record.enter_handler();

      Some(snapshot)
    });

    if let Some(record) = snapshot {
      debug!(
        target: "faultline",
        slot = record.slot(),
        code = record.status().code(),
        "default dispatch branch entered",
      );

      handler(&record);
      self.matched = true;
    }

    self
  }

  fn branch<F>(mut self, statuses: &[Status], handler: F) -> Self
  where
    F: FnOnce(&ErrorRecord),
  {
    if self.matched {
      return self;
    }

    let Some(handle) = self.scope.current() else {
      return self;
    };

    let snapshot: Option<ErrorRecord> = pool::with_record(handle.slot(), |record| {
      let status: Status = record.status();

      if status.is_ok() || !statuses.contains(&status) {
        return None;
      }

      let snapshot: ErrorRecord = record.clone();
      record.enter_handler();

      Some(snapshot)
    });

    if let Some(record) = snapshot {
      debug!(
        target: "faultline",
        slot = record.slot(),
        code = record.status().code(),
        "dispatch branch matched",
      );

      handler(&record);
      self.matched = true;
    }

    self
  }
}
