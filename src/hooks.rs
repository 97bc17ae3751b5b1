//! Pluggable logging sink and unhandled-error hook.
//!
//! The sink receives fully-rendered lines (accumulated trace, origin,
//! message, status code and name); the default writes to stderr. The
//! unhandled hook fires exactly once per error that reaches terminal
//! finish unhandled; the default terminates the process with the
//! record's status as exit code.

use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockWriteGuard;
use std::process;

use crate::consts;
use crate::record::ErrorRecord;

/// A formatted-line writer.
pub type LogSink = Box<dyn Fn(&str) + Send + Sync>;

/// A callback for errors that escape every handler.
pub type UnhandledHook = Box<dyn Fn(Option<&ErrorRecord>) + Send + Sync>;

static HOOKS: RwLock<Hooks> = RwLock::new(Hooks::new());

/// Replaces the logging sink.
pub fn set_log_sink<F>(sink: F)
where
  F: Fn(&str) + Send + Sync + 'static,
{
  let mut guard: RwLockWriteGuard<'_, Hooks> = HOOKS.write();

  guard.sink = Some(Box::new(sink));
}

/// Replaces the unhandled-error hook.
pub fn set_unhandled_hook<F>(hook: F)
where
  F: Fn(Option<&ErrorRecord>) + Send + Sync + 'static,
{
  let mut guard: RwLockWriteGuard<'_, Hooks> = HOOKS.write();

  guard.unhandled = Some(Box::new(hook));
}

/// Default unhandled-error behavior: terminate the process with the
/// record's status as exit code, or [`E_CODE_NO_RECORD`] without one.
///
/// [`E_CODE_NO_RECORD`]: crate::consts::E_CODE_NO_RECORD
pub fn default_unhandled(record: Option<&ErrorRecord>) -> ! {
  match record {
    Some(record) => process::exit(record.status().code()),
    None => process::exit(consts::E_CODE_NO_RECORD),
  }
}

/// Writes one rendered line through the sink (stderr by default).
pub(crate) fn emit(line: &str) {
  let guard: RwLockReadGuard<'_, Hooks> = HOOKS.read();

  match &guard.sink {
    Some(sink) => sink(line),
    None => eprintln!("{line}"),
  }
}

/// Invokes the unhandled-error hook.
pub(crate) fn unhandled(record: Option<&ErrorRecord>) {
  let guard: RwLockReadGuard<'_, Hooks> = HOOKS.read();

  match &guard.unhandled {
    Some(hook) => hook(record),
    None => {
      drop(guard);
      default_unhandled(record);
    }
  }
}

// -----------------------------------------------------------------------------
// Hooks
// -----------------------------------------------------------------------------

struct Hooks {
  sink: Option<LogSink>,
  unhandled: Option<UnhandledHook>,
}

impl Hooks {
  #[inline]
  const fn new() -> Self {
    Self {
      sink: None,
      unhandled: None,
    }
  }
}
