use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use tracing::debug;

use crate::names;
use crate::pool;

static INIT: AtomicBool = AtomicBool::new(false);

/// Process-wide one-time initialization.
///
/// Fills the record pool and seeds the built-in status names. Idempotent:
/// every call after the first is a no-op. [`Scope::enter`] runs this
/// implicitly, so explicit calls are only needed when touching the name
/// registry or pool diagnostics before any scope exists.
///
/// [`Scope::enter`]: crate::Scope::enter
pub fn init() {
  if INIT.swap(true, Ordering::SeqCst) {
    return;
  }

  pool::init_slots();
  names::seed_builtin_names();

  debug!(target: "faultline", "error facility initialized");
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
