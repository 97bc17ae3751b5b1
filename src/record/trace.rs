use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use tracing::trace;

use crate::consts;
use crate::record::Origin;

// -----------------------------------------------------------------------------
// Trace Entry
// -----------------------------------------------------------------------------

/// One entry in a record's propagation trace.
///
/// Written when the error passes a propagation boundary: the failing
/// frame's `fail`, an ancestor's detection, or an escalation point.
#[derive(Clone, Debug)]
pub struct TraceEntry {
  origin: Origin,
  note: String,
}

impl TraceEntry {
  /// Returns the boundary's source location.
  #[inline]
  pub const fn origin(&self) -> Origin {
    self.origin
  }

  /// Returns the entry's description.
  #[inline]
  pub fn note(&self) -> &str {
    self.note.as_str()
  }
}

impl Display for TraceEntry {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "{}: {}", self.origin, self.note)
  }
}

// -----------------------------------------------------------------------------
// Trace
// -----------------------------------------------------------------------------

/// Bounded, append-only log of propagation boundary entries.
///
/// Pushes past [`MAX_TRACE_ENTRIES`] are silently dropped: overflow is a
/// non-fatal loss of trailing detail, and already-written entries are
/// preserved. Entering a dispatch handler restarts the log so
/// handler-phase writes form a fresh segment.
///
/// [`MAX_TRACE_ENTRIES`]: crate::consts::MAX_TRACE_ENTRIES
#[derive(Clone, Debug)]
pub struct Trace {
  entries: Vec<TraceEntry>,
}

impl Trace {
  #[inline]
  pub(crate) const fn new() -> Self {
    Self {
      entries: Vec::new(),
    }
  }

  pub(crate) fn push(&mut self, origin: Origin, note: String) {
    if self.entries.len() >= consts::MAX_TRACE_ENTRIES {
      trace!(target: "faultline", "trace entry dropped (segment full)");
      return;
    }

    self.entries.push(TraceEntry { origin, note });
  }

  /// Begins a fresh trace segment.
  #[inline]
  pub(crate) fn restart(&mut self) {
    self.entries.clear();
  }

  /// Returns the recorded entries, oldest first.
  #[inline]
  pub fn entries(&self) -> &[TraceEntry] {
    self.entries.as_slice()
  }

  /// Returns the number of recorded entries.
  #[inline]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` if no entries have been recorded.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Renders all entries, one line per entry.
  pub fn render(&self) -> String {
    let mut text: String = String::new();

    for entry in &self.entries {
      text.push_str(&entry.to_string());
      text.push('\n');
    }

    text
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
