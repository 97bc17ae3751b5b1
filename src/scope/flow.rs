/// Outcome of one statement inside an attempt block.
///
/// [`Break`] short-circuits the rest of the attempt phase; statements
/// after the break are skipped, but the cleanup phase still runs.
///
/// [`Break`]: Flow::Break
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
  /// Continue with the next statement in the attempt phase.
  Continue,
  /// Short-circuit out of the attempt phase.
  Break,
}

impl Flow {
  /// Returns `true` for [`Flow::Break`].
  #[inline]
  pub const fn is_break(self) -> bool {
    matches!(self, Self::Break)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
