use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// The source location that produced a failure or trace entry.
///
/// Captured by the facade macros via `file!()` / `line!()` plus the
/// enclosing scope's function label.
///
/// # Display Format
///
/// Origins format as: `{file}:{function}:{line}`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Origin {
  file: &'static str,
  function: &'static str,
  line: u32,
}

impl Origin {
  /// Creates a new `Origin`.
  #[inline]
  pub const fn new(file: &'static str, function: &'static str, line: u32) -> Self {
    Self {
      file,
      function,
      line,
    }
  }

  /// Returns the source file path.
  #[inline]
  pub const fn file(&self) -> &'static str {
    self.file
  }

  /// Returns the function label.
  #[inline]
  pub const fn function(&self) -> &'static str {
    self.function
  }

  /// Returns the source line number.
  #[inline]
  pub const fn line(&self) -> u32 {
    self.line
  }
}

impl Display for Origin {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "{}:{}:{}", self.file, self.function, self.line)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::record::Origin;

  #[test]
  fn test_display() {
    let origin: Origin = Origin::new("src/demo.rs", "run", 17);

    assert_eq!(format!("{origin}"), "src/demo.rs:run:17");
  }
}
