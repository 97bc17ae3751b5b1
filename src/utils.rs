//! Small shared helpers.

/// Truncates `text` to at most `max` bytes on a character boundary.
#[inline]
pub(crate) fn truncate_in_place(text: &mut String, max: usize) {
  if text.len() <= max {
    return;
  }

  let mut cut: usize = max;

  while !text.is_char_boundary(cut) {
    cut -= 1;
  }

  text.truncate(cut);
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::utils::truncate_in_place;

  #[test]
  fn test_short_input_untouched() {
    let mut text: String = String::from("short");
    truncate_in_place(&mut text, 16);
    assert_eq!(text, "short");
  }

  #[test]
  fn test_truncates_on_char_boundary() {
    let mut text: String = String::from("ab\u{00e9}cd");
    truncate_in_place(&mut text, 3);
    assert_eq!(text, "ab");
  }
}
