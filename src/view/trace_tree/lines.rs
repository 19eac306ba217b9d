/// Split trace text into display lines.
///
/// Splits on `\n` (tolerating a preceding `\r`) and skips empty lines, so an
/// empty string or one made only of separators yields nothing.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
}

/// True if `text` would produce at least one display line
pub fn has_lines(text: &str) -> bool {
    split_lines(text).next().is_some()
}
