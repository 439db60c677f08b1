/// A read position over the source lines.
///
/// All read state lives here, so concurrent loads of different charts never
/// interfere with each other.
pub struct Cursor<'a> {
    /// All source lines, materialized upfront so later phases can address them by index.
    lines: Vec<&'a str>,
    /// The next line to read, starts at 0.
    index: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the first line of `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().collect(),
            index: 0,
        }
    }

    /// Whether all lines have been read.
    pub fn is_end(&self) -> bool {
        self.index >= self.lines.len()
    }

    /// The 1-based line number of the next line to read, for error reports.
    pub const fn line_number(&self) -> usize {
        self.index + 1
    }

    /// Returns the next line without moving the cursor.
    pub fn peek_line(&self) -> Option<&'a str> {
        self.lines.get(self.index).copied()
    }

    /// Moves the cursor through and returns the next line, trimmed.
    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.index).copied()?;
        self.index += 1;
        Some(line.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;

    #[test]
    fn walks_lines_in_order() {
        let mut cursor = Cursor::new("#TITLE Song\n#BODY\n0 0 1 1 0 30 10\n");
        assert_eq!(cursor.line_number(), 1);
        assert_eq!(cursor.next_line(), Some("#TITLE Song"));
        assert_eq!(cursor.next_line(), Some("#BODY"));
        assert_eq!(cursor.line_number(), 3);
        assert_eq!(cursor.next_line(), Some("0 0 1 1 0 30 10"));
        assert!(cursor.is_end());
        assert_eq!(cursor.next_line(), None);
    }

    #[test]
    fn handles_crlf_and_trailing_whitespace() {
        let mut cursor = Cursor::new("#BODY\r\n0 0 2 120.00 \r\n");
        assert_eq!(cursor.next_line(), Some("#BODY"));
        assert_eq!(cursor.next_line(), Some("0 0 2 120.00"));
        assert!(cursor.is_end());
    }

    #[test]
    fn empty_source() {
        let mut cursor = Cursor::new("");
        assert!(cursor.is_end());
        assert_eq!(cursor.next_line(), None);
    }
}
