use text_size::TextSize;

use crate::classes::is_newline;

/// A resolved source position. `line` and `column` are 1-based, `column`
/// counts bytes from the start of the line.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Location {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

/// Start offsets of every line, resolved against a caller supplied bias.
#[derive(Debug)]
pub struct LineTable {
    starts: Vec<TextSize>,
    first_line: u32,
    first_column: u32,
}

impl LineTable {
    /// Builds the table for `text`, skipping everything before `origin` (a
    /// byte order mark). Positions on the first line are biased by
    /// `first_column`, every line number by `first_line`.
    pub fn new(text: &str, origin: usize, first_line: u32, first_column: u32) -> Self {
        let bytes = text.as_bytes();
        let mut starts = vec![TextSize::new(origin as u32)];

        let mut i = origin;
        while i < bytes.len() {
            let byte = bytes[i];
            if is_newline(byte) {
                if byte == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                starts.push(TextSize::new(i as u32 + 1));
            }
            i += 1;
        }

        Self { starts, first_line, first_column }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    pub fn location(&self, offset: TextSize) -> Location {
        let index = self.starts.partition_point(|&start| start <= offset).saturating_sub(1);
        let start = u32::from(self.starts[index]);
        let offset = u32::from(offset);

        let column = if index == 0 {
            offset.saturating_sub(start) + self.first_column
        } else {
            offset - start + 1
        };

        Location { offset, line: self.first_line + index as u32, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(table: &LineTable, offset: u32) -> (u32, u32) {
        let location = table.location(offset.into());
        (location.line, location.column)
    }

    #[test]
    fn every_newline_flavour() {
        let text = "a\nb\r\nc\rd\u{c}e";
        let table = LineTable::new(text, 0, 1, 1);

        assert_eq!(table.line_count(), 5);
        assert_eq!(loc(&table, 0), (1, 1));
        assert_eq!(loc(&table, 2), (2, 1));
        assert_eq!(loc(&table, 3), (2, 2));
        assert_eq!(loc(&table, 5), (3, 1));
        assert_eq!(loc(&table, 7), (4, 1));
        assert_eq!(loc(&table, 9), (5, 1));
    }

    #[test]
    fn bias_only_moves_first_line_columns() {
        let text = ".a{\n  b:c}";
        let table = LineTable::new(text, 0, 3, 5);

        assert_eq!(loc(&table, 0), (3, 5));
        assert_eq!(loc(&table, 2), (3, 7));
        assert_eq!(loc(&table, 6), (4, 3));
    }

    #[test]
    fn byte_order_mark_is_not_counted() {
        let text = "\u{feff}a{}";
        let table = LineTable::new(text, 3, 1, 1);

        assert_eq!(loc(&table, 3), (1, 1));
        assert_eq!(loc(&table, 4), (1, 2));
    }

    #[test]
    fn end_of_input_is_addressable() {
        let text = "a\n";
        let table = LineTable::new(text, 0, 1, 1);

        assert_eq!(loc(&table, 2), (2, 1));
    }
}
