/// Single-pass CSV scanner.
///
/// Commas separate fields, double quotes open and close quoted regions, a
/// doubled double-quote yields a literal quote character, and `\n`/`\r`
/// outside quotes end the row. Malformed quoting never fails: an unterminated
/// quote simply swallows the rest of the input into the current field.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = CellBuf::default();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => {
                if in_quotes {
                    cell.close_quote();
                } else {
                    cell.open_quote();
                }
                in_quotes = !in_quotes;
            }
            ',' if !in_quotes => row.push(cell.take()),
            '\n' | '\r' if !in_quotes => {
                // A \r\n pair collapses to one break: the second control
                // character arrives with an empty cell and row.
                if !cell.is_empty() || !row.is_empty() {
                    row.push(cell.take());
                    rows.push(std::mem::take(&mut row));
                }
            }
            _ => cell.push(c),
        }
    }

    if !cell.is_empty() || !row.is_empty() {
        row.push(cell.take());
        rows.push(row);
    }

    rows
}

/// Accumulator for one cell. Tracks where quoted content starts and ends so
/// that trimming only touches whitespace outside the quoted region.
#[derive(Default)]
struct CellBuf {
    buf: String,
    had_quotes: bool,
    quoted_end: Option<usize>,
}

impl CellBuf {
    fn push(&mut self, c: char) {
        self.buf.push(c);
    }

    fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn open_quote(&mut self) {
        // Whitespace before the opening quote is not part of the field
        if self.buf.chars().all(char::is_whitespace) {
            self.buf.clear();
        }
        self.had_quotes = true;
        self.quoted_end = None;
    }

    fn close_quote(&mut self) {
        self.quoted_end = Some(self.buf.len());
    }

    fn take(&mut self) -> String {
        let had_quotes = self.had_quotes;
        let quoted_end = self.quoted_end.take();
        self.had_quotes = false;
        let mut value = std::mem::take(&mut self.buf);

        if !had_quotes {
            return value.trim().to_string();
        }

        // Quoted content stays verbatim; only strip whatever trailed the
        // closing quote. An unterminated quote leaves everything quoted.
        if let Some(end) = quoted_end {
            while value.len() > end && value.ends_with(char::is_whitespace) {
                value.pop();
            }
        }
        value
    }
}
