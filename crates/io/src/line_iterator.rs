use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

use streaming_iterator::StreamingIterator;

/// A lending iterator over the lines of a type implementing Read.
///
/// Reading stops at the first IO error, which is kept and can be retrieved
/// with [LineIterator::error].
pub struct LineIterator<T: Read> {
    reader: BufReader<T>,
    buffer: String,
    end: bool,
    error: Option<std::io::Error>,
    line_number: usize,
}

impl<T: Read> LineIterator<T> {
    pub fn new(reader: T) -> LineIterator<T> {
        LineIterator {
            reader: BufReader::new(reader),
            buffer: String::new(),
            end: false,
            error: None,
            line_number: 0,
        }
    }

    /// Returns the error that ended the iteration, if any.
    pub fn error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    /// Returns the one based number of the current line.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<T: Read> StreamingIterator for LineIterator<T> {
    type Item = String;

    fn advance(&mut self) {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(n) if n > 0 => {
                self.line_number += 1;
                if self.buffer.ends_with('\n') {
                    self.buffer.pop();
                    if self.buffer.ends_with('\r') {
                        self.buffer.pop();
                    }
                }
            }
            Ok(_) => self.end = true,
            Err(error) => {
                self.error = Some(error);
                self.end = true;
            }
        }
    }

    fn get(&self) -> Option<&Self::Item> {
        if self.end {
            None
        } else {
            Some(&self.buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_line_iterator() {
        let mut lines = LineIterator::new("first\r\nsecond\n\nlast".as_bytes());

        let mut result = Vec::new();
        while let Some(line) = lines.next() {
            result.push(line.clone());
        }

        assert_eq!(result, vec!["first", "second", "", "last"]);
        assert_eq!(lines.line_number(), 4);
        assert!(lines.error().is_none());
    }
}
