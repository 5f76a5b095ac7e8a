#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

/// Backtrackable reader over a single statement.
///
/// Every read skips leading whitespace first. A read that does not match
/// leaves the position exactly where it was, whitespace included, so grammar
/// alternatives can be tried one after another.
#[derive(Debug, Clone)]
pub struct StringScanner<'a> {
    string: &'a str,
    index: usize,
}

fn is_identifier_start(character: char) -> bool {
    character.is_ascii_alphabetic()
}

fn is_identifier_rest(character: char) -> bool {
    character.is_ascii_alphanumeric()
}

impl<'a> StringScanner<'a> {
    pub fn new(string: &'a str) -> Self {
        Self { string, index: 0 }
    }

    fn count<P: Fn(char) -> bool>(&self, predicate: P) -> usize {
        self.view()
            .char_indices()
            .find(|&(_, c)| !predicate(c))
            .map_or(self.view().len(), |(offset, _)| offset)
    }

    fn view(&self) -> &'a str {
        &self.string[self.index..]
    }

    fn skip_whitespace(&mut self) {
        let count = self.count(char::is_whitespace);
        self.index += count;
    }

    fn number_length(&self) -> usize {
        let bytes = self.view().as_bytes();
        let digits_from = |start: usize| {
            bytes[start..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
        };

        let mut length = digits_from(0);
        if length == 0 {
            return 0;
        }
        if bytes.get(length) == Some(&b'.') {
            length += 1 + digits_from(length + 1);
        }
        if matches!(bytes.get(length), Some(b'e' | b'E')) {
            let mut exponent = length + 1;
            if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
                exponent += 1;
            }
            let exponent_digits = digits_from(exponent);
            if exponent_digits > 0 {
                length = exponent + exponent_digits;
            }
        }
        length
    }

    pub fn mark(&self) -> Checkpoint {
        Checkpoint(self.index)
    }

    pub fn reset(&mut self, checkpoint: Checkpoint) {
        self.index = checkpoint.0.min(self.string.len());
    }

    pub fn position(&self) -> usize {
        self.index
    }

    // trailing whitespace counts as the end
    pub fn at_end(&self) -> bool {
        self.view().trim_start().is_empty()
    }

    pub fn read_number(&mut self) -> Option<f64> {
        let start = self.mark();
        self.skip_whitespace();

        let length = self.number_length();
        let value = self.view()[..length].parse::<f64>().ok();
        match value {
            Some(value) => {
                self.index += length;
                Some(value)
            }
            None => {
                self.reset(start);
                None
            }
        }
    }

    pub fn read_identifier(&mut self) -> Option<&'a str> {
        let start = self.mark();
        self.skip_whitespace();

        if !self.view().starts_with(is_identifier_start) {
            self.reset(start);
            return None;
        }
        let first = self.view().chars().next().map_or(0, char::len_utf8);
        let length = first + self.view()[first..]
            .char_indices()
            .find(|&(_, c)| !is_identifier_rest(c))
            .map_or(self.view().len() - first, |(offset, _)| offset);

        let identifier = &self.view()[..length];
        self.index += length;
        Some(identifier)
    }

    pub fn match_char(&mut self, expected: char) -> bool {
        let start = self.mark();
        self.skip_whitespace();

        if self.view().starts_with(expected) {
            self.index += expected.len_utf8();
            true
        } else {
            self.reset(start);
            false
        }
    }

    pub fn match_literal(&mut self, expected: &str) -> bool {
        let start = self.mark();
        self.skip_whitespace();

        if !expected.is_empty() && self.view().starts_with(expected) {
            self.index += expected.len();
            true
        } else {
            self.reset(start);
            false
        }
    }

    pub fn match_any<'c, I>(&mut self, candidates: I) -> Option<&'c str>
    where
        I: IntoIterator<Item = &'c str>,
    {
        candidates
            .into_iter()
            .find(|candidate| self.match_literal(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_integers_and_fractions() {
        let mut scanner = StringScanner::new("  42 2.5 7. 1e3 3e");
        assert_eq!(scanner.read_number(), Some(42.0));
        assert_eq!(scanner.read_number(), Some(2.5));
        assert_eq!(scanner.read_number(), Some(7.0));
        assert_eq!(scanner.read_number(), Some(1000.0));
        assert_eq!(scanner.read_number(), Some(3.0));
        assert_eq!(scanner.read_identifier(), Some("e"));
        assert!(scanner.at_end());
    }

    #[test]
    fn number_miss_keeps_position() {
        let mut scanner = StringScanner::new("   x1");
        assert_eq!(scanner.read_number(), None);
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn identifiers_start_alphabetic() {
        let mut scanner = StringScanner::new("qwer123aq+1abc");
        assert_eq!(scanner.read_identifier(), Some("qwer123aq"));
        assert!(scanner.match_char('+'));
        assert_eq!(scanner.read_identifier(), None);
        assert_eq!(scanner.read_number(), Some(1.0));
        assert_eq!(scanner.read_identifier(), Some("abc"));
    }

    #[test]
    fn identifiers_are_ascii_only() {
        let mut scanner = StringScanner::new("é=1");
        assert_eq!(scanner.read_identifier(), None);
        assert_eq!(scanner.position(), 0);

        let mut scanner = StringScanner::new("abé");
        assert_eq!(scanner.read_identifier(), Some("ab"));
        assert!(!scanner.at_end());
    }

    #[test]
    fn failed_matches_do_not_consume_whitespace() {
        let mut scanner = StringScanner::new("a   += 1");
        assert_eq!(scanner.read_identifier(), Some("a"));
        let position = scanner.position();
        assert!(!scanner.match_char('='));
        assert!(!scanner.match_literal("-="));
        assert_eq!(scanner.position(), position);
        assert!(scanner.match_literal("+="));
        assert_eq!(scanner.read_number(), Some(1.0));
    }

    #[test]
    fn match_any_takes_first_candidate() {
        let mut scanner = StringScanner::new("abcde++");
        assert_eq!(scanner.match_any(["abcde", "abc"]), Some("abcde"));
        assert_eq!(scanner.match_any(["--", "++"]), Some("++"));
        assert_eq!(scanner.match_any(["--", "++"]), None);
    }

    #[test]
    fn reset_restores_and_clamps() {
        let mut scanner = StringScanner::new("sin(1)");
        let start = scanner.mark();
        assert!(scanner.match_literal("sin"));
        assert!(scanner.match_char('('));
        scanner.reset(start);
        assert_eq!(scanner.position(), 0);

        let mut longer = StringScanner::new("abcdefgh");
        longer.match_literal("abcdefgh");
        let end = longer.mark();
        scanner.reset(end);
        assert_eq!(scanner.position(), 6);
        assert!(scanner.at_end());
    }

    #[test]
    fn trailing_whitespace_counts_as_end() {
        let mut scanner = StringScanner::new(" 8   ");
        assert!(!scanner.at_end());
        scanner.read_number();
        assert!(scanner.at_end());
    }
}
