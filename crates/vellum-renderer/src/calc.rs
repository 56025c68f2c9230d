//! Restricted arithmetic evaluation for calc chips.
//!
//! The grammar is numbers, `+ - * / ( )`, unary sign, and decimal points -
//! nothing else. There is deliberately no general-purpose evaluation here;
//! anything outside the grammar fails, and failures surface as the `?`
//! display placeholder rather than an error.
//!
//! Grammar:
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-')* (number | '(' expr ')')
//! number := [0-9.]+ parsed as f64
//! ```

/// Evaluate an expression, or `None` when it falls outside the grammar or
/// produces a non-finite value.
pub fn eval(expression: &str) -> Option<f64> {
    let mut cursor = Cursor {
        bytes: expression.as_bytes(),
        pos: 0,
    };
    let value = cursor.expr()?;
    cursor.skip_ws();
    if cursor.pos != cursor.bytes.len() {
        tracing::debug!(expression, "trailing input after arithmetic expression");
        return None;
    }
    value.is_finite().then_some(value)
}

/// Evaluate and format for chip display: two decimals, or `?`.
pub fn display(expression: &str) -> String {
    match eval(expression) {
        Some(value) => format!("{value:.2}"),
        None => "?".to_owned(),
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn skip_ws(&mut self) {
        while self.peek() == Some(b' ') || self.peek() == Some(b'\t') {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, wanted: u8) -> bool {
        self.skip_ws();
        if self.peek() == Some(wanted) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        loop {
            if self.eat(b'+') {
                value += self.term()?;
            } else if self.eat(b'-') {
                value -= self.term()?;
            } else {
                return Some(value);
            }
        }
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.factor()?;
        loop {
            if self.eat(b'*') {
                value *= self.factor()?;
            } else if self.eat(b'/') {
                value /= self.factor()?;
            } else {
                return Some(value);
            }
        }
    }

    fn factor(&mut self) -> Option<f64> {
        self.skip_ws();
        if self.eat(b'-') {
            return self.factor().map(|v| -v);
        }
        if self.eat(b'+') {
            return self.factor();
        }
        if self.eat(b'(') {
            let value = self.expr()?;
            if !self.eat(b')') {
                return None;
            }
            return Some(value);
        }
        self.number()
    }

    fn number(&mut self) -> Option<f64> {
        self.skip_ws();
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9') | Some(b'.')) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        // str::parse rejects malformed digit runs like "1.2.3" or ".".
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()?
            .parse()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_arithmetic() {
        assert_eq!(eval("10+5*2"), Some(20.0));
        assert_eq!(eval("(10+5)*2"), Some(30.0));
        assert_eq!(eval("70/100+20"), Some(20.7));
        assert_eq!(eval("  1.5 + 2.25 "), Some(3.75));
        assert_eq!(eval("42"), Some(42.0));
    }

    #[test]
    fn unary_sign() {
        assert_eq!(eval("-3"), Some(-3.0));
        assert_eq!(eval("-(2+3)"), Some(-5.0));
        assert_eq!(eval("+-+4"), Some(-4.0));
        assert_eq!(eval("2--3"), Some(5.0));
    }

    #[test]
    fn rejects_everything_outside_the_grammar() {
        assert_eq!(eval("alert('pwned')"), None);
        assert_eq!(eval("1;2"), None);
        assert_eq!(eval("process.exit()"), None);
        assert_eq!(eval("1+x"), None);
        assert_eq!(eval("0x10"), None);
        assert_eq!(eval("1e3"), None);
        assert_eq!(eval(""), None);
        assert_eq!(eval("()"), None);
        assert_eq!(eval("(1+2"), None);
        assert_eq!(eval("1.2.3"), None);
    }

    #[test]
    fn non_finite_results_fail() {
        assert_eq!(eval("1/0"), None);
        assert_eq!(eval("-1/0"), None);
    }

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(display("10+5*2"), "20.00");
        assert_eq!(display("1/3"), "0.33");
        assert_eq!(display("nope"), "?");
    }
}
