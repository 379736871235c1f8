//! Restricted arithmetic evaluator for the /calc command
//!
//! A small recursive-descent parser over `+ - * / ( )` and numeric
//! literals. Input is first filtered down to that character set, matching
//! the gateway's historical behavior of ignoring any other characters.

use thiserror::Error;

/// Evaluation failure; converted to a user-facing string by the command
#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("invalid number literal")]
    InvalidNumber,

    #[error("division by zero")]
    DivisionByZero,
}

/// Strip everything outside the allowed `[-()\d/*+.]` set
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.'))
        .collect()
}

/// Evaluate a sanitized arithmetic expression
pub fn evaluate(input: &str) -> Result<f64, CalcError> {
    let expr = sanitize(input);
    if expr.is_empty() {
        return Err(CalcError::Empty);
    }

    let mut parser = Parser {
        chars: expr.chars().collect(),
        pos: 0,
    };
    let value = parser.expression()?;

    if let Some(&c) = parser.peek() {
        return Err(CalcError::UnexpectedChar(c));
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&char> {
        self.chars.get(self.pos)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        while let Some(&op) = self.peek() {
            match op {
                '+' => {
                    self.bump();
                    value += self.term()?;
                }
                '-' => {
                    self.bump();
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.factor()?;
        while let Some(&op) = self.peek() {
            match op {
                '*' => {
                    self.bump();
                    value *= self.factor()?;
                }
                '/' => {
                    self.bump();
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // factor := number | '(' expression ')' | ('+' | '-') factor
    fn factor(&mut self) -> Result<f64, CalcError> {
        match self.peek() {
            None => Err(CalcError::UnexpectedEnd),
            Some('(') => {
                self.bump();
                let value = self.expression()?;
                match self.bump() {
                    Some(')') => Ok(value),
                    Some(c) => Err(CalcError::UnexpectedChar(c)),
                    None => Err(CalcError::UnexpectedEnd),
                }
            }
            Some('+') => {
                self.bump();
                self.factor()
            }
            Some('-') => {
                self.bump();
                Ok(-self.factor()?)
            }
            Some(c) if c.is_ascii_digit() || *c == '.' => self.number(),
            Some(&c) => Err(CalcError::UnexpectedChar(c)),
        }
    }

    fn number(&mut self) -> Result<f64, CalcError> {
        let start = self.pos;
        while let Some(&c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.bump();
            } else {
                break;
            }
        }

        let literal: String = self.chars[start..self.pos].iter().collect();
        literal.parse().map_err(|_| CalcError::InvalidNumber)
    }
}

/// Render an evaluation result without a trailing `.0` for whole numbers
pub fn format_result(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(evaluate("2+2"), Ok(4.0));
        assert_eq!(evaluate("10*5"), Ok(50.0));
        assert_eq!(evaluate("7-3-2"), Ok(2.0));
        assert_eq!(evaluate("8/2"), Ok(4.0));
    }

    #[test]
    fn test_precedence_and_parens() {
        assert_eq!(evaluate("2+3*4"), Ok(14.0));
        assert_eq!(evaluate("(2+3)*4"), Ok(20.0));
        assert_eq!(evaluate("2*(3+4)/7"), Ok(2.0));
    }

    #[test]
    fn test_unary_and_decimals() {
        assert_eq!(evaluate("-5+10"), Ok(5.0));
        assert_eq!(evaluate("1.5*2"), Ok(3.0));
        assert_eq!(evaluate("-(2+3)"), Ok(-5.0));
    }

    #[test]
    fn test_garbage_characters_filtered() {
        // Letters and whitespace are stripped before parsing
        assert_eq!(evaluate("calc 2 + 2"), Ok(4.0));
        assert_eq!(evaluate("1a0*2b"), Ok(20.0));
    }

    #[test]
    fn test_malformed_expressions() {
        assert_eq!(evaluate("2+"), Err(CalcError::UnexpectedEnd));
        assert_eq!(evaluate("(2+3"), Err(CalcError::UnexpectedEnd));
        assert_eq!(evaluate(""), Err(CalcError::Empty));
        assert_eq!(evaluate("abc"), Err(CalcError::Empty));
        assert_eq!(evaluate("1..2"), Err(CalcError::InvalidNumber));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("1/0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("5/(3-3)"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_format_result() {
        assert_eq!(format_result(4.0), "4");
        assert_eq!(format_result(2.5), "2.5");
        assert_eq!(format_result(-3.0), "-3");
    }
}
