// Tokenizer for algebraic expressions

use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;

use super::error::ParseError;

/// Decimal exponents beyond this are rejected instead of expanded
const MAX_LITERAL_EXPONENT: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(RBig),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    /// `^` or `**`
    Caret,
    LParen,
    RParen,
    Comma,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(value) => format!("number '{value}'"),
            TokenKind::Ident(name) => format!("name '{name}'"),
            TokenKind::Plus => "operator '+'".to_string(),
            TokenKind::Minus => "operator '-'".to_string(),
            TokenKind::Star => "operator '*'".to_string(),
            TokenKind::Slash => "operator '/'".to_string(),
            TokenKind::Caret => "operator '^'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
        }
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;

        let kind = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                pos += 1;
                continue;
            }
            b'+' => {
                pos += 1;
                TokenKind::Plus
            }
            b'-' => {
                pos += 1;
                TokenKind::Minus
            }
            b'*' if bytes.get(pos + 1) == Some(&b'*') => {
                pos += 2;
                TokenKind::Caret
            }
            b'*' => {
                pos += 1;
                TokenKind::Star
            }
            b'/' => {
                pos += 1;
                TokenKind::Slash
            }
            b'^' => {
                pos += 1;
                TokenKind::Caret
            }
            b'(' => {
                pos += 1;
                TokenKind::LParen
            }
            b')' => {
                pos += 1;
                TokenKind::RParen
            }
            b',' => {
                pos += 1;
                TokenKind::Comma
            }
            b'0'..=b'9' | b'.' => {
                let (value, end) = lex_number(input, pos)?;
                pos = end;
                TokenKind::Number(value)
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while pos < bytes.len()
                    && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                TokenKind::Ident(input[start..pos].to_string())
            }
            _ => {
                let ch = input[pos..].chars().next().unwrap_or('?');
                return Err(ParseError::new(
                    pos,
                    format!("unexpected character '{ch}'"),
                ));
            }
        };

        tokens.push(Token {
            kind,
            position: start,
        });
    }

    Ok(tokens)
}

/// Lex a decimal literal (`12`, `1.5`, `.5`, `2.`, `1e-3`) into an exact rational
fn lex_number(input: &str, start: usize) -> Result<(RBig, usize), ParseError> {
    let bytes = input.as_bytes();
    let mut pos = start;

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_part = &input[int_start..pos];

    let mut frac_part = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        frac_part = &input[frac_start..pos];
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ParseError::new(start, "malformed number"));
    }

    let mut exponent: i64 = 0;
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp_pos = pos + 1;
        let negative = match bytes.get(exp_pos) {
            Some(b'-') => {
                exp_pos += 1;
                true
            }
            Some(b'+') => {
                exp_pos += 1;
                false
            }
            _ => false,
        };
        let digits_start = exp_pos;
        while exp_pos < bytes.len() && bytes[exp_pos].is_ascii_digit() {
            exp_pos += 1;
        }
        if digits_start == exp_pos {
            return Err(ParseError::new(start, "malformed number exponent"));
        }
        let magnitude: usize = input[digits_start..exp_pos]
            .parse()
            .ok()
            .filter(|m| *m <= MAX_LITERAL_EXPONENT)
            .ok_or_else(|| ParseError::new(start, "number exponent too large"))?;
        exponent = if negative {
            -(magnitude as i64)
        } else {
            magnitude as i64
        };
        pos = exp_pos;
    }

    // A literal glued to a name (`2x`) is not implicit multiplication
    if pos < bytes.len() && (bytes[pos].is_ascii_alphabetic() || bytes[pos] == b'_') {
        return Err(ParseError::new(pos, "invalid syntax after number"));
    }

    let digits = format!("{int_part}{frac_part}");
    let mantissa = UBig::from_str_radix(&digits, 10)
        .map_err(|e| ParseError::new(start, format!("malformed number: {e}")))?;

    let scale = exponent - frac_part.len() as i64;
    let ten = UBig::from(10u8);
    let value = if scale >= 0 {
        RBig::from(IBig::from(mantissa * ten.pow(scale as usize)))
    } else {
        RBig::from_parts(IBig::from(mantissa), ten.pow(scale.unsigned_abs() as usize))
    };

    Ok((value, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn rational(num: i64, den: u64) -> RBig {
        RBig::from_parts(IBig::from(num), UBig::from(den))
    }

    #[test]
    fn test_operators_and_power_spellings() {
        assert_eq!(
            kinds("x**2 ^ 3"),
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Caret,
                TokenKind::Number(rational(2, 1)),
                TokenKind::Caret,
                TokenKind::Number(rational(3, 1)),
            ]
        );
    }

    #[test]
    fn test_decimal_literals_are_exact() {
        assert_eq!(kinds("0.5"), vec![TokenKind::Number(rational(1, 2))]);
        assert_eq!(kinds(".25"), vec![TokenKind::Number(rational(1, 4))]);
        assert_eq!(kinds("2."), vec![TokenKind::Number(rational(2, 1))]);
        assert_eq!(kinds("1.5e2"), vec![TokenKind::Number(rational(150, 1))]);
        assert_eq!(kinds("3e-2"), vec![TokenKind::Number(rational(3, 100))]);
    }

    #[test]
    fn test_rejects_equals_sign() {
        let err = tokenize("x = 1").unwrap_err();
        assert_eq!(err.position, 2);
        assert!(err.message.contains('='));
    }

    #[test]
    fn test_rejects_implicit_multiplication() {
        assert!(tokenize("2x").is_err());
    }

    #[test]
    fn test_rejects_lone_dot_and_bad_exponent() {
        assert!(tokenize(".").is_err());
        assert!(tokenize("1e").is_err());
        assert!(tokenize("1e99999").is_err());
    }
}
