// Recursive-descent parser producing an expression tree
//
//   expr    := term (('+' | '-') term)*
//   term    := unary (('*' | '/') unary)*
//   unary   := ('+' | '-') unary | power
//   power   := primary ('^' unary)?
//   primary := number | name | name '(' args ')' | '(' expr ')'

use std::fmt;

use dashu::rational::RBig;

use super::error::ParseError;
use super::lexer::{tokenize, Token, TokenKind};

/// Parsed algebraic expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(RBig),
    Symbol(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call { name: String, args: Vec<Expr> },
}

impl Expr {
    /// `lhs - rhs`, the zero-equals form of `lhs = rhs`
    pub fn difference(lhs: Expr, rhs: Expr) -> Self {
        Expr::Sub(Box::new(lhs), Box::new(rhs))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(value) => write!(f, "{value}"),
            Expr::Symbol(name) => write!(f, "{name}"),
            Expr::Neg(inner) => write!(f, "-({inner})"),
            Expr::Add(a, b) => write!(f, "({a} + {b})"),
            Expr::Sub(a, b) => write!(f, "({a} - {b})"),
            Expr::Mul(a, b) => write!(f, "{a}*{b}"),
            Expr::Div(a, b) => write!(f, "{a}/{b}"),
            Expr::Pow(a, b) => write!(f, "{a}^{b}"),
            Expr::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Default bound on nesting and on the height of the parsed tree
pub const MAX_NESTING_DEPTH: usize = 200;

/// Parse a complete expression; trailing tokens are an error
pub fn parse_expr(input: &str) -> Result<Expr, ParseError> {
    parse_expr_with_depth(input, MAX_NESTING_DEPTH)
}

/// Parse with an explicit bound on nesting depth.
///
/// Both the parser's own recursion and the height of the resulting tree are
/// kept within `max_depth`, so later passes over the tree stay shallow.
pub fn parse_expr_with_depth(input: &str, max_depth: usize) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
        nesting: 0,
        max_depth,
    };

    let (expr, _) = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(ParseError::new(
            token.position,
            format!("unexpected {}", token.kind.describe()),
        )),
    }
}

/// An expression with the height of its tree
type Node = (Expr, usize);

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
    nesting: usize,
    max_depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn current_position(&self) -> usize {
        self.peek().map_or(self.end, |t| t.position)
    }

    fn too_deep(&self, position: usize) -> ParseError {
        ParseError::new(position, "expression nested too deeply")
    }

    /// Height of a new node over children of height `height`
    fn grow(&self, position: usize, height: usize) -> Result<usize, ParseError> {
        let height = height + 1;
        if height > self.max_depth {
            return Err(self.too_deep(position));
        }
        Ok(height)
    }

    fn expr(&mut self) -> Result<Node, ParseError> {
        let (mut lhs, mut height) = self.term()?;

        loop {
            let (subtract, position) = match self.peek() {
                Some(t) if t.kind == TokenKind::Plus => (false, t.position),
                Some(t) if t.kind == TokenKind::Minus => (true, t.position),
                _ => break,
            };
            self.advance();

            // `x ++ 2` and `x +- 2` are malformed; `x - -2` is a signed operand
            if let Some(token) = self.peek().filter(|t| {
                matches!(t.kind, TokenKind::Plus | TokenKind::Minus) && t.position == position + 1
            }) {
                return Err(ParseError::new(
                    token.position,
                    format!("unexpected {}", token.kind.describe()),
                ));
            }

            let (rhs, rhs_height) = self.term()?;
            height = self.grow(position, height.max(rhs_height))?;
            lhs = if subtract {
                Expr::Sub(Box::new(lhs), Box::new(rhs))
            } else {
                Expr::Add(Box::new(lhs), Box::new(rhs))
            };
        }

        Ok((lhs, height))
    }

    fn term(&mut self) -> Result<Node, ParseError> {
        let (mut lhs, mut height) = self.unary()?;

        loop {
            let (divide, position) = match self.peek() {
                Some(t) if t.kind == TokenKind::Star => (false, t.position),
                Some(t) if t.kind == TokenKind::Slash => (true, t.position),
                _ => break,
            };
            self.advance();

            let (rhs, rhs_height) = self.unary()?;
            height = self.grow(position, height.max(rhs_height))?;
            lhs = if divide {
                Expr::Div(Box::new(lhs), Box::new(rhs))
            } else {
                Expr::Mul(Box::new(lhs), Box::new(rhs))
            };
        }

        Ok((lhs, height))
    }

    /// All parser recursion passes through here
    fn unary(&mut self) -> Result<Node, ParseError> {
        if self.nesting >= self.max_depth {
            return Err(self.too_deep(self.current_position()));
        }

        self.nesting += 1;
        let node = self.signed();
        self.nesting -= 1;
        node
    }

    fn signed(&mut self) -> Result<Node, ParseError> {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Minus => {
                let position = t.position;
                self.advance();
                let (inner, height) = self.unary()?;
                Ok((Expr::Neg(Box::new(inner)), self.grow(position, height)?))
            }
            Some(t) if t.kind == TokenKind::Plus => {
                self.advance();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Node, ParseError> {
        let (base, base_height) = self.primary()?;

        if let Some(position) = self
            .peek()
            .filter(|t| t.kind == TokenKind::Caret)
            .map(|t| t.position)
        {
            self.advance();
            let (exponent, exponent_height) = self.unary()?;
            let height = self.grow(position, base_height.max(exponent_height))?;
            return Ok((Expr::Pow(Box::new(base), Box::new(exponent)), height));
        }

        Ok((base, base_height))
    }

    fn primary(&mut self) -> Result<Node, ParseError> {
        let position = self.current_position();
        let token = self
            .advance()
            .ok_or_else(|| ParseError::new(position, "unexpected end of expression"))?;

        match token.kind {
            TokenKind::Number(value) => Ok((Expr::Number(value), 1)),
            TokenKind::Ident(name) => {
                if let Some(TokenKind::LParen) = self.peek_kind() {
                    self.advance();
                    let (args, height) = self.arguments()?;
                    Ok((Expr::Call { name, args }, self.grow(token.position, height)?))
                } else {
                    Ok((Expr::Symbol(name), 1))
                }
            }
            TokenKind::LParen => {
                let inner = self.expr()?;
                self.expect_closing(token.position)?;
                Ok(inner)
            }
            other => Err(ParseError::new(
                token.position,
                format!("unexpected {}", other.describe()),
            )),
        }
    }

    /// Call arguments with the height of the tallest one
    fn arguments(&mut self) -> Result<(Vec<Expr>, usize), ParseError> {
        let open = self.pos.saturating_sub(1);
        let open_position = self.tokens.get(open).map_or(self.end, |t| t.position);

        let mut args = Vec::new();
        let mut height = 0;
        if let Some(TokenKind::RParen) = self.peek_kind() {
            self.advance();
            return Ok((args, height));
        }

        loop {
            let (arg, arg_height) = self.expr()?;
            height = height.max(arg_height);
            args.push(arg);
            match self.peek_kind() {
                Some(TokenKind::Comma) => {
                    self.advance();
                }
                _ => break,
            }
        }

        self.expect_closing(open_position)?;
        Ok((args, height))
    }

    fn expect_closing(&mut self, open_position: usize) -> Result<(), ParseError> {
        match self.peek_kind() {
            Some(TokenKind::RParen) => {
                self.advance();
                Ok(())
            }
            _ => Err(ParseError::new(
                self.current_position(),
                format!("unclosed '(' opened at position {open_position}"),
            )),
        }
    }
}
