use std::fmt;

use thiserror::Error;

use crate::parse::{MAX_NESTING, RawToken, expression_tokens, nesting_depth};
use crate::types::{GameContext, Ruleset, Severity};

/// Why an expression could not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("mismatched parenthesis")]
    MismatchedParenthesis,

    #[error("operator is missing an operand")]
    MissingOperand,

    #[error("operand is not joined by an operator")]
    TrailingOperand,

    #[error("unknown countable '{0}'")]
    UnknownCountable(String),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("empty expression")]
    Empty,

    #[error("sub-countables nested too deeply")]
    TooDeep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinaryOp {
    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            '%' => Some(Self::Rem),
            '^' => Some(Self::Pow),
            _ => None,
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div | Self::Rem => 2,
            Self::Pow => 3,
        }
    }

    fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Rem => '%',
            Self::Pow => '^',
        }
    }

    fn apply(self, a: i32, b: i32) -> Result<i32, ExpressionError> {
        match self {
            Self::Add => a.checked_add(b).ok_or(ExpressionError::Overflow),
            Self::Sub => a.checked_sub(b).ok_or(ExpressionError::Overflow),
            Self::Mul => a.checked_mul(b).ok_or(ExpressionError::Overflow),
            Self::Div if b == 0 => Err(ExpressionError::DivisionByZero),
            Self::Div => a.checked_div(b).ok_or(ExpressionError::Overflow),
            Self::Rem if b == 0 => Err(ExpressionError::ModuloByZero),
            Self::Rem => a.checked_rem(b).ok_or(ExpressionError::Overflow),
            Self::Pow => {
                let result = f64::from(a).powf(f64::from(b));
                if result.is_finite() && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&result) {
                    // truncates toward zero
                    Ok(result as i32)
                } else {
                    Err(ExpressionError::Overflow)
                }
            }
        }
    }
}

/// A value an expression reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Literal(i32),
    /// A bare word such as `Cities`, resolved as a simple countable.
    Countable(String),
    /// A bracketed sub-countable such as `[[Melee] Units]`, resolved by
    /// the full resolver.
    Nested(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Instruction {
    Push(Operand),
    Binary(BinaryOp),
    Negate,
}

#[derive(Debug, Clone, Copy)]
enum Pending {
    Binary(BinaryOp),
    Negate,
    Open,
}

/// A parsed arithmetic expression over countables, held in postfix order.
///
/// Operators are `+ - * / % ^` with the usual precedence (`^` highest,
/// then `* / %`, then `+ -`), all left-associative. A leading `-` (or one
/// right after another operator or `(`) negates; it binds tighter than
/// any binary operator. All arithmetic is on `i32`; `^` goes through
/// floating point and truncates.
///
/// # Example
///
/// ```
/// use uniques::{Expression, GameContext};
///
/// let expr = Expression::parse("(2 + 3) * 4").unwrap();
/// assert_eq!(expr.evaluate(&GameContext::empty()), Ok(20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    postfix: Vec<Instruction>,
}

impl Expression {
    /// Parse `text` and check its shape. Countables are not resolved yet.
    pub fn parse(text: &str) -> Result<Expression, ExpressionError> {
        let tokens = expression_tokens(text).ok_or(ExpressionError::MismatchedParenthesis)?;
        if tokens.is_empty() {
            return Err(ExpressionError::Empty);
        }

        let mut postfix = Vec::with_capacity(tokens.len());
        let mut pending: Vec<Pending> = Vec::new();
        let mut expect_operand = true;

        for token in tokens {
            match token {
                RawToken::Word(_) | RawToken::Group(_) if !expect_operand => {
                    return Err(ExpressionError::TrailingOperand);
                }
                RawToken::Word(word) => {
                    let operand = match word.parse::<i32>() {
                        Ok(n) => Operand::Literal(n),
                        Err(_) => Operand::Countable(word.to_owned()),
                    };
                    postfix.push(Instruction::Push(operand));
                    expect_operand = false;
                }
                RawToken::Group(inner) => {
                    if nesting_depth(inner, '[', ']') >= MAX_NESTING {
                        return Err(ExpressionError::TooDeep);
                    }
                    postfix.push(Instruction::Push(Operand::Nested(inner.trim().to_owned())));
                    expect_operand = false;
                }
                RawToken::Open => {
                    if !expect_operand {
                        return Err(ExpressionError::TrailingOperand);
                    }
                    pending.push(Pending::Open);
                }
                RawToken::Close => {
                    if expect_operand {
                        return Err(ExpressionError::MissingOperand);
                    }
                    loop {
                        match pending.pop() {
                            Some(Pending::Open) => break,
                            Some(Pending::Binary(op)) => postfix.push(Instruction::Binary(op)),
                            Some(Pending::Negate) => postfix.push(Instruction::Negate),
                            None => return Err(ExpressionError::MismatchedParenthesis),
                        }
                    }
                }
                RawToken::Operator(symbol) if expect_operand => match symbol {
                    '-' => pending.push(Pending::Negate),
                    '+' => {}
                    _ => return Err(ExpressionError::MissingOperand),
                },
                RawToken::Operator(symbol) => {
                    let Some(op) = BinaryOp::from_symbol(symbol) else {
                        return Err(ExpressionError::MissingOperand);
                    };
                    while let Some(&top) = pending.last() {
                        match top {
                            Pending::Negate => postfix.push(Instruction::Negate),
                            Pending::Binary(other) if other.precedence() >= op.precedence() => {
                                postfix.push(Instruction::Binary(other));
                            }
                            _ => break,
                        }
                        pending.pop();
                    }
                    pending.push(Pending::Binary(op));
                    expect_operand = true;
                }
            }
        }

        if expect_operand {
            return Err(ExpressionError::MissingOperand);
        }
        while let Some(top) = pending.pop() {
            match top {
                Pending::Binary(op) => postfix.push(Instruction::Binary(op)),
                Pending::Negate => postfix.push(Instruction::Negate),
                Pending::Open => return Err(ExpressionError::MismatchedParenthesis),
            }
        }
        Ok(Expression { postfix })
    }

    /// Whether this is a single word with no operators or brackets; such
    /// text is a simple countable, not an expression.
    pub(crate) fn is_bare_word(&self) -> bool {
        matches!(
            self.postfix.as_slice(),
            [Instruction::Push(Operand::Countable(_) | Operand::Literal(_))]
        )
    }

    /// Every value this expression reads, in order.
    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        self.postfix.iter().filter_map(|i| match i {
            Instruction::Push(operand) => Some(operand),
            _ => None,
        })
    }

    /// Evaluate against `ctx`, resolving countables as they are reached.
    pub fn evaluate(&self, ctx: &GameContext<'_>) -> Result<i32, ExpressionError> {
        let mut stack: Vec<i32> = Vec::with_capacity(self.postfix.len());
        for instruction in &self.postfix {
            match instruction {
                Instruction::Push(operand) => stack.push(resolve_operand(operand, ctx)?),
                Instruction::Negate => {
                    let a = stack.pop().ok_or(ExpressionError::MissingOperand)?;
                    stack.push(a.checked_neg().ok_or(ExpressionError::Overflow)?);
                }
                Instruction::Binary(op) => {
                    let b = stack.pop().ok_or(ExpressionError::MissingOperand)?;
                    let a = stack.pop().ok_or(ExpressionError::MissingOperand)?;
                    stack.push(op.apply(a, b)?);
                }
            }
        }
        match stack.as_slice() {
            [value] => Ok(*value),
            [] => Err(ExpressionError::Empty),
            _ => Err(ExpressionError::TrailingOperand),
        }
    }

    /// The worst compliance problem among the operands, if any.
    pub fn error_severity(&self, ruleset: &Ruleset) -> Option<Severity> {
        self.operands()
            .filter_map(|operand| match operand {
                Operand::Literal(_) => None,
                Operand::Countable(text) => super::simple_error_severity(text, ruleset),
                Operand::Nested(text) => super::error_severity(text, ruleset),
            })
            .max()
    }
}

fn resolve_operand(operand: &Operand, ctx: &GameContext<'_>) -> Result<i32, ExpressionError> {
    let resolved = match operand {
        Operand::Literal(n) => return Ok(*n),
        Operand::Countable(text) => super::resolve_simple(text, ctx),
        Operand::Nested(text) => super::resolve(text, ctx),
    };
    resolved.ok_or_else(|| ExpressionError::UnknownCountable(operand.to_string()))
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(n) => write!(f, "{n}"),
            Operand::Countable(text) => f.write_str(text),
            Operand::Nested(text) => write!(f, "[{text}]"),
        }
    }
}

impl fmt::Display for Expression {
    /// Postfix notation, space separated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instruction) in self.postfix.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match instruction {
                Instruction::Push(operand) => write!(f, "{operand}")?,
                Instruction::Binary(op) => write!(f, "{}", op.symbol())?,
                Instruction::Negate => f.write_str("neg")?,
            }
        }
        Ok(())
    }
}
