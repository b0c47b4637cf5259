use super::Memory;
use crate::error;
use crate::lang::token::{Function, Operator, Token};
use crate::lang::Error;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type Result<T> = std::result::Result<T, Error>;

/// ## Expression evaluator
///
/// Walks the flat token sequence produced by the expression parser,
/// re-deriving precedence with the same recursion. All arithmetic wraps
/// at 16 bits.

#[derive(Debug, Clone)]
pub struct Evaluator {
    rng: StdRng,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Evaluator {
    /// Deterministic `RND` sequence.
    pub fn seeded(seed: u64) -> Evaluator {
        Evaluator {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn evaluate(&mut self, expression: &Token, memory: &Memory) -> Result<i16> {
        match expression {
            Token::Expression(tokens) => {
                let mut pos = 0;
                self.expression(tokens, &mut pos, memory)
            }
            t => Err(error!(InternalError; "not an expression: {}", t)),
        }
    }

    fn expression(&mut self, tokens: &[Token], pos: &mut usize, memory: &Memory) -> Result<i16> {
        let mut negations = 0;
        while let Some(Token::Operator(op)) = tokens.get(*pos) {
            match op {
                Operator::Plus => {}
                Operator::Minus => negations += 1,
                _ => break,
            }
            *pos += 1;
        }
        let mut value = self.term(tokens, pos, memory)?;
        for _ in 0..negations {
            value = value.wrapping_neg();
        }
        while let Some(Token::Operator(op)) = tokens.get(*pos) {
            let op = *op;
            if !op.is_additive() {
                break;
            }
            *pos += 1;
            let rhs = self.term(tokens, pos, memory)?;
            value = match op {
                Operator::Plus => value.wrapping_add(rhs),
                _ => value.wrapping_sub(rhs),
            };
        }
        Ok(value)
    }

    fn term(&mut self, tokens: &[Token], pos: &mut usize, memory: &Memory) -> Result<i16> {
        let mut value = self.factor(tokens, pos, memory)?;
        while let Some(Token::Operator(op)) = tokens.get(*pos) {
            let op = *op;
            if !op.is_multiplicative() {
                break;
            }
            *pos += 1;
            let rhs = self.factor(tokens, pos, memory)?;
            value = match op {
                Operator::Multiply => value.wrapping_mul(rhs),
                _ => {
                    if rhs == 0 {
                        return Err(error!(DivisionByZero));
                    }
                    value.wrapping_div(rhs)
                }
            };
        }
        Ok(value)
    }

    fn factor(&mut self, tokens: &[Token], pos: &mut usize, memory: &Memory) -> Result<i16> {
        let token = tokens.get(*pos);
        *pos += 1;
        match token {
            Some(Token::Number(s)) => literal(s),
            Some(Token::Word(w)) => match w.chars().next() {
                Some(name) if w.len() == 1 => memory.fetch(name),
                _ => Err(error!(InvalidVariable; "{}", w)),
            },
            Some(Token::LParen) => {
                let value = self.expression(tokens, pos, memory)?;
                if let Some(Token::RParen) = tokens.get(*pos) {
                    *pos += 1;
                }
                Ok(value)
            }
            Some(Token::Function(func, args)) => self.call(*func, args, memory),
            Some(expr @ Token::Expression(_)) => self.evaluate(expr, memory),
            Some(t) => Err(error!(InternalError; "malformed expression at {}", t)),
            None => Err(error!(InternalError; "malformed expression")),
        }
    }

    fn call(&mut self, func: Function, args: &[Token], memory: &Memory) -> Result<i16> {
        match func {
            Function::Rnd => {
                let n = match args {
                    [arg] => self.evaluate(arg, memory)?,
                    _ => return Err(error!(InternalError; "{} takes one argument", func)),
                };
                if n < 1 {
                    return Err(error!(IllegalFunctionCall; "{}({})", func, n));
                }
                Ok(self.rng.gen_range(1..=n))
            }
        }
    }
}

/// Decimal digits folded with 16-bit wraparound.
fn literal(s: &str) -> Result<i16> {
    s.chars()
        .try_fold(0i16, |acc, ch| {
            ch.to_digit(10)
                .map(|d| acc.wrapping_mul(10).wrapping_add(d as i16))
        })
        .ok_or_else(|| error!(InternalError; "bad number {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_wraps() {
        assert_eq!(literal("32767").unwrap(), 32767);
        assert_eq!(literal("32768").unwrap(), -32768);
        assert_eq!(literal("65536").unwrap(), 0);
        assert_eq!(literal("007").unwrap(), 7);
        assert!(literal("1a").is_err());
    }
}
