// src/engine/arith.rs
//! Arithmetic evaluation for `is/2` and the comparison operators.

use crate::engine::bindings::Bindings;
use crate::engine::error::PrologError;
use crate::engine::operators::OperatorTable;
use crate::engine::term::{Number, Term};

/// Reduces an arithmetic expression term to a number under `env`.
///
/// Contracts: `+ - *` preserve integer-ness, `/` always yields a float,
/// `//` and `mod` require integer operands (floor semantics), `**` yields
/// a float, unary `-` preserves the variant. Unbound variables are an
/// instantiation error, non-numeric leaves a type error, and a zero
/// divisor fails the evaluation.
pub fn eval(expr: &Term, env: &mut Bindings, ops: &OperatorTable) -> Result<Number, PrologError> {
    match env.resolve(expr) {
        Term::Number(n) => Ok(n),
        Term::Var(_) => Err(PrologError::Instantiation),
        Term::Compound(functor, args) if ops.is_arithmetic(&functor, args.len()) => {
            match args.len() {
                1 => {
                    let operand = eval(&args[0], env, ops)?;
                    apply_unary(&functor, operand)
                }
                2 => {
                    let lhs = eval(&args[0], env, ops)?;
                    let rhs = eval(&args[1], env, ops)?;
                    apply_binary(&functor, lhs, rhs)
                }
                _ => Err(PrologError::type_error("evaluable", Term::Compound(functor, args))),
            }
        }
        other => Err(PrologError::type_error("evaluable", other)),
    }
}

fn apply_unary(op: &str, operand: Number) -> Result<Number, PrologError> {
    match op {
        "-" => Ok(match operand {
            Number::Int(n) => Number::Int(-n),
            Number::Float(x) => Number::Float(-x),
        }),
        _ => Err(PrologError::type_error("evaluable", op)),
    }
}

fn apply_binary(op: &str, lhs: Number, rhs: Number) -> Result<Number, PrologError> {
    use Number::*;
    match op {
        "+" => Ok(match (lhs, rhs) {
            (Int(a), Int(b)) => Int(a.wrapping_add(b)),
            _ => Float(lhs.as_f64() + rhs.as_f64()),
        }),
        "-" => Ok(match (lhs, rhs) {
            (Int(a), Int(b)) => Int(a.wrapping_sub(b)),
            _ => Float(lhs.as_f64() - rhs.as_f64()),
        }),
        "*" => Ok(match (lhs, rhs) {
            (Int(a), Int(b)) => Int(a.wrapping_mul(b)),
            _ => Float(lhs.as_f64() * rhs.as_f64()),
        }),
        "/" => {
            if rhs.as_f64() == 0.0 {
                Err(PrologError::DivisionByZero)
            } else {
                Ok(Float(lhs.as_f64() / rhs.as_f64()))
            }
        }
        "//" => {
            let (a, b) = int_operands(lhs, rhs)?;
            if b == 0 {
                Err(PrologError::DivisionByZero)
            } else {
                Ok(Int(floor_div(a, b)))
            }
        }
        "mod" => {
            let (a, b) = int_operands(lhs, rhs)?;
            if b == 0 {
                Err(PrologError::DivisionByZero)
            } else {
                Ok(Int(floor_mod(a, b)))
            }
        }
        "**" => Ok(Float(lhs.as_f64().powf(rhs.as_f64()))),
        _ => Err(PrologError::type_error("evaluable", op)),
    }
}

fn int_operands(lhs: Number, rhs: Number) -> Result<(i64, i64), PrologError> {
    match (lhs, rhs) {
        (Number::Int(a), Number::Int(b)) => Ok((a, b)),
        (Number::Float(x), _) | (_, Number::Float(x)) => {
            Err(PrologError::type_error("integer", x))
        }
    }
}

/// Floor division, so `-7 // 2` is `-4` like the original implementation.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Modulo with the sign of the divisor, paired with `floor_div`.
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}
