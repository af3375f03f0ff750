//! Checked integer arithmetic used by the calculator grammar's actions.
use thiserror::Error;

/// Arithmetic failures raised from semantic actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,
}

pub fn add(a: i64, b: i64) -> Result<i64, ArithmeticError> {
    a.checked_add(b).ok_or(ArithmeticError::Overflow)
}

pub fn sub(a: i64, b: i64) -> Result<i64, ArithmeticError> {
    a.checked_sub(b).ok_or(ArithmeticError::Overflow)
}

pub fn mul(a: i64, b: i64) -> Result<i64, ArithmeticError> {
    a.checked_mul(b).ok_or(ArithmeticError::Overflow)
}

/// Truncating division.
pub fn div(a: i64, b: i64) -> Result<i64, ArithmeticError> {
    if b == 0 {
        return Err(ArithmeticError::DivisionByZero);
    }
    a.checked_div(b).ok_or(ArithmeticError::Overflow)
}

pub fn neg(a: i64) -> Result<i64, ArithmeticError> {
    a.checked_neg().ok_or(ArithmeticError::Overflow)
}
