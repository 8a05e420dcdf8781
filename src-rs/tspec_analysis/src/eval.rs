//! Calculated values and constant folding

use std::{cmp::Ordering, fmt};

use tspec_ast::{BinaryOp, UnaryOp};

/// A fully calculated value
///
/// Equality follows the type: elements of a set of compare regardless of
/// their order.
#[derive(Debug, Clone)]
pub enum ConstValue {
    /// A boolean
    Boolean(bool),
    /// A 64-bit integer
    Integer(i64),
    /// A float
    Float(f64),
    /// A character string
    Charstring(String),
    /// Upper case hexadecimal digits
    Octetstring(String),
    /// Binary digits as `0` and `1` characters
    Bitstring(String),
    /// An enumeration item
    Enumerated {
        /// The item name
        name: String,
        /// The item number
        number: i64,
    },
    /// Fields of a record or set in declaration order
    Record(Vec<(String, ConstValue)>),
    /// A value of a union
    Union {
        /// The chosen alternative
        alternative: String,
        /// The value of the alternative
        value: Box<ConstValue>,
    },
    /// Elements of a record of
    List(Vec<ConstValue>),
    /// Elements of a set of, in no particular order
    SetOf(Vec<ConstValue>),
    /// An omitted optional field
    Omit,
}

impl ConstValue {
    /// Returns the integer, if this is one
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        if let Self::Integer(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Returns the boolean, if this is one
    #[must_use]
    pub const fn as_boolean(&self) -> Option<bool> {
        if let Self::Boolean(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Returns whether this is an omitted field
    #[must_use]
    pub const fn is_omit(&self) -> bool {
        matches!(self, Self::Omit)
    }

    /// Orders two values of the same ordered type
    ///
    /// Only numbers and enumeration items are ordered.
    #[must_use]
    pub fn ordering(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(left), Self::Integer(right)) => Some(left.cmp(right)),
            (Self::Float(left), Self::Float(right)) => left.partial_cmp(right),
            (Self::Enumerated { number: left, .. }, Self::Enumerated { number: right, .. }) => {
                Some(left.cmp(right))
            }
            _ => None,
        }
    }
}

impl PartialEq for ConstValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(left), Self::Boolean(right)) => left == right,
            (Self::Integer(left), Self::Integer(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left == right,
            (Self::Charstring(left), Self::Charstring(right))
            | (Self::Octetstring(left), Self::Octetstring(right))
            | (Self::Bitstring(left), Self::Bitstring(right)) => left == right,
            (
                Self::Enumerated { name, number },
                Self::Enumerated {
                    name: other_name,
                    number: other_number,
                },
            ) => name == other_name && number == other_number,
            (Self::Record(left), Self::Record(right)) => left == right,
            (
                Self::Union { alternative, value },
                Self::Union {
                    alternative: other_alternative,
                    value: other_value,
                },
            ) => alternative == other_alternative && value == other_value,
            (Self::List(left), Self::List(right)) => left == right,
            (Self::SetOf(left), Self::SetOf(right)) => same_elements(left, right),
            (Self::Omit, Self::Omit) => true,
            _ => false,
        }
    }
}

/// Whether both slices hold the same elements the same number of times
fn same_elements(left: &[ConstValue], right: &[ConstValue]) -> bool {
    let mut unmatched: Vec<&ConstValue> = right.iter().collect();
    left.len() == right.len()
        && left.iter().all(|element| {
            unmatched
                .iter()
                .position(|candidate| *candidate == element)
                .map(|index| unmatched.swap_remove(index))
                .is_some()
        })
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::Charstring(value) => write!(f, "{value:?}"),
            Self::Octetstring(value) => write!(f, "'{value}'O"),
            Self::Bitstring(value) => write!(f, "'{value}'B"),
            Self::Enumerated { name, .. } => write!(f, "{name}"),
            Self::Record(fields) => {
                let fields = fields
                    .iter()
                    .map(|(name, value)| format!("{name} := {value}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{ {fields} }}")
            }
            Self::Union { alternative, value } => write!(f, "{{ {alternative} := {value} }}"),
            Self::List(elements) | Self::SetOf(elements) => {
                let elements = elements
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{ {elements} }}")
            }
            Self::Omit => write!(f, "omit"),
        }
    }
}

/// Reasons constant folding can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// A division or remainder with a zero divisor
    #[error("division by zero")]
    DivisionByZero,
    /// An integer result out of range
    #[error("integer overflow")]
    Overflow,
    /// The operands do not fit the operator; the type checker normally
    /// rejects these before folding
    #[error("operator `{0}` cannot be applied to these operands")]
    Unsupported(&'static str),
}

/// Folds a binary operation
///
/// # Errors
///
/// Returns an error on division by zero, integer overflow, or operands the
/// operator does not apply to.
pub fn binary(op: BinaryOp, left: &ConstValue, right: &ConstValue) -> Result<ConstValue, EvalError> {
    use ConstValue as V;

    let unsupported = || EvalError::Unsupported(op.symbol());

    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => match (left, right) {
            (V::Integer(l), V::Integer(r)) => integer_arithmetic(op, *l, *r).map(V::Integer),
            (V::Float(l), V::Float(r)) => float_arithmetic(op, *l, *r).map(V::Float),
            _ => Err(unsupported()),
        },
        BinaryOp::Mod | BinaryOp::Rem => match (left, right) {
            (V::Integer(_), V::Integer(0)) => Err(EvalError::DivisionByZero),
            (V::Integer(l), V::Integer(r)) => {
                let remainder = l.checked_rem(*r).ok_or(EvalError::Overflow)?;
                // `mod` takes the sign of the divisor, `rem` that of the dividend
                let needs_adjust = op == BinaryOp::Mod && remainder != 0 && (remainder < 0) != (*r < 0);
                Ok(V::Integer(if needs_adjust { remainder + r } else { remainder }))
            }
            _ => Err(unsupported()),
        },
        BinaryOp::Concat => match (left, right) {
            (V::Charstring(l), V::Charstring(r)) => Ok(V::Charstring(format!("{l}{r}"))),
            (V::Octetstring(l), V::Octetstring(r)) => Ok(V::Octetstring(format!("{l}{r}"))),
            (V::Bitstring(l), V::Bitstring(r)) => Ok(V::Bitstring(format!("{l}{r}"))),
            (V::List(l), V::List(r)) => Ok(V::List(l.iter().chain(r).cloned().collect())),
            (V::SetOf(l), V::SetOf(r)) => Ok(V::SetOf(l.iter().chain(r).cloned().collect())),
            _ => Err(unsupported()),
        },
        BinaryOp::Eq => Ok(V::Boolean(left == right)),
        BinaryOp::Ne => Ok(V::Boolean(left != right)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = left.ordering(right).ok_or_else(unsupported)?;
            let result = if op == BinaryOp::Lt {
                ordering.is_lt()
            } else if op == BinaryOp::Le {
                ordering.is_le()
            } else if op == BinaryOp::Gt {
                ordering.is_gt()
            } else {
                ordering.is_ge()
            };
            Ok(V::Boolean(result))
        }
        BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => match (left, right) {
            (V::Boolean(l), V::Boolean(r)) => Ok(V::Boolean(if op == BinaryOp::And {
                *l && *r
            } else if op == BinaryOp::Or {
                *l || *r
            } else {
                l ^ r
            })),
            _ => Err(unsupported()),
        },
    }
}

fn integer_arithmetic(op: BinaryOp, left: i64, right: i64) -> Result<i64, EvalError> {
    let result = if op == BinaryOp::Add {
        left.checked_add(right)
    } else if op == BinaryOp::Sub {
        left.checked_sub(right)
    } else if op == BinaryOp::Mul {
        left.checked_mul(right)
    } else if right == 0 {
        return Err(EvalError::DivisionByZero);
    } else {
        left.checked_div(right)
    };

    result.ok_or(EvalError::Overflow)
}

fn float_arithmetic(op: BinaryOp, left: f64, right: f64) -> Result<f64, EvalError> {
    if op == BinaryOp::Add {
        Ok(left + right)
    } else if op == BinaryOp::Sub {
        Ok(left - right)
    } else if op == BinaryOp::Mul {
        Ok(left * right)
    } else if right == 0.0 {
        Err(EvalError::DivisionByZero)
    } else {
        Ok(left / right)
    }
}

/// Folds a unary operation
///
/// # Errors
///
/// Returns an error on integer overflow or an operand the operator does not
/// apply to.
pub fn unary(op: UnaryOp, operand: &ConstValue) -> Result<ConstValue, EvalError> {
    match (op, operand) {
        (UnaryOp::Neg, ConstValue::Integer(value)) => value
            .checked_neg()
            .map(ConstValue::Integer)
            .ok_or(EvalError::Overflow),
        (UnaryOp::Neg, ConstValue::Float(value)) => Ok(ConstValue::Float(-value)),
        (UnaryOp::Not, ConstValue::Boolean(value)) => Ok(ConstValue::Boolean(!value)),
        _ => Err(EvalError::Unsupported(op.symbol())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i64) -> ConstValue {
        ConstValue::Integer(value)
    }

    #[test]
    fn integer_arithmetic_is_checked() {
        assert_eq!(binary(BinaryOp::Add, &int(2), &int(3)), Ok(int(5)));
        assert_eq!(binary(BinaryOp::Div, &int(7), &int(2)), Ok(int(3)));
        assert_eq!(binary(BinaryOp::Div, &int(-7), &int(2)), Ok(int(-3)));
        assert_eq!(
            binary(BinaryOp::Div, &int(1), &int(0)),
            Err(EvalError::DivisionByZero)
        );
        assert_eq!(
            binary(BinaryOp::Add, &int(i64::MAX), &int(1)),
            Err(EvalError::Overflow)
        );
        assert_eq!(unary(UnaryOp::Neg, &int(i64::MIN)), Err(EvalError::Overflow));
    }

    #[test]
    fn mod_follows_divisor_and_rem_follows_dividend() {
        assert_eq!(binary(BinaryOp::Mod, &int(-7), &int(3)), Ok(int(2)));
        assert_eq!(binary(BinaryOp::Rem, &int(-7), &int(3)), Ok(int(-1)));
        assert_eq!(binary(BinaryOp::Mod, &int(7), &int(-3)), Ok(int(-2)));
        assert_eq!(
            binary(BinaryOp::Mod, &int(7), &int(0)),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn float_division_by_zero_is_an_error() {
        assert_eq!(
            binary(BinaryOp::Div, &ConstValue::Float(1.0), &ConstValue::Float(0.0)),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn concatenation_and_comparison() {
        let hello = ConstValue::Charstring("hel".to_string());
        let lo = ConstValue::Charstring("lo".to_string());
        assert_eq!(
            binary(BinaryOp::Concat, &hello, &lo),
            Ok(ConstValue::Charstring("hello".to_string()))
        );

        assert_eq!(
            binary(BinaryOp::Lt, &int(1), &int(2)),
            Ok(ConstValue::Boolean(true))
        );
        assert_eq!(
            binary(BinaryOp::Lt, &hello, &lo),
            Err(EvalError::Unsupported("<"))
        );
        assert_eq!(
            binary(BinaryOp::Xor, &ConstValue::Boolean(true), &ConstValue::Boolean(true)),
            Ok(ConstValue::Boolean(false))
        );
    }

    #[test]
    fn set_of_values_compare_regardless_of_order() {
        let set = |elements: &[i64]| ConstValue::SetOf(elements.iter().copied().map(int).collect());
        let list = |elements: &[i64]| ConstValue::List(elements.iter().copied().map(int).collect());

        assert_eq!(
            binary(BinaryOp::Eq, &set(&[1, 2, 2]), &set(&[2, 1, 2])),
            Ok(ConstValue::Boolean(true))
        );
        assert_eq!(
            binary(BinaryOp::Eq, &set(&[1, 1, 2]), &set(&[1, 2, 2])),
            Ok(ConstValue::Boolean(false))
        );
        assert_eq!(
            binary(BinaryOp::Ne, &set(&[1, 2]), &set(&[2, 1, 3])),
            Ok(ConstValue::Boolean(true))
        );
        assert_eq!(
            binary(BinaryOp::Eq, &list(&[1, 2]), &list(&[2, 1])),
            Ok(ConstValue::Boolean(false))
        );

        let nested = |first: ConstValue, second: ConstValue| {
            ConstValue::Record(vec![("a".to_string(), first), ("b".to_string(), second)])
        };
        assert_eq!(
            nested(set(&[1, 2]), list(&[3, 4])),
            nested(set(&[2, 1]), list(&[3, 4]))
        );
        assert_ne!(
            nested(set(&[1, 2]), list(&[3, 4])),
            nested(set(&[1, 2]), list(&[4, 3]))
        );
    }
}
