use rand::Rng;
use thiserror::Error;

use crate::term::{Kind, Node, Term};

#[derive(PartialEq, Clone, Debug)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Triple(Box<Value>, Box<Value>, Box<Value>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Number(_) => Kind::Number,
            Value::Bool(_) => Kind::Bool,
            Value::Triple(..) => Kind::Triple,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(v) => f.write_fmt(format_args!("{v}")),
            Value::Bool(v) => f.write_fmt(format_args!("{v}")),
            Value::Triple(a, b, c) => f.write_fmt(format_args!("(triple {a} {b} {c})")),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, derive_more::Display, Debug)]
pub enum Func {
    #[display(fmt = "sin")]
    Sin,
    #[display(fmt = "cos")]
    Cos,
    #[display(fmt = "exp")]
    Exp,
    #[display(fmt = "log")]
    Log,
    #[display(fmt = "log2")]
    Log2,
    #[display(fmt = "log10")]
    Log10,
    #[display(fmt = "log1p")]
    Log1p,
    #[display(fmt = "sqrt")]
    Sqrt,
}

impl Func {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "exp" => Func::Exp,
            "log" => Func::Log,
            "log2" => Func::Log2,
            "log10" => Func::Log10,
            "log1p" => Func::Log1p,
            "sqrt" => Func::Sqrt,
            _ => return None,
        })
    }

    /// Domain errors come back as NaN or infinities.
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Exp => v.exp(),
            Func::Log => v.ln(),
            Func::Log2 => v.log2(),
            Func::Log10 => v.log10(),
            Func::Log1p => v.ln_1p(),
            Func::Sqrt => v.sqrt(),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, derive_more::Display, Debug)]
pub enum Operator {
    #[display(fmt = "add")]
    Add,
    #[display(fmt = "sub")]
    Sub,
    #[display(fmt = "mul")]
    Mul,
    #[display(fmt = "div")]
    Div,
    #[display(fmt = "mod")]
    Mod,
    #[display(fmt = "gt")]
    Gt,
    #[display(fmt = "gte")]
    Gte,
    #[display(fmt = "lt")]
    Lt,
    #[display(fmt = "lte")]
    Lte,
}

impl Operator {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "add" | "+" => Operator::Add,
            "sub" | "-" => Operator::Sub,
            "mul" | "*" => Operator::Mul,
            "div" | "/" => Operator::Div,
            "mod" | "%" => Operator::Mod,
            "gt" | ">" => Operator::Gt,
            "gte" | ">=" => Operator::Gte,
            "lt" | "<" => Operator::Lt,
            "lte" | "<=" => Operator::Lte,
            _ => return None,
        })
    }

    /// `add` and `sub` halve their result so that combining values in
    /// [-1, 1] stays in [-1, 1].
    pub fn apply(self, a: f64, b: f64) -> Value {
        match self {
            Operator::Add => Value::Number((a + b) / 2.0),
            Operator::Sub => Value::Number((a - b) / 2.0),
            Operator::Mul => Value::Number(a * b),
            Operator::Div => Value::Number(a / b),
            Operator::Mod => Value::Number(a % b),
            Operator::Gt => Value::Bool(a > b),
            Operator::Gte => Value::Bool(a >= b),
            Operator::Lt => Value::Bool(a < b),
            Operator::Lte => Value::Bool(a <= b),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, derive_more::Display, Debug)]
pub enum Operand {
    #[display(fmt = "argument")]
    Argument,
    #[display(fmt = "left operand")]
    Lhs,
    #[display(fmt = "right operand")]
    Rhs,
}

#[derive(PartialEq, Debug, Error)]
pub enum EvalError {
    #[error("Unknown symbol `{0}`")]
    UnknownSymbol(String),
    #[error("Unknown function `{0}/1`")]
    UnknownFunction(String),
    #[error("Unknown operator `{0}`")]
    UnknownOperator(String),
    #[error("`{callee}` expects a Number as its {operand}, but got a {found}")]
    NotANumber {
        callee: String,
        operand: Operand,
        found: Kind,
    },
    #[error("Condition must evaluate to a Bool, but got a {0}")]
    NonBoolCondition(Kind),
}
pub type Result<T> = std::result::Result<T, EvalError>;

fn number(callee: &str, operand: Operand, value: Value) -> Result<f64> {
    value.as_number().ok_or_else(|| EvalError::NotANumber {
        callee: callee.to_string(),
        operand,
        found: value.kind(),
    })
}

/// Evaluates `term` at `(x, y)`. Every `rnd` that gets evaluated draws a
/// fresh number from `rng`; branches that are not taken draw nothing.
pub fn evaluate<R: Rng + ?Sized>(rng: &mut R, x: f64, y: f64, term: &Term) -> Result<Value> {
    Ok(match term {
        Node::Number(v) => Value::Number(*v),
        Node::Bool(v) => Value::Bool(*v),
        Node::Symbol(name) => match name.as_str() {
            "x" => Value::Number(x),
            "y" => Value::Number(y),
            "rnd" => Value::Number(rng.gen::<f64>() * 2.0 - 1.0),
            _ => return Err(EvalError::UnknownSymbol(name.to_string())),
        },
        Node::Triple(a, b, c) => {
            let a = evaluate(rng, x, y, a)?;
            let b = evaluate(rng, x, y, b)?;
            let c = evaluate(rng, x, y, c)?;
            Value::Triple(a.into(), b.into(), c.into())
        }
        Node::Call(name, arg) => {
            let func =
                Func::from_name(name).ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
            let arg = number(name, Operand::Argument, evaluate(rng, x, y, arg)?)?;
            Value::Number(func.apply(arg))
        }
        Node::BinOp(op, lhs, rhs) => {
            let operator =
                Operator::from_name(op).ok_or_else(|| EvalError::UnknownOperator(op.to_string()))?;
            let lhs = number(op, Operand::Lhs, evaluate(rng, x, y, lhs)?)?;
            let rhs = number(op, Operand::Rhs, evaluate(rng, x, y, rhs)?)?;
            operator.apply(lhs, rhs)
        }
        Node::If {
            cond,
            positive,
            negative,
        } => match evaluate(rng, x, y, cond)? {
            Value::Bool(true) => evaluate(rng, x, y, positive)?,
            Value::Bool(false) => evaluate(rng, x, y, negative)?,
            other => return Err(EvalError::NonBoolCondition(other.kind())),
        },
        Node::Rule(rule) => match *rule {},
    })
}
