//! Path-condition expression AST.
//!
//! Conditions arrive from the front-end in a compact JSON array encoding:
//! `["op", ...args]` for operators, bare strings for identifiers, bare
//! numbers/booleans for literals. Examples:
//!
//! - `["gt", "x", 0]` — `x > 0`
//! - `["and", ["ge", "x", 1], ["ne", "y", "x"]]`
//! - `["cast", "byte", "x"]` — a narrowing read of `x`
//! - `["member", "int", "MaxValue"]` — the predefined constant
//! - `["call", "f", "x"]` — an invocation (never translatable)
//!
//! Symbolic operator spellings (`">"`, `"&&"`, ...) are accepted as aliases
//! for the word tags.

use serde::{Deserialize, Serialize};

use crate::types::ParamType;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// Reference to an enclosing parameter by name.
    Ident(String),
    Literal(Literal),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Explicit parenthesization; semantically transparent.
    Paren(Box<Expr>),
    /// Cast to a declared type; transparent at translation time.
    Cast {
        target: ParamType,
        operand: Box<Expr>,
    },
    /// Member access, e.g. `int.MaxValue`.
    Member {
        base: String,
        member: String,
    },
    /// Function invocation; outside the translatable fragment.
    Invoke {
        callee: String,
        args: Vec<Expr>,
    },
}

/// Literal values, each carrying its own declared storage width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Bool(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Str(String),
}

impl Literal {
    /// Numeric value of the literal, if it has one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Literal::Byte(v) => Some(*v as i64),
            Literal::Short(v) => Some(*v as i64),
            Literal::Int(v) => Some(*v as i64),
            Literal::Long(v) => Some(*v),
            Literal::Bool(_) | Literal::Str(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// Logical negation (`!`), boolean operand.
    Not,
    /// Arithmetic negation (unary `-`), integer operand.
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    And,
    Or,
}

impl<'de> Deserialize<'de> for Expr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        parse_expr(&value).map_err(serde::de::Error::custom)
    }
}

fn parse_expr(value: &serde_json::Value) -> Result<Expr, String> {
    match value {
        serde_json::Value::Bool(b) => Ok(Expr::Literal(Literal::Bool(*b))),

        // Bare numbers default to the narrowest of int/long that fits.
        serde_json::Value::Number(n) => {
            let i = n
                .as_i64()
                .ok_or_else(|| format!("unsupported number: {n}"))?;
            let lit = match i32::try_from(i) {
                Ok(v) => Literal::Int(v),
                Err(_) => Literal::Long(i),
            };
            Ok(Expr::Literal(lit))
        }

        // Bare strings are identifiers; string literals use ["str", ...].
        serde_json::Value::String(s) => Ok(Expr::Ident(s.clone())),

        serde_json::Value::Array(arr) => {
            if arr.is_empty() {
                return Err("empty expression array".to_string());
            }
            let tag = arr[0].as_str().ok_or_else(|| {
                format!(
                    "first element of expression array must be a string, got: {:?}",
                    arr[0]
                )
            })?;
            parse_tagged(tag, &arr[1..])
        }

        other => Err(format!("unsupported expression value: {other}")),
    }
}

fn parse_tagged(tag: &str, args: &[serde_json::Value]) -> Result<Expr, String> {
    match tag {
        // String literal: ["str", text]
        "str" => {
            let [text] = args else {
                return Err(format!("str literal requires 1 argument, got {}", args.len()));
            };
            let s = text.as_str().ok_or("str literal argument must be a string")?;
            Ok(Expr::Literal(Literal::Str(s.to_string())))
        }

        // Width-typed numeric literals: ["byte", 200], ["long", 1], ...
        "byte" | "short" | "int" | "long" => {
            let [num] = args else {
                return Err(format!("{tag} literal requires 1 argument, got {}", args.len()));
            };
            let i = num
                .as_i64()
                .ok_or_else(|| format!("{tag} literal argument must be an integer"))?;
            let lit = match tag {
                "byte" => Literal::Byte(
                    u8::try_from(i).map_err(|_| format!("{i} out of byte range"))?,
                ),
                "short" => Literal::Short(
                    i16::try_from(i).map_err(|_| format!("{i} out of short range"))?,
                ),
                "int" => Literal::Int(
                    i32::try_from(i).map_err(|_| format!("{i} out of int range"))?,
                ),
                "long" => Literal::Long(i),
                _ => unreachable!(),
            };
            Ok(Expr::Literal(lit))
        }

        // Parenthesization: ["paren", expr]
        "paren" => {
            let [inner] = args else {
                return Err(format!("paren requires 1 argument, got {}", args.len()));
            };
            Ok(Expr::Paren(Box::new(parse_expr(inner)?)))
        }

        // Cast: ["cast", type_name, expr]
        "cast" => {
            let [ty, inner] = args else {
                return Err(format!("cast requires 2 arguments, got {}", args.len()));
            };
            let target: ParamType = serde_json::from_value(ty.clone())
                .map_err(|e| format!("invalid cast target: {e}"))?;
            Ok(Expr::Cast {
                target,
                operand: Box::new(parse_expr(inner)?),
            })
        }

        // Member access: ["member", base, member]
        "member" => {
            let [base, member] = args else {
                return Err(format!("member requires 2 arguments, got {}", args.len()));
            };
            let base = base.as_str().ok_or("member base must be a string")?;
            let member = member.as_str().ok_or("member name must be a string")?;
            Ok(Expr::Member {
                base: base.to_string(),
                member: member.to_string(),
            })
        }

        // Invocation: ["call", name, ...args]
        "call" => {
            if args.is_empty() {
                return Err("call requires at least a callee name".to_string());
            }
            let callee = args[0].as_str().ok_or("callee must be a string")?;
            let call_args = args[1..]
                .iter()
                .map(parse_expr)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::Invoke {
                callee: callee.to_string(),
                args: call_args,
            })
        }

        // Unary operators.
        "not" | "!" => parse_unary(UnaryOp::Not, tag, args),
        "neg" => parse_unary(UnaryOp::Neg, tag, args),

        // "-" is subtraction with two arguments, negation with one.
        "-" if args.len() == 1 => parse_unary(UnaryOp::Neg, tag, args),

        // Binary operators, word tags and symbolic aliases.
        _ => {
            let op = match tag {
                "add" | "+" => BinaryOp::Add,
                "sub" | "-" => BinaryOp::Sub,
                "mul" | "*" => BinaryOp::Mul,
                "div" | "/" => BinaryOp::Div,
                "mod" | "%" => BinaryOp::Mod,
                "gt" | ">" => BinaryOp::Gt,
                "lt" | "<" => BinaryOp::Lt,
                "ge" | ">=" => BinaryOp::Ge,
                "le" | "<=" => BinaryOp::Le,
                "eq" | "==" => BinaryOp::Eq,
                "ne" | "!=" => BinaryOp::Ne,
                "and" | "&&" => BinaryOp::And,
                "or" | "||" => BinaryOp::Or,
                other => return Err(format!("unknown expression operator: {other}")),
            };
            let [lhs, rhs] = args else {
                return Err(format!("{tag} requires 2 arguments, got {}", args.len()));
            };
            Ok(Expr::Binary {
                op,
                lhs: Box::new(parse_expr(lhs)?),
                rhs: Box::new(parse_expr(rhs)?),
            })
        }
    }
}

fn parse_unary(op: UnaryOp, tag: &str, args: &[serde_json::Value]) -> Result<Expr, String> {
    let [operand] = args else {
        return Err(format!("{tag} requires 1 argument, got {}", args.len()));
    };
    Ok(Expr::Unary {
        op,
        operand: Box::new(parse_expr(operand)?),
    })
}
