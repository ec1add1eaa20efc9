//! Expression-to-term translation.
//!
//! Compiles one path-condition AST node into a solver term, given the
//! declared parameters of the enclosing call. The translator distinguishes
//! two failure kinds and never conflates them:
//!
//! - [`TranslateError::Unsupported`] — an expression the fragment
//!   deliberately excludes (unbound identifier, invocation, sort-mismatched
//!   operator application). The caller may recover from these.
//! - [`TranslateError::Internal`] — an expression shape the translator
//!   should understand but does not (string literal in the arithmetic
//!   fragment, unknown member access). These indicate a defect and must
//!   propagate.

use sextant_ir::expr::{BinaryOp, Expr, Literal, UnaryOp};
use sextant_ir::types::{ParamDecl, ParamType};
use z3::ast::{Array, Ast, Bool, Int, String as ZString};
use z3::{Context, Sort};

use crate::term::Term;

#[derive(Debug, Clone, thiserror::Error)]
pub enum TranslateError {
    /// The expression lies outside the translatable fragment.
    #[error("expression not translatable: {0}")]
    Unsupported(String),

    /// The translator hit a shape it does not understand. A defect, not a
    /// limitation.
    #[error("translator defect: {0}")]
    Internal(String),
}

/// Translate one expression into a solver term.
///
/// Identifiers bind to symbolic constants named after the matching
/// parameter; the constants coincide with the ones the session declares
/// for the same parameters.
pub fn translate<'ctx>(
    ctx: &'ctx Context,
    expr: &Expr,
    params: &[ParamDecl],
) -> Result<Term<'ctx>, TranslateError> {
    match expr {
        Expr::Ident(name) => bind_ident(ctx, name, params),

        Expr::Literal(lit) => literal_term(ctx, lit),

        Expr::Unary { op, operand } => {
            let operand = translate(ctx, operand, params)?;
            match (op, operand) {
                (UnaryOp::Not, Term::Bool(b)) => Ok(Term::Bool(b.not())),
                (UnaryOp::Neg, Term::Int(i)) => Ok(Term::Int(i.unary_minus())),
                (UnaryOp::Not, other) => Err(TranslateError::Unsupported(format!(
                    "logical negation needs a bool operand, got {}",
                    other.sort_name()
                ))),
                (UnaryOp::Neg, other) => Err(TranslateError::Unsupported(format!(
                    "arithmetic negation needs an integer operand, got {}",
                    other.sort_name()
                ))),
            }
        }

        Expr::Binary { op, lhs, rhs } => {
            let lhs = translate(ctx, lhs, params)?;
            let rhs = translate(ctx, rhs, params)?;
            binary_term(ctx, *op, lhs, rhs)
        }

        // Parenthesization is transparent.
        Expr::Paren(inner) => translate(ctx, inner, params),

        // Casts are transparent at translation time: every integer width
        // shares the unbounded integer sort, so the cast target changes
        // nothing here. Width is enforced at extraction.
        Expr::Cast { operand, .. } => translate(ctx, operand, params),

        Expr::Member { base, member } => member_constant(ctx, base, member),

        // Arbitrary call semantics are outside the decidable fragment.
        Expr::Invoke { callee, .. } => Err(TranslateError::Unsupported(format!(
            "invocation of '{callee}' cannot be translated"
        ))),
    }
}

/// Build the symbolic constant standing in for one parameter.
///
/// Bool maps to the boolean sort, every integer width to the unbounded
/// integer sort (the declared width is enforced at extraction, not here),
/// and `string[]` to a placeholder constant array mapping every key to the
/// empty string.
pub(crate) fn symbolic_const<'ctx>(
    ctx: &'ctx Context,
    decl: &ParamDecl,
) -> Result<Term<'ctx>, TranslateError> {
    match decl.ty {
        ParamType::Bool => Ok(Term::Bool(Bool::new_const(ctx, decl.name.as_str()))),
        ParamType::Byte | ParamType::Short | ParamType::Int | ParamType::Long => {
            Ok(Term::Int(Int::new_const(ctx, decl.name.as_str())))
        }
        ParamType::StringArray => {
            let empty = ZString::from_str(ctx, "").map_err(|e| {
                TranslateError::Internal(format!("cannot build empty string term: {e}"))
            })?;
            Ok(Term::Array(Array::const_array(
                ctx,
                &Sort::string(ctx),
                &empty,
            )))
        }
    }
}

fn bind_ident<'ctx>(
    ctx: &'ctx Context,
    name: &str,
    params: &[ParamDecl],
) -> Result<Term<'ctx>, TranslateError> {
    let mut matches = params.iter().filter(|p| p.name == name);
    let decl = match (matches.next(), matches.next()) {
        (Some(decl), None) => decl,
        (None, _) => {
            // May legitimately reference something outside the fragment.
            return Err(TranslateError::Unsupported(format!(
                "identifier '{name}' does not name a parameter"
            )));
        }
        (Some(_), Some(_)) => {
            return Err(TranslateError::Unsupported(format!(
                "identifier '{name}' matches more than one parameter"
            )));
        }
    };
    symbolic_const(ctx, decl)
}

fn literal_term<'ctx>(ctx: &'ctx Context, lit: &Literal) -> Result<Term<'ctx>, TranslateError> {
    match lit {
        Literal::Bool(b) => Ok(Term::Bool(Bool::from_bool(ctx, *b))),
        Literal::Byte(v) => Ok(Term::Int(Int::from_i64(ctx, *v as i64))),
        Literal::Short(v) => Ok(Term::Int(Int::from_i64(ctx, *v as i64))),
        Literal::Int(v) => Ok(Term::Int(Int::from_i64(ctx, *v as i64))),
        Literal::Long(v) => Ok(Term::Int(Int::from_i64(ctx, *v))),
        Literal::Str(s) => Err(TranslateError::Internal(format!(
            "string literal \"{s}\" has no translation in this fragment"
        ))),
    }
}

fn binary_term<'ctx>(
    ctx: &'ctx Context,
    op: BinaryOp,
    lhs: Term<'ctx>,
    rhs: Term<'ctx>,
) -> Result<Term<'ctx>, TranslateError> {
    match op {
        BinaryOp::Add => {
            let (a, b) = int_operands(op, lhs, rhs)?;
            Ok(Term::Int(Int::add(ctx, &[&a, &b])))
        }
        BinaryOp::Sub => {
            let (a, b) = int_operands(op, lhs, rhs)?;
            Ok(Term::Int(Int::sub(ctx, &[&a, &b])))
        }
        BinaryOp::Mul => {
            let (a, b) = int_operands(op, lhs, rhs)?;
            Ok(Term::Int(Int::mul(ctx, &[&a, &b])))
        }
        BinaryOp::Div => {
            let (a, b) = int_operands(op, lhs, rhs)?;
            Ok(Term::Int(div_trunc(ctx, &a, &b)))
        }
        BinaryOp::Mod => {
            let (a, b) = int_operands(op, lhs, rhs)?;
            Ok(Term::Int(rem_trunc(ctx, &a, &b)))
        }
        BinaryOp::Gt => {
            let (a, b) = int_operands(op, lhs, rhs)?;
            Ok(Term::Bool(a.gt(&b)))
        }
        BinaryOp::Lt => {
            let (a, b) = int_operands(op, lhs, rhs)?;
            Ok(Term::Bool(a.lt(&b)))
        }
        BinaryOp::Ge => {
            let (a, b) = int_operands(op, lhs, rhs)?;
            Ok(Term::Bool(a.ge(&b)))
        }
        BinaryOp::Le => {
            let (a, b) = int_operands(op, lhs, rhs)?;
            Ok(Term::Bool(a.le(&b)))
        }

        // Equality is polymorphic over any two same-sorted terms.
        BinaryOp::Eq => Ok(Term::Bool(equality(op, lhs, rhs)?)),
        BinaryOp::Ne => Ok(Term::Bool(equality(op, lhs, rhs)?.not())),

        BinaryOp::And => {
            let (a, b) = bool_operands(op, lhs, rhs)?;
            Ok(Term::Bool(Bool::and(ctx, &[&a, &b])))
        }
        BinaryOp::Or => {
            let (a, b) = bool_operands(op, lhs, rhs)?;
            Ok(Term::Bool(Bool::or(ctx, &[&a, &b])))
        }
    }
}

fn int_operands<'ctx>(
    op: BinaryOp,
    lhs: Term<'ctx>,
    rhs: Term<'ctx>,
) -> Result<(Int<'ctx>, Int<'ctx>), TranslateError> {
    match (lhs, rhs) {
        (Term::Int(a), Term::Int(b)) => Ok((a, b)),
        (a, b) => Err(TranslateError::Unsupported(format!(
            "operator {op:?} needs integer operands, got {} and {}",
            a.sort_name(),
            b.sort_name()
        ))),
    }
}

fn bool_operands<'ctx>(
    op: BinaryOp,
    lhs: Term<'ctx>,
    rhs: Term<'ctx>,
) -> Result<(Bool<'ctx>, Bool<'ctx>), TranslateError> {
    match (lhs, rhs) {
        (Term::Bool(a), Term::Bool(b)) => Ok((a, b)),
        (a, b) => Err(TranslateError::Unsupported(format!(
            "operator {op:?} needs bool operands, got {} and {}",
            a.sort_name(),
            b.sort_name()
        ))),
    }
}

fn equality<'ctx>(
    op: BinaryOp,
    lhs: Term<'ctx>,
    rhs: Term<'ctx>,
) -> Result<Bool<'ctx>, TranslateError> {
    match (lhs, rhs) {
        (Term::Bool(a), Term::Bool(b)) => Ok(a._eq(&b)),
        (Term::Int(a), Term::Int(b)) => Ok(a._eq(&b)),
        (Term::Array(a), Term::Array(b)) => Ok(a._eq(&b)),
        (a, b) => Err(TranslateError::Unsupported(format!(
            "operator {op:?} cannot compare {} with {}",
            a.sort_name(),
            b.sort_name()
        ))),
    }
}

/// Truncating division: the quotient rounds toward zero.
///
/// SMT-LIB integer `div` is Euclidean (the remainder is never negative),
/// which differs from two's-complement hardware division whenever the
/// dividend is negative and the division is inexact. In that case the
/// Euclidean quotient is one step further from zero, so it is nudged back:
/// by +1 for a positive divisor, by -1 for a negative one.
fn div_trunc<'ctx>(ctx: &'ctx Context, a: &Int<'ctx>, b: &Int<'ctx>) -> Int<'ctx> {
    let zero = Int::from_i64(ctx, 0);
    let one = Int::from_i64(ctx, 1);
    let e_div = a.div(b);
    let exact = a.modulo(b)._eq(&zero);
    let step = b.gt(&zero).ite(&one, &one.unary_minus());
    let adjusted = Int::add(ctx, &[&e_div, &step]);
    a.ge(&zero)
        .ite(&e_div, &exact.ite(&e_div, &adjusted))
}

/// Truncating remainder: the sign follows the dividend.
///
/// Rederived from the truncating quotient so that
/// `a == b * div_trunc(a, b) + rem_trunc(a, b)` holds for every model.
fn rem_trunc<'ctx>(ctx: &'ctx Context, a: &Int<'ctx>, b: &Int<'ctx>) -> Int<'ctx> {
    let q = div_trunc(ctx, a, b);
    let prod = Int::mul(ctx, &[b, &q]);
    Int::sub(ctx, &[a, &prod])
}

fn member_constant<'ctx>(
    ctx: &'ctx Context,
    base: &str,
    member: &str,
) -> Result<Term<'ctx>, TranslateError> {
    let ty = match base {
        "byte" => ParamType::Byte,
        "short" => ParamType::Short,
        "int" => ParamType::Int,
        "long" => ParamType::Long,
        other => {
            return Err(TranslateError::Internal(format!(
                "member access on '{other}' is not understood"
            )))
        }
    };
    let value = match member {
        "MaxValue" => ty.max_value(),
        "MinValue" => ty.min_value(),
        other => {
            return Err(TranslateError::Internal(format!(
                "member '{base}.{other}' is not understood"
            )))
        }
    };
    Ok(Term::Int(Int::from_i64(ctx, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use z3::Config;

    fn int_params() -> Vec<ParamDecl> {
        vec![
            ParamDecl::new("x", ParamType::Int),
            ParamDecl::new("flag", ParamType::Bool),
        ]
    }

    fn parse(json: serde_json::Value) -> Expr {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_ident_binds_to_declared_sort() {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let params = int_params();

        let term = translate(&ctx, &parse(serde_json::json!("x")), &params).unwrap();
        assert!(matches!(term, Term::Int(_)));

        let term = translate(&ctx, &parse(serde_json::json!("flag")), &params).unwrap();
        assert!(matches!(term, Term::Bool(_)));
    }

    #[test]
    fn test_unbound_ident_is_unsupported() {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let err = translate(&ctx, &parse(serde_json::json!("ghost")), &int_params()).unwrap_err();
        assert!(matches!(err, TranslateError::Unsupported(_)));
    }

    #[test]
    fn test_duplicate_ident_is_unsupported() {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let params = vec![
            ParamDecl::new("x", ParamType::Int),
            ParamDecl::new("x", ParamType::Long),
        ];
        let err = translate(&ctx, &parse(serde_json::json!("x")), &params).unwrap_err();
        assert!(matches!(err, TranslateError::Unsupported(_)));
    }

    #[test]
    fn test_invocation_is_unsupported() {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let expr = parse(serde_json::json!(["call", "f", "x"]));
        let err = translate(&ctx, &expr, &int_params()).unwrap_err();
        assert!(matches!(err, TranslateError::Unsupported(_)));
    }

    #[test]
    fn test_sort_mismatch_is_unsupported_not_internal() {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);

        // bool compared with an integer via a relational operator
        let expr = parse(serde_json::json!(["gt", "flag", 1]));
        let err = translate(&ctx, &expr, &int_params()).unwrap_err();
        assert!(matches!(err, TranslateError::Unsupported(_)));

        // equality across sorts
        let expr = parse(serde_json::json!(["eq", "flag", "x"]));
        let err = translate(&ctx, &expr, &int_params()).unwrap_err();
        assert!(matches!(err, TranslateError::Unsupported(_)));

        // logical negation of an integer
        let expr = parse(serde_json::json!(["not", "x"]));
        let err = translate(&ctx, &expr, &int_params()).unwrap_err();
        assert!(matches!(err, TranslateError::Unsupported(_)));
    }

    #[test]
    fn test_numeric_literals_of_every_width_translate() {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let params = int_params();
        for json in [
            serde_json::json!(["byte", 200]),
            serde_json::json!(["short", -3]),
            serde_json::json!(42),
            serde_json::json!(["long", 4_000_000_000i64]),
        ] {
            let term = translate(&ctx, &parse(json.clone()), &params).unwrap();
            assert!(matches!(term, Term::Int(_)), "{json}");
        }

        let term = translate(&ctx, &parse(serde_json::json!(true)), &params).unwrap();
        assert!(matches!(term, Term::Bool(_)));
    }

    #[test]
    fn test_string_literal_is_internal() {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let expr = parse(serde_json::json!(["eq", "x", ["str", "hi"]]));
        let err = translate(&ctx, &expr, &int_params()).unwrap_err();
        assert!(matches!(err, TranslateError::Internal(_)));
    }

    #[test]
    fn test_unknown_member_is_internal() {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);

        let expr = parse(serde_json::json!(["member", "int", "Size"]));
        let err = translate(&ctx, &expr, &int_params()).unwrap_err();
        assert!(matches!(err, TranslateError::Internal(_)));

        let expr = parse(serde_json::json!(["member", "bool", "MaxValue"]));
        let err = translate(&ctx, &expr, &int_params()).unwrap_err();
        assert!(matches!(err, TranslateError::Internal(_)));
    }

    #[test]
    fn test_member_bounds_are_integer_terms() {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        for (base, member) in [
            ("byte", "MinValue"),
            ("byte", "MaxValue"),
            ("short", "MinValue"),
            ("int", "MaxValue"),
            ("long", "MinValue"),
        ] {
            let expr = parse(serde_json::json!(["member", base, member]));
            let term = translate(&ctx, &expr, &int_params()).unwrap();
            assert!(matches!(term, Term::Int(_)), "{base}.{member}");
        }
    }

    #[test]
    fn test_paren_and_cast_are_transparent() {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let params = int_params();

        let plain = translate(&ctx, &parse(serde_json::json!(["gt", "x", 0])), &params).unwrap();
        let wrapped = translate(
            &ctx,
            &parse(serde_json::json!(["paren", ["gt", ["cast", "byte", "x"], 0]])),
            &params,
        )
        .unwrap();

        let (plain, wrapped) = (plain.as_bool().unwrap().clone(), wrapped.as_bool().unwrap().clone());
        assert_eq!(plain, wrapped);
    }
}
