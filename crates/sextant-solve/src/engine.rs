//! Solve & extract: the top-level entry points.
//!
//! Each call runs Build -> Check -> {Unsat, Sat -> Extract}. The z3
//! config, context, solver, and model are created inside the call and
//! dropped on every exit path; no state survives between calls, so
//! concurrent calls from independent threads are safe without locking.

use std::fmt;

use sextant_ir::expr::Expr;
use sextant_ir::types::{ParamDecl, ParamType};
use tracing::debug;
use z3::{Config, Context, Model, SatResult, Solver};

use crate::session::{SessionError, SolveSession};
use crate::term::Term;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The supported fragment is decidable, so an unknown verdict signals
    /// an environment or translator problem, not a legitimate outcome.
    #[error("solver returned an indeterminate result: {0}")]
    Indeterminate(String),
}

/// Outcome of one solve call. `NoModel` covers both an unsatisfiable
/// conjunction and the empty-parameter degenerate case; it is a valid
/// result, distinct from failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    /// One string-encoded literal per parameter, index-aligned with the
    /// declaration order.
    Vector(Vec<String>),
    NoModel,
}

impl Solution {
    pub fn vector(&self) -> Option<&[String]> {
        match self {
            Solution::Vector(v) => Some(v),
            Solution::NoModel => None,
        }
    }

    pub fn is_no_model(&self) -> bool {
        matches!(self, Solution::NoModel)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solution::Vector(values) => write!(f, "[{}]", values.join(", ")),
            Solution::NoModel => f.write_str("no model"),
        }
    }
}

/// Solve the conjunction of `conditions` over `params` and extract one
/// input vector.
///
/// Returns `Solution::NoModel` when the conjunction is unsatisfiable or
/// the parameter list is empty. Errors indicate translator or solver
/// defects, never expected limitations.
pub fn get_model(params: &[ParamDecl], conditions: &[Expr]) -> Result<Solution, EngineError> {
    if params.is_empty() {
        return Ok(Solution::NoModel);
    }

    let cfg = Config::new();
    let ctx = Context::new(&cfg);

    let session = SolveSession::new(&ctx, params)?;
    let constraints = session.assemble(conditions)?;

    let solver = Solver::new(&ctx);
    for constraint in &constraints {
        solver.assert(constraint);
    }

    match solver.check() {
        SatResult::Unsat => {
            debug!(conditions = conditions.len(), "conjunction is unsatisfiable");
            Ok(Solution::NoModel)
        }
        SatResult::Unknown => Err(EngineError::Indeterminate(
            solver
                .get_reason_unknown()
                .unwrap_or_else(|| "no reason given".to_string()),
        )),
        SatResult::Sat => {
            let model = solver
                .get_model()
                .ok_or_else(|| EngineError::Indeterminate("sat verdict without a model".into()))?;
            Ok(Solution::Vector(extract_vector(&session, &model)))
        }
    }
}

/// Best-effort variant of [`get_model`]: collapses any hard failure into
/// `Solution::NoModel` for callers that cannot handle errors.
pub fn try_get_model(params: &[ParamDecl], conditions: &[Expr]) -> Solution {
    match get_model(params, conditions) {
        Ok(solution) => solution,
        Err(err) => {
            debug!(%err, "solve failed; reporting no model");
            Solution::NoModel
        }
    }
}

/// Project the model onto each parameter, in declaration order.
///
/// Parameters the model leaves unconstrained get their type's semantic
/// default rather than an arbitrary solver-chosen witness, so output is
/// reproducible. Integer values are clamped into the declared width's
/// range. Extraction never fails.
fn extract_vector(session: &SolveSession<'_>, model: &Model<'_>) -> Vec<String> {
    session
        .params()
        .iter()
        .zip(session.constants())
        .map(|(decl, constant)| extract_one(decl.ty, constant, model))
        .collect()
}

fn extract_one(ty: ParamType, constant: &Term<'_>, model: &Model<'_>) -> String {
    match (ty, constant) {
        (ParamType::Bool, Term::Bool(b)) => model
            .eval(b, false)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
            .to_string(),

        (_, Term::Int(i)) => match model.eval(i, false) {
            None => "0".to_string(),
            Some(v) => match v.as_i64() {
                Some(n) => clamp(ty, n as i128).to_string(),
                // Either the constant came back unchanged (unconstrained)
                // or the numeral does not fit in i64.
                None if v == *i => "0".to_string(),
                None => clamp_numeral_text(ty, &v.to_string()).to_string(),
            },
        },

        // The array constant is a placeholder domain; no condition can
        // meaningfully constrain it.
        (ParamType::StringArray, _) => "[]".to_string(),

        // Sort and declared type always agree by construction.
        (_, other) => {
            debug!(%ty, sort = other.sort_name(), "declared type and term sort disagree");
            "0".to_string()
        }
    }
}

/// Clamp an unbounded model value into the declared width's range,
/// substituting the nearer bound when exceeded.
fn clamp(ty: ParamType, value: i128) -> i64 {
    value.clamp(ty.min_value() as i128, ty.max_value() as i128) as i64
}

/// Clamp a numeral whose magnitude exceeds i64, recovered from its text
/// form (`"123"` or `"(- 123)"`).
fn clamp_numeral_text(ty: ParamType, text: &str) -> i64 {
    let negative = text.contains('-');
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.parse::<i128>() {
        Ok(magnitude) => clamp(ty, if negative { -magnitude } else { magnitude }),
        // Beyond i128 the nearer bound is decided by the sign alone.
        Err(_) => {
            if negative {
                ty.min_value()
            } else {
                ty.max_value()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_within_range_is_identity() {
        assert_eq!(clamp(ParamType::Byte, 200), 200);
        assert_eq!(clamp(ParamType::Int, -5), -5);
    }

    #[test]
    fn test_clamp_substitutes_nearer_bound() {
        assert_eq!(clamp(ParamType::Byte, 1001), 255);
        assert_eq!(clamp(ParamType::Byte, -1), 0);
        assert_eq!(clamp(ParamType::Short, 40_000), 32_767);
        assert_eq!(clamp(ParamType::Int, i64::MIN as i128), i32::MIN as i64);
        assert_eq!(clamp(ParamType::Long, i128::MAX), i64::MAX);
    }

    #[test]
    fn test_clamp_numeral_text() {
        assert_eq!(clamp_numeral_text(ParamType::Long, "9223372036854775808"), i64::MAX);
        assert_eq!(clamp_numeral_text(ParamType::Long, "(- 9223372036854775809)"), i64::MIN);
        assert_eq!(clamp_numeral_text(ParamType::Byte, "300"), 255);
        // A numeral too large even for i128 clamps by sign.
        let huge = "9".repeat(60);
        assert_eq!(clamp_numeral_text(ParamType::Long, &huge), i64::MAX);
        assert_eq!(clamp_numeral_text(ParamType::Long, &format!("(- {huge})")), i64::MIN);
    }
}
