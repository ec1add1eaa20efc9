//! Per-call constraint assembly.
//!
//! A [`SolveSession`] owns everything one call needs: the symbolic constant
//! standing in for each parameter and the boolean constraints assembled
//! from the path conditions. Sessions borrow the solving context created by
//! the engine and are dropped with it at the end of the call, so nothing is
//! shared between calls.

use sextant_ir::expr::Expr;
use sextant_ir::types::ParamDecl;
use tracing::debug;
use z3::ast::Bool;
use z3::Context;

use crate::term::Term;
use crate::translate::{symbolic_const, translate, TranslateError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A parameter's symbolic representation cannot be skipped, so any
    /// translation failure here is fatal to the call.
    #[error("cannot build symbolic constant for parameter '{name}': {source}")]
    Parameter {
        name: String,
        source: TranslateError,
    },

    /// A translator defect while processing one condition. Unlike an
    /// unsupported condition, this is never recovered by substitution.
    #[error("condition {index} hit a translator defect: {source}")]
    Condition {
        index: usize,
        source: TranslateError,
    },
}

/// The solving state of one call: parameter declarations in order, with one
/// symbolic constant each.
pub struct SolveSession<'ctx> {
    ctx: &'ctx Context,
    decls: Vec<ParamDecl>,
    constants: Vec<Term<'ctx>>,
}

impl<'ctx> SolveSession<'ctx> {
    /// Declare one symbolic constant per parameter, preserving order.
    pub fn new(ctx: &'ctx Context, params: &[ParamDecl]) -> Result<Self, SessionError> {
        let mut constants = Vec::with_capacity(params.len());
        for decl in params {
            let term = symbolic_const(ctx, decl).map_err(|source| SessionError::Parameter {
                name: decl.name.clone(),
                source,
            })?;
            constants.push(term);
        }
        Ok(Self {
            ctx,
            decls: params.to_vec(),
            constants,
        })
    }

    /// Assemble one boolean constraint per condition.
    ///
    /// Conditions the translator reports as unsupported are replaced by the
    /// trivial `true` constraint instead of aborting the call: the produced
    /// input may then fail to satisfy a real-world condition, but the
    /// generator still produces some input. Translator defects are not
    /// swallowed this way and abort the whole request.
    pub fn assemble(&self, conditions: &[Expr]) -> Result<Vec<Bool<'ctx>>, SessionError> {
        let mut constraints = Vec::with_capacity(conditions.len());
        for (index, condition) in conditions.iter().enumerate() {
            let constraint = match translate(self.ctx, condition, &self.decls) {
                Ok(Term::Bool(b)) => b,
                Ok(other) => {
                    debug!(
                        index,
                        sort = other.sort_name(),
                        "condition is not boolean; substituting true"
                    );
                    Bool::from_bool(self.ctx, true)
                }
                Err(TranslateError::Unsupported(reason)) => {
                    debug!(index, %reason, "condition not translatable; substituting true");
                    Bool::from_bool(self.ctx, true)
                }
                Err(source @ TranslateError::Internal(_)) => {
                    return Err(SessionError::Condition { index, source });
                }
            };
            constraints.push(constraint);
        }
        Ok(constraints)
    }

    pub fn params(&self) -> &[ParamDecl] {
        &self.decls
    }

    pub(crate) fn constants(&self) -> &[Term<'ctx>] {
        &self.constants
    }
}
