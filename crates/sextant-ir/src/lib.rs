pub mod expr;
pub mod types;

pub use expr::{BinaryOp, Expr, Literal, UnaryOp};
pub use types::{ParamDecl, ParamType};
