use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of one target-function parameter.
///
/// Integer widths are distinguished here even though they all share the
/// solver's unbounded integer sort: the declared width decides the range a
/// model value is clamped into at extraction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    #[serde(rename = "string[]")]
    StringArray,
}

impl ParamType {
    /// Whether values of this type live in the integer sort.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ParamType::Byte | ParamType::Short | ParamType::Int | ParamType::Long
        )
    }

    /// Smallest value representable in the declared width.
    /// Only meaningful for integer types.
    pub fn min_value(&self) -> i64 {
        match self {
            ParamType::Byte => 0,
            ParamType::Short => i16::MIN as i64,
            ParamType::Int => i32::MIN as i64,
            ParamType::Long => i64::MIN,
            ParamType::Bool | ParamType::StringArray => 0,
        }
    }

    /// Largest value representable in the declared width.
    /// Only meaningful for integer types.
    pub fn max_value(&self) -> i64 {
        match self {
            ParamType::Byte => u8::MAX as i64,
            ParamType::Short => i16::MAX as i64,
            ParamType::Int => i32::MAX as i64,
            ParamType::Long => i64::MAX,
            ParamType::Bool | ParamType::StringArray => 0,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::Bool => "bool",
            ParamType::Byte => "byte",
            ParamType::Short => "short",
            ParamType::Int => "int",
            ParamType::Long => "long",
            ParamType::StringArray => "string[]",
        };
        f.write_str(name)
    }
}

/// One parameter declaration of the target function.
///
/// Names are expected to be unique within a call; the translator treats a
/// duplicated name as an identifier it cannot bind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
