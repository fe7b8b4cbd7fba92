//! Compile-time constant values
//!
//! A closed tagged union over the source language's literal kinds. Instances
//! are produced once per folded literal or constant expression during
//! semantic analysis, are immutable, and are owned by the expression node
//! that produced them.

use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

/// A folded compile-time constant.
///
/// The `String` tag carries `Option<String>`: `None` is the dedicated
/// null-string marker (a constant whose value is the null reference),
/// which is distinct from "no constant at all" (`NotAConstant`).
#[derive(Debug, Clone)]
pub enum ConstantValue {
    Boolean(bool),
    Byte(i8),
    /// UTF-16 code unit, as in the source language.
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(Option<String>),
    NotAConstant,
}

impl ConstantValue {
    /// The tag name used in coercion faults and diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            ConstantValue::Boolean(_) => "boolean",
            ConstantValue::Byte(_) => "byte",
            ConstantValue::Char(_) => "char",
            ConstantValue::Short(_) => "short",
            ConstantValue::Int(_) => "int",
            ConstantValue::Long(_) => "long",
            ConstantValue::Float(_) => "float",
            ConstantValue::Double(_) => "double",
            ConstantValue::String(_) => "String",
            ConstantValue::NotAConstant => "not a constant",
        }
    }

    /// Whether this value represents an actual compile-time constant
    pub fn is_constant(&self) -> bool {
        !matches!(self, ConstantValue::NotAConstant)
    }

    /// Whether the tag is one of the numeric primitives (char included)
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ConstantValue::Byte(_)
                | ConstantValue::Char(_)
                | ConstantValue::Short(_)
                | ConstantValue::Int(_)
                | ConstantValue::Long(_)
                | ConstantValue::Float(_)
                | ConstantValue::Double(_)
        )
    }

    pub fn boolean_value(&self) -> Result<bool> {
        match self {
            ConstantValue::Boolean(v) => Ok(*v),
            other => Err(Error::not_implemented(other.kind(), "booleanValue()")),
        }
    }

    pub fn byte_value(&self) -> Result<i8> {
        match self {
            ConstantValue::Byte(v) => Ok(*v),
            ConstantValue::Char(v) => Ok(*v as i8),
            ConstantValue::Short(v) => Ok(*v as i8),
            ConstantValue::Int(v) => Ok(*v as i8),
            ConstantValue::Long(v) => Ok(*v as i8),
            // narrowing from floating goes through int first, as the
            // source language's cast chain does
            ConstantValue::Float(v) => Ok((*v as i32) as i8),
            ConstantValue::Double(v) => Ok((*v as i32) as i8),
            other => Err(Error::not_implemented(other.kind(), "byteValue()")),
        }
    }

    pub fn char_value(&self) -> Result<u16> {
        match self {
            ConstantValue::Byte(v) => Ok(*v as u16),
            ConstantValue::Char(v) => Ok(*v),
            ConstantValue::Short(v) => Ok(*v as u16),
            ConstantValue::Int(v) => Ok(*v as u16),
            ConstantValue::Long(v) => Ok(*v as u16),
            ConstantValue::Float(v) => Ok((*v as i32) as u16),
            ConstantValue::Double(v) => Ok((*v as i32) as u16),
            other => Err(Error::not_implemented(other.kind(), "charValue()")),
        }
    }

    pub fn short_value(&self) -> Result<i16> {
        match self {
            ConstantValue::Byte(v) => Ok(*v as i16),
            ConstantValue::Char(v) => Ok(*v as i16),
            ConstantValue::Short(v) => Ok(*v),
            ConstantValue::Int(v) => Ok(*v as i16),
            ConstantValue::Long(v) => Ok(*v as i16),
            ConstantValue::Float(v) => Ok((*v as i32) as i16),
            ConstantValue::Double(v) => Ok((*v as i32) as i16),
            other => Err(Error::not_implemented(other.kind(), "shortValue()")),
        }
    }

    pub fn int_value(&self) -> Result<i32> {
        match self {
            ConstantValue::Byte(v) => Ok(*v as i32),
            ConstantValue::Char(v) => Ok(*v as i32),
            ConstantValue::Short(v) => Ok(*v as i32),
            ConstantValue::Int(v) => Ok(*v),
            ConstantValue::Long(v) => Ok(*v as i32),
            ConstantValue::Float(v) => Ok(*v as i32),
            ConstantValue::Double(v) => Ok(*v as i32),
            other => Err(Error::not_implemented(other.kind(), "intValue()")),
        }
    }

    pub fn long_value(&self) -> Result<i64> {
        match self {
            ConstantValue::Byte(v) => Ok(*v as i64),
            ConstantValue::Char(v) => Ok(*v as i64),
            ConstantValue::Short(v) => Ok(*v as i64),
            ConstantValue::Int(v) => Ok(*v as i64),
            ConstantValue::Long(v) => Ok(*v),
            ConstantValue::Float(v) => Ok(*v as i64),
            ConstantValue::Double(v) => Ok(*v as i64),
            other => Err(Error::not_implemented(other.kind(), "longValue()")),
        }
    }

    pub fn float_value(&self) -> Result<f32> {
        match self {
            ConstantValue::Byte(v) => Ok(*v as f32),
            ConstantValue::Char(v) => Ok(*v as f32),
            ConstantValue::Short(v) => Ok(*v as f32),
            ConstantValue::Int(v) => Ok(*v as f32),
            ConstantValue::Long(v) => Ok(*v as f32),
            ConstantValue::Float(v) => Ok(*v),
            ConstantValue::Double(v) => Ok(*v as f32),
            other => Err(Error::not_implemented(other.kind(), "floatValue()")),
        }
    }

    pub fn double_value(&self) -> Result<f64> {
        match self {
            ConstantValue::Byte(v) => Ok(*v as f64),
            ConstantValue::Char(v) => Ok(*v as f64),
            ConstantValue::Short(v) => Ok(*v as f64),
            ConstantValue::Int(v) => Ok(*v as f64),
            ConstantValue::Long(v) => Ok(*v as f64),
            ConstantValue::Float(v) => Ok(*v as f64),
            ConstantValue::Double(v) => Ok(*v),
            other => Err(Error::not_implemented(other.kind(), "doubleValue()")),
        }
    }

    /// String rendering of the constant.
    ///
    /// `Ok(None)` is returned only for the null-string marker.
    pub fn string_value(&self) -> Result<Option<String>> {
        match self {
            ConstantValue::Boolean(v) => Ok(Some(v.to_string())),
            ConstantValue::Byte(v) => Ok(Some(v.to_string())),
            ConstantValue::Char(v) => {
                let c = char::from_u32(u32::from(*v)).unwrap_or(char::REPLACEMENT_CHARACTER);
                Ok(Some(c.to_string()))
            }
            ConstantValue::Short(v) => Ok(Some(v.to_string())),
            ConstantValue::Int(v) => Ok(Some(v.to_string())),
            ConstantValue::Long(v) => Ok(Some(v.to_string())),
            ConstantValue::Float(v) => Ok(Some(v.to_string())),
            ConstantValue::Double(v) => Ok(Some(v.to_string())),
            ConstantValue::String(v) => Ok(v.clone()),
            ConstantValue::NotAConstant => {
                Err(Error::not_implemented(self.kind(), "stringValue()"))
            }
        }
    }
}

// Floating tags compare by raw bit representation, not IEEE equality, so
// NaN payloads and zero signs are stable under equality and hashing.
impl PartialEq for ConstantValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConstantValue::Boolean(a), ConstantValue::Boolean(b)) => a == b,
            (ConstantValue::Byte(a), ConstantValue::Byte(b)) => a == b,
            (ConstantValue::Char(a), ConstantValue::Char(b)) => a == b,
            (ConstantValue::Short(a), ConstantValue::Short(b)) => a == b,
            (ConstantValue::Int(a), ConstantValue::Int(b)) => a == b,
            (ConstantValue::Long(a), ConstantValue::Long(b)) => a == b,
            (ConstantValue::Float(a), ConstantValue::Float(b)) => a.to_bits() == b.to_bits(),
            (ConstantValue::Double(a), ConstantValue::Double(b)) => a.to_bits() == b.to_bits(),
            (ConstantValue::String(a), ConstantValue::String(b)) => a == b,
            (ConstantValue::NotAConstant, ConstantValue::NotAConstant) => true,
            _ => false,
        }
    }
}

impl Eq for ConstantValue {}

impl Hash for ConstantValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ConstantValue::Boolean(v) => v.hash(state),
            ConstantValue::Byte(v) => v.hash(state),
            ConstantValue::Char(v) => v.hash(state),
            ConstantValue::Short(v) => v.hash(state),
            ConstantValue::Int(v) => v.hash(state),
            ConstantValue::Long(v) => v.hash(state),
            ConstantValue::Float(v) => v.to_bits().hash(state),
            ConstantValue::Double(v) => v.to_bits().hash(state),
            ConstantValue::String(v) => v.hash(state),
            ConstantValue::NotAConstant => {}
        }
    }
}

impl std::fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstantValue::String(Some(s)) => write!(f, "\"{}\"", s),
            ConstantValue::String(None) => write!(f, "null"),
            ConstantValue::NotAConstant => write!(f, "(not a constant)"),
            other => match other.string_value() {
                Ok(Some(s)) => write!(f, "{}", s),
                _ => write!(f, "<{}>", other.kind()),
            },
        }
    }
}
