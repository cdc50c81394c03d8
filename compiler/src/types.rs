use std::fmt;

use serde::Serialize;

use crate::attributes::Attribute;
use crate::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Text,
    Int,
    Float,
    Bool,
    Uuid,
    Timestamp,
    Enum,
    Reference,
}

impl DataType {
    /// Maps a primitive type keyword to its data type.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::TypeText => Some(DataType::Text),
            TokenKind::TypeInt => Some(DataType::Int),
            TokenKind::TypeFloat => Some(DataType::Float),
            TokenKind::TypeBool => Some(DataType::Bool),
            TokenKind::TypeUuid => Some(DataType::Uuid),
            TokenKind::TypeTimestamp => Some(DataType::Timestamp),
            _ => None,
        }
    }

    /// Types that accept an inline `( ... )` value list, and the literal
    /// token each one takes.
    pub fn enum_literal_kind(self) -> Option<TokenKind> {
        match self {
            DataType::Text => Some(TokenKind::String),
            DataType::Int => Some(TokenKind::Digits),
            DataType::Float => Some(TokenKind::Float),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Bool => "bool",
            DataType::Uuid => "uuid",
            DataType::Timestamp => "timestamp",
            DataType::Enum => "enum",
            DataType::Reference => "reference",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `owner @user.id` points at `user.id`. Resolved by name, never by pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReferenceTarget {
    pub entity: String,
    pub field:  String,
}

impl fmt::Display for ReferenceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.field)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FieldKind {
    /// `name text`
    Primitive(DataType),
    /// `owner @user.id`
    Reference(ReferenceTarget),
    /// `@person`, pulls the fields of `person` in by composition
    Embedded(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Primitive(_) => "primitive",
            FieldKind::Reference(_) => "reference",
            FieldKind::Embedded(_) => "embedded",
        }
    }
}

/// A value from an inline `( ... )` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnumLiteral {
    Str(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for EnumLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumLiteral::Str(s) => write!(f, "{}", crate::utils::quote(s)),
            EnumLiteral::Int(i) => write!(f, "{}", i),
            EnumLiteral::Float(x) => write!(f, "{}", x),
        }
    }
}

/// The typed value of a `default:"..."` attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl DefaultValue {
    /// Whether this default is one of the listed values.
    pub fn matches(&self, literal: &EnumLiteral) -> bool {
        match (self, literal) {
            (DefaultValue::Str(a), EnumLiteral::Str(b)) => a == b,
            (DefaultValue::Int(a), EnumLiteral::Int(b)) => a == b,
            (DefaultValue::Float(a), EnumLiteral::Float(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Str(s) => write!(f, "{}", crate::utils::quote(s)),
            DefaultValue::Int(i) => write!(f, "{}", i),
            DefaultValue::Float(x) => write!(f, "{}", x),
            DefaultValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name:        String,
    pub line:        usize,
    pub column:      usize,
    pub kind:        FieldKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<EnumLiteral>,
    pub attributes:  Attribute,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default:     Option<DefaultValue>,
    pub is_array:    bool,
    /// The name was written with the `*` marker and may shadow a keyword.
    #[serde(skip)]
    pub escaped:     bool,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind, line: usize, column: usize) -> Self {
        Field {
            name: name.into(),
            line,
            column,
            kind,
            enum_values: Vec::new(),
            attributes:  Attribute::empty(),
            default:     None,
            is_array:    false,
            escaped:     false,
        }
    }

    /// The primitive type, or `Reference` for reference and embedded fields.
    pub fn data_type(&self) -> DataType {
        match self.kind {
            FieldKind::Primitive(dt) => dt,
            FieldKind::Reference(_) | FieldKind::Embedded(_) => DataType::Reference,
        }
    }

    pub fn target(&self) -> Option<&ReferenceTarget> {
        match &self.kind {
            FieldKind::Reference(target) => Some(target),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, FieldKind::Primitive(_))
    }

    /// Clients may send this field when creating the entity: a plain
    /// primitive whose value the server does not generate.
    pub fn is_payload(&self) -> bool {
        self.is_primitive() && !self.is_array && !self.attributes.contains(Attribute::INCREMENT)
    }

    /// Every field is readable. Exclusions belong to `alter` blocks.
    pub fn is_response(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityNode {
    pub name:   String,
    pub line:   usize,
    pub column: usize,
    pub fields: Vec<Field>,
}

impl EntityNode {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumNode {
    pub name:    String,
    pub line:    usize,
    pub column:  usize,
    pub members: Vec<String>,
}
