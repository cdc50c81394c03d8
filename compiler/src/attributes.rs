//! Field attributes and the table of which ones each data type accepts.
//!
//! Every attribute written in a field's `{ ... }` block is collected into one
//! [`Attribute`] set. The verifier later checks that set against
//! [`allowed_for`] and the combination rules.

use std::collections::HashMap;

use bitflags::bitflags;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::token::TokenKind;
use crate::types::DataType;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Attribute: u16 {
        const DEFAULT     = 1 << 0;
        const HASH        = 1 << 1;
        const UNIQUE      = 1 << 2;
        const REQUIRED    = 1 << 3;
        const INCREMENT   = 1 << 4;
        const OVERRIDE    = 1 << 5;
        const PRIMARY     = 1 << 6;
        const HIDDEN      = 1 << 7;
        const READONLY    = 1 << 8;
        const FOREIGN_KEY = 1 << 9;

        /// Everything a reference or embedded field may carry.
        const FOR_REFERENCES = Self::REQUIRED.bits()
            | Self::HIDDEN.bits()
            | Self::READONLY.bits()
            | Self::OVERRIDE.bits()
            | Self::FOREIGN_KEY.bits();
    }
}

lazy_static! {
    static ref ALLOWED_BY_TYPE: HashMap<DataType, Attribute> = {
        use Attribute as A;
        let common = A::DEFAULT | A::REQUIRED | A::HIDDEN | A::READONLY;
        HashMap::from([
            (DataType::Text,      common | A::UNIQUE | A::HASH),
            (DataType::Int,       common | A::UNIQUE | A::INCREMENT | A::PRIMARY),
            (DataType::Float,     common | A::UNIQUE),
            (DataType::Uuid,      common | A::UNIQUE | A::PRIMARY),
            (DataType::Timestamp, common),
            (DataType::Bool,      common),
            (DataType::Enum,      common),
            (DataType::Reference, A::FOR_REFERENCES),
        ])
    };
}

/// The attributes a field of `data_type` may carry.
pub fn allowed_for(data_type: DataType) -> Attribute {
    ALLOWED_BY_TYPE
        .get(&data_type)
        .copied()
        .unwrap_or_else(Attribute::empty)
}

impl Attribute {
    /// Maps an attribute keyword token to its flag.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Default => Some(Attribute::DEFAULT),
            TokenKind::Hash => Some(Attribute::HASH),
            TokenKind::Unique => Some(Attribute::UNIQUE),
            TokenKind::Required => Some(Attribute::REQUIRED),
            TokenKind::Increment => Some(Attribute::INCREMENT),
            TokenKind::Override => Some(Attribute::OVERRIDE),
            TokenKind::Primary => Some(Attribute::PRIMARY),
            TokenKind::Hidden => Some(Attribute::HIDDEN),
            TokenKind::Readonly => Some(Attribute::READONLY),
            TokenKind::ForeignKey => Some(Attribute::FOREIGN_KEY),
            _ => None,
        }
    }

    /// Identifier spellings accepted in addition to the keywords.
    pub fn from_alias(name: &str) -> Option<Self> {
        match name {
            "auto_increment" => Some(Attribute::INCREMENT),
            _ => None,
        }
    }

    /// Only these attributes take a `name:"value"` form.
    pub fn carries_value(self) -> bool {
        self == Attribute::DEFAULT
    }

    /// Source spelling of every flag in the set, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        self.iter()
            .map(|flag| match flag {
                Attribute::DEFAULT => "default",
                Attribute::HASH => "hash",
                Attribute::UNIQUE => "unique",
                Attribute::REQUIRED => "required",
                Attribute::INCREMENT => "increment",
                Attribute::OVERRIDE => "override",
                Attribute::PRIMARY => "primary",
                Attribute::HIDDEN => "hidden",
                Attribute::READONLY => "readonly",
                _ => "fk",
            })
            .collect()
    }
}
