use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // symbols
    Arrow,     // ->
    EnumOpen,  // (
    EnumClose, // )
    ListOpen,  // [
    ListClose, // ]
    ConsOpen,  // {
    ConsClose, // }
    Dot,       // .
    Colon,     // :
    Comma,     // ,
    At,        // @
    Diamond,   // <>
    Star,      // *
    // keywords
    Entity,
    Enum,
    End,
    Ref,
    SelfKw,
    Alter,
    // primitive types
    TypeInt,
    TypeFloat,
    TypeText,
    TypeBool,
    TypeTimestamp,
    TypeUuid,
    // attributes
    Unique,
    Required,
    Increment,
    Primary,
    Default,
    ForeignKey,
    Hash,
    Hidden,
    Readonly,
    Override,
    // http
    Get,
    Post,
    Put,
    Delete,
    // values
    Ident,
    String,
    Digits,
    Float,
    Endpoint, // /users/me
    // trivia
    Comment,
    Newline,
    Eof,
    Unknown,
}

lazy_static! {
    /// Reserved words. Lookup is case sensitive, so `END` is an identifier.
    pub static ref KEYWORDS: HashMap<&'static str, TokenKind> = {
        use TokenKind::*;
        HashMap::from([
            ("entity", Entity),
            ("enum", Enum),
            ("end", End),
            ("ref", Ref),
            ("self", SelfKw),
            ("alter", Alter),
            ("int", TypeInt),
            ("float", TypeFloat),
            ("text", TypeText),
            ("bool", TypeBool),
            ("timestamp", TypeTimestamp),
            ("uuid", TypeUuid),
            ("unique", Unique),
            ("required", Required),
            ("increment", Increment),
            ("primary", Primary),
            ("default", Default),
            ("fk", ForeignKey),
            ("hash", Hash),
            ("hidden", Hidden),
            ("readonly", Readonly),
            ("override", Override),
            ("GET", Get),
            ("POST", Post),
            ("PUT", Put),
            ("DELETE", Delete),
        ])
    };
}

/// Resolves an identifier-shaped word to its keyword kind, or `Ident`.
pub fn lookup_ident(word: &str) -> TokenKind {
    KEYWORDS.get(word).copied().unwrap_or(TokenKind::Ident)
}

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains_key(word)
}

impl TokenKind {
    /// True for every kind produced from the keyword table.
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Entity
                | Enum
                | End
                | Ref
                | SelfKw
                | Alter
                | Get
                | Post
                | Put
                | Delete
        ) || self.is_primitive_type()
            || self.is_attribute()
    }

    pub fn is_primitive_type(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            TypeInt | TypeFloat | TypeText | TypeBool | TypeTimestamp | TypeUuid
        )
    }

    pub fn is_attribute(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Unique
                | Required
                | Increment
                | Primary
                | Default
                | ForeignKey
                | Hash
                | Hidden
                | Readonly
                | Override
        )
    }

    /// Tokens that close a field or member line.
    pub fn is_line_end(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Comment | TokenKind::Eof)
    }

    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        let text = match self {
            Arrow => "'->'",
            EnumOpen => "'('",
            EnumClose => "')'",
            ListOpen => "'['",
            ListClose => "']'",
            ConsOpen => "'{'",
            ConsClose => "'}'",
            Dot => "'.'",
            Colon => "':'",
            Comma => "','",
            At => "'@'",
            Diamond => "'<>'",
            Star => "'*'",
            Entity => "entity",
            Enum => "enum",
            End => "end",
            Ref => "ref",
            SelfKw => "self",
            Alter => "alter",
            TypeInt => "int",
            TypeFloat => "float",
            TypeText => "text",
            TypeBool => "bool",
            TypeTimestamp => "timestamp",
            TypeUuid => "uuid",
            Unique => "unique",
            Required => "required",
            Increment => "increment",
            Primary => "primary",
            Default => "default",
            ForeignKey => "fk",
            Hash => "hash",
            Hidden => "hidden",
            Readonly => "readonly",
            Override => "override",
            Get => "GET",
            Post => "POST",
            Put => "PUT",
            Delete => "DELETE",
            Ident => "identifier",
            String => "string",
            Digits => "integer",
            Float => "float literal",
            Endpoint => "endpoint",
            Comment => "comment",
            Newline => "newline",
            Eof => "end of file",
            Unknown => "unknown token",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind:    TokenKind,
    pub literal: String,
    pub line:    usize,
    pub column:  usize,
    pub file:    String,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Human readable form for messages: the kind plus the literal when the
    /// literal adds something.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Ident
            | TokenKind::String
            | TokenKind::Digits
            | TokenKind::Float
            | TokenKind::Endpoint
            | TokenKind::Unknown => format!("{} {}", self.kind, crate::utils::quote(&self.literal)),
            _ => self.kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_case_sensitive() {
        assert_eq!(lookup_ident("end"), TokenKind::End);
        assert_eq!(lookup_ident("END"), TokenKind::Ident);
        assert_eq!(lookup_ident("GET"), TokenKind::Get);
        assert_eq!(lookup_ident("get"), TokenKind::Ident);
    }

    #[test]
    fn test_every_table_entry_is_a_keyword_kind() {
        for (word, kind) in KEYWORDS.iter() {
            assert!(kind.is_keyword(), "{word} maps to non-keyword {kind:?}");
        }
        assert!(!TokenKind::Ident.is_keyword());
        assert!(!TokenKind::Star.is_keyword());
    }
}
