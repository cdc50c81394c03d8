//! The `( ... )`, `{ ... }` and `[]` blocks that may follow a field's type.

use lazy_static::lazy_static;
use regex::Regex;

use super::{PResult, Parser};
use crate::{
    attributes::Attribute,
    diagnostics::Diagnostic,
    token::{Token, TokenKind},
    types::{DataType, DefaultValue, EnumLiteral, Field},
    utils::quote,
};

lazy_static! {
    static ref INTEGER: Regex = Regex::new(r"^-?\d+$").unwrap();
    static ref DECIMAL: Regex = Regex::new(r"^-?\d+(\.\d+)?$").unwrap();
    static ref UUID: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )
    .unwrap();
}

impl<'a> Parser<'a> {
    /// `("a", "b")` on text, `(1, 2)` on int, `(1.5, 2.5)` on float. Commas
    /// are optional and every value must use the literal form of the type.
    pub(super) fn parse_enum_literals(&mut self, field: &mut Field) -> PResult<()> {
        let open = self.cursor.advance();
        if !field.enum_values.is_empty() {
            return Err(Diagnostic::error(
                &open,
                format!("field {} already lists its values", quote(&field.name)),
            ));
        }

        let data_type = field.data_type();
        let expected = match data_type.enum_literal_kind() {
            Some(kind) if field.is_primitive() => kind,
            _ => {
                return Err(Diagnostic::error(
                    &open,
                    format!(
                        "value lists are only allowed on text, int and float fields, field {} is {}",
                        quote(&field.name),
                        data_type
                    ),
                ))
            }
        };

        let mut values = Vec::new();
        loop {
            let tok = self.cursor.current().clone();
            match tok.kind {
                TokenKind::EnumClose => {
                    self.cursor.advance();
                    break;
                }
                TokenKind::Comma => {
                    self.cursor.advance();
                }
                kind if kind == expected => {
                    values.push(enum_literal(&tok)?);
                    self.cursor.advance();
                }
                kind if kind.is_line_end() => {
                    return Err(Diagnostic::error(
                        &open,
                        format!("value list of field {} is never closed", quote(&field.name)),
                    ));
                }
                _ => {
                    return Err(Diagnostic::error(
                        &tok,
                        format!(
                            "expected {} in value list of {} field {}, found {}",
                            expected,
                            data_type,
                            quote(&field.name),
                            tok.describe()
                        ),
                    ));
                }
            }
        }

        if values.is_empty() {
            return Err(Diagnostic::error(
                &open,
                format!("value list of field {} is empty", quote(&field.name)),
            ));
        }
        field.enum_values = values;
        Ok(())
    }

    /// `{unique required default:"x"}`. The block must close on the line it
    /// opens on; commas between attributes are optional.
    pub(super) fn parse_attributes(&mut self, field: &mut Field) -> PResult<()> {
        let open = self.cursor.advance();
        loop {
            let tok = self.cursor.current().clone();
            match tok.kind {
                TokenKind::ConsClose => {
                    self.cursor.advance();
                    return Ok(());
                }
                TokenKind::Comma => {
                    self.cursor.advance();
                }
                TokenKind::Eof => {
                    return Err(Diagnostic::error(
                        &open,
                        format!("unclosed constraint definition for field {}", quote(&field.name)),
                    ));
                }
                TokenKind::Newline | TokenKind::Comment => {
                    return Err(Diagnostic::error(
                        &tok,
                        format!(
                            "attribute block of field {} must be closed on the same line",
                            quote(&field.name)
                        ),
                    ));
                }
                _ => {
                    let attr = Attribute::from_token(tok.kind)
                        .or_else(|| match tok.kind {
                            TokenKind::Ident => Attribute::from_alias(&tok.literal),
                            _ => None,
                        })
                        .ok_or_else(|| {
                            Diagnostic::error(&tok, format!("unknown attribute {}", tok.describe()))
                        })?;
                    self.cursor.advance();

                    if field.attributes.contains(attr) {
                        return Err(Diagnostic::error(
                            &tok,
                            format!(
                                "attribute {} is given twice on field {}",
                                tok.literal,
                                quote(&field.name)
                            ),
                        ));
                    }
                    self.parse_attribute_value(field, attr, &tok)?;
                    field.attributes |= attr;
                }
            }
        }
    }

    fn parse_attribute_value(
        &mut self,
        field: &mut Field,
        attr: Attribute,
        name: &Token,
    ) -> PResult<()> {
        let Some(colon) = self.cursor.eat(TokenKind::Colon) else {
            if attr.carries_value() {
                return Err(Diagnostic::error(
                    name,
                    format!("attribute {} needs a value, as in {}:\"...\"", name.literal, name.literal),
                ));
            }
            return Ok(());
        };

        if !attr.carries_value() {
            return Err(Diagnostic::error(
                &colon,
                format!("attribute {} does not take a value", name.literal),
            ));
        }

        let value = self.cursor.current().clone();
        if value.kind == TokenKind::ConsClose || value.kind == TokenKind::Comma || value.kind.is_line_end() {
            return Err(Diagnostic::error(
                &colon,
                format!("missing value after {}:", name.literal),
            ));
        }
        if value.kind != TokenKind::String {
            return Err(Diagnostic::error(
                &value,
                format!("expected a quoted value after {}:, found {}", name.literal, value.describe()),
            ));
        }
        self.cursor.advance();
        field.default = Some(typed_default(field, &value)?);
        Ok(())
    }

    /// `[]` marks a list.
    pub(super) fn parse_list_marker(&mut self, field: &mut Field) -> PResult<()> {
        let open = self.cursor.advance();
        if field.is_array {
            return Err(Diagnostic::error(
                &open,
                format!("field {} is already marked as a list", quote(&field.name)),
            ));
        }
        self.expect(TokenKind::ListClose, "list marker must be written as '[]'")?;
        field.is_array = true;
        Ok(())
    }
}

fn enum_literal(tok: &Token) -> PResult<EnumLiteral> {
    let invalid = || Diagnostic::error(tok, format!("invalid value {}", tok.describe()));
    match tok.kind {
        TokenKind::Digits => tok.literal.parse().map(EnumLiteral::Int).map_err(|_| invalid()),
        TokenKind::Float => tok.literal.parse().map(EnumLiteral::Float).map_err(|_| invalid()),
        _ => Ok(EnumLiteral::Str(tok.literal.clone())),
    }
}

/// Checks the text of a `default:"..."` against the field type and converts
/// it.
fn typed_default(field: &Field, value: &Token) -> PResult<DefaultValue> {
    let text = value.literal.as_str();
    let invalid = || {
        Diagnostic::error(
            value,
            format!(
                "default value {} is not a valid {} for field {}",
                quote(text),
                field.data_type(),
                quote(&field.name)
            ),
        )
    };

    match field.data_type() {
        DataType::Int if INTEGER.is_match(text) => {
            text.parse().map(DefaultValue::Int).map_err(|_| invalid())
        }
        DataType::Float if DECIMAL.is_match(text) => {
            text.parse().map(DefaultValue::Float).map_err(|_| invalid())
        }
        DataType::Bool => match text {
            "true" => Ok(DefaultValue::Bool(true)),
            "false" => Ok(DefaultValue::Bool(false)),
            _ => Err(invalid()),
        },
        DataType::Uuid if UUID.is_match(text) => Ok(DefaultValue::Str(text.to_string())),
        DataType::Timestamp if !text.is_empty() => Ok(DefaultValue::Str(text.to_string())),
        DataType::Int | DataType::Float | DataType::Uuid | DataType::Timestamp => Err(invalid()),
        DataType::Text | DataType::Enum | DataType::Reference => {
            Ok(DefaultValue::Str(text.to_string()))
        }
    }
}
