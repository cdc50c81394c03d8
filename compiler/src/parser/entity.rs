use log::{debug, trace};

use super::{PResult, Parser};
use crate::{
    diagnostics::Diagnostic,
    token::{Token, TokenKind},
    types::{DataType, EntityNode, Field, FieldKind, ReferenceTarget},
    utils::quote,
    verifier::{cleanup_entity, verify_field},
};

impl<'a> Parser<'a> {
    /// Parses `entity <name> -> <fields> end`, starting on the `entity`
    /// keyword.
    ///
    /// Returns `None` when the entity has to be dropped: either a field could
    /// not be parsed at all, or any error was raised while checking it.
    pub(crate) fn parse_entity(&mut self) -> Option<EntityNode> {
        self.cursor.advance();
        let mark = self.diagnostics.error_count();

        let entity = match self.parse_entity_body() {
            Ok(entity) => entity,
            Err(diag) => {
                self.diagnostics.push(diag);
                return None;
            }
        };

        let cleanup = cleanup_entity(&entity, &self.file);
        self.diagnostics.extend(cleanup);

        if self.diagnostics.error_count() > mark {
            debug!(entity = entity.name.as_str(); "entity rejected");
            return None;
        }
        Some(entity)
    }

    fn parse_entity_body(&mut self) -> PResult<EntityNode> {
        let name = self.expect_ident("expected entity name")?;
        self.expect(TokenKind::Arrow, "expected '->' after entity name")?;

        let mut fields = Vec::new();
        loop {
            self.cursor.skip_trivia();
            match self.cursor.kind() {
                TokenKind::End => {
                    self.cursor.advance();
                    break;
                }
                TokenKind::Eof => {
                    return Err(Diagnostic::error(
                        &name,
                        format!("entity {} is never closed with 'end'", quote(&name.literal)),
                    ));
                }
                _ => {
                    let field = self.parse_field()?;
                    let diags = verify_field(&field, &self.file);
                    self.diagnostics.extend(diags);
                    fields.push(field);
                }
            }
        }

        Ok(EntityNode {
            name: name.literal,
            line: name.line,
            column: name.column,
            fields,
        })
    }

    /// One field line:
    ///
    /// 1) `@entity` embeds another entity
    /// 2) `name @entity.field` references a field of another entity
    /// 3) `name type (values) {attributes} []` is a primitive
    fn parse_field(&mut self) -> PResult<Field> {
        if let Some(at) = self.cursor.eat(TokenKind::At) {
            let target = self.expect_ident("expected entity name after '@'")?;
            if !self.at_field_end() {
                return Err(self.unexpected("expected end of line after embedded entity"));
            }
            trace!(entity = target.literal.as_str(); "embedded field");
            return Ok(Field::new(
                target.literal.clone(),
                FieldKind::Embedded(target.literal),
                at.line,
                at.column,
            ));
        }

        let (name, escaped) = self.parse_field_name()?;

        let kind = if self.cursor.eat(TokenKind::At).is_some() {
            FieldKind::Reference(self.parse_reference_target()?)
        } else {
            match DataType::from_token(self.cursor.kind()) {
                Some(data_type) => {
                    self.cursor.advance();
                    FieldKind::Primitive(data_type)
                }
                None => {
                    return Err(self.unexpected(&format!(
                        "expected a data type for field {}",
                        quote(&name.literal)
                    )))
                }
            }
        };

        let mut field = Field::new(name.literal, kind, name.line, name.column);
        field.escaped = escaped;

        while !self.at_field_end() {
            match self.cursor.kind() {
                TokenKind::EnumOpen => self.parse_enum_literals(&mut field)?,
                TokenKind::ConsOpen => self.parse_attributes(&mut field)?,
                TokenKind::ListOpen => self.parse_list_marker(&mut field)?,
                _ => {
                    return Err(self.unexpected(&format!(
                        "unexpected token after data type of field {}",
                        quote(&field.name)
                    )))
                }
            }
        }

        trace!(field = field.name.as_str(), kind = field.kind.as_str(); "parsed field");
        Ok(field)
    }

    /// A field name, optionally escaped with `*` so a keyword can be used.
    /// Unescaped keyword names are accepted here and reported by
    /// `cleanup_entity` with the rest of the entity's problems, except
    /// `entity` and `enum`: those start the next declaration and are left
    /// for recovery.
    fn parse_field_name(&mut self) -> PResult<(Token, bool)> {
        let escaped = self.cursor.eat(TokenKind::Star).is_some();
        let kind = self.cursor.kind();
        if !escaped && matches!(kind, TokenKind::Entity | TokenKind::Enum) {
            return Err(self.unexpected("expected field name or 'end'"));
        }
        if kind == TokenKind::Ident || kind.is_keyword() {
            return Ok((self.cursor.advance(), escaped));
        }
        if escaped {
            return Err(self.unexpected("expected a field name after '*'"));
        }
        Err(self.unexpected("expected field name"))
    }

    /// `entity.field` after the `@` of a reference.
    fn parse_reference_target(&mut self) -> PResult<ReferenceTarget> {
        let entity = self.expect_ident("expected referenced entity name after '@'")?;
        self.expect(TokenKind::Dot, "expected '.' between entity and field of a reference")?;
        let field = self.expect_ident("expected referenced field name after '.'")?;
        Ok(ReferenceTarget {
            entity: entity.literal,
            field:  field.literal,
        })
    }

    /// A field ends at a newline, a comment, end of file, or the `end` that
    /// closes a one-line entity.
    fn at_field_end(&self) -> bool {
        self.cursor.at_line_end() || self.cursor.at(TokenKind::End)
    }
}

#[cfg(test)]
mod tests {
    use crate::attributes::Attribute;
    use crate::parser::parse_document;
    use crate::types::{DataType, FieldKind, ReferenceTarget};

    #[test]
    fn test_simple_entity() {
        let out = parse_document(
            "entity user ->\n\
             \x20 id int {increment required}\n\
             \x20 name text {required}\n\
             \x20 email text {unique, hash}\n\
             end",
        );
        assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
        let user = out.schema.entity("user").unwrap();
        assert_eq!(user.line, 1);
        assert_eq!(user.column, 8);
        assert_eq!(user.fields.len(), 3);
        assert_eq!(user.fields[0].attributes, Attribute::INCREMENT | Attribute::REQUIRED);
        assert_eq!(user.fields[2].attributes, Attribute::UNIQUE | Attribute::HASH);
        assert_eq!(user.fields[1].line, 3);
    }

    #[test]
    fn test_one_line_entity() {
        let out = parse_document("entity tag -> label text end");
        assert!(out.diagnostics.is_empty());
        let tag = out.schema.entity("tag").unwrap();
        assert_eq!(tag.fields[0].kind, FieldKind::Primitive(DataType::Text));
    }

    #[test]
    fn test_reference_and_embedded_fields() {
        let out = parse_document(
            "entity person -> first text end\n\
             entity org -> id int {increment required} end\n\
             entity user ->\n\
             \x20 @person\n\
             \x20 owner @org.id {required fk}\n\
             end",
        );
        assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
        let user = out.schema.entity("user").unwrap();
        assert_eq!(user.fields[0].kind, FieldKind::Embedded("person".into()));
        assert_eq!(user.fields[0].name, "person");
        assert_eq!(
            user.fields[1].kind,
            FieldKind::Reference(ReferenceTarget { entity: "org".into(), field: "id".into() })
        );
        assert_eq!(user.fields[1].attributes, Attribute::REQUIRED | Attribute::FOREIGN_KEY);
    }

    #[test]
    fn test_escaped_keyword_field_name() {
        let out = parse_document("entity doc ->\n  *text text\n  *end int\nend");
        assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
        let doc = out.schema.entity("doc").unwrap();
        assert_eq!(doc.fields[0].name, "text");
        assert!(doc.fields[0].escaped);
        assert_eq!(doc.fields[1].name, "end");
    }

    #[test]
    fn test_unescaped_keyword_field_name_is_rejected() {
        let out = parse_document("entity doc ->\n  text text\nend\nentity ok -> a int end");
        assert_eq!(out.diagnostics.error_count(), 1);
        assert!(out.schema.entity("doc").is_none());
        assert!(out.schema.entity("ok").is_some());
    }

    #[test]
    fn test_missing_type_rejects_entity_and_recovers() {
        let out = parse_document("entity user ->\n  name\nend\nentity post -> title text end");
        let errors: Vec<_> = out.diagnostics.errors().map(|d| d.message.as_str()).collect();
        assert_eq!(errors, vec!["expected a data type for field \"name\", found newline"]);
        assert!(out.schema.entity("user").is_none());
        assert!(out.schema.entity("post").is_some());
    }

    #[test]
    fn test_unterminated_entity() {
        let out = parse_document("entity user ->\n  name text\n");
        assert_eq!(out.diagnostics.error_count(), 1);
        assert!(out.schema.entities().is_empty());
    }

    #[test]
    fn test_semantic_errors_are_all_collected_before_dropping() {
        let out = parse_document(
            "entity user ->\n\
             \x20 id float {increment}\n\
             \x20 active bool {unique}\n\
             end",
        );
        // id: wrong type and missing required, active: unique not allowed
        assert_eq!(out.diagnostics.error_count(), 3);
        assert!(out.schema.entity("user").is_none());
    }

    #[test]
    fn test_duplicate_field_names() {
        let out = parse_document("entity user -> name text\nname text\nend");
        assert_eq!(out.diagnostics.error_count(), 1);
        assert_eq!(out.diagnostics.iter().next().unwrap().line, 2);
        assert!(out.schema.entity("user").is_none());
    }

    #[test]
    fn test_comment_ends_a_field() {
        let out = parse_document("entity user -> # users\n  name text # display name\nend");
        assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
        assert_eq!(out.schema.entity("user").unwrap().fields.len(), 1);
    }

    #[test]
    fn test_escaped_entity_keyword_does_not_stop_recovery() {
        let out = parse_document("entity a ->\n  x\n  *entity text\nend\nentity b -> y int end");
        assert!(out.schema.entity("a").is_none());
        assert!(out.schema.entity("b").is_some());
        assert_eq!(out.diagnostics.error_count(), 1);
    }

    #[test]
    fn test_missing_end_does_not_swallow_next_entity() {
        let out = parse_document("entity a ->\n  x text\nentity b ->\n  y int\nend");
        let errors: Vec<_> = out.diagnostics.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expected field name or 'end', found entity");
        assert_eq!((errors[0].line, errors[0].column), (3, 1));
        assert!(out.schema.entity("a").is_none());
        assert_eq!(out.schema.entity("b").unwrap().fields[0].name, "y");
    }

    #[test]
    fn test_missing_end_stops_before_enum() {
        let out = parse_document("entity a -> x text\nenum e -> one end");
        assert_eq!(out.diagnostics.error_count(), 1);
        assert!(out.schema.entity("a").is_none());
        assert!(out.schema.enum_node("e").is_some());
    }

    fn rejected_with(text: &str) -> String {
        let out = parse_document(text);
        assert!(out.schema.entity("a").is_none(), "{text}");
        assert_eq!(out.diagnostics.error_count(), 1, "{text}");
        let message = out.diagnostics.errors().next().unwrap().message.clone();
        message
    }

    #[test]
    fn test_trailing_token_after_embedded_entity() {
        assert_eq!(
            rejected_with("entity a -> @b extra\nend"),
            "expected end of line after embedded entity, found identifier \"extra\""
        );
    }

    #[test]
    fn test_malformed_reference_targets() {
        assert_eq!(
            rejected_with("entity a ->\n  o @ .id\nend"),
            "expected referenced entity name after '@', found '.'"
        );
        assert_eq!(
            rejected_with("entity a ->\n  o @user id\nend"),
            "expected '.' between entity and field of a reference, found identifier \"id\""
        );
        assert_eq!(
            rejected_with("entity a ->\n  o @user.\nend"),
            "expected referenced field name after '.', found newline"
        );
    }

    #[test]
    fn test_unexpected_token_after_data_type() {
        assert_eq!(
            rejected_with("entity a ->\n  x int foo\nend"),
            "unexpected token after data type of field \"x\", found identifier \"foo\""
        );
    }
}
