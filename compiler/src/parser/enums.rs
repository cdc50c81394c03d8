use log::debug;

use super::Parser;
use crate::{
    token::{Token, TokenKind},
    types::EnumNode,
    utils::quote,
};

impl<'a> Parser<'a> {
    /// Parses `enum <name> -> <members> end`, starting on the `enum` keyword.
    ///
    /// Members are bare identifiers, one or more per line. A keyword can be
    /// used as a member with the `*` marker. Member errors are collected and
    /// the enum is dropped at the end if any were raised.
    pub(crate) fn parse_enum(&mut self) -> Option<EnumNode> {
        self.cursor.advance();
        let mark = self.diagnostics.error_count();

        let header = self
            .expect_ident("expected enum name")
            .and_then(|name| self.expect(TokenKind::Arrow, "expected '->' after enum name").map(|_| name));
        let name = match header {
            Ok(name) => name,
            Err(diag) => {
                self.diagnostics.push(diag);
                return None;
            }
        };

        let mut members: Vec<String> = Vec::new();
        loop {
            let tok = self.cursor.current().clone();
            match tok.kind {
                TokenKind::End => {
                    self.cursor.advance();
                    break;
                }
                TokenKind::Eof => {
                    self.diagnostics.error(
                        &name,
                        format!("enum {} is never closed with 'end'", quote(&name.literal)),
                    );
                    return None;
                }
                TokenKind::Newline | TokenKind::Comment => {
                    self.cursor.advance();
                    continue;
                }
                TokenKind::Ident => {
                    self.cursor.advance();
                }
                TokenKind::Star => {
                    self.cursor.advance();
                    let next = self.cursor.current();
                    if next.kind != TokenKind::Ident && !next.kind.is_keyword() {
                        let diag = self.unexpected("expected a member name after '*'");
                        self.diagnostics.push(diag);
                        continue;
                    }
                    let escaped = self.cursor.advance();
                    self.add_member(&mut members, &name.literal, escaped.literal.clone(), &escaped);
                    continue;
                }
                TokenKind::Entity | TokenKind::Enum => {
                    let diag = self.unexpected("expected enum member or 'end'");
                    self.diagnostics.push(diag);
                    return None;
                }
                kind if kind.is_keyword() => {
                    self.cursor.advance();
                    self.diagnostics.error(
                        &tok,
                        format!(
                            "enum member {} is a reserved keyword; write it as *{} to use it anyway",
                            quote(&tok.literal),
                            tok.literal
                        ),
                    );
                    continue;
                }
                _ => {
                    self.cursor.advance();
                    self.diagnostics.error(
                        &tok,
                        format!("expected enum member, found {}", tok.describe()),
                    );
                    continue;
                }
            }
            self.add_member(&mut members, &name.literal, tok.literal.clone(), &tok);
        }

        if members.is_empty() {
            self.diagnostics
                .warning(&name, format!("enum {} has no members", quote(&name.literal)));
        }

        if self.diagnostics.error_count() > mark {
            debug!(enum_name = name.literal.as_str(); "enum rejected");
            return None;
        }

        Some(EnumNode {
            name: name.literal,
            line: name.line,
            column: name.column,
            members,
        })
    }

    fn add_member(
        &mut self,
        members: &mut Vec<String>,
        enum_name: &str,
        member: String,
        at: &Token,
    ) {
        if members.contains(&member) {
            self.diagnostics.error(
                at,
                format!("duplicate member {} in enum {}", quote(&member), quote(enum_name)),
            );
            return;
        }
        members.push(member);
    }
}
