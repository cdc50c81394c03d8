use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;

/// Two-token window over a [`Tokenizer`].
///
/// Parsing routines only look at `current`/`peek` and call `advance`; nothing
/// else reads the tokenizer.
pub struct TokenCursor<'a> {
    tokenizer: Tokenizer<'a>,
    current:   Token,
    peek:      Token,
}

impl<'a> TokenCursor<'a> {
    pub fn new(mut tokenizer: Tokenizer<'a>) -> Self {
        let current = tokenizer.next_token();
        let peek = tokenizer.next_token();
        TokenCursor { tokenizer, current, peek }
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    pub fn peek(&self) -> &Token {
        &self.peek
    }

    pub fn kind(&self) -> TokenKind {
        self.current.kind
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// Moves `peek` into `current` and returns the token that was current.
    pub fn advance(&mut self) -> Token {
        let next = self.tokenizer.next_token();
        let peek = std::mem::replace(&mut self.peek, next);
        std::mem::replace(&mut self.current, peek)
    }

    /// Consumes the current token when it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Skips newlines and comments.
    pub fn skip_trivia(&mut self) {
        while self.current.kind.is_trivia() {
            self.advance();
        }
    }

    /// True on tokens that end a field or member line.
    pub fn at_line_end(&self) -> bool {
        self.current.kind.is_line_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_primes_two_tokens() {
        let cursor = TokenCursor::new(Tokenizer::new("entity user ->"));
        assert!(cursor.at(TokenKind::Entity));
        assert_eq!(cursor.peek().kind, TokenKind::Ident);
        assert_eq!(cursor.peek().literal, "user");
    }

    #[test]
    fn test_advance_shifts_window_and_stops_at_eof() {
        let mut cursor = TokenCursor::new(Tokenizer::new("a b"));
        assert_eq!(cursor.advance().literal, "a");
        assert_eq!(cursor.current().literal, "b");
        assert_eq!(cursor.peek().kind, TokenKind::Eof);
        cursor.advance();
        assert!(cursor.at_eof());
        cursor.advance();
        assert!(cursor.at_eof());
    }

    #[test]
    fn test_skip_trivia() {
        let mut cursor = TokenCursor::new(Tokenizer::new("\n# note\n\nend"));
        cursor.skip_trivia();
        assert!(cursor.at(TokenKind::End));
    }

    #[test]
    fn test_eat_only_matching_kind() {
        let mut cursor = TokenCursor::new(Tokenizer::new("-> x"));
        assert!(cursor.eat(TokenKind::Dot).is_none());
        assert!(cursor.eat(TokenKind::Arrow).is_some());
        assert_eq!(cursor.current().literal, "x");
    }
}
