use crate::token::{lookup_ident, Token, TokenKind};

/// Lazily turns source text into tokens.
///
/// Lexical problems never fail: an unterminated string or a stray byte becomes
/// an `Unknown` token and the parser decides what to report. Once the input is
/// exhausted every call returns `Eof`.
pub struct Tokenizer<'a> {
    input:  &'a str,
    pos:    usize,
    line:   usize,
    column: usize,
    file:   String,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_file(input, "")
    }

    /// Like `new`, but every token carries `file` for diagnostics.
    pub fn with_file(input: &'a str, file: impl Into<String>) -> Self {
        Tokenizer {
            input,
            pos:    0,
            line:   1,
            column: 1,
            file:   file.into(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let (line, column) = (self.line, self.column);
        let start = self.pos;

        let Some(ch) = self.bump() else {
            return self.token(TokenKind::Eof, String::new(), line, column);
        };

        let kind = match ch {
            '.' => TokenKind::Dot,
            '(' => TokenKind::EnumOpen,
            ')' => TokenKind::EnumClose,
            '[' => TokenKind::ListOpen,
            ']' => TokenKind::ListClose,
            '{' => TokenKind::ConsOpen,
            '}' => TokenKind::ConsClose,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '@' => TokenKind::At,
            '*' => TokenKind::Star,
            '\n' => TokenKind::Newline,
            '#' => {
                self.skip_line();
                return self.token(TokenKind::Comment, "#".to_string(), line, column);
            }
            '-' => self.match_or_unknown('>', TokenKind::Arrow),
            '<' => self.match_or_unknown('>', TokenKind::Diamond),
            '/' if self.peek_char().is_some_and(char::is_alphabetic) => {
                self.read_endpoint();
                TokenKind::Endpoint
            }
            '"' => return self.read_string(start, line, column),
            c if c.is_ascii_digit() => self.read_number(),
            c if is_ident_start(c) => {
                self.read_identifier();
                lookup_ident(&self.input[start..self.pos])
            }
            _ => TokenKind::Unknown,
        };

        let literal = self.input[start..self.pos].to_string();
        self.token(kind, literal, line, column)
    }

    fn token(&self, kind: TokenKind, literal: String, line: usize, column: usize) -> Token {
        Token {
            kind,
            literal,
            line,
            column,
            file: self.file.clone(),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    // Newlines are tokens, so only horizontal whitespace is skipped.
    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(' ' | '\t' | '\r')) {
            self.bump();
        }
    }

    fn skip_line(&mut self) {
        while self.peek_char().is_some_and(|c| c != '\n') {
            self.bump();
        }
    }

    fn match_or_unknown(&mut self, expected: char, kind: TokenKind) -> TokenKind {
        if self.peek_char() == Some(expected) {
            self.bump();
            kind
        } else {
            TokenKind::Unknown
        }
    }

    fn read_endpoint(&mut self) {
        while self.peek_char().is_some_and(|c| !c.is_whitespace()) {
            self.bump();
        }
    }

    fn read_number(&mut self) -> TokenKind {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }

        // `3.` stays an integer so that dotted paths keep their `.` token
        if self.peek_char() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
            return TokenKind::Float;
        }
        TokenKind::Digits
    }

    fn read_identifier(&mut self) {
        while self.peek_char().is_some_and(is_ident_continue) {
            self.bump();
        }
    }

    /// The opening quote is already consumed. The literal excludes the quotes
    /// and keeps escapes as written.
    fn read_string(&mut self, start: usize, line: usize, column: usize) -> Token {
        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    let literal = self.input[start..self.pos].to_string();
                    return self.token(TokenKind::Unknown, literal, line, column);
                }
                Some('"') => {
                    self.bump();
                    let literal = self.input[start + 1..self.pos - 1].to_string();
                    return self.token(TokenKind::String, literal, line, column);
                }
                Some('\\') => {
                    self.bump();
                    if self.peek_char().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Tokenizes the whole input. The returned vector always ends with exactly
/// one `Eof` token.
pub fn tokenize_schema(text: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(text);
    let mut tokens = Vec::new();
    loop {
        let tok = tokenizer.next_token();
        let done = tok.is(TokenKind::Eof);
        tokens.push(tok);
        if done {
            return tokens;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize_schema(input).into_iter().map(|t| t.kind).collect()
    }

    fn tok(kind: TokenKind, literal: &str, line: usize, column: usize) -> Token {
        Token { kind, literal: literal.into(), line, column, file: "".into() }
    }

    #[test]
    fn test_tokenize_simple() {
        let input = "id int {increment}";
        let expected = vec![
            tok(Ident,     "id",        1, 1),
            tok(TypeInt,   "int",       1, 4),
            tok(ConsOpen,  "{",         1, 8),
            tok(Increment, "increment", 1, 9),
            tok(ConsClose, "}",         1, 18),
            tok(Eof,       "",          1, 19),
        ];
        assert_eq!(tokenize_schema(input), expected);
    }

    #[test]
    fn test_tokenize_entity_and_routes() {
        let input = "entity user ->
\tid int (1 2)
\tgender text (\"male\" \"female\")
end

# this is a comment and shouldn't be tokenized
GET /users/me -> self.id
";
        let expected = vec![
            Entity, Ident, Arrow, Newline,
            Ident, TypeInt, EnumOpen, Digits, Digits, EnumClose, Newline,
            Ident, TypeText, EnumOpen, String, String, EnumClose, Newline,
            End, Newline,
            Newline,
            Comment, Newline,
            Get, Endpoint, Arrow, SelfKw, Dot, Ident, Newline,
            Eof,
        ];
        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn test_string_literal_drops_quotes_and_keeps_escapes() {
        let tokens = tokenize_schema(r#"default:"say \"hi\"""#);
        assert_eq!(tokens[0].kind, Default);
        assert_eq!(tokens[1].kind, Colon);
        assert_eq!(tokens[2].kind, String);
        assert_eq!(tokens[2].literal, r#"say \"hi\""#);
    }

    #[test]
    fn test_unterminated_string_is_unknown() {
        let tokens = tokenize_schema("\"male\n\"female\"");
        assert_eq!(tokens[0].kind, Unknown);
        assert_eq!(tokens[0].literal, "\"male");
        assert_eq!(tokens[1].kind, Newline);
        assert_eq!(tokens[2].kind, String);

        assert_eq!(kinds("\"open"), vec![Unknown, Eof]);
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize_schema("12 3.25 3.x");
        assert_eq!(tokens[0].kind, Digits);
        assert_eq!(tokens[1].kind, Float);
        assert_eq!(tokens[1].literal, "3.25");
        assert_eq!(tokens[2].kind, Digits);
        assert_eq!(tokens[2].literal, "3");
        assert_eq!(tokens[3].kind, Dot);
        assert_eq!(tokens[4].kind, Ident);
    }

    #[test]
    fn test_two_char_symbols_fall_back_to_unknown() {
        assert_eq!(kinds("-> <> - < -x"), vec![Arrow, Diamond, Unknown, Unknown, Unknown, Ident, Eof]);
    }

    #[test]
    fn test_comment_keeps_newline() {
        let tokens = tokenize_schema("name text # the name\nage int");
        let got: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(got, vec![Ident, TypeText, Comment, Newline, Ident, TypeInt, Eof]);
        assert_eq!(tokens[4].line, 2);
    }

    #[test]
    fn test_identifiers_and_escape_marker() {
        let tokens = tokenize_schema("_admin123 *end END");
        assert_eq!(tokens[0].kind, Ident);
        assert_eq!(tokens[0].literal, "_admin123");
        assert_eq!(tokens[1].kind, Star);
        assert_eq!(tokens[2].kind, End);
        assert_eq!(tokens[3].kind, Ident);
    }

    #[test]
    fn test_windows_line_endings() {
        assert_eq!(kinds("admin\r\nuser"), vec![Ident, Newline, Ident, Eof]);
    }

    #[test]
    fn test_unknown_bytes() {
        assert_eq!(kinds("ro$le / ;"), vec![Ident, Unknown, Ident, Unknown, Unknown, Eof]);
    }

    #[test]
    fn test_eof_is_repeatable() {
        let mut tokenizer = Tokenizer::new("x");
        assert_eq!(tokenizer.next_token().kind, Ident);
        for _ in 0..3 {
            assert_eq!(tokenizer.next_token().kind, Eof);
        }
    }

    #[test]
    fn test_file_name_is_attached() {
        let mut tokenizer = Tokenizer::with_file("x", "user.mime");
        assert_eq!(tokenizer.next_token().file, "user.mime");
    }
}
