//! Tokenizer for facts files and expression strings.
//!
//! Produces a flat token stream with 1-based line/column locations for
//! error reporting. Identifiers may contain hyphens ("big-bang"), the
//! word operators `and`/`or`/`not`/`iff` are recognized case-insensitively
//! alongside their symbolic forms, and `#` starts a comment running to end
//! of line. The word `implies` is NOT an operator: it names a relation in
//! assumption files, so it always lexes as an identifier and only `->`
//! means implication.

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    /// `&&` or `and`
    And,
    /// `||` or `or`
    Or,
    /// `!`, `~` or `not`
    Not,
    /// `->` only; the word `implies` is an identifier.
    Implies,
    /// `<->` or `iff`
    Equivalent,
    LParen,
    RParen,
    Comma,
    Assign,
}

/// 1-based position of a token in its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexToken {
    pub kind: TokenKind,
    /// Original text of the token.
    pub text: String,
    pub location: SourceLocation,
}

/// Tokenize `input`, failing on the first unrecognized character.
pub fn tokenize(input: &str) -> Result<Vec<LexToken>, ParseError> {
    Lexer::new(input).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn advance(&mut self) {
        if let Some(c) = self.current() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
        }
    }

    fn run(mut self) -> Result<Vec<LexToken>, ParseError> {
        let mut tokens = Vec::new();

        while let Some(c) = self.current() {
            if c.is_whitespace() {
                self.advance();
                continue;
            }
            if c == '#' {
                while self.current().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            let location = self.location();
            let token = match c {
                '(' => self.single(TokenKind::LParen, location),
                ')' => self.single(TokenKind::RParen, location),
                ',' => self.single(TokenKind::Comma, location),
                '=' => self.single(TokenKind::Assign, location),
                '!' | '~' => self.single(TokenKind::Not, location),
                '&' if self.peek(1) == Some('&') => self.double(TokenKind::And, location),
                '|' if self.peek(1) == Some('|') => self.double(TokenKind::Or, location),
                '-' if self.peek(1) == Some('>') => self.double(TokenKind::Implies, location),
                '<' if self.peek(1) == Some('-') && self.peek(2) == Some('>') => {
                    self.advance();
                    self.advance();
                    self.advance();
                    LexToken {
                        kind: TokenKind::Equivalent,
                        text: "<->".into(),
                        location,
                    }
                }
                c if is_identifier_start(c) => self.identifier(location),
                other => {
                    return Err(ParseError::Lex {
                        character: other,
                        line: location.line,
                        column: location.column,
                    });
                }
            };
            tokens.push(token);
        }

        Ok(tokens)
    }

    fn single(&mut self, kind: TokenKind, location: SourceLocation) -> LexToken {
        let text = self.current().map(String::from).unwrap_or_default();
        self.advance();
        LexToken { kind, text, location }
    }

    fn double(&mut self, kind: TokenKind, location: SourceLocation) -> LexToken {
        let mut text = String::new();
        for _ in 0..2 {
            if let Some(c) = self.current() {
                text.push(c);
                self.advance();
            }
        }
        LexToken { kind, text, location }
    }

    fn identifier(&mut self, location: SourceLocation) -> LexToken {
        let mut text = String::new();
        while let Some(c) = self.current() {
            // A hyphen continues the identifier only when it does not start
            // a `->` operator.
            let continues = is_identifier_continue(c)
                && !(c == '-' && self.peek(1) == Some('>'));
            if !continues {
                break;
            }
            text.push(c);
            self.advance();
        }

        // Keywords compare case-insensitively; `implies` stays an
        // identifier because assumption files use it as a relation name.
        let kind = match text.to_ascii_lowercase().as_str() {
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "iff" => TokenKind::Equivalent,
            _ => TokenKind::Identifier,
        };

        LexToken { kind, text, location }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn symbolic_operators() {
        assert_eq!(
            kinds("p && q || !r -> s <-> ~t"),
            [
                TokenKind::Identifier,
                TokenKind::And,
                TokenKind::Identifier,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Identifier,
                TokenKind::Implies,
                TokenKind::Identifier,
                TokenKind::Equivalent,
                TokenKind::Not,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn word_operators() {
        assert_eq!(
            kinds("p and q or not r"),
            [
                TokenKind::Identifier,
                TokenKind::And,
                TokenKind::Identifier,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn word_operators_are_case_insensitive() {
        assert_eq!(
            kinds("p AND q Or NOT r Iff s"),
            [
                TokenKind::Identifier,
                TokenKind::And,
                TokenKind::Identifier,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Identifier,
                TokenKind::Equivalent,
                TokenKind::Identifier,
            ]
        );
        // Original casing survives in the token text.
        let tokens = tokenize("p AND q").unwrap();
        assert_eq!(tokens[1].text, "AND");
    }

    #[test]
    fn implies_word_stays_an_identifier() {
        let tokens = tokenize("implies").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "implies");

        // Only the arrow form lexes as the operator.
        assert_eq!(
            kinds("a implies b"),
            [
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
            ]
        );
        assert_eq!(kinds("IMPLIES"), [TokenKind::Identifier]);
    }

    #[test]
    fn punctuation_and_assignment() {
        assert_eq!(
            kinds("t = (a , b)"),
            [
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::LParen,
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Identifier,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn hyphenated_identifiers() {
        let tokens = tokenize("big-bang microwave-radiation").unwrap();
        assert_eq!(tokens[0].text, "big-bang");
        assert_eq!(tokens[1].text, "microwave-radiation");
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Identifier));
    }

    #[test]
    fn hyphen_before_gt_is_an_implies_operator() {
        let tokens = tokenize("a->b").unwrap();
        assert_eq!(tokens[0].text, "a");
        assert_eq!(tokens[1].kind, TokenKind::Implies);
        assert_eq!(tokens[2].text, "b");
    }

    #[test]
    fn comments_run_to_end_of_line() {
        let tokens = tokenize("p # trailing comment && q\nr").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "p");
        assert_eq!(tokens[1].text, "r");
        assert_eq!(tokens[1].location.line, 2);
    }

    #[test]
    fn locations_are_one_based() {
        let tokens = tokenize("p &&\n  q").unwrap();
        assert_eq!(tokens[0].location, SourceLocation { line: 1, column: 1 });
        assert_eq!(tokens[1].location, SourceLocation { line: 1, column: 3 });
        assert_eq!(tokens[2].location, SourceLocation { line: 2, column: 3 });
    }

    #[test]
    fn unexpected_character_reports_location() {
        let err = tokenize("p $ q").unwrap_err();
        match err {
            ParseError::Lex { character, line, column } => {
                assert_eq!(character, '$');
                assert_eq!(line, 1);
                assert_eq!(column, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn lone_ampersand_is_an_error() {
        assert!(tokenize("p & q").is_err());
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \n\t").unwrap().is_empty());
        assert!(tokenize("# only a comment").unwrap().is_empty());
    }
}
