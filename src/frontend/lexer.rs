//! Logos-based lexer for the declaration language.

use logos::Logos;
use text_size::TextSize;

/// A token with its kind, text, and byte offset within its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer.
///
/// Whitespace and line comments are skipped; everything else comes through,
/// including unrecognized input as [`TokenKind::Error`].
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.inner.span().start as u32);

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => TokenKind::Error,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec.
#[allow(dead_code)]
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Public token kinds, including the error kind logos itself never emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    FnKw,
    VarKw,
    TypeKw,
    IncludeKw,
    IfdefDirective,
    EndifDirective,
    Ident,
    String,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Semi,
    Comma,
    Error,
}

/// Logos token enum - maps to TokenKind.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
enum LogosToken {
    #[token("fn")]
    FnKw,

    #[token("var")]
    VarKw,

    #[token("type")]
    TypeKw,

    #[token("include")]
    IncludeKw,

    // Directive keeps its name in the token text; the preprocessor splits
    // it back out.
    #[regex(r"#ifdef[ \t]+[A-Za-z_][A-Za-z0-9_]*")]
    IfdefDirective,

    #[token("#endif")]
    EndifDirective,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r#""[^"\n]*""#)]
    String,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(";")]
    Semi,

    #[token(",")]
    Comma,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::FnKw => TokenKind::FnKw,
            LogosToken::VarKw => TokenKind::VarKw,
            LogosToken::TypeKw => TokenKind::TypeKw,
            LogosToken::IncludeKw => TokenKind::IncludeKw,
            LogosToken::IfdefDirective => TokenKind::IfdefDirective,
            LogosToken::EndifDirective => TokenKind::EndifDirective,
            LogosToken::Ident => TokenKind::Ident,
            LogosToken::String => TokenKind::String,
            LogosToken::LBrace => TokenKind::LBrace,
            LogosToken::RBrace => TokenKind::RBrace,
            LogosToken::LParen => TokenKind::LParen,
            LogosToken::RParen => TokenKind::RParen,
            LogosToken::Semi => TokenKind::Semi,
            LogosToken::Comma => TokenKind::Comma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_punctuation() {
        assert_eq!(
            kinds("fn main { var x; }"),
            vec![
                TokenKind::FnKw,
                TokenKind::Ident,
                TokenKind::LBrace,
                TokenKind::VarKw,
                TokenKind::Ident,
                TokenKind::Semi,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_call_statement() {
        assert_eq!(
            kinds("start(a, b);"),
            vec![
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::Semi,
            ]
        );
    }

    #[test]
    fn test_directives() {
        assert_eq!(
            kinds("#ifdef DEBUG\nvar x;\n#endif"),
            vec![
                TokenKind::IfdefDirective,
                TokenKind::VarKw,
                TokenKind::Ident,
                TokenKind::Semi,
                TokenKind::EndifDirective,
            ]
        );
        let tokens = tokenize("#ifdef DEBUG");
        assert_eq!(tokens[0].text, "#ifdef DEBUG");
    }

    #[test]
    fn test_include_with_string() {
        assert_eq!(
            kinds(r#"include "defs.x""#),
            vec![TokenKind::IncludeKw, TokenKind::String]
        );
    }

    #[test]
    fn test_comments_and_whitespace_skipped() {
        assert_eq!(
            kinds("// a comment\nvar x; // trailing"),
            vec![TokenKind::VarKw, TokenKind::Ident, TokenKind::Semi]
        );
    }

    #[test]
    fn test_offsets_are_byte_positions() {
        let tokens = tokenize("var  x;");
        assert_eq!(u32::from(tokens[0].offset), 0);
        assert_eq!(u32::from(tokens[1].offset), 5);
        assert_eq!(u32::from(tokens[2].offset), 6);
    }

    #[test]
    fn test_unrecognized_input_is_error() {
        let tokens = tokenize("var @;");
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[1].text, "@");
    }
}
