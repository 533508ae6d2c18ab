//! The lexer.

use derive_more::Display;
use regex::Regex;

use crate::error::Error;

/// Tokens in the program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[display("kind: '{kind}', part of input: '{text}'")]
pub struct Token<'src> {
    /// What token class this token belongs to.
    pub kind: TokenKind,
    /// What part of the input this token carries.
    pub text: &'src str,
    /// Byte offset of the first character of this token.
    pub pos: usize,
}

/// Token classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum TokenKind {
    #[display("identifier")]
    Ident,
    #[display("integer literal")]
    IntLit,
    #[display("character literal")]
    CharLit,
    #[display("int")]
    KwInt,
    #[display("void")]
    KwVoid,
    #[display("if")]
    KwIf,
    #[display("else")]
    KwElse,
    #[display("while")]
    KwWhile,
    #[display("for")]
    KwFor,
    #[display("return")]
    KwReturn,
    #[display("sizeof")]
    KwSizeof,
    #[display("extern")]
    KwExtern,
    #[display("(")]
    LParen,
    #[display(")")]
    RParen,
    #[display("{{")]
    LBrace,
    #[display("}}")]
    RBrace,
    #[display("[")]
    LBracket,
    #[display("]")]
    RBracket,
    #[display(",")]
    Comma,
    #[display(";")]
    Semi,
    #[display("==")]
    EqEq,
    #[display("=")]
    Assign,
    #[display("!=")]
    Ne,
    #[display("<=")]
    Le,
    #[display("<")]
    Lt,
    #[display(">=")]
    Ge,
    #[display(">")]
    Gt,
    #[display("+")]
    Plus,
    #[display("-")]
    Minus,
    #[display("*")]
    Star,
    #[display("/")]
    Slash,
    #[display("!")]
    Bang,
    #[display("~")]
    Tilde,
    #[display("&")]
    Amp,
}

pub struct Lexer<'input> {
    input: &'input str,
    pos: usize,
    whitespace: Regex,
    matchers: Vec<(Regex, TokenKind)>,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        // Order matters: keyword patterns and two-char operators must be
        // tried before the shorter patterns they are a prefix of (`Ident`,
        // one-char operators), since the first match in the list wins.
        let keyword = |word: &str| Regex::new(&format!(r"\A{word}\b")).unwrap();
        let matchers = vec![
            (keyword("int"), TokenKind::KwInt),
            (keyword("void"), TokenKind::KwVoid),
            (keyword("if"), TokenKind::KwIf),
            (keyword("else"), TokenKind::KwElse),
            (keyword("while"), TokenKind::KwWhile),
            (keyword("for"), TokenKind::KwFor),
            (keyword("return"), TokenKind::KwReturn),
            (keyword("sizeof"), TokenKind::KwSizeof),
            (keyword("extern"), TokenKind::KwExtern),
            (
                Regex::new(r"\A[A-Za-z_][A-Za-z0-9_]*").unwrap(),
                TokenKind::Ident,
            ),
            (Regex::new(r"\A[0-9]+").unwrap(), TokenKind::IntLit),
            (Regex::new(r"\A'(\\.|[^'\\])'").unwrap(), TokenKind::CharLit),
            (Regex::new(r"\A==").unwrap(), TokenKind::EqEq),
            (Regex::new(r"\A!=").unwrap(), TokenKind::Ne),
            (Regex::new(r"\A<=").unwrap(), TokenKind::Le),
            (Regex::new(r"\A>=").unwrap(), TokenKind::Ge),
            (Regex::new(r"\A\(").unwrap(), TokenKind::LParen),
            (Regex::new(r"\A\)").unwrap(), TokenKind::RParen),
            (Regex::new(r"\A\{").unwrap(), TokenKind::LBrace),
            (Regex::new(r"\A\}").unwrap(), TokenKind::RBrace),
            (Regex::new(r"\A\[").unwrap(), TokenKind::LBracket),
            (Regex::new(r"\A\]").unwrap(), TokenKind::RBracket),
            (Regex::new(r"\A,").unwrap(), TokenKind::Comma),
            (Regex::new(r"\A;").unwrap(), TokenKind::Semi),
            (Regex::new(r"\A=").unwrap(), TokenKind::Assign),
            (Regex::new(r"\A<").unwrap(), TokenKind::Lt),
            (Regex::new(r"\A>").unwrap(), TokenKind::Gt),
            (Regex::new(r"\A\+").unwrap(), TokenKind::Plus),
            (Regex::new(r"\A-").unwrap(), TokenKind::Minus),
            (Regex::new(r"\A\*").unwrap(), TokenKind::Star),
            (Regex::new(r"\A/").unwrap(), TokenKind::Slash),
            (Regex::new(r"\A!").unwrap(), TokenKind::Bang),
            (Regex::new(r"\A~").unwrap(), TokenKind::Tilde),
            (Regex::new(r"\A&").unwrap(), TokenKind::Amp),
        ];
        Lexer {
            input,
            pos: 0,
            whitespace: Regex::new(r"\A(?:[ \t\f\r\n\v]|(?://[^\n]*))*").unwrap(),
            matchers,
        }
    }

    /// Has the lexer reached the end of input?
    pub fn end_of_input(&self) -> bool {
        self.pos == self.input.len()
    }

    // Skip comments and whitespace.
    fn skip_whitespace(&mut self) {
        if let Some(m) = self.whitespace.find(&self.input[self.pos..]) {
            self.pos += m.end()
        }
    }

    /// Get the next token if possible.
    ///
    /// The return type distinguishes between end-of-input and lexer error.
    pub fn next(&mut self) -> Result<Option<Token<'input>>, Error> {
        self.skip_whitespace();
        if self.end_of_input() {
            return Ok(None);
        }
        let rest = &self.input[self.pos..];
        for (re, kind) in &self.matchers {
            if let Some(m) = re.find(rest) {
                let text = m.as_str();
                let token = Token {
                    kind: *kind,
                    text,
                    pos: self.pos,
                };
                self.pos += text.len();
                return Ok(Some(token));
            }
        }
        let bad = rest.chars().next().expect("not at end of input");
        Err(Error::Lex(self.pos, bad))
    }

    /// Lex the entire input into a vector of tokens.
    pub fn tokenize(mut self) -> Result<Vec<Token<'input>>, Error> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next()? {
            tokens.push(tok);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn keywords_not_confused_with_identifiers() {
        assert_eq!(kinds("int x"), vec![TokenKind::KwInt, TokenKind::Ident]);
        assert_eq!(kinds("intx"), vec![TokenKind::Ident]);
    }

    #[test]
    fn two_char_operators_take_priority() {
        assert_eq!(kinds("=="), vec![TokenKind::EqEq]);
        assert_eq!(kinds("="), vec![TokenKind::Assign]);
        assert_eq!(
            kinds("<= < >= >"),
            vec![TokenKind::Le, TokenKind::Lt, TokenKind::Ge, TokenKind::Gt]
        );
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        assert_eq!(
            kinds("int x; // comment\nint y;"),
            vec![
                TokenKind::KwInt,
                TokenKind::Ident,
                TokenKind::Semi,
                TokenKind::KwInt,
                TokenKind::Ident,
                TokenKind::Semi,
            ]
        );
    }

    #[test]
    fn char_literal() {
        let toks = Lexer::new("'a'").tokenize().unwrap();
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::CharLit);
        assert_eq!(toks[0].text, "'a'");
    }

    #[test]
    fn unexpected_character_is_an_error() {
        assert!(Lexer::new("int x = @;").tokenize().is_err());
    }
}
