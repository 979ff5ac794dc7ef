//! Lexer for the restricted rotation-assembly dialect (spec.md §6).
//!
//! Unlike a general OpenQASM 3 grammar, this dialect has no expressions,
//! no user-defined gates, and no control flow — one line is one
//! statement. The lexer only needs to recognize identifiers, numbers
//! (used both for angles and register indices), and the handful of
//! punctuation marks a gate line uses.

use logos::Logos;

/// Tokens of one input line.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,

    /// A signed real number — used for both rotation angles and, when
    /// non-negative and integral, register indices.
    #[regex(r"-?[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"-?[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    /// An identifier: a gate keyword, header keyword, or register name.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Comma => write!(f, "','"),
            Token::Semicolon => write!(f, "';'"),
            Token::Number(n) => write!(f, "number '{n}'"),
            Token::Ident(s) => write!(f, "identifier '{s}'"),
        }
    }
}

/// Tokenize a single (comment-already-stripped) line.
///
/// Returns `Err` with the byte offset of the first token the lexer could
/// not recognize.
pub fn tokenize(line: &str) -> Result<Vec<Token>, usize> {
    let mut lexer = Token::lexer(line);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(tok) => tokens.push(tok),
            Err(()) => return Err(lexer.span().start),
        }
    }
    Ok(tokens)
}
