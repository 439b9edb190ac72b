//! CSS3 token kinds and the token record.
//!
//! The kinds follow the lexical scanner of
//! [CSS 2.1 Appendix G.2](https://www.w3.org/TR/CSS21/grammar.html#scanner) and
//! [Selectors Level 3 § 10.2](https://www.w3.org/TR/selectors-3/#lex), with
//! one kind per unit for the dimensioned numbers the grammar knows about.

use core::fmt;

use csscull_common::Position;
use serde::Serialize;
use strum_macros::{Display, EnumCount, FromRepr};

/// Every kind of token the tokenizer can emit.
///
/// The declaration order is the order in which the tokenizer's rules are
/// tried (structural literals excepted, which are tried last): the first rule
/// that matches at the scan position wins, regardless of match length.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumCount,
    FromRepr,
    Serialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TokenKind {
    // Structural literals.
    /// `|`
    Pipe,
    /// `*`
    Star,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `=`
    Equals,
    /// `+`
    Plus,
    /// `>`
    Greater,
    /// `~`
    Tilde,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `-`
    Minus,
    /// `:`
    Colon,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `;`
    Semicolon,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,

    // Attribute-match operators.
    /// `~=`
    Includes,
    /// `|=`
    DashMatch,
    /// `^=`
    PrefixMatch,
    /// `$=`
    SuffixMatch,
    /// `*=`
    SubstringMatch,

    // Dimensioned numbers.
    /// `<num>em`
    Em,
    /// `<num>ex`
    Ex,
    /// `<num>px`
    Pixel,
    /// `<num>cm`
    Centimeter,
    /// `<num>mm`
    Millimeter,
    /// `<num>in`
    Inch,
    /// `<num>pt`
    Point,
    /// `<num>pc`
    Pica,
    /// `<num>deg`
    Degree,
    /// `<num>rad`
    Radian,
    /// `<num>grad`
    Gradian,
    /// `<num>ms`
    Millisecond,
    /// `<num>s`
    Second,
    /// `<num>Hz`
    Hertz,
    /// `<num>kHz`
    Kilohertz,
    /// `<num><ident>` for any unit without a rule of its own.
    Dimension,

    // Functions and misc.
    /// `not(`
    Not,
    /// `url(<string>)` or `url(<url>)`
    Uri,
    /// `<ident>(`
    Function,
    /// `#<name>`
    Hash,
    /// `<num>%`
    Percentage,

    // At-keywords.
    /// `@import`
    ImportSym,
    /// `@namespace`
    NamespaceSym,
    /// `@<ident>`
    AtKeyword,

    // SGML comment delimiters.
    /// `<!--`
    Cdo,
    /// `-->`
    Cdc,

    // Primitives.
    /// An integer or decimal number.
    Number,
    /// A single- or double-quoted string, quotes included.
    String,
    /// An identifier that is not a recognized keyword.
    Ident,
    /// An identifier naming a CSS color, e.g. `red` or `papayawhip`.
    ColorKeyword,
    /// An identifier naming a known CSS property, e.g. `background-color`.
    PropertyName,
}

impl TokenKind {
    /// The literal text of a structural or operator kind, if it has one.
    #[must_use]
    pub const fn literal(self) -> Option<&'static str> {
        Some(match self {
            Self::Pipe => "|",
            Self::Star => "*",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::Equals => "=",
            Self::Plus => "+",
            Self::Greater => ">",
            Self::Tilde => "~",
            Self::Dot => ".",
            Self::Comma => ",",
            Self::Minus => "-",
            Self::Colon => ":",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::Semicolon => ";",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::PrefixMatch => "^=",
            Self::SuffixMatch => "$=",
            Self::SubstringMatch => "*=",
            Self::Cdo => "<!--",
            Self::Cdc => "-->",
            _ => return None,
        })
    }

    /// Returns true for kinds produced from an identifier lexeme.
    #[must_use]
    pub const fn is_ident(self) -> bool {
        matches!(self, Self::Ident | Self::ColorKeyword | Self::PropertyName)
    }
}

/// A token: its kind, the exact source text it was scanned from, and where
/// that text starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// What the lexeme was classified as.
    pub kind: TokenKind,
    /// The lexeme, borrowed from the input.
    pub text: &'a str,
    /// Offset, line and column of the first character of the lexeme.
    pub position: Position,
}

impl<'a> Token<'a> {
    /// Create a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, text: &'a str, position: Position) -> Self {
        Self {
            kind,
            text,
            position,
        }
    }

    /// Byte offset one past the end of the lexeme.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.position.offset + self.text.len()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}>", self.kind, self.text)
    }
}
