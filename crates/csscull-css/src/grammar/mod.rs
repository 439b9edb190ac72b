//! The stylesheet grammar as a static production table.
//!
//! Productions follow the CSS 2.1 core grammar
//! ([Appendix G.1](https://www.w3.org/TR/CSS21/grammar.html#grammar)) with the
//! selector productions of
//! [Selectors Level 3 § 10.1](https://www.w3.org/TR/selectors-3/#grammar),
//! reshaped so that an LALR(1) table can be built from them: selector groups
//! and declaration lists are left-recursive, and identifiers of every kind go
//! through one [`Nonterminal::Ident`].
//!
//! Every production carries a [`Rule`] tag naming the semantic action the
//! parser runs when it reduces it.

mod table;

use core::fmt;

use strum::EnumCount as _;
use strum_macros::{Display, EnumCount};

use crate::tokenizer::TokenKind;

pub(crate) use table::{Action, PARSE_TABLE, ParseTable};

/// A grammar terminal: a token kind, the synthetic descendant combinator, or
/// end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Terminal {
    Token(TokenKind),
    /// Whitespace between two compound selectors.
    Descendant,
    End,
}

impl Terminal {
    pub const COUNT: usize = TokenKind::COUNT + 2;

    pub const fn index(self) -> usize {
        match self {
            Self::Token(kind) => kind as usize,
            Self::Descendant => TokenKind::COUNT,
            Self::End => TokenKind::COUNT + 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index.checked_sub(TokenKind::COUNT) {
            None => TokenKind::from_repr(u8::try_from(index).ok()?).map(Self::Token),
            Some(0) => Some(Self::Descendant),
            Some(1) => Some(Self::End),
            Some(_) => None,
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(kind) => match kind.literal() {
                Some(literal) => write!(f, "'{literal}'"),
                None => write!(f, "{kind}"),
            },
            Self::Descendant => f.write_str("whitespace"),
            Self::End => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumCount)]
pub(crate) enum Nonterminal {
    Start,
    Stylesheet,
    Statement,
    Import,
    ImportTarget,
    MediaList,
    Namespace,
    Ruleset,
    DeclarationList,
    OptDeclaration,
    Declaration,
    Property,
    Anys,
    Any,
    Dimension,
    SelectorGroup,
    Selector,
    Combinator,
    Sequence,
    Qualifiers,
    Qualifier,
    TypeSelector,
    Universal,
    NamespacePrefix,
    Class,
    Attrib,
    AttribName,
    AttribOp,
    AttribValue,
    Pseudo,
    FunctionalPseudo,
    Expressions,
    Expression,
    Negation,
    NegationArg,
    Ident,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Symbol {
    Terminal(Terminal),
    Nonterminal(Nonterminal),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(terminal) => write!(f, "{terminal}"),
            Self::Nonterminal(nonterminal) => write!(f, "{nonterminal}"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Production {
    pub lhs: Nonterminal,
    pub rhs: &'static [Symbol],
    pub rule: Rule,
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        if self.rhs.is_empty() {
            return f.write_str(" (empty)");
        }
        for symbol in self.rhs {
            write!(f, " {symbol}")?;
        }
        Ok(())
    }
}

macro_rules! symbol {
    (t $kind:ident) => {
        Symbol::Terminal(Terminal::Token(TokenKind::$kind))
    };
    (n $nonterminal:ident) => {
        Symbol::Nonterminal(Nonterminal::$nonterminal)
    };
    (s $terminal:ident) => {
        Symbol::Terminal(Terminal::$terminal)
    };
}

/// Declares the [`Rule`] tags and the [`PRODUCTIONS`] table in one go, so the
/// two cannot drift apart.
macro_rules! grammar {
    ($($rule:ident: $lhs:ident -> [$($f:ident($sym:ident)),*];)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub(crate) enum Rule {
            $($rule,)*
        }

        pub(crate) static PRODUCTIONS: &[Production] = &[
            $(Production {
                lhs: Nonterminal::$lhs,
                rhs: &[$(symbol!($f $sym)),*],
                rule: Rule::$rule,
            },)*
        ];
    };
}

grammar! {
    // Production 0 is the augmented start rule; reducing it accepts.
    Accept: Start -> [n(Stylesheet)];

    EmptyStylesheet: Stylesheet -> [];
    AppendStatement: Stylesheet -> [n(Stylesheet), n(Statement)];
    SkipCdo: Stylesheet -> [n(Stylesheet), t(Cdo)];
    SkipCdc: Stylesheet -> [n(Stylesheet), t(Cdc)];

    RulesetStatement: Statement -> [n(Ruleset)];
    ImportStatement: Statement -> [n(Import)];
    NamespaceStatement: Statement -> [n(Namespace)];

    Import: Import -> [t(ImportSym), n(ImportTarget), t(Semicolon)];
    ImportWithMedia: Import -> [t(ImportSym), n(ImportTarget), n(MediaList), t(Semicolon)];
    StringTarget: ImportTarget -> [t(String)];
    UriTarget: ImportTarget -> [t(Uri)];
    FirstMedium: MediaList -> [n(Ident)];
    NextMedium: MediaList -> [n(MediaList), t(Comma), n(Ident)];

    DefaultNamespace: Namespace -> [t(NamespaceSym), n(ImportTarget), t(Semicolon)];
    PrefixedNamespace: Namespace -> [t(NamespaceSym), n(Ident), n(ImportTarget), t(Semicolon)];

    Ruleset: Ruleset -> [n(SelectorGroup), t(LeftBrace), n(DeclarationList), t(RightBrace)];
    AnonymousRuleset: Ruleset -> [t(LeftBrace), n(DeclarationList), t(RightBrace)];

    FirstDeclaration: DeclarationList -> [n(OptDeclaration)];
    NextDeclaration: DeclarationList -> [n(DeclarationList), t(Semicolon), n(OptDeclaration)];
    NoDeclaration: OptDeclaration -> [];
    SomeDeclaration: OptDeclaration -> [n(Declaration)];
    Declaration: Declaration -> [n(Property), t(Colon), n(Anys)];
    Property: Property -> [n(Ident)];

    FirstAny: Anys -> [n(Any)];
    NextAny: Anys -> [n(Anys), n(Any)];
    CommaAny: Anys -> [n(Anys), t(Comma), n(Any)];

    DimensionAny: Any -> [n(Dimension)];
    IdentAny: Any -> [n(Ident)];
    PercentageAny: Any -> [t(Percentage)];
    UriAny: Any -> [t(Uri)];
    StringAny: Any -> [t(String)];
    NumberAny: Any -> [t(Number)];
    HashAny: Any -> [t(Hash)];
    IncludesAny: Any -> [t(Includes)];
    DashMatchAny: Any -> [t(DashMatch)];
    PlusAny: Any -> [t(Plus)];
    MinusAny: Any -> [t(Minus)];
    StarAny: Any -> [t(Star)];
    EqualsAny: Any -> [t(Equals)];
    EmptyFunction: Any -> [t(Function), t(RightParen)];
    Function: Any -> [t(Function), n(Anys), t(RightParen)];
    EmptyParens: Any -> [t(LeftParen), t(RightParen)];
    Parens: Any -> [t(LeftParen), n(Anys), t(RightParen)];
    EmptyBrackets: Any -> [t(LeftBracket), t(RightBracket)];
    Brackets: Any -> [t(LeftBracket), n(Anys), t(RightBracket)];

    Em: Dimension -> [t(Em)];
    Ex: Dimension -> [t(Ex)];
    Pixel: Dimension -> [t(Pixel)];
    Centimeter: Dimension -> [t(Centimeter)];
    Millimeter: Dimension -> [t(Millimeter)];
    Inch: Dimension -> [t(Inch)];
    Point: Dimension -> [t(Point)];
    Pica: Dimension -> [t(Pica)];
    Degree: Dimension -> [t(Degree)];
    Radian: Dimension -> [t(Radian)];
    Gradian: Dimension -> [t(Gradian)];
    Millisecond: Dimension -> [t(Millisecond)];
    Second: Dimension -> [t(Second)];
    Hertz: Dimension -> [t(Hertz)];
    Kilohertz: Dimension -> [t(Kilohertz)];
    OtherDimension: Dimension -> [t(Dimension)];

    // Each reduction records the selector it adds.
    FirstSelector: SelectorGroup -> [n(Selector)];
    NextSelector: SelectorGroup -> [n(SelectorGroup), t(Comma), n(Selector)];

    SingleSequence: Selector -> [n(Sequence)];
    Combined: Selector -> [n(Sequence), n(Combinator), n(Selector)];
    Juxtaposed: Selector -> [n(Sequence), n(Selector)];

    NextSibling: Combinator -> [t(Plus)];
    Child: Combinator -> [t(Greater)];
    SubsequentSibling: Combinator -> [t(Tilde)];
    Descendant: Combinator -> [s(Descendant)];

    QualifiedType: Sequence -> [n(TypeSelector), n(Qualifiers)];
    BareType: Sequence -> [n(TypeSelector)];
    QualifiedUniversal: Sequence -> [n(Universal), n(Qualifiers)];
    BareUniversal: Sequence -> [n(Universal)];
    QualifiersOnly: Sequence -> [n(Qualifiers)];

    FirstQualifier: Qualifiers -> [n(Qualifier)];
    NextQualifier: Qualifiers -> [n(Qualifiers), n(Qualifier)];
    IdQualifier: Qualifier -> [t(Hash)];
    ClassQualifier: Qualifier -> [n(Class)];
    AttribQualifier: Qualifier -> [n(Attrib)];
    PseudoQualifier: Qualifier -> [n(Pseudo)];
    NegationQualifier: Qualifier -> [n(Negation)];

    TypeName: TypeSelector -> [n(Ident)];
    PrefixedTypeName: TypeSelector -> [n(NamespacePrefix), n(Ident)];
    Universal: Universal -> [t(Star)];
    PrefixedUniversal: Universal -> [n(NamespacePrefix), t(Star)];
    NamedPrefix: NamespacePrefix -> [n(Ident), t(Pipe)];
    AnyPrefix: NamespacePrefix -> [t(Star), t(Pipe)];
    EmptyPrefix: NamespacePrefix -> [t(Pipe)];

    Class: Class -> [t(Dot), n(Ident)];

    AttribPresent: Attrib -> [t(LeftBracket), n(AttribName), t(RightBracket)];
    AttribMatch: Attrib -> [t(LeftBracket), n(AttribName), n(AttribOp), n(AttribValue), t(RightBracket)];
    AttribName: AttribName -> [n(Ident)];
    PrefixedAttribName: AttribName -> [n(NamespacePrefix), n(Ident)];
    EqualsOp: AttribOp -> [t(Equals)];
    IncludesOp: AttribOp -> [t(Includes)];
    DashMatchOp: AttribOp -> [t(DashMatch)];
    PrefixMatchOp: AttribOp -> [t(PrefixMatch)];
    SuffixMatchOp: AttribOp -> [t(SuffixMatch)];
    SubstringMatchOp: AttribOp -> [t(SubstringMatch)];
    IdentValue: AttribValue -> [n(Ident)];
    StringValue: AttribValue -> [t(String)];

    PseudoClass: Pseudo -> [t(Colon), n(Ident)];
    PseudoElement: Pseudo -> [t(Colon), t(Colon), n(Ident)];
    FunctionalPseudoClass: Pseudo -> [t(Colon), n(FunctionalPseudo)];
    FunctionalPseudoElement: Pseudo -> [t(Colon), t(Colon), n(FunctionalPseudo)];
    FunctionalPseudo: FunctionalPseudo -> [t(Function), n(Expressions), t(RightParen)];
    FirstExpression: Expressions -> [n(Expression)];
    NextExpression: Expressions -> [n(Expressions), n(Expression)];
    PlusTerm: Expression -> [t(Plus)];
    MinusTerm: Expression -> [t(Minus)];
    NumberTerm: Expression -> [t(Number)];
    StringTerm: Expression -> [t(String)];
    IdentTerm: Expression -> [n(Ident)];
    DimensionTerm: Expression -> [n(Dimension)];

    Negation: Negation -> [t(Colon), t(Not), n(NegationArg), t(RightParen)];
    NegatedType: NegationArg -> [n(TypeSelector)];
    NegatedUniversal: NegationArg -> [n(Universal)];
    NegatedId: NegationArg -> [t(Hash)];
    NegatedClass: NegationArg -> [n(Class)];
    NegatedAttrib: NegationArg -> [n(Attrib)];
    NegatedPseudo: NegationArg -> [n(Pseudo)];

    PlainIdent: Ident -> [t(Ident)];
    ColorIdent: Ident -> [t(ColorKeyword)];
    PropertyIdent: Ident -> [t(PropertyName)];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_index_round_trips() {
        for index in 0..Terminal::COUNT {
            let terminal = Terminal::from_index(index);
            assert_eq!(terminal.map(Terminal::index), Some(index));
        }
        assert_eq!(Terminal::from_index(Terminal::COUNT), None);
    }

    #[test]
    fn test_accept_is_first() {
        assert_eq!(PRODUCTIONS[0].rule, Rule::Accept);
        assert_eq!(PRODUCTIONS[0].lhs, Nonterminal::Start);
        assert!(
            PRODUCTIONS[1..]
                .iter()
                .all(|production| production.lhs != Nonterminal::Start)
        );
    }

    #[test]
    fn test_every_nonterminal_has_a_production() {
        let mut seen = [false; Nonterminal::COUNT];
        for production in PRODUCTIONS {
            seen[production.lhs as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_production_display() {
        let combined = PRODUCTIONS
            .iter()
            .find(|production| production.rule == Rule::Combined)
            .map(ToString::to_string);
        assert_eq!(
            combined.as_deref(),
            Some("Selector -> Sequence Combinator Selector")
        );
    }
}
