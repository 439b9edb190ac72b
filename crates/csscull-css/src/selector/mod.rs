//! CSS selector model
//!
//! The structures here mirror the selector productions of
//! [Selectors Level 3 § 10](https://www.w3.org/TR/selectors-3/#w3cselgrammar):
//! a group of selectors, each a chain of simple selector sequences joined by
//! combinators. Every type serializes back to canonical selector text through
//! [`core::fmt::Display`], which is what gets handed to a selector engine.

use core::fmt;

use serde::Serialize;

/// [§ 5 Groups of selectors](https://www.w3.org/TR/selectors-3/#grouping)
///
/// "A comma-separated list of selectors represents the union of all elements
/// selected by each of the individual selectors in the list."
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorGroup {
    /// The alternatives, in source order. Never empty.
    pub selectors: Vec<Selector>,
}

/// [§ 3 Selector syntax](https://www.w3.org/TR/selectors-3/#selector-syntax)
///
/// "A selector is a chain of one or more sequences of simple selectors
/// separated by combinators."
///
/// Example: `div.container > ul.nav li`
/// ```text
/// head: [div.container]  tail: [(Child, [ul.nav]), (Descendant, [li])]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selector {
    /// The leftmost sequence.
    pub head: SimpleSelectorSequence,
    /// Every following sequence with the combinator that joins it to the
    /// one before, left to right.
    pub tail: Vec<(Combinator, SimpleSelectorSequence)>,
}

impl Selector {
    /// A selector made of a single sequence.
    #[must_use]
    pub const fn simple(head: SimpleSelectorSequence) -> Self {
        Self {
            head,
            tail: Vec::new(),
        }
    }

    /// The rightmost sequence, i.e. the subject of the selector.
    #[must_use]
    pub fn subject(&self) -> &SimpleSelectorSequence {
        self.tail.last().map_or(&self.head, |(_, sequence)| sequence)
    }
}

/// [§ 8 Combinators](https://www.w3.org/TR/selectors-3/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Combinator {
    /// [§ 8.1 Descendant combinator](https://www.w3.org/TR/selectors-3/#descendant-combinators)
    /// "A descendant combinator is whitespace that separates two sequences of
    /// simple selectors."
    Descendant,

    /// [§ 8.2 Child combinator](https://www.w3.org/TR/selectors-3/#child-combinators)
    /// `A > B`
    Child,

    /// [§ 8.3.1 Adjacent sibling combinator](https://www.w3.org/TR/selectors-3/#adjacent-sibling-combinators)
    /// `A + B`
    NextSibling,

    /// [§ 8.3.2 General sibling combinator](https://www.w3.org/TR/selectors-3/#general-sibling-combinators)
    /// `A ~ B`
    SubsequentSibling,
}

/// [§ 4 Selector syntax](https://www.w3.org/TR/selectors-3/#selector-syntax)
///
/// "A sequence of simple selectors is a chain of simple selectors that are
/// not separated by a combinator. It always begins with a type selector or a
/// universal selector. No other type selector or universal selector is
/// allowed in the sequence."
///
/// The leading type or universal selector is optional in the source; a
/// sequence such as `.note` has `element: None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SimpleSelectorSequence {
    /// The type or universal selector, if one was written.
    pub element: Option<ElementSelector>,
    /// The id, class, attribute, pseudo, and negation selectors, in source order.
    pub qualifiers: Vec<Qualifier>,
}

/// [§ 6.1.1 Type selectors and namespaces](https://www.w3.org/TR/selectors-3/#typenmsp)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum NamespacePrefix {
    /// `ns|E`
    Named(String),
    /// `*|E`: any namespace, including none.
    Any,
    /// `|E`: no namespace.
    None,
}

/// [§ 6.1 Type selector](https://www.w3.org/TR/selectors-3/#type-selectors) or
/// [§ 6.2 Universal selector](https://www.w3.org/TR/selectors-3/#universal-selector)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ElementSelector {
    /// Examples: `div`, `svg|rect`
    Type {
        /// Optional namespace prefix.
        namespace: Option<NamespacePrefix>,
        /// Element name as written.
        name: String,
    },
    /// Examples: `*`, `ns|*`
    Universal {
        /// Optional namespace prefix.
        namespace: Option<NamespacePrefix>,
    },
}

/// A simple selector that may follow the type/universal selector of a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Qualifier {
    /// [§ 6.5 ID selectors](https://www.w3.org/TR/selectors-3/#id-selectors)
    /// Example: `#main` (stored without the `#`)
    Id(String),

    /// [§ 6.4 Class selectors](https://www.w3.org/TR/selectors-3/#class-html)
    /// Example: `.note` (stored without the `.`)
    Class(String),

    /// [§ 6.3 Attribute selectors](https://www.w3.org/TR/selectors-3/#attribute-selectors)
    Attribute(AttributeSelector),

    /// [§ 6.6 Pseudo-classes](https://www.w3.org/TR/selectors-3/#pseudo-classes) and
    /// [§ 7 Pseudo-elements](https://www.w3.org/TR/selectors-3/#pseudo-elements)
    Pseudo(PseudoSelector),

    /// [§ 6.6.7 The negation pseudo-class](https://www.w3.org/TR/selectors-3/#negation)
    /// Example: `:not(.hidden)`
    Negation(NegationArgument),
}

/// [§ 6.3.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-3/#attribute-representation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeOperator {
    /// `[att=val]`
    Equals,
    /// `[att~=val]`
    Includes,
    /// `[att|=val]`
    DashMatch,
    /// `[att^=val]`
    PrefixMatch,
    /// `[att$=val]`
    SuffixMatch,
    /// `[att*=val]`
    SubstringMatch,
}

impl AttributeOperator {
    /// The operator as written in a selector.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::PrefixMatch => "^=",
            Self::SuffixMatch => "$=",
            Self::SubstringMatch => "*=",
        }
    }
}

/// The right-hand side of an attribute selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeValue {
    /// An unquoted identifier.
    Ident(String),
    /// A quoted string, stored without its quotes.
    String(String),
}

impl AttributeValue {
    /// The value with any quoting removed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ident(s) | Self::String(s) => s,
        }
    }
}

/// [§ 6.3 Attribute selectors](https://www.w3.org/TR/selectors-3/#attribute-selectors)
///
/// Examples: `[href]`, `[lang|=en]`, `[href^='https']`, `[xlink|href]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AttributeSelector {
    /// Optional namespace prefix of the attribute name.
    pub namespace: Option<NamespacePrefix>,
    /// Attribute name.
    pub name: String,
    /// Operator and value, or `None` for a presence test.
    pub matcher: Option<(AttributeOperator, AttributeValue)>,
}

/// A pseudo-class (`:hover`, `:nth-child(2n+1)`) or pseudo-element (`::before`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PseudoSelector {
    /// Written with `::`.
    pub element: bool,
    /// Name without colons or parenthesis.
    pub name: String,
    /// Expression terms of a functional pseudo, e.g. `["2n", "+1"]`.
    pub arguments: Option<Vec<String>>,
}

/// [§ 6.6.7 The negation pseudo-class](https://www.w3.org/TR/selectors-3/#negation)
///
/// "The negation pseudo-class, :not(X), is a functional notation taking a
/// simple selector (excluding the negation pseudo-class itself) as an
/// argument."
///
/// Pseudo-elements and functional pseudo-classes are accepted as arguments
/// too, which is more permissive than Selectors Level 3.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum NegationArgument {
    /// `:not(div)`, `:not(*)`
    Element(ElementSelector),
    /// `:not(#id)`
    Id(String),
    /// `:not(.class)`
    Class(String),
    /// `:not([attr])`
    Attribute(AttributeSelector),
    /// `:not(:hover)`
    Pseudo(PseudoSelector),
}

// Serialization.

impl fmt::Display for SelectorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        for (combinator, sequence) in &self.tail {
            write!(f, "{combinator}{sequence}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Descendant => " ",
            Self::Child => " > ",
            Self::NextSibling => " + ",
            Self::SubsequentSibling => " ~ ",
        })
    }
}

impl fmt::Display for SimpleSelectorSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element {
            Some(element) => write!(f, "{element}")?,
            // An empty sequence cannot come out of the parser, but keep the
            // text a valid selector anyway.
            None if self.qualifiers.is_empty() => f.write_str("*")?,
            None => {}
        }
        for qualifier in &self.qualifiers {
            write!(f, "{qualifier}")?;
        }
        Ok(())
    }
}

impl fmt::Display for NamespacePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}|"),
            Self::Any => f.write_str("*|"),
            Self::None => f.write_str("|"),
        }
    }
}

fn write_namespace(f: &mut fmt::Formatter<'_>, namespace: Option<&NamespacePrefix>) -> fmt::Result {
    namespace.map_or(Ok(()), |ns| write!(f, "{ns}"))
}

impl fmt::Display for ElementSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type { namespace, name } => {
                write_namespace(f, namespace.as_ref())?;
                f.write_str(name)
            }
            Self::Universal { namespace } => {
                write_namespace(f, namespace.as_ref())?;
                f.write_str("*")
            }
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Attribute(attribute) => write!(f, "{attribute}"),
            Self::Pseudo(pseudo) => write!(f, "{pseudo}"),
            Self::Negation(argument) => write!(f, ":not({argument})"),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(ident) => f.write_str(ident),
            Self::String(s) if s.contains('"') => write!(f, "'{s}'"),
            Self::String(s) => write!(f, "\"{s}\""),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        write_namespace(f, self.namespace.as_ref())?;
        f.write_str(&self.name)?;
        if let Some((operator, value)) = &self.matcher {
            write!(f, "{}{value}", operator.as_str())?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for PseudoSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.element { "::" } else { ":" })?;
        f.write_str(&self.name)?;
        if let Some(arguments) = &self.arguments {
            f.write_str("(")?;
            let mut previous: Option<&str> = None;
            for term in arguments {
                // `2n + 1` was scanned as `2n`, `+`, `1`; only words that
                // would otherwise fuse need a space between them.
                if previous.is_some_and(|p| ends_with_name_char(p) && starts_with_name_char(term)) {
                    f.write_str(" ")?;
                }
                f.write_str(term)?;
                previous = Some(term);
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for NegationArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(element) => write!(f, "{element}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Attribute(attribute) => write!(f, "{attribute}"),
            Self::Pseudo(pseudo) => write!(f, "{pseudo}"),
        }
    }
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn ends_with_name_char(s: &str) -> bool {
    s.chars().next_back().is_some_and(is_name_char)
}

fn starts_with_name_char(s: &str) -> bool {
    s.chars().next().is_some_and(is_name_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_selector(name: &str) -> SimpleSelectorSequence {
        SimpleSelectorSequence {
            element: Some(ElementSelector::Type {
                namespace: None,
                name: name.to_string(),
            }),
            qualifiers: Vec::new(),
        }
    }

    #[test]
    fn test_display_chain() {
        let selector = Selector {
            head: type_selector("ul"),
            tail: vec![
                (Combinator::Child, type_selector("li")),
                (Combinator::Descendant, type_selector("a")),
                (Combinator::NextSibling, type_selector("b")),
                (Combinator::SubsequentSibling, type_selector("i")),
            ],
        };
        assert_eq!(selector.to_string(), "ul > li a + b ~ i");
        assert_eq!(selector.tail.len(), 4);
        assert_eq!(selector.subject(), &type_selector("i"));
    }

    #[test]
    fn test_display_pseudo_arguments() {
        let pseudo = PseudoSelector {
            element: false,
            name: "nth-child".to_string(),
            arguments: Some(vec!["2n".to_string(), "+".to_string(), "1".to_string()]),
        };
        assert_eq!(pseudo.to_string(), ":nth-child(2n+1)");

        let words = PseudoSelector {
            element: false,
            name: "x".to_string(),
            arguments: Some(vec!["a".to_string(), "b".to_string()]),
        };
        assert_eq!(words.to_string(), ":x(a b)");
    }

    #[test]
    fn test_display_attribute_quoting() {
        let attribute = AttributeSelector {
            namespace: Some(NamespacePrefix::Named("xlink".to_string())),
            name: "href".to_string(),
            matcher: Some((
                AttributeOperator::PrefixMatch,
                AttributeValue::String("x".to_string()),
            )),
        };
        assert_eq!(attribute.to_string(), "[xlink|href^=\"x\"]");

        let quoted = AttributeValue::String("say \"hi\"".to_string());
        assert_eq!(quoted.to_string(), "'say \"hi\"'");
    }

    #[test]
    fn test_display_qualifier_only_sequence() {
        let sequence = SimpleSelectorSequence {
            element: None,
            qualifiers: vec![
                Qualifier::Class("a".to_string()),
                Qualifier::Negation(NegationArgument::Element(ElementSelector::Universal {
                    namespace: Some(NamespacePrefix::None),
                })),
            ],
        };
        assert_eq!(sequence.to_string(), ".a:not(|*)");
    }
}
