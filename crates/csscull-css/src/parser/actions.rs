//! Semantic actions: what each production builds when it is reduced.

use csscull_common::Diagnostic;

use crate::grammar::Rule;
use crate::selector::{
    AttributeOperator, AttributeSelector, AttributeValue, Combinator, ElementSelector,
    NamespacePrefix, NegationArgument, PseudoSelector, Qualifier, Selector, SelectorGroup,
    SimpleSelectorSequence,
};
use crate::stylesheet::{Declaration, Import, ImportTarget, Namespace, Ruleset, Statement, Value};
use crate::tokenizer::Token;

/// A value on the parse stack.
#[derive(Debug)]
pub(super) enum Node<'a> {
    /// Bottom of the stack.
    Empty,
    Token(Token<'a>),
    Descendant,
    Stylesheet(Vec<Statement>),
    Statement(Statement),
    Target(ImportTarget),
    Words(Vec<String>),
    Declarations(Vec<Declaration>),
    Declaration(Option<Declaration>),
    Values(Vec<Value>),
    Value(Value),
    Group(SelectorGroup),
    Selector(Selector),
    Combinator(Combinator),
    Sequence(SimpleSelectorSequence),
    Qualifiers(Vec<Qualifier>),
    Qualifier(Qualifier),
    Element(ElementSelector),
    Prefix(NamespacePrefix),
    Attribute(AttributeSelector),
    AttributeName((Option<NamespacePrefix>, String)),
    Operator(AttributeOperator),
    AttributeValue(AttributeValue),
    Pseudo(PseudoSelector),
    Text(String),
    Negation(NegationArgument),
}

/// What a parse call accumulates besides the stylesheet itself.
#[derive(Debug, Default)]
pub(super) struct Output {
    pub selectors: Vec<Selector>,
    pub items: Vec<Result<SelectorGroup, Diagnostic>>,
}

/// The right-hand side values of a reduction, taken left to right.
struct Children<'a>(std::vec::IntoIter<Node<'a>>);

macro_rules! takers {
    ($($name:ident -> $variant:ident($ty:ty);)*) => {
        impl<'a> Children<'a> {
            $(
                fn $name(&mut self) -> Option<$ty> {
                    match self.0.next()? {
                        Node::$variant(value) => Some(value),
                        _ => None,
                    }
                }
            )*
        }
    };
}

takers! {
    token -> Token(Token<'a>);
    stylesheet -> Stylesheet(Vec<Statement>);
    statement -> Statement(Statement);
    target -> Target(ImportTarget);
    words -> Words(Vec<String>);
    declarations -> Declarations(Vec<Declaration>);
    declaration -> Declaration(Option<Declaration>);
    values -> Values(Vec<Value>);
    value -> Value(Value);
    group -> Group(SelectorGroup);
    selector -> Selector(Selector);
    combinator -> Combinator(Combinator);
    sequence -> Sequence(SimpleSelectorSequence);
    qualifiers -> Qualifiers(Vec<Qualifier>);
    qualifier -> Qualifier(Qualifier);
    element -> Element(ElementSelector);
    prefix -> Prefix(NamespacePrefix);
    attribute -> Attribute(AttributeSelector);
    attribute_name -> AttributeName((Option<NamespacePrefix>, String));
    operator -> Operator(AttributeOperator);
    attribute_value -> AttributeValue(AttributeValue);
    pseudo -> Pseudo(PseudoSelector);
    text -> Text(String);
    negation -> Negation(NegationArgument);
}

impl<'a> Children<'a> {
    fn any(&mut self) -> Option<Node<'a>> {
        self.0.next()
    }

    fn skip(&mut self) -> Option<()> {
        self.0.next().map(drop)
    }

    fn lexeme(&mut self) -> Option<String> {
        self.token().map(|token| token.text.to_owned())
    }
}

/// Strip matching quotes from a string token.
fn unquote(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('"' | '\'')), Some(close)) if open == close => chars.as_str(),
        _ => text,
    }
}

/// The bare URL of a `url(...)` token.
fn url(text: &str) -> &str {
    let inner = text
        .get(4..)
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(text);
    unquote(inner.trim_matches([' ', '\t', '\r', '\n', '\u{c}']))
}

/// The name of a `name(` token.
fn function_name(text: &str) -> String {
    text.strip_suffix('(').unwrap_or(text).to_owned()
}

fn hash_name(text: &str) -> String {
    text.strip_prefix('#').unwrap_or(text).to_owned()
}

/// Run the action of `rule` over its right-hand side. Returns `None` if the
/// values do not have the shapes the production promises.
pub(super) fn reduce<'a>(
    rule: Rule,
    children: Vec<Node<'a>>,
    output: &mut Output,
) -> Option<Node<'a>> {
    let mut c = Children(children.into_iter());
    let node = match rule {
        // Pass-through productions.
        Rule::Accept
        | Rule::RulesetStatement
        | Rule::ImportStatement
        | Rule::NamespaceStatement
        | Rule::SomeDeclaration
        | Rule::Em
        | Rule::Ex
        | Rule::Pixel
        | Rule::Centimeter
        | Rule::Millimeter
        | Rule::Inch
        | Rule::Point
        | Rule::Pica
        | Rule::Degree
        | Rule::Radian
        | Rule::Gradian
        | Rule::Millisecond
        | Rule::Second
        | Rule::Hertz
        | Rule::Kilohertz
        | Rule::OtherDimension
        | Rule::PlainIdent
        | Rule::ColorIdent
        | Rule::PropertyIdent => c.any()?,

        Rule::EmptyStylesheet => Node::Stylesheet(Vec::new()),
        Rule::AppendStatement => {
            let mut statements = c.stylesheet()?;
            statements.push(c.statement()?);
            Node::Stylesheet(statements)
        }
        Rule::SkipCdo | Rule::SkipCdc => Node::Stylesheet(c.stylesheet()?),

        Rule::Import => {
            c.skip()?;
            let target = c.target()?;
            Node::Statement(Statement::Import(Import {
                target,
                media: Vec::new(),
            }))
        }
        Rule::ImportWithMedia => {
            c.skip()?;
            let target = c.target()?;
            let media = c.words()?;
            Node::Statement(Statement::Import(Import { target, media }))
        }
        Rule::StringTarget => {
            Node::Target(ImportTarget::String(unquote(c.token()?.text).to_owned()))
        }
        Rule::UriTarget => Node::Target(ImportTarget::Uri(url(c.token()?.text).to_owned())),
        Rule::FirstMedium => Node::Words(vec![c.lexeme()?]),
        Rule::NextMedium => {
            let mut media = c.words()?;
            c.skip()?;
            media.push(c.lexeme()?);
            Node::Words(media)
        }

        Rule::DefaultNamespace => {
            c.skip()?;
            let target = c.target()?;
            Node::Statement(Statement::Namespace(Namespace {
                prefix: None,
                target,
            }))
        }
        Rule::PrefixedNamespace => {
            c.skip()?;
            let prefix = c.lexeme()?;
            let target = c.target()?;
            Node::Statement(Statement::Namespace(Namespace {
                prefix: Some(prefix),
                target,
            }))
        }

        Rule::Ruleset => {
            let group = c.group()?;
            c.skip()?;
            let declarations = c.declarations()?;
            output.items.push(Ok(group.clone()));
            Node::Statement(Statement::Ruleset(Ruleset {
                selectors: Some(group),
                declarations,
            }))
        }
        Rule::AnonymousRuleset => {
            c.skip()?;
            Node::Statement(Statement::Ruleset(Ruleset {
                selectors: None,
                declarations: c.declarations()?,
            }))
        }

        Rule::FirstDeclaration => Node::Declarations(c.declaration()?.into_iter().collect()),
        Rule::NextDeclaration => {
            let mut declarations = c.declarations()?;
            c.skip()?;
            declarations.extend(c.declaration()?);
            Node::Declarations(declarations)
        }
        Rule::NoDeclaration => Node::Declaration(None),
        Rule::Declaration => {
            let property = c.text()?;
            c.skip()?;
            let values = c.values()?;
            Node::Declaration(Some(Declaration { property, values }))
        }
        Rule::Property => Node::Text(c.lexeme()?),

        Rule::FirstAny => Node::Values(vec![c.value()?]),
        Rule::NextAny => {
            let mut values = c.values()?;
            values.push(c.value()?);
            Node::Values(values)
        }
        Rule::CommaAny => {
            let mut values = c.values()?;
            c.skip()?;
            values.push(Value::Comma);
            values.push(c.value()?);
            Node::Values(values)
        }

        Rule::DimensionAny
        | Rule::IdentAny
        | Rule::PercentageAny
        | Rule::UriAny
        | Rule::StringAny
        | Rule::NumberAny
        | Rule::HashAny
        | Rule::IncludesAny
        | Rule::DashMatchAny
        | Rule::PlusAny
        | Rule::MinusAny
        | Rule::StarAny
        | Rule::EqualsAny => {
            let token = c.token()?;
            Node::Value(Value::primitive(token.kind, token.text))
        }
        Rule::EmptyFunction => Node::Value(Value::Function {
            name: function_name(c.token()?.text),
            arguments: Vec::new(),
        }),
        Rule::Function => Node::Value(Value::Function {
            name: function_name(c.token()?.text),
            arguments: c.values()?,
        }),
        Rule::EmptyParens => Node::Value(Value::Parenthesized(Vec::new())),
        Rule::Parens => {
            c.skip()?;
            Node::Value(Value::Parenthesized(c.values()?))
        }
        Rule::EmptyBrackets => Node::Value(Value::Bracketed(Vec::new())),
        Rule::Brackets => {
            c.skip()?;
            Node::Value(Value::Bracketed(c.values()?))
        }

        Rule::FirstSelector => {
            let selector = c.selector()?;
            output.selectors.push(selector.clone());
            Node::Group(SelectorGroup {
                selectors: vec![selector],
            })
        }
        Rule::NextSelector => {
            let mut group = c.group()?;
            c.skip()?;
            let selector = c.selector()?;
            output.selectors.push(selector.clone());
            group.selectors.push(selector);
            Node::Group(group)
        }

        Rule::SingleSequence => Node::Selector(Selector::simple(c.sequence()?)),
        Rule::Combined => {
            let head = c.sequence()?;
            let combinator = c.combinator()?;
            Node::Selector(prepend(head, combinator, c.selector()?))
        }
        Rule::Juxtaposed => {
            let head = c.sequence()?;
            Node::Selector(prepend(head, Combinator::Descendant, c.selector()?))
        }

        Rule::NextSibling => Node::Combinator(Combinator::NextSibling),
        Rule::Child => Node::Combinator(Combinator::Child),
        Rule::SubsequentSibling => Node::Combinator(Combinator::SubsequentSibling),
        Rule::Descendant => Node::Combinator(Combinator::Descendant),

        Rule::QualifiedType | Rule::QualifiedUniversal => {
            let element = c.element()?;
            Node::Sequence(SimpleSelectorSequence {
                element: Some(element),
                qualifiers: c.qualifiers()?,
            })
        }
        Rule::BareType | Rule::BareUniversal => Node::Sequence(SimpleSelectorSequence {
            element: Some(c.element()?),
            qualifiers: Vec::new(),
        }),
        Rule::QualifiersOnly => Node::Sequence(SimpleSelectorSequence {
            element: None,
            qualifiers: c.qualifiers()?,
        }),

        Rule::FirstQualifier => Node::Qualifiers(vec![c.qualifier()?]),
        Rule::NextQualifier => {
            let mut qualifiers = c.qualifiers()?;
            qualifiers.push(c.qualifier()?);
            Node::Qualifiers(qualifiers)
        }
        Rule::IdQualifier => Node::Qualifier(Qualifier::Id(hash_name(c.token()?.text))),
        Rule::ClassQualifier => Node::Qualifier(Qualifier::Class(c.text()?)),
        Rule::AttribQualifier => Node::Qualifier(Qualifier::Attribute(c.attribute()?)),
        Rule::PseudoQualifier => Node::Qualifier(Qualifier::Pseudo(c.pseudo()?)),
        Rule::NegationQualifier => Node::Qualifier(Qualifier::Negation(c.negation()?)),

        Rule::TypeName => Node::Element(ElementSelector::Type {
            namespace: None,
            name: c.lexeme()?,
        }),
        Rule::PrefixedTypeName => {
            let namespace = c.prefix()?;
            Node::Element(ElementSelector::Type {
                namespace: Some(namespace),
                name: c.lexeme()?,
            })
        }
        Rule::Universal => Node::Element(ElementSelector::Universal { namespace: None }),
        Rule::PrefixedUniversal => Node::Element(ElementSelector::Universal {
            namespace: Some(c.prefix()?),
        }),
        Rule::NamedPrefix => Node::Prefix(NamespacePrefix::Named(c.lexeme()?)),
        Rule::AnyPrefix => Node::Prefix(NamespacePrefix::Any),
        Rule::EmptyPrefix => Node::Prefix(NamespacePrefix::None),

        Rule::Class => {
            c.skip()?;
            Node::Text(c.lexeme()?)
        }

        Rule::AttribPresent => {
            c.skip()?;
            let (namespace, name) = c.attribute_name()?;
            Node::Attribute(AttributeSelector {
                namespace,
                name,
                matcher: None,
            })
        }
        Rule::AttribMatch => {
            c.skip()?;
            let (namespace, name) = c.attribute_name()?;
            let operator = c.operator()?;
            let value = c.attribute_value()?;
            Node::Attribute(AttributeSelector {
                namespace,
                name,
                matcher: Some((operator, value)),
            })
        }
        Rule::AttribName => Node::AttributeName((None, c.lexeme()?)),
        Rule::PrefixedAttribName => {
            let namespace = c.prefix()?;
            Node::AttributeName((Some(namespace), c.lexeme()?))
        }
        Rule::EqualsOp => Node::Operator(AttributeOperator::Equals),
        Rule::IncludesOp => Node::Operator(AttributeOperator::Includes),
        Rule::DashMatchOp => Node::Operator(AttributeOperator::DashMatch),
        Rule::PrefixMatchOp => Node::Operator(AttributeOperator::PrefixMatch),
        Rule::SuffixMatchOp => Node::Operator(AttributeOperator::SuffixMatch),
        Rule::SubstringMatchOp => Node::Operator(AttributeOperator::SubstringMatch),
        Rule::IdentValue => Node::AttributeValue(AttributeValue::Ident(c.lexeme()?)),
        Rule::StringValue => Node::AttributeValue(AttributeValue::String(
            unquote(c.token()?.text).to_owned(),
        )),

        Rule::PseudoClass => {
            c.skip()?;
            Node::Pseudo(PseudoSelector {
                element: false,
                name: c.lexeme()?,
                arguments: None,
            })
        }
        Rule::PseudoElement => {
            c.skip()?;
            c.skip()?;
            Node::Pseudo(PseudoSelector {
                element: true,
                name: c.lexeme()?,
                arguments: None,
            })
        }
        Rule::FunctionalPseudoClass => {
            c.skip()?;
            Node::Pseudo(c.pseudo()?)
        }
        Rule::FunctionalPseudoElement => {
            c.skip()?;
            c.skip()?;
            let pseudo = c.pseudo()?;
            Node::Pseudo(PseudoSelector {
                element: true,
                ..pseudo
            })
        }
        Rule::FunctionalPseudo => {
            let name = function_name(c.token()?.text);
            Node::Pseudo(PseudoSelector {
                element: false,
                name,
                arguments: Some(c.words()?),
            })
        }
        Rule::FirstExpression => Node::Words(vec![c.text()?]),
        Rule::NextExpression => {
            let mut terms = c.words()?;
            terms.push(c.text()?);
            Node::Words(terms)
        }
        Rule::PlusTerm
        | Rule::MinusTerm
        | Rule::NumberTerm
        | Rule::StringTerm
        | Rule::IdentTerm
        | Rule::DimensionTerm => Node::Text(c.lexeme()?),

        Rule::Negation => {
            c.skip()?;
            c.skip()?;
            Node::Negation(c.negation()?)
        }
        Rule::NegatedType | Rule::NegatedUniversal => {
            Node::Negation(NegationArgument::Element(c.element()?))
        }
        Rule::NegatedId => Node::Negation(NegationArgument::Id(hash_name(c.token()?.text))),
        Rule::NegatedClass => Node::Negation(NegationArgument::Class(c.text()?)),
        Rule::NegatedAttrib => Node::Negation(NegationArgument::Attribute(c.attribute()?)),
        Rule::NegatedPseudo => Node::Negation(NegationArgument::Pseudo(c.pseudo()?)),
    };
    Some(node)
}

/// `head combinator rest`, flattened into one chain.
fn prepend(head: SimpleSelectorSequence, combinator: Combinator, rest: Selector) -> Selector {
    let mut tail = Vec::with_capacity(rest.tail.len() + 1);
    tail.push((combinator, rest.head));
    tail.extend(rest.tail);
    Selector { head, tail }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'x'"), "x");
        assert_eq!(unquote("\"a b\""), "a b");
        assert_eq!(unquote("'x\""), "'x\"");
        assert_eq!(unquote("x"), "x");
        assert_eq!(unquote("'"), "'");
    }

    #[test]
    fn test_url() {
        assert_eq!(url("url(a.css)"), "a.css");
        assert_eq!(url("url( \"a b.css\" )"), "a b.css");
        assert_eq!(url("URL('x')"), "x");
    }

    #[test]
    fn test_names() {
        assert_eq!(function_name("rgba("), "rgba");
        assert_eq!(hash_name("#main"), "main");
    }
}
