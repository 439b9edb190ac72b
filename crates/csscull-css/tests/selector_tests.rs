//! Integration tests for the selector model produced by the parser.

use csscull_css::Parser;
use csscull_css::selector::{
    AttributeOperator, AttributeValue, Combinator, ElementSelector, NamespacePrefix,
    NegationArgument, PseudoSelector, Qualifier, Selector,
};

/// Helper to parse `selector { }` and return its only selector.
fn parse_selector(selector: &str) -> Selector {
    let result = Parser::new().parse(&format!("{selector} {{ }}"));
    assert!(result.is_clean(), "{selector}: {:?}", result.diagnostics);
    assert_eq!(result.selectors.len(), 1, "{selector}");
    result.selectors.into_iter().next().expect("one selector")
}

fn qualifiers(selector: &str) -> Vec<Qualifier> {
    parse_selector(selector).head.qualifiers
}

#[test]
fn test_type_selector() {
    let selector = parse_selector("body");
    assert_eq!(
        selector.head.element,
        Some(ElementSelector::Type {
            namespace: None,
            name: "body".to_string(),
        })
    );
    assert!(selector.head.qualifiers.is_empty());
    assert!(selector.tail.is_empty());
}

#[test]
fn test_universal_selector() {
    let selector = parse_selector("*.x");
    assert_eq!(
        selector.head.element,
        Some(ElementSelector::Universal { namespace: None })
    );
    assert_eq!(selector.head.qualifiers, vec![Qualifier::Class("x".to_string())]);
}

#[test]
fn test_qualifiers_without_element() {
    let selector = parse_selector(".a#b");
    assert_eq!(selector.head.element, None);
    assert_eq!(
        selector.head.qualifiers,
        vec![Qualifier::Class("a".to_string()), Qualifier::Id("b".to_string())]
    );
}

#[test]
fn test_namespace_prefixes() {
    let cases = [
        ("svg|rect", Some(NamespacePrefix::Named("svg".to_string()))),
        ("*|rect", Some(NamespacePrefix::Any)),
        ("|rect", Some(NamespacePrefix::None)),
        ("rect", None),
    ];
    for (input, namespace) in cases {
        assert_eq!(
            parse_selector(input).head.element,
            Some(ElementSelector::Type {
                namespace,
                name: "rect".to_string(),
            }),
            "{input}"
        );
    }
    assert_eq!(
        parse_selector("svg|*").head.element,
        Some(ElementSelector::Universal {
            namespace: Some(NamespacePrefix::Named("svg".to_string())),
        })
    );
}

#[test]
fn test_attribute_operators() {
    let cases = [
        ("[a=b]", AttributeOperator::Equals),
        ("[a~=b]", AttributeOperator::Includes),
        ("[a|=b]", AttributeOperator::DashMatch),
        ("[a^=b]", AttributeOperator::PrefixMatch),
        ("[a$=b]", AttributeOperator::SuffixMatch),
        ("[a*=b]", AttributeOperator::SubstringMatch),
    ];
    for (input, operator) in cases {
        let Qualifier::Attribute(attribute) = &qualifiers(input)[0] else {
            panic!("{input}: expected an attribute selector");
        };
        assert_eq!(attribute.name, "a");
        assert_eq!(
            attribute.matcher,
            Some((operator, AttributeValue::Ident("b".to_string()))),
            "{input}"
        );
        assert_eq!(parse_selector(input).to_string(), input);
    }
}

#[test]
fn test_attribute_presence_and_namespace() {
    let Qualifier::Attribute(attribute) = &qualifiers("[xlink|href]")[0] else {
        panic!("expected an attribute selector");
    };
    assert_eq!(attribute.namespace, Some(NamespacePrefix::Named("xlink".to_string())));
    assert_eq!(attribute.name, "href");
    assert!(attribute.matcher.is_none());
}

#[test]
fn test_attribute_string_quoting() {
    assert_eq!(parse_selector("[title='a b']").to_string(), "[title=\"a b\"]");
    assert_eq!(parse_selector("[title='say \"hi\"']").to_string(), "[title='say \"hi\"']");
    let Qualifier::Attribute(attribute) = &qualifiers("[title='a b']")[0] else {
        panic!("expected an attribute selector");
    };
    let (_, value) = attribute.matcher.as_ref().expect("a matcher");
    assert_eq!(value.as_str(), "a b");
}

#[test]
fn test_pseudo_classes_and_elements() {
    assert_eq!(
        qualifiers("a:hover::before"),
        vec![
            Qualifier::Pseudo(PseudoSelector {
                element: false,
                name: "hover".to_string(),
                arguments: None,
            }),
            Qualifier::Pseudo(PseudoSelector {
                element: true,
                name: "before".to_string(),
                arguments: None,
            }),
        ]
    );
    // Single-colon pseudo-elements from CSS2 stay pseudo-classes syntactically.
    assert_eq!(parse_selector("p:first-line").to_string(), "p:first-line");
}

#[test]
fn test_functional_pseudo_arguments() {
    let Qualifier::Pseudo(pseudo) = &qualifiers("li:nth-child(2n+1)")[0] else {
        panic!("expected a pseudo-class");
    };
    assert_eq!(pseudo.name, "nth-child");
    assert_eq!(
        pseudo.arguments,
        Some(vec!["2n".to_string(), "+1".to_string()])
    );

    assert_eq!(parse_selector("li:nth-child( odd )").to_string(), "li:nth-child(odd)");
    assert_eq!(parse_selector("p:lang(en)").to_string(), "p:lang(en)");
    assert_eq!(
        parse_selector("li:nth-last-of-type(-2n-1)").to_string(),
        "li:nth-last-of-type(-2n-1)"
    );
}

#[test]
fn test_negation_arguments() {
    let cases = [
        (
            ":not(p)",
            NegationArgument::Element(ElementSelector::Type {
                namespace: None,
                name: "p".to_string(),
            }),
        ),
        (
            ":not(*)",
            NegationArgument::Element(ElementSelector::Universal { namespace: None }),
        ),
        (":not(#x)", NegationArgument::Id("x".to_string())),
        (":not(.x)", NegationArgument::Class("x".to_string())),
    ];
    for (input, argument) in cases {
        assert_eq!(qualifiers(input), vec![Qualifier::Negation(argument)], "{input}");
        assert_eq!(parse_selector(input).to_string(), input);
    }

    assert!(matches!(
        &qualifiers(":not([disabled])")[0],
        Qualifier::Negation(NegationArgument::Attribute(_))
    ));
    assert!(matches!(
        &qualifiers(":not(:first-child)")[0],
        Qualifier::Negation(NegationArgument::Pseudo(_))
    ));
}

#[test]
fn test_nested_negation_is_rejected() {
    let result = Parser::new().parse(":not(:not(a)) { } b { }");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.selector_texts(), vec!["b"]);
}

#[test]
fn test_combinator_chain() {
    let selector = parse_selector("html body > div + p ~ span");
    let combinators: Vec<Combinator> = selector.tail.iter().map(|(c, _)| *c).collect();
    assert_eq!(
        combinators,
        vec![
            Combinator::Descendant,
            Combinator::Child,
            Combinator::NextSibling,
            Combinator::SubsequentSibling,
        ]
    );
    assert_eq!(selector.tail.len(), 4);
    assert_eq!(
        selector.subject().element,
        Some(ElementSelector::Type {
            namespace: None,
            name: "span".to_string(),
        })
    );
    assert_eq!(selector.to_string(), "html body > div + p ~ span");
}

#[test]
fn test_descendant_after_qualifiers() {
    let selector = parse_selector("div.a[b]:hover p");
    assert_eq!(selector.head.qualifiers.len(), 3);
    assert_eq!(selector.tail.len(), 1);
    assert_eq!(selector.tail[0].0, Combinator::Descendant);
    assert_eq!(selector.to_string(), "div.a[b]:hover p");
}

#[test]
fn test_case_of_names_is_preserved() {
    assert_eq!(parse_selector("DIV.MyClass#Top").to_string(), "DIV.MyClass#Top");
}
