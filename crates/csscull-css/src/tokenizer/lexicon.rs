//! The tokenizer's rule table.
//!
//! All rules are compiled into one case-insensitive regular expression made of
//! anchored alternatives, one capture group per rule. The regex engine takes
//! the leftmost alternative that matches, so rules are tried in declaration
//! order and the first one that matches wins even if a later one would match
//! more text.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::token::TokenKind;

/// What the tokenizer does with text a rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposition {
    /// Emit a token of this kind (identifiers are classified further).
    Emit(TokenKind),
    /// Whitespace: dropped, but newlines advance the line counter.
    Whitespace,
    /// `/* ... */`: dropped.
    Comment,
}

/// A single tokenizer rule.
#[derive(Debug, Clone)]
pub(crate) struct Rule {
    pub disposition: Disposition,
    pub pattern: String,
    /// The lexeme may not be followed by a name character. Keeps `10pxx`
    /// away from the `px` rule and `@imports` away from `@import`.
    pub bounded: bool,
}

impl Rule {
    fn emit(kind: TokenKind, pattern: impl Into<String>) -> Self {
        Self {
            disposition: Disposition::Emit(kind),
            pattern: pattern.into(),
            bounded: false,
        }
    }

    fn bounded(kind: TokenKind, pattern: impl Into<String>) -> Self {
        Self {
            bounded: true,
            ..Self::emit(kind, pattern)
        }
    }

    fn ignore(disposition: Disposition, pattern: impl Into<String>) -> Self {
        Self {
            disposition,
            pattern: pattern.into(),
            bounded: false,
        }
    }
}

/// Regex fragments from the CSS 2.1 / Selectors 3 lexical grammar.
mod macros {
    pub const NONASCII: &str = r"[^\x00-\x7F]";
    pub const UNICODE: &str = r"\\[0-9a-f]{1,6}(?:\r\n|[ \n\r\t\f])?";
    pub const NL: &str = r"(?:\n|\r\n|\r|\f)";
    pub const W: &str = r"[ \t\r\n\f]*";
    /// A character that may continue a name; used to bound unit rules.
    pub const NOT_NMCHAR: &str = r"(?:[^_a-z0-9\-\\\x{80}-\x{10FFFF}]|\z)";

    pub fn escape() -> String {
        format!(r"(?:{UNICODE}|\\[^\n\r\f0-9a-f])")
    }

    pub fn nmstart() -> String {
        format!("(?:[_a-z]|{NONASCII}|{})", escape())
    }

    pub fn nmchar() -> String {
        format!("(?:[_a-z0-9-]|{NONASCII}|{})", escape())
    }

    pub fn ident() -> String {
        format!("-?{}{}*", nmstart(), nmchar())
    }

    pub fn name() -> String {
        format!("{}+", nmchar())
    }

    pub fn num() -> &'static str {
        r"[+-]?(?:[0-9]*\.[0-9]+|[0-9]+)"
    }

    pub fn string() -> String {
        let escape = escape();
        format!(
            r#"(?:"(?:[^\n\r\f\\"]|\\{NL}|{NONASCII}|{escape})*"|'(?:[^\n\r\f\\']|\\{NL}|{NONASCII}|{escape})*')"#
        )
    }

    pub fn url() -> String {
        format!(r"(?:[!#$%&*-~]|{NONASCII}|{})*", escape())
    }
}

/// The rules in the order they are tried.
pub(crate) fn rules() -> Vec<Rule> {
    use TokenKind as K;
    use macros::{W, ident, name, num, string, url};

    let num = num();
    let unit = |kind, unit: &str| Rule::bounded(kind, format!("{num}{unit}"));

    vec![
        // Attribute-match operators.
        Rule::emit(K::Includes, r"~="),
        Rule::emit(K::DashMatch, r"\|="),
        Rule::emit(K::PrefixMatch, r"\^="),
        Rule::emit(K::SuffixMatch, r"\$="),
        Rule::emit(K::SubstringMatch, r"\*="),
        // Lengths.
        unit(K::Em, "em"),
        unit(K::Ex, "ex"),
        unit(K::Pixel, "px"),
        unit(K::Centimeter, "cm"),
        unit(K::Millimeter, "mm"),
        unit(K::Inch, "in"),
        unit(K::Point, "pt"),
        unit(K::Pica, "pc"),
        // Angles.
        unit(K::Degree, "deg"),
        unit(K::Radian, "rad"),
        unit(K::Gradian, "grad"),
        // Time.
        unit(K::Millisecond, "ms"),
        unit(K::Second, "s"),
        // Frequency.
        unit(K::Hertz, "hz"),
        unit(K::Kilohertz, "khz"),
        Rule::emit(K::Dimension, format!("{num}{}", ident())),
        // Functions and misc.
        Rule::emit(K::Not, r"not\("),
        Rule::emit(K::Uri, format!(r"url\({W}(?:{}|{}){W}\)", string(), url())),
        Rule::emit(K::Function, format!(r"{}\(", ident())),
        Rule::emit(K::Hash, format!("#{}", name())),
        Rule::emit(K::Percentage, format!("{num}%")),
        // At-keywords.
        Rule::bounded(K::ImportSym, "@import"),
        Rule::bounded(K::NamespaceSym, "@namespace"),
        Rule::emit(K::AtKeyword, format!("@{}", ident())),
        // Comments.
        Rule::ignore(Disposition::Comment, r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/"),
        Rule::emit(K::Cdo, "<!--"),
        Rule::emit(K::Cdc, "-->"),
        // Whitespace.
        Rule::ignore(Disposition::Whitespace, r"[ \t\r\n\f]+"),
        // Primitives.
        Rule::emit(K::Number, num),
        Rule::emit(K::String, string()),
        Rule::emit(K::Ident, ident()),
        // Structural literals.
        Rule::emit(K::Pipe, r"\|"),
        Rule::emit(K::Star, r"\*"),
        Rule::emit(K::LeftBracket, r"\["),
        Rule::emit(K::RightBracket, r"\]"),
        Rule::emit(K::Equals, "="),
        Rule::emit(K::Plus, r"\+"),
        Rule::emit(K::Greater, ">"),
        Rule::emit(K::Tilde, "~"),
        Rule::emit(K::Dot, r"\."),
        Rule::emit(K::Comma, ","),
        Rule::emit(K::Minus, "-"),
        Rule::emit(K::Colon, ":"),
        Rule::emit(K::LeftBrace, r"\{"),
        Rule::emit(K::RightBrace, r"\}"),
        Rule::emit(K::Semicolon, ";"),
        Rule::emit(K::LeftParen, r"\("),
        Rule::emit(K::RightParen, r"\)"),
    ]
}

/// The compiled rule table.
#[derive(Debug)]
pub(crate) struct Lexicon {
    pub rules: Vec<Rule>,
    /// `\A(?:(r0)b0|(r1)b1|...)`: group `i + 1` captures rule `i`'s lexeme,
    /// the optional boundary `bi` sits outside the group.
    pub matcher: Regex,
}

impl Lexicon {
    fn build() -> Result<Self, regex::Error> {
        let rules = rules();
        let alternatives: Vec<String> = rules
            .iter()
            .map(|rule| {
                let boundary = if rule.bounded { macros::NOT_NMCHAR } else { "" };
                format!("({}){boundary}", rule.pattern)
            })
            .collect();
        let matcher = RegexBuilder::new(&format!(r"\A(?:{})", alternatives.join("|")))
            .case_insensitive(true)
            .build()?;
        Ok(Self { rules, matcher })
    }

    /// The first rule that matches at the start of `input`, with the length
    /// of its lexeme.
    pub fn rule_at(&self, input: &str) -> Option<(&Rule, usize)> {
        let captures = self.matcher.captures(input)?;
        self.rules
            .iter()
            .enumerate()
            .find_map(|(i, rule)| captures.get(i + 1).map(|m| (rule, m.end())))
            .filter(|&(_, len)| len > 0)
    }
}

/// Shared, immutable rule table.
pub(crate) static LEXICON: LazyLock<Lexicon> =
    LazyLock::new(|| Lexicon::build().expect("tokenizer rule table must compile"));

/// [CSS Color Level 3 § 4.3](https://www.w3.org/TR/css-color-3/#svg-color)
/// extended color keywords, plus `transparent` and `currentcolor`.
const COLOR_KEYWORDS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "currentcolor", "cyan",
    "darkblue", "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "red", "rosybrown", "royalblue", "saddlebrown", "salmon",
    "sandybrown", "seagreen", "seashell", "sienna", "silver", "skyblue", "slateblue",
    "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan", "teal", "thistle",
    "tomato", "transparent", "turquoise", "violet", "wheat", "white", "whitesmoke", "yellow",
    "yellowgreen",
];

/// [CSS 2.1 Appendix F](https://www.w3.org/TR/CSS21/propidx.html) properties
/// and the CSS3 properties in common use.
const PROPERTY_NAMES: &[&str] = &[
    "align-content", "align-items", "align-self", "animation", "animation-delay",
    "animation-direction", "animation-duration", "animation-fill-mode",
    "animation-iteration-count", "animation-name", "animation-play-state",
    "animation-timing-function", "azimuth", "backface-visibility", "background",
    "background-attachment", "background-clip", "background-color", "background-image",
    "background-origin", "background-position", "background-repeat", "background-size",
    "border", "border-bottom", "border-bottom-color", "border-bottom-left-radius",
    "border-bottom-right-radius", "border-bottom-style", "border-bottom-width",
    "border-collapse", "border-color", "border-image", "border-left", "border-left-color",
    "border-left-style", "border-left-width", "border-radius", "border-right",
    "border-right-color", "border-right-style", "border-right-width", "border-spacing",
    "border-style", "border-top", "border-top-color", "border-top-left-radius",
    "border-top-right-radius", "border-top-style", "border-top-width", "border-width",
    "bottom", "box-shadow", "box-sizing", "caption-side", "clear", "clip", "color", "columns",
    "column-count", "column-gap", "column-width", "content", "counter-increment",
    "counter-reset", "cue", "cue-after", "cue-before", "cursor", "direction", "display",
    "elevation", "empty-cells", "flex", "flex-basis", "flex-direction", "flex-flow",
    "flex-grow", "flex-shrink", "flex-wrap", "float", "font", "font-family", "font-size",
    "font-style", "font-variant", "font-weight", "height", "justify-content", "left",
    "letter-spacing", "line-height", "list-style", "list-style-image", "list-style-position",
    "list-style-type", "margin", "margin-bottom", "margin-left", "margin-right", "margin-top",
    "max-height", "max-width", "min-height", "min-width", "opacity", "order", "orphans",
    "outline", "outline-color", "outline-style", "outline-width", "overflow", "overflow-x",
    "overflow-y", "padding", "padding-bottom", "padding-left", "padding-right", "padding-top",
    "page-break-after", "page-break-before", "page-break-inside", "pause", "pause-after",
    "pause-before", "pitch", "pitch-range", "play-during", "position", "quotes", "resize",
    "richness", "right", "speak", "speak-header", "speak-numeral", "speak-punctuation",
    "speech-rate", "stress", "table-layout", "text-align", "text-decoration", "text-indent",
    "text-overflow", "text-shadow", "text-transform", "top", "transform", "transform-origin",
    "transition", "transition-delay", "transition-duration", "transition-property",
    "transition-timing-function", "unicode-bidi", "vertical-align", "visibility",
    "voice-family", "volume", "white-space", "widows", "width", "word-spacing", "word-wrap",
    "z-index",
];

static KEYWORDS: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = HashMap::with_capacity(COLOR_KEYWORDS.len() + PROPERTY_NAMES.len());
    for &name in PROPERTY_NAMES {
        let _ = map.insert(name, TokenKind::PropertyName);
    }
    for &name in COLOR_KEYWORDS {
        let _ = map.insert(name, TokenKind::ColorKeyword);
    }
    map
});

/// Classify an identifier lexeme.
///
/// Known color keywords and property names get their own kinds; everything
/// else is a plain [`TokenKind::Ident`]. Matching is ASCII case-insensitive.
#[must_use]
pub fn classify(lexeme: &str) -> TokenKind {
    let lookup = |key: &str| KEYWORDS.get(key).copied().unwrap_or(TokenKind::Ident);
    if lexeme.bytes().any(|b| b.is_ascii_uppercase()) {
        lookup(&lexeme.to_ascii_lowercase())
    } else {
        lookup(lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_for(input: &str) -> Option<(Disposition, usize)> {
        LEXICON
            .rule_at(input)
            .map(|(rule, len)| (rule.disposition, len))
    }

    #[test]
    fn test_every_rule_compiles_on_its_own() {
        for rule in rules() {
            assert!(
                Regex::new(&rule.pattern).is_ok(),
                "rule {:?} does not compile",
                rule.disposition
            );
        }
    }

    #[test]
    fn test_rule_order_beats_match_length() {
        // CDC is tried before the `-` literal.
        assert_eq!(rule_for("-->"), Some((Disposition::Emit(TokenKind::Cdc), 3)));
        // `*=` is an operator before `*` is a literal.
        assert_eq!(
            rule_for("*=x"),
            Some((Disposition::Emit(TokenKind::SubstringMatch), 2))
        );
    }

    #[test]
    fn test_bounded_unit_falls_through_to_dimension() {
        assert_eq!(rule_for("10px;"), Some((Disposition::Emit(TokenKind::Pixel), 4)));
        assert_eq!(rule_for("10pxx"), Some((Disposition::Emit(TokenKind::Dimension), 5)));
        assert_eq!(rule_for("10s"), Some((Disposition::Emit(TokenKind::Second), 3)));
        assert_eq!(rule_for("10sec"), Some((Disposition::Emit(TokenKind::Dimension), 5)));
    }

    #[test]
    fn test_units_are_case_insensitive() {
        assert_eq!(rule_for("3KHZ"), Some((Disposition::Emit(TokenKind::Kilohertz), 4)));
        assert_eq!(rule_for("3Hz"), Some((Disposition::Emit(TokenKind::Hertz), 3)));
    }

    #[test]
    fn test_decimal_number_is_one_lexeme() {
        assert_eq!(rule_for("1.5 "), Some((Disposition::Emit(TokenKind::Number), 3)));
        assert_eq!(rule_for("-.5em"), Some((Disposition::Emit(TokenKind::Em), 5)));
    }

    #[test]
    fn test_comment_and_whitespace_dispositions() {
        assert_eq!(rule_for("/* x */a"), Some((Disposition::Comment, 7)));
        assert_eq!(rule_for(" \n\t a"), Some((Disposition::Whitespace, 4)));
    }

    #[test]
    fn test_illegal_character_matches_nothing() {
        assert_eq!(rule_for("`"), None);
        assert_eq!(rule_for("!important"), None);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("background-color"), TokenKind::PropertyName);
        assert_eq!(classify("Red"), TokenKind::ColorKeyword);
        assert_eq!(classify("div"), TokenKind::Ident);
    }

    #[test]
    fn test_keyword_tables_have_no_overlap() {
        for name in COLOR_KEYWORDS {
            assert!(!PROPERTY_NAMES.contains(name), "{name} is in both tables");
        }
    }
}
