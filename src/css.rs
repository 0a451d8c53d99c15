//! Inline style declaration parsing.
//!
//! Only used to read hints out of `style` attributes (for example a
//! monospace `font-family` on a `pre`), so values are kept as their raw,
//! trimmed source text rather than parsed into typed properties.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
};

/// A `property: value` pair from a declaration list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, lowercased.
    pub property: String,
    /// Raw value text with `!important` removed.
    pub value: String,
}

/// Parse the contents of a `style` attribute into declarations.
///
/// Malformed declarations are skipped, matching how browsers treat them.
///
/// # Examples
///
/// ```
/// use turndown::css::parse_declarations;
///
/// let decls = parse_declarations("color: red; FONT-FAMILY: 'Courier New', monospace");
/// assert_eq!(decls.len(), 2);
/// assert_eq!(decls[1].property, "font-family");
/// assert_eq!(decls[1].value, "'Courier New', monospace");
/// ```
pub fn parse_declarations(style: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(style);
    let mut parser = Parser::new(&mut input);
    let mut declarations = Vec::new();
    let mut list_parser = DeclarationListParser;

    for result in RuleBodyParser::new(&mut parser, &mut list_parser) {
        // Ignore errors - lenient parsing
        if let Ok(declaration) = result {
            declarations.push(declaration);
        }
    }

    declarations
}

/// Font families that are fixed-width by design.
const MONOSPACE_FAMILIES: &[&str] = &[
    "monospace",
    "ui-monospace",
    "andale mono",
    "cascadia code",
    "cascadia mono",
    "consolas",
    "courier",
    "courier new",
    "dejavu sans mono",
    "fira code",
    "fira mono",
    "jetbrains mono",
    "liberation mono",
    "lucida console",
    "menlo",
    "monaco",
    "roboto mono",
    "sf mono",
    "source code pro",
    "ubuntu mono",
];

/// Whether a `font-family` value names a monospace family, either the
/// generic keyword or a well-known fixed-width font.
pub fn is_monospace_family(value: &str) -> bool {
    value
        .split(',')
        .map(|family| family.trim().trim_matches(|c| c == '"' || c == '\''))
        .any(|family| {
            MONOSPACE_FAMILIES
                .iter()
                .any(|known| known.eq_ignore_ascii_case(family))
        })
}

struct DeclarationListParser;

impl<'i> DeclarationParser<'i> for DeclarationListParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        let mut end = start;
        loop {
            if input.try_parse(cssparser::parse_important).is_ok() {
                break;
            }
            if input.next().is_err() {
                break;
            }
            end = input.position();
        }

        Ok(Declaration {
            property: name.to_ascii_lowercase(),
            value: input.slice(start..end).trim().to_string(),
        })
    }
}

impl<'i> AtRuleParser<'i> for DeclarationListParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for DeclarationListParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> RuleBodyItemParser<'i, Declaration, ()> for DeclarationListParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}
