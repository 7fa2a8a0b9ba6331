//! Nesting preprocessor built on the `cssparser` tokenizer.
//!
//! A style body is read as a tree of declarations and blocks, then flattened:
//! each selector gets one rule for its own declarations, nested selectors are
//! composed with their parent, and conditional group rules (`@media` and
//! friends) wrap the rules flattened inside them.

use cssparser::{Delimiter, ParseError as CssParseError, Parser, ParserInput, Token};

use super::selector::combine_selectors;
use super::Preprocessor;
use crate::{Error, PluginChain, Result};

/// At-rules whose block holds rules that keep the surrounding selector.
const GROUPING_AT_RULES: &[&str] = &["media", "supports", "container", "document", "layer"];

/// A node of a parsed style body.
#[derive(Debug, Clone, PartialEq)]
enum Node {
    /// Text up to a `;`: a declaration or a statement at-rule.
    Declaration(String),
    /// A prelude followed by a `{...}` block.
    Block { prelude: String, children: Vec<Node> },
}

/// Default [`Preprocessor`]: expands nested selectors and at-rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestingPreprocessor;

impl NestingPreprocessor {
    /// Create a new preprocessor.
    pub fn new() -> Self {
        Self
    }

    /// Flatten `body` under `selector` into a list of rules.
    pub fn flatten(&self, selector: &str, body: &str) -> Result<Vec<String>> {
        let mut input = ParserInput::new(body);
        let mut parser = Parser::new(&mut input);
        let nodes = parse_nodes(&mut parser).map_err(|e: CssParseError<'_, ()>| {
            Error::parse(
                format!("{:?}", e.kind),
                e.location.line + 1,
                e.location.column,
            )
        })?;

        let mut rules = Vec::new();
        flatten_nodes(selector.trim(), &nodes, &mut rules);
        Ok(rules)
    }
}

impl Preprocessor for NestingPreprocessor {
    fn compile(&self, selector: &str, body: &str, chain: &mut PluginChain<'_>) -> Result<()> {
        for rule in self.flatten(selector, body)? {
            chain.emit(rule)?;
        }
        Ok(())
    }
}

/// Parse declarations and blocks until the parser is exhausted.
fn parse_nodes<'i>(parser: &mut Parser<'i, '_>) -> std::result::Result<Vec<Node>, CssParseError<'i, ()>> {
    let mut nodes = vec![];

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        let mut prelude = PreludeText::default();
        parser.parse_until_before(Delimiter::Semicolon | Delimiter::CurlyBracketBlock, |p| {
            consume_prelude(p, &mut prelude)
        })?;
        let prelude = prelude.text;

        let opens_block = matches!(parser.next(), Ok(Token::CurlyBracketBlock));
        if opens_block {
            let children = parser.parse_nested_block(|block_parser| parse_nodes(block_parser))?;
            nodes.push(Node::Block { prelude, children });
        } else if !prelude.is_empty() {
            nodes.push(Node::Declaration(prelude));
        }
    }

    Ok(nodes)
}

/// Prelude text rebuilt from tokens, without comments and with whitespace
/// runs between tokens collapsed to one space.
#[derive(Debug, Default)]
struct PreludeText {
    text: String,
    pending_space: bool,
}

impl PreludeText {
    fn push(&mut self, token_text: &str) {
        if self.pending_space && !self.text.is_empty() {
            self.text.push(' ');
        }
        self.pending_space = false;
        self.text.push_str(token_text);
    }
}

fn consume_prelude<'i>(
    parser: &mut Parser<'i, '_>,
    out: &mut PreludeText,
) -> std::result::Result<(), CssParseError<'i, ()>> {
    loop {
        let start = parser.position();
        let closing = match parser.next_including_whitespace_and_comments() {
            Err(_) => break,
            Ok(Token::Comment(_)) => continue,
            Ok(Token::WhiteSpace(_)) => {
                out.pending_space = true;
                continue;
            }
            Ok(Token::Function(_) | Token::ParenthesisBlock) => Some(")"),
            Ok(Token::SquareBracketBlock) => Some("]"),
            Ok(_) => None,
        };
        // Strings and urls are single tokens, so `/*` inside them is kept as written
        out.push(parser.slice_from(start));
        if let Some(closing) = closing {
            parser.parse_nested_block(|block| consume_prelude(block, out))?;
            out.push(closing);
        }
    }
    Ok(())
}

/// Normalize `name : value` into `name:value;`.
fn declaration(text: &str) -> Option<String> {
    let (name, value) = text.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(format!("{}:{};", name, value.trim()))
}

/// Lowercased at-rule name without the leading `@`.
fn at_rule_name(prelude: &str) -> Option<String> {
    let rest = prelude.strip_prefix('@')?;
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(rest.len());
    Some(rest[..end].to_ascii_lowercase())
}

fn flatten_nodes(parent: &str, nodes: &[Node], out: &mut Vec<String>) {
    let mut declarations = String::new();
    let mut nested = Vec::new();

    for node in nodes {
        match node {
            Node::Declaration(text) if text.starts_with('@') => {
                nested.push(format!("{text};"));
            }
            Node::Declaration(text) => match declaration(text) {
                Some(decl) => declarations.push_str(&decl),
                None => {
                    tracing::trace!(target: "horizon_lattice_stylesheet::preprocess", text = %text, "skipping malformed declaration");
                }
            },
            Node::Block { prelude, children } => match at_rule_name(prelude) {
                Some(name) if GROUPING_AT_RULES.contains(&name.as_str()) => {
                    let mut inner = Vec::new();
                    flatten_nodes(parent, children, &mut inner);
                    if !inner.is_empty() {
                        nested.push(format!("{prelude}{{{}}}", inner.concat()));
                    }
                }
                // @keyframes, @font-face, @page: steps and descriptors stay as written
                Some(_) => {
                    nested.push(format!("{prelude}{{{}}}", block_body(children)));
                }
                None => {
                    let selector = combine_selectors(parent, prelude);
                    flatten_nodes(&selector, children, &mut nested);
                }
            },
        }
    }

    if !declarations.is_empty() {
        if parent.is_empty() {
            tracing::warn!(
                target: "horizon_lattice_stylesheet::preprocess",
                declarations = %declarations,
                "dropping declarations without a selector"
            );
        } else {
            out.push(format!("{parent}{{{declarations}}}"));
        }
    }
    out.extend(nested);
}

/// Serialize a block body verbatim in normalized form.
///
/// Used for keyframe steps and descriptor blocks such as `@font-face`, where
/// nested blocks keep their own prelude instead of composing with a parent.
fn block_body(nodes: &[Node]) -> String {
    let mut body = String::new();
    for node in nodes {
        match node {
            Node::Declaration(text) => {
                if let Some(decl) = declaration(text) {
                    body.push_str(&decl);
                }
            }
            Node::Block { prelude, children } => {
                body.push_str(prelude);
                body.push('{');
                body.push_str(&block_body(children));
                body.push('}');
            }
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(selector: &str, body: &str) -> Vec<String> {
        NestingPreprocessor::new().flatten(selector, body).unwrap()
    }

    #[test]
    fn flat_declarations() {
        assert_eq!(
            flatten(".css-1", "color: red; font-size: 12px"),
            vec![".css-1{color:red;font-size:12px;}"]
        );
    }

    #[test]
    fn nested_selectors_follow_declarations() {
        let rules = flatten(
            ".btn",
            "&:hover{color:blue;} color:red; .icon{ margin: 0 4px; } :focus{outline:none;}",
        );
        assert_eq!(
            rules,
            vec![
                ".btn{color:red;}",
                ".btn:hover{color:blue;}",
                ".btn .icon{margin:0 4px;}",
                ".btn:focus{outline:none;}",
            ]
        );
    }

    #[test]
    fn media_wraps_scoped_rules() {
        let rules = flatten(".a", "color:red;@media (min-width: 420px){color:blue;&:hover{color:green;}}");
        assert_eq!(
            rules,
            vec![
                ".a{color:red;}",
                "@media (min-width: 420px){.a{color:blue;}.a:hover{color:green;}}",
            ]
        );
    }

    #[test]
    fn keyframes_keep_steps() {
        let rules = flatten("", "@keyframes animation-x{from{opacity:0;}50%{opacity:.5;}to{opacity:1;}}");
        assert_eq!(
            rules,
            vec!["@keyframes animation-x{from{opacity:0;}50%{opacity:.5;}to{opacity:1;}}"]
        );
    }

    #[test]
    fn font_face_and_globals() {
        assert_eq!(
            flatten("", "@font-face{font-family: Patrick Hand; src: url(hand.woff2);}"),
            vec!["@font-face{font-family:Patrick Hand;src:url(hand.woff2);}"]
        );
        assert_eq!(
            flatten("", "html, body { margin: 0 } body a { color: inherit; }"),
            vec!["html,body{margin:0;}", "body a{color:inherit;}"]
        );
    }

    #[test]
    fn url_values_with_semicolons_survive() {
        assert_eq!(
            flatten(".a", "background:url(data:image/png;base64,AAAA);"),
            vec![".a{background:url(data:image/png;base64,AAAA);}"]
        );
    }

    #[test]
    fn comments_and_statements() {
        let rules = flatten(
            "",
            "@import url(theme.css); /* body */ body{color:red;/*# sourceMappingURL=data:application/json;abc */}",
        );
        assert_eq!(rules, vec!["@import url(theme.css);", "body{color:red;}"]);
    }

    #[test]
    fn comment_markers_inside_strings_and_urls() {
        assert_eq!(
            flatten(".a", r#"content:"/*";color:red;"#),
            vec![r#".a{content:"/*";color:red;}"#]
        );
        assert_eq!(
            flatten(".a", r#"content: "a/*b*/c" /* note */;"#),
            vec![r#".a{content:"a/*b*/c";}"#]
        );
        assert_eq!(
            flatten(".a", r#"background:url("/img/*.png");color:red;"#),
            vec![r#".a{background:url("/img/*.png");color:red;}"#]
        );
        assert_eq!(
            flatten(".a", "background:url(/img/*.png) no-repeat;"),
            vec![".a{background:url(/img/*.png) no-repeat;}"]
        );
    }

    #[test]
    fn whitespace_inside_strings_is_kept() {
        assert_eq!(
            flatten(".a", "font-family:  \"Patrick   Hand\",\n  serif;"),
            vec![".a{font-family:\"Patrick   Hand\", serif;}"]
        );
        assert_eq!(
            flatten(".a", "&[data-x = \"a  b\"] { color : red }"),
            vec![".a[data-x = \"a  b\"]{color:red;}"]
        );
    }

    #[test]
    fn global_declarations_are_dropped() {
        assert!(flatten("", "color:red;").is_empty());
    }

    #[test]
    fn empty_rules_are_skipped() {
        assert!(flatten(".a", "").is_empty());
        assert!(flatten(".a", "&:hover{}").is_empty());
    }
}
