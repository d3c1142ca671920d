//! Integration tests for the SCSS stylesheet parser.

use lapis_common::SourcePosition;
use lapis_scss::parser::{AtRule, Declaration, ExtendDirective, KeyframeRule, MediaRule};
use lapis_scss::{Block, ParseError, Statement, StyleRule, parse_stylesheet};

fn parse(source: &str) -> Vec<Statement> {
    parse_stylesheet(source).unwrap().block.statements
}

fn rule(statement: &Statement) -> &StyleRule {
    match statement {
        Statement::Rule(rule) => rule,
        other => panic!("expected a style rule, got {other:?}"),
    }
}

fn declaration(statement: &Statement) -> &Declaration {
    match statement {
        Statement::Declaration(declaration) => declaration,
        other => panic!("expected a declaration, got {other:?}"),
    }
}

fn extend(statement: &Statement) -> &ExtendDirective {
    match statement {
        Statement::Extend(directive) => directive,
        other => panic!("expected @extend, got {other:?}"),
    }
}

#[test]
fn test_empty_stylesheet() {
    assert!(parse("").is_empty());
    assert!(parse("  /* nothing */ ").is_empty());
}

#[test]
fn test_rule_with_declarations() {
    let statements = parse(".a { color: red; margin: 0 auto }");
    assert_eq!(statements.len(), 1);

    let rule = rule(&statements[0]);
    assert_eq!(rule.selector.to_string(), ".a");
    assert_eq!(rule.block.statements.len(), 2);

    let color = declaration(&rule.block.statements[0]);
    assert_eq!(color.name, "color");
    assert_eq!(color.value, "red");
    assert!(!color.important);

    let margin = declaration(&rule.block.statements[1]);
    assert_eq!(margin.name, "margin");
    assert_eq!(margin.value, "0 auto");
}

#[test]
fn test_selector_list_prelude() {
    let statements = parse("h1, h2 > span {}");
    let rule = rule(&statements[0]);
    assert_eq!(rule.selector.len(), 2);
    assert_eq!(rule.selector.to_string(), "h1, h2 > span");
    assert!(rule.block.is_empty());
}

#[test]
fn test_important_declaration() {
    let statements = parse("a { color: red !important; }");
    let color = declaration(&rule(&statements[0]).block.statements[0]);
    assert_eq!(color.value, "red");
    assert!(color.important);
}

#[test]
fn test_declaration_with_url() {
    let statements = parse("a { background: url(http://example.com/bg.png) no-repeat; }");
    let background = declaration(&rule(&statements[0]).block.statements[0]);
    assert_eq!(background.value, "url(http://example.com/bg.png) no-repeat");
}

#[test]
fn test_string_escapes_survive_declarations() {
    let statements = parse(r#"a::before { content: "say \"hi\" \\o/"; }"#);
    let content = declaration(&rule(&statements[0]).block.statements[0]);
    assert_eq!(content.value, r#""say \"hi\" \\o/""#);
}

#[test]
fn test_nested_rules_and_pseudo_class_declarations() {
    let statements = parse(
        "nav {
            color: black;
            a:hover { color: blue; }
            &.open { display: block; }
        }",
    );
    let nav = rule(&statements[0]);
    assert_eq!(nav.block.statements.len(), 3);
    assert_eq!(declaration(&nav.block.statements[0]).name, "color");
    assert_eq!(rule(&nav.block.statements[1]).selector.to_string(), "a:hover");
    assert_eq!(rule(&nav.block.statements[2]).selector.to_string(), "&.open");
}

#[test]
fn test_extend_directive() {
    let statements = parse(".b { @extend .a; }");
    let directive = extend(&rule(&statements[0]).block.statements[0]);
    assert_eq!(directive.selector.to_string(), ".a");
    assert!(!directive.optional);
}

#[test]
fn test_extend_optional_and_list() {
    let statements = parse(".b { @extend .a, %shared !optional; }");
    let directive = extend(&rule(&statements[0]).block.statements[0]);
    assert_eq!(directive.selector.len(), 2);
    assert_eq!(directive.selector.to_string(), ".a, %shared");
    assert!(directive.optional);
}

#[test]
fn test_media_rule() {
    let statements = parse("@media screen and (max-width: 600px) { .a { color: red; } }");
    match &statements[0] {
        Statement::Media(MediaRule { query, block, .. }) => {
            assert_eq!(query, "screen and (max-width: 600px)");
            assert_eq!(rule(&block.statements[0]).selector.to_string(), ".a");
        }
        other => panic!("expected @media, got {other:?}"),
    }
}

#[test]
fn test_keyframes_keep_raw_selectors() {
    let statements = parse("@keyframes spin { from { opacity: 0; } 50% { opacity: 1; } }");
    let Statement::AtRule(AtRule {
        name,
        prelude,
        block: Some(Block { statements: frames }),
        ..
    }) = &statements[0]
    else {
        panic!("expected @keyframes, got {:?}", statements[0]);
    };
    assert_eq!(name, "keyframes");
    assert_eq!(prelude, "spin");

    let selectors: Vec<&str> = frames
        .iter()
        .map(|frame| match frame {
            Statement::Keyframe(KeyframeRule { selector, .. }) => selector.as_str(),
            other => panic!("expected a keyframe, got {other:?}"),
        })
        .collect();
    assert_eq!(selectors, vec!["from", "50%"]);
}

#[test]
fn test_vendor_keyframes() {
    let statements = parse("@-webkit-keyframes fade { to { opacity: 0; } }");
    let Statement::AtRule(AtRule {
        block: Some(block), ..
    }) = &statements[0]
    else {
        panic!("expected an at-rule with a block");
    };
    assert!(matches!(block.statements[0], Statement::Keyframe(_)));
}

#[test]
fn test_statement_at_rule() {
    let statements = parse("@charset \"utf-8\";\n.a {}");
    assert_eq!(statements.len(), 2);
    match &statements[0] {
        Statement::AtRule(AtRule {
            name,
            prelude,
            block: None,
            ..
        }) => {
            assert_eq!(name, "charset");
            assert_eq!(prelude, "\"utf-8\"");
        }
        other => panic!("expected @charset, got {other:?}"),
    }
}

#[test]
fn test_positions() {
    let statements = parse("\n  .a {\n    @extend .b;\n  }");
    let rule = rule(&statements[0]);
    assert_eq!(rule.position, SourcePosition::new(2, 3));
    assert_eq!(rule.selector.position, SourcePosition::new(2, 3));

    let directive = extend(&rule.block.statements[0]);
    assert_eq!(directive.position, SourcePosition::new(3, 5));
    assert_eq!(directive.selector.position, SourcePosition::new(3, 13));
}

#[test]
fn test_unclosed_block() {
    assert!(matches!(
        parse_stylesheet(".a { color: red;"),
        Err(ParseError::UnexpectedEof { .. })
    ));
}

#[test]
fn test_stray_closing_brace() {
    let err = parse_stylesheet(".a {}\n}").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    assert_eq!(err.position(), SourcePosition::new(2, 1));
}

#[test]
fn test_extend_with_block_is_rejected() {
    assert!(matches!(
        parse_stylesheet(".a { @extend .b { color: red; } }"),
        Err(ParseError::UnexpectedToken { .. })
    ));
}

#[test]
fn test_declaration_errors() {
    for source in [".a { : red; }", ".a { color red; }"] {
        assert!(
            matches!(parse_stylesheet(source), Err(ParseError::UnexpectedToken { .. })),
            "expected {source:?} to be rejected"
        );
    }
}

#[test]
fn test_invalid_rule_selector() {
    assert!(matches!(
        parse_stylesheet(".a* { }"),
        Err(ParseError::InvalidSelector { .. })
    ));
}

#[test]
fn test_invalid_extend_target_position() {
    let err = parse_stylesheet(".a {\n  @extend .b $;\n}").unwrap_err();
    assert!(matches!(err, ParseError::InvalidSelector { .. }));
    assert_eq!(err.position(), SourcePosition::new(2, 14));
}

#[test]
fn test_serializes_to_json() {
    let stylesheet = parse_stylesheet(".a { color: red; @extend %b; }").unwrap();
    let json = serde_json::to_value(&stylesheet).unwrap();

    let rule = &json["block"]["statements"][0];
    assert_eq!(rule["kind"], "rule");
    assert_eq!(rule["position"]["line"], 1);
    assert_eq!(rule["block"]["statements"][0]["kind"], "declaration");
    assert_eq!(rule["block"]["statements"][0]["value"], "red");
    assert_eq!(rule["block"]["statements"][1]["kind"], "extend");
    assert_eq!(rule["block"]["statements"][1]["optional"], false);
}
