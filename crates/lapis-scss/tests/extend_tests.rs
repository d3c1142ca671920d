//! Integration tests for `@extend` resolution.

use std::cell::{Cell, RefCell};

use lapis_common::SourcePosition;
use lapis_scss::parser::AtRule;
use lapis_scss::{
    Block, ComplexSelector, CompoundSelector, Extend, ExtendError, ExtendObserver, ExtensionEntry,
    ExtensionTable, NoopObserver, ParseError, SeenSet, SelectorGrammar, SelectorList,
    SelectorParser, Statement, StyleRule, Stylesheet, collect_extensions, extend_stylesheet,
    generate_extension, parse_selector_list, parse_stylesheet, print_stylesheet,
};

fn complex(text: &str) -> ComplexSelector {
    parse_selector_list(text, SourcePosition::START)
        .unwrap()
        .selectors
        .remove(0)
}

fn compound(text: &str) -> CompoundSelector {
    complex(text).links.remove(0).compound
}

fn strings(selectors: &[ComplexSelector]) -> Vec<String> {
    selectors.iter().map(ToString::to_string).collect()
}

/// Parse and resolve `source`, returning every style rule's selector text in
/// document order.
fn resolve(source: &str) -> Vec<String> {
    let mut stylesheet = parse_stylesheet(source).unwrap();
    extend_stylesheet(&mut stylesheet).unwrap();
    let mut selectors = Vec::new();
    rule_selectors(&stylesheet.block, &mut selectors);
    selectors
}

fn rule_selectors(block: &Block, out: &mut Vec<String>) {
    for statement in &block.statements {
        match statement {
            Statement::Rule(rule) => {
                out.push(rule.selector.to_string());
                rule_selectors(&rule.block, out);
            }
            Statement::Media(media) => rule_selectors(&media.block, out),
            Statement::AtRule(AtRule {
                block: Some(block), ..
            }) => rule_selectors(block, out),
            _ => {}
        }
    }
}

fn table(pairs: &[(&str, &str)]) -> ExtensionTable {
    let mut table = ExtensionTable::new();
    for (extender, target) in pairs {
        assert!(table.insert(complex(extender), compound(target), SourcePosition::START));
    }
    table
}

// End-to-end resolution

#[test]
fn test_basic_extend() {
    assert_eq!(
        resolve(".error { color: red; } .seriousError { @extend .error; font-weight: bold; }"),
        vec![".error, .seriousError", ".seriousError"]
    );
}

#[test]
fn test_chained_extends() {
    assert_eq!(
        resolve(".a { x: 1; } .b { @extend .a; } .c { @extend .b; }"),
        vec![".a, .b, .c", ".b, .c", ".c"]
    );
}

#[test]
fn test_target_inside_larger_compound_is_unified() {
    assert_eq!(
        resolve(".foo.bar { x: 1; } .baz { @extend .foo; }"),
        vec![".foo.bar, .baz.bar", ".baz"]
    );
    assert_eq!(
        resolve(".a.x { x: 1; } div { @extend .a; }"),
        vec![".a.x, div.x", "div"]
    );
}

#[test]
fn test_unification_failure_leaves_rule_unchanged() {
    assert_eq!(
        resolve("div.a { x: 1; } span { @extend .a; }"),
        vec!["div.a", "span"]
    );
}

#[test]
fn test_self_extension_is_a_no_op() {
    assert_eq!(resolve(".a { @extend .a; }"), vec![".a"]);
}

#[test]
fn test_cycle_terminates() {
    assert_eq!(
        resolve(".a { @extend .b; } .b { @extend .a; }"),
        vec![".a, .b", ".b, .a"]
    );
}

#[test]
fn test_ancestor_contexts_are_interleaved_both_ways() {
    assert_eq!(
        resolve(".x .y { x: 1; } .a .b { @extend .y; }"),
        vec![".x .y, .x .a .b, .a .x .b", ".a .b"]
    );
}

#[test]
fn test_links_after_matched_compound_are_kept() {
    assert_eq!(
        resolve(".y .z { x: 1; } .b { @extend .y; }"),
        vec![".y .z, .b .z", ".b"]
    );
}

#[test]
fn test_duplicates_are_removed() {
    assert_eq!(
        resolve(".a, .b { x: 1; } .c { @extend .a; @extend .b; }"),
        vec![".a, .c, .b", ".c"]
    );
}

#[test]
fn test_placeholders_are_replaced() {
    assert_eq!(
        resolve("%msg { border: 1px solid; } .ok { @extend %msg; } .warn { @extend %msg; }"),
        vec![".ok, .warn", ".ok", ".warn"]
    );
}

#[test]
fn test_unextended_placeholder_rule_is_emptied() {
    assert_eq!(
        resolve("%unused { color: red; } .a { color: blue; }"),
        vec!["", ".a"]
    );
}

#[test]
fn test_emptied_rule_fails_a_second_pass() {
    let mut stylesheet = parse_stylesheet("%unused { color: red; } .a { color: blue; }").unwrap();
    extend_stylesheet(&mut stylesheet).unwrap();
    assert!(matches!(
        extend_stylesheet(&mut stylesheet),
        Err(ExtendError::EmptySelector { position }) if position == SourcePosition::new(1, 1)
    ));
}

#[test]
fn test_nested_back_reference_is_preserved() {
    assert_eq!(
        resolve(".p { & > .b { x: 1; } } .c { @extend .b; }"),
        vec![".p", "& > .b, & > .c", ".c"]
    );
}

#[test]
fn test_type_extender_unifies_with_back_reference_compound() {
    assert_eq!(
        resolve(".p { &.x { color: red; } } div { @extend .x; }"),
        vec![".p", "&.x, &div", "div"]
    );
}

#[test]
fn test_escaped_attribute_value_survives_rewrite() {
    assert_eq!(
        resolve(r#"[title="a\\b"].x { x: 1; } .y { @extend .x; }"#),
        vec![r#"[title="a\\b"].x, .y[title="a\\b"]"#, ".y"]
    );
    assert_eq!(
        resolve(r#"[title='say "hi"'].x { x: 1; } .y { @extend .x; }"#),
        vec![
            r#"[title="say \"hi\""].x, .y[title="say \"hi\""]"#,
            ".y"
        ]
    );
}

#[test]
fn test_leading_combinator_carries_over() {
    assert_eq!(
        resolve(".p { > .b { x: 1; } } .c { @extend .b; }"),
        vec![".p", "> .b, > .c", ".c"]
    );
}

#[test]
fn test_rules_inside_media_are_resolved() {
    assert_eq!(
        resolve("@media print { .a { x: 1; } } .b { @extend .a; }"),
        vec![".a, .b", ".b"]
    );
}

#[test]
fn test_keyframe_selectors_are_not_extended() {
    let mut stylesheet =
        parse_stylesheet("@keyframes k { from { opacity: 0; } } .b { @extend from; }").unwrap();
    extend_stylesheet(&mut stylesheet).unwrap();
    let Statement::AtRule(AtRule {
        block: Some(block), ..
    }) = &stylesheet.block.statements[0]
    else {
        panic!("expected @keyframes");
    };
    match &block.statements[0] {
        Statement::Keyframe(keyframe) => assert_eq!(keyframe.selector, "from"),
        other => panic!("expected a keyframe, got {other:?}"),
    }
}

#[test]
fn test_printed_output() {
    let mut stylesheet = parse_stylesheet(
        "%message { border: 1px solid #ccc; }
         .success { @extend %message; color: green; }
         .a { .b { color: red; } }
         .c { @extend .b; }",
    )
    .unwrap();
    extend_stylesheet(&mut stylesheet).unwrap();
    assert_eq!(
        print_stylesheet(&stylesheet),
        ".success {\n  border: 1px solid #ccc;\n}\n\
         .success {\n  color: green;\n}\n\
         .a {\n  .b, .c {\n    color: red;\n  }\n}\n\
         .c {}\n"
    );
}

// Extension table

#[test]
fn test_lookup_subset_in_registration_order() {
    let table = table(&[(".p", ".a"), (".q", ".b"), (".r", ".a.b"), (".s", ".c")]);
    let targets: Vec<String> = table
        .lookup_subset(&compound(".b.a"))
        .iter()
        .map(|e| e.target.to_string())
        .collect();
    assert_eq!(targets, vec![".a", ".b", ".a.b"]);
    assert!(table.lookup_subset(&compound(".z")).is_empty());
}

#[test]
fn test_lookup_exact_uses_set_equality() {
    let table = table(&[(".p", ".a"), (".r", ".a.b")]);
    let exact = table.lookup_exact(&compound(".b.a"));
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].extender.to_string(), ".r");
    assert_eq!(table.lookup_exact(&compound(".a")).len(), 1);
}

#[test]
fn test_collect_registers_each_extender() {
    let stylesheet = parse_stylesheet(".x, .y { @extend .t; @extend .t; }").unwrap();
    let table = collect_extensions(&stylesheet);
    let pairs: Vec<(String, String)> = table
        .iter()
        .map(|e| (e.extender.to_string(), e.target.to_string()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (".x".to_string(), ".t".to_string()),
            (".y".to_string(), ".t".to_string()),
        ]
    );
}

// Context splicing

#[test]
fn test_generate_identical_selectors() {
    assert!(generate_extension(&complex(".a .b"), &complex(".a .b")).is_empty());
}

#[test]
fn test_generate_without_extendee_context() {
    assert_eq!(
        strings(&generate_extension(&complex(".y"), &complex(".a .b"))),
        vec![".a .b"]
    );
}

#[test]
fn test_generate_with_extendee_context_only() {
    assert_eq!(
        strings(&generate_extension(&complex(".x .y"), &complex(".b"))),
        vec![".x .b"]
    );
    assert_eq!(
        strings(&generate_extension(&complex(".x > .y"), &complex(".b"))),
        vec![".x > .b"]
    );
}

#[test]
fn test_generate_with_both_contexts() {
    assert_eq!(
        strings(&generate_extension(&complex(".x .y"), &complex(".a .b"))),
        vec![".x .a .b", ".a .x .b"]
    );
}

// Compound-level recursion

#[test]
fn test_seen_set_is_per_branch() {
    let table = table(&[
        (".p", ".a"),
        (".q", ".a"),
        (".r", ".p"),
        (".r", ".q"),
        (".s", ".r"),
    ]);
    let extend = Extend::with_parts(table, SelectorParser, NoopObserver);
    let results = extend.extend_compound(&compound(".a"), &SeenSet::new());
    assert_eq!(strings(&results), vec![".p", ".r", ".s", ".q", ".r", ".s"]);
}

#[test]
fn test_compound_cycle_terminates() {
    let table = table(&[(".b", ".a"), (".a", ".b")]);
    let extend = Extend::with_parts(table, SelectorParser, NoopObserver);
    assert_eq!(
        strings(&extend.extend_compound(&compound(".a"), &SeenSet::new())),
        vec![".b", ".a"]
    );
}

#[test]
fn test_seen_target_is_skipped() {
    let table = table(&[(".b", ".a")]);
    let extend = Extend::with_parts(table, SelectorParser, NoopObserver);
    let seen: SeenSet = [compound(".a")].into_iter().collect();
    assert!(extend.extend_compound(&compound(".a"), &seen).is_empty());
}

#[test]
fn test_extender_context_is_kept() {
    let table = table(&[(".x > .b", ".a")]);
    let extend = Extend::with_parts(table, SelectorParser, NoopObserver);
    assert_eq!(
        strings(&extend.extend_complex(&complex(".a.c"), &SeenSet::new())),
        vec![".x > .b.c"]
    );
}

// Renormalization

#[derive(Default)]
struct CountingGrammar {
    calls: Cell<usize>,
}

impl SelectorGrammar for CountingGrammar {
    fn renormalize(&self, text: &str, position: SourcePosition) -> Result<SelectorList, ParseError> {
        self.calls.set(self.calls.get() + 1);
        parse_selector_list(text, position)
    }
}

struct RejectingGrammar;

impl SelectorGrammar for RejectingGrammar {
    fn renormalize(&self, text: &str, position: SourcePosition) -> Result<SelectorList, ParseError> {
        Err(ParseError::InvalidSelector {
            text: text.to_string(),
            reason: "rejected".to_string(),
            position,
        })
    }
}

#[test]
fn test_renormalize_only_rewritten_rules() {
    let mut stylesheet = parse_stylesheet(".a { x: 1; } .b { @extend .a; } .c { x: 2; }").unwrap();
    let grammar = CountingGrammar::default();
    let extend = Extend::with_parts(collect_extensions(&stylesheet), &grammar, NoopObserver);
    extend.walk(&mut stylesheet).unwrap();
    assert_eq!(grammar.calls.get(), 1);
}

#[test]
fn test_renormalize_failure_is_an_error() {
    let mut stylesheet = parse_stylesheet(".a { x: 1; } .b { @extend .a; }").unwrap();
    let extend = Extend::with_parts(collect_extensions(&stylesheet), RejectingGrammar, NoopObserver);
    match extend.walk(&mut stylesheet) {
        Err(ExtendError::Renormalize { text, position, .. }) => {
            assert_eq!(text, ".a, .b");
            assert_eq!(position, SourcePosition::new(1, 1));
        }
        other => panic!("expected a renormalize error, got {other:?}"),
    }
}

#[test]
fn test_unchanged_rules_do_not_need_the_grammar() {
    let mut stylesheet = parse_stylesheet(".a { x: 1; } .b { @extend .z; }").unwrap();
    let extend = Extend::with_parts(collect_extensions(&stylesheet), RejectingGrammar, NoopObserver);
    assert!(extend.walk(&mut stylesheet).is_ok());
}

#[test]
fn test_rule_without_selector_is_an_error() {
    let extend = Extend::new(ExtensionTable::new());
    let mut rule = StyleRule {
        selector: SelectorList::new(SourcePosition::new(2, 1)),
        block: Block::default(),
        position: SourcePosition::new(2, 1),
    };
    assert!(matches!(
        extend.resolve_rule(&mut rule),
        Err(ExtendError::EmptySelector { position }) if position == SourcePosition::new(2, 1)
    ));
}

#[test]
fn test_resolve_rule_reports_changes() {
    let stylesheet = parse_stylesheet(".b { @extend .a; }").unwrap();
    let extend = Extend::new(collect_extensions(&stylesheet));

    let mut matched = StyleRule {
        selector: parse_selector_list(".a", SourcePosition::START).unwrap(),
        block: Block::default(),
        position: SourcePosition::START,
    };
    assert!(extend.resolve_rule(&mut matched).unwrap());
    assert_eq!(matched.selector.to_string(), ".a, .b");

    let mut unmatched = StyleRule {
        selector: parse_selector_list(".c", SourcePosition::START).unwrap(),
        block: Block::default(),
        position: SourcePosition::START,
    };
    assert!(!extend.resolve_rule(&mut unmatched).unwrap());
}

// Observer events

#[derive(Default)]
struct RecordingObserver {
    events: RefCell<Vec<String>>,
}

impl ExtendObserver for RecordingObserver {
    fn unified(
        &self,
        entry: &ExtensionEntry,
        remainder: &CompoundSelector,
        result: Option<&CompoundSelector>,
    ) {
        let result = result.map_or_else(|| "none".to_string(), ToString::to_string);
        self.events
            .borrow_mut()
            .push(format!("unify {} with '{remainder}': {result}", entry.extender));
    }

    fn rule_rewritten(&self, _position: SourcePosition, before: &SelectorList, after: &SelectorList) {
        self.events
            .borrow_mut()
            .push(format!("rewrite {before} -> {after}"));
    }
}

#[test]
fn test_observer_sees_unification_and_rewrites() {
    let mut stylesheet: Stylesheet =
        parse_stylesheet("div.a { x: 1; } .b.c { x: 2; } span { @extend .a; } .d { @extend .b; }")
            .unwrap();
    let observer = RecordingObserver::default();
    let extend = Extend::with_parts(collect_extensions(&stylesheet), SelectorParser, &observer);
    extend.walk(&mut stylesheet).unwrap();

    assert_eq!(
        observer.events.take(),
        vec![
            "unify span with 'div': none".to_string(),
            "unify .d with '.c': .d.c".to_string(),
            "rewrite .b.c -> .b.c, .d.c".to_string(),
        ]
    );
}
