//! Render a stylesheet tree back to nested SCSS text.

use core::fmt::Write;

use crate::parser::{Block, Statement, Stylesheet};

/// Render `stylesheet` with two-space indentation.
///
/// `@extend` directives are left out, as are rules whose selector list is
/// empty (rules that only had placeholder selectors) together with
/// everything nested in them.
#[must_use]
pub fn print_stylesheet(stylesheet: &Stylesheet) -> String {
    let mut out = String::new();
    print_block(&mut out, &stylesheet.block, 0);
    out
}

fn print_block(out: &mut String, block: &Block, indent: usize) {
    let prefix = "  ".repeat(indent);
    for statement in &block.statements {
        match statement {
            Statement::Rule(rule) => {
                if rule.selector.is_empty() {
                    continue;
                }
                print_nested(out, &prefix, &rule.selector.to_string(), &rule.block, indent);
            }
            Statement::Media(media) => {
                print_nested(out, &prefix, &format!("@media {}", media.query), &media.block, indent);
            }
            Statement::Keyframe(keyframe) => {
                print_nested(out, &prefix, &keyframe.selector, &keyframe.block, indent);
            }
            Statement::AtRule(at_rule) => {
                let header = if at_rule.prelude.is_empty() {
                    format!("@{}", at_rule.name)
                } else {
                    format!("@{} {}", at_rule.name, at_rule.prelude)
                };
                match &at_rule.block {
                    Some(block) => print_nested(out, &prefix, &header, block, indent),
                    None => {
                        let _ = writeln!(out, "{prefix}{header};");
                    }
                }
            }
            Statement::Declaration(declaration) => {
                let important = if declaration.important { " !important" } else { "" };
                let _ = writeln!(
                    out,
                    "{prefix}{}: {}{important};",
                    declaration.name, declaration.value
                );
            }
            Statement::Extend(_) => {}
        }
    }
}

fn print_nested(out: &mut String, prefix: &str, header: &str, block: &Block, indent: usize) {
    let mut body = String::new();
    print_block(&mut body, block, indent + 1);
    if body.is_empty() {
        let _ = writeln!(out, "{prefix}{header} {{}}");
    } else {
        let _ = writeln!(out, "{prefix}{header} {{");
        out.push_str(&body);
        let _ = writeln!(out, "{prefix}}}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_stylesheet;

    #[test]
    fn test_empty_block_prints_inline() {
        let stylesheet = parse_stylesheet(".a { @extend .b; }").unwrap();
        assert_eq!(print_stylesheet(&stylesheet), ".a {}\n");
    }
}
