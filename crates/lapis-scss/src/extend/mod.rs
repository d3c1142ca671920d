//! `@extend` resolution.
//!
//! `.b { @extend .a; }` makes every rule matching `.a` also match `.b`. This
//! module rewrites rule selectors accordingly:
//!
//! 1. [`collect_extensions`] gathers every `(extender, target)` pair into an
//!    [`ExtensionTable`].
//! 2. [`Extend::walk`] visits every style rule and lets
//!    [`Extend::resolve_rule`] rewrite its selector list. For each compound
//!    selector of a rule, [`Extend::extend_compound`] finds the table entries
//!    whose targets it contains, substitutes the extender, and recurses so
//!    that chained extends are followed. [`generate_extension`] then places
//!    each result into the rule selector's ancestor context.
//! 3. The rewritten list is re-parsed through a [`SelectorGrammar`] so the
//!    stored tree has the shape the grammar would have produced.
//!
//! Placeholder selectors (`%name`) exist only to be extended and never
//! survive resolution.
//!
//! ```ignore
//! let mut stylesheet = parse_stylesheet(".error { color: red; } .serious { @extend .error; }")?;
//! extend_stylesheet(&mut stylesheet)?;
//! // .error, .serious { color: red; }
//! ```

mod collect;
mod generate;
mod observer;
mod resolve;
mod rule;
mod table;
mod walk;

use std::collections::BTreeSet;

use lapis_common::SourcePosition;
use thiserror::Error;

pub use collect::collect_extensions;
pub use generate::generate_extension;
pub use observer::{ExtendObserver, NoopObserver, TracingObserver};
pub use table::{ExtensionEntry, ExtensionTable};

use crate::error::ParseError;
use crate::parser::Stylesheet;
use crate::selector::{CompoundSelector, SelectorGrammar, SelectorParser};

/// Extension targets already applied along the current resolution path.
///
/// Each recursive step works on its own copy, so sibling branches never see
/// each other's additions.
pub type SeenSet = BTreeSet<CompoundSelector>;

/// A malformed tree or a broken grammar round-trip. Both mean resolution
/// cannot continue.
///
/// Failed unification, self-extension and selectors without matching
/// extensions are not errors.
#[derive(Debug, Error)]
pub enum ExtendError {
    /// A style rule without any selector.
    #[error("{position}: style rule has no selector")]
    EmptySelector {
        /// Where the rule starts.
        position: SourcePosition,
    },

    /// The grammar rejected the text of a rewritten selector list.
    #[error("{position}: rewritten selector \"{text}\" does not re-parse")]
    Renormalize {
        /// The composed selector text.
        text: String,
        /// Position of the rule's selector list.
        position: SourcePosition,
        /// The grammar's error.
        #[source]
        source: ParseError,
    },
}

/// Resolves `@extend` against a fixed [`ExtensionTable`].
///
/// `G` is the grammar used to renormalize rewritten selector lists and `O`
/// receives trace events. [`Extend::new`] uses [`SelectorParser`] and
/// [`TracingObserver`].
#[derive(Debug)]
pub struct Extend<G = SelectorParser, O = TracingObserver> {
    table: ExtensionTable,
    grammar: G,
    observer: O,
}

impl Extend {
    /// Resolver with the default grammar and tracing observer.
    #[must_use]
    pub const fn new(table: ExtensionTable) -> Self {
        Self::with_parts(table, SelectorParser, TracingObserver)
    }
}

impl<G: SelectorGrammar, O: ExtendObserver> Extend<G, O> {
    /// Resolver with a custom renormalize grammar and observer.
    #[must_use]
    pub const fn with_parts(table: ExtensionTable, grammar: G, observer: O) -> Self {
        Self {
            table,
            grammar,
            observer,
        }
    }

    /// The extension table being applied.
    #[must_use]
    pub const fn table(&self) -> &ExtensionTable {
        &self.table
    }
}

/// Collect the stylesheet's `@extend` directives and resolve every rule.
///
/// The tree is resolved in place and should not be passed in again; see
/// [`Extend::walk`].
///
/// # Errors
///
/// See [`ExtendError`].
pub fn extend_stylesheet(stylesheet: &mut Stylesheet) -> Result<(), ExtendError> {
    let table = collect_extensions(stylesheet);
    tracing::debug!(
        target: "lapis::extend",
        extensions = table.len(),
        "resolving @extend"
    );
    Extend::new(table).walk(stylesheet)
}
