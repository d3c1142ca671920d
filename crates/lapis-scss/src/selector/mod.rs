//! SCSS selector model.
//!
//! This module implements the selector tree that `@extend` resolution works on:
//! simple selectors, compound selectors, combinator-joined complex selectors
//! and comma-separated selector lists, following
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) plus the two SCSS
//! additions, the parent back-reference `&` and placeholder selectors `%name`.
//!
//! Every type renders its canonical text through `Display`. That text is what
//! the [`SelectorGrammar`] re-parses when a rule's selector is renormalized.

/// Structural operations over compound selectors (difference, unification).
pub mod algebra;
/// Selector text grammar (the renormalize service).
pub mod parse;

use core::cmp::Ordering;
use core::fmt::{self, Write as _};
use core::hash::{Hash, Hasher};

use lapis_common::SourcePosition;
use serde::Serialize;
use strum_macros::Display;

pub use algebra::{minus, unify};
pub use parse::{SelectorGrammar, SelectorParser, parse_selector_list};

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element. The derived ordering
/// only serves to give compound selectors a canonical component order for
/// hashing and table keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SimpleSelector {
    /// The SCSS parent back-reference `&`.
    ///
    /// A compound made of nothing but `&` is the back-reference placeholder
    /// at the head of nested-rule selectors.
    Parent,

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    ///
    /// Example: `*`
    Universal,

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Examples: `div`, `p`, `h1`
    Type(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Examples: `#main`, `#nav-bar`
    Id(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Examples: `.error`, `.nav-item`
    Class(String),

    /// SCSS placeholder selector. Rules whose selectors still contain a
    /// placeholder after extension are never emitted.
    ///
    /// Example: `%message-shared`
    Placeholder(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Examples: `[href]`, `[type="text"]`, `[lang|=en]`
    Attribute(AttributeSelector),

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// Examples: `:hover`, `:nth-child(2n+1)`, `:not(.a)`
    PseudoClass {
        /// The pseudo-class name, without the colon.
        name: String,
        /// Raw text between the parentheses of a functional pseudo-class.
        argument: Option<String>,
    },

    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Examples: `::before`, `::placeholder`
    PseudoElement {
        /// The pseudo-element name, without the colons.
        name: String,
        /// Raw text between the parentheses of a functional pseudo-element.
        argument: Option<String>,
    },
}

impl SimpleSelector {
    /// Type-like components (`&`, `*`, `div`) must lead a compound selector.
    #[must_use]
    pub const fn is_type_like(&self) -> bool {
        matches!(self, Self::Parent | Self::Universal | Self::Type(_))
    }

    /// Returns true for placeholder selectors (`%name`).
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AttributeSelector {
    /// The attribute name.
    pub name: String,
    /// The matcher and value, or `None` for a bare `[attr]`.
    pub matcher: Option<(AttributeOperator, String)>,
}

/// The operator of an attribute selector with a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
pub enum AttributeOperator {
    /// `[attr=value]` - exact match
    #[strum(serialize = "=")]
    Equals,
    /// `[attr~=value]` - whitespace-separated word match
    #[strum(serialize = "~=")]
    Includes,
    /// `[attr|=value]` - exact or prefix followed by `-`
    #[strum(serialize = "|=")]
    DashMatch,
    /// `[attr^=value]` - prefix match
    #[strum(serialize = "^=")]
    PrefixMatch,
    /// `[attr$=value]` - suffix match
    #[strum(serialize = "$=")]
    SuffixMatch,
    /// `[attr*=value]` - substring match
    #[strum(serialize = "*=")]
    SubstringMatch,
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
///
/// Components keep their insertion order for rendering, but equality,
/// hashing and ordering are over the component *set*: `.a.b` and `.b.a`
/// are the same compound selector. The empty compound selector is a
/// meaningful value ("no constraint").
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompoundSelector {
    /// The simple selectors that make up this compound selector.
    pub simple_selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// Create a compound selector from its components.
    #[must_use]
    pub const fn new(simple_selectors: Vec<SimpleSelector>) -> Self {
        Self { simple_selectors }
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.simple_selectors.len()
    }

    /// Returns true for the empty compound selector.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.simple_selectors.is_empty()
    }

    /// Returns true if `simple` is one of the components.
    #[must_use]
    pub fn contains(&self, simple: &SimpleSelector) -> bool {
        self.simple_selectors.contains(simple)
    }

    /// Returns true if every component of `self` is also a component of `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.simple_selectors.iter().all(|s| other.contains(s))
    }

    /// True iff this compound is the synthetic back-reference placeholder
    /// (a lone `&`) used at the head of nested-rule selector chains.
    #[must_use]
    pub fn is_empty_reference(&self) -> bool {
        matches!(self.simple_selectors.as_slice(), [SimpleSelector::Parent])
    }

    /// Returns true if any component is a placeholder selector.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.simple_selectors.iter().any(SimpleSelector::is_placeholder)
    }

    /// The sorted, de-duplicated component set used for comparison.
    fn canonical(&self) -> Vec<&SimpleSelector> {
        let mut set: Vec<&SimpleSelector> = self.simple_selectors.iter().collect();
        set.sort_unstable();
        set.dedup();
        set
    }
}

impl PartialEq for CompoundSelector {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for CompoundSelector {}

impl Hash for CompoundSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl PartialOrd for CompoundSelector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompoundSelector {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl From<SimpleSelector> for CompoundSelector {
    fn from(simple: SimpleSelector) -> Self {
        Self::new(vec![simple])
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
///
/// The `Display` form is the canonical separator between two compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// `A B`. Also the implicit "start" combinator of a chain's first link.
    #[strum(serialize = " ")]
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// `A > B`
    #[strum(serialize = " > ")]
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// `A + B`
    #[strum(serialize = " + ")]
    NextSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// `A ~ B`
    #[strum(serialize = " ~ ")]
    SubsequentSibling,
}

/// One step of a complex selector: a compound selector and the combinator
/// relating it to the link before it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    /// Relationship to the previous link. On the first link, anything other
    /// than [`Combinator::Descendant`] is a leading combinator (`> .a`).
    pub combinator: Combinator,
    /// The compound selector at this step.
    pub compound: CompoundSelector,
}

impl Link {
    /// Create a link.
    #[must_use]
    pub const fn new(combinator: Combinator, compound: CompoundSelector) -> Self {
        Self {
            combinator,
            compound,
        }
    }
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors separated
/// by combinators."
///
/// The chain is an owned vector of links in source order (left to right), so
/// two selectors never share structure: every splice builds a new vector.
///
/// Example: `.a > .b ~ .c`
/// ```text
/// [(Descendant, .a), (Child, .b), (SubsequentSibling, .c)]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ComplexSelector {
    /// The links, outermost ancestor first, subject last.
    pub links: Vec<Link>,
}

impl ComplexSelector {
    /// Create a complex selector from its links.
    #[must_use]
    pub const fn new(links: Vec<Link>) -> Self {
        Self { links }
    }

    /// A one-link selector matching `compound`.
    #[must_use]
    pub fn from_compound(compound: CompoundSelector) -> Self {
        Self::new(vec![Link::new(Combinator::Descendant, compound)])
    }

    /// Number of links in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if the chain has no links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The first compound selector of the chain.
    #[must_use]
    pub fn head(&self) -> Option<&CompoundSelector> {
        self.links.first().map(|link| &link.compound)
    }

    /// The last link: the subject of the selector.
    #[must_use]
    pub fn innermost(&self) -> Option<&Link> {
        self.links.last()
    }

    /// All links except the innermost one, or `None` when there are none
    /// (a single-compound selector has no context).
    #[must_use]
    pub fn context(&self) -> Option<Self> {
        match self.links.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self::new(rest.to_vec())),
            _ => None,
        }
    }

    /// Iterate over the compound selectors of the chain, head first.
    pub fn compounds(&self) -> impl Iterator<Item = &CompoundSelector> {
        self.links.iter().map(|link| &link.compound)
    }

    /// Returns true if any compound in the chain contains a placeholder.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.compounds().any(CompoundSelector::has_placeholder)
    }

    /// Split off a leading back-reference link (a lone `&`).
    ///
    /// Returns the back-reference link and the remaining chain, or `None` when
    /// the selector does not start with one or consists of nothing else.
    #[must_use]
    pub fn split_back_reference(&self) -> Option<(&Link, Self)> {
        match self.links.split_first() {
            Some((first, rest)) if first.compound.is_empty_reference() && !rest.is_empty() => {
                Some((first, Self::new(rest.to_vec())))
            }
            _ => None,
        }
    }

    /// Resolve this selector as nested inside `parent`.
    ///
    /// Every `&` is replaced by the parent selector: a lone `&` link is
    /// replaced by the parent's links, and an `&` inside a larger compound
    /// (`&.active`, `&div`) merges the remaining components into the parent's
    /// last compound, type first. Without any `&`, the parent becomes a
    /// descendant context.
    #[must_use]
    pub fn resolve_parent(&self, parent: &Self) -> Self {
        let mentions_parent = self
            .compounds()
            .any(|c| c.contains(&SimpleSelector::Parent));

        if !mentions_parent {
            let mut links = parent.links.clone();
            links.extend(self.links.iter().cloned());
            return Self::new(links);
        }

        let mut links = Vec::with_capacity(self.links.len() + parent.links.len());
        for link in &self.links {
            if !link.compound.contains(&SimpleSelector::Parent) {
                links.push(link.clone());
                continue;
            }
            let mut spliced = parent.links.clone();
            if let Some(first) = spliced.first_mut() {
                first.combinator = link.combinator;
            }
            let rest = link
                .compound
                .simple_selectors
                .iter()
                .filter(|s| **s != SimpleSelector::Parent);
            if let Some(last) = spliced.last_mut() {
                last.compound.simple_selectors.extend(rest.cloned());
                last.compound.simple_selectors.sort_by_key(algebra::placement);
            }
            links.extend(spliced);
        }
        Self::new(links)
    }
}

/// [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
///
/// "A selector list is a comma-separated list of selectors."
///
/// The list is attached to one rule. Duplicates are kept; callers dedup
/// where they need to. The source position travels with the list unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectorList {
    /// The complex selectors, in source order.
    pub selectors: Vec<ComplexSelector>,
    /// Where the list was written.
    pub position: SourcePosition,
}

impl SelectorList {
    /// An empty list located at `position`.
    #[must_use]
    pub const fn new(position: SourcePosition) -> Self {
        Self {
            selectors: Vec::new(),
            position,
        }
    }

    /// A list with the given selectors located at `position`.
    #[must_use]
    pub const fn with_selectors(selectors: Vec<ComplexSelector>, position: SourcePosition) -> Self {
        Self {
            selectors,
            position,
        }
    }

    /// Number of complex selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Returns true if the list holds no selectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Append one selector.
    pub fn push(&mut self, selector: ComplexSelector) {
        self.selectors.push(selector);
    }

    /// Append every selector of `other`, in order.
    pub fn append(&mut self, other: Self) {
        self.selectors.extend(other.selectors);
    }

    /// Iterate over the selectors.
    pub fn iter(&self) -> core::slice::Iter<'_, ComplexSelector> {
        self.selectors.iter()
    }

    /// Returns true if any selector contains a placeholder.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.selectors.iter().any(ComplexSelector::has_placeholder)
    }
}

impl<'a> IntoIterator for &'a SelectorList {
    type Item = &'a ComplexSelector;
    type IntoIter = core::slice::Iter<'a, ComplexSelector>;

    fn into_iter(self) -> Self::IntoIter {
        self.selectors.iter()
    }
}

// ============================================================================
// Canonical text
// ============================================================================

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => f.write_str("&"),
            Self::Universal => f.write_str("*"),
            Self::Type(name) => f.write_str(name),
            Self::Id(name) => write!(f, "#{name}"),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Placeholder(name) => write!(f, "%{name}"),
            Self::Attribute(attr) => write!(f, "{attr}"),
            Self::PseudoClass { name, argument } => {
                write!(f, ":{name}")?;
                write_argument(f, argument.as_deref())
            }
            Self::PseudoElement { name, argument } => {
                write!(f, "::{name}")?;
                write_argument(f, argument.as_deref())
            }
        }
    }
}

fn write_argument(f: &mut fmt::Formatter<'_>, argument: Option<&str>) -> fmt::Result {
    match argument {
        Some(arg) => write!(f, "({arg})"),
        None => Ok(()),
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.matcher {
            None => write!(f, "[{}]", self.name),
            Some((op, value)) if parse::is_identifier(value) => {
                write!(f, "[{}{op}{value}]", self.name)
            }
            Some((op, value)) => {
                write!(f, "[{}{op}\"", self.name)?;
                write_quoted(f, value)?;
                f.write_str("\"]")
            }
        }
    }
}

/// Write an attribute value inside double quotes. The value keeps its escapes
/// verbatim, so only a bare `"` needs escaping.
fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                f.write_char('\\')?;
                if let Some(escaped) = chars.next() {
                    f.write_char(escaped)?;
                }
            }
            '"' => f.write_str("\\\"")?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.simple_selectors
            .iter()
            .try_for_each(|simple| write!(f, "{simple}"))
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, link) in self.links.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", link.combinator)?;
            } else if link.combinator != Combinator::Descendant {
                // Leading combinator: "> .a"
                write!(f, "{} ", link.combinator.to_string().trim())?;
            }
            write!(f, "{}", link.compound)?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectorList {
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
