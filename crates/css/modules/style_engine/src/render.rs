//! Serializing stored buckets into CSS text.

use core::fmt::Write as _;
use std::collections::HashMap;

use css_cascade::PriorityMode;
use css_media_queries::GENERAL;

use crate::context::{StyleGroup, StyleKey, StyleType};
use crate::registry::{MediaBuckets, SelectorMap, StyleEntry};

/// A rule ready for output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RenderRule<'data> {
    /// Selectors sharing one byte-identical declaration, joined into a selector list.
    Mergeable {
        selectors: Vec<&'data str>,
        declaration: &'data str,
    },
    /// A rule that must stay on its own.
    Standalone {
        selector: &'data str,
        declaration: &'data str,
    },
}

/// Whether `selector` must never share a selector list with another rule.
///
/// Free-form blocks, pseudo-classes and pseudo-elements (including vendor `:-` forms, which
/// invalidate a whole list in engines that do not know them), `@keyframes`, and preset
/// selectors stay standalone.
pub fn is_standalone_selector(selector: &str) -> bool {
    selector.is_empty()
        || selector.contains(':')
        || selector.contains("@keyframes")
        || selector.contains("preset--")
}

/// Serialize every bucket in `order`, then any bucket `order` does not name, in stored order.
pub(crate) fn render_buckets(
    buckets: &MediaBuckets,
    order: &[&str],
    style_type: StyleType,
    mode: PriorityMode,
    user_fonts: Option<String>,
) -> String {
    let mut out = String::new();
    let listed = order.iter().copied().filter(|media| buckets.contains_key(*media));
    let unlisted = buckets
        .keys()
        .map(String::as_str)
        .filter(|media| !order.contains(media));

    for media in listed.chain(unlisted) {
        let Some(selectors) = buckets.get(media) else {
            continue;
        };
        let rules = combine_rules(sorted_entries(selectors, style_type, mode));
        if rules.is_empty() {
            continue;
        }
        let body = serialize_rules(&rules);
        if media == GENERAL {
            out.push_str(&body);
        } else if write!(out, "\n\n{media} {{\n{body}\n}}").is_err() {
            return String::new();
        }
    }

    match user_fonts {
        Some(fonts) if !fonts.is_empty() && !out.is_empty() => fonts + &out,
        _ => out,
    }
}

/// Entries of one bucket that belong to `style_type`, stably sorted by priority.
fn sorted_entries(
    selectors: &SelectorMap,
    style_type: StyleType,
    mode: PriorityMode,
) -> Vec<(&str, &StyleEntry)> {
    let mut entries: Vec<(&str, &StyleEntry)> = selectors
        .iter()
        .filter(|&(_, entry)| style_type.accepts(entry.critical))
        .map(|(selector, entry)| (selector.as_str(), entry))
        .collect();
    entries.sort_by(|left, right| left.1.priority.compare(&right.1.priority, mode));
    entries
}

/// Group entries with byte-identical declarations under one selector list. The combined
/// rule sits where its first selector did.
pub(crate) fn combine_rules<'data>(
    entries: Vec<(&'data str, &'data StyleEntry)>,
) -> Vec<RenderRule<'data>> {
    let mut rules: Vec<RenderRule<'data>> = Vec::with_capacity(entries.len());
    let mut by_declaration: HashMap<&'data str, usize> = HashMap::new();

    for (selector, entry) in entries {
        let declaration = entry.declaration.as_str();
        if is_standalone_selector(selector) {
            rules.push(RenderRule::Standalone {
                selector,
                declaration,
            });
            continue;
        }
        if let Some(&index) = by_declaration.get(declaration)
            && let Some(&mut RenderRule::Mergeable {
                ref mut selectors, ..
            }) = rules.get_mut(index)
        {
            selectors.push(selector);
            continue;
        }
        by_declaration.insert(declaration, rules.len());
        rules.push(RenderRule::Mergeable {
            selectors: vec![selector],
            declaration,
        });
    }
    rules
}

/// Newline-joined rules. Free-form blocks are emitted verbatim.
fn serialize_rules(rules: &[RenderRule<'_>]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(rules.len());
    for rule in rules {
        match *rule {
            RenderRule::Standalone {
                selector: "",
                declaration,
            } => lines.push(declaration.to_owned()),
            RenderRule::Standalone {
                selector,
                declaration,
            } => lines.push(format!("{selector} {{{declaration}}}")),
            RenderRule::Mergeable {
                ref selectors,
                declaration,
            } => lines.push(format!("{} {{{declaration}}}", selectors.join(", "))),
        }
    }
    lines.join("\n")
}

/// `id` attribute of an enqueued `<style>` element, restricted to `[A-Za-z0-9_-]`.
pub(crate) fn style_tag_id(
    prefix: &str,
    key: &StyleKey,
    group: &StyleGroup,
    style_type: StyleType,
) -> String {
    let suffix = match style_type {
        StyleType::Default => "",
        StyleType::Critical => "-critical",
    };
    format!("{prefix}-{key}-{group}{suffix}")
        .chars()
        .map(|character| {
            if character.is_ascii_alphanumeric() || character == '_' || character == '-' {
                character
            } else {
                '-'
            }
        })
        .collect()
}
