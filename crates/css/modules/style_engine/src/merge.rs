//! Folding incoming declaration blocks into a selector table.

use css_cascade::StylePriority;
use indexmap::map::Entry;
use log::trace;

use crate::registry::{SelectorMap, StyleEntry};

/// Merge `declaration` into the entry for `selector`, creating it when absent.
///
/// Free-form blocks (empty selector) are complete rules and append with a single space.
/// Property lists append only when they differ from what is stored, with a `;` repaired in
/// between. The entry always takes the latest `priority`; `critical` is sticky.
pub(crate) fn merge_declaration(
    selectors: &mut SelectorMap,
    selector: String,
    declaration: &str,
    priority: StylePriority,
    critical: bool,
) {
    match selectors.entry(selector) {
        Entry::Occupied(mut occupied) => {
            let free_form = occupied.key().is_empty();
            let entry = occupied.get_mut();
            if free_form {
                append_free_form(&mut entry.declaration, declaration);
            } else if entry.declaration == declaration {
                trace!("identical declaration for existing selector, skipping");
            } else {
                append_declaration(&mut entry.declaration, declaration);
            }
            entry.priority = priority;
            entry.critical |= critical;
        }
        Entry::Vacant(vacant) => {
            vacant.insert(StyleEntry {
                declaration: declaration.to_owned(),
                priority,
                critical,
            });
        }
    }
}

/// `existing` then `addition`, separated by one space.
pub(crate) fn append_free_form(existing: &mut String, addition: &str) {
    existing.push(' ');
    existing.push_str(addition);
}

/// `existing` then `addition`, with a `;` inserted when `existing` does not end in one.
pub(crate) fn append_declaration(existing: &mut String, addition: &str) {
    let kept = existing.trim_end().len();
    existing.truncate(kept);
    if !existing.ends_with(';') {
        existing.push(';');
    }
    existing.push(' ');
    existing.push_str(addition);
}
