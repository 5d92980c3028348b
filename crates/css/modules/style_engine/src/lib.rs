//! Style aggregation for server-rendered page-builder modules.
//!
//! Module render callbacks hand their generated declaration blocks to a [`StyleRegistry`]
//! while the block tree is walked. The registry merges blocks by selector, keeps media
//! buckets in cascade order, and finally serializes one partition into CSS text:
//!
//! - Rules within a bucket are ordered by [`css_cascade::StylePriority`], stable on ties
//! - Rules with byte-identical declarations share one selector list, except standalone
//!   selectors (free-form CSS, pseudo selectors, `@keyframes`, presets)
//! - Non-general buckets are wrapped in their `@media` block
//!
//! A registry is plain per-render state: confine one instance to one render, or guard it
//! with a lock when a host renders pages concurrently.

#![forbid(unsafe_code)]

mod config;
mod context;
mod input;
mod merge;
mod registry;
mod render;

pub use config::{DEFAULT_STYLE_TAG_PREFIX, EngineConfig};
pub use context::{
    POST_STYLE_KEY, PageContext, RenderEnvironment, StaticEnvironment, StyleGroup, StyleKey,
    StyleType,
};
pub use css_cascade::{PriorityMode, StylePriority};
pub use css_media_queries::{GENERAL, MediaQueryTable};
pub use input::{StyleArgs, StyleDeclaration};
pub use registry::{MediaBuckets, SelectorMap, StyleEntry, StyleRegistry};
pub use render::is_standalone_selector;
