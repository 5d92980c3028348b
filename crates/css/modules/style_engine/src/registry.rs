//! Per-render style registry.
//!
//! Storage is `style key → group → media bucket → selector → entry`, every level in
//! insertion order. One registry accumulates the styles of one page render; `reset` clears
//! it between independent passes.

use std::collections::HashSet;

use css_cascade::{PrioritySources, StylePriority, compose_priority};
use css_media_queries::{MediaQueryTable, sort_by_media_query};
use indexmap::IndexMap;
use log::{debug, trace};
use once_cell::unsync::OnceCell;

use crate::config::EngineConfig;
use crate::context::{PageContext, RenderEnvironment, StyleGroup, StyleKey, StyleType};
use crate::input::{StyleArgs, StyleDeclaration};
use crate::merge::merge_declaration;
use crate::render::{render_buckets, style_tag_id};

/// One stored declaration block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleEntry {
    /// Property list, or complete rules for free-form entries.
    pub declaration: String,
    /// Priority stamped by the latest merge.
    pub priority: StylePriority,
    /// Whether the entry belongs to the above-the-fold pass.
    pub critical: bool,
}

/// Selector to entry, in insertion order.
pub type SelectorMap = IndexMap<String, StyleEntry>;

/// Media bucket key to its selectors, kept in cascade order.
pub type MediaBuckets = IndexMap<String, SelectorMap>;

/// Accumulator for the CSS generated during one page render.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    config: EngineConfig,
    page: PageContext,
    /// Stored styles.
    styles: IndexMap<StyleKey, IndexMap<StyleGroup, MediaBuckets>>,
    /// Group that receives styles when a request names none.
    current_group: StyleGroup,
    /// Cached `page.style_key()`.
    style_key: OnceCell<StyleKey>,
    /// Breakpoint table, built on first use.
    media_queries: OnceCell<MediaQueryTable>,
    /// Preset classnames already processed during this render.
    presets_processed: HashSet<String>,
}

impl StyleRegistry {
    /// An empty registry using `config`.
    #[inline]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Configuration this registry was built with.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Switch to another page; the cached style key is recomputed on next use.
    pub fn set_page_context(&mut self, page: PageContext) {
        self.page = page;
        self.style_key.take();
    }

    /// Partition used when a call does not name one.
    pub fn style_key(&self) -> &StyleKey {
        self.style_key.get_or_init(|| self.page.style_key())
    }

    /// Group used when a call does not name one.
    #[inline]
    pub fn group(&self) -> &StyleGroup {
        &self.current_group
    }

    /// Route later requests without a group to `group`.
    #[inline]
    pub fn set_group(&mut self, group: StyleGroup) {
        self.current_group = group;
    }

    /// Breakpoint table with configured overrides.
    pub fn media_queries(&self) -> &MediaQueryTable {
        self.media_queries
            .get_or_init(|| self.config.media_query_table())
    }

    /// Merge one module's style items into the registry.
    ///
    /// Blank declarations are dropped. After merging, the target bucket's media queries are
    /// re-sorted into cascade order.
    pub fn add<E>(&mut self, env: &E, args: StyleArgs)
    where
        E: RenderEnvironment + ?Sized,
    {
        let StyleArgs {
            id,
            order_index,
            store_instance,
            styles,
            priority,
            preset_priority,
            group,
            key,
        } = args;
        let styles: Vec<StyleDeclaration> = styles
            .into_iter()
            .filter(|item| {
                let blank = item.declaration.trim().is_empty();
                if blank {
                    trace!("dropping empty declaration for {:?}", item.selector);
                }
                !blank
            })
            .collect();
        if styles.is_empty() {
            trace!("style request for module {id:?} carries no styles");
            return;
        }

        let sources = PrioritySources {
            explicit: priority,
            preset: preset_priority,
            context_preset: env.current_preset_priority(),
        };
        let ancestors = env.ancestor_count(&id, store_instance);
        let composed = compose_priority(
            &sources,
            self.config.default_priority,
            order_index,
            ancestors,
        );
        let critical = env.is_critical_pass();
        let key = key.unwrap_or_else(|| self.style_key().clone());
        let group = group.unwrap_or_else(|| self.current_group.clone());

        let config = &self.config;
        let table = self
            .media_queries
            .get_or_init(|| config.media_query_table());
        let buckets = self
            .styles
            .entry(key)
            .or_default()
            .entry(group)
            .or_default();

        for item in styles {
            let media = table.resolve(&item.at_rules).to_owned();
            let selectors = buckets.entry(media).or_default();
            merge_declaration(
                selectors,
                item.selector,
                &item.declaration,
                composed,
                critical,
            );
        }
        sort_by_media_query(buckets);
    }

    /// Stored buckets of one `(group, key)` partition.
    pub fn get_style_array(
        &self,
        group: Option<&StyleGroup>,
        key: Option<&StyleKey>,
    ) -> Option<&MediaBuckets> {
        let key = key.unwrap_or_else(|| self.style_key());
        let group = group.unwrap_or(&self.current_group);
        self.styles.get(key)?.get(group)
    }

    /// Serialize one `(group, key)` partition for the requested pass.
    pub fn render<E>(
        &self,
        env: &E,
        style_type: StyleType,
        group: Option<&StyleGroup>,
        key: Option<&StyleKey>,
    ) -> String
    where
        E: RenderEnvironment + ?Sized,
    {
        let Some(buckets) = self.get_style_array(group, key) else {
            return String::new();
        };
        let order = self.media_queries().render_order();
        let css = render_buckets(
            buckets,
            &order,
            style_type,
            self.config.priority_mode,
            env.user_fonts_css(),
        );
        debug!(
            "rendered {} bytes of {style_type:?} css from {} media buckets",
            css.len(),
            buckets.len()
        );
        css
    }

    /// [`Self::render`] wrapped in a `<style>` element, or `None` when there is nothing to emit.
    pub fn enqueue<E>(
        &self,
        env: &E,
        style_type: StyleType,
        group: Option<&StyleGroup>,
        key: Option<&StyleKey>,
    ) -> Option<String>
    where
        E: RenderEnvironment + ?Sized,
    {
        let css = self.render(env, style_type, group, key);
        if css.is_empty() {
            return None;
        }
        let id = style_tag_id(
            &self.config.style_tag_prefix,
            key.unwrap_or_else(|| self.style_key()),
            group.unwrap_or(&self.current_group),
            style_type,
        );
        Some(format!("<style id=\"{id}\">{css}</style>"))
    }

    /// Record that preset styles for `classname` were produced. Returns `true` the first time.
    pub fn mark_preset_processed(&mut self, classname: &str) -> bool {
        if self.presets_processed.contains(classname) {
            return false;
        }
        self.presets_processed.insert(classname.to_owned())
    }

    /// Whether preset styles for `classname` were already produced.
    #[inline]
    pub fn is_preset_processed(&self, classname: &str) -> bool {
        self.presets_processed.contains(classname)
    }

    /// Partitions that hold styles, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &StyleKey> {
        self.styles.keys()
    }

    /// Whether no partition holds styles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Drop every stored style and per-render cache. Configuration, page context and the
    /// current group survive.
    pub fn reset(&mut self) {
        self.styles.clear();
        self.presets_processed.clear();
        self.style_key.take();
        self.media_queries.take();
    }
}
