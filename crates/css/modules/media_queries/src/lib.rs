//! CSS Media Queries Level 4 — breakpoint buckets for generated module styles.
//! Spec: <https://www.w3.org/TR/mediaqueries-4/>
//!
//! Generated styles are bucketed either under [`GENERAL`] (no media condition) or under a
//! verbatim `@media` prelude. This crate provides:
//! - The named breakpoint table with alias resolution
//! - A cascade rank for every bucket key, so that wider `max-width` buckets come
//!   before narrower ones and `min-width` buckets follow all of them

#![forbid(unsafe_code)]

mod rank;
mod table;

pub use rank::{
    MediaQueryRank, WidthFeature, parse_width_feature, rank_media_query, sort_by_media_query,
};
pub use table::MediaQueryTable;

/// Bucket key for declarations that apply without any media condition.
pub const GENERAL: &str = "general";
