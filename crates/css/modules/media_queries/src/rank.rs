//! Cascade rank of media-query bucket keys.
//!
//! Only preludes of the exact shape `@media only screen and ( min-width|max-width: Npx )` are
//! ranked by their width. Compound ranges and anything else rank last.

use core::cmp::Reverse;

use cssparser::{ParseError, Parser, ParserInput, Token};
use indexmap::IndexMap;

use crate::GENERAL;

/// A single width condition extracted from a media query prelude.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidthFeature {
    /// `min-width: Npx`
    Min(u32),
    /// `max-width: Npx`
    Max(u32),
}

/// Sort rank of a bucket key. Lower ranks serialize first.
///
/// `General` precedes every media bucket; `max-width` buckets follow in descending width;
/// `min-width` buckets follow all of those in ascending width; unrecognised queries come
/// last and keep their relative order under a stable sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MediaQueryRank {
    /// The [`GENERAL`] bucket.
    General,
    /// `max-width: Npx`, wider first.
    MaxWidth(Reverse<u32>),
    /// `min-width: Npx`, narrower first.
    MinWidth(u32),
    /// Compound ranges and any other prelude.
    Other,
}

/// Rank one bucket key.
pub fn rank_media_query(key: &str) -> MediaQueryRank {
    if key == GENERAL {
        return MediaQueryRank::General;
    }
    match parse_width_feature(key) {
        Some(WidthFeature::Max(width)) => MediaQueryRank::MaxWidth(Reverse(width)),
        Some(WidthFeature::Min(width)) => MediaQueryRank::MinWidth(width),
        None => MediaQueryRank::Other,
    }
}

/// Reorder the buckets of one selector table by [`rank_media_query`], stable on ties.
pub fn sort_by_media_query<V>(buckets: &mut IndexMap<String, V>) {
    buckets.sort_by(|left_key, _, right_key, _| {
        rank_media_query(left_key).cmp(&rank_media_query(right_key))
    });
}

/// Extract the width condition of a `@media only screen and ( <feature>: Npx )` prelude.
///
/// Returns `None` for any other shape, including compound `and` ranges.
pub fn parse_width_feature(query: &str) -> Option<WidthFeature> {
    let prelude = query.trim_start().strip_prefix("@media")?;
    let mut input = ParserInput::new(prelude);
    let mut parser = Parser::new(&mut input);
    parser.parse_entirely(parse_screen_prelude).ok()
}

/// `only screen and ( ... )`
fn parse_screen_prelude<'input>(
    parser: &mut Parser<'input, '_>,
) -> Result<WidthFeature, ParseError<'input, ()>> {
    parser.expect_ident_matching("only")?;
    parser.expect_ident_matching("screen")?;
    parser.expect_ident_matching("and")?;
    parser.expect_parenthesis_block()?;
    parser.parse_nested_block(parse_width_condition)
}

/// `min-width: Npx` or `max-width: Npx` inside the parenthesised block.
fn parse_width_condition<'input>(
    block: &mut Parser<'input, '_>,
) -> Result<WidthFeature, ParseError<'input, ()>> {
    let name = block.expect_ident_cloned()?;
    block.expect_colon()?;
    let location = block.current_source_location();
    let width = match *block.next()? {
        Token::Dimension {
            int_value: Some(pixels),
            ref unit,
            ..
        } if unit.eq_ignore_ascii_case("px") && pixels >= 0 => pixels.unsigned_abs(),
        ref token => return Err(location.new_unexpected_token_error(token.clone())),
    };
    if name.eq_ignore_ascii_case("max-width") {
        Ok(WidthFeature::Max(width))
    } else if name.eq_ignore_ascii_case("min-width") {
        Ok(WidthFeature::Min(width))
    } else {
        Err(location.new_custom_error(()))
    }
}
