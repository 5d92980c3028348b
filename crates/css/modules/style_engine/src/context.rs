//! Render context: registry partition keys and the collaborators consulted while adding styles.

use core::fmt;
use core::hash::{Hash, Hasher};

/// Literal key shared by every ordinary post render.
pub const POST_STYLE_KEY: &str = "post";

/// Top-level registry partition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleKey {
    /// Numeric theme-builder layout or editor template id.
    Id(u64),
    /// Named partition, normally [`POST_STYLE_KEY`].
    Name(String),
}

impl StyleKey {
    /// The shared `post` partition.
    #[inline]
    pub fn post() -> Self {
        Self::Name(POST_STYLE_KEY.to_owned())
    }
}

impl Default for StyleKey {
    #[inline]
    fn default() -> Self {
        Self::post()
    }
}

impl From<u64> for StyleKey {
    #[inline]
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for StyleKey {
    #[inline]
    fn from(name: &str) -> Self {
        name.parse::<u64>()
            .map_or_else(|_| Self::Name(name.to_owned()), Self::Id)
    }
}

impl fmt::Display for StyleKey {
    #[inline]
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Id(id) => write!(formatter, "{id}"),
            Self::Name(ref name) => formatter.write_str(name),
        }
    }
}

/// Second-level registry partition.
///
/// Groups compare and hash by name, so `Custom("module")` and [`StyleGroup::Module`] address
/// the same partition.
#[derive(Clone, Debug, Default)]
pub enum StyleGroup {
    /// Ordinary module styles.
    #[default]
    Module,
    /// Styles of a preset definition.
    Preset,
    /// Styles of a preset group definition.
    PresetGroup,
    /// Any other caller-defined bucket.
    Custom(String),
}

impl StyleGroup {
    /// Map a group name onto a variant; unknown names become [`StyleGroup::Custom`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "module" => Self::Module,
            "preset" => Self::Preset,
            "presetGroup" => Self::PresetGroup,
            other => Self::Custom(other.to_owned()),
        }
    }

    /// Name of the group as used in style tag ids and editor requests.
    pub fn as_str(&self) -> &str {
        match *self {
            Self::Module => "module",
            Self::Preset => "preset",
            Self::PresetGroup => "presetGroup",
            Self::Custom(ref name) => name,
        }
    }

    /// Whether styles in this group belong to a preset definition.
    #[inline]
    pub fn is_preset(&self) -> bool {
        matches!(self.as_str(), "preset" | "presetGroup")
    }
}

impl PartialEq for StyleGroup {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for StyleGroup {}

impl Hash for StyleGroup {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl From<&str> for StyleGroup {
    #[inline]
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl fmt::Display for StyleGroup {
    #[inline]
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Which render pass to serialize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StyleType {
    /// Entries not flagged as above the fold.
    #[default]
    Default,
    /// Entries flagged as above the fold.
    Critical,
}

impl StyleType {
    /// Whether an entry with the given critical flag belongs to this pass.
    #[inline]
    pub const fn accepts(self, critical: bool) -> bool {
        match self {
            Self::Default => !critical,
            Self::Critical => critical,
        }
    }
}

/// Identity of the page being rendered, used to derive the default [`StyleKey`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Theme-builder layout currently being rendered.
    pub layout_id: Option<u64>,
    /// Editor template currently being rendered.
    pub template_id: Option<u64>,
}

impl PageContext {
    /// Layouts and templates keep their own partition; everything else shares `post`, so
    /// repeated renders of one logical page do not duplicate styles.
    pub fn style_key(&self) -> StyleKey {
        self.layout_id
            .or(self.template_id)
            .map_or_else(StyleKey::post, StyleKey::Id)
    }
}

/// Collaborators consulted by [`crate::StyleRegistry::add`] and the renderer.
///
/// Every method has an inert default, so hosts override only what they track.
pub trait RenderEnvironment {
    /// Whether the current request precomputes critical CSS.
    fn should_generate_critical_css(&self) -> bool {
        false
    }

    /// Whether the module being rendered sits above the fold.
    fn is_above_the_fold(&self) -> bool {
        false
    }

    /// Number of ancestors of `module_id` in the block tree identified by `store_instance`.
    fn ancestor_count(&self, _module_id: &str, _store_instance: Option<u32>) -> u32 {
        0
    }

    /// Priority of the preset currently being rendered, if any.
    fn current_preset_priority(&self) -> Option<i64> {
        None
    }

    /// `@font-face` rules for queued user fonts, prefixed to rendered output.
    fn user_fonts_css(&self) -> Option<String> {
        None
    }

    /// Whether newly added entries are flagged critical.
    fn is_critical_pass(&self) -> bool {
        self.should_generate_critical_css() && self.is_above_the_fold()
    }
}

/// Environment with every collaborator at its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticEnvironment;

impl RenderEnvironment for StaticEnvironment {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_id_wins_over_template() {
        let page = PageContext {
            layout_id: Some(7),
            template_id: Some(9),
        };
        assert_eq!(page.style_key(), StyleKey::Id(7));
    }

    #[test]
    fn plain_posts_share_one_key() {
        assert_eq!(PageContext::default().style_key(), StyleKey::post());
        assert_eq!(StyleKey::post().to_string(), "post");
    }

    #[test]
    fn numeric_names_become_ids() {
        assert_eq!(StyleKey::from("42"), StyleKey::Id(42));
        assert_eq!(StyleKey::from("post"), StyleKey::post());
    }

    #[test]
    fn group_names_round_trip() {
        for name in ["module", "preset", "presetGroup", "customizer"] {
            assert_eq!(StyleGroup::from_name(name).as_str(), name);
        }
        assert!(StyleGroup::PresetGroup.is_preset());
        assert!(!StyleGroup::Module.is_preset());
    }

    #[test]
    fn custom_group_with_builtin_name_is_the_builtin() {
        assert_eq!(StyleGroup::Custom("module".to_owned()), StyleGroup::Module);
        assert_eq!(StyleGroup::from("presetGroup"), StyleGroup::PresetGroup);
        assert_ne!(StyleGroup::Custom("modules".to_owned()), StyleGroup::Module);
    }
}
