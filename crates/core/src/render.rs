//! Block attributes and wrapper markup.
//!
//! The resolver decides what date to show; this module turns the block's
//! attributes into a selector and wraps the result in the block's markup:
//!
//! ```html
//! <div class="wp-block-post-date has-text-align-center"><time datetime="2026-03-05T09:30:00+00:00">March 5, 2026</time></div>
//! ```
//!
//! Nothing here escapes or sanitizes; the host does that.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::format::DateFormatter;
use crate::formats::PatternFormatter;
use crate::resolve::DateResolver;
use crate::types::{FieldSelector, FormatSpec, Record, Resolution};

/// Base class of the block wrapper.
pub const DEFAULT_BLOCK_CLASS: &str = "wp-block-post-date";

/// Source value meaning "the post's own date".
pub const POST_DATE_SOURCE: &str = "postDate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl FromStr for TextAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown alignment '{other}' (left, center, right)")),
        }
    }
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which built-in date the block shows when its source is the post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    #[default]
    Date,
    Modified,
}

/// Where the block reads its date from.
///
/// Serialized as a string: `"postDate"` or a meta key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Source {
    #[default]
    PostDate,
    Meta(String),
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        if s.is_empty() || s == POST_DATE_SOURCE {
            Self::PostDate
        } else {
            Self::Meta(s)
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::PostDate => serializer.serialize_str(POST_DATE_SOURCE),
            Self::Meta(key) => serializer.serialize_str(key),
        }
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Block style as the editor stores it; only the link color is read.
///
/// ```json
/// { "elements": { "link": { "color": { "text": "var:preset|color|accent" } } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStyle {
    #[serde(skip_serializing_if = "StyleElements::is_empty")]
    pub elements: StyleElements,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleElements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<ElementStyle>,
}

impl StyleElements {
    fn is_empty(&self) -> bool {
        self.link.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ElementColor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementColor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl BlockStyle {
    /// `elements.link.color.text`, if set.
    #[must_use]
    pub fn link_color(&self) -> Option<&str> {
        self.elements
            .link
            .as_ref()
            .and_then(|link| link.color.as_ref())
            .and_then(|color| color.text.as_deref())
    }

    fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Typed block attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatSpec>,
    pub is_link: bool,
    pub display_type: DisplayType,
    pub source: Source,
    #[serde(skip_serializing_if = "BlockStyle::is_empty")]
    pub style: BlockStyle,
}

impl BlockAttributes {
    /// Set the link color the way the editor stores it.
    #[must_use]
    pub fn with_link_color(mut self, color: impl Into<String>) -> Self {
        self.style.elements.link = Some(ElementStyle {
            color: Some(ElementColor {
                text: Some(color.into()),
            }),
        });
        self
    }

    /// The resolver selector these attributes describe.
    ///
    /// A meta source wins over the display type.
    #[must_use]
    pub fn selector(&self) -> FieldSelector {
        match (&self.source, self.display_type) {
            (Source::Meta(key), _) => FieldSelector::CustomField(key.clone()),
            (Source::PostDate, DisplayType::Modified) => FieldSelector::ModifiedDate,
            (Source::PostDate, DisplayType::Date) => FieldSelector::PostDate,
        }
    }
}

/// Renders block markup around a [`DateResolver`].
#[derive(Debug, Clone)]
pub struct BlockRenderer<F = PatternFormatter> {
    resolver: DateResolver<F>,
    block_class: String,
}

impl<F: DateFormatter> BlockRenderer<F> {
    #[must_use]
    pub fn new(resolver: DateResolver<F>) -> Self {
        Self {
            resolver,
            block_class: DEFAULT_BLOCK_CLASS.to_string(),
        }
    }

    #[must_use]
    pub fn with_block_class(mut self, block_class: impl Into<String>) -> Self {
        self.block_class = block_class.into();
        self
    }

    #[must_use]
    pub fn resolver(&self) -> &DateResolver<F> {
        &self.resolver
    }

    #[must_use]
    pub fn block_class(&self) -> &str {
        &self.block_class
    }

    /// Resolve the date for these attributes without building markup.
    ///
    /// The permalink is only used when `attrs.is_link` is set.
    #[must_use]
    pub fn resolve(
        &self,
        attrs: &BlockAttributes,
        record: Option<&Record>,
        permalink: Option<&str>,
        now: &DateTime<FixedOffset>,
    ) -> Resolution {
        let link_target = if attrs.is_link { permalink } else { None };
        self.resolver.resolve(
            record,
            &attrs.selector(),
            attrs.format.as_ref(),
            link_target,
            now,
        )
    }

    /// Render the block. Returns an empty string when there is nothing to
    /// show.
    #[must_use]
    pub fn render(
        &self,
        attrs: &BlockAttributes,
        record: Option<&Record>,
        permalink: Option<&str>,
        now: &DateTime<FixedOffset>,
    ) -> String {
        self.markup(attrs, &self.resolve(attrs, record, permalink, now))
    }

    /// Wrap an existing resolution in block markup.
    #[must_use]
    pub fn markup(&self, attrs: &BlockAttributes, resolution: &Resolution) -> String {
        match resolution {
            Resolution::Empty => String::new(),
            Resolution::Invalid => format!(
                "<div class=\"{}\">{}</div>",
                self.classes(attrs, None),
                Resolution::INVALID_MARKER
            ),
            Resolution::Date(date) => format!(
                "<div class=\"{}\"><time datetime=\"{}\">{}</time></div>",
                self.classes(attrs, date.css_modifier.as_deref()),
                date.machine_timestamp,
                date.display_text
            ),
        }
    }

    fn classes(&self, attrs: &BlockAttributes, css_modifier: Option<&str>) -> String {
        let mut classes = vec![self.block_class.clone()];
        if let Some(align) = attrs.text_align {
            classes.push(format!("has-text-align-{align}"));
        }
        if attrs.style.link_color().is_some() {
            classes.push("has-link-color".to_string());
        }
        if let Some(modifier) = css_modifier {
            classes.push(format!("{}__{modifier}", self.block_class));
        }
        classes.join(" ")
    }
}

impl Default for BlockRenderer {
    fn default() -> Self {
        Self::new(DateResolver::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ResolverConfig;
    use pretty_assertions::assert_eq;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn now() -> DateTime<FixedOffset> {
        ts("2026-10-19T12:00:00+00:00")
    }

    fn renderer() -> BlockRenderer {
        BlockRenderer::new(DateResolver::new())
    }

    fn record() -> Record {
        Record::new(42, ts("2026-03-05T09:30:00+00:00"))
            .modified(ts("2026-03-07T16:02:00+00:00"))
            .with_field("event_date", "2026-06-21")
    }

    #[test]
    fn test_attributes_from_block_json() {
        let attrs: BlockAttributes = serde_json::from_str(
            r#"{"textAlign":"center","format":"human-diff","isLink":true,"displayType":"modified","source":"postDate"}"#,
        )
        .unwrap();

        assert_eq!(attrs.text_align, Some(TextAlign::Center));
        assert_eq!(attrs.format, Some(FormatSpec::HumanRelative));
        assert!(attrs.is_link);
        assert_eq!(attrs.selector(), FieldSelector::ModifiedDate);
    }

    #[test]
    fn test_link_color_from_block_style() {
        let attrs: BlockAttributes = serde_json::from_str(
            r##"{"style":{"elements":{"link":{"color":{"text":"#cc0000"}}},"typography":{"fontSize":"12px"}}}"##,
        )
        .unwrap();
        assert_eq!(attrs.style.link_color(), Some("#cc0000"));
        assert_eq!(attrs, BlockAttributes::default().with_link_color("#cc0000"));

        let html = renderer().render(&attrs, Some(&record()), None, &now());
        assert!(
            html.starts_with("<div class=\"wp-block-post-date has-link-color\">"),
            "{html}"
        );
    }

    #[test]
    fn test_style_without_link_color() {
        let attrs: BlockAttributes = serde_json::from_str(
            r##"{"style":{"elements":{"link":{"color":{}}},"color":{"text":"#000"}}}"##,
        )
        .unwrap();
        assert_eq!(attrs.style.link_color(), None);

        let html = renderer().render(&attrs, Some(&record()), None, &now());
        assert!(!html.contains("has-link-color"));
    }

    #[test]
    fn test_style_round_trips_in_host_shape() {
        let attrs = BlockAttributes::default().with_link_color("var:preset|color|accent");
        let json = serde_json::to_value(&attrs).unwrap();
        assert_eq!(
            json["style"]["elements"]["link"]["color"]["text"],
            "var:preset|color|accent"
        );
        assert!(serde_json::to_value(BlockAttributes::default())
            .unwrap()
            .get("style")
            .is_none());
    }

    #[test]
    fn test_attribute_defaults() {
        let attrs: BlockAttributes = serde_json::from_str("{}").unwrap();
        assert_eq!(attrs, BlockAttributes::default());
        assert_eq!(attrs.selector(), FieldSelector::PostDate);
    }

    #[test]
    fn test_meta_source_wins_over_display_type() {
        let attrs = BlockAttributes {
            source: Source::from("release_date"),
            display_type: DisplayType::Modified,
            ..BlockAttributes::default()
        };
        assert_eq!(attrs.selector(), FieldSelector::custom("release_date"));
    }

    #[test]
    fn test_render_post_date() {
        let renderer = renderer();
        let html = renderer.render(&BlockAttributes::default(), Some(&record()), None, &now());
        assert_eq!(
            html,
            "<div class=\"wp-block-post-date\"><time datetime=\"2026-03-05T09:30:00+00:00\">March 5, 2026</time></div>"
        );
    }

    #[test]
    fn test_render_modified_with_classes_and_link() {
        let renderer = renderer();
        let attrs = BlockAttributes {
            text_align: Some(TextAlign::Right),
            is_link: true,
            display_type: DisplayType::Modified,
            ..BlockAttributes::default()
        }
        .with_link_color("#cc0000");
        let permalink = Some("https://example.com/p/42/");
        let html = renderer.render(&attrs, Some(&record()), permalink, &now());
        assert_eq!(
            html,
            "<div class=\"wp-block-post-date has-text-align-right has-link-color wp-block-post-date__modified-date\">\
             <time datetime=\"2026-03-07T16:02:00+00:00\"><a href=\"https://example.com/p/42/\">March 7, 2026</a></time></div>"
        );
    }

    #[test]
    fn test_permalink_ignored_without_is_link() {
        let renderer = renderer();
        let html = renderer.render(
            &BlockAttributes::default(),
            Some(&record()),
            Some("https://example.com/p/42/"),
            &now(),
        );
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_render_nothing() {
        let renderer = renderer();
        assert_eq!(renderer.render(&BlockAttributes::default(), None, None, &now()), "");

        let unmodified = Record::new(1, ts("2026-03-05T09:30:00+00:00"));
        let attrs = BlockAttributes {
            display_type: DisplayType::Modified,
            ..BlockAttributes::default()
        };
        assert_eq!(renderer.render(&attrs, Some(&unmodified), None, &now()), "");
    }

    #[test]
    fn test_render_invalid_marker_in_preview() {
        let renderer = BlockRenderer::new(DateResolver::with_config(ResolverConfig {
            strict: true,
            ..ResolverConfig::default()
        }))
        .with_block_class("wp-block-create-block-date-block");
        let attrs = BlockAttributes {
            source: Source::from("missing_field"),
            text_align: Some(TextAlign::Left),
            ..BlockAttributes::default()
        };
        assert_eq!(
            renderer.render(&attrs, Some(&record()), None, &now()),
            "<div class=\"wp-block-create-block-date-block has-text-align-left\">Invalid date</div>"
        );
    }

    #[test]
    fn test_text_align_from_str() {
        assert_eq!("Center".parse::<TextAlign>(), Ok(TextAlign::Center));
        assert!("justify".parse::<TextAlign>().is_err());
    }
}
