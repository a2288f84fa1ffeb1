//! Section data model.
//!
//! A page is an ordered `Vec<Section>`. Each section carries an immutable
//! type (selected by the variant of [`SectionContent`]), a typed content
//! payload, and a [`SectionStyle`]. Stored JSON uses the
//! `{ id, type, content, style }` shape; tags this build does not know are
//! kept verbatim in [`SectionContent::Unknown`].

pub mod content;
pub mod defaults;
pub mod style;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use content::*;
pub use defaults::{default_content, default_style, BRAND_COLOR};
pub use style::SectionStyle;

/// Generates [`SectionType`] and [`SectionContent`] from one table so the
/// tag, label, category, and payload type of a variant cannot drift apart.
macro_rules! section_kinds {
    ($( $variant:ident => $tag:literal, $label:literal, $category:ident, $content:ty; )*) => {
        /// The closed set of section types known to this build.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum SectionType {
            $( #[serde(rename = $tag)] $variant, )*
        }

        impl SectionType {
            pub const ALL: &'static [SectionType] = &[ $( SectionType::$variant, )* ];

            /// Stable tag stored in the `type` field.
            pub fn as_str(self) -> &'static str {
                match self { $( SectionType::$variant => $tag, )* }
            }

            /// Label drawn on the editing badge.
            pub fn label(self) -> &'static str {
                match self { $( SectionType::$variant => $label, )* }
            }

            pub fn category(self) -> SectionCategory {
                match self { $( SectionType::$variant => SectionCategory::$category, )* }
            }

            pub fn parse(tag: &str) -> Option<Self> {
                match tag {
                    $( $tag => Some(SectionType::$variant), )*
                    _ => None,
                }
            }
        }

        /// Content payload; the variant is the section's type.
        #[derive(Debug, Clone, PartialEq)]
        pub enum SectionContent {
            $( $variant($content), )*
            /// A tag unknown to this build, preserved as stored.
            Unknown { type_tag: String, content: Value },
        }

        impl SectionContent {
            pub fn section_type(&self) -> Option<SectionType> {
                match self {
                    $( SectionContent::$variant(_) => Some(SectionType::$variant), )*
                    SectionContent::Unknown { .. } => None,
                }
            }

            pub fn type_tag(&self) -> &str {
                match self {
                    $( SectionContent::$variant(_) => $tag, )*
                    SectionContent::Unknown { type_tag, .. } => type_tag,
                }
            }

            /// Deserialize a stored payload as the given type's content.
            pub fn from_value(ty: SectionType, value: Value) -> Result<Self, serde_json::Error> {
                Ok(match ty {
                    $( SectionType::$variant => SectionContent::$variant(serde_json::from_value(value)?), )*
                })
            }

            pub fn to_value(&self) -> Value {
                let value = match self {
                    $( SectionContent::$variant(c) => serde_json::to_value(c), )*
                    SectionContent::Unknown { content, .. } => Ok(content.clone()),
                };
                value.unwrap_or_default()
            }
        }
    };
}

section_kinds! {
    Headline       => "headline",     "Headline",       Basic,      HeadlineContent;
    Body           => "body",         "Body Text",      Basic,      BodyContent;
    Video          => "video",        "Video",          Media,      VideoContent;
    Image          => "image",        "Image",          Media,      ImageContent;
    Banner         => "banner",       "Banner",         Basic,      BannerContent;
    Cta            => "cta",          "Call to Action", Conversion, CtaContent;
    Form           => "form",         "Form",           Conversion, FormContent;
    Logo           => "logo",         "Logo",           Media,      LogoContent;
    Document       => "document",     "Document",       Media,      DocumentContent;
    Spacer         => "spacer",       "Spacer",         Layout,     EmptyContent;
    Hero           => "hero",         "Hero",           Hero,       HeroContent;
    HeroVideo      => "heroVideo",    "Hero Video",     Hero,       HeroVideoContent;
    HeroImage      => "heroImage",    "Hero Image",     Hero,       HeroImageContent;
    HeroForm       => "heroForm",     "Hero Form",      Hero,       HeroFormContent;
    Features       => "features",     "Features",       Content,    FeaturesContent;
    Testimonials   => "testimonials", "Testimonials",   Social,     TestimonialsContent;
    Pricing        => "pricing",      "Pricing",        Conversion, PricingContent;
    Faq            => "faq",          "FAQ",            Content,    FaqContent;
    Stats          => "stats",        "Stats",          Social,     StatsContent;
    Team           => "team",         "Team",           Content,    TeamContent;
    LogoCloud      => "logoCloud",    "Logo Cloud",     Social,     LogoCloudContent;
    Newsletter     => "newsletter",   "Newsletter",     Conversion, NewsletterContent;
    Comparison     => "comparison",   "Comparison",     Content,    ComparisonContent;
    Steps          => "steps",        "Steps",          Content,    StepsContent;
    Gallery        => "gallery",      "Gallery",        Media,      GalleryContent;
    Footer         => "footer",       "Footer",         Layout,     FooterContent;
    Divider        => "divider",      "Divider",        Layout,     EmptyContent;
    Quote          => "quote",        "Quote",          Social,     QuoteContent;
    Countdown      => "countdown",    "Countdown",      Conversion, CountdownContent;
    SocialProof    => "socialProof",  "Social Proof",   Social,     SocialProofContent;
    Benefits       => "benefits",     "Benefits",       Content,    BenefitsContent;
    Cards          => "cards",        "Cards",          Content,    CardsContent;
    QrCode         => "qrCode",       "QR Code",        Media,      QrCodeContent;
}

/// Grouping used by the add-section menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionCategory {
    Basic,
    Hero,
    Media,
    Content,
    Social,
    Conversion,
    Layout,
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// Opaque section identifier, unique within and across pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// A fresh random identifier.
    pub fn generate() -> Self {
        SectionId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        SectionId(s.to_string())
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSection", into = "RawSection")]
pub struct Section {
    pub id: SectionId,
    pub content: SectionContent,
    pub style: SectionStyle,
}

impl Section {
    /// A new section of `ty` populated from the defaults table.
    pub fn new(ty: SectionType) -> Self {
        Section {
            id: SectionId::generate(),
            content: default_content(ty),
            style: default_style(ty),
        }
    }

    pub fn section_type(&self) -> Option<SectionType> {
        self.content.section_type()
    }

    /// Deep copy with a fresh id.
    pub fn duplicate(&self) -> Self {
        Section {
            id: SectionId::generate(),
            ..self.clone()
        }
    }
}

/// Storage shape of a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSection {
    pub id: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub style: Value,
}

impl From<RawSection> for Section {
    fn from(raw: RawSection) -> Self {
        let content = match SectionType::parse(&raw.type_tag) {
            Some(ty) => content_or_default(ty, raw.content, &raw.id),
            None => SectionContent::Unknown {
                type_tag: raw.type_tag,
                content: raw.content,
            },
        };
        let style = match raw.style {
            Value::Null => SectionStyle::default(),
            value => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(section_id = %raw.id, error = %e, "Malformed section style, using fallbacks");
                SectionStyle::default()
            }),
        };
        Section {
            id: SectionId(raw.id),
            content,
            style,
        }
    }
}

impl From<Section> for RawSection {
    fn from(section: Section) -> Self {
        RawSection {
            id: section.id.0,
            type_tag: section.content.type_tag().to_string(),
            content: section.content.to_value(),
            style: serde_json::to_value(&section.style).unwrap_or_default(),
        }
    }
}

/// Keys absent from a stored payload take the type's default values.
///
/// Decoding is per key: a `null` or a value of the wrong shape falls back to
/// that key's default and the rest of the authored content is kept.
fn content_or_default(ty: SectionType, stored: Value, section_id: &str) -> SectionContent {
    let mut merged = match default_content(ty).to_value() {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    match stored {
        Value::Object(stored) => {
            for (key, mut value) in stored {
                strip_nulls(&mut value);
                if value.is_null() {
                    continue;
                }
                let previous = merged.insert(key.clone(), value);
                if let Err(e) = SectionContent::from_value(ty, Value::Object(merged.clone())) {
                    tracing::warn!(section_id, kind = %ty, key = %key, error = %e, "Malformed content field, using its default");
                    match previous {
                        Some(previous) => merged.insert(key, previous),
                        None => merged.remove(&key),
                    };
                }
            }
        }
        Value::Null => {}
        other => {
            tracing::warn!(section_id, kind = %ty, value = %other, "Section content is not an object, using defaults");
        }
    }
    SectionContent::from_value(ty, Value::Object(merged)).unwrap_or_else(|e| {
        tracing::warn!(section_id, kind = %ty, error = %e, "Malformed section content, using defaults");
        default_content(ty)
    })
}

/// Drop `null` object entries at every depth so nested items fall back to
/// their field defaults.
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Overwrite `base` keys with `patch` keys, one level deep.
pub fn merge_shallow(base: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        base.insert(key, value);
    }
}
