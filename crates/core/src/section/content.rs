//! Typed content payloads, one struct per section shape.
//!
//! Every struct is `#[serde(default)]` with camelCase keys so partial or
//! older stored records still deserialize.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shared item shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureItem {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingItem {
    pub name: String,
    pub price: String,
    pub period: String,
    pub features: Vec<String>,
    pub button_text: String,
    pub button_url: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub role: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatItem {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogoItem {
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComparisonRow {
    pub feature: String,
    pub us: String,
    pub them: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepItem {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryImage {
    pub url: String,
    pub caption: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkItem {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardItem {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub link_text: String,
    pub link_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    pub label: String,
    /// HTML input type: `text`, `email`, `tel`, `textarea`.
    pub field_type: String,
    pub placeholder: String,
    pub required: bool,
}

// ---------------------------------------------------------------------------
// Basic blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeadlineContent {
    pub text: String,
    pub subtext: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BodyContent {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoContent {
    pub video_url: String,
    pub caption: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageContent {
    pub image_url: String,
    pub alt_text: String,
    pub caption: String,
    pub link_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BannerContent {
    pub text: String,
    pub button_text: String,
    pub button_url: String,
    pub hide_button: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaContent {
    pub headline: String,
    pub subheadline: String,
    pub button_text: String,
    pub button_url: String,
    pub hide_button: bool,
    pub secondary_button_text: String,
    pub secondary_button_url: String,
    pub hide_secondary_button: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormContent {
    pub headline: String,
    pub subheadline: String,
    pub fields: Vec<FormField>,
    pub button_text: String,
    pub hide_button: bool,
    pub action_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogoContent {
    pub image_url: String,
    pub alt_text: String,
    pub link_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentContent {
    pub title: String,
    pub description: String,
    pub document_url: String,
    pub button_text: String,
    pub hide_button: bool,
}

/// Spacer and divider carry no content; their look is all style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyContent {}

// ---------------------------------------------------------------------------
// Hero variants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroContent {
    pub headline: String,
    pub subheadline: String,
    pub button_text: String,
    pub button_url: String,
    pub hide_button: bool,
    pub secondary_button_text: String,
    pub secondary_button_url: String,
    pub hide_secondary_button: bool,
    pub background_image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroVideoContent {
    pub headline: String,
    pub subheadline: String,
    pub video_url: String,
    pub button_text: String,
    pub button_url: String,
    pub hide_button: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroImageContent {
    pub headline: String,
    pub subheadline: String,
    pub image_url: String,
    /// `left` or `right` of the text column.
    pub image_position: String,
    pub button_text: String,
    pub button_url: String,
    pub hide_button: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroFormContent {
    pub headline: String,
    pub subheadline: String,
    pub form_headline: String,
    pub fields: Vec<FormField>,
    pub button_text: String,
    pub hide_button: bool,
    pub action_url: String,
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeaturesContent {
    pub headline: String,
    pub subheadline: String,
    pub feature_items: Vec<FeatureItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialsContent {
    pub headline: String,
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingContent {
    pub headline: String,
    pub subheadline: String,
    pub pricing_items: Vec<PricingItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqContent {
    pub headline: String,
    pub faq_items: Vec<FaqItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatsContent {
    pub headline: String,
    pub stats: Vec<StatItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamContent {
    pub headline: String,
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogoCloudContent {
    pub headline: String,
    pub logos: Vec<LogoItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsletterContent {
    pub headline: String,
    pub subheadline: String,
    pub placeholder: String,
    pub button_text: String,
    pub hide_button: bool,
    pub disclaimer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComparisonContent {
    pub headline: String,
    pub us_label: String,
    pub them_label: String,
    pub rows: Vec<ComparisonRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepsContent {
    pub headline: String,
    pub steps: Vec<StepItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryContent {
    pub headline: String,
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterContent {
    pub company_name: String,
    pub tagline: String,
    pub links: Vec<LinkItem>,
    pub copyright: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteContent {
    pub quote: String,
    pub author: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CountdownContent {
    pub headline: String,
    /// RFC 3339, or a `YYYY-MM-DDTHH:MM` local-input value read as UTC.
    pub target_date: String,
    pub expired_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialProofContent {
    pub headline: String,
    pub text: String,
    /// Star rating out of 5; `0` hides the stars.
    pub rating: f64,
    pub review_count: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BenefitsContent {
    pub headline: String,
    pub subheadline: String,
    pub benefits: Vec<String>,
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardsContent {
    pub headline: String,
    pub cards: Vec<CardItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QrCodeContent {
    pub headline: String,
    pub url: String,
    pub caption: String,
}
