//! Personalized page delivery: resolve an access token, then render the
//! recipient's page with their data substituted in.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::generation::{personalized_url, PageKind};
use crate::render::{render_message_page, render_page, RenderOptions};
use crate::section::content::{
    BodyContent, CtaContent, HeadlineContent, LogoContent, VideoContent,
};
use crate::section::{Section, SectionContent, SectionId, SectionStyle};
use crate::substitution::RecipientProfile;
use crate::types::{DbId, Timestamp};

const LEGACY_BRAND_FALLBACK: &str = "#6366f1";

/// Fields of a pre-builder page, rendered through a fixed layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyTemplate {
    pub headline: String,
    pub subheadline: String,
    pub body: String,
    pub video_url: String,
    pub cta_text: String,
    pub cta_url: String,
    pub logo_url: String,
    pub brand_color: String,
}

impl LegacyTemplate {
    /// The fixed layout: logo, headline, video, body, call to action.
    /// Blank parts are left out.
    pub fn to_sections(&self) -> Vec<Section> {
        let brand = if self.brand_color.trim().is_empty() {
            LEGACY_BRAND_FALLBACK.to_string()
        } else {
            self.brand_color.clone()
        };
        let plain = SectionStyle {
            padding_y: Some(24),
            max_width: Some(720),
            accent_color: Some(brand.clone()),
            ..Default::default()
        };
        let section = |key: &str, content: SectionContent, style: SectionStyle| Section {
            id: SectionId::from(format!("legacy-{key}").as_str()),
            content,
            style,
        };

        let mut sections = Vec::new();
        if !self.logo_url.trim().is_empty() {
            sections.push(section(
                "logo",
                SectionContent::Logo(LogoContent {
                    image_url: self.logo_url.clone(),
                    alt_text: "Logo".into(),
                    link_url: String::new(),
                }),
                plain.clone(),
            ));
        }
        sections.push(section(
            "headline",
            SectionContent::Headline(HeadlineContent {
                text: self.headline.clone(),
                subtext: self.subheadline.clone(),
            }),
            SectionStyle {
                font_size: Some("4xl".into()),
                font_weight: Some("bold".into()),
                padding_y: Some(48),
                ..plain.clone()
            },
        ));
        if !self.video_url.trim().is_empty() {
            sections.push(section(
                "video",
                SectionContent::Video(VideoContent {
                    video_url: self.video_url.clone(),
                    caption: String::new(),
                }),
                plain.clone(),
            ));
        }
        if !self.body.trim().is_empty() {
            sections.push(section(
                "body",
                SectionContent::Body(BodyContent {
                    text: self.body.clone(),
                }),
                SectionStyle {
                    text_align: Some("left".into()),
                    ..plain.clone()
                },
            ));
        }
        sections.push(section(
            "cta",
            SectionContent::Cta(CtaContent {
                button_text: self.cta_text.clone(),
                button_url: self.cta_url.clone(),
                hide_button: self.cta_text.trim().is_empty(),
                hide_secondary_button: true,
                ..Default::default()
            }),
            SectionStyle {
                button_color: Some(brand),
                padding_y: Some(48),
                ..plain
            },
        ));
        sections
    }
}

/// What a token resolves to.
#[derive(Debug, Clone)]
pub enum PageTemplate {
    Builder { name: String, sections: Vec<Section> },
    Legacy { name: String, content: LegacyTemplate },
}

impl PageTemplate {
    pub fn kind(&self) -> PageKind {
        match self {
            PageTemplate::Builder { .. } => PageKind::Builder,
            PageTemplate::Legacy { .. } => PageKind::Legacy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContact {
    pub id: DbId,
    pub token: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub custom_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedPage {
    pub contact: ResolvedContact,
    pub template: PageTemplate,
}

/// Looks up the contact and page behind an access token.
#[async_trait]
pub trait PageResolver: Send + Sync {
    type Error: std::fmt::Display + Send;

    /// `Ok(None)` when the token matches no contact or the contact has no page.
    async fn resolve(&self, token: &str) -> Result<Option<ResolvedPage>, Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Rendered { contact_id: DbId, html: String },
    NotFound,
    /// Lookup failed for a reason other than an unknown token.
    Unavailable,
}

impl DeliveryOutcome {
    /// HTML for every outcome; failures get a standalone explanation page.
    pub fn into_html(self) -> String {
        match self {
            DeliveryOutcome::Rendered { html, .. } => html,
            DeliveryOutcome::NotFound => render_not_found_page(),
            DeliveryOutcome::Unavailable => render_unavailable_page(),
        }
    }
}

/// Render `page` for its contact. Every vocabulary key is filled, so the
/// recipient never sees a known token unfilled.
pub fn render_personalized(page: &ResolvedPage, base_url: &str, now: Option<Timestamp>) -> String {
    let contact = &page.contact;
    let landing_page = personalized_url(base_url, page.template.kind(), &contact.token);
    let data = RecipientProfile {
        first_name: &contact.first_name,
        last_name: contact.last_name.as_deref(),
        company: contact.company.as_deref(),
        custom_message: contact.custom_message.as_deref(),
    }
    .to_data(Some(&landing_page));

    let opts = RenderOptions {
        now,
        ..RenderOptions::personalized(&data)
    };
    match &page.template {
        PageTemplate::Builder { name, sections } => render_page(name, sections, &opts),
        PageTemplate::Legacy { name, content } => {
            let title = if content.headline.trim().is_empty() {
                name.as_str()
            } else {
                content.headline.as_str()
            };
            render_page(title, &content.to_sections(), &opts)
        }
    }
}

/// Resolve `token` and render the recipient's page.
pub async fn deliver<R: PageResolver>(resolver: &R, token: &str, base_url: &str) -> DeliveryOutcome {
    match resolver.resolve(token).await {
        Ok(Some(page)) => DeliveryOutcome::Rendered {
            contact_id: page.contact.id,
            html: render_personalized(&page, base_url, None),
        },
        Ok(None) => DeliveryOutcome::NotFound,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load personalized page");
            DeliveryOutcome::Unavailable
        }
    }
}

pub fn render_not_found_page() -> String {
    render_message_page(
        "Page not found",
        "This link is invalid or has expired. Please check the URL or contact the sender.",
    )
}

pub fn render_unavailable_page() -> String {
    render_message_page(
        "Temporarily unavailable",
        "We couldn't load this page right now. Please try again in a moment.",
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;
    use crate::section::SectionType;

    struct FakeResolver {
        pages: HashMap<String, ResolvedPage>,
        broken: bool,
    }

    #[async_trait]
    impl PageResolver for FakeResolver {
        type Error = String;

        async fn resolve(&self, token: &str) -> Result<Option<ResolvedPage>, String> {
            if self.broken {
                return Err("connection refused".into());
            }
            Ok(self.pages.get(token).cloned())
        }
    }

    fn contact(last_name: Option<&str>) -> ResolvedContact {
        ResolvedContact {
            id: 9,
            token: "tok123".into(),
            first_name: "Ann".into(),
            last_name: last_name.map(str::to_string),
            company: Some("Acme".into()),
            custom_message: None,
        }
    }

    fn builder_page() -> ResolvedPage {
        let mut headline = Section::new(SectionType::Headline);
        headline.content = SectionContent::Headline(HeadlineContent {
            text: "Hi {{full_name}} at {{company}}{{last_name}}".into(),
            subtext: "{{mystery}}".into(),
        });
        ResolvedPage {
            contact: contact(None),
            template: PageTemplate::Builder {
                name: "For {{first_name}}".into(),
                sections: vec![headline, Section::new(SectionType::QrCode)],
            },
        }
    }

    #[test]
    fn builder_page_is_fully_personalized() {
        let html = render_personalized(&builder_page(), "https://x.test", None);
        assert!(html.contains("<title>For Ann</title>"));
        assert!(html.contains("Hi Ann at Acme</h1>"));
        assert!(html.contains("{{mystery}}"));
        assert!(html.contains("data=https%3A%2F%2Fx%2Etest%2Fp%2Ftok123"));
        assert!(!html.contains("pc-selected"));
    }

    #[test]
    fn legacy_layout_uses_same_pipeline() {
        let page = ResolvedPage {
            contact: contact(Some("Lee")),
            template: PageTemplate::Legacy {
                name: "Old".into(),
                content: LegacyTemplate {
                    headline: "Hello **{{first_name}}**".into(),
                    body: "Line one\n\nLine two".into(),
                    cta_text: "Book".into(),
                    cta_url: "https://cal.test/{{first_name}}".into(),
                    brand_color: "#ff0000".into(),
                    ..Default::default()
                },
            },
        };
        let html = render_personalized(&page, "https://x.test", None);
        assert!(html.contains("<title>Hello Ann</title>"));
        assert!(html.contains("Hello <strong>Ann</strong>"));
        assert!(html.contains("<p>Line one</p><p>Line two</p>"));
        assert!(html.contains("href=\"https://cal.test/Ann\""));
        assert!(html.contains("background:#ff0000"));
        assert!(!html.contains("<iframe"));
    }

    #[test]
    fn legacy_without_cta_hides_button() {
        let sections = LegacyTemplate::default().to_sections();
        let cta = sections.last().unwrap();
        assert_matches!(&cta.content, SectionContent::Cta(c) if c.hide_button);
    }

    #[tokio::test]
    async fn outcomes_by_resolution() {
        let resolver = FakeResolver {
            pages: HashMap::from([("tok123".to_string(), builder_page())]),
            broken: false,
        };
        let found = deliver(&resolver, "tok123", "https://x.test").await;
        assert_matches!(found, DeliveryOutcome::Rendered { contact_id: 9, .. });

        let missing = deliver(&resolver, "nope", "https://x.test").await;
        assert_eq!(missing, DeliveryOutcome::NotFound);
        assert!(missing.into_html().contains("Page not found"));

        let broken = FakeResolver {
            pages: HashMap::new(),
            broken: true,
        };
        let outcome = deliver(&broken, "tok123", "https://x.test").await;
        assert_eq!(outcome, DeliveryOutcome::Unavailable);
        assert!(outcome.into_html().contains("Temporarily unavailable"));
    }
}
