//! Defaults table: the content and style a freshly added section starts with.
//!
//! Both functions are total over [`SectionType`] so every type renders
//! sensibly with zero user input.

use super::content::*;
use super::{SectionContent, SectionStyle, SectionType};

/// Primary brand color used for buttons and accents.
pub const BRAND_COLOR: &str = "#6366f1";

const DARK_BG: &str = "#111827";
const LIGHT_BG: &str = "#ffffff";
const MUTED_BG: &str = "#f9fafb";
const DARK_TEXT: &str = "#111827";
const LIGHT_TEXT: &str = "#ffffff";

fn s(text: &str) -> String {
    text.to_string()
}

fn feature(icon: &str, title: &str, description: &str) -> FeatureItem {
    FeatureItem {
        icon: s(icon),
        title: s(title),
        description: s(description),
    }
}

fn default_fields() -> Vec<FormField> {
    vec![
        FormField {
            name: s("name"),
            label: s("Name"),
            field_type: s("text"),
            placeholder: s("Your name"),
            required: true,
        },
        FormField {
            name: s("email"),
            label: s("Email"),
            field_type: s("email"),
            placeholder: s("you@company.com"),
            required: true,
        },
    ]
}

/// Default content for a new section of `ty`.
pub fn default_content(ty: SectionType) -> SectionContent {
    match ty {
        SectionType::Headline => SectionContent::Headline(HeadlineContent {
            text: s("Hi {{first_name}}, this page was made for you"),
            subtext: String::new(),
        }),
        SectionType::Body => SectionContent::Body(BodyContent {
            text: s("Write a short message for {{company}} here.\n\nUse a blank line to start a new paragraph."),
        }),
        SectionType::Video => SectionContent::Video(VideoContent::default()),
        SectionType::Image => SectionContent::Image(ImageContent {
            alt_text: s("Image"),
            ..Default::default()
        }),
        SectionType::Banner => SectionContent::Banner(BannerContent {
            text: s("Limited time: book a demo this week"),
            button_text: s("Book now"),
            button_url: s("#"),
            hide_button: false,
        }),
        SectionType::Cta => SectionContent::Cta(CtaContent {
            headline: s("Ready to get started, {{first_name}}?"),
            subheadline: s("It only takes a few minutes."),
            button_text: s("Get Started"),
            button_url: s("#"),
            hide_button: false,
            secondary_button_text: s("Learn more"),
            secondary_button_url: s("#"),
            hide_secondary_button: true,
        }),
        SectionType::Form => SectionContent::Form(FormContent {
            headline: s("Get in touch"),
            subheadline: String::new(),
            fields: default_fields(),
            button_text: s("Submit"),
            hide_button: false,
            action_url: String::new(),
        }),
        SectionType::Logo => SectionContent::Logo(LogoContent {
            alt_text: s("Logo"),
            ..Default::default()
        }),
        SectionType::Document => SectionContent::Document(DocumentContent {
            title: s("Download the guide"),
            description: s("A short PDF with everything you need."),
            document_url: String::new(),
            button_text: s("Download"),
            hide_button: false,
        }),
        SectionType::Spacer => SectionContent::Spacer(EmptyContent {}),
        SectionType::Hero => SectionContent::Hero(HeroContent {
            headline: s("Welcome, {{first_name}}"),
            subheadline: s("We put this together especially for {{company}}."),
            button_text: s("Get Started"),
            button_url: s("#"),
            hide_button: false,
            secondary_button_text: s("Learn more"),
            secondary_button_url: s("#"),
            hide_secondary_button: false,
            background_image_url: String::new(),
        }),
        SectionType::HeroVideo => SectionContent::HeroVideo(HeroVideoContent {
            headline: s("A quick video for {{first_name}}"),
            subheadline: s("Two minutes on how we can help {{company}}."),
            video_url: String::new(),
            button_text: s("Book a call"),
            button_url: s("#"),
            hide_button: false,
        }),
        SectionType::HeroImage => SectionContent::HeroImage(HeroImageContent {
            headline: s("Built for teams like {{company}}"),
            subheadline: s("See what changes in your first week."),
            image_url: String::new(),
            image_position: s("right"),
            button_text: s("Get Started"),
            button_url: s("#"),
            hide_button: false,
        }),
        SectionType::HeroForm => SectionContent::HeroForm(HeroFormContent {
            headline: s("Let's talk, {{first_name}}"),
            subheadline: s("Leave your details and we'll reach out."),
            form_headline: s("Request a demo"),
            fields: default_fields(),
            button_text: s("Request demo"),
            hide_button: false,
            action_url: String::new(),
        }),
        SectionType::Features => SectionContent::Features(FeaturesContent {
            headline: s("Why teams choose us"),
            subheadline: String::new(),
            feature_items: vec![
                feature("⚡", "Fast", "Set up in minutes, not weeks."),
                feature("🔒", "Secure", "Your data stays yours."),
                feature("📈", "Scalable", "Grows with your team."),
            ],
        }),
        SectionType::Testimonials => SectionContent::Testimonials(TestimonialsContent {
            headline: s("What our customers say"),
            testimonials: vec![
                Testimonial {
                    quote: s("It changed how we run outreach."),
                    author: s("Alex Morgan"),
                    role: s("Head of Sales"),
                    avatar_url: String::new(),
                },
                Testimonial {
                    quote: s("Our reply rate doubled in a month."),
                    author: s("Sam Lee"),
                    role: s("Founder"),
                    avatar_url: String::new(),
                },
            ],
        }),
        SectionType::Pricing => SectionContent::Pricing(PricingContent {
            headline: s("Simple pricing"),
            subheadline: s("No hidden fees."),
            pricing_items: vec![
                PricingItem {
                    name: s("Starter"),
                    price: s("$19"),
                    period: s("/month"),
                    features: vec![s("100 pages"), s("CSV import")],
                    button_text: s("Choose Starter"),
                    button_url: s("#"),
                    highlighted: false,
                },
                PricingItem {
                    name: s("Pro"),
                    price: s("$49"),
                    period: s("/month"),
                    features: vec![s("Unlimited pages"), s("Google Sheets import"), s("Analytics")],
                    button_text: s("Choose Pro"),
                    button_url: s("#"),
                    highlighted: true,
                },
            ],
        }),
        SectionType::Faq => SectionContent::Faq(FaqContent {
            headline: s("Frequently asked questions"),
            faq_items: vec![
                FaqItem {
                    question: s("How long does setup take?"),
                    answer: s("Most teams are live the same day."),
                },
                FaqItem {
                    question: s("Can I cancel anytime?"),
                    answer: s("Yes, there are no long-term contracts."),
                },
            ],
        }),
        SectionType::Stats => SectionContent::Stats(StatsContent {
            headline: String::new(),
            stats: vec![
                StatItem { value: s("10k+"), label: s("Pages sent") },
                StatItem { value: s("48%"), label: s("Reply rate") },
                StatItem { value: s("3x"), label: s("More meetings") },
            ],
        }),
        SectionType::Team => SectionContent::Team(TeamContent {
            headline: s("Meet the team"),
            members: vec![TeamMember {
                name: s("Jordan Smith"),
                role: s("Account Executive"),
                bio: String::new(),
                image_url: String::new(),
            }],
        }),
        SectionType::LogoCloud => SectionContent::LogoCloud(LogoCloudContent {
            headline: s("Trusted by teams at"),
            logos: Vec::new(),
        }),
        SectionType::Newsletter => SectionContent::Newsletter(NewsletterContent {
            headline: s("Stay in the loop"),
            subheadline: s("One email a month. No spam."),
            placeholder: s("you@company.com"),
            button_text: s("Subscribe"),
            hide_button: false,
            disclaimer: String::new(),
        }),
        SectionType::Comparison => SectionContent::Comparison(ComparisonContent {
            headline: s("How we compare"),
            us_label: s("Us"),
            them_label: s("Others"),
            rows: vec![
                ComparisonRow { feature: s("Personalized pages"), us: s("✓"), them: s("✗") },
                ComparisonRow { feature: s("Bulk CSV import"), us: s("✓"), them: s("✓") },
            ],
        }),
        SectionType::Steps => SectionContent::Steps(StepsContent {
            headline: s("How it works"),
            steps: vec![
                StepItem { title: s("Import"), description: s("Upload your contact list.") },
                StepItem { title: s("Personalize"), description: s("Design one page with variables.") },
                StepItem { title: s("Send"), description: s("Share a unique link with everyone.") },
            ],
        }),
        SectionType::Gallery => SectionContent::Gallery(GalleryContent {
            headline: String::new(),
            images: Vec::new(),
        }),
        SectionType::Footer => SectionContent::Footer(FooterContent {
            company_name: s("Your Company"),
            tagline: String::new(),
            links: Vec::new(),
            copyright: s("© Your Company. All rights reserved."),
        }),
        SectionType::Divider => SectionContent::Divider(EmptyContent {}),
        SectionType::Quote => SectionContent::Quote(QuoteContent {
            quote: s("The best way to predict the future is to create it."),
            author: s("Peter Drucker"),
            role: String::new(),
        }),
        SectionType::Countdown => SectionContent::Countdown(CountdownContent {
            headline: s("Offer ends in"),
            target_date: String::new(),
            expired_message: s("This offer has ended."),
        }),
        SectionType::SocialProof => SectionContent::SocialProof(SocialProofContent {
            headline: String::new(),
            text: s("Join 2,000+ teams already using us"),
            rating: 4.8,
            review_count: s("500+ reviews"),
        }),
        SectionType::Benefits => SectionContent::Benefits(BenefitsContent {
            headline: s("What {{company}} gets"),
            subheadline: String::new(),
            benefits: vec![
                s("Higher reply rates"),
                s("Less manual work"),
                s("Insight into who viewed"),
            ],
            image_url: String::new(),
        }),
        SectionType::Cards => SectionContent::Cards(CardsContent {
            headline: s("Resources"),
            cards: vec![
                CardItem {
                    title: s("Case study"),
                    description: s("How one team booked 3x more meetings."),
                    ..Default::default()
                },
                CardItem {
                    title: s("Playbook"),
                    description: s("Our outreach playbook, step by step."),
                    ..Default::default()
                },
            ],
        }),
        SectionType::QrCode => SectionContent::QrCode(QrCodeContent {
            headline: s("Scan to open on your phone"),
            url: s("{{landing_page}}"),
            caption: String::new(),
        }),
    }
}

/// Default style for a new section of `ty`.
pub fn default_style(ty: SectionType) -> SectionStyle {
    let base = SectionStyle {
        background_color: Some(s(LIGHT_BG)),
        text_color: Some(s(DARK_TEXT)),
        text_align: Some(s("center")),
        padding_y: Some(48),
        padding_x: Some(24),
        max_width: Some(1100),
        ..Default::default()
    };
    let button = |style: SectionStyle| SectionStyle {
        button_color: Some(s(BRAND_COLOR)),
        button_text_color: Some(s(LIGHT_TEXT)),
        ..style
    };
    let dark = |style: SectionStyle| SectionStyle {
        background_color: Some(s(DARK_BG)),
        text_color: Some(s(LIGHT_TEXT)),
        ..style
    };

    match ty {
        SectionType::Headline => SectionStyle {
            font_size: Some(s("4xl")),
            font_weight: Some(s("bold")),
            padding_y: Some(32),
            ..base
        },
        SectionType::Body => SectionStyle {
            font_size: Some(s("lg")),
            text_align: Some(s("left")),
            padding_y: Some(24),
            max_width: Some(720),
            ..base
        },
        SectionType::Video | SectionType::Image | SectionType::Gallery => SectionStyle {
            max_width: Some(960),
            columns: (ty == SectionType::Gallery).then_some(3),
            ..base
        },
        SectionType::Banner => SectionStyle {
            background_color: Some(s(BRAND_COLOR)),
            text_color: Some(s(LIGHT_TEXT)),
            button_color: Some(s(LIGHT_BG)),
            button_text_color: Some(s(BRAND_COLOR)),
            padding_y: Some(16),
            ..base
        },
        SectionType::Cta | SectionType::Newsletter => button(SectionStyle {
            background_color: Some(s(MUTED_BG)),
            padding_y: Some(64),
            max_width: Some(720),
            ..base
        }),
        SectionType::Form | SectionType::Document => button(SectionStyle {
            max_width: Some(560),
            ..base
        }),
        SectionType::Logo => SectionStyle {
            padding_y: Some(24),
            max_width: Some(200),
            ..base
        },
        SectionType::Spacer => SectionStyle {
            background_color: None,
            text_color: None,
            text_align: None,
            padding_y: Some(0),
            padding_x: Some(0),
            height: Some(48),
            ..Default::default()
        },
        SectionType::Divider => SectionStyle {
            accent_color: Some(s("#e5e7eb")),
            padding_y: Some(16),
            ..base
        },
        SectionType::Hero | SectionType::HeroVideo | SectionType::HeroImage | SectionType::HeroForm => {
            button(dark(SectionStyle {
                font_size: Some(s("5xl")),
                font_weight: Some(s("bold")),
                padding_y: Some(96),
                overlay_opacity: Some(0.5),
                text_align: Some(s(if ty == SectionType::Hero { "center" } else { "left" })),
                ..base
            }))
        }
        SectionType::Features | SectionType::Benefits | SectionType::Cards | SectionType::Team => {
            SectionStyle {
                accent_color: Some(s(BRAND_COLOR)),
                columns: Some(3),
                padding_y: Some(64),
                ..base
            }
        }
        SectionType::Testimonials => SectionStyle {
            background_color: Some(s(MUTED_BG)),
            accent_color: Some(s(BRAND_COLOR)),
            columns: Some(2),
            padding_y: Some(64),
            ..base
        },
        SectionType::Pricing => button(SectionStyle {
            accent_color: Some(s(BRAND_COLOR)),
            columns: Some(3),
            padding_y: Some(64),
            ..base
        }),
        SectionType::Faq | SectionType::Comparison => SectionStyle {
            text_align: Some(s("left")),
            accent_color: Some(s(BRAND_COLOR)),
            max_width: Some(800),
            padding_y: Some(64),
            ..base
        },
        SectionType::Stats | SectionType::Steps => SectionStyle {
            accent_color: Some(s(BRAND_COLOR)),
            columns: Some(3),
            ..base
        },
        SectionType::LogoCloud | SectionType::SocialProof => SectionStyle {
            background_color: Some(s(MUTED_BG)),
            accent_color: Some(s("#f59e0b")),
            columns: Some(5),
            padding_y: Some(32),
            ..base
        },
        SectionType::Footer => dark(SectionStyle {
            font_size: Some(s("sm")),
            padding_y: Some(32),
            ..base
        }),
        SectionType::Quote => SectionStyle {
            font_size: Some(s("2xl")),
            font_style: Some(s("italic")),
            accent_color: Some(s(BRAND_COLOR)),
            max_width: Some(800),
            ..base
        },
        SectionType::Countdown => dark(SectionStyle {
            accent_color: Some(s(BRAND_COLOR)),
            ..base
        }),
        SectionType::QrCode => SectionStyle {
            max_width: Some(320),
            ..base
        },
    }
}
