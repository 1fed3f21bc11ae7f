//! Built-in system pages and their starting content.
//!
//! System pages are seeded out-of-band at startup. The legal pages also serve
//! as static fallbacks: a published CMS page with the same slug overrides them.

use super::snapshot::*;

pub struct SystemPageDef {
    pub slug: &'static str,
    pub path: &'static str,
    pub title: &'static str,
    /// Served from the template when no published CMS page exists.
    pub static_fallback: bool,
    pub template: fn() -> PageSnapshot,
}

pub const HOME_SLUG: &str = "home";

pub const SYSTEM_PAGES: &[SystemPageDef] = &[
    SystemPageDef {
        slug: HOME_SLUG,
        path: "/",
        title: "Home",
        static_fallback: true,
        template: home_template,
    },
    SystemPageDef {
        slug: "about",
        path: "/about",
        title: "About Our Practice",
        static_fallback: false,
        template: about_template,
    },
    SystemPageDef {
        slug: "privacy-policy",
        path: "/privacy-policy",
        title: "Privacy Policy",
        static_fallback: true,
        template: privacy_template,
    },
    SystemPageDef {
        slug: "terms-of-service",
        path: "/terms-of-service",
        title: "Terms of Service",
        static_fallback: true,
        template: terms_template,
    },
];

pub fn system_page(slug: &str) -> Option<&'static SystemPageDef> {
    SYSTEM_PAGES.iter().find(|def| def.slug == slug)
}

pub fn is_system_slug(slug: &str) -> bool {
    system_page(slug).is_some()
}

/// Paths that exist regardless of CMS content, for the sitemap.
pub const STATIC_PATHS: &[&str] = &[
    "/",
    "/services",
    "/therapists",
    "/contact",
    "/privacy-policy",
    "/terms-of-service",
];

fn link(label: &str, href: &str) -> Link {
    Link {
        label: label.to_string(),
        href: href.to_string(),
    }
}

fn home_template() -> PageSnapshot {
    let mut snapshot = PageSnapshot::empty("Home");
    snapshot.blocks = vec![
        Block::new(
            "hero",
            BlockBody::Hero(HeroBlock {
                headline: "Compassionate therapy for every season of life".into(),
                subheadline: Some(
                    "Individual, couples and family counseling in person and online.".into(),
                ),
                alignment: Alignment::Center,
                theme: Theme::Brand,
                primary_cta: Some(link("Book a consultation", "/contact")),
                secondary_cta: Some(link("Meet our therapists", "/therapists")),
                image: None,
            }),
        ),
        Block::new(
            "trust",
            BlockBody::TrustBar(TrustBarBlock {
                items: vec![
                    TrustItem {
                        label: "Licensed clinicians".into(),
                        detail: None,
                    },
                    TrustItem {
                        label: "Telehealth available".into(),
                        detail: None,
                    },
                    TrustItem {
                        label: "Evening appointments".into(),
                        detail: None,
                    },
                ],
            }),
        ),
        Block::new(
            "process",
            BlockBody::ProcessSteps(ProcessStepsBlock {
                title: Some("Getting started".into()),
                steps: vec![
                    ProcessStep {
                        title: "Reach out".into(),
                        body: "Call or send a message and we will reply within one business day."
                            .into(),
                    },
                    ProcessStep {
                        title: "Free consultation".into(),
                        body: "A 15 minute call to see whether we are a good fit.".into(),
                    },
                    ProcessStep {
                        title: "First session".into(),
                        body: "Meet your therapist and set goals together.".into(),
                    },
                ],
            }),
        ),
        Block::new(
            "insurance",
            BlockBody::InsuranceStrip(InsuranceStripBlock {
                title: Some("Insurance we accept".into()),
                providers: vec!["Aetna".into(), "Blue Cross Blue Shield".into(), "Cigna".into()],
                note: Some("Out-of-network superbills are available on request.".into()),
            }),
        ),
        Block::new(
            "rates",
            BlockBody::PricingCards(PricingCardsBlock {
                title: Some("Self-pay rates".into()),
                cards: vec![
                    PricingCard {
                        name: "Individual".into(),
                        price: "$150".into(),
                        description: Some("50 minute session".into()),
                        features: vec!["In person or online".into()],
                        cta: None,
                    },
                    PricingCard {
                        name: "Couples".into(),
                        price: "$180".into(),
                        description: Some("75 minute session".into()),
                        features: vec!["In person or online".into()],
                        cta: None,
                    },
                ],
            }),
        ),
        Block::new(
            "testimonials",
            BlockBody::Testimonials(TestimonialsBlock {
                title: Some("What clients say".into()),
                items: vec![Testimonial {
                    quote: "I finally feel heard.".into(),
                    attribution: Some("Former client".into()),
                }],
            }),
        ),
        Block::new(
            "cta",
            BlockBody::CtaBand(CtaBandBlock {
                headline: "Ready to talk?".into(),
                body: None,
                cta: link("Contact us", "/contact"),
                theme: Theme::Dark,
            }),
        ),
    ];
    snapshot
}

fn about_template() -> PageSnapshot {
    let mut snapshot = PageSnapshot::empty("About Our Practice");
    snapshot.nav.show_in_header = true;
    snapshot.nav.nav_label = Some("About".into());
    snapshot.nav.nav_order = 10;
    snapshot.blocks = vec![
        Block::new(
            "hero",
            BlockBody::Hero(HeroBlock {
                headline: "About our practice".into(),
                subheadline: None,
                alignment: Alignment::Left,
                theme: Theme::Light,
                primary_cta: None,
                secondary_cta: None,
                image: None,
            }),
        ),
        Block::new(
            "story",
            BlockBody::ImageText(ImageTextBlock {
                title: Some("Our approach".into()),
                body: "We offer evidence-based care in a warm, judgment-free setting.".into(),
                image: ImageRef {
                    url: "/images/office.jpg".into(),
                    alt: "Our office".into(),
                },
                image_position: ImagePosition::Right,
                cta: None,
            }),
        ),
        Block::new(
            "team",
            BlockBody::TeamGrid(TeamGridBlock {
                title: Some("Our team".into()),
                intro: None,
                limit: None,
            }),
        ),
    ];
    snapshot
}

fn legal_snapshot(title: &str, body: &str) -> PageSnapshot {
    let mut snapshot = PageSnapshot::empty(title);
    snapshot.nav.show_in_footer = true;
    snapshot.blocks = vec![Block::new(
        "body",
        BlockBody::RichText(RichTextBlock {
            title: Some(title.to_string()),
            body: body.to_string(),
        }),
    )];
    snapshot
}

fn privacy_template() -> PageSnapshot {
    legal_snapshot(
        "Privacy Policy",
        "We collect only the information needed to respond to your inquiry and schedule care. \
         Clinical records are handled under HIPAA and are never shared without your consent.",
    )
}

fn terms_template() -> PageSnapshot {
    legal_snapshot(
        "Terms of Service",
        "Content on this website is for general information and is not a substitute for \
         professional care. If you are in crisis, call or text 988.",
    )
}
