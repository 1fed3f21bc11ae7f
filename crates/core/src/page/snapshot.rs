//! Snapshot content types: the payload a page carries for its draft and its
//! published state.
//!
//! Blocks serialize as `{"id", "type", "visible", "data"}` where `type` is the
//! snake_case variant name of [`BlockBody`]. Everything else is camelCase.

use serde::{Deserialize, Serialize};

/// A complete content payload for one page state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub seo: SeoFields,
    #[serde(default)]
    pub nav: NavFields,
}

impl PageSnapshot {
    /// A snapshot with no blocks and default SEO and nav settings.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
            seo: SeoFields::default(),
            nav: NavFields::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeoFields {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    /// Site-relative path, always starting with `/`.
    pub canonical_path: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub no_index: bool,
    pub no_follow: bool,
    /// Free-form JSON-LD, a JSON object or array encoded as a string.
    pub schema_json: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavFields {
    pub show_in_header: bool,
    pub show_in_footer: bool,
    pub nav_label: Option<String>,
    pub nav_order: i32,
}

/// One content unit in a snapshot. List order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(flatten)]
    pub body: BlockBody,
}

fn default_visible() -> bool {
    true
}

impl Block {
    pub fn new(id: impl Into<String>, body: BlockBody) -> Self {
        Self {
            id: id.into(),
            visible: true,
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum BlockBody {
    Hero(HeroBlock),
    RichText(RichTextBlock),
    ImageText(ImageTextBlock),
    Faq(FaqBlock),
    CtaBand(CtaBandBlock),
    CmsLinks(CmsLinksBlock),
    ImageCarousel(ImageCarouselBlock),
    TrustBar(TrustBarBlock),
    ProcessSteps(ProcessStepsBlock),
    InsuranceStrip(InsuranceStripBlock),
    Testimonials(TestimonialsBlock),
    PricingCards(PricingCardsBlock),
    VideoEmbed(VideoEmbedBlock),
    TeamGrid(TeamGridBlock),
}

impl BlockBody {
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockBody::Hero(_) => "hero",
            BlockBody::RichText(_) => "rich_text",
            BlockBody::ImageText(_) => "image_text",
            BlockBody::Faq(_) => "faq",
            BlockBody::CtaBand(_) => "cta_band",
            BlockBody::CmsLinks(_) => "cms_links",
            BlockBody::ImageCarousel(_) => "image_carousel",
            BlockBody::TrustBar(_) => "trust_bar",
            BlockBody::ProcessSteps(_) => "process_steps",
            BlockBody::InsuranceStrip(_) => "insurance_strip",
            BlockBody::Testimonials(_) => "testimonials",
            BlockBody::PricingCards(_) => "pricing_cards",
            BlockBody::VideoEmbed(_) => "video_embed",
            BlockBody::TeamGrid(_) => "team_grid",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Brand,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroBlock {
    pub headline: String,
    pub subheadline: Option<String>,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub theme: Theme,
    pub primary_cta: Option<Link>,
    pub secondary_cta: Option<Link>,
    pub image: Option<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextBlock {
    pub title: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageTextBlock {
    pub title: Option<String>,
    pub body: String,
    pub image: ImageRef,
    #[serde(default)]
    pub image_position: ImagePosition,
    pub cta: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqBlock {
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<FaqItem>,
    /// Emit an FAQPage JSON-LD object for this block.
    #[serde(default)]
    pub emit_schema: bool,
}

impl FaqBlock {
    /// Items with both a question and an answer. Incomplete items are kept in
    /// the draft but never rendered.
    pub fn valid_items(&self) -> impl Iterator<Item = &FaqItem> {
        self.items.iter().filter(|item| item.is_complete())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl FaqItem {
    pub fn is_complete(&self) -> bool {
        !self.question.trim().is_empty() && !self.answer.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtaBandBlock {
    pub headline: String,
    pub body: Option<String>,
    pub cta: Link,
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmsLinksBlock {
    pub title: Option<String>,
    #[serde(default)]
    pub links: Vec<CmsLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmsLink {
    pub label: String,
    pub href: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCarouselBlock {
    pub title: Option<String>,
    #[serde(default)]
    pub images: Vec<CarouselImage>,
    #[serde(default)]
    pub autoplay: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustBarBlock {
    #[serde(default)]
    pub items: Vec<TrustItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustItem {
    pub label: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStepsBlock {
    pub title: Option<String>,
    #[serde(default)]
    pub steps: Vec<ProcessStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStep {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceStripBlock {
    pub title: Option<String>,
    #[serde(default)]
    pub providers: Vec<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestimonialsBlock {
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    pub attribution: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingCardsBlock {
    pub title: Option<String>,
    #[serde(default)]
    pub cards: Vec<PricingCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingCard {
    pub name: String,
    pub price: String,
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub cta: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEmbedBlock {
    pub title: Option<String>,
    pub url: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamGridBlock {
    pub title: Option<String>,
    pub intro: Option<String>,
    /// Maximum number of team members shown; all when unset.
    pub limit: Option<u32>,
}
