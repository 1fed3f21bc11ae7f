//! Snapshot validation.
//!
//! [`parse_snapshot`] walks an untrusted JSON payload field by field and
//! builds the typed [`PageSnapshot`]. The first violation wins and is
//! reported with its JSON path, e.g. `blocks[2].data.primaryCta.href`.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::snapshot::*;
use crate::error::{CmsError, CmsResult, FieldError};

const MAX_TITLE_LEN: usize = 200;
const MAX_META_DESCRIPTION_LEN: usize = 320;
const HREF_PREFIXES: &[&str] = &["/", "http://", "https://", "mailto:", "tel:"];

type FieldResult<T> = Result<T, FieldError>;

/// Shared predicate for every link target a block can carry.
pub fn is_valid_href(href: &str) -> bool {
    let href = href.trim();
    !href.is_empty() && HREF_PREFIXES.iter().any(|prefix| href.starts_with(prefix))
}

/// Validate a raw snapshot payload and convert it into its typed form.
pub fn parse_snapshot(value: &Value) -> CmsResult<PageSnapshot> {
    let root = Obj::root(value)?;
    let snapshot = read_snapshot(&root)?;
    Ok(snapshot)
}

/// Re-check an already typed snapshot, e.g. a stored draft before publishing.
pub fn validate_snapshot(snapshot: &PageSnapshot) -> CmsResult<()> {
    let value = serde_json::to_value(snapshot)
        .map_err(|e| CmsError::Corrupt(format!("snapshot does not serialize: {e}")))?;
    parse_snapshot(&value).map(|_| ())
}

/// Validate a page title as entered by an admin.
pub fn validate_title(title: &str) -> CmsResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CmsError::InvalidTitle("title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CmsError::InvalidTitle(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

fn read_snapshot(root: &Obj<'_>) -> FieldResult<PageSnapshot> {
    let title = root.required_str("title")?;
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(root.error("title", format!("must be at most {MAX_TITLE_LEN} characters")));
    }

    let mut blocks = Vec::new();
    let mut seen_ids = HashSet::new();
    for (index, item) in root.array("blocks")?.iter().enumerate() {
        let block = Obj::new(item, format!("{}[{index}]", root.path_of("blocks")))?;
        let parsed = read_block(&block)?;
        if !seen_ids.insert(parsed.id.clone()) {
            return Err(block.error("id", format!("duplicate block id {:?}", parsed.id)));
        }
        blocks.push(parsed);
    }

    let seo = match root.optional_object("seo")? {
        Some(seo) => read_seo(&seo)?,
        None => SeoFields::default(),
    };
    let nav = match root.optional_object("nav")? {
        Some(nav) => read_nav(&nav)?,
        None => NavFields::default(),
    };

    Ok(PageSnapshot {
        title,
        blocks,
        seo,
        nav,
    })
}

fn read_seo(seo: &Obj<'_>) -> FieldResult<SeoFields> {
    let canonical_path = seo.optional_str("canonicalPath")?;
    if let Some(path) = &canonical_path {
        if !path.starts_with('/') {
            return Err(seo.error("canonicalPath", "must start with '/'"));
        }
    }

    let meta_description = seo.optional_str("metaDescription")?;
    if let Some(description) = &meta_description {
        if description.chars().count() > MAX_META_DESCRIPTION_LEN {
            return Err(seo.error(
                "metaDescription",
                format!("must be at most {MAX_META_DESCRIPTION_LEN} characters"),
            ));
        }
    }

    let schema_json = seo.optional_str("schemaJson")?;
    if let Some(raw) = &schema_json {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(_)) | Ok(Value::Array(_)) => {}
            Ok(_) => return Err(seo.error("schemaJson", "must be a JSON object or array")),
            Err(e) => return Err(seo.error("schemaJson", format!("is not valid JSON: {e}"))),
        }
    }

    Ok(SeoFields {
        meta_title: seo.optional_str("metaTitle")?,
        meta_description,
        canonical_path,
        og_title: seo.optional_str("ogTitle")?,
        og_description: seo.optional_str("ogDescription")?,
        og_image: seo.optional_href("ogImage")?,
        no_index: seo.bool_or("noIndex", false)?,
        no_follow: seo.bool_or("noFollow", false)?,
        schema_json,
    })
}

fn read_nav(nav: &Obj<'_>) -> FieldResult<NavFields> {
    Ok(NavFields {
        show_in_header: nav.bool_or("showInHeader", false)?,
        show_in_footer: nav.bool_or("showInFooter", false)?,
        nav_label: nav.optional_str("navLabel")?,
        nav_order: nav.i32_or("navOrder", 0)?,
    })
}

fn read_block(block: &Obj<'_>) -> FieldResult<Block> {
    let id = block.required_str("id")?;
    let visible = block.bool_or("visible", true)?;
    let block_type = block.required_str("type")?;
    let data = block.object("data")?;

    let body = match block_type.as_str() {
        "hero" => BlockBody::Hero(read_hero(&data)?),
        "rich_text" => BlockBody::RichText(RichTextBlock {
            title: data.optional_str("title")?,
            body: data.required_str("body")?,
        }),
        "image_text" => BlockBody::ImageText(ImageTextBlock {
            title: data.optional_str("title")?,
            body: data.required_str("body")?,
            image: read_image(&data.object("image")?)?,
            image_position: match data.one_of("imagePosition", &["left", "right"])? {
                Some("right") => ImagePosition::Right,
                _ => ImagePosition::Left,
            },
            cta: data.optional_link("cta")?,
        }),
        "faq" => BlockBody::Faq(read_faq(&data)?),
        "cta_band" => BlockBody::CtaBand(CtaBandBlock {
            headline: data.required_str("headline")?,
            body: data.optional_str("body")?,
            cta: read_link(&data.object("cta")?)?,
            theme: read_theme(&data)?,
        }),
        "cms_links" => BlockBody::CmsLinks(CmsLinksBlock {
            title: data.optional_str("title")?,
            links: data.each("links", |link| {
                Ok(CmsLink {
                    label: link.required_str("label")?,
                    href: link.required_href("href")?,
                    description: link.optional_str("description")?,
                })
            })?,
        }),
        "image_carousel" => BlockBody::ImageCarousel(ImageCarouselBlock {
            title: data.optional_str("title")?,
            images: data.each("images", |image| {
                Ok(CarouselImage {
                    url: image.required_href("url")?,
                    alt: image.optional_str("alt")?.unwrap_or_default(),
                    caption: image.optional_str("caption")?,
                })
            })?,
            autoplay: data.bool_or("autoplay", false)?,
        }),
        "trust_bar" => BlockBody::TrustBar(TrustBarBlock {
            items: data.each("items", |item| {
                Ok(TrustItem {
                    label: item.required_str("label")?,
                    detail: item.optional_str("detail")?,
                })
            })?,
        }),
        "process_steps" => BlockBody::ProcessSteps(ProcessStepsBlock {
            title: data.optional_str("title")?,
            steps: data.each("steps", |step| {
                Ok(ProcessStep {
                    title: step.required_str("title")?,
                    body: step.required_str("body")?,
                })
            })?,
        }),
        "insurance_strip" => BlockBody::InsuranceStrip(InsuranceStripBlock {
            title: data.optional_str("title")?,
            providers: data.string_list("providers")?,
            note: data.optional_str("note")?,
        }),
        "testimonials" => BlockBody::Testimonials(TestimonialsBlock {
            title: data.optional_str("title")?,
            items: data.each("items", |item| {
                Ok(Testimonial {
                    quote: item.required_str("quote")?,
                    attribution: item.optional_str("attribution")?,
                })
            })?,
        }),
        "pricing_cards" => BlockBody::PricingCards(PricingCardsBlock {
            title: data.optional_str("title")?,
            cards: data.each("cards", |card| {
                Ok(PricingCard {
                    name: card.required_str("name")?,
                    price: card.required_str("price")?,
                    description: card.optional_str("description")?,
                    features: card.string_list("features")?,
                    cta: card.optional_link("cta")?,
                })
            })?,
        }),
        "video_embed" => {
            let url = data.required_href("url")?;
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(data.error("url", "must be an absolute http(s) URL"));
            }
            BlockBody::VideoEmbed(VideoEmbedBlock {
                title: data.optional_str("title")?,
                url,
                caption: data.optional_str("caption")?,
            })
        }
        "team_grid" => BlockBody::TeamGrid(TeamGridBlock {
            title: data.optional_str("title")?,
            intro: data.optional_str("intro")?,
            limit: data.optional_u32("limit")?,
        }),
        other => return Err(block.error("type", format!("unknown block type {other:?}"))),
    };

    Ok(Block { id, visible, body })
}

fn read_hero(data: &Obj<'_>) -> FieldResult<HeroBlock> {
    Ok(HeroBlock {
        headline: data.required_str("headline")?,
        subheadline: data.optional_str("subheadline")?,
        alignment: match data.one_of("alignment", &["left", "center"])? {
            Some("left") => Alignment::Left,
            _ => Alignment::Center,
        },
        theme: read_theme(data)?,
        primary_cta: data.optional_link("primaryCta")?,
        secondary_cta: data.optional_link("secondaryCta")?,
        image: match data.optional_object("image")? {
            Some(image) => Some(read_image(&image)?),
            None => None,
        },
    })
}

fn read_faq(data: &Obj<'_>) -> FieldResult<FaqBlock> {
    Ok(FaqBlock {
        title: data.optional_str("title")?,
        items: data.each("items", |item| {
            Ok(FaqItem {
                question: item.str_or_empty("question")?,
                answer: item.str_or_empty("answer")?,
            })
        })?,
        emit_schema: data.bool_or("emitSchema", false)?,
    })
}

fn read_theme(data: &Obj<'_>) -> FieldResult<Theme> {
    Ok(match data.one_of("theme", &["light", "dark", "brand"])? {
        Some("dark") => Theme::Dark,
        Some("brand") => Theme::Brand,
        _ => Theme::Light,
    })
}

fn read_link(link: &Obj<'_>) -> FieldResult<Link> {
    Ok(Link {
        label: link.required_str("label")?,
        href: link.required_href("href")?,
    })
}

fn read_image(image: &Obj<'_>) -> FieldResult<ImageRef> {
    Ok(ImageRef {
        url: image.required_href("url")?,
        alt: image.optional_str("alt")?.unwrap_or_default(),
    })
}

/// A JSON object together with its location in the payload.
struct Obj<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> Obj<'a> {
    fn root(value: &'a Value) -> FieldResult<Self> {
        Self::new(value, String::new())
    }

    fn new(value: &'a Value, path: String) -> FieldResult<Self> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            _ => {
                let at = if path.is_empty() { "$".to_string() } else { path };
                Err(FieldError::new(at, "must be an object"))
            }
        }
    }

    fn path_of(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn error(&self, key: &str, message: impl Into<String>) -> FieldError {
        FieldError::new(self.path_of(key), message)
    }

    /// The value at `key`, treating explicit `null` as absent.
    fn get(&self, key: &str) -> Option<&'a Value> {
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn str_or_empty(&self, key: &str) -> FieldResult<String> {
        match self.get(key) {
            None => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.trim().to_string()),
            Some(_) => Err(self.error(key, "must be a string")),
        }
    }

    fn optional_str(&self, key: &str) -> FieldResult<Option<String>> {
        let s = self.str_or_empty(key)?;
        Ok(if s.is_empty() { None } else { Some(s) })
    }

    fn required_str(&self, key: &str) -> FieldResult<String> {
        self.optional_str(key)?
            .ok_or_else(|| self.error(key, "is required"))
    }

    fn required_href(&self, key: &str) -> FieldResult<String> {
        let href = self.required_str(key)?;
        if !is_valid_href(&href) {
            return Err(self.error(
                key,
                "must start with '/', 'http://', 'https://', 'mailto:' or 'tel:'",
            ));
        }
        Ok(href)
    }

    fn optional_href(&self, key: &str) -> FieldResult<Option<String>> {
        match self.optional_str(key)? {
            Some(_) => self.required_href(key).map(Some),
            None => Ok(None),
        }
    }

    fn bool_or(&self, key: &str, default: bool) -> FieldResult<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(self.error(key, "must be a boolean")),
        }
    }

    fn i32_or(&self, key: &str, default: i32) -> FieldResult<i32> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| self.error(key, "must be an integer")),
        }
    }

    fn optional_u32(&self, key: &str) -> FieldResult<Option<u32>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.error(key, "must be a non-negative integer")),
        }
    }

    /// Validate an enumerated string field. Missing means "use the default".
    fn one_of(&self, key: &str, allowed: &[&'static str]) -> FieldResult<Option<&'static str>> {
        match self.optional_str(key)? {
            None => Ok(None),
            Some(value) => allowed
                .iter()
                .find(|candidate| **candidate == value)
                .copied()
                .map(Some)
                .ok_or_else(|| self.error(key, format!("must be one of {}", allowed.join(", ")))),
        }
    }

    fn object(&self, key: &str) -> FieldResult<Obj<'a>> {
        match self.map.get(key) {
            None | Some(Value::Null) => Err(self.error(key, "is required")),
            Some(value) => Obj::new(value, self.path_of(key)),
        }
    }

    fn optional_object(&self, key: &str) -> FieldResult<Option<Obj<'a>>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => Obj::new(value, self.path_of(key)).map(Some),
        }
    }

    fn optional_link(&self, key: &str) -> FieldResult<Option<Link>> {
        match self.optional_object(key)? {
            Some(link) => read_link(&link).map(Some),
            None => Ok(None),
        }
    }

    fn array(&self, key: &str) -> FieldResult<&'a [Value]> {
        match self.get(key) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(self.error(key, "must be an array")),
        }
    }

    fn each<T>(
        &self,
        key: &str,
        mut read: impl FnMut(&Obj<'a>) -> FieldResult<T>,
    ) -> FieldResult<Vec<T>> {
        let base = self.path_of(key);
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let obj = Obj::new(item, format!("{base}[{index}]"))?;
                read(&obj)
            })
            .collect()
    }

    fn string_list(&self, key: &str) -> FieldResult<Vec<String>> {
        let base = self.path_of(key);
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(index, item)| match item.as_str().map(str::trim) {
                Some(s) if !s.is_empty() => Ok(s.to_string()),
                Some(_) => Err(FieldError::new(format!("{base}[{index}]"), "must not be empty")),
                None => Err(FieldError::new(format!("{base}[{index}]"), "must be a string")),
            })
            .collect()
    }
}
