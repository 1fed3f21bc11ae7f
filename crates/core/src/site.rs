//! Crawler-facing documents: `sitemap.xml` and `robots.txt`.

use std::collections::HashSet;
use std::fmt::Write;

use crate::page::render::build_site_url;
use crate::page::Page;

/// Build a sitemap from fixed site paths plus every published, indexable page.
/// The first occurrence of a path wins.
pub fn build_sitemap(base: Option<&str>, static_paths: &[&str], pages: &[Page]) -> String {
    let mut seen = HashSet::new();
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for path in static_paths {
        if seen.insert(path.to_string()) {
            push_url(&mut xml, &build_site_url(base, path), None);
        }
    }

    for page in pages.iter().filter(|p| p.is_published()) {
        let indexable = page
            .published
            .as_ref()
            .map_or(false, |snapshot| !snapshot.seo.no_index);
        if !indexable || !seen.insert(page.path.clone()) {
            continue;
        }
        let modified = page.published_at.unwrap_or(page.updated_at);
        push_url(
            &mut xml,
            &build_site_url(base, &page.path),
            Some(modified.format("%Y-%m-%d").to_string()),
        );
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<String>) {
    xml.push_str("  <url>\n");
    let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(loc));
    if let Some(lastmod) = lastmod {
        let _ = writeln!(xml, "    <lastmod>{lastmod}</lastmod>");
    }
    xml.push_str("  </url>\n");
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn build_robots_txt(base: Option<&str>) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\nDisallow: /api\n\nSitemap: {}\n",
        build_site_url(base, "/sitemap.xml")
    )
}
