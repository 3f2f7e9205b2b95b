use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

/// A heading found in the document, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub tag: String,
    pub text: String,
}

/// Landing-page overview of a fetched document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub title: Option<String>,
    pub description: Option<String>,
    pub lang: Option<String>,
    /// Canonical URL, resolved against the page URL.
    pub canonical: Option<String>,
    pub headings: Vec<Heading>,
    pub internal_links: usize,
    pub external_links: usize,
    pub images: usize,
}

impl PageSummary {
    /// Summarise `html`. `base_url` resolves relative links and decides
    /// which links are internal (same host).
    pub fn from_html(html: &str, base_url: Option<&str>) -> Self {
        let doc = Html::parse_document(html);
        let base = base_url.and_then(|u| Url::parse(u).ok());

        let title = first_text(&doc, "title");
        let description = meta_content(&doc, "description");
        let lang = select_first(&doc, "html")
            .and_then(|el| el.value().attr("lang"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let canonical = select_first(&doc, r#"link[rel~="canonical"]"#)
            .and_then(|el| el.value().attr("href"))
            .map(|href| absolutise(base.as_ref(), href));

        let headings = selector("h1, h2, h3, h4, h5, h6")
            .map(|sel| {
                doc.select(&sel)
                    .map(|el| Heading {
                        tag: el.value().name().to_string(),
                        text: collapse_text(el),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let (mut internal_links, mut external_links) = (0, 0);
        if let Some(sel) = selector("a[href]") {
            for href in doc.select(&sel).filter_map(|el| el.value().attr("href")) {
                if is_internal(base.as_ref(), href) {
                    internal_links += 1;
                } else {
                    external_links += 1;
                }
            }
        }

        let images = selector("img").map_or(0, |sel| doc.select(&sel).count());

        Self {
            title,
            description,
            lang,
            canonical,
            headings,
            internal_links,
            external_links,
            images,
        }
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    doc.select(&sel).next()
}

fn first_text(doc: &Html, css: &str) -> Option<String> {
    select_first(doc, css)
        .map(collapse_text)
        .filter(|s| !s.is_empty())
}

fn meta_content(doc: &Html, name: &str) -> Option<String> {
    let sel = selector("meta")?;
    doc.select(&sel)
        .find(|el| {
            let v = el.value();
            v.attr("name")
                .or_else(|| v.attr("property"))
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
        })
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Element text with whitespace runs collapsed to single spaces.
fn collapse_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn absolutise(base: Option<&Url>, href: &str) -> String {
    base.and_then(|b| b.join(href).ok())
        .map(String::from)
        .unwrap_or_else(|| href.to_string())
}

fn is_internal(base: Option<&Url>, href: &str) -> bool {
    let Some(base) = base else {
        return true;
    };
    match base.join(href) {
        Ok(target) => target.host_str() == base.host_str(),
        Err(_) => false,
    }
}
