//! Page shell
//!
//! Wraps a routed view's `<main>` element in a complete HTML document with the
//! site header and footer.

use chrono::{Datelike, Utc};

use super::{escape_text, Element};

pub const DEFAULT_SITE_TITLE: &str = "Folio";
pub const DEFAULT_STYLESHEET: &str = "/resources/css/folio.css";

/// A full HTML document around one view
#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub site_title: String,
    pub stylesheet: Option<String>,
    pub main: Element,
}

impl Page {
    pub fn new(title: impl Into<String>, main: Element) -> Self {
        Self {
            title: title.into(),
            site_title: DEFAULT_SITE_TITLE.to_string(),
            stylesheet: Some(DEFAULT_STYLESHEET.to_string()),
            main,
        }
    }

    pub fn site_title(mut self, site_title: impl Into<String>) -> Self {
        self.site_title = site_title.into();
        self
    }

    pub fn stylesheet(mut self, href: Option<String>) -> Self {
        self.stylesheet = href;
        self
    }

    /// Text of the `<title>` element
    pub fn full_title(&self) -> String {
        if self.title.is_empty() || self.title == self.site_title {
            self.site_title.clone()
        } else {
            format!("{} | {}", self.title, self.site_title)
        }
    }

    pub fn render(&self) -> String {
        let mut head = Element::new("head")
            .child(Element::new("meta").attr("charset", "utf-8"))
            .child(
                Element::new("meta")
                    .attr("name", "viewport")
                    .attr("content", "width=device-width, initial-scale=1"),
            )
            .child(Element::new("title").text(self.full_title()));
        if let Some(href) = &self.stylesheet {
            head.push(
                Element::new("link")
                    .attr("rel", "stylesheet")
                    .attr("href", href.as_str()),
            );
        }

        let header = Element::new("header").child(
            Element::new("nav")
                .class("site")
                .child(
                    Element::new("a")
                        .class("home")
                        .attr("href", "/")
                        .text(self.site_title.as_str()),
                )
                .child(Element::new("a").attr("href", "/projects").text("Projects")),
        );

        let footer = Element::new("footer").text(format!(
            "\u{a9} {} {}",
            Utc::now().year(),
            self.site_title
        ));

        let html = Element::new("html")
            .attr("lang", "en")
            .child(head)
            .child(
                Element::new("body")
                    .child(header)
                    .child(self.main.clone())
                    .child(footer),
            );

        let mut out = String::from("<!DOCTYPE html>\n");
        html.render_into(&mut out);
        out.push('\n');
        out
    }
}

/// Wrap a pre-rendered body fragment in a minimal document
pub fn render_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title></head><body>{}</body></html>\n",
        escape_text(title),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_full_document() {
        let main = Element::new("main").child(Element::new("h1").text("Salt & Sea"));
        let html = Page::new("Salt", main).site_title("Studio Sol").render();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Salt | Studio Sol</title>"));
        assert!(html.contains("<h1>Salt &amp; Sea</h1>"));
        assert!(html.contains(DEFAULT_STYLESHEET));
        assert!(html.contains(&Utc::now().year().to_string()));
    }

    #[test]
    fn test_title_not_repeated() {
        let page = Page::new("Folio", Element::new("main"));
        assert_eq!(page.full_title(), "Folio");

        let html = page.stylesheet(None).render();
        assert!(!html.contains("stylesheet"));
    }

    #[test]
    fn test_render_page_escapes_title() {
        let html = render_page("<b>", "<p>ok</p>");
        assert!(html.contains("<title>&lt;b&gt;</title>"));
        assert!(html.contains("<body><p>ok</p></body>"));
    }
}
