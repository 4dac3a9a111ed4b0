//! About view
//!
//! Reads the `about` section of the configuration:
//!
//! ```json
//! { "about": { "name": "...", "bio": "...", "links": [{"label": "...", "url": "..."}] } }
//! ```
//!
//! Blank lines in `bio` separate paragraphs.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use super::{Element, RouteParams, View, ViewResult};
use crate::config::ConfigStore;

#[derive(Debug, Default, Deserialize)]
struct AboutSection {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    bio: String,
    #[serde(default)]
    links: Vec<AboutLink>,
}

#[derive(Debug, Deserialize)]
struct AboutLink {
    label: String,
    url: String,
}

pub struct AboutView {
    config: Arc<ConfigStore>,
}

impl AboutView {
    pub fn new(config: Arc<ConfigStore>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl View for AboutView {
    fn id(&self) -> &str {
        "about"
    }

    async fn show(&self, _params: &RouteParams, container: &mut Element) -> ViewResult<()> {
        let about: AboutSection = self.config.get_as("about")?.unwrap_or_default();

        let name = match about.name {
            Some(name) => name,
            None => self
                .config
                .get_str("site.title")?
                .unwrap_or_else(|| "About".to_string()),
        };

        let mut section = Element::new("section")
            .class("about")
            .child(Element::new("h1").text(name));

        for paragraph in about
            .bio
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            section.push(Element::new("p").text(paragraph));
        }

        if !about.links.is_empty() {
            let mut list = Element::new("ul").class("links");
            for link in about.links {
                list.push(
                    Element::new("li").child(
                        Element::new("a")
                            .attr("href", link.url)
                            .attr("rel", "me")
                            .text(link.label),
                    ),
                );
            }
            section.push(list);
        }

        section.push(
            Element::new("a")
                .class("enter")
                .attr("href", "/projects")
                .text("View projects"),
        );

        container.push(section);
        Ok(())
    }
}
