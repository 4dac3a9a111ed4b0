//! Not-found view

use async_trait::async_trait;

use super::{Element, RouteParams, View, ViewResult};

/// Shown for unknown paths; reads the missing path from the `path` parameter
pub struct NotFoundView;

#[async_trait]
impl View for NotFoundView {
    fn id(&self) -> &str {
        "not_found"
    }

    fn title(&self, _params: &RouteParams) -> String {
        "Not found".to_string()
    }

    async fn show(&self, params: &RouteParams, container: &mut Element) -> ViewResult<()> {
        let mut section = Element::new("section")
            .class("not-found")
            .child(Element::new("h1").text("Not found"));

        if let Some(path) = params.get("path") {
            section.push(
                Element::new("p")
                    .text("Nothing lives at ")
                    .child(Element::new("code").text(path))
                    .text("."),
            );
        }

        section.push(Element::new("a").attr("href", "/").text("Back home"));
        container.push(section);
        Ok(())
    }
}
