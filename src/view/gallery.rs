//! Gallery view
//!
//! Lists every named project as a thumbnail card. With a `tag` parameter only
//! projects carrying that tag are listed.

use async_trait::async_trait;
use std::sync::Arc;

use super::{project_href, tag_href, Element, RouteParams, View, ViewResult};
use crate::projects::{Project, ProjectService};

pub struct GalleryView {
    projects: Arc<ProjectService>,
}

impl GalleryView {
    pub fn new(projects: Arc<ProjectService>) -> Self {
        Self { projects }
    }

    async fn tag_nav(&self, active: Option<&str>) -> Element {
        let mut nav = Element::new("nav").class("tags").child(
            Element::new("a")
                .attr("href", "/projects")
                .class(if active.is_none() { "tag active" } else { "tag" })
                .text("All"),
        );

        for tag in self.projects.get_project_tags().await {
            let class = if active == Some(tag.as_str()) {
                "tag active"
            } else {
                "tag"
            };
            nav.push(
                Element::new("a")
                    .attr("href", tag_href(&tag))
                    .class(class)
                    .text(tag),
            );
        }

        nav
    }
}

fn card(project: &Project, name: &str) -> Element {
    let mut link = Element::new("a").attr("href", project_href(name));

    if let Some(cover) = project.cover() {
        link.push(
            Element::new("img")
                .attr("src", cover.url.as_str())
                .attr("alt", cover.title.as_str())
                .attr("loading", "lazy"),
        );
    }
    link.push(Element::new("span").class("name").text(name));

    Element::new("li").class("card").child(link)
}

#[async_trait]
impl View for GalleryView {
    fn id(&self) -> &str {
        "gallery"
    }

    fn title(&self, params: &RouteParams) -> String {
        match params.get("tag") {
            Some(tag) => format!("Projects: {}", tag),
            None => "Projects".to_string(),
        }
    }

    async fn show(&self, params: &RouteParams, container: &mut Element) -> ViewResult<()> {
        let tag = params.get("tag");

        let projects = match tag {
            Some(tag) => self.projects.get_projects_by_tag(tag).await,
            None => self.projects.projects().await.as_ref().clone(),
        };

        let mut section = Element::new("section")
            .class("gallery")
            .child(self.tag_nav(tag).await);

        let mut grid = Element::new("ul").class("grid");
        for project in &projects {
            if let Some(name) = project.name.as_deref() {
                grid.push(card(project, name));
            }
        }

        if grid.is_empty() {
            let message = match tag {
                Some(tag) => format!("No projects tagged \u{201c}{}\u{201d}.", tag),
                None => "No projects yet.".to_string(),
            };
            section.push(Element::new("p").class("empty").text(message));
        } else {
            section.push(grid);
        }

        tracing::debug!(tag = ?tag, shown = projects.len(), "Gallery shown");
        container.push(section);
        Ok(())
    }
}
