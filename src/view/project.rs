//! Project view
//!
//! Shows one project: its tags, the current image and a pager. The image is
//! selected with the `image` query parameter (zero-based, clamped to the last
//! image). Pager links carry `accesskey` hints from the keyboard bindings.

use async_trait::async_trait;
use std::sync::Arc;

use super::{project_href, tag_href, Element, RouteParams, View, ViewError, ViewResult};
use crate::keyboard::{KeyCommand, Keyboard};
use crate::projects::ProjectService;

pub struct ProjectView {
    projects: Arc<ProjectService>,
    keyboard: Arc<Keyboard>,
}

impl ProjectView {
    pub fn new(projects: Arc<ProjectService>, keyboard: Arc<Keyboard>) -> Self {
        Self { projects, keyboard }
    }

    async fn nav_link(
        &self,
        href: String,
        label: &str,
        class: &str,
        command: KeyCommand,
    ) -> Element {
        let mut link = Element::new("a")
            .attr("href", href)
            .class(class)
            .attr("data-command", command.to_string())
            .text(label);
        if let Some(key) = self.keyboard.access_key(command).await {
            link.set_attr("accesskey", key.to_string());
        }
        link
    }
}

#[async_trait]
impl View for ProjectView {
    fn id(&self) -> &str {
        "project"
    }

    fn title(&self, params: &RouteParams) -> String {
        params.get("name").unwrap_or("Project").to_string()
    }

    async fn show(&self, params: &RouteParams, container: &mut Element) -> ViewResult<()> {
        let name = params
            .get("name")
            .ok_or_else(|| ViewError::NotFound("project".to_string()))?;

        let project = self
            .projects
            .get_project(name)
            .await
            .ok_or_else(|| ViewError::NotFound(format!("project '{}'", name)))?;

        let base = project_href(name);
        let mut article = Element::new("article")
            .class("project")
            .child(Element::new("h1").text(name));

        if !project.tags.is_empty() {
            let mut tags = Element::new("ul").class("tags");
            for tag in &project.tags {
                tags.push(
                    Element::new("li")
                        .child(Element::new("a").attr("href", tag_href(tag)).text(tag.as_str())),
                );
            }
            article.push(tags);
        }

        if project.images.is_empty() {
            article.push(Element::new("p").class("empty").text("No images yet."));
        } else {
            let last = project.images.len() - 1;
            let index = params
                .query("image")
                .and_then(|i| i.parse::<usize>().ok())
                .unwrap_or(0)
                .min(last);
            let image = &project.images[index];

            article.push(
                Element::new("figure")
                    .child(
                        Element::new("img")
                            .attr("src", image.url.as_str())
                            .attr("alt", image.title.as_str()),
                    )
                    .child(Element::new("figcaption").text(image.title.as_str())),
            );

            let mut pager = Element::new("nav").class("pager");
            if index > 0 {
                pager.push(
                    self.nav_link(
                        format!("{}?image={}", base, index - 1),
                        "Previous",
                        "prev",
                        KeyCommand::PreviousImage,
                    )
                    .await,
                );
            }
            pager.push(
                Element::new("span")
                    .class("position")
                    .text(format!("{} / {}", index + 1, last + 1)),
            );
            if index < last {
                pager.push(
                    self.nav_link(
                        format!("{}?image={}", base, index + 1),
                        "Next",
                        "next",
                        KeyCommand::NextImage,
                    )
                    .await,
                );
            }
            article.push(pager);
        }

        article.push(
            self.nav_link("/projects".to_string(), "All projects", "close", KeyCommand::Close)
                .await,
        );

        tracing::debug!(project = %name, images = project.images.len(), "Project shown");
        container.push(article);
        Ok(())
    }
}
