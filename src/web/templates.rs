//! Template engine
//!
//! Tera rendering with all templates embedded in the binary, so deployment
//! stays a single file and tests need no template directory on disk.

use anyhow::{Context, Result};
use tera::{Context as TeraContext, Tera};

/// Template engine wrapper
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Create the engine with the embedded template set
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", include_str!("../../templates/base.html")),
            (
                "list_of_news.html",
                include_str!("../../templates/list_of_news.html"),
            ),
            ("single.html", include_str!("../../templates/single.html")),
            (
                "add_news.html",
                include_str!("../../templates/add_news.html"),
            ),
            (
                "register.html",
                include_str!("../../templates/register.html"),
            ),
            ("login.html", include_str!("../../templates/login.html")),
            ("contact.html", include_str!("../../templates/contact.html")),
            (
                "not_found.html",
                include_str!("../../templates/not_found.html"),
            ),
        ])
        .context("Failed to load embedded templates")?;

        Ok(Self { tera })
    }

    /// Render a template with the given context
    pub fn render(&self, name: &str, context: &TeraContext) -> Result<String> {
        self.tera
            .render(name, context)
            .with_context(|| format!("Failed to render template: {}", name))
    }
}
