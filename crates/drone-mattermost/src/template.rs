use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::helpers;

/// Handlebars registry with the plugin helpers installed.
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(helpers::escape_html);
        helpers::register(&mut registry);
        Self { registry }
    }

    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        self.registry
            .render_template(template, data)
            .map_err(Error::TemplateRender)
    }
}
