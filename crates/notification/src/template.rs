//! HTML rendering of notification bodies.

use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment, ErrorKind};
use serde::Serialize;
use snafu::ResultExt;

use crate::{error, Error, Result};

/// Renders templates from a fixed directory with HTML auto-escaping.
///
/// Escaping is applied to every template regardless of its file extension;
/// table cells come from upstream producers and must never be interpreted as
/// markup.
#[derive(Clone, Debug)]
pub struct Renderer {
    template_dir: PathBuf,
}

impl Renderer {
    #[must_use]
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self { template_dir: template_dir.into() }
    }

    #[must_use]
    pub fn template_dir(&self) -> &Path { &self.template_dir }

    /// Renders the template `name` with `values`.
    ///
    /// # Errors
    ///
    /// - [`Error::TemplateNotFound`] if the template file does not exist
    /// - [`Error::TemplateSyntax`] if the template cannot be parsed
    /// - [`Error::RenderTemplate`] for any other rendering failure
    pub fn render<S: Serialize>(&self, name: &str, values: S) -> Result<String> {
        let environment = self.environment();

        let template = environment.get_template(name).map_err(|source| match source.kind() {
            ErrorKind::TemplateNotFound => Error::TemplateNotFound {
                name: name.to_string(),
                template_dir: self.template_dir.clone(),
            },
            ErrorKind::SyntaxError => Error::TemplateSyntax { name: name.to_string(), source },
            _ => Error::RenderTemplate { name: name.to_string(), source },
        })?;

        template.render(values).context(error::RenderTemplateSnafu { name })
    }

    fn environment(&self) -> Environment<'static> {
        let mut environment = Environment::new();
        environment.set_loader(minijinja::path_loader(self.template_dir.clone()));
        environment.set_auto_escape_callback(|_name| AutoEscape::Html);
        environment
    }
}
