use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use minijinja::value::Value;
use minijinja::{AutoEscape, Environment, Error as EngineError, ErrorKind};
use tokio::task;
use tracing::debug;

use crate::context::{ContextVars, RoutingContext};
use crate::error::RenderError;
use crate::loader::LoadError;
use crate::response::RenderedTemplate;

/// Template mode applied when none is configured.
pub const DEFAULT_TEMPLATE_MODE: &str = "HTML";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TemplateMode {
    Html,
    Xml,
    Text,
}

impl TemplateMode {
    fn parse(mode: &str) -> Option<TemplateMode> {
        match mode.to_ascii_uppercase().as_str() {
            "HTML" => Some(TemplateMode::Html),
            "XML" => Some(TemplateMode::Xml),
            "TEXT" => Some(TemplateMode::Text),
            _ => None,
        }
    }

    fn auto_escape(self) -> AutoEscape {
        match self {
            // minijinja's HTML escaping covers the XML entity set as well
            TemplateMode::Html | TemplateMode::Xml => AutoEscape::Html,
            TemplateMode::Text => AutoEscape::None,
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            TemplateMode::Html => "text/html; charset=utf-8",
            TemplateMode::Xml => "application/xml",
            TemplateMode::Text => "text/plain; charset=utf-8",
        }
    }
}

/// Renders minijinja templates against per-request routing state.
///
/// One engine is shared across all requests. Request-specific state (data
/// map, locale preferences, template loader) arrives with each
/// [`RoutingContext`]; every render binds that state to its own clone of
/// the environment, so concurrent renders directed at different loaders
/// never observe each other's sources.
pub struct JinjaTemplateEngine {
    env: Environment<'static>,
    mode: String,
}

impl JinjaTemplateEngine {
    pub fn new() -> Self {
        JinjaTemplateEngine {
            env: Environment::new(),
            mode: DEFAULT_TEMPLATE_MODE.to_string(),
        }
    }

    /// Sets the template mode used by subsequent renders.
    ///
    /// The mode is validated lazily: an unrecognized value fails the next
    /// render instead of being swapped for a default here. Call during
    /// setup, before serving traffic.
    pub fn set_mode(&mut self, mode: impl Into<String>) -> &mut Self {
        self.mode = mode.into();
        self
    }

    /// The raw minijinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Mutable access to the raw environment, for registering filters,
    /// globals or tests during setup.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Renders `template_file_name` against the given routing context and
    /// returns the complete output buffer.
    ///
    /// The template source is resolved through the context's loader; the
    /// effective locale is the context's first acceptable locale. The
    /// synchronous engine invocation runs on the blocking pool.
    pub async fn render(
        &self,
        ctx: RoutingContext,
        template_file_name: &str,
    ) -> Result<Bytes, RenderError> {
        let mode = TemplateMode::parse(&self.mode)
            .ok_or_else(|| RenderError::UnsupportedMode(self.mode.clone()))?;

        let locale = ctx.preferred_locale();
        debug!(template = template_file_name, %locale, "rendering template");

        let ctx = Arc::new(ctx);
        let vars = Value::from_object(ContextVars::new(Arc::clone(&ctx), locale));

        // Bind this request's loader to a private environment clone. The
        // clone is cheap and keeps filters/globals registered on the shared
        // environment; there is no shared resolver slot to race on.
        let mut env = self.env.clone();
        env.set_auto_escape_callback(move |_name| mode.auto_escape());
        let loader = ctx.loader();
        env.set_loader(move |name| match loader.load(name) {
            Ok(source) => Ok(Some(source)),
            Err(LoadError::NotFound(_)) => Ok(None),
            Err(err) => Err(EngineError::new(
                ErrorKind::InvalidOperation,
                "template source could not be read",
            )
            .with_source(err)),
        });

        let name = template_file_name.to_string();
        task::spawn_blocking(move || -> Result<Bytes, RenderError> {
            let template = env.get_template(&name)?;
            let mut sink = BytesMut::new().writer();
            template.render_to_write(vars, &mut sink)?;
            Ok(sink.into_inner().freeze())
        })
        .await?
    }

    /// Renders like [`render`](Self::render) and wraps the buffer in a
    /// response-ready value whose content type follows the configured mode.
    pub async fn render_response(
        &self,
        ctx: RoutingContext,
        template_file_name: &str,
    ) -> Result<RenderedTemplate, RenderError> {
        let mode = TemplateMode::parse(&self.mode)
            .ok_or_else(|| RenderError::UnsupportedMode(self.mode.clone()))?;
        let body = self.render(ctx, template_file_name).await?;
        Ok(RenderedTemplate::new(body, mode.content_type()))
    }
}

impl Default for JinjaTemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
