//! Renders [minijinja](https://docs.rs/minijinja) templates from axum
//! request context.
//!
//! The crate is glue between a shared template engine and per-request
//! routing state: each render call carries a [`RoutingContext`] with the
//! request-scoped data map, the client's locale preferences and a
//! [`TemplateLoader`] resolving template names to source text. Templates
//! see the data map's entries directly, the routing context under the
//! reserved `context` variable and the effective locale under `locale`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum_templ_jinja::{FsLoader, JinjaTemplateEngine, RoutingContext};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), axum_templ_jinja::RenderError> {
//! let engine = JinjaTemplateEngine::new();
//! let loader: Arc<dyn axum_templ_jinja::TemplateLoader> =
//!     Arc::new(FsLoader::new("templates"));
//!
//! let mut ctx = RoutingContext::new(loader).with_path("/hello");
//! ctx.put("name", "world");
//!
//! let body = engine.render(ctx, "hello.html").await?;
//! assert!(!body.is_empty());
//! # Ok(())
//! # }
//! ```

mod context;
mod engine;
mod error;
mod loader;
mod response;

pub use context::{Locale, RoutingContext};
pub use engine::{JinjaTemplateEngine, DEFAULT_TEMPLATE_MODE};
pub use error::RenderError;
pub use loader::{FsLoader, LoadError, TemplateLoader};
pub use response::RenderedTemplate;
