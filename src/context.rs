use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use minijinja::value::{Enumerator, Object, Value};
use serde::Serialize;

use crate::loader::TemplateLoader;

/// A language/country/variant triple, e.g. `fr-FR`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

impl Locale {
    pub fn new(
        language: impl Into<String>,
        country: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        Locale {
            language: language.into(),
            country: country.into(),
            variant: variant.into(),
        }
    }

    /// Parses a locale tag such as `fr-FR` or `de_DE_bavarian`.
    /// Parts beyond the third are ignored.
    pub fn from_tag(tag: &str) -> Self {
        let mut parts = tag.split(['-', '_']);
        Locale {
            language: parts.next().unwrap_or_default().to_string(),
            country: parts.next().unwrap_or_default().to_string(),
            variant: parts.next().unwrap_or_default().to_string(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn is_empty(&self) -> bool {
        self.language.is_empty() && self.country.is_empty() && self.variant.is_empty()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in [&self.language, &self.country, &self.variant] {
            if part.is_empty() {
                continue;
            }
            if !first {
                write!(f, "-")?;
            }
            write!(f, "{part}")?;
            first = false;
        }
        Ok(())
    }
}

/// Per-request state handed to [`render`](crate::JinjaTemplateEngine::render).
///
/// Carries the request-scoped data map templates read from, the client's
/// locale preferences in priority order, and the loader this request's
/// template sources resolve through. Data values are refcounted engine
/// values, so putting and rendering large payloads never deep-copies them.
#[derive(Clone)]
pub struct RoutingContext {
    path: String,
    data: HashMap<String, Value>,
    acceptable_locales: Vec<Locale>,
    loader: Arc<dyn TemplateLoader>,
}

impl RoutingContext {
    pub fn new(loader: Arc<dyn TemplateLoader>) -> Self {
        RoutingContext {
            path: String::new(),
            data: HashMap::new(),
            acceptable_locales: Vec::new(),
            loader,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Puts a value into the request-scoped data map, making it visible to
    /// templates under `key`.
    pub fn put(&mut self, key: impl Into<String>, value: impl Serialize) -> &mut Self {
        self.data.insert(key.into(), Value::from_serialize(value));
        self
    }

    /// Sets the client's locale preferences, highest priority first.
    pub fn set_acceptable_locales(&mut self, locales: Vec<Locale>) -> &mut Self {
        self.acceptable_locales = locales;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn acceptable_locales(&self) -> &[Locale] {
        &self.acceptable_locales
    }

    /// The user's preferred locale: the first acceptable locale, or the
    /// empty locale when the client expressed no preference.
    pub(crate) fn preferred_locale(&self) -> Locale {
        self.acceptable_locales.first().cloned().unwrap_or_default()
    }

    pub(crate) fn loader(&self) -> Arc<dyn TemplateLoader> {
        Arc::clone(&self.loader)
    }
}

impl fmt::Debug for RoutingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingContext")
            .field("path", &self.path)
            .field("data", &self.data)
            .field("acceptable_locales", &self.acceptable_locales)
            .finish_non_exhaustive()
    }
}

impl Object for RoutingContext {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "path" => Some(Value::from(self.path.as_str())),
            "data" => Some(Value::from_serialize(&self.data)),
            _ => None,
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Str(&["path", "data"])
    }
}

/// The variable map handed to the engine for one render call.
///
/// Exposes the routing context's data entries by reference, the routing
/// context itself under the reserved `context` key, and the effective
/// locale tag under `locale`.
#[derive(Debug)]
pub(crate) struct ContextVars {
    ctx: Arc<RoutingContext>,
    locale: Locale,
}

impl ContextVars {
    pub(crate) fn new(ctx: Arc<RoutingContext>, locale: Locale) -> Self {
        ContextVars { ctx, locale }
    }
}

impl Object for ContextVars {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "context" => Some(Value::from_dyn_object(Arc::clone(&self.ctx))),
            "locale" => Some(Value::from(self.locale.to_string())),
            key => self.ctx.data.get(key).cloned(),
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        let mut keys: Vec<Value> = self.ctx.data.keys().map(|k| Value::from(k.as_str())).collect();
        keys.push(Value::from("context"));
        keys.push(Value::from("locale"));
        Enumerator::Values(keys)
    }
}
