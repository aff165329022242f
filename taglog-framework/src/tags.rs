//! Tags: template renderers with an optional fixed prefix.
//!
//! A template marks interpolation points with `{}`. Interpolated strings are
//! inserted verbatim and every other value goes through the structural
//! inspector, so `false` renders as `false` here (unlike [`crate::compose`]).
//!
//! ```
//! use taglog_framework::{INFO, Tag, styles, tag};
//!
//! let line = tag!(INFO, "listening on {}", 8080);
//! assert!(styles::strip_styles(&line).starts_with("info listening on 8080"));
//!
//! let deploy = Tag::with_prefix(|| styles::magenta("deploy "));
//! let line = tag!(deploy, "{} done", "build");
//! assert_eq!(styles::strip_styles(&line), "deploy build done");
//! ```

use crate::{
    format::{Value, compose, merge_strings_with_values},
    styles, theme,
};
use once_cell::sync::Lazy;
use std::backtrace::Backtrace;

type Prefix = Box<dyn Fn() -> String + Send + Sync>;

pub struct Tag {
    prefix: Option<Prefix>,
}

impl Tag {
    /// a tag without prefix; renders the template and nothing else
    pub fn plain() -> Self {
        Self { prefix: None }
    }

    /// the prefix is produced on every render, so it follows `NO_COLOR` changes
    pub fn with_prefix(prefix: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self {
            prefix: Some(Box::new(prefix)),
        }
    }

    /// a coloured severity label, e.g. `info `
    pub fn level(label: &'static str) -> Self {
        Self::with_prefix(move || styles::fg(format!("{} ", label), theme::get_level_color(label)))
    }

    pub fn format(&self, template: &str, values: &[Value]) -> String {
        let strings: Vec<&str> = template.split("{}").collect();
        self.render(&strings, values)
    }

    /// render pre-split literal segments with their interpolated values
    pub fn render(&self, strings: &[&str], values: &[Value]) -> String {
        let prefix = self.prefix.as_deref().map(|p| p as &dyn Fn() -> String);
        merge_strings_with_values(prefix, strings, values)
    }
}

impl std::fmt::Debug for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tag")
            .field("prefix", &self.prefix.as_ref().map(|p| styles::strip_styles(&p())))
            .finish()
    }
}

pub static DEBUG: Lazy<Tag> = Lazy::new(|| Tag::level("debug"));
pub static INFO: Lazy<Tag> = Lazy::new(|| Tag::level("info"));
pub static WARN: Lazy<Tag> = Lazy::new(|| Tag::level("warn"));
pub static ERROR: Lazy<Tag> = Lazy::new(|| Tag::level("error"));
pub static SUCCESS: Lazy<Tag> = Lazy::new(|| Tag::level("success"));
pub static INSPECT: Lazy<Tag> = Lazy::new(Tag::plain);

static TRACE: Lazy<Tag> = Lazy::new(|| Tag::level("trace"));

/// like the severity tags, followed by the backtrace of the caller
pub fn trace(template: &str, values: &[Value]) -> String {
    let backtrace = Backtrace::force_capture().to_string();
    compose(&[
        Value::Str(TRACE.format(template, values)),
        Value::Str(backtrace),
    ])
}

/// render a template through a tag
///
/// `tag!(INFO, "took {}ms", elapsed)` is `INFO.format("took {}ms", &[elapsed.into()])`.
#[macro_export]
macro_rules! tag {
    ($tag:expr, $template:expr $(, $value:expr)* $(,)?) => {
        $tag.format($template, &[$($crate::Value::from($value)),*])
    };
}
