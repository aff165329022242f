use crate::styles::strip_styles;
use regex::Regex;
use std::{fmt, sync::Arc};

/// one entry of an `only`/`exclude` list
#[derive(Debug, Clone)]
pub enum Matcher {
    /// literal label, matches when the message starts with it
    Tag(String),
    /// matches when found anywhere in the message
    Pattern(Regex),
}

impl Matcher {
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Matcher::Pattern)
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Matcher::Tag(tag) => text.starts_with(tag.as_str()),
            Matcher::Pattern(re) => re.is_match(text),
        }
    }
}

impl From<&str> for Matcher {
    fn from(tag: &str) -> Self {
        Matcher::Tag(tag.to_string())
    }
}

impl From<String> for Matcher {
    fn from(tag: String) -> Self {
        Matcher::Tag(tag)
    }
}

impl From<Regex> for Matcher {
    fn from(re: Regex) -> Self {
        Matcher::Pattern(re)
    }
}

/// declarative allow/deny lists
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub only: Option<Vec<Matcher>>,
    pub exclude: Option<Vec<Matcher>>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn only<M: Into<Matcher>>(mut self, matchers: impl IntoIterator<Item = M>) -> Self {
        self.only = Some(matchers.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude<M: Into<Matcher>>(mut self, matchers: impl IntoIterator<Item = M>) -> Self {
        self.exclude = Some(matchers.into_iter().map(Into::into).collect());
        self
    }
}

pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// what a destination accepts: lists, or a custom predicate
#[derive(Clone)]
pub enum FilterSpec {
    Options(FilterOptions),
    Custom(Predicate),
}

impl FilterSpec {
    pub fn custom(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        FilterSpec::Custom(Arc::new(predicate))
    }
}

impl From<FilterOptions> for FilterSpec {
    fn from(options: FilterOptions) -> Self {
        FilterSpec::Options(options)
    }
}

impl fmt::Debug for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpec::Options(options) => f.debug_tuple("Options").field(options).finish(),
            FilterSpec::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Clone)]
enum TesterKind {
    /// no spec: everything passes, no stripping
    PassAll,
    Lists {
        only: Option<Vec<Matcher>>,
        exclude: Vec<Matcher>,
    },
    Custom(Predicate),
}

/// compiled admission predicate over rendered messages
#[derive(Clone)]
pub struct Tester {
    kind: TesterKind,
}

impl Tester {
    pub fn pass_all() -> Self {
        Self {
            kind: TesterKind::PassAll,
        }
    }

    /// compile a spec; never fails, unknown tags simply never match
    pub fn compile(spec: Option<&FilterSpec>) -> Self {
        let kind = match spec {
            None => TesterKind::PassAll,
            Some(FilterSpec::Custom(predicate)) => TesterKind::Custom(predicate.clone()),
            Some(FilterSpec::Options(FilterOptions {
                only: None,
                exclude: None,
            })) => TesterKind::PassAll,
            Some(FilterSpec::Options(options)) => TesterKind::Lists {
                only: options.only.clone(),
                exclude: options.exclude.clone().unwrap_or_default(),
            },
        };
        Self { kind }
    }

    pub fn test(&self, message: &str) -> bool {
        match &self.kind {
            TesterKind::PassAll => true,
            TesterKind::Custom(predicate) => predicate(&strip_styles(message)),
            TesterKind::Lists { only, exclude } => {
                let text = strip_styles(message);
                let included = only
                    .as_ref()
                    .is_none_or(|only| only.iter().any(|m| m.matches(&text)));
                included && !exclude.iter().any(|m| m.matches(&text))
            }
        }
    }
}

impl Default for Tester {
    fn default() -> Self {
        Self::pass_all()
    }
}

impl fmt::Debug for Tester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            TesterKind::PassAll => "PassAll",
            TesterKind::Lists { .. } => "Lists",
            TesterKind::Custom(_) => "Custom",
        };
        f.debug_struct("Tester").field("kind", &kind).finish()
    }
}

/// shorthand for [`Tester::compile`]
pub fn create_tester(spec: Option<&FilterSpec>) -> Tester {
    Tester::compile(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEBUG, INFO, SUCCESS};

    fn re(pattern: &str) -> Matcher {
        Matcher::pattern(pattern).unwrap()
    }

    #[test]
    fn test_only_tags_and_patterns() {
        let spec = FilterSpec::from(FilterOptions::new().only([Matcher::from("success"), re("test")]));
        let tester = create_tester(Some(&spec));

        assert!(tester.test("success: ok"));
        assert!(!tester.test("info: hi"));
        assert!(tester.test("running a test"));
    }

    #[test]
    fn test_only_against_styled_tags() {
        let spec = FilterSpec::from(FilterOptions::new().only([Matcher::from("success"), re("test")]));
        let tester = create_tester(Some(&spec));

        assert!(tester.test(&SUCCESS.format("hello", &[])));
        assert!(!tester.test(&INFO.format("hello", &[])));
        assert!(!tester.test(&DEBUG.format("hello", &[])));
        assert!(tester.test("testing"));
    }

    #[test]
    fn test_exclude_only() {
        let spec = FilterSpec::from(FilterOptions::new().exclude([
            Matcher::from("debug"),
            Matcher::from("info"),
            re("test"),
        ]));
        let tester = create_tester(Some(&spec));

        assert!(tester.test(&SUCCESS.format("hello", &[])));
        assert!(!tester.test(&INFO.format("hello", &[])));
        assert!(!tester.test(&DEBUG.format("hello", &[])));
        assert!(!tester.test("testing"));
    }

    #[test]
    fn test_exclude_wins_over_only() {
        let spec = FilterSpec::from(
            FilterOptions::new()
                .only(["debug", "info"])
                .exclude(["debug"]),
        );
        let tester = create_tester(Some(&spec));

        assert!(!tester.test(&SUCCESS.format("hello", &[])));
        assert!(tester.test(&INFO.format("hello", &[])));
        assert!(!tester.test(&DEBUG.format("hello", &[])));
    }

    #[test]
    fn test_custom_predicate_sees_stripped_text() {
        let spec = FilterSpec::custom(|msg| msg.starts_with("success"));
        let tester = create_tester(Some(&spec));

        assert!(tester.test(&SUCCESS.format("hello", &[])));
        assert!(!tester.test(&INFO.format("hello", &[])));
        assert!(tester.test("\x1b[32msuccess\x1b[39m plain"));
    }

    #[test]
    fn test_no_spec_admits_everything() {
        let tester = create_tester(None);
        assert!(tester.test(""));
        assert!(tester.test("anything at all"));

        let empty = FilterSpec::from(FilterOptions::new());
        assert!(create_tester(Some(&empty)).test("anything"));
    }

    #[test]
    fn test_empty_only_list_admits_nothing() {
        let spec = FilterSpec::from(FilterOptions::new().only(Vec::<Matcher>::new()));
        assert!(!create_tester(Some(&spec)).test("info hi"));
    }

    #[test]
    fn test_tag_matches_prefix_only() {
        let spec = FilterSpec::from(FilterOptions::new().only(["info"]));
        let tester = create_tester(Some(&spec));
        assert!(!tester.test("some info here"));
    }

    #[test]
    fn test_compiling_twice_agrees() {
        let spec = FilterSpec::from(
            FilterOptions::new()
                .only([Matcher::from("warn"), re(r"\d+ms")])
                .exclude([re("ignored")]),
        );
        let first = create_tester(Some(&spec));
        let second = create_tester(Some(&spec));
        for message in [
            "warn disk",
            "took 12ms",
            "warn ignored",
            "info 3ms ignored",
            "",
            "error",
        ] {
            assert_eq!(first.test(message), second.test(message), "{}", message);
        }
    }
}
