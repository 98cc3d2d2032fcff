use std::fmt;

/// A single shell-glob exclusion pattern.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ExclusionPattern {
    glob: String,
}

impl ExclusionPattern {
    /// Wraps the glob text supplied by the user.
    #[must_use]
    pub fn new(glob: impl Into<String>) -> Self {
        Self { glob: glob.into() }
    }

    /// Returns the glob text as supplied.
    #[must_use]
    pub fn glob(&self) -> &str {
        &self.glob
    }

    /// Translates the glob into an end-anchored regular expression.
    ///
    /// Only `.`, `?` and `*` are rewritten. Every other character keeps its
    /// regular-expression meaning, so `*.[oa]` excludes both `x.o` and `x.a`.
    ///
    /// # Examples
    ///
    /// ```
    /// use filters::ExclusionPattern;
    ///
    /// assert_eq!(ExclusionPattern::new("*.tmp").to_regex(), r".*\.tmp$");
    /// assert_eq!(ExclusionPattern::new("a?c").to_regex(), "a.c$");
    /// assert_eq!(ExclusionPattern::new("*.[oa]").to_regex(), r".*\.[oa]$");
    /// ```
    #[must_use]
    pub fn to_regex(&self) -> String {
        let mut expression = String::with_capacity(self.glob.len() * 2 + 1);
        for ch in self.glob.chars() {
            match ch {
                '.' => expression.push_str(r"\."),
                '*' => expression.push_str(".*"),
                '?' => expression.push('.'),
                other => expression.push(other),
            }
        }
        expression.push('$');
        expression
    }
}

impl fmt::Display for ExclusionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glob)
    }
}

impl From<&str> for ExclusionPattern {
    fn from(glob: &str) -> Self {
        Self::new(glob)
    }
}

impl From<String> for ExclusionPattern {
    fn from(glob: String) -> Self {
        Self::new(glob)
    }
}

/// Splits a comma-separated pattern list into its individual patterns.
///
/// Empty segments are dropped, so `"*.o,,*.tmp"` yields two patterns.
///
/// ```
/// use filters::split_pattern_list;
///
/// assert_eq!(split_pattern_list("*.o,*.tmp"), vec!["*.o", "*.tmp"]);
/// assert_eq!(split_pattern_list("core"), vec!["core"]);
/// ```
#[must_use]
pub fn split_pattern_list(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}
