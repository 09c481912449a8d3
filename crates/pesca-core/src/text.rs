//! Case-insensitive text matching shared by the catalog filters.

/// A lowercased search needle.
///
/// Lowercasing is Unicode-aware, so `"CAMARÓN"` matches `"camarón"`.
/// An empty needle matches everything. Whitespace is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Needle(String);

impl Needle {
    pub fn new(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `haystack` contains the needle, ignoring case.
    pub fn matches(&self, haystack: &str) -> bool {
        self.is_empty() || haystack.to_lowercase().contains(&self.0)
    }

    /// Whether any of `haystacks` contains the needle.
    pub fn matches_any<'a, I>(&self, haystacks: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.is_empty() || haystacks.into_iter().any(|h| self.matches(h))
    }
}

impl From<Option<&str>> for Needle {
    fn from(raw: Option<&str>) -> Self {
        Self::new(raw.unwrap_or_default())
    }
}
