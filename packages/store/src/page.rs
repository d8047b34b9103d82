use serde::{Deserialize, Serialize};
use std::fmt;

/// Key under which a page's versions are stored
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// `/docs/about.html` → `about`, `/` → `index`
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let last = path.rsplit('/').next().unwrap_or_default();
        let stem = last.strip_suffix(".html").unwrap_or(last);

        if stem.is_empty() {
            Self::new("index")
        } else {
            Self::new(stem)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(PageId::from_path("/").as_str(), "index");
        assert_eq!(PageId::from_path("").as_str(), "index");
        assert_eq!(PageId::from_path("/index.html").as_str(), "index");
        assert_eq!(PageId::from_path("/docs/about.html").as_str(), "about");
        assert_eq!(PageId::from_path("/pricing").as_str(), "pricing");
        assert_eq!(PageId::from_path("/docs/").as_str(), "index");
        assert_eq!(PageId::from_path("/team.html?ref=nav#top").as_str(), "team");
    }
}
