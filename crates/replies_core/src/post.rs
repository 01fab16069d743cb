/// One post as the extractor sees it in the live document at sample time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedPost {
    /// Every anchor `href` inside the post, in document order.
    pub hrefs: Vec<String>,
    /// Visible text of the whole post.
    pub visible_text: String,
    /// Serialized outer markup, re-parseable on its own.
    pub outer_markup: String,
}

impl RenderedPost {
    /// True when the post links to the profile root of `target` (`/<target>`).
    pub fn is_authored_by(&self, target: &str) -> bool {
        self.hrefs
            .iter()
            .any(|href| href.strip_prefix('/') == Some(target))
    }

    /// First permalink-shaped link in the post, if any.
    pub fn permalink(&self) -> Option<&str> {
        self.hrefs
            .iter()
            .map(String::as_str)
            .find(|href| is_permalink(href))
    }

    /// Dedup key: the permalink when present, otherwise the full visible text.
    ///
    /// The text fallback is weaker: two distinct posts without permalinks and
    /// with identical text share one identity.
    pub fn identity(&self) -> &str {
        self.permalink().unwrap_or(&self.visible_text)
    }

    pub fn snapshot(&self) -> PostSnapshot {
        PostSnapshot {
            identity: self.identity().to_string(),
            raw_markup: self.outer_markup.clone(),
        }
    }
}

/// Immutable capture of a post stored for later formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSnapshot {
    pub identity: String,
    pub raw_markup: String,
}

impl PostSnapshot {
    pub fn new(identity: impl Into<String>, raw_markup: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            raw_markup: raw_markup.into(),
        }
    }
}

pub fn is_permalink(href: &str) -> bool {
    href.contains("/status/")
}
