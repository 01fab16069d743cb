//! Turns stored post snapshots into exportable reply blocks.
//!
//! Snapshots keep the raw markup captured during polling and are parsed only
//! here, after the run ends. Media and timestamps inside a post can finish
//! rendering after the post first appears, so parsing at capture time would
//! freeze whatever was missing at that instant. The cost is a second parse of
//! every post at finalization.

use std::collections::HashSet;

use replies_core::{PostSnapshot, ScrapeSettings};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::text::visible_text;

/// Host of the redirect service whose links are exported separately.
pub const SHORT_LINK_HOST: &str = "t.co";

const BODY_SELECTOR: &str = r#"[data-testid="tweetText"]"#;
const MEDIA_IMAGE_SELECTOR: &str = r#"[data-testid="tweetPhoto"] img[src]"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    /// Prefix each reply with its timestamp.
    pub include_date: bool,
}

impl From<&ScrapeSettings> for FormatOptions {
    fn from(settings: &ScrapeSettings) -> Self {
        Self {
            include_date: settings.include_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedReply {
    pub text: String,
    pub links: Vec<String>,
    pub images: Vec<String>,
}

impl FormattedReply {
    pub fn to_block(&self) -> String {
        let mut block = self.text.clone();
        if !self.links.is_empty() {
            block.push_str("\nLinks: ");
            block.push_str(&self.links.join(", "));
        }
        if !self.images.is_empty() {
            block.push_str("\nImages: ");
            block.push_str(&self.images.join(", "));
        }
        block
    }
}

/// Insertion-ordered set of short-link URLs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortLinkSet {
    seen: HashSet<String>,
    links: Vec<String>,
}

impl ShortLinkSet {
    pub fn insert(&mut self, url: &str) -> bool {
        if !self.seen.insert(url.to_string()) {
            return false;
        }
        self.links.push(url.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.links
    }

    pub fn to_lines(&self) -> String {
        self.links.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedOutput {
    pub replies: Vec<FormattedReply>,
    pub short_links: ShortLinkSet,
}

impl FormattedOutput {
    pub fn blocks(&self) -> Vec<String> {
        self.replies.iter().map(FormattedReply::to_block).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReplyFormatter {
    options: FormatOptions,
}

impl ReplyFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Formats every snapshot authored by `target`, in snapshot order.
    /// Snapshots without a body region or without the author link are skipped.
    pub fn format(&self, target: &str, snapshots: &[PostSnapshot]) -> FormattedOutput {
        let mut output = FormattedOutput::default();
        for snapshot in snapshots {
            if let Some(reply) = self.format_one(target, snapshot, &mut output.short_links) {
                output.replies.push(reply);
            }
        }
        output
    }

    fn format_one(
        &self,
        target: &str,
        snapshot: &PostSnapshot,
        short_links: &mut ShortLinkSet,
    ) -> Option<FormattedReply> {
        let fragment = Html::parse_fragment(&snapshot.raw_markup);
        let root = fragment.root_element();
        let anchor_sel = Selector::parse("a[href]").ok()?;
        let body_sel = Selector::parse(BODY_SELECTOR).ok()?;

        // A snapshot could come from a fragment mixing several authors.
        let authored = root
            .select(&anchor_sel)
            .filter_map(|a| a.value().attr("href"))
            .any(|href| href.strip_prefix('/') == Some(target));
        if !authored {
            return None;
        }

        let body = root.select(&body_sel).next()?;
        let mut text = visible_text(body).trim().to_string();
        if self.options.include_date {
            if let Some(date) = post_date(root) {
                text = format!("{date} - {text}");
            }
        }

        let links: Vec<String> = body
            .select(&anchor_sel)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| is_web_url(href))
            .map(str::to_string)
            .collect();
        for link in links.iter().filter(|link| is_short_link(link)) {
            short_links.insert(link);
        }

        let images: Vec<String> = Selector::parse(MEDIA_IMAGE_SELECTOR)
            .ok()
            .map(|sel| {
                root.select(&sel)
                    .filter_map(|img| img.value().attr("src"))
                    .map(str::trim)
                    .filter(|src| is_web_url(src))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(FormattedReply {
            text,
            links,
            images,
        })
    }
}

/// Machine-readable `datetime` of the first `<time>`, else its displayed text.
fn post_date(root: ElementRef) -> Option<String> {
    let sel = Selector::parse("time").ok()?;
    let time = root.select(&sel).next()?;
    time.value()
        .attr("datetime")
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .or_else(|| {
            let shown = time.text().collect::<String>().trim().to_string();
            (!shown.is_empty()).then_some(shown)
        })
}

fn is_web_url(candidate: &str) -> bool {
    let lower = candidate.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn is_short_link(candidate: &str) -> bool {
    Url::parse(candidate)
        .ok()
        .and_then(|url| {
            url.host_str()
                .map(|host| host.eq_ignore_ascii_case(SHORT_LINK_HOST))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{is_short_link, FormattedReply, ShortLinkSet};

    #[test]
    fn short_link_detection_checks_host() {
        assert!(is_short_link("https://t.co/abc"));
        assert!(is_short_link("http://T.CO/abc"));
        assert!(!is_short_link("https://example.com/t.co/abc"));
        assert!(!is_short_link("not a url"));
    }

    #[test]
    fn block_lines_only_when_present() {
        let reply = FormattedReply {
            text: "hi".to_string(),
            links: vec!["https://a".to_string(), "https://b".to_string()],
            images: Vec::new(),
        };
        assert_eq!(reply.to_block(), "hi\nLinks: https://a, https://b");
    }

    #[test]
    fn short_link_set_keeps_first_order() {
        let mut set = ShortLinkSet::default();
        assert!(set.insert("https://t.co/b"));
        assert!(set.insert("https://t.co/a"));
        assert!(!set.insert("https://t.co/b"));
        assert_eq!(set.to_lines(), "https://t.co/b\nhttps://t.co/a");
    }
}
