use replies_core::RenderedPost;
use scraper::{Html, Selector};

use crate::text::visible_text;

pub trait PostExtractor: Send + Sync {
    /// Every post currently rendered in `html`, in document order.
    fn rendered_posts(&self, html: &str) -> Vec<RenderedPost>;
}

/// Treats each `<article>` as one post:
/// - all `a[href]` values, in document order
/// - trimmed visible text of the whole article
/// - the article's outer HTML as the snapshot markup.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArticleExtractor;

impl PostExtractor for ArticleExtractor {
    fn rendered_posts(&self, html: &str) -> Vec<RenderedPost> {
        let doc = Html::parse_document(html);
        let (Ok(article_sel), Ok(anchor_sel)) =
            (Selector::parse("article"), Selector::parse("a[href]"))
        else {
            return Vec::new();
        };

        doc.select(&article_sel)
            .map(|article| RenderedPost {
                hrefs: article
                    .select(&anchor_sel)
                    .filter_map(|a| a.value().attr("href"))
                    .map(str::to_string)
                    .collect(),
                visible_text: visible_text(article).trim().to_string(),
                outer_markup: article.html(),
            })
            .collect()
    }
}
