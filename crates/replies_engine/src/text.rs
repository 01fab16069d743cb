use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::ElementRef;

/// Rendered text of an element: text nodes in order with whitespace runs
/// collapsed to one space, `<br>` as a newline, emoji images by their `alt`
/// text.
pub(crate) fn visible_text(element: ElementRef) -> String {
    let mut text = RenderedText::default();
    for child in element.children() {
        text.collect(child);
    }
    text.out
}

#[derive(Default)]
struct RenderedText {
    out: String,
    pending_space: bool,
}

impl RenderedText {
    fn collect(&mut self, node: NodeRef<'_, Node>) {
        match node.value() {
            Node::Text(text) => self.push_text(text),
            Node::Element(element) => match element.name() {
                "br" => self.push_break(),
                "img" => {
                    if let Some(alt) = element.attr("alt") {
                        self.push_text(alt);
                    }
                }
                "script" | "style" | "noscript" | "template" => {}
                _ => self.collect_children(node),
            },
            _ => self.collect_children(node),
        }
    }

    fn collect_children(&mut self, node: NodeRef<'_, Node>) {
        for child in node.children() {
            self.collect(child);
        }
    }

    // Leading and trailing whitespace of a line is dropped.
    fn push_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                self.pending_space = true;
                continue;
            }
            if self.pending_space && !self.out.is_empty() && !self.out.ends_with('\n') {
                self.out.push(' ');
            }
            self.pending_space = false;
            self.out.push(ch);
        }
    }

    fn push_break(&mut self) {
        self.out.push('\n');
        self.pending_space = false;
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::visible_text;

    fn text_of(markup: &str) -> String {
        let html = Html::parse_fragment(markup);
        let sel = Selector::parse("#t").unwrap();
        visible_text(html.select(&sel).next().unwrap())
    }

    #[test]
    fn breaks_and_emoji_survive() {
        assert_eq!(
            text_of(
                r#"<div id="t"><span>one</span><br><img alt="🙂" src="x.png"><script>no()</script>two</div>"#
            ),
            "one\n🙂two"
        );
    }

    #[test]
    fn indentation_collapses_to_single_spaces() {
        assert_eq!(
            text_of("<div id=\"t\">\n  <span>a</span>\n  <span>b</span></div>"),
            "a b"
        );
        assert_eq!(
            text_of("<div id=\"t\">first  line <br>\n   second\tline</div>"),
            "first line\nsecond line"
        );
    }
}
