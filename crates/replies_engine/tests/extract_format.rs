use pretty_assertions::assert_eq;
use replies_core::PostSnapshot;
use replies_engine::{
    ArticleExtractor, FormatOptions, FormattedReply, PostExtractor, ReplyFormatter,
};

fn tweet(author: &str, id: u32, date: Option<&str>, body: &str) -> String {
    let time = date
        .map(|d| format!(r#"<time datetime="{d}">Jan 1</time>"#))
        .unwrap_or_default();
    format!(
        r#"<article><a href="/{author}">@{author}</a><a href="/{author}/status/{id}">{time}</a><div data-testid="tweetText">{body}</div></article>"#
    )
}

fn snapshot(identity: &str, markup: String) -> PostSnapshot {
    PostSnapshot::new(identity, markup)
}

fn with_date() -> ReplyFormatter {
    ReplyFormatter::new(FormatOptions { include_date: true })
}

#[test]
fn extractor_reports_each_article() {
    let page = format!(
        "<html><body><main>{}{}<article>placeholder</article></main></body></html>",
        tweet("alice", 1, None, "<span>one</span>"),
        tweet("bob", 2, None, "<span>two</span>")
    );
    let posts = ArticleExtractor.rendered_posts(&page);

    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0].hrefs, vec!["/alice", "/alice/status/1"]);
    assert!(posts[0].is_authored_by("alice"));
    assert_eq!(posts[0].identity(), "/alice/status/1");
    assert!(posts[0].outer_markup.starts_with("<article>"));
    assert!(!posts[1].is_authored_by("alice"));
    assert_eq!(posts[2].identity(), "placeholder");
}

#[test]
fn date_prefix_applies_only_when_present() {
    let snapshots = vec![
        snapshot(
            "/u/status/1",
            tweet("u", 1, Some("2024-01-01T00:00:00Z"), "<span>hello</span>"),
        ),
        snapshot("/u/status/2", tweet("u", 2, None, "<span>world</span>")),
    ];

    let output = with_date().format("u", &snapshots);
    assert_eq!(
        output.blocks(),
        vec!["2024-01-01T00:00:00Z - hello", "world"]
    );

    let undated = ReplyFormatter::new(FormatOptions { include_date: false }).format("u", &snapshots);
    assert_eq!(undated.blocks(), vec!["hello", "world"]);
}

#[test]
fn displayed_time_is_used_without_datetime_attribute() {
    let markup = r#"<article><a href="/u">u</a><time>3h</time><div data-testid="tweetText">hi</div></article>"#;
    let output = with_date().format("u", &[snapshot("hi", markup.to_string())]);
    assert_eq!(output.blocks(), vec!["3h - hi"]);
}

#[test]
fn links_images_and_short_links_are_extracted() {
    let body = r#"see <a href="https://t.co/abc">t.co/abc</a> and <a href="https://example.com/x">example</a> <a href="/hashtag/rust">#rust</a>"#;
    let markup = format!(
        r#"<article><a href="/u">u</a><div data-testid="tweetText">{body}</div><div data-testid="tweetPhoto"><img src="https://pbs.example/media/1.jpg"></div><img src="https://pbs.example/profile.jpg"></article>"#
    );
    let again = tweet("u", 9, None, r#"<a href="https://t.co/abc">dup</a>"#);

    let output = ReplyFormatter::default().format(
        "u",
        &[snapshot("a", markup), snapshot("/u/status/9", again)],
    );

    assert_eq!(
        output.replies[0],
        FormattedReply {
            text: "see t.co/abc and example #rust".to_string(),
            links: vec![
                "https://t.co/abc".to_string(),
                "https://example.com/x".to_string()
            ],
            images: vec!["https://pbs.example/media/1.jpg".to_string()],
        }
    );
    assert_eq!(
        output.blocks()[0],
        "see t.co/abc and example #rust\nLinks: https://t.co/abc, https://example.com/x\nImages: https://pbs.example/media/1.jpg"
    );
    assert_eq!(output.short_links.as_slice(), ["https://t.co/abc".to_string()]);
}

#[test]
fn snapshots_failing_author_check_are_dropped() {
    let snapshots = vec![
        snapshot("/bob/status/1", tweet("bob", 1, None, "not mine")),
        snapshot("/alice/status/2", tweet("alice", 2, None, "mine")),
    ];
    let output = with_date().format("alice", &snapshots);
    assert_eq!(output.blocks(), vec!["mine"]);
}

#[test]
fn snapshots_without_body_are_dropped() {
    let markup = r#"<article><a href="/alice">alice</a><div>loading</div></article>"#;
    let output = with_date().format("alice", &[snapshot("loading", markup.to_string())]);
    assert!(output.is_empty());
}

#[test]
fn formatting_is_a_pure_function_of_the_store() {
    let snapshots = vec![
        snapshot(
            "/u/status/1",
            tweet("u", 1, Some("2024-02-02T10:00:00Z"), r#"<a href="https://t.co/z">l</a>"#),
        ),
        snapshot("/u/status/2", tweet("u", 2, None, "b")),
    ];
    let formatter = with_date();

    let first = formatter.format("u", &snapshots);
    let second = formatter.format("u", &snapshots);
    assert_eq!(first, second);
}
