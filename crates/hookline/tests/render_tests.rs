//! Integration tests for reply rendering
//!
//! Covers shape classification, table output and the escaping guarantees
//! that hold for every reply regardless of shape.

use hookline::chat::Sender;
use hookline::payload::ReplyPayload;
use hookline::render::{Classified, NO_DATA, classify, render, render_reply};
use serde_json::json;

fn bot(text: &str) -> String {
    render_reply(&ReplyPayload::from(text)).into_string()
}

// =============================================================================
// Shape Dispatch
// =============================================================================

mod shape_tests {
    use super::*;

    #[test]
    fn test_bold_markers_become_strong() {
        let html = bot("**bold**");
        assert_eq!(html, "<strong>bold</strong>");
        assert!(!html.contains('*'));
    }

    #[test]
    fn test_several_bold_spans() {
        assert_eq!(
            bot("**Latte** or **Mocha**?"),
            "<strong>Latte</strong> or <strong>Mocha</strong>?"
        );
    }

    #[test]
    fn test_unmatched_bold_marker_is_literal() {
        assert_eq!(bot("**open only"), "**open only");
    }

    #[test]
    fn test_json_array_becomes_table() {
        let html = bot(r#"[{"a":1,"b":2}]"#);
        assert!(html.starts_with("<table"));
        assert!(html.contains("<th>a</th><th>b</th>"));
        assert!(html.contains("<tr><td>1</td><td>2</td></tr>"));
        assert_eq!(html.matches("<tr><td>").count(), 1);
    }

    #[test]
    fn test_empty_json_array_is_no_data() {
        assert_eq!(bot("[]"), NO_DATA);
        assert!(!bot("[]").contains("<table"));
    }

    #[test]
    fn test_json_object_becomes_key_value_table() {
        let html = bot(r#"{"status":"open","hours":"8-17"}"#);
        assert!(html.contains("<tr><td><strong>status</strong></td><td>open</td></tr>"));
        assert!(html.contains("<tr><td><strong>hours</strong></td><td>8-17</td></tr>"));
    }

    #[test]
    fn test_markdown_table() {
        let html = bot("a | b\n---|---\n1 | 2");
        assert!(html.contains("<th>a</th><th>b</th>"));
        assert!(html.contains("<tr><td>1</td><td>2</td></tr>"));
        assert!(!html.contains("---"));
        assert_eq!(html.matches("<tr><td>").count(), 1);
    }

    #[test]
    fn test_markdown_table_with_outer_pipes_and_alignment() {
        let html = bot("| item | qty |\n|:---|---:|\n| tea | 2 |\n| cake | 1 |");
        assert!(html.contains("<th>item</th><th>qty</th>"));
        assert!(html.contains("<tr><td>tea</td><td>2</td></tr>"));
        assert!(html.contains("<tr><td>cake</td><td>1</td></tr>"));
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(bot("plain text"), "plain text");
    }

    #[test]
    fn test_broken_json_falls_back_to_text() {
        assert_eq!(bot("[not json"), "[not json");
        assert_eq!(bot("{oops} **still bold**"), "{oops} <strong>still bold</strong>");
    }

    #[test]
    fn test_structured_scalar_is_plain_text() {
        let html = render_reply(&ReplyPayload::from(json!(42))).into_string();
        assert_eq!(html, "42");
        let html = render_reply(&ReplyPayload::from(json!(false))).into_string();
        assert_eq!(html, "false");
    }

    #[test]
    fn test_structured_array_payload_becomes_table() {
        let payload = ReplyPayload::from(json!([{"name": "Ann"}]));
        let html = render_reply(&payload).into_string();
        assert!(html.contains("<th>name</th>"));
        assert!(html.contains("<td>Ann</td>"));
    }

    #[test]
    fn test_classify_is_explicit() {
        assert_eq!(
            classify(&ReplyPayload::from("[1,2]")),
            Classified::Parsed(json!([1, 2]))
        );
        assert_eq!(
            classify(&ReplyPayload::from("hello")),
            Classified::NotJson
        );
    }
}

// =============================================================================
// Escaping Guarantees
// =============================================================================

mod escaping_tests {
    use super::*;

    const HOSTILE: &[&str] = &[
        "<script>alert(1)</script>",
        "**<img src=x onerror=alert(1)>**",
        r#"[{"<b>":"<i>x</i>"}]"#,
        r#"{"k":"</td><script>"}"#,
        "<th>x</th> | - \n---|---\n<td>&</td> | 2",
        "a & b < c > d",
    ];

    fn has_raw_markup_from_input(html: &str) -> bool {
        html.contains("<script")
            || html.contains("<img")
            || html.contains("<i>")
            || html.contains("<b>")
            || html.contains("</td><script")
    }

    #[test]
    fn test_no_unescaped_input_in_any_shape() {
        for input in HOSTILE {
            let html = bot(input);
            assert!(
                !has_raw_markup_from_input(&html),
                "unescaped markup for {input:?}: {html}"
            );
        }
    }

    #[test]
    fn test_escaping_happens_once() {
        let html = bot("Tom & Jerry");
        assert_eq!(html, "Tom &amp; Jerry");
        assert!(!html.contains("&amp;amp;"));

        let html = bot(r#"[{"q":"a&b"}]"#);
        assert!(html.contains("<td>a&amp;b</td>"));
        assert!(!html.contains("&amp;amp;"));
    }

    #[test]
    fn test_existing_entities_are_escaped_as_text() {
        assert_eq!(bot("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_bold_content_is_escaped() {
        assert_eq!(
            bot("**<b>x</b>**"),
            "<strong>&lt;b&gt;x&lt;/b&gt;</strong>"
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        assert_eq!(bot(r#"say "hi" it's"#), "say &quot;hi&quot; it&#39;s");
    }
}

// =============================================================================
// User Messages
// =============================================================================

mod user_message_tests {
    use super::*;

    fn user(text: &str) -> String {
        render(Sender::User, &ReplyPayload::from(text)).into_string()
    }

    #[test]
    fn test_user_text_is_never_formatted() {
        assert_eq!(user("**not bold**"), "**not bold**");
        assert_eq!(user("[1,2,3]"), "[1,2,3]");
        assert_eq!(user("a | b\n---|---\n1 | 2"), "a | b\n---|---\n1 | 2");
    }

    #[test]
    fn test_user_text_is_escaped() {
        assert_eq!(user("<b>hi</b>"), "&lt;b&gt;hi&lt;/b&gt;");
    }
}
