//! HTML-to-text normalization for advisory summaries.
//!
//! Advisory summaries arrive as loosely structured HTML. `clean_html` turns
//! them into plain text suitable for both pattern matching and display:
//! entities decoded, block boundaries preserved as newlines, list items as
//! bullets, everything else stripped.

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::sync::LazyLock;

static NEWLINE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Strip markup and decode entities, preserving block structure as text.
///
/// `<br>` becomes a newline, `<p>` boundaries become newlines, `<li>` becomes
/// a `- ` bullet on its own line. Remaining tags are dropped. Runs of 3+
/// newlines collapse to 2, runs of spaces to one. Malformed markup degrades
/// gracefully: the parser recovers and unknown tags are simply removed.
pub fn clean_html(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    let mut out = String::with_capacity(input.len());
    render_children(fragment.root_element(), &mut out);

    let out = NEWLINE_RUN_RE.replace_all(&out, "\n\n");
    let out = SPACE_RUN_RE.replace_all(&out, " ");
    out.trim().to_string()
}

fn render_children(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                match child_el.value().name() {
                    "br" => out.push('\n'),
                    "p" => {
                        out.push('\n');
                        render_children(child_el, out);
                        out.push('\n');
                    }
                    "li" => {
                        out.push_str("\n- ");
                        render_children(child_el, out);
                    }
                    // Invisible content, not useful for matching or display.
                    "script" | "style" => {}
                    _ => render_children(child_el, out),
                }
            }
            _ => {}
        }
    }
}
