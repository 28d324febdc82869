//! Markdown to HTML for the weasyprint route.
//!
//! Parsing is left to `pulldown-cmark` with tables enabled (fenced code is
//! part of CommonMark). On top of the plain event stream this module adds the
//! two things the renderer needs for a navigable document:
//!
//! - every heading gets a stable, unique `id` derived from its text
//! - a paragraph containing only `[TOC]` is replaced by a nested list of links
//!   to those headings

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashSet;

/// Marker paragraph replaced by the table of contents.
const TOC_MARKER: &str = "[TOC]";

#[derive(Debug, Clone, PartialEq, Eq)]
struct TocEntry {
    level: usize,
    id: String,
    title: String,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_HEADING_ATTRIBUTES | Options::ENABLE_STRIKETHROUGH
}

/// Render Markdown into an HTML fragment.
pub fn render_markdown(markdown: &str) -> String {
    let mut events: Vec<Event> = Parser::new_ext(markdown, parser_options()).collect();
    let entries = assign_heading_ids(&mut events);
    let events = replace_toc_markers(events, &entries);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Wrap a rendered fragment in a standalone page.
pub fn render_page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body>
{body}
</body>
</html>
"#,
        title = html_escape::encode_text(title),
        body = body,
    )
}

/// Give every heading an `id`, returning the headings in document order.
///
/// Headings that already carry an explicit `{#id}` keep it; the explicit id is
/// still reserved so generated ids never collide with it.
fn assign_heading_ids(events: &mut [Event]) -> Vec<TocEntry> {
    let mut used: HashSet<String> = HashSet::new();
    let mut entries = Vec::new();

    let mut i = 0;
    while i < events.len() {
        let Event::Start(Tag::Heading { level, .. }) = &events[i] else {
            i += 1;
            continue;
        };
        let level = *level as usize;

        let end = events[i..]
            .iter()
            .position(|e| matches!(e, Event::End(TagEnd::Heading(_))))
            .map(|offset| i + offset)
            .unwrap_or(events.len());
        let title = plain_text(&events[i + 1..end]);

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            let assigned = match id.take() {
                Some(explicit) => {
                    used.insert(explicit.to_string());
                    explicit
                }
                None => CowStr::from(unique(slugify(&title), &mut used)),
            };
            entries.push(TocEntry {
                level,
                id: assigned.to_string(),
                title,
            });
            *id = Some(assigned);
        }

        i = end;
    }

    entries
}

/// Concatenate the visible text of a run of inline events.
fn plain_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Turn heading text into an anchor: lowercase, word characters kept, runs of
/// whitespace and hyphens collapsed into a single `-`.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    slug
}

/// Make `slug` unique among `used` by appending `_1`, `_2`, ...
fn unique(slug: String, used: &mut HashSet<String>) -> String {
    let base = if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    };

    let mut candidate = base.clone();
    let mut n = 1;
    while used.contains(&candidate) {
        candidate = format!("{base}_{n}");
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}

/// Swap every `[TOC]` paragraph for the rendered table of contents.
fn replace_toc_markers<'a>(events: Vec<Event<'a>>, entries: &[TocEntry]) -> Vec<Event<'a>> {
    let mut out = Vec::with_capacity(events.len());
    let mut i = 0;

    while i < events.len() {
        if matches!(events[i], Event::Start(Tag::Paragraph)) {
            let end = events[i..]
                .iter()
                .position(|e| matches!(e, Event::End(TagEnd::Paragraph)))
                .map(|offset| i + offset);
            if let Some(end) = end {
                let only_text = events[i + 1..end]
                    .iter()
                    .all(|e| matches!(e, Event::Text(_)));
                if only_text && plain_text(&events[i + 1..end]) == TOC_MARKER {
                    out.push(Event::Html(CowStr::from(render_toc(entries))));
                    i = end + 1;
                    continue;
                }
            }
        }

        out.push(events[i].clone());
        i += 1;
    }

    out
}

/// Nested `<ul>` lists mirroring heading depth.
fn render_toc(entries: &[TocEntry]) -> String {
    let mut html = String::from("<div class=\"toc\">\n");
    // levels of the currently open lists, innermost last
    let mut open: Vec<usize> = Vec::new();

    for entry in entries {
        while let Some(&top) = open.last() {
            if top > entry.level {
                html.push_str("</li>\n</ul>\n");
                open.pop();
            } else {
                break;
            }
        }

        match open.last() {
            Some(&top) if top == entry.level => html.push_str("</li>\n"),
            _ => {
                html.push_str("<ul>\n");
                open.push(entry.level);
            }
        }

        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>",
            html_escape::encode_double_quoted_attribute(&entry.id),
            html_escape::encode_text(&entry.title)
        ));
    }

    while open.pop().is_some() {
        html.push_str("</li>\n</ul>\n");
    }

    html.push_str("</div>\n");
    html
}
