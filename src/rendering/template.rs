//! Page template compiler.
//!
//! Templates are plain HTML with a handful of `{{tag}}` placeholders:
//!
//! ```text
//! <h1>{{page_title}}</h1>
//! <p>{{count}} items</p>
//! <ul>
//! {{#each todos}}<li id="{{id}}">{{title}} ({{created_at}})</li>{{/each}}
//! </ul>
//! ```
//!
//! `page_title` and `count` are valid outside the block, `id`, `title` and
//! `created_at` only inside it. Everything substituted is HTML-escaped.

use crate::error_handling::types::RenderError;
use crate::rendering::PageData;
use crate::storage::types::Todo;

const BLOCK_OPEN: &str = "{{#each todos}}";
const BLOCK_CLOSE: &str = "{{/each}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageField {
    PageTitle,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowField {
    Id,
    Title,
    CreatedAt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<F> {
    Text(String),
    Field(F),
}

/// A template checked and split into its fixed parts once, then rendered any
/// number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    head: Vec<Segment<PageField>>,
    row: Vec<Segment<RowField>>,
    tail: Vec<Segment<PageField>>,
}

impl PageTemplate {
    pub fn compile(source: &str) -> Result<Self, RenderError> {
        let open = find_once(source, BLOCK_OPEN)?;
        let close = find_once(source, BLOCK_CLOSE)?;
        if close < open {
            return Err(RenderError::InvalidTemplate(format!(
                "{} appears before {}",
                BLOCK_CLOSE, BLOCK_OPEN
            )));
        }

        let head = parse_segments(&source[..open], page_field)?;
        let row = parse_segments(&source[open + BLOCK_OPEN.len()..close], row_field)?;
        let tail = parse_segments(&source[close + BLOCK_CLOSE.len()..], page_field)?;

        for required in [RowField::Id, RowField::Title] {
            if !row.contains(&Segment::Field(required)) {
                return Err(RenderError::InvalidTemplate(format!(
                    "todo block must use {{{{{}}}}}",
                    row_field_name(required)
                )));
            }
        }

        Ok(Self { head, row, tail })
    }

    pub fn render(&self, page: &PageData<'_>) -> String {
        let mut out = String::new();
        write_page(&mut out, &self.head, page);
        for todo in page.todos {
            for segment in &self.row {
                match segment {
                    Segment::Text(text) => out.push_str(text),
                    Segment::Field(field) => push_row_field(&mut out, *field, todo),
                }
            }
        }
        write_page(&mut out, &self.tail, page);
        out
    }
}

fn write_page(out: &mut String, segments: &[Segment<PageField>], page: &PageData<'_>) {
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Field(PageField::PageTitle) => escape_into(out, page.title),
            Segment::Field(PageField::Count) => out.push_str(&page.todos.len().to_string()),
        }
    }
}

fn push_row_field(out: &mut String, field: RowField, todo: &Todo) {
    match field {
        RowField::Id => escape_into(out, &todo.id.to_string()),
        RowField::Title => escape_into(out, &todo.title),
        RowField::CreatedAt => {
            escape_into(out, &todo.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        }
    }
}

fn find_once(source: &str, marker: &str) -> Result<usize, RenderError> {
    let mut found = source.match_indices(marker).map(|(i, _)| i);
    match (found.next(), found.next()) {
        (Some(i), None) => Ok(i),
        (None, _) => Err(RenderError::InvalidTemplate(format!("missing {}", marker))),
        (Some(_), Some(_)) => Err(RenderError::InvalidTemplate(format!(
            "{} may only appear once",
            marker
        ))),
    }
}

fn page_field(name: &str) -> Option<PageField> {
    match name {
        "page_title" => Some(PageField::PageTitle),
        "count" => Some(PageField::Count),
        _ => None,
    }
}

fn row_field(name: &str) -> Option<RowField> {
    match name {
        "id" => Some(RowField::Id),
        "title" => Some(RowField::Title),
        "created_at" => Some(RowField::CreatedAt),
        _ => None,
    }
}

fn row_field_name(field: RowField) -> &'static str {
    match field {
        RowField::Id => "id",
        RowField::Title => "title",
        RowField::CreatedAt => "created_at",
    }
}

fn parse_segments<F>(
    mut rest: &str,
    lookup: fn(&str) -> Option<F>,
) -> Result<Vec<Segment<F>>, RenderError> {
    let mut segments = Vec::new();
    while let Some(start) = rest.find("{{") {
        if start > 0 {
            segments.push(Segment::Text(rest[..start].to_string()));
        }
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| RenderError::InvalidTemplate("unterminated {{ tag".to_string()))?;
        let name = after[..end].trim();
        let field = lookup(name).ok_or_else(|| {
            RenderError::InvalidTemplate(format!("unknown or misplaced tag {{{{{}}}}}", name))
        })?;
        segments.push(Segment::Field(field));
        rest = &after[end + 2..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_string()));
    }
    Ok(segments)
}

/// Escape the characters significant in HTML text and attribute values.
pub fn escape_into(out: &mut String, raw: &str) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::TodoId;
    use chrono::{TimeZone, Utc};

    fn todo(title: &str) -> Todo {
        Todo {
            id: TodoId::new(),
            title: title.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        }
    }

    const SIMPLE: &str =
        "<h1>{{page_title}}</h1>({{count}}){{#each todos}}[{{id}}|{{title}}|{{created_at}}]{{/each}}end";

    #[test]
    fn test_render_rows_in_order() {
        let template = PageTemplate::compile(SIMPLE).unwrap();
        let todos = vec![todo("a"), todo("b")];
        let html = template.render(&PageData {
            title: "List",
            todos: &todos,
        });
        let expected = format!(
            "<h1>List</h1>(2)[{}|a|2024-03-01 12:30:00 UTC][{}|b|2024-03-01 12:30:00 UTC]end",
            todos[0].id, todos[1].id
        );
        assert_eq!(html, expected);
    }

    #[test]
    fn test_render_empty_list() {
        let template = PageTemplate::compile(SIMPLE).unwrap();
        let html = template.render(&PageData {
            title: "List",
            todos: &[],
        });
        assert_eq!(html, "<h1>List</h1>(0)end");
    }

    #[test]
    fn test_render_escapes_values() {
        let template = PageTemplate::compile(SIMPLE).unwrap();
        let todos = vec![todo("<script>alert(\"x\")</script> & 'y'")];
        let html = template.render(&PageData {
            title: "Tom & Jerry",
            todos: &todos,
        });
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_tags_tolerate_inner_whitespace() {
        let template = PageTemplate::compile("{{#each todos}}{{ id }}{{ title }}{{/each}}").unwrap();
        let todos = vec![todo("x")];
        let html = template.render(&PageData {
            title: "",
            todos: &todos,
        });
        assert_eq!(html, format!("{}x", todos[0].id));
    }

    #[test]
    fn test_compile_rejects_invalid_templates() {
        let cases = [
            "<p>no block</p>",
            "{{#each todos}}{{id}}{{title}}",
            "{{/each}}{{#each todos}}{{id}}{{title}}",
            "{{#each todos}}{{id}}{{title}}{{/each}}{{#each todos}}{{/each}}",
            "{{#each todos}}{{title}}{{/each}}",
            "{{#each todos}}{{id}}{{/each}}",
            "{{#each todos}}{{id}}{{title}}{{page_title}}{{/each}}",
            "{{title}}{{#each todos}}{{id}}{{title}}{{/each}}",
            "{{#each todos}}{{id}}{{title}}{{/each}}{{unknown}}",
            "{{#each todos}}{{id}}{{title}}{{/each}}{{page_title",
        ];
        for source in cases {
            assert!(
                matches!(
                    PageTemplate::compile(source),
                    Err(RenderError::InvalidTemplate(_))
                ),
                "{source:?} should not compile"
            );
        }
    }
}
