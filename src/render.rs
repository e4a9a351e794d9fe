use std::path::PathBuf;

use crate::error::SearchError;
use crate::models::ResultRecord;

pub const RESULTS_TEMPLATE: &str = "results.html";

const NO_RESULTS: &str = r#"<p class="no-results">No GIFs found for this search.</p>"#;

/// Fills the results page template. The template is read on every render so
/// edits show up without a restart.
pub struct Renderer {
    templates_dir: PathBuf,
}

impl Renderer {
    pub fn new(templates_dir: PathBuf) -> Self {
        Self { templates_dir }
    }

    pub async fn render(&self, record: &ResultRecord) -> Result<String, SearchError> {
        let path = self.templates_dir.join(RESULTS_TEMPLATE);
        let template = tokio::fs::read_to_string(&path)
            .await
            .map_err(SearchError::Template)?;

        Ok(render_page(&template, record))
    }
}

pub fn render_page(template: &str, record: &ResultRecord) -> String {
    let images = image_block(record);

    fill_placeholders(template, |name| match name {
        "title" => Some(escape_html(&record.title)),
        "subtitle" => Some(escape_html(&record.subtitle)),
        "tags" => Some(escape_html(&record.tags)),
        "images" => Some(images.clone()),
        _ => None,
    })
}

fn image_block(record: &ResultRecord) -> String {
    if record.images.is_empty() {
        return NO_RESULTS.to_string();
    }

    let alt = escape_html(&record.title);
    record
        .images
        .iter()
        .map(|url| {
            format!(
                r#"<img src="{}" alt="{}" loading="lazy">"#,
                escape_html(url),
                alt
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace every `{{name}}` token for which `value` returns something, in a
/// single left-to-right pass. Substituted text is not scanned again and
/// unknown tokens are kept as they are.
fn fill_placeholders<F>(template: &str, value: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match after_open.find("}}") {
            Some(end) => {
                let name = &after_open[..end];
                match value(name.trim()) {
                    Some(v) => out.push_str(&v),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after_open[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
