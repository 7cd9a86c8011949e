//! Markdown rendering boundary.
//!
//! The renderer never sees wikilink syntax; [`crate::links::extract`] resolves
//! references to plain inline links first. Raw HTML embedded in source text is
//! passed through unescaped, so rendered output is only ever handed out as
//! [`Markup`] to keep that trust boundary visible in the type system.

use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};

use crate::error::WikiError;

/// Rendered HTML produced by the markdown engine.
///
/// Treated as a derived cache of a document's raw content, never hand-edited.
/// Because the renderer runs in raw-passthrough mode the contents are trusted
/// markup, not escapable plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markup(String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Markup> for String {
    fn from(markup: Markup) -> String {
        markup.0
    }
}

/// Markdown options, enabled explicitly rather than via `Options::all()` for
/// reproducibility across pulldown-cmark upgrades.
pub fn markdown_options() -> Options {
    let mut md_options = Options::empty();
    md_options.insert(Options::ENABLE_GFM);
    md_options.insert(Options::ENABLE_STRIKETHROUGH);
    md_options.insert(Options::ENABLE_TABLES);
    md_options.insert(Options::ENABLE_TASKLISTS);
    // `# Heading {.foo}` style attributes
    md_options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    md_options
}

/// Convert markdown text to trusted HTML.
///
/// Configured with the GFM-style extensions above, triple-colon fenced
/// containers, and raw HTML passthrough.
pub fn render(text: &str) -> Result<Markup, WikiError> {
    let preprocessed = expand_fenced_containers(text);
    let parser = Parser::new_ext(&preprocessed, markdown_options());
    let mut out = String::with_capacity(preprocessed.len() * 2);
    html::push_html(&mut out, parser);
    Ok(Markup(out))
}

/// Expand `::: name` / `:::` container fences into raw div markup.
///
/// pulldown-cmark has no fenced-container extension, so the fences are
/// rewritten to raw HTML before parsing and ride through on the renderer's
/// passthrough mode. Lines inside backtick code fences are left alone.
fn expand_fenced_containers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_code_fence = false;
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") {
            in_code_fence = !in_code_fence;
            out.push_str(line);
        } else if !in_code_fence && trimmed.starts_with(":::") {
            let class = trimmed.trim_start_matches(':').trim();
            if class.is_empty() {
                out.push_str("</div>");
            } else {
                out.push_str(&format!("<div class=\"{class}\">"));
            }
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}
