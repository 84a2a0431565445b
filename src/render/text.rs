use anyhow::{Result, anyhow};

/// Terminal rendering of a page, for `run --text`.
pub fn render_text(html: &str, width: usize) -> Result<String> {
    html2text::from_read(html.as_bytes(), width).map_err(|e| anyhow!("rendering text: {e}"))
}
