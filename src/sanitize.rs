//! Neutralization of script and style blocks in article bodies
//!
//! This is a textual pass over the literal tag openings and closings, not an
//! HTML sanitizer: attributes, images and inline styles pass through.

const REPLACEMENTS: &[(&str, &str)] = &[
    ("<script", "&lt;script"),
    ("</script>", "&lt;/script&gt;"),
    ("<style", "&lt;style"),
    ("</style>", "&lt;/style&gt;"),
];

/// Escape `<script`/`<style` blocks so the browser renders them as text
pub fn neutralize_html(html: &str) -> String {
    REPLACEMENTS.iter().fold(html.to_string(), |acc, &(from, to)| acc.replace(from, to))
}
