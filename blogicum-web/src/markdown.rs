use pulldown_cmark::{html, Options, Parser};
use std::collections::HashMap;
use tera::Value;

/// Render markdown to sanitized HTML
pub fn render_markdown(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(input, options);
    let mut raw_html = String::new();
    html::push_html(&mut raw_html, parser);

    // Strip anything that should not come from user-authored text
    ammonia::clean(&raw_html)
}

/// Tera filter: `{{ post.text | markdown | safe }}`
pub fn markdown_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let input = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("markdown filter expects a string"))?;

    Ok(Value::String(render_markdown(input)))
}
