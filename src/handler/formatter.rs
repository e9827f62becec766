//! Response body rendering
//!
//! Turns a [`WordCountResult`] into the JSON object or the HTML upload page.

use crate::logger;
use crate::upload::WordCountResult;

/// Render `result` in the representation the client asked for
pub fn format(result: &WordCountResult, wants_json: bool) -> String {
    if wants_json {
        to_json(result)
    } else {
        render_page(Some(result))
    }
}

pub fn to_json(result: &WordCountResult) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to serialize word count result: {e}"));
        r#"{"error":"Internal server error"}"#.to_string()
    })
}

/// Upload page, with a banner when there is a result to show
pub fn render_page(result: Option<&WordCountResult>) -> String {
    let banner = match result {
        None => String::new(),
        Some(WordCountResult::Error { error_msg }) => format!(
            r#"    <div class="error">{}</div>
"#,
            escape_html(error_msg)
        ),
        Some(WordCountResult::Success {
            word_count,
            file_name,
        }) => format!(
            r#"    <div class="success">File {} has {word_count} words in it</div>
"#,
            escape_html(file_name)
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Word count</title>
    <style>
        .error {{ color: #b00020; background-color: #f6f6f6; padding: 8px; }}
        .success {{ color: #1b5e20; background-color: #f6f6f6; padding: 8px; }}
    </style>
</head>
<body>
{banner}    <h2>Word count upload</h2>
    <p>Plain text files only.</p>
    <form action="/" method="post" enctype="multipart/form-data">
        <input type="file" name="destfile" accept="text/plain">
        <input type="submit" value="Count words">
    </form>
    <p>From a shell: <code>curl -F "destfile=@notes.txt" -H "Accept: application/json" http://localhost:5000/</code></p>
</body>
</html>
"#
    )
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
