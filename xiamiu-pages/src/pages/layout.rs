//! Shared page shell and HTML escaping

use std::fmt::Write;

/// Escape text for use in HTML element content and quoted attributes
///
/// # Examples
/// ```
/// use xiamiu_pages::pages::layout::html_escape;
///
/// assert_eq!(html_escape("<b>\"R&B\"</b>"), "&lt;b&gt;&quot;R&amp;B&quot;&lt;/b&gt;");
/// ```
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a value for use inside a path segment of a link
pub fn path_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                escaped.push(byte as char)
            }
            _ => {
                let _ = write!(escaped, "%{:02X}", byte);
            }
        }
    }
    escaped
}

/// Star glyphs for a 1-5 value
pub fn star_glyphs(stars: i64) -> String {
    let filled = stars.clamp(0, 5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// `<img>` tag for an optional picture address (escaped)
pub fn picture(pic_address: Option<&str>, alt: &str) -> String {
    match pic_address {
        Some(src) if !src.is_empty() => format!(
            r#"<img class="cover" src="{}" alt="{}">"#,
            html_escape(src),
            html_escape(alt)
        ),
        _ => r#"<div class="cover placeholder"></div>"#.to_string(),
    }
}

/// Wrap page content in the common shell
///
/// `title` is escaped here; `body` must already be safe HTML.
pub fn shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - 虾米音乐</title>
    <style>
        body {{
            font-family: system-ui, -apple-system, "PingFang SC", sans-serif;
            max-width: 960px;
            margin: 0 auto;
            padding: 20px;
            color: #333;
            line-height: 1.6;
        }}
        header {{
            display: flex;
            justify-content: space-between;
            align-items: center;
            border-bottom: 2px solid #ff6a00;
            margin-bottom: 20px;
        }}
        header a {{
            color: #ff6a00;
            text-decoration: none;
            margin-left: 12px;
        }}
        .cover {{
            width: 200px;
            height: 200px;
            object-fit: cover;
            float: left;
            margin: 0 20px 20px 0;
        }}
        .placeholder {{
            background: #eee;
        }}
        .hot-comment {{
            clear: both;
            background: #fff8f0;
            border-left: 4px solid #ff6a00;
            padding: 8px 12px;
        }}
        table {{
            width: 100%;
            border-collapse: collapse;
        }}
        td, th {{
            text-align: left;
            padding: 4px 8px;
            border-bottom: 1px solid #eee;
        }}
        .stars {{
            color: #ff6a00;
        }}
        .empty {{
            color: #999;
        }}
    </style>
</head>
<body>
    <header>
        <h2>虾米音乐</h2>
        <nav><a href="/">首页</a><a href="/search/">搜索</a></nav>
    </header>
    <main>
{body}
    </main>
</body>
</html>
"#,
        title = html_escape(title),
        body = body
    )
}

/// Hot-comment block, or nothing when the entity has no comments
pub fn hot_comment(comment: Option<&crate::procedures::HotComment>) -> String {
    match comment {
        Some(c) => format!(
            r#"<section class="hot-comment">
    <p>{}</p>
    <small>{} · {} · 👍 {}</small>
</section>"#,
            html_escape(&c.comment),
            html_escape(&c.user_name),
            c.review_date,
            c.num_like
        ),
        None => r#"<p class="empty">暂无评论</p>"#.to_string(),
    }
}

/// Body of the 404 page
pub fn not_found_body(what: &str) -> String {
    format!(
        r#"<h1>404</h1>
<p>{} not found.</p>
<p><a href="/">返回首页</a></p>"#,
        html_escape(what)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape_leaves_plain_text() {
        assert_eq!(html_escape("七里香"), "七里香");
        assert_eq!(html_escape("it's"), "it&#39;s");
    }

    #[test]
    fn test_path_escape() {
        assert_eq!(path_escape("0AM12f06b"), "0AM12f06b");
        assert_eq!(path_escape("a/b c"), "a%2Fb%20c");
        assert_eq!(path_escape("晴"), "%E6%99%B4");
    }

    #[test]
    fn test_star_glyphs_clamped() {
        assert_eq!(star_glyphs(3), "★★★☆☆");
        assert_eq!(star_glyphs(9), "★★★★★");
    }

    #[test]
    fn test_shell_escapes_title_only() {
        let html = shell("<x>", "<p>ok</p>");
        assert!(html.contains("<title>&lt;x&gt; - 虾米音乐</title>"));
        assert!(html.contains("<p>ok</p>"));
    }

    #[test]
    fn test_picture_escapes_attributes() {
        let html = picture(Some("http://x/\"onerror=\"1"), "a");
        assert!(html.contains("&quot;onerror=&quot;1"));
        assert!(picture(None, "a").contains("placeholder"));
    }
}
