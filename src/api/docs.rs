//! HTML landing page describing the API

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>URL Shortener API</title>
  <style>
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; line-height: 1.6; }
    code { background: #f4f4f4; padding: 2px 5px; border-radius: 3px; }
    pre { background: #f4f4f4; padding: 15px; border-radius: 5px; overflow-x: auto; }
    .endpoint { margin: 20px 0; padding: 15px; border-left: 4px solid #007acc; background: #f8f9fa; }
  </style>
</head>
<body>
  <h1>&#128279; URL Shortener API</h1>
  <p>Short links with click statistics, plus stateless encrypted links.</p>

  <div class="endpoint">
    <h3>POST /shorten</h3>
    <p>Create a short URL from a long URL. Requires <code>Authorization: Bearer &lt;ID token&gt;</code>.</p>
    <pre>
curl -X POST {{ORIGIN}}/shorten \
  -H "Authorization: Bearer $TOKEN" \
  -H "Content-Type: application/json" \
  -d '{"url": "https://example.com/very/long/url"}'
    </pre>
    <p><strong>Response:</strong></p>
    <pre>{"shortUrl": "{{ORIGIN}}/abc123", "shortCode": "abc123", "originalUrl": "https://example.com/very/long/url"}</pre>
  </div>

  <div class="endpoint">
    <h3>GET /:code</h3>
    <p>Redirect to the original URL using the short code.</p>
    <pre>curl -L {{ORIGIN}}/abc123</pre>
    <p>Returns a 302 redirect to the original URL.</p>
  </div>

  <div class="endpoint">
    <h3>GET /stats/:code</h3>
    <p>Get statistics for a short URL.</p>
    <pre>curl {{ORIGIN}}/stats/abc123</pre>
    <p><strong>Response:</strong></p>
    <pre>{"shortCode": "abc123", "originalUrl": "https://example.com/very/long/url", "clicks": 5, "createdAt": "2024-01-01T12:00:00.000Z", "lastAccessed": null}</pre>
  </div>

  <div class="endpoint">
    <h3>POST /encrypt</h3>
    <p>Turn a URL into an encrypted link. Nothing is stored. Requires a bearer token.</p>
    <pre>
curl -X POST {{ORIGIN}}/encrypt \
  -H "Authorization: Bearer $TOKEN" \
  -H "Content-Type: application/json" \
  -d '{"url": "https://example.com"}'
    </pre>
    <p><strong>Response:</strong></p>
    <pre>{"code": "...", "encryptedUrl": "{{ORIGIN}}/e/..."}</pre>
  </div>

  <div class="endpoint">
    <h3>GET /e/:code</h3>
    <p>Decrypt the code and redirect (302) to the original URL.</p>
  </div>

  <div class="endpoint">
    <h3>POST /decrypt</h3>
    <p>Body <code>{"code": "..."}</code> or <code>{"encryptedUrl": "{{ORIGIN}}/e/..."}</code>, or query <code>?code=</code>.</p>
    <pre>{"url": "https://example.com"}</pre>
  </div>
{{COUNT}}
</body>
</html>
"#;

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Renders the page; the link count line only appears when known
pub fn render_docs(origin: &str, links_count: Option<u64>) -> String {
    let count = match links_count {
        Some(n) => format!(
            "\n  <p><small>Database contains {} short URLs.</small></p>\n",
            n
        ),
        None => String::new(),
    };
    TEMPLATE
        .replace("{{ORIGIN}}", &escape_html(origin))
        .replace("{{COUNT}}", &count)
}
