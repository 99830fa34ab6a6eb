//! HTML overlay and JSON payload rendering.
//!
//! Every caller-controlled value is escaped for the context it lands in:
//! [`escape_html`] for element text and attribute values, and
//! [`script_string`] for string literals inside the inline script.

use std::fmt::Write;

use crate::Result;
use crate::locale::NumberFormatter;
use crate::models::GoldData;

/// Longest refresh interval whose millisecond delay still fits the
/// signed 32-bit range browsers use for `setInterval`.
pub const MAX_INTERVAL_SECS: u32 = (i32::MAX as u32) / 1000;

const STYLE: &str = r#"<style>
    .Row {
        display: table;
    }
    .Column {
        display: table-cell;
        padding-left: 5px;
        padding-right: 5px;
        text-align: center;
        vertical-align: middle;
    }
    .Text {
        font-size: 2em;
        color: #FFD700;
        -webkit-text-stroke: 1px white;
        font-family: "Lucida Console", "Courier New", monospace;
        font-weight: bold;
    }
    body {
        background-color: transparent;
    }
    </style>"#;

/// Query parameters the overlay script sends on every refresh.
///
/// They mirror the parameters of the initial render so each poll
/// resolves against the same key, item and fallback target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollParams {
    pub apikey: String,
    pub item: Option<String>,
    pub target: u64,
}

impl PollParams {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("apikey", self.apikey.clone())];
        if let Some(item) = &self.item {
            pairs.push(("item", item.clone()));
        }
        pairs.push(("target", self.target.to_string()));
        pairs
    }
}

/// Everything needed to render one overlay page.
#[derive(Debug, Clone)]
pub struct Overlay {
    /// Text shown before the amounts.
    pub label: String,
    /// Current balance in gold.
    pub current: u64,
    /// Target in gold.
    pub target: u64,
    /// Icon shown in a second column when an item was requested.
    pub icon_url: Option<String>,
    pub poll: PollParams,
    pub interval_secs: u32,
}

impl Overlay {
    /// Renders the full HTML document.
    ///
    /// `data_path` is the path of the JSON endpoint the refresh script
    /// polls, including any proxy prefix.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Json`](crate::OverlayError::Json) if a
    /// script literal cannot be encoded.
    pub fn render_html(&self, formatter: &NumberFormatter, data_path: &str) -> Result<String> {
        let text = format!(
            "{} {}/{}",
            self.label,
            formatter.format(self.current),
            formatter.format(self.target)
        );

        let mut body = String::from("<div class=\"Row\">\n");
        let _ = writeln!(
            body,
            "<div class=\"Column\"><p class=\"Text\" id=\"text\">{}</p></div>",
            escape_html(&text)
        );
        if let Some(icon) = &self.icon_url {
            let _ = writeln!(
                body,
                "<div class=\"Column\"><img src=\"{}\" alt=\"\" /></div>",
                escape_html(icon)
            );
        }
        body.push_str("</div>");

        let script = self.render_script(data_path)?;

        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n{STYLE}\n{script}\n\
             <title>Gold overlay</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
        ))
    }

    fn render_script(&self, data_path: &str) -> Result<String> {
        let mut params = String::new();
        for (key, value) in self.poll.pairs() {
            let _ = write!(params, "{key}: {}, ", script_string(&value)?);
        }
        let params = params.trim_end_matches([',', ' ']);

        let url = script_string(&format!("{data_path}?"))?;
        let label = script_string(&self.label)?;
        let interval_ms = u64::from(self.interval_secs.clamp(1, MAX_INTERVAL_SECS)) * 1000;

        Ok(format!(
            r#"<script>
    const text = {label};
    const params = new URLSearchParams({{ {params} }});
    async function updateText() {{
        const response = await fetch({url} + params);
        if (!response.ok) {{
            return;
        }}
        const data = await response.json();
        document.getElementById("text").innerText = text + " " + data.current + "/" + data.target;
    }}
    setInterval(updateText, {interval_ms});
    </script>"#
        ))
    }
}

/// Builds the JSON refresh payload.
pub fn gold_data(current: u64, target: u64, formatter: &NumberFormatter) -> GoldData {
    GoldData {
        current: formatter.format(current),
        target: formatter.format(target),
    }
}

/// Escapes text for an HTML element body or a quoted attribute value.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Encodes `raw` as a quoted JavaScript string literal that is safe to
/// embed in an inline `<script>` element.
///
/// # Errors
///
/// Returns [`OverlayError::Json`](crate::OverlayError::Json) if encoding fails.
pub fn script_string(raw: &str) -> Result<String> {
    let json = serde_json::to_string(raw)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    Ok(out)
}
