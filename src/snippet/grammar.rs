//! Snippet grammar: how layouts are written as ESPHome text and read back.
//!
//! Everything both directions must agree on lives here: section names, the
//! page dispatch tokens, marker tags and field names, value escaping, and the
//! draw call emitted per widget kind. The generator only renders what this
//! module describes and the parser only recognizes what it describes.
//!
//! # Dispatch
//!
//! ```text
//! switch (id(display_page)) {
//!   case 0: {
//!     // @page id="p0" title="Home"
//!     // @widget id="w0" kind=value data_point="sensor.temperature" x=10 y=10 width=100 height=30 format="%.1f"
//!     it.printf(10, 10, id(font_20), COLOR_ON, "%.1f", id(sensor_temperature).state);
//!     break;
//!   }
//! }
//! ```
//!
//! # Markers
//!
//! A marker is a line comment whose first token is `@device`, `@page` or
//! `@widget`, followed by `key=value` fields separated by spaces. Values are
//! bare tokens or double-quoted strings using [`escape`].

use crate::models::style::{DEFAULT_GAUGE_MAX, DEFAULT_GAUGE_MIN};
use crate::models::{Device, Page, RgbColor, Style, StyleKey, Widget, WidgetKind};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Global holding the index of the page currently shown.
pub const PAGE_GLOBAL_ID: &str = "display_page";
/// Top-level section holding the rendering routine.
pub const DISPLAY_SECTION: &str = "display";
/// Top-level section declaring the page global.
pub const GLOBALS_SECTION: &str = "globals";
/// Key of the rendering routine inside a display entry.
pub const LAMBDA_KEY: &str = "lambda";
/// ESPHome display platform of the target panel.
pub const DISPLAY_PLATFORM: &str = "waveshare_epaper";
/// ESPHome id given to the display.
pub const DISPLAY_ID: &str = "epaper_display";
/// Panel model (800x480).
pub const DISPLAY_MODEL: &str = "7.50inv2";
/// Time component read by clock widgets.
pub const TIME_SOURCE_ID: &str = "homeassistant_time";
/// Font size used when a widget does not set one.
pub const DEFAULT_FONT_SIZE: u16 = 20;
/// Format used by value widgets without a format.
pub const DEFAULT_VALUE_FORMAT: &str = "%.1f";
/// Format used by clock widgets without a format.
pub const DEFAULT_CLOCK_FORMAT: &str = "%H:%M";
/// Color expression used when a widget does not set a color.
pub const DEFAULT_COLOR: &str = "COLOR_ON";

/// Top-level sections owned by the base configuration.
///
/// The generator never writes them; the parser ignores them.
pub const FOREIGN_SECTIONS: &[&str] = &[
    "wifi",
    "api",
    "ota",
    "logger",
    "captive_portal",
    "web_server",
];

/// Indentation of lambda lines below `lambda: |-`.
pub const LAMBDA_INDENT: usize = 6;
/// Additional indentation per nesting level inside the lambda.
pub const LAMBDA_STEP: usize = 2;

/// Opening of the page dispatch, outside comments and string literals.
pub static DISPATCH_HEAD: LazyLock<regex::bytes::Regex> = LazyLock::new(|| {
    regex::bytes::Regex::new(&format!(
        r"\bswitch\s*\(\s*id\s*\(\s*{}\s*\)\s*\)\s*\{{",
        regex::escape(PAGE_GLOBAL_ID)
    ))
    .expect("dispatch pattern is valid")
});

/// `case N:` or `default:` label inside the dispatch.
pub static BRANCH_LABEL: LazyLock<regex::bytes::Regex> = LazyLock::new(|| {
    regex::bytes::Regex::new(r"\b(?:case\s+(\d+)|default)\s*:").expect("label pattern is valid")
});

/// Marker tag at the start of a comment body.
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*@(device|page|widget)\b(.*)$").expect("marker pattern is valid")
});

/// Hex codepoint accepted as an icon glyph (e.g. MDI `F0594`).
static ICON_CODEPOINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{4,6}$").expect("icon pattern is valid"));

/// First line of the dispatch.
#[must_use]
pub fn dispatch_open() -> String {
    format!("switch (id({PAGE_GLOBAL_ID})) {{")
}

/// First line of a page branch.
#[must_use]
pub fn branch_open(ordinal: u32) -> String {
    format!("case {ordinal}: {{")
}

/// Kind of marker comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerTag {
    /// Device identity, once per lambda
    Device,
    /// Page identity, once per branch
    Page,
    /// One widget, followed by its draw call
    Widget,
}

impl MarkerTag {
    /// Tag text without the leading `@`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::Page => "page",
            Self::Widget => "widget",
        }
    }
}

impl fmt::Display for MarkerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl FromStr for MarkerTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "device" => Ok(Self::Device),
            "page" => Ok(Self::Page),
            "widget" => Ok(Self::Widget),
            other => Err(format!("unknown marker tag '@{other}'")),
        }
    }
}

/// Builds a marker comment line in canonical field order.
struct MarkerWriter {
    line: String,
}

impl MarkerWriter {
    fn new(tag: MarkerTag) -> Self {
        Self {
            line: format!("// {tag}"),
        }
    }

    fn quoted(mut self, key: &str, value: &str) -> Self {
        self.line.push_str(&format!(" {key}=\"{}\"", escape(value)));
        self
    }

    fn bare(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.line.push_str(&format!(" {key}={value}"));
        self
    }

    fn finish(self) -> String {
        self.line
    }
}

/// A decoded marker: tag plus unescaped field values in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Marker kind
    pub tag: MarkerTag,
    fields: Vec<(String, String)>,
}

impl Marker {
    /// Recognizes a marker in the body of a line comment (text after `//`).
    ///
    /// Returns `None` for ordinary comments, `Some(Err(..))` for a marker
    /// whose fields cannot be read.
    pub fn parse(comment_body: &str) -> Option<Result<Self, String>> {
        let captures = MARKER.captures(comment_body)?;
        let tag = match captures[1].parse::<MarkerTag>() {
            Ok(tag) => tag,
            Err(e) => return Some(Err(e)),
        };
        Some(parse_fields(&captures[2]).map(|fields| Self { tag, fields }))
    }

    /// Looks up a field value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn into_fields(self) -> FieldSet {
        FieldSet {
            tag: self.tag,
            fields: self.fields,
        }
    }
}

/// Consumes marker fields; leftovers are reported as unknown.
struct FieldSet {
    tag: MarkerTag,
    fields: Vec<(String, String)>,
}

impl FieldSet {
    fn optional(&mut self, key: &str) -> Option<String> {
        let index = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(index).1)
    }

    fn required(&mut self, key: &str) -> Result<String, String> {
        self.optional(key)
            .ok_or_else(|| format!("{} marker is missing field '{key}'", self.tag))
    }

    fn required_number<T: FromStr>(&mut self, key: &str) -> Result<T, String> {
        let raw = self.required(key)?;
        parse_number(key, &raw)
    }

    fn finish(self) -> Result<(), String> {
        match self.fields.first() {
            Some((key, _)) => Err(format!("{} marker has unknown field '{key}'", self.tag)),
            None => Ok(()),
        }
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("field '{key}' is not a valid number: {raw:?}"))
}

/// Splits `key=value key="quoted value"` into unescaped pairs.
fn parse_fields(input: &str) -> Result<Vec<(String, String)>, String> {
    let mut fields: Vec<(String, String)> = Vec::new();
    let mut chars = input.char_indices().peekable();

    loop {
        while chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
        let Some(&(start, _)) = chars.peek() else {
            break;
        };

        let mut end = start;
        while let Some((i, c)) = chars.next_if(|&(_, c)| c.is_ascii_alphanumeric() || c == '_') {
            end = i + c.len_utf8();
        }
        let key = &input[start..end];
        if key.is_empty() {
            return Err(format!("expected a field name at {:?}", &input[start..]));
        }
        if chars.next_if(|&(_, c)| c == '=').is_none() {
            return Err(format!("expected '=' after field '{key}'"));
        }

        let value = if chars.next_if(|&(_, c)| c == '"').is_some() {
            let mut raw = String::new();
            let mut closed = false;
            while let Some((_, c)) = chars.next() {
                match c {
                    '\\' => {
                        raw.push('\\');
                        match chars.next() {
                            Some((_, escaped)) => raw.push(escaped),
                            None => break,
                        }
                    }
                    '"' => {
                        closed = true;
                        break;
                    }
                    _ => raw.push(c),
                }
            }
            if !closed {
                return Err(format!("unterminated string in field '{key}'"));
            }
            unescape(&raw).map_err(|e| format!("field '{key}': {e}"))?
        } else {
            let mut value = String::new();
            while let Some((_, c)) = chars.next_if(|&(_, c)| !c.is_whitespace()) {
                if c == '"' || c == '\\' {
                    return Err(format!("unexpected '{c}' in unquoted field '{key}'"));
                }
                value.push(c);
            }
            if value.is_empty() {
                return Err(format!("missing value for field '{key}'"));
            }
            value
        };

        if let Some(&(_, c)) = chars.peek() {
            if !c.is_whitespace() {
                return Err(format!("unexpected '{c}' after field '{key}'"));
            }
        }
        if fields.iter().any(|(k, _)| k == key) {
            return Err(format!("field '{key}' appears more than once"));
        }
        fields.push((key.to_string(), value));
    }

    Ok(fields)
}

/// Characters written as octal byte escapes.
///
/// Covers control characters and everything YAML treats as a line break or
/// refuses as content.
fn needs_octal(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{FEFF}' | '\u{FFFE}' | '\u{FFFF}')
}

/// Escapes free text for a quoted marker value or C++ string literal.
///
/// The result never contains a line break, an unescaped quote, or a trailing
/// backslash, so it cannot end a comment, a string, or the YAML block early.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if needs_octal(c) => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("\\{byte:03o}"));
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Reverses [`escape`].
pub fn unescape(raw: &str) -> Result<String, String> {
    let mut bytes = Vec::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        match chars.next() {
            Some('\\') => bytes.push(b'\\'),
            Some('"') => bytes.push(b'"'),
            Some('n') => bytes.push(b'\n'),
            Some('r') => bytes.push(b'\r'),
            Some('t') => bytes.push(b'\t'),
            Some(first @ '0'..='7') => {
                let mut value = first.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.next_if(|d| d.is_digit(8)) {
                        Some(digit) => value = value * 8 + digit.to_digit(8).unwrap_or(0),
                        None => break,
                    }
                }
                let byte = u8::try_from(value)
                    .map_err(|_| format!("octal escape \\{value:o} out of range"))?;
                bytes.push(byte);
            }
            Some(other) => return Err(format!("unknown escape '\\{other}'")),
            None => return Err("dangling backslash".to_string()),
        }
    }

    String::from_utf8(bytes).map_err(|_| "escaped bytes are not valid UTF-8".to_string())
}

/// Quotes text as a C++ string literal.
#[must_use]
pub fn c_string(value: &str) -> String {
    format!("\"{}\"", escape(value))
}

/// Maps a data point reference to an ESPHome component id.
///
/// `sensor.living_room.temp` becomes `sensor_living_room_temp`.
#[must_use]
pub fn esphome_id(data_point: &str) -> String {
    let mut id: String = data_point
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, '_');
    }
    id
}

/// `@device` marker line.
#[must_use]
pub fn device_marker(device: &Device) -> String {
    MarkerWriter::new(MarkerTag::Device)
        .quoted("id", &device.id)
        .quoted("name", &device.name)
        .finish()
}

/// `@page` marker line.
#[must_use]
pub fn page_marker(page: &Page) -> String {
    MarkerWriter::new(MarkerTag::Page)
        .quoted("id", &page.id)
        .quoted("title", &page.title)
        .finish()
}

/// `@widget` marker line.
///
/// Field order: `id kind data_point x y width height`, then style keys in
/// [`StyleKey::ALL`] order.
#[must_use]
pub fn widget_marker(widget: &Widget) -> String {
    let mut writer = MarkerWriter::new(MarkerTag::Widget)
        .quoted("id", &widget.id)
        .bare("kind", widget.kind);
    if let Some(data_point) = &widget.data_point {
        writer = writer.quoted("data_point", data_point);
    }
    writer = writer
        .bare("x", widget.x)
        .bare("y", widget.y)
        .bare("width", widget.width)
        .bare("height", widget.height);

    let style = &widget.style;
    for key in style.keys() {
        let name = key.as_str();
        writer = match key {
            StyleKey::Text => writer.quoted(name, style.text.as_deref().unwrap_or_default()),
            StyleKey::Format => writer.quoted(name, style.format.as_deref().unwrap_or_default()),
            StyleKey::Icon => writer.quoted(name, style.icon.as_deref().unwrap_or_default()),
            StyleKey::FontSize => writer.bare(name, style.font_size.unwrap_or_default()),
            StyleKey::Color => writer.quoted(name, &style.color.map(|c| c.to_hex()).unwrap_or_default()),
            StyleKey::Min => writer.bare(name, style.min.unwrap_or_default()),
            StyleKey::Max => writer.bare(name, style.max.unwrap_or_default()),
        };
    }
    writer.finish()
}

/// Identity carried by a `@device` marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Device id the snippet was exported from
    pub id: Option<String>,
    /// Device display name
    pub name: Option<String>,
}

/// Reads a `@device` marker.
pub fn decode_device(marker: Marker) -> Result<DeviceIdentity, String> {
    let mut fields = marker.into_fields();
    let identity = DeviceIdentity {
        id: fields.optional("id"),
        name: fields.optional("name"),
    };
    fields.finish()?;
    Ok(identity)
}

/// Reads a `@page` marker into `(id, title)`.
pub fn decode_page(marker: Marker) -> Result<(String, String), String> {
    let mut fields = marker.into_fields();
    let id = fields.required("id")?;
    if id.trim().is_empty() {
        return Err("@page marker has an empty id".to_string());
    }
    let title = fields.optional("title").unwrap_or_default();
    fields.finish()?;
    Ok((id, title))
}

/// Reads a `@widget` marker.
pub fn decode_widget(marker: Marker) -> Result<Widget, String> {
    let mut fields = marker.into_fields();

    let id = fields.required("id")?;
    let kind = fields
        .required("kind")?
        .parse::<WidgetKind>()
        .map_err(|e| e.to_string())?;
    let data_point = fields.optional("data_point");
    let x = fields.required_number("x")?;
    let y = fields.required_number("y")?;
    let width = fields.required_number("width")?;
    let height = fields.required_number("height")?;

    let mut style = Style::default();
    for key in StyleKey::ALL {
        if let Some(raw) = fields.optional(key.as_str()) {
            decode_style_value(&mut style, key, &raw)?;
        }
    }
    fields.finish()?;

    Ok(Widget {
        id,
        kind,
        data_point,
        x,
        y,
        width,
        height,
        style,
    })
}

fn decode_style_value(style: &mut Style, key: StyleKey, raw: &str) -> Result<(), String> {
    let name = key.as_str();
    match key {
        StyleKey::Text => style.text = Some(raw.to_string()),
        StyleKey::Format => style.format = Some(raw.to_string()),
        StyleKey::Icon => style.icon = Some(raw.to_string()),
        StyleKey::FontSize => style.font_size = Some(parse_number(name, raw)?),
        StyleKey::Color => {
            style.color = Some(
                RgbColor::from_hex(raw).map_err(|e| format!("field '{name}': {e}"))?,
            );
        }
        StyleKey::Min => style.min = Some(parse_number(name, raw)?),
        StyleKey::Max => style.max = Some(parse_number(name, raw)?),
    }
    Ok(())
}

/// Draw call lines for a widget.
#[must_use]
pub fn draw_calls(widget: &Widget) -> Vec<String> {
    let Widget {
        x,
        y,
        width,
        height,
        ..
    } = *widget;
    let style = &widget.style;
    let color = style
        .color
        .map_or_else(|| DEFAULT_COLOR.to_string(), |c| c.to_esphome());
    let size = style.font_size.unwrap_or(DEFAULT_FONT_SIZE);
    let source = format!(
        "id({})",
        esphome_id(widget.data_point.as_deref().unwrap_or_default())
    );

    match widget.kind {
        WidgetKind::Text => vec![format!(
            "it.print({x}, {y}, id(font_{size}), {color}, {});",
            c_string(style.text.as_deref().unwrap_or_default())
        )],
        WidgetKind::Value => vec![format!(
            "it.printf({x}, {y}, id(font_{size}), {color}, {}, {source}.state);",
            c_string(style.format.as_deref().unwrap_or(DEFAULT_VALUE_FORMAT))
        )],
        WidgetKind::Icon => vec![format!(
            "it.print({x}, {y}, id(icon_font_{size}), {color}, {});",
            icon_literal(style.icon.as_deref().unwrap_or_default())
        )],
        WidgetKind::Gauge => {
            let min = style.min.unwrap_or(DEFAULT_GAUGE_MIN);
            let max = style.max.unwrap_or(DEFAULT_GAUGE_MAX);
            let span = i64::from(max) - i64::from(min);
            vec![
                format!("it.rectangle({x}, {y}, {width}, {height}, {color});"),
                format!(
                    "it.filled_rectangle({x}, {y}, (int) ({width} * std::clamp(({source}.state - ({min})) / {span}.0f, 0.0f, 1.0f)), {height}, {color});"
                ),
            ]
        }
        WidgetKind::Clock => vec![format!(
            "it.strftime({x}, {y}, id(font_{size}), {color}, {}, id({TIME_SOURCE_ID}).now());",
            c_string(style.format.as_deref().unwrap_or(DEFAULT_CLOCK_FORMAT))
        )],
    }
}

fn icon_literal(icon: &str) -> String {
    if ICON_CODEPOINT.is_match(icon) {
        if let Some(glyph) = u32::from_str_radix(icon, 16).ok().and_then(char::from_u32) {
            return format!("\"\\U{:08X}\"", u32::from(glyph));
        }
    }
    c_string(icon)
}
