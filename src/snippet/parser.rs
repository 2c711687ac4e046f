//! Snippet import: reads ESPHome YAML text back into a [`Device`].
//!
//! Import tolerates hand edits. Whitespace, comments, foreign sections and
//! unknown draw calls are ignored; individual markers that cannot be read are
//! skipped and reported as [`ImportWarning`]s. Only a document without a
//! recognizable page dispatch fails as a whole.

use crate::models::validator::validate_widget;
use crate::models::{Device, Page, Widget};
use crate::snippet::error::{ImportWarning, SnippetError};
use crate::snippet::grammar::{
    self, Marker, MarkerTag, BRANCH_LABEL, DISPATCH_HEAD, DISPLAY_SECTION, FOREIGN_SECTIONS,
    LAMBDA_KEY,
};
use crate::snippet::lexer::LambdaSource;
use serde_yml::Value;
use std::collections::HashSet;
use std::ops::Range;
use tracing::{debug, warn};

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedLayout {
    /// Reconstructed device
    pub device: Device,
    /// Problems that were skipped over, in source order
    pub warnings: Vec<ImportWarning>,
}

/// One `case`/`default` branch of the page dispatch.
struct Branch {
    /// `None` for `default:`, otherwise the case number as written
    label: Option<Result<u32, String>>,
    /// Offset of the label
    start: usize,
    /// Offset just past the label's colon
    body_start: usize,
}

/// Parses snippet text into the device `device_id`.
///
/// The device id comes from the caller; an `@device` marker only supplies
/// the display name, and a differing id in it is reported as a warning.
///
/// # Errors
///
/// - [`SnippetError::InvalidYaml`] if the text is not a YAML mapping
/// - [`SnippetError::UnrecognizedDisplayStructure`] if no display lambda with
///   a page dispatch is found
/// - [`SnippetError::NoPagesFound`] if the dispatch has no `case` branches
/// - [`SnippetError::InvalidLayout`] if the assembled device is invalid
///   (only possible for an empty `device_id`)
pub fn parse_snippet(text: &str, device_id: &str) -> Result<ImportedLayout, SnippetError> {
    let document = load_document(text)?;
    let mut warnings = Vec::new();

    for section in FOREIGN_SECTIONS {
        if document.get(*section).is_some() {
            warnings.push(ImportWarning::new(format!(
                "ignored '{section}' section; it belongs to the base configuration"
            )));
        }
    }

    let lambdas = display_lambdas(&document)?;
    let Some((source, dispatch)) = lambdas.iter().find_map(|lambda| {
        let source = LambdaSource::new(lambda).starting_at(lambda_first_line(text, lambda));
        let head = DISPATCH_HEAD.find(source.masked())?.range();
        Some((source, head))
    }) else {
        return Err(SnippetError::unrecognized(format!(
            "no display lambda contains a page dispatch on id({})",
            grammar::PAGE_GLOBAL_ID
        )));
    };

    let open = dispatch.end - 1;
    let close = source.matching_brace(open).ok_or_else(|| {
        SnippetError::unrecognized(format!(
            "page dispatch on line {} is never closed",
            source.line_of(dispatch.start)
        ))
    })?;

    let branches = find_branches(&source, open + 1..close);
    if !branches.iter().any(|b| b.label.is_some()) {
        return Err(SnippetError::NoPagesFound {
            line: source.line_of(dispatch.start),
        });
    }

    let mut builder = DeviceBuilder::new(&source, warnings);
    for (index, branch) in branches.iter().enumerate() {
        let end = branches.get(index + 1).map_or(close, |next| next.start);
        builder.add_branch(branch, branch.body_start..end);
    }
    let pages = builder.pages;
    let mut warnings = builder.warnings;

    // Markers ahead of the first label belong to no branch
    let first_label = branches.first().map_or(close, |branch| branch.start);
    let identity = read_identity(&source, first_label..close + 1, &mut warnings);
    if let Some(exported_id) = identity.id.as_deref() {
        if exported_id != device_id {
            warnings.push(ImportWarning::new(format!(
                "snippet was exported from device '{exported_id}'; importing as '{device_id}'"
            )));
        }
    }

    let device = Device {
        id: device_id.to_string(),
        name: identity.name.unwrap_or_else(|| device_id.to_string()),
        pages,
    };

    let report = device.validate();
    if !report.is_valid() {
        return Err(SnippetError::InvalidLayout(report));
    }

    for warning in &warnings {
        warn!(device = %device.id, "{warning}");
    }
    debug!(
        device = %device.id,
        pages = device.pages.len(),
        widgets = device.widget_count(),
        warnings = warnings.len(),
        "imported display snippet"
    );

    Ok(ImportedLayout { device, warnings })
}

/// Loads the text as a YAML mapping.
fn load_document(text: &str) -> Result<Value, SnippetError> {
    let document: Value = serde_yml::from_str(text).map_err(|e| {
        let location = e.location();
        SnippetError::InvalidYaml {
            message: e.to_string(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
        }
    })?;

    if document.as_mapping().is_none() {
        return Err(SnippetError::InvalidYaml {
            message: "document root must be a mapping of configuration sections".to_string(),
            line: None,
            column: None,
        });
    }

    Ok(document)
}

/// Document line holding the first line of `lambda`.
///
/// Block scalars (`lambda: |-`) keep one document line per lambda line, so
/// lines map by offset. Lambdas written any other way are numbered from 1.
fn lambda_first_line(text: &str, lambda: &str) -> usize {
    let Some((skip, first)) = lambda
        .lines()
        .enumerate()
        .find(|(_, line)| !line.trim().is_empty())
    else {
        return 1;
    };
    let first = first.trim();
    let lines: Vec<&str> = text.lines().collect();

    lines
        .iter()
        .enumerate()
        .find_map(|(index, line)| {
            let value = line
                .trim_start()
                .trim_start_matches("- ")
                .trim_start()
                .strip_prefix(LAMBDA_KEY)?
                .strip_prefix(':')?
                .trim_start();
            let value = value.strip_prefix("!lambda").map_or(value, str::trim_start);
            if !value.starts_with('|') {
                return None;
            }
            let start = index + 1;
            (lines.get(start + skip)?.trim() == first).then_some(start + 1)
        })
        .unwrap_or(1)
}

/// Lambda texts of all display entries, in document order.
fn display_lambdas(document: &Value) -> Result<Vec<String>, SnippetError> {
    let display = document.get(DISPLAY_SECTION).ok_or_else(|| {
        SnippetError::unrecognized(format!("document has no '{DISPLAY_SECTION}' section"))
    })?;

    let entries: Vec<&Value> = match untag(display) {
        Value::Sequence(items) => items.iter().collect(),
        entry @ Value::Mapping(_) => vec![entry],
        _ => {
            return Err(SnippetError::unrecognized(format!(
                "'{DISPLAY_SECTION}' section is neither a list nor a mapping"
            )))
        }
    };

    let lambdas: Vec<String> = entries
        .into_iter()
        .filter_map(|entry| untag(entry).get(LAMBDA_KEY))
        .filter_map(|lambda| untag(lambda).as_str())
        .map(str::to_string)
        .collect();

    if lambdas.is_empty() {
        return Err(SnippetError::unrecognized(format!(
            "no '{DISPLAY_SECTION}' entry has a '{LAMBDA_KEY}'"
        )));
    }
    Ok(lambdas)
}

/// Strips YAML tags such as `!lambda`.
fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

/// Branch labels at the top level of the dispatch body.
fn find_branches(source: &LambdaSource<'_>, body: Range<usize>) -> Vec<Branch> {
    let masked = source.masked();
    let mut branches = Vec::new();
    let mut depth = 0i64;
    let mut scanned = body.start;

    for captures in BRANCH_LABEL.captures_iter(&masked[body.clone()]) {
        let Some(label) = captures.get(0) else {
            continue;
        };
        let start = body.start + label.start();
        depth += source.depth_change(scanned..start);
        scanned = start;
        if depth != 0 {
            continue;
        }

        let label_value = captures.get(1).map(|digits| {
            let digits = String::from_utf8_lossy(digits.as_bytes());
            digits
                .parse::<u32>()
                .map_err(|_| format!("case label {digits} is out of range"))
        });
        branches.push(Branch {
            label: label_value,
            start,
            body_start: body.start + label.end(),
        });
    }

    branches
}

/// Assembles pages from dispatch branches.
struct DeviceBuilder<'s, 'a> {
    source: &'s LambdaSource<'a>,
    pages: Vec<Page>,
    warnings: Vec<ImportWarning>,
    page_ids: HashSet<String>,
    widget_ids: HashSet<String>,
}

impl<'s, 'a> DeviceBuilder<'s, 'a> {
    fn new(source: &'s LambdaSource<'a>, warnings: Vec<ImportWarning>) -> Self {
        Self {
            source,
            pages: Vec::new(),
            warnings,
            page_ids: HashSet::new(),
            widget_ids: HashSet::new(),
        }
    }

    fn warn_at(&mut self, offset: usize, message: impl Into<String>) {
        let line = self.source.line_of(offset);
        self.warnings.push(ImportWarning::at_line(line, message));
    }

    fn add_branch(&mut self, branch: &Branch, body: Range<usize>) {
        let Some(label) = &branch.label else {
            let has_markers = self
                .source
                .comments_in(body)
                .any(|comment| Marker::parse(comment.body).is_some());
            if has_markers {
                self.warn_at(branch.start, "markers in the default branch are ignored");
            }
            return;
        };

        let Ok(ordinal) = u32::try_from(self.pages.len()) else {
            self.warn_at(branch.start, "too many pages; branch ignored");
            return;
        };
        match label {
            Ok(number) if *number == ordinal => {}
            Ok(number) => self.warn_at(
                branch.start,
                format!("case {number} imported as page {ordinal}"),
            ),
            Err(message) => self.warn_at(branch.start, format!("{message}; imported as page {ordinal}")),
        }

        let mut header: Option<(String, String)> = None;
        let mut widgets: Vec<Widget> = Vec::new();

        let source = self.source;
        for comment in source.comments_in(body) {
            let Some(parsed) = Marker::parse(comment.body) else {
                continue;
            };
            let marker = match parsed {
                Ok(marker) => marker,
                Err(message) => {
                    self.warn_at(comment.offset, format!("skipped malformed marker: {message}"));
                    continue;
                }
            };

            match marker.tag {
                MarkerTag::Device => {
                    self.warn_at(comment.offset, "@device marker inside a page branch is ignored");
                }
                MarkerTag::Page if header.is_some() => {
                    self.warn_at(comment.offset, "extra @page marker in branch is ignored");
                }
                MarkerTag::Page => match grammar::decode_page(marker) {
                    Ok(decoded) => header = Some(decoded),
                    Err(message) => {
                        self.warn_at(comment.offset, format!("skipped malformed @page marker: {message}"));
                    }
                },
                MarkerTag::Widget => {
                    if let Some(widget) = self.accept_widget(marker, comment.offset) {
                        widgets.push(widget);
                    }
                }
            }
        }

        let (id, title) = header.unwrap_or_else(|| {
            self.warn_at(branch.start, format!("page {ordinal} has no @page marker; using defaults"));
            (format!("page_{ordinal}"), format!("Page {}", ordinal + 1))
        });
        let id = self.unique_page_id(id, branch.start);

        let mut page = Page::new(id, title, ordinal);
        page.widgets = widgets;
        self.pages.push(page);
    }

    fn accept_widget(&mut self, marker: Marker, offset: usize) -> Option<Widget> {
        let widget = match grammar::decode_widget(marker) {
            Ok(widget) => widget,
            Err(message) => {
                self.warn_at(offset, format!("skipped malformed @widget marker: {message}"));
                return None;
            }
        };

        let errors = validate_widget(&widget);
        if !errors.is_empty() {
            let reasons: Vec<String> = errors.iter().map(ToString::to_string).collect();
            self.warn_at(
                offset,
                format!("skipped invalid widget '{}': {}", widget.id, reasons.join("; ")),
            );
            return None;
        }

        if !self.widget_ids.insert(widget.id.clone()) {
            self.warn_at(offset, format!("skipped duplicate widget id '{}'", widget.id));
            return None;
        }

        Some(widget)
    }

    fn unique_page_id(&mut self, id: String, offset: usize) -> String {
        if self.page_ids.insert(id.clone()) {
            return id;
        }

        let renamed = (2..)
            .map(|n| format!("{id}_{n}"))
            .find(|candidate| !self.page_ids.contains(candidate))
            .unwrap_or_default();
        self.warn_at(offset, format!("duplicate page id '{id}' renamed to '{renamed}'"));
        self.page_ids.insert(renamed.clone());
        renamed
    }
}

/// Reads the first `@device` marker outside the page branches.
///
/// Every other marker found there is reported and ignored.
fn read_identity(
    source: &LambdaSource<'_>,
    branches: Range<usize>,
    warnings: &mut Vec<ImportWarning>,
) -> grammar::DeviceIdentity {
    let mut identity = None;
    for comment in source.comments_outside(branches) {
        let line = source.line_of(comment.offset);
        match Marker::parse(comment.body) {
            Some(Ok(marker)) if marker.tag == MarkerTag::Device && identity.is_none() => {
                match grammar::decode_device(marker) {
                    Ok(decoded) => identity = Some(decoded),
                    Err(message) => warnings.push(ImportWarning::at_line(
                        line,
                        format!("skipped malformed @device marker: {message}"),
                    )),
                }
            }
            Some(Ok(marker)) if marker.tag == MarkerTag::Device => warnings.push(
                ImportWarning::at_line(line, "extra @device marker is ignored"),
            ),
            Some(Ok(marker)) => warnings.push(ImportWarning::at_line(
                line,
                format!("{} marker outside a page branch is ignored", marker.tag),
            )),
            Some(Err(message)) => warnings.push(ImportWarning::at_line(
                line,
                format!("skipped malformed marker: {message}"),
            )),
            None => {}
        }
    }
    identity.unwrap_or_default()
}
