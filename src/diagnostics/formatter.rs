use serde::Serialize;

use super::{Diagnostic, DiagnosticCode, ErrorKind, FileCache, LineCol, Span};

pub const JSON_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorFormat {
    Human,
    Json,
    Short,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    pub format: ErrorFormat,
}

/// Render a collection of diagnostics to a single string.
#[must_use]
pub fn format_diagnostics(
    diagnostics: &[Diagnostic],
    files: &FileCache,
    options: FormatOptions,
) -> String {
    let mut rendered = String::new();
    for (index, diagnostic) in diagnostics.iter().enumerate() {
        if index > 0 {
            rendered.push('\n');
        }
        let chunk = match options.format {
            ErrorFormat::Human => render_human(diagnostic, files),
            ErrorFormat::Short => render_short(diagnostic, files),
            ErrorFormat::Json => render_json(diagnostic, files),
        };
        rendered.push_str(&chunk);
    }
    rendered
}

fn render_human(diagnostic: &Diagnostic, files: &FileCache) -> String {
    let mut out = format_header(diagnostic);
    out.push('\n');
    let (path, location) = locate_primary(diagnostic, files);
    out.push_str(&match location {
        Some(loc) => format!("  --> {path}:{}:{}\n", loc.line, loc.column),
        None => format!("  --> {path}:?:?\n"),
    });
    if let Some(label) = diagnostic.primary_label.as_ref() {
        out.push_str(&render_snippet(label.span, &label.message, files));
    }
    for label in &diagnostic.secondary_labels {
        out.push_str(&render_snippet(label.span, &label.message, files));
    }
    for suggestion in &diagnostic.suggestions {
        out.push_str(&format!("\nhelp: {}", suggestion.message));
        if let Some(replacement) = &suggestion.replacement {
            out.push_str(&format!(" (insert `{replacement}`)"));
        }
    }
    out
}

fn render_short(diagnostic: &Diagnostic, files: &FileCache) -> String {
    let (path, location) = locate_primary(diagnostic, files);
    let (line, column) = location.map_or_else(
        || ("?".to_string(), "?".to_string()),
        |loc| (loc.line.to_string(), loc.column.to_string()),
    );
    format!("{path}:{line}:{column}: {}", format_header(diagnostic))
}

fn render_json(diagnostic: &Diagnostic, files: &FileCache) -> String {
    let payload = JsonDiagnostic {
        version: JSON_SCHEMA_VERSION,
        severity: diagnostic.severity.as_str(),
        kind: diagnostic.kind,
        code: diagnostic.code.clone(),
        message: diagnostic.message.clone(),
        primary_span: diagnostic
            .primary_label
            .as_ref()
            .and_then(|label| JsonSpan::from_span(label.span, files)),
        labels: diagnostic
            .primary_label
            .iter()
            .chain(diagnostic.secondary_labels.iter())
            .map(|label| JsonLabel {
                message: label.message.clone(),
                span: JsonSpan::from_span(label.span, files),
                is_primary: label.is_primary,
            })
            .collect(),
        suggestions: diagnostic
            .suggestions
            .iter()
            .map(|suggestion| JsonSuggestion {
                message: suggestion.message.clone(),
                span: suggestion
                    .span
                    .and_then(|span| JsonSpan::from_span(span, files)),
                replacement: suggestion.replacement.clone(),
            })
            .collect(),
    };
    serde_json::to_string(&payload).unwrap_or_else(|_| "{}".into())
}

fn format_header(diagnostic: &Diagnostic) -> String {
    let code = diagnostic
        .code
        .as_ref()
        .map_or("UNKNOWN", |c| c.code.as_str());
    format!(
        "{}[{code}]: {}",
        diagnostic.severity.as_str(),
        diagnostic.message
    )
}

fn render_snippet(span: Span, message: &str, files: &FileCache) -> String {
    let Some(file) = files.get(span.file_id) else {
        return String::new();
    };
    let Some(loc) = file.line_col(span.start) else {
        return String::new();
    };
    let Some(line) = file.line(loc.line) else {
        return String::new();
    };
    let (line_start, _) = file.line_bounds(loc.line).unwrap_or((span.start, span.end));
    let rel_end = span
        .end
        .saturating_sub(line_start)
        .min(line.len())
        .max(span.start.saturating_sub(line_start));
    let underlined = line
        .get(span.start.saturating_sub(line_start)..rel_end)
        .map_or(0, |text| text.chars().count())
        .max(1);
    format!(
        "   |\n{:>4} | {line}\n     | {}{} {message}",
        loc.line,
        " ".repeat(loc.column.saturating_sub(1)),
        "^".repeat(underlined),
    )
}

fn locate_primary(diagnostic: &Diagnostic, files: &FileCache) -> (String, Option<LineCol>) {
    diagnostic
        .primary_label
        .as_ref()
        .and_then(|label| {
            let path = files.path(label.span.file_id)?;
            Some((
                path.display().to_string(),
                files.line_col(label.span.file_id, label.span.start),
            ))
        })
        .unwrap_or_else(|| ("<unknown>".into(), None))
}

#[derive(Serialize)]
struct JsonDiagnostic {
    version: &'static str,
    severity: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<DiagnosticCode>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_span: Option<JsonSpan>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    labels: Vec<JsonLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    suggestions: Vec<JsonSuggestion>,
}

#[derive(Serialize)]
struct JsonSpan {
    file: String,
    start: usize,
    end: usize,
    line_start: usize,
    column_start: usize,
}

impl JsonSpan {
    fn from_span(span: Span, files: &FileCache) -> Option<Self> {
        let file = files.get(span.file_id)?;
        let line_col = file.line_col(span.start)?;
        Some(Self {
            file: file.path.display().to_string(),
            start: span.start,
            end: span.end,
            line_start: line_col.line,
            column_start: line_col.column,
        })
    }
}

#[derive(Serialize)]
struct JsonLabel {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    span: Option<JsonSpan>,
    is_primary: bool,
}

#[derive(Serialize)]
struct JsonSuggestion {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    span: Option<JsonSpan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replacement: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticSink, Suggestion};
    use serde_json::Value;

    fn sample() -> (FileCache, Diagnostic) {
        let mut files = FileCache::default();
        let source = "class Program\n{\n    int x = 1\n}\n";
        let file_id = files.add_file("Program.bf", source);
        let at = source.find("1\n").unwrap_or_default() + 1;
        let span = Span::in_file(file_id, at, at);
        let diagnostic = Diagnostic::error("expected ';'", Some(span))
            .with_primary_label("field declaration ends here")
            .with_suggestion(Suggestion::new("terminate the field", Some(span), Some(";".into())));
        let mut sink = DiagnosticSink::for_kind(ErrorKind::Syntax);
        sink.push(diagnostic);
        (files, sink.into_vec().remove(0))
    }

    #[test]
    fn human_format_points_at_missing_token() {
        let (files, diagnostic) = sample();
        let rendered = format_diagnostics(
            &[diagnostic],
            &files,
            FormatOptions {
                format: ErrorFormat::Human,
            },
        );
        assert!(rendered.starts_with("error[SYN"), "{rendered}");
        assert!(rendered.contains("--> Program.bf:3:14"), "{rendered}");
        assert!(rendered.contains("    int x = 1"), "{rendered}");
        assert!(rendered.contains("help: terminate the field (insert `;`)"), "{rendered}");
    }

    #[test]
    fn short_format_is_single_line() {
        let (files, diagnostic) = sample();
        let rendered = format_diagnostics(
            &[diagnostic],
            &files,
            FormatOptions {
                format: ErrorFormat::Short,
            },
        );
        assert!(rendered.starts_with("Program.bf:3:14: error[SYN"), "{rendered}");
        assert_eq!(rendered.lines().count(), 1);
    }

    #[test]
    fn json_format_carries_kind_and_schema() {
        let (files, diagnostic) = sample();
        let rendered = format_diagnostics(
            &[diagnostic],
            &files,
            FormatOptions {
                format: ErrorFormat::Json,
            },
        );
        let value: Value = serde_json::from_str(&rendered).unwrap_or(Value::Null);
        assert_eq!(value["version"], JSON_SCHEMA_VERSION);
        assert_eq!(value["kind"], "syntax");
        assert_eq!(value["primary_span"]["line_start"], 3);
        assert_eq!(value["suggestions"][0]["replacement"], ";");
    }
}
