//! Rendering diagnostics as terminal text, JSON lines, or one-line records.

use crate::diagnostic::{Diagnostic, Diagnostics, Severity};
use crate::source_cache::SourceCache;
use console::Style;
use std::io::Write;

/// Output sink for diagnostics.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()>;

    fn emit_all(&mut self, diagnostics: &Diagnostics, cache: &SourceCache) -> std::io::Result<()> {
        for diag in diagnostics.iter() {
            self.emit(diag, cache)?;
        }
        Ok(())
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()>;
}

/// rustc-style output with a source snippet and caret underline.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colored: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, colored: bool) -> Self {
        Self { writer, colored }
    }

    fn style(&self, style: Style) -> Style {
        style.force_styling(self.colored)
    }

    fn severity_style(&self, severity: Severity) -> Style {
        let style = match severity {
            Severity::Error => Style::new().red(),
            Severity::Warning => Style::new().yellow(),
            Severity::Hint => Style::new().blue(),
        };
        self.style(style.bold())
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        let sev = self.severity_style(diagnostic.severity);
        let gutter = self.style(Style::new().cyan());
        let bold = self.style(Style::new().bold());

        // error[X003]: message
        writeln!(
            self.writer,
            "{}: {}",
            sev.apply_to(format!(
                "{}[{}]",
                diagnostic.severity.as_str(),
                diagnostic.code.as_str()
            )),
            bold.apply_to(&diagnostic.message)
        )?;

        if let Some(loc) = cache.location(diagnostic.span) {
            writeln!(self.writer, "  {} {}", gutter.apply_to("-->"), loc)?;

            if let Some(file) = cache.get_file(diagnostic.span.file_id) {
                let (line_num, col) = file.line_column(diagnostic.span.start);
                if let Some(line_text) = file.line_text(line_num) {
                    let number = line_num.to_string();
                    let pad = " ".repeat(number.len());
                    let bar = gutter.apply_to("|");

                    writeln!(self.writer, "{} {}", pad, bar)?;
                    writeln!(self.writer, "{} {} {}", gutter.apply_to(&number), bar, line_text)?;

                    let lead = " ".repeat((col - 1) as usize);
                    let room = line_text.chars().count().saturating_sub((col - 1) as usize);
                    let width = (diagnostic.span.len() as usize).min(room).max(1);
                    writeln!(
                        self.writer,
                        "{} {} {}{}",
                        pad,
                        bar,
                        lead,
                        sev.apply_to("^".repeat(width))
                    )?;
                }
            }
        }

        for label in &diagnostic.labels {
            if let Some(loc) = cache.location(label.span) {
                writeln!(
                    self.writer,
                    "  {}: {} ({})",
                    gutter.apply_to("note"),
                    label.message,
                    loc
                )?;
            }
        }

        if let Some(help) = &diagnostic.help {
            writeln!(self.writer, "  {} {}", gutter.apply_to("= help:"), help)?;
        }

        writeln!(self.writer)
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        let errors = diagnostics.error_count();
        let warnings = diagnostics.warning_count();
        if errors == 0 && warnings == 0 {
            return Ok(());
        }

        let style = if errors > 0 {
            self.severity_style(Severity::Error)
        } else {
            self.severity_style(Severity::Warning)
        };

        let mut parts = Vec::new();
        if errors > 0 {
            parts.push(format!("{} error{}", errors, if errors == 1 { "" } else { "s" }));
        }
        if warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                warnings,
                if warnings == 1 { "" } else { "s" }
            ));
        }
        writeln!(
            self.writer,
            "{}",
            style.apply_to(format!("{} emitted", parts.join(" and ")))
        )
    }
}

/// One JSON object per line, for editors and CI.
pub struct JsonEmitter<W: Write> {
    writer: W,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        let location = |span| {
            cache.location(span).map(|l| {
                serde_json::json!({
                    "file": l.file,
                    "line": l.line,
                    "column": l.column,
                })
            })
        };

        let json = serde_json::json!({
            "code": diagnostic.code.as_str(),
            "kind": diagnostic.code.name(),
            "severity": diagnostic.severity.as_str(),
            "message": diagnostic.message,
            "location": location(diagnostic.span),
            "span": if diagnostic.span.is_dummy() {
                serde_json::Value::Null
            } else {
                serde_json::json!({
                    "start": diagnostic.span.start,
                    "end": diagnostic.span.end,
                })
            },
            "labels": diagnostic.labels.iter().map(|l| serde_json::json!({
                "message": l.message,
                "location": location(l.span),
            })).collect::<Vec<_>>(),
            "help": diagnostic.help,
        });

        serde_json::to_writer(&mut self.writer, &json)?;
        writeln!(self.writer)
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        let summary = serde_json::json!({
            "type": "summary",
            "errors": diagnostics.error_count(),
            "warnings": diagnostics.warning_count(),
            "hints": diagnostics.hint_count(),
        });
        serde_json::to_writer(&mut self.writer, &summary)?;
        writeln!(self.writer)
    }
}

/// `file:line:col: severity: message [code]`, one per line.
pub struct SimpleEmitter<W: Write> {
    writer: W,
}

impl<W: Write> SimpleEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> DiagnosticEmitter for SimpleEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        if let Some(loc) = cache.location(diagnostic.span) {
            write!(self.writer, "{}: ", loc)?;
        }
        writeln!(
            self.writer,
            "{}: {} [{}]",
            diagnostic.severity,
            diagnostic.message,
            diagnostic.code
        )
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        writeln!(
            self.writer,
            "{} error(s), {} warning(s)",
            diagnostics.error_count(),
            diagnostics.warning_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiagnosticCode, Span};

    fn sample() -> (SourceCache, Diagnostics) {
        let mut cache = SourceCache::new();
        let id = cache.add_file(
            "cb.js",
            "function cb(this elem, e) {\n  setTimeout(() => this.value = '')\n}\n".to_string(),
        );
        let mut diags = Diagnostics::new();
        diags.push(
            Diagnostic::new(
                DiagnosticCode::IllegalThisReference,
                "`this` is not available here",
            )
            .with_span(Span::new(id, 47, 51))
            .with_label(Span::new(id, 12, 21), "receiver renamed to `elem` here")
            .with_help("use `elem` instead")
            .build(),
        );
        (cache, diags)
    }

    #[test]
    fn test_simple_emitter_format() {
        let (cache, diags) = sample();
        let mut out = Vec::new();
        SimpleEmitter::new(&mut out).emit_all(&diags, &cache).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "cb.js:2:20: error: `this` is not available here [X003]\n"
        );
    }

    #[test]
    fn test_terminal_emitter_underlines_reference() {
        let (cache, diags) = sample();
        let mut out = Vec::new();
        let mut emitter = TerminalEmitter::new(&mut out, false);
        emitter.emit_all(&diags, &cache).unwrap();
        emitter.emit_summary(&diags).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("error[X003]: `this` is not available here"));
        assert!(text.contains("--> cb.js:2:20"));
        assert!(text.contains("                   ^^^^"));
        assert!(text.contains("note: receiver renamed to `elem` here (cb.js:1:13)"));
        assert!(text.contains("= help: use `elem` instead"));
        assert!(text.ends_with("1 error emitted\n"));
    }

    #[test]
    fn test_json_emitter_fields() {
        let (cache, diags) = sample();
        let mut out = Vec::new();
        JsonEmitter::new(&mut out).emit_all(&diags, &cache).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(String::from_utf8(out).unwrap().trim()).unwrap();
        assert_eq!(value["code"], "X003");
        assert_eq!(value["kind"], "IllegalThisReferenceError");
        assert_eq!(value["location"]["line"], 2);
        assert_eq!(value["span"]["start"], 47);
    }
}
