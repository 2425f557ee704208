//! Human-readable output: a streaming observer and the `--list` printer.

use std::io::{self, Write};
use std::time::Duration;

use owo_colors::{OwoColorize, Style};

use crate::registry::{CaseRegistry, TestCase};
use crate::report::{CaseOutcome, CaseStatus, RunReport};
use crate::runner::Observer;

/// Prints one line per finished case and a summary at the end.
///
/// Observer callbacks cannot fail, so the first write error is kept and
/// handed back by [`ConsoleObserver::finish`].
pub struct ConsoleObserver<W: Write> {
    out: W,
    color: bool,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            error: None,
        }
    }

    /// Return the writer, or the first error hit while writing to it.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn write_outcome(&mut self, outcome: &CaseOutcome) -> io::Result<()> {
        let tag = self.paint(
            &format!("[{:<5}]", outcome.status.label()),
            status_style(&outcome.status),
        );
        let duration = self.paint(&format_duration(outcome.duration), Style::new().dimmed());
        writeln!(self.out, "{tag} {} {duration}", outcome.id())?;
        if let Some(message) = outcome.status.message() {
            for line in message.lines() {
                writeln!(self.out, "        {line}")?;
            }
        }
        Ok(())
    }

    fn write_summary(&mut self, report: &RunReport) -> io::Result<()> {
        let verdict = if report.is_success() {
            self.paint("ok", Style::new().green().bold())
        } else {
            self.paint("FAILED", Style::new().red().bold())
        };
        writeln!(self.out)?;
        writeln!(
            self.out,
            "result: {verdict}. {} in {}",
            report.counts(),
            format_duration(report.duration())
        )?;
        self.out.flush()
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(err) = result
            && self.error.is_none()
        {
            tracing::warn!(%err, "failed to write console output");
            self.error = Some(err);
        }
    }
}

impl<W: Write> Observer for ConsoleObserver<W> {
    fn run_started(&mut self, total: usize) {
        let result = writeln!(self.out, "running {total} cases");
        self.record(result);
    }

    fn case_started(&mut self, case: &TestCase) {
        tracing::trace!(suite = case.suite(), case = case.name(), "console: case started");
    }

    fn case_finished(&mut self, outcome: &CaseOutcome) {
        let result = self.write_outcome(outcome);
        self.record(result);
    }

    fn run_finished(&mut self, report: &RunReport) {
        let result = self.write_summary(report);
        self.record(result);
    }
}

/// Print every suite and its cases, in execution order.
pub fn write_listing(out: &mut impl Write, registry: &CaseRegistry) -> io::Result<()> {
    for suite in registry.suites() {
        writeln!(out, "## {}", suite.name)?;
        for case in suite.cases {
            writeln!(out, "  {}", case.name())?;
        }
    }
    writeln!(
        out,
        "\nTotal: {} cases in {} suites",
        registry.len(),
        registry.suite_count()
    )
}

fn status_style(status: &CaseStatus) -> Style {
    match status {
        CaseStatus::Passed => Style::new().green(),
        CaseStatus::SoftFailed(_) => Style::new().yellow(),
        CaseStatus::HardFailed(_) => Style::new().red().bold(),
        CaseStatus::Crashed(_) => Style::new().magenta().bold(),
    }
}

fn format_duration(duration: Duration) -> String {
    format!("({:.3}ms)", duration.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Check;
    use crate::runner::Runner;

    fn registry() -> CaseRegistry {
        let mut registry = CaseRegistry::new();
        registry.register("Math", "adds", || Check::soft().eq(1 + 1, 2)).unwrap();
        registry
            .register("Math", "compares", || Check::hard().lt(3, 1))
            .unwrap();
        registry.register("Text", "upper", || Ok(())).unwrap();
        registry
    }

    #[test]
    fn plain_output_has_one_line_per_case_and_a_summary() {
        let registry = registry();
        let mut observer = ConsoleObserver::new(Vec::new(), false);
        Runner::new(&registry).run(&mut observer);
        let text = String::from_utf8(observer.finish().unwrap()).unwrap();

        assert!(text.starts_with("running 3 cases\n"));
        assert!(text.contains("[PASS ] Math.adds ("));
        assert!(text.contains("[FATAL] Math.compares ("));
        assert!(text.contains("        3 >= 1\n"));
        assert!(text.contains("[PASS ] Text.upper ("));
        assert!(text.contains("result: FAILED. 3 total, 2 passed, 0 failed, 1 fatal, 0 crashed in "));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn colored_output_uses_escape_codes() {
        let registry = registry();
        let mut observer = ConsoleObserver::new(Vec::new(), true);
        Runner::new(&registry).run(&mut observer);
        let text = String::from_utf8(observer.finish().unwrap()).unwrap();
        assert!(text.contains('\u{1b}'));
    }

    #[test]
    fn listing_groups_cases_by_suite() {
        let mut out = Vec::new();
        write_listing(&mut out, &registry()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "## Math\n  adds\n  compares\n## Text\n  upper\n\nTotal: 3 cases in 2 suites\n"
        );
    }

    #[test]
    fn write_errors_are_kept() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let registry = registry();
        let mut observer = ConsoleObserver::new(Broken, false);
        Runner::new(&registry).run(&mut observer);
        let err = observer.finish().err().map(|e| e.kind());
        assert_eq!(err, Some(io::ErrorKind::BrokenPipe));
    }
}
