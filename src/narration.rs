use colored::Colorize;
use std::cell::RefCell;
use std::io::Write;

/// What a narration line reports. Only used to colour terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Banner,
    Pass,
    Fail,
    Error,
    Skip,
}

/// One narrated line, kept with its tone so a replay can colour it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub depth: usize,
    pub tone: Tone,
    pub text: String,
}

thread_local! {
    // `None` means stdout. Each active `Capture` pushes its buffer here.
    static SINK: RefCell<Option<Vec<Line>>> = const { RefCell::new(None) };
}

/// Writes one narration line, indented two spaces per `depth`.
pub fn emit(depth: usize, tone: Tone, text: &str) {
    let captured = SINK.with(|sink| match sink.borrow_mut().as_mut() {
        Some(buffer) => {
            buffer.push(Line {
                depth,
                tone,
                text: text.to_string(),
            });
            true
        }
        None => false,
    });
    if captured {
        return;
    }

    let indent = "  ".repeat(depth);
    let painted = match tone {
        Tone::Plain => text.normal(),
        Tone::Banner => text.bold(),
        Tone::Pass => text.green(),
        Tone::Fail => text.red(),
        Tone::Error => text.red().bold(),
        Tone::Skip => text.yellow(),
    };
    let mut out = std::io::stdout().lock();
    // Narration is best effort; a closed stdout must not abort a suite.
    let _ = writeln!(out, "{indent}{painted}");
}

/// Narrates captured lines again, for example ones recorded on another thread.
pub fn replay(lines: &[Line]) {
    for line in lines {
        emit(line.depth, line.tone, &line.text);
    }
}

/// Plain text of `lines`, one per row, indented two spaces per depth.
pub fn render(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        for _ in 0..line.depth {
            out.push_str("  ");
        }
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}

/// Scoped redirection of this thread's narration into a buffer.
///
/// Dropping the guard, including during unwinding, puts the previous sink back.
#[must_use = "narration is only redirected while the guard is alive"]
pub struct Capture {
    previous: Option<Option<Vec<Line>>>,
}

impl Capture {
    pub fn start() -> Self {
        let previous = SINK.with(|sink| sink.replace(Some(Vec::new())));
        Self {
            previous: Some(previous),
        }
    }

    /// Stops capturing and returns everything written since `start`.
    pub fn finish(self) -> String {
        render(&self.finish_lines())
    }

    pub fn finish_lines(self) -> Vec<Line> {
        SINK.with(|sink| sink.borrow_mut().take()).unwrap_or_default()
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            SINK.with(|sink| *sink.borrow_mut() = previous);
        }
    }
}

/// Runs `procedure` with narration redirected and returns what it wrote.
pub fn capture(procedure: impl FnOnce()) -> String {
    capture_with(procedure).1
}

pub fn capture_with<T>(procedure: impl FnOnce() -> T) -> (T, String) {
    let (value, lines) = capture_lines_with(procedure);
    (value, render(&lines))
}

pub fn capture_lines_with<T>(procedure: impl FnOnce() -> T) -> (T, Vec<Line>) {
    let guard = Capture::start();
    let value = procedure();
    (value, guard.finish_lines())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_by_depth() {
        let out = capture(|| {
            emit(0, Tone::Banner, "suite");
            emit(1, Tone::Plain, "case");
            emit(2, Tone::Pass, "detail");
        });
        assert_eq!(out, "suite\n  case\n    detail\n");
    }

    #[test]
    fn nested_captures_restore_the_outer_buffer() {
        let outer = capture(|| {
            emit(0, Tone::Plain, "before");
            let inner = capture(|| emit(0, Tone::Plain, "inner"));
            assert_eq!(inner, "inner\n");
            emit(0, Tone::Plain, "after");
        });
        assert_eq!(outer, "before\nafter\n");
    }

    #[test]
    fn unwinding_restores_the_previous_sink() {
        let outer = capture(|| {
            let result = std::panic::catch_unwind(|| {
                let _ = capture(|| {
                    emit(0, Tone::Plain, "lost");
                    panic!("inside capture");
                });
            });
            assert!(result.is_err());
            emit(0, Tone::Plain, "still captured");
        });
        assert_eq!(outer, "still captured\n");
    }

    #[test]
    fn replayed_lines_keep_depth_and_tone() {
        let (_, lines) = capture_lines_with(|| {
            emit(0, Tone::Banner, "suite");
            emit(2, Tone::Fail, "bad");
        });
        assert_eq!(lines[1].tone, Tone::Fail);

        let (_, again) = capture_lines_with(|| replay(&lines));
        assert_eq!(again, lines);
        assert_eq!(render(&again), "suite\n    bad\n");
    }
}
