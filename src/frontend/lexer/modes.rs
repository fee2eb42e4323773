//! Scanner mode stack for interpolated strings, raw strings and directive lines.

/// Flavor of an interpolated string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpolationKind {
    /// `$"..."`: backslash escapes, single line.
    Regular,
    /// `$@"..."` / `@$"..."`: doubled quotes, multi-line.
    Verbatim,
    /// `$$"""..."""`: `dollars` braces open a hole, `quotes` close the literal.
    Raw { dollars: usize, quotes: usize },
}

impl InterpolationKind {
    /// Number of `{`/`}` characters forming one interpolation delimiter.
    #[must_use]
    pub fn brace_width(self) -> usize {
        match self {
            InterpolationKind::Raw { dollars, .. } => dollars,
            _ => 1,
        }
    }

    #[must_use]
    pub fn quote_width(self) -> usize {
        match self {
            InterpolationKind::Raw { quotes, .. } => quotes,
            _ => 1,
        }
    }
}

/// What the scanner expects next inside an interpolated string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpolationMode {
    OpenQuote,
    Content,
    Expression,
    Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterpolationFrame {
    pub kind: InterpolationKind,
    pub mode: InterpolationMode,
    /// `{` nesting inside the current hole; 1 right after the opening brace.
    pub brace_depth: usize,
    /// `(`/`[` nesting inside the current hole.
    pub paren_depth: usize,
    /// Offset of the `$` that opened the literal.
    pub start: usize,
    /// Offset of the brace that opened the current hole.
    pub hole_start: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawPhase {
    Content,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    Interpolation(InterpolationFrame),
    RawString {
        fence: usize,
        phase: RawPhase,
        start: usize,
    },
    /// Condition line of `#if`/`#elif`, closed by the next line break.
    Directive,
}

/// Restorable scanner state. Empty at top level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScannerState {
    frames: Vec<Frame>,
}

impl ScannerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub(crate) fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub(crate) fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }

    /// Innermost interpolation frame when the scanner is inside a hole.
    #[must_use]
    pub fn interpolation_hole(&self) -> Option<&InterpolationFrame> {
        match self.frames.last() {
            Some(Frame::Interpolation(frame)) if frame.mode == InterpolationMode::Expression => {
                Some(frame)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn in_directive_line(&self) -> bool {
        matches!(self.frames.last(), Some(Frame::Directive))
    }

    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}
