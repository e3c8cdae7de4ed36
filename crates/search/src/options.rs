/// Default similarity threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// What gets printed for a matching line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Score line, leading context, highlighted line, trailing context and
    /// a `--` separator.
    #[default]
    Full,

    /// Highlighted line only (optionally numbered).
    OnlyLines,

    /// The matched token only.
    OnlyMatching,
}

/// Options for one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    /// A token matches when its score is strictly greater than this.
    pub threshold: f64,

    /// Non-matching lines kept and printed before a match (`-B`).
    pub before_context: usize,

    /// Lines printed verbatim after a match (`-A`).
    pub after_context: usize,

    /// Lowercase queries and tokens before comparing.
    pub ignore_case: bool,

    /// Prefix printed lines with their line number.
    pub line_numbers: bool,

    pub mode: OutputMode,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            before_context: 0,
            after_context: 0,
            ignore_case: false,
            line_numbers: false,
            mode: OutputMode::Full,
        }
    }
}

impl MatchOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_context(mut self, before: usize, after: usize) -> Self {
        self.before_context = before;
        self.after_context = after;
        self
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_line_numbers(mut self, line_numbers: bool) -> Self {
        self.line_numbers = line_numbers;
        self
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Only the full mode prints leading context.
    pub fn keeps_context(&self) -> bool {
        self.mode == OutputMode::Full && self.before_context > 0
    }

    /// Validate options
    pub fn validate(&self) -> Result<(), String> {
        if self.threshold.is_nan() {
            return Err("threshold must be a number".to_string());
        }
        Ok(())
    }
}
