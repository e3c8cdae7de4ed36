use clap::ValueEnum;
use w2vgrep_search::OutputMode;

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum ColorFlag {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorFlag {
    pub(crate) fn enabled(self) -> bool {
        match self {
            ColorFlag::Auto => console::Term::stdout().is_term(),
            ColorFlag::Always => true,
            ColorFlag::Never => false,
        }
    }
}

/// `-o` takes precedence over `-l`.
pub(crate) const fn output_mode(only_matching: bool, only_lines: bool) -> OutputMode {
    if only_matching {
        OutputMode::OnlyMatching
    } else if only_lines {
        OutputMode::OnlyLines
    } else {
        OutputMode::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_matching_wins() {
        assert_eq!(output_mode(true, true), OutputMode::OnlyMatching);
        assert_eq!(output_mode(false, true), OutputMode::OnlyLines);
        assert_eq!(output_mode(false, false), OutputMode::Full);
    }

    #[test]
    fn explicit_color_choices() {
        assert!(ColorFlag::Always.enabled());
        assert!(!ColorFlag::Never.enabled());
    }
}
