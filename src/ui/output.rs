//! Output verbosity mode.

use std::str::FromStr;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show all output including oracle query details.
    Verbose,
    /// Show progress and status only.
    #[default]
    Normal,
    /// Show minimal output (final status and the install console).
    Quiet,
    /// Show nothing except errors.
    Silent,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            "silent" => Ok(Self::Silent),
            _ => Err(format!("unknown output mode: {}", s)),
        }
    }
}

impl OutputMode {
    /// Check if this mode shows progress spinners.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows the live install console.
    ///
    /// The console is part of the primary surface, so only Silent hides it.
    pub fn shows_console(&self) -> bool {
        !matches!(self, Self::Silent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_from_str() {
        assert_eq!("verbose".parse::<OutputMode>(), Ok(OutputMode::Verbose));
        assert_eq!("NORMAL".parse::<OutputMode>(), Ok(OutputMode::Normal));
        assert_eq!("quiet".parse::<OutputMode>(), Ok(OutputMode::Quiet));
        assert_eq!("silent".parse::<OutputMode>(), Ok(OutputMode::Silent));
        assert!("loud".parse::<OutputMode>().is_err());
    }

    #[test]
    fn silent_hides_everything_but_console_survives_quiet() {
        assert!(!OutputMode::Silent.shows_status());
        assert!(!OutputMode::Silent.shows_console());
        assert!(OutputMode::Quiet.shows_console());
        assert!(!OutputMode::Quiet.shows_spinners());
        assert!(OutputMode::Normal.shows_spinners());
    }
}
