use std::fmt;

/// Machine-readable error codes surfaced by the CLI and logs.
///
/// Missing references and malformed preferences never reach this type:
/// they degrade silently to a no-op or a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    SeedInvalid,
    PreferenceReadFailed,
    PreferenceWriteFailed,
    ExportWriteFailed,
    GeneratorStopped,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::SeedInvalid => "E1004",
            Self::PreferenceReadFailed => "E4001",
            Self::PreferenceWriteFailed => "E4002",
            Self::ExportWriteFailed => "E5001",
            Self::GeneratorStopped => "E7001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::SeedInvalid => "Seed data is inconsistent",
            Self::PreferenceReadFailed => "Preference file could not be read",
            Self::PreferenceWriteFailed => "Preference file could not be written",
            Self::ExportWriteFailed => "Export file write failed",
            Self::GeneratorStopped => "Activity generator stopped unexpectedly",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .huddle/config.toml and retry."),
            Self::SeedInvalid => {
                Some("Every activity and reply must reference a user listed in the seed roster.")
            }
            Self::PreferenceReadFailed | Self::PreferenceWriteFailed => {
                Some("Check permissions on the preferences file or pass --prefs to relocate it.")
            }
            Self::ExportWriteFailed => Some("Check disk space and write permissions."),
            Self::GeneratorStopped => None,
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
