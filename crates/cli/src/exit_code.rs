//! Exit code definitions for bucket-probe
//!
//! Scripts rely on these values. Changing one is a breaking change.

use bp_core::Error;

/// Exit codes for the bucket-probe binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Upload and listing completed successfully
    Success = 0,

    /// General/unspecified error
    GeneralError = 1,

    /// User input error: malformed bucket address, bad settings file
    UsageError = 2,

    /// The object could not be uploaded
    UploadFailed = 3,

    /// The bucket could not be listed
    ListFailed = 4,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create exit code from i32 value
    ///
    /// Returns None if the value doesn't correspond to a known exit code.
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::UploadFailed),
            4 => Some(Self::ListFailed),
            _ => None,
        }
    }

    /// Exit code reported when `error` is fatal
    pub fn from_error(error: &Error) -> Self {
        Self::from_i32(error.exit_code()).unwrap_or(Self::GeneralError)
    }

    /// Get a human-readable description of the exit code
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::GeneralError => "General error",
            Self::UsageError => "Invalid bucket address or configuration",
            Self::UploadFailed => "Upload failed",
            Self::ListFailed => "Listing failed",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}
