use crate::error::CliError;

/// Structured result of an in-process CLI invocation.
///
/// Command failure is data, never a propagated error: callers inspect the
/// exit code and `error` field explicitly.
#[derive(Debug)]
pub struct CliOutcome {
    /// Process-style exit code: 0 success, 1 command failure, 2 usage error.
    pub exit_code: i32,
    /// Captured standard output text.
    pub output: String,
    /// The command's error, when the invocation failed.
    pub error: Option<CliError>,
}

impl CliOutcome {
    pub(crate) fn success(output: String) -> Self {
        Self {
            exit_code: 0,
            output,
            error: None,
        }
    }

    pub(crate) fn failure(exit_code: i32, output: String, error: CliError) -> Self {
        Self {
            exit_code,
            output,
            error: Some(error),
        }
    }

    /// Whether the command exited with code 0.
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}
