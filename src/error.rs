//! Application error type.
//!
//! Every failure is fatal to the run: errors bubble up to `main`, which prints
//! the message and exits with the error's code. Nothing in the crate retries.

/// Exit code for configuration problems (config file, state table, CLI misuse).
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for history store failures.
pub const EXIT_STORAGE: u8 = 3;
/// Exit code for remote retrieval and poll file handling.
pub const EXIT_FETCH: u8 = 4;
/// Exit code for chart and export output.
pub const EXIT_RENDER: u8 = 5;

#[derive(Clone, PartialEq, Eq)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(EXIT_STORAGE, message)
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        Self::new(EXIT_FETCH, message)
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::new(EXIT_RENDER, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
