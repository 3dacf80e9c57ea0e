/// Capacity limits for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum tokens per source, end-of-input token included.
    pub max_tokens: usize,
    /// Identifier and number lexemes are cut to this many characters.
    pub max_lexeme_len: usize,
    pub max_variables: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            max_lexeme_len: 63,
            max_variables: 256,
        }
    }
}

/// What a second declaration of an existing name does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Append another entry; lookups keep resolving to the first one.
    #[default]
    KeepFirst,
    /// Replace the existing entry's type and value.
    Overwrite,
    /// Refuse the declaration and report it.
    Reject,
}

/// How `print` renders an identifier argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintMode {
    /// Write the identifier's name.
    #[default]
    Name,
    /// Write the variable's current value.
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Record every diagnostic and keep going.
    #[default]
    Collect,
    /// Stop at the first diagnostic.
    Abort,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub limits: Limits,
    pub duplicate_policy: DuplicatePolicy,
    pub print_mode: PrintMode,
    pub error_mode: ErrorMode,
}

impl Config {
    pub fn strict() -> Self {
        Self {
            error_mode: ErrorMode::Abort,
            ..Self::default()
        }
    }
}
