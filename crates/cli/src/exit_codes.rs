//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success (also when nothing matched)      |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 60-69   | match            | Catalog matching codes                   |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Match (60-69)
// =============================================================================

/// Run file failed to parse or validate, or a threshold is outside [0, 1].
pub const EXIT_MATCH_INVALID_CONFIG: u8 = 60;

/// A catalog is not JSON, has the wrong shape, or lacks a required field.
pub const EXIT_MATCH_BAD_CATALOG: u8 = 61;

/// File could not be read or written.
pub const EXIT_MATCH_RUNTIME: u8 = 62;
