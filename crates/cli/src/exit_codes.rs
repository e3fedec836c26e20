//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, no command)   |
//! | 3-9     | verify           | Reconciliation verdict codes             |
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

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Verify (3-9)
// =============================================================================

/// One or more non-blank fields scored below threshold.
/// Like `diff(1)`, a nonzero code means "the records differ."
pub const EXIT_VERIFY_MISMATCH: u8 = 3;

/// Config failed to parse or validate.
pub const EXIT_VERIFY_INVALID_CONFIG: u8 = 4;

/// Runtime failure: unreadable file, malformed input record.
pub const EXIT_VERIFY_RUNTIME: u8 = 5;
