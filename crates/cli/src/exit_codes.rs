//! CLI Exit Code Registry
//!
//! Single source of truth for `litho` exit codes. Exit codes are part of
//! the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | `compare` found differences (diff(1) convention) |
//! | 2    | Usage error (bad arguments, unknown file type)   |
//! | 3    | I/O or file-format error                         |
//! | 4    | Configuration error                              |
//! | 5    | Schema, consistency or translation error         |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// `compare` found differing cells or extra columns.
/// Like `diff(1)`, exit 1 means "files differ."
pub const EXIT_COMPARE_DIFFERS: u8 = 1;

/// Usage error - bad arguments, unsupported file extension.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - unreadable file, malformed CSV/LAS/image.
pub const EXIT_IO: u8 = 3;

/// Configuration error - missing config, bad TOML, palette or translation
/// cross-validation failure.
pub const EXIT_CONFIG: u8 = 4;

/// Engine rejection - schema mismatch, consistency violation, invalid
/// translation.
pub const EXIT_DATA: u8 = 5;
