//! Process exit codes, following BSD sysexits.h

/// Bad command line: wrong tree count, unknown access tag
pub const USAGE: i32 = 64;

/// Tree documents whose shapes cannot be matched, or malformed trees
pub const DATAERR: i32 = 65;

/// An operation failed on its items
pub const SOFTWARE: i32 = 70;

/// Tree document could not be read or written
pub const IOERR: i32 = 74;

/// Unreadable or invalid settings
pub const CONFIG: i32 = 78;
