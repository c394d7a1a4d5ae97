//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Cannot open input (explicit config file missing)
pub const NOINPUT: i32 = 66;

/// Internal software error (subcommand failed)
pub const SOFTWARE: i32 = 70;

/// System error (e.g., home directory unresolvable)
pub const OSERR: i32 = 71;

/// Can't create output file
pub const CANTCREAT: i32 = 73;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
