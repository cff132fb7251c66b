/// Standard Unix exit codes for the bmtk CLI.
///
/// These follow the BSD `sysexits` convention.
///
/// Successful termination
pub const SUCCESS: i32 = 0;

/// Command line usage error: invalid arguments, bad settings values
pub const USAGE: i32 = 64;

/// Input data was malformed: undecodable bytes, missing columns, unparsable rows
pub const DATAERR: i32 = 65;

/// Input file did not exist or was not readable
pub const NOINPUT: i32 = 66;

/// Internal failure, e.g. an export could not be written
pub const SOFTWARE: i32 = 70;
