//! Shared output helpers.
//!
//! Every command prints one pretty-printed JSON document followed by a
//! newline.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;

/// Write `value` as pretty JSON plus a trailing newline.
pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
