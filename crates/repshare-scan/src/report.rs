use std::io::Write;

use crate::cancel::CancelToken;
use crate::error::ScanResult;
use crate::tally::TallySet;

/// Stream the accumulated tallies to `out`, one line per distinct
/// representation per populated category:
///
/// ```text
/// <category> <refcount> <digest-hex>
/// ```
///
/// The same digest may appear on multiple lines when not all of its
/// physical occurrences are shared. Entry order within a category is
/// unspecified. The cancellation token is checked before every line, so a
/// cancelled run produces a truncated report. Flushing is left to the
/// caller.
pub fn print_report<W: Write>(
    tallies: &TallySet,
    cancel: &CancelToken,
    out: &mut W,
) -> ScanResult<()> {
    for (category, tally) in tallies.categories() {
        let Some(tally) = tally else {
            continue;
        };
        for (_key, entry) in tally.iter() {
            cancel.checkpoint()?;
            writeln!(out, "{} {} {}", category, entry.refcount, entry.digest)?;
        }
    }
    Ok(())
}
