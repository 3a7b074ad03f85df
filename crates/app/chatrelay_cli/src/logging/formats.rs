use flexi_logger::{DeferredNow, TS_DASHES_BLANK_COLONS_DOT_BLANK};
use log::Record;

/// `2026-10-18 12:00:00.000000 +00:00 INFO  [chatrelay_core::conversation] message`
pub fn file_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {:<5} [{}] {}",
        now.format(TS_DASHES_BLANK_COLONS_DOT_BLANK),
        record.level(),
        record.module_path().unwrap_or("<unnamed>"),
        record.args()
    )
}
