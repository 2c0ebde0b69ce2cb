use crate::record::{CaptureRecord, CatchStatus};

/// Whether a record may contribute to the ranking.
///
/// With moderation on, only approved records count. With it off, pending
/// and approved both count. Rejected records never count.
pub fn is_eligible(record: &CaptureRecord, moderation_enabled: bool) -> bool {
    match record.status {
        CatchStatus::Approved => true,
        CatchStatus::Pending => !moderation_enabled,
        CatchStatus::Rejected => false,
    }
}

pub fn eligible_records(
    records: &[CaptureRecord],
    moderation_enabled: bool,
) -> impl Iterator<Item = &CaptureRecord> {
    records
        .iter()
        .filter(move |record| is_eligible(record, moderation_enabled))
}
