use beacon_store::VersionRecord;

use crate::error::ExportResult;

/// Every record, pretty-printed, in the order given
pub fn full_dump(versions: &[VersionRecord]) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(versions)?)
}

/// The newest record alone; `None` when there are no versions
pub fn latest_state(versions: &[VersionRecord]) -> ExportResult<Option<String>> {
    versions
        .first()
        .map(|latest| serde_json::to_string_pretty(latest).map_err(Into::into))
        .transpose()
}
