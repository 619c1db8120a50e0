//! Series normalizer: raw provider rows -> canonical daily records.
//!
//! This is the validation boundary of the pipeline. Everything downstream
//! assumes records are sorted ascending by day, deduplicated per
//! (day, entity), and carry non-negative counts. Missing days are left
//! missing: downstream consumers treat an absent day as "no data", not
//! zero, unless their own contract says otherwise.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::types::{DailyRecord, RawDailyRow};

/// Parse, validate, sort and deduplicate raw rows.
///
/// Duplicate (day, entity) pairs are a caller error; the last row in
/// input order wins, deterministically. A missing `deleted_count` means
/// zero deletions (the provider's outer join produced no matching
/// deletion row), while a missing day or `new_count` is malformed and
/// aborts the whole transformation.
pub fn normalize(rows: &[RawDailyRow]) -> Result<Vec<DailyRecord>> {
    let mut records = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        records.push(parse_row(row, idx)?);
    }

    // Stable sort keeps input order among duplicates, so retain-last is
    // deterministic.
    records.sort_by(|a, b| (a.day, &a.entity_id).cmp(&(b.day, &b.entity_id)));
    dedup_last_wins(&mut records);

    Ok(records)
}

fn parse_row(row: &RawDailyRow, idx: usize) -> Result<DailyRecord> {
    let day_str = row
        .day
        .as_deref()
        .ok_or_else(|| Error::MalformedRecord(format!("row {}: missing day", idx)))?;

    let day = parse_day(day_str)
        .ok_or_else(|| Error::MalformedRecord(format!("row {}: unparseable day {:?}", idx, day_str)))?;

    let new_count = row
        .new_count
        .ok_or_else(|| Error::MalformedRecord(format!("row {} ({}): missing new_count", idx, day)))?;

    // Outer-join semantics: no deletion row means zero deletions.
    let deleted_count = row.deleted_count.unwrap_or(0);

    if new_count < 0 || deleted_count < 0 {
        return Err(Error::MalformedRecord(format!(
            "row {} ({}): negative count",
            idx, day
        )));
    }

    Ok(DailyRecord {
        day,
        entity_id: row.entity_id.clone(),
        new_count,
        deleted_count,
    })
}

/// Parse an ISO 8601 day, tolerating a trailing time component the way
/// the original provider serialized timestamps.
fn parse_day(value: &str) -> Option<NaiveDate> {
    let date_part = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn dedup_last_wins(records: &mut Vec<DailyRecord>) {
    let mut deduped: Vec<DailyRecord> = Vec::with_capacity(records.len());
    for record in records.drain(..) {
        match deduped.last_mut() {
            Some(last) if last.day == record.day && last.entity_id == record.entity_id => {
                *last = record;
            }
            _ => deduped.push(record),
        }
    }
    *records = deduped;
}
