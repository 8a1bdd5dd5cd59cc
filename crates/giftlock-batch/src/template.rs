//! Batch template export and entry re-export.

use chrono::{DateTime, Utc};
use giftlock_types::BulkEntry;

/// Header row emitted by both exports and recognized by the parser.
const EXPORT_HEADER: &str = "recipient,amount,unlock_date,message";

/// Returns the downloadable example table.
///
/// Five illustrative rows covering raw addresses, aliases, quoted messages,
/// and an empty message. The parser does not depend on this; it exists so
/// users have a correct file to start from.
pub fn template_table() -> String {
	[
		EXPORT_HEADER,
		"0x1111111111111111111111111111111111111111,0.05,2027-12-25 00:00:00,Merry Christmas!",
		"alice.base.eth,1.5,2027-01-01,Happy new year",
		"bob.base.eth,0.25,2027-06-15 18:30:00,\"Congrats, you earned it\"",
		"0x2222222222222222222222222222222222222222,10,2027-03-01,",
		"carol.base.eth,2,2027-09-09 09:00:00,See you at nine",
	]
	.join("\n")
}

/// Renders entries back into the delimited format the parser accepts.
///
/// Unlock timestamps are written as `YYYY-MM-DD HH:MM:SS` in UTC, so a
/// re-parse reproduces the same intents without default-date warnings.
pub fn entries_to_table(entries: &[BulkEntry]) -> String {
	let mut table = String::from(EXPORT_HEADER);
	for entry in entries {
		table.push('\n');
		table.push_str(&escape_field(entry.intent.recipient.as_input()));
		table.push(',');
		table.push_str(&escape_field(entry.intent.asset.amount_str()));
		table.push(',');
		table.push_str(&format_unlock(entry.intent.unlock_timestamp));
		table.push(',');
		table.push_str(&escape_field(&entry.intent.message));
	}
	table
}

fn format_unlock(timestamp: u64) -> String {
	DateTime::<Utc>::from_timestamp(timestamp as i64, 0)
		.map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
		.unwrap_or_default()
}

/// Quotes a field when needed, doubling embedded quotes.
fn escape_field(field: &str) -> String {
	let flat = field.replace(['\r', '\n'], " ");
	if flat.contains(',') || flat.contains('"') {
		format!("\"{}\"", flat.replace('"', "\"\""))
	} else {
		flat
	}
}
