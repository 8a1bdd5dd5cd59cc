//! Delimited batch file parsing.
//!
//! A batch file is a comma-delimited table with a header row naming the
//! columns. Rows are parsed independently: a malformed row lands in the
//! error list and the rest of the batch goes on. Only structural problems
//! (missing required column, too many rows) reject the file as a whole.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use giftlock_types::utils::current_timestamp;
use giftlock_types::{Address, AssetSelection, BulkEntry, GiftIntent, RecipientIdentifier};
use thiserror::Error;

/// Hard cap on data rows per batch.
pub const MAX_BATCH_ENTRIES: usize = 100;

/// Default unlock offset applied when a row has no unlock date.
pub const DEFAULT_UNLOCK_OFFSET_SECS: u64 = 86_400;

/// Accepted header spellings for the recipient column.
const RECIPIENT_HEADERS: &[&str] = &["recipient", "address", "to", "wallet"];
/// Accepted header spellings for the amount column.
const AMOUNT_HEADERS: &[&str] = &["amount", "value", "qty", "quantity"];
/// Accepted header spellings for the optional unlock date column.
const UNLOCK_HEADERS: &[&str] = &["unlock_date", "unlock", "date", "unlock_time"];
/// Accepted header spellings for the optional message column.
const MESSAGE_HEADERS: &[&str] = &["message", "note", "memo"];

/// Errors that reject a batch file as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
	/// Error that occurs when the file has no data rows.
	#[error("Batch file contains no data rows")]
	Empty,
	/// Error that occurs when the header lacks a required column.
	#[error("Missing required column: {0}")]
	MissingColumn(&'static str),
	/// Error that occurs when the file exceeds the entry cap.
	#[error("Batch has {count} rows, exceeding the limit of {limit}")]
	LimitExceeded { count: usize, limit: usize },
}

/// The asset every row of a batch gifts; rows only vary the amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetTemplate {
	/// Each amount is in whole native coins.
	Native,
	/// Each amount is in whole tokens of one ERC-20.
	Fungible { token: Address, decimals: u8 },
}

impl AssetTemplate {
	/// Instantiates the template with one row's amount.
	pub fn selection(&self, amount: String) -> AssetSelection {
		match self {
			AssetTemplate::Native => AssetSelection::Native { amount },
			AssetTemplate::Fungible { token, decimals } => AssetSelection::Fungible {
				token: token.clone(),
				decimals: *decimals,
				amount,
			},
		}
	}
}

/// Everything a parse produced.
///
/// `batch_error` being set means the file was rejected before any entries
/// were kept; row-level problems live in `errors` and never empty `entries`.
#[derive(Debug, Clone, Default)]
pub struct BatchParseOutcome {
	/// Entries in input row order, all in `Pending` state.
	pub entries: Vec<BulkEntry>,
	/// Row-level errors, each prefixed with the 1-indexed file row.
	pub errors: Vec<String>,
	/// Row-level warnings, same prefix convention as errors.
	pub warnings: Vec<String>,
	/// Structural rejection of the whole file, if any.
	pub batch_error: Option<BatchError>,
}

/// Resolved positions of the recognized columns in the header row.
struct Columns {
	recipient: usize,
	amount: usize,
	unlock: Option<usize>,
	message: Option<usize>,
}

/// Parses batch files for one asset template.
pub struct BatchParser {
	template: AssetTemplate,
	alias_suffix: String,
}

impl BatchParser {
	/// Creates a parser that applies `template` to every row.
	pub fn new(template: AssetTemplate, alias_suffix: impl Into<String>) -> Self {
		Self {
			template,
			alias_suffix: alias_suffix.into(),
		}
	}

	/// Parses a whole batch file.
	///
	/// Row numbers in errors and warnings are 1-indexed file lines, so with
	/// the header on line 1 the first data row is row 2. Entry ids are
	/// derived from those row numbers and re-parsing the same file yields
	/// the same ids.
	pub fn parse(&self, content: &str) -> BatchParseOutcome {
		let mut outcome = BatchParseOutcome::default();

		let mut lines = content.lines();
		let header = match lines.next() {
			Some(line) if !line.trim().is_empty() => line,
			_ => {
				outcome.batch_error = Some(BatchError::Empty);
				return outcome;
			}
		};
		let columns = match locate_columns(header) {
			Ok(columns) => columns,
			Err(e) => {
				outcome.batch_error = Some(e);
				return outcome;
			}
		};

		let now = current_timestamp();
		let mut data_rows = 0usize;
		for (index, line) in lines.enumerate() {
			if line.trim().is_empty() {
				continue;
			}
			data_rows += 1;
			// Header is line 1, so this data line is at index + 2.
			let file_row = index + 2;
			match self.parse_row(file_row, line, &columns, now) {
				Ok((entry, warning)) => {
					outcome.entries.push(entry);
					if let Some(warning) = warning {
						outcome.warnings.push(format!("row {}: {}", file_row, warning));
					}
				}
				Err(e) => outcome.errors.push(format!("row {}: {}", file_row, e)),
			}
		}

		if data_rows == 0 {
			outcome.batch_error = Some(BatchError::Empty);
			return outcome;
		}
		if data_rows > MAX_BATCH_ENTRIES {
			outcome.entries.clear();
			outcome.errors.clear();
			outcome.warnings.clear();
			outcome.batch_error = Some(BatchError::LimitExceeded {
				count: data_rows,
				limit: MAX_BATCH_ENTRIES,
			});
			return outcome;
		}

		tracing::debug!(
			entries = outcome.entries.len(),
			errors = outcome.errors.len(),
			warnings = outcome.warnings.len(),
			"Parsed batch file"
		);
		outcome
	}

	/// Parses one data row into an entry, or a row error.
	fn parse_row(
		&self,
		file_row: usize,
		line: &str,
		columns: &Columns,
		now: u64,
	) -> Result<(BulkEntry, Option<String>), String> {
		let cells = split_row(line);

		let recipient_raw = cell(&cells, columns.recipient);
		if recipient_raw.is_empty() {
			return Err("recipient is empty".to_string());
		}
		let recipient = RecipientIdentifier::classify(recipient_raw, &self.alias_suffix);
		if let RecipientIdentifier::Invalid(value) = &recipient {
			return Err(format!("unresolvable recipient '{}'", value));
		}

		let amount_raw = cell(&cells, columns.amount);
		if amount_raw.is_empty() {
			return Err("amount is empty".to_string());
		}
		let asset = self.template.selection(amount_raw.to_string());
		let issues = asset.validate();
		if !issues.is_empty() {
			let joined = issues
				.iter()
				.map(|issue| issue.to_string())
				.collect::<Vec<_>>()
				.join("; ");
			return Err(joined);
		}

		let unlock_raw = columns.unlock.map(|i| cell(&cells, i)).unwrap_or("");
		let (unlock_timestamp, warning) = if unlock_raw.is_empty() {
			(
				now + DEFAULT_UNLOCK_OFFSET_SECS,
				Some("no unlock date provided, defaulting to 24 hours from now".to_string()),
			)
		} else {
			let parsed = parse_unlock_date(unlock_raw)
				.ok_or_else(|| format!("invalid unlock date '{}'", unlock_raw))?;
			if parsed <= now {
				return Err(format!("unlock date '{}' is in the past", unlock_raw));
			}
			(parsed, None)
		};

		let message = columns
			.message
			.map(|i| cell(&cells, i))
			.unwrap_or("")
			.to_string();

		let intent = GiftIntent {
			recipient,
			asset,
			unlock_timestamp,
			message,
		};
		Ok((BulkEntry::new(file_row, intent), warning))
	}
}

/// Returns the trimmed cell at `index`, or "" when the row is short.
fn cell(cells: &[String], index: usize) -> &str {
	cells.get(index).map(|s| s.trim()).unwrap_or("")
}

/// Locates the recognized columns in the header row.
fn locate_columns(header: &str) -> Result<Columns, BatchError> {
	let names: Vec<String> = split_row(header)
		.iter()
		.map(|cell| cell.trim().to_lowercase())
		.collect();
	let find = |synonyms: &[&str]| names.iter().position(|name| synonyms.contains(&name.as_str()));

	Ok(Columns {
		recipient: find(RECIPIENT_HEADERS).ok_or(BatchError::MissingColumn("recipient"))?,
		amount: find(AMOUNT_HEADERS).ok_or(BatchError::MissingColumn("amount"))?,
		unlock: find(UNLOCK_HEADERS),
		message: find(MESSAGE_HEADERS),
	})
}

/// Splits one line into cells, honoring quoted fields.
///
/// A quote opens only at the start of a cell; inside a quoted cell a doubled
/// quote is a literal quote and a comma is plain content.
pub(crate) fn split_row(line: &str) -> Vec<String> {
	let mut cells = Vec::new();
	let mut current = String::new();
	let mut in_quotes = false;
	let mut chars = line.chars().peekable();

	while let Some(c) = chars.next() {
		match c {
			'"' if in_quotes => {
				if chars.peek() == Some(&'"') {
					chars.next();
					current.push('"');
				} else {
					in_quotes = false;
				}
			}
			'"' if current.is_empty() => in_quotes = true,
			',' if !in_quotes => cells.push(std::mem::take(&mut current)),
			_ => current.push(c),
		}
	}
	cells.push(current);
	cells
}

/// Parses an unlock date in any of the accepted forms into Unix seconds.
///
/// Accepts RFC 3339, `YYYY-MM-DD` with an optional time, `MM/DD/YYYY`, and
/// `DD-MM-YYYY`. Date-only forms mean midnight UTC.
pub fn parse_unlock_date(raw: &str) -> Option<u64> {
	let raw = raw.trim();

	if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
		return u64::try_from(dt.timestamp()).ok();
	}
	for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
		if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
			return u64::try_from(naive.and_utc().timestamp()).ok();
		}
	}
	for format in ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"] {
		if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
			let midnight = date.and_hms_opt(0, 0, 0)?;
			return u64::try_from(midnight.and_utc().timestamp()).ok();
		}
	}
	None
}
