use crate::error::ExportResult;
use crate::model::ScheduleResult;
use crate::scheduling::DailyAllocationRow;
use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const TSV_HEADER: [&str; 7] = [
    "タスクNo",
    "タスク名",
    "担当者",
    "予定開始日",
    "予定終了日",
    "予定工数",
    "エラー",
];

const DATE_FORMAT: &str = "%Y/%m/%d";

fn format_date(value: Option<NaiveDate>) -> String {
    value
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn format_hours(value: Option<f64>) -> String {
    value.map(|hours| hours.to_string()).unwrap_or_default()
}

/// Fields are written unquoted, so tabs and line breaks become spaces.
fn tsv_field(value: &str) -> String {
    value.replace(['\t', '\r', '\n'], " ")
}

fn result_record(result: &ScheduleResult) -> [String; 7] {
    [
        tsv_field(&result.task_no),
        tsv_field(&result.task_name),
        result.assignee_name.as_deref().map(tsv_field).unwrap_or_default(),
        format_date(result.planned_start),
        format_date(result.planned_end),
        format_hours(result.planned_hours),
        result.error_message.as_deref().map(tsv_field).unwrap_or_default(),
    ]
}

/// Write the header and one tab-separated row per result; fields are not quoted.
pub fn write_tsv<W: Write>(results: &[ScheduleResult], writer: W) -> ExportResult<W> {
    let mut tsv = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    tsv.write_record(TSV_HEADER)?;
    for result in results {
        tsv.write_record(result_record(result))?;
    }
    tsv.flush()?;
    Ok(tsv.into_inner().map_err(|err| err.into_error())?)
}

/// Render results as TSV text: rows joined by `\n`, no trailing newline.
pub fn convert_to_tsv(results: &[ScheduleResult]) -> ExportResult<String> {
    let bytes = write_tsv(results, Vec::new())?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

pub fn save_tsv<P: AsRef<Path>>(results: &[ScheduleResult], path: P) -> ExportResult<()> {
    let file = File::create(path)?;
    write_tsv(results, file)?;
    Ok(())
}

pub fn write_daily_rows_csv<W: Write>(rows: &[DailyAllocationRow], writer: W) -> ExportResult<W> {
    let mut csv_writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(csv_writer.into_inner().map_err(|err| err.into_error())?)
}

pub fn save_daily_rows_to_csv<P: AsRef<Path>>(
    rows: &[DailyAllocationRow],
    path: P,
) -> ExportResult<()> {
    let file = File::create(path)?;
    write_daily_rows_csv(rows, file)?;
    Ok(())
}
