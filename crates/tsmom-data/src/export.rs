//! CSV and JSON export of panels and signal rows.
//!
//! Panels are written wide: the key column (`date` or `month`) followed by
//! one column per instrument, with undefined cells left empty (CSV) or
//! `null` (JSON). Monthly CSV files can be read back with the first column
//! as the month index, whatever its header.

use std::{
    fmt,
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
    str::FromStr,
};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tsmom_traits::{FrameKey, InstrumentId, MonthlyPanel, Panel, YearMonth};

use crate::{DataError, Result};

/// Export format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values.
    #[default]
    Csv,
    /// Pretty-printed JSON array of objects.
    Json,
}

impl ExportFormat {
    /// File extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(DataError::MalformedInput(format!(
                "unknown export format '{other}', expected csv or json"
            ))),
        }
    }
}

/// Write `panel` in `format`.
pub fn write_panel<K: FrameKey, W: Write>(
    panel: &Panel<K>,
    format: ExportFormat,
    writer: W,
) -> Result<()> {
    match format {
        ExportFormat::Csv => write_panel_csv(panel, writer),
        ExportFormat::Json => write_panel_json(panel, writer),
    }
}

/// Write `panel` to a file, creating or truncating it.
pub fn write_panel_to_path<K: FrameKey>(
    panel: &Panel<K>,
    format: ExportFormat,
    path: impl AsRef<Path>,
) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_panel(panel, format, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_panel_csv<K: FrameKey, W: Write>(panel: &Panel<K>, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![K::INDEX_COLUMN.to_string()];
    header.extend(panel.columns().iter().map(|id| id.to_string()));
    wtr.write_record(&header)?;

    for (key, row) in panel.rows() {
        let mut record = vec![key.to_string()];
        record.extend(row.iter().map(|v| format_cell(*v)));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_panel_json<K: FrameKey, W: Write>(panel: &Panel<K>, writer: W) -> Result<()> {
    let records: Vec<Value> = panel
        .rows()
        .map(|(key, row)| {
            let mut object = Map::new();
            object.insert(K::INDEX_COLUMN.to_string(), Value::String(key.to_string()));
            for (id, v) in panel.columns().iter().zip(row.iter()) {
                let cell = serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number);
                object.insert(id.to_string(), cell);
            }
            Value::Object(object)
        })
        .collect();
    serde_json::to_writer_pretty(writer, &records)?;
    Ok(())
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Read a wide monthly CSV written by [`write_panel`].
///
/// The first column is the month index (`YYYY-MM`, or a full date whose
/// month is taken); every other column is an instrument. Empty cells are
/// undefined.
///
/// # Errors
///
/// Returns [`DataError::MalformedInput`] for an unparseable month or value
/// and [`DataError::Core`] for repeated or unordered months.
pub fn read_monthly_panel<R: Read>(reader: R) -> Result<MonthlyPanel> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(DataError::MalformedInput("missing header row".to_string()));
    }
    let columns: Vec<InstrumentId> = headers.iter().skip(1).map(InstrumentId::from).collect();

    let mut months = Vec::new();
    let mut values = Vec::new();
    for (n, record) in rdr.records().enumerate() {
        let record = record?;
        let line = n + 2;
        let month_field = record.get(0).unwrap_or("");
        let month = YearMonth::from_str(month_field).map_err(|_| {
            DataError::MalformedInput(format!("line {line}: unparseable month '{month_field}'"))
        })?;
        months.push(month);

        for j in 0..columns.len() {
            let cell = record.get(j + 1).unwrap_or("");
            let value = if cell.is_empty() {
                f64::NAN
            } else {
                cell.parse().map_err(|_| {
                    DataError::MalformedInput(format!("line {line}: unparseable value '{cell}'"))
                })?
            };
            values.push(value);
        }
    }

    let values = Array2::from_shape_vec((months.len(), columns.len()), values)
        .map_err(|e| DataError::MalformedInput(format!("ragged table: {e}")))?;
    Ok(MonthlyPanel::new(months, columns, values)?)
}

/// Read a wide monthly CSV file.
pub fn read_monthly_panel_path(path: impl AsRef<Path>) -> Result<MonthlyPanel> {
    read_monthly_panel(File::open(path)?)
}

/// Write serializable rows, one record per element.
pub fn write_records<T: Serialize, W: Write>(
    records: &[T],
    format: ExportFormat,
    writer: W,
) -> Result<()> {
    match format {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(writer);
            for record in records {
                wtr.serialize(record)?;
            }
            wtr.flush()?;
        }
        ExportFormat::Json => serde_json::to_writer_pretty(writer, records)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rstest::rstest;
    use tsmom_traits::{DailyPanel, Date};

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    fn monthly() -> MonthlyPanel {
        MonthlyPanel::new(
            vec![ym(2005, 1), ym(2005, 2)],
            vec!["Equities|SPX".into(), "Fixed Income|JPMTUS".into()],
            array![[0.15, f64::NAN], [0.1234567890123, 0.05]],
        )
        .unwrap()
    }

    #[test]
    fn test_csv_layout() {
        let mut buf = Vec::new();
        write_panel(&monthly(), ExportFormat::Csv, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "month,Equities|SPX,Fixed Income|JPMTUS");
        assert_eq!(lines[1], "2005-01,0.15,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_read_back() {
        let mut buf = Vec::new();
        write_panel(&monthly(), ExportFormat::Csv, &mut buf).unwrap();
        let back = read_monthly_panel(buf.as_slice()).unwrap();
        assert_eq!(back.index(), monthly().index());
        assert_eq!(back.columns(), monthly().columns());
        assert_eq!(back.get(&ym(2005, 1), &"Fixed Income|JPMTUS".into()), None);
        assert_relative_eq!(
            back.get(&ym(2005, 2), &"Equities|SPX".into()).unwrap(),
            0.1234567890123
        );
    }

    #[test]
    fn test_read_anchor_dates_and_any_index_header() {
        let csv = ",a\n2005-01-28,0.2\n2005-02-28,\n";
        let panel = read_monthly_panel(csv.as_bytes()).unwrap();
        assert_eq!(panel.index(), &[ym(2005, 1), ym(2005, 2)]);
        assert_eq!(panel.get(&ym(2005, 1), &"a".into()), Some(0.2));
        assert_eq!(panel.get(&ym(2005, 2), &"a".into()), None);
    }

    #[rstest]
    #[case("month,a\nJan,0.1\n")]
    #[case("month,a\n2005-01,abc\n")]
    fn test_read_malformed(#[case] csv: &str) {
        assert!(matches!(
            read_monthly_panel(csv.as_bytes()),
            Err(DataError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_json_daily_panel() {
        let d = Date::from_ymd_opt(2020, 1, 2).unwrap();
        let panel = DailyPanel::new(vec![d], vec!["a".into()], array![[f64::NAN]]).unwrap();
        let mut buf = Vec::new();
        write_panel(&panel, ExportFormat::Json, &mut buf).unwrap();
        let json: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json[0]["date"], "2020-01-02");
        assert!(json[0]["a"].is_null());
    }

    #[test]
    fn test_write_records_csv() {
        #[derive(Serialize)]
        struct Row {
            month: YearMonth,
            value: Option<f64>,
        }
        let rows = vec![
            Row { month: ym(2005, 1), value: Some(0.5) },
            Row { month: ym(2005, 2), value: None },
        ];
        let mut buf = Vec::new();
        write_records(&rows, ExportFormat::Csv, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "month,value\n2005-01,0.5\n2005-02,\n"
        );
    }

    #[rstest]
    #[case("csv", ExportFormat::Csv)]
    #[case("JSON", ExportFormat::Json)]
    fn test_format_from_str(#[case] s: &str, #[case] expected: ExportFormat) {
        assert_eq!(s.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_format() {
        assert!("parquet".parse::<ExportFormat>().is_err());
    }
}
