//! Parsing of the portal's CSV report body.
//!
//! Reports are multi-section CSVs. The section we want starts at the line
//! `Interest over time`, is followed by a column-header row, and ends at the
//! first blank line. Weekly rows carry a range cell
//! (`2004-01-04 - 2004-01-10`); the first day stands for the whole week.

use chrono::NaiveDate;

use trendq_core::{TimePoint, TimeSeries};

use crate::error::FetchError;

const INTEREST_OVER_TIME_HEADER: &str = "Interest over time";

/// Extracts the interest-over-time section from a CSV report body.
///
/// A report without the section yields an empty series — the portal omits it
/// entirely for queries with no measurable interest.
///
/// # Errors
///
/// Returns [`FetchError::Format`] when a section row is not `date,value`.
pub(crate) fn parse_report(body: &str, context: &str) -> Result<TimeSeries, FetchError> {
    let mut lines = body.lines();
    if !lines.any(|line| line.trim() == INTEREST_OVER_TIME_HEADER) {
        return Ok(TimeSeries::default());
    }

    // The section runs to the first blank line; its first row is the column
    // header ("Week,term" / "Day,term" / "Month,term"), not data. Bounding
    // the section before skipping keeps a header with no rows at all from
    // bleeding into whatever section follows.
    let section = lines
        .map(str::trim)
        .take_while(|line| !line.is_empty())
        .skip(1);

    let mut points = Vec::new();
    for line in section {
        points.push(parse_row(line, context)?);
    }
    Ok(TimeSeries::new(points))
}

fn parse_row(line: &str, context: &str) -> Result<TimePoint, FetchError> {
    let malformed = |reason: String| FetchError::Format {
        context: context.to_owned(),
        reason,
    };

    let (date_cell, value_cell) = line
        .split_once(',')
        .ok_or_else(|| malformed(format!("row \"{line}\" has no value column")))?;

    let date = parse_date_cell(date_cell.trim())
        .ok_or_else(|| malformed(format!("unparseable date \"{date_cell}\"")))?;

    // A joint query returns one count column per term; we only ever send one.
    let first_value = value_cell.split(',').next().unwrap_or("").trim();
    let value: u32 = first_value
        .parse()
        .map_err(|_| malformed(format!("unparseable value \"{first_value}\"")))?;

    Ok(TimePoint { date, value })
}

fn parse_date_cell(cell: &str) -> Option<NaiveDate> {
    // Range cells are longer than a bare date; the first day stands in.
    // `get` keeps a cell whose tenth byte is mid-character on the error path
    // instead of panicking.
    let head = cell.get(..10).unwrap_or(cell);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            // Monthly reports use year-month cells.
            NaiveDate::parse_from_str(&format!("{}-01", head.trim()), "%Y-%m-%d").ok()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_weekly_section() {
        let body = "Web Search interest: tesla\nWorldwide; Jan 2010\n\n\
                    Interest over time\n\
                    Week,tesla\n\
                    2010-01-03 - 2010-01-09,45\n\
                    2010-01-10 - 2010-01-16,47\n\
                    \n\
                    Top regions\nCalifornia,100\n";
        let series = parse_report(body, "tesla").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series.points()[0],
            TimePoint {
                date: date(2010, 1, 3),
                value: 45
            }
        );
        assert_eq!(series.points()[1].value, 47);
    }

    #[test]
    fn parses_daily_and_monthly_cells() {
        let body = "Interest over time\nDay,x\n2012-05-01,3\n2012-06,12\n";
        let series = parse_report(body, "x").unwrap();
        assert_eq!(series.points()[0].date, date(2012, 5, 1));
        assert_eq!(series.points()[1].date, date(2012, 6, 1));
    }

    #[test]
    fn missing_section_yields_empty_series() {
        let series = parse_report("Top regions\nCalifornia,100\n", "x").unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn stops_at_blank_line_before_next_section() {
        let body = "Interest over time\nWeek,x\n2010-01-03 - 2010-01-09,45\n\nTop regions\nTexas,88\n";
        let series = parse_report(body, "x").unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn malformed_row_is_a_format_error() {
        let body = "Interest over time\nWeek,x\nnot a row at all\n";
        let err = parse_report(body, "x").unwrap_err();
        assert!(matches!(err, FetchError::Format { .. }), "{err}");
    }

    #[test]
    fn multibyte_garbage_in_date_cell_is_a_format_error() {
        // Tenth byte lands mid-character; must stay on the error path.
        let body = "Interest over time\nWeek,x\n2010-01-0ää,45\n";
        let err = parse_report(body, "x").unwrap_err();
        assert!(matches!(err, FetchError::Format { .. }), "{err}");
    }

    #[test]
    fn header_with_no_column_row_yields_empty_series() {
        let body = "Interest over time\n\nTop regions\nTexas,88\n";
        let series = parse_report(body, "x").unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn malformed_value_is_a_format_error() {
        let body = "Interest over time\nWeek,x\n2010-01-03,many\n";
        let err = parse_report(body, "x").unwrap_err();
        assert!(matches!(err, FetchError::Format { .. }), "{err}");
    }

    #[test]
    fn joint_query_rows_keep_the_first_count_column() {
        let body = "Interest over time\nWeek,x,y\n2010-01-03 - 2010-01-09,45,80\n";
        let series = parse_report(body, "x").unwrap();
        assert_eq!(series.points()[0].value, 45);
    }
}
