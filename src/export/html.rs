//! Printable HTML export.
//!
//! Renders a standalone document with one table row per exam. Row order
//! follows the input (callers pre-sort). The status column uses the
//! two-way [`PrintStatus`] rule, not the live view's three-way status.

use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::exam::ExamRecord;
use crate::model::status::{today_local, PrintStatus};
use crate::security::escape::escape_html;

const DOCUMENT_TITLE: &str = "Calendario de Exámenes";

const STYLE: &str = r#"
        body { font-family: system-ui, -apple-system, sans-serif; line-height: 1.5; color: #1e293b; max-width: 800px; margin: 0 auto; padding: 2rem; }
        h1 { color: #4f46e5; border-bottom: 2px solid #e2e8f0; padding-bottom: 0.5rem; }
        table { width: 100%; border-collapse: collapse; margin-top: 2rem; box-shadow: 0 4px 6px -1px rgb(0 0 0 / 0.1); border-radius: 0.5rem; overflow: hidden; }
        th, td { padding: 1rem; text-align: left; border-bottom: 1px solid #e2e8f0; }
        th { background-color: #f8fafc; font-weight: 600; color: #475569; }
        tr:last-child td { border-bottom: none; }
        .status-upcoming { background-color: #f0fdf4; color: #166534; padding: 0.25rem 0.75rem; border-radius: 9999px; font-size: 0.875rem; font-weight: 500; }
        .status-ongoing { background-color: #fff7ed; color: #9a3412; padding: 0.25rem 0.75rem; border-radius: 9999px; font-size: 0.875rem; font-weight: 500; }
        .status-completed { background-color: #f1f5f9; color: #475569; padding: 0.25rem 0.75rem; border-radius: 9999px; font-size: 0.875rem; font-weight: 500; }
        .date { font-weight: 500; }
        .time { font-size: 0.875rem; color: #64748b; }
        footer { margin-top: 2rem; font-size: 0.875rem; color: #64748b; text-align: center; }
        @media print { body { padding: 0; } table { box-shadow: none; } }
"#;

/// Render the printable table with today's local date.
pub fn to_printable_html(records: &[ExamRecord]) -> String {
    to_printable_html_on(records, today_local())
}

/// Render the printable table against an explicit `today`.
pub fn to_printable_html_on(records: &[ExamRecord], today: NaiveDate) -> String {
    let mut rows = String::new();
    for record in records {
        let status = PrintStatus::derive(record, today);
        // Writing to a String cannot fail.
        let _ = write!(
            rows,
            r#"
                <tr>
                    <td>
                        <div class="date">{date}</div>
                        <div class="time">{time}</div>
                    </td>
                    <td>{subject}</td>
                    <td>{title}</td>
                    <td>{location}</td>
                    <td><span class="{class}">{label}</span></td>
                </tr>"#,
            date = escape_html(&display_date(record)),
            time = escape_html(&record.time),
            subject = escape_html(&record.subject),
            title = escape_html(&record.title),
            location = escape_html(&record.location),
            class = status.css_class(),
            label = status.label(),
        );
    }

    log::debug!("EXPORT_HTML rows={} today={}", records.len(), today);

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}    </style>
</head>
<body>
    <h1>{title}</h1>
    <table>
        <thead>
            <tr>
                <th>Fecha</th>
                <th>Materia</th>
                <th>Examen</th>
                <th>Ubicación</th>
                <th>Estado</th>
            </tr>
        </thead>
        <tbody>{rows}
        </tbody>
    </table>
    <footer>Generado el {generated} con ExamPlanner Pro</footer>
</body>
</html>
"#,
        title = DOCUMENT_TITLE,
        style = STYLE,
        rows = rows,
        generated = format_numeric_es(today),
    )
}

/// Short Spanish date (`lun, 5 ene`); falls back to the raw string for
/// dates that are well-formed but not real days.
fn display_date(record: &ExamRecord) -> String {
    match record.calendar_date() {
        Some(date) => format_short_es(date),
        None => record.date.clone(),
    }
}

pub fn format_short_es(date: NaiveDate) -> String {
    format!(
        "{}, {} {}",
        weekday_short_es(date.weekday()),
        date.day(),
        month_short_es(date.month())
    )
}

/// `d/m/yyyy`
pub fn format_numeric_es(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

fn weekday_short_es(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "lun",
        Weekday::Tue => "mar",
        Weekday::Wed => "mié",
        Weekday::Thu => "jue",
        Weekday::Fri => "vie",
        Weekday::Sat => "sáb",
        Weekday::Sun => "dom",
    }
}

fn month_short_es(month: u32) -> &'static str {
    match month {
        1 => "ene",
        2 => "feb",
        3 => "mar",
        4 => "abr",
        5 => "may",
        6 => "jun",
        7 => "jul",
        8 => "ago",
        9 => "sept",
        10 => "oct",
        11 => "nov",
        _ => "dic",
    }
}
