use std::io::{Cursor, Write};
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use tracing::debug;

use crate::error::RosterError;
use crate::pdf::PdfRenderer;
use crate::query::{self, Summary};
use crate::roster::{Roster, Student};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Csv,
    Png,
    Jpg,
    Pdf,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Option<ExportFormat> {
        match raw.to_ascii_lowercase().as_str() {
            "txt" => Some(ExportFormat::Txt),
            "csv" => Some(ExportFormat::Csv),
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpg),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Minimal RFC4180-style quoting: names are always quoted, embedded
/// quotes doubled. Ids and scores stay bare.
pub fn escape_csv(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Bare score display for the single-record and CSV row layouts.
/// Integral values keep a trailing `.0` (80 renders as `80.0`,
/// 88.5 stays `88.5`).
pub(crate) fn fmt_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.1}", score)
    } else {
        score.to_string()
    }
}

pub fn render_single_txt(s: &Student) -> String {
    format!(
        "ID: {}\nName: {}\nScore: {}\n",
        s.id,
        s.name,
        fmt_score(s.score)
    )
}

pub fn render_single_csv(s: &Student) -> String {
    format!(
        "ID,Name,Score\n{},{},{}\n",
        s.id,
        escape_csv(&s.name),
        fmt_score(s.score)
    )
}

pub fn render_all_txt(students: &[Student], summary: &Summary) -> String {
    let mut out = String::from("All Students\n");
    for s in students {
        out.push_str(&format!(
            "ID: {}\tName: {}\tScore: {:.2}\n",
            s.id, s.name, s.score
        ));
    }
    out.push_str("\nSummary:\n");
    out.push_str(&format!("Count: {}\n", summary.count));
    out.push_str(&format!("Average: {:.2}\n", summary.average));
    out.push_str(&format!(
        "Highest: {:.2} (ID:{},{})\n",
        summary.highest.score, summary.highest.id, summary.highest.name
    ));
    out.push_str(&format!(
        "Lowest: {:.2} (ID:{},{})\n",
        summary.lowest.score, summary.lowest.id, summary.lowest.name
    ));
    out
}

/// Full-roster CSV. The trailing `#` lines carry the summary and are
/// comments, not data rows; strict CSV parsers must skip them.
pub fn render_all_csv(students: &[Student], summary: &Summary) -> String {
    let mut out = String::from("ID,Name,Score\n");
    for s in students {
        out.push_str(&format!(
            "{},{},{}\n",
            s.id,
            escape_csv(&s.name),
            fmt_score(s.score)
        ));
    }
    out.push_str("# Summary\n");
    out.push_str(&format!("# Count,{}\n", summary.count));
    out.push_str(&format!("# Average,{:.2}\n", summary.average));
    out.push_str(&format!(
        "# Highest,{},ID:{},Name:{}\n",
        fmt_score(summary.highest.score),
        summary.highest.id,
        escape_csv(&summary.highest.name)
    ));
    out.push_str(&format!(
        "# Lowest,{},ID:{},Name:{}\n",
        fmt_score(summary.lowest.score),
        summary.lowest.id,
        escape_csv(&summary.lowest.name)
    ));
    out
}

// Raster layout mirrors the styled roster table: 25px rows, a tinted
// header band, light grid lines, three equal columns. The third column
// gets a score-proportional bar since the core renders no glyphs.
const MIN_WIDTH: u32 = 600;
const MIN_HEIGHT: u32 = 300;
const ROW_HEIGHT: u32 = 25;
const HEADER_HEIGHT: u32 = 28;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);
const HEADER_FILL: Rgb<u8> = Rgb([200, 220, 240]);
const BAR_FILL: Rgb<u8> = Rgb([60, 130, 180]);

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x1 = (x + w).min(img.width());
    let y1 = (y + h).min(img.height());
    for yy in y..y1 {
        for xx in x..x1 {
            img.put_pixel(xx, yy, color);
        }
    }
}

/// Renders the roster table snapshot. Always at least 600x300 on a
/// white background; grows vertically with the row count.
pub fn render_table_image(students: &[Student]) -> RgbImage {
    let width = MIN_WIDTH;
    let height = (HEADER_HEIGHT + students.len() as u32 * ROW_HEIGHT + 8).max(MIN_HEIGHT);
    let mut img = RgbImage::from_pixel(width, height, WHITE);

    let col_width = width / 3;
    fill_rect(&mut img, 0, 0, width, HEADER_HEIGHT, HEADER_FILL);

    // Column separators and the header baseline.
    fill_rect(&mut img, col_width, 0, 1, height, GRID);
    fill_rect(&mut img, col_width * 2, 0, 1, height, GRID);
    fill_rect(&mut img, 0, HEADER_HEIGHT - 1, width, 1, GRID);

    for (row, s) in students.iter().enumerate() {
        let top = HEADER_HEIGHT + row as u32 * ROW_HEIGHT;
        fill_rect(&mut img, 0, top + ROW_HEIGHT - 1, width, 1, GRID);

        // Score bar in the third column, clamped to the 0-100 hint.
        let frac = (s.score / 100.0).clamp(0.0, 1.0);
        let bar_width = ((col_width - 12) as f64 * frac) as u32;
        fill_rect(&mut img, col_width * 2 + 6, top + 6, bar_width, ROW_HEIGHT - 12, BAR_FILL);
    }

    img
}

fn encode_image(img: &RgbImage, format: ImageFormat) -> Result<Vec<u8>, RosterError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)
        .map_err(|e| RosterError::Io(std::io::Error::other(e.to_string())))?;
    Ok(buf.into_inner())
}

/// Temp-then-rename in the destination directory, so a failed export
/// never leaves a partial file at `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), RosterError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| RosterError::Io(e.error))?;
    Ok(())
}

fn render_single(
    roster: &Roster,
    student: &Student,
    format: ExportFormat,
    pdf: Option<&dyn PdfRenderer>,
) -> Result<Vec<u8>, RosterError> {
    match format {
        ExportFormat::Txt => Ok(render_single_txt(student).into_bytes()),
        ExportFormat::Csv => Ok(render_single_csv(student).into_bytes()),
        // Image formats snapshot the whole roster table, not one row.
        ExportFormat::Png => encode_image(&render_table_image(roster.all()), ImageFormat::Png),
        ExportFormat::Jpg => encode_image(&render_table_image(roster.all()), ImageFormat::Jpeg),
        ExportFormat::Pdf => {
            let backend = pdf.ok_or_else(unavailable)?;
            backend.render_single(student)
        }
    }
}

fn render_all(
    roster: &Roster,
    format: ExportFormat,
    pdf: Option<&dyn PdfRenderer>,
) -> Result<Vec<u8>, RosterError> {
    let students = roster.all();
    match format {
        ExportFormat::Txt => {
            let summary = query::aggregate(students)?;
            Ok(render_all_txt(students, &summary).into_bytes())
        }
        ExportFormat::Csv => {
            let summary = query::aggregate(students)?;
            Ok(render_all_csv(students, &summary).into_bytes())
        }
        ExportFormat::Png => encode_image(&render_table_image(students), ImageFormat::Png),
        ExportFormat::Jpg => encode_image(&render_table_image(students), ImageFormat::Jpeg),
        ExportFormat::Pdf => {
            let backend = pdf.ok_or_else(unavailable)?;
            let summary = query::aggregate(students)?;
            backend.render_all(students, &summary)
        }
    }
}

fn unavailable() -> RosterError {
    RosterError::CapabilityUnavailable("PDF export requires the pdf backend".to_string())
}

pub fn export_single(
    roster: &Roster,
    id: i64,
    format: ExportFormat,
    path: &Path,
    pdf: Option<&dyn PdfRenderer>,
) -> Result<(), RosterError> {
    let student = roster
        .find_by_id(id)
        .ok_or_else(|| RosterError::not_found(format!("student {} not found", id)))?;
    let bytes = render_single(roster, student, format, pdf)?;
    write_atomic(path, &bytes)?;
    debug!(id, format = format.as_str(), path = %path.display(), "exported single");
    Ok(())
}

pub fn export_all(
    roster: &Roster,
    format: ExportFormat,
    path: &Path,
    pdf: Option<&dyn PdfRenderer>,
) -> Result<(), RosterError> {
    if roster.is_empty() {
        return Err(RosterError::EmptyInput);
    }
    let bytes = render_all(roster, format, pdf)?;
    write_atomic(path, &bytes)?;
    debug!(
        count = roster.len(),
        format = format.as_str(),
        path = %path.display(),
        "exported all"
    );
    Ok(())
}
