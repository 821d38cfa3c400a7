//! Optional PDF backend. The original app probed the classpath at
//! startup and only enabled PDF export when a renderer was present;
//! here the probe is a compile-time feature and the seam is a trait,
//! so the rest of the daemon never names a concrete PDF library.

use crate::error::RosterError;
use crate::query::Summary;
use crate::roster::Student;

pub trait PdfRenderer {
    /// One page, the three text-export lines at 12pt.
    fn render_single(&self, student: &Student) -> Result<Vec<u8>, RosterError>;

    /// One page, a line per student plus the summary block at 10pt.
    fn render_all(&self, students: &[Student], summary: &Summary) -> Result<Vec<u8>, RosterError>;
}

/// Capability probe run once at startup. `None` means every PDF export
/// request answers `capability_unavailable` without touching disk.
pub fn probe() -> Option<Box<dyn PdfRenderer>> {
    #[cfg(feature = "pdf")]
    {
        Some(Box::new(printpdf_backend::PrintPdfRenderer))
    }
    #[cfg(not(feature = "pdf"))]
    {
        None
    }
}

#[cfg(feature = "pdf")]
mod printpdf_backend {
    use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

    use super::PdfRenderer;
    use crate::error::RosterError;
    use crate::query::Summary;
    use crate::roster::Student;

    pub struct PrintPdfRenderer;

    // US Letter, matching the original's default page.
    const PAGE_W_MM: f64 = 215.9;
    const PAGE_H_MM: f64 = 279.4;

    fn render_err(e: impl std::fmt::Display) -> RosterError {
        RosterError::Io(std::io::Error::other(e.to_string()))
    }

    fn write_lines(
        layer: &PdfLayerReference,
        font: &IndirectFontRef,
        size: f64,
        lines: &[String],
    ) {
        layer.begin_text_section();
        layer.set_font(font, size);
        layer.set_text_cursor(Mm(18.0), Mm(PAGE_H_MM - 20.0));
        layer.set_line_height(size + 2.0);
        for line in lines {
            layer.write_text(line.clone(), font);
            layer.add_line_break();
        }
        layer.end_text_section();
    }

    fn render_document(title: &str, size: f64, lines: &[String]) -> Result<Vec<u8>, RosterError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W_MM), Mm(PAGE_H_MM), "content");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_err)?;
        write_lines(&doc.get_page(page).get_layer(layer), &font, size, lines);
        doc.save_to_bytes().map_err(render_err)
    }

    impl PdfRenderer for PrintPdfRenderer {
        fn render_single(&self, student: &Student) -> Result<Vec<u8>, RosterError> {
            let lines = vec![
                format!("ID: {}", student.id),
                format!("Name: {}", student.name),
                format!("Score: {}", crate::export::fmt_score(student.score)),
            ];
            render_document("Student Export", 12.0, &lines)
        }

        fn render_all(
            &self,
            students: &[Student],
            summary: &Summary,
        ) -> Result<Vec<u8>, RosterError> {
            let mut lines: Vec<String> = students
                .iter()
                .map(|s| format!("ID:{}  Name:{}  Score:{:.2}", s.id, s.name, s.score))
                .collect();
            lines.push(String::new());
            lines.push("Summary:".to_string());
            lines.push(format!("Count: {}", summary.count));
            lines.push(format!("Average: {:.2}", summary.average));
            lines.push(format!(
                "Highest: {:.2} (ID:{},{})",
                summary.highest.score, summary.highest.id, summary.highest.name
            ));
            lines.push(format!(
                "Lowest: {:.2} (ID:{},{})",
                summary.lowest.score, summary.lowest.id, summary.lowest.name
            ));
            render_document("All Students", 10.0, &lines)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn rendered_documents_carry_the_pdf_magic() {
            let s = Student {
                id: 101,
                name: "rahul".into(),
                score: 80.0,
            };
            let bytes = PrintPdfRenderer.render_single(&s).unwrap();
            assert!(bytes.starts_with(b"%PDF"));
            assert!(!bytes.is_empty());
        }
    }
}
