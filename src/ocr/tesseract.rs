//! Tesseract OCR backend implementation.
//!
//! Uses Tesseract OCR via command-line in TSV mode so each recognized line
//! comes back with its box and confidence.

use std::path::Path;
use std::process::Command;

use super::backend::{BoundingBox, Detection, OcrBackend, OcrBackendType, OcrConfig, OcrError};
use super::model_utils::check_binary;

/// TSV row level for a single word.
const WORD_LEVEL: u32 = 5;

/// Tesseract OCR backend.
pub struct TesseractBackend {
    config: OcrConfig,
}

impl TesseractBackend {
    /// Create a new Tesseract backend with custom configuration.
    pub fn with_config(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Run Tesseract on an image file and return its TSV report.
    fn run_tesseract_tsv(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.config.language])
            .arg("tsv")
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::OcrFailed(format!("tesseract failed: {}", stderr)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(
                    "tesseract not found (install tesseract-ocr)".to_string(),
                ))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl OcrBackend for TesseractBackend {
    fn backend_type(&self) -> OcrBackendType {
        OcrBackendType::Tesseract
    }

    fn is_available(&self) -> bool {
        check_binary("tesseract")
    }

    fn availability_hint(&self) -> String {
        if check_binary("tesseract") {
            format!("Tesseract is available (language: {})", self.config.language)
        } else {
            "Tesseract not installed. Install with: apt install tesseract-ocr".to_string()
        }
    }

    fn detect(&self, image_path: &Path) -> Result<Vec<Detection>, OcrError> {
        let tsv = self.run_tesseract_tsv(image_path)?;
        parse_tsv_lines(&tsv)
    }
}

/// Line being assembled from word rows.
struct LineAcc {
    key: (u32, u32, u32, u32),
    words: Vec<String>,
    bbox: BoundingBox,
    conf_sum: f32,
    conf_count: u32,
}

impl LineAcc {
    fn finish(self) -> Option<Detection> {
        let text = self.words.join(" ");
        if text.trim().is_empty() {
            return None;
        }
        let confidence = if self.conf_count > 0 {
            Some(self.conf_sum / self.conf_count as f32 / 100.0)
        } else {
            None
        };
        Some(Detection {
            bbox: Some(self.bbox),
            text,
            confidence,
        })
    }
}

/// Group Tesseract TSV word rows into line detections.
///
/// Words sharing (page, block, paragraph, line) form one line. Lines keep the
/// order in which Tesseract reports them.
pub fn parse_tsv_lines(tsv: &str) -> Result<Vec<Detection>, OcrError> {
    let mut lines = Vec::new();
    let mut current: Option<LineAcc> = None;

    for (row_idx, row) in tsv.lines().enumerate() {
        if row_idx == 0 && row.starts_with("level") {
            continue;
        }
        if row.trim().is_empty() {
            continue;
        }

        let cols: Vec<&str> = row.splitn(12, '\t').collect();
        if cols.len() < 12 {
            return Err(OcrError::OcrFailed(format!(
                "malformed tesseract TSV row {}: {:?}",
                row_idx + 1,
                row
            )));
        }

        let num = |i: usize| -> Result<u32, OcrError> {
            cols[i].trim().parse::<u32>().map_err(|_| {
                OcrError::OcrFailed(format!(
                    "malformed tesseract TSV row {}: column {} is {:?}",
                    row_idx + 1,
                    i + 1,
                    cols[i]
                ))
            })
        };

        if num(0)? != WORD_LEVEL {
            continue;
        }

        let text = cols[11].trim();
        if text.is_empty() {
            continue;
        }

        let key = (num(1)?, num(2)?, num(3)?, num(4)?);
        let bbox = BoundingBox {
            left: num(6)?,
            top: num(7)?,
            width: num(8)?,
            height: num(9)?,
        };
        let conf: f32 = cols[10].trim().parse().unwrap_or(-1.0);

        match current.as_mut() {
            Some(line) if line.key == key => {
                line.words.push(text.to_string());
                line.bbox = line.bbox.union(&bbox);
                if conf >= 0.0 {
                    line.conf_sum += conf;
                    line.conf_count += 1;
                }
            }
            _ => {
                if let Some(done) = current.take().and_then(LineAcc::finish) {
                    lines.push(done);
                }
                let (conf_sum, conf_count) = if conf >= 0.0 { (conf, 1) } else { (0.0, 0) };
                current = Some(LineAcc {
                    key,
                    words: vec![text.to_string()],
                    bbox,
                    conf_sum,
                    conf_count,
                });
            }
        }
    }

    if let Some(done) = current.and_then(LineAcc::finish) {
        lines.push(done);
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn tsv(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out
    }

    #[test]
    fn test_parse_groups_words_into_lines() {
        let input = tsv(&[
            "1\t1\t0\t0\t0\t0\t0\t0\t400\t200\t-1\t",
            "4\t1\t1\t1\t1\t0\t40\t30\t200\t30\t-1\t",
            "5\t1\t1\t1\t1\t1\t40\t30\t110\t30\t96.5\tInvoice",
            "5\t1\t1\t1\t1\t2\t160\t30\t80\t30\t93.5\t#12345",
            "5\t1\t1\t1\t2\t1\t40\t80\t70\t28\t90\tTotal:",
            "5\t1\t1\t1\t2\t2\t115\t80\t75\t28\t88\t$99.99",
        ]);

        let lines = parse_tsv_lines(&input).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Invoice #12345");
        assert_eq!(lines[1].text, "Total: $99.99");

        let bbox = lines[0].bbox.unwrap();
        assert_eq!(bbox.left, 40);
        assert_eq!(bbox.width, 200);
        let conf = lines[0].confidence.unwrap();
        assert!((conf - 0.95).abs() < 1e-4);
    }

    #[test]
    fn test_parse_skips_blank_words_and_structure_rows() {
        let input = tsv(&[
            "2\t1\t1\t0\t0\t0\t0\t0\t10\t10\t-1\t",
            "5\t1\t1\t1\t1\t1\t0\t0\t10\t10\t-1\t ",
            "5\t1\t2\t1\t1\t1\t0\t50\t10\t10\t-1\tHello",
        ]);

        let lines = parse_tsv_lines(&input).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[0].confidence, None);
    }

    #[test]
    fn test_parse_empty_report() {
        assert!(parse_tsv_lines(HEADER).unwrap().is_empty());
        assert!(parse_tsv_lines("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_row() {
        let input = tsv(&["5\t1\t1"]);
        assert!(matches!(
            parse_tsv_lines(&input),
            Err(OcrError::OcrFailed(_))
        ));
    }
}
