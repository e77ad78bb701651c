//! The instruction image file format.
//!
//! An image is a JSON array of [`Cell`]s, rendered one cell per line so
//! that diffs over generated images stay readable:
//!
//! ```text
//! [{"index": 0, "opcode": "JMP", "value": 10, "is_indirect": false},
//! {"index": 10, "opcode": "LD", "value": 13, "is_indirect": false}]
//! ```
//!
//! Cells appear in emission order; addresses not listed are implicitly
//! `NOP`/`0`. Index 0 is always the bootstrap jump to `_start`.

use crate::ImageError;
use crate::cell::Cell;
use std::fs;
use std::path::Path;

/// Parses an image from JSON text.
pub fn parse_image(text: &str) -> Result<Vec<Cell>, ImageError> {
    Ok(serde_json::from_str(text)?)
}

/// Renders an image as JSON text, one cell per line.
pub fn render_image(cells: &[Cell]) -> String {
    let lines: Vec<String> = cells
        .iter()
        .map(|cell| serde_json::to_string(cell).expect("cell serialization is infallible"))
        .collect();
    format!("[{}]", lines.join(",\n"))
}

/// Reads an image file.
pub fn read_image(path: impl AsRef<Path>) -> Result<Vec<Cell>, ImageError> {
    parse_image(&fs::read_to_string(path)?)
}

/// Writes an image file.
pub fn write_image(path: impl AsRef<Path>, cells: &[Cell]) -> Result<(), ImageError> {
    Ok(fs::write(path, render_image(cells))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Opcode;

    fn sample() -> Vec<Cell> {
        vec![
            Cell {
                index: 0,
                opcode: Opcode::Jmp,
                value: 10,
                is_indirect: false,
            },
            Cell {
                index: 10,
                opcode: Opcode::Ld,
                value: 11,
                is_indirect: true,
            },
            Cell::data(11, 99),
        ]
    }

    #[test]
    fn test_one_cell_per_line() {
        let text = render_image(&sample());
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with('['));
        assert!(text.ends_with(']'));
    }

    #[test]
    fn test_render_parse_round_trip() {
        let cells = sample();
        assert_eq!(parse_image(&render_image(&cells)).unwrap(), cells);
    }

    #[test]
    fn test_empty_image() {
        assert_eq!(render_image(&[]), "[]");
        assert!(parse_image("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_image_is_rejected() {
        assert!(matches!(
            parse_image("[{\"index\":"),
            Err(ImageError::Malformed(_))
        ));
    }
}
