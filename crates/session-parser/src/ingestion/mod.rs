//! Schedule workbook ingestion: cell segmentation, date normalization,
//! layout detection and the two layout parsers

pub mod aggregate;
pub mod dates;
pub mod flat;
pub mod identity;
pub mod layout;
pub mod matrix;
mod parser;
pub mod segmenter;
pub mod workbook;

pub use aggregate::summarize;
pub use dates::normalize_date;
pub use flat::{parse_flat, FlatRow};
pub use identity::record_id;
pub use layout::{detect_layout, SheetLayout, SheetRows};
pub use matrix::{parse_matrix, MatrixRow, MatrixSheet};
pub use parser::{ParsedWorkbook, ScheduleParser, SheetReport};
pub use segmenter::{segment_cell, CellSegments};
pub use workbook::{read_workbook, CellValue, Sheet};
