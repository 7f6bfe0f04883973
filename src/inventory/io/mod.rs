pub mod excel_read;

use std::path::PathBuf;

use crate::inventory::error::Result;
use crate::inventory::model::{ReadMode, Row};
use crate::inventory::sync::RowSource;

pub use excel_read::SheetOptions;

/// Spreadsheet on disk read afresh at the start of every cycle.
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    path: PathBuf,
    options: SheetOptions,
}

impl WorkbookSource {
    pub fn new(path: impl Into<PathBuf>, options: SheetOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }
}

impl RowSource for WorkbookSource {
    fn read_rows(&self, mode: ReadMode) -> Result<Vec<Row>> {
        excel_read::read_rows(&self.path, &self.options, mode)
    }
}
