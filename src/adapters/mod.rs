// Adapters layer: concrete implementations of the domain ports (spreadsheet readers, storage).

pub mod storage;
pub mod workbook;

pub use storage::LocalStorage;
pub use workbook::SpreadsheetReader;
