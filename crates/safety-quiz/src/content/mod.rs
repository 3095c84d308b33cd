//! Course question content: the embedded library and spreadsheet imports.

pub mod import;
mod library;

pub use import::{ImportError, QuestionBankImporter, RowProblem};
pub use library::{BankDocument, ContentError, ContentLibrary, LibraryEntry};
