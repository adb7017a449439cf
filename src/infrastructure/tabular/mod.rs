// Tabular parser adapters: Concrete implementations of TabularParser

pub mod csv_parser;
pub mod excel_parser;
pub mod factory;

pub use csv_parser::CsvParser;
pub use excel_parser::ExcelParser;
pub use factory::ParserFactory;
