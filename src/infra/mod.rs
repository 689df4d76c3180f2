pub mod csv_output_adapter;

pub use csv_output_adapter::CsvFileOutputAdapter;
