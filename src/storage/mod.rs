pub mod csv_io;
pub mod snapshot_writer;
pub mod source_reader;

pub use snapshot_writer::SnapshotWriter;
pub use source_reader::SourceReader;
