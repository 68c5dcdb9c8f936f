//! 2D mask layout geometry and Gdsii stream format kit
//!
//! Build polygons, paths and cell placements, write them as gds file
//!
//! Or decode a gds file record by record

#[macro_use]
pub mod gds_error;
pub mod gds_model;
pub mod gds_reader;
pub mod gds_real;
pub mod gds_record;
pub mod gds_writer;

pub use gds_error::{GdsError, GdsResult};
pub use gds_reader::{decode_records, read_records, RecordReader};
pub use gds_real::{decode_real, encode_real, GdsReal};
pub use gds_record::{Record, RecordData};
pub use gds_writer::RecordWriter;
