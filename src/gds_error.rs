//! gds error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GdsError {
    /// bad user input at construction or mutation time
    #[error("[ValidationError]: {0}")]
    Validation(String),
    /// malformed record stream, or a record that can not be framed
    #[error("[FormatError]: {msg} (byte offset {offset}, last record {last_record})")]
    Format {
        offset: usize,
        last_record: String,
        msg: String,
    },
    /// value not representable as gdsii eight byte real
    #[error("[RangeError]: {0}")]
    Range(String),
    #[error("[IoError]: {0}")]
    Io(#[from] std::io::Error),
}

pub type GdsResult<T> = Result<T, GdsError>;

impl GdsError {
    pub(crate) fn format(offset: usize, last_record: Option<&str>, msg: &str) -> GdsError {
        GdsError::Format {
            offset,
            last_record: last_record.unwrap_or("<none>").to_string(),
            msg: msg.to_string(),
        }
    }
}

#[macro_export]
macro_rules! validation_err {
    ( $($arg:tt)* ) => {{
        $crate::gds_error::GdsError::Validation(
            format!("{}:{} : {}", file!(), line!(), format!($($arg)*)),
        )
    }};
}

#[macro_export]
macro_rules! range_err {
    ( $($arg:tt)* ) => {{
        $crate::gds_error::GdsError::Range(
            format!("{}:{} : {}", file!(), line!(), format!($($arg)*)),
        )
    }};
}
