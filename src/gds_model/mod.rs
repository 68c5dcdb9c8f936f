use crate::gds_error::{GdsError, GdsResult};
use crate::gds_record::Record;

mod date;
mod library;
mod line;
mod path;
mod points;
mod polygon;
pub mod shapes;
mod sref;
mod struc;

pub use self::date::*;
pub use self::library::*;
pub use self::line::*;
pub use self::path::*;
pub use self::points::*;
pub use self::polygon::*;
pub use self::sref::*;
pub use self::struc::*;

/// highest layer and datatype number
pub const MAX_LAYER: i16 = 63;

/// anything that serializes to a run of gdsii records
pub trait GdsObject {
    /// scaling converts user units to database units
    fn to_records(&self, scaling: f64) -> GdsResult<Vec<Record>>;
}

fn check_layer(what: &str, value: i16) -> GdsResult<i16> {
    if !(0..=MAX_LAYER).contains(&value) {
        return Err(validation_err!(
            "{} must be in [0, {}], got {}",
            what,
            MAX_LAYER,
            value
        ));
    }
    Ok(value)
}
