use std::io::Write;

use crate::gds_error::GdsResult;
use crate::gds_model::CoordPnt;
use crate::gds_record::Record;

/// frame records onto any byte sink
pub struct RecordWriter<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        RecordWriter { inner, written: 0 }
    }

    pub fn write_record(&mut self, record: &Record) -> GdsResult<()> {
        record.encode(&mut self.inner)?;
        self.written += record.encoded_len();
        Ok(())
    }

    pub fn write_records<'r>(
        &mut self,
        records: impl IntoIterator<Item = &'r Record>,
    ) -> GdsResult<()> {
        for r in records {
            self.write_record(r)?;
        }
        Ok(())
    }

    /// bytes framed so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> GdsResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// user unit value to database integer
pub fn to_db_unit(v: f64, scaling: f64) -> GdsResult<i32> {
    let scaled = (v * scaling).round();
    if !scaled.is_finite() || scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
        return Err(validation_err!(
            "{} scaled by {} does not fit a four byte int",
            v,
            scaling
        ));
    }
    Ok(scaled as i32)
}

/// flatten points to the XY record payload
pub fn points_to_xy(points: &[CoordPnt], scaling: f64) -> GdsResult<Vec<i32>> {
    let mut xy = Vec::with_capacity(points.len() * 2);
    for p in points {
        xy.push(to_db_unit(p.x, scaling)?);
        xy.push(to_db_unit(p.y, scaling)?);
    }
    Ok(xy)
}

#[cfg(test)]
mod test_gds_writer {
    use super::*;
    use crate::gds_error::GdsError;
    use crate::gds_record::{ENDLIB, HEADER};

    #[test]
    fn test_record_writer() {
        let mut writer = RecordWriter::new(Vec::new());
        let records = vec![
            Record::two_byte_int(HEADER, vec![600]),
            Record::no_data(ENDLIB),
        ];
        writer.write_records(&records).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.written(), 10);
        assert_eq!(
            writer.into_inner(),
            vec![0x00, 0x06, 0x00, 0x02, 0x02, 0x58, 0x00, 0x04, 0x04, 0x00]
        );
    }

    #[test]
    fn test_to_db_unit() {
        assert_eq!(to_db_unit(1.5, 1000.0).unwrap(), 1500);
        assert_eq!(to_db_unit(-0.0004, 1000.0).unwrap(), 0);
        assert_eq!(to_db_unit(-2.0006, 1000.0).unwrap(), -2001);
        assert!(matches!(to_db_unit(3e6, 1000.0), Err(GdsError::Validation(_))));
        assert!(matches!(to_db_unit(f64::NAN, 1000.0), Err(GdsError::Validation(_))));
    }

    #[test]
    fn test_points_to_xy() {
        let pnts = [CoordPnt::new(0.0, 1.0), CoordPnt::new(-2.5, 3.25)];
        assert_eq!(points_to_xy(&pnts, 1000.0).unwrap(), vec![0, 1000, -2500, 3250]);
    }
}
