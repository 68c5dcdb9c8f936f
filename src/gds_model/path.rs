use super::*;
use crate::gds_record::{self, Record};
use crate::gds_writer;

pub const MIN_PATH_POINTS: usize = 2;
pub const MAX_PATH_POINTS: usize = 199;

/// path end cap style
#[repr(i16)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    /// square end flush with the last point
    #[default]
    Flush = 0,
    Round = 1,
    /// square end extended by half the width
    HalfWidthExtend = 2,
}

impl TryFrom<&i16> for PathType {
    type Error = GdsError;
    fn try_from(value: &i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PathType::Flush),
            1 => Ok(PathType::Round),
            2 => Ok(PathType::HalfWidthExtend),
            _ => Err(validation_err!(
                "only path types 0, 1 and 2 are defined, got {}",
                value
            )),
        }
    }
}

impl From<&PathType> for i16 {
    fn from(value: &PathType) -> Self {
        *value as i16
    }
}

/// open polyline drawn with a width
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    points: Vec<CoordPnt>,
    width: f64,
    path_type: PathType,
    layer: i16,
    datatype: i16,
}

fn check_point_count(count: usize) -> GdsResult<()> {
    if !(MIN_PATH_POINTS..=MAX_PATH_POINTS).contains(&count) {
        return Err(validation_err!(
            "path needs {} to {} points, got {}",
            MIN_PATH_POINTS,
            MAX_PATH_POINTS,
            count
        ));
    }
    Ok(())
}

fn check_width(width: f64) -> GdsResult<f64> {
    if !width.is_finite() || width < 0.0 {
        return Err(validation_err!("path width must be finite and >= 0, got {}", width));
    }
    Ok(width)
}

impl Path {
    /// flush ended path on layer 0, datatype 0
    pub fn new(points: Vec<CoordPnt>, width: f64) -> GdsResult<Self> {
        check_point_count(points.len())?;
        Ok(Path {
            points,
            width: check_width(width)?,
            path_type: PathType::default(),
            layer: 0,
            datatype: 0,
        })
    }

    pub fn points(&self) -> &[CoordPnt] {
        &self.points
    }

    pub fn set_points(&mut self, points: Vec<CoordPnt>) -> GdsResult<()> {
        check_point_count(points.len())?;
        self.points = points;
        Ok(())
    }

    pub fn append_point(&mut self, pnt: CoordPnt) -> GdsResult<()> {
        if self.points.len() >= MAX_PATH_POINTS {
            return Err(validation_err!(
                "path already holds the maximum of {} points",
                MAX_PATH_POINTS
            ));
        }
        self.points.push(pnt);
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) -> GdsResult<()> {
        self.width = check_width(width)?;
        Ok(())
    }

    pub fn path_type(&self) -> PathType {
        self.path_type
    }

    pub fn set_path_type(&mut self, path_type: PathType) {
        self.path_type = path_type;
    }

    pub fn layer(&self) -> i16 {
        self.layer
    }

    pub fn set_layer(&mut self, layer: i16) -> GdsResult<()> {
        self.layer = check_layer("layer", layer)?;
        Ok(())
    }

    pub fn datatype(&self) -> i16 {
        self.datatype
    }

    pub fn set_datatype(&mut self, datatype: i16) -> GdsResult<()> {
        self.datatype = check_layer("datatype", datatype)?;
        Ok(())
    }
}

impl GdsObject for Path {
    fn to_records(&self, scaling: f64) -> GdsResult<Vec<Record>> {
        Ok(vec![
            Record::no_data(gds_record::PATH),
            Record::two_byte_int(gds_record::LAYER, vec![self.layer]),
            Record::two_byte_int(gds_record::DATATYPE, vec![self.datatype]),
            Record::two_byte_int(gds_record::PATHTYPE, vec![i16::from(&self.path_type)]),
            Record::four_byte_int(
                gds_record::WIDTH,
                vec![gds_writer::to_db_unit(self.width, scaling)?],
            ),
            Record::four_byte_int(
                gds_record::XY,
                gds_writer::points_to_xy(&self.points, scaling)?,
            ),
            Record::no_data(gds_record::ENDEL),
        ])
    }
}
