use super::*;
use crate::gds_record::{self, Record};
use crate::gds_writer;

/// largest column or row count of a cell array
pub const MAX_ARRAY_DIM: i32 = 32767;

/// STRANS bit 0
const REFLECTION_X: u16 = 0x8000;

fn check_magnification(magnification: f64) -> GdsResult<f64> {
    if !magnification.is_finite() || magnification <= 0.0 {
        return Err(validation_err!(
            "magnification must be finite and > 0, got {}",
            magnification
        ));
    }
    Ok(magnification)
}

fn check_array_dim(what: &str, value: i32) -> GdsResult<i16> {
    if !(1..=MAX_ARRAY_DIM).contains(&value) {
        return Err(validation_err!(
            "{} count must be in [1, {}], got {}",
            what,
            MAX_ARRAY_DIM,
            value
        ));
    }
    Ok(value as i16)
}

/// SNAME STRANS MAG ANGLE, shared by SREF and AREF
fn placement_records(
    cell: &Cell,
    x_reflection: bool,
    magnification: f64,
    rotation: f64,
) -> GdsResult<Vec<Record>> {
    let flags = if x_reflection { REFLECTION_X } else { 0 };
    Ok(vec![
        Record::ascii(gds_record::SNAME, cell.name())?,
        Record::bit_array(gds_record::STRANS, flags),
        Record::eight_byte_real(gds_record::MAG, &[magnification])?,
        // gdsii stores the angle in degrees, counter-clockwise
        Record::eight_byte_real(gds_record::ANGLE, &[rotation.to_degrees()])?,
    ])
}

/// single placement of a cell, the cell is borrowed, never owned
#[derive(Debug, Clone)]
pub struct CellReference<'a> {
    cell: &'a Cell<'a>,
    center: CoordPnt,
    /// radians, counter-clockwise
    rotation: f64,
    magnification: f64,
    x_reflection: bool,
}

impl<'a> CellReference<'a> {
    pub fn new(cell: &'a Cell<'a>, center: CoordPnt) -> Self {
        CellReference {
            cell,
            center,
            rotation: 0.0,
            magnification: 1.0,
            x_reflection: false,
        }
    }

    pub fn cell(&self) -> &'a Cell<'a> {
        self.cell
    }

    pub fn cell_name(&self) -> &str {
        self.cell.name()
    }

    pub fn center(&self) -> CoordPnt {
        self.center
    }

    pub fn set_center(&mut self, center: CoordPnt) {
        self.center = center;
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    pub fn magnification(&self) -> f64 {
        self.magnification
    }

    pub fn set_magnification(&mut self, magnification: f64) -> GdsResult<()> {
        self.magnification = check_magnification(magnification)?;
        Ok(())
    }

    pub fn x_reflection(&self) -> bool {
        self.x_reflection
    }

    pub fn set_x_reflection(&mut self, x_reflection: bool) {
        self.x_reflection = x_reflection;
    }

    /// extent corners of the referenced cell's polygons,
    /// (minX,minY) (minX,maxY) (maxX,minY) (maxX,maxY)
    pub fn bounding_vertices(&self) -> GdsResult<[CoordPnt; 4]> {
        let (min, max) = match self.cell.polygon_extent() {
            Some(extent) => extent,
            None => {
                return Err(validation_err!(
                    "cell {} has no polygons to bound",
                    self.cell.name()
                ))
            }
        };
        if min == max {
            return Err(validation_err!(
                "polygons of cell {} collapse to the point {}",
                self.cell.name(),
                min
            ));
        }
        Ok([
            CoordPnt::new(min.x, min.y),
            CoordPnt::new(min.x, max.y),
            CoordPnt::new(max.x, min.y),
            CoordPnt::new(max.x, max.y),
        ])
    }
}

impl GdsObject for CellReference<'_> {
    fn to_records(&self, scaling: f64) -> GdsResult<Vec<Record>> {
        let mut records = vec![Record::no_data(gds_record::SREF)];
        records.extend(placement_records(
            self.cell,
            self.x_reflection,
            self.magnification,
            self.rotation,
        )?);
        records.push(Record::four_byte_int(
            gds_record::XY,
            gds_writer::points_to_xy(&[self.center], scaling)?,
        ));
        records.push(Record::no_data(gds_record::ENDEL));
        Ok(records)
    }
}

/// grid placement of a cell
///
/// spacing is measured in the array frame before rotation,
/// a negative spacing grows the grid towards -x or -y
#[derive(Debug, Clone)]
pub struct CellArray<'a> {
    cell: &'a Cell<'a>,
    origin: CoordPnt,
    columns: i16,
    rows: i16,
    x_spacing: f64,
    y_spacing: f64,
    /// radians, counter-clockwise
    rotation: f64,
    magnification: f64,
    x_reflection: bool,
}

impl<'a> CellArray<'a> {
    pub fn new(
        cell: &'a Cell<'a>,
        origin: CoordPnt,
        columns: i32,
        rows: i32,
        x_spacing: f64,
        y_spacing: f64,
    ) -> GdsResult<Self> {
        Ok(CellArray {
            cell,
            origin,
            columns: check_array_dim("column", columns)?,
            rows: check_array_dim("row", rows)?,
            x_spacing,
            y_spacing,
            rotation: 0.0,
            magnification: 1.0,
            x_reflection: false,
        })
    }

    pub fn cell(&self) -> &'a Cell<'a> {
        self.cell
    }

    pub fn cell_name(&self) -> &str {
        self.cell.name()
    }

    pub fn origin(&self) -> CoordPnt {
        self.origin
    }

    pub fn set_origin(&mut self, origin: CoordPnt) {
        self.origin = origin;
    }

    pub fn columns(&self) -> i16 {
        self.columns
    }

    pub fn set_columns(&mut self, columns: i32) -> GdsResult<()> {
        self.columns = check_array_dim("column", columns)?;
        Ok(())
    }

    pub fn rows(&self) -> i16 {
        self.rows
    }

    pub fn set_rows(&mut self, rows: i32) -> GdsResult<()> {
        self.rows = check_array_dim("row", rows)?;
        Ok(())
    }

    pub fn x_spacing(&self) -> f64 {
        self.x_spacing
    }

    pub fn set_x_spacing(&mut self, x_spacing: f64) {
        self.x_spacing = x_spacing;
    }

    pub fn y_spacing(&self) -> f64 {
        self.y_spacing
    }

    pub fn set_y_spacing(&mut self, y_spacing: f64) {
        self.y_spacing = y_spacing;
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    pub fn magnification(&self) -> f64 {
        self.magnification
    }

    pub fn set_magnification(&mut self, magnification: f64) -> GdsResult<()> {
        self.magnification = check_magnification(magnification)?;
        Ok(())
    }

    pub fn x_reflection(&self) -> bool {
        self.x_reflection
    }

    pub fn set_x_reflection(&mut self, x_reflection: bool) {
        self.x_reflection = x_reflection;
    }

    /// AREF lattice points: origin, column extent end, row extent end
    pub fn lattice(&self) -> [CoordPnt; 3] {
        let col_end = CoordPnt::new(self.columns as f64 * self.x_spacing, 0.0);
        let row_end = CoordPnt::new(0.0, self.rows as f64 * self.y_spacing);
        let zero = CoordPnt::default();
        [
            self.origin,
            self.origin + col_end.rotate(zero, self.rotation),
            self.origin + row_end.rotate(zero, self.rotation),
        ]
    }
}

impl GdsObject for CellArray<'_> {
    fn to_records(&self, scaling: f64) -> GdsResult<Vec<Record>> {
        let mut records = vec![Record::no_data(gds_record::AREF)];
        records.extend(placement_records(
            self.cell,
            self.x_reflection,
            self.magnification,
            self.rotation,
        )?);
        records.push(Record::two_byte_int(
            gds_record::COLROW,
            vec![self.columns, self.rows],
        ));
        records.push(Record::four_byte_int(
            gds_record::XY,
            gds_writer::points_to_xy(&self.lattice(), scaling)?,
        ));
        records.push(Record::no_data(gds_record::ENDEL));
        Ok(records)
    }
}

#[cfg(test)]
mod test_sref {
    use super::*;
    use crate::gds_record::RecordData;
    use float_cmp::{ApproxEq, F64Margin};
    use std::f64::consts::FRAC_PI_2;

    fn unit_cell() -> Cell<'static> {
        let mut cell = Cell::new("unit").unwrap();
        cell.add_polygon(shapes::rectangle(CoordPnt::new(1.0, 0.5), 2.0, 1.0).unwrap());
        cell.add_polygon(shapes::square(CoordPnt::new(-1.0, 3.0), 1.0).unwrap());
        cell
    }

    #[test]
    fn test_bounding_vertices() {
        let cell = unit_cell();
        let sref = CellReference::new(&cell, CoordPnt::new(10.0, 10.0));
        assert_eq!(
            sref.bounding_vertices().unwrap(),
            [
                CoordPnt::new(-1.5, 0.0),
                CoordPnt::new(-1.5, 3.5),
                CoordPnt::new(2.0, 0.0),
                CoordPnt::new(2.0, 3.5),
            ]
        );

        let empty = Cell::new("empty").unwrap();
        let sref = CellReference::new(&empty, CoordPnt::default());
        assert!(matches!(sref.bounding_vertices(), Err(GdsError::Validation(_))));
    }

    #[test]
    fn test_reference_setters() {
        let cell = unit_cell();
        let mut sref = CellReference::new(&cell, CoordPnt::default());
        assert_eq!(sref.magnification(), 1.0);
        assert!(sref.set_magnification(0.0).is_err());
        assert!(sref.set_magnification(f64::INFINITY).is_err());
        sref.set_magnification(2.0).unwrap();
        sref.set_rotation(FRAC_PI_2);
        sref.set_center(CoordPnt::new(1.0, 2.0));
        assert_eq!(sref.cell_name(), "unit");
        assert!(std::ptr::eq(sref.cell(), &cell));
        assert_eq!(sref.center(), CoordPnt::new(1.0, 2.0));
    }

    #[test]
    fn test_reference_records() {
        let cell = unit_cell();
        let mut sref = CellReference::new(&cell, CoordPnt::new(1.0, -2.0));
        sref.set_rotation(FRAC_PI_2);
        sref.set_x_reflection(true);
        let records = sref.to_records(1000.0).unwrap();
        let tags: Vec<u16> = records.iter().map(|r| r.tag).collect();
        assert_eq!(
            tags,
            vec![
                gds_record::SREF,
                gds_record::SNAME,
                gds_record::STRANS,
                gds_record::MAG,
                gds_record::ANGLE,
                gds_record::XY,
                gds_record::ENDEL
            ]
        );
        assert_eq!(records[1].text(), Some("unit"));
        assert_eq!(records[2], Record::bit_array(gds_record::STRANS, 0x8000));
        match &records[4].data {
            RecordData::EightByteReal(v) => {
                assert!(v[0].value().approx_eq(90.0, F64Margin::default()))
            }
            other => panic!("ANGLE written as {:?}", other),
        }
        assert_eq!(records[5], Record::four_byte_int(gds_record::XY, vec![1000, -2000]));
    }

    #[test]
    fn test_array_dimensions() {
        let cell = unit_cell();
        let origin = CoordPnt::default();
        assert!(matches!(
            CellArray::new(&cell, origin, 0, 1, 1.0, 1.0),
            Err(GdsError::Validation(_))
        ));
        assert!(CellArray::new(&cell, origin, 32767, 1, 1.0, 1.0).is_ok());
        assert!(matches!(
            CellArray::new(&cell, origin, 32768, 1, 1.0, 1.0),
            Err(GdsError::Validation(_))
        ));
        assert!(CellArray::new(&cell, origin, 1, -3, 1.0, 1.0).is_err());

        let mut aref = CellArray::new(&cell, origin, 2, 2, 1.0, 1.0).unwrap();
        assert!(aref.set_columns(40000).is_err());
        assert_eq!(aref.columns(), 2);
        aref.set_rows(32767).unwrap();
        assert_eq!(aref.rows(), 32767);
        assert!(aref.set_magnification(-1.0).is_err());
    }

    #[test]
    fn test_array_records() {
        let cell = unit_cell();
        let mut aref = CellArray::new(&cell, CoordPnt::new(1.0, 1.0), 3, 2, 2.0, -0.5).unwrap();
        let records = aref.to_records(1000.0).unwrap();
        assert_eq!(records[0].tag, gds_record::AREF);
        assert_eq!(records[5], Record::two_byte_int(gds_record::COLROW, vec![3, 2]));
        assert_eq!(
            records[6],
            Record::four_byte_int(gds_record::XY, vec![1000, 1000, 7000, 1000, 1000, 0])
        );
        assert_eq!(records[7].tag, gds_record::ENDEL);

        aref.set_rotation(FRAC_PI_2);
        let margin = F64Margin {
            epsilon: 1e-9,
            ulps: 4,
        };
        let lattice = aref.lattice();
        assert!(lattice[1].approx_eq(CoordPnt::new(1.0, 7.0), margin));
        assert!(lattice[2].approx_eq(CoordPnt::new(2.0, 1.0), margin));
    }
}
