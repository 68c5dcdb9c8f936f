use super::*;
use crate::gds_record::{self, Record};

/// longest structure name gdsii allows
pub const MAX_CELL_NAME_LEN: usize = 32;

/// names are 1 to 32 chars of A-Z a-z 0-9 _ ? $
pub fn check_cell_name(name: &str) -> GdsResult<()> {
    if name.is_empty() || name.len() > MAX_CELL_NAME_LEN {
        return Err(validation_err!(
            "cell name must have 1 to {} chars, {:?} has {}",
            MAX_CELL_NAME_LEN,
            name,
            name.len()
        ));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '?' | '$')))
    {
        return Err(validation_err!(
            "cell name {:?} contains {:?}, only letters, digits, _ ? $ are allowed",
            name,
            c
        ));
    }
    Ok(())
}

/// Gds Structure
///
/// owns its geometry, placements only borrow the cells they point at
#[derive(Debug, Clone)]
pub struct Cell<'a> {
    name: String,
    date: Date,
    polygons: Vec<Polygon>,
    paths: Vec<Path>,
    cell_references: Vec<CellReference<'a>>,
    cell_arrays: Vec<CellArray<'a>>,
}

impl<'a> Cell<'a> {
    pub fn new(name: &str) -> GdsResult<Self> {
        check_cell_name(name)?;
        Ok(Cell {
            name: name.to_string(),
            date: Date::now(),
            polygons: Vec::new(),
            paths: Vec::new(),
            cell_references: Vec::new(),
            cell_arrays: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> GdsResult<()> {
        check_cell_name(name)?;
        self.name = name.to_string();
        Ok(())
    }

    pub fn date(&self) -> &Date {
        &self.date
    }

    pub fn set_date(&mut self, date: Date) {
        self.date = date;
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn cell_references(&self) -> &[CellReference<'a>] {
        &self.cell_references
    }

    pub fn cell_arrays(&self) -> &[CellArray<'a>] {
        &self.cell_arrays
    }

    pub fn add_polygon(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    pub fn add_path(&mut self, path: Path) {
        self.paths.push(path);
    }

    pub fn add_cell_reference(&mut self, cell_reference: CellReference<'a>) {
        self.cell_references.push(cell_reference);
    }

    pub fn add_cell_array(&mut self, cell_array: CellArray<'a>) {
        self.cell_arrays.push(cell_array);
    }

    /// every cell placed directly in this one, by reference or array
    pub fn referenced_cells(&self) -> Vec<&'a Cell<'a>> {
        self.cell_references
            .iter()
            .map(|r| r.cell())
            .chain(self.cell_arrays.iter().map(|a| a.cell()))
            .collect()
    }

    /// lower left and upper right corner over all polygon vertices,
    /// None for a cell without polygons
    pub fn polygon_extent(&self) -> Option<(CoordPnt, CoordPnt)> {
        let mut extents = self.polygons.iter().map(|p| p.extent());
        let first = extents.next()?;
        Some(extents.fold(first, |(min, max), (lo, hi)| {
            (
                CoordPnt::new(min.x.min(lo.x), min.y.min(lo.y)),
                CoordPnt::new(max.x.max(hi.x), max.y.max(hi.y)),
            )
        }))
    }
}

impl GdsObject for Cell<'_> {
    fn to_records(&self, scaling: f64) -> GdsResult<Vec<Record>> {
        let mut records = vec![
            Record::two_byte_int(gds_record::BGNSTR, self.date.to_i16_array().to_vec()),
            Record::ascii(gds_record::STRNAME, &self.name)?,
        ];
        for p in &self.polygons {
            records.extend(p.to_records(scaling)?);
        }
        for p in &self.paths {
            records.extend(p.to_records(scaling)?);
        }
        for r in &self.cell_references {
            records.extend(r.to_records(scaling)?);
        }
        for a in &self.cell_arrays {
            records.extend(a.to_records(scaling)?);
        }
        records.push(Record::no_data(gds_record::ENDSTR));
        Ok(records)
    }
}
