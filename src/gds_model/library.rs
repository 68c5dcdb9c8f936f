use log::{info, warn};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};

use super::*;
use crate::gds_record::{self, Record};
use crate::gds_writer::RecordWriter;

pub const GDS_VERSION: i16 = 600;

/// Gds Library
///
/// holds borrowed cells, the caller keeps them alive for as long as the layout
#[derive(Debug)]
pub struct Layout<'a> {
    /// Library name
    name: String,
    /// user units, in meter, points coord in this units,
    ///
    /// for example units is 1e-3,
    /// which is millimeter, a coord 1.32 means 1.32 millimeter
    ///
    /// default is 1e-6, micron
    units: f64,
    /// database units, in meter, coords are rounded to this grid on write
    ///
    /// default is 1e-9
    precision: f64,
    date: Date,
    /// edge from a cell to every cell it places
    graph: DiGraph<&'a Cell<'a>, ()>,
    // each Cell has a uniq name in Layout
    cell_nodes: HashMap<String, NodeIndex<u32>>,
}

fn check_unit(what: &str, value: f64) -> GdsResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(validation_err!("{} must be finite and > 0, got {}", what, value));
    }
    Ok(value)
}

/// cell plus every cell it reaches through placements, each once
fn collect_hierarchy<'a>(cell: &'a Cell<'a>, found: &mut Vec<&'a Cell<'a>>) {
    if found.iter().any(|c| std::ptr::eq(*c, cell)) {
        return;
    }
    found.push(cell);
    for child in cell.referenced_cells() {
        collect_hierarchy(child, found);
    }
}

impl<'a> Layout<'a> {
    pub fn new(libname: &str) -> Self {
        Layout {
            name: libname.to_string(),
            units: 1e-6,
            precision: 1e-9,
            date: Date::now(),
            graph: DiGraph::new(),
            cell_nodes: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> f64 {
        self.units
    }

    pub fn set_units(&mut self, units: f64) -> GdsResult<()> {
        self.units = check_unit("units", units)?;
        Ok(())
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn set_precision(&mut self, precision: f64) -> GdsResult<()> {
        self.precision = check_unit("precision", precision)?;
        Ok(())
    }

    pub fn date(&self) -> &Date {
        &self.date
    }

    pub fn set_date(&mut self, date: Date) {
        self.date = date;
    }

    /// user units to database units factor
    pub fn scaling(&self) -> f64 {
        self.units / self.precision
    }

    fn registered(&self, cell: &Cell<'a>) -> Option<NodeIndex<u32>> {
        self.cell_nodes
            .get(cell.name())
            .copied()
            .filter(|&idx| std::ptr::eq(self.graph[idx], cell))
    }

    /// recursely add cell to layout
    ///
    /// for example:
    /// cell_a has a reference which refers to cell_b
    ///
    /// layout.add_cell(&cell_a) will also add cell_b
    ///
    /// nothing is added when any cell of the hierarchy clashes by name
    /// with a different cell
    pub fn add_cell(&mut self, cell: &'a Cell<'a>) -> GdsResult<()> {
        if self.registered(cell).is_some() {
            warn!("cell {} is already in layout {}", cell.name(), self.name);
        }

        let mut hierarchy = Vec::new();
        collect_hierarchy(cell, &mut hierarchy);
        for (i, c) in hierarchy.iter().enumerate() {
            let clash_in_layout =
                self.cell_nodes.contains_key(c.name()) && self.registered(c).is_none();
            let clash_in_hierarchy = hierarchy[..i]
                .iter()
                .any(|other| other.name() == c.name());
            if clash_in_layout || clash_in_hierarchy {
                return Err(validation_err!(
                    "layout {} already has a different cell named {}",
                    self.name,
                    c.name()
                ));
            }
        }

        for c in hierarchy.iter() {
            if self.registered(c).is_none() {
                let idx = self.graph.add_node(*c);
                self.cell_nodes.insert(c.name().to_string(), idx);
            }
        }
        for c in hierarchy.iter() {
            let from = self.cell_nodes[c.name()];
            for child in c.referenced_cells() {
                let to = self.cell_nodes[child.name()];
                self.graph.update_edge(from, to, ());
            }
        }
        Ok(())
    }

    /// Get Cells not referred by any other Cell
    pub fn top_cells(&self) -> Vec<&'a Cell<'a>> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx])
            .collect()
    }

    /// all Cells, every referenced cell ahead of the cells placing it
    pub fn cells(&self) -> Vec<&'a Cell<'a>> {
        match toposort(&self.graph, None) {
            Ok(order) => order.into_iter().rev().map(|idx| self.graph[idx]).collect(),
            // borrowed cells can not form a reference cycle
            Err(_) => self.graph.node_weights().copied().collect(),
        }
    }

    /// Dump Layout and its Cells to gds file bytes
    pub fn gds_bytes(&self) -> GdsResult<Vec<u8>> {
        let records = self.to_records(self.scaling())?;
        let mut writer = RecordWriter::new(Vec::new());
        writer.write_records(&records)?;
        Ok(writer.into_inner())
    }

    /// write the stream file, repeated calls write the same bytes
    pub fn write(&self, file_name: impl AsRef<std::path::Path>) -> GdsResult<()> {
        let bytes = self.gds_bytes()?;
        let mut writer = BufWriter::new(File::create(file_name.as_ref())?);
        writer.write_all(&bytes)?;
        writer.flush()?;
        info!(
            "wrote layout {} with {} cells, {} bytes to {}",
            self.name,
            self.graph.node_count(),
            bytes.len(),
            file_name.as_ref().display()
        );
        Ok(())
    }
}

impl GdsObject for Layout<'_> {
    fn to_records(&self, scaling: f64) -> GdsResult<Vec<Record>> {
        let mut records = vec![
            Record::two_byte_int(gds_record::HEADER, vec![GDS_VERSION]),
            Record::two_byte_int(gds_record::BGNLIB, self.date.to_i16_array().to_vec()),
            Record::ascii(gds_record::LIBNAME, &self.name)?,
            Record::eight_byte_real(
                gds_record::UNITS,
                &[self.precision / self.units, self.precision],
            )?,
        ];
        for cell in self.cells() {
            records.extend(cell.to_records(scaling)?);
        }
        records.push(Record::no_data(gds_record::ENDLIB));
        Ok(records)
    }
}
