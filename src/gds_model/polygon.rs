use std::f64::consts::PI;

use super::*;
use crate::gds_record::{self, Record};
use crate::gds_writer;

pub const MIN_POLYGON_VERTICES: usize = 3;
pub const MAX_POLYGON_VERTICES: usize = 199;

/// closed polygon, the edge from last vertex back to first is implied
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<CoordPnt>,
    layer: i16,
    datatype: i16,
    /// corners (minX,maxY) (maxX,maxY) (maxX,minY) (minX,minY)
    bounding_box: [CoordPnt; 4],
    center: CoordPnt,
}

/// every edge of a closed vertex cycle, closing edge included
fn edges(vertices: &[CoordPnt]) -> impl Iterator<Item = LineSeg> + '_ {
    let n = vertices.len();
    (0..n).map(move |i| LineSeg::new(vertices[i], vertices[(i + 1) % n]))
}

/// true when two non adjacent edges of the closed cycle cross
pub fn contains_internal_void(vertices: &[CoordPnt]) -> bool {
    let n = vertices.len();
    let edge = |k: usize| LineSeg::new(vertices[k], vertices[(k + 1) % n]);
    for i in 0..n {
        for j in (i + 2)..n {
            // first and last edge meet at vertex 0
            if i == 0 && j == n - 1 {
                continue;
            }
            if line_seg_intersect(&edge(i), &edge(j)) {
                return true;
            }
        }
    }
    false
}

fn check_vertex_count(count: usize) -> GdsResult<()> {
    if !(MIN_POLYGON_VERTICES..=MAX_POLYGON_VERTICES).contains(&count) {
        return Err(validation_err!(
            "polygon needs {} to {} vertices, got {}",
            MIN_POLYGON_VERTICES,
            MAX_POLYGON_VERTICES,
            count
        ));
    }
    Ok(())
}

impl Polygon {
    /// polygon on layer 1, datatype 0
    pub fn new(vertices: Vec<CoordPnt>) -> GdsResult<Self> {
        Polygon::with_layer(vertices, 1, 0)
    }

    pub fn with_layer(vertices: Vec<CoordPnt>, layer: i16, datatype: i16) -> GdsResult<Self> {
        let mut polygon = Polygon {
            vertices: Vec::new(),
            layer: check_layer("layer", layer)?,
            datatype: check_layer("datatype", datatype)?,
            bounding_box: [CoordPnt::default(); 4],
            center: CoordPnt::default(),
        };
        polygon.set_vertices(vertices)?;
        Ok(polygon)
    }

    pub fn vertices(&self) -> &[CoordPnt] {
        &self.vertices
    }

    /// replace all vertices, the old ones stay when the new cycle is rejected
    pub fn set_vertices(&mut self, vertices: Vec<CoordPnt>) -> GdsResult<()> {
        check_vertex_count(vertices.len())?;
        if contains_internal_void(&vertices) {
            return Err(validation_err!(
                "polygon edges cross each other: {:?}",
                vertices
            ));
        }
        self.vertices = vertices;
        self.find_bounding_box();
        self.find_reset_center();
        Ok(())
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

    pub fn bounding_box(&self) -> [CoordPnt; 4] {
        self.bounding_box
    }

    pub fn center(&self) -> CoordPnt {
        self.center
    }

    /// lower left and upper right corner
    pub fn extent(&self) -> (CoordPnt, CoordPnt) {
        (self.bounding_box[3], self.bounding_box[1])
    }

    fn find_bounding_box(&mut self) {
        let mut min = CoordPnt::new(f64::INFINITY, f64::INFINITY);
        let mut max = CoordPnt::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for v in &self.vertices {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        self.bounding_box = [
            CoordPnt::new(min.x, max.y),
            CoordPnt::new(max.x, max.y),
            CoordPnt::new(max.x, min.y),
            CoordPnt::new(min.x, min.y),
        ];
    }

    /// vertex mean
    fn find_reset_center(&mut self) {
        let sum = self
            .vertices
            .iter()
            .fold(CoordPnt::default(), |acc, &v| acc + v);
        self.center = sum * (1.0 / self.vertices.len() as f64);
    }

    /// rotate counter-clockwise about pivot, angle in radians
    pub fn rotate(&mut self, pivot: CoordPnt, angle: f64) {
        for v in self.vertices.iter_mut() {
            *v = v.rotate(pivot, angle);
        }
        self.find_bounding_box();
        self.find_reset_center();
    }

    pub fn translate(&mut self, offset: CoordPnt) {
        for v in self.vertices.iter_mut() {
            *v += offset;
        }
        for c in self.bounding_box.iter_mut() {
            *c += offset;
        }
        self.center += offset;
    }

    /// enclosed area, shoelace formula
    pub fn area(&self) -> f64 {
        let twice: f64 = edges(&self.vertices)
            .map(|e| e.start.x * e.end.y - e.end.x * e.start.y)
            .sum();
        twice.abs() * 0.5
    }

    /// ray casting containment, points on an edge are outside
    pub fn point_inside_polygon(&self, pnt: &CoordPnt) -> bool {
        let (min, max) = self.extent();
        if pnt.x < min.x || pnt.x > max.x || pnt.y < min.y || pnt.y > max.y {
            return false;
        }
        if edges(&self.vertices)
            .any(|e| orientation(&e, pnt) == Orientation::Colinear && point_on_line_seg(&e, pnt))
        {
            return false;
        }

        let mut ray = LineSeg::new(*pnt, CoordPnt::new(max.x + (max.x - min.x) + 1.0, pnt.y));
        let grazes_vertex = self.vertices.iter().any(|v| {
            orientation(&ray, v) == Orientation::Colinear && point_on_line_seg(&ray, v)
        });
        if grazes_vertex {
            ray = self.vertex_free_ray(pnt);
        }

        let hits = edges(&self.vertices)
            .filter(|e| line_seg_intersect(&ray, e))
            .count();
        hits % 2 == 1
    }

    /// ray from pnt through the widest angular gap between vertices
    fn vertex_free_ray(&self, pnt: &CoordPnt) -> LineSeg {
        let mut angles: Vec<f64> = self
            .vertices
            .iter()
            .map(|v| (v.y - pnt.y).atan2(v.x - pnt.x))
            .collect();
        angles.sort_by(|a, b| a.total_cmp(b));

        let last = angles.len() - 1;
        let mut gap_start = angles[last];
        let mut widest = angles[0] + 2.0 * PI - angles[last];
        for w in angles.windows(2) {
            if w[1] - w[0] > widest {
                widest = w[1] - w[0];
                gap_start = w[0];
            }
        }
        let direction = gap_start + widest * 0.5;

        // longer than any vertex distance, so the end is outside the polygon
        let (min, max) = self.extent();
        let length = min.distance(&max) + 1.0;
        let end = *pnt + CoordPnt::new(direction.cos(), direction.sin()) * length;
        LineSeg::new(*pnt, end)
    }
}

impl GdsObject for Polygon {
    fn to_records(&self, scaling: f64) -> GdsResult<Vec<Record>> {
        // gds polygon points front is same as end
        let mut closed = self.vertices.clone();
        closed.push(self.vertices[0]);
        Ok(vec![
            Record::no_data(gds_record::BOUNDARY),
            Record::two_byte_int(gds_record::LAYER, vec![self.layer]),
            Record::two_byte_int(gds_record::DATATYPE, vec![self.datatype]),
            Record::four_byte_int(gds_record::XY, gds_writer::points_to_xy(&closed, scaling)?),
            Record::no_data(gds_record::ENDEL),
        ])
    }
}

#[cfg(test)]
mod test_polygon {
    use super::*;
    use float_cmp::{ApproxEq, F64Margin};
    use proptest::prelude::*;

    fn pnts(xy: &[(f64, f64)]) -> Vec<CoordPnt> {
        xy.iter().map(|&(x, y)| CoordPnt::new(x, y)).collect()
    }

    fn u_shape() -> Polygon {
        Polygon::new(pnts(&[
            (0.0, 0.0),
            (6.0, 0.0),
            (6.0, 6.0),
            (4.0, 6.0),
            (4.0, 2.0),
            (2.0, 2.0),
            (2.0, 6.0),
            (0.0, 6.0),
        ]))
        .unwrap()
    }

    #[test]
    fn test_internal_void() {
        let square = pnts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        assert!(!contains_internal_void(&square));
        let bowtie = pnts(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
        assert!(contains_internal_void(&bowtie));
        let triangle = pnts(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0)]);
        assert!(!contains_internal_void(&triangle));
        assert!(!contains_internal_void(u_shape().vertices()));
        // the last two edges both cut through the second one
        let wrap = pnts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (5.0, 2.0)]);
        assert!(contains_internal_void(&wrap));
    }

    #[test]
    fn test_set_vertices() {
        let square = pnts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let mut p = Polygon::new(square.clone()).unwrap();
        assert_eq!(p.layer(), 1);
        assert_eq!(p.datatype(), 0);

        let bowtie = pnts(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
        assert!(matches!(p.set_vertices(bowtie), Err(GdsError::Validation(_))));
        assert_eq!(p.vertices(), &square[..]);

        assert!(p.set_vertices(pnts(&[(0.0, 0.0), (1.0, 1.0)])).is_err());
        let too_many: Vec<CoordPnt> = (0..200)
            .map(|i| CoordPnt::new((i as f64).cos(), (i as f64).sin()))
            .collect();
        assert!(p.set_vertices(too_many).is_err());
        assert_eq!(p.vertices().len(), 4);

        assert!(Polygon::with_layer(square.clone(), 64, 0).is_err());
        assert!(Polygon::with_layer(square.clone(), 0, -1).is_err());
        assert!(p.set_layer(63).is_ok());
        assert!(p.set_datatype(64).is_err());
        assert_eq!(p.datatype(), 0);
    }

    #[test]
    fn test_bounding_box_and_center() {
        let p = Polygon::new(pnts(&[(-1.0, 0.0), (3.0, 0.0), (3.0, 2.0), (-1.0, 2.0)])).unwrap();
        assert_eq!(
            p.bounding_box(),
            [
                CoordPnt::new(-1.0, 2.0),
                CoordPnt::new(3.0, 2.0),
                CoordPnt::new(3.0, 0.0),
                CoordPnt::new(-1.0, 0.0),
            ]
        );
        assert_eq!(p.center(), CoordPnt::new(1.0, 1.0));
        assert!(p.area().approx_eq(8.0, F64Margin::default()));
        assert!(u_shape().area().approx_eq(28.0, F64Margin::default()));
    }

    #[test]
    fn test_rotate_updates_caches() {
        let mut p = Polygon::new(pnts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)])).unwrap();
        p.rotate(CoordPnt::new(0.0, 0.0), std::f64::consts::FRAC_PI_2);
        let margin = F64Margin {
            epsilon: 1e-12,
            ulps: 4,
        };
        let (min, max) = p.extent();
        assert!(min.approx_eq(CoordPnt::new(-1.0, 0.0), margin));
        assert!(max.approx_eq(CoordPnt::new(0.0, 2.0), margin));
        assert!(p.center().approx_eq(CoordPnt::new(-0.5, 1.0), margin));
    }

    #[test]
    fn test_point_inside_polygon() {
        let u = u_shape();
        assert!(u.point_inside_polygon(&CoordPnt::new(1.0, 4.0)));
        assert!(u.point_inside_polygon(&CoordPnt::new(3.0, 1.0)));
        assert!(u.point_inside_polygon(&CoordPnt::new(5.0, 5.0)));
        // notch of the U
        assert!(!u.point_inside_polygon(&CoordPnt::new(3.0, 4.0)));
        // outside the bounding box
        assert!(!u.point_inside_polygon(&CoordPnt::new(-1.0, 1.0)));
        // on edges and vertices
        assert!(!u.point_inside_polygon(&CoordPnt::new(3.0, 0.0)));
        assert!(!u.point_inside_polygon(&CoordPnt::new(4.0, 4.0)));
        assert!(!u.point_inside_polygon(&CoordPnt::new(2.0, 2.0)));
    }

    #[test]
    fn test_point_inside_ray_through_vertex() {
        let diamond =
            Polygon::new(pnts(&[(0.0, 2.0), (2.0, 0.0), (0.0, -2.0), (-2.0, 0.0)])).unwrap();
        assert!(diamond.point_inside_polygon(&CoordPnt::new(0.0, 0.0)));
        assert!(diamond.point_inside_polygon(&CoordPnt::new(-1.0, 0.0)));
        assert!(!diamond.point_inside_polygon(&CoordPnt::new(1.9, 1.9)));

        // rays along y = 2 and y = 6 pass vertices of the U
        let u = u_shape();
        assert!(u.point_inside_polygon(&CoordPnt::new(1.0, 2.0)));
        assert!(!u.point_inside_polygon(&CoordPnt::new(3.0, 6.0)));
    }

    #[test]
    fn test_to_records() {
        let p = Polygon::with_layer(pnts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]), 5, 2).unwrap();
        let records = p.to_records(1000.0).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].tag, gds_record::BOUNDARY);
        assert_eq!(records[1], Record::two_byte_int(gds_record::LAYER, vec![5]));
        assert_eq!(records[2], Record::two_byte_int(gds_record::DATATYPE, vec![2]));
        assert_eq!(
            records[3],
            Record::four_byte_int(gds_record::XY, vec![0, 0, 1000, 0, 1000, 1000, 0, 0])
        );
        assert_eq!(records[4].tag, gds_record::ENDEL);

        let far = Polygon::new(pnts(&[(0.0, 0.0), (1e7, 0.0), (1e7, 1.0)])).unwrap();
        assert!(matches!(far.to_records(1000.0), Err(GdsError::Validation(_))));
    }

    proptest! {
        #[test]
        fn prop_rotate_back(angle in -10.0f64..10.0, px in -5.0f64..5.0, py in -5.0f64..5.0) {
            let mut p = u_shape();
            let before = p.clone();
            let pivot = CoordPnt::new(px, py);
            p.rotate(pivot, angle);
            p.rotate(pivot, -angle);
            let margin = F64Margin { epsilon: 1e-9, ulps: 4 };
            for (a, b) in p.vertices().iter().zip(before.vertices()) {
                prop_assert!(a.approx_eq(*b, margin));
            }
            prop_assert!(p.center().approx_eq(before.center(), margin));
        }

        #[test]
        fn prop_inside_translation_invariant(
            gx in -2i32..9, gy in -2i32..9, ox in -100i32..100, oy in -100i32..100
        ) {
            let pnt = CoordPnt::new(gx as f64 + 0.5, gy as f64 + 0.5);
            let offset = CoordPnt::new(ox as f64, oy as f64);
            let u = u_shape();
            let mut moved = u.clone();
            moved.translate(offset);
            prop_assert_eq!(
                u.point_inside_polygon(&pnt),
                moved.point_inside_polygon(&(pnt + offset))
            );
        }

        #[test]
        fn prop_outside_bounding_box(
            side in 0u8..4, gap in 1e-6f64..50.0, along in -50.0f64..50.0, angle in -3.2f64..3.2
        ) {
            let mut u = u_shape();
            u.rotate(CoordPnt::new(1.0, -2.0), angle);
            let (min, max) = u.extent();
            let pnt = match side {
                0 => CoordPnt::new(min.x - gap, along),
                1 => CoordPnt::new(max.x + gap, along),
                2 => CoordPnt::new(along, min.y - gap),
                _ => CoordPnt::new(along, max.y + gap),
            };
            prop_assert!(!u.point_inside_polygon(&pnt));
        }
    }
}
