use super::*;

/// turn direction of an ordered point triple
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Colinear = 0,
    Clockwise = 1,
    CounterClockwise = 2,
}

/// line segment between two points
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct LineSeg {
    pub start: CoordPnt,
    pub end: CoordPnt,
}

impl LineSeg {
    pub fn new(start: CoordPnt, end: CoordPnt) -> Self {
        LineSeg { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// angle in radians folded into the first quadrant, [0, pi/2]
    ///
    /// both deltas are taken as absolute values, so the direction sign is
    /// lost; use [`LineSeg::heading`] for the signed direction
    pub fn angle_offset(&self) -> f64 {
        let dx = (self.end.x - self.start.x).abs();
        let dy = (self.end.y - self.start.y).abs();
        dy.atan2(dx)
    }

    pub fn angle_offset_degree(&self) -> f64 {
        self.angle_offset().to_degrees()
    }

    /// signed direction from start to end, radians in (-pi, pi]
    pub fn heading(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }

    pub fn center(&self) -> CoordPnt {
        (self.start + self.end) * 0.5
    }
}

/// orientation of pnt relative to the directed segment
pub fn orientation(seg: &LineSeg, pnt: &CoordPnt) -> Orientation {
    let a = *pnt - seg.start;
    let b = seg.end - *pnt;
    let cross = a.y * b.x - a.x * b.y;
    if cross > 0.0 {
        Orientation::Clockwise
    } else if cross < 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Colinear
    }
}

/// pnt lies within the segment's bounding box
///
/// only an on-segment test once colinearity is known
pub fn point_on_line_seg(seg: &LineSeg, pnt: &CoordPnt) -> bool {
    pnt.x <= seg.start.x.max(seg.end.x)
        && pnt.x >= seg.start.x.min(seg.end.x)
        && pnt.y <= seg.start.y.max(seg.end.y)
        && pnt.y >= seg.start.y.min(seg.end.y)
}

/// proper crossing test, colinear overlaps do not count
pub fn line_seg_intersect(a: &LineSeg, b: &LineSeg) -> bool {
    orientation(a, &b.start) != orientation(a, &b.end)
        && orientation(b, &a.start) != orientation(b, &a.end)
}
