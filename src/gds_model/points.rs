use float_cmp::{ApproxEq, F64Margin};
use std::fmt::{self, Display, Formatter};
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// geometry coord, in Layout units
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct CoordPnt {
    pub x: f64,
    pub y: f64,
}

impl CoordPnt {
    pub fn new(x: f64, y: f64) -> Self {
        CoordPnt { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &CoordPnt) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// rotate counter-clockwise about pivot, angle in radians
    pub fn rotate(&self, pivot: CoordPnt, angle: f64) -> CoordPnt {
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        let (sin, cos) = angle.sin_cos();
        CoordPnt {
            x: pivot.x + dx * cos - dy * sin,
            y: pivot.y + dx * sin + dy * cos,
        }
    }
}

impl Add for CoordPnt {
    type Output = CoordPnt;
    fn add(self, rhs: CoordPnt) -> CoordPnt {
        CoordPnt::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for CoordPnt {
    type Output = CoordPnt;
    fn sub(self, rhs: CoordPnt) -> CoordPnt {
        CoordPnt::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for CoordPnt {
    fn add_assign(&mut self, rhs: CoordPnt) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for CoordPnt {
    fn sub_assign(&mut self, rhs: CoordPnt) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for CoordPnt {
    type Output = CoordPnt;
    fn mul(self, rhs: f64) -> CoordPnt {
        CoordPnt::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<CoordPnt> for f64 {
    type Output = CoordPnt;
    fn mul(self, rhs: CoordPnt) -> CoordPnt {
        rhs * self
    }
}

impl Display for CoordPnt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl ApproxEq for CoordPnt {
    type Margin = F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        let margin = margin.into();
        self.x.approx_eq(other.x, margin) && self.y.approx_eq(other.y, margin)
    }
}
