//! constructors for common polygon outlines
//!
//! every shape comes back as a plain validated [`Polygon`] on layer 1, datatype 0

use std::f64::consts::PI;

use super::*;

/// vertex count used for curved outlines when the caller has no preference
pub const DEFAULT_CURVE_POINTS: usize = 16;

/// axis aligned rectangle, corners in bounding box order
pub fn rectangle(center: CoordPnt, width: f64, height: f64) -> GdsResult<Polygon> {
    if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
        return Err(validation_err!(
            "rectangle needs positive width and height, got {} x {}",
            width,
            height
        ));
    }
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    Polygon::new(vec![
        CoordPnt::new(center.x - half_w, center.y + half_h),
        CoordPnt::new(center.x + half_w, center.y + half_h),
        CoordPnt::new(center.x + half_w, center.y - half_h),
        CoordPnt::new(center.x - half_w, center.y - half_h),
    ])
}

pub fn square(center: CoordPnt, side: f64) -> GdsResult<Polygon> {
    rectangle(center, side, side)
}

/// ellipse outline, major and minor are the semi axis lengths along x and y
pub fn oval(center: CoordPnt, major: f64, minor: f64, num_pnts: usize) -> GdsResult<Polygon> {
    if num_pnts < 4 {
        return Err(validation_err!(
            "oval needs at least 4 vertices, got {}",
            num_pnts
        ));
    }
    if !(minor > 0.0) || !major.is_finite() {
        return Err(validation_err!(
            "oval axis lengths must be positive and finite, got {} and {}",
            major,
            minor
        ));
    }
    if major < minor {
        return Err(validation_err!(
            "major axis {} is shorter than minor axis {}",
            major,
            minor
        ));
    }

    let step = 2.0 * PI / num_pnts as f64;
    let vertices = (0..num_pnts)
        .map(|k| {
            let theta = step * k as f64;
            let (sin, cos) = theta.sin_cos();
            let radius = major * minor / ((minor * cos).powi(2) + (major * sin).powi(2)).sqrt();
            center + CoordPnt::new(radius * cos, radius * sin)
        })
        .collect();
    Polygon::new(vertices)
}

/// ellipse whose major axis runs along `major_axis`, its endpoints become vertices
pub fn oval_on_axis(major_axis: LineSeg, minor: f64, num_pnts: usize) -> GdsResult<Polygon> {
    let center = major_axis.center();
    let mut polygon = oval(center, major_axis.length() / 2.0, minor, num_pnts)?;
    polygon.rotate(center, major_axis.heading());
    Ok(polygon)
}

pub fn circle(center: CoordPnt, radius: f64, num_pnts: usize) -> GdsResult<Polygon> {
    oval(center, radius, radius, num_pnts)
}

/// 0 for a circle, approaching 1 as the ellipse flattens
pub fn eccentricity(major: f64, minor: f64) -> f64 {
    ((major * major - minor * minor) / (major * major)).sqrt()
}
