use silhouette::gds_model::*;
use silhouette::GdsResult;

fn main() -> GdsResult<()> {
    env_logger::init();

    let mut my_cell = Cell::new("MyCell")?;
    my_cell.add_polygon(shapes::circle(
        CoordPnt::new(0.0, 0.0),
        3.0,
        shapes::DEFAULT_CURVE_POINTS,
    )?);

    let mut ring = Cell::new("Ring")?;
    ring.add_polygon(shapes::rectangle(CoordPnt::new(0.0, 0.0), 20.0, 1.0)?);
    // 4x2 grid of circles, 5 um apart
    ring.add_cell_array(CellArray::new(
        &my_cell,
        CoordPnt::new(-7.5, 5.0),
        4,
        2,
        5.0,
        5.0,
    )?);

    let mut layout = Layout::new("circle");
    layout.add_cell(&ring)?;

    let file = std::env::temp_dir().join("my_cell_circle.gds");
    layout.write(&file)?;
    println!("write {}", file.display());
    Ok(())
}
