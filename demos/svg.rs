use plotters::prelude::*;
use vorosweep::{BoundingBox, Voronoi};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_example("voronoi_random.svg", 0)?;
    run_example("voronoi_relaxed.svg", 10)?;
    Ok(())
}

fn run_example(filename: &str, relax_steps: usize) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(filename, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .build_cartesian_2d(0.0..100.0, 0.0..100.0)?;

    let bounds = BoundingBox::new([0.0, 0.0], [100.0, 100.0]);
    let mut voronoi = Voronoi::new(bounds);
    voronoi.random_sites(1000, 42);
    for _ in 0..relax_steps {
        voronoi.relax()?;
    }
    let diagram = voronoi.calculate()?;
    println!("{} cells in {:?}", diagram.cells().len(), diagram.exec_time());

    // Draw bounding box
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (0.0, 0.0)],
        BLACK.stroke_width(2),
    )))?;

    // Draw cells
    for cell in diagram.cells() {
        let mut poly: Vec<(f64, f64)> = cell.points().iter().map(|p| (p.x, p.y)).collect();
        if poly.len() < 3 {
            continue;
        }

        chart.draw_series(std::iter::once(Polygon::new(
            poly.clone(),
            BLUE.mix(0.1).filled(),
        )))?;

        poly.push(poly[0]);
        chart.draw_series(std::iter::once(PathElement::new(
            poly,
            BLACK.mix(0.5),
        )))?;
    }

    // Draw sites
    let points: Vec<(f64, f64)> = voronoi.sites().iter().map(|p| (p.x, p.y)).collect();
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 2, RED.filled())))?;

    root.present()?;
    println!("Output saved to {}", filename);
    Ok(())
}
