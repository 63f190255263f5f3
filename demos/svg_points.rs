use glam::DAffine3;
use pixpath::SvgImport;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (name, markup) = match std::env::args().nth(1) {
        Some(path) => {
            let markup = std::fs::read_to_string(&path)
                .map_err(|e| miette::miette!("failed to read {path}: {e}"))?;
            (path, markup)
        }
        None => (
            "builtin.svg".to_string(),
            r#"<svg xmlns="http://www.w3.org/2000/svg">
  <path d="M0,0 L10,0 A5,5 0 0,1 20,0"/>
  <path d="M0,10 C5,20 15,0 20,10"/>
</svg>"#
                .to_string(),
        ),
    };

    let mut import = SvgImport::new();
    import.import(&name, &markup)?;
    tracing::info!(file = %name, paths = import.num_paths(), "imported");

    for entry in import.fixtures() {
        let reports = entry.fixture.reports();
        if !reports.is_empty() {
            tracing::warn!(label = entry.fixture.label(), count = reports.len(), "path data warnings");
        }
        for report in reports {
            eprintln!("{report:?}");
        }
    }

    for (id, geometry) in import.compute_points(&DAffine3::IDENTITY) {
        let label = import.fixture(id).map_or("?", |f| f.fixture.label());
        println!(
            "{label}: {} points, length {:.3}, active {:.3}",
            geometry.count, geometry.total_length, geometry.active_length
        );
        for p in &geometry.points {
            println!("  {:.4} {:.4} {:.4}", p.x, p.y, p.z);
        }
    }
    println!("total points: {}", import.total_points());
    Ok(())
}
