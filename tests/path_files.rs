use datatest_stable::Utf8Path;
use glam::DAffine3;
use pixpath::DistanceUnit;
use pixpath::fixture::{
    CurveSampling, Density, Direct, NumPoints, PlacementPolicy, Spacing, flatten, point_count,
    resample,
};
use pixpath::load_svg_paths;

/// Every policy family, with and without padding and reversal.
fn policies() -> Vec<PlacementPolicy> {
    let modes = [
        PlacementPolicy::new(Direct),
        PlacementPolicy::new(NumPoints { points: 1 }),
        PlacementPolicy::new(NumPoints { points: 17 }),
        PlacementPolicy::new(Spacing {
            distance: 0.75,
            units: DistanceUnit::Inches,
        }),
        PlacementPolicy::new(Spacing {
            distance: 3.0,
            units: DistanceUnit::Millimeters,
        }),
        PlacementPolicy::new(Density {
            points_per_unit: 60.0,
            units: DistanceUnit::Meters,
        }),
    ];
    let mut out = Vec::new();
    for policy in modes {
        for reverse in [false, true] {
            for (start, end) in [(0.0, 0.0), (1.5, 0.25), (1.0e4, 0.0)] {
                out.push(policy.with_padding(start, end).reversed(reverse));
            }
        }
    }
    out
}

fn check_path_file(path: &Utf8Path) -> datatest_stable::Result<()> {
    let markup = std::fs::read_to_string(path)?;
    let paths = load_svg_paths(&markup)?;

    for (i, data) in paths.iter().enumerate() {
        let parsed = pixpath::parse_path_data(data);
        assert!(
            parsed.warnings.is_empty(),
            "{path} path {i}: unexpected warnings {:?}",
            parsed.warnings
        );

        for sampling in [
            CurveSampling::EndpointsOnly,
            CurveSampling::Subdivide { segments: 6 },
        ] {
            let units = (DistanceUnit::Millimeters, DistanceUnit::Inches);
            let chain = flatten(&parsed.path, units.0, units.1, sampling);
            assert_eq!(
                chain,
                flatten(&parsed.path, units.0, units.1, sampling),
                "{path} path {i}: re-flatten differs"
            );

            let coords = chain.coordinates();
            if let Some(first) = coords.first() {
                assert_eq!(first.normalized, 0.0);
                assert_eq!(first.dist_from_start, 0.0);
            }
            for pair in coords.windows(2) {
                assert!(
                    pair[0].normalized <= pair[1].normalized,
                    "{path} path {i}: normalized positions decrease"
                );
            }
            if let Some(last) = coords.last() {
                let expected = if chain.total_length() > 0.0 { 1.0 } else { 0.0 };
                assert_eq!(last.normalized, expected);
            }

            for policy in policies() {
                let placed = resample(&chain, &policy, units.1, &DAffine3::IDENTITY);
                assert_eq!(
                    placed.points.len(),
                    point_count(&chain, &policy, units.1),
                    "{path} path {i}: size disagrees with resampler for {policy:?}"
                );
                assert!(placed.warnings.is_empty(), "{path} path {i}: {policy:?} overran");
                assert!(placed.points.iter().all(|p| p.is_finite()));
            }

            let direct = resample(
                &chain,
                &PlacementPolicy::new(Direct),
                units.1,
                &DAffine3::IDENTITY,
            );
            let expected: Vec<_> = chain.positions().map(|p| p.extend(0.0)).collect();
            assert_eq!(direct.points, expected, "{path} path {i}: direct mode drifted");
        }
    }

    Ok(())
}

datatest_stable::harness! {
    { test = check_path_file, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/paths"), pattern = r"\.svg$" },
}
