use pest_derive::Parser;

pub mod errors;
pub mod fixture;
pub mod geometry;
pub mod group;
pub mod log;
pub mod parse;
pub mod path;
pub mod svg;
pub mod types;
pub mod units;

pub use errors::{ImportError, ParseWarning, PlacementWarning, SettingError, SourceContext};
pub use fixture::{FixtureGeometry, FixtureSettings, PathFixture, PlacementPolicy, PointModeKind};
pub use parse::{ParsedPath, parse_path_data};
pub use path::{Path, PathCommand};
pub use svg::{SvgImport, load_svg_paths};
pub use units::DistanceUnit;

#[derive(Parser)]
#[grammar = "path_data.pest"]
pub struct PathDataParser;

/// Place points along SVG path data with the given settings.
///
/// Parse warnings are logged and dropped; use [`PathFixture`] to keep them.
pub fn place_points(
    path_data: &str,
    settings: FixtureSettings,
    transform: &glam::DAffine3,
) -> FixtureGeometry {
    PathFixture::with_settings("<path data>", path_data, settings).compute_points(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pest::Parser;

    fn tokens(input: &str) -> Vec<(Rule, &str)> {
        PathDataParser::parse(Rule::path_data, input)
            .expect("path data always tokenizes")
            .flat_map(|p| p.into_inner())
            .filter(|p| p.as_rule() != Rule::EOI)
            .map(|p| (p.as_rule(), p.as_str()))
            .collect()
    }

    #[test]
    fn tokenize_commands_and_numbers() {
        assert_eq!(
            tokens("M10-5.5.5L1e2,3"),
            vec![
                (Rule::command, "M"),
                (Rule::number, "10"),
                (Rule::number, "-5.5"),
                (Rule::number, ".5"),
                (Rule::command, "L"),
                (Rule::number, "1e2"),
                (Rule::number, "3"),
            ]
        );
    }

    #[test]
    fn tokenize_adjacent_commands() {
        assert_eq!(
            tokens("zM"),
            vec![(Rule::command, "z"), (Rule::command, "M")]
        );
    }

    #[test]
    fn tokenize_garbage() {
        assert_eq!(
            tokens("L abc 1"),
            vec![
                (Rule::command, "L"),
                (Rule::malformed, "abc"),
                (Rule::number, "1"),
            ]
        );
    }

    #[test]
    fn junk_stops_at_next_token() {
        assert_eq!(
            tokens("0#L20;;m-1"),
            vec![
                (Rule::number, "0"),
                (Rule::malformed, "#"),
                (Rule::command, "L"),
                (Rule::number, "20"),
                (Rule::malformed, ";;"),
                (Rule::command, "m"),
                (Rule::number, "-1"),
            ]
        );
    }

    #[test]
    fn tokenize_empty() {
        assert!(tokens("").is_empty());
        assert!(tokens(" ,\t\n").is_empty());
    }

    #[test]
    fn place_points_with_settings() {
        let mut settings = FixtureSettings::default();
        settings.set_point_mode(PointModeKind::NumPoints);
        settings.set_num_points(3).unwrap();
        let geometry = place_points("M0,0 L10,0", settings, &glam::DAffine3::IDENTITY);
        let xs: Vec<f64> = geometry.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0]);
        assert_eq!(geometry.count, 3);
    }
}
