//! SVG import: pull `<path>` data out of markup and manage the resulting fixtures.

use glam::DAffine3;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::errors::{ImportError, SettingError};
use crate::fixture::{FixtureGeometry, FixtureParam, FixtureSettings, PathFixture};
use crate::group::{ParamValue, SetCommand, SumAggregator, SyncGroup};
use crate::log;

fn unreadable(error: impl std::fmt::Display, position: usize) -> ImportError {
    ImportError::Unreadable {
        message: error.to_string(),
        span: position.into(),
    }
}

fn path_data(element: &BytesStart<'_>) -> Result<Option<String>, quick_xml::Error> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == b"d" {
            let value = attr.unescape_value()?;
            let value = value.trim();
            return Ok((!value.is_empty()).then(|| value.to_string()));
        }
    }
    Ok(None)
}

/// The `d` attribute of every `<path>` element, in document order.
///
/// Elements are matched by local name, so namespace prefixes and nesting do
/// not matter. Paths without data are skipped. The markup must be one
/// well-formed document: a single root element, closed, with nothing but
/// whitespace, comments and declarations around it.
pub fn load_svg_paths(markup: &str) -> Result<Vec<String>, ImportError> {
    let mut reader = Reader::from_str(markup);
    let mut paths = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|err| unreadable(err, reader.buffer_position()))?;
        match &event {
            Event::Start(e) | Event::Empty(e) => {
                if depth == 0 && std::mem::replace(&mut seen_root, true) {
                    return Err(unreadable("more than one root element", position));
                }
                if e.local_name().as_ref() == b"path" {
                    if let Some(d) = path_data(e).map_err(|err| unreadable(err, position))? {
                        paths.push(d);
                    }
                }
                if matches!(event, Event::Start(_)) {
                    depth += 1;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(text) if depth == 0 && !text.iter().all(u8::is_ascii_whitespace) => {
                return Err(unreadable("text outside the root element", position));
            }
            Event::CData(_) if depth == 0 => {
                return Err(unreadable("text outside the root element", position));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(unreadable("unclosed element at end of input", markup.len()));
    }
    if !seen_root {
        return Err(unreadable("no root element", markup.len()));
    }
    if paths.is_empty() {
        return Err(ImportError::NoPaths);
    }
    log::debug!(paths = paths.len(), "loaded svg paths");
    Ok(paths)
}

/// Identifies a fixture within one [`SvgImport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixtureId(u64);

#[derive(Debug, Clone)]
pub struct ImportedFixture {
    pub id: FixtureId,
    pub fixture: PathFixture,
    /// Inactive fixtures are skipped for export and the point total.
    pub active: bool,
}

/// A set of fixtures created from SVG files, kept in step by sync groups.
#[derive(Debug, Clone)]
pub struct SvgImport {
    file_name: Option<String>,
    num_paths: usize,
    /// Drop previously imported fixtures when a new file is imported.
    pub clear_existing_on_import: bool,
    fixtures: Vec<ImportedFixture>,
    next_id: u64,
    sync: Vec<(FixtureParam, SyncGroup<FixtureId>)>,
    total_points: SumAggregator<FixtureId>,
}

impl Default for SvgImport {
    fn default() -> Self {
        let defaults = FixtureSettings::default();
        Self {
            file_name: None,
            num_paths: 0,
            clear_existing_on_import: true,
            fixtures: Vec::new(),
            next_id: 0,
            sync: FixtureParam::SYNCED
                .into_iter()
                .map(|param| (param, SyncGroup::new(defaults.param(param))))
                .collect(),
            total_points: SumAggregator::new(),
        }
    }
}

impl SvgImport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the last successfully imported file.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Number of paths found by the last successful import.
    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    pub fn fixtures(&self) -> &[ImportedFixture] {
        &self.fixtures
    }

    pub fn fixture(&self, id: FixtureId) -> Option<&ImportedFixture> {
        self.fixtures.iter().find(|f| f.id == id)
    }

    /// Fixtures that will be exported.
    pub fn num_active(&self) -> usize {
        self.fixtures.iter().filter(|f| f.active).count()
    }

    /// Sum of the point counts of all active fixtures.
    pub fn total_points(&self) -> usize {
        self.total_points.value() as usize
    }

    /// Import every path in `markup` as a new fixture, returning their ids.
    ///
    /// Nothing changes if the markup cannot be read or has no paths.
    pub fn import(&mut self, file_name: &str, markup: &str) -> Result<Vec<FixtureId>, ImportError> {
        let paths = load_svg_paths(markup)?;

        if self.clear_existing_on_import {
            let ids: Vec<FixtureId> = self.fixtures.iter().map(|f| f.id).collect();
            for id in ids {
                self.remove_fixture(id);
            }
        }

        self.file_name = Some(file_name.to_string());
        self.num_paths = paths.len();
        let ids = paths
            .into_iter()
            .enumerate()
            .map(|(i, d)| self.add_fixture(PathFixture::new(format!("Path {i}"), d)))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(file = file_name, fixtures = self.fixtures.len(), "imported svg");
        Ok(ids)
    }

    /// Add a fixture, bringing it in line with every enabled sync group.
    ///
    /// The fixture is added even if it rejects a group value; the first
    /// rejection is returned.
    pub fn add_fixture(&mut self, fixture: PathFixture) -> Result<FixtureId, SettingError> {
        let id = FixtureId(self.next_id);
        self.next_id += 1;
        self.fixtures.push(ImportedFixture {
            id,
            fixture,
            active: true,
        });

        let commands: Vec<(FixtureParam, SetCommand<FixtureId>)> = self
            .sync
            .iter_mut()
            .flat_map(|(param, group)| {
                let param = *param;
                group
                    .add_dependent(id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |c| (param, c))
            })
            .collect();
        let applied = self.apply(commands);

        let size = self.size_of(id);
        self.total_points.add_child(id, size);
        applied.map(|()| id)
    }

    pub fn remove_fixture(&mut self, id: FixtureId) -> Option<PathFixture> {
        let index = self.fixtures.iter().position(|f| f.id == id)?;
        for (_, group) in &mut self.sync {
            group.remove_dependent(&id);
        }
        self.total_points.remove_child(&id);
        Some(self.fixtures.remove(index).fixture)
    }

    pub fn set_active(&mut self, id: FixtureId, active: bool) {
        let size = self.size_of(id);
        let Some(entry) = self.fixtures.iter_mut().find(|f| f.id == id) else {
            return;
        };
        entry.active = active;
        if active {
            self.total_points.add_child(id, size);
        } else {
            self.total_points.remove_child(&id);
        }
    }

    pub fn sync_group(&self, param: FixtureParam) -> Option<&SyncGroup<FixtureId>> {
        self.sync.iter().find(|(p, _)| *p == param).map(|(_, g)| g)
    }

    fn sync_group_mut(&mut self, param: FixtureParam) -> Option<&mut SyncGroup<FixtureId>> {
        self.sync.iter_mut().find(|(p, _)| *p == param).map(|(_, g)| g)
    }

    /// Set the group value of a synced parameter, pushing it to every
    /// fixture while the group is enabled.
    ///
    /// Parameters that are not synced only validate the value.
    pub fn set_synced(&mut self, param: FixtureParam, value: ParamValue) -> Result<(), SettingError> {
        FixtureSettings::default().set_param(param, value)?;
        let Some(group) = self.sync_group_mut(param) else {
            return Ok(());
        };
        let commands = group.set_value(value);
        self.apply(commands.into_iter().map(|c| (param, c)).collect())
    }

    pub fn set_sync_enabled(&mut self, param: FixtureParam, enabled: bool) -> Result<(), SettingError> {
        let Some(group) = self.sync_group_mut(param) else {
            return Ok(());
        };
        let commands = group.set_enabled(enabled);
        self.apply(commands.into_iter().map(|c| (param, c)).collect())
    }

    /// Change one fixture's parameter directly. A value that differs from
    /// an enabled group's value takes that group out of sync.
    pub fn set_fixture_param(
        &mut self,
        id: FixtureId,
        param: FixtureParam,
        value: ParamValue,
    ) -> Result<(), SettingError> {
        let Some(entry) = self.fixtures.iter_mut().find(|f| f.id == id) else {
            return Ok(());
        };
        entry.fixture.set_param(param, value)?;
        if let Some(group) = self.sync_group_mut(param) {
            group.dependent_changed(&id, value);
        }
        self.refresh_size(id);
        Ok(())
    }

    /// Compute the points of every active fixture.
    pub fn compute_points(&self, transform: &DAffine3) -> Vec<(FixtureId, FixtureGeometry)> {
        self.fixtures
            .iter()
            .filter(|f| f.active)
            .map(|f| (f.id, f.fixture.compute_points(transform)))
            .collect()
    }

    /// Apply every command, even after a rejection. Returns the first rejection.
    fn apply(&mut self, commands: Vec<(FixtureParam, SetCommand<FixtureId>)>) -> Result<(), SettingError> {
        let mut first_err = None;
        for (param, SetCommand { target, value }) in commands {
            let Some(entry) = self.fixtures.iter_mut().find(|f| f.id == target) else {
                continue;
            };
            if let Err(err) = entry.fixture.set_param(param, value) {
                log::warn!(%param, error = %err, "sync value rejected by fixture");
                first_err.get_or_insert(err);
            }
            self.refresh_size(target);
        }
        first_err.map_or(Ok(()), Err)
    }

    fn size_of(&self, id: FixtureId) -> f64 {
        self.fixture(id).map_or(0.0, |f| f.fixture.size() as f64)
    }

    fn refresh_size(&mut self, id: FixtureId) {
        let size = self.size_of(id);
        self.total_points.update_child(&id, size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::PointModeKind;

    const TWO_PATHS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
  <g id="layer">
    <path d="M0,0 L10,0" stroke="black"/>
    <rect x="0" y="0" width="5" height="5"/>
    <path id="empty" d=""/>
  </g>
  <svg:path xmlns:svg="http://www.w3.org/2000/svg" d="M0 0 L0 20"></svg:path>
</svg>"#;

    fn mode(kind: PointModeKind) -> ParamValue {
        ParamValue::Enum(kind.index())
    }

    #[test]
    fn finds_nested_and_prefixed_paths() {
        assert_eq!(
            load_svg_paths(TWO_PATHS).unwrap(),
            vec!["M0,0 L10,0".to_string(), "M0 0 L0 20".to_string()]
        );
    }

    #[test]
    fn unescapes_attribute() {
        let paths = load_svg_paths(r#"<svg><path d="M0,0&#10;L1,1"/></svg>"#).unwrap();
        assert_eq!(paths, vec!["M0,0\nL1,1".to_string()]);
    }

    #[test]
    fn markup_errors() {
        assert!(matches!(
            load_svg_paths("<svg><path d='M0,0 L1,1'/></sv>"),
            Err(ImportError::Unreadable { .. })
        ));
        assert!(matches!(
            load_svg_paths("<svg><rect/></svg>"),
            Err(ImportError::NoPaths)
        ));
    }

    #[test]
    fn rejects_documents_that_are_not_well_formed() {
        for markup in [
            "<svg><g><path d='M0,0 L1,1'/>",
            "<svg/><path d='M0,0 L1,1'/>",
            "not xml at all <path d='M0,0 L1,1'/>",
            "<svg><path d='M0,0 L1,1'/></svg> trailing",
            "",
        ] {
            assert!(
                matches!(load_svg_paths(markup), Err(ImportError::Unreadable { .. })),
                "accepted {markup:?}"
            );
        }
    }

    #[test]
    fn comments_and_whitespace_around_the_root_are_fine() {
        let markup = "<?xml version=\"1.0\"?>\n<!-- exported -->\n<svg><path d='M0,0 L1,1'/></svg>\n";
        assert_eq!(load_svg_paths(markup).unwrap(), vec!["M0,0 L1,1".to_string()]);
    }

    #[test]
    fn rejected_sync_value_is_returned() {
        let mut import = SvgImport::new();
        import.import("shapes.svg", TWO_PATHS).unwrap();

        // group values are validated on the way in, so go around that check
        let commands = import
            .sync_group_mut(FixtureParam::Spacing)
            .unwrap()
            .set_value(ParamValue::Continuous(0.0));
        let applied = import.apply(
            commands
                .into_iter()
                .map(|c| (FixtureParam::Spacing, c))
                .collect(),
        );
        assert!(matches!(
            applied,
            Err(SettingError::OutOfRange { name: "spacing", .. })
        ));
        assert!(import.fixtures().iter().all(|f| f.fixture.settings().spacing() == 1.0));
        assert_eq!(import.total_points(), 30);
    }

    #[test]
    fn import_creates_fixtures() {
        let mut import = SvgImport::new();
        let ids = import.import("shapes.svg", TWO_PATHS).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(import.file_name(), Some("shapes.svg"));
        assert_eq!(import.num_paths(), 2);
        assert_eq!(import.fixtures()[1].fixture.label(), "Path 1");
        // default spacing of one inch
        assert_eq!(import.total_points(), 30);
    }

    #[test]
    fn failed_import_keeps_state() {
        let mut import = SvgImport::new();
        import.import("shapes.svg", TWO_PATHS).unwrap();
        assert!(import.import("broken.svg", "<svg><path d='M0,0'/></g>").is_err());
        assert_eq!(import.fixtures().len(), 2);
        assert_eq!(import.file_name(), Some("shapes.svg"));
    }

    #[test]
    fn clear_on_import_is_optional() {
        let mut import = SvgImport::new();
        import.import("a.svg", TWO_PATHS).unwrap();
        import.import("b.svg", TWO_PATHS).unwrap();
        assert_eq!(import.fixtures().len(), 2);

        import.clear_existing_on_import = false;
        import.import("c.svg", TWO_PATHS).unwrap();
        assert_eq!(import.fixtures().len(), 4);
        assert_eq!(import.total_points(), 60);
    }

    #[test]
    fn synced_values_reach_every_fixture() {
        let mut import = SvgImport::new();
        import.import("shapes.svg", TWO_PATHS).unwrap();

        import
            .set_synced(FixtureParam::PointMode, mode(PointModeKind::NumPoints))
            .unwrap();
        import
            .set_synced(FixtureParam::NumPoints, ParamValue::Int(4))
            .unwrap();
        assert_eq!(import.total_points(), 8);

        let later = import
            .add_fixture(PathFixture::new("extra", "M0,0 L1,1"))
            .unwrap();
        assert_eq!(import.fixture(later).map(|f| f.fixture.size()), Some(4));
        assert_eq!(import.total_points(), 12);
    }

    #[test]
    fn independent_change_breaks_sync() {
        let mut import = SvgImport::new();
        let ids = import.import("shapes.svg", TWO_PATHS).unwrap();

        import
            .set_fixture_param(ids[0], FixtureParam::Reverse, ParamValue::Bool(true))
            .unwrap();
        let group = import.sync_group(FixtureParam::Reverse).unwrap();
        assert!(!group.is_enabled());

        import
            .set_synced(FixtureParam::Reverse, ParamValue::Bool(false))
            .unwrap();
        assert_eq!(
            import.fixture(ids[0]).unwrap().fixture.param(FixtureParam::Reverse),
            ParamValue::Bool(true)
        );

        import.set_sync_enabled(FixtureParam::Reverse, true).unwrap();
        assert_eq!(
            import.fixture(ids[0]).unwrap().fixture.param(FixtureParam::Reverse),
            ParamValue::Bool(false)
        );
    }

    #[test]
    fn invalid_synced_value_is_rejected() {
        let mut import = SvgImport::new();
        import.import("shapes.svg", TWO_PATHS).unwrap();
        assert!(
            import
                .set_synced(FixtureParam::Spacing, ParamValue::Continuous(0.0))
                .is_err()
        );
        assert_eq!(
            import.sync_group(FixtureParam::Spacing).unwrap().value(),
            ParamValue::Continuous(1.0)
        );
    }

    #[test]
    fn inactive_fixtures_leave_the_total() {
        let mut import = SvgImport::new();
        let ids = import.import("shapes.svg", TWO_PATHS).unwrap();
        import.set_active(ids[1], false);
        assert_eq!(import.total_points(), 10);
        assert_eq!(import.num_active(), 1);
        assert_eq!(import.compute_points(&DAffine3::IDENTITY).len(), 1);
        import.set_active(ids[1], true);
        assert_eq!(import.total_points(), 30);
    }
}
