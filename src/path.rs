//! Geometric path model produced by the path data parser.
//!
//! All coordinates are absolute and still in path (source) units. Arcs never
//! appear here: the parser expands them into cubic curves before appending.

use glam::DVec2;

/// One drawing operation of a parsed path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(DVec2),
    LineTo(DVec2),
    CubicCurveTo {
        ctrl1: DVec2,
        ctrl2: DVec2,
        to: DVec2,
    },
    QuadraticCurveTo {
        ctrl: DVec2,
        to: DVec2,
    },
    ClosePath,
}

impl PathCommand {
    /// The point the pen ends on, if the command moves it explicitly.
    ///
    /// `ClosePath` returns `None`; where it lands depends on the sub-path start.
    pub fn end_point(&self) -> Option<DVec2> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::CubicCurveTo { to, .. } | PathCommand::QuadraticCurveTo { to, .. } => {
                Some(to)
            }
            PathCommand::ClosePath => None,
        }
    }

    pub fn is_curve(&self) -> bool {
        matches!(
            self,
            PathCommand::CubicCurveTo { .. } | PathCommand::QuadraticCurveTo { .. }
        )
    }
}

/// An ordered list of path commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Walk the commands together with the pen position each one starts from.
    ///
    /// The pen starts at the origin and `ClosePath` returns it to the most
    /// recent `MoveTo`.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            commands: self.commands.iter(),
            pen: DVec2::ZERO,
            subpath_start: DVec2::ZERO,
        }
    }
}

impl From<Vec<PathCommand>> for Path {
    fn from(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }
}

/// Iterator returned by [`Path::segments`], yielding `(start, command)`.
pub struct Segments<'a> {
    commands: std::slice::Iter<'a, PathCommand>,
    pen: DVec2,
    subpath_start: DVec2,
}

impl<'a> Iterator for Segments<'a> {
    type Item = (DVec2, &'a PathCommand);

    fn next(&mut self) -> Option<Self::Item> {
        let command = self.commands.next()?;
        let start = self.pen;
        match *command {
            PathCommand::MoveTo(p) => {
                self.pen = p;
                self.subpath_start = p;
            }
            PathCommand::ClosePath => self.pen = self.subpath_start,
            _ => {
                if let Some(p) = command.end_point() {
                    self.pen = p;
                }
            }
        }
        Some((start, command))
    }
}
