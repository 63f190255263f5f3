//! Interpret SVG path data into a [`Path`].
//!
//! The pest grammar only tokenizes. Interpretation is a small state machine
//! that tracks the pen, the start of the current sub-path, the control point
//! available for `S`/`T` reflection, and the operand group being collected for
//! the active command. Problems become [`ParseWarning`]s and parsing continues.

use glam::{DVec2, dvec2};
use miette::SourceSpan;
use pest::Parser;

use crate::errors::{ParseWarning, SourceContext};
use crate::geometry::EllipticalArc;
use crate::log;
use crate::path::{Path, PathCommand};
use crate::{PathDataParser, Rule};

/// Result of interpreting path data: the geometry plus everything that was skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPath {
    pub path: Path,
    pub warnings: Vec<ParseWarning>,
}

impl ParsedPath {
    /// Render each warning as a miette report against the original path data.
    pub fn reports(&self, name: &str, data: &str) -> Vec<miette::Report> {
        let ctx = SourceContext::new(name, data);
        self.warnings.iter().cloned().map(|w| ctx.report(w)).collect()
    }
}

/// Parse SVG path data (the `d` attribute of a `<path>` element).
///
/// Never fails: malformed numbers, unknown commands and dangling operands are
/// reported as warnings on the result.
pub fn parse_path_data(data: &str) -> ParsedPath {
    let mut interp = Interpreter::default();

    match PathDataParser::parse(Rule::path_data, data) {
        Ok(pairs) => {
            for pair in pairs.flat_map(|p| p.into_inner()) {
                let span = pair.as_span();
                let span = SourceSpan::from(span.start()..span.end());
                match pair.as_rule() {
                    Rule::command => {
                        let letter = pair.as_str().chars().next().unwrap_or_default();
                        interp.command(letter, span);
                    }
                    Rule::number => interp.number(pair.as_str(), span),
                    Rule::malformed => interp.malformed(pair.as_str(), span),
                    _ => {}
                }
            }
        }
        Err(e) => interp.warn(ParseWarning::Untokenizable {
            message: e.to_string(),
        }),
    }

    interp.finish()
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    MoveTo,
    LineTo,
    Horizontal,
    Vertical,
    Cubic,
    SmoothCubic,
    Quadratic,
    SmoothQuadratic,
    Arc,
    Close,
}

impl CommandKind {
    /// Look up a command letter; lowercase letters are relative.
    fn from_letter(letter: char) -> Option<(CommandKind, bool)> {
        let kind = match letter.to_ascii_uppercase() {
            'M' => CommandKind::MoveTo,
            'L' => CommandKind::LineTo,
            'H' => CommandKind::Horizontal,
            'V' => CommandKind::Vertical,
            'C' => CommandKind::Cubic,
            'S' => CommandKind::SmoothCubic,
            'Q' => CommandKind::Quadratic,
            'T' => CommandKind::SmoothQuadratic,
            'A' => CommandKind::Arc,
            'Z' => CommandKind::Close,
            _ => return None,
        };
        Some((kind, letter.is_ascii_lowercase()))
    }

    /// Operands consumed by one repetition of the command.
    fn arity(self) -> usize {
        match self {
            CommandKind::Close => 0,
            CommandKind::Horizontal | CommandKind::Vertical => 1,
            CommandKind::MoveTo | CommandKind::LineTo | CommandKind::SmoothQuadratic => 2,
            CommandKind::SmoothCubic | CommandKind::Quadratic => 4,
            CommandKind::Cubic => 6,
            CommandKind::Arc => 7,
        }
    }
}

/// The command currently collecting operands.
#[derive(Debug, Clone, Copy)]
struct Active {
    kind: CommandKind,
    relative: bool,
    letter: char,
    span: SourceSpan,
    /// At least one full operand group was executed.
    executed: bool,
    /// A malformed token already threw away operands for this command.
    dropped: bool,
}

// ============================================================================
// Interpreter
// ============================================================================

#[derive(Debug, Default)]
struct Interpreter {
    path: Path,
    warnings: Vec<ParseWarning>,
    pen: DVec2,
    subpath_start: DVec2,
    /// Second control point of the previous `C`/`S`, for `S` reflection.
    last_cubic_ctrl: Option<DVec2>,
    /// Control point of the previous `Q`/`T`, for `T` reflection.
    last_quad_ctrl: Option<DVec2>,
    active: Option<Active>,
    /// Operands after an unknown command are skipped without further warnings.
    skipping_unknown: bool,
    operands: Vec<f64>,
    group_start: usize,
    group_end: usize,
}

impl Interpreter {
    fn warn(&mut self, warning: ParseWarning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn command(&mut self, letter: char, span: SourceSpan) {
        self.flush_incomplete();
        self.skipping_unknown = false;
        match CommandKind::from_letter(letter) {
            None => {
                self.warn(ParseWarning::UnknownCommand { letter, span });
                self.active = None;
                self.skipping_unknown = true;
            }
            Some((CommandKind::Close, _)) => {
                self.close_path();
                self.active = None;
            }
            Some((kind, relative)) => {
                self.active = Some(Active {
                    kind,
                    relative,
                    letter,
                    span,
                    executed: false,
                    dropped: false,
                });
            }
        }
    }

    fn operand(&mut self, value: f64, span: SourceSpan) {
        let Some(mut active) = self.active else {
            if !self.skipping_unknown {
                self.warn(ParseWarning::StrayOperand { span });
            }
            return;
        };

        if self.operands.is_empty() {
            self.group_start = span.offset();
        }
        self.group_end = span.offset() + span.len();
        self.operands.push(value);
        if self.operands.len() < active.kind.arity() {
            return;
        }

        let ops = std::mem::take(&mut self.operands);
        self.execute(active.kind, active.relative, &ops);
        self.operands = ops;
        self.operands.clear();

        active.executed = true;
        // Extra coordinate pairs after a moveto are implicit linetos; `letter`
        // stays as written for diagnostics
        if active.kind == CommandKind::MoveTo {
            active.kind = CommandKind::LineTo;
        }
        self.active = Some(active);
    }

    fn number(&mut self, mut text: &str, span: SourceSpan) {
        let mut offset = span.offset();
        // Arc flags are one digit each and may run into what follows ("0110,0")
        while self.expects_flag() && text.len() > 1 {
            let (flag, rest) = text.split_at(1);
            let splits = matches!(flag, "0" | "1") && rest.starts_with(|c: char| c.is_ascii_digit());
            if !splits {
                break;
            }
            self.operand(if flag == "1" { 1.0 } else { 0.0 }, SourceSpan::from(offset..offset + 1));
            text = rest;
            offset += 1;
        }

        let span = SourceSpan::from(offset..offset + text.len());
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => self.operand(value, span),
            _ => self.malformed(text, span),
        }
    }

    fn expects_flag(&self) -> bool {
        self.active.is_some_and(|a| a.kind == CommandKind::Arc) && matches!(self.operands.len(), 3 | 4)
    }

    fn malformed(&mut self, token: &str, span: SourceSpan) {
        self.warn(ParseWarning::InvalidNumber {
            token: token.to_string(),
            span,
        });
        self.operands.clear();
        if let Some(active) = self.active.as_mut() {
            active.dropped = true;
        }
    }

    /// Warn about a command whose operand group never completed.
    fn flush_incomplete(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        let never_ran = !active.executed && !active.dropped;
        if self.operands.is_empty() && !never_ran {
            return;
        }
        let span = if self.operands.is_empty() {
            active.span
        } else {
            SourceSpan::from(self.group_start..self.group_end)
        };
        let warning = ParseWarning::IncompleteOperands {
            command: active.letter,
            expected: active.kind.arity(),
            found: self.operands.len(),
            span,
        };
        self.warn(warning);
        self.operands.clear();
    }

    fn finish(mut self) -> ParsedPath {
        self.flush_incomplete();
        log::debug!(
            commands = self.path.len(),
            warnings = self.warnings.len(),
            "parsed path data"
        );
        ParsedPath {
            path: self.path,
            warnings: self.warnings,
        }
    }

    // ------------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------------

    fn execute(&mut self, kind: CommandKind, relative: bool, ops: &[f64]) {
        let origin = if relative { self.pen } else { DVec2::ZERO };
        let pt = |i: usize| origin + dvec2(ops[i], ops[i + 1]);

        match kind {
            CommandKind::MoveTo => {
                let to = pt(0);
                self.path.push(PathCommand::MoveTo(to));
                self.pen = to;
                self.subpath_start = to;
                self.reset_smooth();
            }
            CommandKind::LineTo => self.line_to(pt(0)),
            CommandKind::Horizontal => {
                let x = origin.x + ops[0];
                self.line_to(dvec2(x, self.pen.y));
            }
            CommandKind::Vertical => {
                let y = origin.y + ops[0];
                self.line_to(dvec2(self.pen.x, y));
            }
            CommandKind::Cubic => self.cubic_to(pt(0), pt(2), pt(4)),
            CommandKind::SmoothCubic => {
                let ctrl1 = reflect(self.pen, self.last_cubic_ctrl);
                self.cubic_to(ctrl1, pt(0), pt(2));
            }
            CommandKind::Quadratic => self.quad_to(pt(0), pt(2)),
            CommandKind::SmoothQuadratic => {
                let ctrl = reflect(self.pen, self.last_quad_ctrl);
                self.quad_to(ctrl, pt(0));
            }
            CommandKind::Arc => {
                let arc = EllipticalArc {
                    from: self.pen,
                    radii: dvec2(ops[0], ops[1]),
                    x_axis_rotation: ops[2],
                    large_arc: ops[3] != 0.0,
                    sweep: ops[4] != 0.0,
                    to: pt(5),
                };
                for command in arc.to_path_commands() {
                    self.path.push(command);
                }
                self.pen = arc.to;
                self.reset_smooth();
            }
            CommandKind::Close => self.close_path(),
        }
    }

    fn line_to(&mut self, to: DVec2) {
        self.path.push(PathCommand::LineTo(to));
        self.pen = to;
        self.reset_smooth();
    }

    fn cubic_to(&mut self, ctrl1: DVec2, ctrl2: DVec2, to: DVec2) {
        self.path.push(PathCommand::CubicCurveTo { ctrl1, ctrl2, to });
        self.pen = to;
        self.last_cubic_ctrl = Some(ctrl2);
        self.last_quad_ctrl = None;
    }

    fn quad_to(&mut self, ctrl: DVec2, to: DVec2) {
        self.path.push(PathCommand::QuadraticCurveTo { ctrl, to });
        self.pen = to;
        self.last_quad_ctrl = Some(ctrl);
        self.last_cubic_ctrl = None;
    }

    fn close_path(&mut self) {
        self.path.push(PathCommand::ClosePath);
        self.pen = self.subpath_start;
        self.reset_smooth();
    }

    fn reset_smooth(&mut self) {
        self.last_cubic_ctrl = None;
        self.last_quad_ctrl = None;
    }
}

/// Reflect `ctrl` through `pen`, or use `pen` itself when there is nothing to reflect.
fn reflect(pen: DVec2, ctrl: Option<DVec2>) -> DVec2 {
    match ctrl {
        Some(c) => 2.0 * pen - c,
        None => pen,
    }
}
