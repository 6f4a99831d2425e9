//! Headless backend that records the command stream instead of drawing.
//!
//! Used by the test suites and the `trace` command to inspect exactly which
//! passes the generators issue, in which order, against which targets.

use crate::curve::CurvePrimitive;
use crate::geometry::PixelSize;

use super::{Camera, CombinePass, RenderBackend, Rgba, TargetDesc, TargetId, Viewport};

/// One call made against a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    CreateTarget {
        target: TargetId,
        desc: TargetDesc,
    },
    ReleaseTarget(TargetId),
    SetClearColor(Rgba),
    Clear {
        target: TargetId,
        color: Rgba,
    },
    DrawCurve {
        target: TargetId,
        curve: CurvePrimitive,
        camera: Camera,
    },
    Combine {
        pass: CombinePass,
        target: TargetId,
    },
    Blit {
        source: TargetId,
        target: TargetId,
        viewport: Option<Viewport>,
        color: Rgba,
    },
}

/// Render backend that only keeps a log.
///
/// Operations on unknown or released targets panic: they are bugs in the
/// caller, and tests should see them.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    targets: Vec<Option<TargetDesc>>,
    clear_color: Rgba,
    commands: Vec<RecordedCommand>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Drain the log, keeping targets alive.
    pub fn take_commands(&mut self) -> Vec<RecordedCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of targets created and not yet released.
    pub fn live_targets(&self) -> usize {
        self.targets.iter().flatten().count()
    }

    pub fn desc(&self, target: TargetId) -> Option<&TargetDesc> {
        self.targets.get(target.index()).and_then(Option::as_ref)
    }

    /// Curves drawn into `target`, in order.
    pub fn curves_drawn_into(&self, target: TargetId) -> Vec<&CurvePrimitive> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RecordedCommand::DrawCurve { target: t, curve, .. } if *t == target => Some(curve),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&RecordedCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    fn check(&self, target: TargetId, op: &str) {
        assert!(
            self.desc(target).is_some(),
            "{op} on unknown or released target {target:?}",
        );
    }
}

impl RenderBackend for RecordingBackend {
    fn create_target(&mut self, desc: &TargetDesc) -> TargetId {
        let target = TargetId(self.targets.len() as u32);
        self.targets.push(Some(*desc));
        self.commands.push(RecordedCommand::CreateTarget {
            target,
            desc: *desc,
        });
        target
    }

    fn release_target(&mut self, target: TargetId) {
        self.check(target, "release");
        self.targets[target.index()] = None;
        self.commands.push(RecordedCommand::ReleaseTarget(target));
    }

    fn target_size(&self, target: TargetId) -> Option<PixelSize> {
        self.desc(target).map(|d| d.size)
    }

    fn clear_color(&self) -> Rgba {
        self.clear_color
    }

    fn set_clear_color(&mut self, color: Rgba) {
        self.clear_color = color;
        self.commands.push(RecordedCommand::SetClearColor(color));
    }

    fn clear(&mut self, target: TargetId) {
        self.check(target, "clear");
        self.commands.push(RecordedCommand::Clear {
            target,
            color: self.clear_color,
        });
    }

    fn draw_curve(&mut self, target: TargetId, curve: &CurvePrimitive, camera: &Camera) {
        self.check(target, "draw_curve");
        self.commands.push(RecordedCommand::DrawCurve {
            target,
            curve: *curve,
            camera: *camera,
        });
    }

    fn combine(&mut self, pass: &CombinePass, target: TargetId) {
        for input in pass.inputs() {
            self.check(input, "combine input");
            assert_ne!(input, target, "combine pass reads its own output {target:?}");
        }
        self.check(target, "combine");
        self.commands.push(RecordedCommand::Combine {
            pass: *pass,
            target,
        });
    }

    fn blit(&mut self, source: TargetId, target: TargetId, viewport: Option<Viewport>) {
        self.check(source, "blit source");
        self.check(target, "blit");
        self.commands.push(RecordedCommand::Blit {
            source,
            target,
            viewport,
            color: self.clear_color,
        });
    }
}
