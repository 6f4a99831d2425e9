//! Request/queue/drain scheduling of glyph bakes.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::curve::Winding;
use crate::geometry::PixelSize;
use crate::gpu::{FIELD_CLEAR, RenderBackend, TargetId, with_clear_color};
use crate::outline::{GlyphLayout, GlyphOutline, OutlineError, YDirection};
use crate::packer::PackedBin;
use crate::sdf::{FieldGenerator, PreviewQuad};

use super::{
    AtlasError, CacheSettings, GlyphKey, MAX_KEYED_SIZE, TextureAtlas, UvRect, size_key,
};

/// One glyph to look up or bake.
#[derive(Debug, Clone, Copy)]
pub struct GlyphRequest<'a> {
    pub font_id: u32,
    pub font_index: u32,
    pub glyph_id: u16,
    /// Font size in pixels.
    pub font_size: f32,
    /// Distance-field spread in pixels, added on every side.
    pub padding: f32,
    pub y_direction: YDirection,
    pub outline: &'a GlyphOutline,
}

impl GlyphRequest<'_> {
    /// The cache key at `pixel_density`. Paddings that round up to the same
    /// pixel count lay out identically and share a key.
    pub fn key(&self, pixel_density: f32) -> GlyphKey {
        GlyphKey {
            font_id: self.font_id,
            font_index: self.font_index,
            glyph_id: self.glyph_id,
            size: size_key(self.font_size),
            padding: (self.padding * pixel_density).ceil() as u32,
            y_direction: self.y_direction,
        }
    }

    fn validate(&self) -> Result<(), AtlasError> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(AtlasError::InvalidRequest("font size must be positive"));
        }
        if self.font_size > MAX_KEYED_SIZE {
            return Err(AtlasError::InvalidRequest("font size is too large"));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(AtlasError::InvalidRequest("padding must not be negative"));
        }
        if self.outline.units_per_em == 0 {
            return Err(AtlasError::InvalidRequest("outline has zero units per em"));
        }
        Ok(())
    }
}

/// Where a cached glyph is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphState {
    /// Space reserved, bake pending.
    Queued,
    /// Baked into the atlas (or empty, with nothing to bake).
    Completed,
    /// The bake failed; the glyph draws as an empty quad from now on.
    Failed,
}

/// What one [`GlyphAtlasCache::drain_queue`] call got through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    pub completed: usize,
    pub failed: usize,
    /// Entries still queued afterwards.
    pub remaining: usize,
    pub elapsed: Duration,
}

/// Queued bake: the outline and the footprint it was measured to.
#[derive(Debug)]
struct BakeJob {
    outline: GlyphOutline,
    layout: GlyphLayout,
    placement: PackedBin,
}

#[derive(Debug)]
struct Entry {
    state: GlyphState,
    uv: UvRect,
    job: Option<BakeJob>,
}

impl Entry {
    fn uv(&self) -> UvRect {
        match self.state {
            GlyphState::Failed => UvRect::EMPTY,
            GlyphState::Queued | GlyphState::Completed => self.uv,
        }
    }
}

/// On-demand distance-field glyph cache backed by one [`TextureAtlas`].
///
/// Entries are never evicted. Requests are answered immediately; the GPU
/// work happens in [`drain_queue`](Self::drain_queue).
#[derive(Debug)]
pub struct GlyphAtlasCache {
    settings: CacheSettings,
    atlas: TextureAtlas,
    generator: FieldGenerator,
    entries: Vec<Entry>,
    index: HashMap<GlyphKey, usize>,
    /// Entry indices awaiting a bake, oldest first.
    queue: VecDeque<usize>,
}

impl GlyphAtlasCache {
    pub fn new(backend: &mut dyn RenderBackend, settings: CacheSettings) -> Self {
        let atlas = TextureAtlas::new(backend, settings.atlas_size);
        let generator = FieldGenerator::new(
            backend,
            settings.mode,
            PixelSize::square(settings.initial_size),
            settings.pixel_density,
            settings.filter,
        );
        log::info!(
            "glyph cache: mode={:?} density={} budget={:?}",
            settings.mode,
            settings.pixel_density,
            settings.frame_budget,
        );
        Self {
            settings,
            atlas,
            generator,
            entries: Vec::new(),
            index: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// The key `request` is cached under with this cache's pixel density.
    pub fn key_for(&self, request: &GlyphRequest<'_>) -> GlyphKey {
        request.key(self.settings.pixel_density)
    }

    /// Texture coordinates for `request`, reserving space and queueing a
    /// bake on first sight.
    ///
    /// Queued glyphs already have their final coordinates; they read as
    /// blank until a drain bakes them. Outlines with nothing to draw
    /// complete at once with [`UvRect::EMPTY`]. A failed pack caches
    /// nothing, so the same request errors again.
    pub fn request_glyph(&mut self, request: &GlyphRequest<'_>) -> Result<UvRect, AtlasError> {
        request.validate()?;
        let key = self.key_for(request);
        if let Some(entry) = self.entry(&key) {
            return Ok(entry.uv());
        }

        let layout = GlyphLayout::measure(
            request.outline,
            request.font_size,
            request.padding,
            self.settings.pixel_density,
            request.y_direction,
        )?;
        let Some(layout) = layout else {
            self.insert(
                key,
                Entry {
                    state: GlyphState::Completed,
                    uv: UvRect::EMPTY,
                    job: None,
                },
            );
            return Ok(UvRect::EMPTY);
        };

        let placement = self.atlas.find_space(layout.size, false)?;
        let uv = self.atlas.uv_rect(&placement);
        log::debug!(
            "queued glyph {} of font {}:{}, {} at ({}, {})",
            request.glyph_id,
            request.font_id,
            request.font_index,
            layout.size,
            placement.x,
            placement.y,
        );
        let slot = self.insert(
            key,
            Entry {
                state: GlyphState::Queued,
                uv,
                job: Some(BakeJob {
                    outline: request.outline.clone(),
                    layout,
                    placement,
                }),
            },
        );
        self.queue.push_back(slot);
        Ok(uv)
    }

    fn insert(&mut self, key: GlyphKey, entry: Entry) -> usize {
        let slot = self.entries.len();
        self.entries.push(entry);
        self.index.insert(key, slot);
        slot
    }

    fn entry(&self, key: &GlyphKey) -> Option<&Entry> {
        self.index.get(key).map(|&slot| &self.entries[slot])
    }

    /// Like [`request_glyph`](Self::request_glyph), but any error degrades
    /// to an invisible quad after a warning.
    pub fn request_glyph_or_empty(&mut self, request: &GlyphRequest<'_>) -> UvRect {
        self.request_glyph(request).unwrap_or_else(|e| {
            log::warn!("glyph {} of font {}: {e}", request.glyph_id, request.font_id);
            UvRect::EMPTY
        })
    }

    pub fn state(&self, key: &GlyphKey) -> Option<GlyphState> {
        self.entry(key).map(|e| e.state)
    }

    pub fn uv_rect(&self, key: &GlyphKey) -> Option<UvRect> {
        self.entry(key).map(Entry::uv)
    }

    /// Glyphs waiting to be baked.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Cached glyphs in any state.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bake queued glyphs in request order until `budget` is spent.
    ///
    /// Time is checked after each glyph, so at least one glyph is baked
    /// whenever the queue is non-empty, and a slow glyph can overrun the
    /// budget by its own cost. A glyph whose outline turns out to be
    /// malformed is marked [`GlyphState::Failed`] and the drain moves on.
    pub fn drain_queue(
        &mut self,
        backend: &mut dyn RenderBackend,
        budget: Duration,
    ) -> DrainReport {
        let start = Instant::now();
        let mut report = DrainReport::default();

        while let Some(slot) = self.queue.pop_front() {
            let entry = &mut self.entries[slot];
            let Some(job) = entry.job.take() else {
                continue;
            };

            entry.state = match bake(
                &mut self.generator,
                &self.atlas,
                backend,
                self.settings.winding,
                self.settings.pixel_density,
                &job,
            ) {
                Ok(()) => {
                    report.completed += 1;
                    GlyphState::Completed
                }
                Err(e) => {
                    log::warn!("glyph bake failed, leaving it blank: {e}");
                    report.failed += 1;
                    GlyphState::Failed
                }
            };

            if start.elapsed() >= budget {
                break;
            }
        }

        report.remaining = self.queue.len();
        report.elapsed = start.elapsed();
        if report.completed + report.failed > 0 {
            log::debug!(
                "drained {} glyphs ({} failed) in {:?}, {} left",
                report.completed + report.failed,
                report.failed,
                report.elapsed,
                report.remaining,
            );
        }
        report
    }

    /// [`drain_queue`](Self::drain_queue) with the configured frame budget.
    pub fn drain_frame(&mut self, backend: &mut dyn RenderBackend) -> DrainReport {
        self.drain_queue(backend, self.settings.frame_budget)
    }

    /// The atlas texture glyph quads sample from.
    pub fn texture(&self) -> TargetId {
        self.atlas.texture()
    }

    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    pub fn generator(&self) -> &FieldGenerator {
        &self.generator
    }

    pub fn raw_preview(&self) -> PreviewQuad {
        self.atlas.raw_preview()
    }

    pub fn release(self, backend: &mut dyn RenderBackend) {
        self.generator.release(backend);
        self.atlas.release(backend);
    }
}

/// Render one glyph field at its own size and copy it into its atlas slot.
fn bake(
    generator: &mut FieldGenerator,
    atlas: &TextureAtlas,
    backend: &mut dyn RenderBackend,
    winding: Winding,
    pixel_density: f32,
    job: &BakeJob,
) -> Result<(), OutlineError> {
    let curves = job.layout.curves(&job.outline, winding)?;
    generator.resize(backend, job.layout.size, pixel_density);
    for curve in curves {
        generator.add(curve);
    }
    generator.render(backend);

    let (field, target) = (generator.texture(), atlas.texture());
    let viewport = job.placement.viewport();
    with_clear_color(backend, FIELD_CLEAR, |backend| {
        backend.blit(field, target, Some(viewport));
    });
    Ok(())
}
