use std::cell::Cell;
use std::sync::Arc;

use strata_core::profiling::profile_scope;
use strata_test_utils::GpuDevice;

use crate::batching::{BatchItem, RenderItem};

/// Counters accumulated between `begin()` and the next `begin()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub texture_binds: u32,
    pub items_drawn: u32,
    /// Batches drawn early because their accumulator filled.
    pub flushes: u32,
}

/// Issues the GPU call sequence for sorted batches.
pub(crate) struct BatchDrawer {
    gpu: Arc<dyn GpuDevice>,
    stats: Cell<FrameStats>,
}

impl BatchDrawer {
    pub fn new(gpu: Arc<dyn GpuDevice>) -> Self {
        Self {
            gpu,
            stats: Cell::new(FrameStats::default()),
        }
    }

    pub fn gpu(&self) -> &dyn GpuDevice {
        self.gpu.as_ref()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats.get()
    }

    pub fn reset_stats(&self) {
        self.stats.set(FrameStats::default());
    }

    pub fn record_flush(&self) {
        let mut stats = self.stats.get();
        stats.flushes += 1;
        self.stats.set(stats);
    }

    /// Draw `items` in the given order.
    ///
    /// Consecutive items sharing a texture are uploaded into slots `0..n`
    /// under a single bind and drawn with one call. An empty batch only opens
    /// and closes a labeled debug group.
    pub fn draw<T: BatchItem>(&self, items: &[RenderItem<T>]) {
        let kind = T::KIND;
        let gpu = self.gpu();

        if items.is_empty() {
            gpu.push_debug_group(&format!("Render {} Process - Nothing To Render", kind.label()));
            gpu.pop_debug_group();
            return;
        }

        profile_scope!("draw_batch");

        let mut stats = self.stats.get();
        gpu.push_debug_group(&format!("Render {} Process", kind.label()));
        gpu.use_shader(kind.shader());

        for run in items.chunk_by(|a, b| a.item.texture_id() == b.item.texture_id()) {
            if let Some(texture_id) = run[0].item.texture_id() {
                gpu.bind_texture(texture_id);
                stats.texture_binds += 1;
            }

            for (slot, render_item) in run.iter().enumerate() {
                let vertex = render_item.item.to_vertex();
                gpu.upload_vertex_data(kind.shader(), slot as u32, bytemuck::bytes_of(&vertex));
            }

            gpu.draw_indexed(run.len() as u32);
            stats.draw_calls += 1;
            stats.items_drawn += run.len() as u32;
        }

        gpu.pop_debug_group();
        self.stats.set(stats);

        tracing::trace!(kind = %kind, items = items.len(), "Drew batch");
    }
}
