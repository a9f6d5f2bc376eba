/// RenderTarget - common part of everything that can be drawn into
///
/// A render target owns a view, the default view matching its pixel
/// size, and a cache of the GPU states it applied last. The cache lets
/// consecutive draws skip redundant viewport, projection and blend
/// state changes; it is only trusted while this target is the one made
/// active last in its graphics context; activating another target in
/// between cools it.
///
/// Drawing failures (poisoned context, framebuffer that cannot be bound)
/// are logged and the draw is skipped: a lost frame is recovered by the
/// next one.
///
/// The concrete surface is one of two variants: the window back buffer
/// or an offscreen framebuffer (see `RenderWindow` and `RenderTexture`).

use std::sync::{Arc, Mutex};
use glam::{IVec2, UVec2, Vec2};
use crate::{engine_error, engine_warn};
use crate::graphics::{BlendMode, Color, FloatRect, IntRect, PrimitiveType, Vertex};
use crate::graphics_device::{
    Capability, DeviceFeatures, FramebufferTarget, GraphicsContext, SharedContext,
};
use crate::render::frame_buffer::FrameBuffer;
use crate::render::pipeline::Pipeline;
use crate::render::{Drawable, RenderStates};
use crate::resource::VertexBuffer;
use crate::utils::unique_id::RENDER_TARGET_IDS;
use crate::view::View;

const SOURCE: &str = "galaxy2d::RenderTarget";

/// Lifecycle of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// Created, size not known yet
    Uninitialized,
    /// Default view set and id assigned, GPU defaults not applied yet
    Initialized,
    /// GPU defaults applied
    StatesReset,
    /// Inside a draw call
    Drawing,
}

/// GPU states applied last by this target
#[derive(Debug, Clone, Copy, PartialEq)]
struct StatesCache {
    /// Default GPU states were applied at least once
    gl_states_set: bool,
    /// The view changed since it was applied
    view_changed: bool,
    /// The fields below are trustworthy
    enabled: bool,
    last_blend_mode: BlendMode,
}

impl Default for StatesCache {
    fn default() -> Self {
        Self {
            gl_states_set: false,
            view_changed: false,
            enabled: false,
            last_blend_mode: BlendMode::ALPHA,
        }
    }
}

/// Where the pixels of a target go
pub(crate) enum Surface {
    /// Default framebuffer of the window
    Window,
    /// Framebuffer object rendering into a texture
    Offscreen(FrameBuffer),
}

pub struct RenderTarget {
    /// Unique id, 0 until initialized
    id: u64,
    context: SharedContext,
    pipeline: Arc<Mutex<Pipeline>>,
    /// Size in pixels
    size: UVec2,
    default_view: View,
    view: View,
    cache: StatesCache,
    state: TargetState,
    surface: Surface,
}

impl RenderTarget {
    pub(crate) fn new(
        context: &SharedContext,
        pipeline: Arc<Mutex<Pipeline>>,
        size: UVec2,
        surface: Surface,
    ) -> Self {
        Self {
            id: 0,
            context: context.clone(),
            pipeline,
            size,
            default_view: View::default(),
            view: View::default(),
            cache: StatesCache::default(),
            state: TargetState::Uninitialized,
            surface,
        }
    }

    /// Set up the views and take an id, once the size is known
    pub(crate) fn initialize(&mut self) {
        self.default_view.reset(FloatRect::new(0.0, 0.0, self.size.x as f32, self.size.y as f32));
        self.view = self.default_view.clone();

        // GPU states are set on the first draw only, not to disturb the caller's states
        self.cache.gl_states_set = false;

        self.id = RENDER_TARGET_IDS.next_id();
        self.state = TargetState::Initialized;
    }

    // ===== CLEAR =====

    /// Fill the whole surface with `color`
    pub fn clear(&mut self, color: Color) {
        let context = self.context.clone();
        let Ok(mut ctx) = context.lock() else { return };
        if !self.ensure_active(&mut ctx) {
            return;
        }
        ctx.device_mut().clear(color.to_normalized());
    }

    // ===== VIEWS =====

    /// Replace the current view; applied on the next draw
    pub fn set_view(&mut self, view: &View) {
        self.view = view.clone();
        self.cache.view_changed = true;
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// View covering the whole target, one world unit per pixel
    pub fn default_view(&self) -> &View {
        &self.default_view
    }

    /// Pixel rectangle covered by `view` on this target
    ///
    /// Each component is rounded to nearest (0.5 added, then truncated).
    pub fn viewport(&self, view: &View) -> IntRect {
        let width = self.size.x as f32;
        let height = self.size.y as f32;
        let viewport = view.viewport();

        IntRect::new(
            (0.5 + width * viewport.left) as i32,
            (0.5 + height * viewport.top) as i32,
            (0.5 + width * viewport.width) as i32,
            (0.5 + height * viewport.height) as i32,
        )
    }

    /// World coordinates under pixel `point`, through the current view
    pub fn map_pixel_to_coords(&self, point: IVec2) -> Vec2 {
        self.map_pixel_to_coords_with(point, &self.view)
    }

    pub fn map_pixel_to_coords_with(&self, point: IVec2, view: &View) -> Vec2 {
        // Viewport coordinates to normalized device coordinates
        let viewport = self.viewport(view);
        let normalized = Vec2::new(
            -1.0 + 2.0 * (point.x - viewport.left) as f32 / viewport.width as f32,
            1.0 - 2.0 * (point.y - viewport.top) as f32 / viewport.height as f32,
        );

        view.inverse_transform().transform_point(normalized)
    }

    /// Pixel showing world point `point`, through the current view
    pub fn map_coords_to_pixel(&self, point: Vec2) -> IVec2 {
        self.map_coords_to_pixel_with(point, &self.view)
    }

    pub fn map_coords_to_pixel_with(&self, point: Vec2, view: &View) -> IVec2 {
        let normalized = view.transform().transform_point(point);

        let viewport = self.viewport(view);
        IVec2::new(
            ((normalized.x + 1.0) / 2.0 * viewport.width as f32 + viewport.left as f32) as i32,
            ((-normalized.y + 1.0) / 2.0 * viewport.height as f32 + viewport.top as f32) as i32,
        )
    }

    // ===== DRAWING =====

    pub fn draw(&mut self, drawable: &dyn Drawable, states: &RenderStates) {
        drawable.draw(self, states);
    }

    /// Draw a vertex stream; an empty slice draws nothing
    pub fn draw_vertices(&mut self, vertices: &[Vertex], primitive_type: PrimitiveType, states: &RenderStates) {
        if vertices.is_empty() {
            return;
        }

        let context = self.context.clone();
        let Ok(mut ctx) = context.lock() else { return };
        if !self.ensure_active(&mut ctx) {
            return;
        }
        let pipeline = Arc::clone(&self.pipeline);
        let Ok(mut pipeline) = pipeline.lock() else {
            engine_error!(SOURCE, "Pipeline lock poisoned, draw skipped");
            return;
        };

        self.setup_draw(&mut ctx, &mut pipeline, states);
        pipeline.draw_vertices(ctx.device_mut(), vertices, primitive_type, states.texture, states.shader);
        self.cleanup_draw();
    }

    /// Draw the whole content of `vertex_buffer`
    pub fn draw_vertex_buffer(&mut self, vertex_buffer: &VertexBuffer, states: &RenderStates) {
        self.draw_vertex_buffer_range(vertex_buffer, 0, vertex_buffer.vertex_count(), states);
    }

    /// Draw `count` vertices of `vertex_buffer` starting at `first`
    ///
    /// The range is clamped to the buffer; nothing is drawn when `first`
    /// is past its end.
    pub fn draw_vertex_buffer_range(
        &mut self,
        vertex_buffer: &VertexBuffer,
        first: usize,
        count: usize,
        states: &RenderStates,
    ) {
        let total = vertex_buffer.vertex_count();
        if first > total {
            return;
        }
        let count = count.min(total - first);
        if count == 0 {
            return;
        }

        let context = self.context.clone();
        let Ok(mut ctx) = context.lock() else { return };
        if !self.ensure_active(&mut ctx) {
            return;
        }
        let pipeline = Arc::clone(&self.pipeline);
        let Ok(mut pipeline) = pipeline.lock() else {
            engine_error!(SOURCE, "Pipeline lock poisoned, draw skipped");
            return;
        };

        self.setup_draw(&mut ctx, &mut pipeline, states);
        pipeline.draw_vertex_buffer(ctx.device_mut(), vertex_buffer, first, count, states.texture, states.shader);
        self.cleanup_draw();
    }

    // ===== ACTIVATION =====

    /// Make this target the destination of GPU commands in its context
    ///
    /// Returns `false` if the surface could not be bound.
    pub fn set_active(&mut self, active: bool) -> bool {
        let context = self.context.clone();
        let Ok(mut ctx) = context.lock() else { return false };
        self.activate(&mut ctx, active)
    }

    /// Whether this target is the active one of its context
    pub fn is_active(&self) -> bool {
        self.context.lock().is_ok_and(|ctx| ctx.active_target() == self.id)
    }

    // ===== GPU STATES =====

    /// Apply the default GPU states (see `reset_gl_states`)
    pub fn push_gl_states(&mut self) {
        self.reset_gl_states();
    }

    /// States are not saved by `push_gl_states`, nothing to restore
    pub fn pop_gl_states(&mut self) {}

    /// Apply the default GPU states: no face culling, no depth test,
    /// alpha blending, no vertex buffer bound, current view re-applied
    pub fn reset_gl_states(&mut self) {
        let context = self.context.clone();
        let Ok(mut ctx) = context.lock() else { return };
        self.reset_gl_states_locked(&mut ctx);
    }

    // ===== ACCESSORS =====

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn state(&self) -> TargetState {
        self.state
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    // ===== CRATE INTERNALS =====

    /// Change the pixel size and fit the default view to it
    pub(crate) fn set_size(&mut self, size: UVec2) {
        self.size = size;
        self.default_view.reset(FloatRect::new(0.0, 0.0, size.x as f32, size.y as f32));
        self.cache.view_changed = true;
    }

    /// Run `f` with this target active; `None` if it could not be activated
    pub(crate) fn with_active_context<R>(
        &mut self,
        f: impl FnOnce(&mut GraphicsContext, &mut Surface) -> R,
    ) -> Option<R> {
        let context = self.context.clone();
        let mut ctx = context.lock().ok()?;
        if !self.ensure_active(&mut ctx) {
            return None;
        }
        Some(f(&mut *ctx, &mut self.surface))
    }

    #[cfg(test)]
    pub(crate) fn pipeline(&self) -> &Arc<Mutex<Pipeline>> {
        &self.pipeline
    }

    fn ensure_active(&mut self, ctx: &mut GraphicsContext) -> bool {
        ctx.active_target() == self.id || self.activate(ctx, true)
    }

    fn activate(&mut self, ctx: &mut GraphicsContext, active: bool) -> bool {
        let bound = match &mut self.surface {
            Surface::Window => {
                // No framebuffer object may stay bound while drawing to the window
                if active {
                    ctx.device_mut().bind_framebuffer(FramebufferTarget::Both, None);
                }
                true
            }
            Surface::Offscreen(frame_buffer) => frame_buffer.activate(ctx.device_mut(), active).is_ok(),
        };
        if !bound {
            return false;
        }

        if active {
            if ctx.active_target() != self.id {
                self.cache.enabled = false;
            }
            ctx.set_active_target(self.id);
        } else if ctx.active_target() == self.id {
            ctx.set_active_target(0);
        }
        true
    }

    fn reset_gl_states_locked(&mut self, ctx: &mut GraphicsContext) {
        if !self.ensure_active(ctx) {
            return;
        }

        let device = ctx.device_mut();
        device.set_enabled(Capability::CullFace, false);
        device.set_enabled(Capability::DepthTest, false);
        device.set_enabled(Capability::Blend, true);
        self.cache.gl_states_set = true;

        self.apply_blend_mode(ctx, BlendMode::ALPHA);

        let device = ctx.device_mut();
        device.bind_vertex_array(None);
        device.bind_vertex_buffer(None);

        self.cache.view_changed = true;
        self.cache.enabled = true;
        self.state = TargetState::StatesReset;
    }

    fn setup_draw(&mut self, ctx: &mut GraphicsContext, pipeline: &mut Pipeline, states: &RenderStates) {
        if !self.cache.gl_states_set {
            self.reset_gl_states_locked(ctx);
        }

        pipeline.apply_current_transform(states.transform);

        if !self.cache.enabled || self.cache.view_changed {
            self.apply_current_view(ctx, pipeline);
        }

        if !self.cache.enabled || states.blend_mode != self.cache.last_blend_mode {
            self.apply_blend_mode(ctx, states.blend_mode);
        }

        self.state = TargetState::Drawing;
    }

    fn cleanup_draw(&mut self) {
        self.cache.enabled = true;
        self.state = TargetState::StatesReset;
    }

    fn apply_current_view(&mut self, ctx: &mut GraphicsContext, pipeline: &mut Pipeline) {
        // Viewport origin is the bottom-left corner on the GPU side
        let viewport = self.viewport(&self.view);
        let top = self.size.y as i32 - (viewport.top + viewport.height);
        ctx.device_mut().viewport(IntRect::new(viewport.left, top, viewport.width, viewport.height));

        pipeline.apply_current_view(&self.view);

        self.cache.view_changed = false;
    }

    fn apply_blend_mode(&mut self, ctx: &mut GraphicsContext, mode: BlendMode) {
        let capabilities = *ctx.capabilities();
        let device = ctx.device_mut();

        if capabilities.supports(DeviceFeatures::BLEND_FUNC_SEPARATE) {
            device.blend_func_separate(
                mode.color_src_factor,
                mode.color_dst_factor,
                mode.alpha_src_factor,
                mode.alpha_dst_factor,
            );
        } else {
            device.blend_func(mode.color_src_factor, mode.color_dst_factor);
        }

        if capabilities.supports(DeviceFeatures::BLEND_MINMAX | DeviceFeatures::BLEND_SUBTRACT) {
            if capabilities.supports(DeviceFeatures::BLEND_EQUATION_SEPARATE) {
                device.blend_equation_separate(mode.color_equation, mode.alpha_equation);
            } else {
                device.blend_equation(mode.color_equation);
            }
        } else if !mode.uses_add_only() && !ctx.warned_blend_equation {
            engine_warn!(
                SOURCE,
                "Blend min/max and subtract are unavailable, selecting a blend equation is not possible"
            );
            ctx.warned_blend_equation = true;
        }

        self.cache.last_blend_mode = mode;
    }
}

impl Drop for RenderTarget {
    fn drop(&mut self) {
        let context = self.context.clone();
        let Ok(mut ctx) = context.lock() else { return };
        if let Surface::Offscreen(frame_buffer) = &mut self.surface {
            frame_buffer.destroy(ctx.device_mut());
        }
        if ctx.active_target() == self.id {
            ctx.set_active_target(0);
        }
    }
}

impl std::fmt::Debug for RenderTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTarget")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
