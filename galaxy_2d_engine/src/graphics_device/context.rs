/// Graphics context - one GPU context and the state shared by its users
///
/// Everything that the render layer must know about "the GPU context"
/// lives here instead of in globals: the device issuing commands, which
/// render target was made current last, and the pipeline shared by all
/// targets of the context. Independent contexts never see each other's
/// state, which lets tests run several of them side by side.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use crate::error::Result;
use crate::graphics_device::{DeviceCapabilities, GraphicsDevice};
use crate::render::pipeline::Pipeline;
use crate::utils::unique_id::CONTEXT_IDS;

pub struct GraphicsContext {
    /// Unique id of this context
    id: u64,
    /// Command sink
    device: Box<dyn GraphicsDevice>,
    /// Capabilities, queried once
    capabilities: DeviceCapabilities,
    /// Id of the render target made current last (0 = none)
    active_target: u64,
    /// Pipeline shared by the targets of this context, alive while a target holds it
    pub(crate) pipeline: Weak<Mutex<Pipeline>>,
    /// Whether the "blend equation unsupported" warning was already emitted
    pub(crate) warned_blend_equation: bool,
}

impl GraphicsContext {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn device(&self) -> &dyn GraphicsDevice {
        self.device.as_ref()
    }

    pub fn device_mut(&mut self) -> &mut dyn GraphicsDevice {
        self.device.as_mut()
    }

    pub fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    /// Id of the render target currently active in this context (0 = none)
    pub fn active_target(&self) -> u64 {
        self.active_target
    }

    pub(crate) fn set_active_target(&mut self, id: u64) {
        self.active_target = id;
    }
}

/// Shared handle to a `GraphicsContext`
///
/// Every GPU resource keeps one to release its objects on drop.
#[derive(Clone)]
pub struct SharedContext(Arc<Mutex<GraphicsContext>>);

impl SharedContext {
    /// Wrap a device into a new context
    pub fn new<D: GraphicsDevice + 'static>(device: D) -> Self {
        Self::from_boxed(Box::new(device))
    }

    pub fn from_boxed(device: Box<dyn GraphicsDevice>) -> Self {
        let capabilities = device.capabilities();
        let context = GraphicsContext {
            id: CONTEXT_IDS.next_id(),
            device,
            capabilities,
            active_target: 0,
            pipeline: Weak::new(),
            warned_blend_equation: false,
        };
        crate::engine_debug!(
            "galaxy2d::GraphicsContext",
            "Context {} created (max texture size {}, max samples {})",
            context.id, capabilities.max_texture_size, capabilities.max_samples
        );
        SharedContext(Arc::new(Mutex::new(context)))
    }

    /// Lock the context for a sequence of commands
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if a previous holder panicked.
    pub fn lock(&self) -> Result<MutexGuard<'_, GraphicsContext>> {
        self.0.lock().map_err(|_| {
            crate::engine_err!("galaxy2d::GraphicsContext", BackendError, "Graphics context lock poisoned")
        })
    }

    /// Whether both handles refer to the same context
    pub fn ptr_eq(&self, other: &SharedContext) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for SharedContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedContext").finish_non_exhaustive()
    }
}
