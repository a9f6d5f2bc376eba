/// Graphics device layer - GPU command seam, handles, capabilities and contexts

pub mod handles;
pub mod capabilities;
pub mod graphics_device;
pub mod context;

#[cfg(test)]
pub mod mock_graphics_device;

pub use handles::{
    TextureHandle, BufferHandle, VertexArrayHandle, ProgramHandle,
    FramebufferHandle, RenderbufferHandle, UniformLocation,
};
pub use capabilities::{DeviceCapabilities, DeviceFeatures};
pub use graphics_device::{
    GraphicsDevice, Capability, TextureFormat, TextureFilter, TextureWrap, BufferUsage,
    FramebufferTarget, Attachment, RenderbufferFormat, UniformValue,
};
pub use context::{GraphicsContext, SharedContext};
