/// VertexBuffer - vertices stored in GPU memory
///
/// Holds a vertex array object describing the standard vertex layout and
/// the buffer it reads from. Content is uploaded explicitly with
/// `update`, drawing reads it directly without any staging copy.

use crate::{engine_bail, engine_err};
use crate::error::Result;
use crate::graphics::{PrimitiveType, Vertex};
use crate::graphics_device::{
    BufferHandle, BufferUsage, DeviceFeatures, GraphicsDevice, SharedContext, VertexArrayHandle,
};

const SOURCE: &str = "galaxy2d::VertexBuffer";

pub struct VertexBuffer {
    context: SharedContext,
    vertex_array: Option<VertexArrayHandle>,
    buffer: Option<BufferHandle>,
    /// Allocated vertex count
    size: usize,
    primitive_type: PrimitiveType,
    usage: BufferUsage,
}

impl VertexBuffer {
    /// Empty buffer; call `create` to allocate it
    pub fn new(context: &SharedContext, primitive_type: PrimitiveType, usage: BufferUsage) -> Self {
        Self {
            context: context.clone(),
            vertex_array: None,
            buffer: None,
            size: 0,
            primitive_type,
            usage,
        }
    }

    /// Allocate room for `vertex_count` vertices (content undefined)
    ///
    /// # Errors
    ///
    /// `ResourceExhausted` when the vertex array or the buffer cannot be created.
    pub fn create(&mut self, vertex_count: usize) -> Result<()> {
        let mut ctx = self.context.lock()?;
        let device = ctx.device_mut();

        if self.buffer.is_none() {
            let buffer = device
                .create_buffer()
                .ok_or_else(|| engine_err!(SOURCE, ResourceExhausted, "Could not create vertex buffer"))?;
            let Some(vertex_array) = device.create_vertex_array() else {
                device.delete_buffer(buffer);
                engine_bail!(SOURCE, ResourceExhausted, "Could not create vertex array");
            };

            let previous_array = device.bound_vertex_array();
            let previous_buffer = device.bound_vertex_buffer();
            device.bind_vertex_array(Some(vertex_array));
            device.bind_vertex_buffer(Some(buffer));
            for attribute in &Vertex::LAYOUT {
                device.vertex_attribute(attribute, Vertex::STRIDE);
            }
            device.bind_vertex_array(previous_array);
            device.bind_vertex_buffer(previous_buffer);

            self.buffer = Some(buffer);
            self.vertex_array = Some(vertex_array);
        }

        if let Some(buffer) = self.buffer {
            allocate(device, buffer, vertex_count * Vertex::STRIDE, self.usage);
        }
        self.size = vertex_count;
        Ok(())
    }

    /// Upload `vertices` starting at vertex `offset`
    ///
    /// Writing the whole buffer from offset 0 with at least as many
    /// vertices as allocated reallocates it to the new length.
    ///
    /// # Errors
    ///
    /// `InvalidResource` if the buffer was never created, `InvalidArgument`
    /// if a write at a nonzero offset would overflow the allocation.
    pub fn update(&mut self, vertices: &[Vertex], offset: usize) -> Result<()> {
        let Some(buffer) = self.buffer else {
            engine_bail!(SOURCE, InvalidResource, "Vertex buffer was never created");
        };
        if vertices.is_empty() {
            return Ok(());
        }
        if offset > 0 && offset + vertices.len() > self.size {
            engine_bail!(
                SOURCE,
                InvalidArgument,
                "Cannot write {} vertices at offset {} into a buffer of {}",
                vertices.len(), offset, self.size
            );
        }

        let mut ctx = self.context.lock()?;
        let device = ctx.device_mut();
        let previous = device.bound_vertex_buffer();
        device.bind_vertex_buffer(Some(buffer));
        if vertices.len() >= self.size {
            device.buffer_data(vertices.len() * Vertex::STRIDE, self.usage);
            self.size = vertices.len();
        }
        device.buffer_sub_data(offset * Vertex::STRIDE, bytemuck::cast_slice(vertices));
        device.bind_vertex_buffer(previous);
        Ok(())
    }

    /// Copy the content of `other` on the GPU, growing this buffer if needed
    ///
    /// # Errors
    ///
    /// `Unsupported` without GPU buffer copies, `InvalidResource` if either
    /// buffer was never created.
    pub fn update_from(&mut self, other: &VertexBuffer) -> Result<()> {
        let (Some(destination), Some(source)) = (self.buffer, other.buffer) else {
            engine_bail!(SOURCE, InvalidResource, "Vertex buffer copy between uncreated buffers");
        };

        let mut ctx = self.context.lock()?;
        if !ctx.capabilities().supports(DeviceFeatures::BUFFER_COPY) {
            engine_bail!(SOURCE, Unsupported, "GPU buffer copies are not supported");
        }
        let device = ctx.device_mut();
        if self.size < other.size {
            allocate(device, destination, other.size * Vertex::STRIDE, self.usage);
            self.size = other.size;
        }
        device.copy_buffer(source, destination, other.size * Vertex::STRIDE);
        Ok(())
    }

    /// Exchange GPU objects and settings
    pub fn swap(&mut self, other: &mut VertexBuffer) {
        std::mem::swap(self, other);
    }

    // ===== ACCESSORS =====

    pub fn vertex_count(&self) -> usize {
        self.size
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }

    pub fn set_primitive_type(&mut self, primitive_type: PrimitiveType) {
        self.primitive_type = primitive_type;
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Takes effect on the next allocation
    pub fn set_usage(&mut self, usage: BufferUsage) {
        self.usage = usage;
    }

    pub fn buffer_handle(&self) -> Option<BufferHandle> {
        self.buffer
    }

    pub(crate) fn vertex_array_handle(&self) -> Option<VertexArrayHandle> {
        self.vertex_array
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }
}

/// (Re)allocate `bytes` for `buffer`, restoring the previous buffer binding
fn allocate(device: &mut dyn GraphicsDevice, buffer: BufferHandle, bytes: usize, usage: BufferUsage) {
    let previous = device.bound_vertex_buffer();
    device.bind_vertex_buffer(Some(buffer));
    device.buffer_data(bytes, usage);
    device.bind_vertex_buffer(previous);
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        let Ok(mut ctx) = self.context.lock() else { return };
        let device = ctx.device_mut();
        if let Some(vertex_array) = self.vertex_array.take() {
            device.delete_vertex_array(vertex_array);
        }
        if let Some(buffer) = self.buffer.take() {
            device.delete_buffer(buffer);
        }
    }
}

impl std::fmt::Debug for VertexBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexBuffer")
            .field("buffer", &self.buffer)
            .field("size", &self.size)
            .field("primitive_type", &self.primitive_type)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "vertex_buffer_tests.rs"]
mod tests;
