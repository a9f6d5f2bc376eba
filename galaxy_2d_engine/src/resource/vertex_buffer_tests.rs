/// Unit tests for VertexBuffer

use glam::Vec2;
use crate::error::Error;
use crate::graphics::{Color, PrimitiveType, Vertex};
use crate::graphics_device::mock_graphics_device::{mock_context, mock_context_with};
use crate::graphics_device::{BufferUsage, DeviceCapabilities, DeviceFeatures};
use super::VertexBuffer;

fn vertices(count: usize) -> Vec<Vertex> {
    (0..count)
        .map(|i| Vertex::colored(Vec2::new(i as f32, 0.0), Color::WHITE))
        .collect()
}

#[test]
fn test_create_declares_layout() {
    let (ctx, probe) = mock_context();
    let mut buffer = VertexBuffer::new(&ctx, PrimitiveType::Triangles, BufferUsage::Static);
    buffer.create(6).unwrap();

    assert_eq!(buffer.vertex_count(), 6);
    let state = probe.state();
    let vao = buffer.vertex_array_handle().unwrap();
    assert_eq!(state.vertex_arrays.get(&vao.raw()).unwrap().as_slice(), &Vertex::LAYOUT);
    assert_eq!(state.buffers.get(&buffer.buffer_handle().unwrap().raw()).unwrap().len(), 6 * 20);
    assert_eq!(state.vertex_array, None);
    assert_eq!(state.vertex_buffer, None);
}

#[test]
fn test_create_failure_releases_buffer() {
    let (ctx, probe) = mock_context();
    probe.state().fail_create = Some("create_vertex_array");
    let mut buffer = VertexBuffer::new(&ctx, PrimitiveType::Points, BufferUsage::Stream);

    assert!(matches!(buffer.create(4), Err(Error::ResourceExhausted(_))));
    assert!(buffer.buffer_handle().is_none());
    assert!(probe.state().buffers.is_empty());
}

#[test]
fn test_update_writes_at_offset() {
    let (ctx, probe) = mock_context();
    let mut buffer = VertexBuffer::new(&ctx, PrimitiveType::Points, BufferUsage::Dynamic);
    buffer.create(4).unwrap();

    buffer.update(&vertices(2), 2).unwrap();
    assert_eq!(buffer.vertex_count(), 4);
    assert_eq!(probe.count("buffer_data"), 1);
    assert!(probe.state().errors.is_empty());
}

#[test]
fn test_update_overflow_at_offset_fails() {
    let (ctx, _probe) = mock_context();
    let mut buffer = VertexBuffer::new(&ctx, PrimitiveType::Points, BufferUsage::Dynamic);
    buffer.create(4).unwrap();

    assert!(matches!(buffer.update(&vertices(3), 2), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_update_larger_than_size_reallocates() {
    let (ctx, probe) = mock_context();
    let mut buffer = VertexBuffer::new(&ctx, PrimitiveType::Points, BufferUsage::Dynamic);
    buffer.create(2).unwrap();

    buffer.update(&vertices(10), 0).unwrap();
    assert_eq!(buffer.vertex_count(), 10);
    let state = probe.state();
    assert_eq!(state.buffers.get(&buffer.buffer_handle().unwrap().raw()).unwrap().len(), 200);
    assert!(state.errors.is_empty());
}

#[test]
fn test_update_uncreated_fails() {
    let (ctx, _probe) = mock_context();
    let mut buffer = VertexBuffer::new(&ctx, PrimitiveType::Points, BufferUsage::Stream);
    assert!(matches!(buffer.update(&vertices(1), 0), Err(Error::InvalidResource(_))));
}

#[test]
fn test_update_from_copies_on_gpu() {
    let (ctx, probe) = mock_context();
    let mut source = VertexBuffer::new(&ctx, PrimitiveType::Points, BufferUsage::Static);
    source.create(0).unwrap();
    source.update(&vertices(3), 0).unwrap();
    let mut destination = VertexBuffer::new(&ctx, PrimitiveType::Points, BufferUsage::Static);
    destination.create(1).unwrap();

    destination.update_from(&source).unwrap();
    assert_eq!(destination.vertex_count(), 3);
    let state = probe.state();
    let bytes = |b: &VertexBuffer| state.buffers.get(&b.buffer_handle().unwrap().raw()).unwrap().clone();
    assert_eq!(bytes(&destination), bytes(&source));
}

#[test]
fn test_update_from_unsupported() {
    let mut capabilities = DeviceCapabilities::default();
    capabilities.features.remove(DeviceFeatures::BUFFER_COPY);
    let (ctx, _probe) = mock_context_with(capabilities);
    let mut a = VertexBuffer::new(&ctx, PrimitiveType::Points, BufferUsage::Static);
    let mut b = VertexBuffer::new(&ctx, PrimitiveType::Points, BufferUsage::Static);
    a.create(1).unwrap();
    b.create(1).unwrap();
    assert!(matches!(a.update_from(&b), Err(Error::Unsupported(_))));
}

#[test]
fn test_swap_and_drop() {
    let (ctx, probe) = mock_context();
    let mut a = VertexBuffer::new(&ctx, PrimitiveType::Points, BufferUsage::Static);
    let mut b = VertexBuffer::new(&ctx, PrimitiveType::Lines, BufferUsage::Stream);
    a.create(2).unwrap();

    a.swap(&mut b);
    assert_eq!(a.primitive_type(), PrimitiveType::Lines);
    assert!(a.buffer_handle().is_none());
    assert_eq!(b.vertex_count(), 2);

    drop(b);
    assert_eq!(probe.state().live_objects(), 0);
}
