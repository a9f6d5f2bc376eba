/// Opaque GPU object handles
///
/// Handles are the native names of GPU objects, never zero. "No object"
/// is expressed with `Option<...Handle>`. A handle says nothing about the
/// logical resource behind it: the driver may hand the same name out again
/// once the object is deleted.

use std::num::NonZeroU32;

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub NonZeroU32);

        impl $name {
            /// Wrap a raw native name, `None` for 0
            pub fn from_raw(raw: u32) -> Option<Self> {
                NonZeroU32::new(raw).map($name)
            }

            pub fn raw(self) -> u32 {
                self.0.get()
            }
        }
    };
}

gpu_handle!(
    /// Texture object
    TextureHandle
);
gpu_handle!(
    /// Buffer object (vertex data)
    BufferHandle
);
gpu_handle!(
    /// Vertex array object (attribute layout + bound buffer)
    VertexArrayHandle
);
gpu_handle!(
    /// Linked shader program
    ProgramHandle
);
gpu_handle!(
    /// Framebuffer object
    FramebufferHandle
);
gpu_handle!(
    /// Renderbuffer object
    RenderbufferHandle
);

/// Location of a uniform inside a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);
