/// Graphics value types shared by the device layer and the render layer

pub mod color;
pub mod rect;
pub mod vertex;
pub mod blend_mode;
pub mod transform;
pub mod image;
pub mod context_settings;

pub use color::Color;
pub use rect::{Rect, IntRect, FloatRect};
pub use vertex::{Vertex, PrimitiveType, VertexAttribute, AttributeKind};
pub use blend_mode::{BlendMode, BlendFactor, BlendEquation};
pub use transform::Transform;
pub use image::Image;
pub use context_settings::ContextSettings;
