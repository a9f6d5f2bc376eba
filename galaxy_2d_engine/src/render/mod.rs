/// Render layer - render targets, their shared pipeline and draw states

pub mod render_states;
pub mod drawable;
pub mod render_target;
pub mod render_window;
pub mod render_texture;
pub(crate) mod pipeline;
pub(crate) mod frame_buffer;

pub use render_states::RenderStates;
pub use drawable::{Drawable, VertexArray};
pub use render_target::{RenderTarget, TargetState};
pub use render_window::{RenderWindow, Presenter};
pub use render_texture::RenderTexture;
