//! Gallery Window Crate
//!
//! winit event loop hosting a [`RenderDelegate`], input translation, the
//! background image loader and the delegate that draws a gallery.

mod app;
pub mod gallery;
pub mod input;
pub mod loader;

pub use app::{RenderContext, RenderDelegate, WindowOptions, init_tracing, run_with_delegate};
pub use gallery::{GalleryDelegate, GalleryInit};
pub use input::{InputEvent, InputState};
pub use loader::{ImageLoader, ImageSource, ImageSourceError};

/// Open a window and show `init`'s gallery until the window closes.
pub fn run_gallery(
    options: WindowOptions,
    init: GalleryInit,
) -> Result<(), Box<dyn std::error::Error>> {
    run_with_delegate::<GalleryDelegate>(options, init)
}
