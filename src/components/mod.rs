mod fragment_frame;
mod image_frame;
mod lightbox;
mod loading_indicator;

pub use fragment_frame::FragmentFrame;
pub use image_frame::ImageFrame;
pub use lightbox::Lightbox;
pub use loading_indicator::LoadingIndicator;
