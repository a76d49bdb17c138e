pub mod app;
pub mod components;
pub mod config;
pub mod dom;
pub mod error;
pub mod session;
pub mod state;
pub mod viewer;

pub use app::App;
pub use config::ViewerConfig;
pub use error::ViewerError;
pub use viewer::Viewer;
