pub mod camera;
pub mod classify;
pub mod config;
pub mod error;
pub mod presenter;
pub mod scan;

pub use config::Configuration;
pub use error::Error;
pub use presenter::{BufferTarget, Frame, Presenter, RenderTarget};
