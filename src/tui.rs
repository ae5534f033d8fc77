pub mod app;
pub mod controller;
pub mod event;
pub mod input;
pub mod page;
pub mod renderer;
pub mod utils;

pub use app::{App, InputMode};
pub use controller::TuiApp;
pub use event::{Event, EventHandler};
pub use input::{InputHandler, UserAction};
pub use renderer::Renderer;
