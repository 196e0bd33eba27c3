//! Web streaming: play Night Run in a browser tab.
//!
//! The game still runs in the terminal; every frame written to it is
//! mirrored over a WebSocket to an xterm.js page, and key presses and
//! releases from the page are fed back into the game loop.
//!
//! ```sh
//! cargo run --features web -- --serve        # port 3000
//! cargo run --features web -- --serve=8080
//! ```

mod backend;
mod server;

pub use backend::TeeWriter;
pub use server::{start_web_server, WebServer};
