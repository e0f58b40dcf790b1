//! Small HTTP helpers shared by request handlers.

pub mod compression;
pub mod path;
pub mod redirect;
pub mod send;

pub use compression::compression_layer;
pub use path::{ParsedPath, parse_path};
pub use redirect::redirect;
pub use send::send_json;
