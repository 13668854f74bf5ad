// Library surface for headless/integration tests and reuse.
// The terminal UI lives in the binary; keep bin-only types out of here.
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod grid;
pub mod hit;
pub mod reporter;
pub mod results;
pub mod runtime;
pub mod score_store;
pub mod session;
pub mod targets;
pub mod timer;
pub mod util;
pub mod viewport;
