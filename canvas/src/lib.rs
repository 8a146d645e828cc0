//! Canvas drawing, rendering, and hit-testing engine for the collaborative
//! whiteboard client.
//!
//! The crate owns the client half of a room: the ordered shape list, the
//! pointer gesture state machine that turns drags into shapes, the zoom
//! camera, tolerance-based hit-testing for selection and erasing, and a
//! full-surface renderer. It never touches the network directly; engine
//! operations return [`engine::Action`]s and the host forwards the outbound
//! messages over its websocket.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`]: gestures, local edits, remote message application |
//! | [`doc`] | Ordered, id-deduplicated shape list |
//! | [`camera`] | Zoom camera and screen ↔ model conversions |
//! | [`input`] | Tools, theme, UI settings, gesture states |
//! | [`hit`] | Point-in-shape and topmost-shape queries |
//! | [`render`] | Full redraw over the [`render::Surface`] trait |
//! | [`history`] | Room bootstrap from the history endpoints |
//! | [`chat`] | Chat log with own-echo suppression |
//! | [`net`] | Connection state and reconnect backoff |
//! | [`consts`] | Shared numeric constants |

pub mod camera;
pub mod chat;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod history;
pub mod hit;
pub mod input;
pub mod net;
pub mod render;
#[cfg(target_arch = "wasm32")]
pub mod web;
