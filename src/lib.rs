//! Tablero — a desktop sketching board that turns a freehand doodle into a
//! "Pack Creativo": an AI-written description, title, poem, color palette,
//! activity idea, refined prompt and emoji set, plus an optional children's
//! story and an AI-enhanced rendering of the sketch.
//!
//! The crate is split so that everything below the egui shell is testable
//! without a window or a network connection:
//!
//! * [`canvas`] — the drawing surface and its pixel buffers
//! * [`codec`] — in-memory PNG + base64 encoding of a canvas snapshot
//! * [`client`] — blocking HTTP client for the provider's chat/image endpoints
//! * [`prompts`] — prompt templates, built without touching the network
//! * [`commands`] — orchestration of encode → remote call, used by the UI
//!   worker threads and by the integration tests alike
//! * [`session`] — the explicit per-session state and its transitions
//! * [`palette`] — hex color extraction from generated pack text

pub mod app;
pub mod canvas;
pub mod client;
pub mod codec;
pub mod commands;
pub mod components;
pub mod i18n;
pub mod io;
pub mod logger;
pub mod palette;
pub mod prompts;
pub mod session;
