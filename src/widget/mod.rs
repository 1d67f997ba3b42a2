//! Review selection and presentation.
//!
//! Raw reviews pass through [`selection::select`] and are laid out by
//! [`render::render`] into a context-neutral [`markup::Node`] tree. The
//! adapters in [`markup`] turn that tree into an HTML page, JSON for the DOM
//! injector script, or a self-contained base64 snippet.

pub mod embed;
pub mod markup;
pub mod render;
pub mod selection;
pub mod summary;
pub mod wordpress;
