//! Interactive terminal front end: input decoding, drawing and the event loop.

pub mod input;
pub mod runtime;
pub mod view;
