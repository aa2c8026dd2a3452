//! PPTX (Office Open XML) renderer backend.

pub mod writer;

pub use writer::PptxRenderer;
