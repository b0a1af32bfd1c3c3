//! Pipeline stages for PDF grid tiling.
//!
//! Each submodule implements exactly one step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ layout/compose ──▶ write
//! (checks)  (pdfium)   (grid canvases)    (pdfium → PDF)
//! ```
//!
//! 1. [`input`]   — reject missing, unreadable or non-PDF inputs and missing
//!    output directories before pdfium is involved
//! 2. [`binding`] — find and load the pdfium shared library
//! 3. [`render`]  — rasterise every eligible page to RGB at a fixed DPI
//! 4. [`layout`]  — pure slot arithmetic (chunking, fill order, offsets)
//! 5. [`compose`] — paste each chunk onto a background-filled canvas
//! 6. [`write`]   — one PDF page per canvas, saved atomically

pub mod binding;
pub mod compose;
pub mod input;
pub mod layout;
pub mod render;
pub mod write;
