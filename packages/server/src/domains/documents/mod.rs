//! Templated document construction: variable substitution and the semantic
//! document handed to the PDF collaborator.

pub mod renderer;
pub mod template;

pub use renderer::{
    generate_pdf, generate_pdf_preview, render_approved, render_draft, DocumentSpec, PageConfig,
};
pub use template::substitute;
