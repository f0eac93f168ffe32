// Resume text core: segmentation, line classification and the document model
// shared by every exporter. Everything except `handlers` is pure.

pub mod document;
pub mod handlers;
pub mod lines;
pub mod sections;

pub use document::{ResumeDocument, TextDirection};
pub use lines::{classify, LineKind};
pub use sections::{segment, ResumeSection};
