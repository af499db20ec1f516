// Presentation layer - Text report rendering
pub mod report;
