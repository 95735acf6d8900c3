// epiwatch-core/src/infrastructure/render/mod.rs

pub mod markdown;

pub use markdown::MarkdownRenderer;
