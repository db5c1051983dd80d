pub mod config;
pub mod detect;
pub mod error;
pub mod interactive;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod subtitle;
pub mod translate;

pub use config::{Config, TargetLanguage};
pub use error::{Result, SubtranError};
pub use pipeline::{
    print_summary, translate_document, translate_file, PipelineResult, PipelineStats,
    TranslationJob,
};
