pub mod export;
pub mod letter_llm;
pub mod store;

pub use export::{ExportArtifact, ExportFormat};
pub use letter_llm::{OpenAiLetterWriter, ResilientLetters, TemplateLetterWriter};
pub use store::JsonStoreAdapter;
