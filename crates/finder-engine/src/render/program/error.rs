use crate::content::ResourceError;

use super::ShaderStage;

/// Failure while turning cached shader text into a program.
#[derive(thiserror::Error, Debug)]
pub enum ProgramError {
    #[error("shader source unavailable")]
    Source(#[from] ResourceError),

    /// The stage did not parse or validate; `diagnostics` is the compiler log.
    #[error("{stage} shader `{alias}` failed to compile:\n{diagnostics}")]
    Compile {
        stage: ShaderStage,
        alias: String,
        diagnostics: String,
    },

    #[error("program `{label}` failed to link: {reason}")]
    Link { label: String, reason: String },
}
