//! Command-line configuration

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "pagevox", about = "Read a book aloud, paragraph by paragraph")]
pub struct Cli {
    /// Book to read: UTF-8 text, one paragraph per line
    pub book: PathBuf,

    /// Language the book is written in (e.g. "en", "fr")
    #[arg(long, env = "PAGEVOX_LANGUAGE", default_value = "en")]
    pub language: String,

    /// Language used when the engine has no voice for the book's language
    #[arg(long, env = "PAGEVOX_FALLBACK_LANGUAGE", default_value = "en")]
    pub fallback_language: String,

    /// espeak command to use instead of probing for espeak/espeak-ng
    #[arg(long, env = "PAGEVOX_ESPEAK")]
    pub espeak_command: Option<String>,
}
