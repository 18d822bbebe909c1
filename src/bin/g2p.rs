//! Dumps the frontend output for one utterance as JSON.
//!
//! ```bash
//! cargo run --bin g2p -- --lang multilingual "Hello 世界"
//! ```

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use yue_g2p_rs::{FrontendConfig, G2pError, G2pOutput, Language, SYMBOLS, TextFrontend};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text to convert
    text: String,

    /// One of yue, zh, en, multilingual. yue and Cantonese runs of multilingual
    /// text need the jyutping tables from G2P_RESOURCE_DIR or --config, unless
    /// --phoneme is given
    #[arg(long, default_value = "yue")]
    lang: Language,

    /// Space separated jyutping or pinyin, one syllable per character
    #[arg(long)]
    phoneme: Option<String>,

    /// Do not pad the output
    #[arg(long)]
    no_padding: bool,

    /// JSON frontend config; environment overrides still apply
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Serialize)]
struct Dump<'a> {
    normalized: &'a str,
    #[serde(flatten)]
    output: &'a G2pOutput,
    phone_ids: Vec<i64>,
}

fn main() -> Result<(), G2pError> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => FrontendConfig::from_file(path)?,
        None => FrontendConfig::default(),
    }
    .with_env_overrides()?;

    let mut frontend = TextFrontend::from_config(&config)?;
    let (normalized, output) = frontend.clean_text(
        &args.text,
        args.lang,
        args.phoneme.as_deref(),
        !args.no_padding,
    )?;
    let dump = Dump {
        normalized: &normalized,
        output: &output,
        phone_ids: SYMBOLS.encode(&output.phones)?,
    };
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}
