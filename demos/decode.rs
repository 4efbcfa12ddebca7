//! Decode Example - decoding text on the terminal
//!
//! Decodes each argument on its own line, one after another.
//!
//! - `DECODER_CONFIG=path.toml` loads settings from a file
//! - `REDUCE_MOTION=1` (or piping stdout) shows the final text at once
//! - `RUST_LOG=debug` logs lifecycle transitions to stderr
//!
//! Run with: cargo run --example decode -- "Hello, World" "ハッカー"

use std::io::{IsTerminal, Write, stdout};
use std::rc::Rc;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;

use decoder_text::state::detect_reduced_motion;
use decoder_text::{AnsiSink, DecoderConfig, DecoderText, FrameLoop};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut lines: Vec<String> = std::env::args().skip(1).collect();
    if lines.is_empty() {
        lines.push("Decoder Text".to_string());
    }

    let config = match std::env::var_os("DECODER_CONFIG") {
        Some(path) => DecoderConfig::load(path)?,
        None => DecoderConfig::default(),
    };
    let fps = config.fps;
    let reduce_motion = detect_reduced_motion() || !stdout().is_terminal();

    let frames = FrameLoop::new();
    let sink = AnsiSink::stdout().with_title_label();
    let mut decoder =
        DecoderText::new(Rc::new(frames.clone()), sink, config).with_reduce_motion(reduce_motion);

    execute!(stdout(), Hide)?;
    for line in &lines {
        decoder.start(line);
        let ran = frames.run(fps);
        log::info!("{line:?} decoded in {ran} frames");
        println!();
        decoder.stop();
    }
    execute!(stdout(), Show)?;
    stdout().flush()?;

    Ok(())
}
