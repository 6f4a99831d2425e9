use std::path::Path;
use std::process::ExitCode;

use glyphfield::atlas::{GlyphAtlasCache, GlyphRequest};
use glyphfield::config::Config;
use glyphfield::font::{self, FontFace};
use glyphfield::geometry::PixelSize;
use glyphfield::gpu::{GpuState, RecordedCommand, RecordingBackend, RenderBackend, WgpuBackend};
use glyphfield::outline::YDirection;
use glyphfield::packer::BinPacker;

const DEFAULT_FONT_SIZE: f32 = 48.0;

fn main() -> ExitCode {
    env_logger::init();
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--print-config") {
        match toml::to_string_pretty(&Config::default()) {
            Ok(s) => print!("{s}"),
            Err(e) => return fail(&e),
        }
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("glyphfield {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    let config = match take_config(&mut args) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    let result = match args.first().map(String::as_str) {
        Some("pack") => pack(&args[1..]),
        Some("trace") => trace(&config, &args[1..]),
        Some("bake") => bake(&config, &args[1..]),
        Some(other) => Err(format!("unknown command {other:?}, see --help")),
        None => Err("missing command, see --help".to_owned()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn print_help() {
    println!("glyphfield {}", env!("CARGO_PKG_VERSION"));
    println!("GPU signed distance field glyph atlas\n");
    println!("USAGE:");
    println!("    glyphfield [OPTIONS] <COMMAND>\n");
    println!("COMMANDS:");
    println!("    pack <BIN> <WxH>...           Pack rectangles into a bin and print placements");
    println!("    trace <FONT> <TEXT> [SIZE]    Bake text on the recording backend, print UVs");
    println!("    bake <FONT> <TEXT> [SIZE]     Bake text on a headless GPU\n");
    println!("OPTIONS:");
    println!("    --config <PATH>   Load configuration from a TOML file");
    println!("    --print-config    Print the default configuration to stdout");
    println!("    --version, -V     Print version information");
    println!("    --help, -h        Print this help message");
}

fn fail(e: &dyn std::fmt::Display) -> ExitCode {
    eprintln!("error: {e}");
    ExitCode::FAILURE
}

/// Remove `--config <path>` from `args` and load it, or use defaults.
fn take_config(args: &mut Vec<String>) -> Result<Config, String> {
    let Some(pos) = args.iter().position(|a| a == "--config") else {
        return Ok(Config::default());
    };
    let path = args
        .get(pos + 1)
        .cloned()
        .ok_or("--config needs a path")?;
    args.drain(pos..=pos + 1);
    Config::load(Path::new(&path)).map_err(|e| e.to_string())
}

fn pack(args: &[String]) -> Result<(), String> {
    let (bin, sizes) = args.split_first().ok_or("pack needs a bin size")?;
    let bin: PixelSize = bin.parse::<PixelSize>().map_err(|e| e.to_string())?;
    let mut packer = BinPacker::new(bin.width, bin.height);

    for arg in sizes {
        let size: PixelSize = arg.parse::<PixelSize>().map_err(|e| e.to_string())?;
        match packer.reserve(size, true) {
            Ok(p) => println!("{size} -> ({}, {}) {} {:?}", p.x, p.y, p.size, p.rotation),
            Err(e) => println!("{size} -> {e}"),
        }
    }
    let frontier: Vec<String> = packer.frontier().map(|(x, y)| format!("({x}, {y})")).collect();
    println!("frontier: {}", frontier.join(" "));
    Ok(())
}

/// Font path, text and size from `<FONT> <TEXT> [SIZE]`.
fn text_args(args: &[String]) -> Result<(FontFace, &str, f32), String> {
    let [font_path, text, rest @ ..] = args else {
        return Err("expected <FONT> <TEXT> [SIZE]".to_owned());
    };
    let size = match rest.first() {
        Some(s) => s.parse().map_err(|_| format!("invalid size {s:?}"))?,
        None => DEFAULT_FONT_SIZE,
    };
    let face = FontFace::load(Path::new(font_path), 0).map_err(|e| e.to_string())?;
    Ok((face, text.as_str(), size))
}

/// Shape `text`, request every glyph and drain frame by frame until the
/// queue is empty. Returns the number of frames it took.
fn bake_text(
    backend: &mut dyn RenderBackend,
    config: &Config,
    face: &FontFace,
    text: &str,
    size: f32,
) -> (GlyphAtlasCache, usize) {
    let mut cache = GlyphAtlasCache::new(backend, config.cache_settings());
    let padding = config.field.effective_padding();

    for glyph in font::shape(face, text, size) {
        let outline = face.outline(glyph.glyph_id);
        let request = GlyphRequest {
            font_id: 0,
            font_index: face.index(),
            glyph_id: glyph.glyph_id,
            font_size: size,
            padding,
            y_direction: YDirection::Up,
            outline: &outline,
        };
        let uv = cache.request_glyph_or_empty(&request);
        println!(
            "glyph {:>5} at x={:>8.2}  uv {:?}",
            glyph.glyph_id,
            glyph.x,
            uv.corners()
        );
    }

    let mut frames = 0;
    while cache.pending() > 0 {
        let report = cache.drain_frame(backend);
        frames += 1;
        if report.failed > 0 {
            println!("frame {frames}: {} glyphs failed", report.failed);
        }
    }
    (cache, frames)
}

fn trace(config: &Config, args: &[String]) -> Result<(), String> {
    let (face, text, size) = text_args(args)?;
    let mut backend = RecordingBackend::new();
    let (cache, frames) = bake_text(&mut backend, config, &face, text, size);

    let count = |f: fn(&RecordedCommand) -> bool| backend.count(f);
    println!("glyphs cached: {} in {frames} frame(s)", cache.len());
    println!(
        "curves drawn: {}",
        count(|c| matches!(c, RecordedCommand::DrawCurve { .. }))
    );
    println!(
        "combine passes: {}",
        count(|c| matches!(c, RecordedCommand::Combine { .. }))
    );
    println!(
        "atlas blits: {}",
        count(|c| matches!(c, RecordedCommand::Blit { .. }))
    );
    println!("live targets: {}", backend.live_targets());
    Ok(())
}

fn bake(config: &Config, args: &[String]) -> Result<(), String> {
    let (face, text, size) = text_args(args)?;
    let gpu = GpuState::new_headless().map_err(|e| e.to_string())?;
    let mut backend = WgpuBackend::new(&gpu, config.field.effective_curve_segments());
    let (cache, frames) = bake_text(&mut backend, config, &face, text, size);
    println!("glyphs cached: {} in {frames} frame(s)", cache.len());
    cache.release(&mut backend);
    Ok(())
}
