use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use textfx_renderer::{
    CanvasPreset, Editor, EngineConfig, FontRegistry, OutputFormat, Scene, TemplateLibrary,
    TemplateProvider,
};

#[derive(Parser, Debug)]
#[command(name = "textfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene JSON to an image.
    Render(RenderArgs),
    /// List built-in style presets and canvas sizes.
    Presets,
    /// List templates found in the configured template directory.
    Templates(TemplatesArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Output format. Guessed from the output extension when omitted.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Engine config JSON (fonts, templates, presets).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TemplatesArgs {
    /// Engine config JSON.
    #[arg(long)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Presets => cmd_presets(),
        Command::Templates(args) => cmd_templates(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("read config '{}'", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_templates(config: &EngineConfig) -> anyhow::Result<TemplateLibrary> {
    match &config.template_dir {
        Some(dir) => TemplateLibrary::scan(dir)
            .with_context(|| format!("scan templates in '{}'", dir.display())),
        None => Ok(TemplateLibrary::empty()),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let fonts = FontRegistry::from_config(&config);
    let templates = load_templates(&config)?;

    let scene = Scene::from_file(&args.scene)
        .with_context(|| format!("read scene '{}'", args.scene.display()))?;
    let base_dir = args.scene.parent().unwrap_or_else(|| Path::new("."));

    let mut editor = Editor::new(&fonts, &templates);
    let (canvas_status, results) = scene
        .apply(&mut editor, &config.presets, base_dir)
        .context("apply scene")?;
    tracing::info!("{canvas_status}");
    for result in &results {
        match result {
            Ok(status) => tracing::info!("{status}"),
            Err(err) => tracing::warn!("{err}"),
        }
    }

    let image = editor
        .render()
        .context("scene produced no canvas")?;

    let format = args
        .format
        .or_else(|| OutputFormat::from_path(&args.out))
        .unwrap_or_default();
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    textfx_renderer::save(&image, &args.out, format)
        .with_context(|| format!("write {} '{}'", format.extension(), args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_presets() -> anyhow::Result<()> {
    println!("Style presets:");
    for preset in textfx_renderer::builtin_presets() {
        println!(
            "  {:<18} text {} outline {} width {} effect {}",
            preset.name, preset.text_color, preset.outline_color, preset.outline_width, preset.effect
        );
    }
    println!("Canvas sizes:");
    for preset in CanvasPreset::ALL {
        let (w, h) = preset.size();
        println!("  {:<26} {w}x{h}", preset.label());
    }
    Ok(())
}

fn cmd_templates(args: TemplatesArgs) -> anyhow::Result<()> {
    let config = load_config(Some(&args.config))?;
    let templates = load_templates(&config)?;
    let names = templates.names();
    if names.is_empty() {
        println!("No templates found");
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}
