use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "pfpforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a 512×512 profile picture from a photo.
    Generate(GenerateArgs),
    /// Write the fixed decorative backdrop as a PNG.
    Backdrop(BackdropArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input photo (any format the decoder understands).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path. Defaults to the fixed download name in the current
    /// directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Removal implementation to use.
    #[arg(long, value_enum, default_value_t = RemoverChoice::ChromaKey)]
    remover: RemoverChoice,

    /// Optional JSON file with removal tuning (threshold, corner offset).
    #[arg(long)]
    removal_opts: Option<PathBuf>,

    /// Also print the result as a data:image/png;base64 URL on stdout.
    #[arg(long)]
    emit_data_url: bool,
}

#[derive(Parser, Debug)]
struct BackdropArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RemoverChoice {
    ChromaKey,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Backdrop(args) => cmd_backdrop(args),
    }
}

fn read_removal_opts(path: &Path) -> anyhow::Result<pfpforge::RemovalOptions> {
    let f = File::open(path)
        .with_context(|| format!("open removal options '{}'", path.display()))?;
    let r = BufReader::new(f);
    let opts: pfpforge::RemovalOptions =
        serde_json::from_reader(r).with_context(|| "parse removal options JSON")?;
    Ok(opts)
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read input '{}'", args.in_path.display()))?;

    let opts = match &args.removal_opts {
        Some(path) => read_removal_opts(path)?,
        None => pfpforge::RemovalOptions::default(),
    };
    let kind = match args.remover {
        RemoverChoice::ChromaKey => pfpforge::RemoverKind::ChromaKey,
    };

    let mut compositor = pfpforge::Compositor::new(pfpforge::create_remover(kind, opts));
    compositor.select_source(pfpforge::SourceImage::from_bytes(bytes));
    let result = compositor.generate()?;

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(pfpforge::DOWNLOAD_FILE_NAME));
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    result.write_png(&out)?;

    if args.emit_data_url {
        println!("{}", result.data_url());
    }

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_backdrop(args: BackdropArgs) -> anyhow::Result<()> {
    let backdrop = pfpforge::render_backdrop(pfpforge::PFP_CANVAS);

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    // The backdrop is fully opaque, so its premultiplied pixels are already
    // straight alpha.
    image::save_buffer_with_format(
        &args.out,
        &backdrop.rgba8_premul,
        backdrop.width,
        backdrop.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
