use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;

use filmlook::processing::{render_params, RenderOptions};
use filmlook::{filter, FilterParameters};

static SUPPORTED_IMAGE_EXTS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp"];

const USAGE: &str = "usage: filmlook <input> <output> [--filter NAME] [--params FILE] \
[--seed N] [--date-stamp]\n       filmlook --list\n\nWhen <input> is a directory, every \
supported image in it is processed into the <output> directory.";

struct Args {
    input: PathBuf,
    output: PathBuf,
    filter_name: Option<String>,
    params_file: Option<PathBuf>,
    seed: Option<u64>,
    date_stamp: bool,
}

fn parse_args() -> Result<Option<Args>> {
    let mut positional: Vec<PathBuf> = Vec::new();
    let mut filter_name = None;
    let mut params_file = None;
    let mut seed = None;
    let mut date_stamp = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--list" => return Ok(None),
            "--filter" => {
                filter_name = Some(args.next().context("--filter requires a name")?);
            }
            "--params" => {
                params_file = Some(PathBuf::from(
                    args.next().context("--params requires a file path")?,
                ));
            }
            "--seed" => {
                let raw = args.next().context("--seed requires a number")?;
                seed = Some(raw.parse::<u64>().context("--seed must be an integer")?);
            }
            "--date-stamp" => date_stamp = true,
            "--help" | "-h" => bail!("{USAGE}"),
            other if other.starts_with("--") => bail!("unknown option {other}\n{USAGE}"),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    if positional.len() != 2 {
        bail!("{USAGE}");
    }
    let output = positional.pop().unwrap_or_default();
    let input = positional.pop().unwrap_or_default();

    Ok(Some(Args {
        input,
        output,
        filter_name,
        params_file,
        seed,
        date_stamp,
    }))
}

fn has_extension(path: &Path, exts: &[&str]) -> bool {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy()) else {
        return false;
    };
    exts.iter().any(|known| ext.eq_ignore_ascii_case(known))
}

fn resolve_parameters(args: &Args) -> Result<FilterParameters> {
    let mut params = match args.filter_name.as_deref() {
        Some(name) => {
            filter::preset(name)
                .with_context(|| format!("unknown filter {name:?}; try --list"))?
                .parameters
        }
        None => FilterParameters::default(),
    };

    if let Some(path) = &args.params_file {
        params = FilterParameters::load(path)
            .with_context(|| format!("could not read recipe {}", path.display()))?;
    }

    if args.date_stamp {
        params.date_stamp_enabled = true;
    }

    Ok(params)
}

fn process_one(
    input: &Path,
    output: &Path,
    params: &FilterParameters,
    opts: &RenderOptions,
) -> Result<()> {
    let source =
        image::open(input).with_context(|| format!("could not open {}", input.display()))?;
    let rendered = render_params(&source, params, opts)
        .with_context(|| format!("render failed for {}", input.display()))?;
    rendered
        .save(output)
        .with_context(|| format!("could not write {}", output.display()))?;
    tracing::info!(input = %input.display(), output = %output.display(), "rendered");
    Ok(())
}

fn process_directory(args: &Args, params: &FilterParameters, opts: &RenderOptions) -> Result<()> {
    let mut files: Vec<PathBuf> = fs::read_dir(&args.input)
        .with_context(|| format!("read_dir failed for {}", args.input.display()))?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_extension(p, SUPPORTED_IMAGE_EXTS))
        .collect();
    files.sort();
    if files.is_empty() {
        bail!("no supported images found in {}", args.input.display());
    }

    fs::create_dir_all(&args.output)
        .with_context(|| format!("create_dir_all {}", args.output.display()))?;

    files.par_iter().try_for_each(|path| -> Result<()> {
        let name = path.file_name().context("file without a name")?;
        process_one(path, &args.output.join(name), params, opts)
    })?;

    eprintln!("filmlook: processed {} images", files.len());
    Ok(())
}

fn print_catalog() {
    for f in filter::presets() {
        let price = if f.is_premium { " (premium)" } else { "" };
        println!("{}{price}\n    {}", f.name, f.description);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Some(args) = parse_args()? else {
        print_catalog();
        return Ok(());
    };

    let params = resolve_parameters(&args)?;
    let opts = RenderOptions {
        seed: args.seed,
        ..Default::default()
    };

    if args.input.is_dir() {
        process_directory(&args, &params, &opts)
    } else {
        process_one(&args.input, &args.output, &params, &opts)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{has_extension, SUPPORTED_IMAGE_EXTS};

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_extension(Path::new("a/b/photo.JPG"), SUPPORTED_IMAGE_EXTS));
        assert!(has_extension(Path::new("photo.png"), SUPPORTED_IMAGE_EXTS));
        assert!(!has_extension(Path::new("notes.txt"), SUPPORTED_IMAGE_EXTS));
        assert!(!has_extension(Path::new("no_extension"), SUPPORTED_IMAGE_EXTS));
    }
}
