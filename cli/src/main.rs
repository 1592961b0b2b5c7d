use anyhow::Context;
use clap::Parser;
use cloudmask_engine::{CloudEngine, CloudParams, MaskEngine};
use log::{debug, info};

mod args;
mod sink;

use args::Cli;

fn init_logging(quiet: bool) {
    let default_filter = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn resolve_params(cli: &Cli) -> anyhow::Result<CloudParams> {
    let base = match &cli.config {
        Some(path) => {
            debug!("loading config from {}", path.display());
            CloudParams::from_file(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => CloudParams::default(),
    };
    Ok(cli.apply(base))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("cloudmask-{i}"))
            .build_global()
            .context("configuring worker threads")?;
    }

    let params = resolve_params(&cli)?;
    if cli.dump_config {
        println!("{}", params.to_ron_string()?);
        return Ok(());
    }

    let engine = CloudEngine::new(params).context("invalid parameters")?;
    let mask = engine.render()?;
    let out = &engine.params().output_path;
    sink::save_mask(&mask, out)?;
    info!("saved {}x{} mask", mask.width(), mask.height());
    println!("Wrote {}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn config_file_then_flags() {
        let mut file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        write!(file, "(width: 80, height: 40, seed: 5)").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::try_parse_from(["cloudmask", "--config", &path, "--height", "20"]).unwrap();
        let params = resolve_params(&cli).unwrap();
        assert_eq!((params.width, params.height, params.seed), (80, 20, 5));
    }

    #[test]
    fn missing_config_is_an_error() {
        let cli = Cli::try_parse_from(["cloudmask", "--config", "/definitely/not/here.ron"]).unwrap();
        assert!(resolve_params(&cli).is_err());
    }

    #[test]
    fn renders_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clouds.png");
        let out_arg = out.to_str().unwrap().to_string();
        let cli = Cli::try_parse_from([
            "cloudmask", "--width", "32", "--height", "24", "--base-scale", "8", "--octaves", "2", "--out", &out_arg,
        ])
        .unwrap();
        let engine = CloudEngine::new(resolve_params(&cli).unwrap()).unwrap();
        let mask = engine.render().unwrap();
        sink::save_mask(&mask, &engine.params().output_path).unwrap();
        assert_eq!(image::open(&out).unwrap().to_luma8().dimensions(), (32, 24));
    }

    #[test]
    fn zero_width_is_rejected() {
        let cli = Cli::try_parse_from(["cloudmask", "--width", "0"]).unwrap();
        assert!(CloudEngine::new(resolve_params(&cli).unwrap()).is_err());
    }
}
