use std::path::PathBuf;

use clap::Parser;
use cloudmask_engine::CloudParams;

/// Generate black/white cloud blobs using thresholded fBm gradient noise.
#[derive(Debug, Parser)]
#[command(name = "cloudmask", version)]
pub struct Cli {
    /// Load parameters from a .ron or .json file; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the effective parameters as RON and exit
    #[arg(long)]
    pub dump_config: bool,

    /// Worker threads for noise evaluation (default: one per core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Only log warnings and errors
    #[arg(long, short)]
    pub quiet: bool,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Bigger => larger cloud masses
    #[arg(long)]
    pub base_scale: Option<f64>,

    /// More => more edge detail
    #[arg(long)]
    pub octaves: Option<u32>,

    #[arg(long)]
    pub lacunarity: Option<f64>,

    #[arg(long)]
    pub gain: Option<f64>,

    /// Apply pow(noise, bias_power) before threshold. >1 tightens cores
    #[arg(long)]
    pub bias_power: Option<f32>,

    /// Higher => fewer white clouds
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Invert output (clouds black on white); `--invert=false` overrides a config file
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub invert: Option<bool>,

    /// Make noise seamlessly tileable; `--tileable=false` overrides a config file
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub tileable: Option<bool>,

    /// Padding in pixels where clouds fade to black at edges
    #[arg(long)]
    pub padding: Option<u32>,

    /// Blur noise before threshold for rounder cloud shapes
    #[arg(long)]
    pub smooth: Option<f32>,

    /// Blur after threshold for soft feathered edges
    #[arg(long)]
    pub feather: Option<f32>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub out: Option<PathBuf>,
}

impl Cli {
    /// Applies every flag that was given on top of `base`.
    pub fn apply(&self, mut base: CloudParams) -> CloudParams {
        macro_rules! set {
            ($($flag:ident => $field:ident),* $(,)?) => {
                $(if let Some(v) = self.$flag.clone() { base.$field = v; })*
            };
        }
        set! {
            width => width,
            height => height,
            base_scale => base_scale,
            octaves => octaves,
            lacunarity => lacunarity,
            gain => gain,
            bias_power => bias_power,
            threshold => threshold,
            padding => padding,
            smooth => smooth_radius,
            feather => feather_radius,
            invert => invert,
            tileable => tileable,
            seed => seed,
            out => output_path,
        }
        base
    }
}
