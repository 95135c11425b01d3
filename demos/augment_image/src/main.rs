use argh::FromArgs;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

use roadaug::augment::{shadow, AugmentConfig, Augmenter};
use roadaug::io::functional as F;

#[derive(FromArgs)]
/// Augment an image several times and write the results as PNG files
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// directory to write the augmented images to
    #[argh(option, short = 'o')]
    output_dir: PathBuf,

    /// number of augmented images to write
    #[argh(option, short = 'n', default = "4")]
    num_images: usize,

    /// seed of the random generator
    #[argh(option, default = "0")]
    seed: u64,

    /// glob pattern of RGBA shadow images
    #[argh(option)]
    shadows: Option<String>,

    /// apply the random perspective tilt
    #[argh(switch)]
    warp: bool,

    /// optional JSON file with the augmentation config
    #[argh(option)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = match &args.config {
        Some(path) => AugmentConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => AugmentConfig::default(),
    };
    let augmenter = Augmenter::new(config)?;

    let shadows = match &args.shadows {
        Some(pattern) => Some(shadow::load_shadow_assets(pattern)?),
        None => None,
    };

    let image = F::read_image_any_rgb8(&args.image_path)?;
    log::info!("read {} ({})", args.image_path.display(), image.size());

    std::fs::create_dir_all(&args.output_dir)?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    for i in 0..args.num_images {
        let out = augmenter.augment_discrete(&image, shadows.as_deref(), args.warp, &mut rng)?;
        let path = args.output_dir.join(format!("augmented_{i:04}.png"));
        F::write_image(&path, &out)?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}
