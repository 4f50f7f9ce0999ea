use argh::FromArgs;
use std::path::PathBuf;

use padconv::{
    image::{synthetic, DEFAULT_PADDING},
    imgproc::{
        filter::{self, NamedKernel},
        parallel::{ExecutionStrategy, DEFAULT_NUM_WORKERS},
    },
    io::dat,
};

#[derive(FromArgs)]
/// Convolve a random grayscale image and dump the input and output grids
struct Args {
    /// the width and height of the generated image
    #[argh(option, default = "1024")]
    size: usize,

    /// the kernel to apply: identity, sharpen or edge-detection
    #[argh(option, default = "NamedKernel::Sharpen")]
    kernel: NamedKernel,

    /// the number of worker threads, 0 uses the global thread pool
    #[argh(option, default = "DEFAULT_NUM_WORKERS")]
    num_threads: usize,

    /// the seed of the image generator
    #[argh(option, default = "24")]
    seed: u64,

    /// the directory where original.dat and filtered.dat are written
    #[argh(option, default = "PathBuf::from(\".\")")]
    output_dir: PathBuf,

    /// do not write the dump files
    #[argh(switch)]
    no_dump: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let strategy = match args.num_threads {
        0 => ExecutionStrategy::GlobalPool,
        n => ExecutionStrategy::Fixed(n),
    };

    log::info!("Generating image...");
    let original = synthetic::random_image_seeded(
        [args.size, args.size].into(),
        DEFAULT_PADDING,
        args.seed,
    )?;

    let kernel = args.kernel.kernel();
    log::info!("Running convolution...");
    log::info!("Kernel ({}):\n{}", args.kernel, kernel);

    let now = std::time::Instant::now();
    let filtered = filter::filter(&original, &kernel, strategy)?;
    let elapsed = now.elapsed();

    println!("{:.6}", elapsed.as_secs_f64());

    if !args.no_dump {
        let original_path = args.output_dir.join("original.dat");
        let filtered_path = args.output_dir.join("filtered.dat");
        dat::write_dat_file(&original_path, &original)?;
        dat::write_dat_file(&filtered_path, &filtered)?;
        log::info!(
            "Wrote {} and {}",
            original_path.display(),
            filtered_path.display()
        );
    }

    Ok(())
}
