// src/main.rs

//! Command-line front end: encode, decode, inspect and demo.

use clap::{Args, Parser, Subcommand};
use haar_rice::image::color::rgb_to_ycbcr_planes;
use haar_rice::image::quality::psnr;
use haar_rice::image::synthetic::synthetic_rgb;
use haar_rice::image::{ColorMode, compress_image, decompress_image, load_planes, save_planes};
use haar_rice::{CompressParams, Header, Result, compress, decompress};
use image::DynamicImage;
use log::{debug, error};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "haar_rice", version, about = "Haar wavelet + Rice coding image compressor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Copy)]
struct CodecArgs {
    /// Number of wavelet decomposition levels
    #[arg(long, default_value_t = 1)]
    levels: u8,
    /// Quantization step for the detail bands
    #[arg(long, default_value_t = 10.0)]
    qstep: f32,
    /// Values per Rice block
    #[arg(long = "block-size", default_value_t = 32)]
    block_size: u32,
}

impl From<CodecArgs> for CompressParams {
    fn from(args: CodecArgs) -> Self {
        CompressParams {
            levels: args.levels,
            qstep: args.qstep,
            block_size: args.block_size,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress an image file into a container
    Encode {
        infile: PathBuf,
        outfile: PathBuf,
        #[command(flatten)]
        codec: CodecArgs,
        /// Keep colour (Y, Cb, Cr planes) instead of converting to grayscale
        #[arg(long)]
        color: bool,
    },
    /// Decompress a container into an image file
    Decode { infile: PathBuf, outfile: PathBuf },
    /// Print the header of a container
    Info { infile: PathBuf },
    /// Round-trip an image (or a generated one) and report size and PSNR
    Demo {
        infile: Option<PathBuf>,
        #[command(flatten)]
        codec: CodecArgs,
    },
}

fn encode(infile: &Path, outfile: &Path, params: CompressParams, mode: ColorMode) -> Result<()> {
    let planes = load_planes(infile, mode)?;
    let container = compress(&planes, &params)?;
    fs::write(outfile, &container)?;
    println!("Wrote {} ({} bytes)", outfile.display(), container.len());
    Ok(())
}

fn decode(infile: &Path, outfile: &Path) -> Result<()> {
    let container = fs::read(infile)?;
    let planes = decompress(&container)?;
    save_planes(&planes, outfile)?;
    println!("Wrote {}", outfile.display());
    Ok(())
}

fn show_header(infile: &Path) -> Result<()> {
    let container = fs::read(infile)?;
    let h = Header::parse(&container)?;
    println!("version:    {}", h.version);
    println!("size:       {}x{}", h.width, h.height);
    println!("levels:     {}", h.levels);
    println!("channels:   {}", h.channels);
    println!("qstep:      {}", h.qstep);
    println!("block size: {}", h.block_size);
    println!("bytes:      {}", container.len());
    Ok(())
}

fn demo(infile: Option<&Path>, params: CompressParams) -> Result<()> {
    let src = match infile {
        Some(path) => image::open(path)?.to_rgb8(),
        None => {
            println!("Using generated test image");
            synthetic_rgb(256, 256)
        }
    };
    let original_size = src.as_raw().len();

    let input = DynamicImage::ImageRgb8(src.clone());
    let container = compress_image(&input, ColorMode::Color, &params)?;
    let rec = decompress_image(&container)?.to_rgb8();

    let [y_src, _, _] = rgb_to_ycbcr_planes(&src);
    let [y_rec, _, _] = rgb_to_ycbcr_planes(&rec);
    let value = psnr(&y_src, &y_rec)?;

    println!("Original bytes: {}", original_size);
    println!("Compressed bytes: {}", container.len());
    println!("PSNR (Y): {:.2} dB", value);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    debug!("{:?}", cli.command);
    let result = match &cli.command {
        Command::Encode {
            infile,
            outfile,
            codec,
            color,
        } => {
            let mode = if *color { ColorMode::Color } else { ColorMode::Gray };
            encode(infile, outfile, (*codec).into(), mode)
        }
        Command::Decode { infile, outfile } => decode(infile, outfile),
        Command::Info { infile } => show_header(infile),
        Command::Demo { infile, codec } => demo(infile.as_deref(), (*codec).into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
