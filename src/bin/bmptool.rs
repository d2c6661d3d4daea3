//! Inspect and generate 24-bit BMP files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use zenbmp::{BitmapImage, Pixel, probe};

#[derive(Parser)]
#[command(version, about = "Inspect and generate 24-bit BMP files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the header fields of a bitmap, then decode it
    Info { path: PathBuf },
    /// Write a deterministic noise image
    Synth {
        path: PathBuf,
        #[arg(long, default_value_t = 64)]
        width: u32,
        #[arg(long, default_value_t = 64)]
        height: u32,
        #[arg(long, default_value_t = 0x2545_f491)]
        seed: u32,
    },
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Info { path } => info(&path),
        Command::Synth {
            path,
            width,
            height,
            seed,
        } => synth(&path, width, height, seed),
    }
}

fn info(path: &Path) -> anyhow::Result<()> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let header = probe(&data).with_context(|| format!("parsing {}", path.display()))?;

    println!("file size:        {}", header.file_size);
    println!("data offset:      {}", header.data_offset);
    println!("header size:      {}", header.info_size);
    println!("width:            {}", header.width);
    println!("height:           {}", header.height);
    println!("planes:           {}", header.planes);
    println!("bit depth:        {}", header.bit_depth);
    println!("compression:      {}", header.compression);
    println!("data size:        {}", header.image_size);
    println!("x pixels/meter:   {}", header.x_pixels_per_meter);
    println!("y pixels/meter:   {}", header.y_pixels_per_meter);
    println!("colors used:      {}", header.colors_used);
    println!("important colors: {}", header.important_colors);

    let mut image = BitmapImage::from_bytes(&data)
        .with_context(|| format!("decoding {}", path.display()))?;
    let count = image.decode_pixels()?.len();
    println!("row order:        {:?}", image.row_order());
    println!("stride:           {}", image.stride());
    println!("pixels:           {count}");
    Ok(())
}

/// Largest image `synth` will generate, in pixels (768 MiB of pixel data).
const MAX_SYNTH_PIXELS: u64 = 1 << 28;

fn synth(path: &Path, width: u32, height: u32, seed: u32) -> anyhow::Result<()> {
    let pixels = noise(width, height, seed)?;
    BitmapImage::create(width, height, pixels)?
        .write(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("wrote {width}x{height} to {}", path.display());
    Ok(())
}

fn noise(width: u32, height: u32, seed: u32) -> anyhow::Result<Vec<Pixel>> {
    let count = u64::from(width) * u64::from(height);
    anyhow::ensure!(
        count <= MAX_SYNTH_PIXELS,
        "{width}x{height} is {count} pixels, synth is limited to {MAX_SYNTH_PIXELS}"
    );

    // xorshift32 has a fixed point at zero
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };
    Ok((0..count)
        .map(|_| {
            let [r, g, b, _] = next().to_le_bytes();
            Pixel::new(r, g, b)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_deterministic() {
        let a = noise(7, 3, 42).unwrap();
        assert_eq!(a.len(), 21);
        assert_eq!(a, noise(7, 3, 42).unwrap());
        assert_ne!(a, noise(7, 3, 43).unwrap());
    }

    #[test]
    fn oversized_noise_is_rejected_before_generating() {
        assert!(noise(100_000, 100_000, 1).is_err());
        assert!(noise(u32::MAX, u32::MAX, 1).is_err());
    }

    #[test]
    fn zero_size_noise_is_left_to_create() {
        let pixels = noise(0, 5, 1).unwrap();
        assert!(pixels.is_empty());
        assert!(BitmapImage::create(0, 5, pixels).is_err());
    }
}
