// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use clap::Parser;
use color_eyre::eyre::{WrapErr, bail};
use jpeg::decode::{DecodeOptions, DecodedImage, decode_with_options};
use jpeg::idct::Idct;
use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser)]
struct Opt {
    /// Input JPEG file
    input: PathBuf,

    /// Output image file, should end in .ppm or .png
    output: PathBuf,

    /// Use the floating-point IDCT instead of the fixed-point one
    #[clap(long)]
    float_idct: bool,
}

fn save_ppm(image: &DecodedImage, path: &PathBuf) -> color_eyre::Result<()> {
    let mut bytes = format!("P6\n{} {}\n255\n", image.width, image.height).into_bytes();
    bytes.extend_from_slice(&image.rgb);
    fs::write(path, bytes).wrap_err("cannot write PPM output")
}

fn save_png(image: &DecodedImage, path: &PathBuf) -> color_eyre::Result<()> {
    let file = fs::File::create(path).wrap_err("cannot create PNG output")?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        image.width as u32,
        image.height as u32,
    );
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.rgb)?;
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let opt = Opt::parse();
    let data = fs::read(&opt.input).wrap_err("cannot open input file")?;

    let options = DecodeOptions {
        idct: if opt.float_idct {
            Idct::Float
        } else {
            Idct::Fixed
        },
    };
    let image = decode_with_options(&data, &options)
        .wrap_err_with(|| format!("cannot decode {}", opt.input.display()))?;
    println!("Image size: {} x {}", image.width, image.height);

    let out = String::from(opt.output.to_string_lossy());
    if out.ends_with(".ppm") {
        save_ppm(&image, &opt.output)
    } else if out.ends_with(".png") {
        save_png(&image, &opt.output)
    } else {
        bail!("output format not supported: {out}");
    }
}
