// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use failure::{bail, format_err, Error, ResultExt};
use std::path::Path;
use std::process;
use std::time::Instant;
use tracing::{error, info};

extern crate clap;
extern crate image;

use clap::{App, Arg, ArgMatches};
use image::imageops::{resize, FilterType};
use seamcarver::logging::init_logging;
use seamcarver::{build_backend, energy_to_image, BackendKind, RasterImage, SeamBackend, SeamCarver};

fn app() -> App<'static, 'static> {
    App::new("seamcarver")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Narrow an image by removing its least interesting vertical seams")
        .arg(
            Arg::with_name("input")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .help("Where to write the carved image")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .short("w")
                .takes_value(true)
                .conflicts_with("columns")
                .help("Target width (default: half the input width)"),
        )
        .arg(
            Arg::with_name("columns")
                .long("columns")
                .short("c")
                .takes_value(true)
                .help("Number of columns to remove"),
        )
        .arg(
            Arg::with_name("backend")
                .long("backend")
                .short("b")
                .takes_value(true)
                .possible_values(&["sequential", "threaded"])
                .default_value("sequential")
                .help("How to compute energy maps and seams"),
        )
        .arg(
            Arg::with_name("workers")
                .long("workers")
                .takes_value(true)
                .help("Worker threads for the threaded backend (default: one per CPU)"),
        )
        .arg(
            Arg::with_name("baseline")
                .long("baseline")
                .takes_value(true)
                .help("Also write a plain bilinear resize to this path, for comparison"),
        )
        .arg(
            Arg::with_name("energy-map")
                .long("energy-map")
                .takes_value(true)
                .help("Also write the input's energy map as a grayscale image"),
        )
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .takes_value(true)
                .default_value("warn")
                .help("Log level (overridden by RUST_LOG)"),
        )
        .arg(
            Arg::with_name("json-log")
                .long("json-log")
                .help("Emit logs as JSON"),
        )
}

fn parse_number<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, Error> {
    match matches.value_of(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| format_err!("--{} expects a number, got '{}'", name, raw)),
    }
}

fn target_width(matches: &ArgMatches, width: u32) -> Result<u32, Error> {
    if let Some(columns) = parse_number::<u32>(matches, "columns")? {
        if columns >= width {
            bail!("cannot remove {} columns from an image {} wide", columns, width);
        }
        return Ok(width - columns);
    }
    Ok(parse_number::<u32>(matches, "width")?.unwrap_or(width / 2))
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let input = Path::new(matches.value_of("input").unwrap_or_default());
    let output = Path::new(matches.value_of("output").unwrap_or_default());
    let kind: BackendKind = matches.value_of("backend").unwrap_or("sequential").parse()?;
    let workers = parse_number::<usize>(matches, "workers")?;

    // Bring the backend up before doing any real work.
    let backend = build_backend(kind, workers)?;

    let decoded = image::open(input).with_context(|_| format!("cannot read {}", input.display()))?;
    let image = RasterImage::from_view(&decoded)?;
    let (width, height) = image.dimensions();
    let new_width = target_width(matches, width)?;
    info!(input = %input.display(), width, height, new_width, "loaded");

    if let Some(path) = matches.value_of("baseline") {
        let baseline = resize(&image.to_rgb_image(), new_width.max(1), height, FilterType::Triangle);
        baseline
            .save(path)
            .with_context(|_| format!("cannot write {}", path))?;
    }

    if let Some(path) = matches.value_of("energy-map") {
        energy_to_image(&backend.energy(&image))
            .save(path)
            .with_context(|_| format!("cannot write {}", path))?;
    }

    let begin = Instant::now();
    let carved = SeamCarver::new(backend).carve_to_width(image, new_width)?;
    info!(
        backend = %kind,
        seconds = begin.elapsed().as_secs_f64(),
        "carving finished"
    );

    carved
        .to_rgb_image()
        .save(output)
        .with_context(|_| format!("cannot write {}", output.display()))?;
    println!(
        "{}x{} -> {}x{}: {}",
        width,
        height,
        carved.width(),
        carved.height(),
        output.display()
    );
    Ok(())
}

fn main() {
    let matches = app().get_matches();
    init_logging(
        matches.value_of("log-level").unwrap_or("warn"),
        matches.is_present("json-log"),
    );

    if let Err(err) = run(&matches) {
        error!("{}", err);
        eprintln!("seamcarver: {}", err);
        for cause in err.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}
