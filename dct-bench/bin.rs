use std::collections::BTreeMap;
use std::hint::black_box;
use std::{io, time::Instant};
use strum::IntoEnumIterator;

use dct_denoise::{Denoiser, ImageBuffer};
use indicatif::ProgressBar;

mod suite;
mod util;
mod variants;

use crate::suite::{generate_test_suites, Test, VariantResult};
use crate::util::from_png;
use crate::variants::Variant;

// how many times to run each test (to get the minimum time)
static RUNS: usize = 3;

fn main() -> io::Result<()> {
    let mut args = std::env::args().skip(1);
    let root = args.next().unwrap_or_else(|| "images".to_string());
    let threshold = match args.next() {
        Some(arg) => arg.parse::<f64>().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid threshold {arg}: {e}"))
        })?,
        None => dct_denoise::denoise::DEFAULT_THRESHOLD,
    };

    let mut suites = generate_test_suites(&root);

    println!(
        " \x1b[1mRunning benchmarks\x1b[0m ({} runs per image, threshold {})",
        RUNS, threshold
    );

    for suite in suites.values_mut() {
        if suite.files.is_empty() {
            continue;
        }

        println!("┌──────────────────────────────────────────────────────┐");
        println!(
            "│ running tests for {suite_name: <34} │",
            suite_name = suite.name
        );
        println!("└──────────────────────────────────────────────────────┘");

        let pb = ProgressBar::new(suite.files.len() as u64);
        for file in suite.files.iter() {
            pb.inc(1);

            let input = std::fs::read(file)?;
            let (results, errored, samples) = match from_png(&input) {
                Ok(image) => {
                    let (results, errored) = run_test(&image, threshold);
                    (results, errored, image.pixels().len())
                }
                Err(e) => {
                    pb.println(format!("Error decoding {file}, skipping: {e}"));
                    (BTreeMap::new(), true, 0)
                }
            };

            suite.tests.push(Test {
                name: file.to_string(),
                samples,
                results,
                errored,
            });
        }
        pb.finish_and_clear()
    }

    println!("\n \x1b[1mResults\x1b[0m");

    for suite in suites.values() {
        let successfull_tests = suite
            .tests
            .iter()
            .filter(|t| !t.errored)
            .collect::<Vec<_>>();

        print_results(successfull_tests, &suite.name);
    }

    let all_tests = suites
        .values()
        .flat_map(|s| s.tests.iter())
        .filter(|t| !t.errored)
        .collect::<Vec<_>>();

    print_results(all_tests, "Overall");

    Ok(())
}

fn print_results(tests: Vec<&Test>, title: &str) {
    if tests.is_empty() {
        return;
    }

    println!("┌────────────────────────────────────────────┐");
    println!("│ {title: <42} │", title = title);
    println!("├──────────────┬────────┬──────────┬─────────┤");
    println!("│ variant      │ images │ time     │ changed │");
    println!("├──────────────┼────────┼──────────┼─────────┤");
    for variant in Variant::iter() {
        let ran = tests
            .iter()
            .filter_map(|t| t.results.get(&variant).map(|r| (t, r)))
            .collect::<Vec<_>>();

        let total_samples: usize = ran.iter().map(|(t, _)| t.samples).sum();
        let total_time: u128 = ran.iter().map(|(_, r)| r.min_time).sum();
        let total_changed: usize = ran.iter().map(|(_, r)| r.changed_samples).sum();

        let changed = if total_samples == 0 {
            0.0
        } else {
            total_changed as f64 / total_samples as f64
        };

        println!(
            "│ {variant: <12} │ {images: >6} │ {time: >6}ms │ {changed: >7.3} │",
            variant = variant,
            images = ran.len(),
            time = total_time / 1000,
            changed = changed
        );
    }
    println!("└──────────────┴────────┴──────────┴─────────┘");
}

fn run_test(image: &ImageBuffer, threshold: f64) -> (BTreeMap<Variant, VariantResult>, bool) {
    let mut results: BTreeMap<Variant, VariantResult> = BTreeMap::new();
    let mut errored = false;

    let pixels = image.width() as usize * image.height() as usize;

    for variant in Variant::iter().filter(|v| v.supports(pixels)) {
        let denoiser = Denoiser::new(variant.options(threshold));
        let mut shortest: u128 = u128::MAX;
        let mut output = image.clone();

        for r in 0..RUNS {
            let mut run = image.clone();
            let start = Instant::now();

            if let Err(e) = black_box(denoiser.denoise(black_box(&mut run))) {
                println!("Error running {variant}, skipping: {e}");
                errored = true;
                break;
            }

            shortest = std::cmp::min(shortest, start.elapsed().as_micros());
            if r == 0 {
                output = run;
            }
        }

        if shortest == u128::MAX {
            continue;
        }

        let changed_samples = output
            .pixels()
            .iter()
            .zip(image.pixels())
            .filter(|(a, b)| a != b)
            .count();

        results.insert(
            variant,
            VariantResult {
                min_time: shortest,
                changed_samples,
            },
        );
    }

    (results, errored)
}
