// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tourline CLI entrypoint.
//!
//! Reads an optimizer route payload (a file, or stdin for `-`/no argument) and plays it back in
//! the terminal. `--dump` prints the final scene as JSON instead; `--schema` prints the scene's
//! JSON schema.

use std::error::Error;
use std::fs;
use std::io::{self, Read};

use tourline::layout::{HeuristicMetrics, LayoutMode, LayoutOptions, LayoutState, Surface};
use tourline::model::{parse_route_payload, RouteLoad};
use tourline::playback::PlaybackController;
use tourline::render::{build_scene, scene_schema, RenderMode};
use tourline::tui::TuiOptions;

const LOG_ENV: &str = "TOURLINE_LOG";
const DUMP_FRAME_MS: f64 = 16.0;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<route.json>|-] [--uniform] [--static] [--speed <x>] [--seed <n>] [--pad <px>] [--log-file <path>]\n  {program} [<route.json>|-] --dump [--size <W>x<H>] [--uniform] [--static] [--speed <x>] [--seed <n>] [--pad <px>]\n  {program} --schema\n\nWithout a route file (or with `-`) the payload is read from stdin.\n--uniform starts in the uniform-edge-length layout; --static draws every stop at once.\n--dump plays the route headlessly and prints the final scene as JSON (default size 800x600).\n\nLogging is controlled by {LOG_ENV} (default `warn`). The TUI only logs when --log-file is given."
    );
}

#[derive(Debug, Default, Clone, PartialEq)]
struct CliOptions {
    input: Option<String>,
    uniform: bool,
    static_view: bool,
    size: Option<(f64, f64)>,
    pad: Option<f64>,
    speed: Option<f64>,
    seed: Option<u64>,
    dump: bool,
    schema: bool,
    log_file: Option<String>,
}

fn parse_size(raw: &str) -> Option<(f64, f64)> {
    let (w, h) = raw.split_once(['x', 'X'])?;
    let w: f64 = w.trim().parse().ok()?;
    let h: f64 = h.trim().parse().ok()?;
    (w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0).then_some((w, h))
}

fn parse_positive(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite() && *value > 0.0)
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    fn set_flag(flag: &mut bool) -> Result<(), ()> {
        if *flag {
            return Err(());
        }
        *flag = true;
        Ok(())
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--uniform" => set_flag(&mut options.uniform)?,
            "--static" => set_flag(&mut options.static_view)?,
            "--dump" => set_flag(&mut options.dump)?,
            "--schema" => set_flag(&mut options.schema)?,
            "--size" => {
                if options.size.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.size = Some(parse_size(&raw).ok_or(())?);
            }
            "--pad" => {
                if options.pad.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let pad: f64 = raw.parse().map_err(|_| ())?;
                if !pad.is_finite() || pad < 0.0 {
                    return Err(());
                }
                options.pad = Some(pad);
            }
            "--speed" => {
                if options.speed.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.speed = Some(parse_positive(&raw).ok_or(())?);
            }
            "--seed" => {
                if options.seed.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.seed = Some(raw.parse().map_err(|_| ())?);
            }
            "--log-file" => {
                if options.log_file.is_some() {
                    return Err(());
                }
                options.log_file = Some(args.next().ok_or(())?);
            }
            "-" => {
                if options.input.is_some() {
                    return Err(());
                }
                options.input = Some(arg);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.input.is_some() {
                    return Err(());
                }
                options.input = Some(arg);
            }
        }
    }

    if options.schema && (options.dump || options.input.is_some()) {
        return Err(());
    }
    // The terminal decides the size interactively.
    if options.size.is_some() && !options.dump {
        return Err(());
    }

    Ok(options)
}

fn init_logging(options: &CliOptions) -> Result<(), Box<dyn Error>> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn"));

    match options.log_file.as_deref() {
        Some(path) => {
            let file = fs::File::create(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        // stderr belongs to the alternate screen while the TUI runs.
        None if !options.dump => return Ok(()),
        None => {}
    }

    builder.try_init()?;
    Ok(())
}

fn read_input(input: Option<&str>) -> Result<String, Box<dyn Error>> {
    match input {
        Some(path) if path != "-" => Ok(fs::read_to_string(path)?),
        _ => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

fn layout_options(options: &CliOptions) -> LayoutOptions {
    let mut layout = LayoutOptions::default();
    if let Some(seed) = options.seed {
        layout.resolver.seed = seed;
    }
    layout
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "tourline".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if options.schema {
            println!("{}", serde_json::to_string_pretty(&scene_schema())?);
            return Ok(());
        }

        init_logging(&options)?;

        let raw = read_input(options.input.as_deref())?;
        let route = match parse_route_payload(&raw)? {
            RouteLoad::Ready(route) => route,
            RouteLoad::Empty => {
                println!("No route to show: the payload contains no usable stops.");
                return Ok(());
            }
        };

        let layout_mode =
            if options.uniform { LayoutMode::Uniform } else { LayoutMode::Geographic };
        let render_mode =
            if options.static_view { RenderMode::Static } else { RenderMode::Progressive };
        let speed = options.speed.unwrap_or(1.0);
        let defaults = Surface::default();
        let pad = options.pad.unwrap_or(defaults.pad());

        if options.dump {
            let (width, height) = options.size.unwrap_or((defaults.width(), defaults.height()));
            let surface = Surface::new(width, height, pad)?;
            let layout = LayoutState::compute(
                &route,
                surface,
                layout_mode,
                layout_options(&options),
                &HeuristicMetrics,
            );
            let mut playback = PlaybackController::new(&route);
            playback.set_speed(speed)?;
            if render_mode == RenderMode::Progressive {
                playback.run_to_end(&layout, DUMP_FRAME_MS);
            }
            let scene = build_scene(&route, &layout, &playback, render_mode);
            println!("{}", serde_json::to_string_pretty(&scene)?);
            return Ok(());
        }

        tourline::tui::run(
            route,
            TuiOptions { layout_mode, render_mode, layout: layout_options(&options), pad, speed },
        )
    })();

    if let Err(err) = result {
        eprintln!("tourline: {err}");
        std::process::exit(1);
    }
}
