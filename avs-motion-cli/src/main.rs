use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Error};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use avs_motion::filter::{self, METADATA};
use avs_motion::frame::{Frame, FrameRef};
use avs_motion::keyframe::MotionTrack;
use avs_motion::node::{FrameSource, GetFrameError};
use avs_motion::offset::{self, Offset};
use avs_motion::prelude::*;
use avs_motion::software::{SoftwareCore, DEFAULT_FRAMERATE};
use avs_motion::video_info::{Resolution, VideoInfo};

/// A gray clip of uniform noise, reproducible from a seed.
struct RandomNoise {
    info: VideoInfo,
    seed: u64,
}

impl RandomNoise {
    fn new(resolution: Resolution, num_frames: usize, seed: u64) -> Self {
        Self {
            info: VideoInfo {
                format: PresetFormat::Gray8.into(),
                framerate: DEFAULT_FRAMERATE,
                resolution,
                num_frames,
            },
            seed,
        }
    }
}

impl FrameSource for RandomNoise {
    fn info(&self) -> VideoInfo {
        self.info
    }

    fn get_frame(&self, n: usize) -> Result<FrameRef, GetFrameError> {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(n as u64));
        Ok(Arc::new(Frame::from_fn(
            self.info.format,
            self.info.resolution,
            |_, _, _| f32::from(rng.r#gen::<u8>()),
        )))
    }
}

fn parse_color(value: &str) -> Result<i64, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix('#')) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|err| format!("invalid color `{}`: {}", value, err))
}

fn format_offset(offset: Option<Offset>) -> String {
    match offset {
        Some(Offset { dx, dy, dz }) => format!("({:.3}, {:.3}, {:.3})", dx, dy, dz),
        None => "neutral".to_owned(),
    }
}

/// Number of output frames covering the whole track.
fn default_frame_count(track: &MotionTrack, frame_offset: i64) -> usize {
    track.len() + usize::try_from(frame_offset).unwrap_or(0)
}

fn load_track(matches: &ArgMatches) -> Result<(PathBuf, MotionTrack), Error> {
    let file = matches
        .get_one::<PathBuf>("file")
        .ok_or_else(|| anyhow!("no motion file given"))?
        .clone();
    let track = MotionTrack::from_file(&file)
        .with_context(|| format!("Couldn't load the motion track from {}", file.display()))?;
    info!(file = %file.display(), frames = track.len(), "loaded motion track");
    Ok((file, track))
}

fn print_offsets(matches: &ArgMatches) -> Result<(), Error> {
    let (_, track) = load_track(matches)?;
    let frame_offset = matches.get_one::<i64>("offset").copied().unwrap_or(0);
    let frames = matches
        .get_one::<usize>("frames")
        .copied()
        .unwrap_or_else(|| default_frame_count(&track, frame_offset));

    for n in 0..frames {
        let offset = i64::try_from(n)
            .ok()
            .and_then(|n| offset::resolve(&track, n, frame_offset));
        println!("{}\t{}", n, format_offset(offset));
    }

    Ok(())
}

fn render(matches: &ArgMatches) -> Result<(), Error> {
    let (file, track) = load_track(matches)?;
    let frame_offset = matches.get_one::<i64>("offset").copied().unwrap_or(0);
    let frames = matches
        .get_one::<usize>("frames")
        .copied()
        .unwrap_or_else(|| default_frame_count(&track, frame_offset));
    if frames == 0 {
        return Err(anyhow!("Nothing to render: the clip would have no frames"));
    }

    let resolution = Resolution {
        width: matches.get_one::<usize>("width").copied().unwrap_or(640),
        height: matches.get_one::<usize>("height").copied().unwrap_or(360),
    };
    let seed = matches.get_one::<u64>("seed").copied().unwrap_or(0);
    let mirror = matches.get_one::<bool>("mirror").copied().unwrap_or(false);
    let pad_color = matches.get_one::<i64>("pad-color").copied().unwrap_or(0);

    let core: Arc<dyn Core> = Arc::new(SoftwareCore);
    let mut plugin = Plugin::new(METADATA);
    filter::plugin_init(&mut plugin)?;

    let clip = Node::new(RandomNoise::new(resolution, frames, seed));
    let mut args = Map::new();
    args.set_node("clip", &clip);
    args.set_data("file", file.to_string_lossy().as_bytes());
    args.set_int("offset", frame_offset);
    args.set_int("mirror", i64::from(mirror));
    args.set_int("pad_color", pad_color);

    let node = plugin
        .invoke(&core, "AvsMotion", &args)
        .context("Couldn't create the filter")?;
    info!(
        width = resolution.width,
        height = resolution.height,
        frames,
        "rendering"
    );

    for n in 0..frames {
        let frame = node
            .get_frame(n)
            .with_context(|| format!("Couldn't get frame {}", n))?;
        let plane = frame.plane_f32(0);
        let mean = plane.iter().map(|&x| f64::from(x)).sum::<f64>() / plane.len() as f64;

        let offset = i64::try_from(n)
            .ok()
            .and_then(|n| offset::resolve(&track, n, frame_offset));
        println!("{}\t{}\tmean {:.3}", n, format_offset(offset), mean);
    }

    Ok(())
}

/// Formats an error with its cause chain.
fn error_report(err: &Error) -> String {
    format!("Error: {:?}", err)
}

fn run() -> Result<(), Error> {
    let file_arg = || {
        Arg::new("file")
            .help("After Effects 6.0 keyframe data file")
            .required(true)
            .value_parser(value_parser!(PathBuf))
    };
    let offset_arg = || {
        Arg::new("offset")
            .long("offset")
            .help("Output frame the first tracked frame lands on")
            .action(ArgAction::Set)
            .allow_hyphen_values(true)
            .value_parser(value_parser!(i64))
    };
    let frames_arg = || {
        Arg::new("frames")
            .long("frames")
            .help("Number of output frames [default: covers the whole track]")
            .action(ArgAction::Set)
            .value_parser(value_parser!(usize))
    };

    let matches = Command::new("avs-motion")
        .about("Moves a clip along an After Effects motion track")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("offsets")
                .about("Prints the offset applied to every output frame")
                .arg(file_arg())
                .arg(offset_arg())
                .arg(frames_arg()),
        )
        .subcommand(
            Command::new("render")
                .about("Runs the filter over a noise clip and prints per-frame statistics")
                .arg(file_arg())
                .arg(offset_arg())
                .arg(frames_arg())
                .arg(
                    Arg::new("width")
                        .long("width")
                        .action(ArgAction::Set)
                        .default_value("640")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("height")
                        .long("height")
                        .action(ArgAction::Set)
                        .default_value("360")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("mirror")
                        .long("mirror")
                        .help("Don't add borders, the clip is already padded")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("pad-color")
                        .long("pad-color")
                        .help("Border color as a packed integer, e.g. 0x808080")
                        .action(ArgAction::Set)
                        .default_value("0")
                        .value_parser(parse_color),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed of the noise clip")
                        .action(ArgAction::Set)
                        .default_value("0")
                        .value_parser(value_parser!(u64)),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("offsets", matches)) => print_offsets(matches),
        Some(("render", matches)) => render(matches),
        _ => unreachable!(),
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{}", error_report(&err));
        std::process::exit(1);
    }
}
