#![cfg(test)]
use super::*;

use std::io::Write;
use std::sync::Arc;

use anyhow::Error as AnyError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::NamedTempFile;

use crate::core::{self, Core, ResizeArgs};
use crate::filter::{plugin_init, AvsMotion, Params, METADATA};
use crate::keyframe::{MotionTrack, TrackPoint, SIGNATURE};
use crate::{map, offset, plugin};
use crate::plugins::Filter;
use crate::prelude::*;
use crate::software::{FrameList, SoftwareCore};
use crate::video_info::Resolution;

const WIDTH: usize = 8;
const HEIGHT: usize = 6;
const PAD_COLOR: i64 = 0xC8;

fn keyframe_data(rows: &[(f32, f32)]) -> String {
    let mut data = format!(
        "{}\n\nPosition\n\tUnits Per Second\t24\n\tFrame\tX pixels\tY pixels\tZ pixels\n",
        SIGNATURE
    );
    for (i, (x, y)) in rows.iter().enumerate() {
        data.push_str(&format!("\t{}\t{}\t{}\t0\n", i, x, y));
    }
    data.push_str("\nEnd of Keyframe Data\n");
    data
}

fn keyframe_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Sample at `(x, y)` of source frame `n`.
fn sample(n: usize, x: usize, y: usize) -> u8 {
    (x * 10 + y + n) as u8
}

/// A gray clip whose frames are distinguishable both spatially and temporally.
fn gradient_clip(frames: usize) -> Node {
    let frames = (0..frames)
        .map(|n| {
            Frame::from_fn(
                PresetFormat::Gray8.into(),
                Resolution {
                    width: WIDTH,
                    height: HEIGHT,
                },
                |_, x, y| f32::from(sample(n, x, y)),
            )
        })
        .collect();
    Node::new(FrameList::new(frames).unwrap())
}

/// Rows of source frame `n` moved by `(dx, dy)` whole pixels, `fill` uncovering the far side.
fn shifted(n: usize, dx: isize, dy: isize, fill: impl Fn(usize, usize) -> u8) -> Vec<Vec<u8>> {
    (0..HEIGHT)
        .map(|y| {
            (0..WIDTH)
                .map(|x| {
                    let src_x = x as isize - dx;
                    let src_y = y as isize - dy;
                    if (0..WIDTH as isize).contains(&src_x) && (0..HEIGHT as isize).contains(&src_y)
                    {
                        sample(n, src_x as usize, src_y as usize)
                    } else {
                        fill(src_x.clamp(0, WIDTH as isize - 1) as usize, y)
                    }
                })
                .collect()
        })
        .collect()
}

fn rows(frame: &Frame) -> Vec<Vec<u8>> {
    (0..frame.height(0))
        .map(|y| frame.plane_row::<u8>(0, y).to_vec())
        .collect()
}

/// A core lacking the crop function.
struct NoCropCore;

impl Core for NoCropCore {
    fn has_function(&self, name: &str) -> bool {
        name != core::CROP && SoftwareCore.has_function(name)
    }

    fn add_borders(
        &self,
        clip: &Node,
        left: usize,
        top: usize,
        right: usize,
        bottom: usize,
        color: i64,
    ) -> std::result::Result<Node, AnyError> {
        SoftwareCore.add_borders(clip, left, top, right, bottom, color)
    }

    fn resize(&self, clip: &Node, args: ResizeArgs) -> std::result::Result<Node, AnyError> {
        SoftwareCore.resize(clip, args)
    }

    fn crop(
        &self,
        _clip: &Node,
        _left: usize,
        _top: usize,
        _width: i64,
        _height: i64,
    ) -> std::result::Result<Node, AnyError> {
        anyhow::bail!("Crop isn't available")
    }
}

#[test]
fn parse_two_rows() {
    let file = keyframe_file(&keyframe_data(&[(10.0, 20.0), (15.0, 25.0)]));
    let track = MotionTrack::from_file(file.path()).unwrap();
    assert_eq!(
        track.points(),
        &[
            TrackPoint::new(10.0, 20.0, 0.0),
            TrackPoint::new(15.0, 25.0, 0.0)
        ][..]
    );

    let offset = offset::resolve(&track, 1, 0).unwrap();
    assert_eq!((offset.dx, offset.dy, offset.dz), (-5.0, -5.0, 0.0));
}

#[test]
fn integer_translation_with_borders() {
    let file = keyframe_file(&keyframe_data(&[(10.0, 20.0), (11.0, 20.0), (10.0, 22.0)]));
    let clip = gradient_clip(3);
    let filter = AvsMotion::new(
        &SoftwareCore,
        clip.clone(),
        Params {
            file: Some(file.path().to_owned()),
            frame_offset: 0,
            mirror: false,
            pad_color: PAD_COLOR,
        },
    )
    .unwrap();
    assert_eq!(filter.video_info(), clip.info());

    // The reference frame is passed through unchanged.
    let frame = filter.get_frame(&SoftwareCore, 0).unwrap();
    assert_eq!(frame, clip.get_frame(0).unwrap());

    // The point moved one pixel right and the content follows it.
    let border = |_, _| PAD_COLOR as u8;
    let frame = filter.get_frame(&SoftwareCore, 1).unwrap();
    assert_eq!(frame.resolution(0), clip.info().resolution);
    assert_eq!(rows(&frame), shifted(1, 1, 0, border));

    // The point moved two pixels down.
    let frame = filter.get_frame(&SoftwareCore, 2).unwrap();
    assert_eq!(rows(&frame), shifted(2, 0, 2, border));
}

#[test]
fn noise_follows_the_track() {
    let mut rng = StdRng::seed_from_u64(1);
    let frames = (0..2)
        .map(|_| {
            Frame::from_fn(
                PresetFormat::Gray8.into(),
                Resolution {
                    width: WIDTH,
                    height: HEIGHT,
                },
                |_, _, _| f32::from(rng.r#gen::<u8>()),
            )
        })
        .collect();
    let clip = Node::new(FrameList::new(frames).unwrap());
    let track = MotionTrack::from(vec![
        TrackPoint::new(0.0, 0.0, 0.0),
        TrackPoint::new(3.0, -2.0, 0.0),
    ]);
    let filter =
        AvsMotion::with_track(&SoftwareCore, clip.clone(), track, 0, false, PAD_COLOR).unwrap();

    let source = clip.get_frame(1).unwrap();
    let frame = filter.get_frame(&SoftwareCore, 1).unwrap();
    for y in 0..HEIGHT - 2 {
        assert_eq!(
            &frame.plane_row::<u8>(0, y)[3..],
            &source.plane_row::<u8>(0, y + 2)[..WIDTH - 3]
        );
    }
}

#[test]
fn mirror_skips_borders() {
    let clip = gradient_clip(2);
    let track = MotionTrack::from(vec![
        TrackPoint::new(10.0, 20.0, 0.0),
        TrackPoint::new(9.0, 20.0, 0.0),
    ]);
    let filter = AvsMotion::with_track(&SoftwareCore, clip.clone(), track, 0, true, PAD_COLOR)
        .unwrap();
    assert_eq!(filter.config().padded, clip.info().resolution);

    // No borders: the edge column is repeated instead.
    let frame = filter.get_frame(&SoftwareCore, 1).unwrap();
    assert_eq!(rows(&frame), shifted(1, -1, 0, |x, y| sample(1, x, y)));
}

#[test]
fn neutral_frame_outside_the_track() {
    let file = keyframe_file(&keyframe_data(&[(10.0, 20.0), (12.0, 21.0)]));
    let clip = gradient_clip(8);
    let filter = AvsMotion::new(
        &SoftwareCore,
        clip.clone(),
        Params {
            file: Some(file.path().to_owned()),
            frame_offset: 5,
            ..Params::default()
        },
    )
    .unwrap();

    let first = clip.get_frame(0).unwrap();
    assert_eq!(filter.get_frame(&SoftwareCore, 2).unwrap(), first);
    assert_eq!(filter.get_frame(&SoftwareCore, 7).unwrap(), first);

    // Frame 5 is the reference and keeps its own content.
    assert_eq!(
        filter.get_frame(&SoftwareCore, 5).unwrap(),
        clip.get_frame(5).unwrap()
    );
}

#[test]
fn construction_errors() {
    let params = |contents: &str| {
        let file = keyframe_file(contents);
        let params = Params {
            file: Some(file.path().to_owned()),
            ..Params::default()
        };
        (file, params)
    };

    let (_file, malformed) = params(&format!(
        "{}\nPosition\n\theader\n\theader\n\t0\t1\t2\t3\n\t1\t1\t2\n",
        SIGNATURE
    ));
    let err = AvsMotion::new(&SoftwareCore, gradient_clip(1), malformed)
        .err()
        .unwrap();
    assert!(matches!(err, Error::MalformedKeyframeRow { line: 6, .. }));

    let (_file, unsigned) = params("Position\n\theader\n\theader\n\t0\t1\t2\t3\n");
    let err = AvsMotion::new(&SoftwareCore, gradient_clip(1), unsigned)
        .err()
        .unwrap();
    assert!(matches!(err, Error::InvalidSignature));

    let (_file, empty) = params("");
    let err = AvsMotion::new(&SoftwareCore, gradient_clip(1), empty)
        .err()
        .unwrap();
    assert!(matches!(err, Error::EmptyOrUnreadableFile { source: None, .. }));
}

#[test]
fn missing_host_function_is_checked_first() {
    let params = Params {
        file: Some("/nonexistent/track.txt".into()),
        ..Params::default()
    };
    let err = AvsMotion::new(&NoCropCore, gradient_clip(1), params)
        .err()
        .unwrap();
    match err {
        Error::MissingRequiredHostFunction(names) => assert!(names.contains(&core::CROP)),
        err => panic!("unexpected error: {}", err),
    }

    let err = AvsMotion::new(&NoCropCore, gradient_clip(1), Params::default())
        .err()
        .unwrap();
    assert!(matches!(err, Error::MissingRequiredHostFunction(_)));
}

#[test]
fn invoke_through_plugin() {
    let core: Arc<dyn Core> = Arc::new(SoftwareCore);
    let mut plugin = Plugin::new(METADATA);
    plugin_init(&mut plugin).unwrap();
    assert_eq!(plugin.metadata().namespace, "avsmotion");

    let file = keyframe_file(&keyframe_data(&[(10.0, 20.0), (11.0, 20.0)]));
    let clip = gradient_clip(4);

    let mut args = Map::new();
    args.set_node("clip", &clip);
    args.set_data("file", file.path().to_str().unwrap().as_bytes());
    args.set_int("offset", 2);
    args.set_int("pad_color", PAD_COLOR);

    let node = plugin.invoke(&core, "AvsMotion", &args).unwrap();
    assert_eq!(node.info(), clip.info());
    assert_eq!(node.get_frame(0).unwrap(), clip.get_frame(0).unwrap());
    assert_eq!(node.get_frame(2).unwrap(), clip.get_frame(2).unwrap());
    assert_eq!(
        rows(&node.get_frame(3).unwrap()),
        shifted(3, 1, 0, |_, _| PAD_COLOR as u8)
    );
    assert!(matches!(
        node.get_frame(4),
        Err(GetFrameError::OutOfRange { n: 4, .. })
    ));
}

#[test]
fn invoke_errors() {
    let core: Arc<dyn Core> = Arc::new(SoftwareCore);
    let mut plugin = Plugin::new(METADATA);
    plugin_init(&mut plugin).unwrap();

    let err = plugin
        .invoke(&core, "Stabilize", &Map::new())
        .err()
        .unwrap();
    assert_eq!(
        err.downcast_ref::<plugin::Error>(),
        Some(&plugin::Error::NoSuchFunction("Stabilize".to_owned()))
    );

    let mut args = Map::new();
    args.set_node("clip", &gradient_clip(1));
    args.set_int("file", 3);
    let err = plugin.invoke(&core, "AvsMotion", &args).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::Argument {
            name: "file",
            source: map::Error::WrongValueType
        })
    ));

    let err = plugin.invoke(&core, "AvsMotion", &Map::new()).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::Argument {
            name: "clip",
            source: map::Error::KeyNotFound
        })
    ));

    args.delete_key("file").unwrap();
    let err = plugin.invoke(&core, "AvsMotion", &args).err().unwrap();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::MissingFilePath)));
}
