use super::*;
use crate::foundation::core::{FrameIndex, FrameRange, Rgb8};
use crate::render::frame::RgbFrame;
use crate::source::tiff_stack::TiffStack;
use crate::source::{FrameSource, RawPixels};

fn temp_dir(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("cellvis_{tag}_{}_{nanos}", std::process::id()))
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 3,
        height: 2,
        fps: 10.0,
    }
}

#[test]
fn chunk_round_trips_through_tiff_stack() {
    let dir = temp_dir("tiff_sink");
    let mut sink = TiffChunkSink::new(&dir);
    sink.begin(&cfg()).unwrap();

    let range = FrameRange::new(FrameIndex(4), FrameIndex(6)).unwrap();
    let frames = vec![
        RgbFrame::filled(3, 2, Rgb8::new(255, 0, 0)),
        RgbFrame::filled(3, 2, Rgb8::new(1, 2, 3)),
    ];
    let artifacts = sink
        .write_chunk(&ChunkBatch {
            range,
            frames: frames.clone(),
        })
        .unwrap();
    sink.end().unwrap();

    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].path, dir.join("chunk_4_6.tiff"));
    assert!(artifacts[0].bytes > 0);
    assert!(!dir.join("chunk_4_6.tiff.part").exists());

    let mut stack = TiffStack::open(&artifacts[0].path).unwrap();
    assert_eq!(stack.frame_count(), 2);
    for (i, want) in frames.iter().enumerate() {
        let page = stack.read_frame(i).unwrap();
        assert_eq!(page.pixels, RawPixels::Rgb8(want.data.clone()));
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unstarted_sink_fails() {
    let mut sink = TiffChunkSink::new(temp_dir("tiff_cold"));
    let batch = ChunkBatch {
        range: FrameRange::new(FrameIndex(0), FrameIndex(1)).unwrap(),
        frames: vec![RgbFrame::filled(3, 2, Rgb8::WHITE)],
    };
    assert!(sink.write_chunk(&batch).is_err());
}

#[test]
fn large_chunks_switch_to_bigtiff() {
    assert!(!needs_bigtiff(2, 3, 2));
    assert!(!needs_bigtiff(1000, 1000, 1000));
    assert!(needs_bigtiff(1000, 1200, 1200));
    assert!(needs_bigtiff(1, 40_000, 40_000));
    assert!(!needs_bigtiff(0, 40_000, 40_000));
    assert!(needs_bigtiff(usize::MAX, 1, 1));
}

#[test]
fn bigtiff_pages_read_back() {
    let dir = temp_dir("bigtiff");
    std::fs::create_dir_all(&dir).unwrap();
    let part = dir.join("chunk_0_2.tiff");
    let frames = vec![
        RgbFrame::filled(3, 2, Rgb8::new(9, 8, 7)),
        RgbFrame::filled(3, 2, Rgb8::new(0, 128, 255)),
    ];
    let batch = ChunkBatch {
        range: FrameRange::new(FrameIndex(0), FrameIndex(2)).unwrap(),
        frames: frames.clone(),
    };
    write_pages(&part, &batch, true).unwrap();

    let head = std::fs::read(&part).unwrap();
    // BigTIFF version number is 43 where classic TIFF has 42.
    assert_eq!(&head[2..4], &[43, 0]);

    let mut stack = TiffStack::open(&part).unwrap();
    assert_eq!(stack.frame_count(), 2);
    for (i, want) in frames.iter().enumerate() {
        let page = stack.read_frame(i).unwrap();
        assert_eq!(page.pixels, RawPixels::Rgb8(want.data.clone()));
    }

    let _ = std::fs::remove_dir_all(&dir);
}
