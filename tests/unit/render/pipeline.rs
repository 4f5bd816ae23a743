use super::*;
use crate::config::MetadataConfig;
use crate::encode::sink::InMemoryChunkSink;
use crate::encode::tiff::TiffChunkSink;
use crate::foundation::core::Rgb8;
use crate::overlay::mask::{ClassColorMap, MaskCompositor};
use crate::overlay::metadata::MetadataOverlay;
use crate::overlay::text::TextEngine;
use crate::overlay::tracking::TrackingOverlay;
use crate::source::memory::{MemoryFrames, MemoryMasks};
use crate::source::{LabelMask, RawFrame, RawPixels};

fn plain_compositor() -> FrameCompositor {
    FrameCompositor::new(
        MaskCompositor::new(&ClassColorMap::new(), 0.3).unwrap(),
        TrackingOverlay::default(),
        MetadataOverlay::new(&MetadataConfig::default()),
        TextEngine::without_font(),
    )
}

fn sources(n: usize) -> (MemoryFrames, MemoryMasks) {
    let frames = (0..n)
        .map(|i| RawFrame::new(2, 2, RawPixels::Gray8(vec![i as u8; 4])).unwrap())
        .collect();
    let masks = (0..n).map(|_| LabelMask::filled(2, 2, 0)).collect();
    (
        MemoryFrames::new(frames).unwrap(),
        MemoryMasks::new(masks).unwrap(),
    )
}

fn pipeline(chunk_size: usize, output_frequency: u64) -> ChunkedPipeline {
    ChunkedPipeline::new(
        plain_compositor(),
        PipelineOpts {
            chunk_size,
            output_frequency,
            fps: 10.0,
        },
    )
    .unwrap()
}

#[test]
fn chunk_ranges_partition_the_sequence() {
    for num_frames in [0u64, 1, 2, 7, 10, 64, 1000, 1001] {
        for chunk_size in [1usize, 2, 3, 4, 10, 999, 1000, 5000] {
            let ranges: Vec<_> = chunk_ranges(num_frames, chunk_size).unwrap().collect();
            let mut expected_start = 0u64;
            for r in &ranges {
                assert_eq!(r.start.0, expected_start);
                assert!(r.end.0 > r.start.0);
                assert!(r.len_frames() <= chunk_size as u64);
                expected_start = r.end.0;
            }
            assert_eq!(expected_start, num_frames);
            assert_eq!(
                ranges.len() as u64,
                num_frames.div_ceil(chunk_size as u64)
            );
            assert_eq!(
                chunk_ranges(num_frames, chunk_size).unwrap().len(),
                ranges.len()
            );
        }
    }
}

#[test]
fn zero_chunk_size_is_rejected() {
    assert!(matches!(chunk_ranges(10, 0), Err(VizError::Config(_))));
    let opts = PipelineOpts {
        chunk_size: 0,
        ..PipelineOpts::default()
    };
    assert!(ChunkedPipeline::new(plain_compositor(), opts).is_err());
}

#[test]
fn run_hands_each_chunk_to_the_sink_in_order() {
    let (mut frames, mut masks) = sources(10);
    let mut sink = InMemoryChunkSink::new();
    let stats = pipeline(4, 100)
        .run(&mut frames, &mut masks, &mut sink)
        .unwrap();

    assert_eq!(stats.frames, 10);
    assert_eq!(stats.chunks, 3);
    assert!(sink.ended());
    assert_eq!(sink.config().map(|c| (c.width, c.height)), Some((2, 2)));

    let bounds: Vec<_> = sink
        .chunks()
        .iter()
        .map(|c| (c.range.start.0, c.range.end.0))
        .collect();
    assert_eq!(bounds, vec![(0, 4), (4, 8), (8, 10)]);

    let values: Vec<u8> = sink
        .chunks()
        .iter()
        .flat_map(|c| c.frames.iter().map(|f| f.data[0]))
        .collect();
    assert_eq!(values, (0..10).collect::<Vec<u8>>());
}

#[test]
fn progress_fires_at_the_configured_cadence() {
    let (mut frames, mut masks) = sources(10);
    let mut sink = InMemoryChunkSink::new();
    let mut seen = Vec::new();
    pipeline(4, 3)
        .run_with_progress(&mut frames, &mut masks, &mut sink, &mut |p| {
            assert_eq!(p.total, 10);
            seen.push(p.frame.0);
        })
        .unwrap();
    assert_eq!(seen, vec![0, 3, 6, 9]);
}

#[test]
fn empty_sequence_emits_no_chunks() {
    let (mut frames, mut masks) = sources(0);
    let mut sink = InMemoryChunkSink::new();
    let stats = pipeline(4, 100)
        .run(&mut frames, &mut masks, &mut sink)
        .unwrap();
    assert_eq!(stats, RunStats::default());
    assert!(sink.chunks().is_empty());
    assert!(sink.config().is_none());
}

#[test]
fn empty_sequence_succeeds_with_file_sinks() {
    let (mut frames, mut masks) = sources(0);
    let dir = std::env::temp_dir().join(format!(
        "cellvis_empty_run_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let mut sink = TiffChunkSink::new(&dir);
    let stats = pipeline(4, 100)
        .run(&mut frames, &mut masks, &mut sink)
        .unwrap();
    assert_eq!(stats, RunStats::default());
    assert!(!dir.exists());
}

#[test]
fn shape_mismatch_stops_before_the_sink_starts() {
    let (mut frames, _) = sources(5);
    let (_, mut masks) = sources(4);
    let mut sink = InMemoryChunkSink::new();
    let err = pipeline(4, 100)
        .run(&mut frames, &mut masks, &mut sink)
        .unwrap_err();
    assert!(matches!(err, VizError::ShapeMismatch(_)));
    assert!(sink.config().is_none());
}

#[test]
fn composite_chunk_returns_one_frame_per_index() {
    let (mut frames, mut masks) = sources(6);
    let range = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    let out = pipeline(4, 100)
        .composite_chunk(&mut frames, &mut masks, range)
        .unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].pixel(0, 0), Some(Rgb8::new(2, 2, 2)));
    assert_eq!(out[2].pixel(1, 1), Some(Rgb8::new(4, 4, 4)));
}
