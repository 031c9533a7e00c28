mod args;

use anyhow::{Context, Result};
use clap::Parser;
use edge_frame::frame_pipeline::{
    FrameDimensions, FrameDump, FrameProcessor, FrameRateMeter, ProcessorConfig,
    TiffFrameWriter, export_file,
};
use edge_frame::logger;
use tracing::{debug, info, warn};

use crate::args::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    info!("Starting edge-frame...");

    let config = ProcessorConfig::builder()
        .chroma_order(args.chroma_order)
        .blur_kernel_size(args.blur_kernel_size)
        .blur_sigma(args.blur_sigma)
        .thresholds(args.low_threshold, args.high_threshold)
        .gradient_norm(args.gradient_norm())
        .build();
    let processor = FrameProcessor::new(config).context("invalid processor configuration")?;

    info!(
        chroma_order = %processor.config().chroma_order,
        low = processor.config().low_threshold,
        high = processor.config().high_threshold,
        "Frame processor initialized"
    );

    let dimensions = FrameDimensions::new(args.width, args.height)?;
    let dump = FrameDump::read(&args.input, dimensions)?;
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("failed to create {}", args.output_dir.display()))?;

    let writer = TiffFrameWriter::new(args.compression.into());
    let mut meter = FrameRateMeter::new();
    let (mut written, mut dropped) = (0usize, 0usize);

    for (index, raw) in dump.frames().enumerate() {
        let (frame, timings) =
            match processor.process_with_timings(Some(raw), args.width, args.height) {
                Ok(processed) => processed,
                Err(e) => {
                    warn!(index, error = %e, "Dropping frame");
                    dropped += 1;
                    continue;
                }
            };

        if args.timings {
            timings.log_summary();
        }
        debug!(index, edge_pixels = frame.edge_pixel_count(), "Frame processed");

        let path = args.output_dir.join(format!("frame_{index:05}.tiff"));
        export_file(&writer, &frame, &path)
            .with_context(|| format!("failed to export frame {index}"))?;
        written += 1;

        if let Some(fps) = meter.tick() {
            info!("Processing rate: {:.1} fps", fps);
        }
    }

    info!(written, dropped, dimensions = %dimensions, "Done");
    Ok(())
}
