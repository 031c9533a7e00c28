use std::path::PathBuf;

use clap::Parser;
use edge_frame::frame_pipeline::{ChromaOrder, GradientNorm, TiffCompression};

/// Output TIFF compression.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum CompressionSetting {
    /// Uncompressed
    None,
    /// LZW
    Lzw,
    /// Deflate, balanced level
    Deflate,
}

impl From<CompressionSetting> for TiffCompression {
    fn from(value: CompressionSetting) -> Self {
        match value {
            CompressionSetting::None => TiffCompression::None,
            CompressionSetting::Lzw => TiffCompression::Lzw,
            CompressionSetting::Deflate => TiffCompression::Deflate,
        }
    }
}

/// Command-line arguments for the edge-frame tool.
///
/// Reads a dump of one or more concatenated semi-planar frames and writes one
/// edge-map TIFF per frame.
///
/// # Example
///
/// ```bash
/// edge-frame capture.nv21 --width 640 --height 480 --output-dir edges
///
/// # NV12 source via environment
/// export CHROMA_ORDER=nv12
/// edge-frame capture.yuv --width 1280 --height 720
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Raw frame dump (frames of width * height * 3 / 2 bytes back to back)
    pub input: PathBuf,

    /// Frame width in pixels
    #[arg(long, env = "FRAME_WIDTH")]
    pub width: i32,

    /// Frame height in pixels
    #[arg(long, env = "FRAME_HEIGHT")]
    pub height: i32,

    /// Chroma sample order of the source (nv21 or nv12)
    #[arg(long, env = "CHROMA_ORDER", default_value = "nv21")]
    pub chroma_order: ChromaOrder,

    /// Directory receiving frame_NNNNN.tiff files
    #[arg(short, long, default_value = "edges")]
    pub output_dir: PathBuf,

    /// Output TIFF compression
    #[arg(long, env = "COMPRESSION", default_value = "deflate", value_enum)]
    pub compression: CompressionSetting,

    /// Gaussian kernel side length (odd, at most 31)
    #[arg(long, default_value_t = 5)]
    pub blur_kernel_size: u32,

    /// Gaussian standard deviation
    #[arg(long, default_value_t = 1.5)]
    pub blur_sigma: f32,

    /// Hysteresis low threshold
    #[arg(long, default_value_t = 50.0)]
    pub low_threshold: f32,

    /// Hysteresis high threshold
    #[arg(long, default_value_t = 150.0)]
    pub high_threshold: f32,

    /// Use the Euclidean gradient norm instead of |gx| + |gy|
    #[arg(long)]
    pub l2_gradient: bool,

    /// Log per-stage timings for every frame
    #[arg(long)]
    pub timings: bool,

    /// Enable debug logging when RUST_LOG is unset
    #[arg(short, long, env = "VERBOSE")]
    pub verbose: bool,
}

impl Args {
    pub fn gradient_norm(&self) -> GradientNorm {
        if self.l2_gradient {
            GradientNorm::L2
        } else {
            GradientNorm::L1
        }
    }
}
