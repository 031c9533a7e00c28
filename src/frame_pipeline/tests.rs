#[cfg(test)]
mod tests {
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use image::{GrayImage, Luma, Rgb, RgbImage};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use crate::frame_pipeline::color::{ColorConverter, SemiPlanarConverter, to_grayscale};
    use crate::frame_pipeline::common::error::{FailureKind, FrameError, Result};
    use crate::frame_pipeline::config::{GradientNorm, MAX_BLUR_KERNEL_SIZE, ProcessorConfig};
    use crate::frame_pipeline::edges::{CannyDetector, EdgeDetector, gaussian_kernel, smooth};
    use crate::frame_pipeline::frame::{
        ChromaOrder, FrameDimensions, OutputFrame, Plane, SemiPlanarFrame, pack_semi_planar,
    };
    use crate::frame_pipeline::input::FrameDump;
    use crate::frame_pipeline::processor::FrameProcessor;
    use crate::frame_pipeline::timing::FrameRateMeter;

    struct MockConverter {
        should_fail: bool,
        calls: Arc<Mutex<usize>>,
    }

    impl ColorConverter for MockConverter {
        fn to_rgb(&self, frame: &SemiPlanarFrame<'_>) -> Result<RgbImage> {
            *self.calls.lock().unwrap() += 1;
            if self.should_fail {
                return Err(FrameError::ConversionFailure("Mock convert error".to_string()));
            }
            Ok(RgbImage::from_pixel(frame.width(), frame.height(), Rgb([128, 128, 128])))
        }
    }

    struct MockDetector {
        should_fail: bool,
        seen: Arc<Mutex<Vec<(u32, u32)>>>,
    }

    impl EdgeDetector for MockDetector {
        fn detect(&self, smoothed: &GrayImage) -> Result<GrayImage> {
            if self.should_fail {
                return Err(FrameError::ConversionFailure("Mock detect error".to_string()));
            }
            self.seen.lock().unwrap().push(smoothed.dimensions());
            Ok(GrayImage::from_pixel(smoothed.width(), smoothed.height(), Luma([255])))
        }
    }

    fn mock_processor(
        converter_fails: bool,
        detector_fails: bool,
    ) -> (
        FrameProcessor<MockConverter, MockDetector>,
        Arc<Mutex<usize>>,
        Arc<Mutex<Vec<(u32, u32)>>>,
    ) {
        let calls = Arc::new(Mutex::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let processor = FrameProcessor::with_custom(
            MockConverter {
                should_fail: converter_fails,
                calls: calls.clone(),
            },
            MockDetector {
                should_fail: detector_fails,
                seen: seen.clone(),
            },
            ProcessorConfig::default(),
        )
        .unwrap();
        (processor, calls, seen)
    }

    #[derive(Default)]
    struct MessageVisitor(String);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    #[derive(Clone, Default)]
    struct CaptureLayer {
        events: Arc<Mutex<Vec<(Level, String)>>>,
    }

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            self.events
                .lock()
                .unwrap()
                .push((*event.metadata().level(), visitor.0));
        }
    }

    fn capture_events<T>(f: impl FnOnce() -> T) -> (T, Vec<(Level, String)>) {
        let layer = CaptureLayer::default();
        let events = layer.events.clone();
        let subscriber = tracing_subscriber::registry().with(layer);
        let result = tracing::subscriber::with_default(subscriber, f);
        let events = events.lock().unwrap().clone();
        (result, events)
    }

    fn flat_frame(width: usize, height: usize, value: u8) -> Vec<u8> {
        vec![value; width * height * 3 / 2]
    }

    #[test]
    fn test_config_builder() {
        let config = ProcessorConfig::builder()
            .chroma_order(ChromaOrder::Uv)
            .blur_kernel_size(7)
            .blur_sigma(2.0)
            .thresholds(10.0, 90.0)
            .gradient_norm(GradientNorm::L2)
            .max_dimension(Some(4096))
            .build();

        assert_eq!(config.chroma_order, ChromaOrder::Uv);
        assert_eq!(config.blur_kernel_size, 7);
        assert_eq!(config.blur_sigma, 2.0);
        assert_eq!(config.low_threshold, 10.0);
        assert_eq!(config.high_threshold, 90.0);
        assert_eq!(config.gradient_norm, GradientNorm::L2);
        assert_eq!(config.max_dimension, Some(4096));
    }

    #[test]
    fn test_config_defaults_match_camera_pipeline() {
        let config = ProcessorConfig::builder().build();

        assert_eq!(config.chroma_order, ChromaOrder::Vu);
        assert_eq!(config.blur_kernel_size, 5);
        assert_eq!(config.blur_sigma, 1.5);
        assert_eq!(config.low_threshold, 50.0);
        assert_eq!(config.high_threshold, 150.0);
        assert_eq!(config.gradient_norm, GradientNorm::L1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let bad = [
            ProcessorConfig::builder().blur_kernel_size(4).build(),
            ProcessorConfig::builder().blur_kernel_size(0).build(),
            ProcessorConfig::builder().blur_sigma(0.0).build(),
            ProcessorConfig::builder().blur_sigma(f32::NAN).build(),
            ProcessorConfig::builder().thresholds(150.0, 50.0).build(),
            ProcessorConfig::builder().thresholds(-1.0, 50.0).build(),
            ProcessorConfig::builder().max_dimension(Some(0)).build(),
            ProcessorConfig::builder().blur_kernel_size(33).build(),
            ProcessorConfig::builder()
                .blur_kernel_size(4_000_000_001)
                .build(),
        ];

        for config in bad {
            let result = FrameProcessor::new(config.clone());
            assert!(
                matches!(result, Err(FrameError::InvalidConfig(_))),
                "config should be rejected: {config:?}"
            );
        }
    }

    #[test]
    fn test_largest_blur_kernel_is_accepted() {
        let config = ProcessorConfig::builder()
            .blur_kernel_size(MAX_BLUR_KERNEL_SIZE)
            .build();

        assert!(FrameProcessor::new(config).is_ok());
    }

    #[test]
    fn test_chroma_order_parsing() {
        assert_eq!("nv21".parse::<ChromaOrder>().unwrap(), ChromaOrder::Vu);
        assert_eq!("NV12".parse::<ChromaOrder>().unwrap(), ChromaOrder::Uv);
        assert_eq!(ChromaOrder::Vu.to_string(), "NV21");

        let err = "i420".parse::<ChromaOrder>().unwrap_err();
        assert!(matches!(err, FrameError::InvalidConfig(_)));
    }

    #[test]
    fn test_successful_processing_with_mocks() {
        let (processor, calls, seen) = mock_processor(false, false);

        let frame = processor.process(Some(flat_frame(4, 2, 0).as_slice()), 4, 2).unwrap();

        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(seen.lock().unwrap().as_slice(), &[(4, 2)]);
        assert_eq!(frame.as_bytes().len(), 4 * 2 * 3);
        assert!(frame.as_bytes().iter().all(|&b| b == 255));
    }

    #[test]
    fn test_converter_failure() {
        let (processor, _, seen) = mock_processor(true, false);

        let result = processor.process(Some(flat_frame(4, 4, 128).as_slice()), 4, 4);

        assert!(matches!(result, Err(FrameError::ConversionFailure(_))));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_detector_failure() {
        let (processor, calls, _) = mock_processor(false, true);

        let result = processor.process(Some(flat_frame(4, 4, 128).as_slice()), 4, 4);

        assert_eq!(*calls.lock().unwrap(), 1);
        let err = result.unwrap_err();
        assert!(matches!(err, FrameError::ConversionFailure(_)));
        assert_eq!(err.kind(), FailureKind::Internal);
    }

    #[test]
    fn test_validation_short_circuits_before_conversion() {
        let (processor, calls, _) = mock_processor(false, false);

        assert!(matches!(
            processor.process(None, 4, 4),
            Err(FrameError::InvalidInput(_))
        ));
        assert!(matches!(
            processor.process(Some(&[0u8; 24][..]), 0, 4),
            Err(FrameError::InvalidInput(_))
        ));
        assert!(matches!(
            processor.process(Some(&[0u8; 24][..]), 4, -4),
            Err(FrameError::InvalidInput(_))
        ));
        assert!(matches!(
            processor.process(Some(&[0u8; 23][..]), 4, 4),
            Err(FrameError::SizeMismatch { .. })
        ));

        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_absent_buffer_checked_before_dimensions() {
        let processor = FrameProcessor::default();

        let err = processor.process(None, 0, 0).unwrap_err();

        match err {
            FrameError::InvalidInput(message) => assert!(message.contains("absent")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_dimensions_checked_before_size() {
        let processor = FrameProcessor::default();

        let err = processor.process(Some(&[0u8; 5][..]), 0, 10).unwrap_err();

        assert!(matches!(err, FrameError::InvalidInput(_)));
        assert_eq!(err.kind(), FailureKind::BadInput);
    }

    #[test]
    fn test_size_mismatch_reports_expected_and_actual() {
        let processor = FrameProcessor::default();

        let err = processor.process(Some(&[0u8; 5][..]), 2, 2).unwrap_err();

        match err {
            FrameError::SizeMismatch { expected, actual } => {
                assert_eq!(expected, 6);
                assert_eq!(actual, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            FrameError::SizeMismatch {
                expected: 6,
                actual: 5
            }
            .kind(),
            FailureKind::SizeMismatch
        );
    }

    #[test]
    fn test_max_dimension_limit() {
        let config = ProcessorConfig::builder().max_dimension(Some(8)).build();
        let processor = FrameProcessor::new(config).unwrap();

        assert!(processor.process(Some(flat_frame(8, 8, 128).as_slice()), 8, 8).is_ok());
        assert!(matches!(
            processor.process(Some(flat_frame(10, 8, 128).as_slice()), 10, 8),
            Err(FrameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_odd_dimensions_fail_conversion() {
        let processor = FrameProcessor::default();

        // 3 * 2 * 3 / 2 = 9 bytes passes the size check but not 4:2:0 conversion.
        let result = processor.process(Some(&[128u8; 9][..]), 3, 2);

        assert!(matches!(result, Err(FrameError::ConversionFailure(_))));
    }

    #[test]
    fn test_timings_cover_every_stage() {
        let processor = FrameProcessor::default();

        let (_, timings) = processor
            .process_with_timings(Some(flat_frame(8, 8, 128).as_slice()), 8, 8)
            .unwrap();

        let names: Vec<&str> = timings.steps().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "validate",
                "convert_color",
                "grayscale",
                "smooth",
                "detect_edges",
                "pack_output"
            ]
        );
        assert!(timings.get_step("detect_edges").is_some());
        assert_eq!(
            timings.total_duration(),
            timings.steps().iter().map(|s| s.duration).sum::<Duration>()
        );
    }

    #[test]
    fn test_diagnostics_for_rejected_frame() {
        let processor = FrameProcessor::default();

        let (result, events) = capture_events(|| processor.process(Some(&[0u8; 5][..]), 2, 2));

        assert!(result.is_err());
        assert!(
            events
                .iter()
                .any(|(level, msg)| *level == Level::WARN && msg.contains("Rejected input frame"))
        );
        assert!(!events.iter().any(|(level, _)| *level == Level::ERROR));
    }

    #[test]
    fn test_diagnostics_for_conversion_failure() {
        let (processor, _, _) = mock_processor(true, false);

        let (result, events) =
            capture_events(|| processor.process(Some(flat_frame(4, 4, 0).as_slice()), 4, 4));

        assert!(result.is_err());
        assert!(events.iter().any(
            |(level, msg)| *level == Level::ERROR && msg.contains("Frame conversion failed")
        ));
    }

    #[test]
    fn test_diagnostics_for_success() {
        let processor = FrameProcessor::default();

        let (result, events) =
            capture_events(|| processor.process(Some(flat_frame(4, 4, 128).as_slice()), 4, 4));

        assert!(result.is_ok());
        assert!(events.iter().any(
            |(level, msg)| *level == Level::DEBUG && msg.contains("Processed frame successfully")
        ));
        assert!(
            !events
                .iter()
                .any(|(level, _)| *level == Level::WARN || *level == Level::ERROR)
        );
    }

    #[test]
    fn test_flat_gray_converts_to_uniform_rgb() {
        let data = flat_frame(4, 4, 128);
        let dims = FrameDimensions::new(4, 4).unwrap();
        let frame = SemiPlanarFrame::new(&data, dims, ChromaOrder::Vu).unwrap();

        let rgb = SemiPlanarConverter.to_rgb(&frame).unwrap();

        assert_eq!(rgb.dimensions(), (4, 4));
        assert!(rgb.pixels().all(|p| *p == Rgb([130, 130, 130])));
    }

    #[test]
    fn test_chroma_order_swaps_red_and_blue_response() {
        // 2x2 frame: four luma samples then a single chroma pair.
        let data = [128u8, 128, 128, 128, 200, 60];
        let dims = FrameDimensions::new(2, 2).unwrap();

        let nv21 = SemiPlanarFrame::new(&data, dims, ChromaOrder::Vu).unwrap();
        let nv12 = SemiPlanarFrame::new(&data, dims, ChromaOrder::Uv).unwrap();
        let Rgb([r21, _, b21]) = *SemiPlanarConverter.to_rgb(&nv21).unwrap().get_pixel(0, 0);
        let Rgb([r12, _, b12]) = *SemiPlanarConverter.to_rgb(&nv12).unwrap().get_pixel(0, 0);

        // NV21 reads V=200: strong red, weak blue. NV12 reads V=60.
        assert!(r21 > r12);
        assert!(b21 < b12);
    }

    #[test]
    fn test_semi_planar_view_splits_planes() {
        let data: Vec<u8> = (0..24).collect();
        let dims = FrameDimensions::new(4, 4).unwrap();

        let frame = SemiPlanarFrame::new(&data, dims, ChromaOrder::Vu).unwrap();

        assert_eq!(frame.luma().len(), 16);
        assert_eq!(frame.chroma(), &data[16..]);
    }

    #[test]
    fn test_grayscale_uses_luma_weights() {
        let mut rgb = RgbImage::new(3, 1);
        rgb.put_pixel(0, 0, Rgb([255, 255, 255]));
        rgb.put_pixel(1, 0, Rgb([255, 0, 0]));
        rgb.put_pixel(2, 0, Rgb([0, 0, 255]));

        let gray = to_grayscale(&rgb);

        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(1, 0).0[0], 76);
        assert_eq!(gray.get_pixel(2, 0).0[0], 29);
    }

    #[test]
    fn test_gaussian_kernel_shape() {
        let kernel = gaussian_kernel(5, 1.5);

        assert_eq!(kernel.len(), 5);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!((kernel[0] - kernel[4]).abs() < 1e-6);
        assert!((kernel[1] - kernel[3]).abs() < 1e-6);
        assert!(kernel[2] > kernel[1] && kernel[1] > kernel[0]);
    }

    #[test]
    fn test_smoothing_preserves_flat_levels() {
        let kernel = gaussian_kernel(5, 1.5);

        for level in [0u8, 1, 50, 100, 128, 130, 200, 254, 255] {
            let flat = GrayImage::from_pixel(8, 8, Luma([level]));

            let smoothed = smooth(&flat, &kernel);

            assert!(
                smoothed.pixels().all(|p| p.0[0] == level),
                "flat level {level} changed"
            );
        }
    }

    #[test]
    fn test_smoothing_is_symmetric_about_step() {
        let step = GrayImage::from_fn(10, 6, |x, _| if x < 5 { Luma([0]) } else { Luma([200]) });

        let smoothed = smooth(&step, &gaussian_kernel(5, 1.5));

        for y in 0..6 {
            assert_eq!(smoothed.get_pixel(0, y).0[0], 0);
            assert_eq!(smoothed.get_pixel(9, y).0[0], 200);
            for offset in 0..5 {
                let left = u16::from(smoothed.get_pixel(4 - offset, y).0[0]);
                let right = u16::from(smoothed.get_pixel(5 + offset, y).0[0]);
                assert_eq!(left + right, 200, "row {y}, offset {offset}");
            }
            assert!(smoothed.get_pixel(4, y).0[0] > 0);
            assert!(smoothed.get_pixel(5, y).0[0] < 200);
        }
    }

    #[test]
    fn test_smoothing_replicates_border_pixels() {
        let kernel = gaussian_kernel(5, 1.5);
        let column = GrayImage::from_fn(8, 4, |x, _| if x == 0 { Luma([200]) } else { Luma([0]) });

        let smoothed = smooth(&column, &kernel);

        // Both out-of-image taps on the left read the bright border column.
        let expected = (200.0 * (kernel[0] + kernel[1] + kernel[2])).round() as u8;
        assert_eq!(smoothed.get_pixel(0, 2).0[0], expected);
    }

    #[test]
    fn test_canny_finds_vertical_step() {
        let image = GrayImage::from_fn(10, 10, |x, _| if x < 5 { Luma([0]) } else { Luma([200]) });

        let edges = CannyDetector::default().detect(&image).unwrap();

        for y in 0..10 {
            for x in 0..10 {
                let expected = if x == 4 { 255 } else { 0 };
                assert_eq!(edges.get_pixel(x, y).0[0], expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_canny_ignores_isolated_weak_edges() {
        // Sobel response of a step of 20 is 80: above low, below high.
        let image = GrayImage::from_fn(10, 10, |x, _| {
            if x < 5 { Luma([100]) } else { Luma([120]) }
        });

        let edges = CannyDetector::default().detect(&image).unwrap();

        assert!(edges.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_canny_lower_high_threshold_keeps_weak_step() {
        let image = GrayImage::from_fn(10, 10, |x, _| {
            if x < 5 { Luma([100]) } else { Luma([120]) }
        });

        let edges = CannyDetector::new(50.0, 70.0, GradientNorm::L1)
            .detect(&image)
            .unwrap();

        assert_eq!(edges.pixels().filter(|p| p.0[0] == 255).count(), 10);
    }

    #[test]
    fn test_output_frame_replicates_edge_map() {
        let edges = GrayImage::from_fn(3, 2, |x, y| {
            if (x + y) % 2 == 0 { Luma([255]) } else { Luma([0]) }
        });

        let frame = OutputFrame::from_edge_map(edges);

        assert_eq!(frame.as_bytes().len(), 3 * 2 * 3);
        for pixel in frame.as_bytes().chunks_exact(3) {
            assert!(pixel[0] == pixel[1] && pixel[1] == pixel[2]);
        }
        assert_eq!(frame.edge_pixel_count(), 3);
    }

    #[test]
    fn test_pack_strided_planes_into_nv21() {
        // 4x2 frame, Y rows padded to 6 bytes, chroma interleaved with pixel stride 2.
        let y_data = [1, 2, 3, 4, 0, 0, 5, 6, 7, 8, 0, 0];
        let uv_data = [10, 20, 11, 21];
        let y = Plane {
            data: &y_data,
            row_stride: 6,
            pixel_stride: 1,
        };
        let u = Plane {
            data: &uv_data,
            row_stride: 4,
            pixel_stride: 2,
        };
        let v = Plane {
            data: &uv_data[1..],
            row_stride: 4,
            pixel_stride: 2,
        };
        let dims = FrameDimensions::new(4, 2).unwrap();

        let nv21 = pack_semi_planar(y, u, v, dims, ChromaOrder::Vu).unwrap();
        let nv12 = pack_semi_planar(y, u, v, dims, ChromaOrder::Uv).unwrap();

        assert_eq!(nv21, [1, 2, 3, 4, 5, 6, 7, 8, 20, 10, 21, 11]);
        assert_eq!(nv12, [1, 2, 3, 4, 5, 6, 7, 8, 10, 20, 11, 21]);
        assert_eq!(nv21.len(), dims.semi_planar_len().unwrap());
    }

    #[test]
    fn test_pack_rejects_short_plane() {
        let y_data = [0u8; 8];
        let chroma = [0u8; 1];
        let dims = FrameDimensions::new(4, 2).unwrap();

        let result = pack_semi_planar(
            Plane::packed(&y_data, 4),
            Plane::packed(&chroma, 2),
            Plane::packed(&chroma, 2),
            dims,
            ChromaOrder::Vu,
        );

        assert!(matches!(result, Err(FrameError::InvalidInput(_))));
    }

    #[test]
    fn test_frame_rate_meter() {
        let start = Instant::now();
        let mut meter = FrameRateMeter::starting_at(start);

        for i in 1..30u64 {
            assert!(meter.tick_at(start + Duration::from_millis(i * 33)).is_none());
        }
        let fps = meter.tick_at(start + Duration::from_secs(1)).unwrap();

        assert!((fps - 30.0).abs() < 1e-9);
        assert!(meter.tick_at(start + Duration::from_millis(1100)).is_none());
    }

    #[test]
    fn test_frame_dump_skips_trailing_partial_frame() {
        let dims = FrameDimensions::new(2, 2).unwrap();
        let frame_len = dims.semi_planar_len().unwrap();
        let mut data = flat_frame(2, 2, 10);
        data.extend(flat_frame(2, 2, 20));
        data.extend([30u8; 4]);

        let dump = FrameDump::from_bytes(data, frame_len);
        let frames: Vec<&[u8]> = dump.frames().collect();

        assert_eq!(frames.len(), 2);
        assert!(frames[0].iter().all(|&b| b == 10));
        assert!(frames[1].iter().all(|&b| b == 20));
    }

    #[test]
    fn test_frame_dump_missing_file() {
        let dims = FrameDimensions::new(4, 4).unwrap();

        let result = FrameDump::read("/nonexistent/capture.nv21", dims);

        assert!(matches!(result, Err(FrameError::InputReadError(_))));
    }
}
