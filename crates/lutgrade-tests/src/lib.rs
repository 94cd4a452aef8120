//! Integration tests for the lutgrade crates.
//!
//! End-to-end checks that cross crate boundaries: LUT file on disk
//! through the scheduler to an encoded image, guard and dither behavior
//! over the real pipeline, and format interop.

#[cfg(test)]
mod tests {
    use lutgrade_core::ImageBuf;
    use lutgrade_engine::{
        DitherType, EngineConfig, MemoryGuard, ProcessingParams, ProcessorPreference, Scheduler,
    };
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{mpsc, Arc};
    use std::time::Duration;
    use tempfile::tempdir;

    /// A warm-tint 2^3 cube: lifts red, drops blue.
    const WARM_CUBE: &str = "TITLE \"warm\"\n\
        LUT_3D_SIZE 2\n\
        0.1 0.0 0.0\n1.0 0.0 0.0\n0.1 1.0 0.0\n1.0 1.0 0.0\n\
        0.1 0.0 0.8\n1.0 0.0 0.8\n0.1 1.0 0.8\n1.0 1.0 0.8\n";

    const IDENTITY_CUBE: &str = "LUT_3D_SIZE 2\n\
        0 0 0\n1 0 0\n0 1 0\n1 1 0\n\
        0 0 1\n1 0 1\n0 1 1\n1 1 1\n";

    fn grade(
        scheduler: &Scheduler,
        image: ImageBuf,
        params: ProcessingParams,
    ) -> Result<ImageBuf, lutgrade_engine::ProcessingError> {
        let (tx, rx) = mpsc::channel();
        assert!(scheduler.submit(image, params, |_p| {}, move |r| {
            let _ = tx.send(r);
        }));
        rx.recv_timeout(Duration::from_secs(60)).unwrap()
    }

    fn test_photo(width: u32, height: u32) -> ImageBuf {
        let mut image = ImageBuf::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                image
                    .set_pixel(
                        x,
                        y,
                        [
                            (x * 255 / width.max(1)) as u8,
                            (y * 255 / height.max(1)) as u8,
                            ((x + y) % 256) as u8,
                            255,
                        ],
                    )
                    .unwrap();
            }
        }
        image
    }

    /// LUT file on disk -> scheduler -> graded pixels.
    #[test]
    fn test_cube_file_to_graded_image() {
        let dir = tempdir().unwrap();
        let lut_path = dir.path().join("warm.cube");
        std::fs::write(&lut_path, WARM_CUBE).unwrap();

        let scheduler = Scheduler::new(EngineConfig::default());
        scheduler
            .load_lut(std::fs::File::open(&lut_path).unwrap())
            .unwrap();

        let graded = grade(&scheduler, test_photo(64, 48), ProcessingParams::default()).unwrap();
        // Black input maps to the cube's origin entry (0.1, 0.0, 0.0).
        let [r, g, b, a] = graded.pixel(0, 0).unwrap();
        assert!((r as i32 - 26).abs() <= 1, "got r={r}");
        assert_eq!(g, 0);
        assert_eq!(b, 0);
        assert_eq!(a, 255);
    }

    /// The same grade, written to JPEG and read back.
    #[test]
    fn test_grade_and_encode_roundtrip() {
        let scheduler = Scheduler::new(EngineConfig::default());
        scheduler.load_lut(WARM_CUBE.as_bytes()).unwrap();
        let graded = grade(&scheduler, test_photo(80, 60), ProcessingParams::default()).unwrap();

        let dir = tempdir().unwrap();
        let out = dir.path().join("graded.jpg");
        lutgrade_io::write(&out, &graded, 95).unwrap();
        let loaded = lutgrade_io::read(&out).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (80, 60));
    }

    /// Strength 0 means the output is the input, whatever the LUT says.
    #[test]
    fn test_zero_strength_passthrough() {
        let scheduler = Scheduler::new(EngineConfig::default());
        scheduler.load_lut(WARM_CUBE.as_bytes()).unwrap();
        let image = test_photo(32, 32);
        let expected = image.as_bytes().to_vec();
        let graded = grade(
            &scheduler,
            image,
            ProcessingParams {
                strength: 0.0,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(graded.as_bytes(), expected.as_slice());
    }

    /// Secondary LUT at strength 0 leaves the primary result untouched.
    #[test]
    fn test_secondary_strength_zero_is_primary_only() {
        let single = Scheduler::new(EngineConfig::default());
        single.load_lut(WARM_CUBE.as_bytes()).unwrap();
        let a = grade(&single, test_photo(16, 16), ProcessingParams::default()).unwrap();

        let dual = Scheduler::new(EngineConfig::default());
        dual.load_lut(WARM_CUBE.as_bytes()).unwrap();
        assert!(dual.load_secondary_lut(IDENTITY_CUBE.as_bytes()).unwrap());
        let b = grade(
            &dual,
            test_photo(16, 16),
            ProcessingParams {
                lut2_strength: 0.0,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    /// Ordered dither is deterministic: two runs agree byte for byte.
    #[test]
    fn test_ordered_dither_deterministic() {
        let scheduler = Scheduler::new(EngineConfig::default());
        scheduler.load_lut(WARM_CUBE.as_bytes()).unwrap();
        let params = ProcessingParams {
            dither: DitherType::Ordered,
            ..Default::default()
        };
        let a = grade(&scheduler, test_photo(40, 40), params).unwrap();
        let b = grade(&scheduler, test_photo(40, 40), params).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    /// Random dither stays within one quantization step of the undithered
    /// result.
    #[test]
    fn test_random_dither_bounded() {
        let scheduler = Scheduler::new(EngineConfig::default());
        scheduler.load_lut(IDENTITY_CUBE.as_bytes()).unwrap();
        let plain = grade(&scheduler, test_photo(32, 32), ProcessingParams::default()).unwrap();
        let dithered = grade(
            &scheduler,
            test_photo(32, 32),
            ProcessingParams {
                dither: DitherType::Random,
                ..Default::default()
            },
        )
        .unwrap();
        for (a, b) in plain.as_bytes().iter().zip(dithered.as_bytes()) {
            assert!((*a as i32 - *b as i32).abs() <= 1);
        }
    }

    /// CPU and preferred backend produce identical bytes for the same task.
    #[test]
    fn test_backends_agree() {
        let auto = Scheduler::new(EngineConfig::default());
        auto.load_lut(WARM_CUBE.as_bytes()).unwrap();
        let a = grade(&auto, test_photo(90, 33), ProcessingParams::default()).unwrap();

        let cpu = Scheduler::new(EngineConfig {
            preference: ProcessorPreference::Cpu,
            disable_accelerated: true,
        });
        cpu.load_lut(WARM_CUBE.as_bytes()).unwrap();
        let b = grade(&cpu, test_photo(90, 33), ProcessingParams::default()).unwrap();

        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    /// Progress over the whole pipeline is monotonic and ends complete.
    #[test]
    fn test_progress_reaches_total() {
        let scheduler = Scheduler::new(EngineConfig::default());
        scheduler.load_lut(IDENTITY_CUBE.as_bytes()).unwrap();
        let max_seen = Arc::new(AtomicU32::new(0));
        let max = Arc::clone(&max_seen);
        let done = Arc::new(AtomicU32::new(0));
        let done2 = Arc::clone(&done);
        let (tx, rx) = mpsc::channel();
        assert!(scheduler.submit(
            test_photo(200, 300),
            ProcessingParams::default(),
            move |p| {
                let prev = max.fetch_max(p.completed, Ordering::SeqCst);
                assert!(p.completed >= prev);
                if p.completed == p.total {
                    done2.store(1, Ordering::SeqCst);
                }
            },
            move |r| {
                let _ = tx.send(r);
            },
        ));
        rx.recv_timeout(Duration::from_secs(60)).unwrap().unwrap();
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    /// Guard kicks in over the ceiling; graded content survives the shrink.
    #[test]
    fn test_guard_after_grade() {
        let scheduler = Scheduler::new(EngineConfig::default());
        scheduler.load_lut(IDENTITY_CUBE.as_bytes()).unwrap();
        let mut image = ImageBuf::new(200, 100).unwrap();
        image.fill([50, 100, 150, 255]);
        let graded = grade(&scheduler, image, ProcessingParams::default()).unwrap();

        let guard = MemoryGuard::with_ceiling(5_000);
        let (small, event) = guard.constrain(graded).unwrap();
        assert!(event.is_some());
        assert!(small.pixel_count() <= 5_000);
        assert_eq!(small.pixel(0, 0).unwrap(), [50, 100, 150, 255]);
    }

    /// A .3dl look grades the same scene as its .cube equivalent.
    #[test]
    fn test_3dl_matches_cube() {
        // Identity in both formats.
        let threedl = "0\t0\t0\n1023\t0\t0\n0\t1023\t0\n1023\t1023\t0\n\
                       0\t0\t1023\n1023\t0\t1023\n0\t1023\t1023\n1023\t1023\t1023\n";
        let a_sched = Scheduler::new(EngineConfig::default());
        a_sched.load_lut(IDENTITY_CUBE.as_bytes()).unwrap();
        let b_sched = Scheduler::new(EngineConfig::default());
        b_sched.load_lut(threedl.as_bytes()).unwrap();

        let a = grade(&a_sched, test_photo(24, 24), ProcessingParams::default()).unwrap();
        let b = grade(&b_sched, test_photo(24, 24), ProcessingParams::default()).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }
}
