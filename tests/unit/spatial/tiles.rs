//! Tests for tile sampling, the small-source fallback and pool construction

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use photomosaic::algorithm::cancellation::CancellationToken;
    use photomosaic::io::configuration::{MAX_POOL_PIXELS, MAX_TILE_SIZE};
    use photomosaic::io::error::progress_error;
    use photomosaic::io::progress::Phase;
    use photomosaic::spatial::{Raster, Tile, TilePool, TileSampler};
    use photomosaic::{MosaicError, Stage};
    use rand::{SeedableRng, rngs::StdRng};

    fn noisy_source(width: u32, height: u32) -> Raster {
        Raster::from_rgb(RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 7 % 256) as u8,
                (y * 13 % 256) as u8,
                ((x + y) * 3 % 256) as u8,
            ])
        }))
    }

    // Tests pool size and tile dimensions for a large source
    // Verified by sampling one tile fewer
    #[test]
    fn test_sample_count_and_size() {
        let sampler = TileSampler::new(8, 37).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let pool = sampler.sample(&noisy_source(64, 48), &mut rng).unwrap();

        assert_eq!(pool.len(), 37);
        assert_eq!(pool.tile_size(), 8);
        for tile in &pool {
            assert_eq!(tile.size(), 8);
            assert_eq!(tile.pixels().width(), 8);
            assert_eq!(tile.pixels().height(), 8);
        }
    }

    // Tests tiles are real source blocks with matching averages
    // Verified by offsetting the crop position
    #[test]
    fn test_tiles_are_source_blocks() {
        let source = noisy_source(20, 20);
        let sampler = TileSampler::new(4, 25).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let pool = sampler.sample(&source, &mut rng).unwrap();

        for tile in &pool {
            let found = (0..=16).any(|y| {
                (0..=16).any(|x| source.crop_square(x, y, 4).as_ref() == Some(tile.pixels()))
            });
            assert!(found, "tile not found in source");
            assert_eq!(tile.average(), tile.pixels().average_color());
        }
    }

    // Tests sources not larger than a tile are upscaled first
    // Verified by returning an error for small sources
    #[test]
    fn test_small_source_fallback() {
        let mut rng = StdRng::seed_from_u64(3);
        let sampler = TileSampler::new(16, 12).unwrap();

        for source in [
            noisy_source(5, 5),
            noisy_source(16, 100),
            noisy_source(100, 16),
            noisy_source(1, 1),
        ] {
            let pool = sampler.sample(&source, &mut rng).unwrap();
            assert_eq!(pool.len(), 12);
            assert!(pool.iter().all(|tile| tile.size() == 16));
        }
    }

    // Tests undersized sources are upscaled to ten tiles per side before cropping
    // Verified by upscaling to nine tiles per side
    #[test]
    fn test_small_source_fallback_size() {
        let source = noisy_source(3, 2);
        let upscaled = source.resample(40, 40);
        let sampler = TileSampler::new(4, 20).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let pool = sampler.sample(&source, &mut rng).unwrap();

        for tile in &pool {
            let found = (0..=36).any(|y| {
                (0..=36).any(|x| upscaled.crop_square(x, y, 4).as_ref() == Some(tile.pixels()))
            });
            assert!(found, "tile is not a block of the 40x40 upscale");
        }
    }

    // Tests oversized tiles are rejected before any allocation
    // Verified by saturating the fallback side instead of failing
    #[test]
    fn test_tile_size_limits() {
        assert!(matches!(
            TileSampler::new(MAX_TILE_SIZE + 1, 1),
            Err(MosaicError::InvalidConfiguration { parameter: "tile_size", .. })
        ));
        assert!(matches!(
            TileSampler::new(1 << 30, 1),
            Err(MosaicError::InvalidConfiguration { parameter: "tile_size", .. })
        ));
        assert!(matches!(
            TileSampler::new(MAX_TILE_SIZE, usize::MAX),
            Err(MosaicError::InvalidConfiguration { parameter: "tile_count", .. })
        ));

        let sampler = TileSampler::new(MAX_TILE_SIZE, 1).unwrap();
        let pool_pixels = u64::from(MAX_TILE_SIZE).pow(2) * sampler.count() as u64;
        assert!(pool_pixels <= MAX_POOL_PIXELS);
    }

    // Tests zero count and zero size are rejected up front
    // Verified by removing the count check
    #[test]
    fn test_invalid_sampler_configuration() {
        assert!(matches!(
            TileSampler::new(0, 10),
            Err(MosaicError::InvalidConfiguration { parameter: "tile_size", .. })
        ));
        assert!(matches!(
            TileSampler::new(10, 0),
            Err(MosaicError::InvalidConfiguration { parameter: "tile_count", .. })
        ));
    }

    // Tests empty sources are rejected instead of resampled
    // Verified by removing the empty source check
    #[test]
    fn test_empty_source() {
        let sampler = TileSampler::new(4, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(sampler.sample(&Raster::filled(0, 0, [0, 0, 0]), &mut rng).is_err());
    }

    // Tests equal seeds give equal pools
    // Verified by reseeding from entropy
    #[test]
    fn test_sampling_is_deterministic() {
        let source = noisy_source(50, 50);
        let sampler = TileSampler::new(5, 30).unwrap();

        let pool_a = sampler
            .sample(&source, &mut StdRng::seed_from_u64(77))
            .unwrap();
        let pool_b = sampler
            .sample(&source, &mut StdRng::seed_from_u64(77))
            .unwrap();
        let pool_c = sampler
            .sample(&source, &mut StdRng::seed_from_u64(78))
            .unwrap();

        assert_eq!(pool_a, pool_b);
        assert_ne!(pool_a, pool_c);
    }

    // Tests extraction progress is reported every hundred tiles
    // Verified by reporting per tile
    #[test]
    fn test_sampling_progress() {
        let sampler = TileSampler::new(2, 250).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let mut events = Vec::new();
        let mut reporter = |fraction: f64, phase: Phase| -> photomosaic::Result<()> {
            events.push((fraction, phase));
            Ok(())
        };

        sampler
            .sample_with_progress(&noisy_source(10, 10), &mut rng, &mut reporter)
            .unwrap();

        assert_eq!(
            events,
            vec![
                (0.0, Phase::ExtractingTiles),
                (0.4, Phase::ExtractingTiles),
                (0.8, Phase::ExtractingTiles),
            ]
        );
    }

    // Tests a failing reporter aborts sampling
    // Verified by ignoring reporter errors
    #[test]
    fn test_sampling_progress_failure_is_fatal() {
        let sampler = TileSampler::new(2, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let mut reporter = |_fraction: f64, phase: Phase| -> photomosaic::Result<()> {
            Err(progress_error(phase, &"display closed"))
        };

        let result = sampler.sample_with_progress(&noisy_source(10, 10), &mut rng, &mut reporter);
        assert!(matches!(result, Err(MosaicError::ProgressReport { .. })));
    }

    // Tests a cancelled token stops sampling
    // Verified by skipping the cancellation check
    #[test]
    fn test_sampling_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let sampler = TileSampler::new(2, 5).unwrap().with_cancellation(token);
        let mut rng = StdRng::seed_from_u64(2);

        let error = sampler.sample(&noisy_source(10, 10), &mut rng).unwrap_err();
        assert!(matches!(
            error,
            MosaicError::Cancelled {
                processed: 0,
                total: 5,
                ..
            }
        ));
        assert_eq!(error.stage(), Stage::Sampling);
    }

    // Tests tiles must be square and pools uniform
    // Verified by skipping the size check in from_tiles
    #[test]
    fn test_tile_and_pool_construction() {
        assert!(Tile::from_pixels(Raster::filled(3, 4, [0, 0, 0])).is_err());
        assert!(Tile::from_pixels(Raster::filled(0, 0, [0, 0, 0])).is_err());

        let small = Tile::from_pixels(Raster::filled(2, 2, [9, 9, 9])).unwrap();
        let large = Tile::from_pixels(Raster::filled(3, 3, [9, 9, 9])).unwrap();
        assert_eq!(small.average(), [9.0, 9.0, 9.0]);

        assert!(TilePool::from_tiles(2, vec![small.clone(), large]).is_err());
        let pool = TilePool::from_tiles(2, vec![small.clone(), small]).unwrap();
        assert_eq!(pool.len(), 2);
        assert!(!pool.is_empty());
        assert!(pool.get(2).is_none());
        assert_eq!(pool.tiles().len(), 2);

        let empty = TilePool::from_tiles(2, Vec::new()).unwrap();
        assert!(empty.is_empty());
    }
}
