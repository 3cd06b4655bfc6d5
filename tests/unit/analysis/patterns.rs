//! Tests for palette quantization, dihedral transforms, encoding and pattern counting

#[cfg(test)]
mod tests {
    use wavecollapse::WfcError;
    use wavecollapse::analysis::patterns::{
        IndexedSample, PatternCatalog, agrees, decode, dihedral_variants, encode, pattern_space,
        reflect, rotate,
    };
    use wavecollapse::spatial::PixelGrid;

    const A: [u8; 4] = [10, 20, 30, 255];
    const B: [u8; 4] = [200, 100, 0, 255];
    const C: [u8; 4] = [0, 0, 0, 0];

    fn indexed(rows: &[Vec<[u8; 4]>]) -> IndexedSample {
        IndexedSample::from_source(&PixelGrid::from_rows(rows)).expect("Failed to index sample")
    }

    // Tests palette indices follow first-seen row-major order
    // Verified by scanning columns before rows
    #[test]
    fn test_palette_first_seen_order() {
        let sample = indexed(&[vec![B, A], vec![C, B]]);
        assert_eq!(sample.palette(), &[B, A, C]);
        assert_eq!(sample.index_at(1, 0), 1);
        assert_eq!(sample.index_at(0, 1), 2);
        assert_eq!((sample.width(), sample.height()), (2, 2));
    }

    // Tests sample lookups wrap around both axes
    // Verified by clamping instead of wrapping coordinates
    #[test]
    fn test_index_at_wraps() {
        let sample = indexed(&[vec![A, B, C]]);
        assert_eq!(sample.index_at(3, 0), sample.index_at(0, 0));
        assert_eq!(sample.index_at(4, 5), sample.index_at(1, 0));
        assert_eq!(sample.pattern_at(2, 0, 2), vec![2, 0, 2, 0]);
    }

    // Tests empty samples are rejected
    // Verified by removing the zero-size check
    #[test]
    fn test_empty_sample() {
        assert!(matches!(
            IndexedSample::from_source(&PixelGrid::new(0, 0)),
            Err(WfcError::InvalidSourceData { .. })
        ));
    }

    // Tests rotation and reflection of a 2x2 pattern
    // Verified by transposing instead of rotating
    #[test]
    fn test_rotate_and_reflect() {
        let pattern = vec![0, 1, 2, 3];
        assert_eq!(rotate(&pattern, 2), vec![1, 3, 0, 2]);
        assert_eq!(reflect(&pattern, 2), vec![1, 0, 3, 2]);
    }

    // Tests four rotations and two reflections restore the pattern
    // Verified by reading the source at n - y instead of n - 1 - y
    #[test]
    fn test_transform_orders() {
        let pattern: Vec<usize> = (0..9).collect();
        let mut rotated = pattern.clone();
        for _ in 0..4 {
            rotated = rotate(&rotated, 3);
        }
        assert_eq!(rotated, pattern);
        assert_eq!(reflect(&reflect(&pattern, 3), 3), pattern);
    }

    // Tests the canonical order of the eight variants
    // Verified by swapping the rotate and reflect slots
    #[test]
    fn test_dihedral_order() {
        let pattern = vec![0, 1, 2, 3];
        let variants = dihedral_variants(&pattern, 2);
        assert_eq!(variants[0], pattern);
        assert_eq!(variants[1], reflect(&pattern, 2));
        assert_eq!(variants[2], rotate(&pattern, 2));
        assert_eq!(variants[3], reflect(&rotate(&pattern, 2), 2));
        assert_eq!(variants[4], rotate(&rotate(&pattern, 2), 2));
        assert_eq!(variants[7], reflect(&rotate(&variants[4], 2), 2));
    }

    // Tests mixed-radix encoding puts the first cell in the most significant digit
    // Verified by folding from the last cell
    #[test]
    fn test_encode_decode() {
        assert_eq!(encode(&[1, 0, 1, 1], 2), 11);
        assert_eq!(decode(11, 2, 2), vec![1, 0, 1, 1]);
        assert_eq!(decode(encode(&[2, 0, 1, 2], 3), 2, 3), vec![2, 0, 1, 2]);
    }

    // Tests pattern space overflow is detected
    // Verified by using wrapping_pow
    #[test]
    fn test_pattern_space() {
        assert_eq!(pattern_space(2, 2), Some(16));
        assert_eq!(pattern_space(300, 8), None);
    }

    // Tests agreement over the overlap of shifted windows
    // Verified by comparing the full windows regardless of offset
    #[test]
    fn test_agrees() {
        let stripes = vec![0, 1, 0, 1];
        let shifted = vec![1, 0, 1, 0];
        assert!(agrees(&stripes, &stripes, 0, 0, 2));
        assert!(!agrees(&stripes, &stripes, 1, 0, 2));
        assert!(agrees(&stripes, &shifted, 1, 0, 2));
        assert!(agrees(&stripes, &shifted, -1, 0, 2));
        assert!(agrees(&stripes, &stripes, 0, 1, 2));
    }

    // Tests each weight counts the position and variant occurrences of its pattern
    // Verified by incrementing counts only on first sight
    #[test]
    fn test_weights_count_occurrences() {
        let sample = indexed(&[vec![A, B], vec![B, A]]);
        let catalog = PatternCatalog::extract(&sample, 2, true, 8, false).expect("Failed to extract");
        assert_eq!(catalog.len(), 2);
        let total: f64 = catalog.weights.iter().sum();
        assert!((total - 32.0).abs() < f64::EPSILON);
    }

    // Tests non-periodic extraction stops N - 1 short of the edges
    // Verified by iterating the full sample without the bound
    #[test]
    fn test_non_periodic_positions() {
        let sample = indexed(&[vec![A, B, C], vec![A, B, C], vec![A, B, C]]);
        let catalog = PatternCatalog::extract(&sample, 2, false, 1, false).expect("Failed to extract");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.weights, vec![2.0, 2.0]);
        assert_eq!(catalog.patterns.first(), Some(&vec![0, 1, 0, 1]));
    }

    // Tests ground records the pattern at the left end of the last sample row
    // Verified by recording the last pattern seen instead
    #[test]
    fn test_ground_pattern() {
        let sample = indexed(&[vec![A, A], vec![B, C]]);
        let catalog = PatternCatalog::extract(&sample, 2, true, 1, true).expect("Failed to extract");
        let ground = catalog.ground.expect("Ground pattern missing");
        assert_eq!(catalog.patterns.get(ground), Some(&vec![1, 2, 0, 0]));

        let without = PatternCatalog::extract(&sample, 2, true, 1, false).expect("Failed to extract");
        assert_eq!(without.ground, None);
    }

    // Tests extraction parameters are validated
    // Verified by removing the symmetry range check
    #[test]
    fn test_extract_validation() {
        let sample = indexed(&[vec![A, B], vec![B, A]]);
        assert!(PatternCatalog::extract(&sample, 0, true, 1, false).is_err());
        assert!(PatternCatalog::extract(&sample, 2, true, 0, false).is_err());
        assert!(PatternCatalog::extract(&sample, 2, true, 9, false).is_err());
        assert!(matches!(
            PatternCatalog::extract(&sample, 3, false, 1, false),
            Err(WfcError::InvalidSourceData { .. })
        ));
    }
}
