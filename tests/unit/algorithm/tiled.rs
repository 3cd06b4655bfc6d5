//! Tests for tiled-model construction, adjacency expansion, propagation and rendering

#[cfg(test)]
mod tests {
    use wavecollapse::WfcError;
    use wavecollapse::algorithm::executor::Collapse;
    use wavecollapse::algorithm::model::{Model, Outcome};
    use wavecollapse::algorithm::tiled::{Direction, TiledConfig, TiledModel};
    use wavecollapse::io::configuration::NEUTRAL_GRAY;
    use wavecollapse::spatial::tiles::{Adjacency, Symmetry, TileSet};
    use wavecollapse::spatial::{PixelSource, WaveState};

    const BLACK: [u8; 4] = [0, 0, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn solid(color: [u8; 4]) -> Vec<[u8; 4]> {
        vec![color; 4]
    }

    fn checker_tileset() -> TileSet {
        TileSet::new(2)
            .with_tile("black", Symmetry::X, 1.0, vec![solid(BLACK)])
            .with_tile("white", Symmetry::X, 1.0, vec![solid(WHITE)])
            .with_adjacency(Adjacency::new("black", 0, "white", 0))
    }

    fn config(width: usize, height: usize, periodic: bool) -> TiledConfig {
        TiledConfig {
            width,
            height,
            periodic,
        }
    }

    // Tests default configuration values
    // Verified by changing the default output size
    #[test]
    fn test_default_config() {
        let config = TiledConfig::default();
        assert_eq!((config.width, config.height), (20, 20));
        assert!(!config.periodic);
    }

    // Tests directions pair with their opposites and offsets
    // Verified by swapping the South and North offsets
    #[test]
    fn test_direction_table() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            let (ox, oy) = direction.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(direction.opposite().opposite(), direction);
        }
        assert_eq!(Direction::South.delta(), (0, 1));
        assert_eq!(Direction::West.index(), 0);
    }

    // Tests every orientation becomes its own variant with the tile's weight
    // Verified by pushing one variant per tile instead of per orientation
    #[test]
    fn test_variants_and_weights() {
        let tileset = TileSet::new(2)
            .with_tile("corner", Symmetry::L, 2.0, vec![vec![BLACK, WHITE, WHITE, WHITE]])
            .with_tile("line", Symmetry::I, 0.0, vec![solid(WHITE)])
            .with_tile("empty", Symmetry::X, 1.0, vec![solid(BLACK)]);
        let model = TiledModel::new(&tileset, &config(3, 3, false)).expect("Failed to build model");

        assert_eq!(model.tile_count(), 7);
        assert_eq!(model.stationary(), &[2.0, 2.0, 2.0, 2.0, 1.0, 1.0, 1.0]);
        assert_eq!(model.names().first().map(String::as_str), Some("corner 0"));
        assert_eq!(model.names().get(5).map(String::as_str), Some("line 1"));
    }

    // Tests East is the transpose of West and North the transpose of South
    // Verified by copying West into East without transposing
    #[test]
    fn test_propagator_transpose_symmetry() {
        let tileset = TileSet::new(2)
            .with_tile("corner", Symmetry::L, 1.0, vec![vec![BLACK, WHITE, WHITE, WHITE]])
            .with_tile("tee", Symmetry::T, 1.0, vec![vec![BLACK, BLACK, WHITE, WHITE]])
            .with_adjacency(Adjacency::new("corner", 1, "tee", 0))
            .with_adjacency(Adjacency::new("tee", 3, "corner", 5));
        let model = TiledModel::new(&tileset, &config(4, 4, false)).expect("Failed to build model");

        let count = model.tile_count();
        for a in 0..count {
            for b in 0..count {
                assert_eq!(
                    model.compatible(Direction::East, a, b),
                    model.compatible(Direction::West, b, a)
                );
                assert_eq!(
                    model.compatible(Direction::North, a, b),
                    model.compatible(Direction::South, b, a)
                );
            }
        }
    }

    // Tests a single declared rule expands to its mirror and vertical forms
    // Verified by dropping the reflected expansion
    #[test]
    fn test_adjacency_expansion() {
        let model = TiledModel::new(&checker_tileset(), &config(2, 2, false))
            .expect("Failed to build model");

        // black = 0, white = 1
        assert!(model.compatible(Direction::West, 1, 0));
        assert!(model.compatible(Direction::West, 0, 1));
        assert!(model.compatible(Direction::South, 0, 1));
        assert!(model.compatible(Direction::North, 1, 0));
        assert!(!model.compatible(Direction::East, 0, 0));
        assert!(!model.compatible(Direction::South, 1, 1));
    }

    // Tests adjacency rules naming undeclared tiles fail construction
    // Verified by skipping unresolved rules
    #[test]
    fn test_unknown_tile() {
        let tileset = checker_tileset().with_adjacency(Adjacency::new("black", 0, "grey", 0));
        assert!(matches!(
            TiledModel::new(&tileset, &config(2, 2, false)),
            Err(WfcError::UnknownTile { name }) if name == "grey"
        ));
    }

    // Tests transform indices past the action row are configuration errors
    // Verified by wrapping the transform index modulo eight
    #[test]
    fn test_transform_out_of_range() {
        let tileset = checker_tileset().with_adjacency(Adjacency::new("black", 8, "white", 0));
        assert!(matches!(
            TiledModel::new(&tileset, &config(2, 2, false)),
            Err(WfcError::InvalidTileset { .. })
        ));
    }

    // Tests malformed catalogs fail before generation
    // Verified by removing the empty catalog and weight checks
    #[test]
    fn test_invalid_catalogs() {
        assert!(TiledModel::new(&TileSet::new(2), &config(2, 2, false)).is_err());
        assert!(TiledModel::new(&checker_tileset(), &config(0, 2, false)).is_err());

        let negative = TileSet::new(2).with_tile("x", Symmetry::X, -1.0, vec![solid(BLACK)]);
        assert!(TiledModel::new(&negative, &config(2, 2, false)).is_err());

        let wrong_size = TileSet::new(3).with_tile("x", Symmetry::X, 1.0, vec![solid(BLACK)]);
        assert!(TiledModel::new(&wrong_size, &config(2, 2, false)).is_err());
    }

    // Tests every cell is eligible for observation
    // Verified by reusing the overlapping boundary test
    #[test]
    fn test_never_on_boundary() {
        let model = TiledModel::new(&checker_tileset(), &config(3, 3, false))
            .expect("Failed to build model");
        for x in 0..3 {
            for y in 0..3 {
                assert!(!model.on_boundary(x, y));
            }
        }
    }

    // Tests propagation from one collapsed cell fixes the whole checkerboard
    // Verified by skipping neighbors flagged during the current sweep
    #[test]
    fn test_propagation_reaches_fixed_point() {
        let model = TiledModel::new(&checker_tileset(), &config(4, 3, false))
            .expect("Failed to build model");
        let mut state = WaveState::new(4, 3, model.stationary().to_vec());
        state.collapse(0, 0, 0);

        while model.propagate(&mut state) {}

        assert!(!state.has_changes());
        assert!(state.is_fully_collapsed());
        for x in 0..4 {
            for y in 0..3 {
                let expected = (x + y) % 2;
                assert_eq!(state.cell(x, y).and_then(|set| set.single()), Some(expected));
            }
        }
    }

    // Tests a successful run stamps full tile blocks
    // Verified by stamping only the first pixel of each tile
    #[test]
    fn test_render_complete() {
        let model = TiledModel::new(&checker_tileset(), &config(2, 2, true))
            .expect("Failed to build model");
        let mut engine = Collapse::seeded(model, 4);
        assert_eq!(engine.generate(), Outcome::Success);

        let output = engine.render();
        assert_eq!((output.width(), output.height()), (4, 4));
        assert_eq!(output.get(0, 0), output.get(1, 1));
        assert_ne!(output.get(0, 0), output.get(2, 0));
        assert_eq!(output.get(0, 0), output.get(2, 2));
    }

    // Tests maximal uncertainty renders gray and partial sets blend by weight
    // Verified by averaging with equal weights
    #[test]
    fn test_render_incomplete() {
        let tileset = TileSet::new(1)
            .with_tile("a", Symmetry::X, 1.0, vec![vec![[0, 0, 0, 255]]])
            .with_tile("b", Symmetry::X, 3.0, vec![vec![[200, 100, 40, 255]]])
            .with_tile("c", Symmetry::X, 1.0, vec![vec![[9, 9, 9, 255]]]);
        let model = TiledModel::new(&tileset, &config(2, 1, false)).expect("Failed to build model");
        let mut state = WaveState::new(2, 1, model.stationary().to_vec());
        state.ban(1, 0, 2);

        let output = model.render(&state, Outcome::Incomplete);
        assert_eq!(output.get(0, 0), Some(NEUTRAL_GRAY));
        assert_eq!(output.get(1, 0), Some([150, 75, 30, 255]));
    }

    // Tests cells with no candidates render gray
    // Verified by blending an empty set to black
    #[test]
    fn test_render_contradiction_cell() {
        let model = TiledModel::new(&checker_tileset(), &config(1, 1, false))
            .expect("Failed to build model");
        let mut state = WaveState::new(1, 1, model.stationary().to_vec());
        state.ban(0, 0, 0);
        state.ban(0, 0, 1);

        let output = model.render(&state, Outcome::Contradiction);
        assert_eq!(output.get(1, 1), Some(NEUTRAL_GRAY));
    }
}
