//! Tests for JSON tile catalog parsing and tile image loading

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use std::path::Path;
    use tempfile::TempDir;
    use wavecollapse::WfcError;
    use wavecollapse::io::tileset::{TilesetDocument, load_block, load_tileset};
    use wavecollapse::spatial::tiles::{Adjacency, Symmetry};

    fn write_tile(dir: &Path, file: &str, size: u32, color: [u8; 4]) {
        std::fs::create_dir_all(dir).expect("Failed to create tile dir");
        RgbaImage::from_pixel(size, size, Rgba(color))
            .save(dir.join(file))
            .expect("Failed to write tile");
    }

    // Tests omitted fields take their documented defaults
    // Verified by defaulting the tile size to zero
    #[test]
    fn test_document_defaults() {
        let document = TilesetDocument::from_json(
            r#"{ "tiles": [{ "name": "grass" }], "neighbors": [{ "left": "grass", "right": "grass" }] }"#,
            Path::new("inline.json"),
        )
        .expect("Failed to parse");

        assert_eq!(document.path, "");
        assert!(!document.unique);
        assert_eq!(document.tile_size, 16);
        let tile = document.tiles.first().expect("Tile missing");
        assert_eq!(tile.symmetry, "");
        assert!(tile.weight.abs() < f64::EPSILON);
        let rule = document.neighbors.first().expect("Rule missing");
        assert_eq!((rule.left_num, rule.right_num), (0, 0));
    }

    // Tests camelCase keys map onto the document fields
    // Verified by removing the rename attribute
    #[test]
    fn test_document_keys() {
        let document = TilesetDocument::from_json(
            r#"{ "path": "tiles", "unique": true, "tileSize": 3,
                 "tiles": [{ "name": "a", "symmetry": "L", "weight": 0.5 }],
                 "neighbors": [{ "left": "a", "leftNum": 1, "right": "a", "rightNum": 6 }] }"#,
            Path::new("inline.json"),
        )
        .expect("Failed to parse");

        assert!(document.unique);
        assert_eq!(document.tile_size, 3);
        assert_eq!(document.image_dir(Path::new("base")), Path::new("base").join("tiles"));
        let rule = document.neighbors.first().expect("Rule missing");
        assert_eq!((rule.left_num, rule.right_num), (1, 6));
    }

    // Tests malformed JSON surfaces as a parse error with the origin path
    // Verified by mapping parse failures to InvalidTileset
    #[test]
    fn test_parse_error() {
        let result = TilesetDocument::from_json("{ tiles: ", Path::new("broken.json"));
        assert!(matches!(result, Err(WfcError::TilesetParse { path, .. }) if path == Path::new("broken.json")));
    }

    // Tests a full catalog loads images relative to the document
    // Verified by resolving images against the working directory
    #[test]
    fn test_load_tileset() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let images = temp_dir.path().join("pieces");
        write_tile(&images, "sand.png", 2, [200, 180, 90, 255]);
        write_tile(&images, "water.png", 2, [20, 60, 200, 255]);

        let json = r#"{
            "path": "pieces",
            "tileSize": 2,
            "tiles": [
                { "name": "sand", "symmetry": "X", "weight": 2.0 },
                { "name": "water", "symmetry": "I" }
            ],
            "neighbors": [{ "left": "sand", "right": "water", "rightNum": 1 }]
        }"#;
        let document_path = temp_dir.path().join("coast.json");
        std::fs::write(&document_path, json).expect("Failed to write document");

        let tileset = load_tileset(&document_path).expect("Failed to load tileset");
        assert_eq!(tileset.tile_size, 2);
        assert_eq!(tileset.tiles.len(), 2);
        let water = tileset.tiles.get(1).expect("Water tile missing");
        assert_eq!(water.symmetry, Symmetry::I);
        assert_eq!(water.variants, vec![vec![[20, 60, 200, 255]; 4]]);
        assert_eq!(tileset.neighbors, vec![Adjacency::new("sand", 0, "water", 1)]);
    }

    // Tests unique catalogs read numbered images until the first gap
    // Verified by loading only the first numbered image
    #[test]
    fn test_unique_variants() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write_tile(temp_dir.path(), "bend 1.png", 1, [1, 0, 0, 255]);
        write_tile(temp_dir.path(), "bend 2.png", 1, [2, 0, 0, 255]);
        write_tile(temp_dir.path(), "bend 4.png", 1, [4, 0, 0, 255]);

        let document = TilesetDocument::from_json(
            r#"{ "unique": true, "tileSize": 1, "tiles": [{ "name": "bend", "symmetry": "I" }] }"#,
            Path::new("inline.json"),
        )
        .expect("Failed to parse");
        let tileset = document
            .into_tileset(temp_dir.path())
            .expect("Failed to load tileset");

        let bend = tileset.tiles.first().expect("Tile missing");
        assert_eq!(bend.variants, vec![vec![[1, 0, 0, 255]], vec![[2, 0, 0, 255]]]);
    }

    // Tests unknown symmetry tags and wrongly sized images are rejected
    // Verified by skipping the size check in load_block
    #[test]
    fn test_invalid_tiles() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write_tile(temp_dir.path(), "big.png", 3, [0, 0, 0, 255]);
        assert!(matches!(
            load_block(&temp_dir.path().join("big.png"), 2),
            Err(WfcError::InvalidTileset { .. })
        ));

        let document = TilesetDocument::from_json(
            r#"{ "tileSize": 3, "tiles": [{ "name": "big", "symmetry": "Z" }] }"#,
            Path::new("inline.json"),
        )
        .expect("Failed to parse");
        assert!(document.into_tileset(temp_dir.path()).is_err());
    }

    // Tests a missing document is a file system error
    // Verified by treating a missing file as an empty catalog
    #[test]
    fn test_missing_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        assert!(matches!(
            load_tileset(&temp_dir.path().join("absent.json")),
            Err(WfcError::FileSystem { .. })
        ));
    }
}
