#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes the shared five-product catalog and returns its path.
    pub fn write_catalog(&self) -> PathBuf {
        self.write("products.csv", CATALOG_CSV)
    }

    /// Writes the board matching [`CATALOG_CSV`] and returns its path.
    pub fn write_board(&self) -> PathBuf {
        self.write("board.yml", CATALOG_BOARD)
    }
}

/// Five products covering both flushable states, three materials, a rating
/// spread, and a missing URL.
pub const CATALOG_CSV: &str = "\
Product,Product_URL,Material,Flushable,Scented,Mean_Scraped_Rating,Price,Good Clumping,Good Odor Blocking,Overall_Score
Scoop Master,https://example.com/scoop-master,Clay,Not Flushable,Scented,4.5,19.99,1,1,0.9
Corn Fresh,https://example.com/corn-fresh,Corn,Flushable,Unscented,4.2,24.5,1,0,0.82
Pine Cloud,,Pine,Flushable,Unscented,3.8,12.0,0,1,0.74
Clay Classic,https://example.com/clay-classic,Clay,Not Flushable,Unscented,3.1,8.99,1,0,0.6
Corn Lite,https://example.com/corn-lite,Corn,Flushable,Scented,4.2,15.25,1,1,0.78
";

pub const CATALOG_BOARD: &str = r#"title: Litter Picks
columns:
  - name: Material
    kind: categorical
  - name: Flushable
    kind: categorical
  - name: Scented
    kind: categorical
  - name: Mean_Scraped_Rating
    kind: numeric
  - name: Price
    kind: numeric
  - name: Overall_Score
    kind: numeric
  - name: Good Clumping
    kind: boolean
  - name: Good Odor Blocking
    kind: boolean
  - name: Product_URL
    kind: link
filters:
  - id: material
    kind: set
    column: Material
    on_empty: nothing
  - id: flushable
    kind: bool_pair
    column: Flushable
    states:
      - label: Flushable
        value: Flushable
      - label: Not Flushable
        value: Not Flushable
  - id: scented
    kind: flag
    column: Scented
    true_value: Scented
  - id: rating
    kind: range
    column: Mean_Scraped_Rating
  - id: price
    kind: range
    column: Price
  - id: features
    kind: features
    labels:
      - label: Good Clumping
        column: Good Clumping
      - label: Good Odor Blocking
        column: Good Odor Blocking
display:
  - column: Product
    label: Product
  - column: Product_URL
    label: Product Page
    format:
      kind: link
      link_label: View Product
  - column: Material
    label: Material
  - column: Mean_Scraped_Rating
    label: Rating
    format:
      kind: decimal
      places: 1
  - column: Price
    label: Price
    format:
      kind: currency
  - column: Overall_Score
    label: Overall Score
    format:
      kind: percent
sort:
  column: Overall_Score
  descending: true
"#;

/// Parses the shared catalog into an in-memory dataset for engine tests.
pub fn catalog_dataset(board: &facet_board::board::Board) -> facet_board::dataset::Dataset {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(CATALOG_CSV.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .expect("catalog headers")
        .iter()
        .map(str::to_string)
        .collect();
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|record| {
            record
                .expect("catalog record")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect();
    facet_board::dataset::Dataset::from_rows(headers, rows, board)
}

pub fn catalog_board() -> facet_board::board::Board {
    facet_board::board::Board::from_yaml_str(CATALOG_BOARD).expect("catalog board")
}
