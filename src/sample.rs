//! The `sample` command: starter files for a first run.
//!
//! Writes a small cat-litter catalog and a board that exercises every
//! filter kind and display format, so `show` and `facets` have something
//! to chew on before real data is wired up.

use anyhow::{Context, Result, anyhow};
use log::info;

use crate::{board::Board, cli::SampleArgs, io_utils};

const SAMPLE_BOARD: &str = r#"title: Cat Litter Recommendations
columns:
  - name: Material
    kind: categorical
    canonicalize:
      trim: true
  - name: Mfg Location
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
  - id: location
    kind: set
    column: Mfg Location
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
  - column: Mfg Location
    label: Made In
  - column: Mean_Scraped_Rating
    label: Rating
    format:
      kind: decimal
      places: 1
  - column: Price
    label: Price
    format:
      kind: currency
      symbol: "$"
  - column: Overall_Score
    label: Overall Score
    format:
      kind: percent
sort:
  column: Overall_Score
  descending: true
"#;

const SAMPLE_HEADER: [&str; 11] = [
    "Product",
    "Product_URL",
    "Material",
    "Mfg Location",
    "Flushable",
    "Scented",
    "Mean_Scraped_Rating",
    "Price",
    "Good Clumping",
    "Good Odor Blocking",
    "Overall_Score",
];

// A couple of rows carry holes on purpose (missing URL, missing price,
// N/A rating) so degraded formatting is visible out of the box.
const SAMPLE_PRODUCTS: [[&str; 11]; 8] = [
    [
        "World's Best Multiple Cat",
        "https://example.com/worlds-best",
        "Corn",
        "USA",
        "Flushable",
        "Unscented",
        "4.6",
        "32.99",
        "1",
        "1",
        "0.92",
    ],
    [
        "Fresh Step Advanced",
        "https://example.com/fresh-step",
        "Clay",
        "USA",
        "Not Flushable",
        "Scented",
        "4.4",
        "18.49",
        "1",
        "1",
        "0.88",
    ],
    [
        "Arm & Hammer Clump & Seal",
        "https://example.com/clump-seal",
        "Clay",
        "USA",
        "Not Flushable",
        "Scented",
        "4.5",
        "19.97",
        "1",
        "1",
        "0.86",
    ],
    [
        "sWheat Scoop Natural",
        "https://example.com/swheat",
        "Wheat",
        "USA",
        "Flushable",
        "Unscented",
        "4.1",
        "24.99",
        "1",
        "0",
        "0.79",
    ],
    [
        "Feline Pine Original",
        "",
        "Pine",
        "USA",
        "Not Flushable",
        "Unscented",
        "4.3",
        "11.98",
        "0",
        "1",
        "0.77",
    ],
    [
        "Catalyst Healthy Cat",
        "https://example.com/catalyst",
        "Wood",
        "USA",
        "Flushable",
        "Unscented",
        "4.2",
        "",
        "1",
        "1",
        "0.74",
    ],
    [
        "Tidy Cats Lightweight",
        "https://example.com/tidy-cats",
        "Clay",
        "Canada",
        "Not Flushable",
        "Scented",
        "3.9",
        "17.99",
        "1",
        "0",
        "0.71",
    ],
    [
        "PrettyLitter Health Monitoring",
        "https://example.com/prettylitter",
        "Silica",
        "China",
        "Not Flushable",
        "Unscented",
        "N/A",
        "23.99",
        "0",
        "1",
        "0.65",
    ],
];

pub fn execute(args: &SampleArgs) -> Result<()> {
    std::fs::create_dir_all(&args.dir)
        .with_context(|| format!("Creating sample directory {:?}", args.dir))?;
    let csv_path = args.dir.join("products.csv");
    let board_path = args.dir.join("board.yml");
    if !args.force && (csv_path.exists() || board_path.exists()) {
        return Err(anyhow!(
            "Starter files already exist in {:?}; pass --force to overwrite",
            args.dir
        ));
    }

    let mut writer = io_utils::open_csv_writer(Some(&csv_path), b',')?;
    writer
        .write_record(SAMPLE_HEADER)
        .context("Writing sample header")?;
    for row in SAMPLE_PRODUCTS {
        writer.write_record(row).context("Writing sample row")?;
    }
    writer.flush().context("Flushing sample dataset")?;

    // Parse before writing so the shipped starter board is known-valid.
    Board::from_yaml_str(SAMPLE_BOARD).context("Validating sample board")?;
    std::fs::write(&board_path, SAMPLE_BOARD)
        .with_context(|| format!("Writing sample board to {board_path:?}"))?;

    info!("Sample dataset written to {csv_path:?}");
    info!("Sample board written to {board_path:?}");
    println!("Starter files created. Try:");
    println!(
        "  facet-board show -i {} -b {} --select material=Clay --range rating=4:5",
        csv_path.display(),
        board_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_board_is_valid() {
        let board = Board::from_yaml_str(SAMPLE_BOARD).expect("sample board parses");
        assert_eq!(board.filters.len(), 7);
        assert_eq!(board.display.len(), 7);
    }

    #[test]
    fn sample_rows_match_the_header_width() {
        for row in SAMPLE_PRODUCTS {
            assert_eq!(row.len(), SAMPLE_HEADER.len());
        }
    }
}
