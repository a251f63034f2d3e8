use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

// Must match MATRIX_ROWS / MATRIX_COLUMNS in src/layout.rs
const ROWS: u8 = 4;
const COLUMNS: u8 = 16;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("key_positions.rs");
    let mut f = File::create(&dest_path).unwrap();

    writeln!(
        f,
        "// Named key indexes for every matrix position, generated by build.rs"
    )
    .unwrap();

    for row in 0..ROWS {
        for col in 0..COLUMNS {
            writeln!(
                f,
                "/// Key index of row {row}, column {col}\npub const R{row}C{col}: KeyIndex = key_index({row}, {col});"
            )
            .unwrap();
        }
    }

    writeln!(
        f,
        r#"
/// Every named position, in key index order.
pub const ALL_POSITIONS: [KeyIndex; {count}] = [{list}];
"#,
        count = ROWS as usize * COLUMNS as usize,
        list = (0..ROWS)
            .flat_map(|row| (0..COLUMNS).map(move |col| format!("R{row}C{col}")))
            .collect::<Vec<_>>()
            .join(", ")
    )
    .unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}
