//! Write a small `.mail` grid with a warped corner, then ingest and classify
//! it with both non-planar policies.
//!
//! Run with: cargo run --example grid_mail [output.mail]

use std::fmt::Write as _;
use std::path::PathBuf;

use mailmesh::prelude::*;

fn grid_text(n: usize, lift: f64) -> String {
    let mut text = String::from("COOR_3D\n");
    for j in 0..=n {
        for i in 0..=n {
            let z = if i == n && j == n { lift } else { 0.0 };
            let _ = writeln!(text, "    N{} {} {} {}", j * (n + 1) + i + 1, i, j, z);
        }
    }
    text.push_str("FINSF\n%\n% quadrangles\n%\nQUAD4\n");
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i + 1;
            let v01 = v00 + n + 1;
            let _ = writeln!(text, "    M{} N{} N{} N{} N{}", j * n + i + 1, v00, v00 + 1, v01 + 1, v01);
        }
    }
    text.push_str("FINSF\nSEG2\n");
    let _ = writeln!(text, "    M{} N1 N{}", n * n + 1, n + 1);
    text.push_str("FINSF\nGROUP_MA NOM=CORNER\n");
    let _ = writeln!(text, "    M{}", n * n);
    text.push_str("FINSF\nGROUP_NO NOM=ORIGIN\n    N1\nFINSF\n");
    text
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("grid.mail"));
    std::fs::write(&path, grid_text(4, 0.5))?;
    println!("Wrote {}", path.display());

    let kernel = NativeKernel::new();
    for fallback in [QuadFallback::SplitDiagonal, QuadFallback::Fill] {
        let options = PipelineOptions::default().with_classify(ClassifyOptions::default().with_fallback(fallback));
        let (mesh, synthesis) = mailmesh::pipeline::run(&path, &kernel, &options)?;
        println!("\n{:?}", fallback);
        println!("{}", MeshSummary::from_snapshot(&mesh).with_synthesis(&synthesis));
    }

    Ok(())
}
