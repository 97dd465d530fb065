//! Builds an octree over a random point cloud, times every phase of its
//! lifecycle and writes one `x,y,z,label` row per point to a CSV file,
//! labelling each point by the leaf it ended up in.
//!
//! Usage: `cargo run --example leaf_labels [point_count] [max_points_per_leaf]`

use orthtree::prelude::*;
use rand::prelude::*;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let count: usize = args.next().as_deref().unwrap_or("100000").parse()?;
    let max_points_per_leaf: usize = args.next().as_deref().unwrap_or("16").parse()?;

    let mut rng = StdRng::seed_from_u64(1808);
    let points: Vec<[f32; 3]> = (0..count)
        .map(|_| [0.0; 3].map(|_| rng.gen_range(-1.0..1.0)))
        .collect();

    let params = BuildParams {
        max_points_per_leaf,
        ..BuildParams::default()
    };

    let start = Instant::now();
    let mut tree = Octree::new();
    tree.build(points.as_slice(), &params)?;
    println!("==== Building took {:?} ({} nodes)", start.elapsed(), tree.node_count());

    let start = Instant::now();
    let mut copy = tree.clone();
    println!("==== Copying took {:?}", start.elapsed());

    let start = Instant::now();
    let moved = copy.take(Octree::<f32>::ROOT)?;
    println!("==== Moving took {:?}", start.elapsed());
    drop(moved);

    let path = format!("leaf-labels-{}.csv", std::process::id());
    let mut output = BufWriter::new(File::create(&path)?);
    writeln!(output, "x,y,z,label")?;

    let start = Instant::now();
    let mut label = 0u32;
    let mut write_result = Ok(());
    tree.visit(|node| {
        if let Some(indices) = node.points() {
            if indices.is_empty() {
                return true;
            }
            for &index in indices {
                let [x, y, z] = points[index];
                if let Err(error) = writeln!(output, "{x},{y},{z},{label}") {
                    write_result = Err(error);
                    return false;
                }
            }
            label += 1;
        }
        true
    });
    write_result?;
    println!("==== Visiting took {:?} ({} labelled leaves, {path})", start.elapsed(), label);

    Ok(())
}
