#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
//! Demo building cone maps for a synthetic ripple height field.
//!
//! Demonstrates:
//! - The full precompute pipeline (brute-force build + relaxation)
//! - The quantized texture handoff and the sampler contract
//! - Reading the result back as a coarse ASCII shading

use conestep::{ConeMapParams, ConeMapPipeline, ConeMapSampler, HeightField};

const DIM: u32 = 48;

fn main() -> conestep::Result<()> {
    conestep::init_logging();

    // Concentric ripple, peaks at the center
    let mut samples = Vec::with_capacity((DIM * DIM) as usize);
    for y in 0..DIM {
        for x in 0..DIM {
            let cx = x as f32 - DIM as f32 / 2.0;
            let cy = y as f32 - DIM as f32 / 2.0;
            let r = (cx * cx + cy * cy).sqrt() / DIM as f32;
            let h = 0.5 + 0.5 * (r * 24.0).cos() * (1.0 - r).max(0.0);
            samples.push(h);
        }
    }
    let field = HeightField::new(DIM, DIM, samples)?;
    let (min, max) = field.min_max();
    println!("height field: {DIM}x{DIM}, sample range [{min:.3}, {max:.3}]");

    // A steep vertical unit so the ripple walls actually constrain the map;
    // the derived default (DIM / 256) would leave everything unclamped.
    let pipeline = ConeMapPipeline::new().with_params(ConeMapParams {
        scale: DIM as f32,
        epsilon: 0.01,
    });
    let build = pipeline.build(&field)?;
    println!(
        "relaxation: {} iterations, converged: {}",
        build.relax_iterations, build.relax_converged
    );

    let textures = build.textures();
    let mean = |bytes: &[u8]| {
        bytes.iter().map(|&b| u32::from(b)).sum::<u32>() as f32 / bytes.len() as f32 / 255.0
    };
    println!(
        "mean cone ratio: {:.3} plain, {:.3} relaxed",
        mean(&textures.cone),
        mean(&textures.relaxed)
    );

    // Coarse shading of the relaxed map: dark means tightly constrained.
    let sampler = ConeMapSampler::new(textures.width, textures.height, &textures.relaxed)?;
    let shades = [b'#', b'+', b'-', b'.', b' '];
    for y in (0..DIM).step_by(2) {
        let mut line = String::with_capacity(DIM as usize);
        for x in 0..DIM {
            let ratio = sampler.ratio_at(x, y);
            let shade = shades[((ratio * (shades.len() - 1) as f32).round()) as usize];
            line.push(shade as char);
        }
        println!("{line}");
    }

    Ok(())
}
