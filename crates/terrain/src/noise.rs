//! Hash-based 2D value noise and its fractal sum.
//!
//! Evaluated in `f64` so lattice hashes stay stable far from the origin.

/// Deterministic pseudo-random value in `[0, 1)` for a lattice point.
pub fn hash2(x: f64, z: f64) -> f64 {
    let s = (x * 127.1 + z * 311.7).sin() * 43_758.545_312_3;
    s - s.floor()
}

/// Hermite easing `3t^2 - 2t^3`. Zero slope at both ends keeps the field
/// continuous in value and slope across cell edges.
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Bilinear interpolation of the four surrounding lattice hashes.
pub fn value_noise(x: f64, z: f64) -> f64 {
    let xi = x.floor();
    let zi = z.floor();
    let u = smoothstep(x - xi);
    let v = smoothstep(z - zi);

    let a = hash2(xi, zi);
    let b = hash2(xi + 1.0, zi);
    let c = hash2(xi, zi + 1.0);
    let d = hash2(xi + 1.0, zi + 1.0);

    lerp(lerp(a, b, u), lerp(c, d, u), v)
}

/// Fractal sum: amplitude halves and frequency doubles per octave. The total
/// is divided by the summed amplitude, so the result stays in `[0, 1)`.
pub fn fbm(x: f64, z: f64, octaves: u32, base_frequency: f64) -> f64 {
    let mut total = 0.0;
    let mut amp = 1.0;
    let mut freq = base_frequency;
    let mut norm = 0.0;

    for _ in 0..octaves {
        total += value_noise(x * freq, z * freq) * amp;
        norm += amp;
        amp *= 0.5;
        freq *= 2.0;
    }

    if norm > 0.0 { total / norm } else { 0.0 }
}
