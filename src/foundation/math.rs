pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// `n` evenly spaced samples over `[start, stop]`, endpoints included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            // Pin the endpoint so callers comparing against `stop` see it exactly.
            out[n - 1] = stop;
            out
        }
    }
}

/// Half-open range `[start, stop)` with `step` increments.
pub fn arange(start: f64, stop: f64, step: f64) -> Option<Vec<f64>> {
    if step == 0.0 || !step.is_finite() || !start.is_finite() || !stop.is_finite() {
        return None;
    }
    let n = ((stop - start) / step).ceil();
    if n <= 0.0 {
        return Some(Vec::new());
    }
    Some((0..n as usize).map(|i| start + step * i as f64).collect())
}

/// Round-number ticks covering `[lo, hi]`, roughly `target` of them.
pub(crate) fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if hi == lo {
        return vec![lo];
    }
    let step = nice_step((hi - lo) / target.max(1) as f64);
    let eps = step * 1e-9;
    let first = (lo / step - 1e-9).ceil() * step;
    let mut out = Vec::new();
    let mut k = 0usize;
    loop {
        let v = first + step * k as f64;
        if v > hi + eps {
            break;
        }
        out.push(if v.abs() < eps { 0.0 } else { v });
        k += 1;
    }
    out
}

fn nice_step(raw: f64) -> f64 {
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let mult = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|m| *m >= norm - 1e-12)
        .unwrap_or(10.0);
    mult * mag
}

/// Format tick values with the number of decimals needed to tell neighbours apart.
pub(crate) fn format_ticks(ticks: &[f64]) -> Vec<String> {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .filter(|d| *d > 0.0)
        .fold(f64::INFINITY, f64::min);
    let decimals = if step.is_finite() {
        decimals_for(step)
    } else {
        ticks.first().map_or(0, |v| decimals_for(v.abs().max(1e-12)))
    };
    ticks
        .iter()
        .map(|v| {
            let s = format!("{v:.decimals$}");
            if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
                s[1..].to_owned()
            } else {
                s
            }
        })
        .collect()
}

fn decimals_for(step: f64) -> usize {
    for d in 0..=8 {
        let scaled = step * 10f64.powi(d as i32);
        if (scaled - scaled.round()).abs() < 1e-6 * scaled.abs().max(1.0) {
            return d;
        }
    }
    8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
