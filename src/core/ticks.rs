//! Tick spacing and "nice" domain rounding shared by continuous scales.

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;
const EXPONENT_SNAP: f64 = 1e-9;

/// Default tick density used when rounding a domain.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Step between ticks for `[start, stop]` split into about `count` intervals,
/// restricted to 1, 2 or 5 times a power of ten.
///
/// Positive results are the step itself. Negative results encode a fractional
/// step as `-1 / step` so integer arithmetic stays exact.
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / (count.max(1) as f64);
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10_f64.powf(power)
    } else {
        -10_f64.powf(-power) / factor
    }
}

/// Extends `(low, high)` outward to multiples of the tick step. Reversed
/// domains stay reversed.
#[must_use]
pub fn nice_linear(domain: (f64, f64), count: usize) -> (f64, f64) {
    let reversed = domain.1 < domain.0;
    let (mut start, mut stop) = if reversed {
        (domain.1, domain.0)
    } else {
        domain
    };

    let mut previous_step = f64::NAN;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if step == previous_step {
            break;
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        previous_step = step;
    }

    if reversed { (stop, start) } else { (start, stop) }
}

/// Extends a strictly positive domain outward to whole powers of `base`.
/// Ends that already sit on a power are kept.
#[must_use]
pub fn nice_log(domain: (f64, f64), base: f64) -> (f64, f64) {
    let floor = |value: f64| base.powi(log_exponent(value, base).floor() as i32);
    let ceil = |value: f64| base.powi(log_exponent(value, base).ceil() as i32);
    if domain.1 < domain.0 {
        (ceil(domain.0), floor(domain.1))
    } else {
        (floor(domain.0), ceil(domain.1))
    }
}

/// Exponent of `value` in `base`, snapped to the nearest integer when it is
/// within rounding noise of one.
fn log_exponent(value: f64, base: f64) -> f64 {
    let exponent = if base == 10.0 {
        value.log10()
    } else if base == 2.0 {
        value.log2()
    } else {
        value.ln() / base.ln()
    };
    let nearest = exponent.round();
    if (exponent - nearest).abs() < EXPONENT_SNAP {
        nearest
    } else {
        exponent
    }
}

/// Evenly stepped ticks inside the domain, in domain order.
#[must_use]
pub fn linear_ticks(domain: (f64, f64), count: usize) -> Vec<f64> {
    if count == 0 || !domain.0.is_finite() || !domain.1.is_finite() {
        return Vec::new();
    }
    if domain.0 == domain.1 {
        return vec![domain.0];
    }

    let reversed = domain.1 < domain.0;
    let (start, stop) = if reversed {
        (domain.1, domain.0)
    } else {
        domain
    };
    let step = tick_increment(start, stop, count);
    let mut ticks: Vec<f64> = if step > 0.0 {
        let first = (start / step).ceil() as i64;
        let last = (stop / step).floor() as i64;
        (first..=last).map(|index| index as f64 * step).collect()
    } else if step < 0.0 {
        let inverse = -step;
        let first = (start * inverse).ceil() as i64;
        let last = (stop * inverse).floor() as i64;
        (first..=last).map(|index| index as f64 / inverse).collect()
    } else {
        Vec::new()
    };

    if reversed {
        ticks.reverse();
    }
    ticks
}

/// Log-axis ticks thinned to `tick_count`: a 1-2-5 ladder per decade for
/// base 10, whole powers for any other base. Spans holding fewer than two
/// such ticks fall back to [`linear_ticks`].
#[must_use]
pub fn log_ladder_ticks(domain: (f64, f64), base: f64, tick_count: usize) -> Vec<f64> {
    let (start, end) = domain;
    if tick_count == 0 || start <= 0.0 || end <= 0.0 {
        return Vec::new();
    }

    let min = start.min(end);
    let max = start.max(end);
    let min_exp = log_exponent(min, base).floor() as i32;
    let max_exp = log_exponent(max, base).ceil() as i32;
    let multipliers: &[f64] = if base == 10.0 { &[1.0, 2.0, 5.0] } else { &[1.0] };

    let mut ticks = Vec::new();
    for exp in min_exp..=max_exp {
        let power = base.powi(exp);
        for multiplier in multipliers {
            let candidate = power * multiplier;
            if candidate >= min && candidate <= max {
                ticks.push(candidate);
            }
        }
    }

    if ticks.len() < 2 {
        return linear_ticks(domain, tick_count);
    }
    if ticks.len() > tick_count {
        ticks = evenly_sample(&ticks, tick_count);
    }
    if end < start {
        ticks.reverse();
    }
    ticks
}

fn evenly_sample(ticks: &[f64], target: usize) -> Vec<f64> {
    if target == 1 {
        return vec![ticks[0]];
    }
    let last_index = ticks.len() - 1;
    let mut sampled: Vec<f64> = (0..target)
        .map(|step| {
            let ratio = step as f64 / (target - 1) as f64;
            ticks[((ratio * last_index as f64).round() as usize).min(last_index)]
        })
        .collect();
    sampled.dedup();
    sampled
}
