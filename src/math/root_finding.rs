use super::intervals::Interval;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RootFindingError {
    #[error("function has the same sign at both ends of {0}")]
    NotBracketed(Interval),
    #[error("hit max iterations ({iterations}), last estimate was {last_estimate}")]
    NoConvergence { last_estimate: f64, iterations: usize },
}

// Adapted from `rtsafe` in http://www.grad.hr/nastava/gs/prg/NumericalRecipesinC.pdf
//
// Stops once a Newton step is smaller than `tolerance`, or once the bracket
// can't be split any further. A tolerance of zero means "run until the bracket
// collapses".
#[allow(clippy::float_cmp)]
pub fn newton_plus_bisection(
    f_and_f_prime: impl Fn(f64) -> (f64, f64),
    mut interval: Interval,
    tolerance: f64,
    num_iterations: usize,
) -> Result<f64, RootFindingError> {
    // Check the endpoints first; we also need to know which way f is oriented.
    let f_lo = f_and_f_prime(interval.lo()).0;
    if f_lo == 0.0 {
        return Ok(interval.lo());
    }
    let f_hi = f_and_f_prime(interval.hi()).0;
    if f_hi == 0.0 {
        return Ok(interval.hi());
    }
    if (f_lo < 0.0) == (f_hi < 0.0) {
        return Err(RootFindingError::NotBracketed(interval));
    }
    let lo_is_neg = f_lo < 0.0;

    let mut guess = interval.midpoint();
    for _ in 0..num_iterations {
        let (f, f_prime) = f_and_f_prime(guess);
        if f == 0.0 {
            return Ok(guess);
        }

        // Update the bracket
        interval = match (lo_is_neg, f < 0.0) {
            (true, true) => interval.split_right(guess),   // - - +
            (true, false) => interval.split_left(guess),   // - + +
            (false, true) => interval.split_left(guess),   // + - -
            (false, false) => interval.split_right(guess), // + + -
        };

        if interval.is_collapsed() {
            return Ok(guess);
        }

        // What's our next guess? Let's try one from Newton's method
        let newton_guess = guess - f / f_prime;

        // If it's outside the interval (or on the edge); discard it. It won't help
        // us shrink our search space.
        let next_guess = if interval.contains(newton_guess)
            && newton_guess != interval.lo()
            && newton_guess != interval.hi()
        {
            newton_guess
        } else {
            // If we can't use Newton, use the midpoint
            interval.midpoint()
        };

        if (next_guess - guess).abs() < tolerance {
            return Ok(next_guess);
        }
        guess = next_guess;
    }

    Err(RootFindingError::NoConvergence {
        last_estimate: guess,
        iterations: num_iterations,
    })
}
