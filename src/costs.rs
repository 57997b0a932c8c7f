// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Annualization of investment costs.

use crate::Error;

/// Returns the annuity factor of an asset with a lifetime of `n` years and
/// the discount rate `r`.
///
/// Multiplied with the investment, the factor gives the equal yearly payment
/// that pays off the investment over the lifetime, e.g. a factor of about
/// `0.0802` for 20 years at 5 %. Without discounting, i.e. for `r <= 0`,
/// the factor is `1 / n`.
///
/// Fails with an `InvalidValue` error if the lifetime is not a positive
/// number.
pub fn calculate_cost_annuity(n: f64, r: f64) -> Result<f64, Error> {
    if !n.is_finite() || n <= 0.0 {
        return Err(Error::invalid_value(format!(
            "The lifetime of an asset must be a positive number of years, found {n}."
        )));
    }

    if r > 0.0 {
        Ok(r / (1.0 - 1.0 / (1.0 + r).powf(n)))
    } else {
        Ok(1.0 / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_utils::is_close;
    use crate::ErrorKind;

    #[test]
    fn test_calculate_cost_annuity() -> Result<(), Error> {
        for (n, r, expected) in [
            (10.0, 0.07, 0.14237750272736466),
            (15.0, 0.03, 0.08376658046228799),
            (1.0, 0.05, 1.05),
            (20.0, 0.0, 0.05),
            (20.0, 0.01, 0.05541531489055132),
            (20.0, 0.02, 0.061156718125290346),
            (20.0, 0.03, 0.06721570759685909),
            (20.0, 0.04, 0.07358175032862885),
            (20.0, 0.06, 0.0871845569768514),
        ] {
            let annuity = calculate_cost_annuity(n, r)?;
            assert!(is_close(annuity, expected), "{n}, {r}: {annuity} != {expected}");
        }

        // a negative rate doesn't discount
        assert_eq!(calculate_cost_annuity(4.0, -0.01)?, 0.25);

        Ok(())
    }

    #[test]
    fn test_calculate_cost_annuity_fails() {
        for n in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(
                calculate_cost_annuity(n, 0.05).is_err_and(|e| e.kind() == ErrorKind::InvalidValue),
                "{n}"
            );
        }
    }
}
