use std::{fmt::Display, ops::Deref, str::FromStr};

use anyhow::anyhow;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Percentage {
    pub fn new_opt(value: f64) -> Option<Percentage> {
        if value < 0. {
            None
        } else {
            Some(Percentage(value))
        }
    }
}

impl FromStr for Percentage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // This means that 100%% also works, but I think I'm fine with that
        let s = s.trim_end_matches("%");
        let v = s.parse::<f64>()?;
        Percentage::new_opt(v).ok_or_else(|| anyhow!("Can't parse {s} into percentage"))
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Share of `value` in `whole`, rounded to 2 decimals the way the summary
/// document reports it. Zero when there is nothing to divide by.
pub fn share_of_total(value: f64, whole: f64) -> f64 {
    if whole <= 0. {
        return 0.;
    }
    (value / whole * 100. * 100.).round() / 100.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_rounds_to_two_decimals() {
        assert_eq!(share_of_total(100., 150.), 66.67);
        assert_eq!(share_of_total(50., 150.), 33.33);
        assert_eq!(share_of_total(1., 3.), 33.33);
    }

    #[test]
    fn share_of_empty_total_is_zero() {
        assert_eq!(share_of_total(10., 0.), 0.);
    }

    #[test]
    fn percentage_parses_with_and_without_sign() {
        assert_eq!(*"15".parse::<Percentage>().unwrap(), 15.);
        assert_eq!(*"2.5%".parse::<Percentage>().unwrap(), 2.5);
        assert!("-3".parse::<Percentage>().is_err());
    }
}
