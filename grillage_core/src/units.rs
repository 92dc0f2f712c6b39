//! # Unit Types
//!
//! Lightweight `f64` newtypes for the two length units a deck layout mixes:
//! overall widths are set out in metres, girder flanges and gaps in
//! millimetres. Both serialize as bare numbers.
//!
//! ## Example
//!
//! ```rust
//! use grillage_core::units::{Metres, Millimetres};
//!
//! let width = Metres(4.4);
//! let width_mm: Millimetres = width.into();
//! assert!((width_mm.0 - 4400.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metres(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimetres(pub f64);

/// Millimetres per metre
pub const MM_PER_M: f64 = 1000.0;

impl From<Metres> for Millimetres {
    fn from(m: Metres) -> Self {
        Millimetres(m.0 * MM_PER_M)
    }
}

impl From<Millimetres> for Metres {
    fn from(mm: Millimetres) -> Self {
        Metres(mm.0 / MM_PER_M)
    }
}

macro_rules! impl_length_ops {
    ($unit:ident, $suffix:literal) => {
        impl Add for $unit {
            type Output = $unit;
            fn add(self, rhs: $unit) -> $unit {
                $unit(self.0 + rhs.0)
            }
        }

        impl Sub for $unit {
            type Output = $unit;
            fn sub(self, rhs: $unit) -> $unit {
                $unit(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $unit {
            type Output = $unit;
            fn mul(self, rhs: f64) -> $unit {
                $unit(self.0 * rhs)
            }
        }

        impl Div<f64> for $unit {
            type Output = $unit;
            fn div(self, rhs: f64) -> $unit {
                $unit(self.0 / rhs)
            }
        }

        impl fmt::Display for $unit {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match f.precision() {
                    Some(p) => write!(f, "{:.*} {}", p, self.0, $suffix),
                    None => write!(f, "{} {}", self.0, $suffix),
                }
            }
        }
    };
}

impl_length_ops!(Metres, "m");
impl_length_ops!(Millimetres, "mm");
