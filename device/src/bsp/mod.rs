//! Board Support Packages (BSP).

pub mod sense_hat;

/// A board capable of creating itself using peripherals.
pub trait Board: Sized {
    type Peripherals;

    fn new(peripherals: Self::Peripherals) -> Self;
}
