//! Logging shims
//!
//! With the `defmt` feature enabled these forward to `defmt`, otherwise they compile to nothing. Only the control rate
//! path logs, the sample rate path must stay free of logging.

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    }};
}

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::info!($($arg)*);
    }};
}

pub(crate) use debug;
pub(crate) use info;
