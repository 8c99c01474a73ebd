//! Logging and assertion shim
//!
//! Forwards to `defmt` when the `embedded` feature is enabled. On host
//! builds log statements are discarded and assertions fall back to
//! `core::assert!`, so call sites never carry their own `#[cfg]` gates.

#![macro_use]
#![allow(unused_macros)]

macro_rules! assert {
    ($($x:tt)*) => {
        {
            #[cfg(not(feature = "embedded"))]
            ::core::assert!($($x)*);
            #[cfg(feature = "embedded")]
            ::defmt::assert!($($x)*);
        }
    };
}

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "embedded")]
            ::defmt::trace!($s $(, $x)*);
            #[cfg(not(feature = "embedded"))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "embedded")]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(not(feature = "embedded"))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "embedded")]
            ::defmt::info!($s $(, $x)*);
            #[cfg(not(feature = "embedded"))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "embedded")]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(not(feature = "embedded"))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "embedded")]
            ::defmt::error!($s $(, $x)*);
            #[cfg(not(feature = "embedded"))]
            let _ = ($( & $x ),*);
        }
    };
}
