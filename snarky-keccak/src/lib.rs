#![doc = include_str!("../README.md")]

pub mod circuits;
pub mod field;
pub mod gadgets;
pub mod keccak;
pub mod snarky;

/// Handy macro to return the filename and line number of a place in the code.
#[macro_export]
macro_rules! loc {
    () => {{
        ::std::borrow::Cow::<'static, str>::Owned(format!("{}:{}", file!(), line!()))
    }};
}
