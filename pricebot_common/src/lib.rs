mod isk;

pub mod helpers;
pub mod op;

pub use isk::{Isk, IskConversionError, ISK_CURRENCY_CODE};
