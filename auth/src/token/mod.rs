pub mod codec;
pub mod errors;

pub use codec::TokenCodec;
pub use codec::SEPARATOR;
pub use errors::TokenError;
