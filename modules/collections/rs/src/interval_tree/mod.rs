pub use bits::{Bits, Iter};

mod bits;
