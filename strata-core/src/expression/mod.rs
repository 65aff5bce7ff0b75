mod expr;
mod func;
mod operand;
mod operator;
mod raw;

pub use expr::*;
pub use func::*;
pub use operand::*;
pub use operator::*;
pub use raw::*;
