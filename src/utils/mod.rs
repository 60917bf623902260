pub mod big_num;
pub mod fmt;
pub mod math;
