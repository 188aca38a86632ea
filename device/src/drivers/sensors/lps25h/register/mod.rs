pub mod ctrl1;
pub mod ctrl2;
pub mod p_out;
pub mod status;
pub mod t_out;
pub mod who_am_i;
