pub mod hts221;
pub mod lps25h;
