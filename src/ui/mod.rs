pub mod callbacks;
pub mod panels;
pub mod plot;
