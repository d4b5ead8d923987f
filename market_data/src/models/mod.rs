pub mod bar;
pub mod request;
pub mod series;
