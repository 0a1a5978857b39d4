pub mod attachment;
pub mod clock;
pub mod html;
