mod rain;

pub use rain::SHADER_RAIN;
