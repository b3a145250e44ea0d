pub mod hit;
pub mod svg;

pub use hit::{CollisionIndex, hit_test_cargo, hit_test_slat, sample_points};
pub use svg::{render_cargo_swatch, render_svg};
