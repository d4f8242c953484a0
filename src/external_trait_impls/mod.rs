#[cfg(feature = "rayon")]
pub(crate) mod rayon;
