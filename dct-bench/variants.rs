use dct_denoise::{Algorithm, DenoiseOptions, Parallelism, Threshold};
use strum_macros::{Display, EnumIter};

// the direct transform is O(W²·H²), larger images only run the separable variants
pub const DIRECT_PIXEL_LIMIT: usize = 96 * 96;

#[derive(Debug, Display, EnumIter, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum Variant {
    Direct,
    DirectPar,
    Separable,
    SeparablePar,
}

impl Variant {
    pub fn options(self, threshold: f64) -> DenoiseOptions {
        let (algorithm, parallelism) = match self {
            Variant::Direct => (Algorithm::Direct, Parallelism::Sequential),
            Variant::DirectPar => (Algorithm::Direct, Parallelism::PerChannel),
            Variant::Separable => (Algorithm::Separable, Parallelism::Sequential),
            Variant::SeparablePar => (Algorithm::Separable, Parallelism::PerChannel),
        };

        DenoiseOptions {
            threshold: Threshold(threshold),
            algorithm,
            parallelism,
            ..Default::default()
        }
    }

    pub fn supports(self, pixels: usize) -> bool {
        match self {
            Variant::Direct | Variant::DirectPar => pixels <= DIRECT_PIXEL_LIMIT,
            Variant::Separable | Variant::SeparablePar => true,
        }
    }
}
