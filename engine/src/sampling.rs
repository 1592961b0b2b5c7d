use log::info;

use crate::api::*;
use crate::mask::MaskPostProcessor;
use crate::params::CloudParams;

/// Runs the full noise-to-mask pipeline for one parameter set.
pub struct CloudEngine {
    params: CloudParams,
}

impl CloudEngine {
    /// Fails with `InvalidParameter` before anything is computed.
    pub fn new(params: CloudParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &CloudParams {
        &self.params
    }

    /// The fBm field the mask is cut from.
    pub fn noise_field(&self) -> Result<NoiseField> {
        let dims = self.params.dimensions()?;
        self.params.fractal().accumulate(dims, self.params.seed())
    }

    /// Mask after thresholding and inversion, before feathering.
    pub fn binary_mask(&self) -> Result<MaskImage> {
        let field = self.noise_field()?;
        Ok(MaskPostProcessor::from_params(&self.params).binary_mask(&field))
    }
}

impl MaskEngine for CloudEngine {
    fn validate(&self) -> Result<()> {
        self.params.validate()
    }

    fn render(&self) -> Result<MaskImage> {
        let p = &self.params;
        info!(
            "rendering {}x{} mask: seed {}, base scale {}, {} octaves{}",
            p.width,
            p.height,
            p.seed,
            p.base_scale,
            p.octaves,
            if p.tileable { ", tileable" } else { "" }
        );
        let field = self.noise_field()?;
        Ok(MaskPostProcessor::from_params(p).process(&field))
    }
}

/// One-shot convenience over [`CloudEngine`].
pub fn synthesize(params: &CloudParams) -> Result<MaskImage> {
    CloudEngine::new(params.clone())?.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> CloudParams {
        CloudParams { width: 48, height: 40, base_scale: 12.0, octaves: 3, ..Default::default() }
    }

    #[test]
    fn invalid_params_fail_before_rendering() {
        let err = CloudEngine::new(CloudParams { width: 0, ..small() }).err().unwrap();
        assert!(matches!(err, CloudError::InvalidParameter { name: "width", .. }));
        assert!(synthesize(&CloudParams { octaves: 0, ..small() }).is_err());
    }

    #[test]
    fn render_keeps_dimensions() {
        let mask = synthesize(&small()).unwrap();
        assert_eq!(mask.dimensions(), (48, 40));
    }

    #[test]
    fn binary_mask_is_strictly_binary() {
        let engine = CloudEngine::new(small()).unwrap();
        let mask = engine.binary_mask().unwrap();
        assert!(mask.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn render_without_feather_equals_binary_mask() {
        let engine = CloudEngine::new(CloudParams { feather_radius: 0.0, ..small() }).unwrap();
        assert_eq!(engine.render().unwrap(), engine.binary_mask().unwrap());
    }
}
