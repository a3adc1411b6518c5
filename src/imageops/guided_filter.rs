use log::debug;

use crate::error::{Error, Result, SingularMatrixError};
use crate::imageops::box_filter::box_filter;
use crate::pixels::{join_channels, split_channels, ImageGray, ImageRgb, PixelBuffer};

/// Edge-preserving smoothing guided by a colour image
///
/// Within every `(2 * radius + 1)` square window the output is modelled as
/// an affine function of the guide's three channels; overlapping window
/// estimates are averaged. `epsilon` regularises the fit and must be positive.
pub trait GuidedFilter: Sized {
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - `radius` is zero or `epsilon` is not a positive number
    /// * `Error::DimensionMismatch` - input and guide differ in size
    /// * `Error::DegenerateInput` - a local guide covariance could not be inverted
    fn guided_filter(&self, guide: &ImageRgb, radius: u32, epsilon: f32) -> Result<Self>;
}

impl GuidedFilter for ImageGray {
    fn guided_filter(&self, guide: &ImageRgb, radius: u32, epsilon: f32) -> Result<Self> {
        guided_filter_gray(self, guide, radius, epsilon)
    }
}

impl GuidedFilter for ImageRgb {
    fn guided_filter(&self, guide: &ImageRgb, radius: u32, epsilon: f32) -> Result<Self> {
        guided_filter_rgb(self, guide, radius, epsilon)
    }
}

/// Filters a single-channel image.
///
/// # Errors
///
/// See [`GuidedFilter::guided_filter`].
pub fn guided_filter_gray(
    input: &ImageGray,
    guide: &ImageRgb,
    radius: u32,
    epsilon: f32,
) -> Result<ImageGray> {
    guide.check_dimensions(input)?;
    let values = GuidedFilterValues::new(guide, radius, epsilon)?;
    values.filter_channel(input)
}

/// Filters each channel of a colour image against the same guide.
///
/// # Errors
///
/// See [`GuidedFilter::guided_filter`].
pub fn guided_filter_rgb(
    input: &ImageRgb,
    guide: &ImageRgb,
    radius: u32,
    epsilon: f32,
) -> Result<ImageRgb> {
    guide.check_dimensions(input)?;
    let values = GuidedFilterValues::new(guide, radius, epsilon)?;
    values.filter_rgb(input)
}

fn validate_guided_filter_params(radius: u32, epsilon: f32) -> Result<()> {
    if radius == 0 {
        return Err(Error::InvalidParameter(
            "guided filter radius must be positive".to_string(),
        ));
    }
    if !(epsilon.is_finite() && epsilon > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "guided filter epsilon must be a positive number, got {epsilon}"
        )));
    }
    Ok(())
}

/// Symmetric 3x3 covariance of the guide's channels within one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CovarianceMatrix {
    pub rr: f32,
    pub rg: f32,
    pub rb: f32,
    pub gg: f32,
    pub gb: f32,
    pub bb: f32,
}

/// Inverse of a [`CovarianceMatrix`], itself symmetric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseCovariance {
    pub rr: f32,
    pub rg: f32,
    pub rb: f32,
    pub gg: f32,
    pub gb: f32,
    pub bb: f32,
}

impl CovarianceMatrix {
    /// Inverse by the adjugate method.
    ///
    /// The determinant is the dot product of the first cofactor row with
    /// the first matrix row.
    ///
    /// # Errors
    ///
    /// Returns `SingularMatrixError` when the determinant is zero or not finite.
    pub fn invert(&self) -> std::result::Result<InverseCovariance, SingularMatrixError> {
        let Self {
            rr,
            rg,
            rb,
            gg,
            gb,
            bb,
        } = *self;

        let cof_rr = gg.mul_add(bb, -(gb * gb));
        let cof_rg = gb.mul_add(rb, -(rg * bb));
        let cof_rb = rg.mul_add(gb, -(gg * rb));
        let cof_gg = rr.mul_add(bb, -(rb * rb));
        let cof_gb = rb.mul_add(rg, -(rr * gb));
        let cof_bb = rr.mul_add(gg, -(rg * rg));

        let determinant = cof_rb.mul_add(rb, cof_rr.mul_add(rr, cof_rg * rg));
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(SingularMatrixError { determinant });
        }

        let inv_det = determinant.recip();
        Ok(InverseCovariance {
            rr: cof_rr * inv_det,
            rg: cof_rg * inv_det,
            rb: cof_rb * inv_det,
            gg: cof_gg * inv_det,
            gb: cof_gb * inv_det,
            bb: cof_bb * inv_det,
        })
    }
}

impl InverseCovariance {
    /// Matrix-vector product with `[r, g, b]`.
    #[must_use]
    pub fn apply(&self, [r, g, b]: [f32; 3]) -> [f32; 3] {
        [
            self.rb.mul_add(b, self.rr.mul_add(r, self.rg * g)),
            self.gb.mul_add(b, self.rg.mul_add(r, self.gg * g)),
            self.bb.mul_add(b, self.rb.mul_add(r, self.gb * g)),
        ]
    }
}

/// Guide-only statistics shared by every filtering pass with the same
/// guide, radius and epsilon
///
/// Building this is the expensive half of the guided filter; each call to
/// [`GuidedFilterValues::filter_channel`] reuses it.
#[derive(Debug, Clone)]
pub struct GuidedFilterValues {
    radius: u32,
    guide: [ImageGray; 3],
    guide_mean: [ImageGray; 3],
    inv_cov: Vec<InverseCovariance>,
}

impl GuidedFilterValues {
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - `radius` is zero or `epsilon` is not a positive number
    /// * `Error::DegenerateInput` - a local covariance is singular despite `epsilon`
    pub fn new(guide: &ImageRgb, radius: u32, epsilon: f32) -> Result<Self> {
        validate_guided_filter_params(radius, epsilon)?;

        let channels = split_channels(guide);
        let guide_mean = channels.each_ref().map(|c| box_filter(c, radius));

        let correlation = |i: usize, j: usize| -> Result<ImageGray> {
            Ok(box_filter(&channels[i].try_mul(&channels[j])?, radius))
        };
        let corr_rr = correlation(0, 0)?;
        let corr_rg = correlation(0, 1)?;
        let corr_rb = correlation(0, 2)?;
        let corr_gg = correlation(1, 1)?;
        let corr_gb = correlation(1, 2)?;
        let corr_bb = correlation(2, 2)?;

        let [mean_r, mean_g, mean_b] = guide_mean.each_ref().map(PixelBuffer::as_slice);

        let inv_cov = (0..guide.len())
            .map(|i| {
                let (mr, mg, mb) = (mean_r[i], mean_g[i], mean_b[i]);

                // Epsilon goes on the diagonal only.
                CovarianceMatrix {
                    rr: mr.mul_add(-mr, corr_rr.as_slice()[i]) + epsilon,
                    rg: mr.mul_add(-mg, corr_rg.as_slice()[i]),
                    rb: mr.mul_add(-mb, corr_rb.as_slice()[i]),
                    gg: mg.mul_add(-mg, corr_gg.as_slice()[i]) + epsilon,
                    gb: mg.mul_add(-mb, corr_gb.as_slice()[i]),
                    bb: mb.mul_add(-mb, corr_bb.as_slice()[i]) + epsilon,
                }
                .invert()
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            "guided filter statistics ready: {}x{}, radius {radius}, epsilon {epsilon}",
            guide.width(),
            guide.height()
        );

        Ok(Self {
            radius,
            guide: channels,
            guide_mean,
            inv_cov,
        })
    }

    #[must_use]
    pub const fn radius(&self) -> u32 {
        self.radius
    }

    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        self.guide[0].dimensions()
    }

    /// Filters one channel against the stored guide.
    ///
    /// # Errors
    ///
    /// * `Error::DimensionMismatch` - `input` differs in size from the guide
    pub fn filter_channel(&self, input: &ImageGray) -> Result<ImageGray> {
        let [guide_r, guide_g, guide_b] = &self.guide;
        guide_r.check_dimensions(input)?;

        let radius = self.radius;
        let mean_p = box_filter(input, radius);
        let mean_ip_r = box_filter(&guide_r.try_mul(input)?, radius);
        let mean_ip_g = box_filter(&guide_g.try_mul(input)?, radius);
        let mean_ip_b = box_filter(&guide_b.try_mul(input)?, radius);

        let [mean_r, mean_g, mean_b] = self.guide_mean.each_ref().map(PixelBuffer::as_slice);

        let len = input.len();
        let mut a_r = Vec::with_capacity(len);
        let mut a_g = Vec::with_capacity(len);
        let mut a_b = Vec::with_capacity(len);
        let mut b = Vec::with_capacity(len);

        for i in 0..len {
            let p = mean_p.as_slice()[i];
            let (mr, mg, mb) = (mean_r[i], mean_g[i], mean_b[i]);

            // cov(I, p) = E[I * p] - E[I] * E[p]
            let cov_ip = [
                mr.mul_add(-p, mean_ip_r.as_slice()[i]),
                mg.mul_add(-p, mean_ip_g.as_slice()[i]),
                mb.mul_add(-p, mean_ip_b.as_slice()[i]),
            ];
            let [ar, ag, ab] = self.inv_cov[i].apply(cov_ip);

            a_r.push(ar);
            a_g.push(ag);
            a_b.push(ab);
            b.push(ab.mul_add(-mb, ag.mul_add(-mg, ar.mul_add(-mr, p))));
        }

        let (width, height) = input.dimensions();
        let a_r = box_filter(&PixelBuffer::from_raw_parts(width, height, a_r), radius);
        let a_g = box_filter(&PixelBuffer::from_raw_parts(width, height, a_g), radius);
        let a_b = box_filter(&PixelBuffer::from_raw_parts(width, height, a_b), radius);
        let b = box_filter(&PixelBuffer::from_raw_parts(width, height, b), radius);

        let output = (0..len)
            .map(|i| {
                let q = a_b.as_slice()[i].mul_add(
                    guide_b.as_slice()[i],
                    a_r.as_slice()[i]
                        .mul_add(guide_r.as_slice()[i], a_g.as_slice()[i] * guide_g.as_slice()[i]),
                );
                q + b.as_slice()[i]
            })
            .collect();

        Ok(PixelBuffer::from_raw_parts(width, height, output))
    }

    /// Filters each channel of `input` independently against the stored guide.
    ///
    /// # Errors
    ///
    /// * `Error::DimensionMismatch` - `input` differs in size from the guide
    pub fn filter_rgb(&self, input: &ImageRgb) -> Result<ImageRgb> {
        let [r, g, b] = split_channels(input);
        join_channels(
            &self.filter_channel(&r)?,
            &self.filter_channel(&g)?,
            &self.filter_channel(&b)?,
        )
    }
}
