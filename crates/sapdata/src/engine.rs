//! Surface of the compiled sparse-signal engine.
//!
//! Nothing here is implemented by this crate. The traits let callers plug an
//! engine binding in next to the datasets it consumes.

/// Denoising or other data-to-data filtering.
pub trait Filter {
    type Data;
    type Error;

    fn filter(&self, data: &Self::Data) -> Result<Self::Data, Self::Error>;
}

/// Deconvolution of an image by a point spread function.
pub trait Deconvolver {
    type Image;
    type Error;

    fn deconvolve(&self, image: &Self::Image, psf: &Self::Image) -> Result<Self::Image, Self::Error>;
}

/// Description of a multiscale transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformInfo {
    pub name:     String,
    pub n_scales: usize,
    /// Coefficient bands at each scale, finest first.
    pub bands:    Vec<usize>,
}

/// Forward and inverse multiscale decomposition (wavelets, curvelets, ...).
pub trait MultiscaleTransform {
    type Data;
    type Coefficients;
    type Error;

    fn transform(&self, data: &Self::Data) -> Result<Self::Coefficients, Self::Error>;

    fn reconstruct(&self, coefficients: &Self::Coefficients) -> Result<Self::Data, Self::Error>;

    fn info(&self) -> TransformInfo;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Threshold(f64);

    impl Filter for Threshold {
        type Data = Vec<f64>;
        type Error = std::convert::Infallible;

        fn filter(&self, data: &Vec<f64>) -> Result<Vec<f64>, Self::Error> {
            Ok(data.iter().map(|v| if v.abs() < self.0 { 0.0 } else { *v }).collect())
        }
    }

    struct Pairwise;

    impl MultiscaleTransform for Pairwise {
        type Data = Vec<f64>;
        type Coefficients = (Vec<f64>, Vec<f64>);
        type Error = String;

        fn transform(&self, data: &Vec<f64>) -> Result<Self::Coefficients, String> {
            if data.len() % 2 != 0 {
                return Err("odd length".to_string());
            }
            let sums = data.chunks(2).map(|p| (p[0] + p[1]) / 2.0).collect();
            let diffs = data.chunks(2).map(|p| (p[0] - p[1]) / 2.0).collect();
            Ok((sums, diffs))
        }

        fn reconstruct(&self, (sums, diffs): &Self::Coefficients) -> Result<Vec<f64>, String> {
            Ok(sums
                .iter()
                .zip(diffs)
                .flat_map(|(s, d)| [s + d, s - d])
                .collect())
        }

        fn info(&self) -> TransformInfo {
            TransformInfo {
                name:     "pairwise".to_string(),
                n_scales: 1,
                bands:    vec![2],
            }
        }
    }

    struct Unit;

    impl Deconvolver for Unit {
        type Image = Vec<f64>;
        type Error = String;

        fn deconvolve(&self, image: &Vec<f64>, psf: &Vec<f64>) -> Result<Vec<f64>, String> {
            match psf.as_slice() {
                [k] if *k != 0.0 => Ok(image.iter().map(|v| v / k).collect()),
                _ => Err("only scalar kernels".to_string()),
            }
        }
    }

    #[test]
    fn test_engine_traits_compose() {
        let data = vec![4.0, 2.0, 0.5, 0.5];
        let transform = Pairwise;
        let (sums, diffs) = transform.transform(&data).unwrap();
        let diffs = Threshold(0.5).filter(&diffs).unwrap();
        assert_eq!(transform.reconstruct(&(sums, diffs)).unwrap(), data);
        assert_eq!(transform.info().n_scales, 1);

        assert_eq!(Unit.deconvolve(&data, &vec![2.0]).unwrap(), vec![2.0, 1.0, 0.25, 0.25]);
        assert!(Unit.deconvolve(&data, &vec![]).is_err());
    }
}
